use super::source::{ControllerMeta, ControllerRegistry, MethodMeta};
use super::types::{MethodDescriptor, ParameterDescriptor, RouteDeclaration};
use crate::config::BuildConfig;
use anyhow::Context;
use http::Method;
use serde::Deserialize;
use std::path::Path;

/// On-disk encoding of a controller manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Yaml,
    Json,
}

impl ManifestFormat {
    /// `.yaml`/`.yml` files are YAML, everything else is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => ManifestFormat::Yaml,
            _ => ManifestFormat::Json,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawManifest {
    #[serde(default)]
    controllers: Vec<RawController>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawController {
    name: String,
    #[serde(default)]
    route: Option<RawRoute>,
    #[serde(default)]
    rest: bool,
    #[serde(default)]
    methods: Vec<RawMethod>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawMethod {
    name: String,
    #[serde(default)]
    owner: Option<String>,
    #[serde(default)]
    parameters: Vec<RawParameter>,
    #[serde(default)]
    routes: Option<Vec<RawRoute>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawParameter {
    name: String,
    #[serde(default)]
    optional: bool,
    #[serde(default)]
    variadic: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRoute {
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    methods: Option<Vec<String>>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    cache: Option<bool>,
    #[serde(default)]
    duration: Option<u64>,
}

fn parse_verb(verb: &str) -> anyhow::Result<Method> {
    let upper = verb.trim().to_ascii_uppercase();
    Method::from_bytes(upper.as_bytes()).with_context(|| format!("invalid HTTP method '{verb}'"))
}

fn convert_route(raw: RawRoute, location: &str) -> anyhow::Result<RouteDeclaration> {
    let methods = match raw.methods {
        Some(verbs) => Some(
            verbs
                .iter()
                .map(|v| parse_verb(v))
                .collect::<anyhow::Result<Vec<_>>>()
                .with_context(|| format!("in route of {location}"))?,
        ),
        None => None,
    };
    Ok(RouteDeclaration {
        path: raw.path,
        methods,
        name: raw.name,
        cache: raw.cache,
        duration: raw.duration,
    })
}

fn convert_method(controller: &str, raw: RawMethod) -> anyhow::Result<MethodMeta> {
    let location = format!("{controller}::{}", raw.name);
    let parameters = raw
        .parameters
        .into_iter()
        .enumerate()
        .map(|(index, p)| {
            ParameterDescriptor::new(p.name, index).with_flags(p.optional, p.variadic)
        })
        .collect();
    let routes = match raw.routes {
        Some(routes) => Some(
            routes
                .into_iter()
                .map(|r| convert_route(r, &location))
                .collect::<anyhow::Result<Vec<_>>>()?,
        ),
        None => None,
    };
    Ok(MethodMeta {
        descriptor: MethodDescriptor {
            name: raw.name,
            parameters,
            owner: raw.owner.unwrap_or_else(|| controller.to_string()),
        },
        routes,
    })
}

fn convert_controller(raw: RawController) -> anyhow::Result<ControllerMeta> {
    let route = raw
        .route
        .map(|r| convert_route(r, &raw.name))
        .transpose()?;
    let methods = raw
        .methods
        .into_iter()
        .map(|m| convert_method(&raw.name, m))
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(ControllerMeta {
        name: raw.name,
        route,
        rest: raw.rest,
        methods,
    })
}

/// Parse a manifest from memory into a [`ControllerRegistry`].
pub fn load_manifest_str(
    content: &str,
    format: ManifestFormat,
    config: &BuildConfig,
) -> anyhow::Result<ControllerRegistry> {
    // Editors truncate before writing; an empty read is never a real manifest.
    if content.trim().is_empty() {
        anyhow::bail!("manifest is empty");
    }
    let raw: RawManifest = match format {
        ManifestFormat::Yaml => serde_yaml::from_str(content).context("invalid YAML manifest")?,
        ManifestFormat::Json => serde_json::from_str(content).context("invalid JSON manifest")?,
    };

    let mut registry = ControllerRegistry::with_config(config);
    for controller in raw.controllers {
        registry.register(convert_controller(controller)?);
    }
    Ok(registry)
}

/// Load a controller manifest (YAML or JSON, chosen by extension).
///
/// ```yaml
/// controllers:
///   - name: controllers\Users
///     route: { path: /users, methods: [GET, POST] }
///     rest: true
///     methods:
///       - name: show
///         parameters:
///           - { name: id }
///           - { name: format, optional: true }
///         routes:
///           - { path: "/show/{id}{~format}", name: users.show }
/// ```
pub fn load_manifest(path: &Path, config: &BuildConfig) -> anyhow::Result<ControllerRegistry> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read manifest {}", path.display()))?;
    load_manifest_str(&content, ManifestFormat::from_path(path), config)
        .with_context(|| format!("failed to load manifest {}", path.display()))
}
