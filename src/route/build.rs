use super::error::RouteBuildError;
use super::params::{compiled_marker, extract_plan, CATCH_ALL};
use super::synth::synthesize_path;
use super::table::{Overwrite, RouteEntry, RouteTable};
use crate::config::{default_action_marker, BuildConfig};
use crate::controller::{MethodDescriptor, MetadataSource, RouteDeclaration};
use http::Method;
use tracing::{debug, info, warn};

/// Join a controller prefix and a method path into a table key.
///
/// The prefix gets a leading and a trailing `/`, the path loses one leading `/`, and the
/// result gets a trailing `/` unless it already ends in `/`, a catch-all
/// group or the default-action marker. Applying it again with an empty
/// prefix returns the same string.
///
/// ```rust
/// use ctlroute::route::normalize_path;
///
/// assert_eq!(normalize_path("/users", "/show/(.+?)", "index"), "/users/show/(.+?)/");
/// assert_eq!(normalize_path("", "list", "index"), "/list/");
/// ```
#[must_use]
pub fn normalize_path(prefix: &str, path: &str, default_action: &str) -> String {
    let mut out = String::with_capacity(prefix.len() + path.len() + 3);
    if !prefix.starts_with('/') {
        out.push('/');
    }
    out.push_str(prefix);
    if !out.ends_with('/') {
        out.push('/');
    }
    out.push_str(path.strip_prefix('/').unwrap_or(path));
    if !(out.ends_with('/')
        || out.ends_with(CATCH_ALL)
        || out.ends_with(&default_action_marker(default_action))
        || out.ends_with(&compiled_marker(default_action)))
    {
        out.push('/');
    }
    out
}

/// Strip namespace separators a reflective source leaves in front of type names.
fn clean_controller_name(name: &str) -> &str {
    name.trim_start_matches('\\').trim_start_matches("::")
}

/// Routes built for one controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerRoutes {
    pub controller: String,
    pub table: RouteTable,
    /// Writes in this fragment that replaced an earlier route
    pub overwrites: Vec<Overwrite>,
    rest: bool,
}

impl ControllerRoutes {
    /// Whether the controller was marked REST-capable.
    #[must_use]
    pub fn is_rest(&self) -> bool {
        self.rest
    }
}

/// Routes built for every controller of a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteBuild {
    pub table: RouteTable,
    /// Overwrites inside fragments and between fragments, in write order
    pub overwrites: Vec<Overwrite>,
    /// Controllers marked REST-capable, in declaration order
    pub rest_controllers: Vec<String>,
}

/// Builds route tables from controller metadata.
///
/// # Example
///
/// ```rust
/// use ctlroute::controller::{ControllerMeta, ControllerRegistry, MethodDescriptor, MethodMeta, RouteDeclaration};
/// use ctlroute::route::RouteBuilder;
/// use http::Method;
///
/// let registry = ControllerRegistry::new().with_controller(
///     ControllerMeta::new("Users")
///         .with_route(RouteDeclaration::path("/users").with_methods([Method::GET]))
///         .rest(true)
///         .with_method(MethodMeta::new(MethodDescriptor::new("list", "Users"))),
/// );
/// let routes = RouteBuilder::default().build_controller(&registry, "Users").unwrap();
/// assert!(routes.table.entry("/users/list/", &Method::GET).is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouteBuilder {
    config: BuildConfig,
}

impl RouteBuilder {
    pub fn new(config: BuildConfig) -> Self {
        RouteBuilder { config }
    }

    #[must_use]
    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Whether an undecorated method may be auto-enrolled by a REST controller.
    #[must_use]
    pub fn is_rest_eligible(&self, method: &MethodDescriptor) -> bool {
        method.owner != self.config.base_controller
            && !self.config.is_excluded(&method.name)
            && !method.name.starts_with('_')
    }

    /// Pair every routable method with the declarations it is exposed under.
    ///
    /// Declarations without a path get the synthesized one. REST controllers
    /// with a main route also enroll eligible undecorated methods.
    pub(crate) fn collect_routes<S: MetadataSource + ?Sized>(
        &self,
        source: &S,
        controller: &str,
        rest: bool,
        has_main_route: bool,
    ) -> Vec<(MethodDescriptor, Vec<RouteDeclaration>)> {
        let mut routed = Vec::new();
        for method in source.list_public_methods(controller) {
            let declared = source
                .method_routes(controller, &method.name)
                .filter(|d| !d.is_empty());
            let declarations = match declared {
                Some(declarations) => declarations
                    .into_iter()
                    .map(|mut d| {
                        if d.path.is_none() {
                            d.path = Some(synthesize_path(&method, &self.config.default_action));
                        }
                        d
                    })
                    .collect(),
                None if rest && has_main_route && self.is_rest_eligible(&method) => {
                    vec![RouteDeclaration::path(synthesize_path(
                        &method,
                        &self.config.default_action,
                    ))]
                }
                None => continue,
            };
            routed.push((method, declarations));
        }
        routed
    }

    /// Build the route table fragment for one controller.
    ///
    /// # Errors
    ///
    /// Fails on the first placeholder that does not name a parameter of its
    /// method, or on a variadic placeholder that is not last.
    pub fn build_controller<S: MetadataSource + ?Sized>(
        &self,
        source: &S,
        controller: &str,
    ) -> Result<ControllerRoutes, RouteBuildError> {
        let main_route = source.class_route(controller);
        let rest = source.is_rest_capable(controller);
        let prefix = main_route
            .as_ref()
            .and_then(|r| r.path.clone())
            .unwrap_or_default();
        let default_verbs: Option<Vec<Method>> =
            main_route.as_ref().and_then(|r| r.verbs()).map(<[Method]>::to_vec);

        if rest && main_route.is_none() {
            warn!(
                controller = %controller,
                "REST controller has no main route; undecorated methods are not enrolled"
            );
        }

        let controller_id = clean_controller_name(controller).to_string();
        let mut table = RouteTable::new();
        let mut overwrites = Vec::new();

        for (method, declarations) in
            self.collect_routes(source, controller, rest, main_route.is_some())
        {
            let unreachable = method.unreachable_parameters();
            if !unreachable.is_empty() {
                let ignored: Vec<&str> = unreachable.iter().map(|p| p.name.as_str()).collect();
                warn!(
                    controller = %controller_id,
                    action = %method.name,
                    ignored = ?ignored,
                    "Parameters declared after a variadic parameter are not routable"
                );
            }
            for declaration in declarations {
                let pattern = declaration.path.as_deref().unwrap_or_default();
                let plan = extract_plan(pattern, &method, &self.config.default_action)?;
                let path = normalize_path(&prefix, &plan.path, &self.config.default_action);
                let entry = RouteEntry {
                    controller: controller_id.clone(),
                    action: method.name.clone(),
                    parameters: plan.parameters,
                    name: declaration.name.clone(),
                    cache: declaration.cache.unwrap_or(false),
                    duration: declaration.duration,
                };

                match declaration.verbs().or(default_verbs.as_deref()) {
                    Some(verbs) => {
                        for verb in verbs {
                            debug!(controller = %controller_id, action = %method.name, path = %path, verb = %verb, "Route registered");
                            overwrites.extend(table.insert_verb(
                                path.clone(),
                                verb.clone(),
                                entry.clone(),
                            ));
                        }
                    }
                    None => {
                        debug!(controller = %controller_id, action = %method.name, path = %path, "Route registered");
                        overwrites.extend(table.insert_any(path, entry));
                    }
                }
            }
        }

        info!(
            controller = %controller_id,
            rest,
            routes_count = table.entry_count(),
            overwritten = overwrites.len(),
            "Controller routes built"
        );

        Ok(ControllerRoutes {
            controller: controller_id,
            table,
            overwrites,
            rest,
        })
    }

    fn merge(&self, fragments: Vec<ControllerRoutes>) -> RouteBuild {
        let mut build = RouteBuild {
            table: RouteTable::new(),
            overwrites: Vec::new(),
            rest_controllers: Vec::new(),
        };
        for fragment in fragments {
            if fragment.is_rest() {
                build.rest_controllers.push(fragment.controller.clone());
            }
            build.overwrites.extend(fragment.overwrites);
            let merged = build.table.merge(fragment.table);
            for o in &merged {
                warn!(path = %o.path, verb = ?o.verb, previous = %o.previous, replacement = %o.replacement, "Route from another controller overwritten");
            }
            build.overwrites.extend(merged);
        }
        info!(
            routes_count = build.table.entry_count(),
            paths = build.table.len(),
            overwritten = build.overwrites.len(),
            "Route table built"
        );
        build
    }

    /// Build every controller of `source` in declaration order and merge the
    /// fragments; later controllers win collisions.
    ///
    /// # Errors
    ///
    /// Returns the error of the first controller that fails to build.
    pub fn build_all<S: MetadataSource + ?Sized>(&self, source: &S) -> Result<RouteBuild, RouteBuildError> {
        let fragments = source
            .controllers()
            .iter()
            .map(|c| self.build_controller(source, c))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.merge(fragments))
    }

    /// Same result as [`RouteBuilder::build_all`], with fragments built on up
    /// to `config.workers` threads. Fragments are merged in declaration
    /// order, so collisions resolve exactly as in a sequential build.
    ///
    /// # Errors
    ///
    /// Returns the error of the first controller, in declaration order, that
    /// fails to build.
    pub fn build_all_parallel<S: MetadataSource + Sync + ?Sized>(
        &self,
        source: &S,
    ) -> Result<RouteBuild, RouteBuildError> {
        let controllers = source.controllers();
        let workers = self.config.workers.max(1).min(controllers.len().max(1));
        let chunk_size = controllers.len().div_ceil(workers).max(1);

        let chunks: Vec<Vec<Result<ControllerRoutes, RouteBuildError>>> =
            std::thread::scope(|scope| {
                let handles: Vec<_> = controllers
                    .chunks(chunk_size)
                    .map(|chunk| {
                        scope.spawn(move || {
                            chunk
                                .iter()
                                .map(|c| self.build_controller(source, c))
                                .collect::<Vec<_>>()
                        })
                    })
                    .collect();
                handles
                    .into_iter()
                    .map(|h| match h.join() {
                        Ok(results) => results,
                        Err(payload) => std::panic::resume_unwind(payload),
                    })
                    .collect()
            });

        let fragments = chunks
            .into_iter()
            .flatten()
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.merge(fragments))
    }
}
