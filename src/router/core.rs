use crate::route::{ParamSlot, RouteBuildError, RouteEntry, RouteTable, RouteTarget};
use http::Method;
use regex::{Captures, Regex};
use smallvec::SmallVec;
use std::sync::Arc;
use tracing::{debug, info};

/// Maximum number of bound arguments before heap allocation.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Values bound to indexed parameters, in plan order.
pub type ArgVec = SmallVec<[(usize, String); MAX_INLINE_PARAMS]>;

/// Result of matching a URL against the table.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// Table key that matched
    pub path: Arc<str>,
    pub entry: Arc<RouteEntry>,
    pub args: ArgVec,
    /// Remaining path captured for the variadic parameter, separators included
    pub rest: Option<String>,
}

impl RouteMatch {
    #[must_use]
    pub fn controller(&self) -> &str {
        &self.entry.controller
    }

    #[must_use]
    pub fn action(&self) -> &str {
        &self.entry.action
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.entry.name.as_deref()
    }

    /// Bound value for the parameter at `index`; `None` for an optional
    /// parameter the URL left out.
    #[must_use]
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args
            .iter()
            .rfind(|(i, _)| *i == index)
            .map(|(_, v)| v.as_str())
    }

    /// Non-empty segments of the variadic capture, i.e. the values spread
    /// into the variadic parameter.
    #[must_use]
    pub fn rest_segments(&self) -> Vec<&str> {
        self.rest
            .as_deref()
            .map(|r| r.split('/').filter(|s| !s.is_empty()).collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
enum CompiledTarget {
    Any(Arc<RouteEntry>),
    Verbs(Vec<(Method, Arc<RouteEntry>)>),
}

#[derive(Debug, Clone)]
struct CompiledRoute {
    path: Arc<str>,
    regex: Regex,
    target: CompiledTarget,
}

/// Compile one table key into the anchored regex the router matches with.
pub(crate) fn compile_key(path: &str) -> Result<Regex, RouteBuildError> {
    Regex::new(&format!("(?s)^{path}$")).map_err(|e| RouteBuildError::InvalidPattern {
        path: path.to_string(),
        reason: e.to_string(),
    })
}

/// Matches URLs against a compiled [`RouteTable`].
///
/// Routes are tried in table order and the first one whose pattern matches
/// and which serves the request verb wins.
#[derive(Debug, Clone, Default)]
pub struct Router {
    routes: Vec<CompiledRoute>,
}

impl Router {
    /// Compile every table key into an anchored regex.
    ///
    /// # Errors
    ///
    /// [`RouteBuildError::InvalidPattern`] for a key that is not a valid
    /// regex, typically a hand-written path without placeholders.
    pub fn new(table: &RouteTable) -> Result<Self, RouteBuildError> {
        let routes = table
            .iter()
            .map(|(path, target)| {
                let regex = compile_key(path)?;
                let target = match target {
                    RouteTarget::Any(entry) => CompiledTarget::Any(Arc::new(entry.clone())),
                    RouteTarget::Verbs(verbs) => CompiledTarget::Verbs(
                        verbs
                            .iter()
                            .map(|(m, e)| (m.clone(), Arc::new(e.clone())))
                            .collect(),
                    ),
                };
                Ok(CompiledRoute {
                    path: Arc::from(path),
                    regex,
                    target,
                })
            })
            .collect::<Result<Vec<_>, RouteBuildError>>()?;

        info!(routes_count = routes.len(), "Router compiled");
        Ok(Router { routes })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Bring a request path into the shape table keys expect: query and
    /// fragment dropped, leading and trailing `/` present.
    #[must_use]
    pub fn normalize_url(url: &str) -> String {
        let path = url.split(['?', '#']).next().unwrap_or_default();
        let mut out = String::with_capacity(path.len() + 2);
        if !path.starts_with('/') {
            out.push('/');
        }
        out.push_str(path);
        if !out.ends_with('/') {
            out.push('/');
        }
        out
    }

    /// Match `url` for `method` and bind the captures to action parameters.
    #[must_use]
    pub fn route(&self, method: &Method, url: &str) -> Option<RouteMatch> {
        let normalized = Self::normalize_url(url);
        debug!(method = %method, path = %normalized, "Route match attempt");

        for route in &self.routes {
            let entry = match &route.target {
                CompiledTarget::Any(entry) => entry,
                CompiledTarget::Verbs(verbs) => match verbs.iter().find(|(m, _)| m == method) {
                    Some((_, entry)) => entry,
                    None => continue,
                },
            };
            let Some(caps) = route.regex.captures(&normalized) else {
                continue;
            };
            let (args, rest) = bind(&entry.parameters, &caps);
            debug!(
                method = %method,
                path = %normalized,
                route_pattern = %route.path,
                controller = %entry.controller,
                action = %entry.action,
                args = ?args,
                rest = ?rest,
                "Route matched"
            );
            return Some(RouteMatch {
                path: Arc::clone(&route.path),
                entry: Arc::clone(entry),
                args,
                rest,
            });
        }

        debug!(method = %method, path = %normalized, "No route matched");
        None
    }
}

/// Remove the one trailing `/` URL normalization may have added.
fn trim_slash(s: &str) -> &str {
    s.strip_suffix('/').unwrap_or(s)
}

/// Walk the plan alongside the capture groups.
///
/// `Index` and `Wildcard` slots consume groups left to right. The optional
/// tail is the group after those; its segments feed `Optional` slots in
/// order, and slots left without a segment stay unbound.
fn bind(plan: &[ParamSlot], caps: &Captures<'_>) -> (ArgVec, Option<String>) {
    let positional = plan
        .iter()
        .filter(|s| !matches!(s, ParamSlot::Optional(_)))
        .count();
    let tail = caps
        .get(positional + 1)
        .map(|m| trim_slash(m.as_str()))
        .unwrap_or_default();
    let mut optional = tail.split('/').filter(|s| !s.is_empty());

    let mut args = ArgVec::new();
    let mut rest = None;
    let mut group = 1;
    for slot in plan {
        match slot {
            ParamSlot::Index(i) => {
                if let Some(m) = caps.get(group) {
                    args.push((*i, trim_slash(m.as_str()).to_string()));
                }
                group += 1;
            }
            ParamSlot::Wildcard => {
                rest = caps.get(group).map(|m| trim_slash(m.as_str()).to_string());
                group += 1;
            }
            ParamSlot::Optional(i) => {
                if let Some(value) = optional.next() {
                    args.push((*i, value.to_string()));
                }
            }
        }
    }
    (args, rest)
}
