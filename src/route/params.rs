use super::error::RouteBuildError;
use super::table::ParamSlot;
use crate::config::default_action_marker;
use crate::controller::MethodDescriptor;
use once_cell::sync::Lazy;
use regex::Regex;

/// `{name}`, `{~name}` or `{...name}`
#[allow(clippy::expect_used)]
static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{(\.\.\.|~)?(.+?)\}").expect("placeholder regex is valid"));

/// Catch-all group used for variadic captures and the optional tail.
pub const CATCH_ALL: &str = "(.*?)";
/// Capture group for a required parameter.
pub const REQUIRED: &str = "(.+?)";

/// Regex-ready path and the order its capture groups bind to parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPlan {
    pub path: String,
    pub parameters: Vec<ParamSlot>,
}

/// The default-action marker as it appears in a compiled path.
#[must_use]
pub fn compiled_marker(default_action: &str) -> String {
    format!("(?:{}/)?", regex::escape(default_action))
}

/// Escape literal path text, keeping default-action markers as
/// non-capturing optional groups so they never shift capture positions.
fn escape_literal(text: &str, marker: &str, compiled: &str) -> String {
    text.split(marker)
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(compiled)
}

/// Turn a placeholder pattern into a regex path plus extraction plan.
///
/// Literal text is regex-escaped. Each placeholder must name a parameter of
/// `method`:
///
/// - `{name}` becomes `(.+?)` and records [`ParamSlot::Index`]
/// - `{...name}` becomes `(.*?)` and records [`ParamSlot::Wildcard`]; it
///   must be the last placeholder
/// - `{~name}` is removed and records [`ParamSlot::Optional`]; one trailing
///   `(.*?)` group is appended for all optional parameters
///
/// A pattern without placeholders is taken as a hand-written regex and
/// returned unescaped.
///
/// # Errors
///
/// [`RouteBuildError::UnknownParameter`] for a placeholder with no matching
/// parameter, [`RouteBuildError::VariadicNotLast`] when a `{...name}` is
/// followed by another placeholder.
///
/// # Example
///
/// ```rust
/// use ctlroute::controller::MethodDescriptor;
/// use ctlroute::route::{extract_plan, ParamSlot};
///
/// let show = MethodDescriptor::new("show", "Users")
///     .with_param("id", false, false)
///     .with_param("format", true, false);
/// let plan = extract_plan("show/{id}{~format}", &show, "index").unwrap();
/// assert_eq!(plan.path, "show/(.+?)/(.*?)");
/// assert_eq!(plan.parameters, vec![ParamSlot::Index(0), ParamSlot::Optional(1)]);
/// ```
pub fn extract_plan(
    pattern: &str,
    method: &MethodDescriptor,
    default_action: &str,
) -> Result<PathPlan, RouteBuildError> {
    let marker = default_action_marker(default_action);
    let compiled = compiled_marker(default_action);

    if !PLACEHOLDER.is_match(pattern) {
        return Ok(PathPlan {
            path: pattern.replace(&marker, &compiled),
            parameters: Vec::new(),
        });
    }

    let mut path = String::with_capacity(pattern.len() + 16);
    let mut parameters = Vec::new();
    let mut has_optional = false;
    let mut variadic_token: Option<&str> = None;
    let mut last = 0;

    for caps in PLACEHOLDER.captures_iter(pattern) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(2)) else {
            continue;
        };
        let token = whole.as_str();

        if let Some(variadic) = variadic_token {
            return Err(RouteBuildError::VariadicNotLast {
                controller: method.owner.clone(),
                method: method.name.clone(),
                token: variadic.to_string(),
            });
        }

        let param = method.parameter(name.as_str()).ok_or_else(|| {
            RouteBuildError::UnknownParameter {
                controller: method.owner.clone(),
                method: method.name.clone(),
                token: token.to_string(),
            }
        })?;

        path.push_str(&escape_literal(&pattern[last..whole.start()], &marker, &compiled));
        last = whole.end();

        match caps.get(1).map(|m| m.as_str()) {
            Some("...") => {
                parameters.push(ParamSlot::Wildcard);
                path.push_str(CATCH_ALL);
                variadic_token = Some(token);
            }
            Some("~") => {
                parameters.push(ParamSlot::Optional(param.index));
                has_optional = true;
            }
            _ => {
                parameters.push(ParamSlot::Index(param.index));
                path.push_str(REQUIRED);
            }
        }
    }
    path.push_str(&escape_literal(&pattern[last..], &marker, &compiled));

    if has_optional {
        if !(path.ends_with('/') || path.ends_with(&compiled)) {
            path.push('/');
        }
        path.push_str(CATCH_ALL);
    }

    Ok(PathPlan { path, parameters })
}
