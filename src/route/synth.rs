use crate::config::default_action_marker;
use crate::controller::MethodDescriptor;

/// Derive the default path pattern for a method without an explicit path.
///
/// The first segment is the method name, or the optional marker `(index/)?`
/// for the default action. Required parameters each add a `{name}` segment,
/// optional ones are suffixed onto the previous segment as `{~name}`, and a
/// variadic parameter adds a terminal `{...name}`.
///
/// Parameters after a variadic one cannot be reached from a URL and are left
/// out.
///
/// # Example
///
/// ```rust
/// use ctlroute::controller::MethodDescriptor;
/// use ctlroute::route::synthesize_path;
///
/// let show = MethodDescriptor::new("show", "Users")
///     .with_param("id", false, false)
///     .with_param("format", true, false);
/// assert_eq!(synthesize_path(&show, "index"), "show/{id}{~format}");
/// ```
#[must_use]
pub fn synthesize_path(method: &MethodDescriptor, default_action: &str) -> String {
    let is_default = method.name == default_action;
    let mut parts: Vec<String> = Vec::with_capacity(method.parameters.len() + 1);
    parts.push(if is_default {
        default_action_marker(default_action)
    } else {
        method.name.clone()
    });

    for param in &method.parameters {
        if param.variadic {
            parts.push(format!("{{...{}}}", param.name));
            break;
        }
        if param.optional {
            if let Some(last) = parts.last_mut() {
                last.push_str(&format!("{{~{}}}", param.name));
            }
        } else {
            parts.push(format!("{{{}}}", param.name));
        }
    }

    if is_default {
        // The marker carries its own separator.
        let mut out = parts.remove(0);
        out.push_str(&parts.join("/"));
        out
    } else {
        parts.join("/")
    }
}
