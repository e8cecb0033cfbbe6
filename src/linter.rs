//! # Controller Linter Module
//!
//! Checks controller metadata for route configuration mistakes, reporting
//! all of them at once instead of stopping at the first fatal one like the
//! builder does.
//!
//! ## Checks Performed
//!
//! 1. **unknown_parameter** (error) - a placeholder names no parameter
//! 2. **variadic_not_last** (error) - `{...name}` followed by more placeholders
//! 3. **parameter_after_variadic** (warning) - parameters no URL can reach
//! 4. **route_overwritten** (warning) - a later route replaced an earlier one
//! 5. **duplicate_route_name** (warning) - two routes share a name
//! 6. **rest_without_main_route** (info) - REST controller with no main route
//!    enrolls nothing
//! 7. **invalid_pattern** (error) - a built table key is not a valid regex,
//!    usually a hand-written path without placeholders
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ctlroute::linter::{lint_source, print_lint_issues};
//!
//! let issues = lint_source(&registry, &config);
//! print_lint_issues(&issues);
//! ```

use crate::config::BuildConfig;
use crate::controller::MetadataSource;
use crate::route::{extract_plan, Overwrite, RouteBuildError, RouteBuilder, RouteTable};
use crate::router::compile_key;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};


/// Severity level for lint issues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintSeverity {
    /// Error - the route build will fail
    Error,
    /// Warning - builds, but some route is unreachable or shadowed
    Warning,
    /// Info - worth a look
    Info,
}

impl Display for LintSeverity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LintSeverity::Error => write!(f, "error"),
            LintSeverity::Warning => write!(f, "warning"),
            LintSeverity::Info => write!(f, "info"),
        }
    }
}

/// A lint issue found in controller metadata
#[derive(Debug, Clone)]
pub struct LintIssue {
    /// Where the issue occurred (e.g., "Users::show")
    pub location: String,
    pub severity: LintSeverity,
    /// Type of lint issue (e.g., "unknown_parameter")
    pub kind: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl LintIssue {
    pub fn new(
        location: impl Into<String>,
        severity: LintSeverity,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        LintIssue {
            location: location.into(),
            severity,
            kind: kind.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

fn overwrite_issue(o: &Overwrite) -> LintIssue {
    let verb = o
        .verb
        .as_ref()
        .map(|v| v.as_str().to_string())
        .unwrap_or_else(|| "*".to_string());
    LintIssue::new(
        format!("{} {}", verb, o.path),
        LintSeverity::Warning,
        "route_overwritten",
        format!("{} replaces {}", o.replacement, o.previous),
    )
    .with_suggestion("Give one of the routes a distinct path or verb")
}

/// Per-method checks. Returns the route names seen, with their locations.
fn lint_methods<S: MetadataSource + ?Sized>(
    builder: &RouteBuilder,
    source: &S,
    controller: &str,
    issues: &mut Vec<LintIssue>,
) -> Vec<(String, String)> {
    let rest = source.is_rest_capable(controller);
    let main_route = source.class_route(controller);
    let mut names = Vec::new();

    if rest && main_route.is_none() {
        issues.push(
            LintIssue::new(
                controller,
                LintSeverity::Info,
                "rest_without_main_route",
                "Controller is REST-capable but has no main route, so no method is auto-enrolled",
            )
            .with_suggestion("Add a class-level route declaration"),
        );
    }

    for method in source.list_public_methods(controller) {
        let unreachable = method.unreachable_parameters();
        if !unreachable.is_empty() {
            let list: Vec<&str> = unreachable.iter().map(|p| p.name.as_str()).collect();
            issues.push(
                LintIssue::new(
                    format!("{controller}::{}", method.name),
                    LintSeverity::Warning,
                    "parameter_after_variadic",
                    format!(
                        "Parameters after the variadic parameter are never bound: {}",
                        list.join(", ")
                    ),
                )
                .with_suggestion("Move the variadic parameter to the end"),
            );
        }
    }

    let default_action = &builder.config().default_action;
    for (method, declarations) in
        builder.collect_routes(source, controller, rest, main_route.is_some())
    {
        let location = format!("{controller}::{}", method.name);
        for declaration in declarations {
            let pattern = declaration.path.as_deref().unwrap_or_default();
            match extract_plan(pattern, &method, default_action) {
                Ok(_) => {}
                Err(err @ RouteBuildError::UnknownParameter { .. }) => issues.push(
                    LintIssue::new(&location, LintSeverity::Error, "unknown_parameter", err.to_string())
                        .with_suggestion(format!(
                            "Use one of: {}",
                            method
                                .parameters
                                .iter()
                                .map(|p| p.name.as_str())
                                .collect::<Vec<_>>()
                                .join(", ")
                        )),
                ),
                Err(err @ RouteBuildError::VariadicNotLast { .. }) => issues.push(
                    LintIssue::new(&location, LintSeverity::Error, "variadic_not_last", err.to_string())
                        .with_suggestion("Put the {...name} placeholder at the end of the path"),
                ),
                // Raised when keys are compiled; see lint_table_patterns.
                Err(RouteBuildError::InvalidPattern { .. }) => {}
            }
            if let Some(name) = declaration.name {
                names.push((name, location.clone()));
            }
        }
    }
    names
}

fn lint_duplicate_names(names: &[(String, String)], issues: &mut Vec<LintIssue>) {
    let mut first_seen: HashMap<&str, &str> = HashMap::new();
    for (name, location) in names {
        match first_seen.get(name.as_str()) {
            Some(first) => issues.push(
                LintIssue::new(
                    location,
                    LintSeverity::Warning,
                    "duplicate_route_name",
                    format!("Route name '{name}' is already used by {first}"),
                )
                .with_suggestion("Route names should be unique so reverse lookups are unambiguous"),
            ),
            None => {
                first_seen.insert(name, location);
            }
        }
    }
}

/// Keys that would make `Router::new` fail.
fn lint_table_patterns(table: &RouteTable, issues: &mut Vec<LintIssue>) {
    for (path, target) in table.iter() {
        let Err(err) = compile_key(path) else {
            continue;
        };
        let location = target
            .entries()
            .next()
            .map(|(_, e)| format!("{}::{}", e.controller, e.action))
            .unwrap_or_else(|| path.to_string());
        issues.push(
            LintIssue::new(location, LintSeverity::Error, "invalid_pattern", err.to_string())
                .with_suggestion("Escape regex metacharacters in literal path segments"),
        );
    }
}

fn has_errors(issues: &[LintIssue]) -> bool {
    issues.iter().any(|i| i.severity == LintSeverity::Error)
}

/// Lint one controller.
pub fn lint_controller<S: MetadataSource + ?Sized>(
    source: &S,
    controller: &str,
    config: &BuildConfig,
) -> Vec<LintIssue> {
    let builder = RouteBuilder::new(config.clone());
    let mut issues = Vec::new();
    let names = lint_methods(&builder, source, controller, &mut issues);
    lint_duplicate_names(&names, &mut issues);
    if !has_errors(&issues) {
        if let Ok(routes) = builder.build_controller(source, controller) {
            issues.extend(routes.overwrites.iter().map(overwrite_issue));
            lint_table_patterns(&routes.table, &mut issues);
        }
    }
    issues
}

/// Lint every controller of `source`, including collisions and duplicate
/// names across controllers.
pub fn lint_source<S: MetadataSource + ?Sized>(source: &S, config: &BuildConfig) -> Vec<LintIssue> {
    let builder = RouteBuilder::new(config.clone());
    let mut issues = Vec::new();
    let mut names = Vec::new();
    for controller in source.controllers() {
        names.extend(lint_methods(&builder, source, &controller, &mut issues));
    }
    lint_duplicate_names(&names, &mut issues);
    if !has_errors(&issues) {
        if let Ok(build) = builder.build_all(source) {
            issues.extend(build.overwrites.iter().map(overwrite_issue));
            lint_table_patterns(&build.table, &mut issues);
        }
    }
    issues
}

/// Print lint issues grouped by severity
pub fn print_lint_issues(issues: &[LintIssue]) {
    if issues.is_empty() {
        println!("✅ No lint issues found!");
        return;
    }

    let count = |s: LintSeverity| issues.iter().filter(|i| i.severity == s).count();
    println!("\n📋 Lint Results:");
    println!(
        "   {} error(s), {} warning(s), {} info(s)\n",
        count(LintSeverity::Error),
        count(LintSeverity::Warning),
        count(LintSeverity::Info)
    );

    for (severity, heading) in [
        (LintSeverity::Error, "❌ Errors (must fix):"),
        (LintSeverity::Warning, "⚠️  Warnings (should fix):"),
        (LintSeverity::Info, "ℹ️  Info:"),
    ] {
        let group: Vec<_> = issues.iter().filter(|i| i.severity == severity).collect();
        if group.is_empty() {
            continue;
        }
        println!("{heading}");
        for issue in group {
            println!("   [{}] {}", issue.kind, issue.location);
            println!("      {}", issue.message);
            if let Some(suggestion) = &issue.suggestion {
                println!("      💡 Suggestion: {}", suggestion);
            }
        }
        println!();
    }
}
