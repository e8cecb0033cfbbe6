//! # Build Configuration Module
//!
//! Environment variable-based configuration for route table builds.
//!
//! ## Environment Variables
//!
//! ### `CTLROUTE_DEFAULT_ACTION`
//!
//! Name of the action served at a controller's root. Its synthesized path
//! starts with the optional segment `(index/)?`, so both `/users/` and
//! `/users/index/` reach it.
//!
//! Default: `index`
//!
//! ### `CTLROUTE_EXCLUDED_METHODS`
//!
//! Comma-separated lifecycle method names that are never listed as routable
//! and never auto-enrolled by REST controllers.
//!
//! Default: `__construct,isValid,initialize,finalize,onInvalidControl,loadView,forward`
//!
//! ### `CTLROUTE_BASE_CONTROLLER`
//!
//! Type name of the framework base controller. Methods it declares are
//! inherited plumbing and are skipped by REST auto-enrollment.
//!
//! Default: `Controller`
//!
//! ### `CTLROUTE_BUILD_WORKERS`
//!
//! Worker threads used by [`crate::route::RouteBuilder::build_all_parallel`].
//!
//! Default: `4` (values below 1 are clamped to 1)
//!
//! ## Usage
//!
//! ```rust
//! use ctlroute::config::BuildConfig;
//!
//! let config = BuildConfig::from_env();
//! println!("default action: {}", config.default_action);
//! ```

use std::env;

/// Lifecycle hooks every controller inherits; never routable on their own.
pub const DEFAULT_EXCLUDED_METHODS: [&str; 7] = [
    "__construct",
    "isValid",
    "initialize",
    "finalize",
    "onInvalidControl",
    "loadView",
    "forward",
];

pub const DEFAULT_ACTION: &str = "index";
pub const DEFAULT_BASE_CONTROLLER: &str = "Controller";
pub const DEFAULT_BUILD_WORKERS: usize = 4;

/// Settings shared by the registry adapter, the builder and the linter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    pub default_action: String,
    pub excluded_methods: Vec<String>,
    pub base_controller: String,
    pub workers: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig {
            default_action: DEFAULT_ACTION.to_string(),
            excluded_methods: DEFAULT_EXCLUDED_METHODS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            base_controller: DEFAULT_BASE_CONTROLLER.to_string(),
            workers: DEFAULT_BUILD_WORKERS,
        }
    }
}

impl BuildConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let default_action = env::var("CTLROUTE_DEFAULT_ACTION")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.default_action);

        let excluded_methods = match env::var("CTLROUTE_EXCLUDED_METHODS") {
            Ok(val) => parse_name_list(&val),
            Err(_) => defaults.excluded_methods,
        };

        let base_controller = env::var("CTLROUTE_BASE_CONTROLLER")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.base_controller);

        let workers = env::var("CTLROUTE_BUILD_WORKERS")
            .ok()
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(defaults.workers)
            .max(1);

        BuildConfig {
            default_action,
            excluded_methods,
            base_controller,
            workers,
        }
    }

    #[must_use]
    pub fn is_excluded(&self, method: &str) -> bool {
        self.excluded_methods.iter().any(|m| m == method)
    }

    /// The optional first segment synthesized for the default action, e.g. `(index/)?`.
    #[must_use]
    pub fn default_action_marker(&self) -> String {
        default_action_marker(&self.default_action)
    }
}

pub fn default_action_marker(default_action: &str) -> String {
    format!("({default_action}/)?")
}

fn parse_name_list(val: &str) -> Vec<String> {
    val.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BuildConfig::default();
        assert_eq!(config.default_action, "index");
        assert!(config.is_excluded("initialize"));
        assert!(config.is_excluded("__construct"));
        assert!(!config.is_excluded("show"));
        assert_eq!(config.default_action_marker(), "(index/)?");
        assert_eq!(config.workers, 4);
    }

    #[test]
    fn test_parse_name_list_skips_blanks() {
        assert_eq!(
            parse_name_list(" setup, ,teardown ,"),
            vec!["setup".to_string(), "teardown".to_string()]
        );
        assert!(parse_name_list("").is_empty());
    }
}
