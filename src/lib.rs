//! # ctlroute
//!
//! **ctlroute** builds regex route tables from controller route declarations.
//! Each public controller method becomes one or more table entries that say
//! which action handles a URL and how the URL's segments bind to the action's
//! parameters.
//!
//! ## Overview
//!
//! Controllers describe themselves through a [`MetadataSource`]: their public
//! methods with parameter lists, an optional class-level ("main") route and
//! per-method route declarations. The [`RouteBuilder`] turns that into a
//! [`RouteTable`]:
//!
//! - methods without an explicit path get one synthesized from their name and
//!   parameters (`show(id, format?)` → `show/{id}{~format}`)
//! - placeholders become capture groups, with a plan recording which
//!   parameter each group binds to
//! - the main route contributes a path prefix and default verbs
//! - REST-capable controllers enroll undecorated methods automatically
//! - routes that resolve to the same path and verb overwrite each other, the
//!   later one winning
//!
//! ## Architecture
//!
//! - **[`controller`]** - metadata types, the [`MetadataSource`] trait, a
//!   manually registered [`ControllerRegistry`] and a YAML/JSON manifest loader
//! - **[`route`]** - path synthesis, plan extraction, normalization and table
//!   assembly
//! - **[`router`]** - request matching against a built table
//! - **[`linter`]** - reports every route configuration mistake at once
//! - **[`hot_reload`]** - rebuilds the table when a manifest changes
//! - **[`config`]** - build configuration from the environment
//! - **[`logging`]** - `tracing` subscriber setup
//! - **[`cli`]** - the `ctlroute` binary
//!
//! ## Quick Start
//!
//! ```rust
//! use ctlroute::{ControllerMeta, ControllerRegistry, MethodDescriptor, MethodMeta, RouteBuilder, RouteDeclaration};
//! use http::Method;
//!
//! let registry = ControllerRegistry::new().with_controller(
//!     ControllerMeta::new("Users")
//!         .with_route(RouteDeclaration::path("/users"))
//!         .with_method(
//!             MethodMeta::new(MethodDescriptor::new("show", "Users").with_param("id", false, false))
//!                 .with_route(RouteDeclaration::path("/show/{id}").with_methods([Method::GET])),
//!         ),
//! );
//!
//! let build = RouteBuilder::default().build_all(&registry).unwrap();
//! let entry = build.table.entry("/users/show/(.+?)/", &Method::GET).unwrap();
//! assert_eq!(entry.action, "show");
//! ```
//!
//! ## Configuration
//!
//! | Variable | Default |
//! |----------|---------|
//! | `CTLROUTE_DEFAULT_ACTION` | `index` |
//! | `CTLROUTE_EXCLUDED_METHODS` | lifecycle hooks (`initialize`, `finalize`, ...) |
//! | `CTLROUTE_BASE_CONTROLLER` | `Controller` |
//! | `CTLROUTE_BUILD_WORKERS` | `4` |
//! | `CTLROUTE_LOG_LEVEL` | `info` |
//! | `CTLROUTE_LOG_FORMAT` | `pretty` |

pub mod cli;
pub mod config;
pub mod controller;
pub mod hot_reload;
pub mod linter;
pub mod logging;
pub mod route;
pub mod router;

pub use config::BuildConfig;
pub use controller::{
    load_manifest, ControllerMeta, ControllerRegistry, MetadataSource, MethodDescriptor,
    MethodMeta, ParameterDescriptor, RouteDeclaration,
};
pub use route::{
    normalize_path, Overwrite, ParamSlot, RouteBuild, RouteBuildError, RouteBuilder, RouteEntry,
    RouteTable, RouteTarget,
};
pub use router::{RouteMatch, Router};
