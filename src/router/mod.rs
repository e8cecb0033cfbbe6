//! # Router Module
//!
//! Compiles a [`RouteTable`](crate::route::RouteTable) into anchored regexes
//! and matches request paths against it, binding capture groups back onto
//! action parameters through each entry's extraction plan.
//!
//! ## Matching
//!
//! 1. The request path loses its query string and gains a leading and a
//!    trailing `/`, the shape every table key is normalized to.
//! 2. Keys are tried in table order; the first whose regex matches and which
//!    serves the request verb wins.
//! 3. Captures are bound by plan slot: required parameters take one group
//!    each, the variadic parameter takes the rest of the path, and optional
//!    parameters share the trailing group segment by segment.
//!
//! ## Example
//!
//! ```rust
//! use ctlroute::controller::{ControllerMeta, ControllerRegistry, MethodDescriptor, MethodMeta};
//! use ctlroute::route::RouteBuilder;
//! use ctlroute::controller::RouteDeclaration;
//! use ctlroute::router::Router;
//! use http::Method;
//!
//! let registry = ControllerRegistry::new().with_controller(
//!     ControllerMeta::new("Users").with_method(
//!         MethodMeta::new(
//!             MethodDescriptor::new("show", "Users")
//!                 .with_param("id", false, false)
//!                 .with_param("format", true, false),
//!         )
//!         .with_route(RouteDeclaration::default()),
//!     ),
//! );
//! let build = RouteBuilder::default().build_all(&registry).unwrap();
//! let router = Router::new(&build.table).unwrap();
//!
//! let m = router.route(&Method::GET, "/show/42/json").unwrap();
//! assert_eq!(m.action(), "show");
//! assert_eq!(m.arg(0), Some("42"));
//! assert_eq!(m.arg(1), Some("json"));
//! ```

mod core;

pub(crate) use core::compile_key;
pub use core::{ArgVec, RouteMatch, Router, MAX_INLINE_PARAMS};
