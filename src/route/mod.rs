//! # Route Module
//!
//! Turns controller metadata into a [`RouteTable`].
//!
//! ## Overview
//!
//! Building a controller's routes runs three stages:
//!
//! 1. **Synthesis** ([`synthesize_path`]) - methods without an explicit path
//!    get one derived from their name and parameters, e.g.
//!    `show(id, format?)` → `show/{id}{~format}`.
//! 2. **Plan extraction** ([`extract_plan`]) - placeholders are checked
//!    against the method's parameters and rewritten into capture groups,
//!    recording which parameter each group binds to.
//! 3. **Assembly** ([`RouteBuilder`]) - the controller prefix is joined on
//!    ([`normalize_path`]), REST controllers enroll undecorated methods, and
//!    every route is fanned out over its HTTP verbs.
//!
//! ## Table Shape
//!
//! ```text
//! "/users/show/(.+?)/(.*?)" => { GET => Users::show [0, "~1"] }
//! "/users/(?:index/)?"      => Users::index []
//! ```
//!
//! Keys are regex sources without anchors. A key maps either to one
//! verb-agnostic [`RouteEntry`] or to one entry per verb.
//!
//! ## Collisions
//!
//! Two routes resolving to the same path and verb do not fail the build:
//! the later one wins and an [`Overwrite`] is recorded so callers can report
//! or assert on it.

mod build;
mod error;
mod params;
mod synth;
mod table;

pub use build::{normalize_path, ControllerRoutes, RouteBuild, RouteBuilder};
pub use error::RouteBuildError;
pub use params::{compiled_marker, extract_plan, PathPlan, CATCH_ALL, REQUIRED};
pub use synth::synthesize_path;
pub use table::{Overwrite, ParamSlot, RouteEntry, RouteTable, RouteTarget};
