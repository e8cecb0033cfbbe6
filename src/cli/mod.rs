//! # CLI Module
//!
//! Command-line front end for building and inspecting route tables from a
//! controller manifest.
//!
//! ## Commands
//!
//! ### `build`
//!
//! ```bash
//! ctlroute build --manifest routes.yaml --output routes.json --parallel
//! ```
//!
//! Prints the table as JSON (or writes it with `--output`). Overwritten routes
//! are logged as warnings.
//!
//! ### `lint`
//!
//! ```bash
//! ctlroute lint --manifest routes.yaml --fail-on-error
//! ```
//!
//! ### `match`
//!
//! ```bash
//! ctlroute match --manifest routes.yaml --method GET --path /users/show/42
//! ```
//!
//! ### `watch`
//!
//! ```bash
//! ctlroute watch --manifest routes.yaml --output routes.json
//! ```
//!
//! Rewrites the output every time the manifest changes; a broken manifest
//! leaves the last good table in place.
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! use ctlroute::cli::{run, Cli};
//! use clap::Parser;
//!
//! run(Cli::parse())?;
//! ```

mod commands;


pub use commands::{run, run_cli, Cli, Commands};
