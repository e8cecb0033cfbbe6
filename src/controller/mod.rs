//! # Controller Metadata Module
//!
//! Descriptors for controller types, their public methods and the route
//! declarations attached to both, plus the [`MetadataSource`] seam the route
//! builder reads them through.
//!
//! Two sources ship with the crate:
//!
//! - [`ControllerRegistry`] - descriptor tables registered from code
//! - [`load_manifest`] - the same tables read from a YAML or JSON manifest

mod load;
mod source;
mod types;

pub use load::*;
pub use source::*;
pub use types::*;
