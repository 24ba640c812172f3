//! Linework Core Data Structures
//!
//! This crate contains the configuration data for the outline pass:
//! - OutlineTarget: one outline effect bound to a filter of scene objects
//! - OutlineSettings: the full feature configuration (RON on disk)
//! - MaterialHandle: opaque reference to a host material

pub mod error;
pub mod material;
pub mod settings;
pub mod target;

pub use error::*;
pub use material::*;
pub use settings::*;
pub use target::*;
