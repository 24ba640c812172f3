//! Host-facing traits.
//!
//! The outline pass never talks to a graphics API directly. The host hands it
//! a scene query, a command sink and a material provider.

mod command_sink;
mod material_provider;
mod scene_query;

pub use command_sink::*;
pub use material_provider::*;
pub use scene_query::*;
