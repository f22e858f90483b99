//! Quad atlas storage
//!
//! The flat buffer a batch keeps in draw order, and the policy for growing it.

pub mod capacity;
pub mod quad_atlas;
pub mod storage;

pub use capacity::grown_capacity;
pub use quad_atlas::QuadAtlas;
pub use storage::{AtlasError, AtlasResult, AtlasStorage};
