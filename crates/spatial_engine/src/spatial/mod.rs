//! Spatial partitioning data structures
//!
//! Provides the per-tick 3D index used for proximity queries: a KD-tree
//! rebuilt from the live point set every tick, and the query seam the
//! simulation drives it through.

mod kd_tree;
mod spatial_query;

pub use kd_tree::{Axis, KdTree, KdTreeConfig, PointId, SpatialError, SpatialPoint};
pub use spatial_query::{KdSpatialQuery, SpatialQuery};
