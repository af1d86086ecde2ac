//! # Spatial Engine
//!
//! A per-tick spatial index for simulations with many moving points.
//!
//! The core is a 3D KD-tree whose comparison axis rotates with depth
//! (X, Y, Z, X, ...). It is rebuilt from scratch every simulation tick and
//! answers radius-bounded neighbor queries against a pre-squared radius, so
//! the query hot path never takes a square root.
//!
//! ## Quick Start
//!
//! ```rust
//! use spatial_engine::prelude::*;
//!
//! let mut index = KdSpatialQuery::new();
//!
//! // Once per tick: hand the full set of live target positions to the index.
//! let targets = vec![
//!     SpatialPoint::new(PointId(0), Point3::new(0.0, 0.0, 0.0)),
//!     SpatialPoint::new(PointId(1), Point3::new(1.0, 0.0, 0.0)),
//!     SpatialPoint::new(PointId(2), Point3::new(0.0, 5.0, 0.0)),
//! ];
//! index.rebuild(&targets);
//!
//! // For each probe (e.g. a projectile): collect candidates within a
//! // squared radius, then run whatever collision response the caller wants.
//! let hits = index.neighbors(Point3::new(0.0, 0.0, 0.0), 4.0).unwrap();
//! assert_eq!(hits.len(), 2);
//! ```
//!
//! The tree is immutable between `rebuild` calls; the caller is responsible
//! for not mutating the point collection while a `rebuild` is in progress.

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names)]

pub mod foundation;
pub mod spatial;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        foundation::{
            collections::{CircularQueue, EmptyQueueError},
            math::{Point3, Vec3},
        },
        spatial::{
            KdSpatialQuery, KdTree, KdTreeConfig, PointId, SpatialError, SpatialPoint,
            SpatialQuery,
        },
    };
}
