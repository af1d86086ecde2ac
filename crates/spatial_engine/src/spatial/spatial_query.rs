//! Abstract spatial query interface for the per-tick rebuild lifecycle
//!
//! This abstraction lets the simulation swap spatial partitioning schemes
//! without changing its update loop: once per tick the full set of live
//! points is handed to `rebuild`, then `neighbors` answers any number of
//! radius queries against the resulting immutable index.

use crate::foundation::math::Point3;
use crate::spatial::kd_tree::{KdTree, KdTreeConfig, SpatialError, SpatialPoint};

/// Abstract interface for a rebuild-per-tick spatial index
///
/// Implementations own no points: every `rebuild` replaces the previous
/// tick's index wholesale, and results always refer to the most recent
/// rebuild. The caller must not mutate the point collection while a
/// `rebuild` call is in progress; between calls the index is read-only and
/// queries may run freely.
pub trait SpatialQuery: Send + Sync {
    /// Replace the index contents with this tick's live points
    fn rebuild(&mut self, points: &[SpatialPoint]);

    /// Collect every indexed point strictly within the squared radius of
    /// `probe`
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::InvalidRadius`] if `squared_radius` is
    /// negative or not finite.
    fn neighbors(
        &self,
        probe: Point3,
        squared_radius: f64,
    ) -> Result<Vec<SpatialPoint>, SpatialError>;

    /// Number of points in the most recent rebuild
    fn point_count(&self) -> usize;

    /// Drop all indexed points, as if rebuilt from an empty set
    fn clear(&mut self);
}

/// KD-tree backed implementation of [`SpatialQuery`]
///
/// Owns a [`KdTree`] whose storage is reused across ticks.
#[derive(Debug, Default)]
pub struct KdSpatialQuery {
    tree: KdTree,
}

impl KdSpatialQuery {
    /// Create an empty index
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: KdTree::new(),
        }
    }

    /// Create an empty index with storage pre-sized from `config`
    #[must_use]
    pub fn with_config(config: &KdTreeConfig) -> Self {
        Self {
            tree: KdTree::with_config(config),
        }
    }

    /// Borrow the underlying tree (for diagnostics)
    #[must_use]
    pub fn tree(&self) -> &KdTree {
        &self.tree
    }
}

impl SpatialQuery for KdSpatialQuery {
    fn rebuild(&mut self, points: &[SpatialPoint]) {
        self.tree.rebuild(points);
    }

    fn neighbors(
        &self,
        probe: Point3,
        squared_radius: f64,
    ) -> Result<Vec<SpatialPoint>, SpatialError> {
        self.tree.radius_query(probe, squared_radius)
    }

    fn point_count(&self) -> usize {
        self.tree.len()
    }

    fn clear(&mut self) {
        self.tree.clear();
    }
}
