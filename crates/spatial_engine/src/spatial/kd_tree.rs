//! Axis-rotating KD-tree over 3D points
//!
//! The tree is rebuilt from scratch every simulation tick and queried with
//! a pre-squared radius. Nodes live in an index arena that `rebuild` resets
//! and repopulates, so a steady tick rate causes no allocation churn.
//!
//! Construction is the multi-key build: the point set is sorted once per
//! coordinate, and every recursion level stable-partitions the non-active
//! orderings around the active ordering's median instead of re-sorting.
//! All comparisons use a (coordinate, identity) key, so duplicate
//! coordinates partition deterministically and are never merged or dropped.

use crate::foundation::collections::CircularQueue;
use crate::foundation::math::{distance_squared, Point3};
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

/// Errors reported by spatial queries
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SpatialError {
    /// The caller passed a squared radius that is negative or not finite
    #[error("invalid squared radius {0}: must be finite and non-negative")]
    InvalidRadius(f64),
}

/// Stable identity of an indexed point, assigned by the simulation
///
/// Two points with identical coordinates are still distinct points; the
/// index distinguishes them by identity, never by coordinate equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointId(pub u32);

/// A point record handed to the index at rebuild time
///
/// The index copies these records; it never owns or mutates the caller's
/// entities. Coordinates must be finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialPoint {
    /// Caller-assigned identity
    pub id: PointId,
    /// Sampled position for this tick
    pub position: Point3,
}

impl SpatialPoint {
    /// Create a point record
    #[must_use]
    pub fn new(id: PointId, position: Point3) -> Self {
        Self { id, position }
    }
}

/// Splitting axis of a tree node; rotates X, Y, Z with depth
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Split on the x coordinate
    X,
    /// Split on the y coordinate
    Y,
    /// Split on the z coordinate
    Z,
}

impl Axis {
    /// Coordinate index into a `Point3`
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    /// The axis used one level deeper in the tree
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::X => Self::Y,
            Self::Y => Self::Z,
            Self::Z => Self::X,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "X"),
            Self::Y => write!(f, "Y"),
            Self::Z => write!(f, "Z"),
        }
    }
}

/// Tuning for tree construction
#[derive(Debug, Clone, Default)]
pub struct KdTreeConfig {
    /// Expected number of points per tick, used to pre-size the arena and
    /// backing storage
    pub expected_points: usize,
}

/// Arena slot for one tree node
#[derive(Debug, Clone, Copy)]
struct KdNode {
    /// Index of this node's point in the backing array
    point: u32,
    /// Which coordinate this node splits on
    axis: Axis,
    /// Arena index of the left child, if any
    left: Option<u32>,
    /// Arena index of the right child, if any
    right: Option<u32>,
}

/// Balanced 3D KD-tree, rebuilt per tick
///
/// Invariant: for a node splitting on axis A, every node in its left
/// subtree orders at or before it on the (coordinate A, identity) key and
/// every node in its right subtree orders after it. Ties between duplicate
/// coordinate values are broken by identity, so no point is ever dropped.
#[derive(Debug, Default)]
pub struct KdTree {
    /// Backing point array for the current tick; identity = index
    points: Vec<SpatialPoint>,
    /// Node arena, reset on every rebuild
    nodes: Vec<KdNode>,
    /// Arena index of the root, absent for an empty tree
    root: Option<u32>,
}

impl KdTree {
    /// Create an empty tree
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&KdTreeConfig::default())
    }

    /// Create an empty tree with storage pre-sized from `config`
    #[must_use]
    pub fn with_config(config: &KdTreeConfig) -> Self {
        Self {
            points: Vec::with_capacity(config.expected_points),
            nodes: Vec::with_capacity(config.expected_points),
            root: None,
        }
    }

    /// Number of points in the most recent rebuild
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the tree holds no points
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Discard the current tree contents, keeping allocations
    pub fn clear(&mut self) {
        self.points.clear();
        self.nodes.clear();
        self.root = None;
    }

    /// Rebuild the tree from the full set of live points for this tick
    ///
    /// The previous tree is discarded entirely. An empty slice is valid and
    /// produces a tree with an absent root. The caller must not mutate the
    /// point collection while this call runs.
    pub fn rebuild(&mut self, points: &[SpatialPoint]) {
        self.clear();
        self.points.extend_from_slice(points);

        let n = self.points.len();
        if n == 0 {
            log::debug!("rebuilt kd-tree: empty point set");
            return;
        }
        self.nodes.reserve(n);

        // One ordering of the backing indices per coordinate. The identity
        // tiebreak makes the three orderings agree on how duplicates rank,
        // which is what keeps the per-level partitions consistent.
        let mut orderings: [Vec<u32>; 3] = Default::default();
        for (coord, ordering) in orderings.iter_mut().enumerate() {
            ordering.extend(0..n as u32);
            let points = &self.points;
            ordering.sort_unstable_by(|&a, &b| {
                points[a as usize].position[coord]
                    .total_cmp(&points[b as usize].position[coord])
                    .then_with(|| a.cmp(&b))
            });
        }

        let mut scratch = Vec::with_capacity(n);
        self.root = self.build_range(&mut orderings, &mut scratch, 0, n, Axis::X);
        log::debug!("rebuilt kd-tree: {} points", n);
    }

    /// Build the subtree over `[start, end)` of all three orderings
    fn build_range(
        &mut self,
        orderings: &mut [Vec<u32>; 3],
        scratch: &mut Vec<u32>,
        start: usize,
        end: usize,
        axis: Axis,
    ) -> Option<u32> {
        if start >= end {
            return None;
        }

        let median = start + (end - start) / 2;
        let median_point = orderings[axis.index()][median];

        // Restrict the other two orderings to the median's two sides without
        // re-sorting; each keeps its relative order and therefore stays a
        // valid sorted ordering of the subrange.
        for other in [axis.next(), axis.next().next()] {
            partition_around_median(
                &self.points,
                &mut orderings[other.index()][start..end],
                scratch,
                axis,
                median_point,
                median - start,
            );
        }

        let index = self.nodes.len() as u32;
        self.nodes.push(KdNode {
            point: median_point,
            axis,
            left: None,
            right: None,
        });

        let left = self.build_range(orderings, scratch, start, median, axis.next());
        let right = self.build_range(orderings, scratch, median + 1, end, axis.next());
        let node = &mut self.nodes[index as usize];
        node.left = left;
        node.right = right;

        Some(index)
    }

    /// Collect every point whose squared distance to `probe` is strictly
    /// less than `squared_radius`
    ///
    /// Callers pre-square their radius; no square root is taken here.
    /// Result order is unspecified.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::InvalidRadius`] if `squared_radius` is
    /// negative or not finite.
    pub fn radius_query(
        &self,
        probe: Point3,
        squared_radius: f64,
    ) -> Result<Vec<SpatialPoint>, SpatialError> {
        if !squared_radius.is_finite() || squared_radius < 0.0 {
            return Err(SpatialError::InvalidRadius(squared_radius));
        }
        let mut results = Vec::new();
        self.query_node(self.root, &probe, squared_radius, &mut results);
        Ok(results)
    }

    /// Recursive radius search with splitting-plane pruning
    fn query_node(
        &self,
        node: Option<u32>,
        probe: &Point3,
        squared_radius: f64,
        results: &mut Vec<SpatialPoint>,
    ) {
        let index = match node {
            Some(index) => index,
            None => return,
        };
        let node = self.nodes[index as usize];
        let point = self.points[node.point as usize];

        if distance_squared(probe, &point.position) < squared_radius {
            results.push(point);
            // Once a node is inside the radius, both subtrees are explored
            // without further pruning; every descendant still rechecks its
            // own distance before being added.
            self.query_node(node.left, probe, squared_radius, results);
            self.query_node(node.right, probe, squared_radius, results);
            return;
        }

        let coord = node.axis.index();
        let plane_delta = probe[coord] - point.position[coord];
        if plane_delta * plane_delta < squared_radius {
            // The probe is within the radius of this node's splitting
            // plane, so either side can hold qualifying points.
            self.query_node(node.left, probe, squared_radius, results);
            self.query_node(node.right, probe, squared_radius, results);
        } else if plane_delta < 0.0 {
            // The far side is provably out of range along this axis alone.
            self.query_node(node.left, probe, squared_radius, results);
        } else {
            self.query_node(node.right, probe, squared_radius, results);
        }
    }

    /// Write one labeled line per node in breadth-first (level) order
    ///
    /// Structural debugging only; the traversal frontier is a
    /// [`CircularQueue`].
    ///
    /// # Errors
    ///
    /// Propagates formatting errors from the sink.
    pub fn write_level_order<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        let mut frontier = CircularQueue::new();
        if let Some(root) = self.root {
            frontier.enqueue(root);
        }
        while let Ok(index) = frontier.dequeue() {
            let node = self.nodes[index as usize];
            self.write_node_line(&node, out)?;
            if let Some(left) = node.left {
                frontier.enqueue(left);
            }
            if let Some(right) = node.right {
                frontier.enqueue(right);
            }
        }
        Ok(())
    }

    /// Write one labeled line per node in pre-order (node, left, right)
    ///
    /// # Errors
    ///
    /// Propagates formatting errors from the sink.
    pub fn write_pre_order<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        self.write_pre_order_node(self.root, out)
    }

    fn write_pre_order_node<W: fmt::Write>(
        &self,
        node: Option<u32>,
        out: &mut W,
    ) -> fmt::Result {
        if let Some(index) = node {
            let node = self.nodes[index as usize];
            self.write_node_line(&node, out)?;
            self.write_pre_order_node(node.left, out)?;
            self.write_pre_order_node(node.right, out)?;
        }
        Ok(())
    }

    fn write_node_line<W: fmt::Write>(&self, node: &KdNode, out: &mut W) -> fmt::Result {
        let position = self.points[node.point as usize].position;
        writeln!(
            out,
            "{} X:{} Y:{} Z:{}",
            node.axis, position.x, position.y, position.z
        )
    }
}

/// Stable-partition one ordering's subrange around the median point
///
/// An entry belongs to the left block iff its (active-axis coordinate,
/// identity) key orders before the median's; the median itself is excluded
/// by identity, never by value, so duplicate-valued points survive. The
/// left block, the median, then the right block are written back in place,
/// each block keeping its relative order.
fn partition_around_median(
    points: &[SpatialPoint],
    range: &mut [u32],
    scratch: &mut Vec<u32>,
    axis: Axis,
    median_point: u32,
    left_len: usize,
) {
    let coord = axis.index();
    let median_coord = points[median_point as usize].position[coord];

    scratch.clear();
    for &index in range.iter() {
        if index == median_point {
            continue;
        }
        let value = points[index as usize].position[coord];
        match value.total_cmp(&median_coord) {
            Ordering::Less => scratch.push(index),
            Ordering::Equal if index < median_point => scratch.push(index),
            _ => {}
        }
    }
    debug_assert_eq!(scratch.len(), left_len);

    for &index in range.iter() {
        if index == median_point {
            continue;
        }
        let value = points[index as usize].position[coord];
        match value.total_cmp(&median_coord) {
            Ordering::Greater => scratch.push(index),
            Ordering::Equal if index > median_point => scratch.push(index),
            _ => {}
        }
    }

    range[..left_len].copy_from_slice(&scratch[..left_len]);
    range[left_len] = median_point;
    range[left_len + 1..].copy_from_slice(&scratch[left_len..]);
}
