//! Math utilities and types
//!
//! Provides the fundamental math types for the simulation. Coordinates are
//! `f64` throughout: positions come from a double-precision integrator and
//! the index must compare them without losing duplicates to rounding.

pub use nalgebra::Vector3;

/// 3D vector type
pub type Vec3 = Vector3<f64>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f64>;

/// Squared Euclidean distance between two points
///
/// The index works in squared distances end to end so the query hot path
/// never computes a square root.
#[must_use]
pub fn distance_squared(a: &Point3, b: &Point3) -> f64 {
    (a - b).norm_squared()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_distance_squared() {
        let origin = Point3::new(0.0, 0.0, 0.0);
        assert_relative_eq!(
            distance_squared(&origin, &Point3::new(1.0, 2.0, 2.0)),
            9.0
        );
        assert_relative_eq!(distance_squared(&origin, &origin), 0.0);
    }

    #[test]
    fn test_distance_squared_is_symmetric() {
        let a = Point3::new(-3.5, 0.25, 7.0);
        let b = Point3::new(2.0, -1.0, 0.5);
        assert_relative_eq!(distance_squared(&a, &b), distance_squared(&b, &a));
    }
}
