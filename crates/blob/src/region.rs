//! Axis-aligned selection of nodes

// crate modules
use crate::error::{Error, Result};

// ffeatools modules
use ffeatools_mesh::NodeSet;
use ffeatools_utils::f;

// external crates
use nalgebra::Vector3;

/// Axis-aligned box used to pick nodes by position
///
/// The bounds are strict, so a node lying exactly on a face of the box is
/// not inside it.
///
/// ```rust
/// # use ffeatools_blob::Region;
/// # use nalgebra::Vector3;
/// let region = Region::new(Vector3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 1.0, 1.0)).unwrap();
///
/// assert!(region.contains(&Vector3::new(0.5, 0.5, 0.5)));
/// assert!(!region.contains(&Vector3::new(1.0, 0.5, 0.5)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    /// Lower corner
    pub min: Vector3<f64>,
    /// Upper corner
    pub max: Vector3<f64>,
}

impl Region {
    /// Box between two corners
    ///
    /// Every component of `min` must be below the matching component of
    /// `max`, otherwise nothing could ever be selected.
    pub fn new(min: Vector3<f64>, max: Vector3<f64>) -> Result<Self> {
        if min.iter().zip(max.iter()).any(|(lo, hi)| lo >= hi) {
            return Err(Error::InvalidRegion(f!(
                "lower corner [{}, {}, {}] is not below upper corner [{}, {}, {}]",
                min.x,
                min.y,
                min.z,
                max.x,
                max.y,
                max.z
            )));
        }
        Ok(Self { min, max })
    }

    /// Box without limits, selecting every finite node
    pub fn everything() -> Self {
        Self {
            min: Vector3::repeat(f64::NEG_INFINITY),
            max: Vector3::repeat(f64::INFINITY),
        }
    }

    /// Check if a point is strictly inside the box
    pub fn contains(&self, point: &Vector3<f64>) -> bool {
        (0..3).all(|i| point[i] > self.min[i] && point[i] < self.max[i])
    }

    /// Indices of every node inside the box, in node order
    pub fn select(&self, nodes: &NodeSet) -> Vec<usize> {
        nodes
            .positions
            .iter()
            .enumerate()
            .filter(|(_, p)| self.contains(p))
            .map(|(i, _)| i)
            .collect()
    }
}
