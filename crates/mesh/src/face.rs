//! Module for triangular face data and implementations

// crate modules
use crate::error::Result;
use crate::node::NodeSet;

// external crates
use nalgebra::Vector3;

/// A linear triangular face
///
/// Faces extracted from a [Topology](crate::Topology) keep a back-reference
/// to the element they came from, which FFEA surface files store as the first
/// value on each line.
///
/// Two faces are considered the same if they use the same three nodes,
/// regardless of winding.
///
/// ```rust
/// # use ffeatools_mesh::Face;
/// let a = Face::new([4, 1, 9]);
/// let b = Face::new([9, 4, 1]).with_element(3);
///
/// assert!(a.is_same(&b));
/// assert_eq!(b.sorted(), [1, 4, 9]);
/// assert_eq!(b.element, Some(3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    /// Node indices, wound counter-clockwise when viewed from outside
    pub nodes: [usize; 3],
    /// Index of the owning element, if known
    pub element: Option<usize>,
}

impl Face {
    /// A face with no owning element
    pub fn new(nodes: [usize; 3]) -> Self {
        Self {
            nodes,
            element: None,
        }
    }

    /// Set the owning element
    pub fn with_element(mut self, element: usize) -> Self {
        self.element = Some(element);
        self
    }

    /// Node indices in ascending order, used as a winding-independent key
    pub fn sorted(&self) -> [usize; 3] {
        let mut key = self.nodes;
        key.sort_unstable();
        key
    }

    /// True if both faces use the same three nodes
    pub fn is_same(&self, other: &Face) -> bool {
        self.sorted() == other.sorted()
    }

    /// Mean position of the three nodes
    pub fn centroid(&self, nodes: &NodeSet) -> Result<Vector3<f64>> {
        let [a, b, c] = self.positions(nodes)?;
        Ok((a + b + c) / 3.0)
    }

    /// Unnormalised normal `(b - a) x (c - a)`, length is twice the area
    pub fn normal(&self, nodes: &NodeSet) -> Result<Vector3<f64>> {
        let [a, b, c] = self.positions(nodes)?;
        Ok((b - a).cross(&(c - a)))
    }

    /// Unit normal, zero for a degenerate face
    pub fn unit_normal(&self, nodes: &NodeSet) -> Result<Vector3<f64>> {
        let normal = self.normal(nodes)?;
        Ok(normal.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::zeros))
    }

    /// Area of the triangle
    pub fn area(&self, nodes: &NodeSet) -> Result<f64> {
        Ok(0.5 * self.normal(nodes)?.norm())
    }

    /// Replace the node indices through an old-to-new map
    pub(crate) fn renumber(&mut self, map: &[usize]) {
        self.nodes = self.nodes.map(|n| map[n]);
    }

    fn positions(&self, nodes: &NodeSet) -> Result<[Vector3<f64>; 3]> {
        Ok([
            *nodes.get(self.nodes[0])?,
            *nodes.get(self.nodes[1])?,
            *nodes.get(self.nodes[2])?,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> NodeSet {
        NodeSet::new(
            vec![
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(2.0, 0.0, 0.0),
                Vector3::new(0.0, 2.0, 0.0),
            ],
            3,
        )
    }

    #[test]
    fn geometry() {
        let nodes = triangle();
        let face = Face::new([0, 1, 2]);
        assert_eq!(face.area(&nodes).unwrap(), 2.0);
        assert_eq!(face.unit_normal(&nodes).unwrap(), Vector3::new(0.0, 0.0, 1.0));
        let c = face.centroid(&nodes).unwrap();
        assert!((c - Vector3::new(2.0 / 3.0, 2.0 / 3.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn winding_flips_normal() {
        let nodes = triangle();
        let face = Face::new([0, 2, 1]);
        assert_eq!(face.unit_normal(&nodes).unwrap(), Vector3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn same_nodes_different_element() {
        let a = Face::new([0, 1, 2]).with_element(0);
        let b = Face::new([2, 1, 0]).with_element(1);
        assert!(a.is_same(&b));
        assert_ne!(a, b);
    }
}
