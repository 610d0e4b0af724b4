//! Module for tetrahedral element data and implementations

// crate modules
use crate::error::{Error, Result};
use crate::face::Face;
use crate::node::NodeSet;

// external crates
use nalgebra::Vector3;
use serde::Serialize;

/// Local corner pairs making up the six edges of a tetrahedron
///
/// Mid-edge nodes of quadratic elements follow this same ordering, i.e.
/// node 4 sits on edge (0,1), node 5 on (0,2), ..., node 9 on (2,3).
pub const EDGES: [(usize, usize); 6] = [(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)];

/// Local corner triples making up the four faces of a tetrahedron
///
/// Faces are wound so that the normal points outward for a positively
/// oriented element (see [Element::signed_volume]).
pub const FACES: [[usize; 3]; 4] = [[0, 1, 2], [0, 3, 1], [0, 2, 3], [1, 3, 2]];

/// Polynomial order of a tetrahedral element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Order {
    /// 4 corner nodes
    Linear,
    /// 4 corner nodes and 6 mid-edge nodes
    Quadratic,
}

impl Order {
    /// Number of node indices for an element of this order
    pub const fn num_nodes(&self) -> usize {
        match self {
            Self::Linear => 4,
            Self::Quadratic => 10,
        }
    }
}

impl TryFrom<usize> for Order {
    type Error = Error;

    fn try_from(n: usize) -> Result<Self> {
        match n {
            4 => Ok(Self::Linear),
            10 => Ok(Self::Quadratic),
            _ => Err(Error::InvalidElementOrder(n)),
        }
    }
}

impl std::fmt::Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Linear => write!(f, "linear"),
            Self::Quadratic => write!(f, "quadratic"),
        }
    }
}

/// Whether an element touches the boundary of the mesh
///
/// The `Unknown` state is the default until an element has been classified,
/// either by reading an FFEA topology file (which stores the split) or by
/// [Topology::classify](crate::Topology::classify).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Location {
    /// Not yet determined
    #[default]
    Unknown,
    /// At least one face is on the boundary surface
    Surface,
    /// All four faces are shared with neighbouring elements
    Interior,
}

/// A linear or quadratic tetrahedron
///
/// The first four node indices are always the corners. Quadratic elements add
/// six mid-edge nodes in [EDGES] order.
///
/// ```rust
/// # use ffeatools_mesh::{Element, Order};
/// let element = Element::from_indices(vec![0, 1, 2, 3]).unwrap();
/// assert_eq!(element.order(), Order::Linear);
///
/// // faces follow the FFEA winding convention
/// assert_eq!(element.linear_face(1).nodes, [0, 3, 1]);
///
/// // anything other than 4 or 10 nodes is rejected
/// assert!(Element::from_indices(vec![0, 1, 2]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Node indices, corners first
    pub nodes: Vec<usize>,
    /// Cached surface/interior classification
    pub location: Location,
}

impl Element {
    /// Linear element from four corner indices
    pub fn linear(nodes: [usize; 4]) -> Self {
        Self {
            nodes: nodes.to_vec(),
            location: Location::Unknown,
        }
    }

    /// Quadratic element from four corners and six mid-edge nodes
    pub fn quadratic(nodes: [usize; 10]) -> Self {
        Self {
            nodes: nodes.to_vec(),
            location: Location::Unknown,
        }
    }

    /// Element from any list of indices, which must be 4 or 10 long
    pub fn from_indices(nodes: Vec<usize>) -> Result<Self> {
        Order::try_from(nodes.len())?;
        Ok(Self {
            nodes,
            location: Location::Unknown,
        })
    }

    /// Polynomial order inferred from the number of nodes
    pub fn order(&self) -> Order {
        if self.nodes.len() == 10 {
            Order::Quadratic
        } else {
            Order::Linear
        }
    }

    /// The four corner node indices
    ///
    /// Panics if the element holds fewer than four nodes, which is only
    /// possible when `nodes` is filled by hand rather than through
    /// [Element::from_indices].
    pub fn corners(&self) -> [usize; 4] {
        [self.nodes[0], self.nodes[1], self.nodes[2], self.nodes[3]]
    }

    /// Corner-only face `index` (0 to 3), owned by no element
    ///
    /// ```text
    /// 0: (n0, n1, n2)
    /// 1: (n0, n3, n1)
    /// 2: (n0, n2, n3)
    /// 3: (n1, n3, n2)
    /// ```
    ///
    /// Panics if `index` is greater than 3.
    pub fn linear_face(&self, index: usize) -> Face {
        let [a, b, c] = FACES[index];
        Face::new([self.nodes[a], self.nodes[b], self.nodes[c]])
    }

    /// All four corner faces in local order
    pub fn linear_faces(&self) -> [Face; 4] {
        [0, 1, 2, 3].map(|j| self.linear_face(j))
    }

    /// The six corner pairs in [EDGES] order
    ///
    /// Panics under the same conditions as [Element::corners].
    pub fn edges(&self) -> [(usize, usize); 6] {
        EDGES.map(|(a, b)| (self.nodes[a], self.nodes[b]))
    }

    /// Largest node index referenced
    pub fn max_node(&self) -> usize {
        self.nodes.iter().copied().max().unwrap_or(0)
    }

    /// Mean position of every node in the element
    pub fn centroid(&self, nodes: &NodeSet) -> Result<Vector3<f64>> {
        let mut sum = Vector3::zeros();
        for &n in &self.nodes {
            sum += nodes.get(n)?;
        }
        Ok(sum / self.nodes.len() as f64)
    }

    /// Signed volume of the corner tetrahedron
    ///
    /// Calculated as `e3 . (e2 x e1) / 6` for edge vectors `ei = n_i - n_0`.
    /// A positive value means every face in [FACES] points outward.
    pub fn signed_volume(&self, nodes: &NodeSet) -> Result<f64> {
        let [n0, n1, n2, n3] = self.corners();
        let origin = nodes.get(n0)?;
        let e1 = nodes.get(n1)? - origin;
        let e2 = nodes.get(n2)? - origin;
        let e3 = nodes.get(n3)? - origin;
        Ok(e3.dot(&e2.cross(&e1)) / 6.0)
    }

    /// Unsigned volume, with lengths multiplied by `scale`
    pub fn volume(&self, nodes: &NodeSet, scale: f64) -> Result<f64> {
        Ok(self.signed_volume(nodes)?.abs() * scale.powi(3))
    }

    /// Invert the orientation by swapping corners 1 and 2
    ///
    /// For quadratic elements the mid-edge nodes are swapped to match, so
    /// (0,1) <-> (0,2) and (1,3) <-> (2,3) while (0,3) and (1,2) are unchanged.
    pub fn flip(&mut self) {
        self.nodes.swap(1, 2);
        if self.order() == Order::Quadratic {
            self.nodes.swap(4, 5);
            self.nodes.swap(8, 9);
        }
    }

    /// True if the cached location is [Location::Interior]
    pub fn is_interior(&self) -> bool {
        self.location == Location::Interior
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_tet() -> NodeSet {
        NodeSet::new(
            vec![
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(0.0, 1.0, 0.0),
                Vector3::new(1.0, 0.0, 0.0),
                Vector3::new(0.0, 0.0, 1.0),
            ],
            4,
        )
    }

    #[test]
    fn positive_orientation() {
        let element = Element::linear([0, 1, 2, 3]);
        let volume = element.signed_volume(&unit_tet()).unwrap();
        assert!((volume - 1.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn faces_point_outward() {
        let nodes = unit_tet();
        let element = Element::linear([0, 1, 2, 3]);
        let centroid = element.centroid(&nodes).unwrap();
        for face in element.linear_faces() {
            let outward = face.centroid(&nodes).unwrap() - centroid;
            assert!(face.normal(&nodes).unwrap().dot(&outward) > 0.0);
        }
    }

    #[test]
    #[should_panic]
    fn corners_of_hand_built_element() {
        let element = Element {
            nodes: vec![0, 1, 2],
            location: Location::Unknown,
        };
        element.corners();
    }

    #[test]
    fn flip_inverts_volume() {
        let nodes = unit_tet();
        let mut element = Element::linear([0, 1, 2, 3]);
        element.flip();
        assert_eq!(element.nodes, vec![0, 2, 1, 3]);
        assert!(element.signed_volume(&nodes).unwrap() < 0.0);
    }

    #[test]
    fn flip_quadratic_mid_nodes() {
        let mut element = Element::quadratic([0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
        element.flip();
        assert_eq!(element.nodes, vec![0, 2, 1, 3, 5, 4, 6, 7, 9, 8]);
        // each mid node still sits on the edge it was created for
        let edges = element.edges();
        assert_eq!(edges[0], (0, 2));
        assert_eq!(edges[5], (1, 3));
    }

    #[test]
    fn scaled_volume() {
        let element = Element::linear([0, 2, 1, 3]);
        let volume = element.volume(&unit_tet(), 2.0).unwrap();
        assert!((volume - 8.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn missing_node() {
        let element = Element::linear([0, 1, 2, 7]);
        assert!(element.signed_volume(&unit_tet()).is_err());
    }

    #[test]
    fn order_from_count() {
        assert_eq!(Order::try_from(4).unwrap(), Order::Linear);
        assert_eq!(Order::try_from(10).unwrap(), Order::Quadratic);
        assert!(Order::try_from(6).is_err());
    }
}
