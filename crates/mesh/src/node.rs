//! Module for node-related data and implementations

// crate modules
use crate::error::{Error, Result};

// ffeatools modules
use ffeatools_utils::{f, PermuteExt};

// external crates
use nalgebra::Vector3;

/// Ordered set of node positions for a single blob
///
/// FFEA node files list every surface node before any interior node, so the
/// set is stored as one continuous list where the first
/// `num_surface_nodes` positions are the surface block.
///
/// ```text
/// ffea node file
/// num_nodes 8
/// num_surface_nodes 6
/// num_interior_nodes 2
/// surface nodes:
/// 0.000e+00 0.000e+00 0.000e+00
/// ...
/// interior nodes:
/// ...
/// ```
///
/// Node indices used by [Topology](crate::Topology) and
/// [Surface](crate::Surface) refer to positions in this list.
///
/// ```rust
/// # use ffeatools_mesh::NodeSet;
/// # use nalgebra::Vector3;
/// let mut nodes = NodeSet::new(vec![
///     Vector3::new(0.0, 0.0, 0.0),
///     Vector3::new(2.0, 0.0, 0.0),
/// ], 2);
///
/// assert_eq!(nodes.centroid(), Vector3::new(1.0, 0.0, 0.0));
///
/// // move the whole set so the centroid sits at the origin
/// nodes.set_centroid(Vector3::zeros());
/// assert_eq!(nodes.positions[0], Vector3::new(-1.0, 0.0, 0.0));
/// ```
#[derive(Debug, Default, Clone, PartialEq)]
pub struct NodeSet {
    /// Every node position, surface block first
    pub positions: Vec<Vector3<f64>>,
    /// Number of positions in the leading surface block
    pub num_surface_nodes: usize,
}

impl NodeSet {
    /// Create a node set from positions and the length of the surface block
    ///
    /// The surface count is clamped to the number of positions.
    pub fn new(positions: Vec<Vector3<f64>>, num_surface_nodes: usize) -> Self {
        let num_surface_nodes = num_surface_nodes.min(positions.len());
        Self {
            positions,
            num_surface_nodes,
        }
    }

    /// Total number of nodes
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// True if there are no nodes at all
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Total number of nodes
    pub fn num_nodes(&self) -> usize {
        self.positions.len()
    }

    /// Number of nodes in the surface block
    pub fn num_surface_nodes(&self) -> usize {
        self.num_surface_nodes
    }

    /// Number of nodes in the interior block
    pub fn num_interior_nodes(&self) -> usize {
        self.positions.len() - self.num_surface_nodes
    }

    /// Positions of the surface block
    pub fn surface(&self) -> &[Vector3<f64>] {
        &self.positions[..self.num_surface_nodes]
    }

    /// Positions of the interior block
    pub fn interior(&self) -> &[Vector3<f64>] {
        &self.positions[self.num_surface_nodes..]
    }

    /// Position of a single node, checked
    pub fn get(&self, index: usize) -> Result<&Vector3<f64>> {
        self.positions.get(index).ok_or(Error::IndexOutOfRange {
            what: "nodes",
            index,
            length: self.positions.len(),
        })
    }

    /// Mean position of every node, zero for an empty set
    pub fn centroid(&self) -> Vector3<f64> {
        if self.positions.is_empty() {
            return Vector3::zeros();
        }
        let sum: Vector3<f64> = self.positions.iter().sum();
        sum / self.positions.len() as f64
    }

    /// Translate every node by a vector
    pub fn translate(&mut self, translation: Vector3<f64>) {
        self.positions.iter_mut().for_each(|p| *p += translation);
    }

    /// Translate every node so that the centroid is at `centroid`
    pub fn set_centroid(&mut self, centroid: Vector3<f64>) {
        let translation = centroid - self.centroid();
        self.translate(translation);
    }

    /// Uniformly scale every position about the origin
    pub fn scale(&mut self, factor: f64) {
        self.positions.iter_mut().for_each(|p| *p *= factor);
    }

    /// Append a node to the interior block, returning its index
    pub fn add_node(&mut self, position: Vector3<f64>) -> usize {
        self.positions.push(position);
        self.positions.len() - 1
    }

    /// Reorder so that the given nodes form the surface block
    ///
    /// Listed nodes keep the order given (duplicates ignored), every other
    /// node follows in its original order. Returns the old-to-new index map
    /// needed to renumber anything referencing these nodes.
    ///
    /// ```rust
    /// # use ffeatools_mesh::NodeSet;
    /// # use nalgebra::Vector3;
    /// let mut nodes = NodeSet::new(
    ///     (0..4).map(|i| Vector3::new(i as f64, 0.0, 0.0)).collect(),
    ///     0,
    /// );
    ///
    /// let map = nodes.partition(&[3, 1]).unwrap();
    /// assert_eq!(map, vec![2, 1, 3, 0]);
    /// assert_eq!(nodes.num_surface_nodes(), 2);
    /// assert_eq!(nodes.positions[0].x, 3.0);
    /// ```
    pub fn partition(&mut self, surface_nodes: &[usize]) -> Result<Vec<usize>> {
        let length = self.positions.len();
        let mut map = vec![usize::MAX; length];
        let mut next = 0;

        for &index in surface_nodes {
            match map.get_mut(index) {
                Some(m) if *m == usize::MAX => {
                    *m = next;
                    next += 1;
                }
                Some(_) => (),
                None => {
                    return Err(Error::IndexOutOfRange {
                        what: "nodes",
                        index,
                        length,
                    })
                }
            }
        }

        let num_surface_nodes = next;
        for m in map.iter_mut().filter(|m| **m == usize::MAX) {
            *m = next;
            next += 1;
        }

        self.positions = std::mem::take(&mut self.positions).permute(&map)?;
        self.num_surface_nodes = num_surface_nodes;
        Ok(map)
    }
}

impl std::fmt::Display for NodeSet {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let c = self.centroid();
        let mut s = "NodeSet {\n".to_string();
        s += &f!("    num_nodes: {}\n", self.num_nodes());
        s += &f!("    num_surface_nodes: {}\n", self.num_surface_nodes());
        s += &f!("    num_interior_nodes: {}\n", self.num_interior_nodes());
        s += &f!("    centroid: ({:.4}, {:.4}, {:.4})\n", c.x, c.y, c.z);
        s += "}";
        write!(f, "{s}")
    }
}
