//! Module for element connectivity and the face-matching operations

// crate modules
use crate::element::{Element, Location, Order};
use crate::error::{Error, Result};
use crate::face::Face;
use crate::node::NodeSet;
use crate::surface::Surface;

// ffeatools modules
use ffeatools_utils::{f, PermuteExt};

// standard library
use std::collections::HashMap;

// external crates
use itertools::Itertools;
use log::{debug, info, warn};
use serde::Serialize;

/// Tetrahedral connectivity of a blob
///
/// A list of linear or quadratic [Element]s indexing into a [NodeSet]. FFEA
/// expects every surface element to be listed before any interior element,
/// and the topology writer enforces this.
///
/// Elements read from formats that carry no surface/interior split (tetgen,
/// netgen) start as [Location::Unknown] and count towards the surface block
/// until classified.
///
/// ## Examples
///
/// ### Surface extraction and classification
///
/// ```rust
/// # use ffeatools_mesh::{Element, Location, Topology};
/// // two tetrahedra sharing the face (1, 2, 3)
/// let mut topology = Topology::default();
/// topology.add_element(Element::linear([0, 1, 2, 3]), Location::Unknown);
/// topology.add_element(Element::linear([4, 1, 3, 2]), Location::Unknown);
///
/// // the shared face is dropped, leaving 3 + 3 boundary faces
/// let mut surface = topology.extract_surface().unwrap();
/// assert_eq!(surface.num_faces(), 6);
///
/// // both elements touch the boundary
/// topology.classify(&mut surface).unwrap();
/// assert_eq!(topology.num_surface_elements(), 2);
/// assert_eq!(topology.num_interior_elements(), 0);
/// ```
///
/// ### Order elevation
///
/// ```rust
/// # use ffeatools_mesh::{Element, Location, Order, Topology};
/// let mut topology = Topology::default();
/// topology.add_element(Element::linear([0, 1, 2, 3]), Location::Unknown);
///
/// let elevation = topology.increase_order(None, None).unwrap();
/// assert_eq!(elevation.num_new_nodes(), 6);
/// assert_eq!(topology.order(), Some(Order::Quadratic));
/// assert_eq!(topology.elements[0].nodes, vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
/// ```
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Topology {
    /// Every element, surface block first once classified
    pub elements: Vec<Element>,
}

/// Record of the new nodes created by [Topology::increase_order]
///
/// Every unique edge in the topology receives one new node. New node indices
/// are contiguous from `first_node`, in the order edges were first seen.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Elevation {
    /// Index of the first new node
    pub first_node: usize,
    /// Edge end points for each new node, `edges[i]` is node `first_node + i`
    pub edges: Vec<(usize, usize)>,
}

impl Elevation {
    /// Number of mid-edge nodes created
    pub fn num_new_nodes(&self) -> usize {
        self.edges.len()
    }
}

/// Headline numbers for a blob mesh
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshSummary {
    /// Total number of nodes
    pub num_nodes: usize,
    /// Nodes in the surface block
    pub num_surface_nodes: usize,
    /// Nodes in the interior block
    pub num_interior_nodes: usize,
    /// Total number of elements
    pub num_elements: usize,
    /// Elements in the surface block (including unclassified)
    pub num_surface_elements: usize,
    /// Elements in the interior block
    pub num_interior_elements: usize,
    /// Element order, `None` if empty or mixed
    pub order: Option<Order>,
    /// Number of unique corner nodes
    pub num_linear_nodes: usize,
    /// Total element volume
    pub volume: f64,
    /// Node centroid
    pub centroid: [f64; 3],
    /// Elements with negative signed volume
    pub num_inverted_elements: usize,
}

// ! ------------------------------------------------------------------------
// !                         Construction and queries
// ! ------------------------------------------------------------------------

impl Topology {
    /// Topology from a list of elements
    pub fn new(elements: Vec<Element>) -> Self {
        Self { elements }
    }

    /// Append an element with the given location
    pub fn add_element(&mut self, mut element: Element, location: Location) {
        element.location = location;
        self.elements.push(element);
    }

    /// Total number of elements
    pub fn num_elements(&self) -> usize {
        self.elements.len()
    }

    /// Elements not known to be interior, i.e. surface or unclassified
    pub fn num_surface_elements(&self) -> usize {
        self.elements.len() - self.num_interior_elements()
    }

    /// Elements known to be interior
    pub fn num_interior_elements(&self) -> usize {
        self.elements.iter().filter(|e| e.is_interior()).count()
    }

    /// Elements with no classification yet
    pub fn num_unknown_elements(&self) -> usize {
        self.elements
            .iter()
            .filter(|e| e.location == Location::Unknown)
            .count()
    }

    /// Common element order, `None` for an empty or mixed topology
    pub fn order(&self) -> Option<Order> {
        self.elements
            .iter()
            .map(Element::order)
            .all_equal_value()
            .ok()
    }

    /// Sorted unique corner node indices
    ///
    /// These are the nodes that carry degrees of freedom in a linear
    /// simulation, i.e. quadratic mid-edge nodes are excluded.
    pub fn linear_nodes(&self) -> Vec<usize> {
        self.elements
            .iter()
            .flat_map(Element::corners)
            .sorted_unstable()
            .dedup()
            .collect()
    }

    /// Largest node index referenced by any element
    pub fn max_node_index(&self) -> Option<usize> {
        self.elements.iter().map(Element::max_node).max()
    }

    /// True if no interior element comes before a non-interior one
    pub fn is_partitioned(&self) -> bool {
        self.elements
            .iter()
            .skip_while(|e| !e.is_interior())
            .all(Element::is_interior)
    }

    /// Check every element indexes into the node set
    pub fn check_nodes(&self, nodes: &NodeSet) -> Result<()> {
        match self.max_node_index() {
            Some(index) if index >= nodes.len() => Err(Error::IndexOutOfRange {
                what: "nodes",
                index,
                length: nodes.len(),
            }),
            _ => Ok(()),
        }
    }

    /// Total element volume with lengths multiplied by `scale`
    pub fn volume(&self, nodes: &NodeSet, scale: f64) -> Result<f64> {
        self.elements.iter().map(|e| e.volume(nodes, scale)).sum()
    }

    /// Total mass given one density per element
    pub fn mass(&self, densities: &[f64], nodes: &NodeSet, scale: f64) -> Result<f64> {
        if densities.len() != self.elements.len() {
            return Err(Error::UnexpectedCount {
                what: "element densities",
                expected: self.elements.len(),
                found: densities.len(),
            });
        }
        self.elements
            .iter()
            .zip(densities)
            .map(|(e, rho)| Ok(e.volume(nodes, scale)? * rho))
            .sum()
    }

    /// Headline numbers for this topology with its nodes
    pub fn summary(&self, nodes: &NodeSet) -> Result<MeshSummary> {
        let mut num_inverted_elements = 0;
        for element in &self.elements {
            if element.signed_volume(nodes)? < 0.0 {
                num_inverted_elements += 1;
            }
        }
        let centroid = nodes.centroid();

        Ok(MeshSummary {
            num_nodes: nodes.num_nodes(),
            num_surface_nodes: nodes.num_surface_nodes(),
            num_interior_nodes: nodes.num_interior_nodes(),
            num_elements: self.num_elements(),
            num_surface_elements: self.num_surface_elements(),
            num_interior_elements: self.num_interior_elements(),
            order: self.order(),
            num_linear_nodes: self.linear_nodes().len(),
            volume: self.volume(nodes, 1.0)?,
            centroid: [centroid.x, centroid.y, centroid.z],
            num_inverted_elements,
        })
    }
}

// ! ------------------------------------------------------------------------
// !                        Face matching operations
// ! ------------------------------------------------------------------------

impl Topology {
    /// Extract the boundary surface
    ///
    /// Every corner face is collected in element order (faces 0 to 3 of
    /// element 0, then element 1, ...). A face is on the boundary if its node
    /// triple occurs exactly once across the whole topology, and is kept with
    /// its original winding and owning element.
    ///
    /// Only defined for linear elements.
    pub fn extract_surface(&self) -> Result<Surface> {
        if let Some(index) = self
            .elements
            .iter()
            .position(|e| e.order() == Order::Quadratic)
        {
            return Err(Error::QuadraticElement(index));
        }

        let mut counts: HashMap<[usize; 3], usize> = HashMap::new();
        for element in &self.elements {
            for face in element.linear_faces() {
                *counts.entry(face.sorted()).or_default() += 1;
            }
        }

        let mut surface = Surface::default();
        for (i, element) in self.elements.iter().enumerate() {
            for face in element.linear_faces() {
                if counts[&face.sorted()] == 1 {
                    surface.add_face(face.with_element(i));
                }
            }
        }

        let non_manifold = counts.values().filter(|&&c| c > 2).count();
        if non_manifold > 0 {
            warn!("{non_manifold} faces are shared by more than two elements");
        }

        info!(
            "Extracted {} surface faces from {} elements",
            surface.num_faces(),
            self.num_elements()
        );
        Ok(surface)
    }

    /// Classify every element using the surface, then reorder surface first
    ///
    /// Elements owning at least one surface face become [Location::Surface],
    /// every other element becomes [Location::Interior]. Elements are then
    /// stably reordered so the surface block comes first, and the owning
    /// element of every face is updated to match.
    ///
    /// Returns the old-to-new element index map so that per-element data
    /// (e.g. material parameters) can be reordered in the same way.
    pub fn classify(&mut self, surface: &mut Surface) -> Result<Vec<usize>> {
        let length = self.elements.len();
        self.elements
            .iter_mut()
            .for_each(|e| e.location = Location::Interior);

        for (i, face) in surface.faces.iter().enumerate() {
            let index = face.element.ok_or(Error::MissingElementReference(i))?;
            let element = self
                .elements
                .get_mut(index)
                .ok_or(Error::IndexOutOfRange {
                    what: "elements",
                    index,
                    length,
                })?;
            element.location = Location::Surface;
        }

        // surface block first, both blocks keeping their relative order
        let mut map = vec![0; length];
        let mut next = 0;
        for pass in [Location::Surface, Location::Interior] {
            for (i, element) in self.elements.iter().enumerate() {
                if element.location == pass {
                    map[i] = next;
                    next += 1;
                }
            }
        }

        self.elements = std::mem::take(&mut self.elements).permute(&map)?;
        surface.remap_elements(&map)?;

        debug!(
            "Classified {} surface and {} interior elements",
            self.num_surface_elements(),
            self.num_interior_elements()
        );
        Ok(map)
    }

    /// Check if a single element is interior, caching the result
    ///
    /// A cached classification is returned directly. Otherwise an element is
    /// interior only if each of its four faces is shared with another element.
    /// This is a scan over the whole topology, so prefer
    /// [classify()](Topology::classify) for more than a handful of elements.
    pub fn is_element_interior(&mut self, index: usize) -> Result<bool> {
        let element = self.elements.get(index).ok_or(Error::IndexOutOfRange {
            what: "elements",
            index,
            length: self.elements.len(),
        })?;

        match element.location {
            Location::Interior => return Ok(true),
            Location::Surface => return Ok(false),
            Location::Unknown => (),
        }

        let mut unmatched: Vec<[usize; 3]> =
            element.linear_faces().iter().map(Face::sorted).collect();

        for (i, other) in self.elements.iter().enumerate() {
            if i == index {
                continue;
            }
            for face in other.linear_faces() {
                let key = face.sorted();
                unmatched.retain(|f| *f != key);
            }
            if unmatched.is_empty() {
                break;
            }
        }

        let interior = unmatched.is_empty();
        self.elements[index].location = match interior {
            true => Location::Interior,
            false => Location::Surface,
        };
        Ok(interior)
    }
}

// ! ------------------------------------------------------------------------
// !                       Structural modifications
// ! ------------------------------------------------------------------------

impl Topology {
    /// Elevate every linear element to a quadratic element
    ///
    /// Each unique edge receives a new mid-edge node. Edges are numbered in
    /// the order first seen, walking elements in order and edges in
    /// [EDGES](crate::element::EDGES) order, starting from the larger of
    /// `max_node_index + 1` and the node count.
    ///
    /// - `nodes`: if given, the midpoint of every edge is appended
    /// - `surface`: if given, every face is split into four linear faces
    ///
    /// Any other per-node data (e.g. stokes radii) can be extended from the
    /// returned [Elevation].
    pub fn increase_order(
        &mut self,
        mut nodes: Option<&mut NodeSet>,
        surface: Option<&mut Surface>,
    ) -> Result<Elevation> {
        if let Some(index) = self
            .elements
            .iter()
            .position(|e| e.order() == Order::Quadratic)
        {
            return Err(Error::QuadraticElement(index));
        }

        let mut first_node = self.max_node_index().map_or(0, |n| n + 1);
        if let Some(nodes) = nodes.as_deref() {
            self.check_nodes(nodes)?;
            first_node = first_node.max(nodes.len());
        }

        // number every unique edge
        let mut midpoints: HashMap<(usize, usize), usize> = HashMap::new();
        let mut edges = Vec::new();
        for element in &self.elements {
            for (a, b) in element.edges() {
                let key = (a.min(b), a.max(b));
                midpoints.entry(key).or_insert_with(|| {
                    edges.push(key);
                    first_node + edges.len() - 1
                });
            }
        }

        if let Some(nodes) = nodes.as_deref_mut() {
            for &(a, b) in &edges {
                let midpoint = 0.5 * (nodes.positions[a] + nodes.positions[b]);
                nodes.add_node(midpoint);
            }
        }

        let lookup = |a: usize, b: usize| -> Result<usize> {
            midpoints
                .get(&(a.min(b), a.max(b)))
                .copied()
                .ok_or(Error::UnknownEdge(a, b))
        };

        for element in self.elements.iter_mut() {
            let mut upgraded = element.nodes.clone();
            for (a, b) in element.edges() {
                upgraded.push(lookup(a, b)?);
            }
            element.nodes = upgraded;
        }

        if let Some(surface) = surface {
            // walk backwards so splitting does not shift unvisited faces
            for i in (0..surface.num_faces()).rev() {
                let [a, b, c] = surface.faces[i].nodes;
                let mid = [lookup(a, b)?, lookup(b, c)?, lookup(c, a)?];
                surface.split_face(i, mid)?;
            }
        }

        info!(
            "Elevated {} elements to second order with {} new nodes",
            self.num_elements(),
            edges.len()
        );
        Ok(Elevation { first_node, edges })
    }

    /// Elevate a complete blob and restore the surface-first node order
    ///
    /// Mid-edge nodes on the surface are appended to the interior block by
    /// [Topology::increase_order], so the nodes are partitioned again
    /// afterwards. Returns the [Elevation] (indices before partitioning) and
    /// the old-to-new node map to apply to any extended per-node data.
    pub fn elevate_blob(
        &mut self,
        nodes: &mut NodeSet,
        surface: &mut Surface,
    ) -> Result<(Elevation, Vec<usize>)> {
        let elevation = self.increase_order(Some(&mut *nodes), Some(&mut *surface))?;
        let map = self.partition_surface_nodes(nodes, surface)?;
        debug!(
            "{} of {} nodes on the elevated surface",
            nodes.num_surface_nodes(),
            nodes.num_nodes()
        );
        Ok((elevation, map))
    }

    /// Flip every element with a negative signed volume
    ///
    /// Returns the number of elements flipped. Surfaces extracted afterwards
    /// have outward-facing normals.
    pub fn orient(&mut self, nodes: &NodeSet) -> Result<usize> {
        let mut flipped = 0;
        for element in self.elements.iter_mut() {
            if element.signed_volume(nodes)? < 0.0 {
                element.flip();
                flipped += 1;
            }
        }
        if flipped > 0 {
            info!("Flipped {flipped} inverted elements");
        }
        Ok(flipped)
    }

    /// Replace node indices through an old-to-new map
    pub fn renumber_nodes(&mut self, map: &[usize]) -> Result<()> {
        if let Some(index) = self.max_node_index().filter(|&n| n >= map.len()) {
            return Err(Error::IndexOutOfRange {
                what: "node map",
                index,
                length: map.len(),
            });
        }
        for element in self.elements.iter_mut() {
            element.nodes.iter_mut().for_each(|n| *n = map[*n]);
        }
        Ok(())
    }

    /// Move every node used by the surface into the surface block
    ///
    /// Reorders `nodes` with [NodeSet::partition] and renumbers both the
    /// topology and the surface to match. Returns the old-to-new node map.
    pub fn partition_surface_nodes(
        &mut self,
        nodes: &mut NodeSet,
        surface: &mut Surface,
    ) -> Result<Vec<usize>> {
        self.check_nodes(nodes)?;
        let map = nodes.partition(&surface.nodes())?;
        self.renumber_nodes(&map)?;
        surface.remap_nodes(&map)?;
        Ok(map)
    }
}

impl std::fmt::Display for Topology {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut s = f!("num_elements = {}\n", self.num_elements());
        s += &f!("num_surface_elements = {}\n", self.num_surface_elements());
        s += &f!("num_interior_elements = {}\n", self.num_interior_elements());

        for (i, element) in self.elements.iter().enumerate() {
            let tag = match element.location {
                Location::Surface => "Surface",
                Location::Interior => "Interior",
                Location::Unknown => "Unknown",
            };
            s += &f!("Element {i} ({tag}): {}\n", element.nodes.iter().join(" "));
        }
        write!(f, "{}", s.trim_end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    /// Unit cube split into 4 corner tetrahedra around 1 central one
    fn cube() -> (NodeSet, Topology) {
        let positions = (0..8)
            .map(|i| Vector3::new((i & 1) as f64, ((i >> 1) & 1) as f64, ((i >> 2) & 1) as f64))
            .collect();
        let topology = Topology::new(vec![
            Element::linear([0, 2, 1, 4]),
            Element::linear([3, 1, 2, 7]),
            Element::linear([5, 4, 1, 7]),
            Element::linear([6, 2, 4, 7]),
            Element::linear([2, 1, 4, 7]),
        ]);
        (NodeSet::new(positions, 8), topology)
    }

    #[test]
    fn cube_volume() {
        let (nodes, topology) = cube();
        assert!((topology.volume(&nodes, 1.0).unwrap() - 1.0).abs() < 1e-12);
        assert!((topology.volume(&nodes, 2.0).unwrap() - 8.0).abs() < 1e-12);
    }

    #[test]
    fn cube_surface() {
        let (nodes, topology) = cube();
        let surface = topology.extract_surface().unwrap();
        assert_eq!(surface.num_faces(), 12);
        assert!((surface.area(&nodes).unwrap() - 6.0).abs() < 1e-12);
        // the central element owns no boundary face
        assert!(surface.faces.iter().all(|f| f.element != Some(4)));
    }

    #[test]
    fn classify_moves_interior_last() {
        let (_, mut topology) = cube();
        // put the central element first to force a reorder
        topology.elements.rotate_right(1);
        let mut surface = topology.extract_surface().unwrap();

        let map = topology.classify(&mut surface).unwrap();
        assert_eq!(map, vec![4, 0, 1, 2, 3]);
        assert_eq!(topology.num_interior_elements(), 1);
        assert!(topology.elements[4].is_interior());
        assert_eq!(topology.elements[4].nodes, vec![2, 1, 4, 7]);
        assert!(topology.is_partitioned());

        // faces still reference the element that owns them
        for face in &surface.faces {
            let owner = &topology.elements[face.element.unwrap()];
            assert!(face.nodes.iter().all(|n| owner.nodes.contains(n)));
        }
    }

    #[test]
    fn single_element_check() {
        let (_, mut topology) = cube();
        assert!(topology.is_element_interior(4).unwrap());
        assert!(!topology.is_element_interior(0).unwrap());
        assert_eq!(topology.elements[4].location, Location::Interior);
        assert_eq!(topology.elements[0].location, Location::Surface);
        assert_eq!(topology.num_unknown_elements(), 3);
        assert!(topology.is_element_interior(9).is_err());
    }

    #[test]
    fn elevate_cube() {
        let (mut nodes, mut topology) = cube();
        let mut surface = topology.extract_surface().unwrap();
        let elevation = topology
            .increase_order(Some(&mut nodes), Some(&mut surface))
            .unwrap();

        // 12 cube edges + 6 face diagonals
        assert_eq!(elevation.num_new_nodes(), 18);
        assert_eq!(elevation.first_node, 8);
        assert_eq!(nodes.num_nodes(), 26);
        assert_eq!(surface.num_faces(), 48);
        assert_eq!(topology.order(), Some(Order::Quadratic));

        // every mid-edge node is at the midpoint of its edge
        for element in &topology.elements {
            for (j, (a, b)) in element.edges().iter().enumerate() {
                let mid = nodes.positions[element.nodes[4 + j]];
                let expected = 0.5 * (nodes.positions[*a] + nodes.positions[*b]);
                assert!((mid - expected).norm() < 1e-12);
            }
        }

        // surface area is unchanged by splitting
        assert!((surface.area(&nodes).unwrap() - 6.0).abs() < 1e-12);

        // a second elevation is refused
        assert!(topology.increase_order(None, None).is_err());
    }

    #[test]
    fn elevation_refuses_quadratic_surface() {
        let (_, mut topology) = cube();
        topology.increase_order(None, None).unwrap();
        assert!(matches!(
            topology.extract_surface(),
            Err(Error::QuadraticElement(0))
        ));
    }

    #[test]
    fn orient_fixes_inverted() {
        let (nodes, mut topology) = cube();
        topology.elements[1].flip();
        topology.elements[3].flip();
        assert_eq!(topology.summary(&nodes).unwrap().num_inverted_elements, 2);
        assert_eq!(topology.orient(&nodes).unwrap(), 2);
        assert_eq!(topology.orient(&nodes).unwrap(), 0);
    }

    #[test]
    fn extracted_normals_point_outward() {
        let (nodes, topology) = cube();
        let surface = topology.extract_surface().unwrap();
        let centre = Vector3::new(0.5, 0.5, 0.5);
        for face in &surface.faces {
            let outward = face.centroid(&nodes).unwrap() - centre;
            assert!(face.normal(&nodes).unwrap().dot(&outward) > 0.0);
        }
    }

    #[test]
    fn partition_nodes() {
        let (mut nodes, mut topology) = cube();
        // a ninth node only used by a dangling element
        nodes.add_node(Vector3::new(2.0, 2.0, 2.0));
        nodes.num_surface_nodes = 0;
        let mut surface = topology.extract_surface().unwrap();
        topology.add_element(Element::linear([8, 0, 1, 2]), Location::Unknown);

        let map = topology
            .partition_surface_nodes(&mut nodes, &mut surface)
            .unwrap();
        assert_eq!(nodes.num_surface_nodes(), 8);
        assert_eq!(map[8], 8);
        assert_eq!(topology.elements[5].nodes[0], 8);
    }

    #[test]
    fn mass_requires_matching_densities() {
        let (nodes, topology) = cube();
        assert!(topology.mass(&[1.0; 4], &nodes, 1.0).is_err());
        let mass = topology.mass(&[2.0; 5], &nodes, 1.0).unwrap();
        assert!((mass - 2.0).abs() < 1e-12);
    }

    #[test]
    fn linear_nodes_and_order() {
        let (_, topology) = cube();
        assert_eq!(topology.linear_nodes(), (0..8).collect::<Vec<_>>());
        assert_eq!(topology.max_node_index(), Some(7));
        assert_eq!(Topology::default().order(), None);
    }
}
