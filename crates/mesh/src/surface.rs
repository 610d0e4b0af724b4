//! Module for boundary surfaces and standalone triangle meshes

// crate modules
use crate::error::{Error, Result};
use crate::face::Face;
use crate::node::NodeSet;

// ffeatools modules
use ffeatools_utils::f;

// external crates
use nalgebra::Vector3;

/// The boundary surface of a blob
///
/// An ordered list of linear triangular [Face]s whose nodes index into the
/// blob [NodeSet]. Face order matters, since per-face files such as the VdW
/// file are matched to faces by position.
///
/// Usually generated with
/// [Topology::extract_surface()](crate::Topology::extract_surface) or read
/// from an FFEA `.surf` file.
///
/// ```rust
/// # use ffeatools_mesh::{Face, Surface};
/// let mut surface = Surface::default();
/// surface.add_face(Face::new([0, 1, 2]).with_element(0));
/// surface.add_face(Face::new([2, 1, 3]).with_element(0));
///
/// assert_eq!(surface.num_faces(), 2);
/// assert_eq!(surface.nodes(), vec![0, 1, 2, 3]);
/// ```
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Surface {
    /// Every face in file order
    pub faces: Vec<Face>,
}

impl Surface {
    /// Surface from a list of faces
    pub fn new(faces: Vec<Face>) -> Self {
        Self { faces }
    }

    /// Append a face
    pub fn add_face(&mut self, face: Face) {
        self.faces.push(face);
    }

    /// Number of faces
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Unique nodes referenced by the surface, in order of first appearance
    pub fn nodes(&self) -> Vec<usize> {
        let mut seen = std::collections::HashSet::new();
        self.faces
            .iter()
            .flat_map(|face| face.nodes)
            .filter(|n| seen.insert(*n))
            .collect()
    }

    /// Total area of every face
    pub fn area(&self, nodes: &NodeSet) -> Result<f64> {
        self.faces.iter().map(|face| face.area(nodes)).sum()
    }

    /// Replace face `index` with its four children after order elevation
    ///
    /// `midpoints` are the new nodes on edges (a,b), (b,c) and (c,a) of the
    /// face (a,b,c). The children keep the winding and owning element of the
    /// parent and are inserted in its place:
    ///
    /// ```text
    ///          c
    ///         / \
    ///       ca---bc
    ///       / \ / \
    ///      a---ab--b
    /// ```
    pub fn split_face(&mut self, index: usize, midpoints: [usize; 3]) -> Result<()> {
        let parent = *self.faces.get(index).ok_or(Error::IndexOutOfRange {
            what: "surface faces",
            index,
            length: self.faces.len(),
        })?;

        let [a, b, c] = parent.nodes;
        let [ab, bc, ca] = midpoints;
        let children = [[a, ab, ca], [ab, b, bc], [ca, bc, c], [ab, bc, ca]].map(|nodes| Face {
            nodes,
            element: parent.element,
        });

        self.faces.splice(index..=index, children);
        Ok(())
    }

    /// Replace owning element indices through an old-to-new map
    pub fn remap_elements(&mut self, map: &[usize]) -> Result<()> {
        for face in self.faces.iter_mut() {
            if let Some(element) = face.element.as_mut() {
                *element = *map.get(*element).ok_or(Error::IndexOutOfRange {
                    what: "element map",
                    index: *element,
                    length: map.len(),
                })?;
            }
        }
        Ok(())
    }

    /// Replace node indices through an old-to-new map
    pub fn remap_nodes(&mut self, map: &[usize]) -> Result<()> {
        if let Some(&index) = self
            .faces
            .iter()
            .flat_map(|face| face.nodes.iter())
            .find(|&&n| n >= map.len())
        {
            return Err(Error::IndexOutOfRange {
                what: "node map",
                index,
                length: map.len(),
            });
        }
        self.faces.iter_mut().for_each(|face| face.renumber(map));
        Ok(())
    }
}

impl std::fmt::Display for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut s = f!("num_faces = {}\n", self.num_faces());
        for (i, face) in self.faces.iter().enumerate() {
            let [a, b, c] = face.nodes;
            match face.element {
                Some(e) => s += &f!("Face {i} (element {e}): {a} {b} {c}\n"),
                None => s += &f!("Face {i}: {a} {b} {c}\n"),
            }
        }
        write!(f, "{}", s.trim_end())
    }
}

/// A standalone triangle mesh with its own points
///
/// Used for surface-only formats like the netgen `surfacemesh` files, which
/// carry their own point list rather than indexing into a blob node file.
/// Indices are 0-based.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TriangleMesh {
    /// Vertex positions
    pub points: Vec<Vector3<f64>>,
    /// Vertex index triples
    pub triangles: Vec<[usize; 3]>,
}

impl TriangleMesh {
    /// Build from a blob surface, keeping every blob node as a vertex
    pub fn from_surface(surface: &Surface, nodes: &NodeSet) -> Result<Self> {
        let length = nodes.len();
        if let Some(&index) = surface.nodes().iter().find(|&&n| n >= length) {
            return Err(Error::IndexOutOfRange {
                what: "nodes",
                index,
                length,
            });
        }
        Ok(Self {
            points: nodes.positions.clone(),
            triangles: surface.faces.iter().map(|face| face.nodes).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_keeps_position_and_owner() {
        let mut surface = Surface::new(vec![
            Face::new([0, 1, 2]).with_element(4),
            Face::new([7, 8, 9]),
        ]);
        surface.split_face(0, [10, 11, 12]).unwrap();

        assert_eq!(surface.num_faces(), 5);
        assert_eq!(surface.faces[0].nodes, [0, 10, 12]);
        assert_eq!(surface.faces[1].nodes, [10, 1, 11]);
        assert_eq!(surface.faces[2].nodes, [12, 11, 2]);
        assert_eq!(surface.faces[3].nodes, [10, 11, 12]);
        assert!(surface.faces[..4].iter().all(|f| f.element == Some(4)));
        assert_eq!(surface.faces[4].nodes, [7, 8, 9]);
    }

    #[test]
    fn split_out_of_range() {
        let mut surface = Surface::default();
        assert!(surface.split_face(0, [1, 2, 3]).is_err());
    }

    #[test]
    fn remap() {
        let mut surface = Surface::new(vec![Face::new([0, 1, 2]).with_element(1)]);
        surface.remap_elements(&[1, 0]).unwrap();
        surface.remap_nodes(&[2, 0, 1]).unwrap();
        assert_eq!(surface.faces[0].element, Some(0));
        assert_eq!(surface.faces[0].nodes, [2, 0, 1]);

        assert!(surface.remap_nodes(&[0]).is_err());
        assert!(surface.remap_elements(&[]).is_err());
    }
}
