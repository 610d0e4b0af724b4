// crate modules
use crate::element::{Location, Order};
use crate::error::Result;
use crate::node::NodeSet;
use crate::surface::Surface;
use crate::topology::Topology;

// ffeatools modules
use ffeatools_utils::f;

// internal modules
use crate::vtk::TopologyToVtkBuilder;

// external crates
use log::debug;
use vtkio::model::{
    Attribute, Attributes, ByteOrder, CellType, Cells, DataArray, DataSet, ElementType, IOBuffer,
    UnstructuredGridPiece, Version, VertexNumbers, Vtk,
};

/// FFEA quadratic node order mapped onto the VTK `QuadraticTetra` order
///
/// VTK lists the mid-edge nodes as (0,1), (1,2), (2,0), (0,3), (1,3), (2,3).
const QUADRATIC_TETRA: [usize; 10] = [0, 1, 2, 3, 4, 7, 5, 6, 8, 9];

/// Convert blob meshes to vtk formats for plotting
///
/// Every node of the [NodeSet] is written as a point so that cell
/// connectivity is the FFEA node indices unchanged.
///
/// The fields remain public for direct use, but for convenience and style
/// preference a builder pattern is also implemented and recommended.
///
/// # Cell types
///
/// Linear elements are written as `Tetra` cells and quadratic elements as
/// `QuadraticTetra` cells, reordering mid-edge nodes to the VTK convention.
/// FFEA treats a negative `(n1-n0)x(n2-n0).(n3-n0)` as positive orientation
/// which is the reverse of VTK, so corners 1 and 2 are swapped on output.
///
/// Surface faces are written as `Triangle` cells in their stored winding.
///
/// # Cell data
///
/// ```rust
/// # use ffeatools_mesh::vtk::TopologyToVtk;
/// // Tag cells with their location and volume
/// let converter = TopologyToVtk::builder()
///     .include_location(true)
///     .include_size(true)
///     .build();
/// ```
///
/// - `location`: element location, or the owning element for faces
/// - `volume`/`area`: element volume or face area
#[derive(Debug, PartialEq)]
pub struct TopologyToVtk {
    /// Byte ordering as big or little endian
    pub byte_order: ByteOrder,
    /// Include the surface/interior tag as cell data
    pub include_location: bool,
    /// Include element volume or face area as cell data
    pub include_size: bool,
}

// Public API
impl TopologyToVtk {
    /// Start with the default configuration
    pub fn new() -> TopologyToVtk {
        Default::default()
    }

    /// Get an instance of the [TopologyToVtkBuilder]
    pub fn builder() -> TopologyToVtkBuilder {
        TopologyToVtkBuilder::default()
    }

    /// Convert a [Topology] to a vtkio::Vtk object
    pub fn convert(&self, nodes: &NodeSet, topology: &Topology) -> Result<Vtk> {
        topology.check_nodes(nodes)?;

        let mut connectivity = Vec::new();
        let mut offsets = Vec::with_capacity(topology.num_elements());
        let mut types = Vec::with_capacity(topology.num_elements());

        for element in &topology.elements {
            let mut element = element.clone();
            element.flip();
            match element.order() {
                Order::Linear => {
                    connectivity.extend(element.nodes.iter().map(|&n| n as u64));
                    types.push(CellType::Tetra);
                }
                Order::Quadratic => {
                    connectivity.extend(QUADRATIC_TETRA.iter().map(|&j| element.nodes[j] as u64));
                    types.push(CellType::QuadraticTetra);
                }
            }
            offsets.push(connectivity.len() as u64);
        }

        let mut attributes = Attributes::new();
        if self.include_location {
            let location = topology
                .elements
                .iter()
                .map(|e| match e.location {
                    Location::Interior => 0,
                    Location::Surface => 1,
                    Location::Unknown => -1,
                })
                .collect();
            attributes.cell.push(scalar_i32("location", location));
        }
        if self.include_size {
            let volume = topology
                .elements
                .iter()
                .map(|e| e.volume(nodes, 1.0))
                .collect::<Result<Vec<f64>>>()?;
            attributes.cell.push(scalar_f64("volume", volume));
        }

        debug!("Converted {} elements to VTK cells", types.len());
        Ok(self.unstructured(
            f!("FFEA topology ({} elements)", topology.num_elements()),
            nodes,
            connectivity,
            offsets,
            types,
            attributes,
        ))
    }

    /// Convert a [Surface] to a vtkio::Vtk object of triangles
    pub fn convert_surface(&self, nodes: &NodeSet, surface: &Surface) -> Result<Vtk> {
        let mut connectivity = Vec::with_capacity(3 * surface.num_faces());
        let mut offsets = Vec::with_capacity(surface.num_faces());
        for face in &surface.faces {
            // checks every node exists
            face.centroid(nodes)?;
            connectivity.extend(face.nodes.iter().map(|&n| n as u64));
            offsets.push(connectivity.len() as u64);
        }
        let types = vec![CellType::Triangle; surface.num_faces()];

        let mut attributes = Attributes::new();
        if self.include_location {
            let element = surface
                .faces
                .iter()
                .map(|face| face.element.map_or(-1, |e| e as i32))
                .collect();
            attributes.cell.push(scalar_i32("element", element));
        }
        if self.include_size {
            let area = surface
                .faces
                .iter()
                .map(|face| face.area(nodes))
                .collect::<Result<Vec<f64>>>()?;
            attributes.cell.push(scalar_f64("area", area));
        }

        Ok(self.unstructured(
            f!("FFEA surface ({} faces)", surface.num_faces()),
            nodes,
            connectivity,
            offsets,
            types,
            attributes,
        ))
    }
}

impl Default for TopologyToVtk {
    fn default() -> Self {
        TopologyToVtkBuilder::default().build()
    }
}

impl TopologyToVtk {
    /// Wrap cells and data into an inline unstructured grid
    fn unstructured(
        &self,
        title: String,
        nodes: &NodeSet,
        connectivity: Vec<u64>,
        offsets: Vec<u64>,
        types: Vec<CellType>,
        data: Attributes,
    ) -> Vtk {
        let points = nodes
            .positions
            .iter()
            .flat_map(|p| [p.x, p.y, p.z])
            .collect::<Vec<f64>>();

        Vtk {
            version: Version::Auto,
            title,
            byte_order: self.byte_order,
            file_path: None,
            data: DataSet::inline(UnstructuredGridPiece {
                points: points.into(),
                cells: Cells {
                    cell_verts: VertexNumbers::XML {
                        connectivity,
                        offsets,
                    },
                    types,
                },
                data,
            }),
        }
    }
}

fn scalar_i32(name: &str, values: Vec<i32>) -> Attribute {
    Attribute::DataArray(DataArray {
        name: name.to_string(),
        elem: ElementType::Scalars {
            num_comp: 1,
            lookup_table: None,
        },
        data: IOBuffer::I32(values),
    })
}

fn scalar_f64(name: &str, values: Vec<f64>) -> Attribute {
    Attribute::DataArray(DataArray {
        name: name.to_string(),
        elem: ElementType::Scalars {
            num_comp: 1,
            lookup_table: None,
        },
        data: IOBuffer::F64(values),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;
    use crate::face::Face;
    use nalgebra::Vector3;
    use vtkio::model::Piece;

    fn tet() -> (NodeSet, Topology) {
        let nodes = NodeSet::new(
            vec![
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(0.0, 1.0, 0.0),
                Vector3::new(1.0, 0.0, 0.0),
                Vector3::new(0.0, 0.0, 1.0),
            ],
            4,
        );
        let mut topology = Topology::default();
        topology.add_element(Element::linear([0, 1, 2, 3]), Location::Surface);
        (nodes, topology)
    }

    fn piece(vtk: Vtk) -> UnstructuredGridPiece {
        match vtk.data {
            DataSet::UnstructuredGrid { mut pieces, .. } => match pieces.remove(0) {
                Piece::Inline(piece) => *piece,
                _ => panic!("expected inline piece"),
            },
            _ => panic!("expected unstructured grid"),
        }
    }

    #[test]
    fn linear_cells_use_vtk_orientation() {
        let (nodes, topology) = tet();
        let piece = piece(TopologyToVtk::default().convert(&nodes, &topology).unwrap());
        assert_eq!(piece.cells.types, vec![CellType::Tetra]);
        match piece.cells.cell_verts {
            VertexNumbers::XML {
                connectivity,
                offsets,
            } => {
                assert_eq!(connectivity, vec![0, 2, 1, 3]);
                assert_eq!(offsets, vec![4]);
            }
            _ => panic!("expected XML vertex numbers"),
        }
        assert_eq!(piece.data.cell.len(), 1);
    }

    #[test]
    fn quadratic_cells() {
        let (mut nodes, mut topology) = tet();
        topology.increase_order(Some(&mut nodes), None).unwrap();
        let converter = TopologyToVtk::builder().include_size(true).build();
        let piece = piece(converter.convert(&nodes, &topology).unwrap());
        assert_eq!(piece.cells.types, vec![CellType::QuadraticTetra]);
        assert_eq!(piece.points.len(), 30);
        assert_eq!(piece.data.cell.len(), 2);
    }

    #[test]
    fn surface_triangles() {
        let (nodes, _) = tet();
        let surface = Surface::new(vec![Face::new([0, 2, 1]).with_element(0)]);
        let converter = TopologyToVtk::builder().include_location(false).build();
        let piece = piece(converter.convert_surface(&nodes, &surface).unwrap());
        assert_eq!(piece.cells.types, vec![CellType::Triangle]);
        assert!(piece.data.cell.is_empty());

        let surface = Surface::new(vec![Face::new([0, 2, 9])]);
        assert!(converter.convert_surface(&nodes, &surface).is_err());
    }
}
