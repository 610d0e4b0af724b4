//! Write operations for mesh files

// standard library
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

// crate modules
use crate::error::{Error, Result};
use crate::node::NodeSet;
use crate::surface::{Surface, TriangleMesh};
use crate::topology::Topology;

// ffeatools modules
use ffeatools_utils::FloatExt;

// external crates
use itertools::Itertools;
use log::info;

/// Number of decimal places used for node coordinates by default
pub const DEFAULT_PRECISION: usize = 6;

/// Write a [NodeSet] to an FFEA node file
///
/// Coordinates are written in C-style scientific notation with `precision`
/// decimal places, e.g. `1.000000e+00` for [DEFAULT_PRECISION].
///
/// ```no_run
/// # use ffeatools_mesh::{read_nodes, write_nodes, DEFAULT_PRECISION};
/// let nodes = read_nodes("./data/cube.vol").unwrap();
/// write_nodes(&nodes, "./cube.node", DEFAULT_PRECISION).unwrap();
/// ```
pub fn write_nodes<P: AsRef<Path>>(nodes: &NodeSet, path: P, precision: usize) -> Result<()> {
    let mut writer = init_writer(path.as_ref())?;
    nodes_to(nodes, &mut writer, precision)?;
    writer.flush()?;
    Ok(())
}

/// Write a [Topology] to an FFEA topology file
///
/// FFEA expects every surface element before any interior element, so an
/// [Error::UnorderedElements] is returned for a topology that has not been
/// classified into blocks. Unclassified elements are written as surface
/// elements.
pub fn write_topology<P: AsRef<Path>>(topology: &Topology, path: P) -> Result<()> {
    let mut writer = init_writer(path.as_ref())?;
    topology_to(topology, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write a [Surface] to an FFEA surface file
///
/// Every face must know its owning element.
pub fn write_surface<P: AsRef<Path>>(surface: &Surface, path: P) -> Result<()> {
    let mut writer = init_writer(path.as_ref())?;
    surface_to(surface, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write a complete netgen volume mesh
///
/// All indices are converted to 1-based. The `surfaceelements` section is
/// filled from `surface` if given, otherwise it is left empty.
pub fn write_netgen_vol<P: AsRef<Path>>(
    topology: &Topology,
    nodes: &NodeSet,
    surface: Option<&Surface>,
    path: P,
) -> Result<()> {
    let mut writer = init_writer(path.as_ref())?;
    netgen_vol_to(topology, nodes, surface, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write a triangle mesh to a Wavefront OBJ file
///
/// Only vertices (`v`) and faces (`f`) are written, with 1-based indices.
pub fn write_obj<P: AsRef<Path>>(mesh: &TriangleMesh, path: P) -> Result<()> {
    let mut writer = init_writer(path.as_ref())?;
    obj_to(mesh, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write the faces of a blob surface to a Wavefront OBJ file
///
/// Every blob node is written as a vertex so that face indices are the node
/// indices plus one.
pub fn surface_to_obj<P: AsRef<Path>>(surface: &Surface, nodes: &NodeSet, path: P) -> Result<()> {
    write_obj(&TriangleMesh::from_surface(surface, nodes)?, path)
}

fn init_writer(path: &Path) -> Result<BufWriter<File>> {
    info!("Writing {}", path.display());
    let file = File::create(path)?;
    Ok(BufWriter::new(file))
}

fn nodes_to<W: Write>(nodes: &NodeSet, writer: &mut W, precision: usize) -> Result<()> {
    writeln!(writer, "ffea node file")?;
    writeln!(writer, "num_nodes {}", nodes.num_nodes())?;
    writeln!(writer, "num_surface_nodes {}", nodes.num_surface_nodes())?;
    writeln!(writer, "num_interior_nodes {}", nodes.num_interior_nodes())?;

    writeln!(writer, "surface nodes:")?;
    for p in nodes.surface() {
        let [x, y, z] = [p.x, p.y, p.z].map(|v| v.sci(precision, 2));
        writeln!(writer, "{x} {y} {z}")?;
    }

    writeln!(writer, "interior nodes:")?;
    for p in nodes.interior() {
        let [x, y, z] = [p.x, p.y, p.z].map(|v| v.sci(precision, 2));
        writeln!(writer, "{x} {y} {z}")?;
    }
    Ok(())
}

fn topology_to<W: Write>(topology: &Topology, writer: &mut W) -> Result<()> {
    if !topology.is_partitioned() {
        return Err(Error::UnorderedElements);
    }

    let num_surface = topology.num_surface_elements();
    writeln!(writer, "ffea topology file")?;
    writeln!(writer, "num_elements {}", topology.num_elements())?;
    writeln!(writer, "num_surface_elements {num_surface}")?;
    writeln!(writer, "num_interior_elements {}", topology.num_interior_elements())?;

    writeln!(writer, "surface elements:")?;
    for element in &topology.elements[..num_surface] {
        writeln!(writer, "{}", element.nodes.iter().join(" "))?;
    }

    writeln!(writer, "interior elements:")?;
    for element in &topology.elements[num_surface..] {
        writeln!(writer, "{}", element.nodes.iter().join(" "))?;
    }
    Ok(())
}

fn surface_to<W: Write>(surface: &Surface, writer: &mut W) -> Result<()> {
    writeln!(writer, "ffea surface file")?;
    writeln!(writer, "num_surface_faces {}", surface.num_faces())?;
    writeln!(writer, "faces:")?;
    for (i, face) in surface.faces.iter().enumerate() {
        let element = face.element.ok_or(Error::MissingElementReference(i))?;
        let [a, b, c] = face.nodes;
        writeln!(writer, "{element} {a} {b} {c}")?;
    }
    Ok(())
}

fn netgen_vol_to<W: Write>(
    topology: &Topology,
    nodes: &NodeSet,
    surface: Option<&Surface>,
    writer: &mut W,
) -> Result<()> {
    topology.check_nodes(nodes)?;

    writeln!(writer, "mesh3d")?;
    writeln!(writer, "dimension\n3")?;
    writeln!(writer, "geomtype\n0\n")?;

    let faces = surface.map(|s| s.faces.as_slice()).unwrap_or_default();
    writeln!(writer, "# surfnr    bcnr   domin  domout      np      p1      p2      p3")?;
    writeln!(writer, "surfaceelements\n{}", faces.len())?;
    for face in faces {
        let [a, b, c] = face.nodes.map(|n| n + 1);
        writeln!(writer, "1 1 1 0 3 {a} {b} {c}")?;
    }

    writeln!(writer, "\n#  matnr      np      p1      p2      p3      p4")?;
    writeln!(writer, "volumeelements\n{}", topology.num_elements())?;
    for element in &topology.elements {
        let indices = element.nodes.iter().map(|n| n + 1).join(" ");
        writeln!(writer, "1 {} {indices}", element.nodes.len())?;
    }

    writeln!(writer, "\nedgesegmentsgi2\n0\n")?;

    writeln!(writer, "#          X             Y             Z")?;
    writeln!(writer, "points\n{}", nodes.num_nodes())?;
    for p in &nodes.positions {
        let [x, y, z] = [p.x, p.y, p.z].map(|v| v.sci(9, 2));
        writeln!(writer, "{x} {y} {z}")?;
    }

    writeln!(writer, "\nendmesh")?;
    Ok(())
}

fn obj_to<W: Write>(mesh: &TriangleMesh, writer: &mut W) -> Result<()> {
    for p in &mesh.points {
        writeln!(writer, "v {} {} {}", p.x, p.y, p.z)?;
    }
    for [a, b, c] in &mesh.triangles {
        writeln!(writer, "f {} {} {}", a + 1, b + 1, c + 1)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Element, Location};
    use crate::face::Face;
    use crate::reader::{
        parse_ffea_nodes, parse_ffea_surface, parse_ffea_topology, parse_netgen_elements,
        parse_netgen_points,
    };
    use ffeatools_utils::LineReader;
    use nalgebra::Vector3;

    fn tet() -> (NodeSet, Topology) {
        let nodes = NodeSet::new(
            vec![
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(0.0, 1.0, 0.0),
                Vector3::new(1.0, 0.0, 0.0),
                Vector3::new(0.0, 0.0, 1.0),
                Vector3::new(0.25, 0.25, 0.25),
            ],
            4,
        );
        let mut topology = Topology::default();
        topology.add_element(Element::linear([0, 1, 2, 3]), Location::Surface);
        topology.add_element(Element::linear([4, 1, 2, 3]), Location::Interior);
        (nodes, topology)
    }

    #[test]
    fn node_layout() {
        let (nodes, _) = tet();
        let mut buffer = Vec::new();
        nodes_to(&nodes, &mut buffer, 3).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "ffea node file");
        assert_eq!(lines[3], "num_interior_nodes 1");
        assert_eq!(lines[6], "0.000e+00 1.000e+00 0.000e+00");
        assert_eq!(lines[9], "interior nodes:");
        assert_eq!(lines[10], "2.500e-01 2.500e-01 2.500e-01");

        let read = parse_ffea_nodes(&mut LineReader::new(text.as_bytes())).unwrap();
        assert_eq!(read, nodes);
    }

    #[test]
    fn topology_blocks() {
        let (_, topology) = tet();
        let mut buffer = Vec::new();
        topology_to(&topology, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("surface elements:\n0 1 2 3\ninterior elements:\n4 1 2 3\n"));

        let read = parse_ffea_topology(&mut LineReader::new(text.as_bytes())).unwrap();
        assert_eq!(read, topology);
    }

    #[test]
    fn unordered_topology() {
        let (_, mut topology) = tet();
        topology.elements.reverse();
        let result = topology_to(&topology, &mut Vec::new());
        assert!(matches!(result, Err(Error::UnorderedElements)));
    }

    #[test]
    fn surface_requires_owner() {
        let mut surface = Surface::new(vec![Face::new([0, 2, 1]).with_element(0)]);
        let mut buffer = Vec::new();
        surface_to(&surface, &mut buffer).unwrap();
        let read = parse_ffea_surface(&mut LineReader::new(buffer.as_slice())).unwrap();
        assert_eq!(read, surface);

        surface.add_face(Face::new([1, 2, 3]));
        let result = surface_to(&surface, &mut Vec::new());
        assert!(matches!(result, Err(Error::MissingElementReference(1))));
    }

    #[test]
    fn netgen_volume_reads_back() {
        let (nodes, topology) = tet();
        let surface = Surface::new(vec![Face::new([0, 2, 1]).with_element(0)]);
        let mut buffer = Vec::new();
        netgen_vol_to(&topology, &nodes, Some(&surface), &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("surfaceelements\n1\n1 1 1 0 3 1 3 2\n"));

        let elements = parse_netgen_elements(&mut LineReader::new(text.as_bytes())).unwrap();
        assert_eq!(elements.elements[1].nodes, vec![4, 1, 2, 3]);
        let points = parse_netgen_points(&mut LineReader::new(text.as_bytes())).unwrap();
        assert_eq!(points.positions, nodes.positions);
    }

    #[test]
    fn obj_is_one_based() {
        let mesh = TriangleMesh {
            points: vec![Vector3::zeros(), Vector3::x(), Vector3::y()],
            triangles: vec![[0, 1, 2]],
        };
        let mut buffer = Vec::new();
        obj_to(&mesh, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text, "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n");
    }
}
