//! Readers for the native FFEA node, topology and surface files

// crate modules
use crate::element::{Element, Location};
use crate::error::{Error, Result};
use crate::face::Face;
use crate::node::NodeSet;
use crate::reader::parsers::{
    coordinate_array, expect_header, header_count, label, parse_next, vector_of_usize,
};
use crate::surface::Surface;
use crate::topology::Topology;

// ffeatools modules
use ffeatools_utils::LineReader;

// standard library
use std::io::BufRead;

// external crates
use log::{debug, trace};
use nalgebra::Vector3;

/// Headers accepted for a topology file
pub const TOPOLOGY_HEADERS: [&str; 2] = ["ffea topology file", "walrus topology file"];

/// Parse a complete FFEA node file
///
/// Node lines may carry more than three values, only the first three are
/// used as the position.
pub fn parse_ffea_nodes<R: BufRead>(reader: &mut LineReader<R>) -> Result<NodeSet> {
    expect_header(reader, &["ffea node file"])?;
    let num_nodes = parse_next(reader, |i| header_count(i, "num_nodes"))?;
    let num_surface_nodes = parse_next(reader, |i| header_count(i, "num_surface_nodes"))?;
    let num_interior_nodes = parse_next(reader, |i| header_count(i, "num_interior_nodes"))?;
    check_split("nodes", num_nodes, num_surface_nodes, num_interior_nodes)?;

    let mut positions = Vec::with_capacity(num_nodes);

    parse_next(reader, |i| label(i, "surface nodes:"))?;
    for _ in 0..num_surface_nodes {
        let [x, y, z] = parse_next(reader, coordinate_array)?;
        positions.push(Vector3::new(x, y, z));
    }

    parse_next(reader, |i| label(i, "interior nodes:"))?;
    for _ in 0..num_interior_nodes {
        let [x, y, z] = parse_next(reader, coordinate_array)?;
        positions.push(Vector3::new(x, y, z));
    }

    debug!("Read {num_nodes} FFEA nodes ({num_surface_nodes} surface)");
    Ok(NodeSet::new(positions, num_surface_nodes))
}

/// Parse a complete FFEA (or legacy walrus) topology file
///
/// Elements listed under `surface elements:` are tagged
/// [Location::Surface] and those under `interior elements:` are tagged
/// [Location::Interior].
pub fn parse_ffea_topology<R: BufRead>(reader: &mut LineReader<R>) -> Result<Topology> {
    let header = expect_header(reader, &TOPOLOGY_HEADERS)?;
    trace!("Topology header \"{header}\"");

    let num_elements = parse_next(reader, |i| header_count(i, "num_elements"))?;
    let num_surface = parse_next(reader, |i| header_count(i, "num_surface_elements"))?;
    let num_interior = parse_next(reader, |i| header_count(i, "num_interior_elements"))?;
    check_split("elements", num_elements, num_surface, num_interior)?;

    let mut topology = Topology::default();

    parse_next(reader, |i| label(i, "surface elements:"))?;
    for _ in 0..num_surface {
        let indices = parse_next(reader, vector_of_usize)?;
        topology.add_element(element(reader, indices)?, Location::Surface);
    }

    parse_next(reader, |i| label(i, "interior elements:"))?;
    for _ in 0..num_interior {
        let indices = parse_next(reader, vector_of_usize)?;
        topology.add_element(element(reader, indices)?, Location::Interior);
    }

    debug!("Read {num_elements} FFEA elements ({num_interior} interior)");
    Ok(topology)
}

/// Parse a complete FFEA surface file
///
/// Each face line is the owning element followed by three node indices.
pub fn parse_ffea_surface<R: BufRead>(reader: &mut LineReader<R>) -> Result<Surface> {
    expect_header(reader, &["ffea surface file"])?;
    let num_faces = parse_next(reader, |i| header_count(i, "num_surface_faces"))?;
    parse_next(reader, |i| label(i, "faces:"))?;

    let mut surface = Surface::default();
    for _ in 0..num_faces {
        let values = parse_next(reader, vector_of_usize)?;
        match values[..] {
            [element, a, b, c] => surface.add_face(Face::new([a, b, c]).with_element(element)),
            _ => {
                return Err(Error::ParseError {
                    line: reader.line_number(),
                    text: reader.current().to_string(),
                })
            }
        }
    }

    debug!("Read {num_faces} FFEA surface faces");
    Ok(surface)
}

/// Element from indices, reporting the offending line on failure
fn element<R: BufRead>(reader: &LineReader<R>, indices: Vec<usize>) -> Result<Element> {
    Element::from_indices(indices).map_err(|_| Error::ParseError {
        line: reader.line_number(),
        text: reader.current().to_string(),
    })
}

/// Check the total is the sum of the surface and interior blocks
fn check_split(what: &'static str, total: usize, surface: usize, interior: usize) -> Result<()> {
    if surface + interior != total {
        return Err(Error::UnexpectedCount {
            what,
            expected: total,
            found: surface + interior,
        });
    }
    Ok(())
}
