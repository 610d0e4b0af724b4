//! Readers for netgen volume meshes and surface meshes

// crate modules
use crate::element::{Element, Location};
use crate::error::{Error, Result};
use crate::node::NodeSet;
use crate::reader::parsers::{
    coordinate_array, is_keyword, parse_next, single_usize, vector_of_usize,
};
use crate::surface::TriangleMesh;
use crate::topology::Topology;

// ffeatools modules
use ffeatools_utils::LineReader;

// standard library
use std::io::BufRead;

// external crates
use log::debug;
use nalgebra::Vector3;

/// Parse the `points` section of a netgen `.vol` file
///
/// Everything before the section is skipped. All nodes are interior until
/// the surface is known.
pub fn parse_netgen_points<R: BufRead>(reader: &mut LineReader<R>) -> Result<NodeSet> {
    reader.skip_until(|l| is_keyword(l, "points"))?;
    let num_nodes = parse_next(reader, single_usize)?;

    let mut positions = Vec::with_capacity(num_nodes);
    for _ in 0..num_nodes {
        let [x, y, z] = parse_next(reader, coordinate_array)?;
        positions.push(Vector3::new(x, y, z));
    }

    debug!("Read {num_nodes} netgen points");
    Ok(NodeSet::new(positions, 0))
}

/// Parse the `volumeelements` section of a netgen `.vol` file
///
/// Records are `<matnr> <np> <p1> ... <pnp>` with 1-based node indices.
pub fn parse_netgen_elements<R: BufRead>(reader: &mut LineReader<R>) -> Result<Topology> {
    reader.skip_until(|l| is_keyword(l, "volumeelements"))?;
    let num_elements = parse_next(reader, single_usize)?;

    let mut topology = Topology::default();
    for _ in 0..num_elements {
        let values = parse_next(reader, vector_of_usize)?;
        let element = match values[..] {
            [_, np, ref rest @ ..] if rest.len() == np => rest
                .iter()
                .map(|&n| n.checked_sub(1))
                .collect::<Option<Vec<usize>>>()
                .and_then(|indices| Element::from_indices(indices).ok()),
            _ => None,
        };
        match element {
            Some(element) => topology.add_element(element, Location::Unknown),
            None => {
                return Err(Error::ParseError {
                    line: reader.line_number(),
                    text: reader.current().to_string(),
                })
            }
        }
    }

    debug!("Read {num_elements} netgen volume elements");
    Ok(topology)
}

/// Parse a netgen `surfacemesh` export
///
/// One keyword line, then a point count and points, then a triangle count
/// and 1-based triangles. Indices are converted to 0-based.
pub fn parse_netgen_surface<R: BufRead>(reader: &mut LineReader<R>) -> Result<TriangleMesh> {
    reader.next_content()?;

    let num_points = parse_next(reader, single_usize)?;
    let mut points = Vec::with_capacity(num_points);
    for _ in 0..num_points {
        let [x, y, z] = parse_next(reader, coordinate_array)?;
        points.push(Vector3::new(x, y, z));
    }

    let num_triangles = parse_next(reader, single_usize)?;
    let mut triangles = Vec::with_capacity(num_triangles);
    for _ in 0..num_triangles {
        let values = parse_next(reader, vector_of_usize)?;
        match values[..] {
            [a, b, c] if a > 0 && b > 0 && c > 0 => triangles.push([a - 1, b - 1, c - 1]),
            _ => {
                return Err(Error::ParseError {
                    line: reader.line_number(),
                    text: reader.current().to_string(),
                })
            }
        }
    }

    if let Some(index) = triangles.iter().flatten().copied().find(|&n| n >= num_points) {
        return Err(Error::IndexOutOfRange {
            what: "surface points",
            index,
            length: num_points,
        });
    }

    debug!("Read netgen surface with {num_points} points and {num_triangles} triangles");
    Ok(TriangleMesh { points, triangles })
}
