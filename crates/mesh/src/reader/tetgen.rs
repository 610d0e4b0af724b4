//! Readers for tetgen `.node` and `.ele` output
//!
//! Both files start with a numeric header line and allow `#` comments
//! anywhere. Indices may start from 0 or 1 depending on how tetgen was run,
//! so the base is taken from the first record.

// crate modules
use crate::element::{Element, Location};
use crate::error::{Error, Result};
use crate::node::NodeSet;
use crate::reader::parsers::{is_record, parse_current, strip_comment, vector_of_f64, vector_of_usize};
use crate::topology::Topology;

// ffeatools modules
use ffeatools_utils::LineReader;

// standard library
use std::io::BufRead;

// external crates
use log::debug;
use nalgebra::Vector3;

/// Parse a tetgen node file
///
/// Header is `<num_points> <dimension> <num_attributes> <boundary_markers>`,
/// followed by `<id> <x> <y> <z> [attributes] [marker]` records. Every node is
/// treated as interior until the surface is known.
pub fn parse_tetgen_nodes<R: BufRead>(reader: &mut LineReader<R>) -> Result<NodeSet> {
    let header = next_record(reader, vector_of_usize)?;
    let (num_nodes, dimension) = match header[..] {
        [n, d, ..] => (n, d),
        _ => return Err(parse_error(reader)),
    };
    if dimension != 3 {
        return Err(Error::UnexpectedCount {
            what: "node dimensions",
            expected: 3,
            found: dimension,
        });
    }

    let mut positions = Vec::with_capacity(num_nodes);
    for _ in 0..num_nodes {
        let values = next_record(reader, vector_of_f64)?;
        match values[..] {
            [_, x, y, z, ..] => positions.push(Vector3::new(x, y, z)),
            _ => return Err(parse_error(reader)),
        }
    }

    debug!("Read {num_nodes} tetgen nodes");
    Ok(NodeSet::new(positions, 0))
}

/// Parse a tetgen element file
///
/// Header is `<num_tetrahedra> <nodes_per_tet> <num_attributes>`, followed by
/// `<id> <n1> ... <nN> [attributes]` records with 4 or 10 nodes each. All
/// elements are unclassified.
pub fn parse_tetgen_elements<R: BufRead>(reader: &mut LineReader<R>) -> Result<Topology> {
    let header = next_record(reader, vector_of_usize)?;
    let (num_elements, nodes_per_element) = match header[..] {
        [n, k, ..] => (n, k),
        _ => return Err(parse_error(reader)),
    };

    let mut topology = Topology::default();
    let mut base = None;

    for _ in 0..num_elements {
        let values = next_record(reader, vector_of_usize)?;
        if values.len() < nodes_per_element + 1 {
            return Err(parse_error(reader));
        }

        // first element id decides if indices start from 0 or 1
        let base = *base.get_or_insert(values[0]);
        let indices = values[1..=nodes_per_element]
            .iter()
            .map(|&n| n.checked_sub(base).ok_or_else(|| parse_error(reader)))
            .collect::<Result<Vec<usize>>>()?;

        let element = Element::from_indices(indices).map_err(|_| parse_error(reader))?;
        topology.add_element(element, Location::Unknown);
    }

    debug!("Read {num_elements} tetgen elements");
    Ok(topology)
}

/// Skip blank and comment lines, then parse the content of the next record
fn next_record<R, T, P>(reader: &mut LineReader<R>, mut parser: P) -> Result<T>
where
    R: BufRead,
    P: FnMut(&str) -> nom::IResult<&str, T>,
{
    reader.skip_until(is_record)?;
    parse_current(reader, |i| parser(strip_comment(i)))
}

fn parse_error<R: BufRead>(reader: &LineReader<R>) -> Error {
    Error::ParseError {
        line: reader.line_number(),
        text: reader.current().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_based_nodes() {
        let text = "# generated\n3 3 0 1\n1 0.0 0.0 0.0 1\n2 1.0 0.0 0.0 1\n\n3 0.0 1.0 0.0 0\n";
        let nodes = parse_tetgen_nodes(&mut LineReader::new(text.as_bytes())).unwrap();
        assert_eq!(nodes.num_nodes(), 3);
        assert_eq!(nodes.num_surface_nodes(), 0);
        assert_eq!(nodes.positions[2], Vector3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn two_dimensional_nodes() {
        let text = "1 2 0 0\n0 0.0 0.0\n";
        let result = parse_tetgen_nodes(&mut LineReader::new(text.as_bytes()));
        assert!(matches!(result, Err(Error::UnexpectedCount { .. })));
    }

    #[test]
    fn elements_with_base() {
        let text = "2 4 1\n  1 1 2 3 4 7\n  2 2 3 4 5 7 # region\n";
        let topology = parse_tetgen_elements(&mut LineReader::new(text.as_bytes())).unwrap();
        assert_eq!(topology.elements[0].nodes, vec![0, 1, 2, 3]);
        assert_eq!(topology.elements[1].nodes, vec![1, 2, 3, 4]);
        assert_eq!(topology.num_unknown_elements(), 2);
    }

    #[test]
    fn elements_zero_based() {
        let text = "1 4 0\n0 0 1 2 3\n";
        let topology = parse_tetgen_elements(&mut LineReader::new(text.as_bytes())).unwrap();
        assert_eq!(topology.elements[0].nodes, vec![0, 1, 2, 3]);
    }

    #[test]
    fn short_element_line() {
        let text = "1 4 0\n1 1 2 3\n";
        let result = parse_tetgen_elements(&mut LineReader::new(text.as_bytes()));
        assert!(matches!(result, Err(Error::ParseError { line: 2, .. })));
    }
}
