//! Per-node hydrodynamic radii

// crate modules
use crate::error::{Error, Result};
use crate::io::{init_writer, open_reader};

// ffeatools modules
use ffeatools_mesh::reader::parsers::{expect_header, header_count, parse_next, single_f64};
use ffeatools_mesh::Elevation;
use ffeatools_utils::{FloatExt, LineReader, PermuteExt};

// standard library
use std::io::{BufRead, Write};
use std::path::Path;

// external crates
use log::debug;

/// Stokes drag radius of every node
///
/// ```text
/// ffea stokes radii file
/// num_nodes 8
/// 5.000000e-01
/// ...
/// ```
///
/// Second order nodes added by
/// [Topology::increase_order](ffeatools_mesh::Topology::increase_order) do not
/// feel any drag, so they get a radius of zero.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StokesRadii {
    /// Radius of each node, in node order
    pub radii: Vec<f64>,
}

impl StokesRadii {
    /// The same radius for every node
    pub fn uniform(num_nodes: usize, radius: f64) -> Self {
        Self {
            radii: vec![radius; num_nodes],
        }
    }

    /// Read a `.stokes` file
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::parse(&mut open_reader(path.as_ref())?)
    }

    /// Parse the contents of a `.stokes` file
    pub fn parse<R: BufRead>(reader: &mut LineReader<R>) -> Result<Self> {
        expect_header(reader, &["ffea stokes radii file"])?;
        let num_nodes = parse_next(reader, |i| header_count(i, "num_nodes"))?;
        let radii = (0..num_nodes)
            .map(|_| parse_next(reader, single_f64))
            .collect::<ffeatools_mesh::Result<Vec<f64>>>()?;
        Ok(Self { radii })
    }

    /// Write to a `.stokes` file
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = init_writer(path.as_ref())?;
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writeln!(writer, "ffea stokes radii file")?;
        writeln!(writer, "num_nodes {}", self.num_nodes())?;
        for radius in &self.radii {
            writeln!(writer, "{}", radius.sci(6, 2))?;
        }
        Ok(())
    }

    /// Number of nodes
    pub fn num_nodes(&self) -> usize {
        self.radii.len()
    }

    /// Append a radius for a new node
    pub fn add_node(&mut self, radius: f64) {
        self.radii.push(radius);
    }

    /// Follow an order elevation of the topology
    ///
    /// Any padding between the current node count and the first new node is
    /// filled with zero radii, followed by a zero radius per new mid-edge
    /// node.
    pub fn extend_elevated(&mut self, elevation: &Elevation) -> Result<()> {
        if self.num_nodes() > elevation.first_node {
            return Err(Error::UnexpectedCount {
                what: "stokes radii",
                expected: elevation.first_node,
                found: self.num_nodes(),
            });
        }
        let total = elevation.first_node + elevation.num_new_nodes();
        debug!("Extending stokes radii from {} to {total}", self.num_nodes());
        self.radii.resize(total, 0.0);
        Ok(())
    }

    /// Follow a node reordering with an old-to-new map
    pub fn permute(&mut self, map: &[usize]) -> Result<()> {
        let radii = std::mem::take(&mut self.radii);
        self.radii = radii.permute(map)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_file() {
        let text = "ffea stokes radii file\nnum_nodes 2\n5.000000e-01\n0.0\n";
        let stokes = StokesRadii::parse(&mut LineReader::new(text.as_bytes())).unwrap();
        assert_eq!(stokes.radii, vec![0.5, 0.0]);
    }

    #[test]
    fn write_file() {
        let mut buffer = Vec::new();
        StokesRadii::uniform(2, 0.5).write_to(&mut buffer).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "ffea stokes radii file\nnum_nodes 2\n5.000000e-01\n5.000000e-01\n"
        );
    }

    #[test]
    fn elevation() {
        let elevation = Elevation {
            first_node: 4,
            edges: vec![(0, 1), (0, 2)],
        };

        let mut stokes = StokesRadii::uniform(3, 1.0);
        stokes.extend_elevated(&elevation).unwrap();
        assert_eq!(stokes.radii, vec![1.0, 1.0, 1.0, 0.0, 0.0, 0.0]);

        let mut stokes = StokesRadii::uniform(5, 1.0);
        assert!(stokes.extend_elevated(&elevation).is_err());
    }

    #[test]
    fn permute() {
        let mut stokes = StokesRadii {
            radii: vec![1.0, 2.0, 3.0],
        };
        stokes.permute(&[2, 0, 1]).unwrap();
        assert_eq!(stokes.radii, vec![2.0, 3.0, 1.0]);
    }
}
