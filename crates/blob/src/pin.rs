//! Pinned node files

// crate modules
use crate::error::{Error, Result};
use crate::io::{init_writer, open_reader};
use crate::region::Region;

// ffeatools modules
use ffeatools_mesh::reader::parsers::{
    expect_header, header_count, label, parse_next, single_usize,
};
use ffeatools_mesh::NodeSet;
use ffeatools_utils::LineReader;

// standard library
use std::io::{BufRead, Write};
use std::path::Path;

// external crates
use itertools::Itertools;
use log::debug;

/// Nodes held fixed during a simulation
///
/// ```text
/// ffea pinned nodes file
/// num_pinned_nodes 2
/// pinned nodes:
/// 0
/// 5
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PinFile {
    /// Indices of the pinned nodes
    pub nodes: Vec<usize>,
}

impl PinFile {
    /// Pin every node of a blob with `num_nodes` nodes
    pub fn all(num_nodes: usize) -> Self {
        Self {
            nodes: (0..num_nodes).collect(),
        }
    }

    /// Pin every node strictly inside a region
    pub fn from_region(nodes: &NodeSet, region: &Region) -> Self {
        let nodes = region.select(nodes);
        debug!("{} nodes inside the pinning region", nodes.len());
        Self { nodes }
    }

    /// Read a `.pin` file
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::parse(&mut open_reader(path.as_ref())?)
    }

    /// Parse the contents of a `.pin` file
    pub fn parse<R: BufRead>(reader: &mut LineReader<R>) -> Result<Self> {
        expect_header(reader, &["ffea pinned nodes file"])?;
        let num_pinned = parse_next(reader, |i| header_count(i, "num_pinned_nodes"))?;
        parse_next(reader, |i| label(i, "pinned nodes:"))?;

        let nodes = (0..num_pinned)
            .map(|_| parse_next(reader, single_usize))
            .collect::<ffeatools_mesh::Result<Vec<usize>>>()?;
        Ok(Self { nodes })
    }

    /// Write to a `.pin` file
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = init_writer(path.as_ref())?;
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writeln!(writer, "ffea pinned nodes file")?;
        writeln!(writer, "num_pinned_nodes {}", self.num_pinned_nodes())?;
        writeln!(writer, "pinned nodes:")?;
        for node in &self.nodes {
            writeln!(writer, "{node}")?;
        }
        Ok(())
    }

    /// Number of pinned nodes
    pub fn num_pinned_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Add more nodes, keeping the list free of duplicates
    pub fn extend<I: IntoIterator<Item = usize>>(&mut self, nodes: I) {
        self.nodes.extend(nodes);
        self.nodes = self.nodes.iter().copied().unique().collect();
    }

    /// Check every pinned node exists in a blob with `num_nodes` nodes
    pub fn check(&self, num_nodes: usize) -> Result<()> {
        match self.nodes.iter().find(|&&n| n >= num_nodes) {
            Some(&index) => Err(Error::IndexOutOfRange {
                what: "nodes",
                index,
                length: num_nodes,
            }),
            None => Ok(()),
        }
    }

    /// Follow a node renumbering, e.g. after partitioning surface nodes
    pub fn renumber(&mut self, map: &[usize]) -> Result<()> {
        self.check(map.len())?;
        self.nodes.iter_mut().for_each(|n| *n = map[*n]);
        Ok(())
    }
}
