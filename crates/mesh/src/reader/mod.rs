//! Parsers and logic for reading mesh files
//!
//! All functions are re-exported to the crate root for easy access.
//!
//! # Quickstart
//!
//! Formats are detected from the file extension, so the same call reads an
//! FFEA, tetgen or netgen mesh.
//!
//! ```rust, no_run
//! # use ffeatools_mesh::{read_nodes, read_surface, read_topology};
//! // FFEA blob files
//! let nodes = read_nodes("/path/to/blob.node").unwrap();
//! let topology = read_topology("/path/to/blob.top").unwrap();
//! let surface = read_surface("/path/to/blob.surf").unwrap();
//!
//! // a netgen volume holds both parts
//! let nodes = read_nodes("/path/to/mesh.vol").unwrap();
//! let topology = read_topology("/path/to/mesh.vol").unwrap();
//! ```
//!
//! The `parse_*` functions are public for reading from anything implementing
//! `BufRead`, which is mostly useful for in-memory text.
//!
//! ```rust
//! # use ffeatools_mesh::reader::parse_ffea_surface;
//! # use ffeatools_utils::LineReader;
//! let text = "ffea surface file\nnum_surface_faces 1\nfaces:\n0 0 1 2\n";
//! let surface = parse_ffea_surface(&mut LineReader::new(text.as_bytes())).unwrap();
//! assert_eq!(surface.num_faces(), 1);
//! ```
//!
//! # Formatting notes
//!
//! **Counts are checked**
//!
//! > Headers declaring a number of records are checked against the file, and
//! > anything inconsistent or truncated is an error rather than a partial
//! > mesh.
//!
//! **Indexing is converted**
//!
//! > netgen indices are 1-based. tetgen indices follow the first record, so
//! > both `-z` and default output are handled. Everything is 0-based once
//! > read.
//!
//! **Unclassified elements**
//!
//! > Only the FFEA topology format records which elements are on the surface.
//! > Elements from other formats are [Location::Unknown](crate::Location)
//! > and every node is interior until the surface is extracted and the nodes
//! > partitioned.

// reader modules
mod ffea;
mod netgen;
pub mod parsers;
mod pdb;
mod tetgen;

// re-exports for clean API + documentation
#[doc(inline)]
pub use ffea::{parse_ffea_nodes, parse_ffea_surface, parse_ffea_topology, TOPOLOGY_HEADERS};
#[doc(inline)]
pub use netgen::{parse_netgen_elements, parse_netgen_points, parse_netgen_surface};
#[doc(inline)]
pub use pdb::parse_pdb_centroid;
#[doc(inline)]
pub use tetgen::{parse_tetgen_elements, parse_tetgen_nodes};

// library imports
use crate::error::{Error, Result};
use crate::format::MeshFormat;
use crate::{NodeSet, Surface, Topology, TriangleMesh};
use ffeatools_utils::{f, LineReader};
use log::info;
use nalgebra::Vector3;
use std::path::Path;

/// Read node positions from an FFEA, tetgen or netgen file
///
/// - `path` - Path to a `.node` or `.vol` file
///
/// Example
/// ```rust, no_run
/// # use ffeatools_mesh::read_nodes;
/// let nodes = read_nodes("path/to/blob.node").unwrap();
/// println!("centroid = {}", nodes.centroid());
/// ```
pub fn read_nodes<P: AsRef<Path>>(path: P) -> Result<NodeSet> {
    let path = path.as_ref();
    let format = MeshFormat::from_path(path)?;
    info!("Reading {format} file {}", path.display());

    let mut reader = LineReader::open(path)?;
    match format {
        MeshFormat::FfeaNode => parse_ffea_nodes(&mut reader),
        MeshFormat::TetgenNode => parse_tetgen_nodes(&mut reader),
        MeshFormat::NetgenVolume => parse_netgen_points(&mut reader),
        _ => Err(wrong_content(path, format, "nodes")),
    }
}

/// Read element connectivity from an FFEA, tetgen or netgen file
///
/// - `path` - Path to a `.top`, `.ele` or `.vol` file
///
/// Example
/// ```rust, no_run
/// # use ffeatools_mesh::read_topology;
/// let topology = read_topology("path/to/blob.top").unwrap();
/// println!("{} interior elements", topology.num_interior_elements());
/// ```
pub fn read_topology<P: AsRef<Path>>(path: P) -> Result<Topology> {
    let path = path.as_ref();
    let format = MeshFormat::from_path(path)?;
    info!("Reading {format} file {}", path.display());

    let mut reader = LineReader::open(path)?;
    match format {
        MeshFormat::FfeaTopology => parse_ffea_topology(&mut reader),
        MeshFormat::TetgenElement => parse_tetgen_elements(&mut reader),
        MeshFormat::NetgenVolume => parse_netgen_elements(&mut reader),
        _ => Err(wrong_content(path, format, "elements")),
    }
}

/// Read an FFEA surface file
///
/// - `path` - Path to a `.surf` file with the `ffea surface file` header
pub fn read_surface<P: AsRef<Path>>(path: P) -> Result<Surface> {
    let path = path.as_ref();
    let format = MeshFormat::from_path(path)?;
    info!("Reading {format} file {}", path.display());

    match format {
        MeshFormat::FfeaSurface => parse_ffea_surface(&mut LineReader::open(path)?),
        _ => Err(wrong_content(path, format, "surface faces")),
    }
}

/// Read a netgen `surfacemesh` file into a standalone triangle mesh
///
/// The extension is not checked, since these are often saved as `.surf`
/// alongside FFEA surface files.
pub fn read_netgen_surface<P: AsRef<Path>>(path: P) -> Result<TriangleMesh> {
    let path = path.as_ref();
    info!("Reading netgen surface file {}", path.display());
    parse_netgen_surface(&mut LineReader::open(path)?)
}

/// Centroid of every `ATOM` record in a PDB file
pub fn read_pdb_centroid<P: AsRef<Path>>(path: P) -> Result<Vector3<f64>> {
    let path = path.as_ref();
    info!("Reading atoms from {}", path.display());
    parse_pdb_centroid(&mut LineReader::open(path)?).map_err(|e| match e {
        Error::NoAtoms(_) => Error::NoAtoms(f!("{}", path.display())),
        e => e,
    })
}

fn wrong_content(path: &Path, format: MeshFormat, what: &'static str) -> Error {
    Error::MissingContent {
        path: f!("{}", path.display()),
        format: format.to_string(),
        what,
    }
}
