//! Convert meshes to VTK formats for plotting
//!
//! Topologies become unstructured grids of `Tetra` or `QuadraticTetra` cells,
//! and surfaces become unstructured grids of `Triangle` cells.
//!
//! ```rust, no_run
//! # use ffeatools_mesh::{read_nodes, read_topology};
//! # use ffeatools_mesh::vtk::{write_vtk, TopologyToVtk, VtkFormat};
//! let nodes = read_nodes("./data/cube.node").unwrap();
//! let topology = read_topology("./data/cube.top").unwrap();
//!
//! // tag each cell with its surface/interior location and volume
//! let converter = TopologyToVtk::builder()
//!     .include_location(true)
//!     .include_size(true)
//!     .build();
//!
//! let vtk = converter.convert(&nodes, &topology).unwrap();
//! write_vtk(vtk, "./cube.vtu", VtkFormat::Xml).unwrap();
//! ```

mod builder;
mod convert;

#[doc(inline)]
pub use builder::TopologyToVtkBuilder;
#[doc(inline)]
pub use convert::TopologyToVtk;

// crate modules
use crate::error::Result;
use crate::node::NodeSet;
use crate::surface::Surface;
use crate::topology::Topology;

// standard library
use std::path::Path;

// external crates
use log::info;
use vtkio::Vtk;

/// Output file formats for VTK data
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum VtkFormat {
    /// XML unstructured grid (`.vtu`)
    #[default]
    Xml,
    /// Legacy ASCII text (`.vtk`)
    LegacyAscii,
    /// Legacy big endian binary (`.vtk`)
    LegacyBinary,
}

impl VtkFormat {
    /// Conventional file extension
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Xml => "vtu",
            Self::LegacyAscii | Self::LegacyBinary => "vtk",
        }
    }
}

/// Convert a topology to VTK with the default configuration
pub fn topology_to_vtk(nodes: &NodeSet, topology: &Topology) -> Result<Vtk> {
    TopologyToVtk::default().convert(nodes, topology)
}

/// Convert a surface to VTK with the default configuration
pub fn surface_to_vtk(nodes: &NodeSet, surface: &Surface) -> Result<Vtk> {
    TopologyToVtk::default().convert_surface(nodes, surface)
}

/// Write a Vtk to file in the chosen format
///
/// The extension is replaced with the conventional one for the format, since
/// the XML writer decides the file type from it.
pub fn write_vtk<P: AsRef<Path>>(vtk: Vtk, path: P, format: VtkFormat) -> Result<()> {
    let path = path.as_ref().with_extension(format.extension());
    info!("Writing {}", path.display());

    match format {
        VtkFormat::Xml => vtk.export(&path)?,
        VtkFormat::LegacyAscii => vtk.export_ascii(&path)?,
        VtkFormat::LegacyBinary => vtk.export_be(&path)?,
    }
    Ok(())
}
