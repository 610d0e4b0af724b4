//! Tetrahedral mesh tools and file parsing for FFEA blobs
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod element;
mod error;
mod face;
mod format;
mod node;
mod surface;
mod topology;
mod writer;

pub mod reader;
pub mod vtk;

// inline important the mesh-related modules for a nice public API
#[doc(inline)]
pub use reader::{read_netgen_surface, read_nodes, read_pdb_centroid, read_surface, read_topology};

#[doc(inline)]
pub use writer::{
    surface_to_obj, write_netgen_vol, write_nodes, write_obj, write_surface, write_topology,
    DEFAULT_PRECISION,
};

#[doc(inline)]
pub use element::{Element, Location, Order, EDGES, FACES};

#[doc(inline)]
pub use face::Face;

#[doc(inline)]
pub use format::MeshFormat;

#[doc(inline)]
pub use node::NodeSet;

#[doc(inline)]
pub use surface::{Surface, TriangleMesh};

#[doc(inline)]
pub use topology::{Elevation, MeshSummary, Topology};

#[doc(inline)]
pub use vtk::{write_vtk, TopologyToVtk, VtkFormat};

#[doc(inline)]
pub use error::{Error, Result};
