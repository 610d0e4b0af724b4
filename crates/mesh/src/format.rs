// crate modules
use crate::error::{Error, Result};

// ffeatools modules
use ffeatools_utils::{f, LineReader};

// standard library
use std::path::Path;

/// Mesh file formats, e.g. FFEA `.node`, tetgen `.ele`, netgen `.vol`...
///
/// Detected from the file extension, with the first line used to tell apart
/// formats that share an extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshFormat {
    /// FFEA node file (`.node`)
    ///
    /// ```text
    /// ffea node file
    /// num_nodes 8
    /// num_surface_nodes 8
    /// num_interior_nodes 0
    /// surface nodes:
    /// 0.000000e+00 0.000000e+00 0.000000e+00
    /// etc ...
    /// interior nodes:
    /// ```
    FfeaNode,
    /// FFEA topology file (`.top`)
    ///
    /// The legacy `walrus topology file` header is also accepted.
    ///
    /// ```text
    /// ffea topology file
    /// num_elements 5
    /// num_surface_elements 4
    /// num_interior_elements 1
    /// surface elements:
    /// 0 2 1 4
    /// etc ...
    /// interior elements:
    /// 2 1 4 7
    /// ```
    FfeaTopology,
    /// FFEA surface file (`.surf`)
    ///
    /// Every face is the owning element followed by three nodes.
    ///
    /// ```text
    /// ffea surface file
    /// num_surface_faces 12
    /// faces:
    /// 0 0 2 1
    /// etc ...
    /// ```
    FfeaSurface,
    /// tetgen node file (`.node`) with a numeric header
    ///
    /// ```text
    /// 8 3 0 0
    ///   1  0.0 0.0 0.0
    /// etc ...
    /// # Generated by tetgen
    /// ```
    TetgenNode,
    /// tetgen element file (`.ele`)
    ///
    /// ```text
    /// 5 4 0
    ///   1  1 3 2 5
    /// etc ...
    /// ```
    TetgenElement,
    /// netgen volume mesh (`.vol`), holding both points and elements
    ///
    /// ```text
    /// mesh3d
    /// etc ...
    /// volumeelements
    /// 5
    /// 1 4 1 3 2 5
    /// etc ...
    /// points
    /// 8
    /// 0.0 0.0 0.0
    /// ```
    NetgenVolume,
    /// netgen surface mesh export (`.surf` with a `surfacemesh` keyword)
    ///
    /// ```text
    /// surfacemesh
    /// 3
    /// 0.0 0.0 0.0
    /// etc ...
    /// 1
    /// 1 2 3
    /// ```
    NetgenSurface,
}

impl MeshFormat {
    /// Detect the format of a file from its extension and first line
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_lowercase();

        match extension.as_str() {
            "node" => match first_line(path)?.as_str() {
                "ffea node file" => Ok(Self::FfeaNode),
                _ => Ok(Self::TetgenNode),
            },
            "surf" => match first_line(path)?.as_str() {
                "surfacemesh" => Ok(Self::NetgenSurface),
                _ => Ok(Self::FfeaSurface),
            },
            "top" => Ok(Self::FfeaTopology),
            "ele" => Ok(Self::TetgenElement),
            "vol" => Ok(Self::NetgenVolume),
            _ => Err(Error::UnknownExtension(f!("{}", path.display()))),
        }
    }

    /// True for formats carrying node positions
    pub fn has_nodes(&self) -> bool {
        matches!(self, Self::FfeaNode | Self::TetgenNode | Self::NetgenVolume)
    }

    /// True for formats carrying element connectivity
    pub fn has_elements(&self) -> bool {
        matches!(
            self,
            Self::FfeaTopology | Self::TetgenElement | Self::NetgenVolume
        )
    }
}

impl std::fmt::Display for MeshFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            Self::FfeaNode => "FFEA node",
            Self::FfeaTopology => "FFEA topology",
            Self::FfeaSurface => "FFEA surface",
            Self::TetgenNode => "tetgen node",
            Self::TetgenElement => "tetgen element",
            Self::NetgenVolume => "netgen volume",
            Self::NetgenSurface => "netgen surface",
        };
        write!(f, "{name}")
    }
}

/// First non-blank line, trimmed
fn first_line(path: &Path) -> Result<String> {
    let mut reader = LineReader::open(path)?;
    Ok(reader.next_content()?.trim().to_string())
}
