//! Van der Waals face activation

// crate modules
use crate::error::{Error, Result};
use crate::io::{init_writer, open_reader};

// ffeatools modules
use ffeatools_mesh::reader::parsers::{expect_header, header_count, label, parse_next, single_i32};
use ffeatools_mesh::{NodeSet, Surface};
use ffeatools_utils::LineReader;

// standard library
use std::io::{BufRead, Write};
use std::path::Path;

// external crates
use log::{debug, warn};
use nalgebra::Vector3;

/// Face type of an inactive face
pub const INACTIVE: i32 = -1;

/// Per-face van der Waals interaction types
///
/// Every surface face of a blob has an interaction type, with `-1` meaning the
/// face does not take part in van der Waals interactions at all.
///
/// ```text
/// ffea vdw file
/// num_faces 12
/// vdw params:
/// -1
/// 0
/// ...
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VdwFile {
    /// Interaction type of each face, in surface order
    pub types: Vec<i32>,
}

impl VdwFile {
    /// Every face inactive
    pub fn new(num_faces: usize) -> Self {
        Self {
            types: vec![INACTIVE; num_faces],
        }
    }

    /// Read a `.vdw` file
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::parse(&mut open_reader(path.as_ref())?)
    }

    /// Parse the contents of a `.vdw` file
    pub fn parse<R: BufRead>(reader: &mut LineReader<R>) -> Result<Self> {
        expect_header(reader, &["ffea vdw file"])?;
        let num_faces = parse_next(reader, |i| header_count(i, "num_faces"))?;
        parse_next(reader, |i| label(i, "vdw params:"))?;

        let types = (0..num_faces)
            .map(|_| parse_next(reader, single_i32))
            .collect::<ffeatools_mesh::Result<Vec<i32>>>()?;

        debug!("Read {num_faces} vdw face types");
        Ok(Self { types })
    }

    /// Write to a `.vdw` file
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = init_writer(path.as_ref())?;
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writeln!(writer, "ffea vdw file")?;
        writeln!(writer, "num_faces {}", self.num_faces())?;
        writeln!(writer, "vdw params:")?;
        for kind in &self.types {
            writeln!(writer, "{kind}")?;
        }
        Ok(())
    }

    /// Number of faces
    pub fn num_faces(&self) -> usize {
        self.types.len()
    }

    /// Number of faces with an interaction type
    pub fn num_active(&self) -> usize {
        self.types.iter().filter(|&&t| t != INACTIVE).count()
    }

    /// Set the interaction type of a single face
    pub fn set_index(&mut self, face: usize, kind: i32) -> Result<()> {
        let length = self.num_faces();
        let slot = self.types.get_mut(face).ok_or(Error::IndexOutOfRange {
            what: "vdw faces",
            index: face,
            length,
        })?;
        *slot = kind;
        Ok(())
    }

    /// Activate every face on one side of a plane
    ///
    /// A face is activated with `kind` when the vector from `point` to its
    /// centroid has a non-negative component along `normal`. Faces on the
    /// other side keep their current type.
    ///
    /// A surface with a different number of faces to the file is only a
    /// warning, and only faces present in both are considered. Returns the
    /// number of faces set.
    pub fn activate_halfspace(
        &mut self,
        surface: &Surface,
        nodes: &NodeSet,
        normal: Vector3<f64>,
        point: Vector3<f64>,
        kind: i32,
    ) -> Result<usize> {
        if surface.num_faces() != self.num_faces() {
            warn!(
                "Surface has {} faces but the vdw file has {}",
                surface.num_faces(),
                self.num_faces()
            );
        }

        let mut count = 0;
        for (face, slot) in surface.faces.iter().zip(self.types.iter_mut()) {
            if (face.centroid(nodes)? - point).dot(&normal) >= 0.0 {
                *slot = kind;
                count += 1;
            }
        }

        debug!("Activated {count} faces with type {kind}");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_file() {
        let text = "ffea vdw file\nnum_faces 3\nvdw params:\n-1\n0\n2\n";
        let vdw = VdwFile::parse(&mut LineReader::new(text.as_bytes())).unwrap();
        assert_eq!(vdw.types, vec![-1, 0, 2]);
        assert_eq!(vdw.num_active(), 2);
    }

    #[test]
    fn short_file() {
        let text = "ffea vdw file\nnum_faces 3\nvdw params:\n-1\n0\n";
        let result = VdwFile::parse(&mut LineReader::new(text.as_bytes()));
        assert!(matches!(
            result,
            Err(Error::MeshError(ffeatools_mesh::Error::UnexpectedEof))
        ));
    }

    #[test]
    fn write_file() {
        let mut vdw = VdwFile::new(2);
        vdw.set_index(1, 3).unwrap();
        assert!(vdw.set_index(2, 0).is_err());

        let mut buffer = Vec::new();
        vdw.write_to(&mut buffer).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "ffea vdw file\nnum_faces 2\nvdw params:\n-1\n3\n"
        );
    }
}
