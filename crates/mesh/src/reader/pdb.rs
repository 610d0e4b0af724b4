//! Reader for atom positions in PDB files

// crate modules
use crate::error::{Error, Result};
use crate::reader::parsers::is_atom;

// ffeatools modules
use ffeatools_utils::{f, LineReader};

// standard library
use std::io::BufRead;

// external crates
use log::debug;
use nalgebra::Vector3;

/// Centroid of every `ATOM` record
///
/// Coordinates are taken from the fixed columns 31-38, 39-46 and 47-54. An
/// error is returned if there are no atom records at all.
pub fn parse_pdb_centroid<R: BufRead>(reader: &mut LineReader<R>) -> Result<Vector3<f64>> {
    let mut sum = Vector3::zeros();
    let mut count = 0_usize;

    loop {
        let line = match reader.next_line() {
            Ok(line) => line,
            Err(ffeatools_utils::Error::EndOfFile) => break,
            Err(e) => return Err(e.into()),
        };
        if !is_atom(line) {
            continue;
        }
        match atom_position(line) {
            Some(position) => sum += position,
            None => {
                return Err(Error::ParseError {
                    line: reader.line_number(),
                    text: reader.current().to_string(),
                })
            }
        }
        count += 1;
    }

    if count == 0 {
        return Err(Error::NoAtoms(f!("input ({} lines)", reader.line_number())));
    }

    debug!("Averaged {count} atom positions");
    Ok(sum / count as f64)
}

/// Position from the fixed-width coordinate columns
fn atom_position(line: &str) -> Option<Vector3<f64>> {
    let column = |start: usize, end: usize| -> Option<f64> {
        line.get(start..end)?.trim().parse().ok()
    };
    Some(Vector3::new(
        column(30, 38)?,
        column(38, 46)?,
        column(46, 54)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ATOMS: &str = "\
HEADER    TEST
ATOM      1  N   MET A   1       1.000   2.000   3.000  1.00  0.00           N
HETATM    2  O   HOH A   2      99.000  99.000  99.000  1.00  0.00           O
ATOM      3  CA  MET A   1       3.000   4.000   5.000  1.00  0.00           C
END
";

    #[test]
    fn centroid_of_atoms() {
        let centroid = parse_pdb_centroid(&mut LineReader::new(ATOMS.as_bytes())).unwrap();
        assert_eq!(centroid, Vector3::new(2.0, 3.0, 4.0));
    }

    #[test]
    fn no_atoms() {
        let result = parse_pdb_centroid(&mut LineReader::new("HEADER\nEND\n".as_bytes()));
        assert!(matches!(result, Err(Error::NoAtoms(_))));
    }

    #[test]
    fn short_atom_line() {
        let result = parse_pdb_centroid(&mut LineReader::new("ATOM  1  N\n".as_bytes()));
        assert!(matches!(result, Err(Error::ParseError { line: 1, .. })));
    }
}
