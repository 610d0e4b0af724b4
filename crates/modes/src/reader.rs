//! Readers for pyPca `.evals` and `.evecs` files

// crate modules
use crate::error::{Error, Result};

// ffeatools modules
use ffeatools_utils::LineReader;

// standard library
use std::io::BufRead;
use std::path::Path;

// external crates
use log::{debug, info};
use nalgebra::DVector;
use nom::character::complete::space0;
use nom::combinator::all_consuming;
use nom::multi::many1;
use nom::number::complete::double;
use nom::sequence::{preceded, terminated};
use nom::IResult;

/// Thermal energy used to turn spring constants into mean square fluctuations
pub const THERMAL_ENERGY: f64 = 0.411;

/// Read eigenvalues, one per line
///
/// Files holding spring constants rather than fluctuations are recognised by
/// a first value below 1.0, and every value `k` is converted to
/// `THERMAL_ENERGY / k` so that both kinds can be compared in Å².
pub fn read_evals<P: AsRef<Path>>(path: P) -> Result<Vec<f64>> {
    let path = path.as_ref();
    info!("Reading eigenvalues from {}", path.display());
    parse_evals(&mut LineReader::open(path)?)
}

/// Read eigenvectors, one whitespace separated vector per line
pub fn read_evecs<P: AsRef<Path>>(path: P) -> Result<Vec<DVector<f64>>> {
    let path = path.as_ref();
    info!("Reading eigenvectors from {}", path.display());
    parse_evecs(&mut LineReader::open(path)?)
}

/// Parse the contents of an `.evals` file
pub fn parse_evals<R: BufRead>(reader: &mut LineReader<R>) -> Result<Vec<f64>> {
    let mut values = parse_records(reader, single_value)?;
    match values.first() {
        None => return Err(Error::Empty("eigenvalues")),
        Some(&first) if first < 1.0 => {
            debug!("Converting {} spring constants to fluctuations", values.len());
            values.iter_mut().for_each(|k| *k = THERMAL_ENERGY / *k);
        }
        Some(_) => (),
    }
    Ok(values)
}

/// Parse the contents of an `.evecs` file
///
/// Every vector must have the same number of components.
pub fn parse_evecs<R: BufRead>(reader: &mut LineReader<R>) -> Result<Vec<DVector<f64>>> {
    let vectors = parse_records(reader, value_list)?;
    let dimension = vectors.first().ok_or(Error::Empty("eigenvectors"))?.len();

    if let Some(v) = vectors.iter().find(|v| v.len() != dimension) {
        return Err(Error::UnexpectedCount {
            what: "eigenvector components",
            expected: dimension,
            found: v.len(),
        });
    }

    debug!("Read {} eigenvectors of dimension {dimension}", vectors.len());
    Ok(vectors.into_iter().map(DVector::from_vec).collect())
}

/// Apply a parser to every non-blank line until the end of the file
fn parse_records<R, T, P>(reader: &mut LineReader<R>, mut parser: P) -> Result<Vec<T>>
where
    R: BufRead,
    P: FnMut(&str) -> IResult<&str, T>,
{
    let mut records = Vec::new();
    loop {
        let line = match reader.next_content() {
            Ok(line) => line,
            Err(ffeatools_utils::Error::EndOfFile) => break,
            Err(e) => return Err(e.into()),
        };
        match parser(line).ok().map(|(_, record)| record) {
            Some(record) => records.push(record),
            None => {
                return Err(Error::ParseError {
                    line: reader.line_number(),
                    text: reader.current().to_string(),
                })
            }
        }
    }
    Ok(records)
}

fn single_value(i: &str) -> IResult<&str, f64> {
    all_consuming(terminated(preceded(space0, double), space0))(i)
}

fn value_list(i: &str) -> IResult<&str, Vec<f64>> {
    all_consuming(terminated(many1(preceded(space0, double)), space0))(i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fluctuations_are_kept() {
        let text = "4.0\n2.0\n\n1.0\n";
        let values = parse_evals(&mut LineReader::new(text.as_bytes())).unwrap();
        assert_eq!(values, vec![4.0, 2.0, 1.0]);
    }

    #[test]
    fn spring_constants_are_converted() {
        let text = "0.411\n0.2055\n";
        let values = parse_evals(&mut LineReader::new(text.as_bytes())).unwrap();
        assert!((values[0] - 1.0).abs() < 1e-12);
        assert!((values[1] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn bad_lines() {
        let text = "1.0\n2.0 3.0\n";
        let result = parse_evals(&mut LineReader::new(text.as_bytes()));
        assert!(matches!(result, Err(Error::ParseError { line: 2, .. })));

        let result = parse_evals(&mut LineReader::new("\n".as_bytes()));
        assert!(matches!(result, Err(Error::Empty(_))));
    }

    #[test]
    fn ragged_vectors() {
        let text = "1 0 0\n0 1\n";
        let result = parse_evecs(&mut LineReader::new(text.as_bytes()));
        assert!(matches!(
            result,
            Err(Error::UnexpectedCount {
                expected: 3,
                found: 2,
                ..
            })
        ));
    }
}
