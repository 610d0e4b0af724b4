//! Library of parser functions for trajectory lines

// nom parser combinators
use nom::bytes::complete::tag;
use nom::character::complete::{char, space0, space1};
use nom::combinator::{all_consuming, map_res, opt};
use nom::multi::many1;
use nom::number::complete::double;
use nom::sequence::{delimited, preceded, terminated, tuple};
use nom::IResult;

/// Identifiers from a frame header line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FrameHeader {
    pub blob: usize,
    pub conformation: Option<usize>,
    pub step: u64,
}

/// Check for the separator written between frames
pub(crate) fn is_separator(i: &str) -> bool {
    i.trim() == "*"
}

/// Check for a frame without any node data
pub(crate) fn is_static(i: &str) -> bool {
    i.trim() == "STATIC"
}

/// Check for the optional marker ahead of the node count
pub(crate) fn is_dynamic(i: &str) -> bool {
    i.trim() == "DYNAMIC"
}

fn usize_value(i: &str) -> IResult<&str, usize> {
    map_res(nom::character::complete::u64, |n: u64| usize::try_from(n))(i)
}

fn comma(i: &str) -> IResult<&str, char> {
    delimited(space0, char(','), space0)(i)
}

/// Parse `Blob 0, step 100` or `Blob 0, Conformation 1, step 100`
pub(crate) fn frame_header(i: &str) -> IResult<&str, FrameHeader> {
    let (i, _) = tuple((space0, tag("Blob"), space1))(i)?;
    let (i, blob) = terminated(usize_value, comma)(i)?;
    let (i, conformation) = opt(terminated(
        preceded(tuple((tag("Conformation"), space1)), usize_value),
        comma,
    ))(i)?;
    let (i, _) = tuple((tag("step"), space1))(i)?;
    let (i, step) = all_consuming(terminated(nom::character::complete::u64, space0))(i)?;
    Ok((
        i,
        FrameHeader {
            blob,
            conformation,
            step,
        },
    ))
}

/// Parse a line holding only the node count
pub(crate) fn node_count(i: &str) -> IResult<&str, usize> {
    all_consuming(delimited(space0, usize_value, space0))(i)
}

/// Parse the first three numbers on a node line, ignoring the rest
pub(crate) fn position(i: &str) -> IResult<&str, [f64; 3]> {
    let (i, a) = preceded(space0, double)(i)?;
    let (i, b) = preceded(space1, double)(i)?;
    let (i, c) = preceded(space1, double)(i)?;
    Ok((i, [a, b, c]))
}

/// Check for the line naming the measurement columns
pub(crate) fn is_column_header(i: &str) -> bool {
    i.split_whitespace().next() == Some("Time")
}

/// Parse a full row of measurement values
pub(crate) fn measurement_row(i: &str) -> IResult<&str, Vec<f64>> {
    all_consuming(terminated(many1(preceded(space0, double)), space0))(i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers() {
        let (_, header) = frame_header("Blob 2, step 1500").unwrap();
        assert_eq!(
            header,
            FrameHeader {
                blob: 2,
                conformation: None,
                step: 1500
            }
        );

        let (_, header) = frame_header("Blob 0, Conformation 1, step 10 ").unwrap();
        assert_eq!(header.conformation, Some(1));
        assert_eq!(header.step, 10);

        assert!(frame_header("Blob 0 step 10").is_err());
        assert!(frame_header("Blob 0, step").is_err());
    }

    #[test]
    fn node_lines() {
        let (_, xyz) = position("1.0e-09 -2.0e-09 3.0e-09 0 0 0 0 0 0 0").unwrap();
        assert_eq!(xyz, [1.0e-9, -2.0e-9, 3.0e-9]);
        assert!(position("1.0 2.0").is_err());
        assert_eq!(node_count(" 8 ").unwrap().1, 8);
    }

    #[test]
    fn measurement_lines() {
        assert!(is_column_header("Time        KineticEnergy   StrainEnergy"));
        assert!(!is_column_header("Timestep 1e-14"));
        let (_, row) = measurement_row("1.0e-12 2.5e-21 -3 ").unwrap();
        assert_eq!(row, vec![1.0e-12, 2.5e-21, -3.0]);
        assert!(measurement_row("1.0 abc").is_err());
    }

    #[test]
    fn markers() {
        assert!(is_separator("*"));
        assert!(is_static("STATIC"));
        assert!(is_dynamic("DYNAMIC "));
        assert!(!is_static("8"));
    }
}
