//! Library of parser functions

// crate modules
use crate::error::{Error, Result};

// ffeatools modules
use ffeatools_utils::LineReader;

// standard library
use std::io::BufRead;

// nom parser combinators
use nom::bytes::complete::tag;
use nom::character::complete::{space0, space1};
use nom::combinator::{all_consuming, map_res, value};
use nom::multi::many1;
use nom::number::complete::double;
use nom::sequence::{preceded, terminated, tuple};
use nom::IResult;

// ! Reader helpers

/// Read the next non-blank line and apply a parser to it
pub fn parse_next<R, T, P>(reader: &mut LineReader<R>, parser: P) -> Result<T>
where
    R: BufRead,
    P: FnMut(&str) -> IResult<&str, T>,
{
    reader.next_content()?;
    parse_current(reader, parser)
}

/// Apply a parser to the line most recently read
///
/// Any nom failure is turned into a [Error::ParseError] carrying the line
/// number and text for the user.
pub fn parse_current<R, T, P>(reader: &LineReader<R>, mut parser: P) -> Result<T>
where
    R: BufRead,
    P: FnMut(&str) -> IResult<&str, T>,
{
    let line = reader.current();
    match parser(line) {
        Ok((_, value)) => Ok(value),
        Err(_) => Err(Error::ParseError {
            line: reader.line_number(),
            text: line.to_string(),
        }),
    }
}

/// Read the next non-blank line and check it is one of the expected headers
///
/// Returns the header that matched, since some formats have aliases.
pub fn expect_header<R: BufRead>(
    reader: &mut LineReader<R>,
    expected: &[&'static str],
) -> Result<&'static str> {
    let line = reader.next_content()?.trim();
    expected
        .iter()
        .find(|&&header| header == line)
        .copied()
        .ok_or_else(|| Error::UnexpectedHeader {
            expected: expected.join("\" or \""),
            found: line.to_string(),
        })
}

// ! Boolean checks

/// Check for a tetgen comment line
pub fn is_comment(i: &str) -> bool {
    i.trim_start().starts_with('#')
}

/// Check for a line with something other than whitespace or a comment
pub fn is_record(i: &str) -> bool {
    !i.trim().is_empty() && !is_comment(i)
}

/// Check for a line that is exactly the keyword, ignoring whitespace
pub fn is_keyword(i: &str, keyword: &str) -> bool {
    i.trim() == keyword
}

/// Check for a PDB atom record
pub fn is_atom(i: &str) -> bool {
    i.starts_with("ATOM")
}

// ! Parser combinators

/// Everything before a trailing `#` comment
pub fn strip_comment(i: &str) -> &str {
    match i.find('#') {
        Some(index) => &i[..index],
        None => i,
    }
}

/// Parse a non-negative integer into a usize
pub fn usize_value(i: &str) -> IResult<&str, usize> {
    map_res(nom::character::complete::u64, |n: u64| usize::try_from(n))(i)
}

/// Parse a single usize making up the whole line
pub fn single_usize(i: &str) -> IResult<&str, usize> {
    all_consuming(terminated(preceded(space0, usize_value), space0))(i)
}

/// Parse a single signed integer making up the whole line
pub fn single_i32(i: &str) -> IResult<&str, i32> {
    all_consuming(terminated(
        preceded(space0, nom::character::complete::i32),
        space0,
    ))(i)
}

/// Parse a single double making up the whole line
pub fn single_f64(i: &str) -> IResult<&str, f64> {
    all_consuming(terminated(preceded(space0, double), space0))(i)
}

/// Parse a counted header value, e.g. `num_nodes 42`
pub fn header_count<'a>(i: &'a str, name: &str) -> IResult<&'a str, usize> {
    let (i, _) = tuple((space0, tag(name), space1))(i)?;
    all_consuming(terminated(usize_value, space0))(i)
}

/// Recognise a section label, e.g. `surface nodes:`
pub fn label<'a>(i: &'a str, name: &str) -> IResult<&'a str, ()> {
    value((), all_consuming(terminated(preceded(space0, tag(name)), space0)))(i)
}

/// Parse any number of consecutive doubles into a vector of f64 values
pub fn vector_of_f64(i: &str) -> IResult<&str, Vec<f64>> {
    all_consuming(terminated(many1(preceded(space0, double)), space0))(i)
}

/// Parse any number of consecutive integers into a vector of usize values
pub fn vector_of_usize(i: &str) -> IResult<&str, Vec<usize>> {
    all_consuming(terminated(many1(preceded(space0, usize_value)), space0))(i)
}

/// Parse any number of consecutive signed integers into a vector of i32 values
pub fn vector_of_i32(i: &str) -> IResult<&str, Vec<i32>> {
    all_consuming(terminated(
        many1(preceded(space0, nom::character::complete::i32)),
        space0,
    ))(i)
}

/// Parse the first three numbers on a line into an array, ignoring the rest
pub fn coordinate_array(i: &str) -> IResult<&str, [f64; 3]> {
    let (i, a) = preceded(space0, double)(i)?;
    let (i, b) = preceded(space1, double)(i)?;
    let (i, c) = preceded(space1, double)(i)?;
    Ok((i, [a, b, c]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counted_headers() {
        assert_eq!(header_count("num_nodes 42", "num_nodes").unwrap().1, 42);
        assert_eq!(header_count("  num_faces   7  ", "num_faces").unwrap().1, 7);
        assert!(header_count("num_nodes", "num_nodes").is_err());
        assert!(header_count("num_nodes 4 2", "num_nodes").is_err());
        assert!(header_count("num_faces 4", "num_nodes").is_err());
    }

    #[test]
    fn single_values() {
        assert_eq!(single_i32(" -1 ").unwrap().1, -1);
        assert_eq!(single_f64("2.5e-01").unwrap().1, 0.25);
        assert_eq!(single_usize("12").unwrap().1, 12);
        assert!(single_i32("1 2").is_err());
        assert!(single_f64("abc").is_err());
    }

    #[test]
    fn number_lists() {
        assert_eq!(vector_of_usize("0 1 2 3 ").unwrap().1, vec![0, 1, 2, 3]);
        assert_eq!(vector_of_i32("-1 0 2").unwrap().1, vec![-1, 0, 2]);
        assert_eq!(
            vector_of_f64("1.0e+00 -2.5 3").unwrap().1,
            vec![1.0, -2.5, 3.0]
        );
        assert!(vector_of_usize("0 1 x").is_err());
        assert!(vector_of_usize("").is_err());
    }

    #[test]
    fn coordinates_ignore_trailing_values() {
        let (_, xyz) = coordinate_array(" 1.0 2.0 3.0 0.5 7").unwrap();
        assert_eq!(xyz, [1.0, 2.0, 3.0]);
        assert!(coordinate_array("1.0 2.0").is_err());
    }

    #[test]
    fn comments() {
        assert!(is_comment("  # tetgen"));
        assert!(!is_record("# tetgen"));
        assert!(!is_record("   "));
        assert_eq!(strip_comment("4 4 0 # three"), "4 4 0 ");
    }

    #[test]
    fn headers() {
        let mut reader = LineReader::new("\nwalrus topology file\n".as_bytes());
        let header = expect_header(
            &mut reader,
            &["ffea topology file", "walrus topology file"],
        )
        .unwrap();
        assert_eq!(header, "walrus topology file");

        let mut reader = LineReader::new("ffea node file\n".as_bytes());
        assert!(matches!(
            expect_header(&mut reader, &["ffea surface file"]),
            Err(Error::UnexpectedHeader { .. })
        ));
    }

    #[test]
    fn section_labels() {
        let mut reader = LineReader::new("num_nodes 2\n  faces:  \nsurface nodes\n".as_bytes());
        assert_eq!(parse_next(&mut reader, |i| header_count(i, "num_nodes")).unwrap(), 2);
        parse_next(&mut reader, |i| label(i, "faces:")).unwrap();
        assert!(matches!(
            parse_next(&mut reader, |i| label(i, "surface nodes:")),
            Err(Error::ParseError { line: 3, .. })
        ));
    }

    #[test]
    fn parse_errors_carry_line() {
        let mut reader = LineReader::new("1\n\nnot a number\n".as_bytes());
        assert_eq!(parse_next(&mut reader, single_usize).unwrap(), 1);
        match parse_next(&mut reader, single_usize) {
            Err(Error::ParseError { line, text }) => {
                assert_eq!(line, 3);
                assert_eq!(text, "not a number");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
