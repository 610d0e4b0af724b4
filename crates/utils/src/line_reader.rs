// standard library
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

// crate modules
use crate::error::{Error, Result};

/// Line-by-line reader for the FFEA text formats
///
/// Every format handled by the toolkit is line-oriented with a short header
/// followed by a counted block of records, so the readers only need to ask
/// for the next line and know where they are for error messages.
///
/// The most recent line is cached and the 1-based line number tracked.
///
/// ```rust
/// # use ffeatools_utils::LineReader;
/// let text = "ffea pinned nodes file\n\nnum_pinned_nodes 2\n";
/// let mut reader = LineReader::new(text.as_bytes());
///
/// assert_eq!(reader.next_line().unwrap(), "ffea pinned nodes file");
/// assert_eq!(reader.next_content().unwrap(), "num_pinned_nodes 2");
/// assert_eq!(reader.line_number(), 3);
/// assert!(reader.next_line().is_err());
/// ```
#[derive(Debug)]
pub struct LineReader<R: BufRead> {
    lines: Lines<R>,
    cached_line: String,
    line_number: usize,
}

impl LineReader<BufReader<File>> {
    /// Open a file for buffered line reading
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> LineReader<R> {
    /// Wrap anything implementing `BufRead`
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            cached_line: String::new(),
            line_number: 0,
        }
    }

    /// Advances to the next line, saving it to the cache and returning a ref
    ///
    /// Trailing whitespace (including `\r`) is removed.
    pub fn next_line(&mut self) -> Result<&str> {
        let line = self.lines.next().ok_or(Error::EndOfFile)??;
        self.line_number += 1;
        self.cached_line = line.trim_end().to_string();
        Ok(self.cached_line.as_str())
    }

    /// Advances to the next line that is not blank
    pub fn next_content(&mut self) -> Result<&str> {
        loop {
            if !self.next_line()?.trim().is_empty() {
                return Ok(self.cached_line.as_str());
            }
        }
    }

    /// Advances until a line satisfies the predicate, returning that line
    pub fn skip_until<F: Fn(&str) -> bool>(&mut self, predicate: F) -> Result<&str> {
        loop {
            if predicate(self.next_line()?) {
                return Ok(self.cached_line.as_str());
            }
        }
    }

    /// The most recently read line
    pub fn current(&self) -> &str {
        &self.cached_line
    }

    /// 1-based number of the most recently read line, 0 before any read
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}
