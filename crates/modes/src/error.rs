//! Result and Error types for ffeatools-modes

/// Type alias for Result<T, modes::Error>
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `ffeatools-modes` crate
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed input/output stream")]
    IOError(#[from] std::io::Error),

    #[error("parser failed on line {line}: \"{text}\"")]
    ParseError { line: usize, text: String },

    #[error("no {0} found")]
    Empty(&'static str),

    #[error("inconsistent number of {what} (expected {expected:?}, found {found:?})")]
    UnexpectedCount {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("mode {index} out of range for {length} modes")]
    ModeOutOfRange { index: usize, length: usize },

    #[error("could not read a mode swap from \"{0}\", expected a pair like \"2,3\"")]
    InvalidSwap(String),
}

impl From<ffeatools_utils::Error> for Error {
    fn from(err: ffeatools_utils::Error) -> Self {
        match err {
            ffeatools_utils::Error::Io(e) => Self::IOError(e),
            e => Self::ParseError {
                line: 0,
                text: e.to_string(),
            },
        }
    }
}
