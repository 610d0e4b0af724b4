//! Result and Error types for ffeatools-blob

/// Type alias for Result<T, blob::Error>
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `ffeatools-blob` crate
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed input/output stream")]
    IOError(#[from] std::io::Error),

    #[error(transparent)]
    MeshError(#[from] ffeatools_mesh::Error),

    #[error("unexpected end of file")]
    UnexpectedEof,

    #[error("inconsistent number of {what} (expected {expected:?}, found {found:?})")]
    UnexpectedCount {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("index {index} out of range for {what} of length {length}")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        length: usize,
    },

    #[error("expected {expected} material parameters on line {line}, found {found}")]
    InvalidMaterial {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("invalid region: {0}")]
    InvalidRegion(String),

    #[error("invalid index map: {0}")]
    InvalidIndexMap(String),
}

impl From<ffeatools_utils::Error> for Error {
    fn from(err: ffeatools_utils::Error) -> Self {
        match err {
            ffeatools_utils::Error::EndOfFile => Self::UnexpectedEof,
            ffeatools_utils::Error::Io(e) => Self::IOError(e),
            e => Self::InvalidIndexMap(e.to_string()),
        }
    }
}
