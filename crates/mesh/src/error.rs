//! Result and Error types for ffeatools-mesh

/// Type alias for Result<T, mesh::Error>
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `ffeatools-mesh` crate
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed input/output stream")]
    IOError(#[from] std::io::Error),

    #[error("vtkio error")]
    VtkioError(#[from] vtkio::Error),

    #[error("unexpected end of file")]
    UnexpectedEof,

    #[error("expected header \"{expected}\" but found \"{found}\"")]
    UnexpectedHeader { expected: String, found: String },

    #[error("parser failed on line {line}: \"{text}\"")]
    ParseError { line: usize, text: String },

    #[error("unrecognised file extension \"{0}\"")]
    UnknownExtension(String),

    #[error("{path} is a {format} file with no {what}")]
    MissingContent {
        path: String,
        format: String,
        what: &'static str,
    },

    #[error("inconsistent number of {what} (expected {expected:?}, found {found:?})")]
    UnexpectedCount {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("element with {0} nodes, expected 4 (linear) or 10 (quadratic)")]
    InvalidElementOrder(usize),

    #[error("index {index} out of range for {what} of length {length}")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        length: usize,
    },

    #[error("element {0} is already second order")]
    QuadraticElement(usize),

    #[error("surface face {0} has no owning element")]
    MissingElementReference(usize),

    #[error("edge ({0}, {1}) is not part of the topology")]
    UnknownEdge(usize, usize),

    #[error("elements are not ordered with surface elements first")]
    UnorderedElements,

    #[error("no ATOM records found in \"{0}\"")]
    NoAtoms(String),

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
