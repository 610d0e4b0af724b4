//! Result and Error types for ffeatools-traj

/// Type alias for Result<T, traj::Error>
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `ffeatools-traj` crate
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed input/output stream")]
    IOError(#[from] std::io::Error),

    #[error("failed to initialise progress bar: {0}")]
    ProgressBar(String),

    #[error("unexpected end of file")]
    UnexpectedEof,

    #[error("parser failed on line {line}: \"{text}\"")]
    ParseError { line: usize, text: String },

    #[error("trajectory ended part way through blob {blob} at step {step}")]
    TruncatedFrame { blob: usize, step: u64 },

    #[error("no frames found in trajectory")]
    NoFrames,

    #[error("measurement file has no \"{0}\" column")]
    MissingColumn(&'static str),

    #[error("measurement file has no rows")]
    NoMeasurements,

    #[error("{0} linear nodes have no elastic degrees of freedom")]
    TooFewNodes(usize),

    #[error("thermal energy must be positive, found {0}")]
    InvalidThermalEnergy(f64),
}

impl From<ffeatools_utils::Error> for Error {
    fn from(err: ffeatools_utils::Error) -> Self {
        match err {
            ffeatools_utils::Error::Io(e) => Self::IOError(e),
            ffeatools_utils::Error::EndOfFile => Self::UnexpectedEof,
            e => Self::ParseError {
                line: 0,
                text: e.to_string(),
            },
        }
    }
}
