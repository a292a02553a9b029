use thiserror::Error;

/// Errors raised by the polygon engine.
///
/// Degenerate geometry that the algorithms can handle by explicit branching
/// (a query point on a vertex, a zero-length edge) never produces an error;
/// these variants are for inputs the caller must fix or skip.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("coordinate out of range: lat = {lat}, lon = {lon}")]
    InvalidCoordinate { lat: f64, lon: f64 },

    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    #[error("ambiguous saddle cell near ({lat}, {lon}) was visited more than twice")]
    AmbiguousSaddle { lat: f64, lon: f64 },

    #[error("buffer boundary starting near ({lat}, {lon}) did not close")]
    UnclosedBoundary { lat: f64, lon: f64 },

    #[error("numeric domain error: {0}")]
    NumericDomain(String),

    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },
}

impl Error {
    pub(crate) fn invalid_parameter(name: &'static str, value: impl ToString, reason: impl Into<String>) -> Self {
        Error::InvalidParameter { name, value: value.to_string(), reason: reason.into() }
    }
}

/// Result type alias for polygon engine operations.
pub type Result<T> = std::result::Result<T, Error>;
