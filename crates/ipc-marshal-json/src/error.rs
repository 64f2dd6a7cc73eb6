//! JSON wire codec error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WireError {
    /// The value still holds something `serialize` would have rewritten.
    #[error("{0} values cannot be written; serialize the value first")]
    Unsupported(&'static str),
    #[error("invalid `{0}` wrapper")]
    Invalid(&'static str),
    #[error("unknown wrapper `{0}`")]
    UnknownTag(String),
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
