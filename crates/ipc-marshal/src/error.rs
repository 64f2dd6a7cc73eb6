//! Marshalling error types.

use thiserror::Error;

/// Reasons a tagged image descriptor could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    #[error("image descriptor is missing `{0}`")]
    MissingField(&'static str),
    #[error("image descriptor field `{0}` has the wrong type")]
    InvalidField(&'static str),
    #[error("image descriptor `{0}` must be an object")]
    NotAnObject(&'static str),
    #[error("image descriptor has no representations")]
    Empty,
}

/// Error returned by the serializer and deserializer.
///
/// `E` is the image implementation's error type; its failures are passed
/// through as-is in [`MarshalError::Image`].
#[derive(Debug, Error)]
pub enum MarshalError<E> {
    #[error(transparent)]
    Image(E),
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
    #[error("value nesting exceeds the limit of {limit}")]
    DepthExceeded { limit: usize },
}

impl<E> MarshalError<E> {
    /// The image error, if this is one.
    pub fn into_image_error(self) -> Option<E> {
        match self {
            MarshalError::Image(err) => Some(err),
            _ => None,
        }
    }
}
