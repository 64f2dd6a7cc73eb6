//! In-memory RGBA image implementing [`ImageSource`] and [`ImageSink`].
//!
//! Hosts without a native image type can marshal [`Bitmap`] directly. Each
//! representation stores tightly packed 8-bit RGBA pixels, and its data-URL
//! form is `data:image/x-rgba;width=W;height=H;base64,...`.

use thiserror::Error;

use crate::data_url::{DataUrl, DataUrlError};
use crate::image::{
    BufferRepresentation, DataUrlRepresentation, ImageResource, ImageSink, ImageSource, Size,
};

pub const MIME: &str = "image/x-rgba";
pub const BYTES_PER_PIXEL: usize = 4;

#[derive(Debug, Error)]
pub enum BitmapError {
    #[error("buffer holds {actual} bytes, expected {expected} for the given size")]
    BufferSize { expected: usize, actual: usize },
    #[error("{0:?} does not fit in memory as RGBA pixels")]
    TooLarge(Size),
    #[error("invalid scale factor {0}")]
    ScaleFactor(f64),
    #[error("a representation for scale factor {0} already exists")]
    DuplicateScaleFactor(f64),
    #[error("no representation for scale factor {0}")]
    MissingScaleFactor(f64),
    #[error("unsupported image encoding `{0}`")]
    Mime(String),
    #[error("encoded size {encoded:?} does not match declared size {declared:?}")]
    SizeMismatch { encoded: Size, declared: Size },
    #[error(transparent)]
    DataUrl(#[from] DataUrlError),
}

/// One scale factor's pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitmapRepresentation {
    pub size: Size,
    pub pixels: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bitmap {
    representations: Vec<(f64, BitmapRepresentation)>,
}

impl Bitmap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-representation bitmap.
    pub fn from_rgba(
        scale_factor: f64,
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    ) -> Result<Self, BitmapError> {
        let mut bitmap = Self::new();
        bitmap.insert(scale_factor, Size::new(width, height), pixels)?;
        Ok(bitmap)
    }

    pub fn is_empty(&self) -> bool {
        self.representations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.representations.len()
    }

    pub fn representation(&self, scale_factor: f64) -> Option<&BitmapRepresentation> {
        self.representations
            .iter()
            .find(|(sf, _)| *sf == scale_factor)
            .map(|(_, rep)| rep)
    }

    fn require(&self, scale_factor: f64) -> Result<&BitmapRepresentation, BitmapError> {
        self.representation(scale_factor)
            .ok_or(BitmapError::MissingScaleFactor(scale_factor))
    }

    /// Adds a representation, validating its scale factor and buffer length.
    pub fn insert(
        &mut self,
        scale_factor: f64,
        size: Size,
        pixels: Vec<u8>,
    ) -> Result<(), BitmapError> {
        if !scale_factor.is_finite() || scale_factor <= 0.0 {
            return Err(BitmapError::ScaleFactor(scale_factor));
        }
        if self.representation(scale_factor).is_some() {
            return Err(BitmapError::DuplicateScaleFactor(scale_factor));
        }
        let expected = (size.width as usize)
            .checked_mul(size.height as usize)
            .and_then(|n| n.checked_mul(BYTES_PER_PIXEL))
            .ok_or(BitmapError::TooLarge(size))?;
        if pixels.len() != expected {
            return Err(BitmapError::BufferSize {
                expected,
                actual: pixels.len(),
            });
        }
        self.representations
            .push((scale_factor, BitmapRepresentation { size, pixels }));
        Ok(())
    }
}

impl ImageResource for Bitmap {
    type Error = BitmapError;
}

impl ImageSource for Bitmap {
    fn scale_factors(&self) -> Vec<f64> {
        self.representations.iter().map(|(sf, _)| *sf).collect()
    }

    fn pixel_size(&self, scale_factor: f64) -> Size {
        self.representation(scale_factor)
            .map(|rep| rep.size)
            .unwrap_or_default()
    }

    fn to_data_url(&self, scale_factor: f64) -> Result<String, BitmapError> {
        let rep = self.require(scale_factor)?;
        let url = DataUrl::new(MIME, rep.pixels.clone())
            .with_param("width", rep.size.width.to_string())
            .with_param("height", rep.size.height.to_string());
        Ok(url.to_string())
    }

    fn to_bitmap(&self, scale_factor: f64) -> Result<Vec<u8>, BitmapError> {
        Ok(self.require(scale_factor)?.pixels.clone())
    }
}

impl ImageSink for Bitmap {
    fn create_empty() -> Self {
        Self::new()
    }

    fn add_representation_from_buffer(
        &mut self,
        representation: BufferRepresentation,
    ) -> Result<(), BitmapError> {
        let size = Size::new(representation.width, representation.height);
        self.insert(representation.scale_factor, size, representation.buffer)
    }

    fn add_representation_from_data_url(
        &mut self,
        representation: DataUrlRepresentation,
    ) -> Result<(), BitmapError> {
        let url = DataUrl::parse(&representation.data_url)?;
        if url.mime != MIME {
            return Err(BitmapError::Mime(url.mime));
        }
        let declared = Size::new(representation.width, representation.height);
        let encoded = Size::new(
            dimension_param(&url, "width")?,
            dimension_param(&url, "height")?,
        );
        if encoded != declared {
            return Err(BitmapError::SizeMismatch { encoded, declared });
        }
        self.insert(representation.scale_factor, declared, url.data)
    }
}

fn dimension_param(url: &DataUrl, key: &str) -> Result<u32, BitmapError> {
    url.param(key)
        .and_then(|v| v.parse().ok())
        .ok_or(BitmapError::DataUrl(DataUrlError::Malformed))
}
