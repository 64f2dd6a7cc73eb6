//! Capability traits for the opaque image resource.
//!
//! The marshaller never names a concrete image type. It reads images through
//! [`ImageSource`] when serializing and builds them through [`ImageSink`] when
//! deserializing.

/// Pixel dimensions of one representation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Shared error type of an image implementation.
pub trait ImageResource {
    type Error: std::error::Error + Send + Sync + 'static;
}

/// Read side of an image.
pub trait ImageSource: ImageResource {
    /// Scale factors in the image's native order.
    fn scale_factors(&self) -> Vec<f64>;

    fn pixel_size(&self, scale_factor: f64) -> Size;

    /// Lossy, self-describing string encoding of one representation.
    fn to_data_url(&self, scale_factor: f64) -> Result<String, Self::Error>;

    /// Raw decompressed pixels of one representation.
    fn to_bitmap(&self, scale_factor: f64) -> Result<Vec<u8>, Self::Error>;
}

/// Raw-pixel representation passed to [`ImageSink::add_representation_from_buffer`].
#[derive(Debug, Clone, PartialEq)]
pub struct BufferRepresentation {
    pub buffer: Vec<u8>,
    pub scale_factor: f64,
    pub width: u32,
    pub height: u32,
}

/// Encoded representation passed to [`ImageSink::add_representation_from_data_url`].
#[derive(Debug, Clone, PartialEq)]
pub struct DataUrlRepresentation {
    pub data_url: String,
    pub scale_factor: f64,
    pub width: u32,
    pub height: u32,
}

/// Write side of an image.
pub trait ImageSink: ImageResource + Sized {
    fn create_empty() -> Self;

    fn add_representation_from_buffer(
        &mut self,
        representation: BufferRepresentation,
    ) -> Result<(), Self::Error>;

    fn add_representation_from_data_url(
        &mut self,
        representation: DataUrlRepresentation,
    ) -> Result<(), Self::Error>;
}
