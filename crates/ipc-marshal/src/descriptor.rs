//! Image descriptor: the wire form of an image.
//!
//! ```text
//! { isImageDescriptor: true,
//!   representations: [ { scaleFactor, size: { width, height }, dataURL, buffer } ] }
//! ```
//!
//! Any object whose `isImageDescriptor` member is truthy (see
//! [`Value::is_truthy`]) is treated as a descriptor on the receiving side.

use crate::error::DescriptorError;
use crate::image::{BufferRepresentation, DataUrlRepresentation, ImageSink, ImageSource, Size};
use crate::value::{BinaryView, Members, Value};

pub const TAG: &str = "isImageDescriptor";
pub const REPRESENTATIONS: &str = "representations";
pub const SCALE_FACTOR: &str = "scaleFactor";
pub const SIZE: &str = "size";
pub const WIDTH: &str = "width";
pub const HEIGHT: &str = "height";
pub const DATA_URL: &str = "dataURL";
pub const BUFFER: &str = "buffer";

/// One scale factor's worth of image data, carrying both encodings.
#[derive(Debug, Clone, PartialEq)]
pub struct Representation {
    pub scale_factor: f64,
    pub size: Size,
    pub data_url: String,
    pub buffer: Vec<u8>,
}

/// Which encoding a descriptor is rebuilt from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebuildPath {
    /// Exactly one representation: raw pixels, no encode/decode cycle.
    Buffer,
    /// Several representations: data URLs, so they stay mutually consistent.
    DataUrl,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageDescriptor {
    pub representations: Vec<Representation>,
}

impl ImageDescriptor {
    /// Reads every representation of `image`, in its native order.
    ///
    /// Both encodings are produced for each scale factor regardless of which
    /// one the receiver will use.
    pub fn capture<S: ImageSource>(image: &S) -> Result<Self, S::Error> {
        let scale_factors = image.scale_factors();
        tracing::trace!(?scale_factors, "capturing image representations");
        let mut representations = Vec::with_capacity(scale_factors.len());
        for scale_factor in scale_factors {
            let size = image.pixel_size(scale_factor);
            let data_url = image.to_data_url(scale_factor)?;
            let buffer = image.to_bitmap(scale_factor)?;
            tracing::trace!(
                scale_factor,
                width = size.width,
                height = size.height,
                buffer_len = buffer.len(),
                "captured representation"
            );
            representations.push(Representation {
                scale_factor,
                size,
                data_url,
                buffer,
            });
        }
        Ok(Self { representations })
    }

    pub fn rebuild_path(&self) -> RebuildPath {
        if self.representations.len() == 1 {
            RebuildPath::Buffer
        } else {
            RebuildPath::DataUrl
        }
    }

    /// Builds a fresh image from this descriptor.
    pub fn rebuild<K: ImageSink>(self) -> Result<K, K::Error> {
        let mut image = K::create_empty();
        let path = self.rebuild_path();
        tracing::debug!(
            representations = self.representations.len(),
            ?path,
            "rebuilding image"
        );
        match path {
            RebuildPath::Buffer => {
                for rep in self.representations {
                    image.add_representation_from_buffer(BufferRepresentation {
                        buffer: rep.buffer,
                        scale_factor: rep.scale_factor,
                        width: rep.size.width,
                        height: rep.size.height,
                    })?;
                }
            }
            RebuildPath::DataUrl => {
                for rep in self.representations {
                    image.add_representation_from_data_url(DataUrlRepresentation {
                        data_url: rep.data_url,
                        scale_factor: rep.scale_factor,
                        width: rep.size.width,
                        height: rep.size.height,
                    })?;
                }
            }
        }
        Ok(image)
    }

    /// True if `members` carries a truthy descriptor tag.
    pub fn is_tagged<I>(members: &Members<I>) -> bool {
        members.get(TAG).is_some_and(Value::is_truthy)
    }

    /// Parses a tagged object. The tag itself is not re-checked.
    ///
    /// Only the shape is validated here: `scaleFactor` must be a finite
    /// number and each dimension a non-negative integer that fits in `u32`.
    /// Zero or negative scale factors and pixel counts too large to allocate
    /// are left to the [`ImageSink`], which reports them as its own error.
    pub fn from_members<I>(mut members: Members<I>) -> Result<Self, DescriptorError> {
        let reps = match members.shift_remove(REPRESENTATIONS) {
            Some(Value::Array(reps)) => reps,
            Some(_) => return Err(DescriptorError::InvalidField(REPRESENTATIONS)),
            None => return Err(DescriptorError::MissingField(REPRESENTATIONS)),
        };
        let representations = reps
            .into_iter()
            .map(parse_representation)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { representations })
    }

    pub fn into_value<I>(self) -> Value<I> {
        let representations = self
            .representations
            .into_iter()
            .map(|rep| {
                Value::object([
                    (SCALE_FACTOR, Value::Number(rep.scale_factor)),
                    (
                        SIZE,
                        Value::object([
                            (WIDTH, Value::Number(rep.size.width.into())),
                            (HEIGHT, Value::Number(rep.size.height.into())),
                        ]),
                    ),
                    (DATA_URL, Value::Str(rep.data_url)),
                    (BUFFER, Value::View(BinaryView::uint8(rep.buffer))),
                ])
            })
            .collect();
        Value::object([
            (TAG, Value::Bool(true)),
            (REPRESENTATIONS, Value::Array(representations)),
        ])
    }
}

fn parse_representation<I>(value: Value<I>) -> Result<Representation, DescriptorError> {
    let Value::Object(mut members) = value else {
        return Err(DescriptorError::NotAnObject(REPRESENTATIONS));
    };
    let scale_factor = match take(&mut members, SCALE_FACTOR)? {
        Value::Number(n) if n.is_finite() => n,
        _ => return Err(DescriptorError::InvalidField(SCALE_FACTOR)),
    };
    let Value::Object(mut size) = take(&mut members, SIZE)? else {
        return Err(DescriptorError::NotAnObject(SIZE));
    };
    let width = dimension(take(&mut size, WIDTH)?, WIDTH)?;
    let height = dimension(take(&mut size, HEIGHT)?, HEIGHT)?;
    let Value::Str(data_url) = take(&mut members, DATA_URL)? else {
        return Err(DescriptorError::InvalidField(DATA_URL));
    };
    let buffer = match take(&mut members, BUFFER)? {
        Value::View(view) => view.bytes,
        Value::ArrayBuffer(bytes) => bytes,
        _ => return Err(DescriptorError::InvalidField(BUFFER)),
    };
    Ok(Representation {
        scale_factor,
        size: Size::new(width, height),
        data_url,
        buffer,
    })
}

fn take<I>(members: &mut Members<I>, key: &'static str) -> Result<Value<I>, DescriptorError> {
    members
        .shift_remove(key)
        .ok_or(DescriptorError::MissingField(key))
}

fn dimension<I>(value: Value<I>, field: &'static str) -> Result<u32, DescriptorError> {
    match value {
        Value::Number(n) if n >= 0.0 && n.fract() == 0.0 && n <= u32::MAX as f64 => Ok(n as u32),
        _ => Err(DescriptorError::InvalidField(field)),
    }
}
