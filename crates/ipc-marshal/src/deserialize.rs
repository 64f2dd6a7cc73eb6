//! Transport form → value.

use crate::classify::is_safe_for_transfer;
use crate::descriptor::ImageDescriptor;
use crate::error::{DescriptorError, MarshalError};
use crate::image::ImageSink;
use crate::options::{EmptyDescriptorPolicy, MarshalOptions};
use crate::value::{Members, Value};

/// Structural inverse of [`crate::Serializer`].
///
/// Tagged image descriptors are rebuilt into images: a single representation
/// is added from its raw buffer, several are all added from their data URLs.
/// Everything else is walked exactly as the serializer walks it.
#[derive(Debug, Clone, Default)]
pub struct Deserializer {
    options: MarshalOptions,
}

impl Deserializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: MarshalOptions) -> Self {
        Self { options }
    }

    pub fn deserialize<I: ImageSink>(
        &self,
        value: Value<I>,
    ) -> Result<Value<I>, MarshalError<I::Error>> {
        self.walk(value, 0)
    }

    fn walk<I: ImageSink>(
        &self,
        value: Value<I>,
        depth: usize,
    ) -> Result<Value<I>, MarshalError<I::Error>> {
        if let Some(limit) = self.options.max_depth {
            if depth > limit {
                return Err(MarshalError::DepthExceeded { limit });
            }
        }
        match value {
            Value::Object(members) if ImageDescriptor::is_tagged(&members) => {
                self.rebuild_image(members).map(Value::Image)
            }
            Value::Array(items) => items
                .into_iter()
                .map(|item| self.walk(item, depth + 1))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            value if is_safe_for_transfer(&value) => Ok(value),
            Value::Object(members) => self.walk_members(members, depth).map(Value::Object),
            Value::Instance(instance) => {
                self.walk_members(instance.members, depth).map(Value::Object)
            }
            value => Ok(value),
        }
    }

    fn walk_members<I: ImageSink>(
        &self,
        members: Members<I>,
        depth: usize,
    ) -> Result<Members<I>, MarshalError<I::Error>> {
        members
            .into_iter()
            .map(|(key, val)| Ok((key, self.walk(val, depth + 1)?)))
            .collect()
    }

    fn rebuild_image<I: ImageSink>(
        &self,
        members: Members<I>,
    ) -> Result<I, MarshalError<I::Error>> {
        let descriptor = ImageDescriptor::from_members(members)?;
        if descriptor.representations.is_empty() {
            match self.options.empty_descriptor {
                EmptyDescriptorPolicy::Reject => return Err(DescriptorError::Empty.into()),
                EmptyDescriptorPolicy::EmptyImage => {
                    tracing::warn!("empty image descriptor, producing an empty image");
                }
            }
        }
        descriptor.rebuild::<I>().map_err(MarshalError::Image)
    }
}

/// Deserializes `value` with default options.
pub fn deserialize<I: ImageSink>(value: Value<I>) -> Result<Value<I>, MarshalError<I::Error>> {
    Deserializer::new().deserialize(value)
}
