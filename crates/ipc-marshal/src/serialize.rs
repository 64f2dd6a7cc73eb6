//! Value → transport form.

use crate::classify::is_safe_for_transfer;
use crate::descriptor::ImageDescriptor;
use crate::error::MarshalError;
use crate::image::ImageSource;
use crate::options::MarshalOptions;
use crate::value::{Members, Value};

/// Rewrites a value so every part of it can cross the transport.
///
/// Images become tagged descriptors, arrays and objects are rebuilt member by
/// member, and transfer-safe values and primitives are returned as they are.
/// Objects with a custom prototype come out as plain objects of their members.
#[derive(Debug, Clone, Default)]
pub struct Serializer {
    options: MarshalOptions,
}

impl Serializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: MarshalOptions) -> Self {
        Self { options }
    }

    pub fn serialize<I: ImageSource>(
        &self,
        value: Value<I>,
    ) -> Result<Value<I>, MarshalError<I::Error>> {
        self.walk(value, 0)
    }

    fn walk<I: ImageSource>(
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
            Value::Image(image) => {
                let descriptor = ImageDescriptor::capture(&image).map_err(MarshalError::Image)?;
                Ok(descriptor.into_value())
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

    fn walk_members<I: ImageSource>(
        &self,
        members: Members<I>,
        depth: usize,
    ) -> Result<Members<I>, MarshalError<I::Error>> {
        members
            .into_iter()
            .map(|(key, val)| Ok((key, self.walk(val, depth + 1)?)))
            .collect()
    }
}

/// Serializes `value` with default options.
pub fn serialize<I: ImageSource>(value: Value<I>) -> Result<Value<I>, MarshalError<I::Error>> {
    Serializer::new().serialize(value)
}
