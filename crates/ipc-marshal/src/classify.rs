//! Dispatch classification shared by the serializer and deserializer.
//!
//! [`classify`] checks its classes in a fixed order, which is the order both
//! walkers dispatch in: image, array, transfer-safe leaf, object, and finally
//! the [`Class::Primitive`] fallback.

use crate::value::Value;

/// Kind of value the transport can carry without restructuring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SafeKind {
    Null,
    View,
    Boxed,
    Date,
    Error,
    RegExp,
    ArrayBuffer,
}

/// Dispatch class of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Class {
    Image,
    Array,
    Safe(SafeKind),
    /// Plain object or instance with a custom prototype.
    Object,
    /// Primitives not in the safe set, and `undefined`.
    Primitive,
}

/// Leaf decision: which safe kind `value` is, if any.
///
/// Looks at the variant only, never at contents.
pub fn safe_kind<I>(value: &Value<I>) -> Option<SafeKind> {
    match value {
        Value::Null => Some(SafeKind::Null),
        Value::View(_) => Some(SafeKind::View),
        Value::Boxed(_) => Some(SafeKind::Boxed),
        Value::Date(_) => Some(SafeKind::Date),
        Value::Error(_) => Some(SafeKind::Error),
        Value::RegExp(_) => Some(SafeKind::RegExp),
        Value::ArrayBuffer(_) => Some(SafeKind::ArrayBuffer),
        _ => None,
    }
}

/// Returns `true` if `value` can cross the boundary unmodified.
pub fn is_safe_for_transfer<I>(value: &Value<I>) -> bool {
    safe_kind(value).is_some()
}

pub fn classify<I>(value: &Value<I>) -> Class {
    match value {
        Value::Image(_) => Class::Image,
        Value::Array(_) => Class::Array,
        _ => match safe_kind(value) {
            Some(kind) => Class::Safe(kind),
            None => match value {
                Value::Object(_) | Value::Instance(_) => Class::Object,
                _ => Class::Primitive,
            },
        },
    }
}
