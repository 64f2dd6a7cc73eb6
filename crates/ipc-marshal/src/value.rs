//! [`Value`] — the dynamic value tree handed to the marshaller.
//!
//! The variants form a closed set: every leaf the transport can carry as-is
//! has its own variant, composites are [`Value::Array`] and
//! [`Value::Object`], and anything else with members is an
//! [`Value::Instance`]. The host image type is a type parameter so the
//! marshaller can read and build it through [`crate::ImageSource`] and
//! [`crate::ImageSink`].

use indexmap::IndexMap;

/// Key-ordered member map used by objects and instances.
pub type Members<I> = IndexMap<String, Value<I>>;

/// A dynamically typed value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<I> {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    BigInt(i128),
    Str(String),
    /// `Boolean`, `Number` or `String` wrapper object.
    Boxed(Boxed),
    /// Milliseconds since the Unix epoch. `NaN` is an invalid date.
    Date(f64),
    Error(ErrorValue),
    RegExp(RegExpValue),
    /// Raw binary buffer (`ArrayBuffer`).
    ArrayBuffer(Vec<u8>),
    /// Typed array or `DataView` over a byte buffer.
    View(BinaryView),
    Array(Vec<Value<I>>),
    /// Plain object; key insertion order is significant.
    Object(Members<I>),
    /// Object with a custom prototype.
    Instance(Instance<I>),
    /// Opaque multi-resolution image.
    Image(I),
}

/// Primitive wrapper objects.
#[derive(Debug, Clone, PartialEq)]
pub enum Boxed {
    Bool(bool),
    Number(f64),
    Str(String),
}

/// An error object, including any subclass (`TypeError`, custom errors, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorValue {
    pub name: String,
    pub message: String,
    pub stack: Option<String>,
}

impl ErrorValue {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            stack: None,
        }
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegExpValue {
    pub source: String,
    pub flags: String,
}

impl RegExpValue {
    pub fn new(source: impl Into<String>, flags: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            flags: flags.into(),
        }
    }
}

/// Element kind of a [`BinaryView`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    Int8,
    Uint8,
    Uint8Clamped,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Float32,
    Float64,
    BigInt64,
    BigUint64,
    DataView,
}

impl ViewKind {
    pub const ALL: [ViewKind; 12] = [
        ViewKind::Int8,
        ViewKind::Uint8,
        ViewKind::Uint8Clamped,
        ViewKind::Int16,
        ViewKind::Uint16,
        ViewKind::Int32,
        ViewKind::Uint32,
        ViewKind::Float32,
        ViewKind::Float64,
        ViewKind::BigInt64,
        ViewKind::BigUint64,
        ViewKind::DataView,
    ];

    /// Constructor name of the view, e.g. `"Uint8Array"`.
    pub fn name(self) -> &'static str {
        match self {
            ViewKind::Int8 => "Int8Array",
            ViewKind::Uint8 => "Uint8Array",
            ViewKind::Uint8Clamped => "Uint8ClampedArray",
            ViewKind::Int16 => "Int16Array",
            ViewKind::Uint16 => "Uint16Array",
            ViewKind::Int32 => "Int32Array",
            ViewKind::Uint32 => "Uint32Array",
            ViewKind::Float32 => "Float32Array",
            ViewKind::Float64 => "Float64Array",
            ViewKind::BigInt64 => "BigInt64Array",
            ViewKind::BigUint64 => "BigUint64Array",
            ViewKind::DataView => "DataView",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Bytes per element; `1` for `DataView`.
    pub fn element_size(self) -> usize {
        match self {
            ViewKind::Int8 | ViewKind::Uint8 | ViewKind::Uint8Clamped | ViewKind::DataView => 1,
            ViewKind::Int16 | ViewKind::Uint16 => 2,
            ViewKind::Int32 | ViewKind::Uint32 | ViewKind::Float32 => 4,
            ViewKind::Float64 | ViewKind::BigInt64 | ViewKind::BigUint64 => 8,
        }
    }
}

/// A binary view: element kind plus the viewed bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryView {
    pub kind: ViewKind,
    pub bytes: Vec<u8>,
}

impl BinaryView {
    pub fn new(kind: ViewKind, bytes: Vec<u8>) -> Self {
        Self { kind, bytes }
    }

    pub fn uint8(bytes: Vec<u8>) -> Self {
        Self::new(ViewKind::Uint8, bytes)
    }

    /// Number of elements the view spans.
    pub fn len(&self) -> usize {
        self.bytes.len() / self.kind.element_size()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// An object whose prototype is not `Object.prototype`.
///
/// Only the own enumerable data members are kept; methods live on the
/// prototype and are never part of the value.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance<I> {
    pub class: String,
    pub members: Members<I>,
}

impl<I> Instance<I> {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            members: IndexMap::new(),
        }
    }

    pub fn with_member(mut self, key: impl Into<String>, value: Value<I>) -> Self {
        self.members.insert(key.into(), value);
        self
    }
}

impl<I> Value<I> {
    /// Builds a plain object from key/value pairs, keeping their order.
    pub fn object<K, T>(entries: T) -> Self
    where
        K: Into<String>,
        T: IntoIterator<Item = (K, Value<I>)>,
    {
        Value::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    /// Script truthiness: nullish values, `false`, zero, `NaN` and `""` are
    /// falsy. Every object, including boxed primitives, is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::BigInt(n) => *n != 0,
            Value::Str(s) => !s.is_empty(),
            _ => true,
        }
    }

    pub fn as_object(&self) -> Option<&Members<I>> {
        match self {
            Value::Object(members) => Some(members),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value<I>]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&I> {
        match self {
            Value::Image(image) => Some(image),
            _ => None,
        }
    }

    pub fn into_image(self) -> Option<I> {
        match self {
            Value::Image(image) => Some(image),
            _ => None,
        }
    }

    /// True if an [`Value::Image`] occurs anywhere in the tree.
    pub fn contains_image(&self) -> bool {
        match self {
            Value::Image(_) => true,
            Value::Array(items) => items.iter().any(Value::contains_image),
            Value::Object(members) => members.values().any(Value::contains_image),
            Value::Instance(instance) => instance.members.values().any(Value::contains_image),
            _ => false,
        }
    }
}

impl<I> From<bool> for Value<I> {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl<I> From<f64> for Value<I> {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl<I> From<&str> for Value<I> {
    fn from(v: &str) -> Self {
        Value::Str(v.to_owned())
    }
}

impl<I> From<String> for Value<I> {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl<I> From<Vec<Value<I>>> for Value<I> {
    fn from(v: Vec<Value<I>>) -> Self {
        Value::Array(v)
    }
}
