//! Transport-safe marshalling of dynamic values across a process boundary.
//!
//! [`serialize`] rewrites a [`Value`] so it can be carried by a structured
//! transport, and [`deserialize`] rebuilds it on the other side:
//!
//! - transfer-safe leaves (null, wrappers, dates, errors, regexes, buffers and
//!   binary views) and primitives pass through untouched;
//! - arrays and objects are rebuilt member by member, keeping order;
//! - objects with a custom prototype degrade to plain objects of their own
//!   members;
//! - images are encoded as an [`ImageDescriptor`] carrying, per scale factor,
//!   both a data URL and a raw pixel buffer.
//!
//! The image type is supplied by the host through the [`ImageSource`] and
//! [`ImageSink`] traits; [`Bitmap`] is an in-memory implementation.
//!
//! ```
//! use ipc_marshal::{deserialize, serialize, Bitmap, ImageSource, Value};
//!
//! let image = Bitmap::from_rgba(1.0, 1, 1, vec![255, 0, 0, 255]).unwrap();
//! let value = Value::object([("icon", Value::Image(image)), ("label", Value::str("red"))]);
//!
//! let wire = serialize(value).unwrap();
//! assert!(!wire.contains_image());
//!
//! let back = deserialize(wire).unwrap();
//! let icon = back.as_object().unwrap()["icon"].as_image().unwrap();
//! assert_eq!(icon.scale_factors(), vec![1.0]);
//! ```

mod classify;
mod deserialize;
mod error;
mod image;
mod options;
mod serialize;
mod value;

pub mod bitmap;
pub mod data_url;
pub mod descriptor;

pub use bitmap::{Bitmap, BitmapError};
pub use classify::{classify, is_safe_for_transfer, safe_kind, Class, SafeKind};
pub use descriptor::{ImageDescriptor, RebuildPath, Representation};
pub use deserialize::{deserialize, Deserializer};
pub use error::{DescriptorError, MarshalError};
pub use image::{
    BufferRepresentation, DataUrlRepresentation, ImageResource, ImageSink, ImageSource, Size,
};
pub use options::{EmptyDescriptorPolicy, MarshalOptions};
pub use serialize::{serialize, Serializer};
pub use value::{BinaryView, Boxed, ErrorValue, Instance, Members, RegExpValue, Value, ViewKind};
