//! JSON wire codec for `ipc-marshal` transport values.
//!
//! Plain JSON values map to themselves. Leaves JSON cannot express are
//! written as single-key `$` wrappers:
//!
//! | value | JSON |
//! |---|---|
//! | `undefined` | `{"$undefined": true}` |
//! | `NaN`, `±Infinity` | `{"$number": "NaN"}` |
//! | bigint | `{"$bigint": "123"}` |
//! | wrapper object | `{"$boxed": <primitive>}` |
//! | date | `{"$date": <ms>}` |
//! | error | `{"$error": {"name", "message", "stack"?}}` |
//! | regexp | `{"$regex": {"source", "flags"}}` |
//! | `ArrayBuffer` | `{"$arrayBuffer": "<base64>"}` |
//! | typed array / `DataView` | `{"$view": {"kind", "data": "<base64>"}}` |
//!
//! A plain object with exactly one `$`-prefixed key is escaped as
//! `{"$object": {...}}`. Images must be turned into descriptors with
//! `ipc_marshal::serialize` before encoding.

mod codec;
mod decode;
mod encode;
mod error;

pub mod constants;

pub use codec::{from_str, to_string, JsonWireCodec};
pub use decode::from_json;
pub use encode::to_json;
pub use error::WireError;
