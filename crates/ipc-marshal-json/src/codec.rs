//! Byte-level codec wrapper around [`to_json`] and [`from_json`].

use std::marker::PhantomData;

use ipc_marshal::Value;

use crate::decode::from_json;
use crate::encode::to_json;
use crate::error::WireError;

/// Encodes transport values to UTF-8 JSON bytes and back.
pub struct JsonWireCodec<I> {
    _image: PhantomData<fn() -> I>,
}

impl<I> Default for JsonWireCodec<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I> JsonWireCodec<I> {
    pub fn new() -> Self {
        Self {
            _image: PhantomData,
        }
    }

    pub fn id(&self) -> &'static str {
        "json"
    }

    pub fn encode(&self, value: &Value<I>) -> Result<Vec<u8>, WireError> {
        Ok(serde_json::to_vec(&to_json(value)?)?)
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<Value<I>, WireError> {
        from_json(serde_json::from_slice(bytes)?)
    }
}

/// Writes a serialized value as JSON text.
pub fn to_string<I>(value: &Value<I>) -> Result<String, WireError> {
    Ok(serde_json::to_string(&to_json(value)?)?)
}

/// Reads a transport value from JSON text.
pub fn from_str<I>(text: &str) -> Result<Value<I>, WireError> {
    from_json(serde_json::from_str(text)?)
}
