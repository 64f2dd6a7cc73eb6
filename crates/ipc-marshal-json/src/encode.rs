//! Transport value → JSON.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use ipc_marshal::{Boxed, Members, Value};
use serde_json::{json, Map, Number, Value as Json};

use crate::constants::*;
use crate::error::WireError;

/// Writes a serialized value as JSON.
///
/// Fails with [`WireError::Unsupported`] on images and instances, which only
/// appear in values that have not been through `ipc_marshal::serialize`.
pub fn to_json<I>(value: &Value<I>) -> Result<Json, WireError> {
    Ok(match value {
        Value::Undefined => wrap(UNDEFINED, Json::Bool(true)),
        Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Number(n) => number(*n),
        Value::BigInt(n) => wrap(BIGINT, Json::String(n.to_string())),
        Value::Str(s) => Json::String(s.clone()),
        Value::Boxed(boxed) => wrap(
            BOXED,
            match boxed {
                Boxed::Bool(b) => Json::Bool(*b),
                Boxed::Number(n) => number(*n),
                Boxed::Str(s) => Json::String(s.clone()),
            },
        ),
        Value::Date(ms) => wrap(DATE, number(*ms)),
        Value::Error(err) => {
            let mut fields = Map::new();
            fields.insert("name".into(), Json::String(err.name.clone()));
            fields.insert("message".into(), Json::String(err.message.clone()));
            if let Some(stack) = &err.stack {
                fields.insert("stack".into(), Json::String(stack.clone()));
            }
            wrap(ERROR, Json::Object(fields))
        }
        Value::RegExp(re) => wrap(REGEX, json!({ "source": re.source, "flags": re.flags })),
        Value::ArrayBuffer(bytes) => wrap(ARRAY_BUFFER, Json::String(STANDARD.encode(bytes))),
        Value::View(view) => wrap(
            VIEW,
            json!({ "kind": view.kind.name(), "data": STANDARD.encode(&view.bytes) }),
        ),
        Value::Array(items) => Json::Array(items.iter().map(to_json).collect::<Result<_, _>>()?),
        Value::Object(members) => object(members)?,
        Value::Instance(_) => return Err(WireError::Unsupported("instance")),
        Value::Image(_) => return Err(WireError::Unsupported("image")),
    })
}

fn wrap(tag: &str, inner: Json) -> Json {
    let mut map = Map::with_capacity(1);
    map.insert(tag.to_owned(), inner);
    Json::Object(map)
}

fn number(n: f64) -> Json {
    match Number::from_f64(n) {
        Some(num) => Json::Number(num),
        None => {
            let name = if n.is_nan() {
                NAN
            } else if n > 0.0 {
                INFINITY
            } else {
                NEG_INFINITY
            };
            wrap(NUMBER, Json::String(name.to_owned()))
        }
    }
}

fn object<I>(members: &Members<I>) -> Result<Json, WireError> {
    let mut map = Map::with_capacity(members.len());
    for (key, val) in members {
        map.insert(key.clone(), to_json(val)?);
    }
    let ambiguous = map.len() == 1 && map.keys().all(|k| k.starts_with('$'));
    Ok(if ambiguous {
        wrap(OBJECT, Json::Object(map))
    } else {
        Json::Object(map)
    })
}
