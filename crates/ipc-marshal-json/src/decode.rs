//! JSON → transport value.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use ipc_marshal::{BinaryView, Boxed, ErrorValue, Members, RegExpValue, Value, ViewKind};
use serde_json::{Map, Value as Json};

use crate::constants::*;
use crate::error::WireError;

/// Reads a transport value written by [`crate::to_json`].
///
/// The result never contains images; pass it to `ipc_marshal::deserialize`
/// to rebuild them.
pub fn from_json<I>(json: Json) -> Result<Value<I>, WireError> {
    Ok(match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(b),
        Json::Number(n) => Value::Number(n.as_f64().ok_or(WireError::Invalid(NUMBER))?),
        Json::String(s) => Value::Str(s),
        Json::Array(items) => Value::Array(
            items
                .into_iter()
                .map(from_json)
                .collect::<Result<_, _>>()?,
        ),
        Json::Object(map) => {
            if map.len() == 1 && map.keys().all(|k| k.starts_with('$')) {
                let Some((tag, inner)) = map.into_iter().next() else {
                    unreachable!("map has exactly one entry");
                };
                wrapped(&tag, inner)?
            } else {
                Value::Object(members(map)?)
            }
        }
    })
}

fn members<I>(map: Map<String, Json>) -> Result<Members<I>, WireError> {
    map.into_iter()
        .map(|(key, val)| Ok((key, from_json(val)?)))
        .collect()
}

fn wrapped<I>(tag: &str, inner: Json) -> Result<Value<I>, WireError> {
    Ok(match tag {
        UNDEFINED => match inner {
            Json::Bool(true) => Value::Undefined,
            _ => return Err(WireError::Invalid(UNDEFINED)),
        },
        NUMBER => Value::Number(special_number(&inner)?),
        BIGINT => match inner {
            Json::String(s) => {
                Value::BigInt(s.parse().map_err(|_| WireError::Invalid(BIGINT))?)
            }
            _ => return Err(WireError::Invalid(BIGINT)),
        },
        BOXED => Value::Boxed(match inner {
            Json::Bool(b) => Boxed::Bool(b),
            Json::String(s) => Boxed::Str(s),
            other => Boxed::Number(number(&other).ok_or(WireError::Invalid(BOXED))?),
        }),
        DATE => Value::Date(number(&inner).ok_or(WireError::Invalid(DATE))?),
        ERROR => {
            let Json::Object(mut fields) = inner else {
                return Err(WireError::Invalid(ERROR));
            };
            let mut err = ErrorValue::new(
                string(fields.remove("name"), ERROR)?,
                string(fields.remove("message"), ERROR)?,
            );
            if let Some(stack) = fields.remove("stack") {
                err.stack = Some(string(Some(stack), ERROR)?);
            }
            Value::Error(err)
        }
        REGEX => {
            let Json::Object(mut fields) = inner else {
                return Err(WireError::Invalid(REGEX));
            };
            Value::RegExp(RegExpValue::new(
                string(fields.remove("source"), REGEX)?,
                string(fields.remove("flags"), REGEX)?,
            ))
        }
        ARRAY_BUFFER => {
            let encoded = string(Some(inner), ARRAY_BUFFER)?;
            Value::ArrayBuffer(STANDARD.decode(encoded)?)
        }
        VIEW => {
            let Json::Object(mut fields) = inner else {
                return Err(WireError::Invalid(VIEW));
            };
            let kind = string(fields.remove("kind"), VIEW)?;
            let kind = ViewKind::from_name(&kind).ok_or(WireError::Invalid(VIEW))?;
            let bytes = STANDARD.decode(string(fields.remove("data"), VIEW)?)?;
            Value::View(BinaryView::new(kind, bytes))
        }
        OBJECT => match inner {
            Json::Object(map) => Value::Object(members(map)?),
            _ => return Err(WireError::Invalid(OBJECT)),
        },
        other => return Err(WireError::UnknownTag(other.to_owned())),
    })
}

fn string(value: Option<Json>, tag: &'static str) -> Result<String, WireError> {
    match value {
        Some(Json::String(s)) => Ok(s),
        _ => Err(WireError::Invalid(tag)),
    }
}

/// Plain JSON number or a `$number` wrapper.
fn number(value: &Json) -> Option<f64> {
    match value {
        Json::Number(n) => n.as_f64(),
        Json::Object(map) if map.len() == 1 => {
            map.get(NUMBER).and_then(|v| special_number(v).ok())
        }
        _ => None,
    }
}

fn special_number(value: &Json) -> Result<f64, WireError> {
    match value.as_str() {
        Some(NAN) => Ok(f64::NAN),
        Some(INFINITY) => Ok(f64::INFINITY),
        Some(NEG_INFINITY) => Ok(f64::NEG_INFINITY),
        _ => Err(WireError::Invalid(NUMBER)),
    }
}
