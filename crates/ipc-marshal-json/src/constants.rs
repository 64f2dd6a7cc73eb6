//! Wrapper keys of the JSON wire form.
//!
//! Every non-JSON leaf is written as a single-key object whose key starts
//! with `$`.

pub const UNDEFINED: &str = "$undefined";
pub const NUMBER: &str = "$number";
pub const BIGINT: &str = "$bigint";
pub const BOXED: &str = "$boxed";
pub const DATE: &str = "$date";
pub const ERROR: &str = "$error";
pub const REGEX: &str = "$regex";
pub const ARRAY_BUFFER: &str = "$arrayBuffer";
pub const VIEW: &str = "$view";
/// Escapes a plain object that would otherwise read as a wrapper.
pub const OBJECT: &str = "$object";

pub const NAN: &str = "NaN";
pub const INFINITY: &str = "Infinity";
pub const NEG_INFINITY: &str = "-Infinity";
