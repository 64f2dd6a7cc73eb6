//! `data:` URLs with base64 payloads.
//!
//! Only the `data:<mime>[;key=value]*;base64,<payload>` form is produced and
//! accepted; percent-encoded payloads are rejected.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataUrlError {
    #[error("malformed data URL")]
    Malformed,
    #[error("data URL payload is not base64 encoded")]
    NotBase64,
    #[error("invalid base64 payload: {0}")]
    Payload(#[from] base64::DecodeError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    pub mime: String,
    pub params: Vec<(String, String)>,
    pub data: Vec<u8>,
}

fn pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^data:([^;,]*)((?:;[^;,]*)*),(.*)$").expect("data URL pattern is valid")
    })
}

impl DataUrl {
    pub fn new(mime: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime: mime.into(),
            params: Vec::new(),
            data,
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn parse(input: &str) -> Result<Self, DataUrlError> {
        let caps = pattern().captures(input).ok_or(DataUrlError::Malformed)?;
        let mime = caps[1].to_owned();
        let mut segments: Vec<&str> = caps[2].split(';').skip(1).collect();
        if segments.pop() != Some("base64") {
            return Err(DataUrlError::NotBase64);
        }
        let params = segments
            .into_iter()
            .map(|segment| match segment.split_once('=') {
                Some((k, v)) => Ok((k.to_owned(), v.to_owned())),
                None => Err(DataUrlError::Malformed),
            })
            .collect::<Result<Vec<_>, _>>()?;
        let data = STANDARD.decode(&caps[3])?;
        Ok(Self { mime, params, data })
    }
}

impl FromStr for DataUrl {
    type Err = DataUrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DataUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{}", self.mime)?;
        for (k, v) in &self.params {
            write!(f, ";{k}={v}")?;
        }
        write!(f, ";base64,{}", STANDARD.encode(&self.data))
    }
}
