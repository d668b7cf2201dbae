use std::collections::BTreeMap;
use std::convert::TryFrom;

use thiserror::Error;
use tracing::debug;

/// A single value in an inbound message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Tuple {
    Text(String),
    Integer(i64),
    Bytes(Vec<u8>),
}

impl Tuple {
    /// The value as a C string: text up to the first NUL, or raw bytes up to the first NUL.
    pub fn cstring(&self) -> Option<&[u8]> {
        let bytes = match self {
            Self::Text(text) => text.as_bytes(),
            Self::Bytes(bytes) => &bytes[..],
            Self::Integer(_) => return None,
        };
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        Some(&bytes[..end])
    }
}

/// Key/value message delivered with a network response.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dictionary(BTreeMap<u32, Tuple>);

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: u32, value: Tuple) -> Self {
        self.0.insert(key, value);
        self
    }

    pub fn find(&self, key: u32) -> Option<&Tuple> {
        self.0.get(&key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum DictionaryError {
    #[error("malformed body: {0}")]
    Json(String),
    #[error("expected a JSON object")]
    NotAnObject,
    #[error("unsupported value for key {0}")]
    InvalidValue(u32),
}

impl Dictionary {
    pub fn parse(body: &str) -> Result<Self, DictionaryError> {
        let json = json::parse(body).map_err(|e| DictionaryError::Json(e.to_string()))?;
        Self::try_from(json)
    }
}

/// Entries with a non-numeric key or a value that is not a tuple are skipped, so one odd entry
/// never costs the rest of the message.
///
/// ```json
/// {
///     "1": "141",
///     "2": 7,
///     "3": [222, 173, 190, 239],
///     "4": ["b", 1, 2, 3]
/// }
/// ```
impl TryFrom<json::JsonValue> for Dictionary {
    type Error = DictionaryError;

    fn try_from(json: json::JsonValue) -> Result<Self, Self::Error> {
        if !json.is_object() {
            return Err(DictionaryError::NotAnObject);
        }

        let entries = json
            .entries()
            .filter_map(|(key, value)| {
                let key = match key.parse::<u32>() {
                    Ok(key) => key,
                    Err(_) => {
                        debug!(key, "skipping entry with non-numeric key");
                        return None;
                    }
                };
                match Tuple::try_from((key, value)) {
                    Ok(tuple) => Some((key, tuple)),
                    Err(e) => {
                        debug!(error = %e, "skipping entry");
                        None
                    }
                }
            })
            .collect();

        Ok(Self(entries))
    }
}

impl TryFrom<(u32, &json::JsonValue)> for Tuple {
    type Error = DictionaryError;

    fn try_from((key, value): (u32, &json::JsonValue)) -> Result<Self, Self::Error> {
        if let Some(text) = value.as_str() {
            Ok(Self::Text(text.to_string()))
        } else if let Some(integer) = value.as_i64() {
            Ok(Self::Integer(integer))
        } else if value.is_array() {
            // A leading "b" marks the rest of the array as bytes.
            let skip = if value[0].as_str() == Some("b") { 1 } else { 0 };
            value
                .members()
                .skip(skip)
                .map(|member| member.as_u8().ok_or(DictionaryError::InvalidValue(key)))
                .collect::<Result<_, _>>()
                .map(Self::Bytes)
        } else {
            Err(DictionaryError::InvalidValue(key))
        }
    }
}
