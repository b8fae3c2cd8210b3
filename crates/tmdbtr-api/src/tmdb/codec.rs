//! JSON decode/encode entry points for TMDB models.
//!
//! Decoding is all-or-nothing. Failures are classified so callers can tell
//! a missing key from a `null` value or a wrongly typed one.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::error::Category;

/// Structural decoding failure.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// A required key is absent.
    #[error("key not found: `{key}`")]
    KeyNotFound {
        /// Name of the missing key.
        key: String,
        /// Underlying parser error.
        #[source]
        source: serde_json::Error,
    },
    /// A required key is present but holds `null`.
    #[error("value not found: {0}")]
    ValueNotFound(#[source] serde_json::Error),
    /// A value is not convertible to the declared type.
    #[error("type mismatch: {0}")]
    TypeMismatch(#[source] serde_json::Error),
    /// The input is not a complete JSON document.
    #[error("malformed JSON: {0}")]
    Malformed(#[source] serde_json::Error),
}

impl DecodeError {
    /// Returns the missing key for [`DecodeError::KeyNotFound`].
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::KeyNotFound { key, .. } => Some(key),
            Self::ValueNotFound(_) | Self::TypeMismatch(_) | Self::Malformed(_) => None,
        }
    }
}

// serde_json exposes only `Category::Data` for missing keys, nulls and type
// errors, so data errors are told apart by the serde message text. The
// `data_error_messages_*` tests pin that wording.
impl From<serde_json::Error> for DecodeError {
    fn from(source: serde_json::Error) -> Self {
        match source.classify() {
            Category::Data => {
                let message = source.to_string();
                if let Some(key) = missing_field(&message) {
                    Self::KeyNotFound {
                        key: String::from(key),
                        source,
                    }
                } else if message.starts_with("invalid type: null") {
                    Self::ValueNotFound(source)
                } else {
                    Self::TypeMismatch(source)
                }
            }
            Category::Io | Category::Syntax | Category::Eof => Self::Malformed(source),
        }
    }
}

/// Extracts `key` from serde's "missing field `key`" message.
fn missing_field(message: &str) -> Option<&str> {
    message
        .strip_prefix("missing field `")
        .and_then(|rest| rest.split('`').next())
}

/// Encoding failure (a value the JSON encoder cannot represent).
#[derive(Debug, thiserror::Error)]
#[error("invalid value: {0}")]
pub struct EncodeError(#[from] serde_json::Error);

/// Decodes a model from UTF-8 JSON bytes.
///
/// # Errors
///
/// Returns a [`DecodeError`] describing the first structural problem found.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, DecodeError> {
    serde_json::from_slice(bytes).map_err(DecodeError::from)
}

/// Decodes a model from an already parsed JSON value.
///
/// # Errors
///
/// Returns a [`DecodeError`] describing the first structural problem found.
pub fn decode_value<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, DecodeError> {
    serde_json::from_value(value).map_err(DecodeError::from)
}

/// Encodes a model as compact JSON bytes.
///
/// # Errors
///
/// Returns an [`EncodeError`] if the value cannot be represented as JSON.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, EncodeError> {
    Ok(serde_json::to_vec(value)?)
}

/// Encodes a model as indented JSON text.
///
/// # Errors
///
/// Returns an [`EncodeError`] if the value cannot be represented as JSON.
pub fn encode_pretty<T: Serialize>(value: &T) -> Result<String, EncodeError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Encodes a model as a JSON value.
///
/// # Errors
///
/// Returns an [`EncodeError`] if the value cannot be represented as JSON.
pub fn encode_value<T: Serialize>(value: &T) -> Result<serde_json::Value, EncodeError> {
    Ok(serde_json::to_value(value)?)
}
