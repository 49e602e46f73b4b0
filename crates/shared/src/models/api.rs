use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;

/// The provider wraps every answer as `{"success": true, ...fields}` or
/// `{"success": false, "error": "..."}`.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Debug)]
pub enum EnvelopeError {
    /// `success: false`, with the provider's message verbatim.
    Provider(String),
    /// `success: true` but the fields do not match the expected shape.
    Malformed(serde_json::Error),
}

impl fmt::Display for EnvelopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvelopeError::Provider(message) => write!(f, "{message}"),
            EnvelopeError::Malformed(e) => write!(f, "Malformed provider response: {e}"),
        }
    }
}

impl ApiEnvelope {
    pub fn into_result<T: DeserializeOwned>(self) -> Result<T, EnvelopeError> {
        if !self.success {
            return Err(EnvelopeError::Provider(
                self.error
                    .unwrap_or_else(|| "Unknown provider error".to_string()),
            ));
        }
        serde_json::from_value(Value::Object(self.fields)).map_err(EnvelopeError::Malformed)
    }
}
