//! Extension-router message types used by the bubble surface.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request relayed through the extension message router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RouterRequest {
    #[serde(rename = "CALI_QUERY")]
    Query { query: String },
}

impl RouterRequest {
    pub fn query(text: impl Into<String>) -> Self {
        Self::Query { query: text.into() }
    }
}

/// Response from the router.
///
/// A missing `success` field deserializes as `false`: a malformed
/// response counts as a failure rather than being read blindly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouterResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RouterResponse {
    /// Successful response carrying a data payload.
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Failed response with an error message.
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}
