//! Classification of RPC error envelopes.

use serde::Serialize;
use serde_json::Value;

/// Error decoded from a `{"error": {...}}` response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceError {
    pub code: Option<u16>,
    pub status: Option<String>,
    pub message: String,
}

impl ServiceError {
    /// Whether the failure is a temporary server-side condition.
    pub fn is_transient(&self) -> bool {
        if let Some(code) = self.code {
            return matches!(code, 429 | 500 | 502 | 503 | 504);
        }
        if let Some(status) = &self.status {
            return matches!(
                status.as_str(),
                "UNAVAILABLE" | "RESOURCE_EXHAUSTED" | "INTERNAL" | "DEADLINE_EXCEEDED"
            );
        }
        message_signals_unavailable(&self.message)
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.code, &self.status) {
            (Some(code), Some(status)) => write!(f, "{} {}: {}", code, status, self.message),
            (Some(code), None) => write!(f, "{}: {}", code, self.message),
            (None, Some(status)) => write!(f, "{}: {}", status, self.message),
            (None, None) => f.write_str(&self.message),
        }
    }
}

/// Decode the error envelope of a response, if it has one.
pub fn detect(response: &Value) -> Option<ServiceError> {
    let error = response.get("error")?;

    if let Some(message) = error.as_str() {
        return Some(ServiceError {
            code: None,
            status: None,
            message: message.to_string(),
        });
    }

    let error = error.as_object()?;
    Some(ServiceError {
        code: error
            .get("code")
            .and_then(Value::as_u64)
            .and_then(|c| u16::try_from(c).ok()),
        status: error
            .get("status")
            .and_then(Value::as_str)
            .map(str::to_string),
        message: error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
    })
}

/// Text match used only when an envelope carries neither code nor status.
fn message_signals_unavailable(message: &str) -> bool {
    let message = message.to_ascii_lowercase();
    message.contains("service unavailable") || message.contains("currently unavailable")
}
