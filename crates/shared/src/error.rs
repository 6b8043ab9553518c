use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error body returned by the backend on non-success responses.
///
/// `detail` is a plain string for handled errors and a list of field errors
/// for request validation failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendErrorBody {
    pub detail: Value,
}

impl BackendErrorBody {
    pub fn message(&self) -> String {
        match &self.detail {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        }
    }
}
