//! Session response bodies

use crate::types::JsonValue;
use serde::{Deserialize, Serialize};

/// Body of `POST <user-base>/refresh-token`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// The parts of a 403 body the client cares about
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForbiddenBody {
    #[serde(default)]
    pub logout: Option<JsonValue>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ForbiddenBody {
    /// Whether the server asked for the session to be dropped
    pub fn wants_logout(&self) -> bool {
        self.logout.as_ref().is_some_and(is_truthy)
    }
}

/// Loose truthiness for flags the backend may send as bool, number or string
pub fn is_truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(_) | JsonValue::Object(_) => true,
    }
}
