//! Request type definitions

use serde::{Deserialize, Serialize};

/// Error reported by the client-side banking widget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiErrorRequest {
    /// JSON-encoded error reported by the widget
    #[serde(default)]
    pub error: Option<String>,

    /// Short id of the banking session the widget was running
    pub session_id_short: String,
}
