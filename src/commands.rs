//! Wire protocol for external control
//!
//! The daemon is driven over JSONL: one request object per line on stdin,
//! one reply per line on stdout, plus unsolicited event lines for ad-hoc
//! session outcomes. Logging goes to stderr so stdout stays parseable.
//!
//! ```json
//! {"type": "showMenu", "name": "Applications"}
//! {"type": "showCustomMenu", "description": {"name": "m", "children": [...]}}
//! {"type": "selectItem", "path": "/2/4"}
//! {"type": "cancelMenu"}
//! ```

use serde::Deserialize;
use serde_json::json;

use crate::dispatcher::RequestError;
use crate::session::SessionEvent;

/// Requests accepted on stdin.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Request {
    /// Open a configured menu by name
    ShowMenu { name: String },
    /// Open a configured menu in preview mode
    PreviewMenu { name: String },
    /// Open an ad-hoc menu; `description` is a tree object or a string
    /// holding serialized JSON
    ShowCustomMenu { description: serde_json::Value },
    /// Ad-hoc menu in preview mode
    PreviewCustomMenu { description: serde_json::Value },
    /// The input collaborator resolved the open menu to an item
    SelectItem { path: String },
    /// The input collaborator dismissed the open menu
    CancelMenu,
    /// Re-read the configuration file and reconcile shortcuts
    ReloadConfig,
}

/// Reply line for a granted open request.
pub fn result_line(session_id: u32) -> String {
    json!({ "result": session_id }).to_string()
}

/// Reply line for a rejected request.
pub fn error_line(error: &RequestError) -> String {
    json!({ "error": error.code(), "message": error.to_string() }).to_string()
}

/// Event line for a session outcome, or `None` when the outcome stays
/// in-process (configured menus dispatch to their action instead of
/// notifying the outside).
pub fn event_line(event: &SessionEvent) -> Option<String> {
    match event {
        SessionEvent::Selected {
            session_id,
            path,
            configured: false,
            ..
        } => Some(
            json!({ "event": "onSelect", "sessionId": session_id, "path": path }).to_string(),
        ),
        SessionEvent::Cancelled {
            session_id,
            configured: false,
        } => Some(json!({ "event": "onCancel", "sessionId": session_id }).to_string()),
        _ => None,
    }
}
