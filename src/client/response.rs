//! Reply types for the HopCache wire protocol
//!
//! Read endpoints answer with the bare JSON payload; write-style endpoints
//! answer `{"success": true}`. Failures are reported in-band as an HTTP 200
//! carrying `{"error": "..."}` — that single-field shape is reserved by the
//! protocol and is never a stored value.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Minimal success acknowledgement returned by write and delete calls
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Ack {
    /// Whether the service acknowledged the operation
    pub success: bool,
}

/// Extract the message from an in-band error reply, if this is one
pub(crate) fn in_band_error(reply: &Value) -> Option<String> {
    let fields = reply.as_object()?;
    if fields.len() == 1 {
        fields.get("error")?.as_str().map(ToString::to_string)
    } else {
        None
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ack_parses_success_reply() {
        let ack: Ack = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(ack.success);
    }

    #[test]
    fn test_in_band_error_detection() {
        assert_eq!(
            in_band_error(&json!({"error": "invalid key"})),
            Some("invalid key".to_string())
        );
        assert_eq!(in_band_error(&json!({"success": true})), None);
        assert_eq!(in_band_error(&json!(null)), None);
        // a stored record with an `error` field among others is a value, not a failure
        assert_eq!(
            in_band_error(&json!({"error": "disk full", "level": "warn"})),
            None
        );
    }
}
