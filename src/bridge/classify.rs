//! Message classification.
//!
//! The bridge understands a message only far enough to decide whether the
//! engine will answer it. The decision hangs on one structural field: the
//! JSON `method` name. Everything else in the body stays opaque.

use serde::Deserialize;

/// Methods the engine treats as notifications: forwarded, never answered.
const NO_REPLY_METHODS: &[&str] = &["textDocument/didOpen", "textDocument/didChange"];

/// How the bridge must treat an inbound client message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// Expects exactly one reply from the engine.
    Request,
    /// Fire-and-forget: acked locally, no engine reply follows.
    Notification,
}

/// Minimal structural probe of a message body.
#[derive(Deserialize)]
struct MethodProbe {
    #[serde(default)]
    method: Option<String>,
}

impl MessageKind {
    /// Classify a message body by its `method` field.
    ///
    /// Unparseable bodies, bodies without a `method`, and unknown methods
    /// all default to request-shaped.
    pub fn classify(body: &str) -> Self {
        match serde_json::from_str::<MethodProbe>(body) {
            Ok(MethodProbe { method: Some(m) }) if NO_REPLY_METHODS.contains(&m.as_str()) => {
                Self::Notification
            }
            _ => Self::Request,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_did_open_is_notification() {
        let body = r#"{"method":"textDocument/didOpen","params":{}}"#;
        assert_eq!(MessageKind::classify(body), MessageKind::Notification);
    }

    #[test]
    fn test_did_change_is_notification() {
        let body = r#"{"method":"textDocument/didChange","params":{}}"#;
        assert_eq!(MessageKind::classify(body), MessageKind::Notification);
    }

    #[test]
    fn test_initialize_is_request() {
        let body = r#"{"method":"initialize","id":1}"#;
        assert_eq!(MessageKind::classify(body), MessageKind::Request);
    }

    #[test]
    fn test_unknown_method_is_request() {
        let body = r#"{"method":"workspace/symbol"}"#;
        assert_eq!(MessageKind::classify(body), MessageKind::Request);
    }

    #[test]
    fn test_missing_method_is_request() {
        assert_eq!(MessageKind::classify(r#"{"id":7}"#), MessageKind::Request);
    }

    #[test]
    fn test_unparseable_body_is_request() {
        assert_eq!(MessageKind::classify("not json at all"), MessageKind::Request);
        assert_eq!(MessageKind::classify(""), MessageKind::Request);
    }

    #[test]
    fn test_method_in_params_does_not_count() {
        // The method must be the top-level field, not a substring anywhere
        // in the body.
        let body = r#"{"method":"initialize","params":{"note":"didOpen"}}"#;
        assert_eq!(MessageKind::classify(body), MessageKind::Request);
    }
}
