//! The result body returned by JSON write endpoints.

use serde::{Deserialize, Serialize};

use crate::Error;

/// Whether a write succeeded, with a message on success or an error on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ActionResult {
    pub fn succeeded(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn failed(error: &Error) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::Error;

    use super::ActionResult;

    #[test]
    fn success_omits_error_field() {
        let body = serde_json::to_value(ActionResult::succeeded("Attendance saved")).unwrap();

        assert_eq!(
            body,
            json!({"success": true, "message": "Attendance saved"})
        );
    }

    #[test]
    fn failure_carries_error_message() {
        let body = serde_json::to_value(ActionResult::failed(&Error::DuplicateAttendance)).unwrap();

        assert_eq!(body["success"], json!(false));
        assert!(body.get("message").is_none());
        assert!(body["error"].as_str().unwrap().contains("already been recorded"));
    }
}
