//! JSON bodies the server sends back.

use serde::{Deserialize, Serialize};

/// Reply of the asynchronous comment delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentDeleteResponse {
    pub success: bool,
    pub message: String,
}

impl CommentDeleteResponse {
    pub fn deleted() -> Self {
        Self {
            success: true,
            message: "Comment deleted successfully.".to_string(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Problem details (RFC 7807) for errors outside the HTML forms.
///
/// `type` is always `about:blank`, so `title` is the status reason phrase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(rename = "type")]
    pub error_type: String,
    pub title: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        409 => "Conflict",
        500 => "Internal Server Error",
        _ => "Error",
    }
}

impl ErrorResponse {
    pub fn new(status: u16) -> Self {
        Self {
            error_type: "about:blank".to_string(),
            title: reason_phrase(status).to_string(),
            status,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_problem_details_shape() {
        let body = serde_json::to_value(ErrorResponse::new(404).with_detail("Post missing")).unwrap();
        assert_eq!(body["type"], "about:blank");
        assert_eq!(body["title"], "Not Found");
        assert_eq!(body["status"], 404);
        assert_eq!(body["detail"], "Post missing");

        let body = serde_json::to_value(ErrorResponse::new(500)).unwrap();
        assert!(body.get("detail").is_none());
    }

    #[test]
    fn test_delete_reply() {
        let body = serde_json::to_value(CommentDeleteResponse::failed("Comment not found.")).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Comment not found.");
    }
}
