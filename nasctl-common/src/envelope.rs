//! The `{ success, data, error }` wrapper around every backend payload

use serde::{Deserialize, Serialize};

/// Standard API response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

/// Error details attached to a `success: false` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Numeric on current servers, a string on some older ones
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<serde_json::Value>,
    #[serde(default)]
    pub message: String,
}

impl ErrorInfo {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    /// Code as a number, if the server sent one
    pub fn code_number(&self) -> Option<i64> {
        match self.code.as_ref()? {
            serde_json::Value::Number(n) => n.as_i64(),
            serde_json::Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ErrorInfo::new(message)),
        }
    }

    /// Split into payload or error. A `success: false` without an error
    /// object still yields an error with a generic message.
    pub fn into_result(self) -> std::result::Result<Option<T>, ErrorInfo> {
        if self.success {
            Ok(self.data)
        } else {
            Err(self
                .error
                .filter(|e| !e.message.is_empty())
                .unwrap_or_else(|| ErrorInfo::new("API request failed")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_with_data() {
        let json = r#"{"success":true,"data":[1,2,3]}"#;
        let resp: ApiResponse<Vec<u32>> = serde_json::from_str(json).unwrap();
        assert_eq!(resp.into_result().unwrap(), Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_success_without_data() {
        let json = r#"{"success":true}"#;
        let resp: ApiResponse<serde_json::Value> = serde_json::from_str(json).unwrap();
        assert_eq!(resp.into_result().unwrap(), None);
    }

    #[test]
    fn test_failure_keeps_server_message() {
        let json = r#"{"success":false,"error":{"code":409,"message":"Path already exists"}}"#;
        let resp: ApiResponse<serde_json::Value> = serde_json::from_str(json).unwrap();
        let err = resp.into_result().unwrap_err();
        assert_eq!(err.message, "Path already exists");
        assert_eq!(err.code_number(), Some(409));
    }

    #[test]
    fn test_failure_without_error_object() {
        let resp: ApiResponse<()> = serde_json::from_str(r#"{"success":false}"#).unwrap();
        let err = resp.into_result().unwrap_err();
        assert_eq!(err.message, "API request failed");
        assert_eq!(err.code_number(), None);
    }

    #[test]
    fn test_string_error_code() {
        let json = r#"{"success":false,"error":{"code":"404","message":"Share not found"}}"#;
        let resp: ApiResponse<()> = serde_json::from_str(json).unwrap();
        assert_eq!(resp.into_result().unwrap_err().code_number(), Some(404));
    }
}
