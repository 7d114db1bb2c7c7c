//! Common response envelope

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T = serde_json::Value> {
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl ApiResponse<serde_json::Value> {
    pub fn success(message: impl Into<String>) -> Self {
        Self { status: "success", message: message.into(), data: None }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self { status: "fail", message: message.into(), data: None }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub fn with_data(message: impl Into<String>, data: T) -> Self {
        Self { status: "success", message: message.into(), data: Some(data) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_data_omitted() {
        let body = serde_json::to_value(ApiResponse::success("ok")).unwrap();
        assert_eq!(body["status"], "success");
        assert!(body.get("data").is_none());
    }
}
