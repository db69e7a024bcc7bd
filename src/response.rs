use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Meta {
    pub status: bool,
    pub message: String,
}

/// Success envelope: `{meta, data, pagination}`.
#[derive(Debug, Serialize)]
pub struct SuccessBody<T: Serialize> {
    pub meta: Meta,
    pub data: Option<T>,
    // no endpoint paginates yet; kept so clients see a stable shape
    pub pagination: Option<serde_json::Value>,
}

/// Error envelope: `{meta: {status: false, message}}`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub meta: Meta,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            meta: Meta {
                status: false,
                message: message.into(),
            },
        }
    }
}

#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    status: StatusCode,
    body: SuccessBody<T>,
}

impl<T: Serialize> ApiResponse<T> {
    fn build(status: StatusCode, message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            status,
            body: SuccessBody {
                meta: Meta {
                    status: true,
                    message: message.into(),
                },
                data,
                pagination: None,
            },
        }
    }

    /// 200 with a payload.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self::build(StatusCode::OK, message, Some(data))
    }

    /// 201 with a payload.
    pub fn created_with(message: impl Into<String>, data: T) -> Self {
        Self::build(StatusCode::CREATED, message, Some(data))
    }
}

impl ApiResponse<()> {
    /// 200 with `data: null`.
    pub fn done(message: impl Into<String>) -> Self {
        Self::build(StatusCode::OK, message, None)
    }

    /// 201 with `data: null`.
    pub fn created(message: impl Into<String>) -> Self {
        Self::build(StatusCode::CREATED, message, None)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_shape() {
        let resp = ApiResponse::ok("Success!", vec![1, 2]);
        let json = serde_json::to_value(&resp.body).unwrap();
        assert_eq!(json["meta"]["status"], true);
        assert_eq!(json["meta"]["message"], "Success!");
        assert_eq!(json["data"], serde_json::json!([1, 2]));
        assert!(json["pagination"].is_null());
    }

    #[test]
    fn created_has_null_data() {
        let resp = ApiResponse::created("Success create faq section");
        assert_eq!(resp.status, StatusCode::CREATED);
        let json = serde_json::to_value(&resp.body).unwrap();
        assert!(json["data"].is_null());
    }

    #[test]
    fn error_envelope_shape() {
        let json = serde_json::to_value(ErrorResponse::new("Invalid token")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "meta": { "status": false, "message": "Invalid token" } })
        );
    }
}
