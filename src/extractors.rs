use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Runs the derived validator rules and flattens the failures into one message.
pub fn validate_request<T: Validate>(request: &T) -> AppResult<()> {
    request.validate().map_err(|e| {
        let mut errors: Vec<String> = e
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |err| {
                    format!(
                        "{}: {}",
                        field,
                        err.message.clone().unwrap_or_else(|| "invalid value".into())
                    )
                })
            })
            .collect();
        errors.sort();
        AppError::Validation(errors.join(", "))
    })
}

/// JSON body that has been bound and validated.
///
/// Binding failures answer 422, rule violations answer 400.
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::MalformedBody(rejection.body_text()))?;
        validate_request(&value)?;
        Ok(Self(value))
    }
}

/// Numeric `:id` path segment.
pub struct RecordId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;
        raw.parse::<i64>()
            .map(RecordId)
            .map_err(|_| AppError::Validation(format!("id: invalid value {raw:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, response::IntoResponse, routing::post, Router};
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Debug, Deserialize, Validate)]
    struct Probe {
        #[validate(length(min = 1, message = "title is required"))]
        title: String,
    }

    async fn probe(ValidJson(body): ValidJson<Probe>) -> impl IntoResponse {
        body.title
    }

    async fn by_id(RecordId(id): RecordId) -> impl IntoResponse {
        id.to_string()
    }

    fn app() -> Router {
        Router::new()
            .route("/probe", post(probe))
            .route("/probe/:id", axum::routing::get(by_id))
    }

    fn json_request(body: &'static str) -> axum::http::Request<Body> {
        axum::http::Request::post("/probe")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn malformed_json_is_unprocessable() {
        let res = app().oneshot(json_request("{not json")).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn rule_violation_is_bad_request() {
        let res = app().oneshot(json_request(r#"{"title":""}"#)).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn valid_body_reaches_handler() {
        let res = app().oneshot(json_request(r#"{"title":"hello"}"#)).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn non_numeric_id_is_bad_request() {
        let req = axum::http::Request::get("/probe/abc").body(Body::empty()).unwrap();
        let res = app().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let req = axum::http::Request::get("/probe/12").body(Body::empty()).unwrap();
        let res = app().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }
}
