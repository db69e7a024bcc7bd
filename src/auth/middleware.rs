use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::warn;

use super::jwt::TokenService;
use crate::response::ErrorResponse;

/// Principal attached to the request once the bearer token checks out.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    pub user_id: i64,
}

fn reject(message: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(ErrorResponse::new(message))).into_response()
}

/// Splits on the literal `Bearer ` and demands exactly `["", token]`.
fn bearer_token(header: &str) -> Option<&str> {
    let parts: Vec<&str> = header.split("Bearer ").collect();
    match parts.as_slice() {
        ["", token] => Some(*token),
        _ => None,
    }
}

/// Gate for admin route groups. Mounted with `route_layer`, never globally.
pub async fn require_token(
    State(tokens): State<Arc<dyn TokenService>>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(header) = req.headers().get(AUTHORIZATION) else {
        warn!(uri = %req.uri(), "missing authorization header");
        return reject("Missing Authorization header");
    };

    let Some(token) = header.to_str().ok().and_then(bearer_token) else {
        warn!(uri = %req.uri(), "malformed authorization header");
        return reject("Invalid Authorization header format");
    };

    let user_id = match tokens.verify_access_token(token) {
        Ok(user_id) => user_id,
        Err(e) => {
            warn!(error = %e, uri = %req.uri(), "token rejected");
            return reject("Invalid token");
        }
    };

    req.extensions_mut().insert(CurrentUser { user_id });
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auth::{extractors::AuthUser, jwt::JwtKeys},
        config::JwtConfig,
    };
    use axum::{body::Body, middleware, routing::get, Router};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    fn keys() -> Arc<JwtKeys> {
        Arc::new(JwtKeys::new(&JwtConfig {
            secret: "middleware-secret".into(),
            issuer: "test-issuer".into(),
        }))
    }

    fn app(keys: Arc<JwtKeys>, hits: Arc<AtomicUsize>) -> Router {
        let tokens: Arc<dyn TokenService> = keys;
        Router::new()
            .route(
                "/guarded",
                get(move |AuthUser(user_id): AuthUser| {
                    let hits = hits.clone();
                    async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        user_id.to_string()
                    }
                }),
            )
            .route_layer(middleware::from_fn_with_state(tokens, require_token))
    }

    async fn call(app: Router, header: Option<&str>) -> (StatusCode, String) {
        let mut req = axum::http::Request::get("/guarded");
        if let Some(value) = header {
            req = req.header(AUTHORIZATION, value);
        }
        let res = app.oneshot(req.body(Body::empty()).unwrap()).await.unwrap();
        let status = res.status();
        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[test]
    fn bearer_token_requires_exact_prefix() {
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("Token abc"), None);
        assert_eq!(bearer_token("xBearer abc"), None);
        assert_eq!(bearer_token("Bearer a Bearer b"), None);
        assert_eq!(bearer_token("bearer abc"), None);
    }

    #[tokio::test]
    async fn missing_header_short_circuits() {
        let hits = Arc::new(AtomicUsize::new(0));
        let (status, body) = call(app(keys(), hits.clone()), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("Missing Authorization header"));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn wrong_scheme_is_rejected() {
        let hits = Arc::new(AtomicUsize::new(0));
        let (status, body) = call(app(keys(), hits.clone()), Some("Token abc")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("Invalid Authorization header format"));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn bad_token_is_rejected() {
        let hits = Arc::new(AtomicUsize::new(0));
        let (status, body) = call(app(keys(), hits.clone()), Some("Bearer nope")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("Invalid token"));
        assert!(body.contains(r#""status":false"#));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn valid_token_exposes_principal() {
        let keys = keys();
        let (token, _) = keys.generate_token(42).unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let header = format!("Bearer {token}");
        let (status, body) = call(app(keys, hits.clone()), Some(&header)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "42");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
