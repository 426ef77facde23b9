//! Session resolution and access gates.

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{request::Parts, HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

use crate::auth::{check_gates, Gate, SessionContext, READ_GATES, SESSION_COOKIE, WRITE_GATES};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// Session token from the request cookies, if any.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    CookieJar::from_headers(headers)
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
}

/// The session of the current request.
///
/// Resolves to an anonymous context when the request has no cookie or the
/// cookie names an unknown or expired session.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub SessionContext);

impl FromRequestParts<Arc<AppState>> for CurrentSession {
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        state: &'life1 Arc<AppState>,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let token = session_token(&parts.headers);
            let context = state.sessions.load(token.as_deref())?;
            Ok(CurrentSession(context))
        })
    }
}

fn enforce(state: &AppState, req: &Request<Body>, gates: &[Gate]) -> Result<(), ApiError> {
    let token = session_token(req.headers());
    let context = state.sessions.load(token.as_deref())?;

    check_gates(gates, &state.policy, &context.flags()).map_err(|e| {
        tracing::warn!(
            method = %req.method(),
            path = %req.uri().path(),
            reason = %e,
            "Access denied"
        );
        ApiError::from(e)
    })
}

/// Gate for listing and downloading files.
pub async fn require_read_access(
    State(state): State<Arc<AppState>>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    enforce(&state, &req, READ_GATES)?;
    Ok(next.run(req).await)
}

/// Gate for uploading and deleting files.
pub async fn require_write_access(
    State(state): State<Arc<AppState>>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    enforce(&state, &req, WRITE_GATES)?;
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::COOKIE;

    #[test]
    fn test_session_token_from_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            format!("theme=dark; {}=abc-123", SESSION_COOKIE)
                .parse()
                .unwrap(),
        );
        assert_eq!(session_token(&headers).as_deref(), Some("abc-123"));
    }

    #[test]
    fn test_session_token_missing() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_token(&headers), None);

        headers.insert(COOKIE, "other=value".parse().unwrap());
        assert_eq!(session_token(&headers), None);
    }
}
