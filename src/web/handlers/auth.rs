//! PIN verification and admin login handlers.

use axum::{extract::State, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::sync::Arc;

use super::AppState;
use crate::auth::{verify_admin, verify_pin, Session, SessionContext, SESSION_COOKIE};
use crate::web::dto::{AdminLoginRequest, PinRequest, SuccessResponse, ValidatedJson};
use crate::web::error::ApiError;
use crate::web::middleware::CurrentSession;

const LOGGED_OUT: &str = "Logged out successfully";

/// Build the session cookie for a saved session.
pub fn session_cookie(session: &Session, max_age_secs: u64) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, session.token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(cookie::time::Duration::seconds(
            i64::try_from(max_age_secs).unwrap_or(i64::MAX),
        ))
        .build()
}

/// Save the context and attach the refreshed cookie.
fn persist(
    state: &AppState,
    context: &SessionContext,
    jar: CookieJar,
) -> Result<CookieJar, ApiError> {
    let session = state.sessions.save(context).map_err(|e| {
        tracing::error!(error = %e, "Failed to save session");
        ApiError::from(e)
    })?;
    Ok(jar.add(session_cookie(&session, state.sessions.ttl().as_secs())))
}

/// POST /api/verify-pin - Mark the session as PIN-verified.
///
/// Without a configured PIN every submission is rejected, since no
/// non-empty PIN matches the empty one.
pub async fn verify_pin_handler(
    State(state): State<Arc<AppState>>,
    CurrentSession(mut context): CurrentSession,
    jar: CookieJar,
    ValidatedJson(req): ValidatedJson<PinRequest>,
) -> Result<(CookieJar, Json<SuccessResponse>), ApiError> {
    if !verify_pin(&req.pin, &state.auth.pin) {
        tracing::warn!("PIN verification failed");
        return Err(ApiError::unauthorized("Invalid PIN"));
    }

    context.mark_pin_verified();
    let jar = persist(&state, &context, jar)?;

    tracing::info!("PIN verified");
    Ok((jar, Json(SuccessResponse::with_message("PIN verified successfully"))))
}

/// POST /api/admin/login - Mark the session as admin-authenticated.
pub async fn admin_login(
    State(state): State<Arc<AppState>>,
    CurrentSession(mut context): CurrentSession,
    jar: CookieJar,
    ValidatedJson(req): ValidatedJson<AdminLoginRequest>,
) -> Result<(CookieJar, Json<SuccessResponse>), ApiError> {
    if !verify_admin(
        &req.username,
        &req.password,
        &state.auth.admin_user,
        &state.auth.admin_pass,
    ) {
        tracing::warn!(username = %req.username, "Admin login failed");
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    context.mark_admin_authenticated();
    let jar = persist(&state, &context, jar)?;

    tracing::info!(username = %req.username, "Admin logged in");
    Ok((jar, Json(SuccessResponse::with_message("Admin login successful"))))
}

/// POST /api/admin/logout - Clear the admin flag, keeping PIN verification.
pub async fn admin_logout(
    State(state): State<Arc<AppState>>,
    CurrentSession(mut context): CurrentSession,
    jar: CookieJar,
) -> Result<(CookieJar, Json<SuccessResponse>), ApiError> {
    if !context.is_established() {
        return Ok((jar, Json(SuccessResponse::with_message(LOGGED_OUT))));
    }

    let was_admin = context.flags().admin_authenticated;
    context.clear_admin();
    let jar = persist(&state, &context, jar)?;

    if was_admin {
        tracing::info!("Admin logged out");
    }
    Ok((jar, Json(SuccessResponse::with_message(LOGGED_OUT))))
}
