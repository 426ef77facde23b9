//! Per-client throttling for credential endpoints.

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    num::NonZeroU32,
    sync::Arc,
    time::Duration,
};

use crate::web::error::ApiError;

/// Interval between limiter sweeps (5 minutes).
const CLEANUP_INTERVAL_SECS: u64 = 300;

/// State for rate limiting.
///
/// One keyed limiter covers PIN verification and admin login, so guesses
/// against either secret draw from the same per-IP budget.
pub struct RateLimitState {
    auth_limiter: DefaultKeyedRateLimiter<IpAddr>,
    auth_rate_limit: u32,
}

impl RateLimitState {
    /// Create a new rate limit state allowing `auth_rate_limit` attempts per
    /// minute per client address.
    pub fn new(auth_rate_limit: u32) -> Self {
        let quota = Quota::per_minute(NonZeroU32::new(auth_rate_limit).unwrap_or(NonZeroU32::MIN));
        Self {
            auth_limiter: RateLimiter::keyed(quota),
            auth_rate_limit,
        }
    }

    /// Configured attempts per minute.
    pub fn auth_rate_limit(&self) -> u32 {
        self.auth_rate_limit
    }

    /// Check if a credential attempt is allowed for the given address.
    pub fn check_auth(&self, ip: IpAddr) -> bool {
        self.auth_limiter.check_key(&ip).is_ok()
    }

    /// Drop limiter state for addresses that are back to a full budget.
    pub fn cleanup(&self) {
        self.auth_limiter.retain_recent();
        self.auth_limiter.shrink_to_fit();
    }

    /// Start a background task to periodically clean up old entries.
    pub fn start_cleanup_task(self: Arc<Self>) {
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_secs(CLEANUP_INTERVAL_SECS)).await;
                self.cleanup();
            }
        });
    }
}

/// Client address from the connection.
///
/// Forwarding headers are ignored: the server is reached directly on the
/// LAN and a client could otherwise pick its own throttle key.
fn get_client_ip(req: &Request<Body>) -> IpAddr {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

/// Rate limiting middleware for PIN verification and admin login.
pub async fn auth_rate_limit(
    state: Arc<RateLimitState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let ip = get_client_ip(&req);

    if !state.check_auth(ip) {
        tracing::warn!(ip = %ip, path = %req.uri().path(), "Auth rate limit exceeded");
        return ApiError::too_many_requests("Too many attempts. Please try again later.")
            .into_response();
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn test_rate_limit_state_new() {
        let state = RateLimitState::new(5);
        assert_eq!(state.auth_rate_limit(), 5);
    }

    #[test]
    fn test_auth_rate_limit() {
        let state = RateLimitState::new(3);

        assert!(state.check_auth(ip("127.0.0.1")));
        assert!(state.check_auth(ip("127.0.0.1")));
        assert!(state.check_auth(ip("127.0.0.1")));

        // 4th request should fail
        assert!(!state.check_auth(ip("127.0.0.1")));

        // Different IP should work
        assert!(state.check_auth(ip("192.168.1.1")));
    }

    #[test]
    fn test_zero_limit_allows_one() {
        let state = RateLimitState::new(0);
        assert!(state.check_auth(ip("10.0.0.1")));
        assert!(!state.check_auth(ip("10.0.0.1")));
    }

    #[test]
    fn test_missing_connect_info_uses_unspecified() {
        let req = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(get_client_ip(&req), IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    }

    #[test]
    fn test_connect_info_used() {
        let mut req = Request::builder().body(Body::empty()).unwrap();
        let addr: SocketAddr = "192.168.1.20:5555".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        assert_eq!(get_client_ip(&req), ip("192.168.1.20"));
    }
}
