//! Request processing middleware

pub mod auth;
pub mod rate_limit;

pub use auth::{require_auth, AuthState, AuthUser};
pub use rate_limit::{inject_client_ip, rate_limit_middleware, FixedWindowLimiter, RateLimitState};
