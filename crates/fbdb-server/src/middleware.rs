use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{Request, State},
    http::{
        header::{AUTHORIZATION, WWW_AUTHENTICATE},
        HeaderValue,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use fbdb_core::{AdminContext, AdminUser, AppConfig, Environment};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::api::ApiError;

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Admin credential check used by [`require_admin`].
#[derive(Debug, Clone)]
pub struct AdminAuth {
    admin: Option<Arc<AdminUser>>,
}

impl AdminAuth {
    /// Builds the admin check from `FBDB_ADMIN_USERNAME` / `FBDB_ADMIN_PASSWORD_HASH`.
    ///
    /// In development, a missing hash disables admin auth for local iteration.
    /// Elsewhere config loading has already rejected a missing hash.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        match &config.admin_password_hash {
            Some(hash) => Ok(Self::with_admin(AdminUser::new(
                &config.admin_username,
                hash.clone(),
            )?)),
            None if config.env == Environment::Development => {
                tracing::warn!(
                    "FBDB_ADMIN_PASSWORD_HASH not set; admin auth disabled in development environment"
                );
                Ok(Self::disabled())
            }
            None => anyhow::bail!(
                "FBDB_ADMIN_PASSWORD_HASH is required outside development; generate one with `fbdb-cli admin hash-password`"
            ),
        }
    }

    #[must_use]
    pub fn with_admin(admin: AdminUser) -> Self {
        Self {
            admin: Some(Arc::new(admin)),
        }
    }

    #[must_use]
    pub fn disabled() -> Self {
        Self { admin: None }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.admin.is_some()
    }

    fn authorize(&self, header: Option<&HeaderValue>) -> Option<AdminContext> {
        let Some(admin) = &self.admin else {
            return Some(AdminContext::unauthenticated_dev());
        };
        let (username, password) = extract_basic_credentials(header)?;
        admin.authenticate(&username, &password)
    }
}

#[derive(Debug, Clone)]
struct RateLimitWindow {
    started_at: Instant,
    count: usize,
}

/// Fixed-window limiter shared by every rate-limited route.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    max_requests: usize,
    window: Duration,
    state: Arc<Mutex<RateLimitWindow>>,
}

impl RateLimitState {
    #[must_use]
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            state: Arc::new(Mutex::new(RateLimitWindow {
                started_at: Instant::now(),
                count: 0,
            })),
        }
    }

    /// `requests_per_minute` over a one-minute window.
    #[must_use]
    pub fn per_minute(requests_per_minute: usize) -> Self {
        Self::new(requests_per_minute, Duration::from_secs(60))
    }
}

/// The request ID set by [`request_id`], or a fresh one if that layer did not run.
fn current_request_id(req: &Request) -> String {
    req.extensions()
        .get::<RequestId>()
        .map_or_else(|| Uuid::new_v4().to_string(), |id| id.0.clone())
}

/// Axum middleware that extracts or generates a request ID.
///
/// If the incoming request has an `x-request-id` header, that value is used.
/// Otherwise a new `UUIDv4` is generated. The ID is:
/// - Inserted into request extensions as [`RequestId`]
/// - Set on the response as the `x-request-id` header
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}

/// Middleware enforcing HTTP Basic admin credentials.
///
/// On success the caller's [`AdminContext`] is inserted as a request extension.
pub async fn require_admin(State(auth): State<AdminAuth>, mut req: Request, next: Next) -> Response {
    // Key derivation is CPU-bound; keep it off the async workers.
    let header = req.headers().get(AUTHORIZATION).cloned();
    let context = tokio::task::spawn_blocking(move || auth.authorize(header.as_ref()))
        .await
        .ok()
        .flatten();

    match context {
        Some(context) => {
            req.extensions_mut().insert(context);
            next.run(req).await
        }
        None => {
            tracing::warn!(path = %req.uri().path(), "rejected admin request");
            let mut res = ApiError::new(
                current_request_id(&req),
                "unauthorized",
                "missing or invalid admin credentials",
            )
            .into_response();
            res.headers_mut().insert(
                WWW_AUTHENTICATE,
                HeaderValue::from_static("Basic realm=\"feedback-admin\""),
            );
            res
        }
    }
}

/// Middleware enforcing a fixed request-per-window limit.
pub async fn enforce_rate_limit(
    State(rate_limit): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    let mut window = rate_limit.state.lock().await;
    let elapsed = window.started_at.elapsed();

    if elapsed >= rate_limit.window {
        window.started_at = Instant::now();
        window.count = 0;
    }

    if window.count >= rate_limit.max_requests {
        drop(window);
        return ApiError::new(current_request_id(&req), "rate_limited", "rate limit exceeded")
            .into_response();
    }

    window.count += 1;
    drop(window);

    next.run(req).await
}

fn extract_basic_credentials(value: Option<&HeaderValue>) -> Option<(String, String)> {
    let encoded = value
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Basic "))
        .map(str::trim)
        .filter(|s| !s.is_empty())?;
    let decoded = STANDARD.decode(encoded).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}
