//! Per-client fixed-window request limits.

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};
use tracing::{debug, warn};

use crate::error::ApiError;

const MAX_TRACKED_CLIENTS: usize = 10_000;
const PRUNE_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

pub struct RateLimiter {
    limit: u32,
    period: Duration,
    trust_forwarded_for: bool,
    windows: DashMap<String, Window>,
    last_prune: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(limit: u32, period: Duration) -> Self {
        Self {
            limit,
            period,
            trust_forwarded_for: false,
            windows: DashMap::new(),
            last_prune: Mutex::new(None),
        }
    }

    pub fn per_minute(limit: u32) -> Self {
        Self::new(limit, Duration::from_secs(60))
    }

    pub fn per_hour(limit: u32) -> Self {
        Self::new(limit, Duration::from_secs(60 * 60))
    }

    /// Keys clients by the first `X-Forwarded-For` hop instead of the peer
    /// address. Only enable behind a proxy that overwrites the header.
    pub fn trust_forwarded_for(mut self, trust: bool) -> Self {
        self.trust_forwarded_for = trust;
        self
    }

    /// Counts one request for `key`. On rejection returns how long until the
    /// key's window resets.
    pub fn check(&self, key: &str) -> Result<(), Duration> {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> Result<(), Duration> {
        if self.windows.len() > MAX_TRACKED_CLIENTS {
            self.prune_expired(now);
        }

        let mut window = self.windows.entry(key.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });

        let elapsed = now.duration_since(window.started);
        if elapsed >= self.period {
            window.started = now;
            window.count = 0;
        }

        if window.count >= self.limit {
            return Err(self.period - now.duration_since(window.started));
        }
        window.count += 1;
        Ok(())
    }

    // At most one full scan per PRUNE_INTERVAL, however many clients are live.
    fn prune_expired(&self, now: Instant) {
        {
            let Ok(mut last) = self.last_prune.lock() else {
                return;
            };
            if matches!(*last, Some(at) if now.duration_since(at) < PRUNE_INTERVAL) {
                return;
            }
            *last = Some(now);
        }
        self.windows
            .retain(|_, window| now.duration_since(window.started) < self.period);
        debug!(tracked = self.windows.len(), "Pruned expired rate limit windows");
    }
}

/// Identifies the caller by peer address. With `trust_forwarded_for` the
/// first `X-Forwarded-For` hop wins when present.
pub fn client_key(req: &Request, trust_forwarded_for: bool) -> String {
    if trust_forwarded_for {
        let forwarded = req
            .headers()
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());
        if let Some(ip) = forwarded {
            return ip.to_string();
        }
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiter>>,
    req: Request,
    next: Next,
) -> Response {
    let key = client_key(&req, limiter.trust_forwarded_for);
    match limiter.check(&key) {
        Ok(()) => next.run(req).await,
        Err(retry_after) => {
            warn!(client = %key, path = %req.uri().path(), "Rate limit exceeded");
            ApiError::RateLimited {
                retry_after_secs: retry_after.as_secs().max(1),
            }
            .into_response()
        }
    }
}
