// SPDX-FileCopyrightText: 2026 Simia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request admission for the chat endpoints.
//!
//! Two checks run in order: the origin allow-list, then rolling rate
//! limits (per-IP hourly, per-IP daily, global daily). Admission never
//! records the request; the handler calls [`AccessGate::record`] exactly
//! once after the request is admitted, so a denied request consumes no
//! quota.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use simia_core::error::DenialReason;
use simia_core::SimiaError;

const HOUR_WINDOW: i64 = 3_600;
const DAY_WINDOW: i64 = 86_400;

/// Clients admitted without an Origin or Referer header.
const LOCAL_CLIENTS: [&str; 3] = ["127.0.0.1", "::1", "localhost"];

/// Access limits for the gate (mirrors `LimitsConfig` from simia-config
/// to avoid a dependency on the config crate).
#[derive(Debug, Clone)]
pub struct GateLimits {
    /// Origins whose requests are admitted; matched by prefix against
    /// the Origin header, then the Referer header.
    pub allowed_origins: Vec<String>,
    /// Requests allowed per client IP per rolling hour.
    pub hourly_limit: usize,
    /// Requests allowed per client IP per rolling day.
    pub daily_limit: usize,
    /// Requests allowed across all clients per rolling day.
    pub global_daily_limit: usize,
}

impl Default for GateLimits {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "https://kordinglab.com".to_string(),
                "https://www.kordinglab.com".to_string(),
                "https://kordinglab.github.io".to_string(),
                "http://localhost:8000".to_string(),
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:8000".to_string(),
            ],
            hourly_limit: 20,
            daily_limit: 100,
            global_daily_limit: 500,
        }
    }
}

/// Outcome of a successful admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    /// Requests left in the tighter of the two per-IP windows, counted
    /// before the current request is recorded.
    pub remaining: usize,
}

#[derive(Debug, Default)]
struct Windows {
    per_ip: HashMap<String, Vec<i64>>,
    global: Vec<i64>,
}

/// Origin allow-list plus in-memory rolling rate limits.
///
/// Timestamps are epoch seconds supplied by the caller, which keeps the
/// window arithmetic testable without a clock.
pub struct AccessGate {
    limits: GateLimits,
    windows: Mutex<Windows>,
}

impl AccessGate {
    pub fn new(limits: GateLimits) -> Self {
        Self {
            limits,
            windows: Mutex::new(Windows::default()),
        }
    }

    /// Checks the allow-list and the quotas for one request.
    ///
    /// Expired window entries are pruned as a side effect. The global
    /// ceiling is checked before any per-IP accounting, so a saturated
    /// service denies every client the same way.
    pub fn admit(
        &self,
        origin: Option<&str>,
        referer: Option<&str>,
        client_ip: &str,
        now: i64,
    ) -> Result<Admission, SimiaError> {
        if !self.origin_allowed(origin, referer, client_ip) {
            return Err(denied(
                DenialReason::UnauthorizedOrigin,
                "Unauthorized origin. This API is only accessible from the official website.",
            ));
        }

        let mut windows = self.lock_windows()?;
        let day_ago = now - DAY_WINDOW;
        let hour_ago = now - HOUR_WINDOW;

        windows.global.retain(|&t| t > day_ago);
        if windows.global.len() >= self.limits.global_daily_limit {
            return Err(denied(
                DenialReason::GlobalLimit,
                "Daily limit reached. The service will reset at midnight UTC. \
                 Please try again tomorrow.",
            ));
        }

        let ip_times = windows.per_ip.entry(client_ip.to_string()).or_default();
        ip_times.retain(|&t| t > day_ago);

        let hourly = ip_times.iter().filter(|&&t| t > hour_ago).count();
        let daily = ip_times.len();

        if hourly >= self.limits.hourly_limit {
            return Err(denied(
                DenialReason::HourlyLimit,
                "Rate limit exceeded. Please try again later.",
            ));
        }
        if daily >= self.limits.daily_limit {
            return Err(denied(
                DenialReason::DailyLimit,
                "Rate limit exceeded. Please try again later.",
            ));
        }

        Ok(Admission {
            remaining: (self.limits.hourly_limit - hourly).min(self.limits.daily_limit - daily),
        })
    }

    /// Records one admitted request in the per-IP and global windows.
    pub fn record(&self, client_ip: &str, now: i64) -> Result<(), SimiaError> {
        let mut windows = self.lock_windows()?;
        windows
            .per_ip
            .entry(client_ip.to_string())
            .or_default()
            .push(now);
        windows.global.push(now);
        Ok(())
    }

    /// Origin header first, Referer second, both matched by prefix.
    /// Requests carrying neither header are admitted only from local
    /// clients, which keeps curl against a dev server working.
    fn origin_allowed(&self, origin: Option<&str>, referer: Option<&str>, client_ip: &str) -> bool {
        let origin = origin.unwrap_or("");
        if !origin.is_empty() && self.matches_allowed(origin) {
            return true;
        }

        let referer = referer.unwrap_or("");
        if !referer.is_empty() && self.matches_allowed(referer) {
            return true;
        }

        if origin.is_empty() && referer.is_empty() {
            return LOCAL_CLIENTS.contains(&client_ip);
        }

        false
    }

    fn matches_allowed(&self, value: &str) -> bool {
        self.limits
            .allowed_origins
            .iter()
            .any(|allowed| value.starts_with(allowed.as_str()))
    }

    fn lock_windows(&self) -> Result<MutexGuard<'_, Windows>, SimiaError> {
        self.windows
            .lock()
            .map_err(|_| SimiaError::Internal("rate limit window lock poisoned".to_string()))
    }
}

fn denied(reason: DenialReason, message: &str) -> SimiaError {
    SimiaError::GateDenied {
        reason,
        message: message.to_string(),
    }
}
