// SPDX-FileCopyrightText: 2026 Simia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Simia serving stack.

use serde::Serialize;
use thiserror::Error;

/// Reason code attached to a gate denial, distinguishing origin rejection
/// from the three quota ceilings so clients can decide whether retrying
/// later makes sense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    UnauthorizedOrigin,
    HourlyLimit,
    DailyLimit,
    GlobalLimit,
}

impl std::fmt::Display for DenialReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = match self {
            DenialReason::UnauthorizedOrigin => "unauthorized_origin",
            DenialReason::HourlyLimit => "hourly_limit",
            DenialReason::DailyLimit => "daily_limit",
            DenialReason::GlobalLimit => "global_limit",
        };
        f.write_str(code)
    }
}

/// The primary error type used across the Simia crates.
#[derive(Debug, Error)]
pub enum SimiaError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Corpus load errors (unreadable or malformed data files, records without ids).
    #[error("corpus error: {message}")]
    Corpus {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Request rejected by the access gate before any expensive work.
    #[error("request denied ({reason}): {message}")]
    GateDenied {
        reason: DenialReason,
        message: String,
    },

    /// Embedding collaborator failure; retrieval cannot proceed without it.
    #[error("retrieval unavailable: {message}")]
    RetrievalUnavailable {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Generation collaborator failure; callers degrade to the local fallback.
    #[error("generation error: {message}")]
    Generation {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
