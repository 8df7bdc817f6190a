// SPDX-FileCopyrightText: 2026 Simia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./simia.toml` > `~/.config/simia/simia.toml` > `/etc/simia/simia.toml`
//! with environment variable overrides via `SIMIA_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::SimiaConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/simia/simia.toml` (system-wide)
/// 3. `~/.config/simia/simia.toml` (user XDG config)
/// 4. `./simia.toml` (local directory)
/// 5. `SIMIA_*` environment variables
pub fn load_config() -> Result<SimiaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SimiaConfig::default()))
        .merge(Toml::file("/etc/simia/simia.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("simia/simia.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("simia.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and inline configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<SimiaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SimiaConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<SimiaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SimiaConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `SIMIA_LIMITS_HOURLY_LIMIT` must map to
/// `limits.hourly_limit`, not `limits.hourly.limit`.
fn env_provider() -> Env {
    // `key` is the lowercased env var name with prefix stripped.
    // Example: SIMIA_GEMINI_API_KEY -> "gemini_api_key"
    Env::prefixed("SIMIA_").map(|key| env_key_to_path(key.as_str()).into())
}

/// Map a stripped, lowercased env var name onto its figment dotted path.
fn env_key_to_path(key: &str) -> String {
    key.replacen("server_", "server.", 1)
        .replacen("corpus_", "corpus.", 1)
        .replacen("limits_", "limits.", 1)
        .replacen("retrieval_", "retrieval.", 1)
        .replacen("gemini_", "gemini.", 1)
        .replacen("embedding_", "embedding.", 1)
}
