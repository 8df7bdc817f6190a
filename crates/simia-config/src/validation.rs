// SPDX-FileCopyrightText: 2026 Simia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as valid bind addresses, scheme-qualified origins,
//! and quota orderings.

use crate::model::SimiaConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<String>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &SimiaConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push("server.host must not be empty".to_string());
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(format!(
                "server.host `{host}` is not a valid IP address or hostname"
            ));
        }
    }

    if !LOG_LEVELS.contains(&config.server.log_level.as_str()) {
        errors.push(format!(
            "server.log_level must be one of {LOG_LEVELS:?}, got `{}`",
            config.server.log_level
        ));
    }

    if config.corpus.data_dir.trim().is_empty() {
        errors.push("corpus.data_dir must not be empty".to_string());
    }

    if config.limits.hourly_limit == 0 {
        errors.push("limits.hourly_limit must be at least 1".to_string());
    }
    if config.limits.daily_limit < config.limits.hourly_limit {
        errors.push(format!(
            "limits.daily_limit ({}) must not be below limits.hourly_limit ({})",
            config.limits.daily_limit, config.limits.hourly_limit
        ));
    }
    if config.limits.global_daily_limit == 0 {
        errors.push("limits.global_daily_limit must be at least 1".to_string());
    }
    for origin in &config.limits.allowed_origins {
        if !origin.starts_with("http://") && !origin.starts_with("https://") {
            errors.push(format!(
                "limits.allowed_origins entry `{origin}` must start with http:// or https://"
            ));
        }
    }

    if config.retrieval.paper_top_k == 0 {
        errors.push("retrieval.paper_top_k must be at least 1".to_string());
    }
    if config.retrieval.chunk_top_k == 0 {
        errors.push("retrieval.chunk_top_k must be at least 1".to_string());
    }
    if config.retrieval.max_per_paper == 0 {
        errors.push("retrieval.max_per_paper must be at least 1".to_string());
    }
    if config.retrieval.cache_capacity == 0 {
        errors.push("retrieval.cache_capacity must be at least 1".to_string());
    }

    if config.gemini.max_output_tokens == 0 {
        errors.push("gemini.max_output_tokens must be at least 1".to_string());
    }

    if config.embedding.dimension == 0 {
        errors.push("embedding.dimension must be at least 1".to_string());
    }
    if !config.embedding.base_url.starts_with("http://")
        && !config.embedding.base_url.starts_with("https://")
    {
        errors.push(format!(
            "embedding.base_url `{}` must start with http:// or https://",
            config.embedding.base_url
        ));
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
