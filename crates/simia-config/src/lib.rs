// SPDX-FileCopyrightText: 2026 Simia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Simia backend.
//!
//! Provides TOML configuration parsing with strict validation
//! (`deny_unknown_fields`), XDG file hierarchy lookup, and environment
//! variable overrides via the `SIMIA_` prefix.
//!
//! # Usage
//!
//! ```no_run
//! use simia_config::load_and_validate;
//!
//! let config = load_and_validate(None).expect("config errors");
//! println!("Binding {}:{}", config.server.host, config.server.port);
//! ```

pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

use simia_core::SimiaError;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{
    CorpusConfig, EmbeddingConfig, GeminiConfig, LimitsConfig, RetrievalConfig, ServerConfig,
    SimiaConfig,
};

/// Load configuration and validate it.
///
/// With `path = None` the XDG hierarchy plus env vars is used; with a
/// path only that file plus env vars. Figment and validation errors are
/// flattened into [`SimiaError::Config`].
pub fn load_and_validate(path: Option<&Path>) -> Result<SimiaConfig, SimiaError> {
    let config = match path {
        Some(p) => loader::load_config_from_path(p),
        None => loader::load_config(),
    }
    .map_err(|e| SimiaError::Config(e.to_string()))?;

    validation::validate_config(&config).map_err(|errors| SimiaError::Config(errors.join("; ")))?;
    Ok(config)
}

/// Load configuration from a TOML string and validate it.
///
/// Useful for testing and explicit configuration.
pub fn load_and_validate_str(toml_content: &str) -> Result<SimiaConfig, SimiaError> {
    let config =
        loader::load_config_from_str(toml_content).map_err(|e| SimiaError::Config(e.to_string()))?;
    validation::validate_config(&config).map_err(|errors| SimiaError::Config(errors.join("; ")))?;
    Ok(config)
}
