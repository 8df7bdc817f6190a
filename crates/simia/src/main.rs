// SPDX-FileCopyrightText: 2026 Simia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Simia - chat backend for a primatology research-paper corpus.
//!
//! This is the binary entry point for the Simia server.

mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use simia_config::SimiaConfig;

/// Simia - chat backend for a primatology research-paper corpus.
#[derive(Parser, Debug)]
#[command(name = "simia", version, about, long_about = None)]
struct Cli {
    /// Path to a configuration file (bypasses the XDG hierarchy).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Simia HTTP server.
    Serve {
        /// Override the configured bind address.
        #[arg(long)]
        host: Option<String>,
        /// Override the configured port.
        #[arg(long)]
        port: Option<u16>,
    },
    /// Manage Simia configuration.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Print the resolved configuration.
    Show,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut config = match simia_config::load_and_validate(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("simia: {err}");
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve { host, port }) => {
            apply_overrides(&mut config, host, port);
            run_server(config).await;
        }
        // Running without a subcommand starts the server.
        None => run_server(config).await,
        Some(Commands::Config {
            command: ConfigCommands::Show,
        }) => match render_config(config) {
            Ok(rendered) => println!("{rendered}"),
            Err(err) => {
                eprintln!("simia: failed to render config: {err}");
                std::process::exit(1);
            }
        },
    }
}

async fn run_server(config: SimiaConfig) {
    if let Err(err) = serve::run_serve(config).await {
        eprintln!("simia: {err}");
        std::process::exit(1);
    }
}

fn apply_overrides(config: &mut SimiaConfig, host: Option<String>, port: Option<u16>) {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
}

/// Renders the resolved configuration as TOML with the API key masked.
fn render_config(mut config: SimiaConfig) -> Result<String, toml::ser::Error> {
    if config.gemini.api_key.is_some() {
        config.gemini.api_key = Some("[redacted]".to_string());
    }
    toml::to_string_pretty(&config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_loads_config_defaults() {
        // Verify config loads with defaults (no config file needed)
        let config = simia_config::load_and_validate_str("")
            .expect("default config should be valid");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn serve_flags_override_the_config() {
        let mut config = simia_config::load_and_validate_str("").unwrap();
        apply_overrides(&mut config, Some("127.0.0.1".to_string()), Some(9090));
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
    }

    #[test]
    fn absent_serve_flags_keep_the_config() {
        let mut config = simia_config::load_and_validate_str("").unwrap();
        apply_overrides(&mut config, None, None);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn rendered_config_hides_the_api_key() {
        let config = simia_config::load_and_validate_str(
            r#"
            [gemini]
            api_key = "sk-secret"
            "#,
        )
        .unwrap();
        let rendered = render_config(config).unwrap();
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("[redacted]"));
    }

    #[test]
    fn rendered_config_keeps_other_sections() {
        let config = simia_config::load_and_validate_str("").unwrap();
        let rendered = render_config(config).unwrap();
        assert!(rendered.contains("[server]"));
        assert!(rendered.contains("[retrieval]"));
    }
}
