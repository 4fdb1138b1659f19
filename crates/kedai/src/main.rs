// SPDX-FileCopyrightText: 2026 Kedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Kedai - WhatsApp order assistant.
//!
//! Binary entry point.

mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use kedai_config::{ConfigError, KedaiConfig};

/// Kedai - WhatsApp order assistant.
#[derive(Parser, Debug)]
#[command(name = "kedai", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the webhook server.
    Serve,
    /// Validate configuration, including the secrets `serve` needs.
    CheckConfig,
}

fn load(path: Option<&PathBuf>) -> Result<KedaiConfig, Vec<ConfigError>> {
    match path {
        Some(path) => kedai_config::load_and_validate_path(path),
        None => kedai_config::load_and_validate(),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load(cli.config.as_ref()) {
        Ok(config) => config,
        Err(errors) => {
            kedai_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(errors) = kedai_config::validate_for_serve(&config) {
                kedai_config::render_errors(&errors);
                std::process::exit(1);
            }
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::CheckConfig) => match kedai_config::validate_for_serve(&config) {
            Ok(()) => println!(
                "kedai: config ok (agent.name={}, server={}:{})",
                config.agent.name, config.server.host, config.server.port
            ),
            Err(errors) => {
                kedai_config::render_errors(&errors);
                std::process::exit(1);
            }
        },
        None => {
            println!("kedai: use --help for available commands");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_subcommands() {
        let cli = Cli::try_parse_from(["kedai", "serve"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Serve)));
        assert!(cli.config.is_none());

        let cli = Cli::try_parse_from(["kedai", "check-config", "--config", "/tmp/k.toml"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::CheckConfig)));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/k.toml")));
    }

    #[test]
    fn rejects_unknown_subcommand() {
        assert!(Cli::try_parse_from(["kedai", "shell"]).is_err());
    }
}
