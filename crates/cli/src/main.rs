//! FAQ Bot CLI
//!
//! Main entry point for the course FAQ question-answering tool.
//! Serves the question page or answers a single question from the terminal.

mod commands;
mod page;

use clap::{Parser, Subcommand};
use commands::{AskCommand, ServeCommand};
use faq_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// FAQ Bot - answers course questions from the FAQ index
#[derive(Parser, Debug)]
#[command(name = "faq-bot")]
#[command(about = "Retrieval-augmented Q&A over the course FAQ", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file (default: ./faq.yaml when present)
    #[arg(short, long, global = true, env = "FAQ_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    no_color: bool,

    /// Model identifier
    #[arg(short, long, global = true, env = "FAQ_MODEL")]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the question page
    Serve(ServeCommand),

    /// Answer a single question
    Ask(AskCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load base configuration from file and environment
    let config = AppConfig::load(cli.config.as_deref())?;

    // Apply CLI overrides
    let config = config.with_overrides(cli.model, cli.log_level, cli.verbose, cli.no_color);

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("FAQ Bot starting");
    tracing::debug!("Config file: {:?}", config.config_file);
    tracing::debug!("Search: {} / {}", config.search.endpoint, config.search.index);
    tracing::debug!("Model: {} ({})", config.llm.model, config.llm.provider);

    config.validate()?;

    if config.api_key.is_none() {
        tracing::warn!(
            "No API key found in environment variable {}; answers will fail until it is set",
            config.llm.api_key_env
        );
    }

    // Emit command span
    let command_name = match &cli.command {
        Commands::Serve(_) => "serve",
        Commands::Ask(_) => "ask",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    // Route to command handlers
    let result = match cli.command {
        Commands::Serve(cmd) => cmd.execute(&config).await,
        Commands::Ask(cmd) => cmd.execute(&config).await,
    };

    // Log completion
    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_ask_with_globals() {
        let cli = Cli::try_parse_from([
            "faq-bot",
            "ask",
            "How do I join?",
            "--json",
            "--model",
            "gemini-2.5-pro",
        ])
        .unwrap();

        assert_eq!(cli.model.as_deref(), Some("gemini-2.5-pro"));
        match cli.command {
            Commands::Ask(cmd) => {
                assert_eq!(cmd.question, "How do I join?");
                assert!(cmd.json);
            }
            _ => panic!("Expected ask command"),
        }
    }

    #[test]
    fn test_no_color_env_accepts_any_value() {
        std::env::set_var("NO_COLOR", "1");
        let cli = Cli::try_parse_from(["faq-bot", "serve"]);
        std::env::remove_var("NO_COLOR");

        assert!(cli.unwrap().no_color);
    }

    #[test]
    fn test_parse_serve_bind() {
        let cli = Cli::try_parse_from(["faq-bot", "serve", "--bind", "0.0.0.0:9000"]).unwrap();
        match cli.command {
            Commands::Serve(cmd) => assert_eq!(cmd.bind.port(), 9000),
            _ => panic!("Expected serve command"),
        }
    }
}
