//! Scholar CLI - terminal front end for the academic site assistant
//!
//! Binds the chat controller to stdin/stdout and exposes one-shot questions,
//! an interactive session, a backend health check and config management.

mod view;

use clap::{Parser, Subcommand};
use scholar_chat::{ChatController, HealthStatus, HttpChatClient, TurnOutcome};
use scholar_core::{
    init_logging, log_operation_error, log_operation_start, log_operation_success,
    validation_error, LoggingConfig, ScholarConfig, ScholarError, ScholarResult,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use view::{OutputMode, TerminalView};

#[derive(Parser)]
#[command(name = "scholar")]
#[command(about = "Ask questions about the papers and CV behind the academic site")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL (overrides CHAT_API_URL and the config file)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask a single question
    Ask {
        /// Question to ask
        question: String,

        /// Print the rendered HTML instead of plain text
        #[arg(long)]
        html: bool,
    },

    /// Interactive chat session
    Chat {
        /// Print the rendered HTML instead of plain text
        #[arg(long)]
        html: bool,
    },

    /// Check whether the backend is up
    Health,

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Initialize default configuration
        #[arg(long)]
        init: bool,

        /// Reset configuration to defaults
        #[arg(long)]
        reset: bool,

        /// Validate current configuration
        #[arg(long)]
        validate: bool,
    },
}

#[tokio::main]
async fn main() -> ScholarResult<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let logging_config = if cli.verbose {
        LoggingConfig::verbose()
    } else {
        LoggingConfig::default()
    };
    init_logging(&logging_config)?;

    info!("Starting Scholar CLI v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Ask { question, html } => {
            let config = load_config(cli.config.as_ref(), cli.api_url)?;
            handle_ask(&question, output_mode(html), &config).await
        }
        Commands::Chat { html } => {
            let config = load_config(cli.config.as_ref(), cli.api_url)?;
            handle_chat(output_mode(html), &config).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Health => {
            let config = load_config(cli.config.as_ref(), cli.api_url)?;
            handle_health(&config).await
        }
        Commands::Config {
            show,
            init,
            reset,
            validate,
        } => {
            handle_config(cli.config, show, init, reset, validate)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn output_mode(html: bool) -> OutputMode {
    if html {
        OutputMode::Html
    } else {
        OutputMode::Text
    }
}

/// Resolve configuration: CLI flag > CHAT_API_URL > config file > defaults
fn load_config(config_path: Option<&PathBuf>, api_url: Option<String>) -> ScholarResult<ScholarConfig> {
    let config = match config_path {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            ScholarConfig::from_file(path)?
        }
        None => match ScholarConfig::default_paths().into_iter().find(|p| p.exists()) {
            Some(path) => {
                info!("Loading configuration from {:?}", path);
                ScholarConfig::from_file(&path)?
            }
            None => {
                info!("No configuration file found, using defaults");
                ScholarConfig::default()
            }
        },
    };

    let mut config = config.apply_env();
    config.api = config.api.with_host_override(api_url);
    config.validate()?;
    Ok(config)
}

/// Exits non-zero when the turn failed; the failure was already printed.
async fn handle_ask(
    question: &str,
    mode: OutputMode,
    config: &ScholarConfig,
) -> ScholarResult<ExitCode> {
    validate_question(question)?;
    log_operation_start!("ask", endpoint = %config.api.chat_endpoint());

    let client = HttpChatClient::new(&config.api)?;
    let mut chat = ChatController::new(client, TerminalView::stdio(mode, false))
        .with_working_status(config.chat.working_status.clone());

    let Some(outcome) = chat.submit(question).await? else {
        return Err(validation_error!("Question must not be empty", "question", "cli"));
    };

    match &outcome {
        TurnOutcome::Answered(response) => {
            log_operation_success!("ask", sources = response.sources.len());
        }
        TurnOutcome::Failed(kind) => log_operation_error!("ask", kind),
    }
    Ok(ExitCode::from(turn_exit_code(&outcome)))
}

fn validate_question(question: &str) -> ScholarResult<()> {
    if question.trim().is_empty() {
        return Err(validation_error!("Question must not be empty", "question", "cli"));
    }
    Ok(())
}

fn turn_exit_code(outcome: &TurnOutcome) -> u8 {
    if outcome.is_answered() {
        0
    } else {
        1
    }
}

fn health_exit_code(health: &HealthStatus) -> u8 {
    if health.is_healthy() {
        0
    } else {
        2
    }
}

async fn handle_chat(mode: OutputMode, config: &ScholarConfig) -> ScholarResult<()> {
    let client = HttpChatClient::new(&config.api)?;
    let mut chat = ChatController::new(client, TerminalView::stdio(mode, false))
        .with_working_status(config.chat.working_status.clone());

    println!("Scholar chat - connected to {}", config.api.base_url);
    println!("Type 'help' for commands, 'quit' to exit\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        chat.view_mut().prompt()?;
        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };

        match line.trim().to_lowercase().as_str() {
            "quit" | "exit" | "q" => break,
            "help" | "h" => {
                show_help();
                continue;
            }
            _ => {}
        }

        chat.set_input(line);
        if let Err(e) = chat.submit_input().await {
            // The turn already returned to idle; keep the session alive
            e.log();
        }
    }

    info!(messages = chat.transcript().len(), "Chat session ended");
    Ok(())
}

fn show_help() {
    println!("Available commands:");
    println!("  help, h          - Show this help message");
    println!("  quit, exit, q    - Leave the chat");
    println!("  <message>        - Ask a question\n");
}

/// Exit codes: 0 healthy, 1 unreachable, 2 reachable but unhealthy
async fn handle_health(config: &ScholarConfig) -> ScholarResult<ExitCode> {
    let client = HttpChatClient::new(&config.api)?;

    match client.health().await {
        Ok(health) => {
            println!("Backend: {}", config.api.base_url);
            println!("Status:  {}", health.status);
            if let Some(version) = &health.version {
                println!("Version: {}", version);
            }
            let mut services: Vec<_> = health.services.iter().collect();
            services.sort();
            for (name, status) in services {
                println!("  {:<20} {}", name, status);
            }
            Ok(ExitCode::from(health_exit_code(&health)))
        }
        Err(kind) => {
            eprintln!("{}", kind);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn handle_config(
    config_path: Option<PathBuf>,
    show: bool,
    init: bool,
    reset: bool,
    validate: bool,
) -> ScholarResult<()> {
    let target = config_path
        .clone()
        .or_else(|| ScholarConfig::default_paths().into_iter().next())
        .unwrap_or_else(|| PathBuf::from("scholar.toml"));

    if init {
        if target.exists() {
            println!("Configuration already exists at: {:?}", target);
        } else {
            ScholarConfig::default().save_to_file(&target)?;
            println!("Configuration initialized at: {:?}", target);
        }
    }

    if reset {
        ScholarConfig::default().save_to_file(&target)?;
        println!("Configuration reset to defaults at: {:?}", target);
    }

    if show {
        let config = load_config(config_path.as_ref(), None)?;
        let rendered = toml::to_string_pretty(&config).map_err(|e| ScholarError::Config {
            message: format!("Failed to serialize config: {}", e),
            source: Some(Box::new(e)),
            context: scholar_core::ErrorContext::new("cli").with_operation("show_config"),
        })?;
        println!("{}", rendered);
    }

    if validate {
        match load_config(config_path.as_ref(), None) {
            Ok(_) => println!("Configuration is valid"),
            Err(e) => {
                println!("Configuration validation failed: {}", e);
                return Err(e);
            }
        }
    }

    Ok(())
}
