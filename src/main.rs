use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use renovate_feedback::cli::commands;

/// Parse output format from string
fn parse_format(s: &str) -> Result<String, String> {
    match s.to_lowercase().as_str() {
        "text" | "json" => Ok(s.to_lowercase()),
        _ => Err(format!("Invalid format '{}'. Valid values: text, json", s)),
    }
}

#[derive(Parser)]
#[command(name = "renovate-feedback")]
#[command(
    version,
    about = "Schema-gated, LLM-driven feedback for Renovate configuration files"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(
        long,
        short,
        global = true,
        help = "Project config file (default: .renovate-feedback/config.toml)"
    )]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a Renovate config and generate feedback
    Check {
        #[arg(help = "Renovate JSON file, or '-' for stdin")]
        input: PathBuf,
        #[arg(long, help = "Model to use")]
        model: Option<String>,
        #[arg(long, help = "Output token budget (the first attempt uses at least 1200)")]
        max_output_tokens: Option<u32>,
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            value_parser = parse_format,
            help = "Output format: text, json"
        )]
        format: String,
    },

    /// Run the schema gate only
    Validate {
        #[arg(help = "Renovate JSON file, or '-' for stdin")]
        input: PathBuf,
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            value_parser = parse_format,
            help = "Output format: text, json"
        )]
        format: String,
    },

    /// Serve POST /feedback over HTTP
    Serve {
        #[arg(long, help = "Bind host (overrides config)")]
        host: Option<String>,
        #[arg(long, short, help = "Bind port (overrides config)")]
        port: Option<u16>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(short = 'g', long, help = "Show global config file only")]
        global: bool,
        #[arg(
            short = 'f',
            long,
            default_value = "toml",
            help = "Output format: toml, json, yaml"
        )]
        format: String,
    },
    /// Show configuration file paths
    Path,
    /// Initialize configuration
    Init {
        #[arg(long, short, help = "Initialize global config")]
        global: bool,
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mrenovate-feedback encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Call default hook for backtrace (if RUST_BACKTRACE=1)
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    // Logs go to stderr so `check --format json` stays pipeable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Check {
            input,
            model,
            max_output_tokens,
            format,
        } => {
            let rt = Runtime::new()?;
            rt.block_on(commands::check::run(commands::check::CheckOptions {
                input,
                config: cli.config,
                model,
                max_output_tokens,
                format,
            }))?;
        }
        Commands::Validate { input, format } => {
            commands::validate::run(&input, cli.config, &format)?;
        }
        Commands::Serve { host, port } => {
            let rt = Runtime::new()?;
            rt.block_on(commands::serve::run(cli.config, host, port))?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { global, format } => {
                commands::config::show(cli.config, global, &format)?;
            }
            ConfigAction::Path => {
                commands::config::path()?;
            }
            ConfigAction::Init { global, force } => {
                commands::config::init(global, force)?;
            }
        },
    }

    Ok(())
}
