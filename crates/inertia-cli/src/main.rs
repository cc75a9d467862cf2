use std::fs::OpenOptions;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use inertia_core::scroll::DeltaMode;
use inertia_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "inertia")]
#[command(author, version, about = "Smooth-scrolling terminal page viewer")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the page viewer (default)
    Run,
    /// Trace the inertia loop on a headless page
    Simulate {
        /// Document height in pixels
        #[arg(long, default_value_t = 4000.0)]
        document: f64,
        /// Viewport height in pixels
        #[arg(long, default_value_t = 800.0)]
        viewport: f64,
        /// Wheel delta, in `--mode` units
        #[arg(long, default_value_t = 100.0, allow_negative_numbers = true)]
        delta: f64,
        /// Unit of the wheel delta
        #[arg(long, value_enum, default_value_t = ModeArg::Pixel)]
        mode: ModeArg,
        /// Programmatic scroll target instead of a wheel event
        #[arg(long)]
        scroll_to: Option<f64>,
        /// Starting offset in pixels
        #[arg(long, default_value_t = 0.0)]
        start: f64,
        /// Print only the summary
        #[arg(short, long)]
        quiet: bool,
    },
    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

impl Commands {
    /// `config init` and `config path` must keep working when the file on
    /// disk is unreadable, so they run on defaults
    fn loads_config(&self) -> bool {
        !matches!(
            self,
            Commands::Config {
                action: ConfigAction::Init { .. } | ConfigAction::Path,
            }
        )
    }
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write the default configuration
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
    /// Print the effective configuration
    Show,
    /// Print the configuration file path
    Path,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Pixel,
    Line,
    Page,
}

impl From<ModeArg> for DeltaMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Pixel => DeltaMode::Pixel,
            ModeArg::Line => DeltaMode::Line,
            ModeArg::Page => DeltaMode::Page,
        }
    }
}

fn env_filter(config: &AppConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level))
}

/// Log to stderr for plain commands
fn init_stderr_logging(config: &AppConfig) {
    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Log to a file while the TUI owns the terminal
fn init_file_logging(config: &AppConfig) -> Result<()> {
    let path = config.log_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Run);

    // Load configuration
    let config = if command.loads_config() {
        Arc::new(AppConfig::load()?)
    } else {
        Arc::new(AppConfig::default())
    };

    match command {
        Commands::Run => {
            init_file_logging(&config)?;
            commands::run::run(config).await
        }
        Commands::Simulate {
            document,
            viewport,
            delta,
            mode,
            scroll_to,
            start,
            quiet,
        } => {
            init_stderr_logging(&config);
            let options = commands::simulate::SimulateOptions {
                document_height: document,
                viewport_height: viewport,
                delta,
                mode: mode.into(),
                scroll_to,
                start,
                quiet,
            };
            commands::simulate::run(&config, &options)
        }
        Commands::Config { action } => {
            init_stderr_logging(&config);
            match action {
                ConfigAction::Init { force } => commands::config::init(force),
                ConfigAction::Show => commands::config::show(&config),
                ConfigAction::Path => commands::config::path(),
            }
        }
    }
}
