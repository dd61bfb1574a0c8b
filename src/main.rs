use anyhow::Result;
use clap::{Parser, ValueEnum};
use oktawave::api::{format_api_error, OktawaveClient};
use oktawave::commands::{self, Command};
use oktawave::config::{Config, Overrides};
use oktawave::report::Printer;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Oktawave command line client
#[derive(Parser, Debug)]
#[command(name = "oktawave", version, about, long_about = None)]
struct Args {
    /// Configuration file (default: <config dir>/oktawave/config.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Oktawave user name
    #[arg(short, long)]
    username: Option<String>,

    /// Oktawave password
    #[arg(short, long)]
    password: Option<String>,

    /// API root URL
    #[arg(long)]
    api_url: Option<String>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,

    /// Shorthand for --log-level debug
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(err) => {
            eprintln!("Cannot open log file {}: {}", log_path.display(), err);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("oktawave started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("oktawave").join("oktawave.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".oktawave").join("oktawave.log");
    }
    PathBuf::from("oktawave.log")
}

async fn run(args: Args) -> Result<()> {
    let config = Config::load(args.config.as_deref())?
        .with_env()
        .with_overrides(Overrides {
            username: args.username,
            password: args.password,
            api_url: args.api_url,
        });

    let credentials = config.credentials()?;
    tracing::info!("Using API at {}", config.effective_api_url());

    let session = OktawaveClient::new(config.effective_api_url(), &credentials)?
        .login()
        .await?;

    let mut printer = Printer::stdout();
    commands::run(args.command, &session, &mut printer).await
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.debug { LogLevel::Debug } else { args.log_level };
    let _log_guard = setup_logging(level);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("Command failed: {:?}", err);
            println!("ERROR: {}", format_api_error(&err));
            ExitCode::FAILURE
        }
    }
}
