//! `lagoon-log`: forward messages as JSON log records.
//!
//! Records go to stdout and, when the collector is reachable, to
//! `log_host:log_port` over UDP.
//!
//! ```text
//! lagoon-log --log-type shop-prod --log-host logs.example.com "deploy finished"
//! tail -f app.log | lagoon-log --config lagoon.toml --level warn
//! ```

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

use lagoon_logs::config::loader::load_config;
use lagoon_logs::{LoggerConfig, LoggerContext};

#[derive(Parser)]
#[command(name = "lagoon-log")]
#[command(about = "Forward messages as JSON log records to stdout and a UDP collector", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Remote collector host.
    #[arg(long)]
    log_host: Option<String>,

    /// Remote collector UDP port.
    #[arg(long)]
    log_port: Option<u16>,

    /// Log type (index namespace). Required here or in the config file.
    #[arg(short = 't', long)]
    log_type: Option<String>,

    #[arg(long)]
    application_name: Option<String>,

    #[arg(long)]
    log_channel: Option<String>,

    /// Leave the source location out of records.
    #[arg(long)]
    no_source: bool,

    /// Level of the forwarded records.
    #[arg(short, long, value_enum, default_value_t = Level::Info)]
    level: Level,

    /// Message to log. Without it, each stdin line is forwarded.
    message: Vec<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Cli {
    fn logger_config(&self) -> Result<LoggerConfig, lagoon_logs::ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => LoggerConfig::new(),
        };

        if let Some(host) = &self.log_host {
            config.log_host = host.clone();
        }
        if let Some(port) = self.log_port {
            config.log_port = port;
        }
        if let Some(log_type) = &self.log_type {
            config.log_type = log_type.clone();
        }
        if let Some(name) = &self.application_name {
            config.application_name = name.clone();
        }
        if let Some(channel) = &self.log_channel {
            config.log_channel = channel.clone();
        }
        if self.no_source {
            config.add_source = false;
        }

        Ok(config)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.logger_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Console logger for warnings raised before the JSON logger exists.
    let bootstrap = tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "lagoon_logs=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr));

    let logger = LoggerContext::new();
    if let Err(e) = tracing::subscriber::with_default(bootstrap, || logger.initialize(config)) {
        eprintln!("error: {e}");
        return ExitCode::FAILURE;
    }

    let forwarded = if cli.message.is_empty() {
        forward_stdin(cli.level)
    } else {
        emit(cli.level, &cli.message.join(" "));
        Ok(())
    };

    if let Err(e) = logger.shutdown() {
        eprintln!("error: closing log transport: {e}");
    }

    match forwarded {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: reading stdin: {e}");
            ExitCode::FAILURE
        }
    }
}

fn forward_stdin(level: Level) -> io::Result<()> {
    for line in io::stdin().lock().lines() {
        let line = line?;
        let line = line.trim_end();
        if !line.is_empty() {
            emit(level, line);
        }
    }
    Ok(())
}

fn emit(level: Level, message: &str) {
    match level {
        Level::Debug => tracing::debug!("{}", message),
        Level::Info => tracing::info!("{}", message),
        Level::Warn => tracing::warn!("{}", message),
        Level::Error => tracing::error!("{}", message),
    }
}
