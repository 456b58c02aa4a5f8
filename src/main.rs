// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, error, info};
use std::io::Write;
use std::path::PathBuf;

use srt_relay::app_config::{Config, LogLevel, ProviderKind};
use srt_relay::app_controller::Controller;
use srt_relay::translation::FailurePolicy;

/// CLI Wrapper for ProviderKind to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliProvider {
    Anthropic,
    #[value(name = "deepl")]
    DeepL,
    Mock,
}

impl From<CliProvider> for ProviderKind {
    fn from(cli_provider: CliProvider) -> Self {
        match cli_provider {
            CliProvider::Anthropic => ProviderKind::Anthropic,
            CliProvider::DeepL => ProviderKind::DeepL,
            CliProvider::Mock => ProviderKind::Mock,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate a subtitle file or every subtitle file in a directory
    Translate(TranslateArgs),

    /// Check that a file is a well-formed .srt subtitle
    Validate {
        /// Subtitle file to check
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Generate shell completions for srt-relay
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Input subtitle file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Directory for translated files (default: config output_dir, then home)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliProvider>,

    /// Target language (code or name, e.g. 'hu', 'German')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Maximum entries per provider call
    #[arg(short, long)]
    batch_size: Option<usize>,

    /// Maximum provider calls in flight
    #[arg(short = 'j', long)]
    max_parallel: Option<usize>,

    /// Abort running batches as soon as one fails
    #[arg(long)]
    cancel_on_failure: bool,
}

/// srt-relay - parallel subtitle translation
///
/// Splits .srt files into batches, translates them concurrently with the
/// configured provider and writes the reassembled subtitle file.
#[derive(Parser, Debug)]
#[command(name = "srt-relay")]
#[command(version)]
#[command(about = "Parallel .srt subtitle translation")]
#[command(long_about = "srt-relay translates .srt subtitles by sending batches of entries to a translation provider.

EXAMPLES:
    srt-relay translate movie.srt                 # Translate using default config
    srt-relay translate -t hu movie.srt           # Translate into Hungarian
    srt-relay translate -p deepl -j 8 /subs/      # Whole directory with DeepL, 8 calls in flight
    srt-relay validate movie.srt                  # Check the file format only
    srt-relay completions bash > srt-relay.bash   # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. If the config file doesn't
    exist, a default one will be created automatically.

SUPPORTED PROVIDERS:
    anthropic - Anthropic Claude API (requires API key)
    deepl     - DeepL API (requires API key)
    mock      - Offline provider that tags every line, for dry runs")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation, filtered by the global max level
struct CustomLogger;

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Info until the config is loaded
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();
    if let Some(level) = cli.log_level {
        log::set_max_level(LogLevel::from(level).to_level_filter());
    }

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "srt-relay", &mut std::io::stdout());
            Ok(())
        }
        Commands::Validate { file } => match Controller::validate_file(&file) {
            Ok(count) => {
                info!("{:?} is a valid subtitle file with {} entries", file, count);
                Ok(())
            }
            Err(e) => {
                error!("{:#}", e);
                Err(e)
            }
        },
        Commands::Translate(args) => run_translate(args, cli.config_path, cli.log_level).await,
    }
}

async fn run_translate(options: TranslateArgs, config_path: PathBuf, log_level: Option<CliLogLevel>) -> Result<()> {
    let provider_override = options.provider.map(ProviderKind::from);
    let mut config = Config::load_or_create(&config_path, provider_override)?;

    // Override config with CLI options if provided
    if let Some(provider) = provider_override {
        config.translation.provider = provider;
    }
    if let Some(target_language) = &options.target_language {
        config.target_language = target_language.clone();
    }
    if let Some(batch_size) = options.batch_size {
        config.translation.batch_size = batch_size;
    }
    if let Some(max_parallel) = options.max_parallel {
        config.translation.max_parallel = max_parallel;
    }
    if options.cancel_on_failure {
        config.translation.failure_policy = FailurePolicy::CancelOnFirstFailure;
    }
    match log_level {
        Some(level) => config.log_level = level.into(),
        None => log::set_max_level(config.log_level.to_level_filter()),
    }

    config.validate().context("Configuration validation failed")?;

    let controller = Controller::with_config(config)?;
    let output_dir = options.output_dir.as_deref();

    if options.input_path.is_file() {
        controller.run(&options.input_path, output_dir, options.force_overwrite).await?;
    } else if options.input_path.is_dir() {
        controller.run_folder(&options.input_path, output_dir, options.force_overwrite).await?;
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", options.input_path));
    }

    Ok(())
}
