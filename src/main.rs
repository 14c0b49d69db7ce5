// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::too_many_arguments)]

use anyhow::{Result, anyhow, Context};
use log::{warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use std::fs::File;
use std::io::BufReader;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::app_config::{Config, TranslationBackend};
use app_controller::{Controller, JobOptions};

mod app_config;
mod app_controller;
mod document;
mod errors;
mod file_utils;
mod language_utils;
mod providers;
mod translation;

/// CLI Wrapper for TranslationBackend to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliBackend {
    /// OpenAI chat completions API
    #[value(alias = "chatgptapi")]
    Chatgpt,
    /// OpenAI legacy completions API
    Gpt3,
    /// Google web translation, no API key needed
    Google,
}

impl From<CliBackend> for TranslationBackend {
    fn from(cli_backend: CliBackend) -> Self {
        match cli_backend {
            CliBackend::Chatgpt => TranslationBackend::ChatGPT,
            CliBackend::Gpt3 => TranslationBackend::GPT3,
            CliBackend::Google => TranslationBackend::Google,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate a book with an AI backend (default command)
    Translate(TranslateArgs),

    /// Generate shell completions for yabtwai
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Input EPUB or plain-text file to translate
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Output path, defaults to a file next to the input
    #[arg(short, long)]
    output_path: Option<PathBuf>,

    /// Translation backend to use
    #[arg(short, long, value_enum)]
    backend: Option<CliBackend>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// Target language (code, variant or English name, e.g. 'zh-hans', 'ja', 'French')
    #[arg(short, long)]
    language: Option<String>,

    /// API key, or several comma-separated keys rotated to spread rate limits
    #[arg(short, long, env = "OPENAI_API_KEY", hide_env_values = true)]
    key: Option<String>,

    /// API base URL other than the official endpoint
    #[arg(long)]
    api_base: Option<String>,

    /// Proxy URL like http://127.0.0.1:7890
    #[arg(short, long)]
    proxy: Option<String>,

    /// Resume an interrupted run from its progress snapshot
    #[arg(short, long)]
    resume: bool,

    /// Translate only the first few units, for testing
    #[arg(long = "test")]
    is_test: bool,

    /// How many units a test run translates
    #[arg(long, default_value_t = 10)]
    test_count: usize,

    /// Comma-separated markup elements to translate, e.g. 'p,blockquote'
    #[arg(long)]
    translate_tags: Option<String>,

    /// Also translate meaningful text runs outside those elements
    #[arg(long)]
    include_text_runs: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// yabtwai - Yet Another Bilingual Translator with AI
///
/// Translates EPUB and plain-text books into another language using AI
/// backends, producing a bilingual output document next to the original.
#[derive(Parser, Debug)]
#[command(name = "yabtwai")]
#[command(author = "yabtwai Team")]
#[command(version = "1.0.0")]
#[command(about = "AI-powered bilingual book translation tool")]
#[command(long_about = "yabtwai translates EPUB and plain-text books using AI backends and writes a
bilingual output document next to the original. Long runs checkpoint their
progress and can be resumed after an interruption.

EXAMPLES:
    yabtwai book.epub -k sk-xxx                # Translate with the default backend
    yabtwai book.epub -k sk-aaa,sk-bbb         # Rotate across several API keys
    yabtwai -b google -l zh-hans book.epub     # Keyless Google web translation
    yabtwai --test --test-count 5 book.epub    # Only translate the first 5 units
    yabtwai -r book.epub                       # Resume an interrupted run
    yabtwai -l ja book.txt -k sk-xxx           # Line-oriented plain text
    yabtwai completions bash > yabtwai.bash    # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default
    one will be created automatically.

SUPPORTED BACKENDS:
    chatgpt - OpenAI chat completions API (requires API key, default)
    gpt3    - OpenAI legacy completions API (requires API key)
    google  - Google web translation (no key required)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input EPUB or plain-text file to translate
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Output path, defaults to a file next to the input
    #[arg(short, long)]
    output_path: Option<PathBuf>,

    /// Translation backend to use
    #[arg(short, long, value_enum)]
    backend: Option<CliBackend>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// Target language (code, variant or English name, e.g. 'zh-hans', 'ja', 'French')
    #[arg(short, long)]
    language: Option<String>,

    /// API key, or several comma-separated keys rotated to spread rate limits
    #[arg(short, long, env = "OPENAI_API_KEY", hide_env_values = true)]
    key: Option<String>,

    /// API base URL other than the official endpoint
    #[arg(long)]
    api_base: Option<String>,

    /// Proxy URL like http://127.0.0.1:7890
    #[arg(short, long)]
    proxy: Option<String>,

    /// Resume an interrupted run from its progress snapshot
    #[arg(short, long)]
    resume: bool,

    /// Translate only the first few units, for testing
    #[arg(long = "test")]
    is_test: bool,

    /// How many units a test run translates
    #[arg(long, default_value_t = 10)]
    test_count: usize,

    /// Comma-separated markup elements to translate, e.g. 'p,blockquote'
    #[arg(long)]
    translate_tags: Option<String>,

    /// Also translate meaningful text runs outside those elements
    #[arg(long)]
    include_text_runs: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");

            let mut stderr = std::io::stderr();
            let emoji = Self::get_emoji_for_level(record.level());
            let _ = match record.level() {
                Level::Error => writeln!(
                    stderr,
                    "\x1B[1;31m{} {} {}\x1B[0m",
                    now, emoji, record.args()
                ),
                Level::Warn => writeln!(
                    stderr,
                    "\x1B[1;33m{} {} {}\x1B[0m",
                    now, emoji, record.args()
                ),
                Level::Info => writeln!(
                    stderr,
                    "\x1B[1;32m{} {} {}\x1B[0m",
                    now, emoji, record.args()
                ),
                Level::Debug => writeln!(
                    stderr,
                    "\x1B[1;36m{} {} {}\x1B[0m",
                    now, emoji, record.args()
                ),
                Level::Trace => writeln!(
                    stderr,
                    "\x1B[1;35m{} {} {}\x1B[0m",
                    now, emoji, record.args()
                ),
            };
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "yabtwai", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Translate(args)) => run_translate(args).await,
        None => {
            // Default behavior - use top-level args directly
            let input_path = cli.input_path.ok_or_else(|| {
                anyhow!("INPUT_PATH is required when no subcommand is specified")
            })?;

            let translate_args = TranslateArgs {
                input_path,
                output_path: cli.output_path,
                backend: cli.backend,
                model: cli.model,
                language: cli.language,
                key: cli.key,
                api_base: cli.api_base,
                proxy: cli.proxy,
                resume: cli.resume,
                is_test: cli.is_test,
                test_count: cli.test_count,
                translate_tags: cli.translate_tags,
                include_text_runs: cli.include_text_runs,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_translate(translate_args).await
        }
    }
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level_filter_for(&config_log_level));
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        // Load existing configuration
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?;

        config
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();

        // Save default config
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // Override config with CLI options if provided
    if let Some(backend) = &options.backend {
        config.translation.backend = backend.clone().into();
    }

    if let Some(model) = &options.model {
        config.translation.set_model(model);
    }

    if let Some(language) = &options.language {
        config.target_language = language.clone();
    }

    if let Some(key) = &options.key {
        config.translation.set_api_keys(key);
    }

    if let Some(api_base) = &options.api_base {
        config.translation.set_api_base(api_base);
    }

    if let Some(proxy) = &options.proxy {
        config.translation.proxy = proxy.clone();
    }

    if let Some(translate_tags) = &options.translate_tags {
        config.document.translate_tags = translate_tags.clone();
    }

    if options.include_text_runs {
        config.document.include_text_runs = true;
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    // Validate the configuration after loading and overriding
    config.validate()
        .context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        // Just update the max level without reinitializing the logger
        log::set_max_level(level_filter_for(&config.log_level));
    }

    // Create controller
    let controller = Controller::with_config(config)?;

    if !options.input_path.is_file() {
        return Err(anyhow!("Input path does not exist: {:?}", options.input_path));
    }

    let job_options = JobOptions {
        output_path: options.output_path.clone(),
        resume: options.resume,
        is_test: options.is_test,
        test_count: options.test_count,
    };

    controller.run(options.input_path.clone(), job_options).await
}

// Map the config log level onto the log crate's filter
fn level_filter_for(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}
