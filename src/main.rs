// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{warn, info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use std::fs::File;
use std::io::BufReader;
use clap::{Args, Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use danmaku_converter::app_config::{self, BlockToken, Config, Resolution};
use danmaku_converter::Converter;

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

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert XML danmaku to ASS subtitles (default command)
    Convert {
        /// Input XML file or directory to process
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,

        #[command(flatten)]
        options: ConvertOptions,
    },

    /// Generate shell completions for danmaku-converter
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone)]
struct ConvertOptions {
    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Output directory (defaults to the input file's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, default_value = "danmaku.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Script title (defaults to the input file name)
    #[arg(long)]
    title: Option<String>,

    /// Font family
    #[arg(long)]
    font: Option<String>,

    /// Transparency between 0 and 1
    #[arg(long)]
    alpha: Option<f64>,

    /// Comment types to block, and/or 'color' to block non-white comments
    #[arg(long, value_delimiter = ',')]
    block: Option<Vec<BlockToken>>,

    /// Video width in pixels
    #[arg(long, requires = "height")]
    width: Option<u32>,

    /// Video height in pixels
    #[arg(long, requires = "width")]
    height: Option<u32>,

    /// Use bold styles
    #[arg(long)]
    bold: bool,

    /// Abort on malformed comments instead of skipping them
    #[arg(long)]
    strict: bool,
}

/// danmaku-converter - XML danmaku to ASS subtitles
///
/// Lays out scrolling and fixed video comments on non-overlapping lanes and
/// writes them as an ASS subtitle script.
#[derive(Parser, Debug)]
#[command(name = "danmaku-converter")]
#[command(version)]
#[command(about = "Convert XML danmaku into ASS subtitles")]
#[command(long_about = "danmaku-converter reads XML danmaku files and writes ASS subtitle scripts next to them.

EXAMPLES:
    danmaku-converter video.xml                       # Convert using default config
    danmaku-converter -f ./danmaku/                   # Convert a folder, overwriting outputs
    danmaku-converter video.xml --block 4,5,color     # Drop fixed and colored comments
    danmaku-converter video.xml --width 1280 --height 720

CONFIGURATION:
    Settings are read from danmaku.json (or --config-path). A default file
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input XML file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    #[command(flatten)]
    options: ConvertOptions,
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

    // @returns: ANSI color and marker for level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "ERROR"),
            Level::Warn => ("1;33", "WARN "),
            Level::Info => ("1;32", "INFO "),
            Level::Debug => ("1;36", "DEBUG"),
            Level::Trace => ("1;35", "TRACE"),
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
            let (color, marker) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                color, now, marker, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // Logger starts at trace so the configured level can be applied later
    // through log::set_max_level alone
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "danmaku-converter", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Convert { input_path, options }) => run_convert(&input_path, options),
        None => {
            let input_path = cli.input_path.ok_or_else(|| {
                anyhow!("INPUT_PATH is required when no subcommand is specified")
            })?;
            run_convert(&input_path, cli.options)
        }
    }
}

fn run_convert(input_path: &Path, options: ConvertOptions) -> Result<()> {
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level_filter(&level));
    }

    let config = load_config(&options)?;

    config.validate()
        .context("Configuration validation failed")?;

    if options.log_level.is_none() {
        log::set_max_level(level_filter(&config.log_level));
    }

    let converter = Converter::new(config);

    if input_path.is_file() {
        let output_dir = options.output_dir.clone()
            .unwrap_or_else(|| input_path.parent().unwrap_or(Path::new(".")).to_path_buf());
        if let Some(output_path) = converter.convert_file(input_path, &output_dir, options.force_overwrite)? {
            info!("Success: {:?}", output_path);
        }
    } else if input_path.is_dir() {
        if options.output_dir.is_some() {
            warn!("--output-dir is ignored for folders, outputs are written next to each input");
        }
        let summary = converter.convert_folder(input_path, options.force_overwrite)?;
        if summary.failed > 0 {
            return Err(anyhow!("{} file(s) failed to convert", summary.failed));
        }
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", input_path));
    }

    Ok(())
}

// @loads: Config file (created with defaults if missing) plus CLI overrides
fn load_config(options: &ConvertOptions) -> Result<Config> {
    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    if let Some(title) = &options.title {
        config.title = title.clone();
    }
    if let Some(font) = &options.font {
        config.font = font.clone();
    }
    if let Some(alpha) = options.alpha {
        config.alpha = alpha;
    }
    if let Some(block) = &options.block {
        config.block_types = block.clone();
    }
    if let (Some(width), Some(height)) = (options.width, options.height) {
        config.resolution = Resolution { width, height };
    }
    if options.bold {
        config.bold = true;
    }
    if options.strict {
        config.strict = true;
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    Ok(config)
}
