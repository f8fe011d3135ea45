// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use sfexport::app_config::{self, Config, Dialect, FootnoteMarkerStyle};
use sfexport::app_controller::{Controller, RunOutcome};
use sfexport::language_utils::language_name;

/// CLI Wrapper for Dialect to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliDialect {
    Toolbox,
    Paratext,
}

impl From<CliDialect> for Dialect {
    fn from(cli_dialect: CliDialect) -> Self {
        match cli_dialect {
            CliDialect::Toolbox => Dialect::Toolbox,
            CliDialect::Paratext => Dialect::Paratext,
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
    /// Export scripture documents (default command)
    Export(ExportArgs),

    /// Generate shell completions for sfexport
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug, Clone)]
struct ExportArgs {
    /// Input JSON document or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    #[command(flatten)]
    options: ExportOptions,
}

#[derive(clap::Args, Debug, Clone)]
struct ExportOptions {
    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Output dialect
    #[arg(short, long, value_enum)]
    dialect: Option<CliDialect>,

    /// Output directory (defaults to the input's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Back translation writing systems, comma separated (e.g. 'en,fr')
    #[arg(short, long, value_delimiter = ',')]
    back_translation: Vec<String>,

    /// Skip vernacular text
    #[arg(long)]
    no_scripture: bool,

    /// Export reviewer notes as \rem lines
    #[arg(short, long)]
    notes: bool,

    /// Use the notes' own symbols as footnote callers
    #[arg(long)]
    symbolic_callers: bool,

    /// Only export these book codes, comma separated (e.g. 'GEN,EXO')
    #[arg(long, value_delimiter = ',')]
    books: Vec<String>,

    /// Configuration file path
    #[arg(short, long, default_value = app_config::DEFAULT_CONFIG_FILE)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// sfexport - Standard Format scripture export
///
/// Serializes scripture documents into Toolbox or Paratext marker text.
#[derive(Parser, Debug)]
#[command(name = "sfexport")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
#[command(about = "Export scripture documents to standard format markup")]
#[command(long_about = "sfexport writes scripture documents (JSON) as backslash-marker text.

EXAMPLES:
    sfexport genesis.json                       # Export using default config
    sfexport -f genesis.json                    # Force overwrite existing files
    sfexport -d paratext genesis.json           # Write continuous Paratext markup
    sfexport -b en genesis.json                 # Include the English back translation
    sfexport -b en,fr --no-scripture gen.json   # Back translation only, two writing systems
    sfexport -n genesis.json                    # Include reviewer notes
    sfexport --log-level debug /projects/       # Process an entire directory
    sfexport completions bash > sfexport.bash   # Generate bash completions

CONFIGURATION:
    Configuration is stored in sfexport.json by default. You can specify a
    different file with --config-path. If the file doesn't exist, a default
    one will be created automatically.

DIALECTS:
    toolbox  - One record per chapter and verse (.db)
    paratext - Continuous USFM-style text (.sfm)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input JSON document or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    #[command(flatten)]
    options: ExportOptions,
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

    // @returns: ANSI color and prefix for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "error:"),
            Level::Warn => ("1;33", "warn: "),
            Level::Info => ("1;32", ""),
            Level::Debug => ("1;36", "debug:"),
            Level::Trace => ("1;35", "trace:"),
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
            let (color, prefix) = Self::style_for_level(record.level());
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                color,
                now,
                prefix,
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
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

fn main() -> Result<()> {
    // Initialize with the most verbose level; the effective level is set once the config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "sfexport", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Export(args)) => run_export(args),
        None => {
            // Default behavior uses the top-level args
            let input_path = cli.input_path.ok_or_else(|| {
                anyhow!("INPUT_PATH is required when no subcommand is specified")
            })?;
            run_export(ExportArgs {
                input_path,
                options: cli.options,
            })
        }
    }
}

/// Apply command line overrides on top of the loaded configuration
fn apply_overrides(config: &mut Config, options: &ExportOptions) {
    if let Some(dialect) = &options.dialect {
        config.export.dialect = dialect.clone().into();
    }
    if !options.back_translation.is_empty() {
        config.export.export_back_translation_domain = true;
        config.export.requested_writing_systems = options
            .back_translation
            .iter()
            .map(|ws| ws.trim().to_string())
            .filter(|ws| !ws.is_empty())
            .collect();
    }
    if options.no_scripture {
        config.export.export_scripture_domain = false;
    }
    if options.notes {
        config.export.export_notes_domain = true;
    }
    if options.symbolic_callers {
        config.export.footnote_marker_style = FootnoteMarkerStyle::Symbolic;
    }
    if !options.books.is_empty() {
        config.export.book_filter = options.books.clone();
    }
    if let Some(dir) = &options.output_dir {
        config.output.directory = Some(dir.to_string_lossy().to_string());
    }
    if options.force_overwrite {
        config.output.force_overwrite = true;
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
}

fn run_export(args: ExportArgs) -> Result<()> {
    let ExportArgs { input_path, options } = args;

    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level_filter(&level));
    }

    let config_path = Path::new(&options.config_path);
    if !config_path.exists() {
        warn!(
            "Config file not found at '{}', creating default config.",
            options.config_path
        );
    }
    let mut config = Config::load_or_create(config_path)
        .with_context(|| format!("Failed to load config: {}", options.config_path))?;
    apply_overrides(&mut config, &options);

    config.validate().context("Configuration validation failed")?;
    log::set_max_level(level_filter(&config.log_level));

    let controller = Controller::with_config(config)?;
    if controller.config().export.export_back_translation_domain {
        let names: Vec<String> = controller
            .config()
            .export
            .requested_writing_systems
            .iter()
            .map(|ws| match language_name(ws) {
                Some(name) => format!("{} ({})", name, ws),
                None => ws.clone(),
            })
            .collect();
        info!("Back translation: {}", names.join(", "));
    }

    if input_path.is_file() {
        let output_dir = match &controller.config().output.directory {
            Some(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => input_path
                .parent()
                .unwrap_or(Path::new("."))
                .to_path_buf(),
        };
        match controller.run(&input_path, &output_dir, options.force_overwrite)? {
            RunOutcome::Exported { summary, .. } => {
                if summary.annotations_placed > 0 {
                    info!("{} note(s) written", summary.annotations_placed);
                }
            }
            RunOutcome::Skipped { .. } => {}
        }
    } else if input_path.is_dir() {
        let totals = controller.run_folder(&input_path, options.force_overwrite)?;
        if totals.failed > 0 {
            return Err(anyhow!("{} document(s) failed to export", totals.failed));
        }
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", input_path));
    }

    Ok(())
}
