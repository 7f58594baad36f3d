use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{debug, info};

use codesieve_core::{
    FileLines, GuideOptions, InputFormat, Statistics, StyleGuide, build_formatter, color,
    parse_input, run_check_parallel,
};
use codesieve_domain::{DecisionEngine, Notifier};
use codesieve_types::{
    ColorChoice, ConfigFile, DEFAULT_CONFIG_FILE, DecisionTrace, Defaults, EXIT_CLEAN,
    OutputFormat, Verdict,
};

mod config_loader;

use config_loader::{load_config_with_includes, merge_defaults};

#[derive(Parser)]
#[command(name = "codesieve")]
#[command(about = "Select/ignore filter and reporter for style-checker output", long_about = None)]
struct Cli {
    /// Enable verbose (info-level) logging to stderr.
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Enable debug-level logging to stderr.
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter checker output through select/ignore and report what remains.
    Check(Box<CheckArgs>),

    /// Show how the select and ignore lists decide one or more codes.
    Explain(ExplainArgs),

    /// Print the JSON schema of the configuration file.
    Schema,
}

/// Where the lists come from. Shared by `check` and `explain`.
#[derive(Args, Debug, Default)]
struct SelectionArgs {
    /// Path to a config file. If omitted, uses ./codesieve.toml if present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Ignore any config file.
    #[arg(long, conflicts_with = "config")]
    isolated: bool,

    /// Comma-separated code prefixes to report. Replaces the config list.
    #[arg(long, value_delimiter = ',', value_name = "PREFIXES")]
    select: Option<Vec<String>>,

    /// Comma-separated code prefixes to suppress. Replaces the config list.
    #[arg(long, value_delimiter = ',', value_name = "PREFIXES")]
    ignore: Option<Vec<String>>,

    /// Prefixes appended to the select list.
    #[arg(long, value_delimiter = ',', value_name = "PREFIXES")]
    extend_select: Vec<String>,

    /// Prefixes appended to the ignore list.
    #[arg(long, value_delimiter = ',', value_name = "PREFIXES")]
    extend_ignore: Vec<String>,
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Checker output to read ('-' for stdin).
    #[arg(value_name = "INPUT", default_value = "-")]
    input: PathBuf,

    /// Shape of the checker output.
    #[arg(long, value_enum, default_value_t = InputFormatArg::Text)]
    input_format: InputFormatArg,

    #[command(flatten)]
    selection: SelectionArgs,

    /// Report format (defaults to config, else `default`).
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// When to colour text output (defaults to config, else `auto`).
    #[arg(long, value_enum)]
    color: Option<ColorArg>,

    /// Print the offending source line with a caret under the column.
    #[arg(long)]
    show_source: bool,

    /// Report violations on lines marked `# noqa`.
    #[arg(long)]
    disable_noqa: bool,

    /// Print the number of reported violations after the report.
    #[arg(long)]
    count: bool,

    /// Print per-code counts after the report.
    #[arg(long)]
    statistics: bool,

    /// Exit 0 even when violations were reported.
    #[arg(long)]
    exit_zero: bool,

    /// Worker threads. Violations of one file stay on one worker.
    #[arg(long, short = 'j', default_value_t = 1)]
    jobs: usize,

    /// Write the report to PATH instead of stdout.
    #[arg(long, value_name = "PATH")]
    output_file: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ExplainArgs {
    /// Violation codes to explain, e.g. E410.
    #[arg(required = true, value_name = "CODE")]
    codes: Vec<String>,

    #[command(flatten)]
    selection: SelectionArgs,

    /// Emit one JSON object per code.
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum InputFormatArg {
    /// `path:row[:col]: CODE message`
    Text,
    /// One JSON object per line.
    Json,
}

impl From<InputFormatArg> for InputFormat {
    fn from(value: InputFormatArg) -> Self {
        match value {
            InputFormatArg::Text => InputFormat::Text,
            InputFormatArg::Json => InputFormat::Json,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Default,
    Pylint,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Default => OutputFormat::Default,
            FormatArg::Pylint => OutputFormat::Pylint,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ColorArg {
    Auto,
    Always,
    Never,
}

impl From<ColorArg> for ColorChoice {
    fn from(value: ColorArg) -> Self {
        match value {
            ColorArg::Auto => ColorChoice::Auto,
            ColorArg::Always => ColorChoice::Always,
            ColorArg::Never => ColorChoice::Never,
        }
    }
}

/// Run settings after layering command-line flags over the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Settings {
    select: Vec<String>,
    ignore: Vec<String>,
    format: OutputFormat,
    color: ColorChoice,
    show_source: bool,
    disable_noqa: bool,
}

impl Settings {
    fn resolve(config: Defaults, cli: Defaults) -> Self {
        let merged = merge_defaults(config, cli);
        Self {
            select: merged.effective_select(),
            ignore: merged.effective_ignore(),
            format: merged.format.unwrap_or_default(),
            color: merged.color.unwrap_or_default(),
            show_source: merged.show_source.unwrap_or(false),
            disable_noqa: merged.disable_noqa.unwrap_or(false),
        }
    }
}

#[cfg(not(test))]
fn main() -> std::process::ExitCode {
    match run_with_args(std::env::args_os()) {
        Ok(code) => std::process::ExitCode::from(code as u8),
        Err(err) => {
            eprintln!("{err:?}");
            std::process::ExitCode::from(codesieve_types::EXIT_RUNTIME_ERROR as u8)
        }
    }
}

fn run_with_args<I, T>(args: I) -> Result<i32>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = Cli::parse_from(args);

    init_logging(cli.verbose, cli.debug);

    match cli.command {
        Commands::Check(args) => cmd_check(*args),
        Commands::Explain(args) => {
            cmd_explain(args)?;
            Ok(EXIT_CLEAN)
        }
        Commands::Schema => {
            cmd_schema()?;
            Ok(EXIT_CLEAN)
        }
    }
}

fn init_logging(verbose: bool, debug: bool) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    debug!("Logging initialized at level: {}", level);
}

fn cmd_check(args: CheckArgs) -> Result<i32> {
    let config = load_config(&args.selection)?;
    let settings = Settings::resolve(config.defaults, check_overrides(&args));
    debug!("Resolved settings: {:?}", settings);

    let text = read_input(&args.input)?;
    let violations = parse_input(&text, args.input_format.into())
        .with_context(|| format!("parse checker output '{}'", args.input.display()))?;
    info!("Read {} violation(s)", violations.len());

    // Auto colour only applies to the terminal, never to a report file.
    let colorize = match (settings.color, &args.output_file) {
        (ColorChoice::Auto, Some(_)) => false,
        (choice, _) => color::should_colorize(choice),
    };
    let writer = open_output(args.output_file.as_deref())?;
    let formatter = build_formatter(settings.format, settings.show_source, colorize, writer);

    let statistics = Arc::new(Statistics::new());
    let mut notifier = Notifier::new();
    notifier.register("", statistics.clone());

    let guide = StyleGuide::new(
        DecisionEngine::new(settings.select, settings.ignore),
        notifier,
        formatter,
    )
    .with_line_provider(Box::new(FileLines::new()))
    .with_options(GuideOptions {
        show_source: settings.show_source,
        disable_noqa: settings.disable_noqa,
    });

    let run = run_check_parallel(&guide, &violations, args.jobs)?;

    if args.statistics {
        guide.formatter().show_statistics(&statistics)?;
    }
    if args.count {
        println!("{}", statistics.total());
    }

    Ok(run.exit_code(args.exit_zero))
}

fn cmd_explain(args: ExplainArgs) -> Result<()> {
    let config = load_config(&args.selection)?;
    let settings = Settings::resolve(config.defaults, selection_overrides(&args.selection));
    let engine = DecisionEngine::new(settings.select, settings.ignore);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for code in &args.codes {
        let trace = engine.explain(code);
        if args.json {
            writeln!(out, "{}", serde_json::to_string(&trace)?)?;
        } else {
            write!(out, "{}", render_trace(&trace))?;
        }
    }
    Ok(())
}

fn cmd_schema() -> Result<()> {
    let schema = schemars::schema_for!(ConfigFile);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

fn render_trace(trace: &DecisionTrace) -> String {
    format!(
        "{}: {}\n  select: {}\n  ignore: {}\n",
        trace.code,
        trace.decision.as_str(),
        describe_verdict(trace.select, trace.select_prefix.as_deref()),
        describe_verdict(trace.ignore, trace.ignore_prefix.as_deref()),
    )
}

fn describe_verdict(verdict: Verdict, prefix: Option<&str>) -> String {
    match prefix {
        Some(prefix) => format!(
            "{} by '{}' (length {})",
            verdict.as_str(),
            prefix,
            verdict.prefix_len()
        ),
        None => verdict.as_str().to_string(),
    }
}

fn load_config(selection: &SelectionArgs) -> Result<ConfigFile> {
    if selection.isolated {
        debug!("Isolated run, skipping config discovery");
        return Ok(ConfigFile::default());
    }

    let user_path = selection.config.clone().or_else(|| {
        let p = PathBuf::from(DEFAULT_CONFIG_FILE);
        if p.exists() { Some(p) } else { None }
    });

    let Some(path) = user_path else {
        debug!("No config file found, using defaults");
        return Ok(ConfigFile::default());
    };

    info!("Loading config from: {}", path.display());
    load_config_with_includes(&path)
}

/// Split comma-separated prefixes, dropping empty items.
fn split_prefixes(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn selection_overrides(selection: &SelectionArgs) -> Defaults {
    Defaults {
        select: selection.select.as_deref().map(split_prefixes),
        ignore: selection.ignore.as_deref().map(split_prefixes),
        extend_select: split_prefixes(&selection.extend_select),
        extend_ignore: split_prefixes(&selection.extend_ignore),
        ..Defaults::default()
    }
}

fn check_overrides(args: &CheckArgs) -> Defaults {
    Defaults {
        format: args.format.map(Into::into),
        color: args.color.map(Into::into),
        show_source: args.show_source.then_some(true),
        disable_noqa: args.disable_noqa.then_some(true),
        ..selection_overrides(&args.selection)
    }
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        info!("Reading checker output from stdin");
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("read checker output from stdin")?;
        return Ok(buf);
    }

    std::fs::read_to_string(path)
        .with_context(|| format!("read checker output '{}'", path.display()))
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write + Send>> {
    let Some(path) = path else {
        return Ok(Box::new(io::stdout()));
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create directory '{}'", parent.display()))?;
        }
    }
    let file =
        File::create(path).with_context(|| format!("create report '{}'", path.display()))?;
    Ok(Box::new(file))
}
