use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use glob::glob;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;
use vehtrack_core::{
    DEFAULT_CHUNK_SIZE, ErrorKind, LoadError, ScanError, ScanOptions, TrailingPolicy,
    VehicleRecord,
};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (commit ",
    env!("VEHTRACK_BUILD_COMMIT"),
    ", built ",
    env!("VEHTRACK_BUILD_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "vehtrack")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Streaming loader for binary vehicle position files.",
    long_about = None,
    after_help = "Examples:\n  vehtrack load VehiclePositions.dat -o report.json\n  vehtrack load VehiclePositions.dat --stdout --pretty\n  vehtrack dump VehiclePositions.dat --limit 10"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load a position file and generate a versioned JSON report.
    Load {
        /// Path to a vehicle position file (a glob matching one file is accepted)
        input: PathBuf,

        /// Output report path (JSON)
        #[arg(short = 'o', long, required_unless_present = "stdout")]
        report: Option<PathBuf>,

        /// Write JSON report to stdout
        #[arg(long, conflicts_with = "report")]
        stdout: bool,

        /// Pretty-print JSON output
        #[arg(long, conflicts_with = "compact")]
        pretty: bool,

        /// Compact JSON output (default)
        #[arg(long)]
        compact: bool,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,

        #[command(flatten)]
        scan: ScanArgs,
    },
    /// Decode a position file and write one JSON record per line.
    Dump {
        /// Path to a vehicle position file (a glob matching one file is accepted)
        input: PathBuf,

        /// Output path (JSON lines); stdout when omitted
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,

        #[command(flatten)]
        scan: ScanArgs,
    },
}

#[derive(Args, Debug)]
struct ScanArgs {
    /// Bytes requested from the file per read
    #[arg(long, value_name = "BYTES", default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,

    /// Stop after this many records
    #[arg(long, value_name = "N")]
    limit: Option<u64>,

    /// Handling of bytes left at end of file that do not form a record
    #[arg(long, value_enum, default_value_t = TrailingArg::Warn)]
    trailing: TrailingArg,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum TrailingArg {
    Ignore,
    Warn,
    Error,
}

impl ScanArgs {
    fn options(&self) -> ScanOptions {
        let trailing = match self.trailing {
            TrailingArg::Ignore => TrailingPolicy::Ignore,
            TrailingArg::Warn => TrailingPolicy::Warn,
            TrailingArg::Error => TrailingPolicy::Error,
        };
        ScanOptions {
            chunk_size: self.chunk_size,
            trailing,
            limit: self.limit,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let quiet = match &cli.command {
        Commands::Load { quiet, .. } | Commands::Dump { quiet, .. } => *quiet,
    };
    init_tracing(cli.verbose, quiet);

    let result = match cli.command {
        Commands::Load {
            input,
            report,
            stdout,
            pretty,
            compact,
            quiet,
            scan,
        } => cmd_load(input, report, stdout, pretty, compact, quiet, &scan),
        Commands::Dump {
            input,
            output,
            quiet,
            scan,
        } => cmd_dump(input, output, quiet, &scan),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

/// Log to stderr so stdout stays reserved for JSON output.
fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => std::env::var("RUST_LOG")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(Level::WARN),
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{:#}", err), None)
    }
}

impl From<LoadError> for CliError {
    fn from(err: LoadError) -> Self {
        let hint = match &err {
            LoadError::Source(_) => Some("check that the file exists and is readable"),
            LoadError::Scan(scan) => match scan.kind() {
                ErrorKind::Config => Some("use a --chunk-size of at least 1"),
                ErrorKind::Io => Some("check that the file is readable"),
                ErrorKind::ShortRead => Some("the file changed size while it was being read"),
                ErrorKind::Framing if matches!(scan, ScanError::TrailingBytes { .. }) => {
                    Some("the file does not end on a record boundary; use --trailing warn to load it anyway")
                }
                ErrorKind::Framing => Some("the file is not a sequence of whole records"),
                ErrorKind::Validation => {
                    Some("the file is corrupt or not a vehicle position file")
                }
            },
        };
        CliError::new(err.to_string(), hint.map(str::to_string))
    }
}

fn cmd_load(
    input: PathBuf,
    report: Option<PathBuf>,
    stdout: bool,
    pretty: bool,
    compact: bool,
    quiet: bool,
    scan: &ScanArgs,
) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(&input)?;
    validate_input_file(&resolved_input)?;
    let report = if stdout {
        None
    } else {
        Some(report.ok_or_else(|| {
            CliError::new(
                "missing output path",
                Some("use -o/--report or --stdout".to_string()),
            )
        })?)
    };
    if let Some(report_path) = report.as_ref() {
        ensure_distinct_output(&resolved_input, report_path, "report")?;
    }

    let rep = vehtrack_core::load_file(&resolved_input, &scan.options())?;
    let json = serialize_report(&rep, pretty, compact)?;

    let Some(report) = report else {
        print!("{}", json);
        return Ok(());
    };

    create_parent_dir(&report)?;
    fs::write(&report, json)
        .with_context(|| format!("Failed to write report: {}", report.display()))?;

    if !quiet {
        eprintln!(
            "OK: {} records loaded -> {}",
            rep.scan.records_total,
            report.display()
        );
    }
    Ok(())
}

fn cmd_dump(
    input: PathBuf,
    output: Option<PathBuf>,
    quiet: bool,
    scan: &ScanArgs,
) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(&input)?;
    validate_input_file(&resolved_input)?;

    let writer: Box<dyn Write> = match output.as_ref() {
        Some(path) => {
            ensure_distinct_output(&resolved_input, path, "output")?;
            create_parent_dir(path)?;
            let file = File::create(path)
                .with_context(|| format!("Failed to create output: {}", path.display()))?;
            Box::new(file)
        }
        None => Box::new(io::stdout().lock()),
    };
    let mut writer = BufWriter::new(writer);

    let mut write_error: Option<anyhow::Error> = None;
    let summary = vehtrack_core::scan_file(&resolved_input, &scan.options(), |record| {
        if write_error.is_none() {
            if let Err(err) = write_record(&mut writer, &record) {
                write_error = Some(err);
            }
        }
    })?;
    if let Some(err) = write_error {
        return Err(err.into());
    }
    writer.flush().context("Failed to flush output")?;

    if !quiet {
        eprintln!("OK: {} records decoded", summary.records);
    }
    Ok(())
}

fn write_record(writer: &mut impl Write, record: &VehicleRecord) -> Result<()> {
    serde_json::to_writer(&mut *writer, record).context("JSON serialization failed")?;
    writer.write_all(b"\n").context("Failed to write output")?;
    Ok(())
}

fn serialize_report(
    rep: &vehtrack_core::Report,
    pretty: bool,
    compact: bool,
) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    if pretty {
        serde_json::to_string_pretty(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn create_parent_dir(path: &Path) -> Result<(), CliError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }
    Ok(())
}

fn ensure_distinct_output(input: &Path, output: &Path, label: &str) -> Result<(), CliError> {
    let input_abs = fs::canonicalize(input)
        .with_context(|| format!("Failed to resolve input path: {}", input.display()))?;
    let output_dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    // A directory that does not exist yet cannot contain the input.
    let Ok(output_dir) = fs::canonicalize(output_dir) else {
        return Ok(());
    };
    let file_name = output
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Invalid {} path", label))?;
    if output_dir.join(file_name) == input_abs {
        return Err(CliError::new(
            format!("{} path must differ from input: {}", label, output.display()),
            Some("choose a different output path".to_string()),
        ));
    }
    Ok(())
}

fn validate_input_file(input: &Path) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("pass the path to a vehicle position file".to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("pass the path to a vehicle position file".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern".to_string()),
        ));
    }
    if matches.len() > 1 {
        let hint = "pass a single position file, or run once per file".to_string();
        let mut message = format!(
            "multiple files match pattern '{}' ({} matches)",
            pattern,
            matches.len()
        );
        let listed = matches
            .iter()
            .take(3)
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>();
        message.push_str("; matches: ");
        message.push_str(&listed.join(", "));
        if matches.len() > 3 {
            message.push_str(", ...");
        }
        return Err(CliError::new(message, Some(hint)));
    }

    Ok(matches.remove(0))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
