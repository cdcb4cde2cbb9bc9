//! wrapchain CLI - Generate php://filter chains that wrap a file
//!
//! `wrapchain <path> <prefix> <suffix> <nb_bytes>` writes a chain which, when
//! opened by PHP, yields `prefix`, the first bytes of `path` and `suffix`.

mod config;

use clap::{Parser, ValueEnum};
use config::{parse_padding_character, CliConfig};
use indicatif::{ProgressBar, ProgressStyle};
use std::error::Error;
use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;
use wrapchain_format::constants::DEFAULT_PADDING_CHARACTER;
use wrapchain_io::{
    execute_synthesize, OutputSink, SynthesisOpts, SynthesizeRequest, SynthesizeSummary,
    TargetSpec,
};

const DEFAULT_OUTPUT: &str = "chain.txt";

#[derive(Parser)]
#[command(name = "wrapchain")]
#[command(about = "Generate a php://filter chain that adds a prefix and a suffix to a file")]
#[command(version)]
struct Cli {
    /// Path of the file the chain reads
    path: String,
    /// Bytes to write before the contents of the file
    prefix: String,
    /// Bytes to write after the contents of the file
    suffix: String,
    /// Number of bytes to dump, rounded up to a multiple of 3
    nb_bytes: usize,
    /// File to write the chain to [default: chain.txt]
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Character used to pad the prefix [default: M]
    #[arg(long)]
    padding_character: Option<String>,
    /// Read prefix and suffix from the files they name
    #[arg(long)]
    from_file: bool,
    /// Prefix-only chain; truncates the tail of the file
    #[arg(long)]
    fast_prefix: bool,
    /// Skip checking the chain against a canonical source
    #[arg(long)]
    no_verify: bool,
    /// Fail when the chain exceeds the configured limits
    #[arg(long)]
    strict_limits: bool,
    /// TOML file providing defaults for the options above
    #[arg(long)]
    config: Option<PathBuf>,
    /// Summary format
    #[arg(long, value_enum, default_value_t = SummaryFormat::Text)]
    format: SummaryFormat,
    /// Show a spinner while assembling
    #[arg(long)]
    progress: bool,
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SummaryFormat {
    Text,
    Json,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let config = match &cli.config {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::default(),
    };
    debug!(?config, "loaded configuration");

    handle_synthesize(cli, config)
}

fn init_logging(verbose: u8) -> Result<(), Box<dyn Error>> {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn handle_synthesize(cli: Cli, config: CliConfig) -> Result<(), Box<dyn Error>> {
    let start = Instant::now();
    let (prefix, suffix) = if cli.from_file {
        (std::fs::read(&cli.prefix)?, std::fs::read(&cli.suffix)?)
    } else {
        (cli.prefix.into_bytes(), cli.suffix.into_bytes())
    };

    let padding_character = match cli.padding_character.as_deref() {
        Some(value) => parse_padding_character(value)?,
        None => config
            .padding_byte()?
            .unwrap_or(DEFAULT_PADDING_CHARACTER),
    };
    let options = SynthesisOpts {
        padding_character,
        fast_prefix: cli.fast_prefix || config.fast_prefix.unwrap_or(false),
        verify: !cli.no_verify && config.verify.unwrap_or(true),
        limits: config.limits(),
    };
    let output = cli
        .output
        .or_else(|| config.output.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

    let request = SynthesizeRequest {
        resource: cli.path,
        target: TargetSpec::new(prefix, suffix, cli.nb_bytes),
        output: OutputSink::Path(output),
        options,
        strict_limits: cli.strict_limits,
    };

    let mut progress_bar = cli.progress.then(|| create_spinner("Assembling filter chain"));
    let result = execute_synthesize(request);
    let elapsed = start.elapsed();
    if let Some(pb) = progress_bar.take() {
        match &result {
            Ok(summary) => pb.finish_with_message(format!(
                "Assembled {} filters in {:.2?}",
                summary.filters, elapsed
            )),
            Err(_) => pb.abandon(),
        }
    }
    let summary = result?;

    report_summary(&summary, cli.format, elapsed)
}

fn report_summary(
    summary: &SynthesizeSummary,
    format: SummaryFormat,
    elapsed: Duration,
) -> Result<(), Box<dyn Error>> {
    let mut stdout = std::io::stdout().lock();
    match format {
        SummaryFormat::Json => {
            serde_json::to_writer_pretty(&mut stdout, summary)?;
            writeln!(&mut stdout)?;
        }
        SummaryFormat::Text => {
            writeln!(
                &mut stdout,
                "Dumping {} bytes from {}.",
                summary.dumped_len, summary.resource
            )?;
            let output = summary
                .output
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "<writer>".to_string());
            writeln!(
                &mut stdout,
                "Wrote filter chain to {} (size={}, filters: {}, injections: {}, elapsed: {:.2?})",
                output, summary.bytes_written, summary.filters, summary.injections, elapsed
            )?;
            if let Some(warning) = &summary.limit_warning {
                writeln!(&mut stdout, "Warning: {warning}")?;
            }
        }
    }
    Ok(())
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.green} [{elapsed_precise}] {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
