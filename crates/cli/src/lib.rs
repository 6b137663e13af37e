use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use prose_analysis::{analyze_readability, analyze_tone};
use prose_coordinator::{DocumentAnalyzer, EngineConfig};
use prose_protocol::{serialize_json, AnalysisReport, AnalysisRequest};
use prose_suggest::apply_all;
use serde::Serialize;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

mod watch;

const DEFAULT_CONFIG_FILE: &str = "prose.toml";

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serialize_json(value)?
    };
    print_stdout(&rendered)
}

#[derive(Parser)]
#[command(name = "prose")]
#[command(about = "Tone, readability and grammar analysis for documents", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Engine config file (default: ./prose.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Grammar service root URL (overrides config and PROSE_REMOTE_URL)
    #[arg(long, global = true)]
    remote_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Full report: tone, readability and suggestions
    Analyze(AnalyzeArgs),

    /// Classify the tone of a text
    Tone(InputArgs),

    /// Readability scores and summary
    Readability(InputArgs),

    /// Grammar and spelling suggestions
    Suggest(InputArgs),

    /// Apply every non-overlapping suggestion and print the corrected text
    Fix(FixArgs),

    /// Re-analyze a file whenever it changes
    Watch(WatchArgs),

    /// Print the JSON schema of the analysis report
    Schema,
}

#[derive(Args)]
struct InputArgs {
    /// Text to analyze
    #[arg(long, conflicts_with = "file")]
    text: Option<String>,

    /// Read text from a file (stdin when neither --text nor --file is given)
    #[arg(long)]
    file: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

impl InputArgs {
    fn read_text(&self) -> Result<String> {
        if let Some(text) = &self.text {
            return Ok(text.clone());
        }
        if let Some(path) = &self.file {
            return fs::read_to_string(path)
                .with_context(|| format!("Failed to read text from {}", path.display()));
        }

        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read text from stdin")?;
        Ok(buffer)
    }

    fn document_id(&self) -> String {
        self.file
            .as_ref()
            .map_or_else(|| "stdin".to_string(), |path| path.display().to_string())
    }
}

#[derive(Args)]
struct AnalyzeArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Document id reported back in the output (default: file path or "stdin")
    #[arg(long)]
    document_id: Option<String>,
}

#[derive(Args)]
struct FixArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Write the corrected text back to --file instead of stdout
    #[arg(long, requires = "file")]
    in_place: bool,
}

#[derive(Args)]
pub(crate) struct WatchArgs {
    /// File to watch
    pub(crate) path: PathBuf,

    /// Debounce override in milliseconds
    #[arg(long)]
    pub(crate) debounce_ms: Option<u64>,

    /// Pretty-print each report
    #[arg(long)]
    pub(crate) pretty: bool,
}

pub async fn main_entry() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let config = load_config(&cli)?;

    match cli.command {
        Commands::Analyze(args) => run_analyze(args, &config).await?,
        Commands::Tone(args) => {
            let result = analyze_tone(&args.read_text()?)?;
            print_json(&result, args.pretty)?;
        }
        Commands::Readability(args) => {
            let report = analyze_readability(&args.read_text()?)?;
            print_json(&report, args.pretty)?;
        }
        Commands::Suggest(args) => {
            let analyzer = DocumentAnalyzer::from_config(&config);
            let report = analyzer.suggestions(&args.read_text()?).await?;
            print_json(&report, args.pretty)?;
        }
        Commands::Fix(args) => run_fix(args, &config).await?,
        Commands::Watch(args) => watch::run_watch(args, config).await?,
        Commands::Schema => {
            let schema = schemars::schema_for!(AnalysisReport);
            print_stdout(&serde_json::to_string_pretty(&schema)?)?;
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<EngineConfig> {
    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
            if default_path.is_file() {
                EngineConfig::load(&default_path)?
            } else {
                EngineConfig::default()
            }
        }
    };

    let mut config = config.with_env_overrides()?;
    if let Some(url) = &cli.remote_url {
        config.remote.url = Some(url.clone());
    }
    config.validate()?;

    if config.remote.url.is_none() {
        log::debug!("No grammar service configured; using the local dictionary only");
    }
    Ok(config)
}

async fn run_analyze(args: AnalyzeArgs, config: &EngineConfig) -> Result<()> {
    let request = AnalysisRequest {
        text: args.input.read_text()?,
        document_id: args
            .document_id
            .clone()
            .unwrap_or_else(|| args.input.document_id()),
        generation: 1,
    };
    let report = DocumentAnalyzer::from_config(config)
        .analyze(&request)
        .await?;
    if report.suggestions.degraded {
        log::warn!("Grammar service unavailable; suggestions come from the local dictionary");
    }
    print_json(&report, args.input.pretty)
}

async fn run_fix(args: FixArgs, config: &EngineConfig) -> Result<()> {
    let text = args.input.read_text()?;
    let report = DocumentAnalyzer::from_config(config)
        .suggestions(&text)
        .await?;
    let (fixed, applied) = apply_all(&text, &report.suggestions)?;
    log::info!(
        "Applied {applied} of {} suggestions",
        report.suggestions.len()
    );

    match (&args.input.file, args.in_place) {
        (Some(path), true) => fs::write(path, &fixed)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        _ => print_stdout(&fixed)?,
    }
    Ok(())
}
