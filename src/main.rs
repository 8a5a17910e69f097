use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use keyword_vectorizer::{
    CorpusSource, ErrorKind, GoldKeywordSet, KeywordPipeline, KweConfig, KweError,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "keyword-vectorizer",
    about = "Extract keywords from a document with graph ranking and corpus TF-IDF"
)]
struct Cli {
    /// Input .txt/.tex file, or a directory of chapter files
    input: PathBuf,

    /// Number of keywords (overrides the config file)
    #[arg(short, long)]
    n: Option<usize>,

    /// Raw corpus for stage 2: a snapshot, a text file or a directory
    #[arg(long)]
    corpus1: Option<PathBuf>,

    /// Cleaned corpus for stage 3: a snapshot, a text file or a directory
    #[arg(long)]
    corpus2: Option<PathBuf>,

    /// Gold keyword list, one per line (defaults to the embedded list)
    #[arg(long)]
    gold: Option<PathBuf>,

    /// Path to config file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Deduplication threshold (overrides the config file)
    #[arg(long)]
    dedup_lim: Option<f64>,

    /// Save the trained stage-2 model as a snapshot
    #[arg(long)]
    save_raw: Option<PathBuf>,

    /// Save the trained stage-3 model as a snapshot
    #[arg(long)]
    save_clean: Option<PathBuf>,

    /// Also write the keywords to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Only log warnings and errors
    #[arg(long)]
    silent: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.silent { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let (label, code) = match e.kind() {
                ErrorKind::Input => ("input error", 1),
                ErrorKind::Configuration => ("configuration error", 2),
            };
            eprintln!("[{label}] {e}");
            ExitCode::from(code)
        }
    }
}

fn run(cli: Cli) -> Result<(), KweError> {
    let start = Instant::now();

    let config = match &cli.config {
        Some(path) => KweConfig::from_json_file(path)?,
        None => KweConfig::default(),
    };
    let n = cli.n.unwrap_or(config.n);
    let dedup_lim = cli.dedup_lim.unwrap_or(config.dedup_lim);

    let mut pipeline = KeywordPipeline::new(config)?;
    if let Some(path) = &cli.gold {
        pipeline = pipeline.with_gold(GoldKeywordSet::from_path(path)?);
    }

    pipeline.train(
        cli.corpus1.map(CorpusSource::from),
        cli.corpus2.map(CorpusSource::from),
    )?;
    pipeline.save_models(cli.save_raw.as_deref(), cli.save_clean.as_deref())?;

    info!(
        input = %cli.input.display(),
        n,
        stages = pipeline.trained_stages().len(),
        "extracting keywords"
    );
    let keywords = pipeline.extract_keywords_from_path(&cli.input, n, dedup_lim)?;

    if let Some(path) = &cli.output {
        keywords.save(path)?;
    }
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for keyword in keywords.iter() {
        writeln!(out, "{keyword}")?;
    }
    info!(
        keywords = keywords.len(),
        elapsed_secs = start.elapsed().as_secs_f64(),
        "done"
    );
    Ok(())
}
