//! dataset-runner: headless dataset generation.
//!
//! Usage:
//!   dataset-runner --seed 42 --accounts 1000 --documents 1500 --out dataset.csv
//!   dataset-runner --config gen.json --format jsonl --unlabeled --out features.jsonl
//!   dataset-runner --seed 7 --db runs.db

use anyhow::{anyhow, Result};
use fraudgen_core::{
    config::GeneratorConfig,
    export::{write_rows, LabelMode, OutputFormat},
    generator::{Dataset, DatasetGenerator},
    store::DatasetStore,
};
use std::env;
use std::fs::File;
use std::io::{self, BufWriter};
use std::str::FromStr;

#[derive(serde::Serialize)]
struct RunSummary<'a> {
    run_id: &'a str,
    seed: u64,
    accounts: usize,
    flagged_accounts: usize,
    rows: usize,
    fraud_rows: usize,
    fraud_rate: f64,
    patterns: std::collections::BTreeMap<&'static str, usize>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let mut config = match string_arg(&args, "--config")? {
        Some(path) => GeneratorConfig::load(path)?,
        None => GeneratorConfig::default(),
    };
    config.seed = parse_arg(&args, "--seed", config.seed)?;
    config.account_count = parse_arg(&args, "--accounts", config.account_count)?;
    config.document_count = parse_arg(&args, "--documents", config.document_count)?;
    config.first_document_id = parse_arg(&args, "--first-document-id", config.first_document_id)?;

    let format: OutputFormat = match string_arg(&args, "--format")? {
        Some(f) => f.parse()?,
        None => OutputFormat::Csv,
    };
    let mode = if args.iter().any(|a| a == "--unlabeled") {
        LabelMode::Unlabeled
    } else {
        LabelMode::Labeled
    };
    let out = string_arg(&args, "--out")?;
    let db = string_arg(&args, "--db")?;
    let json_summary = args.iter().any(|a| a == "--json-summary");

    // Data goes to stdout when no --out is given, so the banner goes to stderr.
    eprintln!("fraudgen: dataset-runner");
    eprintln!("  seed:       {}", config.seed);
    eprintln!("  accounts:   {}", config.account_count);
    eprintln!("  documents:  {}", config.document_count);
    eprintln!("  out:        {}", out.unwrap_or("<stdout>"));
    eprintln!();

    let generator = DatasetGenerator::new(config)?;
    let dataset = generator.generate()?;

    match out {
        Some(path) => write_rows(&dataset.rows, format, mode, BufWriter::new(File::create(path)?))?,
        None => write_rows(&dataset.rows, format, mode, io::stdout().lock())?,
    }

    let run_id = format!("run-{}-{}", generator.config().seed, chrono::Utc::now().timestamp());
    if let Some(path) = db {
        let store = DatasetStore::open(path)?;
        store.migrate()?;
        store.insert_run(&run_id, generator.config(), env!("CARGO_PKG_VERSION"))?;
        store.insert_rows(&run_id, &dataset.rows)?;
        store.insert_trace(&run_id, &dataset.trace)?;
        log::info!("stored run {run_id} in {path}");
    }

    print_summary(&dataset, &run_id, generator.config().seed, json_summary)
}

fn print_summary(dataset: &Dataset, run_id: &str, seed: u64, as_json: bool) -> Result<()> {
    let rows = dataset.rows.len();
    let fraud_rows = dataset.fraud_count();
    let summary = RunSummary {
        run_id,
        seed,
        accounts: dataset.accounts.len(),
        flagged_accounts: dataset.flagged_account_count(),
        rows,
        fraud_rows,
        fraud_rate: if rows == 0 { 0.0 } else { fraud_rows as f64 / rows as f64 },
        patterns: dataset.tally(),
    };

    if as_json {
        eprintln!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    eprintln!("=== RUN SUMMARY ===");
    eprintln!("  run_id:           {}", summary.run_id);
    eprintln!("  accounts:         {}", summary.accounts);
    eprintln!("  flagged accounts: {}", summary.flagged_accounts);
    eprintln!("  rows:             {}", summary.rows);
    eprintln!("  fraud rows:       {}", summary.fraud_rows);
    eprintln!("  fraud rate:       {:.1}%", summary.fraud_rate * 100.0);
    eprintln!();
    eprintln!("=== PATTERN DISTRIBUTION ===");
    if summary.patterns.is_empty() {
        eprintln!("  (no anomalies injected)");
    }
    for (pattern, count) in &summary.patterns {
        eprintln!("  {pattern:<24} {count}");
    }
    Ok(())
}

/// Parsed value of `flag`, or `default` when the flag is absent.
/// A present flag with a missing or unparsable value is an error.
fn parse_arg<T>(args: &[String], flag: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match string_arg(args, flag)? {
        Some(raw) => raw
            .parse()
            .map_err(|e| anyhow!("invalid value '{raw}' for {flag}: {e}")),
        None => Ok(default),
    }
}

fn string_arg<'a>(args: &'a [String], flag: &str) -> Result<Option<&'a str>> {
    match args.iter().position(|a| a == flag) {
        Some(i) => args
            .get(i + 1)
            .map(|v| Some(v.as_str()))
            .ok_or_else(|| anyhow!("{flag} needs a value")),
        None => Ok(None),
    }
}
