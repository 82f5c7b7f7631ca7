//! Batch processing command for multiple recognized text files.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use factx_core::{ExtractionRecord, Field, InvoiceFieldExtractor, KeyStyle};

use super::extract::{format_record, KeyArg, OutputFormat};
use super::{build_extractor, load_config};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern matching input text files
    #[arg(required = true)]
    input: String,

    /// Output directory (default: print records to stdout)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Key naming for JSON and CSV output
    #[arg(short, long, value_enum, default_value = "snake")]
    keys: KeyArg,

    /// Also write a summary.csv with one row per file
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    record: Option<ExtractionRecord>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let extractor = build_extractor(&config)?;
    let keys = KeyStyle::from(args.keys);

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            ext.eq_ignore_ascii_case("txt")
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        tokio::fs::create_dir_all(output_dir).await?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let result = process_single_file(&path, &extractor, &args, keys).await;
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match result {
            Ok(record) => results.push(ProcessResult {
                path,
                record: Some(record),
                error: None,
                processing_time_ms,
            }),
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(ProcessResult {
                        path,
                        record: None,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    pb.abandon();
                    anyhow::bail!("Processing failed: {}", error_msg);
                }
            }
        }

        pb.inc(1);
    }

    pb.finish_and_clear();

    if args.summary {
        let summary_dir = args.output_dir.clone().unwrap_or_else(|| PathBuf::from("."));
        let summary_path = summary_dir.join("summary.csv");
        write_summary(&summary_path, &results, keys)?;
        eprintln!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed = results.iter().filter(|r| r.error.is_some()).count();
    eprintln!(
        "{} Processed {} files ({} failed) in {:.2}s",
        style("✓").green(),
        results.len(),
        failed,
        start.elapsed().as_secs_f64()
    );

    Ok(())
}

async fn process_single_file(
    path: &Path,
    extractor: &InvoiceFieldExtractor,
    args: &BatchArgs,
    keys: KeyStyle,
) -> anyhow::Result<ExtractionRecord> {
    let text = tokio::fs::read_to_string(path).await?;
    let record = extractor.extract_fields(&text);
    let output = format_record(&record, args.format, keys, false)?;

    match &args.output_dir {
        Some(output_dir) => {
            let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("invoice");
            let ext = match args.format {
                OutputFormat::Json => "json",
                OutputFormat::Csv => "csv",
                OutputFormat::Text => "txt",
            };
            let output_path = output_dir.join(format!("{}.{}", stem, ext));
            tokio::fs::write(&output_path, output).await?;
            debug!("Wrote {}", output_path.display());
        }
        None => println!("{}", output),
    }

    Ok(record)
}

fn write_summary(path: &Path, results: &[ProcessResult], keys: KeyStyle) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    let mut header = vec!["file", "status"];
    header.extend(Field::ALL.iter().map(|f| f.key_for(keys)));
    header.extend(["processing_time_ms", "error"]);
    wtr.write_record(&header)?;

    for result in results {
        let mut row = vec![
            result.path.display().to_string(),
            if result.error.is_some() { "error" } else { "ok" }.to_string(),
        ];

        match &result.record {
            Some(record) => row.extend(record.iter().map(|(_, value)| value.to_string())),
            None => row.extend(Field::ALL.iter().map(|_| String::new())),
        }

        row.push(result.processing_time_ms.to_string());
        row.push(result.error.clone().unwrap_or_default());
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}
