//! Extract command - extract fields from a single recognized text.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

use factx_core::{ExtractionRecord, Field, KeyStyle};

use super::{build_extractor, load_config};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input text file (default: stdin, also "-")
    input: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Key naming for JSON and CSV output
    #[arg(short, long, value_enum, default_value = "snake")]
    keys: KeyArg,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Report missing and inconsistent fields on stderr
    #[arg(long)]
    validate: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON object
    Json,
    /// CSV header and row
    Csv,
    /// Plain text summary
    Text,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum KeyArg {
    /// client, client_tax_id, ...
    Snake,
    /// cliente, ruc_cliente, ...
    Legacy,
}

impl From<KeyArg> for KeyStyle {
    fn from(arg: KeyArg) -> Self {
        match arg {
            KeyArg::Snake => KeyStyle::Snake,
            KeyArg::Legacy => KeyStyle::Legacy,
        }
    }
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let extractor = build_extractor(&config)?;

    let text = match &args.input {
        Some(path) if path.as_os_str() != "-" => {
            if !path.exists() {
                anyhow::bail!("Input file not found: {}", path.display());
            }
            info!("Processing file: {}", path.display());
            tokio::fs::read_to_string(path).await?
        }
        _ => {
            info!("Reading recognized text from stdin");
            let mut text = String::new();
            tokio::io::stdin().read_to_string(&mut text).await?;
            text
        }
    };

    let record = extractor.extract_fields(&text);

    if args.validate {
        let issues = record.validate();
        if !issues.is_empty() {
            eprintln!("{}", style("Validation issues:").yellow());
            for issue in &issues {
                eprintln!("  - {}", issue);
            }
        }
    }

    let output = format_record(&record, args.format, args.keys.into(), args.pretty)?;

    if let Some(output_path) = &args.output {
        tokio::fs::write(output_path, &output).await?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Render a record in the requested format.
pub fn format_record(
    record: &ExtractionRecord,
    format: OutputFormat,
    keys: KeyStyle,
    pretty: bool,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json if pretty => Ok(serde_json::to_string_pretty(&record.keyed(keys))?),
        OutputFormat::Json => Ok(serde_json::to_string(&record.keyed(keys))?),
        OutputFormat::Csv => format_csv(record, keys),
        OutputFormat::Text => Ok(format_text(record)),
    }
}

fn format_csv(record: &ExtractionRecord, keys: KeyStyle) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(Field::ALL.iter().map(|f| f.key_for(keys)))?;
    wtr.write_record(record.iter().map(|(_, value)| value))?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data.trim_end().to_string())
}

fn format_text(record: &ExtractionRecord) -> String {
    let mut output = String::new();

    output.push_str(&format!("File name: {}\n", record.suggested_filename));
    output.push_str(&format!("Document:  {}\n", record.document_number));
    output.push_str(&format!("Date:      {}\n", record.date));
    output.push('\n');

    output.push_str("Client:\n");
    output.push_str(&format!("  {}\n", record.client));
    if !record.client_tax_id.is_empty() {
        output.push_str(&format!("  RUC: {}\n", record.client_tax_id));
    }
    output.push('\n');

    output.push_str("Beneficiary:\n");
    output.push_str(&format!("  {}\n", record.beneficiary));
    if !record.beneficiary_tax_id.is_empty() {
        output.push_str(&format!("  RUC: {}\n", record.beneficiary_tax_id));
    }
    output.push('\n');

    if !record.item_description.is_empty() {
        output.push_str(&format!(
            "Item: {} x {} @ {}\n",
            record.quantity, record.item_description, record.unit_price
        ));
    }
    if !record.vehicle_plate.is_empty() {
        output.push_str(&format!("Plate: {}\n", record.vehicle_plate));
    }
    if !record.payment_method.is_empty() {
        output.push_str(&format!("Payment: {}\n", record.payment_method));
    }
    output.push('\n');

    output.push_str("Summary:\n");
    output.push_str(&format!("  Subtotal: {}\n", record.subtotal));
    output.push_str(&format!("  Tax:      {}\n", record.tax_amount));
    output.push_str(&format!("  Total:    {}", record.total));

    output
}
