use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use clap::Args;
use payout_engine::config::GridConfig;
use payout_engine::error::AppError;
use payout_engine::workflows::payout::{
    render_csv, BatchOutcome, PayoutProcessor, RawPayin, RawPolicyRecord, RawRemarks,
};

use crate::infra::load_grid;

#[derive(Args, Debug)]
pub(crate) struct ProcessArgs {
    /// JSON file holding an array of extracted policy records
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Insurer name applied to the whole batch
    #[arg(long)]
    pub(crate) company: String,
    /// Where to write the payout CSV (stdout when omitted)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// Optional JSON grid definition overriding the built-in grid
    #[arg(long)]
    pub(crate) grid: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Insurer name used for the sample batch
    #[arg(long, default_value = "Digit")]
    pub(crate) company: String,
    /// Optional JSON grid definition overriding the built-in grid
    #[arg(long)]
    pub(crate) grid: Option<PathBuf>,
    /// Print the rendered CSV after the record table
    #[arg(long)]
    pub(crate) show_csv: bool,
}

pub(crate) fn run_process(args: ProcessArgs) -> Result<(), AppError> {
    let ProcessArgs {
        input,
        company,
        output,
        grid,
    } = args;

    let processor = build_processor(grid)?;
    let raw = fs::read_to_string(&input)?;
    let records: Vec<RawPolicyRecord> = serde_json::from_str(&raw)
        .map_err(|err| std::io::Error::new(ErrorKind::InvalidData, err))?;

    let outcome = processor.process_batch(&company, &records)?;
    let csv = render_csv(&outcome.records)?;

    match output {
        Some(path) => {
            fs::write(&path, csv)?;
            println!(
                "Wrote {} payout rows to {}",
                outcome.records.len(),
                path.display()
            );
            print_summary(&outcome);
        }
        // Keep stdout clean CSV so the command pipes into other tools.
        None => print!("{csv}"),
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        company,
        grid,
        show_csv,
    } = args;

    let processor = build_processor(grid)?;
    println!(
        "Payout grid demo ({} grid rows, evaluated {})",
        processor.grid().rules().len(),
        Local::now().date_naive()
    );
    println!("Batch company: {company}");

    let outcome = processor.process_batch(&company, &sample_batch())?;

    println!("\nCalculated records");
    for record in &outcome.records {
        println!(
            "- {} | payin {} -> payout {} | {}",
            record.segment, record.payin, record.payout, record.formula_used
        );
        println!("    {}", record.explanation);
    }

    print_summary(&outcome);

    if show_csv {
        println!("\nCSV render");
        print!("{}", render_csv(&outcome.records)?);
    }

    Ok(())
}

fn build_processor(grid_path: Option<PathBuf>) -> Result<PayoutProcessor, AppError> {
    let grid = load_grid(&GridConfig { path: grid_path })?;
    Ok(PayoutProcessor::new(Arc::new(grid)))
}

fn print_summary(outcome: &BatchOutcome) {
    let summary = &outcome.summary;
    println!("\nBatch summary ({})", summary.processed_on);
    println!(
        "- {} records | avg payin {:.1}% | {} distinct segments",
        summary.total_records, summary.avg_payin, summary.unique_segments
    );
    println!("Formula usage:");
    for (formula, count) in &summary.formula_summary {
        println!("  - {formula}: {count}");
    }
}

fn sample_batch() -> Vec<RawPolicyRecord> {
    fn record(segment: &str, payin: &str, remarks: &str) -> RawPolicyRecord {
        RawPolicyRecord {
            segment: Some(segment.to_string()),
            policy_type: None,
            location: Some("East".to_string()),
            payin: Some(RawPayin::Text(payin.to_string())),
            remarks: Some(RawRemarks::Text(remarks.to_string())),
        }
    }

    vec![
        record("TW 1+5", "30%", "new vehicle"),
        record("TW TP", "55%", "fleet renewal"),
        record("PVT CAR COMP + SAOD", "62%", "petrol"),
        record("CV upto 2.5 Tn", "15%", ""),
        record("CV 12 TN", "35%", ""),
        record("BUS", "40%", "staff transport"),
        record("TAXI", "25%", ""),
        record("Tractor", "22%", ""),
    ]
}
