use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::Local;
use tracing::warn;

use super::calculator;
use super::classify::{classify_lob, resolve_segment};
use super::domain::{BatchSummary, CalculatedRecord, PolicyRecord, RawPolicyRecord};
use super::grid::{Formula, PayoutGrid};
use super::normalizer;

/// Batch facade composing the normalizer, classifiers, grid evaluator, and
/// payout calculator. Holds a private handle to the immutable grid, so
/// batches can run concurrently without coordination.
pub struct PayoutProcessor {
    grid: Arc<PayoutGrid>,
}

/// Output of one batch: one calculated row per input record plus the
/// derived summary.
#[derive(Debug)]
pub struct BatchOutcome {
    pub records: Vec<CalculatedRecord>,
    pub summary: BatchSummary,
}

/// Batch-level faults. These abort the whole batch, unlike per-record
/// faults which are absorbed into `Error` markers on the affected row.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("no policy records in input batch")]
    EmptyBatch,
}

/// The one per-record fault the pure pipeline can hit: a payin that
/// parsed to a non-finite float would poison the summary averages.
#[derive(Debug, thiserror::Error)]
pub(crate) enum RecordFault {
    #[error("payin '{raw}' is not a finite percentage")]
    NonFinitePayin { raw: String },
}

impl PayoutProcessor {
    pub fn new(grid: Arc<PayoutGrid>) -> Self {
        Self { grid }
    }

    pub fn grid(&self) -> &PayoutGrid {
        &self.grid
    }

    /// Processes a whole batch under one company name. Individual record
    /// faults are recovered per record; only an empty batch is fatal.
    pub fn process_batch(
        &self,
        company_name: &str,
        records: &[RawPolicyRecord],
    ) -> Result<BatchOutcome, BatchError> {
        if records.is_empty() {
            return Err(BatchError::EmptyBatch);
        }

        let mut calculated = Vec::with_capacity(records.len());
        let mut segments = BTreeSet::new();
        let mut formula_summary: BTreeMap<String, usize> = BTreeMap::new();
        let mut payin_total = 0.0;
        let mut payin_count = 0usize;

        for raw in records {
            let record = normalizer::normalize(raw);
            let row = match self.calculate(company_name, &record) {
                Ok((row, resolved_segment)) => {
                    payin_total += record.payin_value;
                    payin_count += 1;
                    segments.insert(resolved_segment);
                    row
                }
                Err(fault) => {
                    warn!(segment = %record.segment, %fault, "record failed, substituting error markers");
                    segments.insert(record.segment.clone());
                    error_row(&record, &fault)
                }
            };
            *formula_summary.entry(row.formula_used.clone()).or_insert(0) += 1;
            calculated.push(row);
        }

        let avg_payin = if payin_count == 0 {
            0.0
        } else {
            round_to_tenth(payin_total / payin_count as f64)
        };

        let summary = BatchSummary {
            company_name: company_name.to_string(),
            total_records: calculated.len(),
            avg_payin,
            unique_segments: segments.len(),
            formula_summary,
            processed_on: Local::now().date_naive(),
        };

        Ok(BatchOutcome {
            records: calculated,
            summary,
        })
    }

    fn calculate(
        &self,
        company_name: &str,
        record: &PolicyRecord,
    ) -> Result<(CalculatedRecord, String), RecordFault> {
        if !record.payin_value.is_finite() {
            return Err(RecordFault::NonFinitePayin {
                raw: record.payin_raw.clone(),
            });
        }

        let lob = classify_lob(&record.segment, &record.remarks);
        let segment_label = resolve_segment(lob, &record.segment);
        let matched = self.grid.evaluate(record, lob, segment_label, company_name);

        let (payout, formula_used) = match matched.rule {
            Some(rule) => (
                calculator::apply(&rule.formula, record.payin_value),
                rule.payout_spec.clone(),
            ),
            None => (
                calculator::apply(&Formula::Identity, record.payin_value),
                "No matching rule found".to_string(),
            ),
        };

        let resolved_segment = match matched.rule {
            Some(rule) => rule.segment.to_string(),
            None => segment_label
                .map(str::to_string)
                .unwrap_or_else(|| record.segment.clone()),
        };

        let row = CalculatedRecord {
            segment: record.segment.clone(),
            policy_type: record.policy_type.clone(),
            location: record.location.clone(),
            payin: calculator::format_percent(record.payin_value),
            remark: record.remarks.clone(),
            payout: calculator::format_percent(payout),
            formula_used,
            explanation: matched.explanation,
        };
        Ok((row, resolved_segment))
    }
}

fn error_row(record: &PolicyRecord, fault: &RecordFault) -> CalculatedRecord {
    CalculatedRecord {
        segment: record.segment.clone(),
        policy_type: record.policy_type.clone(),
        location: record.location.clone(),
        payin: record.payin_raw.clone(),
        remark: record.remarks.clone(),
        payout: "Error".to_string(),
        formula_used: "Error in calculation".to_string(),
        explanation: format!("Error: {fault}"),
    }
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
