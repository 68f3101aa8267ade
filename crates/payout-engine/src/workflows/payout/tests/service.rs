use super::common::{raw, standard_processor};
use crate::workflows::payout::domain::{RawPayin, RawPolicyRecord, RawRemarks};
use crate::workflows::payout::service::BatchError;

#[test]
fn empty_batches_are_a_batch_level_fault() {
    let processor = standard_processor();
    match processor.process_batch("Digit", &[]) {
        Err(BatchError::EmptyBatch) => {}
        other => panic!("expected empty batch error, got {other:?}"),
    }
}

#[test]
fn one_bad_record_never_aborts_the_batch() {
    let processor = standard_processor();
    let batch = vec![raw("TW TP", "55%"), raw("TW TP", "inf%"), raw("BUS", "40%")];

    let outcome = processor.process_batch("Bajaj", &batch).expect("batch runs");
    assert_eq!(outcome.records.len(), 3);

    let poisoned = &outcome.records[1];
    assert_eq!(poisoned.payout, "Error");
    assert_eq!(poisoned.formula_used, "Error in calculation");
    assert!(poisoned.explanation.starts_with("Error:"));

    // The neighbors still calculated normally.
    assert_eq!(outcome.records[0].payout, "52.00%");
    assert_eq!(outcome.records[2].payout, "35.20%");
}

#[test]
fn unmatched_records_keep_their_payin_with_an_explanatory_trail() {
    let processor = standard_processor();
    let batch = vec![raw("Tractor", "22%")];

    let outcome = processor.process_batch("Acme", &batch).expect("batch runs");
    let row = &outcome.records[0];
    assert_eq!(row.formula_used, "No matching rule found");
    assert_eq!(row.payout, "22.00%");
    assert_eq!(row.explanation, "no rule for MISD/Misd, Tractor/Acme");
}

#[test]
fn unknown_lob_is_a_classification_not_an_error() {
    let processor = standard_processor();
    let batch = vec![RawPolicyRecord {
        segment: Some("mystery cover".to_string()),
        policy_type: Some("TP".to_string()),
        location: None,
        payin: Some(RawPayin::Number(12.0)),
        remarks: Some(RawRemarks::Text("no hints".to_string())),
    }];

    let outcome = processor.process_batch("Acme", &batch).expect("batch runs");
    let row = &outcome.records[0];
    assert_eq!(row.formula_used, "No matching rule found");
    assert_eq!(row.payout, "12.00%");
    assert!(row.explanation.starts_with("no rule for UNKNOWN/"));
}

#[test]
fn summary_reports_counts_average_and_formula_histogram() {
    let processor = standard_processor();
    let batch = vec![
        raw("TW TP", "55%"),
        raw("TW TP", "15%"),
        raw("BUS", "40%"),
        raw("CV upto 2.5 Tn", "15%"),
    ];

    let outcome = processor
        .process_batch("Reliance General Insurance", &batch)
        .expect("batch runs");
    let summary = &outcome.summary;

    assert_eq!(summary.total_records, 4);
    assert_eq!(summary.avg_payin, 31.3);
    assert_eq!(summary.unique_segments, 3);
    assert_eq!(summary.company_name, "Reliance General Insurance");

    let total_counted: usize = summary.formula_summary.values().sum();
    assert_eq!(total_counted, 4);
    assert_eq!(summary.formula_summary.get("-2%"), Some(&2));
}

#[test]
fn reprocessing_assembled_fields_yields_the_same_result() {
    let processor = standard_processor();
    let batch = vec![raw("TW TP", "55%")];

    let first = processor.process_batch("Bajaj", &batch).expect("first run");
    let row = &first.records[0];

    let replay = vec![RawPolicyRecord {
        segment: Some(row.segment.clone()),
        policy_type: Some(row.policy_type.clone()),
        location: Some(row.location.clone()),
        payin: Some(RawPayin::Text(row.payin.clone())),
        remarks: Some(RawRemarks::Text(row.remark.clone())),
    }];
    let second = processor.process_batch("Bajaj", &replay).expect("replay");

    assert_eq!(second.records[0].payout, row.payout);
    assert_eq!(second.records[0].formula_used, row.formula_used);
    assert_eq!(second.records[0].explanation, row.explanation);
}
