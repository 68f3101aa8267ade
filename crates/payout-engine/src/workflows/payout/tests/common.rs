use std::sync::Arc;

use crate::workflows::payout::domain::{PolicyRecord, RawPayin, RawPolicyRecord, RawRemarks};
use crate::workflows::payout::grid::PayoutGrid;
use crate::workflows::payout::normalizer;
use crate::workflows::payout::service::PayoutProcessor;

pub(super) fn raw(segment: &str, payin: &str) -> RawPolicyRecord {
    RawPolicyRecord {
        segment: Some(segment.to_string()),
        policy_type: None,
        location: Some("East".to_string()),
        payin: Some(RawPayin::Text(payin.to_string())),
        remarks: Some(RawRemarks::Text(String::new())),
    }
}

pub(super) fn record(segment: &str, payin: &str) -> PolicyRecord {
    normalizer::normalize(&raw(segment, payin))
}

pub(super) fn standard_processor() -> PayoutProcessor {
    PayoutProcessor::new(Arc::new(PayoutGrid::standard()))
}
