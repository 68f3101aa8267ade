//! Policy payout pipeline: normalization, classification, grid evaluation,
//! payout calculation, and batch assembly.
//!
//! Record processing is a pure, synchronous transformation over an
//! immutable grid loaded at process start. Records are independent, so a
//! batch can be split across workers with nothing more than a shared
//! `Arc<PayoutGrid>`.

pub mod calculator;
pub mod classify;
pub mod domain;
pub mod export;
pub mod grid;
pub mod normalizer;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use classify::{classify_lob, resolve_segment};
pub use domain::{
    BatchSummary, CalculatedRecord, Lob, PayinBracket, PolicyRecord, RawPayin, RawPolicyRecord,
    RawRemarks,
};
pub use export::{render_csv, write_csv, ExportError};
pub use grid::{
    Formula, GridError, GridRowSpec, InsurerScope, InsurerSpec, MatchResult, PayoutGrid,
    RemarksCondition, RuleEntry,
};
pub use router::{payout_router, GridRowView, ProcessRequest, ProcessResponse};
pub use service::{BatchError, BatchOutcome, PayoutProcessor};
