use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Line of business resolved for a policy record. `Unknown` is a terminal
/// classification, not an error; records classified `Unknown` simply fall
/// through the grid and keep their payin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lob {
    #[serde(rename = "TW")]
    Tw,
    #[serde(rename = "PVT CAR")]
    PvtCar,
    #[serde(rename = "CV")]
    Cv,
    #[serde(rename = "BUS")]
    Bus,
    #[serde(rename = "TAXI")]
    Taxi,
    #[serde(rename = "MISD")]
    Misd,
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl Lob {
    pub const fn label(self) -> &'static str {
        match self {
            Lob::Tw => "TW",
            Lob::PvtCar => "PVT CAR",
            Lob::Cv => "CV",
            Lob::Bus => "BUS",
            Lob::Taxi => "TAXI",
            Lob::Misd => "MISD",
            Lob::Unknown => "UNKNOWN",
        }
    }

    /// Inverse of `label`, used when a grid definition names its LOB column.
    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "TW" => Some(Lob::Tw),
            "PVT CAR" => Some(Lob::PvtCar),
            "CV" => Some(Lob::Cv),
            "BUS" => Some(Lob::Bus),
            "TAXI" => Some(Lob::Taxi),
            "MISD" => Some(Lob::Misd),
            _ => None,
        }
    }
}

/// Payin commission bracket. Boundaries are inclusive on the upper side:
/// 20, 30, and 50 all belong to the lower bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PayinBracket {
    Below20,
    From21To30,
    From31To50,
    Above50,
}

impl PayinBracket {
    pub fn for_value(value: f64) -> Self {
        if value <= 20.0 {
            PayinBracket::Below20
        } else if value <= 30.0 {
            PayinBracket::From21To30
        } else if value <= 50.0 {
            PayinBracket::From31To50
        } else {
            PayinBracket::Above50
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            PayinBracket::Below20 => "Payin Below 20%",
            PayinBracket::From21To30 => "Payin 21% to 30%",
            PayinBracket::From31To50 => "Payin 31% to 50%",
            PayinBracket::Above50 => "Payin Above 50%",
        }
    }

    /// Recognizes the exact bracket phrases used in grid remarks columns.
    pub fn from_phrase(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        [
            PayinBracket::Below20,
            PayinBracket::From21To30,
            PayinBracket::From31To50,
            PayinBracket::Above50,
        ]
        .into_iter()
        .find(|bracket| bracket.label() == trimmed)
    }
}

/// Payin field as it arrives from upstream extraction: sometimes a number,
/// sometimes text with `%` and whitespace noise.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPayin {
    Number(f64),
    Text(String),
}

/// Remarks arrive as either free text or a list of fragments.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawRemarks {
    Text(String),
    Many(Vec<String>),
}

/// Loosely-typed record handed over by the external extraction collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPolicyRecord {
    #[serde(default)]
    pub segment: Option<String>,
    #[serde(default)]
    pub policy_type: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub payin: Option<RawPayin>,
    #[serde(default, alias = "remark")]
    pub remarks: Option<RawRemarks>,
}

/// Canonical record, immutable after normalization. `payin_bracket` is
/// always the bracket derived from `payin_value`; nothing downstream sets
/// it independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyRecord {
    pub segment: String,
    pub policy_type: String,
    pub location: String,
    pub payin_raw: String,
    pub payin_value: f64,
    pub payin_bracket: PayinBracket,
    pub remarks: String,
}

/// One output row per input record, with payout and trace fields already
/// formatted for downstream rendering. Field names mirror the columns the
/// external spreadsheet collaborator expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatedRecord {
    pub segment: String,
    #[serde(rename = "policy type")]
    pub policy_type: String,
    pub location: String,
    pub payin: String,
    pub remark: String,
    #[serde(rename = "Calculated Payout")]
    pub payout: String,
    #[serde(rename = "Formula Used")]
    pub formula_used: String,
    #[serde(rename = "Rule Explanation")]
    pub explanation: String,
}

/// Derived batch metrics; no side effects, computed from the output rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub company_name: String,
    pub total_records: usize,
    pub avg_payin: f64,
    pub unique_segments: usize,
    pub formula_summary: BTreeMap<String, usize>,
    pub processed_on: NaiveDate,
}
