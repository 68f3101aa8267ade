//! The payout grid: an ordered, insurer-scoped decision table loaded once
//! at process start and read-only afterwards. Order encodes priority;
//! evaluation is first-match-wins, so the declaration order of the rows is
//! part of the grid's contract.

mod evaluator;

pub use evaluator::MatchResult;

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::classify::segment::labels;
use super::domain::{Lob, PayinBracket};

/// Payout formula applied to the payin value. The result is always clamped
/// at zero by the calculator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Formula {
    PercentOf(f64),
    SubtractFlat(f64),
    Identity,
}

impl Formula {
    /// Parses the human-readable payout specs used in grid definitions:
    /// `"90% of Payin"`, `"Less 2% of Payin"`, `"-3%"`.
    pub fn parse(spec: &str) -> Result<Self, GridError> {
        let trimmed = spec.trim();

        if let Some(rest) = trimmed.strip_prefix("Less ") {
            if let Some(points) = rest
                .strip_suffix("% of Payin")
                .and_then(|n| n.trim().parse::<f64>().ok())
            {
                return Ok(Formula::SubtractFlat(points));
            }
        }

        if let Some(percent) = trimmed
            .strip_suffix("% of Payin")
            .and_then(|n| n.trim().parse::<f64>().ok())
        {
            return Ok(Formula::PercentOf(percent / 100.0));
        }

        if let Some(points) = trimmed
            .strip_prefix('-')
            .and_then(|rest| rest.strip_suffix('%'))
            .and_then(|n| n.trim().parse::<f64>().ok())
        {
            return Ok(Formula::SubtractFlat(points));
        }

        Err(GridError::UnrecognizedPayout(trimmed.to_string()))
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formula::PercentOf(factor) => write!(f, "{}% of Payin", factor * 100.0),
            Formula::SubtractFlat(points) => write!(f, "-{points}%"),
            Formula::Identity => write!(f, "Payin unchanged"),
        }
    }
}

/// Which insurers a rule row applies to. `RestOfCompanies` has no fixed
/// membership: it matches any company not explicitly claimed by a sibling
/// row for the same (LOB, segment) group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsurerScope {
    AllCompanies,
    ExplicitList(Vec<String>),
    RestOfCompanies,
}

impl InsurerScope {
    pub fn label(&self) -> String {
        match self {
            InsurerScope::AllCompanies => "All Companies".to_string(),
            InsurerScope::ExplicitList(names) => names.join(", "),
            InsurerScope::RestOfCompanies => "Rest of Companies".to_string(),
        }
    }
}

/// Condition from the grid's remarks column. Anything that is not `NIL`
/// and not a recognized payin-bracket phrase is informational: it matches
/// unconditionally but is retained for the explanation trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemarksCondition {
    Nil,
    Bracket(PayinBracket),
    Informational(String),
}

impl RemarksCondition {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("NIL") {
            return RemarksCondition::Nil;
        }
        match PayinBracket::from_phrase(trimmed) {
            Some(bracket) => RemarksCondition::Bracket(bracket),
            None => RemarksCondition::Informational(trimmed.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            RemarksCondition::Nil => "NIL",
            RemarksCondition::Bracket(bracket) => bracket.label(),
            RemarksCondition::Informational(text) => text,
        }
    }
}

/// One row of the decision table.
#[derive(Debug, Clone)]
pub struct RuleEntry {
    pub lob: Lob,
    pub segment: &'static str,
    pub scope: InsurerScope,
    pub formula: Formula,
    /// The payout spec exactly as declared; echoed in `Formula Used`.
    pub payout_spec: String,
    pub remarks: RemarksCondition,
}

/// Serialized form of a grid row, for grids supplied as JSON config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridRowSpec {
    pub lob: String,
    pub segment: String,
    #[serde(default)]
    pub insurers: InsurerSpec,
    pub payout: String,
    #[serde(default = "nil_remarks")]
    pub remarks: String,
}

fn nil_remarks() -> String {
    "NIL".to_string()
}

/// Insurer column of a serialized row: `"ALL"`, `"REST"`, or a name list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InsurerSpec {
    Keyword(String),
    List(Vec<String>),
}

impl Default for InsurerSpec {
    fn default() -> Self {
        InsurerSpec::Keyword("ALL".to_string())
    }
}

impl InsurerSpec {
    fn into_scope(self) -> InsurerScope {
        match self {
            InsurerSpec::Keyword(word) => match word.trim().to_ascii_uppercase().as_str() {
                "ALL" => InsurerScope::AllCompanies,
                "REST" => InsurerScope::RestOfCompanies,
                // A bare name is shorthand for a one-entry explicit list.
                _ => InsurerScope::ExplicitList(vec![word]),
            },
            InsurerSpec::List(names) => InsurerScope::ExplicitList(names),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error("grid definition is empty")]
    Empty,
    #[error("unknown LOB '{0}' in grid definition")]
    UnknownLob(String),
    #[error("unknown segment '{segment}' for LOB {lob} in grid definition")]
    UnknownSegment { lob: &'static str, segment: String },
    #[error("unrecognized payout spec '{0}'")]
    UnrecognizedPayout(String),
    #[error("failed to read grid definition: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse grid definition: {0}")]
    Json(#[from] serde_json::Error),
}

/// The process-wide decision table plus the derived per-(LOB, segment)
/// index of explicitly claimed insurers used to resolve `RestOfCompanies`
/// scopes without re-walking the table per record.
#[derive(Debug)]
pub struct PayoutGrid {
    rules: Vec<RuleEntry>,
    claimed: HashMap<(Lob, &'static str), Vec<String>>,
}

impl PayoutGrid {
    /// The built-in grid mirroring the production commission sheet.
    pub fn standard() -> Self {
        Self::from_entries(standard_rules())
    }

    pub fn from_entries(rules: Vec<RuleEntry>) -> Self {
        let claimed = claimed_index(&rules);
        Self { rules, claimed }
    }

    /// Builds a grid from serialized rows, validating LOBs, segment labels,
    /// and payout specs. Row order is preserved verbatim.
    pub fn from_rows(rows: Vec<GridRowSpec>) -> Result<Self, GridError> {
        if rows.is_empty() {
            return Err(GridError::Empty);
        }

        let mut rules = Vec::with_capacity(rows.len());
        for row in rows {
            let lob = Lob::from_label(&row.lob).ok_or_else(|| GridError::UnknownLob(row.lob))?;
            let segment = canonical_segment(lob, &row.segment)?;
            let formula = Formula::parse(&row.payout)?;
            rules.push(RuleEntry {
                lob,
                segment,
                scope: row.insurers.into_scope(),
                formula,
                payout_spec: row.payout.trim().to_string(),
                remarks: RemarksCondition::parse(&row.remarks),
            });
        }
        Ok(Self::from_entries(rules))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, GridError> {
        let rows: Vec<GridRowSpec> = serde_json::from_reader(reader)?;
        Self::from_rows(rows)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, GridError> {
        Self::from_reader(File::open(path)?)
    }

    pub fn rules(&self) -> &[RuleEntry] {
        &self.rules
    }

    /// Normalized names explicitly claimed within a (LOB, segment) group.
    pub(crate) fn claimed_names(&self, lob: Lob, segment: &'static str) -> &[String] {
        self.claimed
            .get(&(lob, segment))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Company names are compared after upper-casing and dropping the filler
/// tokens that insurer legal names carry.
pub(crate) fn normalize_company(value: &str) -> String {
    value
        .to_ascii_uppercase()
        .split_whitespace()
        .filter(|token| *token != "GENERAL" && *token != "INSURANCE")
        .collect::<Vec<_>>()
        .join(" ")
}

fn claimed_index(rules: &[RuleEntry]) -> HashMap<(Lob, &'static str), Vec<String>> {
    let mut index: HashMap<(Lob, &'static str), Vec<String>> = HashMap::new();
    for rule in rules {
        if let InsurerScope::ExplicitList(names) = &rule.scope {
            let entry = index.entry((rule.lob, rule.segment)).or_default();
            for name in names {
                let normalized = normalize_company(name);
                if !entry.contains(&normalized) {
                    entry.push(normalized);
                }
            }
        }
    }
    index
}

/// Maps a declared segment string onto the canonical static label so rule
/// rows and the segment resolver compare equal by construction.
fn canonical_segment(lob: Lob, declared: &str) -> Result<&'static str, GridError> {
    let trimmed = declared.trim();
    let known: &[&'static str] = match lob {
        Lob::Tw => &[labels::TW_NEW, labels::TW_SAOD_COMP, labels::TW_TP],
        Lob::PvtCar => &[labels::PVT_CAR_COMP, labels::PVT_CAR_TP],
        Lob::Cv => &[labels::CV_LIGHT, labels::CV_ALL],
        Lob::Bus => &[labels::BUS_SCHOOL, labels::BUS_STAFF],
        Lob::Taxi => &[labels::TAXI],
        Lob::Misd => &[labels::MISD],
        Lob::Unknown => &[],
    };
    known
        .iter()
        .find(|label| label.eq_ignore_ascii_case(trimmed))
        .copied()
        .ok_or_else(|| GridError::UnknownSegment {
            lob: lob.label(),
            segment: trimmed.to_string(),
        })
}

fn rule(
    lob: Lob,
    segment: &'static str,
    scope: InsurerScope,
    payout_spec: &str,
    formula: Formula,
    remarks: RemarksCondition,
) -> RuleEntry {
    RuleEntry {
        lob,
        segment,
        scope,
        formula,
        payout_spec: payout_spec.to_string(),
        remarks,
    }
}

fn explicit(names: &[&str]) -> InsurerScope {
    InsurerScope::ExplicitList(names.iter().map(|name| name.to_string()).collect())
}

fn standard_rules() -> Vec<RuleEntry> {
    use InsurerScope::{AllCompanies, RestOfCompanies};
    use RemarksCondition::{Bracket, Nil};

    let tw_tp_direct = explicit(&["Bajaj", "Digit", "ICICI"]);
    let cv_light_direct = explicit(&["Reliance", "SBI"]);

    vec![
        rule(
            Lob::Tw,
            labels::TW_NEW,
            AllCompanies,
            "90% of Payin",
            Formula::PercentOf(0.90),
            Nil,
        ),
        rule(
            Lob::Tw,
            labels::TW_SAOD_COMP,
            AllCompanies,
            "90% of Payin",
            Formula::PercentOf(0.90),
            Nil,
        ),
        rule(
            Lob::Tw,
            labels::TW_TP,
            tw_tp_direct.clone(),
            "-2%",
            Formula::SubtractFlat(2.0),
            Bracket(PayinBracket::Below20),
        ),
        rule(
            Lob::Tw,
            labels::TW_TP,
            tw_tp_direct.clone(),
            "-2%",
            Formula::SubtractFlat(2.0),
            Bracket(PayinBracket::From21To30),
        ),
        rule(
            Lob::Tw,
            labels::TW_TP,
            tw_tp_direct.clone(),
            "-3%",
            Formula::SubtractFlat(3.0),
            Bracket(PayinBracket::From31To50),
        ),
        rule(
            Lob::Tw,
            labels::TW_TP,
            tw_tp_direct,
            "-3%",
            Formula::SubtractFlat(3.0),
            Bracket(PayinBracket::Above50),
        ),
        rule(
            Lob::Tw,
            labels::TW_TP,
            RestOfCompanies,
            "-2%",
            Formula::SubtractFlat(2.0),
            Bracket(PayinBracket::Below20),
        ),
        rule(
            Lob::Tw,
            labels::TW_TP,
            RestOfCompanies,
            "-3%",
            Formula::SubtractFlat(3.0),
            Bracket(PayinBracket::From21To30),
        ),
        rule(
            Lob::Tw,
            labels::TW_TP,
            RestOfCompanies,
            "-4%",
            Formula::SubtractFlat(4.0),
            Bracket(PayinBracket::From31To50),
        ),
        rule(
            Lob::Tw,
            labels::TW_TP,
            RestOfCompanies,
            "-5%",
            Formula::SubtractFlat(5.0),
            Bracket(PayinBracket::Above50),
        ),
        rule(
            Lob::PvtCar,
            labels::PVT_CAR_COMP,
            AllCompanies,
            "90% of Payin",
            Formula::PercentOf(0.90),
            RemarksCondition::Informational("All Fuel".to_string()),
        ),
        rule(
            Lob::PvtCar,
            labels::PVT_CAR_TP,
            AllCompanies,
            "-2%",
            Formula::SubtractFlat(2.0),
            Bracket(PayinBracket::Below20),
        ),
        // Unconditional row: every bracket that fell past the row above.
        rule(
            Lob::PvtCar,
            labels::PVT_CAR_TP,
            AllCompanies,
            "-3%",
            Formula::SubtractFlat(3.0),
            Nil,
        ),
        rule(
            Lob::Cv,
            labels::CV_LIGHT,
            cv_light_direct,
            "-2%",
            Formula::SubtractFlat(2.0),
            Nil,
        ),
        rule(
            Lob::Cv,
            labels::CV_LIGHT,
            RestOfCompanies,
            "-3%",
            Formula::SubtractFlat(3.0),
            Nil,
        ),
        rule(
            Lob::Cv,
            labels::CV_ALL,
            AllCompanies,
            "-2%",
            Formula::SubtractFlat(2.0),
            Bracket(PayinBracket::Below20),
        ),
        rule(
            Lob::Cv,
            labels::CV_ALL,
            AllCompanies,
            "-3%",
            Formula::SubtractFlat(3.0),
            Bracket(PayinBracket::From21To30),
        ),
        rule(
            Lob::Cv,
            labels::CV_ALL,
            AllCompanies,
            "-4%",
            Formula::SubtractFlat(4.0),
            Bracket(PayinBracket::From31To50),
        ),
        rule(
            Lob::Cv,
            labels::CV_ALL,
            AllCompanies,
            "-5%",
            Formula::SubtractFlat(5.0),
            Bracket(PayinBracket::Above50),
        ),
        rule(
            Lob::Bus,
            labels::BUS_SCHOOL,
            AllCompanies,
            "Less 2% of Payin",
            Formula::SubtractFlat(2.0),
            Nil,
        ),
        rule(
            Lob::Bus,
            labels::BUS_STAFF,
            AllCompanies,
            "88% of Payin",
            Formula::PercentOf(0.88),
            Nil,
        ),
        rule(
            Lob::Taxi,
            labels::TAXI,
            AllCompanies,
            "-2%",
            Formula::SubtractFlat(2.0),
            Bracket(PayinBracket::Below20),
        ),
        rule(
            Lob::Taxi,
            labels::TAXI,
            AllCompanies,
            "-3%",
            Formula::SubtractFlat(3.0),
            Bracket(PayinBracket::From21To30),
        ),
        rule(
            Lob::Taxi,
            labels::TAXI,
            AllCompanies,
            "-4%",
            Formula::SubtractFlat(4.0),
            Bracket(PayinBracket::From31To50),
        ),
        rule(
            Lob::Taxi,
            labels::TAXI,
            AllCompanies,
            "-5%",
            Formula::SubtractFlat(5.0),
            Bracket(PayinBracket::Above50),
        ),
        // Insurer-scoped MISD row; other companies intentionally fall
        // through to the no-match path.
        rule(
            Lob::Misd,
            labels::MISD,
            explicit(&["Reliance"]),
            "88% of Payin",
            Formula::PercentOf(0.88),
            Nil,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_three_payout_spec_shapes() {
        assert_eq!(Formula::parse("90% of Payin").unwrap(), Formula::PercentOf(0.9));
        assert_eq!(Formula::parse("88% of Payin").unwrap(), Formula::PercentOf(0.88));
        assert_eq!(
            Formula::parse("Less 2% of Payin").unwrap(),
            Formula::SubtractFlat(2.0)
        );
        assert_eq!(Formula::parse("-3%").unwrap(), Formula::SubtractFlat(3.0));
    }

    #[test]
    fn rejects_unrecognized_payout_specs() {
        match Formula::parse("double the payin") {
            Err(GridError::UnrecognizedPayout(spec)) => assert_eq!(spec, "double the payin"),
            other => panic!("expected unrecognized payout, got {other:?}"),
        }
    }

    #[test]
    fn remarks_conditions_parse_by_kind() {
        assert_eq!(RemarksCondition::parse("NIL"), RemarksCondition::Nil);
        assert_eq!(RemarksCondition::parse("  "), RemarksCondition::Nil);
        assert_eq!(
            RemarksCondition::parse("Payin Above 50%"),
            RemarksCondition::Bracket(PayinBracket::Above50)
        );
        assert_eq!(
            RemarksCondition::parse("Zuno - 21"),
            RemarksCondition::Informational("Zuno - 21".to_string())
        );
    }

    #[test]
    fn standard_grid_precomputes_claimed_insurers_per_group() {
        let grid = PayoutGrid::standard();
        let claimed = grid.claimed_names(Lob::Tw, "TW TP");
        assert_eq!(claimed, ["BAJAJ", "DIGIT", "ICICI"]);
        assert!(grid.claimed_names(Lob::Bus, "STAFF BUS").is_empty());
    }

    #[test]
    fn grid_rows_load_from_json() {
        let json = r#"[
            {"lob": "TW", "segment": "TW TP", "insurers": ["Bajaj"], "payout": "-2%", "remarks": "Payin Below 20%"},
            {"lob": "TW", "segment": "tw tp", "insurers": "REST", "payout": "90% of Payin"}
        ]"#;
        let grid = PayoutGrid::from_reader(json.as_bytes()).expect("grid loads");
        assert_eq!(grid.rules().len(), 2);
        assert_eq!(grid.rules()[1].segment, "TW TP");
        assert_eq!(grid.rules()[1].scope, InsurerScope::RestOfCompanies);
        assert_eq!(grid.rules()[1].remarks, RemarksCondition::Nil);
    }

    #[test]
    fn empty_and_malformed_grids_fail_to_load() {
        assert!(matches!(
            PayoutGrid::from_rows(Vec::new()),
            Err(GridError::Empty)
        ));

        let bad_payout = r#"[{"lob": "TW", "segment": "TW TP", "payout": "half"}]"#;
        assert!(matches!(
            PayoutGrid::from_reader(bad_payout.as_bytes()),
            Err(GridError::UnrecognizedPayout(_))
        ));

        let bad_lob = r#"[{"lob": "TRAIN", "segment": "TW TP", "payout": "-2%"}]"#;
        assert!(matches!(
            PayoutGrid::from_reader(bad_lob.as_bytes()),
            Err(GridError::UnknownLob(_))
        ));
    }

    #[test]
    fn company_normalization_strips_filler_tokens() {
        assert_eq!(normalize_company("Reliance General Insurance"), "RELIANCE");
        assert_eq!(normalize_company("  bajaj allianz "), "BAJAJ ALLIANZ");
    }
}
