use tracing::debug;

use super::super::domain::{Lob, PolicyRecord};
use super::{normalize_company, InsurerScope, PayoutGrid, RemarksCondition, RuleEntry};

/// Outcome of one grid walk for one record. Created per record and
/// discarded once the output row is assembled.
#[derive(Debug)]
pub struct MatchResult<'g> {
    pub rule: Option<&'g RuleEntry>,
    pub explanation: String,
}

impl PayoutGrid {
    /// Walks the table in declared order and returns the first row whose
    /// LOB, segment, insurer scope, and remarks condition all accept the
    /// record. No scoring, no best-match: row order is the tie-break.
    pub fn evaluate(
        &self,
        record: &PolicyRecord,
        lob: Lob,
        segment_label: Option<&'static str>,
        company_name: &str,
    ) -> MatchResult<'_> {
        let company = normalize_company(company_name);

        for (position, entry) in self.rules().iter().enumerate() {
            if entry.lob != lob {
                continue;
            }
            if Some(entry.segment) != segment_label {
                continue;
            }
            if !self.scope_accepts(entry, &company) {
                continue;
            }
            if !self.remarks_accept(position, entry, record) {
                continue;
            }

            let explanation = format!(
                "Matched: LOB={}, Segment='{}', Insurers={}, Remarks='{}', PayinCat='{}'",
                entry.lob.label(),
                entry.segment,
                entry.scope.label(),
                entry.remarks.label(),
                record.payin_bracket.label(),
            );
            return MatchResult {
                rule: Some(entry),
                explanation,
            };
        }

        let segment = segment_label.unwrap_or(record.segment.as_str());
        MatchResult {
            rule: None,
            explanation: format!("no rule for {}/{}/{}", lob.label(), segment, company_name),
        }
    }

    fn scope_accepts(&self, entry: &RuleEntry, company: &str) -> bool {
        match &entry.scope {
            InsurerScope::AllCompanies => true,
            InsurerScope::ExplicitList(names) => names
                .iter()
                .any(|name| company_matches(company, &normalize_company(name))),
            InsurerScope::RestOfCompanies => {
                // Membership is relative: excluded iff some sibling row in
                // the same (LOB, segment) group claims this company.
                !self
                    .claimed_names(entry.lob, entry.segment)
                    .iter()
                    .any(|claimed| company_matches(company, claimed))
            }
        }
    }

    fn remarks_accept(&self, position: usize, entry: &RuleEntry, record: &PolicyRecord) -> bool {
        match &entry.remarks {
            RemarksCondition::Nil => true,
            RemarksCondition::Bracket(bracket) => *bracket == record.payin_bracket,
            RemarksCondition::Informational(text) => {
                debug!(
                    rule = position,
                    condition = %text,
                    "informational remarks condition treated as unconditional match"
                );
                true
            }
        }
    }
}

/// Substring containment in either direction, tolerating partial names on
/// both the grid side and the caller side.
fn company_matches(company: &str, name: &str) -> bool {
    if company.is_empty() || name.is_empty() {
        return false;
    }
    company.contains(name) || name.contains(company)
}
