use super::super::domain::Lob;

/// Canonical segment labels as the grid declares them. Rule rows and the
/// resolver must agree on these strings byte-for-byte.
pub mod labels {
    pub const TW_NEW: &str = "1+5";
    pub const TW_SAOD_COMP: &str = "TW SAOD + COMP";
    pub const TW_TP: &str = "TW TP";
    pub const PVT_CAR_COMP: &str = "PVT CAR COMP + SAOD";
    pub const PVT_CAR_TP: &str = "PVT CAR TP";
    pub const CV_LIGHT: &str = "Upto 2.5 GVW";
    pub const CV_ALL: &str = "All GVW & PCV 3W, GCV 3W";
    pub const BUS_SCHOOL: &str = "SCHOOL BUS";
    pub const BUS_STAFF: &str = "STAFF BUS";
    pub const TAXI: &str = "TAXI";
    pub const MISD: &str = "Misd, Tractor";
}

const CV_LIGHT_HINTS: &[&str] = &["UPTO 2.5", "2.5 TN", "2.5 GVW"];
const COMP_HINTS: &[&str] = &["COMP", "COMPREHENSIVE", "PACKAGE", "1ST PARTY", "1+1"];
const TW_NEW_HINTS: &[&str] = &["1+5", "NEW", "FRESH"];
const TW_COVER_HINTS: &[&str] = &["SAOD", "COMP", "PACKAGE", "1ST PARTY", "1+1"];

/// Decides which canonical segment label a record belongs to, using
/// per-LOB heuristics on the free segment text. `None` means no segment
/// heuristic fired (possible only for TW, PVT CAR, and UNKNOWN).
pub fn resolve_segment(lob: Lob, segment_text: &str) -> Option<&'static str> {
    let text = segment_text.to_ascii_uppercase();
    match lob {
        Lob::Tw => resolve_two_wheeler(&text),
        Lob::PvtCar => resolve_private_car(&text),
        Lob::Cv => Some(resolve_commercial(&text)),
        Lob::Bus => Some(resolve_bus(&text)),
        Lob::Taxi => Some(labels::TAXI),
        Lob::Misd => Some(labels::MISD),
        Lob::Unknown => None,
    }
}

fn resolve_two_wheeler(text: &str) -> Option<&'static str> {
    if contains_any(text, TW_NEW_HINTS) {
        return Some(labels::TW_NEW);
    }
    if contains_any(text, TW_COVER_HINTS) {
        return Some(labels::TW_SAOD_COMP);
    }
    // TP here has no COMP exclusion; the private-car branch below does.
    // Asymmetry carried over from observed upstream behavior.
    if text.contains("TP") {
        return Some(labels::TW_TP);
    }
    None
}

fn resolve_private_car(text: &str) -> Option<&'static str> {
    if contains_any(text, COMP_HINTS) {
        return Some(labels::PVT_CAR_COMP);
    }
    // Mutual exclusion so composite text like "Comp+TP" never lands on TP.
    if text.contains("TP") && !text.contains("COMP") {
        return Some(labels::PVT_CAR_TP);
    }
    None
}

fn resolve_commercial(text: &str) -> &'static str {
    if contains_any(text, CV_LIGHT_HINTS) {
        labels::CV_LIGHT
    } else {
        // Every other tonnage collapses into the catch-all CV bucket.
        labels::CV_ALL
    }
}

fn resolve_bus(text: &str) -> &'static str {
    if text.contains("SCHOOL") {
        labels::BUS_SCHOOL
    } else if text.contains("STAFF") {
        labels::BUS_STAFF
    } else {
        // Documented default when neither qualifier is present.
        labels::BUS_STAFF
    }
}

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| text.contains(needle))
}
