use super::super::domain::Lob;

struct LobMatcher {
    lob: Lob,
    keywords: &'static [&'static str],
}

/// Ordered keyword sets; the first set with any matching keyword wins, so
/// declaration order is the precedence order.
const LOB_MATCHERS: &[LobMatcher] = &[
    LobMatcher {
        lob: Lob::Tw,
        keywords: &["TW", "2W", "MC", "SC", "1+5", "TWO WHEELER"],
    },
    LobMatcher {
        lob: Lob::PvtCar,
        keywords: &["PVT CAR", "PRIVATE CAR", "CAR", "PCI"],
    },
    LobMatcher {
        lob: Lob::Cv,
        keywords: &["CV", "COMMERCIAL", "LCV", "GVW", "TN", "UPTO", "PCV", "GCV"],
    },
    LobMatcher {
        lob: Lob::Bus,
        keywords: &["BUS"],
    },
    LobMatcher {
        lob: Lob::Taxi,
        keywords: &["TAXI"],
    },
    LobMatcher {
        lob: Lob::Misd,
        keywords: &["MISD", "TRACTOR", "MISC", "AMBULANCE"],
    },
];

/// Vehicle-make and tonnage hints that upstream extraction sometimes places
/// only in remarks; scanned as a second pass before giving up.
const CV_REMARK_HINTS: &[&str] = &["TATA", "MARUTI", "GVW", "TN"];

/// Maps free-text segment and remarks onto a line of business.
pub fn classify_lob(segment: &str, remarks: &str) -> Lob {
    let segment_upper = segment.to_ascii_uppercase();
    for matcher in LOB_MATCHERS {
        if matcher
            .keywords
            .iter()
            .any(|keyword| segment_upper.contains(keyword))
        {
            return matcher.lob;
        }
    }

    let remarks_upper = remarks.to_ascii_uppercase();
    if CV_REMARK_HINTS
        .iter()
        .any(|hint| remarks_upper.contains(hint))
    {
        return Lob::Cv;
    }

    Lob::Unknown
}
