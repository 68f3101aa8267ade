use crate::workflows::payout::classify::segment::labels;
use crate::workflows::payout::classify::{classify_lob, resolve_segment};
use crate::workflows::payout::domain::Lob;

#[test]
fn segment_keywords_resolve_each_lob() {
    assert_eq!(classify_lob("2W SATP", ""), Lob::Tw);
    assert_eq!(classify_lob("Private Car Package", ""), Lob::PvtCar);
    assert_eq!(classify_lob("GVW above 12", ""), Lob::Cv);
    assert_eq!(classify_lob("STAFF BUS", ""), Lob::Bus);
    assert_eq!(classify_lob("Taxi fleet", ""), Lob::Taxi);
    assert_eq!(classify_lob("Tractor", ""), Lob::Misd);
}

#[test]
fn earlier_keyword_sets_take_precedence() {
    // "TW TAXI" hits the TW set before the TAXI set ever runs.
    assert_eq!(classify_lob("TW TAXI", ""), Lob::Tw);
}

#[test]
fn remarks_fallback_catches_cv_hints() {
    assert_eq!(classify_lob("fleet policy", "Tata 407, 9 GVW"), Lob::Cv);
    assert_eq!(classify_lob("fleet policy", "no hints here"), Lob::Unknown);
}

#[test]
fn commercial_segments_split_on_light_tonnage() {
    assert_eq!(
        resolve_segment(Lob::Cv, "CV UPTO 2.5 TN"),
        Some(labels::CV_LIGHT)
    );
    assert_eq!(
        resolve_segment(Lob::Cv, "CV 12 TN"),
        Some(labels::CV_ALL)
    );
}

#[test]
fn bus_defaults_to_staff_when_unqualified() {
    assert_eq!(resolve_segment(Lob::Bus, "BUS"), Some(labels::BUS_STAFF));
    assert_eq!(
        resolve_segment(Lob::Bus, "BUS SCHOOL ROUTE"),
        Some(labels::BUS_SCHOOL)
    );
    // SCHOOL wins when both qualifiers appear.
    assert_eq!(
        resolve_segment(Lob::Bus, "SCHOOL AND STAFF BUS"),
        Some(labels::BUS_SCHOOL)
    );
}

#[test]
fn two_wheeler_heuristics_run_in_declared_order() {
    assert_eq!(resolve_segment(Lob::Tw, "2W NEW"), Some(labels::TW_NEW));
    assert_eq!(
        resolve_segment(Lob::Tw, "TW SAOD"),
        Some(labels::TW_SAOD_COMP)
    );
    assert_eq!(resolve_segment(Lob::Tw, "TW TP"), Some(labels::TW_TP));
    assert_eq!(resolve_segment(Lob::Tw, "TW"), None);
}

#[test]
fn private_car_tp_excludes_composite_comp_text() {
    assert_eq!(
        resolve_segment(Lob::PvtCar, "PVT CAR TP"),
        Some(labels::PVT_CAR_TP)
    );
    assert_eq!(
        resolve_segment(Lob::PvtCar, "PVT CAR COMP+TP"),
        Some(labels::PVT_CAR_COMP)
    );
    assert_eq!(resolve_segment(Lob::PvtCar, "PVT CAR"), None);
}

#[test]
fn taxi_and_misd_always_resolve_once_lob_matched() {
    assert_eq!(resolve_segment(Lob::Taxi, "anything"), Some(labels::TAXI));
    assert_eq!(resolve_segment(Lob::Misd, "Ambulance"), Some(labels::MISD));
    assert_eq!(resolve_segment(Lob::Unknown, "anything"), None);
}
