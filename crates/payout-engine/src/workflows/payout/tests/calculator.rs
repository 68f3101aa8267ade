use crate::workflows::payout::calculator::{apply, format_percent};
use crate::workflows::payout::grid::Formula;

#[test]
fn percent_of_scales_the_payin() {
    assert_eq!(apply(&Formula::PercentOf(0.90), 60.0), 54.0);
    assert_eq!(apply(&Formula::PercentOf(0.88), 40.0), 35.2);
}

#[test]
fn subtract_flat_clamps_at_zero() {
    assert_eq!(apply(&Formula::SubtractFlat(3.0), 55.0), 52.0);
    assert_eq!(apply(&Formula::SubtractFlat(5.0), 3.0), 0.0);
}

#[test]
fn identity_keeps_the_payin_but_never_goes_negative() {
    assert_eq!(apply(&Formula::Identity, 17.5), 17.5);
    assert_eq!(apply(&Formula::Identity, -1.0), 0.0);
}

#[test]
fn boundary_formatting_uses_two_decimals_and_a_percent_sign() {
    assert_eq!(format_percent(54.0), "54.00%");
    assert_eq!(format_percent(35.2), "35.20%");
    assert_eq!(format_percent(0.0), "0.00%");
}
