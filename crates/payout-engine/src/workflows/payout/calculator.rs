use super::grid::Formula;

/// Applies a payout formula to a payin value. Results never go below zero.
pub fn apply(formula: &Formula, payin_value: f64) -> f64 {
    let payout = match formula {
        Formula::PercentOf(factor) => payin_value * factor,
        Formula::SubtractFlat(points) => payin_value - points,
        Formula::Identity => payin_value,
    };
    clamp(payout)
}

fn clamp(value: f64) -> f64 {
    value.max(0.0)
}

/// Percentage formatting happens only at the output boundary; everything
/// upstream stays in floating point.
pub fn format_percent(value: f64) -> String {
    format!("{value:.2}%")
}
