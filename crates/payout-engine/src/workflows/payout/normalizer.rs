use super::domain::{PayinBracket, PolicyRecord, RawPayin, RawPolicyRecord, RawRemarks};

/// Coerces a raw extracted record into the canonical form. Missing fields
/// take the documented defaults; payin classification never fails.
pub fn normalize(raw: &RawPolicyRecord) -> PolicyRecord {
    let segment = raw
        .segment
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string();
    let policy_type = non_empty_or(raw.policy_type.as_deref(), "Comp");
    let location = non_empty_or(raw.location.as_deref(), "N/A");
    let remarks = flatten_remarks(raw.remarks.as_ref());

    let (payin_raw, payin_value) = classify_payin(raw.payin.as_ref());
    let payin_bracket = PayinBracket::for_value(payin_value);

    PolicyRecord {
        segment,
        policy_type,
        location,
        payin_raw,
        payin_value,
        payin_bracket,
        remarks,
    }
}

/// Parses the payin field into a numeric percentage. Strips `%`, spaces,
/// and a stray leading minus (upstream sometimes reports negative
/// percentages that are positive commissions). Empty text, `N/A`, and
/// parse failures all default to 0.0 rather than erroring.
pub fn classify_payin(raw: Option<&RawPayin>) -> (String, f64) {
    match raw {
        Some(RawPayin::Number(value)) => (format!("{value}"), value.abs()),
        Some(RawPayin::Text(text)) => {
            let cleaned: String = text
                .chars()
                .filter(|c| !c.is_whitespace() && *c != '%' && *c != '-')
                .collect();
            if cleaned.is_empty() || cleaned.eq_ignore_ascii_case("N/A") {
                return (text.clone(), 0.0);
            }
            match cleaned.parse::<f64>() {
                Ok(value) => (text.clone(), value),
                Err(_) => (text.clone(), 0.0),
            }
        }
        None => (String::new(), 0.0),
    }
}

fn non_empty_or(value: Option<&str>, default: &str) -> String {
    match value.map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => trimmed.to_string(),
        _ => default.to_string(),
    }
}

fn flatten_remarks(raw: Option<&RawRemarks>) -> String {
    match raw {
        Some(RawRemarks::Text(text)) => text.trim().to_string(),
        Some(RawRemarks::Many(parts)) => parts
            .iter()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("; "),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bracket_of(value: f64) -> PayinBracket {
        PayinBracket::for_value(value)
    }

    #[test]
    fn bracket_boundaries_belong_to_lower_bracket() {
        assert_eq!(bracket_of(20.0), PayinBracket::Below20);
        assert_eq!(bracket_of(20.01), PayinBracket::From21To30);
        assert_eq!(bracket_of(30.0), PayinBracket::From21To30);
        assert_eq!(bracket_of(30.01), PayinBracket::From31To50);
        assert_eq!(bracket_of(50.0), PayinBracket::From31To50);
        assert_eq!(bracket_of(50.01), PayinBracket::Above50);
    }

    #[test]
    fn payin_text_with_percent_sign_parses() {
        let (raw, value) = classify_payin(Some(&RawPayin::Text("35%".to_string())));
        assert_eq!(raw, "35%");
        assert_eq!(value, 35.0);
        assert_eq!(bracket_of(value), PayinBracket::From31To50);
    }

    #[test]
    fn missing_and_unparseable_payins_default_to_zero() {
        for text in ["", "N/A", "n/a", "twenty"] {
            let (_, value) = classify_payin(Some(&RawPayin::Text(text.to_string())));
            assert_eq!(value, 0.0, "payin {text:?} should default");
            assert_eq!(bracket_of(value), PayinBracket::Below20);
        }
        assert_eq!(classify_payin(None).1, 0.0);
    }

    #[test]
    fn negative_payins_are_read_as_positive() {
        let (_, value) = classify_payin(Some(&RawPayin::Text("-2%".to_string())));
        assert_eq!(value, 2.0);
        let (_, value) = classify_payin(Some(&RawPayin::Number(-5.0)));
        assert_eq!(value, 5.0);
    }

    #[test]
    fn normalize_applies_field_defaults() {
        let record = normalize(&RawPolicyRecord {
            segment: Some("  TW TP  ".to_string()),
            policy_type: None,
            location: Some("   ".to_string()),
            payin: Some(RawPayin::Number(55.0)),
            remarks: Some(RawRemarks::Many(vec![
                "Tata 30%".to_string(),
                String::new(),
                "other make 26%".to_string(),
            ])),
        });

        assert_eq!(record.segment, "TW TP");
        assert_eq!(record.policy_type, "Comp");
        assert_eq!(record.location, "N/A");
        assert_eq!(record.payin_value, 55.0);
        assert_eq!(record.payin_bracket, PayinBracket::Above50);
        assert_eq!(record.remarks, "Tata 30%; other make 26%");
    }
}
