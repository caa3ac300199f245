/// Display classification of a risk label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskTone {
    Alert,
    Warning,
    Positive,
}

/// Anything that is not `HIGH` or `MEDIUM` (including `LOW` and labels the
/// service may add later) is shown as positive.
pub fn risk_tone(label: &str) -> RiskTone {
    match label {
        "HIGH" => RiskTone::Alert,
        "MEDIUM" => RiskTone::Warning,
        _ => RiskTone::Positive,
    }
}

/// Formats a probability in `[0, 1]` as a percentage with one decimal.
pub fn format_probability(probability: f64) -> String {
    format!("{:.1}%", probability * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn high_and_medium_are_highlighted() {
        assert_eq!(risk_tone("HIGH"), RiskTone::Alert);
        assert_eq!(risk_tone("MEDIUM"), RiskTone::Warning);
    }

    #[test]
    fn every_other_label_falls_through_to_positive() {
        for label in ["LOW", "", "high", "CRITICAL", "MEDIUM ", "🔥"] {
            assert_eq!(risk_tone(label), RiskTone::Positive, "label {label:?}");
        }
    }

    #[test]
    fn probability_is_rendered_as_percent() {
        assert_eq!(format_probability(0.7123), "71.2%");
        assert_eq!(format_probability(0.0), "0.0%");
        assert_eq!(format_probability(1.0), "100.0%");
    }
}
