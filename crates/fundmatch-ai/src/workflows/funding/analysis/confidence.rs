use super::results::AnalysisModule;

pub const LOW_CONFIDENCE_WARNING: &str =
    "Some analysis modules used fallback data; review results with care";

/// Rounded arithmetic mean of the module confidences. Empty input yields zero.
pub fn aggregate_confidence(confidences: &[f64]) -> u8 {
    if confidences.is_empty() {
        return 0;
    }

    let sum: f64 = confidences
        .iter()
        .map(|confidence| confidence.clamp(0.0, 100.0))
        .sum();
    (sum / confidences.len() as f64).round() as u8
}

/// Caller-facing advisories when the aggregated confidence is below `threshold`.
pub fn confidence_warnings(
    confidence: u8,
    threshold: u8,
    fallback_modules: &[AnalysisModule],
) -> Vec<String> {
    if confidence >= threshold {
        return Vec::new();
    }

    let mut warnings = vec![LOW_CONFIDENCE_WARNING.to_string()];
    warnings.extend(fallback_modules.iter().map(|module| {
        format!(
            "{} analysis is based on fallback estimates",
            module.title()
        )
    }));
    warnings.push(format!(
        "Overall confidence {confidence}% is below the {threshold}% review threshold"
    ));
    warnings
}
