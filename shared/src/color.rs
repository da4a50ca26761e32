/// Clamps a confidence into [0, 100] and rounds it to two decimals.
pub fn display_confidence(confidence: f64) -> f64 {
    if confidence.is_nan() {
        return 0.0;
    }
    (confidence.clamp(0.0, 100.0) * 100.0).round() / 100.0
}

/// Hue along the red (0) to green (120) scale.
pub fn confidence_hue(confidence: f64) -> f64 {
    display_confidence(confidence) * 1.2
}

pub fn confidence_color(confidence: f64) -> String {
    format!("hsl({:.1}, 75%, 45%)", confidence_hue(confidence))
}

pub fn format_percent(confidence: f64) -> String {
    format!("{}%", display_confidence(confidence))
}
