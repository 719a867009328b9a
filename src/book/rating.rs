/// Highest rating a book can carry.
pub const MAX_RATING: f64 = 5.0;

/// Snap a rating to quarter-point granularity, rejecting values outside 0..=5.
pub fn snap_rating(value: f64) -> Option<f64> {
    if !value.is_finite() || !(0.0..=MAX_RATING).contains(&value) {
        return None;
    }
    Some((value * 4.0).round() / 4.0)
}

/// Clamp into 0..=5, then snap. Non-finite input becomes 0.
pub fn clamp_rating(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let clamped = value.clamp(0.0, MAX_RATING);
    (clamped * 4.0).round() / 4.0
}
