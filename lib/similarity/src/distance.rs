//! Per-factor match functions
//!
//! All functions return a value in [0.0, 1.0] where 1.0 means a full match.

use crate::schema::Matcher;

/// Exact, case-sensitive categorical match. Missing values never match.
pub fn categorical_match(a: Option<&str>, b: Option<&str>) -> f32 {
    match (a, b) {
        (Some(a), Some(b)) if a == b => 1.0,
        _ => 0.0,
    }
}

/// Exact match of two cluster labels
pub fn label_match(a: usize, b: usize) -> f32 {
    if a == b {
        1.0
    } else {
        0.0
    }
}

/// Price similarity of `candidate` relative to `target`
pub fn price_match(target: f64, candidate: f64, matcher: Matcher) -> f32 {
    match matcher {
        Matcher::Exact => {
            if (target - candidate).abs() < f64::EPSILON {
                1.0
            } else {
                0.0
            }
        }
        Matcher::Proximity => {
            let relative_diff = (candidate - target).abs() / target.max(1.0);
            (1.0 - relative_diff).max(0.0) as f32
        }
        Matcher::Band { tolerance } => {
            let range = tolerance * target;
            if candidate >= target - range && candidate <= target + range {
                1.0
            } else {
                0.0
            }
        }
    }
}
