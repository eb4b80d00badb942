//! Distribution-aware label thresholds.
//!
//! Thresholds follow the pool (90th / 70th nearest-rank percentile of the
//! value score) but never drop below fixed floors.

use serde::Serialize;

pub const MUST_READ_FLOOR: f32 = 0.75;
pub const RECOMMENDED_FLOOR: f32 = 0.58;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Thresholds {
    pub must_read: f32,
    pub recommended: f32,
}

impl Thresholds {
    /// Thresholds for a pool of value scores (any order).
    pub fn from_scores(scores: &[f32]) -> Self {
        let mut sorted: Vec<f32> = scores.iter().copied().filter(|s| !s.is_nan()).collect();
        sorted.sort_by(f32::total_cmp);

        let p90 = percentile_sorted(&sorted, 0.90).unwrap_or(0.0);
        let p70 = percentile_sorted(&sorted, 0.70).unwrap_or(0.0);

        Self {
            must_read: p90.max(MUST_READ_FLOOR),
            recommended: p70.max(RECOMMENDED_FLOOR),
        }
    }
}

/// Nearest-rank percentile over ascending values: index `round((n-1)·p)`.
/// `None` for an empty slice.
pub fn percentile_sorted(sorted: &[f32], p: f32) -> Option<f32> {
    if sorted.is_empty() {
        return None;
    }
    let p = p.clamp(0.0, 1.0);
    let idx = ((sorted.len() - 1) as f32 * p).round() as usize;
    sorted.get(idx.min(sorted.len() - 1)).copied()
}
