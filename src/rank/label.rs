//! Labels and their provenance.

use serde::{Deserialize, Serialize};

/// The display label shares its buckets with the persona recommendation.
pub use crate::evaluate::Recommendation as Label;

/// Which rule produced a label. Shown next to the label so a reader can tell
/// a threshold hit from a guaranteed slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelReason {
    /// Label existed before this pass and was kept.
    Preserved,
    MustReadThreshold,
    RecommendedThreshold,
    /// Engineer-persona recommendation carried over.
    PersonaRecommendation,
    /// No evaluation available.
    DefaultConsider,
    /// Best non-social item promoted to fill the headline slot.
    GuaranteedMustRead,
    GuaranteedRecommended,
    /// Promoted although social: no editorial item was available.
    GuaranteedMustReadFallback,
    GuaranteedRecommendedFallback,
    Placeholder,
}

impl LabelReason {
    pub fn is_promotion(self) -> bool {
        matches!(
            self,
            LabelReason::GuaranteedMustRead
                | LabelReason::GuaranteedRecommended
                | LabelReason::GuaranteedMustReadFallback
                | LabelReason::GuaranteedRecommendedFallback
        )
    }
}
