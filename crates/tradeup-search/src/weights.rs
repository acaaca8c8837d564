//! External guidance weights (hub scores) biasing candidate selection.

use std::collections::HashMap;

/// Score given to names the guidance map does not mention.
pub const DEFAULT_HUB_SCORE: f64 = 1.0;

/// Item name to relative importance. An empty map is the unguided baseline.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GuidanceWeights {
    scores: HashMap<String, f64>,
}

impl GuidanceWeights {
    /// Baseline weights: every item scores [`DEFAULT_HUB_SCORE`].
    pub fn uniform() -> Self {
        Self::default()
    }

    /// Normalize raw centrality scores to `score / max * 10 + 0.1`.
    /// Negative and non-finite scores are dropped.
    pub fn from_raw(raw: HashMap<String, f64>) -> Self {
        let raw: Vec<(String, f64)> = raw
            .into_iter()
            .filter(|(_, s)| s.is_finite() && *s >= 0.0)
            .collect();
        let max = raw.iter().map(|(_, s)| *s).fold(0.0_f64, f64::max);
        let scores = raw
            .into_iter()
            .map(|(name, s)| {
                let norm = if max > 0.0 { s / max } else { 0.0 };
                (name, norm * 10.0 + 0.1)
            })
            .collect();
        Self { scores }
    }

    /// Hub score for an item name.
    pub fn score(&self, name: &str) -> f64 {
        self.scores.get(name).copied().unwrap_or(DEFAULT_HUB_SCORE)
    }

    /// Whether no guidance is present.
    pub fn is_uniform(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}
