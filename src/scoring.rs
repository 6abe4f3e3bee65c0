use std::collections::HashSet;

use tracing::debug;

use crate::config::TrendWeights;
use crate::error::{IntelligenceError, Result};
use crate::models::{ScoredCandidate, VideoCandidate};

/// Deterministic relevance scoring: shared tags plus popularity
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    weights: TrendWeights,
}

impl ScoringEngine {
    pub fn new(weights: TrendWeights) -> Self {
        Self { weights }
    }

    /// Number of tags shared with the learner's recent interests, ignoring case
    pub fn tag_overlap(recent: &HashSet<String>, video: &VideoCandidate) -> usize {
        video
            .tags
            .iter()
            .map(|t| t.to_lowercase())
            .collect::<HashSet<_>>()
            .intersection(recent)
            .count()
    }

    pub fn trend_score(&self, video: &VideoCandidate) -> f64 {
        video.views as f64 * self.weights.views + video.likes as f64 * self.weights.likes
    }

    /// Every candidate with its score, highest first, ties broken by ascending id
    pub fn score_all(
        &self,
        candidates: &[VideoCandidate],
        recent_tags: &[String],
    ) -> Vec<ScoredCandidate> {
        let recent: HashSet<String> = recent_tags.iter().map(|t| t.to_lowercase()).collect();

        let mut scored: Vec<ScoredCandidate> = candidates
            .iter()
            .map(|video| ScoredCandidate {
                score: Self::tag_overlap(&recent, video) as f64 + self.trend_score(video),
                video: video.clone(),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.video.id.cmp(&b.video.id))
        });
        scored
    }

    /// Top `limit` candidates by score
    pub fn rank(
        &self,
        candidates: &[VideoCandidate],
        recent_tags: &[String],
        limit: usize,
    ) -> Result<Vec<ScoredCandidate>> {
        validate_limit(limit)?;

        let mut scored = self.score_all(candidates, recent_tags);
        scored.truncate(limit);

        debug!(
            candidates = candidates.len(),
            kept = scored.len(),
            "Scored feed candidates"
        );
        Ok(scored)
    }
}

pub fn validate_limit(limit: usize) -> Result<()> {
    if limit < 1 {
        return Err(IntelligenceError::Validation(
            "limit must be at least 1".to_string(),
        ));
    }
    Ok(())
}
