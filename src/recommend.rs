use std::collections::HashSet;

use tracing::{info, warn};

use crate::error::Result;
use crate::models::{RankedFeed, ScoredCandidate, VideoCandidate};
use crate::parser;
use crate::scoring::{ScoringEngine, validate_limit};
use crate::text_model::TextModelClient;

pub const DEFAULT_FEED_LIMIT: usize = 15;

/// Builds a learner's feed from the score baseline, letting the text model
/// reorder it when one is configured.
pub struct Recommender {
    engine: ScoringEngine,
    model: Option<TextModelClient>,
    default_limit: usize,
}

impl Recommender {
    pub fn new(engine: ScoringEngine, model: Option<TextModelClient>) -> Self {
        Self {
            engine,
            model,
            default_limit: DEFAULT_FEED_LIMIT,
        }
    }

    pub fn with_default_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit;
        self
    }

    pub async fn recommend(
        &self,
        candidates: &[VideoCandidate],
        recent_tags: &[String],
        limit: Option<usize>,
    ) -> Result<RankedFeed> {
        let limit = limit.unwrap_or(self.default_limit);
        validate_limit(limit)?;

        let pool = self.engine.rank(candidates, recent_tags, limit)?;
        let baseline = RankedFeed {
            video_ids: pool.iter().map(|c| c.video.id.clone()).collect(),
            reranked: false,
        };

        let Some(model) = &self.model else {
            return Ok(baseline);
        };
        if recent_tags.is_empty() || pool.is_empty() {
            return Ok(baseline);
        }

        info!(
            pool = pool.len(),
            tags = recent_tags.len(),
            "Re-ranking feed with text model {}",
            model.model()
        );

        let reply = match model.prompt(ranking_prompt(recent_tags, &pool)).await {
            Ok(text) => text,
            Err(e) => {
                warn!(reason = e.kind(), "Feed re-rank failed, using score order: {}", e);
                return Ok(baseline);
            }
        };

        match parser::extract_ranking(&reply) {
            Some(order) => Ok(merge_ranking(&order, &baseline.video_ids, limit)),
            None => {
                warn!("Model reply contained no ranked ids, using score order");
                Ok(baseline)
            }
        }
    }
}

fn ranking_prompt(recent_tags: &[String], pool: &[ScoredCandidate]) -> String {
    let listing = pool
        .iter()
        .map(|c| format!("- {} :: {}", c.video.id, c.video.title))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Rank these video titles for a learner interested in the provided tags.\n\
         Reply with one line per video, most relevant first, keeping the `id :: title` format.\n\
         Tags: {}\n{}",
        recent_tags.join(", "),
        listing
    )
}

/// Model order first (ids outside the pool dropped), then the rest of the
/// baseline in score order. `reranked` is set only if the model placed an id.
fn merge_ranking(order: &[String], baseline: &[String], limit: usize) -> RankedFeed {
    let pool: HashSet<&str> = baseline.iter().map(String::as_str).collect();
    let mut placed: HashSet<&str> = HashSet::with_capacity(baseline.len());
    let mut video_ids = Vec::with_capacity(baseline.len());

    for id in order {
        if pool.contains(id.as_str()) && placed.insert(id.as_str()) {
            video_ids.push(id.clone());
        }
    }
    let reranked = !video_ids.is_empty();

    for id in baseline {
        if placed.insert(id.as_str()) {
            video_ids.push(id.clone());
        }
    }
    video_ids.truncate(limit);

    RankedFeed {
        video_ids,
        reranked,
    }
}
