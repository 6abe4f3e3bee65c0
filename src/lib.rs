pub mod catalog;
pub mod config;
pub mod error;
pub mod generation;
pub mod http;
pub mod models;
pub mod parser;
pub mod recommend;
pub mod scoring;
pub mod text_model;
pub mod transport;

use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::generation::ContentGenerator;
use crate::models::{QuizResult, RankedFeed, SummaryResult, VideoCandidate};
use crate::recommend::Recommender;
use crate::scoring::ScoringEngine;
use crate::text_model::TextModelClient;
use crate::transport::{HttpTransport, Transport};

/// Feed ranking plus summary and quiz generation behind one handle.
///
/// Holds no per-request state; share it behind an `Arc`.
pub struct IntelligenceService {
    recommender: Recommender,
    generator: ContentGenerator,
}

impl IntelligenceService {
    pub fn new(cfg: &Config) -> Self {
        let model = cfg.model_api_key().map(|api_key| {
            let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(
                cfg.model.api_url.clone(),
                api_key.to_string(),
            ));
            TextModelClient::from_config(transport, &cfg.model)
        });

        match &model {
            Some(m) => tracing::info!("Text model enabled: {}", m.model()),
            None => tracing::info!("Text model disabled - deterministic results only"),
        }

        Self::with_model(cfg, model)
    }

    /// Build with an explicit (possibly absent) model client
    pub fn with_model(cfg: &Config, model: Option<TextModelClient>) -> Self {
        let recommender = Recommender::new(
            ScoringEngine::new(cfg.feed.trend_weights),
            model.clone(),
        )
        .with_default_limit(cfg.feed.default_limit);

        let generator = ContentGenerator::new(model).with_quiz_questions(cfg.quiz.question_count);

        Self {
            recommender,
            generator,
        }
    }

    pub async fn recommend(
        &self,
        candidates: &[VideoCandidate],
        recent_tags: &[String],
        limit: Option<usize>,
    ) -> Result<RankedFeed> {
        self.recommender.recommend(candidates, recent_tags, limit).await
    }

    pub async fn summarize(
        &self,
        title: &str,
        tags: &[String],
        transcript: Option<&str>,
    ) -> Result<SummaryResult> {
        self.generator.summarize(title, tags, transcript).await
    }

    pub async fn generate_quiz(&self, topic: &str, tags: &[String]) -> Result<QuizResult> {
        self.generator.generate_quiz(topic, tags).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text_model::stubs::ScriptedTransport;
    use std::time::Duration;

    #[tokio::test]
    async fn test_unconfigured_service_is_deterministic() {
        let service = IntelligenceService::new(&Config::default());
        let tags = vec!["ai".to_string(), "ml".to_string()];

        let summary = service.summarize("Intro to Neural Nets", &tags, None).await.unwrap();
        assert_eq!(summary.summary, "Intro to Neural Nets covers ai, ml in under 90 seconds.");

        let quiz = service.generate_quiz("Big O", &[]).await.unwrap();
        assert_eq!(quiz.questions.len(), 1);
    }

    #[tokio::test]
    async fn test_model_is_shared_by_all_operations() {
        let tx = Arc::new(ScriptedTransport::new("- b :: B\nsecond line"));
        let model = TextModelClient::new(tx.clone(), "m".to_string(), Duration::from_secs(1));
        let service = IntelligenceService::with_model(&Config::default(), Some(model));

        let candidates = vec![
            VideoCandidate::new("a", "A", &["x"], 100, 10),
            VideoCandidate::new("b", "B", &["y"], 0, 0),
        ];
        let feed = service
            .recommend(&candidates, &["x".to_string()], None)
            .await
            .unwrap();
        assert_eq!(feed.video_ids, vec!["b", "a"]);

        let summary = service.summarize("T", &[], None).await.unwrap();
        assert_eq!(summary.summary, "b :: B");
        assert_eq!(tx.calls(), 2);
    }

    #[test]
    fn test_service_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<IntelligenceService>();
    }
}
