use tracing::{info, warn};

use crate::error::{IntelligenceError, Result};
use crate::models::{QuizQuestion, QuizResult, SummaryResult};
use crate::parser;
use crate::text_model::TextModelClient;

pub const DEFAULT_QUIZ_QUESTIONS: usize = 3;

const FALLBACK_KEY_POINTS: usize = 3;
const FALLBACK_QUIZ_TAGS: usize = 2;
const FALLBACK_OPTIONS: [&str; 4] = ["Definition", "Example", "Application", "Irrelevant"];
const FALLBACK_ANSWER: &str = "Application";

/// Summaries and quizzes for short lessons, from the text model when it
/// answers and from fixed templates when it does not.
pub struct ContentGenerator {
    model: Option<TextModelClient>,
    quiz_questions: usize,
}

impl ContentGenerator {
    pub fn new(model: Option<TextModelClient>) -> Self {
        Self {
            model,
            quiz_questions: DEFAULT_QUIZ_QUESTIONS,
        }
    }

    pub fn with_quiz_questions(mut self, count: usize) -> Self {
        self.quiz_questions = count.max(1);
        self
    }

    pub async fn summarize(
        &self,
        title: &str,
        tags: &[String],
        transcript: Option<&str>,
    ) -> Result<SummaryResult> {
        require_text("title", title)?;

        let Some(model) = &self.model else {
            return Ok(fallback_summary(title, tags));
        };

        info!("Generating summary with {} for: {}", model.model(), title);
        let prompt = format!(
            "Summarize the following short educational reel. Provide 2 sentences and bullet key points.\n\
             Title: {}\nTags: {}\nTranscript: {}",
            title,
            tags.join(", "),
            transcript.filter(|t| !t.trim().is_empty()).unwrap_or("Not provided")
        );

        match model.prompt(prompt).await {
            Ok(text) => Ok(parser::extract_summary(&text)),
            Err(e) => {
                warn!(reason = e.kind(), "Summary generation failed, using template: {}", e);
                Ok(fallback_summary(title, tags))
            }
        }
    }

    pub async fn generate_quiz(&self, topic: &str, tags: &[String]) -> Result<QuizResult> {
        require_text("topic", topic)?;

        let Some(model) = &self.model else {
            return Ok(fallback_quiz(topic, tags));
        };

        info!("Generating quiz with {} for: {}", model.model(), topic);
        let prompt = format!(
            "Create {} concise MCQs with 4 options and answer key for the topic. \
             Start each with \"Question N:\", list the options as A. to D., and end with \"Answer: <letter>\".\n\
             Topic: {}. Tags: {}",
            self.quiz_questions,
            topic,
            tags.join(", ")
        );

        let text = match model.prompt(prompt).await {
            Ok(text) => text,
            Err(e) => {
                warn!(reason = e.kind(), "Quiz generation failed, using template: {}", e);
                return Ok(fallback_quiz(topic, tags));
            }
        };

        match parser::extract_quiz(&text) {
            Some(mut questions) => {
                questions.truncate(self.quiz_questions);
                Ok(QuizResult { questions })
            }
            None => {
                warn!("Model reply contained no usable questions, using template");
                Ok(fallback_quiz(topic, tags))
            }
        }
    }
}

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(IntelligenceError::Validation(format!(
            "{field} must not be empty"
        )));
    }
    Ok(())
}

pub fn fallback_summary(title: &str, tags: &[String]) -> SummaryResult {
    let covered = if tags.is_empty() {
        "core ideas".to_string()
    } else {
        tags.join(", ")
    };

    let mut key_points: Vec<String> = tags
        .iter()
        .take(FALLBACK_KEY_POINTS)
        .map(|tag| format!("Key idea: {tag}"))
        .collect();
    if key_points.is_empty() {
        key_points.push("Key idea: core concept".to_string());
    }

    SummaryResult {
        summary: format!("{title} covers {covered} in under 90 seconds."),
        key_points,
    }
}

/// One templated question per leading tag, or a single one for the topic
pub fn fallback_quiz(topic: &str, tags: &[String]) -> QuizResult {
    let count = tags.len().clamp(1, FALLBACK_QUIZ_TAGS);
    let questions = (0..count)
        .map(|_| QuizQuestion {
            question: format!("What is a core takeaway from {topic}?"),
            options: FALLBACK_OPTIONS.iter().map(|o| o.to_string()).collect(),
            answer: FALLBACK_ANSWER.to_string(),
        })
        .collect();
    QuizResult { questions }
}
