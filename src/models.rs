use serde::{Deserialize, Serialize};

/// A video eligible for ranking, as supplied by the catalog for one call
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct VideoCandidate {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub likes: u64,
}

impl VideoCandidate {
    pub fn new(id: impl Into<String>, title: impl Into<String>, tags: &[&str], views: u64, likes: u64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            views,
            likes,
        }
    }
}

/// A candidate paired with the score it received in this call
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub video: VideoCandidate,
    pub score: f64,
}

/// Ordered, duplicate-free feed of video ids
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct RankedFeed {
    pub video_ids: Vec<String>,
    /// True when the order came from the text model rather than the score baseline
    #[serde(default)]
    pub reranked: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SummaryResult {
    pub summary: String,
    pub key_points: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
}

impl QuizQuestion {
    /// Exactly four options and an answer that is one of them
    pub fn is_well_formed(&self) -> bool {
        !self.question.trim().is_empty()
            && self.options.len() == 4
            && self.options.iter().all(|o| !o.is_empty())
            && self.options.contains(&self.answer)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct QuizResult {
    pub questions: Vec<QuizQuestion>,
}

// Chat message format shared by OpenAI-compatible endpoints
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

// Chat-completions request format
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

// Chat-completions response format
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Choice {
    pub message: ReplyMessage,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplyMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatResponse {
    /// Response carrying a single assistant message
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            choices: vec![Choice {
                message: ReplyMessage {
                    content: Some(text.into()),
                },
            }],
        }
    }

    /// Text of the first choice, empty when the service returned none
    pub fn first_text(&self) -> String {
        self.choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_response_deserializes_openai_shape() {
        let raw = r#"{
            "id": "chatcmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "Hello"}, "finish_reason": "stop"}
            ]
        }"#;
        let response: ChatResponse = serde_json::from_str(raw).expect("valid response json");
        assert_eq!(response.first_text(), "Hello");
    }

    #[test]
    fn test_chat_response_without_choices_is_empty_text() {
        let response: ChatResponse = serde_json::from_str("{}").expect("valid response json");
        assert_eq!(response.first_text(), "");
    }

    #[test]
    fn test_quiz_question_well_formed() {
        let mut q = QuizQuestion {
            question: "What is 2 + 2?".to_string(),
            options: vec!["1".into(), "2".into(), "3".into(), "4".into()],
            answer: "4".to_string(),
        };
        assert!(q.is_well_formed());

        q.answer = "5".to_string();
        assert!(!q.is_well_formed());

        q.answer = "4".to_string();
        q.options.pop();
        assert!(!q.is_well_formed());
    }
}
