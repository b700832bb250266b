//! Core data type definitions

use crate::markup::SafeMarkup;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Answer used when the backend returns no usable text
pub const FALLBACK_ANSWER: &str = "Sorry, I could not generate a response.";

/// Display name for a source whose metadata carries no filename
pub const UNKNOWN_SOURCE: &str = "unknown";

/// Who authored a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "bot",
        }
    }
}

/// A single transcript entry
///
/// User entries hold the trimmed text the user typed. Bot entries hold
/// already-rendered safe markup.
///
/// ```compile_fail
/// let message = scholar_core::ChatMessage::bot("<img src=x onerror=alert(1)>");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    text: String,
    sender: Sender,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::User,
        }
    }

    pub fn bot(markup: SafeMarkup) -> Self {
        Self {
            text: markup.into_string(),
            sender: Sender::Bot,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }

    /// Display form: user text is formatted, bot text already is markup
    pub fn markup(&self) -> SafeMarkup {
        match self.sender {
            Sender::User => SafeMarkup::format(&self.text),
            Sender::Bot => SafeMarkup::from_trusted(self.text.clone()),
        }
    }
}

/// Ordered, append-only list of chat messages
#[derive(Debug, Clone, Default, Serialize)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }
}

/// Outgoing chat request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub query: String,
    pub conversation_id: String,
}

impl ChatRequest {
    /// Build a request from raw user input, or `None` if it is blank.
    ///
    /// Every request gets a fresh conversation id; the backend receives no
    /// continuity signal across messages.
    pub fn new(raw: &str) -> Option<Self> {
        let query = raw.trim();
        if query.is_empty() {
            return None;
        }

        Some(Self {
            query: query.to_string(),
            conversation_id: new_conversation_id(),
        })
    }
}

/// Timestamp-based conversation id, e.g. `web_chat_1729000000000`
pub fn new_conversation_id() -> String {
    format!("web_chat_{}", chrono::Utc::now().timestamp_millis())
}

/// A cited document backing an answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub filename: String,
    /// Relevance score in [0, 1]
    pub score: f64,
}

impl Source {
    pub fn new(filename: impl Into<String>, score: f64) -> Self {
        Self {
            filename: filename.into(),
            score,
        }
    }

    /// Rounded percentage shown as "confidence"
    pub fn confidence_percent(&self) -> i64 {
        (self.score * 100.0).round() as i64
    }
}

/// A successful answer from the backend
///
/// `sources` keeps the backend's order, which is the display rank.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatResponse {
    pub answer: String,
    pub sources: Vec<Source>,
}

impl ChatResponse {
    pub fn new(answer: impl Into<String>, sources: Vec<Source>) -> Self {
        Self {
            answer: answer.into(),
            sources,
        }
    }
}

/// Wire shape of a 2xx `/chat` body. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
struct RawChatResponse {
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    sources: Option<Vec<RawSource>>,
}

#[derive(Debug, Deserialize)]
struct RawSource {
    #[serde(default)]
    score: Option<f64>,
    #[serde(default)]
    metadata: Option<RawSourceMetadata>,
}

#[derive(Debug, Default, Deserialize)]
struct RawSourceMetadata {
    #[serde(default)]
    filename: Option<String>,
}

impl<'de> Deserialize<'de> for ChatResponse {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawChatResponse::deserialize(deserializer)?;

        let answer = raw
            .answer
            .filter(|answer| !answer.is_empty())
            .unwrap_or_else(|| FALLBACK_ANSWER.to_string());

        let sources = raw
            .sources
            .unwrap_or_default()
            .into_iter()
            .map(|source| Source {
                filename: source
                    .metadata
                    .and_then(|metadata| metadata.filename)
                    .unwrap_or_else(|| UNKNOWN_SOURCE.to_string()),
                score: source.score.unwrap_or_default(),
            })
            .collect();

        Ok(Self { answer, sources })
    }
}

/// Backend health report from `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub services: HashMap<String, String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Optional error body some backends attach to failures. Never relied upon.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: Option<String>,
    pub detail: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_trims_and_rejects_blank() {
        assert!(ChatRequest::new("").is_none());
        assert!(ChatRequest::new("   \n\t").is_none());

        let request = ChatRequest::new("  What is X?  ").unwrap();
        assert_eq!(request.query, "What is X?");
        assert!(request.conversation_id.starts_with("web_chat_"));
    }

    #[test]
    fn test_request_wire_shape() {
        let request = ChatRequest {
            query: "hi".to_string(),
            conversation_id: "web_chat_1".to_string(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"query": "hi", "conversation_id": "web_chat_1"})
        );
    }

    #[test]
    fn test_response_defaults() {
        let response: ChatResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.answer, FALLBACK_ANSWER);
        assert!(response.sources.is_empty());

        let response: ChatResponse = serde_json::from_str(r#"{"answer": ""}"#).unwrap();
        assert_eq!(response.answer, FALLBACK_ANSWER);
    }

    #[test]
    fn test_response_sources_keep_order_and_ignore_extras() {
        let body = r#"{
            "answer": "X is Y.",
            "conversation_id": "conv_123",
            "confidence": 0.8,
            "sources": [
                {"score": 0.873, "text": "chunk", "metadata": {"filename": "a.pdf", "page": 1}},
                {"score": 0.5, "metadata": {"filename": "b.pdf"}},
                {"score": 0.1, "metadata": {}}
            ]
        }"#;

        let response: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.answer, "X is Y.");
        assert_eq!(response.sources.len(), 3);
        assert_eq!(response.sources[0].filename, "a.pdf");
        assert_eq!(response.sources[1].filename, "b.pdf");
        assert_eq!(response.sources[2].filename, UNKNOWN_SOURCE);
        assert_eq!(response.sources[0].confidence_percent(), 87);
        assert_eq!(response.sources[1].confidence_percent(), 50);
    }

    #[test]
    fn test_null_source_fields_keep_the_answer() {
        let body = r#"{
            "answer": "Still here.",
            "sources": [
                {"score": null, "metadata": {"filename": "a.pdf"}},
                {"score": 0.4, "metadata": null},
                {"score": null, "metadata": null}
            ]
        }"#;

        let response: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.answer, "Still here.");
        assert_eq!(response.sources.len(), 3);
        assert_eq!(response.sources[0].filename, "a.pdf");
        assert_eq!(response.sources[0].confidence_percent(), 0);
        assert_eq!(response.sources[1].filename, UNKNOWN_SOURCE);
        assert_eq!(response.sources[1].confidence_percent(), 40);
        assert_eq!(response.sources[2].filename, UNKNOWN_SOURCE);
    }

    #[test]
    fn test_bot_entries_hold_escaped_markup() {
        let message = ChatMessage::bot(SafeMarkup::format("<b>**ok**</b>"));
        assert_eq!(message.text(), "&lt;b&gt;<strong>ok</strong>&lt;/b&gt;");
        assert_eq!(message.markup().as_str(), message.text());

        let message = ChatMessage::user("<b>hi</b>");
        assert_eq!(message.text(), "<b>hi</b>");
        assert_eq!(message.markup().as_str(), "&lt;b&gt;hi&lt;/b&gt;");
    }

    #[test]
    fn test_transcript_appends_in_order() {
        let mut transcript = Transcript::new();
        assert!(transcript.is_empty());

        transcript.push(ChatMessage::user("hello"));
        transcript.push(ChatMessage::bot(SafeMarkup::escape("hi")));

        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.messages()[0].sender(), Sender::User);
        assert_eq!(transcript.last().map(|m| m.sender()), Some(Sender::Bot));
    }
}
