//! Scholar Chat - request pipeline and rendering for the site assistant
//!
//! Three layers: [`client`] talks to the answer-generation service and
//! classifies failures, [`render`] turns answers and errors into safe markup,
//! and [`controller`] sequences one submission at a time for a UI binding.

pub mod client;
pub mod controller;
pub mod render;

pub use client::HttpChatClient;
pub use controller::{ChatController, Phase, TurnOutcome};
pub use render::{escape_html, format_text, render_answer, render_error, render_message};

// Re-export the data model so front ends need a single dependency
pub use scholar_core::{
    ApiConfig, ChatBackend, ChatMessage, ChatRequest, ChatResponse, ChatView, ErrorKind,
    HealthStatus, NullView, SafeMarkup, Sender, Source, Transcript,
};
