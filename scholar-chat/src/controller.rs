//! Input controller for the chat widget
//!
//! The controller is the single `submit` entry point any UI binding calls.
//! It owns the UI-local state (input enablement, status, focus, the input
//! buffer) and the transcript, and sequences at most one request at a time.

use crate::render::{render_answer, render_error};
use scholar_core::{
    ChatBackend, ChatMessage, ChatRequest, ChatResponse, ChatView, ErrorKind, ScholarResult,
    Transcript, DEFAULT_WORKING_STATUS,
};
use tracing::{debug, info};

/// Whether a request is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Pending,
}

/// Terminal outcome of one submitted message
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    Answered(ChatResponse),
    Failed(ErrorKind),
}

impl TurnOutcome {
    pub fn is_answered(&self) -> bool {
        matches!(self, TurnOutcome::Answered(_))
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            TurnOutcome::Answered(_) => None,
            TurnOutcome::Failed(kind) => Some(*kind),
        }
    }
}

impl From<Result<ChatResponse, ErrorKind>> for TurnOutcome {
    fn from(result: Result<ChatResponse, ErrorKind>) -> Self {
        match result {
            Ok(response) => TurnOutcome::Answered(response),
            Err(kind) => TurnOutcome::Failed(kind),
        }
    }
}

pub struct ChatController<B, V> {
    backend: B,
    view: V,
    transcript: Transcript,
    phase: Phase,
    input: String,
    input_enabled: bool,
    status: Option<String>,
    focused: bool,
    working_status: String,
}

impl<B: ChatBackend, V: ChatView> ChatController<B, V> {
    pub fn new(backend: B, view: V) -> Self {
        Self {
            backend,
            view,
            transcript: Transcript::new(),
            phase: Phase::Idle,
            input: String::new(),
            input_enabled: true,
            status: None,
            focused: true,
            working_status: DEFAULT_WORKING_STATUS.to_string(),
        }
    }

    /// Override the status text shown while a request is pending
    pub fn with_working_status(mut self, status: impl Into<String>) -> Self {
        self.working_status = status.into();
        self
    }

    /// Replace the input buffer, as typing would
    pub fn set_input(&mut self, text: impl Into<String>) {
        if self.input_enabled {
            self.input = text.into();
        }
    }

    /// Submit whatever is in the input buffer
    pub async fn submit_input(&mut self) -> ScholarResult<Option<TurnOutcome>> {
        let raw = self.input.clone();
        self.submit(&raw).await
    }

    /// Submit one message and wait for its terminal outcome.
    ///
    /// Returns `Ok(None)` when nothing was sent: blank input, or a request
    /// already pending. An `Err` only reports a view failure; input is
    /// re-enabled before it is returned.
    pub async fn submit(&mut self, raw: &str) -> ScholarResult<Option<TurnOutcome>> {
        let Some(request) = self.begin(raw)? else {
            return Ok(None);
        };

        let result = self.backend.send(&request).await;
        self.finish(result.into()).map(Some)
    }

    /// Synchronous first half of a submission.
    ///
    /// Disables input, echoes the user message, clears the buffer and shows
    /// the working status, all before any request is issued.
    pub fn begin(&mut self, raw: &str) -> ScholarResult<Option<ChatRequest>> {
        if self.phase == Phase::Pending {
            debug!("Ignoring submission while a request is pending");
            return Ok(None);
        }

        let Some(request) = ChatRequest::new(raw) else {
            return Ok(None);
        };

        self.phase = Phase::Pending;
        self.set_input_enabled(false);

        let echo = ChatMessage::user(request.query.clone());
        if let Err(e) = self.append(echo) {
            self.settle();
            return Err(e);
        }

        self.input.clear();
        self.view.clear_input();
        self.status = Some(self.working_status.clone());
        self.view.set_status(Some(&self.working_status));

        info!(
            conversation_id = %request.conversation_id,
            "Submitted chat message"
        );
        Ok(Some(request))
    }

    /// Second half of a submission: render the outcome, then return to idle.
    ///
    /// Cleanup runs whether or not displaying the reply succeeded.
    pub fn finish(&mut self, outcome: TurnOutcome) -> ScholarResult<TurnOutcome> {
        let reply = match &outcome {
            TurnOutcome::Answered(response) => render_answer(response),
            TurnOutcome::Failed(kind) => {
                info!(kind = kind.code(), "Chat request failed");
                render_error(*kind)
            }
        };

        let shown = self.append(ChatMessage::bot(reply));
        self.settle();
        shown.map(|_| outcome)
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_input_enabled(&self) -> bool {
        self.input_enabled
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn has_focus(&self) -> bool {
        self.focused
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// The transcript grows even if the view fails to show the entry
    fn append(&mut self, message: ChatMessage) -> ScholarResult<()> {
        self.transcript.push(message);
        match self.transcript.last() {
            Some(message) => self.view.show_message(message),
            None => Ok(()),
        }
    }

    fn set_input_enabled(&mut self, enabled: bool) {
        self.input_enabled = enabled;
        self.view.set_input_enabled(enabled);
        if !enabled {
            self.focused = false;
        }
    }

    fn settle(&mut self) {
        self.set_input_enabled(true);
        self.status = None;
        self.view.set_status(None);
        self.focused = true;
        self.view.focus_input();
        self.phase = Phase::Idle;
    }
}
