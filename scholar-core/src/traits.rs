//! Core trait definitions

use crate::error::{ErrorKind, ScholarResult};
use crate::types::*;
use async_trait::async_trait;

/// Answer-generation backend reached by the chat widget
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send one question. Resolves to an answer or exactly one classified failure.
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, ErrorKind>;
}

#[async_trait]
impl<T: ChatBackend + ?Sized> ChatBackend for std::sync::Arc<T> {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, ErrorKind> {
        (**self).send(request).await
    }
}

/// UI binding driven by the input controller
///
/// Everything here is UI-local. Only `show_message` can fail, since it is the
/// one call that actually writes somewhere.
pub trait ChatView {
    /// Enable or disable the input affordance
    fn set_input_enabled(&mut self, enabled: bool);

    /// Show a transient status, or clear it with `None`
    fn set_status(&mut self, status: Option<&str>);

    /// Empty the input affordance
    fn clear_input(&mut self);

    /// Move focus back to the input affordance
    fn focus_input(&mut self);

    /// Display a newly appended transcript entry
    fn show_message(&mut self, message: &ChatMessage) -> ScholarResult<()>;
}

/// A view that displays nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NullView;

impl ChatView for NullView {
    fn set_input_enabled(&mut self, _enabled: bool) {}

    fn set_status(&mut self, _status: Option<&str>) {}

    fn clear_input(&mut self) {}

    fn focus_input(&mut self) {}

    fn show_message(&mut self, _message: &ChatMessage) -> ScholarResult<()> {
        Ok(())
    }
}
