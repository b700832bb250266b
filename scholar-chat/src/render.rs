//! Answer and error rendering
//!
//! Turns backend answers into HTML-safe markup. Every piece is built through
//! [`SafeMarkup`], which escapes before any markup expansion, so nothing from
//! the backend reaches the output as a raw tag.

use scholar_core::{ChatMessage, ChatResponse, ErrorKind, SafeMarkup};

pub use scholar_core::escape_html;

/// Escape, then expand bold, italic, inline code, line breaks and links.
pub fn format_text(text: &str) -> SafeMarkup {
    SafeMarkup::format(text)
}

/// Render an answer followed by its ranked sources, if any.
///
/// Source filenames are escaped but never markup-expanded.
pub fn render_answer(response: &ChatResponse) -> SafeMarkup {
    let mut markup = format_text(&response.answer);

    if !response.sources.is_empty() {
        markup.push_break();
        markup.push_break();
        markup.push(&SafeMarkup::strong(&SafeMarkup::escape("Sources:")));
        markup.push_break();
        for (idx, source) in response.sources.iter().enumerate() {
            markup.push(&SafeMarkup::escape(&format!(
                "{}. {} ({}% confidence)",
                idx + 1,
                source.filename,
                source.confidence_percent()
            )));
            markup.push_break();
        }
    }

    markup
}

/// Render the fixed user-facing sentence for a failure
pub fn render_error(kind: ErrorKind) -> SafeMarkup {
    SafeMarkup::escape(&kind.user_message())
}

/// Render a transcript entry for display
pub fn render_message(message: &ChatMessage) -> SafeMarkup {
    message.markup()
}
