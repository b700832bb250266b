//! HTML-safe markup
//!
//! [`SafeMarkup`] can only be built by escaping text, so any value of it is
//! free of backend- or user-supplied tags. The handful of tags it may contain
//! come from the constructors in this module.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());
static ITALIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*(.+?)\*").unwrap());
static CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`(.+?)`").unwrap());
// A `"` would end the href attribute early, so such targets stay plain text.
static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\[([^\]]+)\]\(([^)"]+)\)"#).unwrap());

static ANCHOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<a href="([^"]*)"[^>]*>(.*?)</a>"#).unwrap());
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

/// HTML that is safe to insert into a page
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SafeMarkup(String);

impl SafeMarkup {
    pub(crate) fn from_trusted(markup: String) -> Self {
        Self(markup)
    }

    /// Escape text without any markup expansion
    pub fn escape(text: &str) -> Self {
        Self(escape_html(text))
    }

    /// Escape, then expand bold, italic, inline code, line breaks and links.
    pub fn format(text: &str) -> Self {
        let escaped = escape_html(text);
        let formatted = BOLD.replace_all(&escaped, "<strong>${1}</strong>");
        let formatted = ITALIC.replace_all(&formatted, "<em>${1}</em>");
        let formatted = CODE.replace_all(&formatted, "<code>${1}</code>");
        let formatted = formatted.replace('\n', "<br>");
        let formatted = LINK.replace_all(
            &formatted,
            r#"<a href="${2}" target="_blank" rel="noopener noreferrer">${1}</a>"#,
        );

        Self(formatted.into_owned())
    }

    /// Wrap already-safe markup in `<strong>`
    pub fn strong(inner: &SafeMarkup) -> Self {
        Self(format!("<strong>{}</strong>", inner.0))
    }

    pub fn push(&mut self, other: &SafeMarkup) {
        self.0.push_str(&other.0);
    }

    pub fn push_break(&mut self) {
        self.0.push_str("<br>");
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render for a terminal: line breaks become newlines, links become
    /// `label (url)`, other tags are dropped and entities decoded.
    pub fn to_plain_text(&self) -> String {
        let text = self.0.replace("<br>", "\n");
        let text = ANCHOR.replace_all(&text, |caps: &regex::Captures| {
            let (url, label) = (&caps[1], &caps[2]);
            if url == label {
                url.to_string()
            } else {
                format!("{} ({})", label, url)
            }
        });
        let text = TAG.replace_all(&text, "");
        unescape_html(&text)
    }
}

impl fmt::Display for SafeMarkup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SafeMarkup {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Escape `&`, `<` and `>`
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn unescape_html(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
