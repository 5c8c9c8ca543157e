//! Inline rich text rendering.
//!
//! Converts an ordered sequence of spans into one inline Markdown string.
//! Two CommonMark rules shape this code: code spans cannot carry nested
//! emphasis, so the code annotation short-circuits everything else; and
//! emphasis markers adjacent to whitespace are ambiguous, so at most one
//! leading and one trailing whitespace character is moved outside the
//! markers before they are applied.

use crate::model::RichTextSpan;

/// Render spans in array order with no inserted separators.
pub fn render_rich_text(spans: &[RichTextSpan]) -> String {
    spans.iter().map(render_span).collect()
}

fn render_span(span: &RichTextSpan) -> String {
    let annotations = &span.annotations;

    if annotations.code {
        // Code spans never combine with bold/italic/strikethrough.
        let escaped = span.plain_text.replace('`', "\\`");
        let mut out = format!("`{}`", escaped);
        if let Some(href) = &span.href {
            out = format!("[{}]({})", out, href);
        }
        return out;
    }

    let (leading, core, trailing) = split_edge_whitespace(&span.plain_text);
    let mut out = core.to_string();

    if !out.is_empty() {
        if annotations.bold && annotations.italic {
            out = format!("***{}***", out);
        } else if annotations.bold {
            out = format!("**{}**", out);
        } else if annotations.italic {
            out = format!("*{}*", out);
        }
        if annotations.strikethrough {
            out = format!("~~{}~~", out);
        }
    }

    if let Some(href) = &span.href {
        if !out.is_empty() {
            out = format!("[{}]({})", out, href);
        }
    }

    format!("{}{}{}", leading, out, trailing)
}

/// Split off at most one leading and one trailing whitespace character.
fn split_edge_whitespace(text: &str) -> (&str, &str, &str) {
    let (leading, rest) = match text.chars().next() {
        Some(c) if c.is_whitespace() => text.split_at(c.len_utf8()),
        _ => ("", text),
    };
    let (core, trailing) = match rest.chars().next_back() {
        Some(c) if c.is_whitespace() => rest.split_at(rest.len() - c.len_utf8()),
        _ => (rest, ""),
    };
    (leading, core, trailing)
}
