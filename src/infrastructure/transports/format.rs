//! Text layout shared by the renderers.

use crate::domain::entities::{NotificationEntry, NotificationPayload};

/// Entries listed per message before the "and N more" line.
pub const MAX_LISTED_ENTRIES: usize = 10;

/// Body lines of a payload, without the title.
///
/// `entry` renders one listed entry and `escape` is applied to free text
/// (keywords, alert messages).
pub fn body_lines(
    payload: &NotificationPayload,
    entry: impl Fn(&NotificationEntry) -> String,
    escape: impl Fn(&str) -> String,
) -> Vec<String> {
    let mut lines = Vec::new();

    match payload {
        NotificationPayload::StatusAlert { message, .. } => {
            lines.push(escape(message));
            return lines;
        }
        NotificationPayload::Digest {
            keywords, domains, ..
        } => {
            if !domains.is_empty() {
                lines.push(format!("Sites: {}", escape(&domains.join(", "))));
            }
            if !keywords.is_empty() {
                lines.push(format!("Keywords: {}", escape(&keywords.join(", "))));
            }
        }
        NotificationPayload::TextUpdate { .. } => {}
    }

    let entries = payload.entries();
    lines.extend(entries.iter().take(MAX_LISTED_ENTRIES).map(entry));
    if entries.len() > MAX_LISTED_ENTRIES {
        lines.push(format!("... and {} more", entries.len() - MAX_LISTED_ENTRIES));
    }

    lines
}

/// Plain-text rendering: title, blank line, body.
pub fn plain_text(payload: &NotificationPayload) -> String {
    let mut text = payload.title();
    let lines = body_lines(payload, plain_entry, str::to_string);
    if !lines.is_empty() {
        text.push_str("\n\n");
        text.push_str(&lines.join("\n"));
    }
    text
}

fn plain_entry(entry: &NotificationEntry) -> String {
    match &entry.title {
        Some(title) => format!("- {} ({})", title, entry.url),
        None => format!("- {}", entry.url),
    }
}

/// Escapes `&`, `<`, `>` and `"` for HTML bodies.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Cuts `text` to at most `max_chars` characters.
pub fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
