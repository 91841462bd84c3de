//! Discord length limits for outgoing text
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.1.0: Drop embed chunking, keep truncation for embed fields
//! - 1.0.0: Line-aware splitting for long AI replies

/// Discord message content limit
pub const MESSAGE_LIMIT: usize = 2000;
/// Discord embed description limit
pub const EMBED_LIMIT: usize = 4096;

/// Split text into Discord-sized messages
///
/// Prefers breaking between lines; a single line longer than the limit is split on
/// character boundaries so multi-byte text is never cut mid-character.
pub fn split_message(text: &str) -> Vec<String> {
    split_at_limit(text, MESSAGE_LIMIT)
}

pub fn split_at_limit(text: &str, limit: usize) -> Vec<String> {
    if text.len() <= limit {
        return vec![text.to_string()];
    }

    let mut parts = Vec::new();
    let mut current = String::new();

    for line in text.lines() {
        let needed = if current.is_empty() {
            line.len()
        } else {
            current.len() + 1 + line.len()
        };

        if needed <= limit {
            if !current.is_empty() {
                current.push('\n');
            }
            current.push_str(line);
            continue;
        }

        if !current.is_empty() {
            parts.push(std::mem::take(&mut current));
        }

        if line.len() <= limit {
            current.push_str(line);
        } else {
            let mut pieces = split_by_chars(line, limit);
            // Last piece may still share a message with the next line
            if let Some(tail) = pieces.pop() {
                parts.extend(pieces);
                current = tail;
            }
        }
    }

    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

fn split_by_chars(line: &str, limit: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    for ch in line.chars() {
        if current.len() + ch.len_utf8() > limit && !current.is_empty() {
            pieces.push(std::mem::take(&mut current));
        }
        current.push(ch);
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

/// Cut text down to `limit` bytes, ending in "..." when anything was dropped
pub fn truncate(text: &str, limit: usize) -> String {
    if text.len() <= limit {
        return text.to_string();
    }
    let mut end = limit.saturating_sub(3);
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}
