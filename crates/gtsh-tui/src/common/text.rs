//! Text utilities for rendering.
//!
//! Widths are terminal columns as reported by `unicode-width`.

use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: char = '…';

/// Truncates the end of `text` with an ellipsis if it exceeds `max_width`.
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width <= 1 {
        return ELLIPSIS.to_string();
    }
    let mut truncated = String::new();
    let mut width = 0;
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width + 1 > max_width {
            break;
        }
        width += ch_width;
        truncated.push(ch);
    }
    truncated.push(ELLIPSIS);
    truncated
}

/// Keeps the end of `text`, replacing the dropped start with an ellipsis.
///
/// Used for the input line so the cursor at the end stays visible.
pub fn tail_with_ellipsis(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width <= 1 {
        return ELLIPSIS.to_string();
    }
    let mut tail = Vec::new();
    let mut width = 0;
    for ch in text.chars().rev() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width + 1 > max_width {
            break;
        }
        width += ch_width;
        tail.push(ch);
    }
    std::iter::once(ELLIPSIS).chain(tail.into_iter().rev()).collect()
}

/// Splits `text` into rows of at most `width` columns.
///
/// Always returns at least one row.
pub fn wrap_to_width(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();
    let mut row = String::new();
    let mut row_width = 0;
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if row_width + ch_width > width && !row.is_empty() {
            rows.push(std::mem::take(&mut row));
            row_width = 0;
        }
        row.push(ch);
        row_width += ch_width;
    }
    rows.push(row);
    rows
}

/// Strips escape bytes and expands tabs in external text before display.
pub fn sanitize_for_display(s: &str) -> Cow<'_, str> {
    if s.contains('\x1b') || s.contains('\t') || s.contains('\r') {
        Cow::Owned(
            s.replace('\x1b', "")
                .replace('\t', "    ")
                .replace('\r', ""),
        )
    } else {
        Cow::Borrowed(s)
    }
}
