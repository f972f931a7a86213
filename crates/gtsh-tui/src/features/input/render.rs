//! Live input line rendering.
//!
//! `LiveView::compose` is the pure part: buffer text and queued count in, a
//! `LiveFrame` out. `render_input` only draws an already composed frame.

use std::fmt;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::common::text::tail_with_ellipsis;

/// Block cursor drawn at the end of the line.
pub const CURSOR: char = '\u{2588}';

/// Logical content of one redraw of the input area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveFrame {
    /// Prompt, buffer text and trailing cursor.
    pub input_line: String,
    /// Queued-count marker; present only when messages are waiting.
    pub indicator: Option<String>,
}

impl fmt::Display for LiveFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.input_line)?;
        if let Some(indicator) = &self.indicator {
            write!(f, "  {indicator}")?;
        }
        Ok(())
    }
}

/// Composes live frames for a fixed prompt.
#[derive(Debug, Clone)]
pub struct LiveView {
    prompt: String,
}

impl LiveView {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }

    pub fn compose(&self, buffer: &str, queued: usize) -> LiveFrame {
        let mut input_line = String::with_capacity(self.prompt.len() + buffer.len() + 4);
        input_line.push_str(&self.prompt);
        input_line.push_str(buffer);
        input_line.push(CURSOR);

        let indicator = (queued > 0).then(|| format!("[{queued} queued]"));

        LiveFrame {
            input_line,
            indicator,
        }
    }
}

/// Draws the input row: the line on the left, the indicator on the right.
pub fn render_input(frame: &mut Frame, area: Rect, live: &LiveFrame) {
    if area.height == 0 || area.width == 0 {
        return;
    }

    let indicator_width = live
        .indicator
        .as_ref()
        .map_or(0, |ind| ind.width() as u16 + 1)
        .min(area.width / 2);
    let [line_area, indicator_area] =
        Layout::horizontal([Constraint::Min(1), Constraint::Length(indicator_width)]).areas(area);

    let visible = tail_with_ellipsis(&live.input_line, line_area.width as usize);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            visible,
            Style::default().fg(Color::White),
        ))),
        line_area,
    );

    if let Some(indicator) = &live.indicator
        && indicator_area.width > 0
    {
        let marker = Paragraph::new(Line::from(Span::styled(
            indicator.clone(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Right);
        frame.render_widget(marker, indicator_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_trails_buffer() {
        let view = LiveView::new("> ");
        let frame = view.compose("hi", 0);
        assert_eq!(frame.input_line, "> hi\u{2588}");
        assert_eq!(frame.indicator, None);
    }

    #[test]
    fn test_empty_buffer_shows_only_cursor() {
        let view = LiveView::new("");
        assert_eq!(view.compose("", 0).input_line, "\u{2588}");
    }

    #[test]
    fn test_indicator_only_when_queued() {
        let view = LiveView::new("> ");
        assert_eq!(view.compose("x", 0).indicator, None);
        assert_eq!(view.compose("x", 1).indicator.as_deref(), Some("[1 queued]"));
        assert_eq!(view.compose("x", 12).indicator.as_deref(), Some("[12 queued]"));
    }

    #[test]
    fn test_compose_is_idempotent() {
        let view = LiveView::new("> ");
        let first = view.compose("next", 2).to_string();
        let second = view.compose("next", 2).to_string();
        assert_eq!(first.as_bytes(), second.as_bytes());
        assert_eq!(first, "> next\u{2588}  [2 queued]");
    }
}
