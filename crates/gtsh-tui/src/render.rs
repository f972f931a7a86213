//! Pure view/render functions for the shell.
//!
//! Functions here take a `ShellView` snapshot, draw to a ratatui Frame and
//! never mutate driver state. The live area is a small inline viewport:
//! queue preview rows, one status row, one input row. Transcript lines are
//! printed above it by the runtime via `insert_before`.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::common::text::{sanitize_for_display, wrap_to_width};
use crate::driver::ShellPhase;
use crate::effects::TranscriptLine;
use crate::features::input::{LiveFrame, render_input};
use crate::features::queue::render_queue_preview;

/// Height of the status row above the input.
const STATUS_HEIGHT: u16 = 1;

/// Height of the input row.
const INPUT_HEIGHT: u16 = 1;

/// Spinner frames for the status row.
const SPINNER_FRAMES: &[&str] = &["◐", "◓", "◑", "◒"];

/// Read-only snapshot of everything one redraw needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellView {
    pub live: LiveFrame,
    pub phase: ShellPhase,
    pub queue_preview: Vec<String>,
    pub queued: usize,
    pub spinner_frame: usize,
}

/// Inline viewport height for a given number of preview rows.
pub fn viewport_height(queue_preview: usize) -> u16 {
    let preview = u16::try_from(queue_preview).unwrap_or(u16::MAX - 2);
    preview + STATUS_HEIGHT + INPUT_HEIGHT
}

/// Renders the live area.
pub fn render(frame: &mut Frame, view: &ShellView) {
    let area = frame.area();
    let [queue_area, status_area, input_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(STATUS_HEIGHT),
        Constraint::Length(INPUT_HEIGHT),
    ])
    .areas(area);

    render_queue_preview(frame, queue_area, &view.queue_preview, view.queued);
    frame.render_widget(Paragraph::new(status_line(view)), status_area);
    render_input(frame, input_area, &view.live);
}

fn status_line(view: &ShellView) -> Line<'static> {
    let spinner = SPINNER_FRAMES[view.spinner_frame % SPINNER_FRAMES.len()];
    let hint = Style::default().fg(Color::DarkGray);

    match view.phase {
        ShellPhase::Prompting => Line::from(vec![
            Span::styled("Enter", hint),
            Span::raw(" send  "),
            Span::styled("Ctrl+U", hint),
            Span::raw(" clear  "),
            Span::styled("Ctrl+C", hint),
            Span::raw(" quit"),
        ]),
        ShellPhase::Busy => Line::from(vec![
            Span::styled(spinner, Style::default().fg(Color::Yellow)),
            Span::raw(" "),
            Span::styled("Working...", Style::default().fg(Color::Yellow)),
            Span::raw("  "),
            Span::styled("Ctrl+C", hint),
            Span::raw(" to cancel"),
        ]),
        ShellPhase::Draining => Line::from(vec![
            Span::styled(spinner, Style::default().fg(Color::Cyan)),
            Span::raw(" "),
            Span::styled("Sending queued message...", Style::default().fg(Color::Cyan)),
        ]),
    }
}

/// Styled, wrapped lines for one transcript entry.
pub fn transcript_lines(line: &TranscriptLine, width: usize) -> Vec<Line<'static>> {
    let (prefix, text, style) = match line {
        TranscriptLine::User(text) => (
            "> ",
            text,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        TranscriptLine::Agent(text) => ("  ", text, Style::default()),
        TranscriptLine::Notice(text) => ("· ", text, Style::default().fg(Color::DarkGray)),
        TranscriptLine::Error(text) => ("! ", text, Style::default().fg(Color::Red)),
    };

    let body_width = width.saturating_sub(prefix.width()).max(1);
    let sanitized = sanitize_for_display(text);
    wrap_to_width(&sanitized, body_width)
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            let lead = if i == 0 { prefix } else { "  " };
            Line::from(vec![Span::styled(lead, style), Span::styled(row, style)])
        })
        .collect()
}
