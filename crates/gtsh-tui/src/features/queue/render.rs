//! Queued message preview, drawn above the status row.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::common::text::truncate_with_ellipsis;

/// Renders up to `area.height` queued summaries, bottom-aligned.
///
/// When more messages are queued than fit, the last row says how many are hidden.
pub fn render_queue_preview(frame: &mut Frame, area: Rect, summaries: &[String], total: usize) {
    if summaries.is_empty() || area.height == 0 {
        return;
    }

    let rows = area.height as usize;
    let hidden = total.saturating_sub(summaries.len());
    let (shown, more) = if hidden > 0 || summaries.len() > rows {
        let shown = summaries.len().min(rows.saturating_sub(1));
        (shown, total - shown)
    } else {
        (summaries.len(), 0)
    };

    // Inner width accounts for the "  ↳ " prefix.
    let inner_width = area.width.saturating_sub(4) as usize;
    let bullet_style = Style::default().fg(Color::DarkGray);
    let text_style = Style::default().fg(Color::Gray);

    let mut lines: Vec<Line<'static>> = summaries
        .iter()
        .take(shown)
        .map(|summary| {
            Line::from(vec![
                Span::styled("  ↳ ", bullet_style),
                Span::styled(truncate_with_ellipsis(summary, inner_width), text_style),
            ])
        })
        .collect();
    if more > 0 {
        lines.push(Line::from(Span::styled(
            format!("  +{more} more queued"),
            bullet_style,
        )));
    }

    let padding = rows.saturating_sub(lines.len());
    let mut padded = vec![Line::default(); padding];
    padded.extend(lines);
    frame.render_widget(Paragraph::new(padded), area);
}
