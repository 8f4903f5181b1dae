//! Scrolling news ticker
//!
//! Headline titles are joined into one long line that wraps around and scrolls
//! one column per frame tick.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::render::{Freshness, Region};
use crate::theme::Palette;

const SEPARATOR: &str = " \u{2022} "; // •

/// Joins the headline titles of a region, `None` when it carries no links
pub fn ticker_line(region: &Region) -> Option<String> {
    let titles: Vec<&str> = region
        .fragment
        .links()
        .into_iter()
        .map(|(title, _)| title)
        .collect();
    if titles.is_empty() {
        return None;
    }
    Some(format!("{}{}", titles.join(SEPARATOR), SEPARATOR))
}

/// `width` characters of `text` starting at `offset`, wrapping around its end
pub fn scroll_window(text: &str, offset: usize, width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() || width == 0 {
        return String::new();
    }
    let start = offset % chars.len();
    chars
        .iter()
        .cycle()
        .skip(start)
        .take(width)
        .collect()
}

/// Fixed label kept in front of stale headlines so they never scroll away
pub fn stale_label() -> String {
    format!("[{}] ", Region::STALE_MARKER)
}

/// Renders the ticker into a single-row area
///
/// Stale headlines keep a fixed marker at the left edge and use the warning color.
pub fn render(frame: &mut Frame, area: Rect, region: Option<&Region>, offset: usize, palette: &Palette) {
    let width = area.width as usize;
    let spans = match region.and_then(|r| ticker_line(r).map(|line| (r.freshness, line))) {
        Some((Freshness::Stale, line)) => {
            let label = stale_label();
            let rest = width.saturating_sub(label.chars().count());
            let warning = Style::default().fg(palette.warning);
            vec![
                Span::styled(label, warning.add_modifier(Modifier::BOLD)),
                Span::styled(scroll_window(&line, offset, rest), warning),
            ]
        }
        Some((_, line)) => vec![Span::styled(
            scroll_window(&line, offset, width),
            Style::default().fg(palette.accent),
        )],
        None => Vec::new(),
    };
    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(palette.background));
    frame.render_widget(paragraph, area);
}
