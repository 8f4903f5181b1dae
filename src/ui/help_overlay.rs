//! Help overlay showing all keybindings
//!
//! Renders a centered modal overlay with keyboard shortcuts, sized to its
//! content and coloured with the active theme.

use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::theme::Palette;

/// Keybindings grouped by section
pub const SECTIONS: [(&str, &[(&str, &str)]); 2] = [
    (
        "Navigation",
        &[
            ("m", "Show/hide the menu"),
            ("↑/k, ↓/j", "Move menu selection"),
            ("Enter", "Open selected view"),
            ("1-3", "Dashboard / Weather / News"),
            ("q, Esc", "Quit application"),
        ],
    ),
    (
        "Widgets",
        &[
            ("r", "Refresh weather and news now"),
            ("t", "Toggle light/dark theme"),
            ("?", "Toggle this help"),
        ],
    ),
];

const KEY_COLUMN: usize = 12;
const OVERLAY_WIDTH: u16 = 50;

/// Builds the overlay content
fn help_lines(palette: &Palette) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        "Keyboard Shortcuts",
        Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
    ))];

    for (title, bindings) in SECTIONS {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.extend(bindings.iter().map(|(key, description)| {
            Line::from(vec![
                Span::styled(
                    format!("  {:<width$}", key, width = KEY_COLUMN),
                    Style::default().fg(palette.warning),
                ),
                Span::raw(*description),
            ])
        }));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press Esc or ? to close",
        Style::default().fg(palette.muted),
    )));
    lines
}

/// Renders the help overlay on top of the current view
pub fn render(frame: &mut Frame, palette: &Palette) {
    let lines = help_lines(palette);
    // Content plus top and bottom border
    let height = lines.len() as u16 + 2;
    let overlay_area = centered_rect(OVERLAY_WIDTH, height, frame.area());

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.accent))
        .style(Style::default().bg(palette.background).fg(palette.foreground));

    frame.render_widget(Paragraph::new(lines).block(block), overlay_area);
}

/// Centers a `width` x `height` rect in `area`, shrinking it to fit
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    rect
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Theme;
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        let palette = Theme::Dark.palette();

        terminal
            .draw(|frame| {
                render(frame, &palette);
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_help_overlay_lists_every_binding() {
        let content = draw(80, 24);

        assert!(content.contains("Help"), "Should render help title");
        for (title, bindings) in SECTIONS {
            assert!(content.contains(title), "Missing section {title}");
            for (_, description) in bindings {
                assert!(content.contains(description), "Missing binding {description}");
            }
        }
        assert!(content.contains("Press Esc or ? to close"));
    }

    #[test]
    fn test_overlay_height_fits_content() {
        let lines = help_lines(&Theme::Light.palette());
        let area = centered_rect(OVERLAY_WIDTH, lines.len() as u16 + 2, Rect::new(0, 0, 80, 24));
        assert_eq!(area.height as usize, lines.len() + 2);
        assert_eq!(area.width, OVERLAY_WIDTH);
    }

    #[test]
    fn test_overlay_shrinks_on_small_terminal() {
        let area = centered_rect(OVERLAY_WIDTH, 30, Rect::new(0, 0, 40, 10));
        assert_eq!(area.width, 40);
        assert_eq!(area.height, 10);
    }
}
