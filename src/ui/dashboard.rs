//! Dashboard screen rendering
//!
//! Draws the header with the theme toggle, the optional sidebar, and the
//! weather and headline panels from the regions on the board.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, NavItem};
use crate::render::{Freshness, Node, Region};
use crate::sources::{NEWS_WIDGET_ID, WEATHER_WIDGET_ID};
use crate::theme::Palette;
use crate::widget::CycleOutcome;

const SIDEBAR_WIDTH: u16 = 18;

/// Renders the dashboard screen
pub fn render(frame: &mut Frame, app: &App) {
    let palette = app.theme.palette();
    let area = frame.area();

    frame.render_widget(
        Block::default().style(Style::default().bg(palette.background).fg(palette.foreground)),
        area,
    );

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Length(1), // Ticker
            Constraint::Min(3),    // Body
            Constraint::Length(1), // Footer
        ])
        .split(area);

    render_header(frame, rows[0], app, &palette);

    let news = app.board.region(NEWS_WIDGET_ID);
    super::ticker::render(frame, rows[1], news.as_ref(), app.ticker_offset, &palette);

    let body = if app.sidebar_open {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(10)])
            .split(rows[2]);
        render_sidebar(frame, columns[0], app, &palette);
        columns[1]
    } else {
        rows[2]
    };

    let weather = app.board.region(WEATHER_WIDGET_ID);
    match app.active_nav() {
        NavItem::Dashboard => {
            let panels = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
                .split(body);
            render_panel(frame, panels[0], " Weather ", app, WEATHER_WIDGET_ID, weather.as_ref(), &palette);
            render_panel(frame, panels[1], " Headlines ", app, NEWS_WIDGET_ID, news.as_ref(), &palette);
        }
        NavItem::Weather => {
            render_panel(frame, body, " Weather ", app, WEATHER_WIDGET_ID, weather.as_ref(), &palette);
        }
        NavItem::News => {
            render_panel(frame, body, " Headlines ", app, NEWS_WIDGET_ID, news.as_ref(), &palette);
        }
    }

    render_footer(frame, rows[3], &palette);
}

fn render_header(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let line = Line::from(vec![
        Span::styled(
            " widgetdash ",
            Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("[t] {}", app.theme.toggle_icon()),
            Style::default().fg(palette.muted),
        ),
        Span::raw("  "),
        Span::styled(
            format!("[m] {}", if app.sidebar_open { "hide menu" } else { "menu" }),
            Style::default().fg(palette.muted),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_sidebar(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let lines: Vec<Line> = NavItem::ALL
        .iter()
        .enumerate()
        .map(|(i, item)| {
            if i == app.nav_index {
                Line::from(Span::styled(
                    format!("> {}", item.label()),
                    Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(Span::styled(
                    format!("  {}", item.label()),
                    Style::default().fg(palette.foreground),
                ))
            }
        })
        .collect();

    let block = Block::default()
        .borders(Borders::RIGHT)
        .border_style(Style::default().fg(palette.muted));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_panel(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    app: &App,
    widget_id: &str,
    region: Option<&Region>,
    palette: &Palette,
) {
    let mut lines = match region {
        Some(region) => region_lines(region, palette),
        None => vec![Line::from(Span::styled(
            "Not available right now",
            Style::default().fg(palette.muted),
        ))],
    };

    if let Some(last) = app.last_refresh.get(widget_id) {
        let status = match last.outcome {
            CycleOutcome::Fresh => "updated",
            CycleOutcome::Stale => "update failed",
            CycleOutcome::Unavailable => "unavailable",
        };
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("{} {}", status, last.at.format("%H:%M")),
            Style::default().fg(palette.muted),
        )));
    }

    let block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.accent));
    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

/// Builds the styled lines of a region, including the stale marker
pub fn region_lines(region: &Region, palette: &Palette) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    if region.freshness == Freshness::Stale {
        lines.push(Line::from(Span::styled(
            Region::STALE_MARKER,
            Style::default().fg(palette.warning).add_modifier(Modifier::BOLD),
        )));
    }

    let text_style = match region.freshness {
        Freshness::Loading | Freshness::Unavailable => Style::default().fg(palette.muted),
        Freshness::Fresh | Freshness::Stale => Style::default().fg(palette.foreground),
    };

    for node in &region.fragment.nodes {
        let line = match node {
            Node::Text(text) => Line::from(Span::styled(text.clone(), text_style)),
            Node::Icon(glyph) => Line::from(Span::styled(glyph.clone(), Style::default().fg(palette.accent))),
            Node::Link { title, href } => Line::from(vec![
                Span::styled(
                    title.clone(),
                    Style::default().fg(palette.link).add_modifier(Modifier::UNDERLINED),
                ),
                Span::styled(format!(" {}", href), Style::default().fg(palette.muted)),
            ]),
        };
        lines.push(line);
    }

    lines
}

fn render_footer(frame: &mut Frame, area: Rect, palette: &Palette) {
    let help = Paragraph::new(Line::from(Span::styled(
        "q: quit | r: refresh | t: theme | m: menu | ?: help",
        Style::default().fg(palette.muted),
    )));
    frame.render_widget(help, area);
}
