//! Dropdown rendering: input bar, cancel control and the results surface.

use crate::app::App;
use crate::colors;
use dropsearch_core::dropdown::{CancelView, SurfaceView};
use dropsearch_core::overlay::Phase;
use dropsearch_core::render::Row;
use dropsearch_tui::geometry::{INPUT_BAR_ROWS, cells, cursor_column};
use dropsearch_tui::row::ResultRow;
use dropsearch_tui::widgets::{blend, contrast_fg, parse_hex_color};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};
use std::time::Instant;

fn color_or(hex: Option<&str>, fallback: Color) -> Color {
    hex.and_then(parse_hex_color).unwrap_or(fallback)
}

/// Render the whole widget at `now` and remember where the controls landed.
#[allow(clippy::cast_possible_truncation)]
pub fn render_dropdown(f: &mut Frame, app: &mut App, now: Instant) {
    let view = app.dropdown.view(now);
    let options = app.dropdown.options();

    let bg = color_or(options.container_style.bg.as_deref(), colors::BG);
    f.render_widget(Block::default().style(Style::default().bg(bg)), f.area());

    let area = f.area();
    let bar = Rect {
        height: INPUT_BAR_ROWS.min(area.height),
        ..area
    };

    let cancel_cols = cells(view.cancel.extent).min(bar.width / 2);
    let side_cols = view
        .side_component
        .map_or(0, |row| (row.plain_text().chars().count() as u16 + 2).min(bar.width / 2));
    let right_cols = cancel_cols.max(side_cols);

    let bar_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(right_cols)])
        .split(bar);
    let input_area = bar_chunks[0];
    let right_area = bar_chunks[1];

    let input_style = &options.input_style;
    let input_bg = color_or(input_style.bg.as_deref(), colors::SURFACE_HIGH);
    let input_fg = color_or(input_style.fg.as_deref(), colors::ON_SURFACE);
    let border = color_or(
        input_style.border.as_deref(),
        if view.focused {
            colors::PRIMARY
        } else {
            colors::OUTLINE
        },
    );

    let input_text = if view.text.is_empty() {
        Span::styled(view.placeholder, Style::default().fg(colors::OUTLINE))
    } else {
        Span::styled(view.text, Style::default().fg(input_fg))
    };
    let input = Paragraph::new(input_text).block(
        Block::default()
            .borders(Borders::ALL)
            .style(Style::default().bg(input_bg))
            .border_style(Style::default().fg(border)),
    );
    f.render_widget(input, input_area);

    if view.focused {
        let max_x = input_area.right().saturating_sub(2);
        let column = cursor_column(view.text, view.cursor);
        f.set_cursor_position((
            input_area.x.saturating_add(column).saturating_add(1).min(max_x),
            input_area.y + 1,
        ));
    }

    let cancel_area = if cancel_cols > 0 {
        render_cancel(f, view.cancel, bg, right_area);
        right_area
    } else {
        if let Some(row) = view.side_component {
            let side = Paragraph::new(row.plain_text())
                .alignment(Alignment::Center)
                .style(Style::default().fg(colors::SUBTEXT))
                .block(Block::default().borders(Borders::ALL).border_style(
                    Style::default().fg(colors::OUTLINE),
                ));
            f.render_widget(side, right_area);
        }
        Rect::default()
    };

    if let Some(surface) = &view.surface {
        let below = Rect {
            y: bar.bottom(),
            height: area.height.saturating_sub(bar.height),
            ..area
        };
        let surface_area = Rect {
            height: cells(surface.extent).min(below.height),
            ..below
        };
        render_surface(f, surface, view.phase, surface_area, &mut app.list_state);
    }

    app.input_area = input_area;
    app.cancel_area = cancel_area;
}

/// The cancel label fades in over the bar background as its opacity rises.
fn render_cancel(f: &mut Frame, cancel: CancelView<'_>, bg: Color, area: Rect) {
    let accent = parse_hex_color(cancel.color).unwrap_or(colors::ERROR);
    let fg = blend(bg, accent, cancel.opacity);

    let label = Paragraph::new(Line::from(Span::styled(
        cancel.label,
        Style::default().fg(fg).add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(blend(bg, colors::OUTLINE, cancel.opacity))),
    );
    f.render_widget(label, area);
}

fn render_surface(
    f: &mut Frame,
    surface: &SurfaceView<'_, ResultRow>,
    phase: Phase,
    area: Rect,
    list_state: &mut ratatui::widgets::ListState,
) {
    if area.height == 0 {
        return;
    }

    let bg = parse_hex_color(surface.background).unwrap_or(colors::BG);
    let fg = contrast_fg(bg);
    let muted = blend(bg, fg, 0.55);

    f.render_widget(Block::default().style(Style::default().bg(bg)), area);

    let footer_rows = surface.footer_extent.map_or(0, cells);
    let help_rows = u16::from(area.height > footer_rows + 2);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(footer_rows),
            Constraint::Length(help_rows),
        ])
        .split(area);

    let items: Vec<ListItem> = surface
        .results
        .rows()
        .map(|row| build_row_item(row, fg, muted))
        .collect();

    let list = List::new(items)
        .style(Style::default().bg(bg).fg(fg))
        .highlight_style(Style::default().bg(blend(bg, fg, 0.15)));
    f.render_stateful_widget(list, chunks[0], list_state);

    if help_rows > 0 {
        let status = match phase {
            Phase::Opening => "opening",
            Phase::Closing => "closing",
            Phase::Open | Phase::Closed => "",
        };
        let help = Line::from(vec![
            Span::styled(" ↑↓", Style::default().fg(fg).add_modifier(Modifier::BOLD)),
            Span::styled(" select  ", Style::default().fg(muted)),
            Span::styled("Enter", Style::default().fg(fg).add_modifier(Modifier::BOLD)),
            Span::styled(" choose  ", Style::default().fg(muted)),
            Span::styled("Esc", Style::default().fg(fg).add_modifier(Modifier::BOLD)),
            Span::styled(" cancel  ", Style::default().fg(muted)),
            Span::styled(status, Style::default().fg(muted)),
        ]);
        f.render_widget(Paragraph::new(help), chunks[2]);
    }
}

fn build_row_item(row: &Row<ResultRow>, fg: Color, muted: Color) -> ListItem<'_> {
    let line = match &row.element {
        ResultRow::Title(text) => Line::from(Span::styled(
            format!(" {text}"),
            Style::default()
                .fg(fg)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )),
        ResultRow::NoResults(text) => Line::from(Span::styled(
            format!(" {text}"),
            Style::default().fg(muted).add_modifier(Modifier::ITALIC),
        )),
        ResultRow::Hit {
            primary, secondary, ..
        } => {
            let mut spans = vec![Span::styled(format!("   {primary}"), Style::default().fg(fg))];
            if let Some(secondary) = secondary {
                spans.push(Span::styled(
                    format!("  {secondary}"),
                    Style::default().fg(muted),
                ));
            }
            Line::from(spans)
        }
        ResultRow::Label(text) => Line::from(Span::styled(format!(" {text}"), Style::default().fg(fg))),
    };
    ListItem::new(line)
}
