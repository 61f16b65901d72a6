//! UI rendering

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::app::{ActivePane, App, InputMode};
use super::surface::TuiUi;
use crate::output::{empty_state, truncate_line};

/// Main UI rendering function
pub fn draw(frame: &mut Frame, app: &App, ui: &TuiUi) {
    // Create vertical layout for status bar at the bottom
    let outer_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(frame.area());

    // Split the main area into three panes
    let pane_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(30),
            Constraint::Percentage(30),
        ])
        .split(outer_chunks[0]);

    draw_pane(frame, app, ui, ActivePane::Texts, pane_chunks[0]);
    draw_pane(frame, app, ui, ActivePane::Favorites, pane_chunks[1]);
    draw_pane(frame, app, ui, ActivePane::Important, pane_chunks[2]);

    match app.input_mode {
        InputMode::Normal => draw_status_bar(frame, ui, outer_chunks[1]),
        InputMode::Insert => draw_text_input(frame, ui, outer_chunks[1]),
        InputMode::Confirm => draw_confirm_prompt(frame, app, outer_chunks[1]),
    }

    // Draw help overlay if visible
    if app.show_help {
        draw_help_overlay(frame);
    }
}

/// Draw one collection pane
fn draw_pane(frame: &mut Frame, app: &App, ui: &TuiUi, pane: ActivePane, area: Rect) {
    let is_active = app.active_pane == pane;
    let collection = pane.collection();
    let rows = ui.rows(collection);

    // Stars are only meaningful outside the important pane
    let show_star = pane != ActivePane::Important;
    let max_len = area.width.saturating_sub(6) as usize;

    let items: Vec<ListItem> = rows
        .iter()
        .map(|row| {
            let mut spans = Vec::new();
            if show_star {
                let star = if row.important {
                    Span::styled("★ ", Style::default().fg(Color::Yellow))
                } else {
                    Span::raw("  ")
                };
                spans.push(star);
            }
            spans.push(Span::raw(truncate_line(&row.content, max_len)));

            let stamp_line = Line::from(vec![Span::styled(
                format!("  {}", row.timestamp),
                Style::default().add_modifier(Modifier::DIM),
            )]);

            ListItem::new(vec![Line::from(spans), stamp_line])
        })
        .collect();

    let border_style = if is_active {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    let title = format!(" {} ({}) ", collection.label(), rows.len());
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);

    if rows.is_empty() {
        let placeholder = Paragraph::new(Line::from(vec![Span::styled(
            empty_state(collection),
            Style::default().add_modifier(Modifier::DIM),
        )]))
        .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let highlight_style = if is_active {
        Style::default()
            .add_modifier(Modifier::BOLD)
            .add_modifier(Modifier::REVERSED)
    } else {
        Style::default().add_modifier(Modifier::REVERSED)
    };

    let list = List::new(items)
        .block(block)
        .highlight_style(highlight_style);

    let mut state = ListState::default();
    state.select(Some(app.selected(pane)));

    frame.render_stateful_widget(list, area, &mut state);
}

/// Draw the status bar at the bottom
fn draw_status_bar(frame: &mut Frame, ui: &TuiUi, area: Rect) {
    let content = if let Some(msg) = &ui.status_message {
        msg.clone()
    } else {
        "a:add  f:fav  s:star  i:important  d:del  C:clear  e:export  y:copy  ?:help  q:quit"
            .to_string()
    };

    let paragraph = Paragraph::new(content).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Draw the new-text input at the bottom
fn draw_text_input(frame: &mut Frame, ui: &TuiUi, area: Rect) {
    let prefix = "> ";

    let line = Line::from(vec![
        Span::styled(prefix, Style::default().fg(Color::Yellow)),
        Span::raw(ui.input.as_str()),
    ]);

    let paragraph = Paragraph::new(line);
    frame.render_widget(paragraph, area);

    // Position cursor
    let cursor_x = area.x + prefix.len() as u16 + ui.cursor as u16;
    frame.set_cursor_position((cursor_x, area.y));
}

/// Draw the y/n prompt for a pending destructive action
fn draw_confirm_prompt(frame: &mut Frame, app: &App, area: Rect) {
    let prompt = app
        .pending_confirmation
        .as_ref()
        .map(|request| request.prompt)
        .unwrap_or_default();

    let line = Line::from(vec![
        Span::styled(prompt, Style::default().fg(Color::Red)),
        Span::styled(" [y/N]", Style::default().add_modifier(Modifier::BOLD)),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Draw help overlay
fn draw_help_overlay(frame: &mut Frame) {
    let area = frame.area();

    // Calculate centered popup area
    let popup_width = 50.min(area.width.saturating_sub(4));
    let popup_height = 22.min(area.height.saturating_sub(4));
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    // Clear the popup area
    frame.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from("Navigation:"),
        Line::from("  j/k, ↑/↓    Move up/down"),
        Line::from("  g/G         Jump to first/last"),
        Line::from("  h/l, ←/→    Switch panes"),
        Line::from("  Tab         Cycle panes"),
        Line::from(""),
        Line::from("Commands:"),
        Line::from("  a           Record a text"),
        Line::from("  f           Add text to favorites"),
        Line::from("  s           Toggle important"),
        Line::from("  i           Mark important"),
        Line::from("  d           Delete / remove"),
        Line::from("  C           Clear pane"),
        Line::from("  e           Export texts"),
        Line::from("  y           Copy to clipboard"),
        Line::from("  q           Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().add_modifier(Modifier::BOLD));

    let paragraph = Paragraph::new(help_text).block(block);
    frame.render_widget(paragraph, popup_area);
}
