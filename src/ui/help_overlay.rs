//! Key binding overlay
//!
//! The table is built from `KEY_BINDINGS`, the same list `App::handle_key`
//! dispatches on.

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Cell, Clear, Row, Table},
    Frame,
};

use crate::app::{Command, KEY_BINDINGS};

const OVERLAY_WIDTH: u16 = 44;
const KEY_COLUMN_WIDTH: u16 = 10;

/// Short label for a key as shown in the table
fn key_label(code: &KeyCode) -> String {
    match code {
        KeyCode::Up => "↑".to_string(),
        KeyCode::Down => "↓".to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Delete => "Del".to_string(),
        KeyCode::Char(c) => c.to_string(),
        other => format!("{:?}", other),
    }
}

fn binding_row(command: Command, codes: &[KeyCode]) -> Row<'static> {
    let keys = codes.iter().map(key_label).collect::<Vec<_>>().join("/");
    Row::new(vec![
        Cell::from(keys).style(Style::default().fg(Color::Yellow)),
        Cell::from(command.description()),
    ])
}

/// Centres a `width` x `height` box in `area`, shrinking it to fit
fn overlay_area(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// Draws the key table over the current screen
pub fn render(frame: &mut Frame) {
    // One row per binding plus the two borders
    let height = KEY_BINDINGS.len() as u16 + 2;
    let area = overlay_area(frame.area(), OVERLAY_WIDTH, height);

    let rows = KEY_BINDINGS
        .iter()
        .map(|(command, codes)| binding_row(*command, codes));
    let table = Table::new(
        rows,
        [Constraint::Length(KEY_COLUMN_WIDTH), Constraint::Min(0)],
    )
    .block(
        Block::default()
            .title(Line::styled(
                " Keys ",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ))
            .title_bottom(Line::styled(
                " Esc or ? closes ",
                Style::default().fg(Color::DarkGray),
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    frame.render_widget(Clear, area);
    frame.render_widget(table, area);
}
