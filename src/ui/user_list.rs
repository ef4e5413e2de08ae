//! User list screen rendering
//!
//! Draws the document: a title bar, the container's nodes stacked top to
//! bottom (cards, the refresh control, an error message) and a footer with
//! the loading status and key hints.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use userlist::view::{Card, Node, REFRESH_LABEL};

/// Rows taken by a card: border, name is the title, email, phone, delete hint, border
const CARD_HEIGHT: u16 = 5;

/// Rows taken by the refresh control or an error message
const CONTROL_HEIGHT: u16 = 3;

fn node_height(node: &Node) -> u16 {
    match node {
        Node::Card(_) => CARD_HEIGHT,
        Node::RefreshControl | Node::Error(_) => CONTROL_HEIGHT,
    }
}

/// Renders the main screen
pub fn render_user_list(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Container
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_container(frame, app, chunks[1]);
    render_footer(frame, app, chunks[2]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let title = Paragraph::new(app.controller.document().title().to_string())
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(title, area);
}

/// Index of the first node to draw so the selected control stays visible
fn scroll_offset(nodes: &[Node], selected_node: Option<usize>, height: u16) -> usize {
    let Some(selected) = selected_node else {
        return 0;
    };
    let mut used = 0u16;
    let mut first = selected;
    for index in (0..=selected).rev() {
        used = used.saturating_add(node_height(&nodes[index]));
        if used > height {
            break;
        }
        first = index;
    }
    first
}

/// Maps the selection (an index over controls) to an index over all nodes
fn selected_node_index(nodes: &[Node], selected_action: usize) -> Option<usize> {
    nodes
        .iter()
        .enumerate()
        .filter(|(_, node)| node.action().is_some())
        .nth(selected_action)
        .map(|(index, _)| index)
}

fn render_container(frame: &mut Frame, app: &App, area: Rect) {
    let Some(container) = app.container() else {
        return;
    };
    let nodes = container.children();
    let selected = selected_node_index(nodes, app.selected_index);
    let offset = scroll_offset(nodes, selected, area.height);

    let mut y = area.y;
    let bottom = area.y + area.height;
    for (index, node) in nodes.iter().enumerate().skip(offset) {
        let height = node_height(node);
        if y + height > bottom {
            break;
        }
        let slot = Rect::new(area.x, y, area.width, height);
        let is_selected = selected == Some(index);
        match node {
            Node::Card(card) => render_card(frame, card, is_selected, slot),
            Node::RefreshControl => render_refresh_control(frame, is_selected, slot),
            Node::Error(message) => render_error(frame, message, slot),
        }
        y += height;
    }
}

fn render_card(frame: &mut Frame, card: &Card, is_selected: bool, area: Rect) {
    let border_style = if is_selected {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    };
    let delete_style = if is_selected {
        Style::default().fg(Color::White).bg(Color::Red)
    } else {
        Style::default().fg(Color::Red)
    };
    let [name, email, phone, delete] = card.lines();

    let lines = vec![
        Line::from(email),
        Line::from(phone),
        Line::from(Span::styled(format!("[{}]", delete), delete_style)),
    ];

    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", name),
            Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        ))
        .borders(Borders::ALL)
        .border_style(border_style);

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_refresh_control(frame: &mut Frame, is_selected: bool, area: Rect) {
    let style = if is_selected {
        Style::default()
            .fg(Color::White)
            .bg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Green)
    };
    let button = Paragraph::new(Span::styled(format!("[ {} ]", REFRESH_LABEL), style))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green)),
        );
    frame.render_widget(button, area);
}

fn render_error(frame: &mut Frame, message: &str, area: Rect) {
    let error = Paragraph::new(message.to_string())
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        );
    frame.render_widget(error, area);
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = Vec::new();
    if app.controller.is_loading() {
        spans.push(Span::styled(
            "Loading users... ",
            Style::default().fg(Color::Cyan),
        ));
    }
    spans.push(Span::styled(
        "↑/↓ select  Enter activate  d delete  ? help  q quit",
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
