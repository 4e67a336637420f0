//! Stateless rendering of the client screen.

use duel_tictactoe::{Cell, Grid, Mark, Position};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Everything one frame shows.
#[derive(Debug, Clone)]
pub struct View<'a> {
    /// Local participant's name.
    pub name: &'a str,
    /// Local participant's mark, once known.
    pub own_mark: Option<Mark>,
    /// Grid to draw.
    pub grid: &'a Grid,
    /// Highlighted cell; `None` when it is not our turn.
    pub cursor: Option<Position>,
    /// Turn indicator.
    pub turn: &'a str,
    /// Latest notice.
    pub status: &'a str,
}

/// Draws the whole screen.
pub fn draw(frame: &mut Frame, view: &View) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(11),   // Grid
            Constraint::Length(4), // Turn + status
            Constraint::Length(1), // Help
        ])
        .split(frame.area());

    let seat = match view.own_mark {
        Some(mark) => format!("{} ({})", view.name, mark),
        None => view.name.to_string(),
    };
    let title = Paragraph::new(format!("Duel - Tic Tac Toe  |  {}", seat))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    draw_grid(frame, chunks[1], view.grid, view.cursor);

    let lines = vec![
        Line::from(Span::styled(view.turn, Style::default().fg(Color::Green))),
        Line::from(Span::styled(view.status, Style::default().fg(Color::Yellow))),
    ];
    let status = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, chunks[2]);

    let help = Paragraph::new("arrows move · enter/space or 1-9 select · q quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[3]);
}

fn draw_grid(frame: &mut Frame, area: Rect, grid: &Grid, cursor: Option<Position>) {
    let grid_area = center_rect(area, 40, 11);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(grid_area);

    for row in 0..3 {
        draw_row(frame, rows[row * 2], grid, cursor, row);
        if row < 2 {
            let sep = Paragraph::new("─".repeat(grid_area.width as usize))
                .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(sep, rows[row * 2 + 1]);
        }
    }
}

fn draw_row(frame: &mut Frame, area: Rect, grid: &Grid, cursor: Option<Position>, row: usize) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(12),
            Constraint::Length(1),
            Constraint::Length(12),
            Constraint::Length(1),
            Constraint::Length(12),
        ])
        .split(area);

    for col in 0..3 {
        if let Some(pos) = Position::from_row_col(row, col) {
            draw_cell(frame, cols[col * 2], grid, cursor, pos);
        }
        if col < 2 {
            let sep = Paragraph::new("│").style(Style::default().fg(Color::DarkGray));
            frame.render_widget(sep, cols[col * 2 + 1]);
        }
    }
}

fn draw_cell(frame: &mut Frame, area: Rect, grid: &Grid, cursor: Option<Position>, pos: Position) {
    let keypad = format!(" {} ", pos.to_index() + 1);
    let (symbol, base_style) = match grid.get(pos) {
        Cell::Empty => (keypad, Style::default().fg(Color::DarkGray)),
        Cell::Occupied(Mark::X) => (
            " X ".to_string(),
            Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        ),
        Cell::Occupied(Mark::O) => (
            " O ".to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
    };

    let style = if cursor == Some(pos) {
        base_style.bg(Color::White).fg(Color::Black)
    } else {
        base_style
    };

    let paragraph = Paragraph::new(Line::from(Span::styled(symbol, style))).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(area.height.saturating_sub(height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(area.width.saturating_sub(width) / 2),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(vert[1])[1]
}
