use anyhow::{Context, Result};
use ratatui::{
    Frame, Terminal,
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};
use std::collections::HashMap;

use crate::game::{Position, is_inside};
use crate::platform::{Renderer, TextLine, Tint};

/// A round display drawn in a terminal.
///
/// Each lattice cell is two columns wide so the disk looks round. Cells
/// outside the disk stay blank, like the corners of a round panel.
pub struct TerminalDisplay<B: Backend> {
    terminal: Terminal<B>,
    radius: i32,
    cells: HashMap<Position, Tint>,
    text: Vec<TextLine>,
    status: String,
}

impl<B: Backend> TerminalDisplay<B> {
    pub fn new(terminal: Terminal<B>, radius: i32) -> Self {
        Self {
            terminal,
            radius,
            cells: HashMap::new(),
            text: Vec::new(),
            status: String::new(),
        }
    }

    /// Set the line shown above the board
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    fn render(
        frame: &mut Frame,
        radius: i32,
        cells: &HashMap<Position, Tint>,
        text: &[TextLine],
        status: &str,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Board
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(Self::render_status(status), chunks[0]);

        // Text replaces the board, as on the round panel.
        if text.is_empty() {
            frame.render_widget(Self::render_board(radius, cells), chunks[1]);
        } else {
            frame.render_widget(Self::render_text(text), chunks[1]);
        }

        frame.render_widget(Self::render_controls(), chunks[2]);
    }

    fn render_board(radius: i32, cells: &HashMap<Position, Tint>) -> Paragraph<'static> {
        let mut lines = Vec::new();

        for y in -radius..=radius {
            let mut spans = Vec::new();

            for x in -radius..=radius {
                let pos = Position::new(x, y);

                let cell = if !is_inside(pos, radius) {
                    Span::raw("  ")
                } else {
                    match cells.get(&pos) {
                        Some(&tint) => Span::styled(Self::glyph(tint), Self::style(tint)),
                        None => Span::styled("· ", Style::default().fg(Color::DarkGray)),
                    }
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(Color::White))
                    .title(" Round Snake "),
            )
            .alignment(Alignment::Center)
    }

    fn render_text(text: &[TextLine]) -> Paragraph<'static> {
        let rows = text.iter().map(|line| line.row as usize + 1).max().unwrap_or(0);
        let mut lines = vec![Line::from(""); rows];

        for line in text {
            lines[line.row as usize] =
                Line::from(Span::styled(line.text.clone(), Self::style(line.tint)));
        }

        Paragraph::new(lines).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_status(status: &str) -> Paragraph<'static> {
        Paragraph::new(Line::from(Span::styled(
            status.to_string(),
            Style::default().fg(Color::Yellow),
        )))
        .alignment(Alignment::Center)
    }

    fn render_controls() -> Paragraph<'static> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" / "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" steer | "),
            Span::styled("Enter", Style::default().fg(Color::Green)),
            Span::raw(" select | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn glyph(tint: Tint) -> &'static str {
        match tint {
            Tint::SnakeHead => "■ ",
            Tint::Food => "O ",
            _ => "□ ",
        }
    }

    fn style(tint: Tint) -> Style {
        match tint {
            Tint::SnakeHead => Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            Tint::SnakeBody => Style::default().fg(Color::Blue),
            Tint::Food => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            Tint::Alert => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            Tint::Text => Style::default().fg(Color::White),
        }
    }
}

impl<B: Backend> Renderer for TerminalDisplay<B> {
    fn clear(&mut self) {
        self.cells.clear();
        self.text.clear();
    }

    fn draw_cell(&mut self, position: Position, tint: Tint) {
        self.cells.insert(position, tint);
    }

    fn clear_cell(&mut self, position: Position) {
        self.cells.remove(&position);
    }

    fn draw_text(&mut self, lines: &[TextLine]) {
        self.text.extend_from_slice(lines);
    }

    fn present(&mut self) -> Result<()> {
        let Self {
            terminal,
            radius,
            cells,
            text,
            status,
        } = self;

        terminal
            .draw(|frame| Self::render(frame, *radius, cells, text, status))
            .context("Failed to draw frame")?;
        Ok(())
    }
}
