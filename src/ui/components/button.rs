//! Toolbar button component

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Button height in rows (top border + content + bottom border)
pub const BUTTON_HEIGHT: u16 = 3;

/// Render a bordered button showing its shortcut and label
pub fn render_toolbar_button(
    frame: &mut Frame,
    area: Rect,
    key: &str,
    label: &str,
    accent: Color,
) {
    let text_style = Style::default().fg(accent).add_modifier(Modifier::BOLD);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent));
    let paragraph = Paragraph::new(format!(" {key} {label} "))
        .style(text_style)
        .block(block);
    frame.render_widget(paragraph, area);
}
