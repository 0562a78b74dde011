//! Unsaved-edits alert

use crate::state::UnsavedEditsAlert;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Render the unsaved-edits alert with its action list
pub fn render_unsaved_edits_dialog(frame: &mut Frame, alert: &UnsavedEditsAlert) {
    let area = frame.area();

    let dialog_width = 54u16.min(area.width);
    let text_rows = message_rows(&alert.message, dialog_width.saturating_sub(4));
    // title + blank + message + blank + actions + blank + hint + borders
    let dialog_height = (text_rows + alert.actions.len() as u16 + 7).min(area.height);

    let dialog_area = Rect {
        x: area.x + (area.width.saturating_sub(dialog_width)) / 2,
        y: area.y + (area.height.saturating_sub(dialog_height)) / 2,
        width: dialog_width,
        height: dialog_height,
    };

    frame.render_widget(Clear, dialog_area);

    let mut content = vec![
        Line::from(Span::styled(
            alert.title,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            alert.message.clone(),
            Style::default().fg(Color::White),
        )),
        Line::from(""),
    ];

    for (i, action) in alert.actions.iter().enumerate() {
        let is_selected = i == alert.selected;
        let prefix = if is_selected { "▸ " } else { "  " };
        let base_color = if action.is_destructive() {
            Color::Red
        } else if action.is_cancel() {
            Color::White
        } else {
            Color::Green
        };
        let style = if is_selected {
            Style::default().fg(base_color).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        content.push(Line::from(Span::styled(
            format!("{prefix}{}", action.label()),
            style,
        )));
    }

    content.push(Line::from(""));
    content.push(Line::from(vec![
        Span::styled("↑↓", Style::default().fg(Color::Cyan)),
        Span::styled(" select  ", Style::default().fg(Color::DarkGray)),
        Span::styled("Enter", Style::default().fg(Color::Cyan)),
        Span::styled(" confirm  ", Style::default().fg(Color::DarkGray)),
        Span::styled("Esc", Style::default().fg(Color::Cyan)),
        Span::styled(" keep editing", Style::default().fg(Color::DarkGray)),
    ]));

    let dialog = Paragraph::new(content)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .style(Style::default().bg(Color::Black)),
        )
        .style(Style::new().bg(Color::Black).fg(Color::White));

    frame.render_widget(dialog, dialog_area);
}

/// Rows the message wraps to inside `inner_width` columns
fn message_rows(message: &str, inner_width: u16) -> u16 {
    (message.chars().count() as u16).div_ceil(inner_width.max(1))
}
