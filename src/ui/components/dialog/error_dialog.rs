//! Finish-editing error alert

use super::base::{render_dialog, DialogConfig};
use crate::state::FinishEditingErrorAlert;
use ratatui::{
    style::{Color, Modifier, Style},
    text::Span,
    Frame,
};

/// Render the submission error alert centered on the screen
pub fn render_finish_editing_error_dialog(frame: &mut Frame, alert: &FinishEditingErrorAlert) {
    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let hint = vec![
        Span::raw("Press "),
        Span::styled("Enter", key_style),
        Span::raw(" or "),
        Span::styled("Esc", key_style),
        Span::raw(" to dismiss"),
    ];

    render_dialog(
        frame,
        DialogConfig {
            title: alert.title,
            title_color: Color::Red,
            border_color: Color::Red,
            message: &alert.message,
            hint: Some(hint),
            max_width: 60,
        },
    );
}
