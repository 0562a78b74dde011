//! Layout components (header, toolbar, status bar)

use super::components::{render_toolbar_button, BUTTON_HEIGHT};
use crate::container::FormContainer;
use crate::state::{NavigationPage, VisiblePage};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Areas of the container screen
pub struct ContainerLayout {
    pub header: Rect,
    pub body: Rect,
    pub toolbar: Option<Rect>,
    pub status: Rect,
}

/// Split the screen, reserving toolbar rows only when it is shown
pub fn create_layout(area: Rect, show_toolbar: bool) -> ContainerLayout {
    let toolbar_height = if show_toolbar { BUTTON_HEIGHT } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),              // Header
            Constraint::Min(0),                 // Page
            Constraint::Length(toolbar_height), // Editing toolbar
            Constraint::Length(1),              // Status bar
        ])
        .split(area);

    ContainerLayout {
        header: chunks[0],
        body: chunks[1],
        toolbar: show_toolbar.then_some(chunks[2]),
        status: chunks[3],
    }
}

/// Breadcrumb of the navigation stack, with the close hint on the right
pub fn draw_header(frame: &mut Frame, area: Rect, container: &FormContainer) {
    let nav = container.navigation();
    let mut titles: Vec<String> = nav.root().map(|r| r.form().title()).into_iter().collect();
    titles.extend(nav.pages().iter().map(NavigationPage::title));

    let mut spans = Vec::new();
    let last = titles.len().saturating_sub(1);
    for (i, title) in titles.into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" › ", Style::default().fg(Color::DarkGray)));
        }
        let style = if i == last {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(title, style));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);

    if container.is_close_button_visible() && nav.depth() == 0 {
        let close_hint = " Esc:close ";
        let close_area = Rect {
            x: area.x + area.width.saturating_sub(close_hint.len() as u16),
            y: area.y,
            width: (close_hint.len() as u16).min(area.width),
            height: 1,
        };
        let close = Paragraph::new(close_hint).style(Style::default().fg(Color::Red));
        frame.render_widget(close, close_area);
    }
}

/// Save and Discard buttons of the editing toolbar
pub fn draw_toolbar(frame: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(14),
            Constraint::Length(17),
            Constraint::Min(0),
        ])
        .split(area);

    render_toolbar_button(frame, chunks[0], "^S", "Save", Color::Green);
    render_toolbar_button(frame, chunks[1], "^D", "Discard", Color::Red);
}

/// Status bar with key hints and the latest status message
pub fn draw_status_bar(frame: &mut Frame, area: Rect, container: &FormContainer) {
    let mut spans = vec![Span::styled(
        format!(" {} ", view_hints(container)),
        Style::default().fg(Color::Gray),
    )];

    if let Some(message) = container.status_message() {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(message, Style::default().fg(Color::Green)));
    }

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, area);

    let quit_hint = " ^C:quit ";
    let quit_area = Rect {
        x: area.x + area.width.saturating_sub(quit_hint.len() as u16),
        y: area.y,
        width: (quit_hint.len() as u16).min(area.width),
        height: 1,
    };
    let quit_widget =
        Paragraph::new(quit_hint).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, quit_area);
}

/// Keyboard hints for whatever is on screen
fn view_hints(container: &FormContainer) -> &'static str {
    let nav = container.navigation();
    match nav.visible() {
        None => "No form",
        Some(VisiblePage::Page(page)) if page.is_association_result() => {
            "↑↓:select  Enter:open  Esc:back"
        }
        Some(VisiblePage::Root(view)) | Some(VisiblePage::Page(NavigationPage::SubForm(view)))
            if view.is_editing() =>
        {
            "type to edit  Enter/Tab:commit  Esc:cancel"
        }
        Some(_) => "↑↓:field  Enter:edit/open  ←→:change  +/-:hour  Del:clear  Esc:back",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_layout_without_toolbar() {
        let layout = create_layout(Rect::new(0, 0, 80, 24), false);
        assert!(layout.toolbar.is_none());
        assert_eq!(layout.header.height, 1);
        assert_eq!(layout.body.height, 22);
        assert_eq!(layout.status.y, 23);
    }

    #[test]
    fn test_layout_with_toolbar() {
        let layout = create_layout(Rect::new(0, 0, 80, 24), true);
        assert_eq!(layout.toolbar.map(|t| t.height), Some(BUTTON_HEIGHT));
        assert_eq!(layout.body.height, 19);
    }
}
