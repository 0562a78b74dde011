//! Association filter and group pages

use crate::engine::{AssociationFilterResult, AssociationGroupResult};
use crate::state::AssociationsViewModel;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Draw the groups of an association filter with their record counts
pub fn draw_filter_page(
    frame: &mut Frame,
    area: Rect,
    result: &AssociationFilterResult,
    view_model: &AssociationsViewModel,
) {
    let block = page_block(&result.name);
    if result.groups.is_empty() {
        draw_empty(frame, area, block, "No associations");
        return;
    }

    let items: Vec<ListItem> = result
        .groups
        .iter()
        .map(|group| {
            ListItem::new(Line::from(vec![
                Span::raw(group.name.clone()),
                Span::styled(
                    format!("  ({})", group.associations.len()),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();
    draw_list(frame, area, block, items, view_model.selected());
}

/// Draw the related records of an association group
pub fn draw_group_page(
    frame: &mut Frame,
    area: Rect,
    result: &AssociationGroupResult,
    view_model: &AssociationsViewModel,
) {
    let block = page_block(&result.name);
    if result.associations.is_empty() {
        draw_empty(frame, area, block, "No related records");
        return;
    }

    let items: Vec<ListItem> = result
        .associations
        .iter()
        .map(|association| {
            ListItem::new(Line::from(vec![
                Span::raw(association.title.clone()),
                Span::styled(
                    format!("  {}", association.form.global_id()),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();
    draw_list(frame, area, block, items, view_model.selected());
}

fn page_block(title: &str) -> Block<'static> {
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
}

fn draw_empty(frame: &mut Frame, area: Rect, block: Block, text: &str) {
    let paragraph = Paragraph::new(text.to_string())
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

/// Render a list that keeps the selected row scrolled into view
fn draw_list(frame: &mut Frame, area: Rect, block: Block, items: Vec<ListItem>, selected: usize) {
    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");
    let mut state = ListState::default().with_selected(Some(selected));
    frame.render_stateful_widget(list, area, &mut state);
}
