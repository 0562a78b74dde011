//! Form page: stacked fields followed by association filter rows

use super::forms::draw_field;
use super::ValueFormatter;
use crate::state::{FormViewModel, ValidationErrorVisibility};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Draw a form page, scrolled so the focused row stays visible
pub fn draw_form_page(
    frame: &mut Frame,
    area: Rect,
    view: &FormViewModel,
    formatter: &ValueFormatter,
    visibility: ValidationErrorVisibility,
) {
    let errors = view.form().validation_errors();
    let focused = view.focused_index();

    // Fields first, then one row per filter
    let mut rows: Vec<u16> = view
        .fields()
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let error = FormViewModel::visible_error(field, &errors, visibility);
            field.height(formatter, area.width, i == focused, error.is_some())
        })
        .collect();
    rows.extend(view.filters().iter().map(|_| 1));

    if rows.is_empty() {
        let empty = Paragraph::new("This form has no fields")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    }

    let first = first_visible_row(&rows, focused, area.height);
    let mut y = area.y;
    let bottom = area.y + area.height;

    for (i, &height) in rows.iter().enumerate().skip(first) {
        if y >= bottom {
            break;
        }
        let row_area = Rect {
            x: area.x,
            y,
            width: area.width,
            height: height.min(bottom - y),
        };
        match view.fields().get(i) {
            Some(field) => {
                let error = FormViewModel::visible_error(field, &errors, visibility);
                draw_field(frame, row_area, field, formatter, i == focused, error);
            }
            None => {
                if let Some(filter) = view.filters().get(i - view.fields().len()) {
                    let is_focused = i == focused;
                    let style = if is_focused {
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(Color::White)
                    };
                    let line = Line::from(vec![
                        Span::styled(if is_focused { "▸ " } else { "  " }, style),
                        Span::styled(filter.name.clone(), style),
                        Span::styled(
                            format!("  ({})", filter.association_count()),
                            Style::default().fg(Color::DarkGray),
                        ),
                    ]);
                    frame.render_widget(Paragraph::new(line), row_area);
                }
            }
        }
        y += height;
    }
}

/// First row to draw so the focused row ends inside `available` rows
fn first_visible_row(heights: &[u16], focused: usize, available: u16) -> usize {
    let focused = focused.min(heights.len().saturating_sub(1));
    let mut first = 0;
    let mut used: u32 = heights[..=focused].iter().map(|&h| u32::from(h)).sum();
    while used > u32::from(available) && first < focused {
        used -= u32::from(heights[first]);
        first += 1;
    }
    first
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tests::sample_dataset;
    use crate::engine::{FeatureForm, FieldId, FieldInput};
    use pretty_assertions::assert_eq;
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    #[test]
    fn test_first_visible_row() {
        assert_eq!(first_visible_row(&[3, 3, 3, 1], 0, 5), 0);
        assert_eq!(first_visible_row(&[3, 3, 3, 1], 2, 6), 1);
        assert_eq!(first_visible_row(&[3, 3, 3, 1], 3, 4), 2);
        assert_eq!(first_visible_row(&[10], 0, 4), 0);
    }

    fn render(view: &FormViewModel, visibility: ValidationErrorVisibility) -> String {
        let formatter = ValueFormatter::default();
        let mut terminal = Terminal::new(TestBackend::new(50, 30)).unwrap();
        terminal
            .draw(|f| draw_form_page(f, f.area(), view, &formatter, visibility))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_draws_fields_and_filters() {
        let dataset = sample_dataset();
        let form: Arc<dyn FeatureForm> = dataset.first().unwrap();
        let view = FormViewModel::new(form);

        let content = render(&view, ValidationErrorVisibility::Automatic);
        assert!(content.contains("Main St"));
        assert!(content.contains("HY-1042"));
        assert!(content.contains("Connectivity"));
    }

    #[test]
    fn test_errors_follow_visibility() {
        let dataset = sample_dataset();
        let form: Arc<dyn FeatureForm> = dataset.first().unwrap();
        form.set_value(&FieldId::new("name"), FieldInput::Text(String::new()));
        let mut view = FormViewModel::new(form);
        view.refresh();

        let hidden = render(&view, ValidationErrorVisibility::Automatic);
        assert!(!hidden.contains("Name is required"));
        let shown = render(&view, ValidationErrorVisibility::Visible);
        assert!(shown.contains("Name is required"));
    }
}
