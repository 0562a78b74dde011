//! UI module for rendering the form container

mod associations;
mod components;
mod form_page;
mod format;
pub mod forms;
mod layout;

pub use format::{ValueFormatter, PLACEHOLDER};

use crate::container::FormContainer;
use crate::state::{NavigationPage, VisiblePage};
use ratatui::{
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

/// Main draw function
pub fn draw(frame: &mut Frame, container: &FormContainer) {
    let area = frame.area();
    let show_toolbar = container.are_editing_buttons_visible();
    let areas = layout::create_layout(area, show_toolbar);

    layout::draw_header(frame, areas.header, container);

    let nav = container.navigation();
    let formatter = container.formatter();
    let visibility = container.validation_visibility();
    match nav.visible() {
        None => {
            let empty = Paragraph::new("No form is bound")
                .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(empty, areas.body);
        }
        Some(VisiblePage::Root(view)) | Some(VisiblePage::Page(NavigationPage::SubForm(view))) => {
            form_page::draw_form_page(frame, areas.body, view, formatter, visibility)
        }
        Some(VisiblePage::Page(NavigationPage::AssociationFilterResult { result, view_model })) => {
            associations::draw_filter_page(frame, areas.body, result, view_model)
        }
        Some(VisiblePage::Page(NavigationPage::AssociationGroupResult { result, view_model })) => {
            associations::draw_group_page(frame, areas.body, result, view_model)
        }
    }

    if let Some(toolbar) = areas.toolbar {
        layout::draw_toolbar(frame, toolbar);
    }
    layout::draw_status_bar(frame, areas.status, container);

    // Overlays, submission error on top
    let alerts = container.alerts();
    if let Some(alert) = alerts.unsaved_edits_alert(nav) {
        components::render_unsaved_edits_dialog(frame, &alert);
    }
    if let Some(alert) = alerts.finish_editing_error_alert() {
        components::render_finish_editing_error_dialog(frame, &alert);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::FormBinding;
    use crate::engine::tests::sample_dataset;
    use crate::engine::{FeatureForm, FieldId, FieldInput, SubmitError};
    use crate::state::FormViewOptions;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    fn screen(container: &FormContainer) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|f| draw(f, container)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_draws_root_form() {
        let dataset = sample_dataset();
        let form: Arc<dyn FeatureForm> = dataset.first().unwrap();
        let container = FormContainer::new(FormBinding::new(Some(form)), FormViewOptions::default());

        let content = screen(&container);
        assert!(content.contains("Hydrant 1042"));
        assert!(content.contains("Esc:close"));
        assert!(!content.contains("^S Save"));
    }

    #[test]
    fn test_toolbar_appears_with_edits() {
        let dataset = sample_dataset();
        let form: Arc<dyn FeatureForm> = dataset.first().unwrap();
        form.set_value(&FieldId::new("name"), FieldInput::Text("Elm St".to_string()));
        let container = FormContainer::new(FormBinding::new(Some(form)), FormViewOptions::default());

        let content = screen(&container);
        assert!(content.contains("^S Save"));
        assert!(content.contains("^D Discard"));
    }

    #[test]
    fn test_empty_binding() {
        let container = FormContainer::new(FormBinding::default(), FormViewOptions::default());
        let content = screen(&container);
        assert!(content.contains("No form is bound"));
        assert!(!content.contains("Esc:close"));
    }

    #[tokio::test]
    async fn test_alert_overlays() {
        let dataset = sample_dataset();
        let hydrant = dataset.first().unwrap();
        hydrant.set_value(&FieldId::new("name"), FieldInput::Text("Elm St".to_string()));
        hydrant.fail_next_submit(SubmitError::Store("offline".to_string()));
        let form: Arc<dyn FeatureForm> = hydrant;
        let mut container =
            FormContainer::new(FormBinding::new(Some(form)), FormViewOptions::default());

        container
            .handle_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE))
            .await;
        assert!(screen(&container).contains("Discard Edits?"));

        // Save Edits
        for code in [KeyCode::Down, KeyCode::Enter] {
            container
                .handle_key(KeyEvent::new(code, KeyModifiers::NONE))
                .await;
        }
        let content = screen(&container);
        assert!(content.contains("The form wasn't submitted"));
    }
}
