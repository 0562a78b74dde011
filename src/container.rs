//! Form container: the composition root of the widget set

use crate::engine::{FeatureForm, FieldInput, RecordId};
use crate::state::{
    AssociationsViewModel, EditConfirmationController, EditingEvent, FormViewModel,
    FormViewOptions, NavigationOrchestrator, NavigationPage, ValidationErrorVisibility,
};
use crate::ui::forms::FieldRenderer;
use crate::ui::ValueFormatter;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use tracing::{debug, info};

/// Two-way binding to the form being edited, shared with the host.
///
/// The container clears it when the user closes the form; the host may
/// replace it at any time to present another record.
#[derive(Clone, Default)]
pub struct FormBinding(Rc<RefCell<Option<Arc<dyn FeatureForm>>>>);

impl FormBinding {
    pub fn new(form: Option<Arc<dyn FeatureForm>>) -> Self {
        Self(Rc::new(RefCell::new(form)))
    }

    pub fn get(&self) -> Option<Arc<dyn FeatureForm>> {
        self.0.borrow().clone()
    }

    pub fn set(&self, form: Option<Arc<dyn FeatureForm>>) {
        *self.0.borrow_mut() = form;
    }

    pub fn is_some(&self) -> bool {
        self.0.borrow().is_some()
    }
}

impl std::fmt::Debug for FormBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("FormBinding")
            .field(&self.0.borrow().as_ref().map(|form| form.global_id()))
            .finish()
    }
}

/// Top-level form view: navigation, confirmation alerts and field
/// renderers composed behind one keyboard-driven surface.
#[derive(Debug)]
pub struct FormContainer {
    binding: FormBinding,
    bound_id: Option<RecordId>,
    options: FormViewOptions,
    formatter: ValueFormatter,
    navigation: NavigationOrchestrator,
    alerts: EditConfirmationController,
    status_message: Option<String>,
}

impl FormContainer {
    pub fn new(binding: FormBinding, options: FormViewOptions) -> Self {
        let mut container = Self {
            binding,
            bound_id: None,
            formatter: options.formatter(),
            navigation: NavigationOrchestrator::new(options.navigation_disabled),
            alerts: EditConfirmationController::new(options.on_editing_event.clone()),
            options,
            status_message: None,
        };
        container.refresh();
        container
    }

    pub fn binding(&self) -> &FormBinding {
        &self.binding
    }

    pub fn options(&self) -> &FormViewOptions {
        &self.options
    }

    pub fn formatter(&self) -> &ValueFormatter {
        &self.formatter
    }

    pub fn navigation(&self) -> &NavigationOrchestrator {
        &self.navigation
    }

    pub fn alerts(&self) -> &EditConfirmationController {
        &self.alerts
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    /// Validation visibility after applying the developer override
    pub fn validation_visibility(&self) -> ValidationErrorVisibility {
        match self.options.validation_errors {
            ValidationErrorVisibility::Visible => ValidationErrorVisibility::Visible,
            ValidationErrorVisibility::Automatic => self.navigation.validation_visibility(),
        }
    }

    pub fn is_close_button_visible(&self) -> bool {
        self.binding.is_some() && self.options.close_button.resolve(true)
    }

    pub fn are_editing_buttons_visible(&self) -> bool {
        let has_edits = self
            .navigation
            .presented_form()
            .is_some_and(|f| f.has_edits());
        self.options.editing_buttons.resolve(has_edits)
    }

    /// Pick up binding changes and re-pull fields that published changes.
    ///
    /// Call before every draw.
    pub fn refresh(&mut self) {
        let bound = self.binding.get();
        let bound_id = bound.as_ref().map(|f| f.global_id());
        if bound_id != self.bound_id {
            debug!(?bound_id, "Form binding changed");
            self.bound_id = bound_id;
            self.alerts.reset();
            self.navigation.set_root(bound);
        }
        if let Some(view) = self.navigation.visible_form_view_mut() {
            view.refresh();
        }
    }

    /// Handle a key press
    pub async fn handle_key(&mut self, key: KeyEvent) {
        // Submission error is modal and sits above the unsaved-edits alert
        if self.alerts.is_finish_editing_error_shown() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.alerts.dismiss_finish_editing_error();
            }
            return;
        }

        if self.alerts.is_unsaved_edits_alert_shown() {
            self.handle_alert_key(key).await;
            self.refresh();
            return;
        }

        self.status_message = None;

        let editing = self
            .navigation
            .visible_form_view_mut()
            .is_some_and(|v| v.is_editing());
        if editing {
            self.handle_text_edit_key(key);
            self.refresh();
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('s') if self.are_editing_buttons_visible() => {
                    self.save_from_toolbar().await
                }
                KeyCode::Char('d') if self.are_editing_buttons_visible() => {
                    self.discard_from_toolbar()
                }
                _ => {}
            }
            self.refresh();
            return;
        }

        let on_association_page = self
            .navigation
            .pages()
            .last()
            .is_some_and(NavigationPage::is_association_result);
        match key.code {
            KeyCode::Esc => self.navigate_back(),
            _ if on_association_page => self.handle_association_key(key),
            _ => self.handle_form_key(key),
        }
        self.refresh();
    }

    async fn handle_alert_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Left | KeyCode::BackTab => {
                self.alerts.select_prev(&self.navigation)
            }
            KeyCode::Down | KeyCode::Right | KeyCode::Tab => {
                self.alerts.select_next(&self.navigation)
            }
            KeyCode::Enter => self.alerts.activate_selected(&mut self.navigation).await,
            KeyCode::Esc => self.alerts.continue_editing(),
            _ => {}
        }
    }

    fn handle_text_edit_key(&mut self, key: KeyEvent) {
        let Some(view) = self.navigation.visible_form_view_mut() else {
            return;
        };
        let form = Arc::clone(view.form());
        let Some(FieldRenderer::Text(field)) = view.focused_mut() else {
            return;
        };
        let multiline = field.binding().element().is_multiline;

        match key.code {
            KeyCode::Esc => field.cancel(),
            KeyCode::Tab => field.commit(form.as_ref()),
            KeyCode::Enter if multiline => field.push_char('\n'),
            KeyCode::Enter => field.commit(form.as_ref()),
            KeyCode::Backspace => field.pop_char(),
            KeyCode::Char(c) => field.push_char(c),
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        let formatter = self.formatter;
        let Some(view) = self.navigation.visible_form_view_mut() else {
            return;
        };
        let form = Arc::clone(view.form());

        match key.code {
            KeyCode::Down | KeyCode::Tab => view.next_field(),
            KeyCode::Up | KeyCode::BackTab => view.prev_field(),
            KeyCode::Enter => {
                if let Some(filter) = view.focused_filter().cloned() {
                    let pushed = self.navigation.push(NavigationPage::AssociationFilterResult {
                        result: filter,
                        view_model: AssociationsViewModel::new(form),
                    });
                    if !pushed {
                        self.status_message =
                            Some("Navigation to associations is disabled".to_string());
                    }
                    return;
                }
                match view.focused_mut() {
                    Some(FieldRenderer::Text(field)) => field.begin_edit(),
                    Some(FieldRenderer::Choice(field)) => field.cycle(form.as_ref(), 1),
                    _ => {}
                }
            }
            KeyCode::Left | KeyCode::Right => {
                let forward = key.code == KeyCode::Right;
                match view.focused_mut() {
                    Some(FieldRenderer::Choice(field)) => {
                        field.cycle(form.as_ref(), if forward { 1 } else { -1 })
                    }
                    Some(FieldRenderer::Date(field)) => {
                        field.step_days(form.as_ref(), if forward { 1 } else { -1 })
                    }
                    Some(FieldRenderer::ReadOnly(field)) => {
                        field.scroll_by(if forward { 1 } else { -1 }, &formatter)
                    }
                    _ => {}
                }
            }
            KeyCode::Char(c @ ('+' | '-')) => {
                if let Some(FieldRenderer::Date(field)) = view.focused_mut() {
                    field.step_hours(form.as_ref(), if c == '+' { 1 } else { -1 });
                }
            }
            KeyCode::Delete => match view.focused_mut() {
                Some(FieldRenderer::Date(field)) => field.clear(form.as_ref()),
                Some(FieldRenderer::Text(field)) => {
                    form.set_value(field.binding().id(), FieldInput::Text(String::new()));
                    field.binding_mut().mark_touched();
                }
                _ => {}
            },
            _ => {}
        }
    }

    fn handle_association_key(&mut self, key: KeyEvent) {
        let mut open: Option<Arc<dyn FeatureForm>> = None;
        let mut push: Option<NavigationPage> = None;

        match self.navigation.visible_page_mut() {
            Some(NavigationPage::AssociationFilterResult { result, view_model }) => {
                let count = result.groups.len();
                match key.code {
                    KeyCode::Down | KeyCode::Tab => view_model.select_next(count),
                    KeyCode::Up | KeyCode::BackTab => view_model.select_prev(count),
                    KeyCode::Enter => {
                        if let Some(group) = result.groups.get(view_model.selected()) {
                            push = Some(NavigationPage::AssociationGroupResult {
                                result: group.clone(),
                                view_model: AssociationsViewModel::new(Arc::clone(
                                    view_model.form(),
                                )),
                            });
                        }
                    }
                    _ => {}
                }
            }
            Some(NavigationPage::AssociationGroupResult { result, view_model }) => {
                let count = result.associations.len();
                match key.code {
                    KeyCode::Down | KeyCode::Tab => view_model.select_next(count),
                    KeyCode::Up | KeyCode::BackTab => view_model.select_prev(count),
                    KeyCode::Enter => {
                        open = result
                            .associations
                            .get(view_model.selected())
                            .map(|a| Arc::clone(&a.form));
                    }
                    _ => {}
                }
            }
            _ => {}
        }

        if let Some(page) = push {
            self.navigation.push(page);
        }
        if let Some(form) = open {
            self.open_associated_form(form);
        }
    }

    /// Present a related record's form, confirming unsaved edits first
    pub fn open_associated_form(&mut self, form: Arc<dyn FeatureForm>) {
        if self.navigation.is_navigation_disabled() {
            self.status_message = Some("Navigation to associations is disabled".to_string());
            return;
        }
        info!(record = %form.global_id(), "Opening associated form");
        let page = move |nav: &mut NavigationOrchestrator| {
            nav.push(NavigationPage::SubForm(FormViewModel::new(form)));
        };
        self.alerts.request(&mut self.navigation, true, page);
    }

    /// Back navigation, or closing the form from the root page
    pub fn navigate_back(&mut self) {
        if self.navigation.depth() == 0 {
            if self.is_close_button_visible() {
                self.request_close();
            }
            return;
        }
        if self.navigation.pop_changes_record() {
            self.alerts.request(&mut self.navigation, true, |nav| {
                nav.pop();
            });
        } else {
            self.navigation.pop();
        }
    }

    /// Close the form, clearing the two-way binding once confirmed
    pub fn request_close(&mut self) {
        let binding = self.binding.clone();
        self.alerts
            .request(&mut self.navigation, false, move |nav: &mut NavigationOrchestrator| {
                binding.set(None);
                nav.set_root(None);
            });
    }

    /// Save button of the editing toolbar
    pub async fn save_from_toolbar(&mut self) {
        let Some(form) = self.navigation.presented_form().cloned() else {
            return;
        };
        if !form.validation_errors().is_empty() {
            self.navigation
                .set_validation_visibility(ValidationErrorVisibility::Visible);
        }
        match form.finish_editing().await {
            Ok(()) => {
                self.alerts.report_toolbar_event(EditingEvent::SavedEdits {
                    will_navigate: false,
                });
                self.status_message = Some("Edits saved".to_string());
            }
            Err(error) => self.alerts.report_finish_editing_error(error),
        }
    }

    /// Discard button of the editing toolbar
    pub fn discard_from_toolbar(&mut self) {
        let Some(form) = self.navigation.presented_form().cloned() else {
            return;
        };
        if !form.has_edits() {
            return;
        }
        form.discard_edits();
        self.navigation
            .set_validation_visibility(ValidationErrorVisibility::Automatic);
        self.alerts.report_toolbar_event(EditingEvent::DiscardedEdits {
            will_navigate: false,
        });
    }
}
