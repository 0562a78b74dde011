//! Per-page view models

use crate::engine::{AssociationFilterResult, FeatureForm, ValidationError};
use crate::state::ValidationErrorVisibility;
use crate::ui::forms::FieldRenderer;
use std::sync::Arc;

/// A form being displayed: its renderers and keyboard focus.
///
/// Focus runs over the fields first, then over the association filters
/// listed below them.
#[derive(Debug)]
pub struct FormViewModel {
    form: Arc<dyn FeatureForm>,
    fields: Vec<FieldRenderer>,
    filters: Vec<AssociationFilterResult>,
    focused: usize,
}

impl FormViewModel {
    pub fn new(form: Arc<dyn FeatureForm>) -> Self {
        let fields = form
            .elements()
            .into_iter()
            .map(|element| FieldRenderer::for_element(form.as_ref(), element))
            .collect();
        let filters = form.association_filters();
        Self {
            form,
            fields,
            filters,
            focused: 0,
        }
    }

    pub fn form(&self) -> &Arc<dyn FeatureForm> {
        &self.form
    }

    pub fn fields(&self) -> &[FieldRenderer] {
        &self.fields
    }

    pub fn filters(&self) -> &[AssociationFilterResult] {
        &self.filters
    }

    fn focusable_count(&self) -> usize {
        self.fields.len() + self.filters.len()
    }

    pub fn focused_index(&self) -> usize {
        self.focused
    }

    pub fn focused(&self) -> Option<&FieldRenderer> {
        self.fields.get(self.focused)
    }

    pub fn focused_mut(&mut self) -> Option<&mut FieldRenderer> {
        self.fields.get_mut(self.focused)
    }

    /// The association filter under focus, if focus is past the fields
    pub fn focused_filter(&self) -> Option<&AssociationFilterResult> {
        self.focused
            .checked_sub(self.fields.len())
            .and_then(|i| self.filters.get(i))
    }

    pub fn next_field(&mut self) {
        let count = self.focusable_count();
        if count > 0 {
            self.focused = (self.focused + 1) % count;
        }
    }

    pub fn prev_field(&mut self) {
        let count = self.focusable_count();
        if count == 0 {
            return;
        }
        self.focused = if self.focused == 0 {
            count - 1
        } else {
            self.focused - 1
        };
    }

    /// Whether a text field is mid-edit
    pub fn is_editing(&self) -> bool {
        self.fields.iter().any(FieldRenderer::is_editing)
    }

    /// Re-pull every field that published a change; returns how many did
    pub fn refresh(&mut self) -> usize {
        let form = Arc::clone(&self.form);
        self.fields
            .iter_mut()
            .map(|field| field.refresh(form.as_ref()))
            .filter(|changed| *changed)
            .count()
    }

    /// Validation message to show under `field`, if any
    pub fn visible_error<'a>(
        field: &FieldRenderer,
        errors: &'a [ValidationError],
        visibility: ValidationErrorVisibility,
    ) -> Option<&'a str> {
        let binding = field.binding();
        let shown = match visibility {
            ValidationErrorVisibility::Visible => true,
            ValidationErrorVisibility::Automatic => binding.is_touched(),
        };
        if !shown {
            return None;
        }
        errors
            .iter()
            .find(|e| &e.field == binding.id())
            .map(|e| e.message.as_str())
    }
}

/// Selection state of an association result page
#[derive(Debug, Clone)]
pub struct AssociationsViewModel {
    form: Arc<dyn FeatureForm>,
    selected: usize,
}

impl AssociationsViewModel {
    /// View model for browsing the associations of `form`'s record
    pub fn new(form: Arc<dyn FeatureForm>) -> Self {
        Self { form, selected: 0 }
    }

    pub fn form(&self) -> &Arc<dyn FeatureForm> {
        &self.form
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn select_next(&mut self, count: usize) {
        if count > 0 {
            self.selected = (self.selected + 1) % count;
        }
    }

    pub fn select_prev(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        self.selected = if self.selected == 0 {
            count - 1
        } else {
            self.selected - 1
        };
    }
}
