//! Observed field state

use crate::engine::{FeatureForm, FieldElement, FieldId};
use tokio::sync::watch;
use tracing::trace;
use uuid::Uuid;

/// Live binding between a renderer and one field of an engine form.
///
/// The binding subscribes to the field's change notifications and re-pulls
/// the element snapshot whenever one arrives. Each re-pull produces a fresh
/// content identity, even when the displayed text ends up identical.
#[derive(Debug)]
pub struct FieldBinding {
    element: FieldElement,
    changes: Option<watch::Receiver<u64>>,
    content_id: Uuid,
    touched: bool,
}

impl FieldBinding {
    pub fn new(form: &dyn FeatureForm, element: FieldElement) -> Self {
        let changes = form.subscribe(&element.id);
        Self {
            element,
            changes,
            content_id: Uuid::new_v4(),
            touched: false,
        }
    }

    pub fn id(&self) -> &FieldId {
        &self.element.id
    }

    pub fn element(&self) -> &FieldElement {
        &self.element
    }

    /// Identity of the currently displayed content
    pub fn content_id(&self) -> Uuid {
        self.content_id
    }

    /// Re-pull the element if a change was published since the last refresh.
    ///
    /// Returns whether the element was re-pulled.
    pub fn refresh(&mut self, form: &dyn FeatureForm) -> bool {
        let Some(changes) = self.changes.as_mut() else {
            return false;
        };
        // A closed channel means the engine dropped the field
        if !changes.has_changed().unwrap_or(false) {
            return false;
        }
        changes.borrow_and_update();

        if let Some(element) = form.element(&self.element.id) {
            self.element = element;
        }
        self.content_id = Uuid::new_v4();
        trace!(field = %self.element.id, "Field re-pulled");
        true
    }

    /// Whether the user has edited this field since it was bound
    pub fn is_touched(&self) -> bool {
        self.touched
    }

    pub fn mark_touched(&mut self) {
        self.touched = true;
    }
}

/// Text being typed into a field before it is handed to the engine
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextDraft {
    buffer: String,
}

impl TextDraft {
    pub fn new(initial: &str) -> Self {
        Self {
            buffer: initial.to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn push_char(&mut self, c: char) {
        self.buffer.push(c);
    }

    pub fn pop_char(&mut self) {
        self.buffer.pop();
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn into_string(self) -> String {
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tests::sample_dataset;
    use crate::engine::{FieldInput, FieldValue};

    fn name_binding() -> (std::sync::Arc<crate::engine::InMemoryForm>, FieldBinding) {
        let dataset = sample_dataset();
        let form = dataset.first().unwrap();
        let element = form.element(&FieldId::new("name")).unwrap();
        let binding = FieldBinding::new(form.as_ref(), element);
        (form, binding)
    }

    #[test]
    fn test_refresh_without_change_keeps_identity() {
        let (form, mut binding) = name_binding();
        let before = binding.content_id();
        assert!(!binding.refresh(form.as_ref()));
        assert_eq!(binding.content_id(), before);
    }

    #[test]
    fn test_refresh_pulls_new_value() {
        let (form, mut binding) = name_binding();
        form.set_value(binding.id(), FieldInput::Text("Elm St".to_string()));

        assert!(binding.refresh(form.as_ref()));
        assert_eq!(
            binding.element().value,
            FieldValue::Other("Elm St".to_string())
        );
        // Notification consumed
        assert!(!binding.refresh(form.as_ref()));
    }

    #[test]
    fn test_identical_text_still_gets_new_identity() {
        let dataset = sample_dataset();
        let form = dataset.first().unwrap();
        let id = FieldId::new("name");
        let mut binding = FieldBinding::new(form.as_ref(), form.element(&id).unwrap());

        form.set_value(&id, FieldInput::Text("Elm St".to_string()));
        binding.refresh(form.as_ref());
        let first = binding.content_id();
        let first_text = binding.element().value.clone();

        // Round-trip through another value; the displayed text ends up the same
        form.set_value(&id, FieldInput::Text("Oak St".to_string()));
        form.set_value(&id, FieldInput::Text("Elm St".to_string()));
        assert!(binding.refresh(form.as_ref()));

        assert_eq!(binding.element().value, first_text);
        assert_ne!(binding.content_id(), first);
    }

    #[test]
    fn test_text_draft_editing() {
        let mut draft = TextDraft::new("Ma");
        draft.push_char('i');
        draft.push_char('n');
        assert_eq!(draft.as_str(), "Main");
        draft.pop_char();
        assert_eq!(draft.as_str(), "Mai");
        draft.clear();
        assert_eq!(draft.into_string(), "");
    }
}
