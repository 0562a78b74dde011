//! Text input renderer

use crate::engine::{FeatureForm, FieldInput, FieldValue};
use crate::state::{FieldBinding, TextDraft};
use crate::ui::ValueFormatter;
use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};

const CURSOR: &str = "▌";

/// Single or multi-line text entry
#[derive(Debug)]
pub struct TextFieldRenderer {
    binding: FieldBinding,
    draft: Option<TextDraft>,
}

impl TextFieldRenderer {
    pub fn new(binding: FieldBinding) -> Self {
        Self {
            binding,
            draft: None,
        }
    }

    pub fn binding(&self) -> &FieldBinding {
        &self.binding
    }

    pub fn binding_mut(&mut self) -> &mut FieldBinding {
        &mut self.binding
    }

    pub fn is_editing(&self) -> bool {
        self.draft.is_some()
    }

    pub fn draft(&self) -> Option<&str> {
        self.draft.as_ref().map(TextDraft::as_str)
    }

    /// Start editing, seeded with the current value
    pub fn begin_edit(&mut self) {
        let initial = match &self.binding.element().value {
            FieldValue::Other(s) => s.as_str(),
            _ => "",
        };
        self.draft = Some(TextDraft::new(initial));
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(draft) = self.draft.as_mut() {
            draft.push_char(c);
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(draft) = self.draft.as_mut() {
            draft.pop_char();
        }
    }

    /// Hand the draft to the engine
    pub fn commit(&mut self, form: &dyn FeatureForm) {
        if let Some(draft) = self.draft.take() {
            form.set_value(self.binding.id(), FieldInput::Text(draft.into_string()));
            self.binding.mark_touched();
        }
    }

    pub fn cancel(&mut self) {
        self.draft = None;
    }

    pub fn lines(&self, formatter: &ValueFormatter, focused: bool) -> Vec<Line<'static>> {
        let Some(draft) = self.draft.as_ref() else {
            let element = self.binding.element();
            let text = formatter.format(&element.value, &element.input_kind);
            return text.lines().map(|l| Line::from(l.to_string())).collect();
        };

        let mut lines: Vec<Line<'static>> = draft
            .as_str()
            .split('\n')
            .map(|l| Line::from(l.to_string()))
            .collect();
        if focused {
            let cursor = Span::styled(CURSOR, Style::default().fg(Color::Cyan));
            if let Some(last) = lines.last_mut() {
                last.spans.push(cursor);
            }
        }
        lines
    }
}
