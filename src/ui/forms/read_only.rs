//! Read-only field renderer

use crate::engine::FeatureForm;
use crate::state::FieldBinding;
use crate::ui::ValueFormatter;
use ratatui::text::Line;
use uuid::Uuid;

/// Displays a field's formatted value without allowing edits.
///
/// Single-line fields scroll horizontally; multi-line fields wrap and grow
/// downward from the leading edge.
#[derive(Debug)]
pub struct ReadOnlyFieldRenderer {
    binding: FieldBinding,
    scroll: u16,
}

impl ReadOnlyFieldRenderer {
    pub fn new(binding: FieldBinding) -> Self {
        Self { binding, scroll: 0 }
    }

    pub fn binding(&self) -> &FieldBinding {
        &self.binding
    }

    pub fn binding_mut(&mut self) -> &mut FieldBinding {
        &mut self.binding
    }

    pub fn content_id(&self) -> Uuid {
        self.binding.content_id()
    }

    pub fn is_multiline(&self) -> bool {
        self.binding.element().is_multiline
    }

    pub fn refresh(&mut self, form: &dyn FeatureForm) -> bool {
        let changed = self.binding.refresh(form);
        if changed {
            self.scroll = 0;
        }
        changed
    }

    pub fn display_text(&self, formatter: &ValueFormatter) -> String {
        let element = self.binding.element();
        formatter.format(&element.value, &element.input_kind)
    }

    /// Horizontal scroll offset of a single-line value
    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    pub fn scroll_by(&mut self, delta: i16, formatter: &ValueFormatter) {
        if self.is_multiline() {
            return;
        }
        let max = self.display_text(formatter).chars().count().saturating_sub(1) as u16;
        self.scroll = self.scroll.saturating_add_signed(delta).min(max);
    }

    pub fn lines(&self, formatter: &ValueFormatter) -> Vec<Line<'static>> {
        let text = self.display_text(formatter);
        if self.is_multiline() {
            text.lines().map(|l| Line::from(l.to_string())).collect()
        } else {
            vec![Line::from(
                text.chars().skip(self.scroll as usize).collect::<String>(),
            )]
        }
    }
}
