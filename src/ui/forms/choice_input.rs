//! Choice input renderer (combo box and radio buttons)

use crate::engine::{FeatureForm, FieldInput, FieldValue};
use crate::state::FieldBinding;
use crate::ui::ValueFormatter;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

#[derive(Debug)]
pub struct ChoiceFieldRenderer {
    binding: FieldBinding,
}

impl ChoiceFieldRenderer {
    pub fn new(binding: FieldBinding) -> Self {
        Self { binding }
    }

    pub fn binding(&self) -> &FieldBinding {
        &self.binding
    }

    pub fn binding_mut(&mut self) -> &mut FieldBinding {
        &mut self.binding
    }

    fn choices(&self) -> &[String] {
        self.binding.element().input_kind.choices().unwrap_or(&[])
    }

    /// Index of the choice matching the current value
    pub fn selected_index(&self) -> Option<usize> {
        match &self.binding.element().value {
            FieldValue::Other(label) => self.choices().iter().position(|c| c == label),
            _ => None,
        }
    }

    /// Select the next (or previous, for negative `delta`) choice, wrapping around
    pub fn cycle(&mut self, form: &dyn FeatureForm, delta: isize) {
        let count = self.choices().len() as isize;
        if count == 0 {
            return;
        }
        let next = match self.selected_index() {
            Some(current) => (current as isize + delta).rem_euclid(count),
            None if delta < 0 => count - 1,
            None => 0,
        };
        form.set_value(self.binding.id(), FieldInput::Choice(next as usize));
        self.binding.mark_touched();
    }

    pub fn lines(&self, formatter: &ValueFormatter, focused: bool) -> Vec<Line<'static>> {
        if !focused {
            let element = self.binding.element();
            return vec![Line::from(
                formatter.format(&element.value, &element.input_kind),
            )];
        }

        let selected = self.selected_index();
        let spans: Vec<Span<'static>> = self
            .choices()
            .iter()
            .enumerate()
            .flat_map(|(i, choice)| {
                let style = if Some(i) == selected {
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                let marker = if Some(i) == selected { "● " } else { "○ " };
                [
                    Span::styled(format!("{marker}{choice}"), style),
                    Span::raw("  "),
                ]
            })
            .collect();
        vec![Line::from(spans)]
    }
}
