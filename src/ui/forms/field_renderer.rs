//! Field rendering for forms

use super::{ChoiceFieldRenderer, DateFieldRenderer, ReadOnlyFieldRenderer, TextFieldRenderer};
use crate::engine::{FeatureForm, FieldElement, InputKind};
use crate::state::FieldBinding;
use crate::ui::ValueFormatter;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use uuid::Uuid;

/// Renderer picked for a form element
#[derive(Debug)]
pub enum FieldRenderer {
    ReadOnly(ReadOnlyFieldRenderer),
    Text(TextFieldRenderer),
    Date(DateFieldRenderer),
    Choice(ChoiceFieldRenderer),
}

impl FieldRenderer {
    /// Bind a renderer to `element` based on its input kind
    pub fn for_element(form: &dyn FeatureForm, element: FieldElement) -> Self {
        let editable = element.is_editable;
        let kind = element.input_kind.clone();
        let binding = FieldBinding::new(form, element);
        if !editable {
            return FieldRenderer::ReadOnly(ReadOnlyFieldRenderer::new(binding));
        }
        match kind {
            InputKind::ReadOnly => FieldRenderer::ReadOnly(ReadOnlyFieldRenderer::new(binding)),
            InputKind::DateTime { .. } => FieldRenderer::Date(DateFieldRenderer::new(binding)),
            InputKind::ComboBox { .. } | InputKind::RadioButtons { .. } => {
                FieldRenderer::Choice(ChoiceFieldRenderer::new(binding))
            }
            InputKind::TextBox | InputKind::TextArea | InputKind::Unspecified => {
                FieldRenderer::Text(TextFieldRenderer::new(binding))
            }
        }
    }

    pub fn binding(&self) -> &FieldBinding {
        match self {
            FieldRenderer::ReadOnly(r) => r.binding(),
            FieldRenderer::Text(r) => r.binding(),
            FieldRenderer::Date(r) => r.binding(),
            FieldRenderer::Choice(r) => r.binding(),
        }
    }

    pub fn binding_mut(&mut self) -> &mut FieldBinding {
        match self {
            FieldRenderer::ReadOnly(r) => r.binding_mut(),
            FieldRenderer::Text(r) => r.binding_mut(),
            FieldRenderer::Date(r) => r.binding_mut(),
            FieldRenderer::Choice(r) => r.binding_mut(),
        }
    }

    pub fn content_id(&self) -> Uuid {
        self.binding().content_id()
    }

    pub fn refresh(&mut self, form: &dyn FeatureForm) -> bool {
        match self {
            FieldRenderer::ReadOnly(r) => r.refresh(form),
            other => other.binding_mut().refresh(form),
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, FieldRenderer::Text(r) if r.is_editing())
    }

    pub fn lines(&self, formatter: &ValueFormatter, focused: bool) -> Vec<Line<'static>> {
        match self {
            FieldRenderer::ReadOnly(r) => r.lines(formatter),
            FieldRenderer::Text(r) => r.lines(formatter, focused),
            FieldRenderer::Date(r) => r.lines(formatter),
            FieldRenderer::Choice(r) => r.lines(formatter, focused),
        }
    }

    /// Rows needed to draw this field at `width`, borders and error line included
    pub fn height(
        &self,
        formatter: &ValueFormatter,
        width: u16,
        focused: bool,
        has_error: bool,
    ) -> u16 {
        let inner = width.saturating_sub(2).max(1) as usize;
        let content: usize = if self.binding().element().is_multiline {
            self.lines(formatter, focused)
                .iter()
                .map(|l| l.width().max(1).div_ceil(inner))
                .sum::<usize>()
                .max(1)
        } else {
            1
        };
        content as u16 + 2 + u16::from(has_error)
    }
}

/// Draw a field with its label, value and optional validation message
pub fn draw_field(
    frame: &mut Frame,
    area: Rect,
    renderer: &FieldRenderer,
    formatter: &ValueFormatter,
    is_active: bool,
    error: Option<&str>,
) {
    let border_style = if error.is_some() {
        Style::default().fg(Color::Red)
    } else if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let value_style = if matches!(renderer, FieldRenderer::ReadOnly(_)) {
        Style::default().fg(Color::Gray)
    } else if is_active {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let element = renderer.binding().element();
    let mut lines = renderer.lines(formatter, is_active);
    if let Some(message) = error {
        lines.push(Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::ITALIC),
        )));
    }

    let title = if renderer.is_editing() {
        format!(" {} (editing) ", element.label)
    } else {
        format!(" {} ", element.label)
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);

    let paragraph = Paragraph::new(lines).style(value_style).block(block);
    let paragraph = if element.is_multiline {
        paragraph.wrap(Wrap { trim: false })
    } else {
        paragraph
    };
    frame.render_widget(paragraph, area);
}
