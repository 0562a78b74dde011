//! Date input renderer

use crate::engine::{FeatureForm, FieldInput};
use crate::state::FieldBinding;
use crate::ui::ValueFormatter;
use chrono::{DateTime, Duration, FixedOffset, Local};
use ratatui::text::Line;

/// Date entry stepped from the keyboard
#[derive(Debug)]
pub struct DateFieldRenderer {
    binding: FieldBinding,
}

impl DateFieldRenderer {
    pub fn new(binding: FieldBinding) -> Self {
        Self { binding }
    }

    pub fn binding(&self) -> &FieldBinding {
        &self.binding
    }

    pub fn binding_mut(&mut self) -> &mut FieldBinding {
        &mut self.binding
    }

    pub fn includes_time(&self) -> bool {
        self.binding.element().input_kind.includes_time()
    }

    fn current(&self) -> DateTime<FixedOffset> {
        self.binding
            .element()
            .value
            .as_date()
            .unwrap_or_else(|| Local::now().fixed_offset())
    }

    fn set(&mut self, form: &dyn FeatureForm, value: Option<DateTime<FixedOffset>>) {
        form.set_value(self.binding.id(), FieldInput::Date(value));
        self.binding.mark_touched();
    }

    /// Move the date by whole days, starting from now when empty
    pub fn step_days(&mut self, form: &dyn FeatureForm, days: i64) {
        let next = self.current() + Duration::days(days);
        self.set(form, Some(next));
    }

    /// Move the time by whole hours; ignored for date-only inputs
    pub fn step_hours(&mut self, form: &dyn FeatureForm, hours: i64) {
        if !self.includes_time() {
            return;
        }
        let next = self.current() + Duration::hours(hours);
        self.set(form, Some(next));
    }

    pub fn clear(&mut self, form: &dyn FeatureForm) {
        self.set(form, None);
    }

    pub fn lines(&self, formatter: &ValueFormatter) -> Vec<Line<'static>> {
        let element = self.binding.element();
        vec![Line::from(
            formatter.format(&element.value, &element.input_kind),
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tests::sample_dataset;
    use crate::engine::{FieldId, FieldValue};

    fn inspected() -> (
        std::sync::Arc<crate::engine::InMemoryForm>,
        DateFieldRenderer,
    ) {
        let dataset = sample_dataset();
        let form = dataset.first().unwrap();
        let id = FieldId::new("inspected");
        let renderer =
            DateFieldRenderer::new(FieldBinding::new(form.as_ref(), form.element(&id).unwrap()));
        (form, renderer)
    }

    #[test]
    fn test_step_days() {
        let (form, mut renderer) = inspected();
        renderer.step_days(form.as_ref(), 2);
        renderer.binding_mut().refresh(form.as_ref());

        let expected = DateTime::parse_from_rfc3339("2024-03-07T14:30:00+00:00").unwrap();
        assert_eq!(renderer.binding().element().value, FieldValue::Date(expected));
        assert!(renderer.binding().is_touched());
    }

    #[test]
    fn test_step_hours_with_time() {
        let (form, mut renderer) = inspected();
        assert!(renderer.includes_time());
        renderer.step_hours(form.as_ref(), -3);
        renderer.binding_mut().refresh(form.as_ref());

        let expected = DateTime::parse_from_rfc3339("2024-03-05T11:30:00+00:00").unwrap();
        assert_eq!(renderer.binding().element().value, FieldValue::Date(expected));
    }

    #[test]
    fn test_clear_sets_absent() {
        let (form, mut renderer) = inspected();
        renderer.clear(form.as_ref());
        renderer.binding_mut().refresh(form.as_ref());
        assert!(renderer.binding().element().value.is_absent());
        assert_eq!(
            renderer.lines(&ValueFormatter::default()),
            vec![Line::from("--")]
        );
    }
}
