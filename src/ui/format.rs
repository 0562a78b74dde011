//! Display text for read-only values

use crate::engine::{FieldValue, InputKind};
use chrono::Locale;

/// Text shown for a field without a value
pub const PLACEHOLDER: &str = "--";

/// Formats field values for display in a fixed locale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueFormatter {
    locale: Locale,
}

impl Default for ValueFormatter {
    fn default() -> Self {
        Self::new(Locale::en_US)
    }
}

impl ValueFormatter {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Text to display for `value` given the field's declared input.
    ///
    /// Dates include the time of day only when the input says so, regardless
    /// of the value's own time component.
    pub fn format(&self, value: &FieldValue, input_kind: &InputKind) -> String {
        match value {
            FieldValue::Absent => PLACEHOLDER.to_string(),
            FieldValue::Date(date) if input_kind.includes_time() => {
                date.format_localized("%x %X", self.locale).to_string()
            }
            FieldValue::Date(date) => date.format_localized("%x", self.locale).to_string(),
            FieldValue::Other(formatted) => formatted.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn date(s: &str) -> FieldValue {
        FieldValue::Date(DateTime::parse_from_rfc3339(s).unwrap())
    }

    #[test]
    fn test_absent_is_placeholder() {
        let formatter = ValueFormatter::default();
        for kind in [
            InputKind::TextBox,
            InputKind::DateTime { includes_time: true },
            InputKind::ReadOnly,
            InputKind::Unspecified,
        ] {
            assert_eq!(formatter.format(&FieldValue::Absent, &kind), "--");
        }
    }

    #[test]
    fn test_other_is_verbatim() {
        let formatter = ValueFormatter::default();
        let value = FieldValue::Other("  1,234.50 m ".to_string());
        assert_eq!(
            formatter.format(&value, &InputKind::TextBox),
            "  1,234.50 m "
        );
        assert_eq!(
            formatter.format(&value, &InputKind::DateTime { includes_time: true }),
            "  1,234.50 m "
        );
    }

    #[test]
    fn test_date_only_ignores_time_component() {
        let formatter = ValueFormatter::default();
        let kind = InputKind::DateTime {
            includes_time: false,
        };
        let morning = formatter.format(&date("2024-03-05T08:00:00+00:00"), &kind);
        let evening = formatter.format(&date("2024-03-05T20:45:00+00:00"), &kind);
        assert_eq!(morning, evening);
    }

    #[test]
    fn test_unspecified_input_renders_date_only() {
        let formatter = ValueFormatter::default();
        let value = date("2024-03-05T08:00:00+00:00");
        assert_eq!(
            formatter.format(&value, &InputKind::Unspecified),
            formatter.format(&value, &InputKind::DateTime { includes_time: false })
        );
    }

    #[test]
    fn test_date_time_includes_time() {
        let formatter = ValueFormatter::default();
        let kind = InputKind::DateTime {
            includes_time: true,
        };
        let morning = formatter.format(&date("2024-03-05T08:00:00+00:00"), &kind);
        let evening = formatter.format(&date("2024-03-05T20:45:00+00:00"), &kind);
        assert_ne!(morning, evening);

        let date_only = formatter.format(
            &date("2024-03-05T08:00:00+00:00"),
            &InputKind::DateTime {
                includes_time: false,
            },
        );
        assert!(morning.starts_with(&date_only));
        assert!(morning.len() > date_only.len());
    }

    #[test]
    fn test_locale_changes_date_rendering() {
        let value = date("2024-03-05T08:00:00+00:00");
        let kind = InputKind::DateTime {
            includes_time: false,
        };
        let us = ValueFormatter::new(Locale::en_US).format(&value, &kind);
        let de = ValueFormatter::new(Locale::de_DE).format(&value, &kind);
        assert_ne!(us, de);
    }
}
