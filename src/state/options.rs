//! Developer-facing configuration of a form container

use crate::ui::ValueFormatter;
use chrono::Locale;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Visibility of an optional piece of chrome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Decided by the container from context
    #[default]
    Automatic,
    Hidden,
    Visible,
}

impl Visibility {
    /// Resolve against what the container would pick on its own
    pub fn resolve(self, automatic: bool) -> bool {
        match self {
            Visibility::Automatic => automatic,
            Visibility::Hidden => false,
            Visibility::Visible => true,
        }
    }
}

/// When validation errors are shown on fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorVisibility {
    /// Only on fields the user has edited
    #[default]
    Automatic,
    /// On every field
    Visible,
}

/// A resolved save-or-discard action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditingEvent {
    DiscardedEdits { will_navigate: bool },
    SavedEdits { will_navigate: bool },
}

/// Callback receiving [`EditingEvent`]s
#[derive(Clone)]
pub struct EditingEventHandler(Arc<dyn Fn(EditingEvent) + Send + Sync>);

impl EditingEventHandler {
    pub fn new(f: impl Fn(EditingEvent) + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn call(&self, event: EditingEvent) {
        (self.0)(event)
    }
}

impl fmt::Debug for EditingEventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EditingEventHandler")
    }
}

/// Immutable container configuration.
///
/// Every `with_*` method returns a modified copy, so a base configuration
/// can be shared between containers.
#[derive(Debug, Clone)]
pub struct FormViewOptions {
    pub close_button: Visibility,
    pub editing_buttons: Visibility,
    pub navigation_disabled: bool,
    pub on_editing_event: Option<EditingEventHandler>,
    pub validation_errors: ValidationErrorVisibility,
    pub locale: Locale,
}

impl Default for FormViewOptions {
    fn default() -> Self {
        Self {
            close_button: Visibility::Automatic,
            editing_buttons: Visibility::Automatic,
            navigation_disabled: false,
            on_editing_event: None,
            validation_errors: ValidationErrorVisibility::Automatic,
            locale: Locale::en_US,
        }
    }
}

impl FormViewOptions {
    pub fn with_close_button(&self, visibility: Visibility) -> Self {
        Self {
            close_button: visibility,
            ..self.clone()
        }
    }

    pub fn with_editing_buttons(&self, visibility: Visibility) -> Self {
        Self {
            editing_buttons: visibility,
            ..self.clone()
        }
    }

    pub fn with_navigation_disabled(&self, disabled: bool) -> Self {
        Self {
            navigation_disabled: disabled,
            ..self.clone()
        }
    }

    pub fn with_editing_event_handler(
        &self,
        f: impl Fn(EditingEvent) + Send + Sync + 'static,
    ) -> Self {
        Self {
            on_editing_event: Some(EditingEventHandler::new(f)),
            ..self.clone()
        }
    }

    pub fn with_validation_errors(&self, visibility: ValidationErrorVisibility) -> Self {
        Self {
            validation_errors: visibility,
            ..self.clone()
        }
    }

    pub fn with_locale(&self, locale: Locale) -> Self {
        Self {
            locale,
            ..self.clone()
        }
    }

    pub fn formatter(&self) -> ValueFormatter {
        ValueFormatter::new(self.locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_defaults() {
        let options = FormViewOptions::default();
        assert_eq!(options.close_button, Visibility::Automatic);
        assert_eq!(options.editing_buttons, Visibility::Automatic);
        assert!(!options.navigation_disabled);
        assert!(options.on_editing_event.is_none());
        assert_eq!(
            options.validation_errors,
            ValidationErrorVisibility::Automatic
        );
    }

    #[test]
    fn test_with_methods_leave_base_untouched() {
        let base = FormViewOptions::default();
        let hidden = base.with_close_button(Visibility::Hidden);
        let locked = base.with_navigation_disabled(true);

        assert_eq!(base.close_button, Visibility::Automatic);
        assert!(!base.navigation_disabled);
        assert_eq!(hidden.close_button, Visibility::Hidden);
        assert!(!hidden.navigation_disabled);
        assert!(locked.navigation_disabled);
        assert_eq!(locked.close_button, Visibility::Automatic);
    }

    #[test]
    fn test_chained_configuration() {
        let options = FormViewOptions::default()
            .with_editing_buttons(Visibility::Visible)
            .with_validation_errors(ValidationErrorVisibility::Visible)
            .with_locale(Locale::fr_FR);
        assert_eq!(options.editing_buttons, Visibility::Visible);
        assert_eq!(options.validation_errors, ValidationErrorVisibility::Visible);
        assert_eq!(options.formatter().locale(), Locale::fr_FR);
    }

    #[test]
    fn test_handler_is_shared_between_copies() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let base = FormViewOptions::default()
            .with_editing_event_handler(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        let copy = base.with_close_button(Visibility::Hidden);

        for options in [&base, &copy] {
            if let Some(handler) = &options.on_editing_event {
                handler.call(EditingEvent::SavedEdits {
                    will_navigate: false,
                });
            }
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_visibility_resolve() {
        assert!(Visibility::Automatic.resolve(true));
        assert!(!Visibility::Automatic.resolve(false));
        assert!(!Visibility::Hidden.resolve(true));
        assert!(Visibility::Visible.resolve(false));
    }
}
