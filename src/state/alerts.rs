//! Save/discard confirmation flow

use super::navigation::NavigationOrchestrator;
use super::options::{EditingEvent, EditingEventHandler, ValidationErrorVisibility};
use crate::engine::SubmitError;
use std::fmt;
use tracing::{debug, info, warn};

/// Action to run once the user resolves a pending confirmation
pub type Continuation = Box<dyn FnOnce(&mut NavigationOrchestrator)>;

/// A dismiss or navigate request waiting on user confirmation
pub struct AlertContinuation {
    pub will_navigate: bool,
    continuation: Continuation,
}

impl fmt::Debug for AlertContinuation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlertContinuation")
            .field("will_navigate", &self.will_navigate)
            .finish_non_exhaustive()
    }
}

/// Buttons offered by the unsaved-edits alert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertAction {
    DiscardEdits,
    SaveEdits,
    ContinueEditing,
}

impl AlertAction {
    pub fn label(&self) -> &'static str {
        match self {
            AlertAction::DiscardEdits => "Discard Edits",
            AlertAction::SaveEdits => "Save Edits",
            AlertAction::ContinueEditing => "Continue Editing",
        }
    }

    pub fn is_destructive(&self) -> bool {
        matches!(self, AlertAction::DiscardEdits)
    }

    pub fn is_cancel(&self) -> bool {
        matches!(self, AlertAction::ContinueEditing)
    }
}

/// What the unsaved-edits alert shows right now
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsavedEditsAlert {
    pub title: &'static str,
    pub message: String,
    pub actions: Vec<AlertAction>,
    pub selected: usize,
}

/// What the finish-editing-error alert shows right now
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishEditingErrorAlert {
    pub title: &'static str,
    pub message: String,
}

pub const DISCARD_TITLE: &str = "Discard Edits?";
pub const VALIDATION_TITLE: &str = "Validation Errors";
pub const SUBMIT_ERROR_TITLE: &str = "The form wasn't submitted";
const SUBMIT_ERROR_MESSAGE: &str = "The attribute edits could not be saved.";

/// Gates dismissal and navigation behind user confirmation while the
/// presented form has unsaved or invalid edits.
///
/// Holds at most one pending continuation and at most one submission error.
/// The two alerts are evaluated independently.
#[derive(Default)]
pub struct EditConfirmationController {
    pending: Option<AlertContinuation>,
    finish_editing_error: Option<SubmitError>,
    selected: usize,
    on_editing_event: Option<EditingEventHandler>,
}

impl fmt::Debug for EditConfirmationController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditConfirmationController")
            .field("pending", &self.pending)
            .field("finish_editing_error", &self.finish_editing_error)
            .field("selected", &self.selected)
            .finish_non_exhaustive()
    }
}

impl EditConfirmationController {
    pub fn new(on_editing_event: Option<EditingEventHandler>) -> Self {
        Self {
            on_editing_event,
            ..Self::default()
        }
    }

    fn emit(&self, event: EditingEvent) {
        info!(?event, "Editing event");
        if let Some(handler) = &self.on_editing_event {
            handler.call(event);
        }
    }

    /// Run `continuation` now, or hold it behind the unsaved-edits alert if
    /// the presented form has edits.
    ///
    /// A request made while another is pending replaces it.
    pub fn request(
        &mut self,
        nav: &mut NavigationOrchestrator,
        will_navigate: bool,
        continuation: impl FnOnce(&mut NavigationOrchestrator) + 'static,
    ) {
        let Some(form) = nav.presented_form().cloned() else {
            continuation(nav);
            return;
        };
        if !form.has_edits() {
            continuation(nav);
            return;
        }

        if self.pending.is_some() {
            warn!("Replacing a pending confirmation request");
        }
        debug!(will_navigate, "Presenting unsaved edits alert");
        self.pending = Some(AlertContinuation {
            will_navigate,
            continuation: Box::new(continuation),
        });
        self.selected = 0;

        // Once per presentation, so the user sees what blocks saving
        if !form.validation_errors().is_empty() {
            nav.set_validation_visibility(ValidationErrorVisibility::Visible);
        }
    }

    pub fn pending(&self) -> Option<&AlertContinuation> {
        self.pending.as_ref()
    }

    pub fn is_unsaved_edits_alert_shown(&self) -> bool {
        self.pending.is_some()
    }

    pub fn finish_editing_error(&self) -> Option<&SubmitError> {
        self.finish_editing_error.as_ref()
    }

    pub fn is_finish_editing_error_shown(&self) -> bool {
        self.finish_editing_error.is_some()
    }

    /// Actions offered given the presented form's validation state
    pub fn available_actions(nav: &NavigationOrchestrator) -> Vec<AlertAction> {
        let has_errors = nav
            .presented_form()
            .is_some_and(|f| !f.validation_errors().is_empty());
        if has_errors {
            vec![AlertAction::DiscardEdits, AlertAction::ContinueEditing]
        } else {
            vec![
                AlertAction::DiscardEdits,
                AlertAction::SaveEdits,
                AlertAction::ContinueEditing,
            ]
        }
    }

    pub fn unsaved_edits_alert(&self, nav: &NavigationOrchestrator) -> Option<UnsavedEditsAlert> {
        self.pending.as_ref()?;
        let error_count = nav
            .presented_form()
            .map(|f| f.validation_errors().len())
            .unwrap_or(0);
        let actions = Self::available_actions(nav);
        let (title, message) = if error_count == 0 {
            (
                DISCARD_TITLE,
                "Do you want to discard the edits you made?".to_string(),
            )
        } else {
            (
                VALIDATION_TITLE,
                format!(
                    "You have {error_count} validation error(s). Discard your edits or keep editing to fix them."
                ),
            )
        };
        Some(UnsavedEditsAlert {
            title,
            message,
            selected: self.selected.min(actions.len().saturating_sub(1)),
            actions,
        })
    }

    pub fn finish_editing_error_alert(&self) -> Option<FinishEditingErrorAlert> {
        let error = self.finish_editing_error.as_ref()?;
        let detail = error.to_string();
        let message = if detail.is_empty() {
            SUBMIT_ERROR_MESSAGE.to_string()
        } else {
            format!("{SUBMIT_ERROR_MESSAGE}\n\n{detail}")
        };
        Some(FinishEditingErrorAlert {
            title: SUBMIT_ERROR_TITLE,
            message,
        })
    }

    pub fn select_next(&mut self, nav: &NavigationOrchestrator) {
        let count = Self::available_actions(nav).len();
        self.selected = (self.selected + 1) % count;
    }

    pub fn select_prev(&mut self, nav: &NavigationOrchestrator) {
        let count = Self::available_actions(nav).len();
        self.selected = (self.selected + count - 1) % count;
    }

    /// Resolve the unsaved-edits alert with the highlighted action
    pub async fn activate_selected(&mut self, nav: &mut NavigationOrchestrator) {
        let actions = Self::available_actions(nav);
        let index = self.selected.min(actions.len().saturating_sub(1));
        match actions.get(index) {
            Some(AlertAction::DiscardEdits) => self.discard_edits(nav),
            Some(AlertAction::SaveEdits) => self.save_edits(nav).await,
            Some(AlertAction::ContinueEditing) | None => self.continue_editing(),
        }
    }

    /// "Discard Edits": revert, report, and run the pending continuation
    pub fn discard_edits(&mut self, nav: &mut NavigationOrchestrator) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        if let Some(form) = nav.presented_form() {
            form.discard_edits();
        }
        self.emit(EditingEvent::DiscardedEdits {
            will_navigate: pending.will_navigate,
        });
        nav.set_validation_visibility(ValidationErrorVisibility::Automatic);
        (pending.continuation)(nav);
    }

    /// "Save Edits": only offered when the presented form has no validation
    /// errors. A failure keeps the continuation pending and opens the
    /// finish-editing-error alert.
    pub async fn save_edits(&mut self, nav: &mut NavigationOrchestrator) {
        if self.pending.is_none() {
            return;
        }
        let Some(form) = nav.presented_form().cloned() else {
            return;
        };
        if !form.validation_errors().is_empty() {
            debug!("Save Edits is not offered while validation errors exist");
            return;
        }

        match form.finish_editing().await {
            Ok(()) => {
                let Some(pending) = self.pending.take() else {
                    return;
                };
                self.emit(EditingEvent::SavedEdits {
                    will_navigate: pending.will_navigate,
                });
                (pending.continuation)(nav);
            }
            Err(error) => {
                warn!("Finish editing failed: {error}");
                self.finish_editing_error = Some(error);
            }
        }
    }

    /// "Continue Editing": drop the request without touching the form
    pub fn continue_editing(&mut self) {
        if self.pending.take().is_some() {
            debug!("Continuing to edit");
        }
    }

    /// Drop any pending request and submission error.
    ///
    /// Both belong to the form they were raised for, so they are cleared
    /// whenever the host binds a different form.
    pub fn reset(&mut self) {
        if self.pending.take().is_some() {
            debug!("Dropping pending confirmation for a rebound form");
        }
        self.finish_editing_error = None;
        self.selected = 0;
    }

    /// Dismiss the submission error; a pending request stays pending
    pub fn dismiss_finish_editing_error(&mut self) {
        self.finish_editing_error = None;
    }

    /// Record a submission error from the editing toolbar
    pub fn report_finish_editing_error(&mut self, error: SubmitError) {
        warn!("Finish editing failed: {error}");
        self.finish_editing_error = Some(error);
    }

    /// Report a toolbar save or discard, which never navigates
    pub fn report_toolbar_event(&self, event: EditingEvent) {
        self.emit(event);
    }
}
