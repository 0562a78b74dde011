//! Reusable UI components

mod button;
mod dialog;

pub use button::{render_toolbar_button, BUTTON_HEIGHT};
pub use dialog::{render_finish_editing_error_dialog, render_unsaved_edits_dialog};
