//! Alert dialogs

mod base;
mod confirm_dialog;
mod error_dialog;

pub use confirm_dialog::render_unsaved_edits_dialog;
pub use error_dialog::render_finish_editing_error_dialog;
