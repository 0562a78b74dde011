//! Field renderers
//!
//! - `read_only`: formatted value display with horizontal scrolling
//! - `text_input`: single and multi-line text editing
//! - `date_input`: date and date-time stepping
//! - `choice_input`: combo box and radio button cycling
//! - `field_renderer`: renderer selection and the bordered field frame

mod choice_input;
mod date_input;
mod field_renderer;
mod read_only;
mod text_input;

pub use choice_input::ChoiceFieldRenderer;
pub use date_input::DateFieldRenderer;
pub use field_renderer::{draw_field, FieldRenderer};
pub use read_only::ReadOnlyFieldRenderer;
pub use text_input::TextFieldRenderer;
