//! Form domain layer
//!
//! Field bindings observe engine state; view models hold per-page UI state.

mod field;
mod view_model;

pub use field::{FieldBinding, TextDraft};
pub use view_model::{AssociationsViewModel, FormViewModel};
