//! Form engine contract
//!
//! Everything the widget set reads from or calls into lives behind the
//! [`FeatureForm`] trait. The in-memory engine backs the demo binary and tests.

mod association;
mod element;
mod error;
mod memory;
mod traits;

pub use association::{Association, AssociationFilterResult, AssociationGroupResult};
pub use element::{FieldElement, FieldId, FieldInput, FieldValue, InputKind, RecordId, ValidationError};
pub use error::{DatasetError, SubmitError};
pub use memory::{Dataset, InMemoryForm};
pub use traits::FeatureForm;

#[cfg(test)]
pub use traits::MockFeatureForm;

#[cfg(test)]
pub(crate) use memory::tests;
