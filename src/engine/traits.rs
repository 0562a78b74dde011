//! Trait abstraction for the form engine to enable mocking in tests

use super::association::AssociationFilterResult;
use super::element::{FieldElement, FieldId, FieldInput, RecordId, ValidationError};
use super::error::SubmitError;
use async_trait::async_trait;
use std::fmt;
use tokio::sync::watch;

/// A record-level form owned by an external form/validation engine.
///
/// The widget set only observes this state and calls the mutating
/// operations in response to user actions. Implementations use interior
/// mutability since forms are shared between navigation pages.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeatureForm: Send + Sync {
    /// Identity of the underlying record
    fn global_id(&self) -> RecordId;

    /// Display title of the record
    fn title(&self) -> String;

    /// Snapshot of every element, in form order
    fn elements(&self) -> Vec<FieldElement>;

    /// Snapshot of a single element
    fn element(&self, id: &FieldId) -> Option<FieldElement>;

    /// Change notifications for a field; the version bumps on every value change
    fn subscribe(&self, id: &FieldId) -> Option<watch::Receiver<u64>>;

    /// Current validation errors, in form order
    fn validation_errors(&self) -> Vec<ValidationError>;

    /// Whether the form holds edits that are neither saved nor discarded
    fn has_edits(&self) -> bool;

    /// Apply user input to a field
    fn set_value(&self, id: &FieldId, input: FieldInput);

    /// Revert every pending edit
    fn discard_edits(&self);

    /// Persist the pending edits
    async fn finish_editing(&self) -> Result<(), SubmitError>;

    /// Association filters reachable from this record
    fn association_filters(&self) -> Vec<AssociationFilterResult>;
}

impl fmt::Debug for dyn FeatureForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FeatureForm({})", self.global_id())
    }
}
