//! Form element value objects

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stable identity of the record a form edits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub Uuid);

impl RecordId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.0.hyphenated().to_string().to_uppercase())
    }
}

/// Identity of a field within its form
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(pub String);

impl FieldId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Declared input of a field
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputKind {
    TextBox,
    TextArea,
    DateTime {
        #[serde(default)]
        includes_time: bool,
    },
    ComboBox {
        choices: Vec<String>,
    },
    RadioButtons {
        choices: Vec<String>,
    },
    ReadOnly,
    #[default]
    Unspecified,
}

impl InputKind {
    /// Whether a date value should be rendered with its time of day
    pub fn includes_time(&self) -> bool {
        matches!(self, InputKind::DateTime { includes_time: true })
    }

    /// Choices offered by a choice input
    pub fn choices(&self) -> Option<&[String]> {
        match self {
            InputKind::ComboBox { choices } | InputKind::RadioButtons { choices } => {
                Some(choices)
            }
            _ => None,
        }
    }
}

/// Current value of a field as published by the engine
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldValue {
    #[default]
    Absent,
    Date(DateTime<FixedOffset>),
    /// Any other value, carried as the engine's preformatted display string
    Other(String),
}

impl FieldValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }

    pub fn as_date(&self) -> Option<DateTime<FixedOffset>> {
        match self {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }
}

/// Input handed to the engine when the user edits a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldInput {
    Text(String),
    Date(Option<DateTime<FixedOffset>>),
    Choice(usize),
}

/// Snapshot of a single form element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldElement {
    pub id: FieldId,
    pub label: String,
    pub description: String,
    pub is_multiline: bool,
    pub is_editable: bool,
    pub input_kind: InputKind,
    pub value: FieldValue,
}

impl FieldElement {
    /// Create a read-only element with the given value
    pub fn read_only(id: &str, label: &str, value: FieldValue) -> Self {
        Self {
            id: FieldId::new(id),
            label: label.to_string(),
            description: String::new(),
            is_multiline: false,
            is_editable: false,
            input_kind: InputKind::ReadOnly,
            value,
        }
    }

    /// Create an editable element with the given input kind
    pub fn editable(id: &str, label: &str, input_kind: InputKind, value: FieldValue) -> Self {
        let is_multiline = matches!(input_kind, InputKind::TextArea);
        Self {
            id: FieldId::new(id),
            label: label.to_string(),
            description: String::new(),
            is_multiline,
            is_editable: true,
            input_kind,
            value,
        }
    }

    pub fn with_multiline(mut self, is_multiline: bool) -> Self {
        self.is_multiline = is_multiline;
        self
    }
}

/// A constraint violation reported by the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: FieldId,
    pub message: String,
}
