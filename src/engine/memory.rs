//! In-memory form engine backed by a JSON dataset
//!
//! Used by the demo binary and as a realistic fixture in tests. Its only
//! validation rule is "required fields must have a value".

use super::association::{Association, AssociationFilterResult, AssociationGroupResult};
use super::element::{
    FieldElement, FieldId, FieldInput, FieldValue, InputKind, RecordId, ValidationError,
};
use super::error::{DatasetError, SubmitError};
use super::traits::FeatureForm;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError, RwLock, Weak};
use tokio::sync::watch;
use tracing::{debug, info, warn};

#[derive(Debug, Deserialize)]
struct DatasetDef {
    records: Vec<RecordDef>,
}

#[derive(Debug, Deserialize)]
struct RecordDef {
    id: RecordId,
    title: String,
    #[serde(default)]
    fields: Vec<FieldDef>,
    #[serde(default)]
    associations: Vec<FilterDef>,
}

#[derive(Debug, Deserialize)]
struct FieldDef {
    id: FieldId,
    label: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    input: InputKind,
    #[serde(default)]
    value: serde_json::Value,
    #[serde(default)]
    required: bool,
    #[serde(default = "default_editable")]
    editable: bool,
    multiline: Option<bool>,
}

fn default_editable() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
struct FilterDef {
    filter: String,
    groups: Vec<GroupDef>,
}

#[derive(Debug, Clone, Deserialize)]
struct GroupDef {
    name: String,
    records: Vec<RecordId>,
}

/// Stored value of a field
#[derive(Debug, Clone, PartialEq)]
enum StoredValue {
    Null,
    Text(String),
    Number(f64),
    Date(DateTime<FixedOffset>),
    Choice(usize),
}

impl StoredValue {
    fn from_json(value: &serde_json::Value, input: &InputKind) -> Result<Self, String> {
        use serde_json::Value;

        match (value, input) {
            (Value::Null, _) => Ok(StoredValue::Null),
            (Value::String(s), InputKind::DateTime { .. }) => DateTime::parse_from_rfc3339(s)
                .map(StoredValue::Date)
                .map_err(|e| format!("expected an RFC 3339 date: {e}")),
            (Value::String(s), kind) if kind.choices().is_some() => kind
                .choices()
                .and_then(|choices| choices.iter().position(|c| c == s))
                .map(StoredValue::Choice)
                .ok_or_else(|| format!("'{s}' is not one of the declared choices")),
            (Value::String(s), _) => Ok(StoredValue::Text(s.clone())),
            (Value::Number(n), _) => n
                .as_f64()
                .map(StoredValue::Number)
                .ok_or_else(|| format!("unsupported number {n}")),
            (Value::Bool(b), _) => Ok(StoredValue::Text(b.to_string())),
            (other, _) => Err(format!("unsupported value {other}")),
        }
    }

    fn from_input(input: FieldInput) -> Self {
        match input {
            FieldInput::Text(s) if s.is_empty() => StoredValue::Null,
            FieldInput::Text(s) => StoredValue::Text(s),
            FieldInput::Date(Some(d)) => StoredValue::Date(d),
            FieldInput::Date(None) => StoredValue::Null,
            FieldInput::Choice(i) => StoredValue::Choice(i),
        }
    }

    fn to_field_value(&self, input: &InputKind) -> FieldValue {
        match self {
            StoredValue::Null => FieldValue::Absent,
            StoredValue::Text(s) => FieldValue::Other(s.clone()),
            // f64 Display drops a trailing ".0"
            StoredValue::Number(n) => FieldValue::Other(n.to_string()),
            StoredValue::Date(d) => FieldValue::Date(*d),
            StoredValue::Choice(i) => FieldValue::Other(
                input
                    .choices()
                    .and_then(|c| c.get(*i))
                    .cloned()
                    .unwrap_or_default(),
            ),
        }
    }
}

#[derive(Debug)]
struct FieldSpec {
    id: FieldId,
    label: String,
    description: String,
    input: InputKind,
    required: bool,
    editable: bool,
    multiline: bool,
}

#[derive(Debug, Default)]
struct FormValues {
    committed: HashMap<FieldId, StoredValue>,
    current: HashMap<FieldId, StoredValue>,
}

/// A form over one record of an in-memory [`Dataset`]
pub struct InMemoryForm {
    id: RecordId,
    title: String,
    fields: Vec<FieldSpec>,
    values: RwLock<FormValues>,
    notifiers: HashMap<FieldId, watch::Sender<u64>>,
    associations: Vec<FilterDef>,
    dataset: Weak<Dataset>,
    submit_failure: Mutex<Option<SubmitError>>,
}

impl std::fmt::Debug for InMemoryForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryForm")
            .field("id", &self.id)
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}

impl InMemoryForm {
    fn new(
        record: RecordDef,
        values: HashMap<FieldId, StoredValue>,
        dataset: Weak<Dataset>,
    ) -> Self {
        let fields: Vec<FieldSpec> = record
            .fields
            .into_iter()
            .map(|f| FieldSpec {
                multiline: f
                    .multiline
                    .unwrap_or(matches!(f.input, InputKind::TextArea)),
                id: f.id,
                label: f.label,
                description: f.description,
                input: f.input,
                required: f.required,
                editable: f.editable,
            })
            .collect();
        let notifiers = fields
            .iter()
            .map(|f| (f.id.clone(), watch::channel(0u64).0))
            .collect();

        Self {
            id: record.id,
            title: record.title,
            fields,
            values: RwLock::new(FormValues {
                committed: values.clone(),
                current: values,
            }),
            notifiers,
            associations: record.associations,
            dataset,
            submit_failure: Mutex::new(None),
        }
    }

    /// Make the next `finish_editing` call fail with the given error
    pub fn fail_next_submit(&self, error: SubmitError) {
        *self
            .submit_failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(error);
    }

    fn spec(&self, id: &FieldId) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| &f.id == id)
    }

    fn notify(&self, id: &FieldId) {
        if let Some(sender) = self.notifiers.get(id) {
            sender.send_modify(|version| *version += 1);
        }
    }

    fn snapshot(&self, spec: &FieldSpec, values: &FormValues) -> FieldElement {
        let value = values
            .current
            .get(&spec.id)
            .map(|v| v.to_field_value(&spec.input))
            .unwrap_or_default();
        FieldElement {
            id: spec.id.clone(),
            label: spec.label.clone(),
            description: spec.description.clone(),
            is_multiline: spec.multiline,
            is_editable: spec.editable && spec.input != InputKind::ReadOnly,
            input_kind: spec.input.clone(),
            value,
        }
    }
}

#[async_trait]
impl FeatureForm for InMemoryForm {
    fn global_id(&self) -> RecordId {
        self.id
    }

    fn title(&self) -> String {
        self.title.clone()
    }

    fn elements(&self) -> Vec<FieldElement> {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        self.fields
            .iter()
            .map(|spec| self.snapshot(spec, &values))
            .collect()
    }

    fn element(&self, id: &FieldId) -> Option<FieldElement> {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        self.spec(id).map(|spec| self.snapshot(spec, &values))
    }

    fn subscribe(&self, id: &FieldId) -> Option<watch::Receiver<u64>> {
        self.notifiers.get(id).map(|sender| sender.subscribe())
    }

    fn validation_errors(&self) -> Vec<ValidationError> {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        self.fields
            .iter()
            .filter(|spec| spec.required)
            .filter(|spec| {
                matches!(
                    values.current.get(&spec.id),
                    None | Some(StoredValue::Null)
                )
            })
            .map(|spec| ValidationError {
                field: spec.id.clone(),
                message: format!("{} is required", spec.label),
            })
            .collect()
    }

    fn has_edits(&self) -> bool {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        values.current != values.committed
    }

    fn set_value(&self, id: &FieldId, input: FieldInput) {
        let Some(spec) = self.spec(id) else {
            warn!("set_value on unknown field {id} of record {}", self.id);
            return;
        };
        if !spec.editable {
            debug!("Ignoring edit of read-only field {id}");
            return;
        }

        let new_value = StoredValue::from_input(input);
        let changed = {
            let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
            let current = values
                .current
                .entry(id.clone())
                .or_insert(StoredValue::Null);
            if *current == new_value {
                false
            } else {
                *current = new_value;
                true
            }
        };
        if changed {
            self.notify(id);
        }
    }

    fn discard_edits(&self) {
        let reverted: Vec<FieldId> = {
            let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
            let committed = values.committed.clone();
            let reverted = self
                .fields
                .iter()
                .filter(|spec| values.current.get(&spec.id) != committed.get(&spec.id))
                .map(|spec| spec.id.clone())
                .collect();
            values.current = committed;
            reverted
        };
        debug!("Discarded {} edited field(s) on {}", reverted.len(), self.id);
        for id in &reverted {
            self.notify(id);
        }
    }

    async fn finish_editing(&self) -> Result<(), SubmitError> {
        let injected = self
            .submit_failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(error) = injected {
            return Err(error);
        }

        let errors = self.validation_errors();
        if !errors.is_empty() {
            return Err(SubmitError::Rejected(format!(
                "{} field(s) failed validation",
                errors.len()
            )));
        }

        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        values.committed = values.current.clone();
        info!("Committed edits to {}", self.id);
        Ok(())
    }

    fn association_filters(&self) -> Vec<AssociationFilterResult> {
        let Some(dataset) = self.dataset.upgrade() else {
            return Vec::new();
        };

        self.associations
            .iter()
            .map(|filter| AssociationFilterResult {
                name: filter.filter.clone(),
                groups: filter
                    .groups
                    .iter()
                    .map(|group| AssociationGroupResult {
                        name: group.name.clone(),
                        associations: group
                            .records
                            .iter()
                            .filter_map(|id| dataset.form(id))
                            .map(|form| Association {
                                title: form.title.clone(),
                                form: form as Arc<dyn FeatureForm>,
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect()
    }
}

/// A set of records whose forms can reference each other through associations
#[derive(Debug)]
pub struct Dataset {
    forms: Vec<Arc<InMemoryForm>>,
    index: HashMap<RecordId, usize>,
}

impl Dataset {
    /// Parse a dataset from its JSON definition
    pub fn from_json(json: &str) -> Result<Arc<Self>, DatasetError> {
        let def: DatasetDef = serde_json::from_str(json)?;
        if def.records.is_empty() {
            return Err(DatasetError::Empty);
        }

        let mut seen = HashSet::new();
        for record in &def.records {
            if !seen.insert(record.id) {
                return Err(DatasetError::DuplicateRecord(record.id.to_string()));
            }
        }

        let mut prepared = Vec::with_capacity(def.records.len());
        for record in def.records {
            for target in record
                .associations
                .iter()
                .flat_map(|f| f.groups.iter())
                .flat_map(|g| g.records.iter())
            {
                if !seen.contains(target) {
                    return Err(DatasetError::UnknownAssociation {
                        record: record.id.to_string(),
                        target: target.to_string(),
                    });
                }
            }

            let mut values = HashMap::new();
            for field in &record.fields {
                let value = StoredValue::from_json(&field.value, &field.input).map_err(
                    |reason| DatasetError::InvalidValue {
                        record: record.id.to_string(),
                        field: field.id.to_string(),
                        reason,
                    },
                )?;
                values.insert(field.id.clone(), value);
            }
            prepared.push((record, values));
        }

        let dataset = Arc::new_cyclic(|weak: &Weak<Dataset>| {
            let forms: Vec<Arc<InMemoryForm>> = prepared
                .into_iter()
                .map(|(record, values)| Arc::new(InMemoryForm::new(record, values, weak.clone())))
                .collect();
            let index = forms
                .iter()
                .enumerate()
                .map(|(i, form)| (form.id, i))
                .collect();
            Dataset { forms, index }
        });
        info!("Loaded dataset with {} record(s)", dataset.forms.len());
        Ok(dataset)
    }

    /// Read and parse a dataset file
    pub fn load(path: &Path) -> Result<Arc<Self>, DatasetError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn form(&self, id: &RecordId) -> Option<Arc<InMemoryForm>> {
        self.index.get(id).map(|&i| Arc::clone(&self.forms[i]))
    }

    pub fn forms(&self) -> &[Arc<InMemoryForm>] {
        &self.forms
    }

    /// The first record, which the demo opens on start
    pub fn first(&self) -> Option<Arc<InMemoryForm>> {
        self.forms.first().cloned()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    pub(crate) const HYDRANT_ID: &str = "6f1c2a64-58a4-4c1e-9b5e-0c1f8f6b1a01";
    pub(crate) const VALVE_ID: &str = "0b7e6d3e-2f0a-4b8c-8e57-9d5b3c2e4f02";

    pub(crate) fn sample_json() -> String {
        format!(
            r#"{{
            "records": [
                {{
                    "id": "{HYDRANT_ID}",
                    "title": "Hydrant 1042",
                    "fields": [
                        {{"id": "name", "label": "Name", "input": {{"kind": "text_box"}}, "value": "Main St", "required": true}},
                        {{"id": "pressure", "label": "Pressure", "input": {{"kind": "text_box"}}, "value": 5.0}},
                        {{"id": "inspected", "label": "Inspected", "input": {{"kind": "date_time", "includes_time": true}}, "value": "2024-03-05T14:30:00+00:00"}},
                        {{"id": "status", "label": "Status", "input": {{"kind": "combo_box", "choices": ["Active", "Retired"]}}, "value": "Active"}},
                        {{"id": "asset", "label": "Asset ID", "input": {{"kind": "read_only"}}, "value": "HY-1042"}}
                    ],
                    "associations": [
                        {{"filter": "Connectivity", "groups": [{{"name": "Valves", "records": ["{VALVE_ID}"]}}]}}
                    ]
                }},
                {{
                    "id": "{VALVE_ID}",
                    "title": "Valve 77",
                    "fields": [
                        {{"id": "diameter", "label": "Diameter", "value": 8}}
                    ]
                }}
            ]
        }}"#
        )
    }

    pub(crate) fn sample_dataset() -> Arc<Dataset> {
        Dataset::from_json(&sample_json()).unwrap()
    }

    fn hydrant(dataset: &Dataset) -> Arc<InMemoryForm> {
        dataset.form(&RecordId(HYDRANT_ID.parse().unwrap())).unwrap()
    }

    #[test]
    fn test_load_sample() {
        let dataset = sample_dataset();
        assert_eq!(dataset.forms().len(), 2);
        assert_eq!(dataset.first().unwrap().title(), "Hydrant 1042");
    }

    #[test]
    fn test_numbers_are_preformatted() {
        let dataset = sample_dataset();
        let form = hydrant(&dataset);
        let pressure = form.element(&FieldId::new("pressure")).unwrap();
        assert_eq!(pressure.value, FieldValue::Other("5".to_string()));
    }

    #[test]
    fn test_choice_value_formats_as_label() {
        let dataset = sample_dataset();
        let form = hydrant(&dataset);
        form.set_value(&FieldId::new("status"), FieldInput::Choice(1));
        let status = form.element(&FieldId::new("status")).unwrap();
        assert_eq!(status.value, FieldValue::Other("Retired".to_string()));
    }

    #[test]
    fn test_read_only_input_is_not_editable() {
        let dataset = sample_dataset();
        let form = hydrant(&dataset);
        let asset = form.element(&FieldId::new("asset")).unwrap();
        assert!(!asset.is_editable);
    }

    #[test]
    fn test_set_value_notifies_subscribers() {
        let dataset = sample_dataset();
        let form = hydrant(&dataset);
        let id = FieldId::new("name");
        let rx = form.subscribe(&id).unwrap();
        assert!(!rx.has_changed().unwrap());

        form.set_value(&id, FieldInput::Text("Elm St".to_string()));
        assert!(rx.has_changed().unwrap());
        assert!(form.has_edits());
    }

    #[test]
    fn test_setting_same_value_does_not_notify() {
        let dataset = sample_dataset();
        let form = hydrant(&dataset);
        let id = FieldId::new("name");
        let rx = form.subscribe(&id).unwrap();

        form.set_value(&id, FieldInput::Text("Main St".to_string()));
        assert!(!rx.has_changed().unwrap());
        assert!(!form.has_edits());
    }

    #[test]
    fn test_required_field_produces_validation_error() {
        let dataset = sample_dataset();
        let form = hydrant(&dataset);
        form.set_value(&FieldId::new("name"), FieldInput::Text(String::new()));

        let errors = form.validation_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, FieldId::new("name"));
        assert_eq!(errors[0].message, "Name is required");
    }

    #[test]
    fn test_discard_restores_committed_values() {
        let dataset = sample_dataset();
        let form = hydrant(&dataset);
        let id = FieldId::new("name");
        form.set_value(&id, FieldInput::Text("Elm St".to_string()));
        let rx = form.subscribe(&id).unwrap();

        form.discard_edits();

        assert!(!form.has_edits());
        assert!(rx.has_changed().unwrap());
        assert_eq!(
            form.element(&id).unwrap().value,
            FieldValue::Other("Main St".to_string())
        );
    }

    #[tokio::test]
    async fn test_finish_editing_commits() {
        let dataset = sample_dataset();
        let form = hydrant(&dataset);
        form.set_value(&FieldId::new("name"), FieldInput::Text("Elm St".to_string()));

        form.finish_editing().await.unwrap();
        assert!(!form.has_edits());
    }

    #[tokio::test]
    async fn test_finish_editing_rejects_invalid_edits() {
        let dataset = sample_dataset();
        let form = hydrant(&dataset);
        form.set_value(&FieldId::new("name"), FieldInput::Text(String::new()));

        let err = form.finish_editing().await.unwrap_err();
        assert_eq!(
            err,
            SubmitError::Rejected("1 field(s) failed validation".to_string())
        );
        assert!(form.has_edits());
    }

    #[test]
    fn test_injected_submit_failure_is_used_once() {
        let dataset = sample_dataset();
        let form = hydrant(&dataset);
        form.fail_next_submit(SubmitError::Store("disk full".to_string()));

        let first = tokio_test::block_on(form.finish_editing());
        assert_eq!(first, Err(SubmitError::Store("disk full".to_string())));
        let second = tokio_test::block_on(form.finish_editing());
        assert_eq!(second, Ok(()));
    }

    #[test]
    fn test_association_filters_resolve_forms() {
        let dataset = sample_dataset();
        let form = hydrant(&dataset);
        let filters = form.association_filters();
        assert_eq!(filters.len(), 1);
        assert_eq!(filters[0].name, "Connectivity");
        assert_eq!(filters[0].association_count(), 1);
        let valve = &filters[0].groups[0].associations[0];
        assert_eq!(valve.title, "Valve 77");
        assert_eq!(valve.form.global_id(), RecordId(VALVE_ID.parse().unwrap()));
    }

    #[test]
    fn test_unknown_association_is_rejected() {
        let json = format!(
            r#"{{"records": [{{"id": "{HYDRANT_ID}", "title": "H", "associations": [
                {{"filter": "F", "groups": [{{"name": "G", "records": ["{VALVE_ID}"]}}]}}
            ]}}]}}"#
        );
        let err = Dataset::from_json(&json).unwrap_err();
        assert!(matches!(err, DatasetError::UnknownAssociation { .. }));
    }

    #[test]
    fn test_duplicate_record_is_rejected() {
        let json = format!(
            r#"{{"records": [{{"id": "{HYDRANT_ID}", "title": "A"}}, {{"id": "{HYDRANT_ID}", "title": "B"}}]}}"#
        );
        let err = Dataset::from_json(&json).unwrap_err();
        assert!(matches!(err, DatasetError::DuplicateRecord(_)));
    }

    #[test]
    fn test_invalid_date_is_rejected() {
        let json = format!(
            r#"{{"records": [{{"id": "{HYDRANT_ID}", "title": "A", "fields": [
                {{"id": "d", "label": "D", "input": {{"kind": "date_time"}}, "value": "yesterday"}}
            ]}}]}}"#
        );
        let err = Dataset::from_json(&json).unwrap_err();
        assert!(matches!(err, DatasetError::InvalidValue { .. }));
    }

    #[test]
    fn test_empty_dataset_is_rejected() {
        let err = Dataset::from_json(r#"{"records": []}"#).unwrap_err();
        assert!(matches!(err, DatasetError::Empty));
    }
}
