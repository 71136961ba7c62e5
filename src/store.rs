use crate::errors::{AppError, AppResult};
use crate::models::{Amount, ClientRecord, ClientRecordInput};
use crate::validation::validate_records;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::sync::Arc;

const SEED_DATASET: &str = include_str!("../data/clients.json");

/// Accepts either a bare array of records or `{ "clients": [...] }`.
fn dataset_inputs(document: Value) -> AppResult<Vec<ClientRecordInput>> {
    let records = match document {
        Value::Array(items) => Value::Array(items),
        Value::Object(mut map) => map
            .remove("clients")
            .ok_or_else(|| AppError::Parse("dataset object has no clients array".to_string()))?,
        _ => return Err(AppError::Parse("dataset must be an array or an object".to_string())),
    };
    Ok(serde_json::from_value(records)?)
}

/// Immutable, validated record sequence. Clones share one snapshot; edits
/// go through `replace`, which builds a new store and leaves existing
/// snapshots untouched.
#[derive(Debug, Clone)]
pub struct RecordStore {
    records: Arc<[ClientRecord]>,
    tolerance: Amount,
}

impl RecordStore {
    pub fn new(inputs: Vec<ClientRecordInput>, tolerance: Amount) -> AppResult<Self> {
        let records = validate_records(inputs, tolerance)?;
        tracing::debug!(records = records.len(), tolerance, "record store initialised");
        Ok(Self {
            records: records.into(),
            tolerance,
        })
    }

    pub fn from_records(records: Vec<ClientRecord>, tolerance: Amount) -> AppResult<Self> {
        Self::new(records.into_iter().map(ClientRecordInput::from).collect(), tolerance)
    }

    pub fn empty() -> Self {
        Self {
            records: Vec::<ClientRecord>::new().into(),
            tolerance: 0,
        }
    }

    /// The dataset the dashboard ships with.
    pub fn seeded(tolerance: Amount) -> AppResult<Self> {
        Self::parse_json(SEED_DATASET, tolerance)
    }

    pub fn parse_json(raw: &str, tolerance: Amount) -> AppResult<Self> {
        let document: Value = serde_json::from_str(raw)?;
        Self::new(dataset_inputs(document)?, tolerance)
    }

    pub fn parse_yaml(raw: &str, tolerance: Amount) -> AppResult<Self> {
        let document: Value = serde_yaml::from_str(raw)?;
        Self::new(dataset_inputs(document)?, tolerance)
    }

    /// Reads a `.json`, `.yaml` or `.yml` dataset: either a bare array of
    /// records or an object with a `clients` array.
    pub fn load(path: &Path, tolerance: Amount) -> AppResult<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|error| AppError::Io(format!("{}: {}", path.to_string_lossy(), error)))?;
        let store = match path.extension().and_then(|value| value.to_str()) {
            Some("json") => Self::parse_json(&raw, tolerance)?,
            Some("yaml") | Some("yml") => Self::parse_yaml(&raw, tolerance)?,
            _ => {
                return Err(AppError::Parse(format!(
                    "unsupported dataset format: {}",
                    path.to_string_lossy()
                )))
            }
        };
        tracing::info!(path = %path.to_string_lossy(), records = store.len(), "loaded client dataset");
        Ok(store)
    }

    pub fn replace(&self, inputs: Vec<ClientRecordInput>) -> AppResult<Self> {
        Self::new(inputs, self.tolerance)
    }

    pub fn records(&self) -> &[ClientRecord] {
        &self.records
    }

    pub fn get(&self, id: &str) -> AppResult<&ClientRecord> {
        self.records
            .iter()
            .find(|record| record.id == id)
            .ok_or_else(|| AppError::NotFound(format!("client record {}", id)))
    }

    pub fn tolerance(&self) -> Amount {
        self.tolerance
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
