//! Records exchanged with the REST service
//!
//! A [`Record`] is a server-assigned `id` plus a loosely typed field map. On
//! read, reference fields arrive expanded (`{"id": 3, "nome": "..."}`); on
//! write only the bare id is sent.

use crate::schema::{EntityDescriptor, FieldDescriptor, FieldKind};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Server-assigned record identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(RecordId)
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        RecordId(id)
    }
}

/// A persisted record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    pub fn new(id: impl Into<RecordId>, fields: Map<String, Value>) -> Self {
        Self { id: id.into(), fields }
    }

    /// Build a record from a server JSON object.
    pub fn from_value(value: Value) -> Result<Self, String> {
        let Value::Object(mut fields) = value else {
            return Err(format!("expected a JSON object, got {}", type_name(&value)));
        };
        let id = match fields.remove("id") {
            Some(Value::Number(n)) => n.as_i64().ok_or_else(|| format!("invalid id {}", n))?,
            Some(other) => return Err(format!("id must be an integer, got {}", type_name(&other))),
            None => return Err("record has no id".to_string()),
        };
        Ok(Self { id: RecordId(id), fields })
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Field rendered as plain text; `null` and absent become empty.
    pub fn text(&self, key: &str) -> String {
        match self.fields.get(key) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    /// Id of a reference field, accepting the expanded object or a bare id.
    pub fn reference_id(&self, key: &str) -> Option<RecordId> {
        match self.fields.get(key)? {
            Value::Number(n) => n.as_i64().map(RecordId),
            Value::Object(obj) => obj.get("id").and_then(Value::as_i64).map(RecordId),
            _ => None,
        }
    }

    /// Display text embedded in an expanded reference (usually `nome`).
    pub fn reference_label(&self, key: &str) -> Option<String> {
        match self.fields.get(key)? {
            Value::Object(obj) => obj.get("nome").and_then(Value::as_str).map(str::to_string),
            _ => None,
        }
    }

    /// A field as shown to users: enum values by their label, references
    /// by the embedded name.
    pub fn display_value(&self, field: &FieldDescriptor) -> String {
        match field.kind {
            FieldKind::Enum(choices) => {
                let value = self.text(field.key);
                choices
                    .iter()
                    .find(|c| c.value == value)
                    .map(|c| c.label.to_string())
                    .unwrap_or(value)
            }
            FieldKind::Reference(_) => self
                .reference_label(field.key)
                .or_else(|| self.reference_id(field.key).map(|id| format!("#{}", id)))
                .unwrap_or_default(),
            _ => self.text(field.key),
        }
    }

    /// Label/value pairs of the descriptor's summary fields; empty values
    /// are skipped.
    pub fn summary(&self, descriptor: &EntityDescriptor) -> Vec<(&'static str, String)> {
        descriptor
            .summary_fields
            .iter()
            .filter_map(|key| descriptor.field(key))
            .map(|field| (field.label, self.display_value(field)))
            .filter(|(_, value)| !value.is_empty())
            .collect()
    }

    /// One-line label for lists: the display field, or the reference labels
    /// joined for entities without one.
    pub fn label(&self, descriptor: &EntityDescriptor) -> String {
        if let Some(display) = descriptor.display_field {
            let text = self.text(display);
            if !text.is_empty() {
                return text;
            }
        }
        let parts: Vec<String> = descriptor
            .fields
            .iter()
            .filter(|f| matches!(f.kind, FieldKind::Reference(_)))
            .filter_map(|f| self.reference_label(f.key))
            .collect();
        if parts.is_empty() {
            format!("#{}", self.id)
        } else {
            parts.join(" / ")
        }
    }

    /// The body an unchanged resubmission would send: every declared field,
    /// references collapsed to their bare id.
    pub fn to_wire(&self, descriptor: &EntityDescriptor) -> Map<String, Value> {
        descriptor
            .fields
            .iter()
            .map(|f| {
                let value = match f.kind {
                    FieldKind::Reference(_) => {
                        self.reference_id(f.key).map(|id| Value::from(id.0)).unwrap_or(Value::Null)
                    }
                    _ => self.fields.get(f.key).cloned().unwrap_or(Value::Null),
                };
                (f.key.to_string(), value)
            })
            .collect()
    }
}

pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
