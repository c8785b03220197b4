//! Declarative entity schema
//!
//! Every managed record kind is described once, as static data, by an
//! [`EntityDescriptor`]. The resource client, the reference resolver and both
//! controllers are driven from these descriptors instead of per-entity code.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod registry;
pub mod relations;

pub use registry::descriptor;
pub use relations::{validate_integrity, SchemaRegistry};

/// The nine record kinds managed by the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Entity {
    Usuarios,
    Medicos,
    Vacinas,
    UnidadesSaude,
    EstoquesVacina,
    Agendamentos,
    AplicacoesVacinais,
    CampanhasVacinais,
    CampanhaVacinalVacina,
}

impl Entity {
    /// All entities, in the order the management hub lists them.
    pub const ALL: [Entity; 9] = [
        Entity::Usuarios,
        Entity::Medicos,
        Entity::Vacinas,
        Entity::UnidadesSaude,
        Entity::EstoquesVacina,
        Entity::Agendamentos,
        Entity::AplicacoesVacinais,
        Entity::CampanhasVacinais,
        Entity::CampanhaVacinalVacina,
    ];

    /// Stable name, identical to the REST collection identifier.
    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    pub fn descriptor(self) -> &'static EntityDescriptor {
        registry::descriptor(self)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a string names no known entity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown entity: {0}")]
pub struct UnknownEntity(pub String);

impl FromStr for Entity {
    type Err = UnknownEntity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().trim_matches('/');
        Entity::ALL
            .iter()
            .copied()
            .find(|e| e.name() == wanted || e.descriptor().collection_path == wanted)
            .ok_or_else(|| UnknownEntity(s.to_string()))
    }
}

/// One allowed literal of an enum field with its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumChoice {
    pub value: &'static str,
    pub label: &'static str,
}

impl EnumChoice {
    pub const fn new(value: &'static str, label: &'static str) -> Self {
        Self { value, label }
    }
}

/// Semantic type of a field; decides which input parser applies at submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Decimal,
    /// `AAAA-MM-DD`
    Date,
    /// `AAAA-MM-DDTHH:MM`
    DateTime,
    Enum(&'static [EnumChoice]),
    Reference(Entity),
}

impl FieldKind {
    pub fn choices(&self) -> &'static [EnumChoice] {
        match self {
            FieldKind::Enum(choices) => choices,
            _ => &[],
        }
    }

    pub fn target(&self) -> Option<Entity> {
        match self {
            FieldKind::Reference(target) => Some(*target),
            _ => None,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Text => f.write_str("text"),
            FieldKind::Integer => f.write_str("integer"),
            FieldKind::Decimal => f.write_str("decimal"),
            FieldKind::Date => f.write_str("date"),
            FieldKind::DateTime => f.write_str("datetime"),
            FieldKind::Enum(choices) => {
                let values: Vec<&str> = choices.iter().map(|c| c.value).collect();
                write!(f, "enum({})", values.join("|"))
            }
            FieldKind::Reference(target) => write!(f, "reference({})", target.name()),
        }
    }
}

/// Description of a single field of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Wire name, unique within the entity
    pub key: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Human label shown next to the input
    pub label: &'static str,
    /// Input hint, e.g. an example value
    pub placeholder: Option<&'static str>,
}

impl FieldDescriptor {
    pub const fn new(key: &'static str, kind: FieldKind, label: &'static str) -> Self {
        Self { key, kind, required: false, label, placeholder: None }
    }

    pub const fn text(key: &'static str, label: &'static str) -> Self {
        Self::new(key, FieldKind::Text, label)
    }

    pub const fn integer(key: &'static str, label: &'static str) -> Self {
        Self::new(key, FieldKind::Integer, label)
    }

    pub const fn decimal(key: &'static str, label: &'static str) -> Self {
        Self::new(key, FieldKind::Decimal, label)
    }

    pub const fn date(key: &'static str, label: &'static str) -> Self {
        Self::new(key, FieldKind::Date, label)
    }

    pub const fn datetime(key: &'static str, label: &'static str) -> Self {
        Self::new(key, FieldKind::DateTime, label)
    }

    pub const fn choice(
        key: &'static str,
        choices: &'static [EnumChoice],
        label: &'static str,
    ) -> Self {
        Self::new(key, FieldKind::Enum(choices), label)
    }

    pub const fn reference(key: &'static str, target: Entity, label: &'static str) -> Self {
        Self::new(key, FieldKind::Reference(target), label)
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn placeholder(mut self, hint: &'static str) -> Self {
        self.placeholder = Some(hint);
        self
    }

    pub fn is_reference(&self) -> bool {
        matches!(self.kind, FieldKind::Reference(_))
    }
}

/// Static, process-wide description of one entity.
#[derive(Debug, PartialEq, Eq)]
pub struct EntityDescriptor {
    pub entity: Entity,
    pub name: &'static str,
    /// REST collection identifier, joined to the base URL
    pub collection_path: &'static str,
    /// Title of the list screen
    pub title: &'static str,
    /// Field used as the record's label in pickers and lists
    pub display_field: Option<&'static str>,
    /// Fields shown under the label on a list card
    pub summary_fields: &'static [&'static str],
    /// Ordered fields; the order is also the request body order
    pub fields: &'static [FieldDescriptor],
}

impl EntityDescriptor {
    pub fn field(&self, key: &str) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn reference_fields(&self) -> impl Iterator<Item = &'static FieldDescriptor> {
        self.fields.iter().filter(|f| f.is_reference())
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &'static FieldDescriptor> {
        self.fields.iter().filter(|f| f.required)
    }

    /// Distinct referenced entities, in first-use order.
    pub fn referenced_entities(&self) -> Vec<Entity> {
        let mut targets = Vec::new();
        for target in self.fields.iter().filter_map(|f| f.kind.target()) {
            if !targets.contains(&target) {
                targets.push(target);
            }
        }
        targets
    }
}
