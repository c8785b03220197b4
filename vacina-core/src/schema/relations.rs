//! Reference relations between entities
//!
//! Foreign keys are declared on the descriptors as `reference` fields. This
//! module indexes them in both directions and checks that the declared schema
//! is internally consistent.

use super::{Entity, EntityDescriptor, FieldKind};
use std::collections::{BTreeMap, HashSet};

/// One reference field seen from the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceSpec {
    /// Entity declaring the field
    pub source: Entity,
    pub field: &'static str,
    pub target: Entity,
}

/// Index of all descriptors and their references.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    descriptors: Vec<&'static EntityDescriptor>,
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaRegistry {
    /// Registry over the built-in entities.
    pub fn new() -> Self {
        Self::with_descriptors(Entity::ALL.iter().map(|e| e.descriptor()).collect())
    }

    pub fn with_descriptors(descriptors: Vec<&'static EntityDescriptor>) -> Self {
        Self { descriptors }
    }

    pub fn descriptors(&self) -> &[&'static EntityDescriptor] {
        &self.descriptors
    }

    pub fn get(&self, entity: Entity) -> Option<&'static EntityDescriptor> {
        self.descriptors.iter().copied().find(|d| d.entity == entity)
    }

    /// Every reference field, in registry order.
    pub fn references(&self) -> Vec<ReferenceSpec> {
        self.descriptors
            .iter()
            .flat_map(|d| {
                d.fields.iter().filter_map(move |f| {
                    f.kind.target().map(|target| ReferenceSpec {
                        source: d.entity,
                        field: f.key,
                        target,
                    })
                })
            })
            .collect()
    }

    /// Reference fields elsewhere that point at `entity`.
    pub fn dependents(&self, entity: Entity) -> Vec<ReferenceSpec> {
        self.references().into_iter().filter(|r| r.target == entity).collect()
    }

    /// Entity -> entities it references.
    pub fn dependency_graph(&self) -> BTreeMap<Entity, Vec<Entity>> {
        self.descriptors.iter().map(|d| (d.entity, d.referenced_entities())).collect()
    }

    /// Check the declared schema for consistency.
    ///
    /// Field keys must be unique and never `id`, enums must offer at least one
    /// choice, every reference target must be registered with a
    /// `display_field` so pickers can label its records, and summary fields
    /// must be declared.
    pub fn validate_integrity(&self) -> Result<(), String> {
        for d in &self.descriptors {
            let mut seen = HashSet::new();
            for field in d.fields {
                if field.key == "id" {
                    return Err(format!("{}.id is server-assigned and cannot be declared", d.name));
                }
                if !seen.insert(field.key) {
                    return Err(format!("{}.{} is declared twice", d.name, field.key));
                }
                match field.kind {
                    FieldKind::Enum(choices) if choices.is_empty() => {
                        return Err(format!("{}.{} has no enum choices", d.name, field.key));
                    }
                    FieldKind::Reference(target) => {
                        let Some(target_desc) = self.get(target) else {
                            return Err(format!(
                                "{}.{} references unknown entity {}",
                                d.name, field.key, target
                            ));
                        };
                        if target_desc.display_field.is_none() {
                            return Err(format!(
                                "{}.{} references {} which has no display field",
                                d.name, field.key, target
                            ));
                        }
                    }
                    _ => {}
                }
            }
            if let Some(display) = d.display_field {
                if d.field(display).is_none() {
                    return Err(format!("{} display field {} is not declared", d.name, display));
                }
            }
            if let Some(key) = d.summary_fields.iter().find(|key| d.field(key).is_none()) {
                return Err(format!("{} summary field {} is not declared", d.name, key));
            }
        }
        Ok(())
    }
}

/// Validate the built-in schema.
pub fn validate_integrity() -> Result<(), String> {
    SchemaRegistry::new().validate_integrity()
}
