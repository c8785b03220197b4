//! Reference resolver
//!
//! Populates the pickers of a form: for every reference field of an entity,
//! the target collection is listed and turned into `(id, label)` options.
//! All target lists are fetched concurrently and joined; if any fetch fails
//! the whole resolution fails and no options are returned.

use crate::client::ResourceProvider;
use crate::error::Result;
use crate::model::{Record, RecordId};
use crate::schema::{Entity, EntityDescriptor};
use futures::future::try_join_all;
use std::collections::HashMap;

/// One selectable record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerOption {
    pub id: RecordId,
    pub label: String,
}

impl PickerOption {
    pub fn from_record(record: &Record, target: &EntityDescriptor) -> Self {
        let label = target
            .display_field
            .map(|field| record.text(field))
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| format!("#{}", record.id));
        Self { id: record.id, label }
    }
}

/// Options per reference field, each in the target's server order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceOptions {
    by_field: HashMap<&'static str, Vec<PickerOption>>,
}

impl ReferenceOptions {
    pub fn options(&self, field: &str) -> &[PickerOption] {
        self.by_field.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, field: &str, id: RecordId) -> bool {
        self.options(field).iter().any(|o| o.id == id)
    }

    pub fn label(&self, field: &str, id: RecordId) -> Option<&str> {
        self.options(field).iter().find(|o| o.id == id).map(|o| o.label.as_str())
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.by_field.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.by_field.is_empty()
    }
}

/// Fetch every referenced collection of `descriptor` in parallel.
///
/// A target used by several fields is listed once.
pub async fn resolve(
    provider: &dyn ResourceProvider,
    descriptor: &'static EntityDescriptor,
) -> Result<ReferenceOptions> {
    let targets = descriptor.referenced_entities();
    if targets.is_empty() {
        return Ok(ReferenceOptions::default());
    }
    log::debug!("{}: resolving references {:?}", descriptor.name, targets);

    let fetches = targets.iter().map(|&target| {
        let resource = provider.resource(target);
        async move { resource.list().await.map(|records| (target, records)) }
    });
    let lists: HashMap<Entity, Vec<Record>> = try_join_all(fetches)
        .await
        .inspect_err(|e| log::warn!("{}: reference resolution failed: {}", descriptor.name, e))?
        .into_iter()
        .collect();

    let mut by_field = HashMap::new();
    for field in descriptor.reference_fields() {
        let Some(target) = field.kind.target() else { continue };
        let target_desc = target.descriptor();
        let options = lists
            .get(&target)
            .map(|records| records.iter().map(|r| PickerOption::from_record(r, target_desc)).collect())
            .unwrap_or_default();
        by_field.insert(field.key, options);
    }
    Ok(ReferenceOptions { by_field })
}
