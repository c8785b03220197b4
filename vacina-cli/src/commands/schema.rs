//! Registry introspection: `entities` and `schema`.

use std::fmt::Write;
use vacina_core::schema::{Entity, SchemaRegistry};

pub fn entities() -> String {
    let registry = SchemaRegistry::new();
    let mut out = String::new();
    for descriptor in registry.descriptors() {
        let _ = writeln!(
            out,
            "{:<28} {:<30} {}",
            descriptor.name,
            format!("{}/", descriptor.collection_path),
            descriptor.title
        );
    }
    out
}

pub fn fields(entity: Entity) -> String {
    let descriptor = entity.descriptor();
    let mut out = format!("{} ({}/)\n", descriptor.title, descriptor.collection_path);
    for field in descriptor.fields {
        let _ = write!(
            out,
            "  {:<24} {:<40} {:<9} {}",
            field.key,
            field.kind.to_string(),
            if field.required { "required" } else { "optional" },
            field.label
        );
        if let Some(hint) = field.placeholder {
            let _ = write!(out, " (ex: {})", hint);
        }
        out.push('\n');
        let choices = field.kind.choices();
        if !choices.is_empty() {
            let shown: Vec<String> = choices.iter().map(|c| format!("{} ({})", c.value, c.label)).collect();
            let _ = writeln!(out, "    choices: {}", shown.join(", "));
        }
    }
    let dependents = SchemaRegistry::new().dependents(entity);
    if !dependents.is_empty() {
        let names: Vec<String> =
            dependents.iter().map(|r| format!("{}.{}", r.source.name(), r.field)).collect();
        let _ = writeln!(out, "referenced by: {}", names.join(", "));
    }
    out
}
