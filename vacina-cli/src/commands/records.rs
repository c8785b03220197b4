//! Record commands, each driving one controller against the service.

use crate::terminal::{self, TerminalNavigator};
use anyhow::{bail, Context, Result};
use std::fmt::Write;
use std::sync::Arc;
use vacina_core::client::{ApiClient, ResourceProvider};
use vacina_core::config::VacinaConfig;
use vacina_core::controller::{Collaborators, FormController, FormStatus, ListController, ListStatus, Route};
use vacina_core::model::{Record, RecordId};
use vacina_core::resolver::{self, ReferenceOptions};
use vacina_core::schema::{Entity, EntityDescriptor};
use vacina_core::Error;

fn connect(config: &VacinaConfig) -> Result<Arc<ApiClient>> {
    let api = ApiClient::new(&config.client).context("Failed to create API client")?;
    log::debug!("using service at {}", api.base_url());
    Ok(Arc::new(api))
}

pub async fn list(config: &VacinaConfig, entity: Entity, json: bool) -> Result<()> {
    let api = connect(config)?;
    let (ui, _) = terminal::collaborators(false);
    let controller = ListController::new(entity, api.as_ref(), ui);

    if let ListStatus::Error(e) = controller.on_activate().await {
        return Err(e.into());
    }
    let records = controller.records();
    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        print!("{}", render_records(entity.descriptor(), &records));
    }
    Ok(())
}

pub async fn pickers(config: &VacinaConfig, entity: Entity) -> Result<()> {
    let api = connect(config)?;
    let descriptor = entity.descriptor();
    let options = resolver::resolve(api.as_ref(), descriptor).await?;
    print!("{}", render_pickers(descriptor, &options));
    Ok(())
}

pub async fn create(config: &VacinaConfig, entity: Entity, set: &[(String, String)]) -> Result<()> {
    let api = connect(config)?;
    let (ui, navigator) = terminal::collaborators(false);
    let form = FormController::create(entity, api.clone(), ui.clone());
    fill_and_submit(&form, set, &api, &navigator, ui).await
}

pub async fn edit(
    config: &VacinaConfig,
    entity: Entity,
    id: RecordId,
    set: &[(String, String)],
) -> Result<()> {
    let api = connect(config)?;
    let record = api.resource(entity).get(id).await?;
    let (ui, navigator) = terminal::collaborators(false);
    let form = FormController::edit(entity, record, api.clone(), ui.clone());
    fill_and_submit(&form, set, &api, &navigator, ui).await
}

pub async fn delete(config: &VacinaConfig, entity: Entity, id: RecordId, yes: bool) -> Result<()> {
    let api = connect(config)?;
    let (ui, _) = terminal::collaborators(yes);
    let controller = ListController::new(entity, api.as_ref(), ui);

    match controller.request_delete(id).await {
        Ok(()) => {
            println!("{}: {} registros restantes", entity.descriptor().title, controller.records().len());
            Ok(())
        }
        Err(Error::ConfirmationDeclined) => {
            println!("Cancelado.");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

async fn fill_and_submit(
    form: &FormController,
    set: &[(String, String)],
    api: &Arc<ApiClient>,
    navigator: &TerminalNavigator,
    ui: Collaborators,
) -> Result<()> {
    if let FormStatus::ReferenceError(e) = form.initialize().await {
        return Err(e).context("Failed to load reference data");
    }
    for (key, value) in set {
        form.set(key, value)?;
    }

    match form.submit().await {
        FormStatus::Success(saved) => {
            println!("#{} {}", saved.id, saved.label(form.descriptor()));
        }
        FormStatus::ValidationFailed { field, message, .. } => bail!("{}: {}", field, message),
        FormStatus::SubmitError(e) => return Err(e.into()),
        other => bail!("form was not submitted ({:?})", other),
    }

    // Mount the list screen the form navigated back to.
    if let Some(Route::List(entity)) = navigator.take() {
        let list = ListController::new(entity, api.as_ref(), ui);
        if let ListStatus::Ready = list.on_activate().await {
            println!("{}: {} registros", entity.descriptor().title, list.records().len());
        }
    }
    Ok(())
}

fn render_records(descriptor: &EntityDescriptor, records: &[Record]) -> String {
    if records.is_empty() {
        return format!("Nenhum registro em {}.\n", descriptor.title);
    }
    let mut out = String::new();
    for record in records {
        let _ = writeln!(out, "#{:<6} {}", record.id.0, record.label(descriptor));
        for (label, value) in record.summary(descriptor) {
            let _ = writeln!(out, "        {}: {}", label, value);
        }
    }
    out
}

fn render_pickers(descriptor: &EntityDescriptor, options: &ReferenceOptions) -> String {
    let mut out = String::new();
    for field in descriptor.reference_fields() {
        let target = field.kind.target().map(Entity::name).unwrap_or_default();
        let _ = writeln!(out, "{} -> {}", field.key, target);
        for option in options.options(field.key) {
            let _ = writeln!(out, "  #{:<6} {}", option.id.0, option.label);
        }
    }
    if out.is_empty() {
        out = format!("{} has no reference fields\n", descriptor.name);
    }
    out
}
