//! Create/edit form controller
//!
//! Lifecycle: `LoadingReferences -> Ready -> Submitting -> Success`, with
//! `ValidationFailed` and `SubmitError` returning to an editable form and
//! `ReferenceError` when the pickers could not be populated.
//!
//! Inputs are kept per field in descriptor order. The request body is built
//! in that same order with numeric fields parsed, references collapsed to
//! bare ids and empty optional numerics/references sent as `null`. In edit
//! mode a text field that was `null` and is still empty goes back as `null`.

use super::{lock, Collaborators, Notice, Route};
use crate::client::{Body, ResourceProvider};
use crate::error::{Error, NON_FIELD_ERRORS};
use crate::model::{Record, RecordId};
use crate::resolver::{self, PickerOption, ReferenceOptions};
use crate::schema::{Entity, EntityDescriptor, FieldDescriptor, FieldKind};
use serde_json::Value;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
pub enum FormMode {
    Create,
    /// Editing the record with this id; every field is seeded from it.
    Edit(Record),
}

impl FormMode {
    pub fn is_create(&self) -> bool {
        matches!(self, FormMode::Create)
    }
}

/// Value held by one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldInput {
    /// Text, numeric, date and datetime fields keep the raw typed text.
    Text(String),
    Choice(String),
    Reference(Option<RecordId>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormStatus {
    LoadingReferences,
    ReferenceError(Error),
    Ready,
    Submitting,
    /// Saved; carries the record as returned by the server.
    Success(Record),
    /// Rejected locally (missing fields) or by the server.
    ValidationFailed {
        field: String,
        message: String,
        missing: Vec<String>,
    },
    SubmitError(Error),
}

impl FormStatus {
    /// Whether inputs can be edited and the form submitted.
    pub fn is_editable(&self) -> bool {
        matches!(
            self,
            FormStatus::Ready | FormStatus::ValidationFailed { .. } | FormStatus::SubmitError(_)
        )
    }
}

/// Rejected input change.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("{entity} has no field '{field}'")]
    UnknownField { entity: Entity, field: String },

    #[error("field '{field}' is {kind}, not {expected}")]
    WrongKind { field: String, kind: String, expected: &'static str },

    #[error("'{value}' is not a valid choice for '{field}' (expected one of {choices})")]
    InvalidChoice { field: String, value: String, choices: String },

    #[error("#{id} is not an option for '{field}'")]
    UnknownReference { field: String, id: RecordId },

    #[error("'{value}' is not a record id")]
    InvalidId { value: String },
}

struct FormState {
    status: FormStatus,
    inputs: Vec<FieldInput>,
    references: Option<ReferenceOptions>,
    /// Bumped by every `initialize`; only the latest load may land.
    generation: u64,
}

pub struct FormController {
    descriptor: &'static EntityDescriptor,
    mode: FormMode,
    provider: Arc<dyn ResourceProvider>,
    ui: Collaborators,
    state: Mutex<FormState>,
}

impl FormController {
    pub fn create(entity: Entity, provider: Arc<dyn ResourceProvider>, ui: Collaborators) -> Self {
        Self::new(entity, FormMode::Create, provider, ui)
    }

    pub fn edit(
        entity: Entity,
        record: Record,
        provider: Arc<dyn ResourceProvider>,
        ui: Collaborators,
    ) -> Self {
        Self::new(entity, FormMode::Edit(record), provider, ui)
    }

    pub fn new(
        entity: Entity,
        mode: FormMode,
        provider: Arc<dyn ResourceProvider>,
        ui: Collaborators,
    ) -> Self {
        let descriptor = entity.descriptor();
        let inputs = descriptor.fields.iter().map(|field| initial_input(field, &mode)).collect();
        Self {
            descriptor,
            mode,
            provider,
            ui,
            state: Mutex::new(FormState {
                status: FormStatus::LoadingReferences,
                inputs,
                references: None,
                generation: 0,
            }),
        }
    }

    pub fn descriptor(&self) -> &'static EntityDescriptor {
        self.descriptor
    }

    pub fn status(&self) -> FormStatus {
        lock(&self.state).status.clone()
    }

    pub fn value(&self, key: &str) -> Option<FieldInput> {
        let index = self.index_of(key).ok()?;
        Some(lock(&self.state).inputs[index].clone())
    }

    /// Picker options for a reference field; empty until references resolve.
    pub fn options(&self, key: &str) -> Vec<PickerOption> {
        lock(&self.state)
            .references
            .as_ref()
            .map(|refs| refs.options(key).to_vec())
            .unwrap_or_default()
    }

    /// Populate every picker before the form becomes interactive.
    ///
    /// Ignored while a submit is in flight. When called again before an
    /// earlier load finished, the earlier result is dropped.
    pub async fn initialize(&self) -> FormStatus {
        let generation = {
            let mut state = lock(&self.state);
            if state.status == FormStatus::Submitting {
                log::warn!("{}: initialize ignored while submitting", self.descriptor.name);
                return state.status.clone();
            }
            state.generation += 1;
            state.status = FormStatus::LoadingReferences;
            state.generation
        };
        let resolved = resolver::resolve(self.provider.as_ref(), self.descriptor).await;

        let mut state = lock(&self.state);
        if state.generation != generation {
            log::debug!(
                "{}: dropping reference load {} superseded by {}",
                self.descriptor.name,
                generation,
                state.generation
            );
            return state.status.clone();
        }
        match resolved {
            Ok(options) => {
                state.references = Some(options);
                state.status = FormStatus::Ready;
            }
            Err(e) => {
                state.status = FormStatus::ReferenceError(e);
                drop(state);
                self.ui.notifier.notify(Notice::error(
                    "Erro",
                    "Falha ao carregar dados para o formulário.",
                ));
                return self.status();
            }
        }
        state.status.clone()
    }

    /// Set a text, numeric, date or datetime field.
    pub fn set_text(&self, key: &str, value: impl Into<String>) -> Result<(), InputError> {
        let (index, field) = self.field_at(key)?;
        if matches!(field.kind, FieldKind::Enum(_) | FieldKind::Reference(_)) {
            return Err(wrong_kind(field, "free text"));
        }
        self.store(index, FieldInput::Text(value.into()));
        Ok(())
    }

    /// Pick one of an enum field's declared literals.
    pub fn select_choice(&self, key: &str, value: &str) -> Result<(), InputError> {
        let (index, field) = self.field_at(key)?;
        let FieldKind::Enum(choices) = field.kind else {
            return Err(wrong_kind(field, "an enumeration"));
        };
        if !choices.iter().any(|c| c.value == value) {
            let listed: Vec<&str> = choices.iter().map(|c| c.value).collect();
            return Err(InputError::InvalidChoice {
                field: field.key.to_string(),
                value: value.to_string(),
                choices: listed.join(", "),
            });
        }
        self.store(index, FieldInput::Choice(value.to_string()));
        Ok(())
    }

    /// Pick a referenced record, or clear the picker with `None`.
    ///
    /// Once references are resolved only offered ids are accepted.
    pub fn select_reference(&self, key: &str, id: Option<RecordId>) -> Result<(), InputError> {
        let (index, field) = self.field_at(key)?;
        if !field.is_reference() {
            return Err(wrong_kind(field, "a reference"));
        }
        let mut state = lock(&self.state);
        if let (Some(id), Some(refs)) = (id, state.references.as_ref()) {
            if !refs.contains(field.key, id) {
                return Err(InputError::UnknownReference { field: field.key.to_string(), id });
            }
        }
        state.inputs[index] = FieldInput::Reference(id);
        Ok(())
    }

    /// Set any field from its textual form, dispatching on the field kind.
    /// An empty value clears a reference.
    pub fn set(&self, key: &str, raw: &str) -> Result<(), InputError> {
        let (_, field) = self.field_at(key)?;
        match field.kind {
            FieldKind::Enum(_) => self.select_choice(key, raw),
            FieldKind::Reference(_) if raw.trim().is_empty() => self.select_reference(key, None),
            FieldKind::Reference(_) => {
                let id = raw
                    .parse::<RecordId>()
                    .map_err(|_| InputError::InvalidId { value: raw.to_string() })?;
                self.select_reference(key, Some(id))
            }
            _ => self.set_text(key, raw),
        }
    }

    /// Validate, build the body and send it.
    ///
    /// A submit while another is in flight, or before references resolved,
    /// is ignored and returns the current status.
    pub async fn submit(&self) -> FormStatus {
        let body = {
            let mut state = lock(&self.state);
            if !state.status.is_editable() {
                log::warn!(
                    "{}: submit ignored while form is {:?}",
                    self.descriptor.name,
                    state.status
                );
                return state.status.clone();
            }
            match build_body(self.descriptor, &state.inputs, &self.mode) {
                Ok(body) => {
                    state.status = FormStatus::Submitting;
                    body
                }
                Err(missing) => {
                    let message = format!("Campos obrigatórios: {}", missing.join(", "));
                    state.status = FormStatus::ValidationFailed {
                        field: missing[0].clone(),
                        message: message.clone(),
                        missing,
                    };
                    let status = state.status.clone();
                    drop(state);
                    self.ui.notifier.notify(Notice::error("Erro", message));
                    return status;
                }
            }
        };

        let resource = self.provider.resource(self.descriptor.entity);
        let result = match &self.mode {
            FormMode::Create => resource.create(&body).await,
            FormMode::Edit(record) => resource.update(record.id, &body).await,
        };

        let status = match result {
            Ok(saved) => {
                log::info!("{}: saved #{}", self.descriptor.name, saved.id);
                FormStatus::Success(saved)
            }
            Err(Error::Validation { field, message }) => {
                log::warn!("{}: rejected, {}: {}", self.descriptor.name, field, message);
                FormStatus::ValidationFailed { field, message, missing: Vec::new() }
            }
            Err(e) => {
                log::error!("{}: save failed: {}", self.descriptor.name, e);
                FormStatus::SubmitError(e)
            }
        };
        lock(&self.state).status = status.clone();
        self.report(&status);
        status
    }

    fn report(&self, status: &FormStatus) {
        match status {
            FormStatus::Success(_) => {
                let message = if self.mode.is_create() {
                    "Registro criado com sucesso!"
                } else {
                    "Registro atualizado com sucesso!"
                };
                self.ui.notifier.notify(Notice::success(message));
                self.ui.navigator.navigate(Route::List(self.descriptor.entity));
            }
            FormStatus::ValidationFailed { field, message, .. } => {
                let text = if field == NON_FIELD_ERRORS {
                    message.clone()
                } else {
                    format!("{}: {}", field, message)
                };
                self.ui.notifier.notify(Notice::error("Erro de Validação", text));
            }
            FormStatus::SubmitError(_) => {
                self.ui
                    .notifier
                    .notify(Notice::error("Erro", "Não foi possível salvar o registro."));
            }
            _ => {}
        }
    }

    fn index_of(&self, key: &str) -> Result<usize, InputError> {
        self.descriptor.fields.iter().position(|f| f.key == key).ok_or_else(|| {
            InputError::UnknownField { entity: self.descriptor.entity, field: key.to_string() }
        })
    }

    fn field_at(&self, key: &str) -> Result<(usize, &'static FieldDescriptor), InputError> {
        let index = self.index_of(key)?;
        Ok((index, &self.descriptor.fields[index]))
    }

    fn store(&self, index: usize, input: FieldInput) {
        lock(&self.state).inputs[index] = input;
    }
}

fn wrong_kind(field: &FieldDescriptor, expected: &'static str) -> InputError {
    InputError::WrongKind { field: field.key.to_string(), kind: field.kind.to_string(), expected }
}

fn initial_input(field: &FieldDescriptor, mode: &FormMode) -> FieldInput {
    match (field.kind, mode) {
        (FieldKind::Reference(_), FormMode::Create) => FieldInput::Reference(None),
        (FieldKind::Reference(_), FormMode::Edit(record)) => {
            FieldInput::Reference(record.reference_id(field.key))
        }
        (FieldKind::Enum(choices), FormMode::Create) => {
            FieldInput::Choice(choices.first().map(|c| c.value.to_string()).unwrap_or_default())
        }
        (FieldKind::Enum(_), FormMode::Edit(record)) => FieldInput::Choice(record.text(field.key)),
        (_, FormMode::Create) => FieldInput::Text(String::new()),
        (_, FormMode::Edit(record)) => FieldInput::Text(record.text(field.key)),
    }
}

/// Build the request body in descriptor order.
///
/// Returns the keys of the fields that block submission: required fields
/// left empty (create mode only) and numeric fields that do not parse.
pub(crate) fn build_body(
    descriptor: &EntityDescriptor,
    inputs: &[FieldInput],
    mode: &FormMode,
) -> Result<Body, Vec<String>> {
    let mut body = Body::new();
    let mut missing = Vec::new();
    let original = match mode {
        FormMode::Create => None,
        FormMode::Edit(record) => Some(record),
    };

    for (field, input) in descriptor.fields.iter().zip(inputs) {
        let required = mode.is_create() && field.required;
        let value = match (field.kind, input) {
            (FieldKind::Integer, FieldInput::Text(raw)) => match raw.trim() {
                "" if !required => Some(Value::Null),
                "" => None,
                text => text.parse::<i64>().ok().map(Value::from),
            },
            (FieldKind::Decimal, FieldInput::Text(raw)) => match raw.trim() {
                "" if !required => Some(Value::Null),
                "" => None,
                text => canonical_decimal(text).map(Value::String),
            },
            (_, FieldInput::Text(raw)) => {
                if required && raw.trim().is_empty() {
                    None
                } else if raw.is_empty() && original.is_some_and(|r| was_null(r, field.key)) {
                    Some(Value::Null)
                } else {
                    Some(Value::String(raw.clone()))
                }
            }
            (_, FieldInput::Choice(value)) if value.is_empty() => (!required).then_some(Value::Null),
            (_, FieldInput::Choice(value)) => Some(Value::String(value.clone())),
            (_, FieldInput::Reference(Some(id))) => Some(Value::from(id.0)),
            (_, FieldInput::Reference(None)) => (!required).then_some(Value::Null),
        };
        match value {
            Some(value) => {
                body.insert(field.key.to_string(), value);
            }
            None => missing.push(field.key.to_string()),
        }
    }

    if missing.is_empty() {
        Ok(body)
    } else {
        Err(missing)
    }
}

fn was_null(record: &Record, key: &str) -> bool {
    record.get(key).map_or(true, Value::is_null)
}

/// Accepts `12.5` or `12,5`; returns the text with a dot separator.
fn canonical_decimal(text: &str) -> Option<String> {
    let normalized = text.replace(',', ".");
    match normalized.parse::<f64>() {
        Ok(n) if n.is_finite() && !normalized.contains(['e', 'E']) => Some(normalized),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::NoticeKind;
    use crate::testing::{record, records, MemoryBackend, Shell};
    use serde_json::json;

    fn backend_with_references() -> MemoryBackend {
        let backend = MemoryBackend::new();
        backend.seed(Entity::Usuarios, records(json!([{"id": 1, "nome": "Ana"}, {"id": 2, "nome": "Bruno"}])));
        backend.seed(Entity::Vacinas, records(json!([{"id": 5, "nome": "Gripe"}])));
        backend.seed(Entity::UnidadesSaude, records(json!([{"id": 9, "nome": "Posto Central"}])));
        backend
    }

    fn body_keys(body: &Body) -> Vec<&str> {
        body.keys().map(String::as_str).collect()
    }

    #[tokio::test]
    async fn create_builds_body_in_descriptor_order() {
        let backend = backend_with_references();
        let shell = Shell::confirming(true);
        let form = FormController::create(
            Entity::Agendamentos,
            Arc::new(backend.clone()),
            shell.collaborators(),
        );
        assert_eq!(form.initialize().await, FormStatus::Ready);
        assert_eq!(form.options("usuario").len(), 2);

        form.select_reference("usuario", Some(RecordId(2))).unwrap();
        form.select_reference("vacina", Some(RecordId(5))).unwrap();
        form.select_reference("unidade", Some(RecordId(9))).unwrap();
        form.set_text("data_hora", "2025-03-01T09:30").unwrap();

        let status = form.submit().await;
        assert!(matches!(status, FormStatus::Success(_)));

        let (call, body) = backend.bodies().remove(0);
        assert_eq!(call, "create agendamentos");
        assert_eq!(body_keys(&body), vec!["usuario", "vacina", "unidade", "data_hora", "status"]);
        assert_eq!(body["usuario"], json!(2));
        assert_eq!(body["status"], json!("pendente"));
        assert_eq!(shell.navigator.routes(), vec![Route::List(Entity::Agendamentos)]);
        assert_eq!(shell.notifier.notices()[0].kind, NoticeKind::Success);
    }

    #[tokio::test]
    async fn missing_required_fields_block_submission() {
        let backend = MemoryBackend::new();
        let shell = Shell::confirming(true);
        let form =
            FormController::create(Entity::UnidadesSaude, Arc::new(backend.clone()), shell.collaborators());
        form.initialize().await;
        form.set_text("nome", "Posto Central").unwrap();

        let status = form.submit().await;
        let FormStatus::ValidationFailed { field, missing, message } = status else {
            panic!("expected a validation failure, got {:?}", status);
        };
        assert_eq!(field, "endereco");
        assert_eq!(missing, vec!["endereco"]);
        assert!(message.contains("endereco"));
        assert!(backend.calls().is_empty());
        assert!(shell.navigator.routes().is_empty());
    }

    #[tokio::test]
    async fn non_numeric_input_counts_as_missing() {
        let backend = MemoryBackend::new();
        let form = FormController::create(
            Entity::Vacinas,
            Arc::new(backend.clone()),
            Shell::confirming(true).collaborators(),
        );
        form.initialize().await;
        form.set_text("nome", "BCG").unwrap();
        form.set_text("fabricante", "FAP").unwrap();
        form.set_text("doses_recomendadas", "duas").unwrap();

        let status = form.submit().await;
        assert!(matches!(status, FormStatus::ValidationFailed { ref field, .. } if field == "doses_recomendadas"));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn edit_mode_seeds_inputs_before_references_resolve() {
        let backend = backend_with_references();
        let existing = record(json!({
            "id": 7,
            "vacina": {"id": 5, "nome": "Gripe"},
            "unidade": {"id": 9, "nome": "Posto Central"},
            "quantidade_disponsivel": "120.00"
        }));
        let form = FormController::edit(
            Entity::EstoquesVacina,
            existing,
            Arc::new(backend.clone()),
            Shell::confirming(true).collaborators(),
        );

        assert_eq!(form.status(), FormStatus::LoadingReferences);
        assert_eq!(form.value("vacina"), Some(FieldInput::Reference(Some(RecordId(5)))));
        assert_eq!(form.value("quantidade_disponsivel"), Some(FieldInput::Text("120.00".into())));
    }

    #[tokio::test]
    async fn unchanged_edit_resubmits_the_wire_form() {
        let backend = backend_with_references();
        let existing = record(json!({
            "id": 7,
            "vacina": {"id": 5, "nome": "Gripe"},
            "unidade": {"id": 9, "nome": "Posto Central"},
            "quantidade_disponsivel": "120.00"
        }));
        backend.seed(Entity::EstoquesVacina, vec![existing.clone()]);
        let form = FormController::edit(
            Entity::EstoquesVacina,
            existing.clone(),
            Arc::new(backend.clone()),
            Shell::confirming(true).collaborators(),
        );
        form.initialize().await;

        assert!(matches!(form.submit().await, FormStatus::Success(_)));
        let (call, body) = backend.bodies().remove(0);
        assert_eq!(call, "update estoques-vacina 7");
        assert_eq!(body, existing.to_wire(Entity::EstoquesVacina.descriptor()));
    }

    #[tokio::test]
    async fn decimal_accepts_comma_separator() {
        let backend = backend_with_references();
        let form = FormController::create(
            Entity::EstoquesVacina,
            Arc::new(backend.clone()),
            Shell::confirming(true).collaborators(),
        );
        form.initialize().await;
        form.set("vacina", "5").unwrap();
        form.set("unidade", "9").unwrap();
        form.set("quantidade_disponsivel", "12,5").unwrap();

        assert!(matches!(form.submit().await, FormStatus::Success(_)));
        let (_, body) = backend.bodies().remove(0);
        assert_eq!(body["quantidade_disponsivel"], json!("12.5"));
    }

    #[tokio::test]
    async fn empty_optional_fields_are_sent() {
        let backend = MemoryBackend::new();
        let form = FormController::create(
            Entity::UnidadesSaude,
            Arc::new(backend.clone()),
            Shell::confirming(true).collaborators(),
        );
        form.initialize().await;
        form.set_text("nome", "Posto Central").unwrap();
        form.set_text("endereco", "Rua A, 1").unwrap();

        assert!(matches!(form.submit().await, FormStatus::Success(_)));
        let (_, body) = backend.bodies().remove(0);
        assert_eq!(body["telefone"], json!(""));
    }

    #[tokio::test]
    async fn server_validation_error_is_surfaced() {
        let backend = MemoryBackend::new();
        backend.fail_writes(Entity::Vacinas, Error::validation("nome", "Este campo é obrigatório."));
        let shell = Shell::confirming(true);
        let form = FormController::create(Entity::Vacinas, Arc::new(backend.clone()), shell.collaborators());
        form.initialize().await;
        form.set_text("nome", "BCG").unwrap();
        form.set_text("fabricante", "FAP").unwrap();
        form.set_text("doses_recomendadas", "1").unwrap();

        let status = form.submit().await;
        assert_eq!(
            status,
            FormStatus::ValidationFailed {
                field: "nome".into(),
                message: "Este campo é obrigatório.".into(),
                missing: Vec::new(),
            }
        );
        assert!(status.is_editable());
        let notice = &shell.notifier.notices()[0];
        assert_eq!(notice.message, "nome: Este campo é obrigatório.");
        assert!(shell.navigator.routes().is_empty());
    }

    #[tokio::test]
    async fn other_failures_use_generic_message() {
        let backend = MemoryBackend::new();
        backend.fail_writes(Entity::Vacinas, Error::Network("offline".into()));
        let shell = Shell::confirming(true);
        let form = FormController::create(Entity::Vacinas, Arc::new(backend.clone()), shell.collaborators());
        form.initialize().await;
        form.set_text("nome", "BCG").unwrap();
        form.set_text("fabricante", "FAP").unwrap();
        form.set_text("doses_recomendadas", "1").unwrap();

        assert_eq!(form.submit().await, FormStatus::SubmitError(Error::Network("offline".into())));
        assert_eq!(shell.notifier.notices()[0].message, "Não foi possível salvar o registro.");
    }

    #[tokio::test]
    async fn reference_failure_blocks_the_form() {
        let backend = backend_with_references();
        backend.fail_list(Entity::Vacinas, Error::Network("offline".into()));
        let shell = Shell::confirming(true);
        let form =
            FormController::create(Entity::Agendamentos, Arc::new(backend.clone()), shell.collaborators());

        let status = form.initialize().await;
        assert_eq!(status, FormStatus::ReferenceError(Error::Network("offline".into())));
        assert!(form.options("usuario").is_empty());

        // Not editable: submit is ignored.
        form.submit().await;
        assert!(backend.calls().iter().all(|c| c.starts_with("list ")));
        assert_eq!(shell.notifier.notices().len(), 1);
    }

    #[tokio::test]
    async fn input_setters_enforce_field_kinds() {
        let backend = backend_with_references();
        let form = FormController::create(
            Entity::Agendamentos,
            Arc::new(backend),
            Shell::confirming(true).collaborators(),
        );
        form.initialize().await;

        assert!(matches!(form.select_choice("status", "adiado"), Err(InputError::InvalidChoice { .. })));
        assert!(form.select_choice("status", "confirmado").is_ok());
        assert!(matches!(form.set_text("usuario", "1"), Err(InputError::WrongKind { .. })));
        assert!(matches!(
            form.select_reference("usuario", Some(RecordId(99))),
            Err(InputError::UnknownReference { .. })
        ));
        assert!(matches!(form.set("idade", "3"), Err(InputError::UnknownField { .. })));
        assert!(matches!(form.set("usuario", "abc"), Err(InputError::InvalidId { .. })));
        assert!(form.set("usuario", "").is_ok());
        assert_eq!(form.value("usuario"), Some(FieldInput::Reference(None)));
    }

    #[tokio::test]
    async fn second_submit_while_submitting_is_ignored() {
        let backend = MemoryBackend::new();
        let form = FormController::create(
            Entity::UnidadesSaude,
            Arc::new(backend.clone()),
            Shell::confirming(true).collaborators(),
        );
        form.initialize().await;
        form.set_text("nome", "Posto Central").unwrap();
        form.set_text("endereco", "Rua A, 1").unwrap();

        lock(&form.state).status = FormStatus::Submitting;
        assert_eq!(form.submit().await, FormStatus::Submitting);
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn required_check_is_skipped_in_edit_mode() {
        let descriptor = Entity::UnidadesSaude.descriptor();
        let inputs = vec![
            FieldInput::Text(String::new()),
            FieldInput::Text(String::new()),
            FieldInput::Text(String::new()),
        ];
        let existing = record(json!({"id": 3, "nome": "Posto", "endereco": "Rua A", "telefone": ""}));
        assert!(build_body(descriptor, &inputs, &FormMode::Edit(existing)).is_ok());
        assert_eq!(
            build_body(descriptor, &inputs, &FormMode::Create).unwrap_err(),
            vec!["nome", "endereco"]
        );
    }

    #[tokio::test]
    async fn null_text_survives_an_unchanged_edit() {
        let backend = MemoryBackend::new();
        let existing = record(json!({"id": 3, "nome": "Posto", "endereco": "Rua A", "telefone": null}));
        backend.seed(Entity::UnidadesSaude, vec![existing.clone()]);
        let form = FormController::edit(
            Entity::UnidadesSaude,
            existing.clone(),
            Arc::new(backend.clone()),
            Shell::confirming(true).collaborators(),
        );
        form.initialize().await;
        assert_eq!(form.value("telefone"), Some(FieldInput::Text(String::new())));

        assert!(matches!(form.submit().await, FormStatus::Success(_)));
        let (_, body) = backend.bodies().remove(0);
        assert_eq!(body["telefone"], Value::Null);
        assert_eq!(body, existing.to_wire(Entity::UnidadesSaude.descriptor()));
    }

    #[tokio::test]
    async fn typed_text_replaces_a_null_original() {
        let backend = MemoryBackend::new();
        let existing = record(json!({"id": 3, "nome": "Posto", "endereco": "Rua A", "telefone": null}));
        backend.seed(Entity::UnidadesSaude, vec![existing.clone()]);
        let form = FormController::edit(
            Entity::UnidadesSaude,
            existing,
            Arc::new(backend.clone()),
            Shell::confirming(true).collaborators(),
        );
        form.initialize().await;
        form.set_text("telefone", "3333-0000").unwrap();

        form.submit().await;
        let (_, body) = backend.bodies().remove(0);
        assert_eq!(body["telefone"], json!("3333-0000"));
    }

    #[tokio::test]
    async fn superseded_reference_load_is_dropped() {
        let backend = backend_with_references();
        let shell = Shell::confirming(true);
        let form =
            FormController::create(Entity::EstoquesVacina, Arc::new(backend.clone()), shell.collaborators());
        backend.fail_list(Entity::Vacinas, Error::Network("late".into()));
        let gate = backend.gate_next_lists(2);

        let first = form.initialize();
        let second = async {
            gate.wait_for_waiters(2).await;
            backend.clear_failures();
            let status = form.initialize().await;
            backend.fail_list(Entity::Vacinas, Error::Network("late".into()));
            gate.open();
            status
        };
        let (first, second) = tokio::join!(first, second);

        assert_eq!(second, FormStatus::Ready);
        assert_eq!(first, FormStatus::Ready);
        assert_eq!(form.status(), FormStatus::Ready);
        assert_eq!(form.options("vacina").len(), 1);
        assert!(shell.notifier.notices().is_empty());
    }

    #[tokio::test]
    async fn initialize_while_submitting_is_ignored() {
        let backend = backend_with_references();
        let form = FormController::create(
            Entity::Agendamentos,
            Arc::new(backend.clone()),
            Shell::confirming(true).collaborators(),
        );
        lock(&form.state).status = FormStatus::Submitting;

        assert_eq!(form.initialize().await, FormStatus::Submitting);
        assert!(backend.calls().is_empty());
        assert_eq!(lock(&form.state).generation, 0);
    }

    #[test]
    fn canonical_decimals() {
        assert_eq!(canonical_decimal("100"), Some("100".into()));
        assert_eq!(canonical_decimal("0,75"), Some("0.75".into()));
        assert_eq!(canonical_decimal("1e3"), None);
        assert_eq!(canonical_decimal("muitas"), None);
    }
}
