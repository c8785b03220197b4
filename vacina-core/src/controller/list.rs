//! List screen controller
//!
//! Shows all records of one entity. Every activation refetches the full
//! collection; there is no caching and no pagination. Loads are tagged with a
//! generation ticket so a slow response can never overwrite a newer one.

use super::{lock, Collaborators, Notice, Route};
use crate::client::{Resource, ResourceProvider};
use crate::error::{Error, Result};
use crate::model::{Record, RecordId};
use crate::schema::{Entity, EntityDescriptor};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
pub enum ListStatus {
    Idle,
    Loading,
    Ready,
    /// The last load failed; the previous snapshot is kept.
    Error(Error),
}

/// Identifies one load; only the newest ticket may apply its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

struct ListState {
    status: ListStatus,
    records: Vec<Record>,
    generation: u64,
}

pub struct ListController {
    descriptor: &'static EntityDescriptor,
    resource: Arc<dyn Resource>,
    ui: Collaborators,
    state: Mutex<ListState>,
}

impl ListController {
    pub fn new(entity: Entity, provider: &dyn ResourceProvider, ui: Collaborators) -> Self {
        Self {
            descriptor: entity.descriptor(),
            resource: provider.resource(entity),
            ui,
            state: Mutex::new(ListState {
                status: ListStatus::Idle,
                records: Vec::new(),
                generation: 0,
            }),
        }
    }

    pub fn entity(&self) -> Entity {
        self.descriptor.entity
    }

    pub fn descriptor(&self) -> &'static EntityDescriptor {
        self.descriptor
    }

    pub fn status(&self) -> ListStatus {
        lock(&self.state).status.clone()
    }

    /// The current snapshot, in server order.
    pub fn records(&self) -> Vec<Record> {
        lock(&self.state).records.clone()
    }

    /// Screen became visible: refetch the whole collection.
    pub async fn on_activate(&self) -> ListStatus {
        let ticket = self.begin_load();
        let result = self.resource.list().await;
        self.finish_load(ticket, result);
        self.status()
    }

    pub fn begin_load(&self) -> LoadTicket {
        let mut state = lock(&self.state);
        state.generation += 1;
        state.status = ListStatus::Loading;
        LoadTicket(state.generation)
    }

    /// Apply a load result. Returns false when a newer load superseded it.
    pub fn finish_load(&self, ticket: LoadTicket, result: Result<Vec<Record>>) -> bool {
        let mut state = lock(&self.state);
        if ticket.0 != state.generation {
            log::warn!(
                "{}: discarding stale list response (load {} superseded by {})",
                self.descriptor.name,
                ticket.0,
                state.generation
            );
            return false;
        }
        match result {
            Ok(records) => {
                log::debug!("{}: loaded {} records", self.descriptor.name, records.len());
                state.records = records;
                state.status = ListStatus::Ready;
            }
            Err(e) => {
                log::error!("{}: list failed: {}", self.descriptor.name, e);
                state.status = ListStatus::Error(e);
                drop(state);
                self.ui.notifier.notify(Notice::error(
                    "Erro",
                    format!("Não foi possível carregar {}.", self.descriptor.title),
                ));
            }
        }
        true
    }

    pub fn request_create(&self) {
        self.ui.navigator.navigate(Route::Create(self.entity()));
    }

    pub fn request_edit(&self, record: &Record) {
        self.ui.navigator.navigate(Route::Edit(self.entity(), record.clone()));
    }

    /// Ask for confirmation, delete, then refetch.
    ///
    /// Declining returns [`Error::ConfirmationDeclined`] without any request.
    /// The list is only reloaded after a successful delete.
    pub async fn request_delete(&self, id: RecordId) -> Result<()> {
        let confirmed = self
            .ui
            .confirm
            .confirm(
                "Confirmar Exclusão",
                &format!("Deseja realmente apagar o registro #{} de {}?", id, self.descriptor.title),
            )
            .await;
        if !confirmed {
            log::debug!("{}: delete of #{} declined", self.descriptor.name, id);
            return Err(Error::ConfirmationDeclined);
        }

        match self.resource.remove(id).await {
            Ok(()) => {
                log::info!("{}: deleted #{}", self.descriptor.name, id);
                self.ui.notifier.notify(Notice::success("Registro apagado com sucesso!"));
                self.on_activate().await;
                Ok(())
            }
            Err(e) => {
                log::error!("{}: delete of #{} failed: {}", self.descriptor.name, id, e);
                self.ui
                    .notifier
                    .notify(Notice::error("Erro", "Não foi possível apagar o registro."));
                Err(e)
            }
        }
    }
}
