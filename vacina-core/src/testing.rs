//! In-memory doubles for controller and resolver tests

use crate::client::{Body, Resource, ResourceProvider};
use crate::controller::{Collaborators, Confirm, Navigator, Notice, Notifier, Route};
use crate::error::{Error, Result};
use crate::model::{Record, RecordId};
use crate::schema::{Entity, EntityDescriptor};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{Notify, Semaphore};

/// Build records from a JSON array literal.
pub fn records(value: Value) -> Vec<Record> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| Record::from_value(item).expect("test record"))
            .collect(),
        other => panic!("expected a JSON array, got {}", other),
    }
}

pub fn record(value: Value) -> Record {
    Record::from_value(value).expect("test record")
}

fn guard<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Holds list calls until opened.
pub struct Gate {
    waiters: AtomicUsize,
    arrived: Notify,
    permits: Semaphore,
}

impl Gate {
    fn new() -> Self {
        Self { waiters: AtomicUsize::new(0), arrived: Notify::new(), permits: Semaphore::new(0) }
    }

    pub async fn wait_for_waiters(&self, count: usize) {
        loop {
            let notified = self.arrived.notified();
            if self.waiters.load(Ordering::SeqCst) >= count {
                return;
            }
            notified.await;
        }
    }

    pub fn open(&self) {
        self.permits.add_permits(1024);
    }

    async fn pass(&self) {
        self.waiters.fetch_add(1, Ordering::SeqCst);
        self.arrived.notify_waiters();
        let _permit = self.permits.acquire().await.expect("gate semaphore closed");
    }
}

#[derive(Default)]
struct State {
    collections: HashMap<Entity, Vec<Record>>,
    next_id: i64,
    calls: Vec<String>,
    bodies: Vec<(String, Body)>,
    list_failures: HashMap<Entity, Error>,
    write_failures: HashMap<Entity, Error>,
    gate: Option<Arc<Gate>>,
    /// List calls still to be held; `None` holds every call.
    gate_budget: Option<usize>,
}

/// Shared in-memory backend standing in for the REST server.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    state: Arc<Mutex<State>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, entity: Entity, records: Vec<Record>) {
        let mut state = guard(&self.state);
        let max = records.iter().map(|r| r.id.0).max().unwrap_or(0);
        state.next_id = state.next_id.max(max);
        state.collections.insert(entity, records);
    }

    pub fn fail_list(&self, entity: Entity, error: Error) {
        guard(&self.state).list_failures.insert(entity, error);
    }

    /// Make create, update and remove on `entity` fail.
    pub fn fail_writes(&self, entity: Entity, error: Error) {
        guard(&self.state).write_failures.insert(entity, error);
    }

    pub fn clear_failures(&self) {
        let mut state = guard(&self.state);
        state.list_failures.clear();
        state.write_failures.clear();
    }

    pub fn gate_lists(&self) -> Arc<Gate> {
        let gate = Arc::new(Gate::new());
        let mut state = guard(&self.state);
        state.gate = Some(Arc::clone(&gate));
        state.gate_budget = None;
        gate
    }

    /// Like `gate_lists`, but only the next `count` list calls are held.
    pub fn gate_next_lists(&self, count: usize) -> Arc<Gate> {
        let gate = self.gate_lists();
        guard(&self.state).gate_budget = Some(count);
        gate
    }

    pub fn calls(&self) -> Vec<String> {
        guard(&self.state).calls.clone()
    }

    /// Bodies sent to create/update, tagged with the call.
    pub fn bodies(&self) -> Vec<(String, Body)> {
        guard(&self.state).bodies.clone()
    }
}

impl ResourceProvider for MemoryBackend {
    fn resource(&self, entity: Entity) -> Arc<dyn Resource> {
        Arc::new(MemoryResource { descriptor: entity.descriptor(), backend: self.clone() })
    }
}

struct MemoryResource {
    descriptor: &'static EntityDescriptor,
    backend: MemoryBackend,
}

impl MemoryResource {
    fn entity(&self) -> Entity {
        self.descriptor.entity
    }

    fn record_call(&self, call: String, body: Option<&Body>) -> MutexGuard<'_, State> {
        let mut state = guard(&self.backend.state);
        if let Some(body) = body {
            state.bodies.push((call.clone(), body.clone()));
        }
        state.calls.push(call);
        state
    }

    fn not_found(&self, id: RecordId) -> Error {
        Error::NotFound { entity: self.entity(), id: Some(id) }
    }
}

#[async_trait]
impl Resource for MemoryResource {
    fn descriptor(&self) -> &'static EntityDescriptor {
        self.descriptor
    }

    async fn list(&self) -> Result<Vec<Record>> {
        let gate = {
            let mut state = self.record_call(format!("list {}", self.descriptor.name), None);
            let held = match state.gate_budget {
                Some(0) => false,
                Some(left) => {
                    state.gate_budget = Some(left - 1);
                    true
                }
                None => true,
            };
            if held {
                state.gate.clone()
            } else {
                None
            }
        };
        if let Some(gate) = gate {
            gate.pass().await;
        }
        let state = guard(&self.backend.state);
        if let Some(error) = state.list_failures.get(&self.entity()) {
            return Err(error.clone());
        }
        Ok(state.collections.get(&self.entity()).cloned().unwrap_or_default())
    }

    async fn get(&self, id: RecordId) -> Result<Record> {
        let state = self.record_call(format!("get {} {}", self.descriptor.name, id), None);
        state
            .collections
            .get(&self.entity())
            .and_then(|records| records.iter().find(|r| r.id == id).cloned())
            .ok_or_else(|| self.not_found(id))
    }

    async fn create(&self, body: &Body) -> Result<Record> {
        let mut state = self.record_call(format!("create {}", self.descriptor.name), Some(body));
        if let Some(error) = state.write_failures.get(&self.entity()) {
            return Err(error.clone());
        }
        state.next_id += 1;
        let created = Record::new(RecordId(state.next_id), body.clone());
        state.collections.entry(self.entity()).or_default().push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: RecordId, body: &Body) -> Result<Record> {
        let mut state =
            self.record_call(format!("update {} {}", self.descriptor.name, id), Some(body));
        if let Some(error) = state.write_failures.get(&self.entity()) {
            return Err(error.clone());
        }
        let slot = state
            .collections
            .get_mut(&self.entity())
            .and_then(|records| records.iter_mut().find(|r| r.id == id))
            .ok_or_else(|| self.not_found(id))?;
        *slot = Record::new(id, body.clone());
        Ok(slot.clone())
    }

    async fn remove(&self, id: RecordId) -> Result<()> {
        let mut state = self.record_call(format!("remove {} {}", self.descriptor.name, id), None);
        if let Some(error) = state.write_failures.get(&self.entity()) {
            return Err(error.clone());
        }
        let records = state.collections.entry(self.entity()).or_default();
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Err(self.not_found(id));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn routes(&self) -> Vec<Route> {
        guard(&self.routes).clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        guard(&self.routes).push(route);
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        guard(&self.notices).clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        guard(&self.notices).push(notice);
    }
}

/// Answers every confirmation with a fixed decision.
pub struct ScriptedConfirm {
    answer: bool,
    asked: Mutex<Vec<(String, String)>>,
}

impl ScriptedConfirm {
    pub fn answering(answer: bool) -> Self {
        Self { answer, asked: Mutex::new(Vec::new()) }
    }

    pub fn asked(&self) -> Vec<(String, String)> {
        guard(&self.asked).clone()
    }
}

#[async_trait]
impl Confirm for ScriptedConfirm {
    async fn confirm(&self, title: &str, message: &str) -> bool {
        guard(&self.asked).push((title.to_string(), message.to_string()));
        self.answer
    }
}

/// Recording collaborators plus handles to inspect them.
pub struct Shell {
    pub navigator: Arc<RecordingNavigator>,
    pub notifier: Arc<RecordingNotifier>,
    pub confirm: Arc<ScriptedConfirm>,
}

impl Shell {
    pub fn confirming(answer: bool) -> Self {
        Self {
            navigator: Arc::new(RecordingNavigator::default()),
            notifier: Arc::new(RecordingNotifier::default()),
            confirm: Arc::new(ScriptedConfirm::answering(answer)),
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators::new(
            self.navigator.clone(),
            self.notifier.clone(),
            self.confirm.clone(),
        )
    }
}
