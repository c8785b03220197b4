//! List and form controllers
//!
//! Controllers own the per-screen state machines. They talk to the outside
//! world only through the collaborator traits defined here, so any UI shell
//! (terminal, mobile bridge, tests) can mount them.

pub mod form;
pub mod list;

pub use form::{FieldInput, FormController, FormMode, FormStatus, InputError};
pub use list::{ListController, ListStatus, LoadTicket};

use crate::model::Record;
use crate::schema::Entity;
use async_trait::async_trait;
use std::sync::Arc;

/// Logical screens the navigation shell must be able to mount.
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    List(Entity),
    Create(Entity),
    /// The shell must hand the selected record to the edit form.
    Edit(Entity, Record),
}

impl Route {
    pub fn entity(&self) -> Entity {
        match self {
            Route::List(e) | Route::Create(e) | Route::Edit(e, _) => *e,
        }
    }
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// One user-visible message (modal or inline).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Success, title: "Sucesso".to_string(), message: message.into() }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Error, title: title.into(), message: message.into() }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Blocking yes/no decision before a destructive action.
#[async_trait]
pub trait Confirm: Send + Sync {
    async fn confirm(&self, title: &str, message: &str) -> bool;
}

/// The UI-side collaborators a controller reports to.
#[derive(Clone)]
pub struct Collaborators {
    pub navigator: Arc<dyn Navigator>,
    pub notifier: Arc<dyn Notifier>,
    pub confirm: Arc<dyn Confirm>,
}

impl Collaborators {
    pub fn new(
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
        confirm: Arc<dyn Confirm>,
    ) -> Self {
        Self { navigator, notifier, confirm }
    }
}

fn lock<T>(mutex: &std::sync::Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}
