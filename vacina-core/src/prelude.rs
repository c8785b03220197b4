//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use vacina_core::prelude::*;
//! ```

// === Schema ===
pub use crate::schema::{Entity, EntityDescriptor, FieldDescriptor, FieldKind, SchemaRegistry};

// === Records and client ===
pub use crate::client::{ApiClient, Body, Resource, ResourceProvider};
pub use crate::model::{Record, RecordId};
pub use crate::resolver::{PickerOption, ReferenceOptions};

// === Controllers ===
pub use crate::controller::{
    Collaborators, Confirm, FieldInput, FormController, FormMode, FormStatus, ListController,
    ListStatus, Navigator, Notice, NoticeKind, Notifier, Route,
};

// === Configuration and logging ===
pub use crate::config::VacinaConfig;
pub use crate::logging::init_logging;

// === Errors ===
pub use crate::error::{Error, Result};
