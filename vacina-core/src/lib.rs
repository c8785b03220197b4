//! Vacina - Core
//!
//! Relational CRUD core for a vaccination program's records: users, doctors,
//! vaccines, health units, stock, appointments, applications and campaigns.
//!
//! # Overview
//!
//! Every entity is described once, statically, in the [`schema`] registry.
//! Everything else is generic over that description:
//!
//! - [`client`] - one REST resource per entity (list/get/create/update/delete)
//! - [`resolver`] - fetches the target collections of reference fields, in parallel
//! - [`controller`] - list and form state machines driving any UI shell
//! - [`config`] - TOML + environment configuration
//! - [`logging`] - `log` backend writing human or JSON lines
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use vacina_core::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = VacinaConfig::load()?;
//!     init_logging(&config.logging)?;
//!
//!     let api = ApiClient::new(&config.client)?;
//!     let list = ListController::new(Entity::Vacinas, &api, collaborators);
//!     list.on_activate().await;
//!     for record in list.records() {
//!         println!("{}", record.label(Entity::Vacinas.descriptor()));
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config; // Configuration system with TOML support
pub mod controller;
pub mod error;
pub mod logging; // stderr backend for the log crate
pub mod model; // Records and ids as exchanged with the server
pub mod prelude;
pub mod resolver;
pub mod schema;

#[cfg(test)]
pub mod testing;

pub use error::{Error, Result};
