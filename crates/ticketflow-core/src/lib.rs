//! ticketflow-core library.
//!
//! # Conventions
//!
//! - **Errors**: `thiserror` enums for storage/domain failures, `anyhow::Result`
//!   for config loading.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `debug!`).

pub mod app;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod lock;
pub mod model;
pub mod session;
pub mod storage;
pub mod store;
pub mod validate;

pub use app::App;
pub use error::{ErrorCode, StorageError, TicketflowError};
pub use model::{Page, Priority, Status, Ticket, TicketDraft};
pub use session::Session;
pub use storage::{FileStorage, KeyValueStore, MemoryStorage};
pub use store::TicketStore;
