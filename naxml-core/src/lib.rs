//! Core library for the NAXML ingestion platform: file watching, NAXML
//! parsing, and projection into the operational store.

pub mod audit;
pub mod classify;
pub mod database;
pub mod detect;
pub mod parser;
pub mod projector;
pub mod service;
pub mod vendor;
pub mod watcher;
pub mod xml;

pub use naxml_model::error::{NaxmlError, Result};

/// Re-exports frequently needed across binaries built on this crate.
pub mod prelude {
    pub use crate::audit::AuditRecorder;
    pub use crate::classify::{classify_filename, resolve_within};
    pub use crate::database::pool::connect;
    pub use crate::database::ports::*;
    pub use crate::detect::detect_document_kind;
    pub use crate::service::{InitialImportService, MovementReportProcessor};
    pub use crate::watcher::FileWatcher;
    pub use naxml_contracts::prelude::*;
    pub use naxml_model::prelude::*;
}
