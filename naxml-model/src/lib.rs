//! Shared data models for the NAXML ingestion core.
//!
//! This crate holds plain data: tenant-scoped entities, the typed NAXML
//! document variants produced by the parser, and the error taxonomy shared
//! across the workspace. It has no I/O of its own; `naxml-core` is where
//! behavior lives.

pub mod document;
pub mod entities;
pub mod error;
pub mod file_log;
pub mod fuel;
pub mod ids;
pub mod pos_integration;
pub mod prelude;
pub mod shift_user;
pub mod sync;
pub mod transaction;
pub mod vendor;

pub use error::{NaxmlError, Result};
