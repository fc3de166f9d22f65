//! Projection of parsed NAXML documents into operational-store rows.
//!
//! Each submodule owns one projection concern: `entities` handles the
//! maintenance-document upserts (Department/TenderType/TaxRate/...),
//! `transaction` handles POS-journal ingest, and `fuel` folds fuel movement
//! reports into shift-scoped summaries. None of these talk to the database
//! directly — they return rows for the caller (the service layer) to persist
//! inside a single transaction alongside the audit record.

pub mod entities;
pub mod fuel;
pub mod transaction;
