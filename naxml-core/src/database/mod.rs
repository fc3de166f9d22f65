//! Persistence: port traits (`ports`) and their Postgres implementations
//! (`postgres`), plus the pool builder (`pool`).
//!
//! Behavior is expressed against `async_trait` interfaces, and the
//! service/scheduler layers depend only on those, never on `sqlx` directly.

pub mod pool;
pub mod ports;
pub mod postgres;
