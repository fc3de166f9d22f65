//! Trait surfaces that describe interactions with NAXML-derived data models.

pub mod adapter;

/// Frequently used trait combinators for the core and server crates.
pub mod prelude {
    pub use super::adapter::{
        AdapterCapabilities, ConnectionTestResult, ExchangePaths, ExportedDocument, FuelSalesSync,
        PjrExtraction, PosAdapter,
    };
}
