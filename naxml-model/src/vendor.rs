//! Vendor/connection enums shared by `POSIntegration` and the adapter layer.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "text", rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum PosType {
    GilbarcoPassport,
    VerifoneRuby2,
    /// Catch-all for schema-compatible variants not otherwise enumerated
    /// (NAXML is a family of dialects; new controllers arrive faster than
    /// this enum does).
    Other,
}

impl PosType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PosType::GilbarcoPassport => "GILBARCO_PASSPORT",
            PosType::VerifoneRuby2 => "VERIFONE_RUBY2",
            PosType::Other => "OTHER",
        }
    }
}

impl std::fmt::Display for PosType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "text", rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum ConnectionMode {
    Network,
    FileExchange,
}

/// Source tag recorded on synced entities (`pos_source`), distinguishing
/// which vendor's maintenance feed last wrote a row. Full-sync deactivation
/// only ever acts within one `(store_id, pos_source)` partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "text", rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum PosSource {
    GilbarcoNaxml,
    VerifoneNaxml,
    Other,
}

impl std::fmt::Display for PosSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PosSource::GilbarcoNaxml => "GILBARCO_NAXML",
            PosSource::VerifoneNaxml => "VERIFONE_NAXML",
            PosSource::Other => "OTHER",
        };
        write!(f, "{s}")
    }
}
