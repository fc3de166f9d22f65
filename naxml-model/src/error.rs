use thiserror::Error;

/// Error taxonomy shared by the XML reader, NAXML parser, adapter layer,
/// file watcher, and projector. Each variant carries a stable code via
/// `as_code()` so a `FileLog.error_code` can be derived directly from it.
#[derive(Error, Debug)]
pub enum NaxmlError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid XML at line {line}, column {column}: {message}")]
    InvalidXml {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("unknown NAXML document type (root element {root:?})")]
    UnknownDocumentType { root: String },

    #[error("unsupported NAXML version {version:?}, assuming 3.4")]
    UnsupportedVersion { version: String },

    #[error("missing required field {field} in {context}")]
    MissingRequiredField { field: String, context: String },

    #[error("invalid field value for {field}: {reason}")]
    InvalidFieldValue { field: String, reason: String },

    #[error("FGM: missing fuelGradeId")]
    FgmMissingGradeId,

    #[error("FGM: invalid tender code {0:?}")]
    FgmInvalidTenderCode(String),

    #[error("FGM: negative sales volume {0}")]
    FgmInvalidSalesVolume(rust_decimal::Decimal),

    #[error("FGM: negative sales amount {0}")]
    FgmInvalidSalesAmount(rust_decimal::Decimal),

    #[error("FGM: primary report period {0} outside {{2, 98}}")]
    FgmInvalidPrimaryPeriod(i32),

    #[error("FPM: missing fuelProductId")]
    FpmMissingProductId,

    #[error("FPM: missing fuelPositionId")]
    FpmMissingPositionId,

    #[error("FPM: negative cumulative volume {0}")]
    FpmInvalidVolume(rust_decimal::Decimal),

    #[error("FPM: negative cumulative amount {0}")]
    FpmInvalidAmount(rust_decimal::Decimal),

    #[error("MSM: missing summaryCode")]
    MsmMissingSummaryCode,

    #[error("path traversal: {attempted} escapes base {base}")]
    PathTraversal { attempted: String, base: String },

    #[error("directory not found: {0}")]
    DirectoryNotFound(String),

    #[error("unsupported document type for routing: {0:?}")]
    UnsupportedDocumentType(String),

    #[error("no open or recent shift found for store")]
    NoShiftAvailable,

    #[error("no import user available for company")]
    NoImportUserAvailable,

    #[error("database error: {0}")]
    Database(String),

    #[error("audit record creation failed: {0}")]
    AuditCreationFailed(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl NaxmlError {
    /// Stable machine-readable error code, persisted on `FileLog.error_code`.
    pub fn as_code(&self) -> &'static str {
        match self {
            NaxmlError::Io(_) => "IO_ERROR",
            NaxmlError::InvalidXml { .. } => "NAXML_INVALID_XML",
            NaxmlError::UnknownDocumentType { .. } => "UNKNOWN_DOCUMENT_TYPE",
            NaxmlError::UnsupportedVersion { .. } => "NAXML_UNSUPPORTED_VERSION",
            NaxmlError::MissingRequiredField { .. } => "MISSING_REQUIRED_FIELD",
            NaxmlError::InvalidFieldValue { .. } => "INVALID_FIELD_VALUE",
            NaxmlError::FgmMissingGradeId => "FGM_MISSING_GRADE_ID",
            NaxmlError::FgmInvalidTenderCode(_) => "FGM_INVALID_TENDER_CODE",
            NaxmlError::FgmInvalidSalesVolume(_) => "FGM_INVALID_SALES_VOLUME",
            NaxmlError::FgmInvalidSalesAmount(_) => "FGM_INVALID_SALES_AMOUNT",
            NaxmlError::FgmInvalidPrimaryPeriod(_) => "FGM_INVALID_PRIMARY_PERIOD",
            NaxmlError::FpmMissingProductId => "FPM_MISSING_PRODUCT_ID",
            NaxmlError::FpmMissingPositionId => "FPM_MISSING_POSITION_ID",
            NaxmlError::FpmInvalidVolume(_) => "FPM_INVALID_VOLUME",
            NaxmlError::FpmInvalidAmount(_) => "FPM_INVALID_AMOUNT",
            NaxmlError::MsmMissingSummaryCode => "MSM_MISSING_SUMMARY_CODE",
            NaxmlError::PathTraversal { .. } => "PATH_TRAVERSAL",
            NaxmlError::DirectoryNotFound(_) => "DIRECTORY_NOT_FOUND",
            NaxmlError::UnsupportedDocumentType(_) => "UNSUPPORTED_DOCUMENT_TYPE",
            NaxmlError::NoShiftAvailable => "NO_SHIFT_AVAILABLE",
            NaxmlError::NoImportUserAvailable => "NO_IMPORT_USER_AVAILABLE",
            NaxmlError::Database(_) => "DATABASE_ERROR",
            NaxmlError::AuditCreationFailed(_) => "AUDIT_CREATION_FAILED",
            NaxmlError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether this error is a warning-only condition that should not abort
    /// processing of the document it was raised for.
    pub fn is_warning_only(&self) -> bool {
        matches!(self, NaxmlError::UnsupportedVersion { .. })
    }
}

pub type Result<T> = std::result::Result<T, NaxmlError>;
