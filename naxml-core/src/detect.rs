//! Document-type detection from the root element.

use naxml_model::document::{DocumentKind, DEFAULT_VERSION, SUPPORTED_VERSIONS};
use naxml_model::{NaxmlError, Result};
use tracing::warn;

use crate::xml::XmlNode;

/// Map a root element's tag to the `DocumentKind` it represents. Returns
/// `UnknownDocumentType` for anything not in the NAXML 3.x document set.
pub fn detect_document_kind(root: &XmlNode) -> Result<DocumentKind> {
    let kind = match root.tag.as_str() {
        "TransactionDocument" => DocumentKind::TransactionDocument,
        "POSJournal" => DocumentKind::PosJournal,
        "DepartmentMaintenance" => DocumentKind::DepartmentMaintenance,
        "TenderMaintenance" => DocumentKind::TenderMaintenance,
        "TaxRateMaintenance" => DocumentKind::TaxRateMaintenance,
        "PriceBookMaintenance" => DocumentKind::PriceBookMaintenance,
        "EmployeeMaintenance" => DocumentKind::EmployeeMaintenance,
        "FuelGradeMovement" => DocumentKind::FuelGradeMovement,
        "FuelProductMovement" => DocumentKind::FuelProductMovement,
        "MiscellaneousSummaryMovement" => DocumentKind::MiscellaneousSummaryMovement,
        "TaxLevelMovement" => DocumentKind::TaxLevelMovement,
        "MerchandiseCodeMovement" => DocumentKind::MerchandiseCodeMovement,
        "ItemSalesMovement" => DocumentKind::ItemSalesMovement,
        "TankProductMovement" => DocumentKind::TankProductMovement,
        "Acknowledgment" => DocumentKind::Acknowledgment,
        other => {
            return Err(NaxmlError::UnknownDocumentType {
                root: other.to_string(),
            })
        }
    };
    Ok(kind)
}

/// Some vendor exports wrap the real document one level down inside a
/// `NAXML-MovementReport` or `NAXML-POSJournal` envelope root. Recurse into
/// the envelope's first child to find the tag that actually disambiguates
/// the document kind; any other root is returned unchanged.
pub fn unwrap_envelope(root: &XmlNode) -> &XmlNode {
    match root.tag.as_str() {
        "NAXML-MovementReport" | "NAXML-POSJournal" => root.children.first().unwrap_or(root),
        _ => root,
    }
}

/// Validate the `version` attribute against the supported set. Version
/// drift is a warning, never a hard failure.
pub fn check_version(root: &XmlNode) {
    if let Some(version) = root.attr("version") {
        if !SUPPORTED_VERSIONS.contains(&version) {
            warn!(
                version,
                default = DEFAULT_VERSION,
                "NAXML schema version not in the supported set; continuing with best-effort parsing"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::read_tree;

    #[test]
    fn detects_known_root_elements() {
        let root = read_tree(b"<FuelGradeMovement/>").unwrap();
        assert_eq!(
            detect_document_kind(&root).unwrap(),
            DocumentKind::FuelGradeMovement
        );
    }

    #[test]
    fn unknown_root_element_is_rejected() {
        let root = read_tree(b"<SomeUnrelatedThing/>").unwrap();
        assert!(detect_document_kind(&root).is_err());
    }

    #[test]
    fn unwraps_movement_report_envelope() {
        let root = read_tree(b"<NAXML-MovementReport><FuelGradeMovement/></NAXML-MovementReport>")
            .unwrap();
        let inner = unwrap_envelope(&root);
        assert_eq!(
            detect_document_kind(inner).unwrap(),
            DocumentKind::FuelGradeMovement
        );
    }

    #[test]
    fn unwraps_posjournal_envelope() {
        let root = read_tree(b"<NAXML-POSJournal><POSJournal/></NAXML-POSJournal>").unwrap();
        let inner = unwrap_envelope(&root);
        assert_eq!(detect_document_kind(inner).unwrap(), DocumentKind::PosJournal);
    }

    #[test]
    fn non_envelope_root_is_returned_unchanged() {
        let root = read_tree(b"<FuelGradeMovement/>").unwrap();
        let inner = unwrap_envelope(&root);
        assert_eq!(inner.tag, "FuelGradeMovement");
    }
}
