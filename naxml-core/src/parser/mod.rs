//! NAXMLParser: generic tree → typed `NaxmlDocument`.

pub mod acknowledgment;
pub mod fgm;
pub mod fpm;
pub mod maintenance;
pub mod msm;
pub mod transaction;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;

use naxml_model::document::{DocumentKind, NaxmlDocument};
use naxml_model::{NaxmlError, Result};

use crate::detect::{check_version, detect_document_kind, unwrap_envelope};
use crate::xml::{read_tree, XmlNode};

/// Parse raw bytes all the way to a typed document. This is the single
/// entry point `FileWatcher`/`MovementReportProcessor` call.
pub fn parse(bytes: &[u8]) -> Result<NaxmlDocument> {
    let tree = read_tree(bytes)?;
    check_version(&tree);
    let root = unwrap_envelope(&tree);
    let kind = detect_document_kind(root)?;
    parse_known(kind, root)
}

fn parse_known(kind: DocumentKind, root: &XmlNode) -> Result<NaxmlDocument> {
    match kind {
        DocumentKind::TransactionDocument => {
            Ok(NaxmlDocument::Transaction(transaction::parse(root)?))
        }
        DocumentKind::PosJournal => Ok(NaxmlDocument::PosJournal(transaction::parse(root)?)),
        DocumentKind::DepartmentMaintenance => {
            Ok(NaxmlDocument::DepartmentMaint(maintenance::parse(root, "Department")?))
        }
        DocumentKind::TenderMaintenance => {
            Ok(NaxmlDocument::TenderMaint(maintenance::parse(root, "Tender")?))
        }
        DocumentKind::TaxRateMaintenance => {
            Ok(NaxmlDocument::TaxRateMaint(maintenance::parse(root, "TaxRate")?))
        }
        DocumentKind::PriceBookMaintenance => {
            Ok(NaxmlDocument::PriceBookMaint(maintenance::parse(root, "Item")?))
        }
        DocumentKind::EmployeeMaintenance => {
            Ok(NaxmlDocument::EmployeeMaint(maintenance::parse(root, "Employee")?))
        }
        DocumentKind::FuelGradeMovement => Ok(NaxmlDocument::FuelGradeMovement(fgm::parse(root)?)),
        DocumentKind::FuelProductMovement => {
            Ok(NaxmlDocument::FuelProductMovement(fpm::parse(root)?))
        }
        DocumentKind::MiscellaneousSummaryMovement => {
            Ok(NaxmlDocument::MiscellaneousSummaryMovement(msm::parse(root)?))
        }
        DocumentKind::Acknowledgment => {
            Ok(NaxmlDocument::Acknowledgment(acknowledgment::parse(root)?))
        }
        other => Err(NaxmlError::UnsupportedDocumentType(other.to_string())),
    }
}

/// NAXML dialects inconsistently suffix id fields with `ID` or `Id`; try
/// both rather than assuming one vendor's casing.
pub(crate) fn id_field<'a>(node: &'a XmlNode, base: &str) -> Option<&'a str> {
    node.child_text(&format!("{base}ID"))
        .or_else(|| node.child_text(&format!("{base}Id")))
}

pub(crate) fn required_text<'a>(node: &'a XmlNode, field: &str, context: &str) -> Result<&'a str> {
    node.child_text(field)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| NaxmlError::MissingRequiredField {
            field: field.to_string(),
            context: context.to_string(),
        })
}

pub(crate) fn parse_decimal(raw: &str, field: &str) -> Result<Decimal> {
    Decimal::from_str(raw.trim()).map_err(|_| NaxmlError::InvalidFieldValue {
        field: field.to_string(),
        reason: format!("not a valid decimal: {raw:?}"),
    })
}

pub(crate) fn decimal_field(node: &XmlNode, field: &str, default: Decimal) -> Result<Decimal> {
    match node.child_text(field) {
        Some(raw) if !raw.is_empty() => parse_decimal(raw, field),
        _ => Ok(default),
    }
}

pub(crate) fn int_field(node: &XmlNode, field: &str, default: i32) -> Result<i32> {
    match node.child_text(field) {
        Some(raw) if !raw.is_empty() => raw.trim().parse::<i32>().map_err(|_| {
            NaxmlError::InvalidFieldValue {
                field: field.to_string(),
                reason: format!("not a valid integer: {raw:?}"),
            }
        }),
        _ => Ok(default),
    }
}

pub(crate) fn bool_field(node: &XmlNode, field: &str) -> bool {
    node.child_text(field)
        .map(crate::xml::coerce_bool)
        .unwrap_or(false)
}

pub(crate) fn parse_business_date(raw: &str, field: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| NaxmlError::InvalidFieldValue {
        field: field.to_string(),
        reason: format!("not a valid YYYY-MM-DD date: {raw:?}"),
    })
}

pub(crate) fn parse_timestamp(raw: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| NaxmlError::InvalidFieldValue {
            field: field.to_string(),
            reason: format!("not a valid RFC3339 timestamp: {raw:?}"),
        })
}

/// FGM/FPM/MSM share the same movement-report header shape.
pub(crate) fn parse_movement_header(
    root: &XmlNode,
) -> Result<naxml_model::document::MovementHeader> {
    let header_node = root.child("Header").unwrap_or(root);

    Ok(naxml_model::document::MovementHeader {
        report_sequence: header_node.child_text("ReportSequence").map(str::to_string),
        primary_period: int_field(header_node, "PrimaryReportPeriod", 0)?,
        secondary_period: match header_node.child_text("SecondaryReportPeriod") {
            Some(raw) if !raw.is_empty() => Some(raw.trim().parse::<i32>().map_err(|_| {
                NaxmlError::InvalidFieldValue {
                    field: "SecondaryReportPeriod".to_string(),
                    reason: format!("not a valid integer: {raw:?}"),
                }
            })?),
            _ => None,
        },
        business_date: parse_business_date(
            required_text(header_node, "BusinessDate", "Header")?,
            "BusinessDate",
        )?,
        begin: match header_node.child_text("Begin") {
            Some(raw) if !raw.is_empty() => Some(parse_timestamp(raw, "Begin")?),
            _ => None,
        },
        end: match header_node.child_text("End") {
            Some(raw) if !raw.is_empty() => Some(parse_timestamp(raw, "End")?),
            _ => None,
        },
        register: header_node.child_text("Register").map(str::to_string),
        cashier: header_node.child_text("Cashier").map(str::to_string),
        till: header_node.child_text("Till").map(str::to_string),
    })
}
