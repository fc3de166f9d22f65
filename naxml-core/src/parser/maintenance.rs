//! Maintenance document parsing: Department/Tender/TaxRate/PriceBook/Employee.

use rust_decimal::Decimal;

use naxml_model::document::{
    MaintenanceAction, MaintenanceDocument, MaintenanceEntity, MaintenanceHeader, MaintenanceMode,
};
use naxml_model::{NaxmlError, Result};

use super::{parse_business_date, required_text};
use crate::xml::XmlNode;

/// `entity_tag` is the repeating child element name for this dialect
/// (`Department`, `Tender`, `TaxRate`, `Item`, `Employee`).
pub fn parse(root: &XmlNode, entity_tag: &str) -> Result<MaintenanceDocument> {
    let header_node = root.child("Header").unwrap_or(root);

    let mode = match header_node.child_text("MaintenanceType").unwrap_or("Incremental") {
        "Full" => MaintenanceMode::Full,
        _ => MaintenanceMode::Incremental,
    };

    let header = MaintenanceHeader {
        store: required_text(header_node, "Store", "Header")?.to_string(),
        maintenance_date: parse_business_date(
            required_text(header_node, "MaintenanceDate", "Header")?,
            "MaintenanceDate",
        )?,
        mode,
    };

    let entities = root
        .children(entity_tag)
        .map(|node| parse_entity(node, entity_tag))
        .collect::<Result<Vec<_>>>()?;

    Ok(MaintenanceDocument { header, entities })
}

fn parse_entity(node: &XmlNode, entity_tag: &str) -> Result<MaintenanceEntity> {
    let pos_code = node
        .child_text("Code")
        .or_else(|| node.attr("Code"))
        .or_else(|| node.child_text(&format!("{entity_tag}Code")))
        .ok_or_else(|| NaxmlError::MissingRequiredField {
            field: "Code".to_string(),
            context: entity_tag.to_string(),
        })?
        .to_string();

    let description = node
        .child_text("Description")
        .or_else(|| node.child_text("Name"))
        .unwrap_or_default()
        .to_string();

    let is_taxable = node.child_text("IsTaxable").map(crate::xml::coerce_bool);
    let is_electronic = node.child_text("IsElectronic").map(crate::xml::coerce_bool);
    let rate = match node.child_text("Rate") {
        Some(raw) if !raw.is_empty() => Some(super::parse_decimal(raw, "Rate")?),
        _ => None::<Decimal>,
    };

    let action = match node.attr("Action").unwrap_or("AddUpdate") {
        "Add" => MaintenanceAction::Add,
        "Update" => MaintenanceAction::Update,
        "Delete" => MaintenanceAction::Delete,
        _ => MaintenanceAction::AddUpdate,
    };

    Ok(MaintenanceEntity {
        pos_code,
        description,
        is_taxable,
        is_electronic,
        rate,
        action,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::read_tree;

    #[test]
    fn parses_full_department_maintenance() {
        let xml = br#"
        <DepartmentMaintenance>
          <Header>
            <Store>4821</Store>
            <MaintenanceDate>2026-01-09</MaintenanceDate>
            <MaintenanceType>Full</MaintenanceType>
          </Header>
          <Department Action="Add"><Code>10</Code><Name>Groceries</Name><IsTaxable>Y</IsTaxable></Department>
          <Department Action="Add"><Code>001</Code><Name>Unleaded</Name><IsTaxable>N</IsTaxable></Department>
        </DepartmentMaintenance>
        "#;
        let root = read_tree(xml).unwrap();
        let doc = parse(&root, "Department").unwrap();
        assert_eq!(doc.header.mode, MaintenanceMode::Full);
        assert_eq!(doc.entities.len(), 2);
        assert_eq!(doc.entities[1].pos_code, "001");
        assert_eq!(doc.entities[0].is_taxable, Some(true));
    }
}
