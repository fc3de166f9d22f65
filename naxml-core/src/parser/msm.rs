//! MiscellaneousSummaryMovement parsing.

use rust_decimal::Decimal;

use naxml_model::document::{MiscSummaryMovementDoc, MsmDetail, MsmTotals};
use naxml_model::{NaxmlError, Result};

use super::{decimal_field, parse_movement_header};
use crate::xml::XmlNode;

pub fn parse(root: &XmlNode) -> Result<MiscSummaryMovementDoc> {
    let header = parse_movement_header(root)?;

    let details = root
        .children("MSMDetail")
        .map(parse_detail)
        .collect::<Result<Vec<_>>>()?;

    Ok(MiscSummaryMovementDoc { header, details })
}

fn parse_detail(node: &XmlNode) -> Result<MsmDetail> {
    let summary_code = node
        .child_text("SummaryCode")
        .ok_or_else(|| NaxmlError::MissingRequiredField {
            field: "SummaryCode".to_string(),
            context: "MSMDetail".to_string(),
        })?
        .to_string();

    let totals_node = node.child("Totals").unwrap_or(node);
    let totals = MsmTotals {
        amount: decimal_field(totals_node, "Amount", Decimal::ZERO)?,
        count: decimal_field(totals_node, "Count", Decimal::ZERO)?,
        tender: totals_node.child_text("Tender").map(str::to_string),
    };

    Ok(MsmDetail {
        summary_code,
        sub_code: node.child_text("SubCode").map(str::to_string),
        modifier: node.child_text("Modifier").map(str::to_string),
        register: node.child_text("Register").map(str::to_string),
        cashier: node.child_text("Cashier").map(str::to_string),
        till: node.child_text("Till").map(str::to_string),
        totals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::read_tree;

    #[test]
    fn parses_fuel_sales_by_grade_detail() {
        let xml = br#"
        <MiscellaneousSummaryMovement>
          <Header><PrimaryReportPeriod>2</PrimaryReportPeriod><BusinessDate>2026-01-09</BusinessDate></Header>
          <MSMDetail>
            <SummaryCode>fuelSalesByGrade</SummaryCode>
            <SubCode>001</SubCode>
            <Totals><Amount>542.10</Amount><Count>182.3</Count></Totals>
          </MSMDetail>
        </MiscellaneousSummaryMovement>
        "#;
        let root = read_tree(xml).unwrap();
        let doc = parse(&root).unwrap();
        assert_eq!(doc.details[0].summary_code, "fuelSalesByGrade");
        // count holds volume for this summary code, not a transaction count
        assert_eq!(doc.details[0].totals.count.to_string(), "182.3");
    }
}
