//! FuelGradeMovement parsing and validation. A single FGM document reports
//! one store's fuel sales for one business date; each `detail` element folds
//! into a position-level summary.

use rust_decimal::Decimal;

use naxml_model::document::{
    FgmDetail, FgmDetailBody, FgmPositionSummary, FgmPriceTier, FgmTenderSummary, FgmTotals,
    FuelGradeMovementDoc, MovementHeader,
};
use naxml_model::fuel::FuelTenderType;
use naxml_model::{NaxmlError, Result};

use super::{decimal_field, int_field, parse_movement_header};
use crate::xml::XmlNode;

const FUEL_TENDER_ALLOWLIST: &[&str] = &[
    "cash",
    "outsideCredit",
    "outsideDebit",
    "insideCredit",
    "insideDebit",
    "fleet",
];

pub fn parse(root: &XmlNode) -> Result<FuelGradeMovementDoc> {
    let header = parse_movement_header(root)?;

    if header.primary_period != 2 && header.primary_period != 98 {
        return Err(NaxmlError::FgmInvalidPrimaryPeriod(header.primary_period));
    }

    let details = root
        .children("FGMDetail")
        .map(parse_detail)
        .collect::<Result<Vec<_>>>()?;

    Ok(FuelGradeMovementDoc { header, details })
}

fn parse_detail(node: &XmlNode) -> Result<FgmDetail> {
    let fuel_grade_id = super::id_field(node, "FuelGrade")
        .filter(|s| !s.is_empty())
        .ok_or(NaxmlError::FgmMissingGradeId)?
        .to_string();

    let body = if let Some(tender_node) = node.child("FGMTenderSummary") {
        FgmDetailBody::Tender(parse_tender_summary(tender_node)?)
    } else if let Some(position_node) = node.child("FGMPositionSummary") {
        // Multiple FGMPositionSummary siblings may be present; only the
        // first is kept. See DESIGN.md for the aggregation decision.
        FgmDetailBody::Position(parse_position_summary(position_node, node)?)
    } else {
        return Err(NaxmlError::MissingRequiredField {
            field: "FGMTenderSummary|FGMPositionSummary".to_string(),
            context: "FGMDetail".to_string(),
        });
    };

    Ok(FgmDetail { fuel_grade_id, body })
}

fn parse_tender_summary(node: &XmlNode) -> Result<FgmTenderSummary> {
    let tender_code = node
        .child_text("Tender")
        .ok_or_else(|| NaxmlError::MissingRequiredField {
            field: "Tender".to_string(),
            context: "FGMTenderSummary".to_string(),
        })?
        .to_string();

    if !FUEL_TENDER_ALLOWLIST.contains(&tender_code.as_str()) {
        return Err(NaxmlError::FgmInvalidTenderCode(tender_code));
    }
    // validated above; kept available for callers that want the enum too
    let _ = FuelTenderType::from_fgm_code(&tender_code);

    let sell_price = match node.child_text("SellPrice") {
        Some(raw) if !raw.is_empty() => Some(super::parse_decimal(raw, "SellPrice")?),
        _ => None,
    };

    Ok(FgmTenderSummary {
        tender_code,
        sub_code: node.child_text("SubCode").map(str::to_string),
        sell_price,
        service_level: node.child_text("ServiceLevel").map(str::to_string),
        totals: parse_totals(node)?,
    })
}

fn parse_position_summary(node: &XmlNode, detail_node: &XmlNode) -> Result<FgmPositionSummary> {
    let position_id = super::id_field(node, "Position")
        .or_else(|| super::id_field(node, "FuelPosition"))
        .unwrap_or_default()
        .to_string();

    let non_resettable_totals = node
        .child("NonResettableTotals")
        .map(parse_totals)
        .transpose()?;

    let tiers = detail_node
        .children("FGMPositionSummary")
        .flat_map(|n| n.children("FGMPriceTierSummary"))
        .map(parse_price_tier)
        .collect::<Result<Vec<_>>>()?;

    Ok(FgmPositionSummary {
        position_id,
        non_resettable_totals,
        tiers,
    })
}

fn parse_price_tier(node: &XmlNode) -> Result<FgmPriceTier> {
    Ok(FgmPriceTier {
        tier_code: node.child_text("TierCode").unwrap_or_default().to_string(),
        totals: parse_totals(node)?,
    })
}

fn parse_totals(node: &XmlNode) -> Result<FgmTotals> {
    let sales_volume = decimal_field(node, "SalesVolume", Decimal::ZERO)?;
    if sales_volume < Decimal::ZERO {
        return Err(NaxmlError::FgmInvalidSalesVolume(sales_volume));
    }
    let sales_amount = decimal_field(node, "SalesAmount", Decimal::ZERO)?;
    if sales_amount < Decimal::ZERO {
        return Err(NaxmlError::FgmInvalidSalesAmount(sales_amount));
    }

    Ok(FgmTotals {
        sales_volume,
        sales_amount,
        discounts: decimal_field(node, "Discounts", Decimal::ZERO)?,
        count: int_field(node, "Count", 0)?,
        tax_exempt: decimal_field(node, "TaxExempt", Decimal::ZERO)?,
        dispenser_discount: decimal_field(node, "DispenserDiscount", Decimal::ZERO)?,
        pump_test_volume: match node.child_text("PumpTestVolume") {
            Some(raw) if !raw.is_empty() => Some(super::parse_decimal(raw, "PumpTestVolume")?),
            _ => None,
        },
        pump_test_amount: match node.child_text("PumpTestAmount") {
            Some(raw) if !raw.is_empty() => Some(super::parse_decimal(raw, "PumpTestAmount")?),
            _ => None,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::read_tree;

    fn sample(period: &str, volume: &str) -> Vec<u8> {
        format!(
            r#"
        <FuelGradeMovement>
          <Header>
            <ReportSequence>42</ReportSequence>
            <PrimaryReportPeriod>{period}</PrimaryReportPeriod>
            <BusinessDate>2026-01-09</BusinessDate>
          </Header>
          <FGMDetail>
            <FuelGradeID>001</FuelGradeID>
            <FGMTenderSummary>
              <Tender>cash</Tender>
              <SalesVolume>{volume}</SalesVolume>
              <SalesAmount>10.00</SalesAmount>
            </FGMTenderSummary>
          </FGMDetail>
        </FuelGradeMovement>
        "#
        )
        .into_bytes()
    }

    #[test]
    fn parses_valid_tender_detail() {
        let root = read_tree(&sample("2", "5.0")).unwrap();
        let doc = parse(&root).unwrap();
        assert_eq!(doc.details.len(), 1);
        assert_eq!(doc.details[0].fuel_grade_id, "001");
    }

    #[test]
    fn negative_volume_is_rejected() {
        let root = read_tree(&sample("2", "-1.0")).unwrap();
        assert!(matches!(
            parse(&root),
            Err(NaxmlError::FgmInvalidSalesVolume(_))
        ));
    }

    #[test]
    fn invalid_primary_period_is_rejected() {
        let root = read_tree(&sample("7", "5.0")).unwrap();
        assert!(matches!(
            parse(&root),
            Err(NaxmlError::FgmInvalidPrimaryPeriod(7))
        ));
    }

    #[test]
    fn unknown_tender_code_is_rejected() {
        let xml = br#"
        <FuelGradeMovement>
          <Header><PrimaryReportPeriod>2</PrimaryReportPeriod><BusinessDate>2026-01-09</BusinessDate></Header>
          <FGMDetail>
            <FuelGradeID>001</FuelGradeID>
            <FGMTenderSummary><Tender>giftCard</Tender><SalesVolume>1</SalesVolume><SalesAmount>1</SalesAmount></FGMTenderSummary>
          </FGMDetail>
        </FuelGradeMovement>
        "#;
        let root = read_tree(xml).unwrap();
        assert!(matches!(
            parse(&root),
            Err(NaxmlError::FgmInvalidTenderCode(_))
        ));
    }
}
