//! FuelProductMovement parsing.

use rust_decimal::Decimal;

use naxml_model::document::{FpmDetail, FpmReading, FuelProductMovementDoc};
use naxml_model::{NaxmlError, Result};

use super::{decimal_field, parse_movement_header};
use crate::xml::XmlNode;

pub fn parse(root: &XmlNode) -> Result<FuelProductMovementDoc> {
    let header = parse_movement_header(root)?;

    let details = root
        .children("FPMDetail")
        .map(parse_detail)
        .collect::<Result<Vec<_>>>()?;

    Ok(FuelProductMovementDoc { header, details })
}

fn parse_detail(node: &XmlNode) -> Result<FpmDetail> {
    let fuel_product_id = super::id_field(node, "FuelProduct")
        .filter(|s| !s.is_empty())
        .ok_or(NaxmlError::FpmMissingProductId)?
        .to_string();

    let rows = node
        .children("FPMNonResettableTotal")
        .map(parse_reading)
        .collect::<Result<Vec<_>>>()?;

    if rows.is_empty() {
        return Err(NaxmlError::MissingRequiredField {
            field: "FPMNonResettableTotal".to_string(),
            context: "FPMDetail".to_string(),
        });
    }

    Ok(FpmDetail {
        fuel_product_id,
        rows,
    })
}

fn parse_reading(node: &XmlNode) -> Result<FpmReading> {
    let fuel_position_id = super::id_field(node, "FuelPosition")
        .filter(|s| !s.is_empty())
        .ok_or(NaxmlError::FpmMissingPositionId)?
        .to_string();

    let cumulative_volume = decimal_field(node, "CumulativeVolume", Decimal::ZERO)?;
    if cumulative_volume < Decimal::ZERO {
        return Err(NaxmlError::FpmInvalidVolume(cumulative_volume));
    }
    let cumulative_amount = decimal_field(node, "CumulativeAmount", Decimal::ZERO)?;
    if cumulative_amount < Decimal::ZERO {
        return Err(NaxmlError::FpmInvalidAmount(cumulative_amount));
    }

    Ok(FpmReading {
        fuel_position_id,
        cumulative_volume,
        cumulative_amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::read_tree;

    #[test]
    fn parses_product_movement_with_readings() {
        let xml = br#"
        <FuelProductMovement>
          <Header><PrimaryReportPeriod>2</PrimaryReportPeriod><BusinessDate>2026-01-09</BusinessDate></Header>
          <FPMDetail>
            <FuelProductID>GAS</FuelProductID>
            <FPMNonResettableTotal>
              <FuelPositionID>1</FuelPositionID>
              <CumulativeVolume>10532.4</CumulativeVolume>
              <CumulativeAmount>32451.22</CumulativeAmount>
            </FPMNonResettableTotal>
          </FPMDetail>
        </FuelProductMovement>
        "#;
        let root = read_tree(xml).unwrap();
        let doc = parse(&root).unwrap();
        assert_eq!(doc.details[0].rows[0].fuel_position_id, "1");
    }

    #[test]
    fn missing_reading_rows_is_rejected() {
        let xml = br#"
        <FuelProductMovement>
          <Header><PrimaryReportPeriod>2</PrimaryReportPeriod><BusinessDate>2026-01-09</BusinessDate></Header>
          <FPMDetail><FuelProductID>GAS</FuelProductID></FPMDetail>
        </FuelProductMovement>
        "#;
        let root = read_tree(xml).unwrap();
        assert!(parse(&root).is_err());
    }
}
