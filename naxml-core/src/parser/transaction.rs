//! TransactionDocument / POSJournal parsing.

use rust_decimal::Decimal;

use naxml_model::document::{
    PosEventType, RawLineItem, RawTax, RawTender, TransactionDocument, TransactionHeader,
    TransactionTotals,
};
use naxml_model::{NaxmlError, Result};

use super::{
    bool_field, decimal_field, id_field, int_field, parse_business_date, parse_timestamp,
    required_text,
};
use crate::xml::XmlNode;

pub fn parse(root: &XmlNode) -> Result<TransactionDocument> {
    let header_node = root.child("Header").unwrap_or(root);

    let event_type = parse_event_type(required_text(header_node, "EventType", "Header")?)?;

    let header = TransactionHeader {
        store: required_text(header_node, "Store", "Header")?.to_string(),
        terminal: header_node.child_text("Terminal").map(str::to_string),
        pos_transaction_id: id_field(header_node, "POSTransaction")
            .ok_or_else(|| NaxmlError::MissingRequiredField {
                field: "POSTransactionID".to_string(),
                context: "Header".to_string(),
            })?
            .to_string(),
        business_date: parse_business_date(
            required_text(header_node, "BusinessDate", "Header")?,
            "BusinessDate",
        )?,
        transaction_date: parse_timestamp(
            required_text(header_node, "TransactionDate", "Header")?,
            "TransactionDate",
        )?,
        event_type,
    };

    let line_items = root
        .child("LineItems")
        .map(|items| {
            items
                .children("LineItem")
                .map(parse_line_item)
                .collect::<Result<Vec<_>>>()
        })
        .transpose()?
        .unwrap_or_default();

    let tenders = root
        .child("Tenders")
        .map(|tenders| {
            tenders
                .children("Tender")
                .map(parse_tender)
                .collect::<Result<Vec<_>>>()
        })
        .transpose()?
        .unwrap_or_default();

    let taxes = root
        .child("Taxes")
        .map(|taxes| {
            taxes
                .children("Tax")
                .map(parse_tax)
                .collect::<Result<Vec<_>>>()
        })
        .transpose()?
        .unwrap_or_default();

    let totals_node = root.child("Totals").unwrap_or(root);
    let totals = TransactionTotals {
        subtotal: decimal_field(totals_node, "Subtotal", Decimal::ZERO)?,
        tax_total: decimal_field(totals_node, "TaxTotal", Decimal::ZERO)?,
        grand_total: decimal_field(totals_node, "GrandTotal", Decimal::ZERO)?,
        discount_total: decimal_field(totals_node, "DiscountTotal", Decimal::ZERO)?,
        change_due: decimal_field(totals_node, "ChangeDue", Decimal::ZERO)?,
        item_count: int_field(totals_node, "ItemCount", line_items.len() as i32)?,
    };

    Ok(TransactionDocument {
        header,
        line_items,
        tenders,
        taxes,
        totals,
        is_training_mode: bool_field(root, "IsTrainingMode"),
        is_outside_sale: bool_field(root, "IsOutsideSale"),
        is_offline: bool_field(root, "IsOffline"),
        is_suspended: bool_field(root, "IsSuspended"),
        linked_transaction_pos_id: id_field(root, "LinkedTransaction").map(str::to_string),
    })
}

fn parse_event_type(raw: &str) -> Result<PosEventType> {
    match raw {
        "Sale" => Ok(PosEventType::Sale),
        "Refund" => Ok(PosEventType::Refund),
        "VoidSale" => Ok(PosEventType::VoidSale),
        "NoSale" => Ok(PosEventType::NoSale),
        "PaidOut" => Ok(PosEventType::PaidOut),
        "PaidIn" => Ok(PosEventType::PaidIn),
        "SafeDrop" => Ok(PosEventType::SafeDrop),
        "EndOfShift" => Ok(PosEventType::EndOfShift),
        other => Err(NaxmlError::InvalidFieldValue {
            field: "EventType".to_string(),
            reason: format!("unrecognized transaction event type: {other:?}"),
        }),
    }
}

fn parse_line_item(node: &XmlNode) -> Result<RawLineItem> {
    let modifier_codes = node
        .child("ModifierCodes")
        .map(|n| {
            n.children("ModifierCode")
                .map(|c| c.text_trimmed().to_string())
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    Ok(RawLineItem {
        line_number: int_field(node, "LineNumber", 0)?,
        item_code: required_text(node, "ItemCode", "LineItem")?.to_string(),
        department_code: required_text(node, "DepartmentCode", "LineItem")?.to_string(),
        item_type: node.child_text("ItemType").map(str::to_string),
        description: node.child_text("Description").map(str::to_string),
        quantity: decimal_field(node, "Quantity", Decimal::ONE)?,
        unit_price: decimal_field(node, "UnitPrice", Decimal::ZERO)?,
        extended_price: decimal_field(node, "ExtendedPrice", Decimal::ZERO)?,
        tax_code: node.child_text("TaxCode").map(str::to_string),
        tax_amount: decimal_field(node, "TaxAmount", Decimal::ZERO)?,
        discount_amount: decimal_field(node, "DiscountAmount", Decimal::ZERO)?,
        modifier_codes,
        is_void: bool_field(node, "IsVoid"),
        is_refund: bool_field(node, "IsRefund"),
    })
}

fn parse_tender(node: &XmlNode) -> Result<RawTender> {
    Ok(RawTender {
        code: required_text(node, "Code", "Tender")?.to_string(),
        description: node.child_text("Description").map(str::to_string),
        amount: decimal_field(node, "Amount", Decimal::ZERO)?,
        reference: node.child_text("Reference").map(str::to_string),
        card_type: node.child_text("CardType").map(str::to_string),
        card_last4: node.child_text("CardLast4").map(str::to_string),
        change_given: match node.child_text("ChangeGiven") {
            Some(raw) if !raw.is_empty() => Some(super::parse_decimal(raw, "ChangeGiven")?),
            _ => None,
        },
        is_change: bool_field(node, "IsChange"),
    })
}

fn parse_tax(node: &XmlNode) -> Result<RawTax> {
    Ok(RawTax {
        code: required_text(node, "Code", "Tax")?.to_string(),
        taxable_amount: decimal_field(node, "TaxableAmount", Decimal::ZERO)?,
        tax_amount: decimal_field(node, "TaxAmount", Decimal::ZERO)?,
        tax_rate: decimal_field(node, "TaxRate", Decimal::ZERO)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::read_tree;

    #[test]
    fn parses_minimal_sale_transaction() {
        let xml = br#"
        <TransactionDocument>
          <Header>
            <Store>4821</Store>
            <POSTransactionID>99001</POSTransactionID>
            <BusinessDate>2026-01-09</BusinessDate>
            <TransactionDate>2026-01-09T23:12:00Z</TransactionDate>
            <EventType>Sale</EventType>
          </Header>
          <LineItems>
            <LineItem>
              <LineNumber>1</LineNumber>
              <ItemCode>001</ItemCode>
              <DepartmentCode>10</DepartmentCode>
              <Quantity>2</Quantity>
              <UnitPrice>1.50</UnitPrice>
              <ExtendedPrice>3.00</ExtendedPrice>
            </LineItem>
          </LineItems>
          <Tenders>
            <Tender><Code>CASH</Code><Amount>3.00</Amount></Tender>
          </Tenders>
          <Totals>
            <Subtotal>3.00</Subtotal>
            <GrandTotal>3.00</GrandTotal>
          </Totals>
        </TransactionDocument>
        "#;
        let root = read_tree(xml).unwrap();
        let doc = parse(&root).unwrap();
        assert_eq!(doc.header.store, "4821");
        assert_eq!(doc.header.pos_transaction_id, "99001");
        assert_eq!(doc.line_items.len(), 1);
        assert_eq!(doc.line_items[0].item_code, "001");
        assert_eq!(doc.tenders.len(), 1);
    }

    #[test]
    fn missing_pos_transaction_id_fails() {
        let xml = br#"
        <TransactionDocument>
          <Header>
            <Store>4821</Store>
            <BusinessDate>2026-01-09</BusinessDate>
            <TransactionDate>2026-01-09T23:12:00Z</TransactionDate>
            <EventType>Sale</EventType>
          </Header>
        </TransactionDocument>
        "#;
        let root = read_tree(xml).unwrap();
        assert!(parse(&root).is_err());
    }
}
