//! POS-journal transaction ingest projection.
//!
//! This module is intentionally database-free: shift/cashier resolution and
//! the linked-transaction lookup are store-context operations backed by the
//! database, so the service layer resolves them first (via the `database`
//! ports) and passes the resolved ids in. What's left here is pure mapping
//! from the parsed `TransactionDocument` to the row shapes the repositories
//! persist.

use naxml_model::document::{PosEventType, RawLineItem, TransactionDocument};
use naxml_model::ids::{ShiftId, StoreId, TransactionId, UserId};
use naxml_model::transaction::{
    derive_public_id, LineItem, LineItemType, Payment, PosTransactionType, Transaction,
};
use naxml_model::Result;

fn event_to_transaction_type(event: PosEventType) -> PosTransactionType {
    match event {
        PosEventType::Sale => PosTransactionType::Sale,
        PosEventType::Refund => PosTransactionType::Refund,
        PosEventType::VoidSale => PosTransactionType::VoidSale,
        PosEventType::NoSale => PosTransactionType::NoSale,
        PosEventType::PaidOut => PosTransactionType::PaidOut,
        PosEventType::PaidIn => PosTransactionType::PaidIn,
        PosEventType::SafeDrop => PosTransactionType::SafeDrop,
        PosEventType::EndOfShift => PosTransactionType::EndOfShift,
    }
}

/// `itemType` tags that mark a line as a restatement of a tax or tender
/// total rather than a merchandise line; these are dropped from the
/// projected line items.
fn is_synthetic_line(item_type: &Option<String>) -> bool {
    matches!(
        item_type.as_deref().map(str::to_ascii_lowercase).as_deref(),
        Some("tax") | Some("tender")
    )
}

/// No vendor tags a line's department as "fuel" or "lottery" directly;
/// classification goes by keyword match on the department code, item code,
/// and description, in that order.
fn classify_line_type(item: &RawLineItem) -> LineItemType {
    let haystack = format!(
        "{} {} {}",
        item.department_code,
        item.item_code,
        item.description.as_deref().unwrap_or("")
    )
    .to_ascii_uppercase();

    if haystack.contains("FUEL") || haystack.contains("GAS") || haystack.contains("DIESEL") {
        LineItemType::Fuel
    } else if haystack.contains("LOTTO") || haystack.contains("LOTTERY") {
        LineItemType::Lottery
    } else if haystack.contains("PREPAY") || haystack.contains("PRE-PAY") {
        LineItemType::Prepay
    } else {
        LineItemType::Merchandise
    }
}

/// Build the `Transaction` + filtered `LineItem`/`Payment` rows for one
/// parsed POS-journal entry. `shift_id`/`cashier_user_id` and
/// `linked_transaction_id` must already be resolved by the caller. An
/// unresolved `linked_transaction_pos_id` is not an error — it's recorded as
/// `None` and left for a later pass once the referenced transaction arrives.
pub fn project_transaction(
    doc: &TransactionDocument,
    store_id: StoreId,
    source_file_hash: &str,
    shift_id: ShiftId,
    cashier_user_id: UserId,
    linked_transaction_id: Option<TransactionId>,
) -> Result<(Transaction, Vec<LineItem>, Vec<Payment>)> {
    let id = TransactionId::new();
    let public_id = derive_public_id(&doc.header.pos_transaction_id, doc.header.transaction_date);

    let transaction = Transaction {
        id,
        store_id,
        source_file_hash: source_file_hash.to_string(),
        pos_transaction_id: doc.header.pos_transaction_id.clone(),
        public_id,
        business_date: doc.header.business_date,
        timestamp: doc.header.transaction_date,
        transaction_type: event_to_transaction_type(doc.header.event_type),
        gross_total: doc.totals.subtotal,
        net_total: doc.totals.subtotal - doc.totals.discount_total,
        tax_total: doc.totals.tax_total,
        grand_total: doc.totals.grand_total,
        discount_total: doc.totals.discount_total,
        change_due: doc.totals.change_due,
        item_count: doc.totals.item_count,
        is_training_mode: doc.is_training_mode,
        is_outside_sale: doc.is_outside_sale,
        is_offline: doc.is_offline,
        is_suspended: doc.is_suspended,
        linked_transaction_id,
        link_reason: linked_transaction_id.map(|_| "vendor-linked".to_string()),
        shift_id,
        cashier_user_id,
        created_at: doc.header.transaction_date,
    };

    let line_items = doc
        .line_items
        .iter()
        .filter(|item| !is_synthetic_line(&item.item_type))
        .map(|item| LineItem {
            transaction_id: id,
            store_id,
            line_number: item.line_number,
            item_code: item.item_code.clone(),
            department_code: item.department_code.clone(),
            line_type: classify_line_type(item),
            description: item.description.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price,
            extended_price: item.extended_price,
            tax_code: item.tax_code.clone(),
            tax_amount: item.tax_amount,
            discount_amount: item.discount_amount,
            modifier_codes: item.modifier_codes.clone(),
            is_void: item.is_void,
            is_refund: item.is_refund,
        })
        .collect();

    let payments = doc
        .tenders
        .iter()
        .filter(|tender| !tender.is_change)
        .map(|tender| Payment {
            transaction_id: id,
            store_id,
            tender_code: tender.code.clone(),
            description: tender.description.clone(),
            amount: tender.amount,
            reference: tender.reference.clone(),
            card_type: tender.card_type.clone(),
            card_last4: tender.card_last4.clone(),
        })
        .collect();

    Ok((transaction, line_items, payments))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use naxml_model::document::{TransactionHeader, TransactionTotals};
    use rust_decimal::Decimal;

    fn sample_doc() -> TransactionDocument {
        TransactionDocument {
            header: TransactionHeader {
                store: "4821".to_string(),
                terminal: Some("1".to_string()),
                pos_transaction_id: "99001".to_string(),
                business_date: NaiveDate::from_ymd_opt(2026, 1, 9).unwrap(),
                transaction_date: Utc.with_ymd_and_hms(2026, 1, 9, 14, 30, 0).unwrap(),
                event_type: PosEventType::Sale,
            },
            line_items: vec![
                RawLineItem {
                    line_number: 1,
                    item_code: "12345".to_string(),
                    department_code: "FUEL01".to_string(),
                    item_type: None,
                    extended_price: Decimal::new(2500, 2),
                    ..Default::default()
                },
                RawLineItem {
                    line_number: 2,
                    item_code: "TAXLINE".to_string(),
                    department_code: "TAX".to_string(),
                    item_type: Some("tax".to_string()),
                    ..Default::default()
                },
            ],
            tenders: vec![],
            taxes: vec![],
            totals: TransactionTotals {
                subtotal: Decimal::new(2500, 2),
                tax_total: Decimal::ZERO,
                grand_total: Decimal::new(2500, 2),
                discount_total: Decimal::ZERO,
                change_due: Decimal::ZERO,
                item_count: 1,
            },
            is_training_mode: false,
            is_outside_sale: true,
            is_offline: false,
            is_suspended: false,
            linked_transaction_pos_id: None,
        }
    }

    #[test]
    fn filters_synthetic_tax_lines() {
        let doc = sample_doc();
        let (_, line_items, _) = project_transaction(
            &doc,
            StoreId::new(),
            "hash",
            ShiftId::new(),
            UserId::new(),
            None,
        )
        .unwrap();
        assert_eq!(line_items.len(), 1);
        assert_eq!(line_items[0].line_type, LineItemType::Fuel);
    }

    #[test]
    fn excludes_change_tenders_from_payments() {
        let mut doc = sample_doc();
        doc.tenders.push(naxml_model::document::RawTender {
            code: "CASH".to_string(),
            amount: Decimal::new(3000, 2),
            is_change: false,
            ..Default::default()
        });
        doc.tenders.push(naxml_model::document::RawTender {
            code: "CASH".to_string(),
            amount: Decimal::new(500, 2),
            is_change: true,
            ..Default::default()
        });

        let (_, _, payments) = project_transaction(
            &doc,
            StoreId::new(),
            "hash",
            ShiftId::new(),
            UserId::new(),
            None,
        )
        .unwrap();
        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].amount, Decimal::new(3000, 2));
    }
}
