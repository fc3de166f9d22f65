//! Transaction ingest output: `Transaction` + `LineItem` + `Payment`.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::ids::{ShiftId, StoreId, TransactionId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "text", rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum PosTransactionType {
    Sale,
    Refund,
    VoidSale,
    NoSale,
    PaidOut,
    PaidIn,
    SafeDrop,
    EndOfShift,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "text", rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum LineItemType {
    Fuel,
    Lottery,
    Prepay,
    Merchandise,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transaction {
    pub id: TransactionId,
    pub store_id: StoreId,
    pub source_file_hash: String,
    pub pos_transaction_id: String,
    pub public_id: String,
    pub business_date: NaiveDate,
    pub timestamp: DateTime<Utc>,
    pub transaction_type: PosTransactionType,
    pub gross_total: Decimal,
    pub net_total: Decimal,
    pub tax_total: Decimal,
    pub grand_total: Decimal,
    pub discount_total: Decimal,
    pub change_due: Decimal,
    pub item_count: i32,
    pub is_training_mode: bool,
    pub is_outside_sale: bool,
    pub is_offline: bool,
    pub is_suspended: bool,
    pub linked_transaction_id: Option<TransactionId>,
    pub link_reason: Option<String>,
    pub shift_id: ShiftId,
    pub cashier_user_id: UserId,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineItem {
    pub transaction_id: TransactionId,
    pub store_id: StoreId,
    pub line_number: i32,
    pub item_code: String,
    pub department_code: String,
    pub line_type: LineItemType,
    pub description: Option<String>,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub extended_price: Decimal,
    pub tax_code: Option<String>,
    pub tax_amount: Decimal,
    pub discount_amount: Decimal,
    pub modifier_codes: Vec<String>,
    pub is_void: bool,
    pub is_refund: bool,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Payment {
    pub transaction_id: TransactionId,
    pub store_id: StoreId,
    pub tender_code: String,
    pub description: Option<String>,
    pub amount: Decimal,
    pub reference: Option<String>,
    pub card_type: Option<String>,
    pub card_last4: Option<String>,
}

/// Derive the public-facing transaction id: `POS-<last 4 of pos_tx_id padded>
/// -<base36 timestamp>`, uppercased.
pub fn derive_public_id(pos_transaction_id: &str, timestamp: DateTime<Utc>) -> String {
    let digits: String = pos_transaction_id
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();
    let last4 = if digits.len() >= 4 {
        digits[digits.len() - 4..].to_string()
    } else {
        format!("{digits:0>4}")
    };

    let secs = timestamp.timestamp().max(0) as u64;
    let base36 = to_base36(secs);

    format!("POS-{last4}-{base36}").to_uppercase()
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut buf = Vec::new();
    while n > 0 {
        buf.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    buf.reverse();
    String::from_utf8(buf).expect("base36 alphabet is ascii")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn public_id_pads_short_transaction_ids() {
        let ts = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let id = derive_public_id("7", ts);
        assert!(id.starts_with("POS-0007-"));
    }

    #[test]
    fn public_id_takes_last_four_digits() {
        let ts = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let id = derive_public_id("99001", ts);
        assert!(id.starts_with("POS-9001-"));
    }

    #[test]
    fn public_id_is_uppercase() {
        let ts = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let id = derive_public_id("42", ts);
        assert_eq!(id, id.to_uppercase());
    }
}
