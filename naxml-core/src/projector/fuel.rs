//! FuelGradeMovement → `ShiftFuelSummary` folding.
//!
//! Open Question: Gilbarco's `businessDate` on an FGM header names
//! the report's *period start*, not the sales day the totals belong to.
//! DESIGN.md records the decision: the sales day is `businessDate + 1`, and
//! that adjustment happens once, here, rather than being re-derived by every
//! caller.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;

use naxml_model::document::{FgmDetailBody, FgmTotals, FuelGradeMovementDoc};
use naxml_model::fuel::{FuelTenderType, ShiftFuelSummary};
use naxml_model::ids::StoreId;
use naxml_model::Result;

fn sum_totals<'a>(totals: impl Iterator<Item = &'a FgmTotals>) -> FgmTotals {
    let mut acc = FgmTotals::default();
    for t in totals {
        acc.sales_volume += t.sales_volume;
        acc.sales_amount += t.sales_amount;
        acc.discounts += t.discounts;
        acc.count += t.count;
        acc.tax_exempt += t.tax_exempt;
        acc.dispenser_discount += t.dispenser_discount;
    }
    acc
}

fn shift_summary_id(store_id: StoreId, sales_day: chrono::NaiveDate, fuel_grade_id: &str, tender_type: FuelTenderType) -> String {
    format!("{store_id}:{sales_day}:{fuel_grade_id}:{tender_type:?}")
}

/// Fold every detail in an FGM document into one `ShiftFuelSummary` row per
/// `(fuel_grade_id, tender_type)` pair. Position-summary details (pump/side
/// totals rather than tender-split totals) collapse their price tiers into a
/// single `FuelTenderType::Other` row — the position's per-tier split isn't
/// carried into the shift summary, only its sales total.
pub fn fold_fgm_document(
    doc: &FuelGradeMovementDoc,
    store_id: StoreId,
    source_file_hash: &str,
) -> Result<Vec<ShiftFuelSummary>> {
    let sales_day = doc.header.business_date + Duration::days(1);
    let now = Utc::now();

    let mut rows = Vec::with_capacity(doc.details.len());
    for detail in &doc.details {
        let (tender_type, totals) = match &detail.body {
            FgmDetailBody::Tender(tender) => (
                FuelTenderType::from_fgm_code(&tender.tender_code),
                tender.totals.clone(),
            ),
            FgmDetailBody::Position(position) => (
                FuelTenderType::Other,
                sum_totals(position.tiers.iter().map(|tier| &tier.totals)),
            ),
        };

        rows.push(ShiftFuelSummary {
            shift_summary_id: shift_summary_id(store_id, sales_day, &detail.fuel_grade_id, tender_type),
            store_id,
            fuel_grade_id: detail.fuel_grade_id.clone(),
            tender_type,
            volume: totals.sales_volume,
            amount: totals.sales_amount,
            discounts: totals.discounts,
            source_file_hash: source_file_hash.to_string(),
            business_date: sales_day,
            created_at: now,
            updated_at: now,
        });
    }

    Ok(rows)
}

/// Sum of `volume`/`amount` across a set of shift summaries, for folding
/// into a store's `DaySummary`.
pub fn totals_for_day(summaries: &[ShiftFuelSummary]) -> (Decimal, Decimal) {
    summaries.iter().fold((Decimal::ZERO, Decimal::ZERO), |(vol, amt), s| {
        (vol + s.volume, amt + s.amount)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use naxml_model::document::{FgmDetail, FgmPositionSummary, FgmPriceTier, FgmTenderSummary, MovementHeader};

    fn header(business_date: chrono::NaiveDate) -> MovementHeader {
        MovementHeader {
            report_sequence: Some("1".to_string()),
            primary_period: 98,
            secondary_period: None,
            business_date,
            begin: None,
            end: None,
            register: None,
            cashier: None,
            till: None,
        }
    }

    #[test]
    fn business_date_shifts_forward_one_day() {
        let doc = FuelGradeMovementDoc {
            header: header(chrono::NaiveDate::from_ymd_opt(2026, 1, 9).unwrap()),
            details: vec![FgmDetail {
                fuel_grade_id: "1".to_string(),
                body: FgmDetailBody::Tender(FgmTenderSummary {
                    tender_code: "cash".to_string(),
                    sub_code: None,
                    sell_price: None,
                    service_level: None,
                    totals: FgmTotals {
                        sales_volume: Decimal::new(1000, 2),
                        sales_amount: Decimal::new(3500, 2),
                        ..Default::default()
                    },
                }),
            }],
        };

        let rows = fold_fgm_document(&doc, StoreId::new(), "abc123").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].business_date, chrono::NaiveDate::from_ymd_opt(2026, 1, 10).unwrap());
        assert_eq!(rows[0].tender_type, FuelTenderType::Cash);
    }

    #[test]
    fn position_summary_collapses_tiers_into_other() {
        let doc = FuelGradeMovementDoc {
            header: header(chrono::NaiveDate::from_ymd_opt(2026, 1, 9).unwrap()),
            details: vec![FgmDetail {
                fuel_grade_id: "2".to_string(),
                body: FgmDetailBody::Position(FgmPositionSummary {
                    position_id: "03".to_string(),
                    non_resettable_totals: None,
                    tiers: vec![
                        FgmPriceTier {
                            tier_code: "1".to_string(),
                            totals: FgmTotals {
                                sales_volume: Decimal::new(500, 2),
                                sales_amount: Decimal::new(1750, 2),
                                ..Default::default()
                            },
                        },
                        FgmPriceTier {
                            tier_code: "2".to_string(),
                            totals: FgmTotals {
                                sales_volume: Decimal::new(250, 2),
                                sales_amount: Decimal::new(875, 2),
                                ..Default::default()
                            },
                        },
                    ],
                }),
            }],
        };

        let rows = fold_fgm_document(&doc, StoreId::new(), "abc123").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].tender_type, FuelTenderType::Other);
        assert_eq!(rows[0].volume, Decimal::new(750, 2));
        assert_eq!(rows[0].amount, Decimal::new(2625, 2));
    }
}
