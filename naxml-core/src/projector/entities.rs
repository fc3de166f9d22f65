//! Maintenance-document projection: Department/TenderType/TaxRate upserts
//! with field-by-field change detection and Full-vs-Incremental
//! deactivation.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use naxml_model::document::{MaintenanceAction, MaintenanceDocument, MaintenanceEntity, MaintenanceMode};
use naxml_model::entities::{derive_local_code, Department, TaxRate, TenderType};
use naxml_model::ids::{CompanyId, StoreId};
use naxml_model::vendor::PosSource;

/// Result of folding one maintenance document over the entities currently on
/// file: `upserts` are rows to create or update, `deactivate` names the
/// `pos_code`s of rows that should flip `is_active = false`.
pub struct ProjectionResult<T> {
    pub upserts: Vec<T>,
    pub deactivate: Vec<String>,
}

/// Shared fold over a maintenance document's entity list against whatever is
/// on file, generic over the concrete row type via the `build` closure.
/// `Full` mode deactivates every on-file row whose `pos_code` the document
/// doesn't mention; `Incremental` mode only reacts to what's present (a
/// `Delete` action deactivates, everything else is add/update).
fn fold<T: Clone>(
    header_mode: MaintenanceMode,
    entities: &[MaintenanceEntity],
    existing: &HashMap<String, T>,
    build: impl Fn(&MaintenanceEntity, Option<&T>) -> T,
) -> ProjectionResult<T> {
    let mut upserts = Vec::new();
    let mut deactivate = Vec::new();
    let mut seen = std::collections::HashSet::new();

    for entity in entities {
        seen.insert(entity.pos_code.clone());
        let current = existing.get(&entity.pos_code);

        if entity.action == MaintenanceAction::Delete {
            deactivate.push(entity.pos_code.clone());
            continue;
        }

        upserts.push(build(entity, current));
    }

    if header_mode == MaintenanceMode::Full {
        for pos_code in existing.keys() {
            if !seen.contains(pos_code) {
                deactivate.push(pos_code.clone());
            }
        }
    }

    ProjectionResult { upserts, deactivate }
}

pub fn project_departments(
    doc: &MaintenanceDocument,
    store_id: StoreId,
    company_id: CompanyId,
    pos_source: PosSource,
    existing: &HashMap<String, Department>,
    now: DateTime<Utc>,
) -> ProjectionResult<Department> {
    fold(doc.header.mode, &doc.entities, existing, |entity, current| {
        Department {
            store_id,
            company_id,
            code: current
                .map(|d| d.code.clone())
                .unwrap_or_else(|| derive_local_code(&entity.pos_code, &entity.description)),
            pos_code: entity.pos_code.clone(),
            name: entity.description.clone(),
            is_taxable: entity.is_taxable.unwrap_or(false),
            is_active: true,
            pos_source,
            last_synced_at: now,
            created_at: current.map(|d| d.created_at).unwrap_or(now),
            updated_at: now,
        }
    })
}

pub fn project_tender_types(
    doc: &MaintenanceDocument,
    store_id: StoreId,
    company_id: CompanyId,
    pos_source: PosSource,
    existing: &HashMap<String, TenderType>,
    now: DateTime<Utc>,
) -> ProjectionResult<TenderType> {
    fold(doc.header.mode, &doc.entities, existing, |entity, current| {
        TenderType {
            store_id,
            company_id,
            code: current
                .map(|t| t.code.clone())
                .unwrap_or_else(|| derive_local_code(&entity.pos_code, &entity.description)),
            pos_code: entity.pos_code.clone(),
            name: entity.description.clone(),
            is_electronic: entity.is_electronic.unwrap_or(false),
            is_active: true,
            pos_source,
            last_synced_at: now,
            created_at: current.map(|t| t.created_at).unwrap_or(now),
            updated_at: now,
        }
    })
}

pub fn project_tax_rates(
    doc: &MaintenanceDocument,
    store_id: StoreId,
    company_id: CompanyId,
    pos_source: PosSource,
    existing: &HashMap<String, TaxRate>,
    now: DateTime<Utc>,
) -> ProjectionResult<TaxRate> {
    fold(doc.header.mode, &doc.entities, existing, |entity, current| {
        TaxRate {
            store_id,
            company_id,
            code: current
                .map(|t| t.code.clone())
                .unwrap_or_else(|| derive_local_code(&entity.pos_code, &entity.description)),
            pos_code: entity.pos_code.clone(),
            name: entity.description.clone(),
            rate: entity.rate.unwrap_or_default(),
            is_active: true,
            pos_source,
            last_synced_at: now,
            created_at: current.map(|t| t.created_at).unwrap_or(now),
            updated_at: now,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use naxml_model::document::{MaintenanceHeader};
    use chrono::{NaiveDate, Utc};

    fn header(mode: MaintenanceMode) -> MaintenanceHeader {
        MaintenanceHeader {
            store: "4821".to_string(),
            maintenance_date: NaiveDate::from_ymd_opt(2026, 1, 9).unwrap(),
            mode,
        }
    }

    #[test]
    fn full_mode_deactivates_entities_missing_from_document() {
        let doc = MaintenanceDocument {
            header: header(MaintenanceMode::Full),
            entities: vec![MaintenanceEntity {
                pos_code: "01".to_string(),
                description: "Groceries".to_string(),
                is_taxable: Some(true),
                is_electronic: None,
                rate: None,
                action: MaintenanceAction::AddUpdate,
            }],
        };

        let mut existing = HashMap::new();
        existing.insert(
            "02".to_string(),
            Department {
                store_id: StoreId::new(),
                company_id: CompanyId::new(),
                code: "FUEL".to_string(),
                pos_code: "02".to_string(),
                name: "Fuel".to_string(),
                is_taxable: false,
                is_active: true,
                pos_source: PosSource::GilbarcoNaxml,
                last_synced_at: Utc::now(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
        );

        let result = project_departments(
            &doc,
            StoreId::new(),
            CompanyId::new(),
            PosSource::GilbarcoNaxml,
            &existing,
            Utc::now(),
        );

        assert_eq!(result.upserts.len(), 1);
        assert_eq!(result.deactivate, vec!["02".to_string()]);
    }

    #[test]
    fn incremental_mode_does_not_deactivate_missing_entities() {
        let doc = MaintenanceDocument {
            header: header(MaintenanceMode::Incremental),
            entities: vec![MaintenanceEntity {
                pos_code: "01".to_string(),
                description: "Groceries".to_string(),
                is_taxable: Some(true),
                is_electronic: None,
                rate: None,
                action: MaintenanceAction::Add,
            }],
        };

        let mut existing = HashMap::new();
        existing.insert(
            "02".to_string(),
            Department {
                store_id: StoreId::new(),
                company_id: CompanyId::new(),
                code: "FUEL".to_string(),
                pos_code: "02".to_string(),
                name: "Fuel".to_string(),
                is_taxable: false,
                is_active: true,
                pos_source: PosSource::GilbarcoNaxml,
                last_synced_at: Utc::now(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
        );

        let result = project_departments(
            &doc,
            StoreId::new(),
            CompanyId::new(),
            PosSource::GilbarcoNaxml,
            &existing,
            Utc::now(),
        );

        assert!(result.deactivate.is_empty());
        assert_eq!(result.upserts.len(), 1);
    }

    #[test]
    fn explicit_delete_action_deactivates_regardless_of_mode() {
        let doc = MaintenanceDocument {
            header: header(MaintenanceMode::Incremental),
            entities: vec![MaintenanceEntity {
                pos_code: "02".to_string(),
                description: "Fuel".to_string(),
                is_taxable: None,
                is_electronic: None,
                rate: None,
                action: MaintenanceAction::Delete,
            }],
        };

        let result: ProjectionResult<Department> = project_departments(
            &doc,
            StoreId::new(),
            CompanyId::new(),
            PosSource::GilbarcoNaxml,
            &HashMap::new(),
            Utc::now(),
        );

        assert!(result.upserts.is_empty());
        assert_eq!(result.deactivate, vec!["02".to_string()]);
    }
}
