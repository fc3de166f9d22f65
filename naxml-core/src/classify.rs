//! AdapterLayer filename classification and path-traversal defense.

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use naxml_model::document::DocumentKind;
use naxml_model::{NaxmlError, Result};

/// One glob pattern (e.g. `"FGM*.xml"`) mapped to the document kind it
/// signals. Patterns are matched case-insensitively.
#[derive(Debug, Clone, Copy)]
pub struct ClassificationRule {
    pub glob: &'static str,
    pub kind: DocumentKind,
}

/// Gilbarco Passport XMLGateway naming convention. Verifone
/// Ruby2 reuses the same table; its adapter additionally accepts upper-case
/// filenames, which the case-insensitive match here already covers.
pub const GILBARCO_RULES: &[ClassificationRule] = &[
    ClassificationRule { glob: "PJR*.xml", kind: DocumentKind::PosJournal },
    ClassificationRule { glob: "FGM*.xml", kind: DocumentKind::FuelGradeMovement },
    ClassificationRule { glob: "FPM*.xml", kind: DocumentKind::FuelProductMovement },
    ClassificationRule { glob: "MSM*.xml", kind: DocumentKind::MiscellaneousSummaryMovement },
    ClassificationRule { glob: "TLM*.xml", kind: DocumentKind::TaxLevelMovement },
    ClassificationRule { glob: "MCM*.xml", kind: DocumentKind::MerchandiseCodeMovement },
    ClassificationRule { glob: "DeptMaint*.xml", kind: DocumentKind::DepartmentMaintenance },
    ClassificationRule { glob: "TenderMaint*.xml", kind: DocumentKind::TenderMaintenance },
    ClassificationRule { glob: "TaxMaint*.xml", kind: DocumentKind::TaxRateMaintenance },
    ClassificationRule { glob: "EmpMaint*.xml", kind: DocumentKind::EmployeeMaintenance },
    ClassificationRule { glob: "PriceBook*.xml", kind: DocumentKind::PriceBookMaintenance },
    ClassificationRule { glob: "Ack*.xml", kind: DocumentKind::Acknowledgment },
    ClassificationRule { glob: "*_Ack.xml", kind: DocumentKind::Acknowledgment },
];

static COMPILED: Lazy<Vec<(Regex, DocumentKind)>> = Lazy::new(|| {
    GILBARCO_RULES
        .iter()
        .map(|rule| (glob_to_regex(rule.glob), rule.kind))
        .collect()
});

/// Escape every regex metacharacter except `*` and `?`, then expand
/// `* → .*` and `? → .`, anchoring both ends and matching
/// case-insensitively.
fn glob_to_regex(glob: &str) -> Regex {
    let mut pattern = String::from("(?i)^");
    for c in glob.chars() {
        match c {
            '*' => pattern.push_str(".*"),
            '?' => pattern.push('.'),
            '.' | '+' | '(' | ')' | '[' | ']' | '{' | '}' | '^' | '$' | '|' | '\\' => {
                pattern.push('\\');
                pattern.push(c);
            }
            _ => pattern.push(c),
        }
    }
    pattern.push('$');
    Regex::new(&pattern).expect("classification globs are fixed and always compile")
}

/// Classify a bare filename (no directory component) against the vendor
/// rule table. Returns `None` if no pattern matches.
pub fn classify_filename(filename: &str) -> Option<DocumentKind> {
    COMPILED
        .iter()
        .find(|(re, _)| re.is_match(filename))
        .map(|(_, kind)| *kind)
}

/// Resolve `candidate` (a path joined from config or vendor input) against
/// `base`, failing with `PATH_TRAVERSAL` unless the normalized candidate
/// stays under the normalized base.
pub fn resolve_within(base: &Path, candidate: &Path) -> Result<PathBuf> {
    let joined = if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        base.join(candidate)
    };

    let normalized_base = normpath::PathExt::normalize_virtually(base)
        .map_err(|e| NaxmlError::Internal(format!("failed to normalize base path: {e}")))?;
    let normalized_candidate = normpath::PathExt::normalize_virtually(&joined)
        .map_err(|e| NaxmlError::Internal(format!("failed to normalize candidate path: {e}")))?;

    if !normalized_candidate
        .as_path()
        .starts_with(normalized_base.as_path())
    {
        return Err(NaxmlError::PathTraversal {
            attempted: joined.to_string_lossy().to_string(),
            base: base.to_string_lossy().to_string(),
        });
    }

    Ok(normalized_candidate.into_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_known_gilbarco_patterns() {
        assert_eq!(
            classify_filename("FGM_20260109-235900.xml"),
            Some(DocumentKind::FuelGradeMovement)
        );
        assert_eq!(
            classify_filename("fgm_lowercase.xml"),
            Some(DocumentKind::FuelGradeMovement)
        );
        assert_eq!(
            classify_filename("export_Ack.xml"),
            Some(DocumentKind::Acknowledgment)
        );
    }

    #[test]
    fn unrecognized_filename_classifies_to_none() {
        assert_eq!(classify_filename("readme.txt"), None);
    }

    #[test]
    fn rejects_traversal_outside_base() {
        let base = Path::new("/data/stores/4821/outbox");
        let escape = Path::new("../../../etc/passwd");
        assert!(resolve_within(base, escape).is_err());
    }

    #[test]
    fn allows_nested_subpath() {
        let base = Path::new("/tmp/naxml-test-base");
        std::fs::create_dir_all(base.join("Processed")).ok();
        let within = Path::new("Processed/FGM_1.xml");
        let resolved = resolve_within(base, within).unwrap();
        assert!(resolved.starts_with(base));
    }
}
