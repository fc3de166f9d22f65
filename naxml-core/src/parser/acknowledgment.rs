//! Acknowledgment document parsing.

use naxml_model::document::AcknowledgmentDoc;
use naxml_model::{NaxmlError, Result};

use super::id_field;
use crate::xml::XmlNode;

pub fn parse(root: &XmlNode) -> Result<AcknowledgmentDoc> {
    let referenced_exchange_id = id_field(root, "ReferencedExchange")
        .or_else(|| id_field(root, "Exchange"))
        .ok_or_else(|| NaxmlError::MissingRequiredField {
            field: "ReferencedExchangeID".to_string(),
            context: "Acknowledgment".to_string(),
        })?
        .to_string();

    let status = root.child_text("Status").unwrap_or("Received").to_string();

    Ok(AcknowledgmentDoc {
        referenced_exchange_id,
        status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::read_tree;

    #[test]
    fn parses_acknowledgment() {
        let xml = br#"<Acknowledgment><ReferencedExchangeID>abc-123</ReferencedExchangeID><Status>Received</Status></Acknowledgment>"#;
        let root = read_tree(xml).unwrap();
        let doc = parse(&root).unwrap();
        assert_eq!(doc.referenced_exchange_id, "abc-123");
    }
}
