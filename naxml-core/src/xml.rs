//! Generic attributed-tree XML reader.
//!
//! NAXML dialects share no DTD and only loosely share a schema, so rather
//! than derive per-document structs directly with `quick-xml`'s `serialize`
//! feature we read every document into one generic tree first and let
//! `parser::*` pull typed values out of it. This keeps the one layer that
//! must tolerate vendor drift (element order, optional attributes, unknown
//! siblings) separate from the typed model the rest of the crate works with.
//!
//! `quick-xml` has no DTD/external-entity resolver at all, so XXE is not
//! reachable through this reader by construction; a `DocType` event is still
//! rejected explicitly below as defense in depth against a future vendor
//! export that tries to smuggle one in.

use std::collections::HashMap;

use quick_xml::events::Event;
use quick_xml::Reader;

use naxml_model::{NaxmlError, Result};

#[derive(Debug, Clone, Default)]
pub struct XmlNode {
    pub tag: String,
    pub attrs: HashMap<String, String>,
    pub text: String,
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn child(&self, tag: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.tag == tag)
    }

    pub fn children(&self, tag: &str) -> impl Iterator<Item = &XmlNode> {
        self.children.iter().filter(move |c| c.tag == tag)
    }

    pub fn text_trimmed(&self) -> &str {
        self.text.trim()
    }

    pub fn child_text(&self, tag: &str) -> Option<&str> {
        self.child(tag).map(|c| c.text_trimmed())
    }
}

/// Parse the full byte stream into a single root `XmlNode`, failing on any
/// malformed XML or a forbidden `<!DOCTYPE ...>` declaration.
pub fn read_tree(bytes: &[u8]) -> Result<XmlNode> {
    let mut reader = Reader::from_reader(bytes);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
                let mut attrs = HashMap::new();
                for a in e.attributes().flatten() {
                    let key = String::from_utf8_lossy(a.key.as_ref()).to_string();
                    let value = a
                        .decode_and_unescape_value(reader.decoder())
                        .map(|v| v.to_string())
                        .unwrap_or_default();
                    attrs.insert(key, value);
                }
                stack.push(XmlNode {
                    tag,
                    attrs,
                    text: String::new(),
                    children: Vec::new(),
                });
            }
            Ok(Event::Empty(e)) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
                let mut attrs = HashMap::new();
                for a in e.attributes().flatten() {
                    let key = String::from_utf8_lossy(a.key.as_ref()).to_string();
                    let value = a
                        .decode_and_unescape_value(reader.decoder())
                        .map(|v| v.to_string())
                        .unwrap_or_default();
                    attrs.insert(key, value);
                }
                let node = XmlNode {
                    tag,
                    attrs,
                    text: String::new(),
                    children: Vec::new(),
                };
                push_node(&mut stack, &mut root, node);
            }
            Ok(Event::Text(e)) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&e.unescape().unwrap_or_default());
                }
            }
            Ok(Event::End(_)) => {
                if let Some(node) = stack.pop() {
                    push_node(&mut stack, &mut root, node);
                }
            }
            Ok(Event::DocType(_)) => {
                return Err(NaxmlError::InvalidXml {
                    line: 0,
                    column: 0,
                    message: "DOCTYPE declarations are not permitted".to_string(),
                });
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(NaxmlError::InvalidXml {
                    line: reader.buffer_position() as u32,
                    column: 0,
                    message: e.to_string(),
                });
            }
        }
    }

    root.ok_or_else(|| NaxmlError::InvalidXml {
        line: 0,
        column: 0,
        message: "document has no root element".to_string(),
    })
}

fn push_node(stack: &mut Vec<XmlNode>, root: &mut Option<XmlNode>, node: XmlNode) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
    } else {
        *root = Some(node);
    }
}

/// Coerce NAXML's `Y`/`N` boolean convention (case-insensitive, also accepts
/// `true`/`false`) to a `bool`. Unrecognized values are treated as `false`
/// rather than rejected — the vendor dialects are not strict about this.
pub fn coerce_bool(raw: &str) -> bool {
    matches!(raw.trim(), "Y" | "y" | "true" | "True" | "1")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_elements_and_attributes() {
        let xml = br#"<Transaction seq="1"><Total>12.50</Total><Line>A</Line><Line>B</Line></Transaction>"#;
        let root = read_tree(xml).unwrap();
        assert_eq!(root.tag, "Transaction");
        assert_eq!(root.attr("seq"), Some("1"));
        assert_eq!(root.child_text("Total"), Some("12.50"));
        assert_eq!(root.children("Line").count(), 2);
    }

    #[test]
    fn rejects_doctype_declarations() {
        let xml = br#"<!DOCTYPE foo [<!ENTITY xxe SYSTEM "file:///etc/passwd">]><Transaction>&xxe;</Transaction>"#;
        assert!(read_tree(xml).is_err());
    }

    #[test]
    fn coerces_y_n_booleans() {
        assert!(coerce_bool("Y"));
        assert!(!coerce_bool("N"));
        assert!(!coerce_bool("garbage"));
    }

    #[test]
    fn preserves_leading_zero_text_verbatim() {
        let xml = br#"<Department><Code>001</Code></Department>"#;
        let root = read_tree(xml).unwrap();
        assert_eq!(root.child_text("Code"), Some("001"));
    }
}
