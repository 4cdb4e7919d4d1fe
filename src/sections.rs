//! Section Scanner
//!
//! Reads the navigable sections and their menu labels once, in document order.

use log::warn;
use markup5ever_rcdom::Handle;
use std::collections::HashSet;
use std::fmt;

use crate::config::PageConfig;
use crate::dom::{attribute, tag_name, Document};
use crate::error::{NavError, Result};
use crate::selector::Selector;

#[derive(Clone)]
pub struct Section {
    pub id: String,
    pub label: String,
    pub element: Handle,
}

impl fmt::Debug for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Section")
            .field("id", &self.id)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl Section {
    pub fn href(&self) -> String {
        format!("#{}", self.id)
    }
}

pub fn scan_sections(document: &Document, config: &PageConfig) -> Result<Vec<Section>> {
    let selector = Selector::parse(&config.section_selector)?;
    let mut seen = HashSet::new();
    let mut sections = Vec::new();

    for (index, element) in document.select_all(&selector).into_iter().enumerate() {
        let id = attribute(&element, "id")
            .filter(|id| !id.is_empty())
            .ok_or(NavError::SectionWithoutId { index })?;

        if !seen.insert(id.clone()) {
            return Err(NavError::DuplicateSectionId { id });
        }

        let label = attribute(&element, &config.nav_label_attribute).ok_or_else(|| {
            NavError::MissingAttribute {
                tag: tag_name(&element).unwrap_or_default(),
                attribute: config.nav_label_attribute.clone(),
            }
        })?;

        sections.push(Section { id, label, element });
    }

    if sections.is_empty() {
        warn!(
            "[SectionNav] No elements match '{}', navigation will be empty",
            config.section_selector
        );
    }

    Ok(sections)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(html: &str) -> Result<Vec<Section>> {
        scan_sections(&Document::parse(html).unwrap(), &PageConfig::default())
    }

    #[test]
    fn test_scan_keeps_document_order() {
        let sections = scan(
            r#"<main>
                <section id="s1" data-nav="Section 1"></section>
                <div><section id="s2" data-nav="Section 2"></section></div>
                <section id="s3" data-nav="Section 3"></section>
            </main>"#,
        )
        .unwrap();

        let ids: Vec<&str> = sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["s1", "s2", "s3"]);
        assert_eq!(sections[1].label, "Section 2");
        assert_eq!(sections[1].href(), "#s2");
    }

    #[test]
    fn test_empty_document_yields_no_sections() {
        assert!(scan("<main><p>nothing here</p></main>").unwrap().is_empty());
    }

    #[test]
    fn test_markup_mismatches_are_reported() {
        assert_eq!(
            scan(r#"<section data-nav="x"></section>"#).unwrap_err(),
            NavError::SectionWithoutId { index: 0 }
        );
        assert_eq!(
            scan(r#"<section id="a" data-nav="x"></section><section id="a" data-nav="y"></section>"#)
                .unwrap_err(),
            NavError::DuplicateSectionId { id: "a".to_string() }
        );
        assert!(matches!(
            scan(r#"<section id="a"></section>"#).unwrap_err(),
            NavError::MissingAttribute { .. }
        ));
    }
}
