//! Nav Builder
//!
//! Renders one `<li><a class="menu__link" href="#id">label</a></li>` per
//! section and inserts the whole list at the start of the nav container.
//! Calling it twice inserts a second full set; entries are never deduplicated.

use log::debug;
use markup5ever_rcdom::Handle;

use crate::config::PageConfig;
use crate::dom::{escape_html, Document};
use crate::sections::Section;

pub fn render_nav_items(sections: &[Section], config: &PageConfig) -> String {
    sections
        .iter()
        .map(|section| {
            format!(
                r#"<li><a class="{}" href="{}">{}</a></li>"#,
                escape_html(&config.link_class),
                escape_html(&section.href()),
                escape_html(&section.label)
            )
        })
        .collect()
}

/// Returns the inserted `<li>` nodes
pub fn build_nav(
    document: &mut Document,
    nav_list: &Handle,
    sections: &[Section],
    config: &PageConfig,
) -> Vec<Handle> {
    let html = render_nav_items(sections, config);
    let inserted = document.insert_html_afterbegin(nav_list, &html);
    debug!("[SectionNav] Built {} navigation entries", inserted.len());
    inserted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{attribute, has_class, text_content};
    use crate::sections::scan_sections;
    use crate::selector::Selector;

    const HTML: &str = r#"
        <nav class="navbar__menu"><ul id="navbar__list"><li id="static">Home</li></ul></nav>
        <section id="s1" data-nav="Section 1"></section>
        <section id="s2" data-nav="Fish &amp; Chips"></section>
    "#;

    #[test]
    fn test_entries_precede_existing_children() {
        let mut doc = Document::parse(HTML).unwrap();
        let config = PageConfig::default();
        let sections = scan_sections(&doc, &config).unwrap();
        let list = doc.require(&config.nav_list_selector).unwrap();

        build_nav(&mut doc, &list, &sections, &config);

        let children: Vec<Handle> = list.children.borrow().clone();
        assert_eq!(children.len(), 3);
        assert_eq!(attribute(&children[2], "id").as_deref(), Some("static"));

        let links = doc.select_within(&list, &Selector::parse("a").unwrap());
        assert_eq!(links.len(), 2);
        assert_eq!(attribute(&links[0], "href").as_deref(), Some("#s1"));
        assert!(has_class(&links[0], "menu__link"));
        assert_eq!(text_content(&links[1]), "Fish & Chips");
    }

    #[test]
    fn test_no_sections_leaves_list_untouched() {
        let mut doc = Document::parse(HTML).unwrap();
        let config = PageConfig::default();
        let list = doc.require(&config.nav_list_selector).unwrap();
        assert!(build_nav(&mut doc, &list, &[], &config).is_empty());
        assert_eq!(list.children.borrow().len(), 1);
    }

    #[test]
    fn test_building_twice_duplicates_entries() {
        let mut doc = Document::parse(HTML).unwrap();
        let config = PageConfig::default();
        let sections = scan_sections(&doc, &config).unwrap();
        let list = doc.require(&config.nav_list_selector).unwrap();

        build_nav(&mut doc, &list, &sections, &config);
        build_nav(&mut doc, &list, &sections, &config);

        let hrefs: Vec<String> = doc
            .select_within(&list, &Selector::parse("a").unwrap())
            .iter()
            .filter_map(|link| attribute(link, "href"))
            .collect();
        assert_eq!(hrefs, vec!["#s1", "#s2", "#s1", "#s2"]);
    }
}
