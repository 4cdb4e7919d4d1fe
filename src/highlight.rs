//! Active-Link Highlighter

use markup5ever_rcdom::Handle;

use crate::dom::{attribute, is_element, Document};

/// Flag the link whose `href` equals `href` and clear every other link in
/// `nav_list`. Stateless: the result depends only on the list and `href`.
pub fn highlight_link(document: &mut Document, nav_list: &Handle, href: &str, active_class: &str) {
    let mut links = Vec::new();
    collect_links(nav_list, &mut links);

    for link in links {
        if attribute(&link, "href").as_deref() == Some(href) {
            document.add_class(&link, active_class);
        } else {
            document.remove_class(&link, active_class);
        }
    }
}

fn collect_links(node: &Handle, out: &mut Vec<Handle>) {
    for child in node.children.borrow().iter() {
        if is_element(child, "a") {
            out.push(child.clone());
        }
        collect_links(child, out);
    }
}
