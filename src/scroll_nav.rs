//! Scroll Navigator
//!
//! Turns a click on a generated navigation link into a smooth scroll to the
//! linked section.

use log::debug;
use markup5ever_rcdom::Handle;

use crate::dom::{attribute, is_element, is_inclusive_descendant, Document};
use crate::error::{NavError, Result};
use crate::highlight::highlight_link;
use crate::viewport::{ScrollRequest, Viewport};

/// What a click did to the navigation list
#[derive(Debug, Clone, PartialEq)]
pub enum LinkClick {
    /// The target is not a link inside the nav list
    Ignored,
    /// The link was flagged and its section scrolled into view
    Scrolled(ScrollRequest),
    /// The link was confirmed and flagged, but its section could not be reached
    Failed(NavError),
}

impl LinkClick {
    /// Once the target is confirmed to be a nav link the host must not follow
    /// its href, whether or not the scroll succeeded.
    pub fn prevents_default(&self) -> bool {
        !matches!(self, LinkClick::Ignored)
    }
}

pub struct ScrollNavigator {
    nav_list: Handle,
    active_link_class: String,
}

impl ScrollNavigator {
    pub fn new(nav_list: Handle, active_link_class: impl Into<String>) -> Self {
        Self {
            nav_list,
            active_link_class: active_link_class.into(),
        }
    }

    pub fn on_click<V: Viewport>(
        &self,
        document: &mut Document,
        viewport: &mut V,
        target: &Handle,
    ) -> LinkClick {
        if !is_inclusive_descendant(target, &self.nav_list) || !is_element(target, "a") {
            return LinkClick::Ignored;
        }

        match self.follow(document, viewport, target) {
            Ok(request) => LinkClick::Scrolled(request),
            Err(e) => LinkClick::Failed(e),
        }
    }

    fn follow<V: Viewport>(
        &self,
        document: &mut Document,
        viewport: &mut V,
        link: &Handle,
    ) -> Result<ScrollRequest> {
        let href = attribute(link, "href").ok_or_else(|| NavError::MissingAttribute {
            tag: "a".to_string(),
            attribute: "href".to_string(),
        })?;

        highlight_link(document, &self.nav_list, &href, &self.active_link_class);

        let id = href.replacen('#', "", 1);
        scroll_to_section(document, viewport, &id)
    }
}

/// Smooth-scroll so the element with `id` lands at the top of the viewport
pub fn scroll_to_section<V: Viewport>(
    document: &Document,
    viewport: &mut V,
    id: &str,
) -> Result<ScrollRequest> {
    if document.element_by_id(id).is_none() {
        return Err(NavError::UnknownSection { id: id.to_string() });
    }

    let relative_top = viewport
        .bounding_top(id)
        .ok_or_else(|| NavError::MissingGeometry { id: id.to_string() })?;

    let request = ScrollRequest::smooth(relative_top + viewport.scroll_y());
    debug!("[SectionNav] Scrolling to '{}' at {}", id, request.top);
    viewport.scroll_to(request);
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::{Layout, SimulatedViewport};
    use std::collections::HashMap;

    const HTML: &str = r##"
        <ul id="navbar__list"><li><a href="#s1">One</a></li><li><a href="#s2">Two</a></li><li><a href="#gone">Gone</a></li></ul>
        <section id="s1"></section><section id="s2"></section>
        <a id="outside" href="#s1">elsewhere</a>
    "##;

    fn setup() -> (Document, SimulatedViewport, ScrollNavigator) {
        let doc = Document::parse(HTML).unwrap();
        let list = doc.require("#navbar__list").unwrap();
        let mut viewport = SimulatedViewport::new(Layout {
            viewport_height: 600.0,
            section_tops: HashMap::from([("s1".to_string(), 0.0), ("s2".to_string(), 900.0)]),
        });
        viewport.set_scroll_y(300.0);
        (doc, viewport, ScrollNavigator::new(list, "activeLink"))
    }

    #[test]
    fn test_link_click_scrolls_to_absolute_offset() {
        let (mut doc, mut viewport, navigator) = setup();
        let link = doc.require(r##"a[href="#s2"]"##).unwrap();

        assert_eq!(
            navigator.on_click(&mut doc, &mut viewport, &link),
            LinkClick::Scrolled(ScrollRequest::smooth(900.0))
        );
        assert_eq!(viewport.requests(), &[ScrollRequest::smooth(900.0)]);
    }

    #[test]
    fn test_non_link_targets_are_ignored() {
        let (mut doc, mut viewport, navigator) = setup();
        let item = doc.require("#navbar__list li").unwrap();
        let outside = doc.require("#outside").unwrap();

        assert_eq!(navigator.on_click(&mut doc, &mut viewport, &item), LinkClick::Ignored);
        assert_eq!(navigator.on_click(&mut doc, &mut viewport, &outside), LinkClick::Ignored);
        assert!(viewport.requests().is_empty());
        assert!(doc.mutations().is_empty());
    }

    #[test]
    fn test_missing_target_section_still_prevents_default() {
        let (mut doc, mut viewport, navigator) = setup();
        let link = doc.require(r##"a[href="#gone"]"##).unwrap();

        let click = navigator.on_click(&mut doc, &mut viewport, &link);
        assert!(click.prevents_default());
        assert_eq!(
            click,
            LinkClick::Failed(NavError::UnknownSection { id: "gone".to_string() })
        );
        assert!(viewport.requests().is_empty());
    }

    #[test]
    fn test_link_without_href_prevents_default() {
        let (mut doc, mut viewport, navigator) = setup();
        let list = doc.require("#navbar__list").unwrap();
        doc.insert_html_afterbegin(&list, "<li><a id=\"bare\">Bare</a></li>");
        let bare = doc.require("#bare").unwrap();

        let click = navigator.on_click(&mut doc, &mut viewport, &bare);
        assert!(click.prevents_default());
        assert!(matches!(click, LinkClick::Failed(NavError::MissingAttribute { .. })));
    }
}
