//! Viewport geometry and scroll requests
//!
//! The runtime never measures layout itself. A `Viewport` answers the three
//! questions the controllers ask (viewport height, scroll offset, where an
//! element sits relative to the top of the viewport) and receives the scroll
//! requests they issue.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollRequest {
    pub top: f64,
    pub behavior: ScrollBehavior,
}

impl ScrollRequest {
    pub fn smooth(top: f64) -> Self {
        Self {
            top,
            behavior: ScrollBehavior::Smooth,
        }
    }
}

pub trait Viewport {
    /// `document.documentElement.clientHeight`
    fn client_height(&self) -> f64;

    /// `window.pageYOffset`
    fn scroll_y(&self) -> f64;

    /// Top edge of the element with `id`, relative to the viewport top
    fn bounding_top(&self, id: &str) -> Option<f64>;

    fn scroll_to(&mut self, request: ScrollRequest);
}

// ═══════════════════════════════════════════════════════════════════════════════
// SIMULATED VIEWPORT
// ═══════════════════════════════════════════════════════════════════════════════

/// Static page layout: viewport height plus the absolute offset of each section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    pub viewport_height: f64,
    #[serde(default)]
    pub section_tops: HashMap<String, f64>,
}

/// Viewport driven entirely by its owner. Scroll requests are queued, not
/// applied: a host decides when (and whether) the offset actually changes.
#[derive(Debug, Clone, Default)]
pub struct SimulatedViewport {
    layout: Layout,
    scroll_y: f64,
    requests: Vec<ScrollRequest>,
}

impl SimulatedViewport {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            scroll_y: 0.0,
            requests: Vec::new(),
        }
    }

    pub fn set_scroll_y(&mut self, y: f64) {
        self.scroll_y = y;
    }

    pub fn set_viewport_height(&mut self, height: f64) {
        self.layout.viewport_height = height;
    }

    pub fn set_section_top(&mut self, id: &str, top: f64) {
        self.layout.section_tops.insert(id.to_string(), top);
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn requests(&self) -> &[ScrollRequest] {
        &self.requests
    }

    pub fn take_requests(&mut self) -> Vec<ScrollRequest> {
        std::mem::take(&mut self.requests)
    }
}

impl Viewport for SimulatedViewport {
    fn client_height(&self) -> f64 {
        self.layout.viewport_height
    }

    fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    fn bounding_top(&self, id: &str) -> Option<f64> {
        self.layout
            .section_tops
            .get(id)
            .map(|absolute| absolute - self.scroll_y)
    }

    fn scroll_to(&mut self, request: ScrollRequest) {
        self.requests.push(request);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_top_is_relative_to_scroll() {
        let mut viewport = SimulatedViewport::new(Layout {
            viewport_height: 800.0,
            section_tops: HashMap::from([("s2".to_string(), 1200.0)]),
        });
        assert_eq!(viewport.bounding_top("s2"), Some(1200.0));
        viewport.set_scroll_y(1000.0);
        assert_eq!(viewport.bounding_top("s2"), Some(200.0));
        assert_eq!(viewport.bounding_top("missing"), None);
    }

    #[test]
    fn test_layout_from_json() {
        let layout: Layout =
            serde_json::from_str(r#"{ "viewportHeight": 600, "sectionTops": { "a": 0 } }"#)
                .unwrap();
        assert_eq!(layout.viewport_height, 600.0);
        assert_eq!(layout.section_tops.get("a"), Some(&0.0));
    }
}
