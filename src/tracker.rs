//! Viewport Tracker
//!
//! Marks the section nearest the top of the viewport as active.
//!
//! ## Selection Rule
//!
//! A section qualifies when its top edge lies strictly inside
//! `(-H/2, H/2)` relative to the viewport top, `H` being the viewport height.
//! Sections are visited in document order and every qualifying one replaces
//! the candidate, so the LAST qualifying section wins. With no qualifying
//! section the first section is the candidate. This is not a nearest-distance
//! search: two qualifying sections resolve by order, not by distance.

use log::{debug, trace};

use crate::dom::Document;
use crate::error::{NavError, Result};
use crate::sections::Section;
use crate::viewport::Viewport;

/// Index into the scanned section list
pub fn nearest_section<V: Viewport>(sections: &[Section], viewport: &V) -> Result<Option<usize>> {
    let half = viewport.client_height() / 2.0;
    let mut candidate = if sections.is_empty() { None } else { Some(0) };

    for (index, section) in sections.iter().enumerate() {
        let top = viewport
            .bounding_top(&section.id)
            .ok_or_else(|| NavError::MissingGeometry {
                id: section.id.clone(),
            })?;
        if top < half && top > -half {
            candidate = Some(index);
        }
    }

    trace!("[SectionNav] Nearest section candidate: {:?}", candidate);
    Ok(candidate)
}

#[derive(Debug, Default)]
pub struct ViewportTracker {
    previous: Option<usize>,
    active_class: String,
}

impl ViewportTracker {
    pub fn new(active_class: impl Into<String>) -> Self {
        Self {
            previous: None,
            active_class: active_class.into(),
        }
    }

    pub fn active(&self) -> Option<usize> {
        self.previous
    }

    /// Returns true when the active section changed
    pub fn on_scroll<V: Viewport>(
        &mut self,
        document: &mut Document,
        sections: &[Section],
        viewport: &V,
    ) -> Result<bool> {
        let Some(next) = nearest_section(sections, viewport)? else {
            return Ok(false);
        };

        if self.previous == Some(next) {
            return Ok(false);
        }

        if let Some(previous) = self.previous {
            document.remove_class(&sections[previous].element, &self.active_class);
        }
        document.add_class(&sections[next].element, &self.active_class);
        debug!(
            "[SectionNav] Active section {:?} -> '{}'",
            self.previous.map(|i| sections[i].id.as_str()),
            sections[next].id
        );
        self.previous = Some(next);
        Ok(true)
    }
}
