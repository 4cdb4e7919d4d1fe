//! Replay Module
//!
//! Drives a page on a simulated viewport from a recorded event script. Used
//! by the `navpage` CLI and the Node bridge.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::PageConfig;
use crate::dom::Mutation;
use crate::error::Result;
use crate::page::Page;
use crate::viewport::{Layout, ScrollRequest, SimulatedViewport};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PageEvent {
    /// Click the first element matching the selector
    Click { target: String },
    /// Scroll the viewport to an absolute offset
    Scroll { y: f64 },
    /// Let time pass on the page clock
    Wait { ms: u64 },
    Resize { height: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventError {
    pub index: usize,
    pub event: PageEvent,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayReport {
    pub html: String,
    pub active_section: Option<String>,
    pub mutations: Vec<Mutation>,
    pub scroll_requests: Vec<ScrollRequest>,
    pub errors: Vec<EventError>,
}

pub fn apply_event(page: &mut Page<SimulatedViewport>, event: &PageEvent) -> Result<()> {
    match event {
        PageEvent::Click { target } => page.click_selector(target)?.into_result().map(|_| ()),
        PageEvent::Scroll { y } => page.scroll_to(*y),
        PageEvent::Wait { ms } => {
            page.advance(Duration::from_millis(*ms));
            Ok(())
        }
        PageEvent::Resize { height } => {
            page.viewport_mut().set_viewport_height(*height);
            Ok(())
        }
    }
}

/// Build the page, apply every event in order and report the outcome.
/// Failing events are recorded and the replay continues with the next one.
pub fn replay(
    html: &str,
    layout: Layout,
    config: PageConfig,
    events: &[PageEvent],
) -> Result<ReplayReport> {
    let mut page = Page::new(html, SimulatedViewport::new(layout), config)?;

    let errors = events
        .iter()
        .enumerate()
        .filter_map(|(index, event)| {
            apply_event(&mut page, event).err().map(|e| EventError {
                index,
                event: event.clone(),
                message: e.to_string(),
            })
        })
        .collect();

    Ok(ReplayReport {
        html: page.to_html()?,
        active_section: page.active_section().map(|section| section.id.clone()),
        mutations: page.take_mutations(),
        scroll_requests: page.take_scroll_requests(),
        errors,
    })
}
