//! Node bridge
//!
//! Exposes the page runtime to JavaScript hosts. Structured values cross the
//! boundary as JSON strings, matching the rest of the native API.

use napi_derive::napi;

use crate::config::PageConfig;
use crate::error::NavError;
use crate::page::{ClickOutcome, Page};
use crate::replay::{replay, PageEvent};
use crate::viewport::{Layout, SimulatedViewport};

fn to_napi(e: NavError) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_json<T: serde::de::DeserializeOwned>(json: &str, what: &str) -> napi::Result<T> {
    serde_json::from_str(json)
        .map_err(|e| napi::Error::from_reason(format!("Invalid {}: {}", what, e)))
}

fn to_json<T: serde::Serialize>(value: &T) -> napi::Result<String> {
    serde_json::to_string(value).map_err(|e| napi::Error::from_reason(e.to_string()))
}

fn load_config(config_json: Option<String>) -> napi::Result<PageConfig> {
    match config_json {
        Some(json) => PageConfig::from_json(&json).map_err(to_napi),
        None => Ok(PageConfig::default()),
    }
}

/// Click result handed to the host. `default_prevented` is set even when
/// `error` is, so the host never follows the href of a confirmed nav link.
#[napi(object)]
pub struct ClickResult {
    pub default_prevented: bool,
    pub action: Option<String>,
    pub error: Option<String>,
}

impl From<ClickOutcome> for ClickResult {
    fn from(outcome: ClickOutcome) -> Self {
        Self {
            default_prevented: outcome.default_prevented,
            action: outcome.action.map(|action| action.to_string()),
            error: outcome.error.map(|e| e.to_string()),
        }
    }
}

#[napi]
pub struct NavigationPage {
    inner: Page<SimulatedViewport>,
}

#[napi]
impl NavigationPage {
    #[napi(constructor)]
    pub fn new(html: String, layout_json: String, config_json: Option<String>) -> napi::Result<Self> {
        let layout: Layout = parse_json(&layout_json, "layout")?;
        let config = load_config(config_json)?;
        let inner = Page::new(&html, SimulatedViewport::new(layout), config).map_err(to_napi)?;
        Ok(Self { inner })
    }

    /// Throws only when `selector` matches nothing
    #[napi]
    pub fn click(&mut self, selector: String) -> napi::Result<ClickResult> {
        self.inner
            .click_selector(&selector)
            .map(ClickResult::from)
            .map_err(to_napi)
    }

    #[napi]
    pub fn scroll(&mut self, y: f64) -> napi::Result<()> {
        self.inner.scroll_to(y).map_err(to_napi)
    }

    #[napi]
    pub fn advance(&mut self, ms: u32) {
        self.inner.advance(std::time::Duration::from_millis(u64::from(ms)));
    }

    #[napi]
    pub fn resize(&mut self, height: f64) {
        self.inner.viewport_mut().set_viewport_height(height);
    }

    #[napi]
    pub fn set_section_top(&mut self, id: String, top: f64) {
        self.inner.viewport_mut().set_section_top(&id, top);
    }

    #[napi]
    pub fn active_section(&self) -> Option<String> {
        self.inner.active_section().map(|section| section.id.clone())
    }

    #[napi]
    pub fn take_mutations(&mut self) -> napi::Result<String> {
        to_json(&self.inner.take_mutations())
    }

    #[napi]
    pub fn take_scroll_requests(&mut self) -> napi::Result<String> {
        to_json(&self.inner.take_scroll_requests())
    }

    #[napi]
    pub fn html(&self) -> napi::Result<String> {
        self.inner.to_html().map_err(to_napi)
    }
}

#[napi]
pub fn replay_native(
    html: String,
    layout_json: String,
    events_json: String,
    config_json: Option<String>,
) -> napi::Result<String> {
    let layout: Layout = parse_json(&layout_json, "layout")?;
    let events: Vec<PageEvent> = parse_json(&events_json, "event script")?;
    let config = load_config(config_json)?;
    let report = replay(&html, layout, config, &events).map_err(to_napi)?;
    to_json(&report)
}
