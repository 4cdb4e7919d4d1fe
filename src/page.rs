//! # Page Runtime
//!
//! Owns the document, the viewport and one instance of every controller, and
//! fans the two host event streams into them.
//!
//! ## Event Ordering
//!
//! 1. **Startup**: required elements are located, sections scanned and the nav
//!    built exactly once, before any event is accepted.
//! 2. **Click**: dispatched like a bubbling DOM event. The nav-list handler
//!    runs first, then the document-wide button handler. An error in one
//!    handler does not stop the other; the first error is carried in the
//!    outcome next to the prevent-default decision.
//! 3. **Scroll**: viewport tracker, nav visibility, back-to-top, always in
//!    that order and always all three.
//! 4. **Time**: `advance` moves the page clock and fires a due reveal timer.

use log::{error, info};
use markup5ever_rcdom::Handle;
use std::time::Duration;

use crate::actions::{ButtonAction, ButtonDispatcher};
use crate::back_to_top::BackToTopController;
use crate::config::PageConfig;
use crate::dom::{Document, Mutation};
use crate::error::{NavError, Result};
use crate::nav_builder::build_nav;
use crate::nav_visibility::{NavState, NavVisibilityController};
use crate::scroll_nav::{LinkClick, ScrollNavigator};
use crate::sections::{scan_sections, Section};
use crate::tracker::ViewportTracker;
use crate::viewport::{ScrollRequest, SimulatedViewport, Viewport};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClickOutcome {
    /// A navigation link consumed the click; the host must not follow the href
    pub default_prevented: bool,
    pub action: Option<ButtonAction>,
    /// First handler failure; `default_prevented` stays valid alongside it
    pub error: Option<NavError>,
}

impl ClickOutcome {
    /// Fold the handler failure back into a `Result`
    pub fn into_result(self) -> Result<Self> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self),
        }
    }
}

fn report(e: &NavError) {
    error!("[SectionNav] {}", e);
}

pub struct Page<V: Viewport> {
    document: Document,
    viewport: V,
    sections: Vec<Section>,
    navigator: ScrollNavigator,
    tracker: ViewportTracker,
    nav_visibility: NavVisibilityController,
    back_to_top: BackToTopController,
    buttons: ButtonDispatcher,
    now: Duration,
}

impl<V: Viewport> Page<V> {
    pub fn new(html: &str, viewport: V, config: PageConfig) -> Result<Self> {
        Self::from_document(Document::parse(html)?, viewport, config)
    }

    pub fn from_document(mut document: Document, viewport: V, config: PageConfig) -> Result<Self> {
        config.validate()?;
        let nav_list = document.require(&config.nav_list_selector)?;
        let nav_menu = document.require(&config.nav_menu_selector)?;
        let scroll_top_button = document.require(&config.scroll_top_button_selector)?;
        let sections = scan_sections(&document, &config)?;
        let buttons = ButtonDispatcher::from_config(&config)?;

        build_nav(&mut document, &nav_list, &sections, &config);
        info!(
            "[SectionNav] Page ready with {} sections",
            sections.len()
        );

        Ok(Self {
            navigator: ScrollNavigator::new(nav_list, config.active_link_class.clone()),
            tracker: ViewportTracker::new(config.active_section_class.clone()),
            nav_visibility: NavVisibilityController::new(
                nav_menu,
                config.hidden_nav_class.clone(),
                config.nav_reveal_delay(),
            ),
            back_to_top: BackToTopController::new(
                scroll_top_button,
                config.show_button_class.clone(),
            ),
            buttons,
            document,
            viewport,
            sections,
            now: Duration::ZERO,
        })
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // EVENTS
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn click(&mut self, target: &Handle) -> ClickOutcome {
        let link = self
            .navigator
            .on_click(&mut self.document, &mut self.viewport, target);
        let action = self
            .buttons
            .on_click(&mut self.document, &mut self.viewport, target);

        let mut outcome = ClickOutcome {
            default_prevented: link.prevents_default(),
            ..Default::default()
        };
        if let LinkClick::Failed(e) = link {
            report(&e);
            outcome.error = Some(e);
        }
        match action {
            Ok(action) => outcome.action = action,
            Err(e) => {
                report(&e);
                outcome.error.get_or_insert(e);
            }
        }
        outcome
    }

    /// Click the first element matching `selector`. Only a selector that
    /// finds nothing is an `Err`; handler failures live in the outcome.
    pub fn click_selector(&mut self, selector: &str) -> Result<ClickOutcome> {
        let target = self.document.require(selector)?;
        Ok(self.click(&target))
    }

    /// React to a scroll notification using the viewport's current geometry
    pub fn handle_scroll(&mut self) -> Result<()> {
        let tracked = self
            .tracker
            .on_scroll(&mut self.document, &self.sections, &self.viewport);
        self.nav_visibility.on_scroll(&mut self.document, self.now);
        self.back_to_top.on_scroll(&mut self.document, &self.viewport);
        tracked.map(|_| ()).inspect_err(report)
    }

    pub fn advance(&mut self, elapsed: Duration) {
        self.now = self.now.saturating_add(elapsed);
        self.nav_visibility.on_tick(&mut self.document, self.now);
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // STATE
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn viewport_mut(&mut self) -> &mut V {
        &mut self.viewport
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn active_section(&self) -> Option<&Section> {
        self.tracker.active().map(|index| &self.sections[index])
    }

    pub fn nav_state(&self) -> NavState {
        self.nav_visibility.state()
    }

    pub fn take_mutations(&mut self) -> Vec<Mutation> {
        self.document.take_mutations()
    }

    pub fn to_html(&self) -> Result<String> {
        self.document.to_html()
    }
}

impl Page<SimulatedViewport> {
    /// Move the simulated viewport to `y` and deliver the scroll notification
    pub fn scroll_to(&mut self, y: f64) -> Result<()> {
        self.viewport.set_scroll_y(y);
        self.handle_scroll()
    }

    pub fn take_scroll_requests(&mut self) -> Vec<ScrollRequest> {
        self.viewport.take_requests()
    }
}
