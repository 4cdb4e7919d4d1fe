//! Nav Visibility Controller
//!
//! Hides the navigation bar as soon as the page scrolls and brings it back
//! once scrolling has been quiet for the reveal delay (trailing-edge debounce).
//!
//! ```text
//!   VISIBLE --scroll--> HIDDEN (arm timer)
//!   HIDDEN  --scroll--> HIDDEN (re-arm timer)
//!   HIDDEN  --timer---> VISIBLE
//! ```

use log::debug;
use markup5ever_rcdom::Handle;
use std::time::Duration;

use crate::dom::Document;

// ═══════════════════════════════════════════════════════════════════════════════
// DEBOUNCE TIMER
// ═══════════════════════════════════════════════════════════════════════════════

/// A single pending deadline on the page clock. Arming replaces any pending
/// deadline, so there is never more than one outstanding firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Debounce {
    delay: Duration,
    deadline: Option<Duration>,
}

impl Debounce {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn arm(&mut self, now: Duration) {
        self.deadline = Some(now.saturating_add(self.delay));
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Consume the deadline if it has passed; true means "fire now"
    pub fn fire_if_due(&mut self, now: Duration) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONTROLLER
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
    Visible,
    Hidden,
}

pub struct NavVisibilityController {
    nav_menu: Handle,
    hidden_class: String,
    state: NavState,
    reveal: Debounce,
}

impl NavVisibilityController {
    pub fn new(nav_menu: Handle, hidden_class: impl Into<String>, delay: Duration) -> Self {
        Self {
            nav_menu,
            hidden_class: hidden_class.into(),
            state: NavState::Visible,
            reveal: Debounce::new(delay),
        }
    }

    pub fn state(&self) -> NavState {
        self.state
    }

    pub fn on_scroll(&mut self, document: &mut Document, now: Duration) {
        if document.add_class(&self.nav_menu, &self.hidden_class) {
            debug!("[SectionNav] Nav bar hidden");
        }
        self.state = NavState::Hidden;
        self.reveal.arm(now);
    }

    /// Advance to `now`; returns true if the nav bar was revealed
    pub fn on_tick(&mut self, document: &mut Document, now: Duration) -> bool {
        if !self.reveal.fire_if_due(now) {
            return false;
        }
        document.remove_class(&self.nav_menu, &self.hidden_class);
        self.state = NavState::Visible;
        debug!("[SectionNav] Nav bar revealed after quiet period");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{has_class, Mutation};

    const DELAY: Duration = Duration::from_millis(100);

    fn setup() -> (Document, NavVisibilityController) {
        let doc = Document::parse(r#"<nav class="navbar__menu"></nav>"#).unwrap();
        let nav = doc.require("nav.navbar__menu").unwrap();
        (doc, NavVisibilityController::new(nav, "hide__nav", DELAY))
    }

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_debounce_rearm_replaces_deadline() {
        let mut timer = Debounce::new(DELAY);
        timer.arm(ms(0));
        timer.arm(ms(50));
        assert_eq!(timer.deadline(), Some(ms(150)));
        assert!(!timer.fire_if_due(ms(149)));
        assert!(timer.fire_if_due(ms(150)));
        assert!(!timer.is_pending());
        assert!(!timer.fire_if_due(ms(500)));
    }

    #[test]
    fn test_huge_delay_saturates() {
        let mut timer = Debounce::new(Duration::MAX);
        timer.arm(ms(5));
        assert_eq!(timer.deadline(), Some(Duration::MAX));
        assert!(!timer.fire_if_due(ms(10)));
        assert!(timer.fire_if_due(Duration::MAX));
    }

    #[test]
    fn test_burst_hides_once_and_reveals_once() {
        let (mut doc, mut controller) = setup();

        for i in 0..10 {
            controller.on_scroll(&mut doc, ms(i * 60));
            assert!(!controller.on_tick(&mut doc, ms(i * 60 + 59)));
        }
        assert_eq!(controller.state(), NavState::Hidden);

        // last scroll at 540ms, quiet period ends at 640ms
        assert!(!controller.on_tick(&mut doc, ms(639)));
        assert!(controller.on_tick(&mut doc, ms(640)));
        assert!(!controller.on_tick(&mut doc, ms(2000)));

        let mutations = doc.mutations();
        assert_eq!(mutations.len(), 2);
        assert!(matches!(&mutations[0], Mutation::AddClass { class, .. } if class == "hide__nav"));
        assert!(matches!(&mutations[1], Mutation::RemoveClass { class, .. } if class == "hide__nav"));
        assert_eq!(controller.state(), NavState::Visible);
    }

    #[test]
    fn test_starts_visible_without_pending_timer() {
        let (doc, controller) = setup();
        assert_eq!(controller.state(), NavState::Visible);
        assert!(!controller.reveal.is_pending());
        assert!(!has_class(&doc.require("nav").unwrap(), "hide__nav"));
    }
}
