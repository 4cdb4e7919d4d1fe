//! Button Action Dispatcher
//!
//! One document-wide click handler for every `<button>` carrying an action
//! attribute. The attribute value selects a handler from a closed table;
//! names outside the table are a markup/runtime mismatch and are reported as
//! errors, never ignored.

use log::debug;
use markup5ever_rcdom::Handle;
use std::fmt;
use std::str::FromStr;

use crate::config::PageConfig;
use crate::dom::{attribute, is_element, parent, text_content, Document};
use crate::error::{NavError, Result};
use crate::selector::Selector;
use crate::viewport::{ScrollRequest, Viewport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    ScrollTop,
    Collapse,
}

const ACTION_TABLE: &[(&str, ButtonAction)] = &[
    ("scrollTop", ButtonAction::ScrollTop),
    ("collapse", ButtonAction::Collapse),
];

impl ButtonAction {
    pub fn name(self) -> &'static str {
        ACTION_TABLE
            .iter()
            .find(|(_, action)| *action == self)
            .map(|(name, _)| *name)
            .unwrap_or_default()
    }
}

impl FromStr for ButtonAction {
    type Err = NavError;

    fn from_str(name: &str) -> Result<Self> {
        ACTION_TABLE
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, action)| *action)
            .ok_or_else(|| NavError::UnknownAction {
                action: name.to_string(),
            })
    }
}

impl fmt::Display for ButtonAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// DISPATCHER
// ═══════════════════════════════════════════════════════════════════════════════

pub struct ButtonDispatcher {
    action_attribute: String,
    collapsible: Selector,
    collapsed_class: String,
    collapse_label: String,
    expand_label: String,
}

impl ButtonDispatcher {
    pub fn from_config(config: &PageConfig) -> Result<Self> {
        Ok(Self {
            action_attribute: config.action_attribute.clone(),
            collapsible: Selector::parse(&config.collapsible_selector)?,
            collapsed_class: config.collapsed_class.clone(),
            collapse_label: config.collapse_label.clone(),
            expand_label: config.expand_label.clone(),
        })
    }

    /// `Ok(None)` when the click target is not a button
    pub fn on_click<V: Viewport>(
        &self,
        document: &mut Document,
        viewport: &mut V,
        target: &Handle,
    ) -> Result<Option<ButtonAction>> {
        if !is_element(target, "button") {
            return Ok(None);
        }

        let name = attribute(target, &self.action_attribute).ok_or_else(|| {
            NavError::MissingAttribute {
                tag: "button".to_string(),
                attribute: self.action_attribute.clone(),
            }
        })?;
        let action: ButtonAction = name.parse()?;

        match action {
            ButtonAction::ScrollTop => viewport.scroll_to(ScrollRequest::smooth(0.0)),
            ButtonAction::Collapse => self.collapse(document, target)?,
        }

        debug!("[SectionNav] Button action '{}' dispatched", action);
        Ok(Some(action))
    }

    /// Toggle the collapsible next to `button` and flip the button label.
    /// The label follows the current text, not the panel state.
    fn collapse(&self, document: &mut Document, button: &Handle) -> Result<()> {
        let missing = || NavError::MissingCollapsible {
            selector: self.collapsible.as_str().to_string(),
        };
        let container = parent(button).ok_or_else(missing)?;
        let panel = document
            .select_first_within(&container, &self.collapsible)
            .ok_or_else(missing)?;

        document.toggle_class(&panel, &self.collapsed_class);

        let label = if text_content(button) == self.collapse_label {
            self.expand_label.clone()
        } else {
            self.collapse_label.clone()
        };
        document.set_text_content(button, &label);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::has_class;
    use crate::viewport::{Layout, SimulatedViewport};

    const HTML: &str = r#"
        <div class="card">
            <button data-action="collapse">Collapse</button>
            <div class="collapsible">content</div>
        </div>
        <div class="lonely"><button data-action="collapse">Collapse</button></div>
        <button id="top" data-action="scrollTop">Top</button>
        <button id="bogus" data-action="explode">Boom</button>
        <button id="plain">No action</button>
        <span id="span" data-action="collapse">not a button</span>
    "#;

    fn setup() -> (Document, SimulatedViewport, ButtonDispatcher) {
        (
            Document::parse(HTML).unwrap(),
            SimulatedViewport::new(Layout::default()),
            ButtonDispatcher::from_config(&PageConfig::default()).unwrap(),
        )
    }

    #[test]
    fn test_action_table_round_trip() {
        assert_eq!("scrollTop".parse::<ButtonAction>().unwrap(), ButtonAction::ScrollTop);
        assert_eq!("collapse".parse::<ButtonAction>().unwrap(), ButtonAction::Collapse);
        assert_eq!(ButtonAction::ScrollTop.to_string(), "scrollTop");
        assert!("Collapse".parse::<ButtonAction>().is_err());
    }

    #[test]
    fn test_collapse_toggles_panel_and_label() {
        let (mut doc, mut viewport, dispatcher) = setup();
        let button = doc.require(".card button").unwrap();
        let panel = doc.require(".card .collapsible").unwrap();

        let action = dispatcher.on_click(&mut doc, &mut viewport, &button).unwrap();
        assert_eq!(action, Some(ButtonAction::Collapse));
        assert_eq!(text_content(&button), "Expand");
        assert!(has_class(&panel, "collapse"));

        dispatcher.on_click(&mut doc, &mut viewport, &button).unwrap();
        assert_eq!(text_content(&button), "Collapse");
        assert!(!has_class(&panel, "collapse"));
    }

    #[test]
    fn test_label_follows_text_not_panel_state() {
        let (mut doc, mut viewport, dispatcher) = setup();
        let button = doc.require(".card button").unwrap();
        let panel = doc.require(".card .collapsible").unwrap();
        doc.set_text_content(&button, "Show more");

        dispatcher.on_click(&mut doc, &mut viewport, &button).unwrap();
        assert_eq!(text_content(&button), "Collapse");
        assert!(has_class(&panel, "collapse"));
    }

    #[test]
    fn test_scroll_top_requests_offset_zero() {
        let (mut doc, mut viewport, dispatcher) = setup();
        let button = doc.require("#top").unwrap();
        dispatcher.on_click(&mut doc, &mut viewport, &button).unwrap();
        assert_eq!(viewport.requests(), &[ScrollRequest::smooth(0.0)]);
    }

    #[test]
    fn test_non_buttons_are_ignored() {
        let (mut doc, mut viewport, dispatcher) = setup();
        let span = doc.require("#span").unwrap();
        assert_eq!(dispatcher.on_click(&mut doc, &mut viewport, &span).unwrap(), None);
        assert!(doc.mutations().is_empty());
    }

    #[test]
    fn test_mismatches_fail_loudly() {
        let (mut doc, mut viewport, dispatcher) = setup();

        let bogus = doc.require("#bogus").unwrap();
        assert_eq!(
            dispatcher.on_click(&mut doc, &mut viewport, &bogus).unwrap_err(),
            NavError::UnknownAction { action: "explode".to_string() }
        );

        let plain = doc.require("#plain").unwrap();
        assert!(matches!(
            dispatcher.on_click(&mut doc, &mut viewport, &plain).unwrap_err(),
            NavError::MissingAttribute { .. }
        ));

        let lonely = doc.require(".lonely button").unwrap();
        assert!(matches!(
            dispatcher.on_click(&mut doc, &mut viewport, &lonely).unwrap_err(),
            NavError::MissingCollapsible { .. }
        ));
        assert_eq!(text_content(&lonely), "Collapse");
    }
}
