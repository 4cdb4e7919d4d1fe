//! Page configuration
//!
//! Selectors and presentation class names the runtime wires itself to. The
//! defaults describe the stock landing-page markup; hosts override individual
//! fields through JSON.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{NavError, Result};

lazy_static! {
    /// A single class token; whitespace would split it into several classes
    static ref CLASS_NAME_RE: Regex = Regex::new(r"^-?[_a-zA-Z][_a-zA-Z0-9-]*$").unwrap();

    static ref ATTRIBUTE_NAME_RE: Regex = Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_.:-]*$").unwrap();
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct PageConfig {
    /// Elements that become navigation targets
    pub section_selector: String,
    /// Attribute holding a section's menu label
    pub nav_label_attribute: String,
    /// Container that receives the generated `<li>` entries
    pub nav_list_selector: String,
    /// Bar hidden while the page scrolls
    pub nav_menu_selector: String,
    pub scroll_top_button_selector: String,
    pub collapsible_selector: String,
    /// Attribute naming a button's action
    pub action_attribute: String,

    pub link_class: String,
    pub active_section_class: String,
    pub active_link_class: String,
    pub hidden_nav_class: String,
    pub show_button_class: String,
    pub collapsed_class: String,

    pub collapse_label: String,
    pub expand_label: String,

    /// Quiet period after the last scroll before the nav bar returns
    pub nav_reveal_delay_ms: u64,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            section_selector: "section".to_string(),
            nav_label_attribute: "data-nav".to_string(),
            nav_list_selector: "#navbar__list".to_string(),
            nav_menu_selector: "nav.navbar__menu".to_string(),
            scroll_top_button_selector: "#scrollTopBtn".to_string(),
            collapsible_selector: ".collapsible".to_string(),
            action_attribute: "data-action".to_string(),
            link_class: "menu__link".to_string(),
            active_section_class: "active".to_string(),
            active_link_class: "activeLink".to_string(),
            hidden_nav_class: "hide__nav".to_string(),
            show_button_class: "showBtn".to_string(),
            collapsed_class: "collapse".to_string(),
            collapse_label: "Collapse".to_string(),
            expand_label: "Expand".to_string(),
            nav_reveal_delay_ms: 100,
        }
    }
}

impl PageConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| NavError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject class and attribute names the runtime could not write back
    /// into the document as a single token.
    pub fn validate(&self) -> Result<()> {
        let classes = [
            ("linkClass", &self.link_class),
            ("activeSectionClass", &self.active_section_class),
            ("activeLinkClass", &self.active_link_class),
            ("hiddenNavClass", &self.hidden_nav_class),
            ("showButtonClass", &self.show_button_class),
            ("collapsedClass", &self.collapsed_class),
        ];
        for (field, value) in classes {
            if !CLASS_NAME_RE.is_match(value) {
                return Err(NavError::Config(format!(
                    "{} '{}' is not a class name",
                    field, value
                )));
            }
        }

        let attributes = [
            ("navLabelAttribute", &self.nav_label_attribute),
            ("actionAttribute", &self.action_attribute),
        ];
        for (field, value) in attributes {
            if !ATTRIBUTE_NAME_RE.is_match(value) {
                return Err(NavError::Config(format!(
                    "{} '{}' is not an attribute name",
                    field, value
                )));
            }
        }
        Ok(())
    }

    pub fn nav_reveal_delay(&self) -> Duration {
        Duration::from_millis(self.nav_reveal_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = PageConfig::from_json(r#"{ "navRevealDelayMs": 250 }"#).unwrap();
        assert_eq!(config.nav_reveal_delay(), Duration::from_millis(250));
        assert_eq!(config.nav_list_selector, "#navbar__list");
        assert_eq!(config.active_link_class, "activeLink");
    }

    #[test]
    fn test_class_names_must_be_single_tokens() {
        let err = PageConfig::from_json(r#"{ "activeLinkClass": "active link" }"#).unwrap_err();
        assert_eq!(
            err,
            NavError::Config("activeLinkClass 'active link' is not a class name".to_string())
        );
        assert!(PageConfig::from_json(r#"{ "hiddenNavClass": "" }"#).is_err());
        assert!(PageConfig::from_json(r#"{ "actionAttribute": "data action" }"#).is_err());
        assert!(PageConfig::default().validate().is_ok());
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = PageConfig::from_json(r#"{ "navDelay": 5 }"#).unwrap_err();
        assert!(matches!(err, NavError::Config(_)));
    }
}
