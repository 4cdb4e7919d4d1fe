//! Error types for the navigation runtime
//!
//! Every variant except `Parse` and `Config` describes a broken contract
//! between the host markup and the runtime. They are reported at the point of
//! use and never downgraded to a silent no-op.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, NavError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavError {
    /// The host document could not be parsed
    #[error("Failed to parse HTML: {0}")]
    Parse(String),

    /// The document tree could not be written back out
    #[error("Failed to serialize HTML: {0}")]
    Serialize(String),

    /// Page configuration could not be decoded
    #[error("Invalid page config: {0}")]
    Config(String),

    /// A selector failed to parse or uses pseudo-class syntax
    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    /// An element the runtime wires itself to is absent
    #[error("Required element '{selector}' not found in document")]
    MissingElement { selector: String },

    /// Section at `index` (document order) has no id
    #[error("Section #{index} has no 'id' attribute")]
    SectionWithoutId { index: usize },

    /// Two sections share an id, so navigation links would be ambiguous
    #[error("Duplicate section id '{id}'")]
    DuplicateSectionId { id: String },

    /// An element lacks an attribute its role requires
    #[error("Element <{tag}> has no '{attribute}' attribute")]
    MissingAttribute { tag: String, attribute: String },

    /// A navigation link points at an id no element carries
    #[error("No element with id '{id}'")]
    UnknownSection { id: String },

    /// The viewport cannot place a scanned section
    #[error("No layout information for section '{id}'")]
    MissingGeometry { id: String },

    /// A button names an action the dispatcher does not know
    #[error("Unknown button action '{action}'")]
    UnknownAction { action: String },

    /// A collapse button has no collapsible next to it
    #[error("No '{selector}' element next to collapse button")]
    MissingCollapsible { selector: String },
}
