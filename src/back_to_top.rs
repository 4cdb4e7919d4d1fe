//! Back-to-Top Controller

use markup5ever_rcdom::Handle;

use crate::dom::Document;
use crate::viewport::Viewport;

/// Strictly past one viewport height; exactly one height is still above it
pub fn below_the_fold<V: Viewport>(viewport: &V) -> bool {
    viewport.scroll_y() > viewport.client_height()
}

pub struct BackToTopController {
    button: Handle,
    show_class: String,
}

impl BackToTopController {
    pub fn new(button: Handle, show_class: impl Into<String>) -> Self {
        Self {
            button,
            show_class: show_class.into(),
        }
    }

    /// Returns whether the button is shown afterwards
    pub fn on_scroll<V: Viewport>(&self, document: &mut Document, viewport: &V) -> bool {
        if below_the_fold(viewport) {
            document.add_class(&self.button, &self.show_class);
            true
        } else {
            document.remove_class(&self.button, &self.show_class);
            false
        }
    }
}
