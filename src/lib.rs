//! # Section Navigation Runtime
//!
//! Builds a navigation menu from the sections of an HTML page and keeps the
//! page's presentation flags in step with clicks, scrolling and time.
//!
//! ## Runtime Invariants
//!
//! 1. **Single Build**: the nav list is built once, when the `Page` is
//!    created, before any event is handled.
//! 2. **One Active Section**: at most one section carries the active class
//!    after every scroll notification.
//! 3. **One Active Link**: at most one navigation link carries the active-link
//!    class after every navigation click.
//! 4. **Idempotent Scroll**: a scroll notification with unchanged geometry
//!    produces no DOM mutation, apart from re-arming the nav reveal timer.
//! 5. **One Timer Per Behavior**: the nav reveal timer is re-armed, never
//!    stacked.
//! 6. **Loud Mismatches**: markup that does not fit the runtime (unknown button
//!    action, missing collapsible, unknown section) is an error, not a no-op.
//!
//! The document is an html5ever tree owned by the page. Hosts feed events in
//! and drain the mutation journal and scroll requests out.

#[cfg(feature = "napi")]
mod bridge;

mod actions;
mod back_to_top;
mod config;
mod dom;
mod error;
mod highlight;
mod nav_builder;
mod nav_visibility;
mod page;
mod replay;
mod scroll_nav;
mod sections;
mod selector;
mod tracker;
mod viewport;


#[cfg(feature = "napi")]
pub use bridge::{replay_native, ClickResult, NavigationPage};

pub use actions::{ButtonAction, ButtonDispatcher};
pub use back_to_top::{below_the_fold, BackToTopController};
pub use config::PageConfig;
pub use dom::{Document, Mutation};
pub use error::{NavError, Result};
pub use highlight::highlight_link;
pub use nav_builder::{build_nav, render_nav_items};
pub use nav_visibility::{Debounce, NavState, NavVisibilityController};
pub use page::{ClickOutcome, Page};
pub use replay::{apply_event, replay, EventError, PageEvent, ReplayReport};
pub use scroll_nav::{scroll_to_section, LinkClick, ScrollNavigator};
pub use sections::{scan_sections, Section};
pub use selector::{NodeRef, Selector};
pub use tracker::{nearest_section, ViewportTracker};
pub use viewport::{Layout, ScrollBehavior, ScrollRequest, SimulatedViewport, Viewport};
