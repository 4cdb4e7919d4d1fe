//! Document Module
//!
//! Wraps an html5ever `RcDom` as the single document every controller reads
//! and mutates. Queries walk the tree in document order. Every mutation that
//! actually changes the tree is appended to a journal so a host holding a live
//! page can replay the same changes.
//!
//! ## Invariants
//!
//! 1. A class operation that leaves the class list unchanged is not journaled.
//! 2. Journal paths are child-index paths from the document root, computed at
//!    the time of the mutation. Replaying entries in order is always valid.

use html5ever::serialize::{serialize, SerializeOpts, TraversalScope};
use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, parse_fragment, Attribute, LocalName, Namespace, QualName};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom, SerializableHandle};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;
use tendril::StrTendril;

use crate::error::{NavError, Result};
use crate::selector::Selector;

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

// ═══════════════════════════════════════════════════════════════════════════════
// MUTATION JOURNAL
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Mutation {
    AddClass { path: Vec<usize>, class: String },
    RemoveClass { path: Vec<usize>, class: String },
    SetText { path: Vec<usize>, text: String },
    /// `insertAdjacentHTML("afterbegin", html)` on the node at `path`
    InsertHtml { path: Vec<usize>, html: String },
}

// ═══════════════════════════════════════════════════════════════════════════════
// NODE HELPERS
// ═══════════════════════════════════════════════════════════════════════════════

/// Lowercase local name of an element, `None` for any other node kind
pub fn tag_name(node: &Handle) -> Option<String> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.to_string()),
        _ => None,
    }
}

pub fn is_element(node: &Handle, tag: &str) -> bool {
    tag_name(node).is_some_and(|name| name.eq_ignore_ascii_case(tag))
}

pub fn attribute(node: &Handle, name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| &*attr.name.local == name)
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

pub fn class_list(node: &Handle) -> Vec<String> {
    attribute(node, "class")
        .map(|value| value.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

pub fn has_class(node: &Handle, class: &str) -> bool {
    class_list(node).iter().any(|c| c == class)
}

pub fn parent(node: &Handle) -> Option<Handle> {
    let weak = node.parent.take();
    let upgraded = weak.as_ref().and_then(|w| w.upgrade());
    node.parent.set(weak);
    upgraded
}

/// True when `node` is `ancestor` or sits somewhere below it
pub fn is_inclusive_descendant(node: &Handle, ancestor: &Handle) -> bool {
    let mut current = Some(node.clone());
    while let Some(candidate) = current {
        if Rc::ptr_eq(&candidate, ancestor) {
            return true;
        }
        current = parent(&candidate);
    }
    false
}

/// Concatenated text of every descendant text node, like DOM `textContent`
pub fn text_content(node: &Handle) -> String {
    let mut text = String::new();
    collect_text(node, &mut text);
    text
}

fn collect_text(node: &Handle, out: &mut String) {
    if let NodeData::Text { contents } = &node.data {
        out.push_str(&contents.borrow());
    }
    for child in node.children.borrow().iter() {
        collect_text(child, out);
    }
}

pub fn path_of(node: &Handle) -> Vec<usize> {
    let mut path = Vec::new();
    let mut current = node.clone();
    while let Some(up) = parent(&current) {
        let index = up
            .children
            .borrow()
            .iter()
            .position(|child| Rc::ptr_eq(child, &current))
            .unwrap_or_default();
        path.push(index);
        current = up;
    }
    path.reverse();
    path
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn collect_descendants(root: &Handle, out: &mut Vec<Handle>) {
    for child in root.children.borrow().iter() {
        out.push(child.clone());
        collect_descendants(child, out);
    }
}

fn set_class_list(node: &Handle, classes: &[String]) {
    if let NodeData::Element { attrs, .. } = &node.data {
        let value = StrTendril::from_slice(&classes.join(" "));
        let mut attrs = attrs.borrow_mut();
        match attrs.iter_mut().find(|attr| &*attr.name.local == "class") {
            Some(attr) => attr.value = value,
            None => attrs.push(Attribute {
                name: QualName::new(None, Namespace::from(""), LocalName::from("class")),
                value,
            }),
        }
    }
}

fn append_child(parent: &Handle, child: Handle) {
    child.parent.set(Some(Rc::downgrade(parent)));
    parent.children.borrow_mut().push(child);
}

// ═══════════════════════════════════════════════════════════════════════════════
// DOCUMENT
// ═══════════════════════════════════════════════════════════════════════════════

pub struct Document {
    dom: RcDom,
    journal: Vec<Mutation>,
}

impl Document {
    pub fn parse(html: &str) -> Result<Self> {
        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())
            .map_err(|e| NavError::Parse(e.to_string()))?;

        Ok(Self {
            dom,
            journal: Vec::new(),
        })
    }

    pub fn root(&self) -> &Handle {
        &self.dom.document
    }

    // ───────────────────────────────────────────────────────────────────────────
    // Queries
    // ───────────────────────────────────────────────────────────────────────────

    /// Every descendant of `scope` matching `selector`, in document order
    pub fn select_within(&self, scope: &Handle, selector: &Selector) -> Vec<Handle> {
        let mut nodes = Vec::new();
        collect_descendants(scope, &mut nodes);
        nodes.retain(|node| selector.matches(node));
        nodes
    }

    pub fn select_all(&self, selector: &Selector) -> Vec<Handle> {
        self.select_within(self.root(), selector)
    }

    pub fn select_first_within(&self, scope: &Handle, selector: &Selector) -> Option<Handle> {
        self.select_within(scope, selector).into_iter().next()
    }

    pub fn select_first(&self, selector: &Selector) -> Option<Handle> {
        self.select_first_within(self.root(), selector)
    }

    /// Parse `selector` and return its first match, or `MissingElement`
    pub fn require(&self, selector: &str) -> Result<Handle> {
        let parsed = Selector::parse(selector)?;
        self.select_first(&parsed)
            .ok_or_else(|| NavError::MissingElement {
                selector: selector.to_string(),
            })
    }

    pub fn element_by_id(&self, id: &str) -> Option<Handle> {
        let mut nodes = Vec::new();
        collect_descendants(self.root(), &mut nodes);
        nodes
            .into_iter()
            .find(|node| attribute(node, "id").as_deref() == Some(id))
    }

    // ───────────────────────────────────────────────────────────────────────────
    // Mutations
    // ───────────────────────────────────────────────────────────────────────────

    /// Returns true if the class was not present before
    pub fn add_class(&mut self, node: &Handle, class: &str) -> bool {
        let mut classes = class_list(node);
        if classes.iter().any(|c| c == class) {
            return false;
        }
        classes.push(class.to_string());
        set_class_list(node, &classes);
        self.journal.push(Mutation::AddClass {
            path: path_of(node),
            class: class.to_string(),
        });
        true
    }

    /// Returns true if the class was present before
    pub fn remove_class(&mut self, node: &Handle, class: &str) -> bool {
        let mut classes = class_list(node);
        let before = classes.len();
        classes.retain(|c| c != class);
        if classes.len() == before {
            return false;
        }
        set_class_list(node, &classes);
        self.journal.push(Mutation::RemoveClass {
            path: path_of(node),
            class: class.to_string(),
        });
        true
    }

    /// Returns whether the class is present afterwards
    pub fn toggle_class(&mut self, node: &Handle, class: &str) -> bool {
        if has_class(node, class) {
            self.remove_class(node, class);
            false
        } else {
            self.add_class(node, class);
            true
        }
    }

    /// Replace all children of `node` with a single text node
    pub fn set_text_content(&mut self, node: &Handle, text: &str) {
        for child in node.children.borrow_mut().drain(..) {
            child.parent.set(None);
        }
        if !text.is_empty() {
            let text_node = Node::new(NodeData::Text {
                contents: RefCell::new(StrTendril::from_slice(text)),
            });
            append_child(node, text_node);
        }
        self.journal.push(Mutation::SetText {
            path: path_of(node),
            text: text.to_string(),
        });
    }

    /// Parse `html` as a fragment in the context of `parent` and insert the
    /// resulting nodes before its first child. Returns the inserted nodes.
    pub fn insert_html_afterbegin(&mut self, parent: &Handle, html: &str) -> Vec<Handle> {
        let context_tag = tag_name(parent).unwrap_or_else(|| "body".to_string());
        let context = QualName::new(
            None,
            Namespace::from(HTML_NAMESPACE),
            LocalName::from(context_tag.as_str()),
        );
        let fragment = parse_fragment(RcDom::default(), Default::default(), context, vec![])
            .one(StrTendril::from_slice(html));

        // The fragment parser wraps its output in a synthetic <html> root
        let wrapper = fragment
            .document
            .children
            .borrow()
            .iter()
            .find(|node| tag_name(node).is_some())
            .cloned();
        let inserted: Vec<Handle> = match wrapper {
            Some(wrapper) => {
                let nodes: Vec<Handle> = wrapper.children.borrow_mut().drain(..).collect();
                nodes
            }
            None => Vec::new(),
        };

        {
            let mut children = parent.children.borrow_mut();
            for (index, node) in inserted.iter().enumerate() {
                node.parent.set(Some(Rc::downgrade(parent)));
                children.insert(index, node.clone());
            }
        }

        self.journal.push(Mutation::InsertHtml {
            path: path_of(parent),
            html: html.to_string(),
        });
        inserted
    }

    pub fn mutations(&self) -> &[Mutation] {
        &self.journal
    }

    pub fn take_mutations(&mut self) -> Vec<Mutation> {
        std::mem::take(&mut self.journal)
    }

    // ───────────────────────────────────────────────────────────────────────────
    // Output
    // ───────────────────────────────────────────────────────────────────────────

    pub fn to_html(&self) -> Result<String> {
        let mut bytes = Vec::new();
        let handle: SerializableHandle = self.dom.document.clone().into();
        serialize(
            &mut bytes,
            &handle,
            SerializeOpts {
                traversal_scope: TraversalScope::ChildrenOnly(None),
                ..Default::default()
            },
        )
        .map_err(|e| NavError::Serialize(e.to_string()))?;

        String::from_utf8(bytes).map_err(|e| NavError::Serialize(e.to_string()))
    }
}
