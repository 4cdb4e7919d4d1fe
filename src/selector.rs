//! Selector Module
//!
//! CSS selectors over the html5ever tree, parsed and matched by the
//! `selectors` crate. `NodeRef` adapts an rcdom element to
//! `selectors::Element`; the runtime has no pseudo-classes or
//! pseudo-elements, so any `:` syntax is rejected at parse time.

use cssparser::{serialize_identifier, serialize_string, ParserInput, ToCss};
use markup5ever_rcdom::{Handle, Node, NodeData};
use precomputed_hash::PrecomputedHash;
use selectors::attr::{AttrSelectorOperation, CaseSensitivity, NamespaceConstraint};
use selectors::matching::{
    matches_selector_list, ElementSelectorFlags, IgnoreNthChildForInvalidation, MatchingContext,
    MatchingMode, NeedsSelectorFlags, QuirksMode,
};
use selectors::parser::{ParseRelative, SelectorImpl, SelectorList, SelectorParseErrorKind};
use selectors::OpaqueElement;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::dom::{attribute, class_list, parent, tag_name};
use crate::error::{NavError, Result};

// ═══════════════════════════════════════════════════════════════════════════════
// SELECTOR IMPL
// ═══════════════════════════════════════════════════════════════════════════════

fn hash_str(value: &str) -> u32 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish() as u32
}

/// Identifiers, tag names and namespace urls
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CssIdent(String);

impl From<&str> for CssIdent {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl ToCss for CssIdent {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        serialize_identifier(&self.0, dest)
    }
}

impl PrecomputedHash for CssIdent {
    fn precomputed_hash(&self) -> u32 {
        hash_str(&self.0)
    }
}

/// Attribute values in `[attr="value"]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CssString(String);

impl From<&str> for CssString {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl AsRef<str> for CssString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PrecomputedHash for CssString {
    fn precomputed_hash(&self) -> u32 {
        hash_str(&self.0)
    }
}

impl ToCss for CssString {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        serialize_string(&self.0, dest)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PseudoClass {}

impl selectors::parser::NonTSPseudoClass for PseudoClass {
    type Impl = NavSelectors;

    fn is_active_or_hover(&self) -> bool {
        match *self {}
    }

    fn is_user_action_state(&self) -> bool {
        match *self {}
    }
}

impl ToCss for PseudoClass {
    fn to_css<W: fmt::Write>(&self, _dest: &mut W) -> fmt::Result {
        match *self {}
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PseudoElement {}

impl selectors::parser::PseudoElement for PseudoElement {
    type Impl = NavSelectors;
}

impl ToCss for PseudoElement {
    fn to_css<W: fmt::Write>(&self, _dest: &mut W) -> fmt::Result {
        match *self {}
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavSelectors;

impl SelectorImpl for NavSelectors {
    type ExtraMatchingData<'a> = ();
    type AttrValue = CssString;
    type Identifier = CssIdent;
    type LocalName = CssIdent;
    type NamespaceUrl = CssIdent;
    type NamespacePrefix = CssIdent;
    type BorrowedNamespaceUrl = CssIdent;
    type BorrowedLocalName = CssIdent;
    type NonTSPseudoClass = PseudoClass;
    type PseudoElement = PseudoElement;
}

struct SelectorParser;

impl<'i> selectors::parser::Parser<'i> for SelectorParser {
    type Impl = NavSelectors;
    type Error = SelectorParseErrorKind<'i>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// ELEMENT ADAPTER
// ═══════════════════════════════════════════════════════════════════════════════

/// An element node seen through `selectors::Element`
#[derive(Clone)]
pub struct NodeRef(Handle);

impl NodeRef {
    /// `None` unless `node` is an element
    pub fn new(node: &Handle) -> Option<Self> {
        tag_name(node).map(|_| Self(node.clone()))
    }

    fn siblings(&self) -> Vec<Handle> {
        parent(&self.0)
            .map(|up| up.children.borrow().clone())
            .unwrap_or_default()
    }

    fn position(&self, siblings: &[Handle]) -> Option<usize> {
        siblings.iter().position(|node| Rc::ptr_eq(node, &self.0))
    }
}

impl fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", tag_name(&self.0).unwrap_or_default())
    }
}

impl selectors::Element for NodeRef {
    type Impl = NavSelectors;

    fn opaque(&self) -> OpaqueElement {
        OpaqueElement::new::<Node>(&*self.0)
    }

    fn parent_element(&self) -> Option<Self> {
        parent(&self.0).and_then(|up| NodeRef::new(&up))
    }

    fn parent_node_is_shadow_root(&self) -> bool {
        false
    }

    fn containing_shadow_host(&self) -> Option<Self> {
        None
    }

    fn is_pseudo_element(&self) -> bool {
        false
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        let siblings = self.siblings();
        let index = self.position(&siblings)?;
        siblings[..index].iter().rev().find_map(NodeRef::new)
    }

    fn next_sibling_element(&self) -> Option<Self> {
        let siblings = self.siblings();
        let index = self.position(&siblings)?;
        siblings[index + 1..].iter().find_map(NodeRef::new)
    }

    fn first_element_child(&self) -> Option<Self> {
        self.0.children.borrow().iter().find_map(NodeRef::new)
    }

    fn is_html_element_in_html_document(&self) -> bool {
        true
    }

    fn has_local_name(&self, local_name: &CssIdent) -> bool {
        tag_name(&self.0).is_some_and(|name| name == local_name.0)
    }

    fn has_namespace(&self, ns: &CssIdent) -> bool {
        match &self.0.data {
            NodeData::Element { name, .. } => *name.ns == *ns.0,
            _ => false,
        }
    }

    fn is_same_type(&self, other: &Self) -> bool {
        tag_name(&self.0) == tag_name(&other.0)
    }

    fn attr_matches(
        &self,
        ns: &NamespaceConstraint<&CssIdent>,
        local_name: &CssIdent,
        operation: &AttrSelectorOperation<&CssString>,
    ) -> bool {
        let NodeData::Element { attrs, .. } = &self.0.data else {
            return false;
        };
        attrs.borrow().iter().any(|attr| {
            let in_namespace = match ns {
                NamespaceConstraint::Any => true,
                NamespaceConstraint::Specific(url) => *attr.name.ns == *url.0,
            };
            in_namespace && *attr.name.local == *local_name.0 && operation.eval_str(&attr.value)
        })
    }

    fn match_non_ts_pseudo_class(
        &self,
        pc: &PseudoClass,
        _context: &mut MatchingContext<NavSelectors>,
    ) -> bool {
        match *pc {}
    }

    fn match_pseudo_element(
        &self,
        pe: &PseudoElement,
        _context: &mut MatchingContext<NavSelectors>,
    ) -> bool {
        match *pe {}
    }

    fn apply_selector_flags(&self, _flags: ElementSelectorFlags) {}

    fn is_link(&self) -> bool {
        tag_name(&self.0).is_some_and(|name| matches!(name.as_str(), "a" | "area" | "link"))
            && attribute(&self.0, "href").is_some()
    }

    fn is_html_slot_element(&self) -> bool {
        false
    }

    fn has_id(&self, id: &CssIdent, case_sensitivity: CaseSensitivity) -> bool {
        attribute(&self.0, "id")
            .is_some_and(|value| case_sensitivity.eq(id.0.as_bytes(), value.as_bytes()))
    }

    fn has_class(&self, name: &CssIdent, case_sensitivity: CaseSensitivity) -> bool {
        class_list(&self.0)
            .iter()
            .any(|class| case_sensitivity.eq(name.0.as_bytes(), class.as_bytes()))
    }

    fn imported_part(&self, _name: &CssIdent) -> Option<CssIdent> {
        None
    }

    fn is_part(&self, _name: &CssIdent) -> bool {
        false
    }

    fn is_empty(&self) -> bool {
        !self.0.children.borrow().iter().any(|child| match &child.data {
            NodeData::Element { .. } => true,
            NodeData::Text { contents } => !contents.borrow().is_empty(),
            _ => false,
        })
    }

    fn is_root(&self) -> bool {
        parent(&self.0).is_some_and(|up| matches!(up.data, NodeData::Document))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SELECTOR
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct Selector {
    source: String,
    list: SelectorList<NavSelectors>,
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self> {
        let source = input.trim();
        let mut parser_input = ParserInput::new(source);
        let mut parser = cssparser::Parser::new(&mut parser_input);

        let list = SelectorList::parse(&SelectorParser, &mut parser, ParseRelative::No).map_err(
            |e| NavError::InvalidSelector {
                selector: source.to_string(),
                reason: format!("{:?}", e.kind),
            },
        )?;

        Ok(Self {
            source: source.to_string(),
            list,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Non-element nodes never match
    pub fn matches(&self, node: &Handle) -> bool {
        let Some(element) = NodeRef::new(node) else {
            return false;
        };

        let mut nth_index_cache = Default::default();
        let mut context = MatchingContext::new(
            MatchingMode::Normal,
            None,
            &mut nth_index_cache,
            QuirksMode::NoQuirks,
            NeedsSelectorFlags::No,
            IgnoreNthChildForInvalidation::No,
        );
        matches_selector_list(&self.list, &element, &mut context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    const HTML: &str = r##"
        <nav class="navbar__menu"><ul id="navbar__list"><li><a href="#s1" class="menu__link">One</a></li></ul></nav>
        <main>
            <section id="s1" data-nav="Section 1"><button data-action="collapse">Collapse</button></section>
            <section id="s2" data-nav="Section 2"><p>Text</p></section>
        </main>
    "##;

    fn count(doc: &Document, selector: &str) -> usize {
        doc.select_all(&Selector::parse(selector).unwrap()).len()
    }

    #[test]
    fn test_compound_with_attribute_value() {
        let doc = Document::parse(HTML).unwrap();
        assert_eq!(count(&doc, r##"a.menu__link[href="#s1"]"##), 1);
        assert_eq!(count(&doc, r##"a.menu__link[href="#s2"]"##), 0);
        assert_eq!(count(&doc, r#"section[data-nav="Section 1"]"#), 1);
        assert_eq!(count(&doc, "section[data-nav]"), 2);
    }

    #[test]
    fn test_combinators() {
        let doc = Document::parse(HTML).unwrap();
        assert_eq!(count(&doc, "nav a"), 1);
        assert_eq!(count(&doc, "main a"), 0);
        assert_eq!(count(&doc, "main section button[data-action]"), 1);
        assert_eq!(count(&doc, "#navbar__list > li > a"), 1);
        assert_eq!(count(&doc, "nav > a"), 0);
        assert_eq!(count(&doc, "#s1 + section"), 1);
        assert_eq!(count(&doc, "#s1 button, #s2 p"), 2);
    }

    #[test]
    fn test_text_nodes_never_match() {
        let doc = Document::parse(HTML).unwrap();
        let button = doc.require("button").unwrap();
        let text = button.children.borrow()[0].clone();
        assert!(!Selector::parse("*").unwrap().matches(&text));
        assert!(Selector::parse("*").unwrap().matches(&button));
    }

    #[test]
    fn test_rejects_invalid_and_pseudo_syntax() {
        assert!(Selector::parse("").is_err());
        assert!(Selector::parse("a:hover").is_err());
        assert!(Selector::parse("a::before").is_err());
        assert!(matches!(
            Selector::parse("ul >").unwrap_err(),
            NavError::InvalidSelector { selector, .. } if selector == "ul >"
        ));
    }
}
