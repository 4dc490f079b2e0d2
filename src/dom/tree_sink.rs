//! Tree builder glue: html5ever drives a [`DomBuilder`] that writes straight
//! into an [`ArenaDom`].
//!
//! Node handles are plain [`ArenaNodeId`]s. Element names are handed back to
//! the tree builder as owned [`ElementName`] values, so no borrow of the
//! arena outlives a single sink call.

use std::borrow::Cow;
use std::cell::RefCell;

use html5ever::tendril::StrTendril;
use html5ever::tree_builder::{ElemName, ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{Attribute as Html5Attribute, LocalName, Namespace, QualName, local_name, ns};
use log::trace;

use super::arena::{ArenaDom, ArenaNodeData, ArenaNodeId, Attribute};

/// Name of an element as reported back to the tree builder.
#[derive(Debug)]
pub struct ElementName(QualName);

impl ElemName for ElementName {
    fn ns(&self) -> &Namespace {
        &self.0.ns
    }

    fn local_name(&self) -> &LocalName {
        &self.0.local
    }
}

/// Sink that builds an [`ArenaDom`] while html5ever parses.
#[derive(Default)]
pub struct DomBuilder {
    dom: RefCell<ArenaDom>,
}

impl DomBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_dom(self) -> ArenaDom {
        self.dom.into_inner()
    }

    fn convert_attrs(attrs: Vec<Html5Attribute>) -> Vec<Attribute> {
        attrs
            .into_iter()
            .map(|a| Attribute {
                name: a.name,
                value: a.value.to_string(),
            })
            .collect()
    }

    /// Insert text before `sibling`, merging into a preceding text node.
    fn insert_text_before(dom: &mut ArenaDom, sibling: ArenaNodeId, text: &str) {
        let prev = dom
            .get(sibling)
            .map_or(ArenaNodeId::NONE, |n| n.prev_sibling);
        if let Some(node) = dom.get_mut(prev)
            && let ArenaNodeData::Text(existing) = &mut node.data
        {
            existing.push_str(text);
            return;
        }
        let node = dom.create_text(text.to_owned());
        dom.insert_before(sibling, node);
    }
}

impl TreeSink for DomBuilder {
    type Handle = ArenaNodeId;
    type Output = Self;
    type ElemName<'a>
        = ElementName
    where
        Self: 'a;

    fn finish(self) -> Self {
        self
    }

    fn parse_error(&self, msg: Cow<'static, str>) {
        trace!("recovered from malformed markup: {msg}");
    }

    fn get_document(&self) -> ArenaNodeId {
        self.dom.borrow().document()
    }

    fn elem_name<'a>(&'a self, target: &'a ArenaNodeId) -> ElementName {
        let dom = self.dom.borrow();
        match dom.get(*target).map(|n| &n.data) {
            Some(ArenaNodeData::Element { name, .. }) => ElementName(name.clone()),
            _ => ElementName(QualName::new(None, ns!(), local_name!(""))),
        }
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Html5Attribute>,
        _flags: ElementFlags,
    ) -> ArenaNodeId {
        let attrs = Self::convert_attrs(attrs);
        self.dom.borrow_mut().create_element(name, attrs)
    }

    fn create_comment(&self, text: StrTendril) -> ArenaNodeId {
        self.dom.borrow_mut().create_comment(text.to_string())
    }

    fn create_pi(&self, _target: StrTendril, _data: StrTendril) -> ArenaNodeId {
        // HTML has no processing instructions; an empty comment never survives cleaning.
        self.dom.borrow_mut().create_comment(String::new())
    }

    fn append(&self, parent: &ArenaNodeId, child: NodeOrText<ArenaNodeId>) {
        let mut dom = self.dom.borrow_mut();
        match child {
            NodeOrText::AppendNode(node) => dom.append(*parent, node),
            NodeOrText::AppendText(text) => dom.append_text(*parent, &text),
        }
    }

    fn append_before_sibling(&self, sibling: &ArenaNodeId, child: NodeOrText<ArenaNodeId>) {
        let mut dom = self.dom.borrow_mut();
        match child {
            NodeOrText::AppendNode(node) => dom.insert_before(*sibling, node),
            NodeOrText::AppendText(text) => Self::insert_text_before(&mut dom, *sibling, &text),
        }
    }

    // Foster parenting: before the table if it is still attached, else into
    // the element that was open before it.
    fn append_based_on_parent_node(
        &self,
        table: &ArenaNodeId,
        prev_element: &ArenaNodeId,
        child: NodeOrText<ArenaNodeId>,
    ) {
        let attached = self
            .dom
            .borrow()
            .get(*table)
            .is_some_and(|n| n.parent.is_some());
        if attached {
            self.append_before_sibling(table, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
        let mut dom = self.dom.borrow_mut();
        let doctype = dom.create_doctype(name.to_string());
        let document = dom.document();
        dom.append(document, doctype);
    }

    fn get_template_contents(&self, target: &ArenaNodeId) -> ArenaNodeId {
        // Template contents stay inline, as ordinary children.
        *target
    }

    fn same_node(&self, x: &ArenaNodeId, y: &ArenaNodeId) -> bool {
        x == y
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn add_attrs_if_missing(&self, target: &ArenaNodeId, attrs: Vec<Html5Attribute>) {
        let mut dom = self.dom.borrow_mut();
        let Some(ArenaNodeData::Element { attrs: existing, .. }) =
            dom.get_mut(*target).map(|n| &mut n.data)
        else {
            return;
        };
        for attr in Self::convert_attrs(attrs) {
            if existing.iter().all(|a| a.name != attr.name) {
                existing.push(attr);
            }
        }
    }

    fn remove_from_parent(&self, target: &ArenaNodeId) {
        self.dom.borrow_mut().detach(*target);
    }

    fn reparent_children(&self, node: &ArenaNodeId, new_parent: &ArenaNodeId) {
        self.dom.borrow_mut().reparent_children(*node, *new_parent);
    }
}
