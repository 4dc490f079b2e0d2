//! Arena-based DOM for story documents.
//!
//! Every parsed document (and every cleaning copy made from it) is one
//! `ArenaDom`: nodes live in a contiguous vector and link to each other by
//! index. Copies are made with [`ArenaDom::clone_subtree`], which produces a
//! fresh arena that shares nothing with its source.

use html5ever::{LocalName, QualName};

/// Unique identifier for a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArenaNodeId(pub u32);

impl ArenaNodeId {
    /// Sentinel value for no node.
    pub const NONE: ArenaNodeId = ArenaNodeId(u32::MAX);

    /// Check if this is a valid node ID.
    pub fn is_some(&self) -> bool {
        self.0 != u32::MAX
    }

    /// Check if this is the sentinel value.
    pub fn is_none(&self) -> bool {
        self.0 == u32::MAX
    }
}

/// Node type in the arena DOM.
#[derive(Debug, Clone)]
pub enum ArenaNodeData {
    /// Document root.
    Document,
    /// Element with name and attributes (attributes kept in source order).
    Element { name: QualName, attrs: Vec<Attribute> },
    /// Text content.
    Text(String),
    Comment(String),
    /// Document type declaration.
    Doctype { name: String },
}

/// HTML attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: QualName,
    pub value: String,
}

impl Attribute {
    /// The attribute name as written in markup (`prefix:local` for foreign attributes).
    pub fn qualified_name(&self) -> String {
        match &self.name.prefix {
            Some(prefix) => format!("{}:{}", prefix, self.name.local),
            None => self.name.local.to_string(),
        }
    }
}

/// A node in the arena DOM.
#[derive(Debug, Clone)]
pub struct ArenaNode {
    pub data: ArenaNodeData,
    pub parent: ArenaNodeId,
    pub first_child: ArenaNodeId,
    pub last_child: ArenaNodeId,
    pub prev_sibling: ArenaNodeId,
    pub next_sibling: ArenaNodeId,
}

impl ArenaNode {
    fn new(data: ArenaNodeData) -> Self {
        Self {
            data,
            parent: ArenaNodeId::NONE,
            first_child: ArenaNodeId::NONE,
            last_child: ArenaNodeId::NONE,
            prev_sibling: ArenaNodeId::NONE,
            next_sibling: ArenaNodeId::NONE,
        }
    }
}

/// Arena-based DOM tree.
///
/// Parent/child/sibling links use indices into the node vector. Detached
/// nodes stay allocated but are unreachable from the document root.
#[derive(Debug, Clone)]
pub struct ArenaDom {
    nodes: Vec<ArenaNode>,
    document: ArenaNodeId,
}

impl ArenaDom {
    /// Create a new empty DOM with a document root.
    pub fn new() -> Self {
        let mut dom = Self {
            nodes: Vec::new(),
            document: ArenaNodeId::NONE,
        };
        dom.document = dom.alloc(ArenaNode::new(ArenaNodeData::Document));
        dom
    }

    fn alloc(&mut self, node: ArenaNode) -> ArenaNodeId {
        let id = ArenaNodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Get the document root ID.
    pub fn document(&self) -> ArenaNodeId {
        self.document
    }

    /// Get a node by ID.
    pub fn get(&self, id: ArenaNodeId) -> Option<&ArenaNode> {
        if id.is_none() {
            return None;
        }
        self.nodes.get(id.0 as usize)
    }

    /// Get a mutable node by ID.
    pub fn get_mut(&mut self, id: ArenaNodeId) -> Option<&mut ArenaNode> {
        if id.is_none() {
            return None;
        }
        self.nodes.get_mut(id.0 as usize)
    }

    /// Create a new element node.
    pub fn create_element(&mut self, name: QualName, attrs: Vec<Attribute>) -> ArenaNodeId {
        self.alloc(ArenaNode::new(ArenaNodeData::Element { name, attrs }))
    }

    /// Create a new text node.
    pub fn create_text(&mut self, text: String) -> ArenaNodeId {
        self.alloc(ArenaNode::new(ArenaNodeData::Text(text)))
    }

    /// Create a new comment node.
    pub fn create_comment(&mut self, text: String) -> ArenaNodeId {
        self.alloc(ArenaNode::new(ArenaNodeData::Comment(text)))
    }

    /// Create a doctype node.
    pub fn create_doctype(&mut self, name: String) -> ArenaNodeId {
        self.alloc(ArenaNode::new(ArenaNodeData::Doctype { name }))
    }

    /// Append a child to a parent node.
    pub fn append(&mut self, parent: ArenaNodeId, child: ArenaNodeId) {
        let last_child = self
            .get(parent)
            .map(|n| n.last_child)
            .unwrap_or(ArenaNodeId::NONE);

        if let Some(child_node) = self.get_mut(child) {
            child_node.parent = parent;
            child_node.prev_sibling = last_child;
            child_node.next_sibling = ArenaNodeId::NONE;
        }

        if last_child.is_some()
            && let Some(last_node) = self.get_mut(last_child)
        {
            last_node.next_sibling = child;
        }

        if let Some(parent_node) = self.get_mut(parent) {
            if parent_node.first_child.is_none() {
                parent_node.first_child = child;
            }
            parent_node.last_child = child;
        }
    }

    /// Insert a node before a sibling.
    pub fn insert_before(&mut self, sibling: ArenaNodeId, new_node: ArenaNodeId) {
        let (parent, prev) = match self.get(sibling) {
            Some(n) => (n.parent, n.prev_sibling),
            None => return,
        };

        if let Some(new) = self.get_mut(new_node) {
            new.parent = parent;
            new.prev_sibling = prev;
            new.next_sibling = sibling;
        }

        if let Some(sib) = self.get_mut(sibling) {
            sib.prev_sibling = new_node;
        }

        if prev.is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = new_node;
            }
        } else if let Some(par) = self.get_mut(parent) {
            par.first_child = new_node;
        }
    }

    /// Append text to an existing trailing text node, or create a new one.
    pub fn append_text(&mut self, parent: ArenaNodeId, text: &str) {
        let last_child = self
            .get(parent)
            .map(|n| n.last_child)
            .unwrap_or(ArenaNodeId::NONE);

        if let Some(last) = self.get_mut(last_child)
            && let ArenaNodeData::Text(ref mut existing) = last.data
        {
            existing.push_str(text);
            return;
        }

        let text_node = self.create_text(text.to_string());
        self.append(parent, text_node);
    }

    /// Unlink a node (and with it, its whole subtree) from its parent.
    pub fn detach(&mut self, id: ArenaNodeId) {
        let (parent, prev, next) = match self.get(id) {
            Some(n) => (n.parent, n.prev_sibling, n.next_sibling),
            None => return,
        };

        if prev.is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = next;
            }
        } else if let Some(p) = self.get_mut(parent) {
            p.first_child = next;
        }

        if next.is_some() {
            if let Some(n) = self.get_mut(next) {
                n.prev_sibling = prev;
            }
        } else if let Some(p) = self.get_mut(parent) {
            p.last_child = prev;
        }

        if let Some(node) = self.get_mut(id) {
            node.parent = ArenaNodeId::NONE;
            node.prev_sibling = ArenaNodeId::NONE;
            node.next_sibling = ArenaNodeId::NONE;
        }
    }

    /// Move all children of `node` to the end of `new_parent`.
    pub fn reparent_children(&mut self, node: ArenaNodeId, new_parent: ArenaNodeId) {
        let children: Vec<_> = self.children(node).collect();
        for child in children {
            self.detach(child);
            self.append(new_parent, child);
        }
    }

    /// Iterate over children of a node.
    pub fn children(&self, parent: ArenaNodeId) -> ChildrenIter<'_> {
        let first = self
            .get(parent)
            .map(|n| n.first_child)
            .unwrap_or(ArenaNodeId::NONE);
        ChildrenIter {
            dom: self,
            current: first,
        }
    }

    /// Iterate over the descendants of `root` in document order (pre-order DFS).
    ///
    /// `root` itself is not yielded.
    pub fn descendants(&self, root: ArenaNodeId) -> Descendants<'_> {
        let mut stack: Vec<_> = self.children(root).collect();
        stack.reverse();
        Descendants { dom: self, stack }
    }

    /// Find the first descendant of `root` matching a predicate.
    pub fn find_in<F>(&self, root: ArenaNodeId, predicate: F) -> Option<ArenaNodeId>
    where
        F: Fn(&ArenaNode) -> bool,
    {
        self.descendants(root)
            .find(|&id| self.get(id).is_some_and(&predicate))
    }

    /// Find the first element with the given tag name anywhere in the document.
    pub fn find_by_tag(&self, tag: &str) -> Option<ArenaNodeId> {
        self.find_by_tag_in(self.document, tag)
    }

    /// Find the first descendant element of `root` with the given tag name.
    pub fn find_by_tag_in(&self, root: ArenaNodeId, tag: &str) -> Option<ArenaNodeId> {
        self.find_in(root, |node| node.has_tag(tag))
    }

    /// All descendant elements of `root` with the given tag name, in document order.
    pub fn descendants_by_tag(&self, root: ArenaNodeId, tag: &str) -> Vec<ArenaNodeId> {
        self.descendants(root)
            .filter(|&id| self.get(id).is_some_and(|n| n.has_tag(tag)))
            .collect()
    }

    /// Direct child elements of `parent` with the given tag name (non-recursive).
    pub fn child_elements_by_tag<'a>(
        &'a self,
        parent: ArenaNodeId,
        tag: &'a str,
    ) -> impl Iterator<Item = ArenaNodeId> + 'a {
        self.children(parent)
            .filter(move |&id| self.get(id).is_some_and(|n| n.has_tag(tag)))
    }

    /// Copy the subtree rooted at `id` into a new, independently-owned DOM.
    ///
    /// The copy is the only child of the new document root.
    pub fn clone_subtree(&self, id: ArenaNodeId) -> ArenaDom {
        let mut copy = ArenaDom::new();
        let doc = copy.document();
        let mut stack = vec![(id, doc)];

        while let Some((src, dest_parent)) = stack.pop() {
            let Some(node) = self.get(src) else {
                continue;
            };
            let dest = match &node.data {
                // Copying a document means copying its children.
                ArenaNodeData::Document => dest_parent,
                data => {
                    let dest = copy.alloc(ArenaNode::new(data.clone()));
                    copy.append(dest_parent, dest);
                    dest
                }
            };
            let mut children: Vec<_> = self.children(src).collect();
            children.reverse();
            stack.extend(children.into_iter().map(|child| (child, dest)));
        }

        copy
    }

    /// The first element child of the document root, if any.
    pub fn root_element(&self) -> Option<ArenaNodeId> {
        self.children(self.document)
            .find(|&id| self.is_element(id))
    }
}

impl Default for ArenaDom {
    fn default() -> Self {
        Self::new()
    }
}

impl ArenaNode {
    /// Check if this node is an element with the given local name.
    pub fn has_tag(&self, tag: &str) -> bool {
        matches!(&self.data, ArenaNodeData::Element { name, .. } if name.local.as_ref() == tag)
    }
}

/// Iterator over children of a node.
pub struct ChildrenIter<'a> {
    dom: &'a ArenaDom,
    current: ArenaNodeId,
}

impl Iterator for ChildrenIter<'_> {
    type Item = ArenaNodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_none() {
            return None;
        }
        let id = self.current;
        self.current = self
            .dom
            .get(id)
            .map(|n| n.next_sibling)
            .unwrap_or(ArenaNodeId::NONE);
        Some(id)
    }
}

/// Pre-order iterator over the descendants of a node.
pub struct Descendants<'a> {
    dom: &'a ArenaDom,
    stack: Vec<ArenaNodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = ArenaNodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let mark = self.stack.len();
        self.stack.extend(self.dom.children(id));
        self.stack[mark..].reverse();
        Some(id)
    }
}

/// Convenience methods for element nodes.
impl ArenaDom {
    /// Get element's local name (tag).
    pub fn element_name(&self, id: ArenaNodeId) -> Option<&LocalName> {
        self.get(id).and_then(|n| match &n.data {
            ArenaNodeData::Element { name, .. } => Some(&name.local),
            _ => None,
        })
    }

    /// Get an element's attributes in source order.
    pub fn attrs(&self, id: ArenaNodeId) -> &[Attribute] {
        self.get(id)
            .and_then(|n| match &n.data {
                ArenaNodeData::Element { attrs, .. } => Some(attrs.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    /// Get an attribute value.
    pub fn get_attr(&self, id: ArenaNodeId, attr_name: &str) -> Option<&str> {
        self.attrs(id)
            .iter()
            .find(|a| a.name.local.as_ref() == attr_name)
            .map(|a| a.value.as_str())
    }

    /// Check whether an element carries an attribute (boolean attributes included).
    pub fn has_attr(&self, id: ArenaNodeId, attr_name: &str) -> bool {
        self.get_attr(id, attr_name).is_some()
    }

    /// Check if node is an element.
    pub fn is_element(&self, id: ArenaNodeId) -> bool {
        self.get(id)
            .is_some_and(|n| matches!(n.data, ArenaNodeData::Element { .. }))
    }

    /// Get text content of a text node.
    pub fn text_content(&self, id: ArenaNodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            ArenaNodeData::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Concatenated text of all text nodes below `id` (or `id` itself if it is text).
    pub fn text_of(&self, id: ArenaNodeId) -> String {
        if let Some(text) = self.text_content(id) {
            return text.to_string();
        }
        self.descendants(id)
            .filter_map(|child| self.text_content(child))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use html5ever::ns;

    use super::*;

    fn make_qname(local: &str) -> QualName {
        QualName::new(None, ns!(html), LocalName::from(local))
    }

    fn attr(name: &str, value: &str) -> Attribute {
        Attribute {
            name: QualName::new(None, ns!(), LocalName::from(name)),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_create_elements() {
        let mut dom = ArenaDom::new();

        let div = dom.create_element(make_qname("div"), vec![attr("id", "main")]);
        dom.append(dom.document(), div);

        assert_eq!(dom.element_name(div).unwrap().as_ref(), "div");
        assert_eq!(dom.get_attr(div, "id"), Some("main"));
        assert_eq!(dom.get_attr(div, "class"), None);
        assert_eq!(dom.root_element(), Some(div));
    }

    #[test]
    fn test_append_children() {
        let mut dom = ArenaDom::new();

        let parent = dom.create_element(make_qname("div"), vec![]);
        let child1 = dom.create_element(make_qname("p"), vec![]);
        let child2 = dom.create_element(make_qname("p"), vec![]);

        dom.append(dom.document(), parent);
        dom.append(parent, child1);
        dom.append(parent, child2);

        let children: Vec<_> = dom.children(parent).collect();
        assert_eq!(children, vec![child1, child2]);
    }

    #[test]
    fn test_text_merging() {
        let mut dom = ArenaDom::new();

        let p = dom.create_element(make_qname("p"), vec![]);
        dom.append(dom.document(), p);

        dom.append_text(p, "Hello, ");
        dom.append_text(p, "World!");

        let children: Vec<_> = dom.children(p).collect();
        assert_eq!(children.len(), 1);
        assert_eq!(dom.text_content(children[0]), Some("Hello, World!"));
    }

    #[test]
    fn test_detach_middle_child() {
        let mut dom = ArenaDom::new();
        let parent = dom.create_element(make_qname("div"), vec![]);
        let a = dom.create_element(make_qname("a"), vec![]);
        let b = dom.create_element(make_qname("b"), vec![]);
        let c = dom.create_element(make_qname("i"), vec![]);
        dom.append(dom.document(), parent);
        dom.append(parent, a);
        dom.append(parent, b);
        dom.append(parent, c);

        dom.detach(b);
        assert_eq!(dom.children(parent).collect::<Vec<_>>(), vec![a, c]);

        dom.detach(c);
        dom.detach(a);
        assert_eq!(dom.children(parent).count(), 0);
    }

    #[test]
    fn test_descendants_document_order() {
        let mut dom = ArenaDom::new();
        let root = dom.create_element(make_qname("div"), vec![]);
        let p1 = dom.create_element(make_qname("p"), vec![]);
        let span = dom.create_element(make_qname("span"), vec![]);
        let p2 = dom.create_element(make_qname("p"), vec![]);
        dom.append(dom.document(), root);
        dom.append(root, p1);
        dom.append(p1, span);
        dom.append(root, p2);

        let order: Vec<_> = dom.descendants(dom.document()).collect();
        assert_eq!(order, vec![root, p1, span, p2]);
        assert_eq!(dom.descendants_by_tag(root, "p"), vec![p1, p2]);
        assert_eq!(dom.find_by_tag("span"), Some(span));
        assert_eq!(dom.child_elements_by_tag(root, "span").count(), 0);
    }

    #[test]
    fn test_clone_subtree_is_independent() {
        let mut dom = ArenaDom::new();
        let root = dom.create_element(make_qname("div"), vec![attr("id", "x")]);
        let p = dom.create_element(make_qname("p"), vec![]);
        dom.append(dom.document(), root);
        dom.append(root, p);
        dom.append_text(p, "text");

        let mut copy = dom.clone_subtree(root);
        let copied_root = copy.root_element().unwrap();
        assert_eq!(copy.get_attr(copied_root, "id"), Some("x"));
        assert_eq!(copy.text_of(copied_root), "text");

        let copied_p = copy.find_by_tag("p").unwrap();
        copy.detach(copied_p);
        assert_eq!(copy.text_of(copied_root), "");
        assert_eq!(dom.text_of(root), "text");
    }
}
