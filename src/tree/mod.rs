//! Arena-based HTML document tree.
//!
//! This module implements the core tree representation using arena allocation
//! with typed indices. All nodes live in a contiguous `Vec<NodeData>` owned by
//! the `Document`, and are referenced by `NodeId`, a newtype over
//! `NonZeroU32`.
//!
//! # Architecture
//!
//! Each node stores its parent as an index and its children as an ordered
//! `Vec<NodeId>`. Siblings are not stored; they are read off the parent's
//! child list, so they can never disagree with it. Every mutation is a
//! single splice of one child list plus parent-pointer writes, and checks
//! all of its preconditions before touching anything: an operation that
//! returns a [`TreeError`] has left the tree exactly as it was.
//!
//! Arena slots are never reused, so a `NodeId` stays valid for the lifetime
//! of its document. Removed nodes are detached, not freed; they keep their
//! own subtree and can be inserted again.

mod io;
mod node;

pub use io::LoadOptions;
pub use node::{NodeKind, COMMENT_NAME, DOCTYPE_NAME, DOCUMENT_NAME, TEXT_NAME};

use std::num::NonZeroU32;

use crate::encoding::Charset;
use crate::error::{ParseDiagnostic, TreeError};

/// A typed index into the document's node arena.
///
/// `NodeId` is a newtype over `NonZeroU32`, meaning it can never be zero
/// and `Option<NodeId>` has the same size as `NodeId` (niche optimization).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct NodeId(NonZeroU32);

impl NodeId {
    /// Creates a `NodeId` from a raw arena index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is 0 or does not fit in a `u32`.
    #[allow(clippy::expect_used)]
    fn from_index(index: usize) -> Self {
        let raw = u32::try_from(index).expect("node arena exceeds u32::MAX entries");
        Self(NonZeroU32::new(raw).expect("NodeId index must be non-zero"))
    }

    /// Returns the raw index as a `usize` for indexing into the arena.
    fn as_index(self) -> usize {
        self.0.get() as usize
    }

    /// Converts this `NodeId` to its raw `u32` value (always non-zero).
    #[must_use]
    pub fn into_raw(self) -> u32 {
        self.0.get()
    }

    /// Creates a `NodeId` from a raw `u32`, if non-zero.
    ///
    /// The id is not checked against any document; mutation methods reject
    /// ids outside their arena with [`TreeError::UnknownNode`].
    #[must_use]
    pub fn from_raw(raw: u32) -> Option<Self> {
        NonZeroU32::new(raw).map(Self)
    }
}

/// Storage for a single node in the document arena.
#[derive(Debug, Clone)]
pub struct NodeData {
    /// What kind of node this is and its payload.
    pub kind: NodeKind,
    /// Parent node, if any. The document node and detached nodes have none.
    pub parent: Option<NodeId>,
    /// Children in document order.
    pub children: Vec<NodeId>,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
        }
    }
}

/// An HTML attribute.
///
/// The name keeps the case it was written with; lookups compare names
/// ASCII case-insensitively. The value is stored unescaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// The attribute name, in its original case.
    pub name: String,
    /// The attribute value, with character references decoded.
    pub value: String,
}

impl Attribute {
    /// Creates an attribute.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Returns `true` if this attribute's name equals `name`, ignoring ASCII
    /// case.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// An HTML document.
///
/// The `Document` owns all nodes in an arena and provides methods for
/// tree navigation and mutation. All tree operations go through
/// `&Document` (navigation) or `&mut Document` (mutation), so a traversal
/// can never observe a half-done edit.
///
/// Navigation methods panic when handed a `NodeId` from another document
/// whose index lies outside this arena; mutation methods return
/// [`TreeError::UnknownNode`] instead.
///
/// # Examples
///
/// ```
/// use htmlarbor::Document;
///
/// let mut doc = Document::new();
/// let p = doc.create_element("P");
/// let text = doc.create_text_node("hello");
/// doc.append_child(p, text).unwrap();
/// doc.append_child(doc.root(), p).unwrap();
/// assert_eq!(doc.node_name(p), "p");
/// assert_eq!(doc.text_content(doc.root()), "hello");
/// ```
#[derive(Debug)]
pub struct Document {
    /// The node arena. Index 0 is unused (placeholder for `NonZeroU32`).
    nodes: Vec<NodeData>,
    /// The document node id.
    root: NodeId,
    /// The encoding the document was decoded from, and the default target
    /// encoding for [`save`](Document::save).
    pub encoding: Charset,
    /// Whether the source bytes started with a Byte Order Mark.
    pub had_bom: bool,
    /// Diagnostics collected during parsing.
    pub diagnostics: Vec<ParseDiagnostic>,
}

impl Document {
    /// Creates a new empty document.
    ///
    /// The document contains a single Document node and defaults to UTF-8.
    #[must_use]
    pub fn new() -> Self {
        let mut nodes = Vec::with_capacity(64);
        // Index 0: placeholder (NodeId uses NonZeroU32)
        nodes.push(NodeData::new(NodeKind::Document));
        // Index 1: the document node
        nodes.push(NodeData::new(NodeKind::Document));
        Self {
            nodes,
            root: NodeId::from_index(1),
            encoding: Charset::utf8(),
            had_bom: false,
            diagnostics: Vec::new(),
        }
    }

    /// Returns the document node id.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns the first element child of the document node, usually `html`.
    #[must_use]
    pub fn root_element(&self) -> Option<NodeId> {
        self.children(self.root)
            .iter()
            .copied()
            .find(|&id| self.is_element(id))
    }

    /// Returns `true` if `id` refers to a node in this document's arena.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        id.as_index() < self.nodes.len()
    }

    /// Returns a reference to the `NodeData` for the given node.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not refer to a node in this document.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.as_index()]
    }

    /// Returns a mutable reference to the `NodeData` for the given node.
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.as_index()]
    }

    /// Returns the total number of nodes in the arena, detached ones
    /// included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len() - 1 // subtract placeholder at index 0
    }

    /// Returns the charset declared by a `<meta charset>` or
    /// `<meta http-equiv="Content-Type">` element in the tree, if any.
    ///
    /// This may differ from [`encoding`](Document::encoding), for example
    /// when a BOM or an override took precedence.
    #[must_use]
    pub fn declared_encoding(&self) -> Option<Charset> {
        self.descendants(self.root)
            .filter(|&id| self.node_name(id) == "meta")
            .find_map(|id| crate::encoding::meta_charset(self.attributes(id)))
            .and_then(|label| Charset::from_label(&label))
    }

    // --- Content ---

    /// Returns the kind and payload of a node.
    #[must_use]
    pub fn node_kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    /// Returns the name of a node: the lowercase tag name for elements,
    /// `#document`, `#text`, `#comment` or `#doctype` otherwise.
    #[must_use]
    pub fn node_name(&self, id: NodeId) -> &str {
        self.node(id).kind.name()
    }

    /// Returns `true` if the node is an element.
    #[must_use]
    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.node(id).kind, NodeKind::Element { .. })
    }

    /// Returns the raw text of a text, comment, or doctype node.
    ///
    /// Elements and the document node return `None`; use
    /// [`text_content`](Document::text_content) for their inner text.
    #[must_use]
    pub fn node_text(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).kind {
            NodeKind::Text { content }
            | NodeKind::Comment { content }
            | NodeKind::Doctype { content } => Some(content),
            NodeKind::Document | NodeKind::Element { .. } => None,
        }
    }

    /// Replaces the raw text of a text, comment, or doctype node.
    ///
    /// # Errors
    ///
    /// [`TreeError::NotCharacterData`] for elements and the document node.
    pub fn set_node_text(&mut self, id: NodeId, text: impl Into<String>) -> Result<(), TreeError> {
        self.check(id)?;
        match &mut self.node_mut(id).kind {
            NodeKind::Text { content }
            | NodeKind::Comment { content }
            | NodeKind::Doctype { content } => {
                *content = text.into();
                Ok(())
            }
            NodeKind::Document | NodeKind::Element { .. } => Err(TreeError::NotCharacterData(id)),
        }
    }

    /// Returns the inner text of a node: the concatenated content of all
    /// text nodes in its subtree, in document order.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut result = String::new();
        if let NodeKind::Text { content } = &self.node(id).kind {
            result.push_str(content);
        }
        for d in self.descendants(id) {
            if let NodeKind::Text { content } = &self.node(d).kind {
                result.push_str(content);
            }
        }
        result
    }

    // --- Attributes ---

    /// Returns the attributes of an element node in source order.
    ///
    /// Returns an empty slice for non-element nodes.
    #[must_use]
    pub fn attributes(&self, id: NodeId) -> &[Attribute] {
        match &self.node(id).kind {
            NodeKind::Element { attributes, .. } => attributes,
            _ => &[],
        }
    }

    /// Returns the value of an attribute, matching the name
    /// case-insensitively.
    #[must_use]
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attributes(id)
            .iter()
            .find(|a| a.matches(name))
            .map(|a| a.value.as_str())
    }

    /// Sets an attribute value. An existing attribute (matched
    /// case-insensitively) keeps its position and name; otherwise a new one
    /// is appended.
    ///
    /// # Errors
    ///
    /// [`TreeError::NotAnElement`] if `id` is not an element.
    pub fn set_attribute(
        &mut self,
        id: NodeId,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), TreeError> {
        let attributes = self.attributes_mut(id)?;
        let value = value.into();
        match attributes.iter_mut().find(|a| a.matches(name)) {
            Some(existing) => existing.value = value,
            None => attributes.push(Attribute::new(name, value)),
        }
        Ok(())
    }

    /// Attaches an attribute created with
    /// [`create_attribute`](Document::create_attribute), replacing any
    /// attribute of the same name in place. Returns the replaced attribute.
    ///
    /// # Errors
    ///
    /// [`TreeError::NotAnElement`] if `id` is not an element.
    pub fn set_attribute_node(
        &mut self,
        id: NodeId,
        attribute: Attribute,
    ) -> Result<Option<Attribute>, TreeError> {
        let attributes = self.attributes_mut(id)?;
        match attributes.iter_mut().find(|a| a.matches(&attribute.name)) {
            Some(existing) => Ok(Some(std::mem::replace(existing, attribute))),
            None => {
                attributes.push(attribute);
                Ok(None)
            }
        }
    }

    /// Removes an attribute by name (case-insensitive) and returns it.
    ///
    /// # Errors
    ///
    /// [`TreeError::NotAnElement`] if `id` is not an element.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Result<Option<Attribute>, TreeError> {
        let attributes = self.attributes_mut(id)?;
        Ok(attributes
            .iter()
            .position(|a| a.matches(name))
            .map(|i| attributes.remove(i)))
    }

    fn attributes_mut(&mut self, id: NodeId) -> Result<&mut Vec<Attribute>, TreeError> {
        self.check(id)?;
        match &mut self.node_mut(id).kind {
            NodeKind::Element { attributes, .. } => Ok(attributes),
            _ => Err(TreeError::NotAnElement(id)),
        }
    }

    // --- Navigation ---

    /// Returns the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Returns the children of a node in document order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Returns the child at `index`.
    #[must_use]
    pub fn child_at(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.children(id).get(index).copied()
    }

    /// Returns the number of children of a node.
    #[must_use]
    pub fn child_count(&self, id: NodeId) -> usize {
        self.children(id).len()
    }

    /// Returns the first child of a node.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    /// Returns the last child of a node.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).last().copied()
    }

    /// Returns the position of a node within its parent's children.
    #[must_use]
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    /// Returns the next sibling of a node.
    ///
    /// Siblings are found by looking the node up in its parent's child
    /// list, which is linear in the number of siblings. To walk a run of
    /// siblings use [`following_siblings`](Self::following_siblings).
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index_of(id)?;
        self.child_at(parent, index + 1)
    }

    /// Returns the previous sibling of a node. Linear in the number of
    /// siblings, like [`next_sibling`](Self::next_sibling).
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index_of(id)?;
        index.checked_sub(1).and_then(|i| self.child_at(parent, i))
    }

    /// Returns the siblings after a node, in document order.
    pub fn following_siblings(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.split_siblings(id).1.iter().copied()
    }

    /// Returns the siblings before a node, nearest first.
    pub fn preceding_siblings(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.split_siblings(id).0.iter().rev().copied()
    }

    /// Splits the parent's child list around `id`, excluding `id`.
    fn split_siblings(&self, id: NodeId) -> (&[NodeId], &[NodeId]) {
        let Some(parent) = self.parent(id) else {
            return (&[], &[]);
        };
        let children = self.children(parent);
        match children.iter().position(|&c| c == id) {
            Some(index) => (&children[..index], &children[index + 1..]),
            None => (&[], &[]),
        }
    }

    /// Returns an iterator over the ancestors of a node, nearest first. The
    /// node itself is not included.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            doc: self,
            next: self.parent(id),
        }
    }

    /// Returns a depth-first, pre-order iterator over all descendants of a
    /// node, not including the node itself.
    ///
    /// The iterator is lazy: each call walks the tree as it is now.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            doc: self,
            stack: vec![self.children(id).iter()],
        }
    }

    // --- Factories ---

    /// Allocates a new detached node in the arena and returns its `NodeId`.
    pub fn create_node(&mut self, kind: NodeKind) -> NodeId {
        let index = self.nodes.len();
        self.nodes.push(NodeData::new(kind));
        NodeId::from_index(index)
    }

    /// Creates a detached element. The name is lowercased.
    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.create_node(NodeKind::Element {
            name: name.to_ascii_lowercase(),
            attributes: Vec::new(),
        })
    }

    /// Creates a detached text node.
    pub fn create_text_node(&mut self, text: impl Into<String>) -> NodeId {
        self.create_node(NodeKind::Text {
            content: text.into(),
        })
    }

    /// Creates a detached comment node.
    pub fn create_comment(&mut self, text: impl Into<String>) -> NodeId {
        self.create_node(NodeKind::Comment {
            content: text.into(),
        })
    }

    /// Creates a detached doctype node. `text` is what goes between `<!`
    /// and `>`, e.g. `"DOCTYPE html"`.
    pub fn create_doctype(&mut self, text: impl Into<String>) -> NodeId {
        self.create_node(NodeKind::Doctype {
            content: text.into(),
        })
    }

    /// Creates an attribute that is not attached to any element. The value
    /// is stored as given, without escaping.
    #[must_use]
    pub fn create_attribute(&self, name: &str, value: impl Into<String>) -> Attribute {
        Attribute::new(name, value)
    }

    /// Creates an unattached attribute with an empty value, such as
    /// `disabled`. It serializes as a bare name.
    #[must_use]
    pub fn create_empty_attribute(&self, name: &str) -> Attribute {
        Attribute::new(name, String::new())
    }

    /// Allocates a node and appends it to `parent` in one step.
    ///
    /// A fresh node can always be attached, so this skips the checks of
    /// [`append_child`](Document::append_child). `parent` must be able to
    /// hold children.
    pub(crate) fn append_new_node(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        debug_assert!(self.node(parent).kind.can_have_children());
        let id = self.create_node(kind);
        self.attach(parent, self.child_count(parent), id);
        id
    }

    // --- Mutation ---

    /// Appends a detached node as the last child of `parent`.
    ///
    /// # Errors
    ///
    /// See [`insert_at`](Document::insert_at).
    pub fn append_child(&mut self, parent: NodeId, node: NodeId) -> Result<(), TreeError> {
        self.check_insert(parent, node)?;
        self.attach(parent, self.child_count(parent), node);
        Ok(())
    }

    /// Inserts a detached node as the first child of `parent`.
    ///
    /// # Errors
    ///
    /// See [`insert_at`](Document::insert_at).
    pub fn prepend_child(&mut self, parent: NodeId, node: NodeId) -> Result<(), TreeError> {
        self.insert_at(parent, 0, node)
    }

    /// Inserts a detached node so that it becomes child number `index` of
    /// `parent`. `index` may equal the current child count.
    ///
    /// # Errors
    ///
    /// - [`TreeError::UnknownNode`] if either id is not in this document.
    /// - [`TreeError::DocumentNode`] if `node` is the document node.
    /// - [`TreeError::AlreadyAttached`] if `node` has a parent.
    /// - [`TreeError::CannotHaveChildren`] if `parent` is a text, comment or
    ///   doctype node.
    /// - [`TreeError::HierarchyCycle`] if `parent` is `node` or one of its
    ///   descendants.
    /// - [`TreeError::IndexOutOfBounds`] if `index` exceeds the child count.
    pub fn insert_at(&mut self, parent: NodeId, index: usize, node: NodeId) -> Result<(), TreeError> {
        self.check_insert(parent, node)?;
        let len = self.child_count(parent);
        if index > len {
            return Err(TreeError::IndexOutOfBounds { index, len });
        }
        self.attach(parent, index, node);
        Ok(())
    }

    /// Inserts a detached node immediately before `reference`.
    ///
    /// # Errors
    ///
    /// [`TreeError::Detached`] if `reference` has no parent, otherwise as
    /// [`insert_at`](Document::insert_at).
    pub fn insert_before(&mut self, reference: NodeId, node: NodeId) -> Result<(), TreeError> {
        let (parent, index) = self.position(reference)?;
        self.check_insert(parent, node)?;
        self.attach(parent, index, node);
        Ok(())
    }

    /// Inserts a detached node immediately after `reference`.
    ///
    /// # Errors
    ///
    /// [`TreeError::Detached`] if `reference` has no parent, otherwise as
    /// [`insert_at`](Document::insert_at).
    pub fn insert_after(&mut self, reference: NodeId, node: NodeId) -> Result<(), TreeError> {
        let (parent, index) = self.position(reference)?;
        self.check_insert(parent, node)?;
        self.attach(parent, index + 1, node);
        Ok(())
    }

    /// Detaches a node from its parent. The node keeps its subtree; its
    /// former neighbours become adjacent.
    ///
    /// # Errors
    ///
    /// - [`TreeError::DocumentNode`] for the document node.
    /// - [`TreeError::Detached`] if the node has no parent.
    pub fn remove(&mut self, node: NodeId) -> Result<(), TreeError> {
        let (parent, index) = self.position(node)?;
        self.node_mut(parent).children.remove(index);
        self.node_mut(node).parent = None;
        Ok(())
    }

    /// Detaches `node` from `parent`, after checking that it is a child of
    /// `parent`.
    ///
    /// # Errors
    ///
    /// [`TreeError::NotAChild`] if `node`'s parent is not `parent`.
    pub fn remove_child(&mut self, parent: NodeId, node: NodeId) -> Result<(), TreeError> {
        self.check(parent)?;
        self.check(node)?;
        if self.parent(node) != Some(parent) {
            return Err(TreeError::NotAChild { parent, node });
        }
        self.remove(node)
    }

    /// Puts the detached `new_node` at `old_node`'s position under `parent`
    /// and detaches `old_node`, which is returned.
    ///
    /// # Errors
    ///
    /// - [`TreeError::NotAChild`] if `old_node` is not a child of `parent`.
    /// - Otherwise as [`insert_at`](Document::insert_at) for `new_node`.
    pub fn replace_child(
        &mut self,
        parent: NodeId,
        new_node: NodeId,
        old_node: NodeId,
    ) -> Result<NodeId, TreeError> {
        self.check(parent)?;
        self.check(old_node)?;
        if self.parent(old_node) != Some(parent) {
            return Err(TreeError::NotAChild {
                parent,
                node: old_node,
            });
        }
        self.check_insert(parent, new_node)?;
        let index = self
            .index_of(old_node)
            .ok_or(TreeError::NotAChild {
                parent,
                node: old_node,
            })?;
        self.node_mut(parent).children[index] = new_node;
        self.node_mut(new_node).parent = Some(parent);
        self.node_mut(old_node).parent = None;
        Ok(old_node)
    }

    /// Detaches every child of a node and returns them in their former
    /// order.
    ///
    /// # Errors
    ///
    /// [`TreeError::UnknownNode`] if `id` is not in this document.
    pub fn remove_all_children(&mut self, id: NodeId) -> Result<Vec<NodeId>, TreeError> {
        self.check(id)?;
        let children = std::mem::take(&mut self.node_mut(id).children);
        for &child in &children {
            self.node_mut(child).parent = None;
        }
        Ok(children)
    }

    // --- Internal checks ---

    fn check(&self, id: NodeId) -> Result<(), TreeError> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(TreeError::UnknownNode(id))
        }
    }

    /// Returns `(parent, index)` for an attached, non-document node.
    fn position(&self, node: NodeId) -> Result<(NodeId, usize), TreeError> {
        self.check(node)?;
        if node == self.root {
            return Err(TreeError::DocumentNode);
        }
        let parent = self.parent(node).ok_or(TreeError::Detached(node))?;
        let index = self
            .index_of(node)
            .ok_or(TreeError::NotAChild { parent, node })?;
        Ok((parent, index))
    }

    fn check_insert(&self, parent: NodeId, node: NodeId) -> Result<(), TreeError> {
        self.check(parent)?;
        self.check(node)?;
        if node == self.root {
            return Err(TreeError::DocumentNode);
        }
        if self.parent(node).is_some() {
            return Err(TreeError::AlreadyAttached(node));
        }
        if !self.node(parent).kind.can_have_children() {
            return Err(TreeError::CannotHaveChildren(parent));
        }
        if parent == node || self.ancestors(parent).any(|a| a == node) {
            return Err(TreeError::HierarchyCycle { node, parent });
        }
        Ok(())
    }

    fn attach(&mut self, parent: NodeId, index: usize, node: NodeId) {
        self.node_mut(parent).children.insert(index, node);
        self.node_mut(node).parent = Some(parent);
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

// --- Iterators ---

/// Iterator over the ancestors of a node, nearest first.
pub struct Ancestors<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.parent(current);
        Some(current)
    }
}

/// Depth-first, pre-order iterator over the descendants of a node.
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<std::slice::Iter<'a, NodeId>>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let level = self.stack.last_mut()?;
            if let Some(&id) = level.next() {
                self.stack.push(self.doc.children(id).iter());
                return Some(id);
            }
            self.stack.pop();
        }
    }
}
