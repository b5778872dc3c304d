//! Node type definitions.
//!
//! The `NodeKind` enum represents the five node types of an HTML document
//! tree. Each variant carries the node-type-specific payload (element name
//! and attributes, or raw text).

use super::Attribute;

/// Sentinel name reported for the document node.
pub const DOCUMENT_NAME: &str = "#document";
/// Sentinel name reported for text nodes.
pub const TEXT_NAME: &str = "#text";
/// Sentinel name reported for comment nodes.
pub const COMMENT_NAME: &str = "#comment";
/// Sentinel name reported for doctype nodes.
pub const DOCTYPE_NAME: &str = "#doctype";

/// The kind of an HTML node and its associated data.
///
/// This enum carries the payload for each node type. Navigation links
/// (parent, children) are stored in `NodeData`, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The document node. There is exactly one per `Document`.
    Document,

    /// An element node, e.g., `<div class="x">`.
    Element {
        /// The lowercase tag name.
        name: String,
        /// Attributes in source order.
        attributes: Vec<Attribute>,
    },

    /// A text node containing character data.
    Text {
        /// The text content (character references already decoded, except
        /// inside `script` and `style`).
        content: String,
    },

    /// A comment node, e.g., `<!-- ... -->`.
    Comment {
        /// The comment text (without the `<!--` and `-->` delimiters).
        content: String,
    },

    /// A document type declaration, e.g., `<!DOCTYPE html>`.
    Doctype {
        /// Everything between `<!` and `>`, e.g. `DOCTYPE html`.
        content: String,
    },
}

impl NodeKind {
    /// Returns the node name: the tag name for elements, a `#`-prefixed
    /// sentinel for everything else.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Document => DOCUMENT_NAME,
            Self::Element { name, .. } => name,
            Self::Text { .. } => TEXT_NAME,
            Self::Comment { .. } => COMMENT_NAME,
            Self::Doctype { .. } => DOCTYPE_NAME,
        }
    }

    /// Returns `true` if nodes of this kind may have children.
    #[must_use]
    pub fn can_have_children(&self) -> bool {
        matches!(self, Self::Document | Self::Element { .. })
    }
}
