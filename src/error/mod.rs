//! Error types and diagnostics.
//!
//! Three failure families are kept apart:
//!
//! - **Markup problems** never abort a parse. The tokenizer and tree builder
//!   record them as [`ParseDiagnostic`]s on the resulting document and carry on.
//! - **API contract violations** on the tree (inserting a node that already
//!   has a parent, naming the wrong parent, a bad index) are reported as
//!   [`TreeError`] and leave the tree unchanged.
//! - **Loading failures** are reported as [`LoadError`]: either the byte
//!   source could not be read or written, or strict decoding rejected it.

use std::fmt;
use std::io;

use crate::encoding::EncodingError;
use crate::tree::NodeId;

/// Severity level for a parse diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorSeverity {
    /// Markup that was accepted with a best-effort interpretation.
    Warning,
    /// Markup that had to be dropped or rewritten to keep the tree sound.
    Error,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Source location within an HTML document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number (in characters, not bytes).
    pub column: u32,
    /// 0-based byte offset into the decoded text.
    pub byte_offset: usize,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A single recovered markup problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDiagnostic {
    /// The severity of this diagnostic.
    pub severity: ErrorSeverity,
    /// Human-readable message.
    pub message: String,
    /// Where in the decoded text the problem was found.
    pub location: SourceLocation,
}

impl fmt::Display for ParseDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} at {}",
            self.severity, self.message, self.location
        )
    }
}

/// A violated precondition of a tree mutation.
///
/// These are bugs in the caller, not problems with the document, so they are
/// never absorbed silently. An operation that returns a `TreeError` has not
/// modified the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeError {
    /// The id does not belong to this document's arena.
    UnknownNode(NodeId),
    /// The node to insert is already attached to a parent.
    AlreadyAttached(NodeId),
    /// `node` is not a child of `parent`.
    NotAChild {
        /// The parent the caller named.
        parent: NodeId,
        /// The node that was expected among its children.
        node: NodeId,
    },
    /// The node has no parent to be removed from.
    Detached(NodeId),
    /// An insertion index past the end of the child list.
    IndexOutOfBounds {
        /// The index the caller asked for.
        index: usize,
        /// The number of children at the time of the call.
        len: usize,
    },
    /// Inserting `node` under `parent` would make it its own ancestor.
    HierarchyCycle {
        /// The node being inserted.
        node: NodeId,
        /// The intended parent, which lies inside `node`'s subtree.
        parent: NodeId,
    },
    /// Text, comment and doctype nodes cannot hold children.
    CannotHaveChildren(NodeId),
    /// The document node can be neither moved nor removed.
    DocumentNode,
    /// Attribute operations need an element.
    NotAnElement(NodeId),
    /// Only text, comment and doctype nodes carry their own text.
    NotCharacterData(NodeId),
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownNode(id) => write!(f, "node {} does not belong to this document", id.into_raw()),
            Self::AlreadyAttached(id) => {
                write!(f, "node {} already has a parent; remove it first", id.into_raw())
            }
            Self::NotAChild { parent, node } => write!(
                f,
                "node {} is not a child of node {}",
                node.into_raw(),
                parent.into_raw()
            ),
            Self::Detached(id) => write!(f, "node {} has no parent", id.into_raw()),
            Self::IndexOutOfBounds { index, len } => {
                write!(f, "child index {index} out of bounds for {len} children")
            }
            Self::HierarchyCycle { node, parent } => write!(
                f,
                "cannot insert node {} under its own descendant {}",
                node.into_raw(),
                parent.into_raw()
            ),
            Self::CannotHaveChildren(id) => {
                write!(f, "node {} cannot have children", id.into_raw())
            }
            Self::DocumentNode => write!(f, "the document node cannot be moved or removed"),
            Self::NotAnElement(id) => write!(f, "node {} is not an element", id.into_raw()),
            Self::NotCharacterData(id) => {
                write!(f, "node {} does not carry character data", id.into_raw())
            }
        }
    }
}

impl std::error::Error for TreeError {}

/// The error type returned when a document cannot be loaded or saved.
///
/// Malformed markup is never a `LoadError`; only unreadable sources, unwritable
/// destinations and (with strict decoding) undecodable bytes are.
#[derive(Debug)]
pub enum LoadError {
    /// Opening, reading, seeking or writing the underlying stream failed.
    Io(io::Error),
    /// Strict decoding found bytes that are invalid in the chosen encoding.
    Decode(EncodingError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Decode(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Decode(e) => Some(e),
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<EncodingError> for LoadError {
    fn from(e: EncodingError) -> Self {
        Self::Decode(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_location_display() {
        let loc = SourceLocation {
            line: 10,
            column: 5,
            byte_offset: 42,
        };
        assert_eq!(loc.to_string(), "10:5");
    }

    #[test]
    fn test_parse_diagnostic_display() {
        let diag = ParseDiagnostic {
            severity: ErrorSeverity::Warning,
            message: "stray end tag </div>".to_string(),
            location: SourceLocation {
                line: 3,
                column: 10,
                byte_offset: 50,
            },
        };
        assert_eq!(diag.to_string(), "warning: stray end tag </div> at 3:10");
    }

    #[test]
    fn test_error_severity_display() {
        assert_eq!(ErrorSeverity::Warning.to_string(), "warning");
        assert_eq!(ErrorSeverity::Error.to_string(), "error");
    }

    #[test]
    fn test_tree_error_display() {
        let mut doc = crate::Document::new();
        let a = doc.create_element("a");
        let err = TreeError::IndexOutOfBounds { index: 4, len: 2 };
        assert_eq!(err.to_string(), "child index 4 out of bounds for 2 children");
        let err = TreeError::AlreadyAttached(a);
        assert!(err.to_string().contains("already has a parent"));
        let _: &dyn std::error::Error = &err;
    }

    #[test]
    fn test_load_error_from_io() {
        let io = io::Error::new(io::ErrorKind::NotFound, "missing.html");
        let err = LoadError::from(io);
        assert!(matches!(err, LoadError::Io(_)));
        assert!(err.to_string().starts_with("I/O error"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
