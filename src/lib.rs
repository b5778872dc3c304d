//! # htmlarbor
//!
//! A forgiving HTML document engine. It detects the character encoding of
//! raw bytes, parses arbitrary (possibly broken) HTML into an editable
//! arena-based tree, and serializes the tree back to bytes in the right
//! encoding.
//!
//! ## Quick Start
//!
//! ```
//! use htmlarbor::{Charset, Document, LoadOptions};
//!
//! let bytes = b"<meta charset=windows-1252><ul><li>caf\xE9<li>th\xE9</ul>";
//! let mut doc = Document::load_bytes(bytes, &LoadOptions::default()).unwrap();
//! assert_eq!(doc.encoding, Charset::windows_1252());
//!
//! let ul = doc.descendants(doc.root()).find(|&id| doc.node_name(id) == "ul").unwrap();
//! assert_eq!(doc.child_count(ul), 2);
//!
//! let item = doc.create_element("li");
//! let text = doc.create_text_node("cr\u{e8}me");
//! doc.append_child(item, text).unwrap();
//! doc.append_child(ul, item).unwrap();
//!
//! let out = doc.to_bytes(doc.encoding);
//! assert!(out.ends_with(b"<li>cr\xE8me</li></ul>"));
//! ```

pub mod encoding;
pub mod error;
pub mod html;
pub(crate) mod parser;
pub mod serial;
pub mod tree;

// Re-export primary types at the crate root for convenience.
pub use encoding::{Charset, EncodingOptions};
pub use error::{LoadError, TreeError};
pub use html::{parse_html, HtmlParseOptions};
pub use serial::html::html_encode;
pub use tree::{Attribute, Document, LoadOptions, NodeId, NodeKind};
