//! HTML serializer.
//!
//! Writes a `Document` tree back out as HTML text:
//!
//! - Void elements use `<br>` syntax (no `/>`) and get no end tag
//! - Every other element gets an explicit end tag, even where the source
//!   left it implied, so the output reparses to the same tree
//! - Raw text elements (script, style) are not escaped
//! - Attributes with an empty value are written as a bare name
//!
//! No formatting whitespace is added; text nodes are written as stored.

use crate::html::{is_raw_text_element, is_void_element};
use crate::tree::{Document, NodeId, NodeKind};

/// Serializes a whole document to an HTML string.
///
/// # Examples
///
/// ```
/// use htmlarbor::html::parse_html;
/// use htmlarbor::serial::html::serialize_html;
///
/// let doc = parse_html("<ul><li>one<li>two</ul>");
/// assert_eq!(serialize_html(&doc), "<ul><li>one</li><li>two</li></ul>");
/// ```
#[must_use]
pub fn serialize_html(doc: &Document) -> String {
    serialize_children(doc, doc.root())
}

/// Serializes a node and its subtree (outer HTML).
///
/// For the document node this is the same as [`serialize_html`].
#[must_use]
pub fn serialize_node(doc: &Document, id: NodeId) -> String {
    let mut out = String::new();
    write_node(doc, id, &mut out);
    out
}

/// Serializes the children of a node (inner HTML).
#[must_use]
pub fn serialize_children(doc: &Document, id: NodeId) -> String {
    let mut out = String::new();
    for &child in doc.children(id) {
        write_node(doc, child, &mut out);
    }
    out
}

/// Escapes text for HTML output.
///
/// - `&` → `&amp;`
/// - `<` → `&lt;`
/// - `>` → `&gt;`
/// - `"` → `&quot;`
///
/// The same table is used for text content and for double-quoted attribute
/// values.
///
/// # Examples
///
/// ```
/// use htmlarbor::html_encode;
///
/// assert_eq!(
///     html_encode("http://something.com\"&<>"),
///     "http://something.com&quot;&amp;&lt;&gt;"
/// );
/// ```
#[must_use]
pub fn html_encode(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    write_escaped(&mut out, text);
    out
}

fn write_escaped(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

/// One step of the serialization walk.
enum Step {
    Open(NodeId),
    Close(NodeId),
}

/// Writes `id` and its subtree with an explicit stack, so arbitrarily deep
/// trees built through the mutation API do not exhaust the call stack.
fn write_node(doc: &Document, id: NodeId, out: &mut String) {
    let mut stack = vec![Step::Open(id)];
    while let Some(step) = stack.pop() {
        match step {
            Step::Open(id) => match doc.node_kind(id) {
                NodeKind::Element { name, attributes } => {
                    out.push('<');
                    out.push_str(name);
                    for attr in attributes {
                        out.push(' ');
                        out.push_str(&attr.name);
                        if !attr.value.is_empty() {
                            out.push_str("=\"");
                            write_escaped(out, &attr.value);
                            out.push('"');
                        }
                    }
                    out.push('>');

                    let children = doc.children(id);
                    if is_void_element(name) && children.is_empty() {
                        continue;
                    }
                    if is_raw_text_element(name) {
                        for &child in children {
                            if let NodeKind::Text { content } = doc.node_kind(child) {
                                out.push_str(content);
                            } else {
                                write_node(doc, child, out);
                            }
                        }
                        push_end_tag(out, name);
                        continue;
                    }
                    stack.push(Step::Close(id));
                    stack.extend(children.iter().rev().map(|&c| Step::Open(c)));
                }
                NodeKind::Text { content } => write_escaped(out, content),
                NodeKind::Comment { content } => {
                    out.push_str("<!--");
                    out.push_str(content);
                    out.push_str("-->");
                }
                NodeKind::Doctype { content } => {
                    out.push_str("<!");
                    out.push_str(content);
                    out.push('>');
                }
                NodeKind::Document => {
                    stack.extend(doc.children(id).iter().rev().map(|&c| Step::Open(c)));
                }
            },
            Step::Close(id) => push_end_tag(out, doc.node_name(id)),
        }
    }
}

fn push_end_tag(out: &mut String, name: &str) {
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}
