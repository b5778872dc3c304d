//! HTML serialization.
//!
//! This module turns a `Document` tree back into HTML text. Encoding that
//! text into bytes is done by [`Document::to_bytes`](crate::Document::to_bytes)
//! and the `save` family.

pub mod html;

pub use html::{html_encode, serialize_children, serialize_html, serialize_node};
