//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::fmt::Write;
use std::path::{Path, PathBuf};

use htmlarbor::Document;

/// Number of story rows in [`home_page`].
pub const STORY_ROWS: usize = 200;

/// Pre-order descendant index of the first row's `<tr>` in [`home_page`].
pub const FIRST_ROW_INDEX: usize = 13;

/// Descendants contributed by each row: the `tr`, three cells, their text,
/// and the newline after the row.
pub const NODES_PER_ROW: usize = 8;

/// Generates a news-style home page.
///
/// The document node's children are the doctype, a newline, `html`, a
/// newline and a trailing comment. Rows leave their cells unclosed, so the
/// parser has to close them at each `</tr>`.
pub fn home_page() -> String {
    let mut html = String::from(
        "<!DOCTYPE html>\n<html>\n\
         <head><title>Home</title><meta charset=\"utf-8\"></head>\n\
         <body>\n<table id=news>\n",
    );
    for i in 0..STORY_ROWS {
        let _ = writeln!(
            html,
            "<tr class=story><td class=date>2024-{:02}-{:02}\
             <td class=title>Story {i} &amp; friends\
             <td class=more>more</tr>",
            i % 12 + 1,
            i % 28 + 1
        );
    }
    html.push_str("</table>\n</body>\n</html>\n<!-- generated -->");
    html
}

/// Parses [`home_page`].
pub fn home_page_document() -> Document {
    Document::parse_str(&home_page())
}

/// A UTF-8 page that starts with a BOM and has no `<meta>` declaration.
pub fn utf8_bom_page() -> Vec<u8> {
    let mut bytes = b"\xEF\xBB\xBF".to_vec();
    bytes.extend_from_slice(
        b"<!DOCTYPE html>\n<html><head><title>UTF-8</title></head>\
          <body><p>Plain ASCII content.</p></body></html>\n",
    );
    bytes
}

/// The Cyrillic sentence used in [`windows_1251_page`].
pub const CYRILLIC_TEXT: &str = "Привет, мир";

/// A windows-1251 page declaring its charset with `<meta charset>`.
pub fn windows_1251_page() -> Vec<u8> {
    let mut bytes = b"<!DOCTYPE html>\n<html><head><meta charset=windows-1251>\
                      <title>1251</title></head><body><p>"
        .to_vec();
    // "Привет, мир"
    bytes.extend_from_slice(b"\xCF\xF0\xE8\xE2\xE5\xF2, \xEC\xE8\xF0");
    bytes.extend_from_slice(b"</p></body></html>\n");
    bytes
}

/// Writes `bytes` to `name` inside `dir` and returns the path.
pub fn write_fixture(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap_or_else(|e| panic!("writing {}: {e}", path.display()));
    path
}

/// Returns the descendants of the document node whose text content is not
/// whitespace-only.
pub fn meaningful_descendants(doc: &Document) -> Vec<htmlarbor::NodeId> {
    doc.descendants(doc.root())
        .filter(|&id| !doc.text_content(id).trim().is_empty())
        .collect()
}
