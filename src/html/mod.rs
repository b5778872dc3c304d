//! Error-tolerant HTML parser.
//!
//! Parsing runs in two stages: the [`tokenizer`] turns decoded text into
//! tokens, and a tree builder turns tokens into a [`Document`]. Neither
//! stage ever fails. Common real-world breakage is repaired on the way:
//!
//! - Missing closing tags (auto-closed by a static table of HTML's
//!   optional end tag rules)
//! - Unquoted attribute values (`<div class=main>`)
//! - Void elements that never need closing (`<br>`, `<img>`, `<hr>`, etc.)
//! - Case-insensitive tag name matching
//! - Bare `&` characters (not just `&amp;`)
//! - Boolean attributes without values (`<input disabled>`)
//! - Stray end tags and tags cut off by the end of input
//!
//! No `html`, `head` or `body` elements are implied: the tree reflects what
//! the markup says.
//!
//! # Examples
//!
//! ```
//! use htmlarbor::html::parse_html;
//!
//! let doc = parse_html("<p>Hello <b>world</b>");
//! let p = doc.root_element().unwrap();
//! assert_eq!(doc.node_name(p), "p");
//! assert_eq!(doc.text_content(p), "Hello world");
//! ```

mod builder;
pub mod entities;
pub mod tokenizer;

use crate::tree::Document;

use builder::TreeBuilder;

/// Default maximum depth of the open element stack.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Options controlling HTML parser behavior.
///
/// Use the builder pattern to configure options:
///
/// ```
/// use htmlarbor::html::HtmlParseOptions;
///
/// let opts = HtmlParseOptions::default()
///     .no_blanks(true)
///     .max_depth(64);
/// ```
#[derive(Debug, Clone)]
pub struct HtmlParseOptions {
    /// If true, drop whitespace-only text.
    pub no_blanks: bool,
    /// If true, keep only error diagnostics on the document.
    pub no_warnings: bool,
    /// Maximum number of simultaneously open elements. Deeper start tags
    /// still produce elements, but their content stays at the current
    /// level.
    pub max_depth: usize,
}

impl Default for HtmlParseOptions {
    fn default() -> Self {
        Self {
            no_blanks: false,
            no_warnings: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl HtmlParseOptions {
    /// Enables or disables stripping of blank text nodes.
    #[must_use]
    pub fn no_blanks(mut self, yes: bool) -> Self {
        self.no_blanks = yes;
        self
    }

    /// Enables or disables warning suppression.
    #[must_use]
    pub fn no_warnings(mut self, yes: bool) -> Self {
        self.no_warnings = yes;
        self
    }

    /// Sets the maximum nesting depth.
    #[must_use]
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

/// Parses an HTML string into a `Document` with default options.
///
/// The parser is error-tolerant and always produces a tree. Diagnostics
/// about any issues found during parsing are stored in
/// `Document::diagnostics`.
#[must_use]
pub fn parse_html(input: &str) -> Document {
    parse_html_with_options(input, &HtmlParseOptions::default())
}

/// Parses an HTML string into a `Document` with the given options.
///
/// # Examples
///
/// ```
/// use htmlarbor::html::{parse_html_with_options, HtmlParseOptions};
///
/// let opts = HtmlParseOptions::default().no_blanks(true);
/// let doc = parse_html_with_options("<ul>\n  <li>a</li>\n</ul>", &opts);
/// let ul = doc.root_element().unwrap();
/// assert_eq!(doc.child_count(ul), 1);
/// ```
#[must_use]
pub fn parse_html_with_options(input: &str, options: &HtmlParseOptions) -> Document {
    let input = input.strip_prefix('\u{FEFF}').unwrap_or(input);
    TreeBuilder::new(input, options).build()
}

// --- Element tables ---

/// Returns true if the given tag name (lowercase) is a void element that
/// must not have content.
#[must_use]
pub fn is_void_element(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
            | "basefont"
            | "frame"
            | "isindex"
            | "keygen"
    )
}

/// Returns true if `tag` is a raw text element whose content is not parsed
/// as HTML (script, style).
#[must_use]
pub fn is_raw_text_element(tag: &str) -> bool {
    matches!(tag, "script" | "style")
}

/// Open elements closed by a block-level start tag.
const CLOSES_P: &[&str] = &["p"];
const CLOSES_CELL: &[&str] = &["td", "th"];
const CLOSES_ROW: &[&str] = &["td", "th", "tr"];
const CLOSES_TABLE_SECTION: &[&str] = &["td", "th", "tr", "thead", "tbody", "tfoot", "colgroup"];

/// Elements that end the search for something to close. A `<p>` inside a
/// `<td>` or a `<button>` never closes a paragraph outside it.
const DEFAULT_SCOPE: &[&str] = &[
    "applet", "button", "caption", "html", "marquee", "object", "table", "td", "template", "th",
];
const LIST_SCOPE: &[&str] = &[
    "applet", "button", "caption", "html", "marquee", "object", "ol", "table", "td", "template",
    "th", "ul",
];
const DEFINITION_SCOPE: &[&str] = &[
    "applet", "button", "caption", "dl", "html", "marquee", "object", "table", "td", "template",
    "th",
];
const TABLE_SCOPE: &[&str] = &["html", "table", "template"];
const SELECT_SCOPE: &[&str] = &["html", "select", "template"];

/// Maps a start tag to the open elements it implicitly closes, and to the
/// elements that bound the search for them.
///
/// The builder walks the open element stack from the top down to the first
/// scope boundary and closes the outermost listed element it passes,
/// together with everything above it. So `<tr>` inside `<tr><td><font>`
/// closes all three.
const AUTO_CLOSE: &[(&str, &[&str], &[&str])] = &[
    ("address", CLOSES_P, DEFAULT_SCOPE),
    ("article", CLOSES_P, DEFAULT_SCOPE),
    ("aside", CLOSES_P, DEFAULT_SCOPE),
    ("blockquote", CLOSES_P, DEFAULT_SCOPE),
    ("center", CLOSES_P, DEFAULT_SCOPE),
    ("details", CLOSES_P, DEFAULT_SCOPE),
    ("dialog", CLOSES_P, DEFAULT_SCOPE),
    ("dir", CLOSES_P, DEFAULT_SCOPE),
    ("div", CLOSES_P, DEFAULT_SCOPE),
    ("dl", CLOSES_P, DEFAULT_SCOPE),
    ("fieldset", CLOSES_P, DEFAULT_SCOPE),
    ("figcaption", CLOSES_P, DEFAULT_SCOPE),
    ("figure", CLOSES_P, DEFAULT_SCOPE),
    ("footer", CLOSES_P, DEFAULT_SCOPE),
    ("form", CLOSES_P, DEFAULT_SCOPE),
    ("h1", CLOSES_P, DEFAULT_SCOPE),
    ("h2", CLOSES_P, DEFAULT_SCOPE),
    ("h3", CLOSES_P, DEFAULT_SCOPE),
    ("h4", CLOSES_P, DEFAULT_SCOPE),
    ("h5", CLOSES_P, DEFAULT_SCOPE),
    ("h6", CLOSES_P, DEFAULT_SCOPE),
    ("header", CLOSES_P, DEFAULT_SCOPE),
    ("hgroup", CLOSES_P, DEFAULT_SCOPE),
    ("hr", CLOSES_P, DEFAULT_SCOPE),
    ("main", CLOSES_P, DEFAULT_SCOPE),
    ("menu", CLOSES_P, DEFAULT_SCOPE),
    ("nav", CLOSES_P, DEFAULT_SCOPE),
    ("ol", CLOSES_P, DEFAULT_SCOPE),
    ("p", CLOSES_P, DEFAULT_SCOPE),
    ("pre", CLOSES_P, DEFAULT_SCOPE),
    ("section", CLOSES_P, DEFAULT_SCOPE),
    ("summary", CLOSES_P, DEFAULT_SCOPE),
    ("table", CLOSES_P, DEFAULT_SCOPE),
    ("ul", CLOSES_P, DEFAULT_SCOPE),
    ("li", &["li", "p"], LIST_SCOPE),
    ("dt", &["dt", "dd", "p"], DEFINITION_SCOPE),
    ("dd", &["dt", "dd", "p"], DEFINITION_SCOPE),
    ("tr", CLOSES_ROW, TABLE_SCOPE),
    ("td", CLOSES_CELL, TABLE_SCOPE),
    ("th", CLOSES_CELL, TABLE_SCOPE),
    ("thead", CLOSES_TABLE_SECTION, TABLE_SCOPE),
    ("tbody", CLOSES_TABLE_SECTION, TABLE_SCOPE),
    ("tfoot", CLOSES_TABLE_SECTION, TABLE_SCOPE),
    ("colgroup", &["colgroup"], TABLE_SCOPE),
    ("option", &["option"], SELECT_SCOPE),
    ("optgroup", &["option", "optgroup"], SELECT_SCOPE),
    ("body", &["head"], DEFAULT_SCOPE),
];

/// Returns the elements `tag` implicitly closes and the boundary of the
/// search for them, if `tag` closes anything.
pub(crate) fn auto_close_rule(tag: &str) -> Option<(&'static [&'static str], &'static [&'static str])> {
    AUTO_CLOSE
        .iter()
        .find(|&&(t, _, _)| t == tag)
        .map(|&(_, closes, scope)| (closes, scope))
}

/// Returns true if `tag` is an element whose opening auto-closes `open_tag`.
///
/// For example, a `<p>` auto-closes a previous `<p>`, and a `<li>`
/// auto-closes a previous `<li>`.
#[must_use]
pub fn auto_closes(open_tag: &str, tag: &str) -> bool {
    auto_close_rule(tag).is_some_and(|(closes, _)| closes.contains(&open_tag))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ErrorSeverity;
    use crate::tree::{NodeId, NodeKind};
    use pretty_assertions::assert_eq;

    fn element_names(doc: &Document, ids: &[NodeId]) -> Vec<String> {
        ids.iter().map(|&id| doc.node_name(id).to_string()).collect()
    }

    // --- Basic parsing ---

    #[test]
    fn test_parse_simple_html() {
        let doc = parse_html("<html><body><p>Hello</p></body></html>");
        let html = doc.root_element().unwrap();
        assert_eq!(doc.node_name(html), "html");
        assert!(doc.diagnostics.is_empty());
    }

    #[test]
    fn test_no_implied_structure() {
        let doc = parse_html("<p>Hello</p>");
        let root = doc.root();
        let first = doc.first_child(root).unwrap();
        assert_eq!(doc.node_name(first), "p");
        assert_eq!(doc.text_content(first), "Hello");
    }

    #[test]
    fn test_empty_input() {
        let doc = parse_html("");
        assert_eq!(doc.child_count(doc.root()), 0);
    }

    #[test]
    fn test_plain_text() {
        let doc = parse_html("just text");
        let t = doc.first_child(doc.root()).unwrap();
        assert_eq!(doc.node_text(t), Some("just text"));
    }

    #[test]
    fn test_leading_bom_char_stripped() {
        let doc = parse_html("\u{FEFF}<p>x</p>");
        assert_eq!(doc.node_name(doc.first_child(doc.root()).unwrap()), "p");
    }

    // --- Void elements ---

    #[test]
    fn test_void_elements() {
        let doc = parse_html("<p>line1<br>line2</p>");
        let p = doc.first_child(doc.root()).unwrap();
        let children = doc.children(p);
        assert_eq!(children.len(), 3);
        assert_eq!(doc.node_name(children[1]), "br");
        assert!(doc.first_child(children[1]).is_none());
    }

    #[test]
    fn test_void_element_with_end_tag() {
        let doc = parse_html("<p>text<br></br>more</p>");
        let p = doc.first_child(doc.root()).unwrap();
        // The </br> is ignored and the text around it is one node.
        let children = doc.children(p);
        assert_eq!(children.len(), 3);
        assert_eq!(doc.diagnostics.len(), 1);
        assert!(doc.diagnostics[0].message.contains("void element"));
    }

    #[test]
    fn test_img_void_element() {
        let doc = parse_html("<img src=\"test.jpg\" alt=\"test\">after");
        let img = doc.first_child(doc.root()).unwrap();
        assert_eq!(doc.node_name(img), "img");
        assert_eq!(doc.attribute(img, "src"), Some("test.jpg"));
        assert_eq!(doc.attribute(img, "alt"), Some("test"));
        assert_eq!(doc.child_count(doc.root()), 2);
    }

    #[test]
    fn test_self_closing_syntax() {
        let doc = parse_html("<div/><span>x</span>");
        let root = doc.root();
        assert_eq!(element_names(&doc, doc.children(root)), vec!["div", "span"]);
    }

    // --- Case ---

    #[test]
    fn test_case_insensitive_tags() {
        let doc = parse_html("<DIV><P>Hello</P></DIV>");
        let div = doc.first_child(doc.root()).unwrap();
        assert_eq!(doc.node_name(div), "div");
        let p = doc.first_child(div).unwrap();
        assert_eq!(doc.node_name(p), "p");
        assert_eq!(doc.text_content(p), "Hello");
        assert!(doc.diagnostics.is_empty());
    }

    #[test]
    fn test_attribute_case_preserved_lookup_insensitive() {
        let doc = parse_html("<div CLASS=main Data-X=1>text</div>");
        let div = doc.first_child(doc.root()).unwrap();
        assert_eq!(doc.attributes(div)[0].name, "CLASS");
        assert_eq!(doc.attribute(div, "class"), Some("main"));
        assert_eq!(doc.attribute(div, "data-x"), Some("1"));
    }

    #[test]
    fn test_boolean_attributes() {
        let doc = parse_html("<input disabled readonly>");
        let input = doc.first_child(doc.root()).unwrap();
        assert_eq!(doc.attribute(input, "disabled"), Some(""));
        assert_eq!(doc.attribute(input, "readonly"), Some(""));
    }

    // --- Auto-closing ---

    #[test]
    fn test_p_auto_closes_p() {
        let doc = parse_html("<p>First<p>Second");
        let root = doc.root();
        let children = doc.children(root);
        assert_eq!(children.len(), 2);
        assert_eq!(doc.text_content(children[0]), "First");
        assert_eq!(doc.text_content(children[1]), "Second");
    }

    #[test]
    fn test_div_closes_p() {
        let doc = parse_html("<p>a<div>b</div>");
        assert_eq!(
            element_names(&doc, doc.children(doc.root())),
            vec!["p", "div"]
        );
    }

    #[test]
    fn test_li_auto_closes_li() {
        let doc = parse_html("<ul><li>A<li>B<li>C</ul>");
        let ul = doc.first_child(doc.root()).unwrap();
        let items = doc.children(ul);
        assert_eq!(items.len(), 3);
        assert_eq!(doc.text_content(items[0]), "A");
        assert_eq!(doc.text_content(items[1]), "B");
        assert_eq!(doc.text_content(items[2]), "C");
    }

    #[test]
    fn test_dd_dt_auto_close() {
        let doc = parse_html("<dl><dt>Term<dd>Def<dt>Term2<dd>Def2</dl>");
        let dl = doc.first_child(doc.root()).unwrap();
        assert_eq!(
            element_names(&doc, doc.children(dl)),
            vec!["dt", "dd", "dt", "dd"]
        );
    }

    #[test]
    fn test_table_rows_auto_close() {
        let doc = parse_html("<table><tr><td>a<tr><td>b</table>");
        let table = doc.first_child(doc.root()).unwrap();
        let rows = doc.children(table);
        assert_eq!(element_names(&doc, rows), vec!["tr", "tr"]);
        for (&row, expected) in rows.iter().zip(["a", "b"]) {
            assert_eq!(element_names(&doc, doc.children(row)), vec!["td"]);
            assert_eq!(doc.text_content(row), expected);
        }
    }

    #[test]
    fn test_table_section_closes_rows() {
        let doc = parse_html("<table><thead><tr><th>h<tbody><tr><td>d</table>");
        let table = doc.first_child(doc.root()).unwrap();
        assert_eq!(
            element_names(&doc, doc.children(table)),
            vec!["thead", "tbody"]
        );
    }

    #[test]
    fn test_option_auto_close() {
        let doc = parse_html("<select><option>a<option>b<optgroup><option>c</select>");
        let select = doc.first_child(doc.root()).unwrap();
        assert_eq!(
            element_names(&doc, doc.children(select)),
            vec!["option", "option", "optgroup"]
        );
    }

    #[test]
    fn test_new_row_closes_through_inline_wrapper() {
        let doc = parse_html("<table><tr><td><font>a<tr><td>b</table>");
        let table = doc.first_child(doc.root()).unwrap();
        let rows = doc.children(table);
        assert_eq!(element_names(&doc, rows), vec!["tr", "tr"]);
        assert_eq!(doc.text_content(rows[0]), "a");
        assert_eq!(doc.text_content(rows[1]), "b");
        assert!(doc.diagnostics[0].message.contains("implicitly closing <font> before <tr>"));
    }

    #[test]
    fn test_new_item_closes_through_link() {
        let doc = parse_html("<ul><li><a href=x>one<li>two</ul>");
        let ul = doc.first_child(doc.root()).unwrap();
        assert_eq!(element_names(&doc, doc.children(ul)), vec!["li", "li"]);
        assert_eq!(doc.text_content(doc.children(ul)[1]), "two");
    }

    #[test]
    fn test_p_closes_through_span() {
        let doc = parse_html("<p><span>a<p>b");
        let root = doc.root();
        assert_eq!(element_names(&doc, doc.children(root)), vec!["p", "p"]);
    }

    #[test]
    fn test_auto_close_stops_at_scope_boundary() {
        // The inner list is a boundary for <li>.
        let doc = parse_html("<ul><li>a<ol><li>b<li>c</ol></ul>");
        let ul = doc.first_child(doc.root()).unwrap();
        assert_eq!(doc.child_count(ul), 1);
        let ol = doc.last_child(doc.first_child(ul).unwrap()).unwrap();
        assert_eq!(element_names(&doc, doc.children(ol)), vec!["li", "li"]);

        // A button is a boundary for <p>.
        let doc = parse_html("<p>x<button><p>y</button>z");
        let p = doc.first_child(doc.root()).unwrap();
        assert_eq!(element_names(&doc, doc.children(p)), vec!["#text", "button", "#text"]);
    }

    #[test]
    fn test_auto_closes_table() {
        assert!(auto_closes("p", "div"));
        assert!(auto_closes("td", "tr"));
        assert!(auto_closes("head", "body"));
        assert!(!auto_closes("div", "p"));
        assert!(!auto_closes("p", "span"));
    }

    // --- End tags ---

    #[test]
    fn test_missing_closing_tags() {
        let doc = parse_html("<div><span>text");
        let div = doc.first_child(doc.root()).unwrap();
        let span = doc.first_child(div).unwrap();
        assert_eq!(doc.text_content(span), "text");
        let unclosed: Vec<_> = doc
            .diagnostics
            .iter()
            .filter(|d| d.message.contains("unclosed element"))
            .collect();
        assert_eq!(unclosed.len(), 2);
        assert!(unclosed.iter().all(|d| d.severity == ErrorSeverity::Warning));
    }

    #[test]
    fn test_end_tag_closes_intervening() {
        let doc = parse_html("<div><b><i>x</div>after");
        let root = doc.root();
        assert_eq!(element_names(&doc, doc.children(root)), vec!["div", "#text"]);
        assert_eq!(
            doc.diagnostics
                .iter()
                .filter(|d| d.message.starts_with("implicitly closing"))
                .count(),
            2
        );
    }

    #[test]
    fn test_stray_end_tag() {
        let doc = parse_html("<div>a</span>b</div>");
        let div = doc.first_child(doc.root()).unwrap();
        // The stray tag is dropped and the text around it coalesces.
        assert_eq!(doc.child_count(div), 1);
        assert_eq!(doc.text_content(div), "ab");
        assert!(doc.diagnostics[0].message.contains("stray end tag </span>"));
        assert_eq!(doc.diagnostics[0].severity, ErrorSeverity::Error);
    }

    #[test]
    fn test_no_warnings_option_keeps_errors() {
        let opts = HtmlParseOptions::default().no_warnings(true);
        let doc = parse_html_with_options("<div><b>a</span>", &opts);
        let messages: Vec<_> = doc.diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["stray end tag </span>"]);
        assert_eq!(doc.diagnostics[0].severity, ErrorSeverity::Error);
    }

    // --- Text ---

    #[test]
    fn test_html_entities() {
        let doc = parse_html("<p>&copy; 2024 &mdash; All rights reserved</p>");
        let p = doc.first_child(doc.root()).unwrap();
        assert_eq!(doc.text_content(p), "\u{A9} 2024 \u{2014} All rights reserved");
    }

    #[test]
    fn test_bare_ampersand() {
        let doc = parse_html("<p>A & B</p>");
        let p = doc.first_child(doc.root()).unwrap();
        assert_eq!(doc.text_content(p), "A & B");
    }

    #[test]
    fn test_entity_in_attribute() {
        let doc = parse_html("<a href=\"?a=1&amp;b=2\" title='&lt;x&gt;'>x</a>");
        let a = doc.first_child(doc.root()).unwrap();
        assert_eq!(doc.attribute(a, "href"), Some("?a=1&b=2"));
        assert_eq!(doc.attribute(a, "title"), Some("<x>"));
    }

    #[test]
    fn test_no_blanks_option() {
        let opts = HtmlParseOptions::default().no_blanks(true);
        let doc = parse_html_with_options("<div>\n  <p>Hi</p>\n  \n</div>", &opts);
        let div = doc.first_child(doc.root()).unwrap();
        assert_eq!(element_names(&doc, doc.children(div)), vec!["p"]);
    }

    #[test]
    fn test_whitespace_kept_by_default() {
        let doc = parse_html("<div>\n  <p>Hi</p>\n</div>");
        let div = doc.first_child(doc.root()).unwrap();
        assert_eq!(doc.child_count(div), 3);
    }

    // --- Comments, doctype, raw text ---

    #[test]
    fn test_html_comment() {
        let doc = parse_html("<div><!-- note --></div>");
        let div = doc.first_child(doc.root()).unwrap();
        let c = doc.first_child(div).unwrap();
        assert_eq!(
            doc.node_kind(c),
            &NodeKind::Comment {
                content: " note ".to_string()
            }
        );
    }

    #[test]
    fn test_html_doctype() {
        let doc = parse_html("<!DOCTYPE html>\n<html></html>");
        let dt = doc.first_child(doc.root()).unwrap();
        assert_eq!(doc.node_name(dt), "#doctype");
        assert_eq!(doc.node_text(dt), Some("DOCTYPE html"));
        assert_eq!(doc.node_name(doc.root_element().unwrap()), "html");
    }

    #[test]
    fn test_processing_instruction_becomes_comment() {
        let doc = parse_html("<?php echo 1; ?><p>x</p>");
        let c = doc.first_child(doc.root()).unwrap();
        assert_eq!(doc.node_name(c), "#comment");
        assert_eq!(doc.node_text(c), Some("?php echo 1; ?"));
    }

    #[test]
    fn test_script_raw_text() {
        let doc = parse_html("<script>if (a < b) { document.write('<p>'); }</script><p>x</p>");
        let root = doc.root();
        let script = doc.first_child(root).unwrap();
        assert_eq!(doc.child_count(script), 1);
        assert_eq!(
            doc.text_content(script),
            "if (a < b) { document.write('<p>'); }"
        );
        assert_eq!(element_names(&doc, doc.children(root)), vec!["script", "p"]);
    }

    #[test]
    fn test_style_raw_text_keeps_entities() {
        let doc = parse_html("<style>a::after { content: '&amp;' }</style>");
        let style = doc.first_child(doc.root()).unwrap();
        assert_eq!(doc.text_content(style), "a::after { content: '&amp;' }");
    }

    #[test]
    fn test_unterminated_tag_at_eof_is_text() {
        let doc = parse_html("<p>a<b class=");
        let p = doc.first_child(doc.root()).unwrap();
        assert_eq!(doc.child_count(p), 1);
        assert_eq!(doc.text_content(p), "a<b class=");
    }

    // --- Depth limit ---

    #[test]
    fn test_unterminated_markup_parses_in_linear_time() {
        let input = "<a ".repeat(10_000);
        let doc = parse_html(&input);
        assert_eq!(doc.child_count(doc.root()), 1);
        assert_eq!(doc.text_content(doc.root()), input);
        assert_eq!(doc.diagnostics.len(), 1);
    }

    #[test]
    fn test_max_depth() {
        let opts = HtmlParseOptions::default().max_depth(2);
        let doc = parse_html_with_options("<div><div><div><span>x</span></div></div></div>", &opts);
        let d1 = doc.first_child(doc.root()).unwrap();
        let d2 = doc.first_child(d1).unwrap();
        // The third div is created but not nested into; its content
        // lands beside it.
        assert_eq!(
            element_names(&doc, doc.children(d2)),
            vec!["div", "span", "#text"]
        );
        assert!(doc
            .diagnostics
            .iter()
            .any(|d| d.message.contains("maximum nesting depth")));
    }

    #[test]
    fn test_deep_nesting_does_not_overflow() {
        let input = "<div>".repeat(10_000);
        let doc = parse_html(&input);
        assert_eq!(doc.descendants(doc.root()).count(), 10_000);
    }

    #[test]
    fn test_complex_html_document() {
        let input = "<!DOCTYPE html>\n<html>\n<head><title>Test</title>\n\
            <meta charset=utf-8></head>\n<body>\n<h1>Header</h1>\n\
            <p>Para with <a href=\"x\">link</a> &amp; more.\n<ul><li>one</li><li>two</li></ul>\n\
            </body>\n</html>";
        let doc = parse_html(input);
        let html = doc.root_element().unwrap();
        assert_eq!(doc.node_name(html), "html");
        let names: Vec<_> = doc
            .descendants(html)
            .filter(|&id| doc.is_element(id))
            .map(|id| doc.node_name(id))
            .collect();
        assert_eq!(
            names,
            vec!["head", "title", "meta", "body", "h1", "p", "a", "ul", "li", "li"]
        );
        assert!(doc.diagnostics.is_empty());
    }
}
