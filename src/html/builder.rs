//! Tree construction from the token stream.

use crate::error::ErrorSeverity;
use crate::tree::{Document, NodeId, NodeKind};

use super::tokenizer::{Token, Tokenizer};
use super::{auto_close_rule, is_void_element, HtmlParseOptions};

/// Builds a `Document` from tokens, keeping a stack of open elements.
///
/// Implicit closing follows the static auto-close table; end tags close
/// the nearest open element of the same name and everything above it.
pub(crate) struct TreeBuilder<'a> {
    tokens: Tokenizer<'a>,
    doc: Document,
    options: HtmlParseOptions,
    /// Stack of open element node IDs and their lowercase tag names.
    open_elements: Vec<(NodeId, String)>,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(input: &'a str, options: &HtmlParseOptions) -> Self {
        Self {
            tokens: Tokenizer::new(input),
            doc: Document::new(),
            options: options.clone(),
            open_elements: Vec::new(),
        }
    }

    /// Consumes the whole input and returns the finished document.
    pub fn build(mut self) -> Document {
        while let Some(token) = self.tokens.next() {
            self.process(token);
        }

        while let Some((_, tag)) = self.open_elements.pop() {
            self.tokens
                .warn(format!("unclosed element <{tag}> at end of document"));
        }

        let mut diagnostics = self.tokens.take_diagnostics();
        if self.options.no_warnings {
            diagnostics.retain(|d| d.severity != ErrorSeverity::Warning);
        }
        self.doc.diagnostics = diagnostics;
        self.doc
    }

    fn process(&mut self, token: Token) {
        match token {
            Token::StartTag {
                name,
                attributes,
                self_closing,
            } => self.start_tag(name, attributes, self_closing),
            Token::EndTag { name } => self.end_tag(&name),
            Token::Text(text) => self.text(text),
            Token::Comment(content) => {
                let parent = self.current_parent();
                self.doc
                    .append_new_node(parent, NodeKind::Comment { content });
            }
            Token::Doctype(content) => {
                let parent = self.current_parent();
                self.doc
                    .append_new_node(parent, NodeKind::Doctype { content });
            }
        }
    }

    /// Returns the current insertion point (the innermost open element, or
    /// the document node).
    fn current_parent(&self) -> NodeId {
        self.open_elements
            .last()
            .map_or_else(|| self.doc.root(), |&(id, _)| id)
    }

    fn start_tag(&mut self, name: String, attributes: Vec<crate::tree::Attribute>, self_closing: bool) {
        self.handle_auto_close(&name);

        let parent = self.current_parent();
        let elem = self.doc.append_new_node(
            parent,
            NodeKind::Element {
                name: name.clone(),
                attributes,
            },
        );

        if is_void_element(&name) || self_closing {
            return;
        }
        if self.open_elements.len() >= self.options.max_depth {
            self.tokens.warn(format!(
                "maximum nesting depth ({}) exceeded; content of <{name}> kept at the current level",
                self.options.max_depth
            ));
            return;
        }
        self.open_elements.push((elem, name));
    }

    /// Pops open elements that the new tag implicitly closes.
    ///
    /// Searches down from the top of the stack until a scope boundary and
    /// closes the outermost closable element found, along with any inline
    /// wrappers still open above it.
    fn handle_auto_close(&mut self, new_tag: &str) {
        let Some((closes, scope)) = auto_close_rule(new_tag) else {
            return;
        };
        let mut target = None;
        for (idx, (_, open)) in self.open_elements.iter().enumerate().rev() {
            if closes.contains(&open.as_str()) {
                target = Some(idx);
            } else if scope.contains(&open.as_str()) {
                break;
            }
        }
        let Some(idx) = target else {
            return;
        };

        for (_, closed) in self.open_elements.drain(idx..).rev() {
            log::trace!(target: "htmlarbor::builder", "<{new_tag}> implicitly closes <{closed}>");
            if !closes.contains(&closed.as_str()) {
                self.tokens
                    .warn(format!("implicitly closing <{closed}> before <{new_tag}>"));
            }
        }
    }

    fn end_tag(&mut self, name: &str) {
        if is_void_element(name) {
            self.tokens
                .error(format!("end tag for void element </{name}> ignored"));
            return;
        }

        let Some(idx) = self.open_elements.iter().rposition(|(_, open)| open == name) else {
            self.tokens.error(format!("stray end tag </{name}>"));
            return;
        };

        for (_, closed) in self.open_elements.drain(idx + 1..).rev() {
            log::trace!(target: "htmlarbor::builder", "</{name}> implicitly closes <{closed}>");
            self.tokens
                .warn(format!("implicitly closing <{closed}> before </{name}>"));
        }
        self.open_elements.truncate(idx);
    }

    fn text(&mut self, text: String) {
        if self.options.no_blanks && text.bytes().all(crate::parser::input::is_html_whitespace) {
            return;
        }
        let parent = self.current_parent();
        if let Some(last) = self.doc.last_child(parent) {
            if let NodeKind::Text { content } = &mut self.doc.node_mut(last).kind {
                content.push_str(&text);
                return;
            }
        }
        self.doc
            .append_new_node(parent, NodeKind::Text { content: text });
    }
}
