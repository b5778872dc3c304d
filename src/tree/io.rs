//! Loading documents from bytes, readers and files, and saving them back.
//!
//! Loading runs encoding detection, decodes, and parses. Saving serializes
//! and encodes into the document's own encoding or a caller-chosen one.

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use crate::encoding::{self, Charset, EncodingOptions};
use crate::error::LoadError;
use crate::html::{parse_html_with_options, HtmlParseOptions};
use crate::serial::html::serialize_html;

use super::Document;

/// Options for loading a document from bytes.
///
/// ```
/// use htmlarbor::{Charset, LoadOptions};
///
/// let opts = LoadOptions::default()
///     .encoding_override(Some(Charset::windows_1252()))
///     .strict_decoding(true);
/// assert!(opts.strict_decoding);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// How to detect the encoding when there is no override.
    pub encoding: EncodingOptions,
    /// How to build the tree.
    pub parse: HtmlParseOptions,
    /// Decode with this charset instead of detecting one.
    pub encoding_override: Option<Charset>,
    /// If true, malformed byte sequences fail the load instead of being
    /// replaced with U+FFFD.
    pub strict_decoding: bool,
}

impl LoadOptions {
    /// Sets the encoding detection options.
    #[must_use]
    pub fn encoding(mut self, options: EncodingOptions) -> Self {
        self.encoding = options;
        self
    }

    /// Sets the parser options.
    #[must_use]
    pub fn parse(mut self, options: HtmlParseOptions) -> Self {
        self.parse = options;
        self
    }

    /// Forces a charset, bypassing detection.
    #[must_use]
    pub fn encoding_override(mut self, charset: Option<Charset>) -> Self {
        self.encoding_override = charset;
        self
    }

    /// Enables or disables strict decoding.
    #[must_use]
    pub fn strict_decoding(mut self, yes: bool) -> Self {
        self.strict_decoding = yes;
        self
    }
}

impl Document {
    /// Parses already-decoded HTML text with default options.
    ///
    /// The resulting document's encoding is UTF-8.
    ///
    /// # Examples
    ///
    /// ```
    /// use htmlarbor::Document;
    ///
    /// let doc = Document::parse_str("<p>Hello</p>");
    /// let p = doc.root_element().unwrap();
    /// assert_eq!(doc.node_name(p), "p");
    /// ```
    #[must_use]
    pub fn parse_str(input: &str) -> Self {
        parse_html_with_options(input, &HtmlParseOptions::default())
    }

    /// Loads a document from raw bytes.
    ///
    /// Sets [`encoding`](Document::encoding) to the charset the bytes were
    /// decoded with and [`had_bom`](Document::had_bom) if a Byte Order Mark
    /// was skipped.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Decode`] only when
    /// [`strict_decoding`](LoadOptions::strict_decoding) is set and the bytes
    /// are malformed for the chosen charset.
    ///
    /// # Examples
    ///
    /// ```
    /// use htmlarbor::{Document, LoadOptions};
    ///
    /// let doc = Document::load_bytes(b"\xEF\xBB\xBF<p>caf\xC3\xA9</p>", &LoadOptions::default()).unwrap();
    /// assert!(doc.had_bom);
    /// assert_eq!(doc.text_content(doc.root()), "caf\u{e9}");
    /// ```
    pub fn load_bytes(bytes: &[u8], options: &LoadOptions) -> Result<Self, LoadError> {
        let decoded = encoding::decode_bytes(
            bytes,
            options.encoding_override,
            &options.encoding,
            options.strict_decoding,
        )
        .map_err(|e| {
            log::warn!("{e}");
            LoadError::Decode(e)
        })?;

        let mut doc = parse_html_with_options(&decoded.text, &options.parse);
        doc.encoding = decoded.detection.charset;
        doc.had_bom = decoded.detection.bom_length > 0;
        log::debug!(
            "loaded {} bytes as {} ({:?}): {} nodes, {} diagnostics",
            bytes.len(),
            doc.encoding,
            decoded.detection.source,
            doc.node_count(),
            doc.diagnostics.len()
        );
        Ok(doc)
    }

    /// Loads a document from a reader, consuming it to the end.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Io`] if reading fails, or [`LoadError::Decode`]
    /// as for [`load_bytes`](Document::load_bytes).
    pub fn load_from_reader<R: Read>(mut reader: R, options: &LoadOptions) -> Result<Self, LoadError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::load_bytes(&bytes, options)
    }

    /// Loads the HTML file at `path` with default options.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Io`] if the file cannot be read.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        Self::load_with_options(path, &LoadOptions::default())
    }

    /// Loads the HTML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Io`] if the file cannot be read, or
    /// [`LoadError::Decode`] in strict mode.
    pub fn load_with_options(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Self, LoadError> {
        let path = path.as_ref();
        log::debug!("loading {}", path.display());
        let bytes = std::fs::read(path)?;
        Self::load_bytes(&bytes, options)
    }

    /// Detects the encoding of the file at `path` without parsing it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read.
    pub fn detect_encoding(path: impl AsRef<Path>) -> io::Result<Charset> {
        encoding::detect_file_encoding(path, &EncodingOptions::default())
    }

    /// Serializes the document and encodes it in `charset`.
    ///
    /// Characters `charset` cannot represent are written as numeric
    /// character references. UTF-16 and UTF-32 output starts with a BOM;
    /// UTF-8 output does when the document was loaded from bytes with one.
    ///
    /// # Examples
    ///
    /// ```
    /// use htmlarbor::{Charset, Document};
    ///
    /// let doc = Document::parse_str("<p>\u{2603}</p>");
    /// let bytes = doc.to_bytes(Charset::windows_1252());
    /// assert_eq!(bytes, b"<p>&#9731;</p>");
    /// ```
    #[must_use]
    pub fn to_bytes(&self, charset: Charset) -> Vec<u8> {
        let text = serialize_html(self);
        let body = charset.encode(&text);
        let bom: &[u8] = if charset == Charset::utf8() && !self.had_bom {
            &[]
        } else {
            charset.bom()
        };
        let mut bytes = Vec::with_capacity(bom.len() + body.len());
        bytes.extend_from_slice(bom);
        bytes.extend_from_slice(&body);
        bytes
    }

    /// Serializes the document into `writer`, encoded in `charset`.
    ///
    /// # Errors
    ///
    /// Returns any error from the writer.
    pub fn write_to<W: Write>(&self, mut writer: W, charset: Charset) -> io::Result<()> {
        writer.write_all(&self.to_bytes(charset))?;
        writer.flush()
    }

    /// Saves the document to `path` in its own encoding.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn save(&self, path: impl AsRef<Path>) -> io::Result<()> {
        self.save_as(path, self.encoding)
    }

    /// Saves the document to `path`, encoded in `charset`.
    ///
    /// `<meta>` charset declarations in the tree are written as they are;
    /// they are not rewritten to match `charset`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn save_as(&self, path: impl AsRef<Path>, charset: Charset) -> io::Result<()> {
        let path = path.as_ref();
        let file = File::create(path)?;
        self.write_to(BufWriter::new(file), charset)?;
        log::debug!(
            "saved {} as {charset}: {} nodes",
            path.display(),
            self.node_count()
        );
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_load_bytes_default_is_utf8() {
        let doc = Document::load_bytes(b"<p>hi</p>", &LoadOptions::default()).unwrap();
        assert_eq!(doc.encoding, Charset::utf8());
        assert!(!doc.had_bom);
    }

    #[test]
    fn test_load_bytes_meta_declared() {
        let bytes = b"<meta charset=windows-1251><p>\xCF\xF0\xE8\xE2\xE5\xF2</p>";
        let doc = Document::load_bytes(bytes, &LoadOptions::default()).unwrap();
        assert_eq!(doc.encoding.code_page(), Some(1251));
        assert_eq!(doc.text_content(doc.root()), "Привет");
        assert!(!doc.had_bom);
    }

    #[test]
    fn test_load_bytes_utf16_bom() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "<b>x</b>".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let doc = Document::load_bytes(&bytes, &LoadOptions::default()).unwrap();
        assert_eq!(doc.encoding, Charset::utf16le());
        assert!(doc.had_bom);
        let b = doc.root_element().unwrap();
        assert_eq!(doc.node_name(b), "b");
    }

    #[test]
    fn test_override_beats_meta() {
        let bytes = b"<meta charset=windows-1251><p>\xE9</p>";
        let opts = LoadOptions::default().encoding_override(Some(Charset::windows_1252()));
        let doc = Document::load_bytes(bytes, &opts).unwrap();
        assert_eq!(doc.encoding, Charset::windows_1252());
        assert_eq!(doc.text_content(doc.root()), "\u{e9}");
        assert_eq!(doc.declared_encoding().unwrap().code_page(), Some(1251));
    }

    #[test]
    fn test_strict_decoding() {
        let bytes = b"<p>\xFF\xFE\xFD broken</p>";
        let lenient = Document::load_bytes(bytes, &LoadOptions::default()).unwrap();
        assert!(lenient.text_content(lenient.root()).contains('\u{FFFD}'));

        let strict = LoadOptions::default().strict_decoding(true);
        let err = Document::load_bytes(bytes, &strict).unwrap_err();
        assert!(matches!(err, LoadError::Decode(_)));
    }

    #[test]
    fn test_to_bytes_bom_rules() {
        let mut doc = Document::parse_str("<p>a</p>");
        assert_eq!(doc.to_bytes(Charset::utf8()), b"<p>a</p>");
        assert!(doc.to_bytes(Charset::utf16be()).starts_with(&[0xFE, 0xFF]));
        assert!(doc
            .to_bytes(Charset::utf32le())
            .starts_with(&[0xFF, 0xFE, 0x00, 0x00]));
        doc.had_bom = true;
        assert_eq!(doc.to_bytes(Charset::utf8()), b"\xEF\xBB\xBF<p>a</p>");
        assert_eq!(doc.to_bytes(Charset::windows_1252()), b"<p>a</p>");
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.html");
        let bytes = b"<meta charset=windows-1251><p>\xCF\xF0\xE8\xE2\xE5\xF2</p>";
        let doc = Document::load_bytes(bytes, &LoadOptions::default()).unwrap();
        doc.save(&path).unwrap();

        assert_eq!(
            std::fs::read(&path).unwrap(),
            b"<meta charset=\"windows-1251\"><p>\xCF\xF0\xE8\xE2\xE5\xF2</p>"
        );
        assert_eq!(Document::detect_encoding(&path).unwrap().code_page(), Some(1251));
        let reloaded = Document::load(&path).unwrap();
        assert_eq!(reloaded.text_content(reloaded.root()), "Привет");
    }

    #[test]
    fn test_load_from_reader() {
        let cursor = io::Cursor::new(b"<div>x</div>".to_vec());
        let doc = Document::load_from_reader(cursor, &LoadOptions::default()).unwrap();
        assert_eq!(doc.text_content(doc.root()), "x");
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Document::load(dir.path().join("missing.html")).unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }

    #[test]
    fn test_write_to() {
        let doc = Document::parse_str("<p>\u{e9}</p>");
        let mut out = Vec::new();
        doc.write_to(&mut out, Charset::windows_1252()).unwrap();
        assert_eq!(out, b"<p>\xE9</p>");
    }
}
