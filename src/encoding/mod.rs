//! Encoding detection and transcoding.
//!
//! Works out which character encoding a raw HTML byte stream is written in,
//! and bridges to `encoding_rs` for the actual conversion.
//!
//! # Detection Strategy
//!
//! 1. A caller-supplied override wins outright.
//! 2. A Byte Order Mark at the start of the input (UTF-8, UTF-16 and UTF-32
//!    in either byte order) is unambiguous and wins next.
//! 3. Otherwise a bounded prefix of the input is read as ASCII and scanned
//!    for `<meta charset=...>` or
//!    `<meta http-equiv="Content-Type" content="...; charset=...">`.
//! 4. Otherwise the configured default is used.
//!
//! Detection never fails: an unknown declared label falls back to the
//! default. Only I/O on readers and paths can produce an error.

use std::borrow::Cow;
use std::fmt;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use encoding_rs::Encoding;

use crate::html::tokenizer::{Token, Tokenizer};

/// Default number of bytes inspected for a `<meta>` charset declaration.
pub const DEFAULT_PRESCAN_LIMIT: usize = 1024;

/// An error that occurs during transcoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingError {
    /// A human-readable description of the encoding error.
    pub message: String,
}

impl EncodingError {
    /// Creates a new `EncodingError` with the given message.
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for EncodingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "encoding error: {}", self.message)
    }
}

impl std::error::Error for EncodingError {}

#[derive(Clone, Copy)]
enum Repr {
    Web(&'static Encoding),
    Utf32Le,
    Utf32Be,
}

/// A concrete character encoding.
///
/// Wraps an `encoding_rs` encoding, plus the two UTF-32 byte orders that the
/// web encoding standard (and therefore `encoding_rs`) leaves out.
#[derive(Clone, Copy)]
pub struct Charset(Repr);

/// Windows code page numbers, keyed by encoding name.
const CODE_PAGES: &[(&str, u32)] = &[
    ("UTF-8", 65001),
    ("UTF-16LE", 1200),
    ("UTF-16BE", 1201),
    ("UTF-32LE", 12000),
    ("UTF-32BE", 12001),
    ("windows-874", 874),
    ("windows-1250", 1250),
    ("windows-1251", 1251),
    ("windows-1252", 1252),
    ("windows-1253", 1253),
    ("windows-1254", 1254),
    ("windows-1255", 1255),
    ("windows-1256", 1256),
    ("windows-1257", 1257),
    ("windows-1258", 1258),
    ("ISO-8859-2", 28592),
    ("ISO-8859-3", 28593),
    ("ISO-8859-4", 28594),
    ("ISO-8859-5", 28595),
    ("ISO-8859-6", 28596),
    ("ISO-8859-7", 28597),
    ("ISO-8859-8", 28598),
    ("ISO-8859-8-I", 38598),
    ("ISO-8859-13", 28603),
    ("ISO-8859-15", 28605),
    ("IBM866", 866),
    ("KOI8-R", 20866),
    ("KOI8-U", 21866),
    ("macintosh", 10000),
    ("x-mac-cyrillic", 10007),
    ("Shift_JIS", 932),
    ("EUC-JP", 51932),
    ("ISO-2022-JP", 50220),
    ("EUC-KR", 51949),
    ("Big5", 950),
    ("GBK", 936),
    ("gb18030", 54936),
];

impl Charset {
    /// UTF-8.
    #[must_use]
    pub fn utf8() -> Self {
        Self(Repr::Web(encoding_rs::UTF_8))
    }

    /// UTF-16, little endian.
    #[must_use]
    pub fn utf16le() -> Self {
        Self(Repr::Web(encoding_rs::UTF_16LE))
    }

    /// UTF-16, big endian.
    #[must_use]
    pub fn utf16be() -> Self {
        Self(Repr::Web(encoding_rs::UTF_16BE))
    }

    /// UTF-32, little endian.
    #[must_use]
    pub fn utf32le() -> Self {
        Self(Repr::Utf32Le)
    }

    /// UTF-32, big endian.
    #[must_use]
    pub fn utf32be() -> Self {
        Self(Repr::Utf32Be)
    }

    /// windows-1252, which is also what `ISO-8859-1` and `latin1` resolve to.
    #[must_use]
    pub fn windows_1252() -> Self {
        Self(Repr::Web(encoding_rs::WINDOWS_1252))
    }

    /// Wraps an `encoding_rs` encoding.
    #[must_use]
    pub fn from_encoding(encoding: &'static Encoding) -> Self {
        Self(Repr::Web(encoding))
    }

    /// Resolves a charset label such as `"utf-8"`, `"Windows-1251"`,
    /// `"latin1"` or `"utf-32be"`.
    ///
    /// Labels are matched case-insensitively after trimming. Returns `None`
    /// for unknown labels and for labels that map to the web standard's
    /// `replacement` encoding, which cannot decode anything useful.
    ///
    /// # Examples
    ///
    /// ```
    /// use htmlarbor::encoding::Charset;
    ///
    /// let cs = Charset::from_label("Windows-1251").unwrap();
    /// assert_eq!(cs.code_page(), Some(1251));
    /// assert!(Charset::from_label("no-such-charset").is_none());
    /// ```
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let trimmed = label.trim();
        let lower = trimmed.to_ascii_lowercase();
        match lower.as_str() {
            "utf-32" | "utf32" | "utf-32le" | "ucs-4" | "ucs-4le" => {
                return Some(Self::utf32le());
            }
            "utf-32be" | "ucs-4be" => return Some(Self::utf32be()),
            _ => {}
        }
        let encoding = Encoding::for_label(trimmed.as_bytes())?;
        if encoding == encoding_rs::REPLACEMENT {
            return None;
        }
        Some(Self(Repr::Web(encoding)))
    }

    /// Resolves a Windows code page number (65001, 1251, 1200, ...).
    #[must_use]
    pub fn from_code_page(code_page: u32) -> Option<Self> {
        let (name, _) = CODE_PAGES.iter().find(|&&(_, cp)| cp == code_page)?;
        Self::from_label(name)
    }

    /// Returns the canonical name of this encoding (e.g. `"UTF-8"`).
    #[must_use]
    pub fn name(self) -> &'static str {
        match self.0 {
            Repr::Web(e) => e.name(),
            Repr::Utf32Le => "UTF-32LE",
            Repr::Utf32Be => "UTF-32BE",
        }
    }

    /// Returns the Windows code page number for this encoding, if it has one.
    #[must_use]
    pub fn code_page(self) -> Option<u32> {
        let name = self.name();
        CODE_PAGES
            .iter()
            .find(|&&(n, _)| n == name)
            .map(|&(_, cp)| cp)
    }

    /// Returns the underlying `encoding_rs` encoding, or `None` for UTF-32.
    #[must_use]
    pub fn as_encoding(self) -> Option<&'static Encoding> {
        match self.0 {
            Repr::Web(e) => Some(e),
            Repr::Utf32Le | Repr::Utf32Be => None,
        }
    }

    /// Returns `true` for the UTF-8, UTF-16 and UTF-32 family.
    #[must_use]
    pub fn is_unicode(self) -> bool {
        !self.bom().is_empty()
    }

    /// Returns `true` if ASCII bytes mean ASCII characters in this encoding,
    /// which is what makes a `<meta>` prescan meaningful.
    #[must_use]
    pub fn is_ascii_compatible(self) -> bool {
        match self.0 {
            Repr::Web(e) => e.is_ascii_compatible(),
            Repr::Utf32Le | Repr::Utf32Be => false,
        }
    }

    /// Returns the Byte Order Mark for Unicode encodings, or an empty slice.
    #[must_use]
    pub fn bom(self) -> &'static [u8] {
        match self.0 {
            Repr::Utf32Le => &[0xFF, 0xFE, 0x00, 0x00],
            Repr::Utf32Be => &[0x00, 0x00, 0xFE, 0xFF],
            Repr::Web(e) if e == encoding_rs::UTF_8 => &[0xEF, 0xBB, 0xBF],
            Repr::Web(e) if e == encoding_rs::UTF_16LE => &[0xFF, 0xFE],
            Repr::Web(e) if e == encoding_rs::UTF_16BE => &[0xFE, 0xFF],
            Repr::Web(_) => &[],
        }
    }

    /// Decodes `bytes` (without any BOM) into a string.
    ///
    /// Malformed sequences are replaced with U+FFFD; the returned flag is
    /// `true` if that happened.
    #[must_use]
    pub fn decode(self, bytes: &[u8]) -> (Cow<'_, str>, bool) {
        match self.0 {
            Repr::Web(e) => e.decode_without_bom_handling(bytes),
            Repr::Utf32Le => decode_utf32(bytes, u32::from_le_bytes),
            Repr::Utf32Be => decode_utf32(bytes, u32::from_be_bytes),
        }
    }

    /// Encodes `text` into this encoding (without a BOM).
    ///
    /// Characters the encoding cannot represent are written as HTML numeric
    /// character references (`&#NNNN;`), so no content is lost.
    #[must_use]
    pub fn encode(self, text: &str) -> Cow<'_, [u8]> {
        match self.0 {
            Repr::Web(e) if e == encoding_rs::UTF_16LE => {
                Cow::Owned(text.encode_utf16().flat_map(u16::to_le_bytes).collect())
            }
            Repr::Web(e) if e == encoding_rs::UTF_16BE => {
                Cow::Owned(text.encode_utf16().flat_map(u16::to_be_bytes).collect())
            }
            Repr::Web(e) => e.encode(text).0,
            Repr::Utf32Le => Cow::Owned(
                text.chars()
                    .flat_map(|c| u32::from(c).to_le_bytes())
                    .collect(),
            ),
            Repr::Utf32Be => Cow::Owned(
                text.chars()
                    .flat_map(|c| u32::from(c).to_be_bytes())
                    .collect(),
            ),
        }
    }
}

impl PartialEq for Charset {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl Eq for Charset {}

impl fmt::Debug for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Charset({})", self.name())
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Default for Charset {
    fn default() -> Self {
        Self::utf8()
    }
}

fn decode_utf32(bytes: &[u8], word: fn([u8; 4]) -> u32) -> (Cow<'static, str>, bool) {
    let mut out = String::with_capacity(bytes.len() / 4);
    let mut had_errors = false;
    let mut chunks = bytes.chunks_exact(4);
    for chunk in &mut chunks {
        let value = word([chunk[0], chunk[1], chunk[2], chunk[3]]);
        if let Some(c) = char::from_u32(value) {
            out.push(c);
        } else {
            out.push('\u{FFFD}');
            had_errors = true;
        }
    }
    if !chunks.remainder().is_empty() {
        out.push('\u{FFFD}');
        had_errors = true;
    }
    (Cow::Owned(out), had_errors)
}

/// Options controlling encoding detection.
///
/// ```
/// use htmlarbor::encoding::{Charset, EncodingOptions};
///
/// let opts = EncodingOptions::default()
///     .default_encoding(Charset::windows_1252())
///     .prescan_limit(4096);
/// ```
#[derive(Debug, Clone)]
pub struct EncodingOptions {
    /// Encoding used when neither a BOM nor a `<meta>` declaration is found.
    pub default_encoding: Charset,
    /// If true, look for a `<meta>` charset declaration.
    pub use_meta: bool,
    /// How many leading bytes the `<meta>` prescan may inspect.
    pub prescan_limit: usize,
}

impl Default for EncodingOptions {
    fn default() -> Self {
        Self {
            default_encoding: Charset::utf8(),
            use_meta: true,
            prescan_limit: DEFAULT_PRESCAN_LIMIT,
        }
    }
}

impl EncodingOptions {
    /// Sets the fallback encoding.
    #[must_use]
    pub fn default_encoding(mut self, charset: Charset) -> Self {
        self.default_encoding = charset;
        self
    }

    /// Enables or disables the `<meta>` prescan.
    #[must_use]
    pub fn use_meta(mut self, yes: bool) -> Self {
        self.use_meta = yes;
        self
    }

    /// Sets the number of bytes the `<meta>` prescan may inspect.
    #[must_use]
    pub fn prescan_limit(mut self, limit: usize) -> Self {
        self.prescan_limit = limit;
        self
    }
}

/// Where a detected encoding came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingSource {
    /// Supplied by the caller.
    Override,
    /// A Byte Order Mark at the start of the input.
    Bom,
    /// A `<meta>` declaration in the document prefix.
    Meta,
    /// Nothing was found; the configured default was used.
    Default,
}

/// The outcome of encoding detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingDetection {
    /// The encoding to decode with.
    pub charset: Charset,
    /// Number of BOM bytes to skip before decoding.
    pub bom_length: usize,
    /// How the encoding was determined.
    pub source: EncodingSource,
}

/// Detects a Byte Order Mark.
///
/// Returns the indicated encoding and the number of BOM bytes. UTF-32LE
/// (`FF FE 00 00`) is checked before UTF-16LE (`FF FE`), which is a prefix
/// of it.
///
/// # Examples
///
/// ```
/// use htmlarbor::encoding::{sniff_bom, Charset};
///
/// let (cs, len) = sniff_bom(b"\xEF\xBB\xBFhello").unwrap();
/// assert_eq!(cs, Charset::utf8());
/// assert_eq!(len, 3);
/// assert!(sniff_bom(b"<p>").is_none());
/// ```
#[must_use]
pub fn sniff_bom(bytes: &[u8]) -> Option<(Charset, usize)> {
    let candidates = [
        Charset::utf8(),
        Charset::utf32le(),
        Charset::utf32be(),
        Charset::utf16le(),
        Charset::utf16be(),
    ];
    candidates.into_iter().find_map(|cs| {
        let bom = cs.bom();
        bytes.starts_with(bom).then_some((cs, bom.len()))
    })
}

/// Runs BOM sniffing and the `<meta>` prescan over `bytes`.
#[must_use]
pub fn sniff_encoding(bytes: &[u8], options: &EncodingOptions) -> EncodingDetection {
    if let Some((charset, bom_length)) = sniff_bom(bytes) {
        log::debug!("encoding {charset} detected from byte order mark");
        return EncodingDetection {
            charset,
            bom_length,
            source: EncodingSource::Bom,
        };
    }

    if options.use_meta {
        if let Some(label) = prescan_meta_charset(bytes, options.prescan_limit) {
            match Charset::from_label(&label) {
                Some(declared) => {
                    // The declaration was readable as ASCII, so the bytes
                    // cannot really be UTF-16 or UTF-32.
                    let charset = if declared.is_ascii_compatible() {
                        declared
                    } else {
                        Charset::utf8()
                    };
                    log::debug!("encoding {charset} declared by <meta> ({label:?})");
                    return EncodingDetection {
                        charset,
                        bom_length: 0,
                        source: EncodingSource::Meta,
                    };
                }
                None => {
                    log::warn!(
                        "unsupported charset {label:?} declared by <meta>; using {}",
                        options.default_encoding
                    );
                }
            }
        }
    }

    EncodingDetection {
        charset: options.default_encoding,
        bom_length: 0,
        source: EncodingSource::Default,
    }
}

/// Detects the encoding of an HTML byte stream.
///
/// # Examples
///
/// ```
/// use htmlarbor::encoding::{detect_encoding, EncodingOptions};
///
/// let html = b"<html><head><meta charset=\"windows-1251\"></head></html>";
/// let cs = detect_encoding(html, &EncodingOptions::default());
/// assert_eq!(cs.code_page(), Some(1251));
/// ```
#[must_use]
pub fn detect_encoding(bytes: &[u8], options: &EncodingOptions) -> Charset {
    sniff_encoding(bytes, options).charset
}

/// Detects the encoding of a seekable stream without consuming it.
///
/// Reads at most `prescan_limit` bytes (and never fewer than a BOM's worth),
/// then seeks back to the position the stream had on entry, whether or not
/// the read succeeded.
///
/// # Errors
///
/// Returns any error from reading or seeking the stream.
pub fn detect_reader_encoding<R: Read + Seek>(
    reader: &mut R,
    options: &EncodingOptions,
) -> io::Result<Charset> {
    let start = reader.stream_position()?;
    let mut prefix = Vec::new();
    let limit = options.prescan_limit.max(4) as u64;
    let read = reader.by_ref().take(limit).read_to_end(&mut prefix);
    reader.seek(SeekFrom::Start(start))?;
    read?;
    Ok(detect_encoding(&prefix, options))
}

/// Detects the encoding of the file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub fn detect_file_encoding(path: impl AsRef<Path>, options: &EncodingOptions) -> io::Result<Charset> {
    let mut file = File::open(path)?;
    detect_reader_encoding(&mut file, options)
}

/// Text decoded from an HTML byte stream.
#[derive(Debug, Clone)]
pub struct DecodedText {
    /// The decoded text, without any BOM.
    pub text: String,
    /// How the encoding was chosen.
    pub detection: EncodingDetection,
    /// True if malformed byte sequences were replaced with U+FFFD.
    pub had_errors: bool,
}

/// Decodes raw HTML bytes, detecting the encoding unless one is given.
///
/// With an override, a leading BOM is stripped only when it is the
/// override's own BOM.
///
/// # Errors
///
/// Returns `EncodingError` only when `strict` is set and the bytes contain
/// sequences that are invalid in the chosen encoding. Otherwise those are
/// replaced with U+FFFD.
///
/// # Examples
///
/// ```
/// use htmlarbor::encoding::{decode_bytes, EncodingOptions, EncodingSource};
///
/// let decoded = decode_bytes(b"\xEF\xBB\xBF<p>hi</p>", None, &EncodingOptions::default(), false).unwrap();
/// assert_eq!(decoded.text, "<p>hi</p>");
/// assert_eq!(decoded.detection.source, EncodingSource::Bom);
/// ```
pub fn decode_bytes(
    bytes: &[u8],
    encoding_override: Option<Charset>,
    options: &EncodingOptions,
    strict: bool,
) -> Result<DecodedText, EncodingError> {
    let detection = match encoding_override {
        Some(charset) => {
            let bom = charset.bom();
            let bom_length = if !bom.is_empty() && bytes.starts_with(bom) {
                bom.len()
            } else {
                0
            };
            EncodingDetection {
                charset,
                bom_length,
                source: EncodingSource::Override,
            }
        }
        None => sniff_encoding(bytes, options),
    };

    let (text, had_errors) = detection.charset.decode(&bytes[detection.bom_length..]);
    if had_errors {
        if strict {
            return Err(EncodingError::new(format!(
                "malformed byte sequence for encoding {}",
                detection.charset
            )));
        }
        log::warn!(
            "malformed byte sequences for {} replaced with U+FFFD",
            detection.charset
        );
    }

    Ok(DecodedText {
        text: text.into_owned(),
        detection,
        had_errors,
    })
}

/// Scans the first `limit` bytes for a `<meta>` charset declaration and
/// returns the declared label.
fn prescan_meta_charset(bytes: &[u8], limit: usize) -> Option<String> {
    let prefix = &bytes[..bytes.len().min(limit)];
    let text = String::from_utf8_lossy(prefix);
    Tokenizer::new(&text).find_map(|token| match token {
        Token::StartTag {
            name, attributes, ..
        } if name == "meta" => meta_charset(&attributes),
        _ => None,
    })
}

/// Extracts the charset label from a `<meta>` element's attributes.
pub(crate) fn meta_charset(attributes: &[crate::tree::Attribute]) -> Option<String> {
    let find = |name: &str| {
        attributes
            .iter()
            .find(|a| a.matches(name))
            .map(|a| a.value.trim())
    };
    if let Some(charset) = find("charset").filter(|v| !v.is_empty()) {
        return Some(charset.to_string());
    }
    let is_content_type = find("http-equiv").is_some_and(|v| v.eq_ignore_ascii_case("content-type"));
    if is_content_type {
        return find("content").and_then(charset_from_content);
    }
    None
}

/// Extracts `charset=...` from a `Content-Type` value such as
/// `text/html; charset=windows-1251`.
fn charset_from_content(content: &str) -> Option<String> {
    let lower = content.to_ascii_lowercase();
    let pos = lower.find("charset")?;
    let rest = content[pos + "charset".len()..].trim_start();
    let rest = rest.strip_prefix('=')?.trim_start();
    let (rest, quote) = match rest.chars().next() {
        Some(q @ ('"' | '\'')) => (&rest[1..], Some(q)),
        _ => (rest, None),
    };
    let end = rest
        .find(|c: char| match quote {
            Some(q) => c == q,
            None => c == ';' || c.is_ascii_whitespace(),
        })
        .unwrap_or(rest.len());
    let label = rest[..end].trim();
    (!label.is_empty()).then(|| label.to_string())
}
