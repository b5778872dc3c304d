//! Command-line front end: load HTML files, report on them, and write them
//! back out, optionally in another encoding.

use std::fmt::Write as _;
use std::fs;
use std::io::{self, Read, Write};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use htmlarbor::encoding::{detect_encoding, EncodingOptions};
use htmlarbor::tree::{Document, NodeId, NodeKind};
use htmlarbor::{Charset, HtmlParseOptions, LoadOptions};

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// htmlarbor -- parse, inspect, and re-encode HTML files.
#[derive(Parser, Debug)]
#[command(name = "htmlarbor", version, about, long_about = None)]
#[allow(clippy::struct_excessive_bools)]
struct Cli {
    /// HTML files to process (use `-` for stdin).
    #[arg(required = true)]
    files: Vec<String>,

    /// Print parse warnings and debug logging.
    #[arg(long)]
    verbose: bool,

    // -- Input options -----------------------------------------------------
    /// Decode input with this encoding instead of detecting it.
    #[arg(long, value_name = "ENCODING")]
    encoding: Option<String>,

    /// Remove blank (whitespace-only) text nodes.
    #[arg(long)]
    noblanks: bool,

    // -- Reporting ---------------------------------------------------------
    /// Print the detected encoding and its code page.
    #[arg(long)]
    detect: bool,

    /// Print the number of nodes and elements under the document.
    #[arg(long)]
    count: bool,

    /// Print a debug representation of the document tree.
    #[arg(long)]
    debug: bool,

    /// Print timing information for reading, parsing and serializing.
    #[arg(long)]
    timing: bool,

    // -- Output options ----------------------------------------------------
    /// Do not output the serialized document.
    #[arg(long)]
    noout: bool,

    /// Output in the given encoding (e.g., UTF-8, windows-1251, UTF-16LE).
    #[arg(long, value_name = "ENCODING")]
    encode: Option<String>,

    /// Save output to a file instead of stdout.
    #[arg(long, value_name = "FILE")]
    output: Option<String>,
}

// ---------------------------------------------------------------------------
// Exit codes
// ---------------------------------------------------------------------------

const EXIT_SUCCESS: u8 = 0;
const EXIT_IO_ERROR: u8 = 1;
const EXIT_USAGE_ERROR: u8 = 2;

// ---------------------------------------------------------------------------
// Main entry point
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let Some(input_charset) = resolve_charset(cli.encoding.as_deref()) else {
        return ExitCode::from(EXIT_USAGE_ERROR);
    };
    let Some(output_charset) = resolve_charset(cli.encode.as_deref()) else {
        return ExitCode::from(EXIT_USAGE_ERROR);
    };

    let options = LoadOptions::default()
        .encoding_override(input_charset)
        .parse(HtmlParseOptions::default().no_blanks(cli.noblanks));

    let mut worst_exit = EXIT_SUCCESS;
    for file in &cli.files {
        let exit = process_file(&cli, file, &options, output_charset);
        worst_exit = worst_exit.max(exit);
    }

    ExitCode::from(worst_exit)
}

/// Resolves an optional encoding label. Returns `None` (after reporting)
/// for an unknown label, `Some(None)` when no label was given.
#[allow(clippy::option_option)]
fn resolve_charset(label: Option<&str>) -> Option<Option<Charset>> {
    match label {
        None => Some(None),
        Some(label) => {
            let charset = Charset::from_label(label);
            if charset.is_none() {
                eprintln!("htmlarbor: unknown encoding '{label}'");
            }
            charset.map(Some)
        }
    }
}

/// Processes a single input file and returns an exit code.
fn process_file(cli: &Cli, filename: &str, options: &LoadOptions, output_charset: Option<Charset>) -> u8 {
    // -- Read input --------------------------------------------------------
    let start_read = Instant::now();

    let bytes = match read_input(filename) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("{filename}: failed to read: {e}");
            return EXIT_IO_ERROR;
        }
    };

    if cli.timing {
        let elapsed = start_read.elapsed();
        eprintln!("Reading file {filename} took {elapsed:?}");
    }

    if cli.detect {
        let charset = options
            .encoding_override
            .unwrap_or_else(|| detect_encoding(&bytes, &EncodingOptions::default()));
        match charset.code_page() {
            Some(cp) => println!("{filename}: {charset} (code page {cp})"),
            None => println!("{filename}: {charset}"),
        }
    }

    // -- Parse -------------------------------------------------------------
    let start_parse = Instant::now();

    let doc = match Document::load_bytes(&bytes, options) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("{filename}: {e}");
            return EXIT_IO_ERROR;
        }
    };

    if cli.timing {
        let elapsed = start_parse.elapsed();
        eprintln!("Parsing took {elapsed:?}");
    }

    if cli.verbose {
        for diag in &doc.diagnostics {
            eprintln!("{filename}: {diag}");
        }
    }

    if cli.count {
        let root = doc.root();
        let nodes = doc.descendants(root).count();
        let elements = doc.descendants(root).filter(|&id| doc.is_element(id)).count();
        println!("{filename}: {nodes} nodes, {elements} elements");
    }

    // -- Debug tree --------------------------------------------------------
    if cli.debug {
        let debug_output = format_debug_tree(&doc);
        return write_output(cli, debug_output.as_bytes());
    }

    // -- Serialization / output --------------------------------------------
    if cli.noout {
        return EXIT_SUCCESS;
    }

    let start_serial = Instant::now();
    let bytes = doc.to_bytes(output_charset.unwrap_or(doc.encoding));
    let exit = write_output(cli, &bytes);

    if cli.timing {
        let elapsed = start_serial.elapsed();
        eprintln!("Serializing took {elapsed:?}");
    }

    exit
}

// ---------------------------------------------------------------------------
// Input reading
// ---------------------------------------------------------------------------

/// Reads raw input from a file or stdin (when filename is `-`).
fn read_input(filename: &str) -> io::Result<Vec<u8>> {
    if filename == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        Ok(buf)
    } else {
        fs::read(filename)
    }
}

// ---------------------------------------------------------------------------
// Debug output
// ---------------------------------------------------------------------------

/// Formats the document tree, one node per line, indented by depth.
fn format_debug_tree(doc: &Document) -> String {
    let mut output = String::new();
    output.push_str("DOCUMENT\n");
    for &child in doc.children(doc.root()) {
        format_debug_node(doc, child, 1, &mut output);
    }
    output
}

fn format_debug_node(doc: &Document, id: NodeId, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);

    match doc.node_kind(id) {
        NodeKind::Element { name, attributes } => {
            let _ = writeln!(out, "{indent}ELEMENT {name}");
            for attr in attributes {
                let _ = writeln!(out, "{indent}  ATTRIBUTE {}={}", attr.name, attr.value);
            }
            for &child in doc.children(id) {
                format_debug_node(doc, child, depth + 1, out);
            }
        }
        NodeKind::Text { content } => {
            // Show the text content, replacing newlines for readability
            let _ = writeln!(out, "{indent}TEXT {}", content.replace('\n', "\\n"));
        }
        NodeKind::Comment { content } => {
            let _ = writeln!(out, "{indent}COMMENT {content}");
        }
        NodeKind::Doctype { content } => {
            let _ = writeln!(out, "{indent}DOCTYPE {content}");
        }
        NodeKind::Document => {
            let _ = writeln!(out, "{indent}DOCUMENT");
        }
    }
}

// ---------------------------------------------------------------------------
// Output writing
// ---------------------------------------------------------------------------

/// Writes output to stdout or to the file specified by --output.
fn write_output(cli: &Cli, content: &[u8]) -> u8 {
    let result = match cli.output {
        Some(ref output_file) => fs::write(output_file, content).map_err(|e| (output_file.as_str(), e)),
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(content)
                .and_then(|()| stdout.flush())
                .map_err(|e| ("<stdout>", e))
        }
    };
    match result {
        Ok(()) => EXIT_SUCCESS,
        Err((target, e)) => {
            eprintln!("{target}: failed to write: {e}");
            EXIT_IO_ERROR
        }
    }
}
