//! Source manager and `#include` preprocessor.
//!
//! Owns every file buffer for the compilation and presents the rest of
//! the pipeline with a pull stream of [`ScanEvent`]s: a `NewFile` marker
//! before the first line of each file (and again when an include finishes
//! and scanning returns to the parent), then one `Line` per non-directive
//! source line, numbered within its own file.
//!
//! The only directive is `#include "path"`. It must start in column 1 and
//! consume the whole line. Paths resolve relative to the compiler's
//! working directory. The include graph must be a DAG: re-entering a file
//! that is still on the include stack reports `IncludeCycle` once and
//! abandons that branch, while re-including a fully processed file is a
//! silent no-op.
//!
//! Inclusion happens eagerly when the manager is built; each file handle
//! is closed as soon as its bytes are buffered. The event stream itself
//! is lazy and can be replayed any number of times.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::ops::Range;
use std::path::{Path, PathBuf};

use crate::diag::{DiagnosticKind, Diagnostics, FileResolver};
use crate::position::{FileId, SourcePosition, Span};

/// One step of the preprocessed stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanEvent<'s> {
    /// Scanning enters (or returns to) the given file.
    NewFile(FileId),
    /// A source line, without its newline. `lineno` is 1-based within
    /// the line's own file.
    Line { text: &'s str, lineno: u32 },
}

struct SourceFile {
    display: String,
    text: String,
}

enum RawEvent {
    NewFile(FileId),
    Line {
        file: FileId,
        lineno: u32,
        range: Range<usize>,
    },
}

enum Directive {
    Include(String),
    Malformed(&'static str),
}

pub struct SourceManager {
    files: Vec<SourceFile>,
    events: Vec<RawEvent>,
}

impl SourceManager {
    /// Reads the root file and resolves its include tree.
    ///
    /// Failure to open the root itself is returned as `Err`; everything
    /// else (bad directives, missing includes, cycles) is recorded in
    /// `diags` and scanning continues per the recovery rules.
    pub fn new(root: impl AsRef<Path>, diags: &mut Diagnostics) -> io::Result<Self> {
        let root = root.as_ref();
        let key = canonical_key(root)?;
        let text = fs::read_to_string(root)?;
        let mut sm = SourceManager {
            files: Vec::new(),
            events: Vec::new(),
        };
        let mut stack = Vec::new();
        let mut done = HashSet::new();
        sm.scan_file(
            root.display().to_string(),
            key,
            text,
            diags,
            &mut stack,
            &mut done,
        );
        Ok(sm)
    }

    /// Builds a manager from in-memory text. Include directives still
    /// resolve against the working directory.
    pub fn from_source(name: &str, text: &str, diags: &mut Diagnostics) -> Self {
        let mut sm = SourceManager {
            files: Vec::new(),
            events: Vec::new(),
        };
        let mut stack = Vec::new();
        let mut done = HashSet::new();
        sm.scan_file(
            name.to_string(),
            name.to_string(),
            text.to_string(),
            diags,
            &mut stack,
            &mut done,
        );
        sm
    }

    fn scan_file(
        &mut self,
        display: String,
        key: String,
        text: String,
        diags: &mut Diagnostics,
        stack: &mut Vec<String>,
        done: &mut HashSet<String>,
    ) {
        log::trace!("source: scanning '{}'", display);
        let id = FileId(self.files.len() as u32);
        self.files.push(SourceFile { display, text });
        stack.push(key.clone());
        self.events.push(RawEvent::NewFile(id));

        let ranges = line_ranges(&self.files[id.index()].text);
        for (i, range) in ranges.into_iter().enumerate() {
            let lineno = (i + 1) as u32;
            let directive = {
                let line = &self.files[id.index()].text[range.clone()];
                if line.starts_with('#') {
                    Some(parse_directive(line))
                } else {
                    None
                }
            };
            match directive {
                None => self.events.push(RawEvent::Line {
                    file: id,
                    lineno,
                    range,
                }),
                Some(directive) => {
                    let span = self.directive_span(id, lineno, range.len());
                    let included = self.process_directive(directive, span, diags, stack, done);
                    if included {
                        // Returning to this file after an include.
                        self.events.push(RawEvent::NewFile(id));
                    }
                    if diags.should_abort() {
                        break;
                    }
                }
            }
        }

        stack.pop();
        done.insert(key);
    }

    /// Returns `true` when an include was actually performed.
    fn process_directive(
        &mut self,
        directive: Directive,
        span: Span,
        diags: &mut Diagnostics,
        stack: &mut Vec<String>,
        done: &mut HashSet<String>,
    ) -> bool {
        let path_text = match directive {
            Directive::Malformed(msg) => {
                diags.error(DiagnosticKind::Preprocessor, span, msg);
                return false;
            }
            Directive::Include(path) => path,
        };
        let path = PathBuf::from(&path_text);
        let key = match canonical_key(&path) {
            Err(_) => {
                diags.error(
                    DiagnosticKind::Preprocessor,
                    span,
                    format!("cannot open include file '{}'", path_text),
                );
                return false;
            }
            Ok(key) => key,
        };
        if stack.contains(&key) {
            diags.error(
                DiagnosticKind::Preprocessor,
                span,
                format!("include cycle detected at '{}'", path_text),
            );
            return false;
        }
        if done.contains(&key) {
            log::trace!("source: '{}' already included, skipping", path_text);
            return false;
        }
        match fs::read_to_string(&path) {
            Err(err) => {
                diags.error(
                    DiagnosticKind::Preprocessor,
                    span,
                    format!("cannot read include file '{}': {}", path_text, err),
                );
                false
            }
            Ok(text) => {
                self.scan_file(path_text, key, text, diags, stack, done);
                true
            }
        }
    }

    fn directive_span(&self, file: FileId, lineno: u32, len: usize) -> Span {
        Span::new(
            SourcePosition::new(file, lineno, 1),
            SourcePosition::new(file, lineno, len as u32 + 1),
        )
    }

    /// The lazy event stream. Replayable.
    pub fn events(&self) -> ScanEvents<'_> {
        ScanEvents { sm: self, idx: 0 }
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// The text of one line, if that (file, lineno) pair survived
    /// preprocessing.
    pub fn line_text(&self, file: FileId, lineno: u32) -> Option<&str> {
        self.events.iter().find_map(|ev| match ev {
            RawEvent::Line {
                file: f,
                lineno: l,
                range,
            } if *f == file && *l == lineno => {
                Some(&self.files[f.index()].text[range.clone()])
            }
            _ => None,
        })
    }

    /// All surviving lines in stream order, `\n`-separated.
    pub fn preprocessed_text(&self) -> String {
        let mut out = String::new();
        let mut first = true;
        for ev in &self.events {
            if let RawEvent::Line { file, range, .. } = ev {
                if !first {
                    out.push('\n');
                }
                first = false;
                out.push_str(&self.files[file.index()].text[range.clone()]);
            }
        }
        out
    }
}

impl FileResolver for SourceManager {
    fn file_name(&self, id: FileId) -> &str {
        &self.files[id.index()].display
    }
}

pub struct ScanEvents<'s> {
    sm: &'s SourceManager,
    idx: usize,
}

impl<'s> Iterator for ScanEvents<'s> {
    type Item = ScanEvent<'s>;

    fn next(&mut self) -> Option<ScanEvent<'s>> {
        let ev = self.sm.events.get(self.idx)?;
        self.idx += 1;
        Some(match ev {
            RawEvent::NewFile(id) => ScanEvent::NewFile(*id),
            RawEvent::Line {
                file,
                lineno,
                range,
            } => ScanEvent::Line {
                text: &self.sm.files[file.index()].text[range.clone()],
                lineno: *lineno,
            },
        })
    }
}

fn canonical_key(path: &Path) -> io::Result<String> {
    Ok(fs::canonicalize(path)?.to_string_lossy().into_owned())
}

/// Byte ranges of each line, newline and carriage return excluded.
fn line_ranges(text: &str) -> Vec<Range<usize>> {
    let bytes = text.as_bytes();
    let mut ranges = Vec::new();
    let mut start = 0;
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'\n' {
            let mut end = i;
            if end > start && bytes[end - 1] == b'\r' {
                end -= 1;
            }
            ranges.push(start..end);
            start = i + 1;
        }
    }
    if start < bytes.len() {
        let mut end = bytes.len();
        if end > start && bytes[end - 1] == b'\r' {
            end -= 1;
        }
        ranges.push(start..end);
    }
    ranges
}

fn parse_directive(line: &str) -> Directive {
    let rest = match line.strip_prefix("#include") {
        Some(rest) => rest,
        None => return Directive::Malformed("unknown preprocessor directive"),
    };
    let rest = rest.trim_start();
    let body = match rest.strip_prefix('"') {
        Some(body) => body,
        None => return Directive::Malformed("expected quoted path after #include"),
    };
    let close = match body.find('"') {
        Some(close) => close,
        None => return Directive::Malformed("unterminated path in #include"),
    };
    let trailing = &body[close + 1..];
    if !trailing.trim().is_empty() {
        return Directive::Malformed("unexpected text after #include path");
    }
    Directive::Include(body[..close].to_string())
}
