//! Shared diagnostics sink for the whole pipeline.
//!
//! Every phase appends [`Diagnostic`] records to one per-compilation
//! [`Diagnostics`] value; nothing is global. The sink is append-only while
//! a compilation runs. Consumers read it between phases and decide whether
//! to continue: the driver stops the pipeline before the next phase once
//! any `Error` has been recorded.
//!
//! Two modes exist. In the default accumulating mode phases keep going
//! past recoverable errors. With `fail_fast` set, each phase returns as
//! soon as it records its first `Error`. Internal invariant violations do
//! not go through the sink at all; they panic.

use crate::position::{cmp_pos, FileId, Span};
use crate::style::Style;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// Which phase produced a diagnostic. The discriminant order is the
/// pipeline order and drives the cross-phase ordering guarantee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DiagnosticKind {
    Io,
    Preprocessor,
    Lexical,
    Syntax,
    NameResolution,
    Type,
}

impl DiagnosticKind {
    pub fn label(self) -> &'static str {
        match self {
            DiagnosticKind::Io => "io",
            DiagnosticKind::Preprocessor => "preprocessor",
            DiagnosticKind::Lexical => "lexical",
            DiagnosticKind::Syntax => "syntax",
            DiagnosticKind::NameResolution => "name",
            DiagnosticKind::Type => "type",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub span: Span,
    pub message: String,
}

/// Maps a [`FileId`] back to a printable filename.
///
/// Implemented by the source manager; kept as a trait so rendering does
/// not depend on it.
pub trait FileResolver {
    fn file_name(&self, id: FileId) -> &str;
}

/// Append-only collection of diagnostics for one compilation.
#[derive(Debug, Default)]
pub struct Diagnostics {
    records: Vec<Diagnostic>,
    fail_fast: bool,
    errors: usize,
}

impl Diagnostics {
    pub fn new(fail_fast: bool) -> Self {
        Diagnostics {
            records: Vec::new(),
            fail_fast,
            errors: 0,
        }
    }

    pub fn error(&mut self, kind: DiagnosticKind, span: Span, message: impl Into<String>) {
        let message = message.into();
        log::debug!("diag: {} error at {}: {}", kind.label(), span, message);
        self.errors += 1;
        self.records.push(Diagnostic {
            severity: Severity::Error,
            kind,
            span,
            message,
        });
    }

    pub fn warning(&mut self, kind: DiagnosticKind, span: Span, message: impl Into<String>) {
        self.records.push(Diagnostic {
            severity: Severity::Warning,
            kind,
            span,
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    pub fn error_count(&self) -> usize {
        self.errors
    }

    pub fn is_fail_fast(&self) -> bool {
        self.fail_fast
    }

    /// True when the current phase must stop: fail-fast mode and at least
    /// one error already recorded.
    pub fn should_abort(&self) -> bool {
        self.fail_fast && self.errors > 0
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.records.iter()
    }

    /// Records ordered phase-first: every earlier phase's diagnostics
    /// precede every later phase's, and the append order (source order)
    /// is preserved within a phase.
    pub fn in_phase_order(&self) -> Vec<&Diagnostic> {
        let mut refs: Vec<&Diagnostic> = self.records.iter().collect();
        refs.sort_by_key(|d| d.kind);
        refs
    }

    /// Records ordered by primary position: (file, line, col).
    pub fn in_source_order(&self) -> Vec<&Diagnostic> {
        let mut refs: Vec<&Diagnostic> = self.records.iter().collect();
        refs.sort_by(|a, b| cmp_pos(a.span.start, b.span.start));
        refs
    }

    /// Renders every record, one line each, in source order.
    pub fn render(&self, files: &dyn FileResolver, color: bool) -> String {
        let mut out = String::new();
        for diag in self.in_source_order() {
            out.push_str(&render_line(diag, files, color));
            out.push('\n');
        }
        out
    }
}

fn render_line(diag: &Diagnostic, files: &dyn FileResolver, color: bool) -> String {
    let severity = match (diag.severity, color) {
        (Severity::Error, true) => Style::bold_red("error"),
        (Severity::Error, false) => "error".to_string(),
        (Severity::Warning, true) => Style::bold_yellow("warning"),
        (Severity::Warning, false) => "warning".to_string(),
    };
    let pos = diag.span.start;
    format!(
        "{}[{}]: {}:{}:{}: {}",
        severity,
        diag.kind.label(),
        files.file_name(pos.file),
        pos.line,
        pos.col,
        diag.message
    )
}
