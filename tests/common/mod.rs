//! Shared helpers for the integration tests.

use llamac::ast_arenas;
use llamac::diag::Diagnostics;
use llamac::intern::Interner;
use llamac::lexer::Lexer;
use llamac::parser::Parser;
use llamac::source::SourceManager;
use llamac::typer::Typer;

/// Owned summary of a full frontend run over in-memory source.
pub struct PipelineResult {
    /// (kind label, message, 1-based line of the primary position).
    pub diagnostics: Vec<(String, String, u32)>,
    pub error_count: usize,
    /// Top-level bindings as (name, rendered type), in definition order.
    pub bindings: Vec<(String, String)>,
}

impl PipelineResult {
    pub fn binding(&self, name: &str) -> &str {
        self.bindings
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, t)| t.as_str())
            .unwrap_or_else(|| panic!("no binding for '{}' in {:?}", name, self.bindings))
    }
}

/// Source text through preprocess, lex, parse, and type inference.
pub fn run_pipeline(source: &str) -> PipelineResult {
    let mut diags = Diagnostics::new(false);
    let sm = SourceManager::from_source("test.lla", source, &mut diags);
    let mut interner = Interner::new();
    ast_arenas!(ctx);
    let lexer = Lexer::new(&sm);
    let mut parser = Parser::new(lexer, &mut interner, &mut diags, ctx);
    let program = parser.parse_program();
    drop(parser);

    let mut bindings = Vec::new();
    if !diags.has_errors() {
        let mut typer = Typer::new(&mut diags, &interner);
        typer.check_program(&program);
        bindings = typer
            .bindings()
            .iter()
            .map(|(name, ty)| {
                (
                    interner.resolve(*name).to_string(),
                    typer.arena.display(*ty, &interner),
                )
            })
            .collect();
    }

    let diagnostics = diags
        .iter()
        .map(|d| {
            (
                d.kind.label().to_string(),
                d.message.clone(),
                d.span.start.line,
            )
        })
        .collect();
    PipelineResult {
        diagnostics,
        error_count: diags.error_count(),
        bindings,
    }
}
