//! Compilation pipeline driver.
//!
//! Runs Source → Tokens → AST → Typed AST, honoring a stop-after stage
//! and the `--print-*` dump options. Each phase appends to one shared
//! diagnostics sink; the pipeline stops before the next phase as soon
//! as any phase has recorded an error. Diagnostics are rendered to
//! stderr sorted by (file, line, column) when the run finishes.

use std::fs;
use std::io::{self, IsTerminal};
use std::path::Path;

use thiserror::Error;

use crate::ast_arenas;
use crate::diag::Diagnostics;
use crate::intern::Interner;
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::print;
use crate::source::SourceManager;
use crate::typer::Typer;

/// Pipeline stages in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Preprocess,
    Lex,
    Parse,
    Sem,
    Ir,
    Asm,
}

/// Where a dump goes: the literal `stdout`, or a file path.
pub type PrintTarget = String;

#[derive(Debug, Default)]
pub struct FrontendOptions {
    pub stop_after: Option<Stage>,
    pub fail_fast: bool,
    pub print_preprocessed: Option<PrintTarget>,
    pub print_tokens: Option<PrintTarget>,
    pub print_ast: Option<PrintTarget>,
    pub print_types: Option<PrintTarget>,
}

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("cannot open '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("cannot write '{path}': {source}")]
    Output {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("{count} error(s) emitted")]
    Frontend { count: usize },
    #[error("IR and assembly stages are not part of this build")]
    BackendUnavailable,
}

/// Runs the frontend on `source`. Diagnostics go to stderr; dump output
/// goes wherever the print options point.
pub fn run_frontend(source: &Path, opts: &FrontendOptions) -> Result<(), CompileError> {
    log::debug!("compile: frontend on {}", source.display());
    let mut diags = Diagnostics::new(opts.fail_fast);

    // Preprocess.
    let sm = SourceManager::new(source, &mut diags).map_err(|err| CompileError::Io {
        path: source.display().to_string(),
        source: err,
    })?;
    if let Some(target) = &opts.print_preprocessed {
        write_output(target, &sm.preprocessed_text())?;
    }
    if opts.stop_after == Some(Stage::Preprocess) || diags.has_errors() {
        return finish(diags, &sm);
    }

    // Lex.
    let mut interner = Interner::new();
    if opts.stop_after == Some(Stage::Lex) {
        let tokens = Lexer::new(&sm).tokenize(&mut interner, &mut diags);
        if let Some(target) = &opts.print_tokens {
            write_output(target, &print::dump_tokens(&tokens, &interner, &sm))?;
        }
        return finish(diags, &sm);
    }
    if let Some(target) = &opts.print_tokens {
        // The stream is re-lexed by the parser below; dump from a
        // scratch sink so lexical errors are not recorded twice.
        let mut scratch = Diagnostics::new(false);
        let tokens = Lexer::new(&sm).tokenize(&mut interner, &mut scratch);
        write_output(target, &print::dump_tokens(&tokens, &interner, &sm))?;
    }

    // Parse (pulls the lexer on demand).
    ast_arenas!(ctx);
    let lexer = Lexer::new(&sm);
    let mut parser = Parser::new(lexer, &mut interner, &mut diags, ctx);
    let program = parser.parse_program();
    drop(parser);
    if let Some(target) = &opts.print_ast {
        write_output(target, &print::dump_ast(&program, &interner))?;
    }
    if opts.stop_after == Some(Stage::Parse) || diags.has_errors() {
        return finish(diags, &sm);
    }

    // Semantic analysis.
    let mut typer = Typer::new(&mut diags, &interner);
    typer.check_program(&program);
    if let Some(target) = &opts.print_types {
        write_output(
            target,
            &print::dump_types(typer.bindings(), &typer.arena, &interner),
        )?;
    }
    drop(typer);
    if opts.stop_after == Some(Stage::Sem) || diags.has_errors() {
        return finish(diags, &sm);
    }

    if matches!(opts.stop_after, Some(Stage::Ir) | Some(Stage::Asm)) {
        return Err(CompileError::BackendUnavailable);
    }
    finish(diags, &sm)
}

fn finish(diags: Diagnostics, sm: &SourceManager) -> Result<(), CompileError> {
    if !diags.is_empty() {
        let color = io::stderr().is_terminal();
        eprint!("{}", diags.render(sm, color));
    }
    if diags.has_errors() {
        return Err(CompileError::Frontend {
            count: diags.error_count(),
        });
    }
    Ok(())
}

fn write_output(target: &str, content: &str) -> Result<(), CompileError> {
    if target == "stdout" {
        print!("{}", content);
        return Ok(());
    }
    fs::write(target, content).map_err(|err| CompileError::Output {
        path: target.to_string(),
        source: err,
    })
}
