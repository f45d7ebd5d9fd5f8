//! Command-line surface.
//!
//! `llamac <source> [frontend <options>]`. The `frontend` subcommand
//! groups the stop-after flags (mutually exclusive) and the `--print-*`
//! dump options; a print option whose phase runs after the selected
//! stop phase is rejected. Exit codes: 0 success, 1 user-level error,
//! 2 invalid arguments, 98 `--help-all`, 99 `--help`.

use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{Args, CommandFactory, Parser, Subcommand};

use crate::compile::{self, CompileError, FrontendOptions, Stage};

#[derive(Parser)]
#[command(name = "llamac")]
#[command(about = "Compiler for the Llama language", version)]
pub struct Cli {
    /// The source file to compile
    #[arg(required_unless_present = "help_all")]
    pub source: Option<PathBuf>,

    /// More detailed help
    #[arg(long)]
    pub help_all: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compiler frontend options
    Frontend(FrontendArgs),
}

#[derive(Args, Default)]
pub struct FrontendArgs {
    /// Stop after preprocessing
    #[arg(long, group = "step")]
    pub preprocess: bool,
    /// Stop after lexical analysis
    #[arg(long, group = "step")]
    pub lex: bool,
    /// Stop after parsing
    #[arg(long, group = "step")]
    pub parse: bool,
    /// Stop after semantic analysis
    #[arg(long, group = "step")]
    pub sem: bool,
    /// Stop after IR generation
    #[arg(long, group = "step")]
    pub ir: bool,
    /// Stop after assembly generation
    #[arg(long, group = "step")]
    pub asm: bool,

    /// Print the preprocessed source
    #[arg(long, value_name = "FILE", num_args = 0..=1, default_missing_value = "stdout")]
    pub print_preprocessed: Option<String>,
    /// Print the tokens
    #[arg(long, value_name = "FILE", num_args = 0..=1, default_missing_value = "stdout")]
    pub print_tokens: Option<String>,
    /// Print the AST
    #[arg(long, value_name = "FILE", num_args = 0..=1, default_missing_value = "stdout")]
    pub print_ast: Option<String>,
    /// Print inferred types
    #[arg(long, value_name = "FILE", num_args = 0..=1, default_missing_value = "stdout")]
    pub print_types: Option<String>,
    /// Print the IR
    #[arg(long, value_name = "FILE", num_args = 0..=1, default_missing_value = "stdout")]
    pub print_ir: Option<String>,
    /// Print assembly
    #[arg(long, value_name = "FILE", num_args = 0..=1, default_missing_value = "stdout")]
    pub print_asm: Option<String>,

    /// Stop each phase at its first error
    #[arg(long)]
    pub fail_fast: bool,
}

impl FrontendArgs {
    fn stop_after(&self) -> Option<Stage> {
        if self.preprocess {
            Some(Stage::Preprocess)
        } else if self.lex {
            Some(Stage::Lex)
        } else if self.parse {
            Some(Stage::Parse)
        } else if self.sem {
            Some(Stage::Sem)
        } else if self.ir {
            Some(Stage::Ir)
        } else if self.asm {
            Some(Stage::Asm)
        } else {
            None
        }
    }

    /// The first print option whose phase would run after the selected
    /// stop phase, if any.
    fn conflicting_print(&self) -> Option<&'static str> {
        let stop = self.stop_after()?;
        let options = [
            ("--print-tokens", Stage::Lex, self.print_tokens.is_some()),
            ("--print-ast", Stage::Parse, self.print_ast.is_some()),
            ("--print-types", Stage::Sem, self.print_types.is_some()),
            ("--print-ir", Stage::Ir, self.print_ir.is_some()),
            ("--print-asm", Stage::Asm, self.print_asm.is_some()),
        ];
        options
            .into_iter()
            .find(|(_, stage, given)| *given && *stage > stop)
            .map(|(flag, _, _)| flag)
    }
}

/// Parses arguments, runs the pipeline, returns the process exit code.
pub fn run_cli() -> i32 {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp => 99,
                ErrorKind::DisplayVersion => 0,
                _ => 2,
            };
            let _ = err.print();
            return code;
        }
    };

    if cli.help_all {
        let _ = Cli::command().print_long_help();
        return 98;
    }
    let source = cli.source.expect("clap enforces the source argument");

    let frontend = match cli.command {
        Some(Command::Frontend(args)) => args,
        None => FrontendArgs::default(),
    };

    if let Some(flag) = frontend.conflicting_print() {
        eprintln!(
            "error: {} refers to a phase after the selected stop phase",
            flag
        );
        return 2;
    }
    if frontend.print_ir.is_some() || frontend.print_asm.is_some() {
        eprintln!("error: {}", CompileError::BackendUnavailable);
        return 1;
    }

    let opts = FrontendOptions {
        stop_after: frontend.stop_after(),
        fail_fast: frontend.fail_fast,
        print_preprocessed: frontend.print_preprocessed,
        print_tokens: frontend.print_tokens,
        print_ast: frontend.print_ast,
        print_types: frontend.print_types,
    };

    match compile::run_frontend(&source, &opts) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {}", err);
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn step_flags_are_mutually_exclusive() {
        let result = Cli::try_parse_from(["llamac", "main.lla", "frontend", "--lex", "--parse"]);
        assert!(result.is_err());
    }

    #[test]
    fn print_option_defaults_to_stdout() {
        let cli = Cli::try_parse_from(["llamac", "main.lla", "frontend", "--print-tokens"])
            .expect("parse");
        match cli.command {
            Some(Command::Frontend(args)) => {
                assert_eq!(args.print_tokens.as_deref(), Some("stdout"));
            }
            _ => panic!("expected frontend subcommand"),
        }
    }

    #[test]
    fn print_option_accepts_a_file() {
        let cli = Cli::try_parse_from(["llamac", "main.lla", "frontend", "--print-ast=out.txt"])
            .expect("parse");
        match cli.command {
            Some(Command::Frontend(args)) => {
                assert_eq!(args.print_ast.as_deref(), Some("out.txt"));
            }
            _ => panic!("expected frontend subcommand"),
        }
    }

    #[test]
    fn print_after_stop_phase_is_flagged() {
        let cli =
            Cli::try_parse_from(["llamac", "main.lla", "frontend", "--lex", "--print-ast"])
                .expect("parse");
        match cli.command {
            Some(Command::Frontend(args)) => {
                assert_eq!(args.conflicting_print(), Some("--print-ast"));
            }
            _ => panic!("expected frontend subcommand"),
        }
    }

    #[test]
    fn print_at_or_before_stop_phase_is_fine() {
        let cli = Cli::try_parse_from([
            "llamac",
            "main.lla",
            "frontend",
            "--parse",
            "--print-tokens",
            "--print-ast",
        ])
        .expect("parse");
        match cli.command {
            Some(Command::Frontend(args)) => {
                assert_eq!(args.conflicting_print(), None);
                assert_eq!(args.stop_after(), Some(Stage::Parse));
            }
            _ => panic!("expected frontend subcommand"),
        }
    }

    #[test]
    fn source_is_required() {
        assert!(Cli::try_parse_from(["llamac"]).is_err());
    }
}
