// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Command-line driver for the bbnf parser generator.
//!
//! `bbnf <grammar-file> <algo-or-k>` analyses a Boolean BNF grammar,
//! prints the analysis report (alphabet, AST, references, ordering,
//! lookahead sets and parsing table) to stdout, and writes a standalone
//! recursive-descent parser next to the grammar file.
//!
//! The second argument selects the analysis: a number `k ≥ 1` runs
//! k-symbol lookahead, anything else (conventionally `ll1`) runs
//! single-symbol lookahead.
//!
//! All diagnostics go to stdout as single stable lines; the process
//! exits non-zero on any lexer, parser, grammar or I/O error.

use std::fs;
use std::process::ExitCode;

use bbnf_core::analyse::{self, Algorithm};
use bbnf_core::{codegen, report, source_analysis};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use miette::{IntoDiagnostic, Result, WrapErr};
use tracing::{debug, info, instrument};

/// bbnf: a parser generator for Boolean BNF grammars
#[derive(Debug, Parser)]
#[command(name = "bbnf")]
#[command(version, about, long_about = None)]
struct Cli {
    /// BBNF grammar file to analyse
    grammar_file: Utf8PathBuf,

    /// `ll1` for single-symbol lookahead, or a number k >= 1 for
    /// k-symbol lookahead
    #[arg(default_value = "ll1")]
    algorithm: String,

    /// Where to write the generated parser
    /// (default: `<grammar stem>_parser.rs` next to the grammar)
    #[arg(long)]
    output: Option<Utf8PathBuf>,
}

fn main() -> ExitCode {
    // Initialize tracing subscriber only if RUST_LOG is explicitly set,
    // so stdout stays exactly the report + diagnostics contract.
    if std::env::var("RUST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_writer(std::io::stderr)
            .try_init();
    }

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Diagnostics are part of the stdout contract; print the
            // stable single-line form.
            println!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[instrument(skip_all, fields(grammar = %cli.grammar_file, algorithm = %cli.algorithm))]
fn run(cli: &Cli) -> Result<()> {
    let algorithm = Algorithm::from_arg(&cli.algorithm)?;
    info!(?algorithm, "Starting analysis");

    let source = fs::read_to_string(&cli.grammar_file)
        .into_diagnostic()
        .wrap_err_with(|| format!("Error opening file '{}'", cli.grammar_file))?;

    let grammar = source_analysis::parse(&source)?;
    debug!(
        non_terminals = grammar.len(),
        terminals = grammar.alphabet().len(),
        "Parsed grammar"
    );

    let analysis = analyse::analyse(&grammar, algorithm)?;
    print!("{}", report::report(&grammar, &analysis));

    let parser_source = codegen::emit(&grammar, &analysis);
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output(&cli.grammar_file));
    fs::write(&output, parser_source)
        .into_diagnostic()
        .wrap_err_with(|| format!("Error writing parser to '{output}'"))?;
    info!(path = %output, "Wrote generated parser");

    Ok(())
}

/// `grammar.bbnf` → `grammar_parser.rs`, next to the input.
fn default_output(grammar_file: &Utf8Path) -> Utf8PathBuf {
    let stem = grammar_file.file_stem().unwrap_or("grammar");
    grammar_file.with_file_name(format!("{stem}_parser.rs"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(grammar_file: &str, algorithm: &str) -> Cli {
        Cli {
            grammar_file: Utf8PathBuf::from(grammar_file),
            algorithm: algorithm.to_string(),
            output: None,
        }
    }

    #[test]
    fn default_output_is_next_to_grammar() {
        assert_eq!(
            default_output(Utf8Path::new("/tmp/expr.bbnf")),
            Utf8PathBuf::from("/tmp/expr_parser.rs")
        );
        assert_eq!(
            default_output(Utf8Path::new("expr")),
            Utf8PathBuf::from("expr_parser.rs")
        );
    }

    #[test]
    fn run_generates_parser_file() {
        let dir = tempfile::tempdir().unwrap();
        let grammar_path = dir.path().join("g.bbnf");
        std::fs::write(&grammar_path, "S -> \"a\" | \"b\" ;").unwrap();

        let cli = cli(grammar_path.to_str().unwrap(), "ll1");
        run(&cli).unwrap();

        let parser_path = dir.path().join("g_parser.rs");
        let generated = std::fs::read_to_string(parser_path).unwrap();
        assert!(generated.contains("fn main() -> ExitCode {"));
        assert!(generated.contains("const TERMINALS: &[&str] = &[\"a\", \"b\"];"));
    }

    #[test]
    fn run_respects_output_override() {
        let dir = tempfile::tempdir().unwrap();
        let grammar_path = dir.path().join("g.bbnf");
        let output_path = dir.path().join("custom.rs");
        std::fs::write(&grammar_path, "S -> \"a\" ;").unwrap();

        let mut cli = cli(grammar_path.to_str().unwrap(), "2");
        cli.output = Some(Utf8PathBuf::from(output_path.to_str().unwrap()));
        run(&cli).unwrap();

        assert!(output_path.exists());
    }

    #[test]
    fn run_fails_on_missing_file() {
        let cli = cli("/nonexistent/grammar.bbnf", "ll1");
        let err = run(&cli).unwrap_err();
        assert!(err.to_string().starts_with("Error opening file"));
    }

    #[test]
    fn run_fails_on_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let grammar_path = dir.path().join("bad.bbnf");
        std::fs::write(&grammar_path, "S -> ;").unwrap();

        let cli = cli(grammar_path.to_str().unwrap(), "ll1");
        let err = run(&cli).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Parse error [ln 1, col 6]: unexpected token ';' (expecting non-terminal or literal)"
        );
    }

    #[test]
    fn run_fails_on_bad_lookahead() {
        let dir = tempfile::tempdir().unwrap();
        let grammar_path = dir.path().join("g.bbnf");
        std::fs::write(&grammar_path, "S -> \"a\" ;").unwrap();

        let cli = cli(grammar_path.to_str().unwrap(), "0");
        let err = run(&cli).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error: lookahead length must be at least 1"
        );
    }

    #[test]
    fn run_fails_on_left_recursion_in_sequence_mode() {
        let dir = tempfile::tempdir().unwrap();
        let grammar_path = dir.path().join("g.bbnf");
        std::fs::write(&grammar_path, "S -> S \"a\" | \"a\" ;").unwrap();

        let cli = cli(grammar_path.to_str().unwrap(), "2");
        let err = run(&cli).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error: grammar contains left recursion in rule for non-terminal S"
        );
    }
}
