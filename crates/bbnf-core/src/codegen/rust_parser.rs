// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Emits a standalone recursive-descent parser for an analysed grammar.
//!
//! The output is a single dependency-free Rust source file, compilable
//! with `rustc` alone. It embeds the grammar's terminal set, lexes its
//! input by longest match over that set, and contains one function per
//! terminal and per non-terminal. Non-terminal functions dispatch on
//! lookahead — the current token in single-symbol mode, the next ≤ k
//! tokens in sequence mode — and implement conjunctive semantics:
//!
//! 1. The first positive conjunct records the substring it consumed
//!    (`start..end`).
//! 2. Every other positive conjunct must consume exactly `start..end`.
//! 3. Every negative conjunct fails the rule if it matches exactly
//!    `start..end`.
//!
//! `start`/`end` are locals, so nested conjunctive rules cannot clobber
//! each other's bookkeeping. Output is byte-stable: identical analysis
//! input yields identical text.

use std::collections::BTreeMap;

use ecow::EcoString;

use crate::analyse::sequences::{self, Sequence};
use crate::analyse::{Analysis, Ll1Analysis, LlkAnalysis, RuleKey};
use crate::docvec;
use crate::grammar::{Conjunct, Grammar, Rule, SymbolKind};

use super::document::{Document, INDENT, concat, join, line, nest};

/// Emits the parser for whichever analysis mode was run.
#[must_use]
pub fn emit(grammar: &Grammar, analysis: &Analysis) -> String {
    match analysis {
        Analysis::Ll1(ll1) => emit_ll1(grammar, ll1),
        Analysis::Llk(llk) => emit_llk(grammar, llk),
    }
}

/// Emits a parser that dispatches on the current token.
#[must_use]
pub fn emit_ll1(grammar: &Grammar, analysis: &Ll1Analysis) -> String {
    let generator = Generator::new(grammar, &analysis.order);
    let non_terminals = analysis
        .order
        .iter()
        .enumerate()
        .map(|(index, name)| generator.non_terminal_fn(index, name, &ll1_branches(grammar, analysis, name)))
        .collect::<Vec<_>>();
    generator.file(Mode::SingleToken, non_terminals)
}

/// Emits a parser that dispatches on the next ≤ k tokens.
#[must_use]
pub fn emit_llk(grammar: &Grammar, analysis: &LlkAnalysis) -> String {
    let generator = Generator::new(grammar, &analysis.order);
    let non_terminals = analysis
        .order
        .iter()
        .enumerate()
        .map(|(index, name)| generator.non_terminal_fn(index, name, &llk_branches(grammar, analysis, name)))
        .collect::<Vec<_>>();
    generator.file(Mode::TokenSequence, non_terminals)
}

/// Lookahead shape of the emitted parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Compare the current token.
    SingleToken,
    /// Compare a prefix of the remaining tokens.
    TokenSequence,
}

/// A dispatch branch: the `if … {` condition line and the rule it
/// applies.
struct Branch<'g> {
    condition: String,
    rule: &'g Rule,
}

/// Branches for one non-terminal in single-symbol mode: one per table
/// entry, in alphabet order.
fn ll1_branches<'g>(
    grammar: &'g Grammar,
    analysis: &Ll1Analysis,
    name: &EcoString,
) -> Vec<Branch<'g>> {
    let mut branches = Vec::new();
    let Some(disjunction) = grammar.get(name) else {
        return branches;
    };
    for terminal in grammar.alphabet() {
        if let Some((_, rule_index)) = analysis.table.get(&(name.clone(), terminal.clone())) {
            branches.push(Branch {
                condition: format!("if self.current() == \"{}\" {{", escape(terminal)),
                rule: &disjunction.rules()[*rule_index],
            });
        }
    }
    branches
}

/// Branches for one non-terminal in sequence mode: one per selecting
/// sequence, longest sequences first so specific lookaheads win.
fn llk_branches<'g>(
    grammar: &'g Grammar,
    analysis: &LlkAnalysis,
    name: &EcoString,
) -> Vec<Branch<'g>> {
    let mut branches = Vec::new();
    let Some(disjunction) = grammar.get(name) else {
        return branches;
    };

    let id_of: BTreeMap<&RuleKey, usize> = analysis
        .table
        .rules
        .iter()
        .enumerate()
        .map(|(id, key)| (key, id))
        .collect();

    let mut selected: Vec<(&Sequence, &Rule)> = Vec::new();
    for (rule_index, rule) in disjunction.rules().iter().enumerate() {
        let key: RuleKey = (name.clone(), rule_index);
        let Some(lookaheads) = analysis.table.rule_lookaheads.get(&key) else {
            continue;
        };
        for seq in lookaheads {
            // A sequence claimed by a later rule was overwritten in the
            // table; only the surviving owner emits a branch for it.
            let owner = analysis
                .table
                .table
                .get(&(name.clone(), sequences::stringify(seq)));
            if owner == id_of.get(&key) {
                selected.push((seq, rule));
            }
        }
    }
    selected.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    for (seq, rule) in selected {
        let condition = if seq.is_empty() {
            "if self.pos >= self.sentence.len() {".to_string()
        } else {
            let terms: Vec<String> = seq.iter().map(|t| format!("\"{}\"", escape(t))).collect();
            format!("if self.lookahead(&[{}]) {{", terms.join(", "))
        };
        branches.push(Branch { condition, rule });
    }
    branches
}

/// Escapes a terminal for inclusion in a Rust string literal.
fn escape(text: &str) -> String {
    text.chars().flat_map(char::escape_default).collect()
}

/// Shared emitter state: the numbering of terminals and non-terminals.
struct Generator<'g> {
    grammar: &'g Grammar,
    order: &'g [EcoString],
    terminal_ids: BTreeMap<EcoString, usize>,
    non_terminal_ids: BTreeMap<EcoString, usize>,
}

impl<'g> Generator<'g> {
    fn new(grammar: &'g Grammar, order: &'g [EcoString]) -> Self {
        let terminal_ids = grammar
            .alphabet()
            .iter()
            .filter(|t| !t.is_empty())
            .enumerate()
            .map(|(id, t)| (t.clone(), id))
            .collect();
        let non_terminal_ids = order
            .iter()
            .enumerate()
            .map(|(id, name)| (name.clone(), id))
            .collect();
        Self {
            grammar,
            order,
            terminal_ids,
            non_terminal_ids,
        }
    }

    /// Assembles the complete generated file.
    fn file(&self, mode: Mode, non_terminals: Vec<Document<'static>>) -> String {
        let mut functions = vec![self.current_fn()];
        if mode == Mode::TokenSequence {
            functions.push(self.lookahead_fn());
        }
        functions.extend(self.terminal_fns());
        functions.extend(non_terminals);

        let blank = docvec![line(), line()];
        let doc = docvec![
            "// Generated by bbnf. Do not edit by hand.",
            line(),
            "#![allow(dead_code)]",
            line(),
            line(),
            "use std::env;",
            line(),
            "use std::fs;",
            line(),
            "use std::process::ExitCode;",
            line(),
            line(),
            self.terminals_const(),
            line(),
            line(),
            "struct Parser {",
            nest(
                INDENT,
                docvec![line(), "sentence: Vec<String>,", line(), "pos: usize,"]
            ),
            line(),
            "}",
            line(),
            line(),
            "impl Parser {",
            nest(INDENT, docvec![line(), join(functions, &blank)]),
            line(),
            "}",
            line(),
            line(),
            self.tokenise_fn(),
            line(),
            line(),
            self.main_fn(),
            line(),
        ];
        doc.render()
    }

    /// The embedded terminal set, in sorted order, epsilon excluded.
    fn terminals_const(&self) -> Document<'static> {
        let terms: Vec<String> = self
            .grammar
            .alphabet()
            .iter()
            .filter(|t| !t.is_empty())
            .map(|t| format!("\"{}\"", escape(t)))
            .collect();
        Document::String(format!("const TERMINALS: &[&str] = &[{}];", terms.join(", ")))
    }

    /// `current`: the token under the cursor, or `""` at end of input so
    /// epsilon table entries drive nullable rules there.
    fn current_fn(&self) -> Document<'static> {
        docvec![
            "fn current(&self) -> &str {",
            nest(
                INDENT,
                docvec![
                    line(),
                    "self.sentence.get(self.pos).map_or(\"\", String::as_str)"
                ]
            ),
            line(),
            "}",
        ]
    }

    /// `lookahead`: prefix comparison for sequence dispatch.
    fn lookahead_fn(&self) -> Document<'static> {
        docvec![
            "fn lookahead(&self, expected: &[&str]) -> bool {",
            nest(
                INDENT,
                docvec![
                    line(),
                    "expected",
                    nest(
                        INDENT,
                        docvec![
                            line(),
                            ".iter()",
                            line(),
                            ".enumerate()",
                            line(),
                            ".all(|(i, t)| self.sentence.get(self.pos + i).map(String::as_str) == Some(*t))",
                        ]
                    ),
                ]
            ),
            line(),
            "}",
        ]
    }

    /// One matcher per terminal: compare and advance.
    fn terminal_fns(&self) -> Vec<Document<'static>> {
        self.terminal_ids
            .iter()
            .map(|(terminal, id)| {
                docvec![
                    Document::String(format!("fn terminal{id}(&mut self) -> bool {{")),
                    nest(
                        INDENT,
                        docvec![
                            line(),
                            Document::String(format!(
                                "if self.current() == \"{}\" {{",
                                escape(terminal)
                            )),
                            nest(
                                INDENT,
                                docvec![line(), "self.pos += 1;", line(), "true"]
                            ),
                            line(),
                            "} else {",
                            nest(INDENT, docvec![line(), "false"]),
                            line(),
                            "}",
                        ]
                    ),
                    line(),
                    "}",
                ]
            })
            .collect()
    }

    /// One dispatcher per non-terminal: try each branch, else fail.
    fn non_terminal_fn(
        &self,
        index: usize,
        _name: &EcoString,
        branches: &[Branch<'_>],
    ) -> Document<'static> {
        let mut body = Vec::new();
        for branch in branches {
            body.push(docvec![
                line(),
                Document::String(branch.condition.clone()),
                nest(INDENT, self.rule_body(branch.rule)),
                line(),
                "}",
            ]);
        }
        body.push(docvec![line(), "false"]);

        docvec![
            Document::String(format!("fn non_terminal{index}(&mut self) -> bool {{")),
            nest(INDENT, concat(body)),
            line(),
            "}",
        ]
    }

    /// The `&&`-joined parsing calls for a conjunct's symbols, or `None`
    /// for a conjunct of epsilon alone.
    fn call_sequence(&self, conjunct: &Conjunct) -> Option<String> {
        let calls: Vec<String> = conjunct
            .symbols()
            .iter()
            .filter_map(|symbol| match symbol.kind() {
                SymbolKind::Terminal(t) => {
                    Some(format!("self.terminal{}()", self.terminal_ids[t]))
                }
                SymbolKind::NonTerminal(m) => {
                    Some(format!("self.non_terminal{}()", self.non_terminal_ids[m]))
                }
                SymbolKind::Epsilon => None,
            })
            .collect();
        if calls.is_empty() {
            None
        } else {
            Some(calls.join(" && "))
        }
    }

    /// `if !(calls) { return false; }`
    fn require(&self, calls: &str) -> Document<'static> {
        docvec![
            line(),
            Document::String(format!("if !({calls}) {{")),
            nest(INDENT, docvec![line(), "return false;"]),
            line(),
            "}",
        ]
    }

    /// The body of one rule: plain sequencing for a single positive
    /// conjunct, start/end bookkeeping otherwise.
    fn rule_body(&self, rule: &Rule) -> Document<'static> {
        let positives: Vec<&Conjunct> =
            rule.conjuncts().iter().filter(|c| c.is_positive()).collect();
        let negatives: Vec<&Conjunct> =
            rule.conjuncts().iter().filter(|c| !c.is_positive()).collect();

        if positives.len() == 1 && negatives.is_empty() {
            let mut body = Vec::new();
            if let Some(calls) = self.call_sequence(positives[0]) {
                body.push(self.require(&calls));
            }
            body.push(docvec![line(), "return true;"]);
            return concat(body);
        }

        let mut body = vec![docvec![line(), "let start = self.pos;"]];

        let mut rest = positives.as_slice();
        if let Some((head, tail)) = positives.split_first() {
            if let Some(calls) = self.call_sequence(head) {
                body.push(self.require(&calls));
            }
            body.push(docvec![line(), "let end = self.pos;"]);
            rest = tail;
        } else {
            // No positive conjunct pins the substring; it is empty.
            body.push(docvec![line(), "let end = self.pos;"]);
        }

        for conjunct in rest {
            body.push(docvec![line(), "self.pos = start;"]);
            if let Some(calls) = self.call_sequence(conjunct) {
                body.push(self.require(&calls));
            }
            body.push(docvec![
                line(),
                "if self.pos != end {",
                nest(INDENT, docvec![line(), "return false;"]),
                line(),
                "}",
            ]);
        }

        for conjunct in &negatives {
            body.push(docvec![line(), "self.pos = start;"]);
            let condition = match self.call_sequence(conjunct) {
                Some(calls) => format!("if {calls} && self.pos == end {{"),
                None => "if self.pos == end {".to_string(),
            };
            body.push(docvec![
                line(),
                Document::String(condition),
                nest(INDENT, docvec![line(), "return false;"]),
                line(),
                "}",
            ]);
        }

        body.push(docvec![line(), "self.pos = end;"]);
        body.push(docvec![line(), "return true;"]);
        concat(body)
    }

    /// The generated lexer: longest match over the embedded terminal
    /// set, with line/column tracking for the error message.
    fn tokenise_fn(&self) -> Document<'static> {
        Document::Str(
            r#"fn tokenise(input: &str) -> Result<Vec<String>, String> {
    let mut tokens = Vec::new();
    let mut rest = input;
    let mut line = 1_usize;
    let mut column = 1_usize;
    while let Some(c) = rest.chars().next() {
        if c.is_whitespace() {
            if c == '\n' || c == '\r' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
            rest = &rest[c.len_utf8()..];
            continue;
        }
        let matched = TERMINALS
            .iter()
            .filter(|t| rest.starts_with(**t))
            .max_by_key(|t| t.len());
        match matched {
            Some(t) => {
                tokens.push((*t).to_string());
                column += t.chars().count();
                rest = &rest[t.len()..];
            }
            None => {
                let run: String = rest.chars().take_while(|c| !c.is_whitespace()).collect();
                return Err(format!(
                    "Lexer error [ln {line}, col {column}]: unexpected sequence '{run}'"
                ));
            }
        }
    }
    Ok(tokens)
}"#,
        )
    }

    /// The generated entry point: read the input file, tokenise, parse
    /// from the start symbol, and require the whole sentence consumed.
    fn main_fn(&self) -> Document<'static> {
        let accept = match self.order.len().checked_sub(1) {
            Some(start_index) => format!(
                "if parser.non_terminal{start_index}() && parser.pos == parser.sentence.len() {{"
            ),
            None => "if parser.pos == parser.sentence.len() {".to_string(),
        };

        docvec![
            "fn main() -> ExitCode {",
            nest(
                INDENT,
                docvec![
                    line(),
                    "let args: Vec<String> = env::args().collect();",
                    line(),
                    "if args.len() != 2 {",
                    nest(
                        INDENT,
                        docvec![
                            line(),
                            "eprintln!(\"Usage: parser <input-file>\");",
                            line(),
                            "return ExitCode::FAILURE;",
                        ]
                    ),
                    line(),
                    "}",
                    line(),
                    "let input = match fs::read_to_string(&args[1]) {",
                    nest(
                        INDENT,
                        docvec![
                            line(),
                            "Ok(text) => text,",
                            line(),
                            "Err(err) => {",
                            nest(
                                INDENT,
                                docvec![
                                    line(),
                                    "println!(\"Error opening file: {err}\");",
                                    line(),
                                    "return ExitCode::FAILURE;",
                                ]
                            ),
                            line(),
                            "}",
                        ]
                    ),
                    line(),
                    "};",
                    line(),
                    "let sentence = match tokenise(&input) {",
                    nest(
                        INDENT,
                        docvec![
                            line(),
                            "Ok(tokens) => tokens,",
                            line(),
                            "Err(message) => {",
                            nest(
                                INDENT,
                                docvec![
                                    line(),
                                    "println!(\"{message}\");",
                                    line(),
                                    "return ExitCode::FAILURE;",
                                ]
                            ),
                            line(),
                            "}",
                        ]
                    ),
                    line(),
                    "};",
                    line(),
                    "let mut parser = Parser { sentence, pos: 0 };",
                    line(),
                    Document::String(accept),
                    nest(
                        INDENT,
                        docvec![
                            line(),
                            "println!(\"Parsing successful\");",
                            line(),
                            "ExitCode::SUCCESS",
                        ]
                    ),
                    line(),
                    "} else {",
                    nest(
                        INDENT,
                        docvec![
                            line(),
                            "println!(\"Parsing failed\");",
                            line(),
                            "ExitCode::FAILURE",
                        ]
                    ),
                    line(),
                    "}",
                ]
            ),
            line(),
            "}",
        ]
    }
}
