// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Stable text rendering of analysis results.
//!
//! The driver prints these sections to stdout after a successful
//! analysis; tests compare them verbatim, so the formats here are part
//! of the external contract. Conventions: the empty string renders as
//! `epsilon`; set elements are space-separated on one line; structural
//! dumps indent four spaces per level.

use std::fmt::Write as _;

use ecow::EcoString;

use crate::analyse::sequences::Sequence;
use crate::analyse::{Analysis, Ll1Analysis, LlkAnalysis, deps::References};
use crate::grammar::{Conjunct, Grammar, Rule, SymbolKind};

/// Renders the empty string as `epsilon`, other strings as themselves.
fn term(text: &str) -> &str {
    if text.is_empty() { "epsilon" } else { text }
}

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `Alphabet: epsilon a b`
#[must_use]
pub fn alphabet(grammar: &Grammar) -> String {
    let mut out = String::from("Alphabet:");
    for t in grammar.alphabet() {
        let _ = write!(out, " {}", term(t));
    }
    out.push('\n');
    out
}

/// The grammar AST dump, one block per non-terminal in name order.
#[must_use]
pub fn grammar_ast(grammar: &Grammar) -> String {
    let mut out = String::from("Grammar AST\n");
    for (name, disjunction) in grammar.definitions() {
        let _ = writeln!(out, "NON-TERMINAL {name}");
        for rule in disjunction.rules() {
            out.push_str(&rule_block(rule, 1));
        }
    }
    out
}

fn rule_block(rule: &Rule, depth: usize) -> String {
    let mut out = format!("{}RULE:\n", indent(depth));
    for conjunct in rule.conjuncts() {
        out.push_str(&conjunct_block(conjunct, depth + 1));
    }
    out
}

fn conjunct_block(conjunct: &Conjunct, depth: usize) -> String {
    let sign = if conjunct.is_positive() { "+VE" } else { "-VE" };
    let mut out = format!("{}{sign} CONJUNCT:\n", indent(depth));
    for symbol in conjunct.symbols() {
        let line = match symbol.kind() {
            SymbolKind::Terminal(t) => format!("TERMINAL: {}", term(t)),
            SymbolKind::NonTerminal(m) => format!("NON-TERMINAL: {m}"),
            SymbolKind::Epsilon => "TERMINAL: epsilon".to_string(),
        };
        let _ = writeln!(out, "{}{line}", indent(depth + 1));
    }
    out
}

/// `Referenced Non-Terminals` — the dependency adjacency list.
#[must_use]
pub fn references(refs: &References) -> String {
    let mut out = String::from("Referenced Non-Terminals\n");
    for (name, referenced) in refs {
        let _ = write!(out, "{name}:");
        for r in referenced {
            let _ = write!(out, " {r}");
        }
        out.push('\n');
    }
    out
}

/// The topological order, on one line.
#[must_use]
pub fn first_order(order: &[EcoString]) -> String {
    let mut out = String::from("Order of Computing FIRST Sets:");
    for name in order {
        let _ = write!(out, " {name}");
    }
    out.push('\n');
    out
}

/// FIRST sets, one line per non-terminal in topological order.
#[must_use]
pub fn first_sets(analysis: &Ll1Analysis) -> String {
    let mut out = String::from("FIRST Sets\n");
    for name in &analysis.order {
        let _ = write!(out, "{name}:");
        if let Some(set) = analysis.first.get(name) {
            for t in set {
                let _ = write!(out, " {}", term(t));
            }
        }
        out.push('\n');
    }
    out
}

/// FOLLOW sets, one line per non-terminal, start symbol first.
#[must_use]
pub fn follow_sets(analysis: &Ll1Analysis) -> String {
    let mut out = String::from("FOLLOW Sets\n");
    for name in analysis.order.iter().rev() {
        let _ = write!(out, "{name}:");
        if let Some(set) = analysis.follow.get(name) {
            for t in set {
                let _ = write!(out, " {}", term(t));
            }
        }
        out.push('\n');
    }
    out
}

/// The single-symbol parsing table, one block per cell in key order.
#[must_use]
pub fn ll1_table(grammar: &Grammar, analysis: &Ll1Analysis) -> String {
    let mut out = String::from("Parsing Table\n");
    for ((name, terminal), (rule_name, rule_index)) in &analysis.table {
        let _ = writeln!(out, "NON-TERMINAL {name}, STRING {}", term(terminal));
        if let Some(disjunction) = grammar.get(rule_name) {
            out.push_str(&rule_block(&disjunction.rules()[*rule_index], 1));
        }
    }
    out
}

fn sequence(seq: &Sequence) -> String {
    if seq.is_empty() {
        return "[epsilon]".to_string();
    }
    let mut out = String::from("[");
    for (i, t) in seq.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(t);
    }
    out.push(']');
    out
}

/// PFIRST sets, one line per non-terminal in topological order.
#[must_use]
pub fn pfirst_sets(analysis: &LlkAnalysis) -> String {
    let mut out = String::from("PFIRST Sets\n");
    for name in &analysis.order {
        let _ = write!(out, "{name}:");
        if let Some(set) = analysis.pfirst.get(name) {
            for seq in set {
                let _ = write!(out, " {}", sequence(seq));
            }
        }
        out.push('\n');
    }
    out
}

/// PFOLLOW sets, one line per non-terminal, start symbol first.
#[must_use]
pub fn pfollow_sets(analysis: &LlkAnalysis) -> String {
    let mut out = String::from("PFOLLOW Sets\n");
    for name in analysis.order.iter().rev() {
        let _ = write!(out, "{name}:");
        if let Some(set) = analysis.pfollow.get(name) {
            for seq in set {
                let _ = write!(out, " {}", sequence(seq));
            }
        }
        out.push('\n');
    }
    out
}

/// The numbered rules and the sequence-lookahead table.
#[must_use]
pub fn llk_table(grammar: &Grammar, analysis: &LlkAnalysis) -> String {
    let mut out = String::from("Rules\n");
    for (id, (name, rule_index)) in analysis.table.rules.iter().enumerate() {
        let _ = writeln!(out, "RULE {id} ({name}):");
        if let Some(disjunction) = grammar.get(name) {
            for conjunct in disjunction.rules()[*rule_index].conjuncts() {
                out.push_str(&conjunct_block(conjunct, 1));
            }
        }
    }
    out.push_str("Parsing Table\n");
    for ((name, lookahead), id) in &analysis.table.table {
        let _ = writeln!(
            out,
            "NON-TERMINAL {name}, LOOKAHEAD {} -> rule {id}",
            term(lookahead)
        );
    }
    out
}

/// The full stdout report in driver order.
#[must_use]
pub fn report(grammar: &Grammar, analysis: &Analysis) -> String {
    match analysis {
        Analysis::Ll1(ll1) => {
            let sections = [
                alphabet(grammar),
                grammar_ast(grammar),
                references(&ll1.refs),
                first_order(&ll1.order),
                first_sets(ll1),
                follow_sets(ll1),
                ll1_table(grammar, ll1),
            ];
            sections.join("\n")
        }
        Analysis::Llk(llk) => {
            let sections = [
                alphabet(grammar),
                grammar_ast(grammar),
                references(&llk.refs),
                first_order(&llk.order),
                pfirst_sets(llk),
                pfollow_sets(llk),
                llk_table(grammar, llk),
            ];
            sections.join("\n")
        }
    }
}
