// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Grammar analysis: dependencies, lookahead sets, parsing tables.
//!
//! The analyser owns every piece of derived state — reference lists,
//! topological order, FIRST/FOLLOW (or PFIRST/PFOLLOW) sets, nullability
//! flags and the parsing table — in side tables keyed by non-terminal
//! name and rule/conjunct index. The grammar AST itself is never
//! mutated, so analysing the same grammar twice yields identical
//! results.
//!
//! Two modes exist, selected by [`Algorithm`]:
//!
//! - [`Algorithm::Ll1`]: classical single-symbol lookahead. Sets contain
//!   terminals, with the empty string marking nullability.
//! - [`Algorithm::Llk`]: k-symbol lookahead for any `k ≥ 1`. Sets contain
//!   terminal sequences of length ≤ k; left recursion and contradictory
//!   conjunctions are rejected here.
//!
//! Stages run in a fixed order: references → topological order → FIRST →
//! FOLLOW → table. FIRST computation walks the order leaves-first so
//! every referenced set is complete when consulted; FOLLOW walks it in
//! reverse so the deriving non-terminal's context exists before its
//! references ask for it.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use ecow::EcoString;

use crate::grammar::Grammar;

pub mod deps;
mod error;
pub mod first;
pub mod follow;
pub mod predictive;
pub mod sequences;
pub mod table;

pub use error::GrammarError;
pub use table::{Ll1Table, LlkTable};

/// A set of terminal strings; the empty string marks nullability.
pub type TermSet = BTreeSet<EcoString>;

/// Identifies a rule: the deriving non-terminal and the rule's index in
/// its disjunction.
pub type RuleKey = (EcoString, usize);

/// Identifies a conjunct: rule key plus conjunct index.
pub type ConjunctKey = (EcoString, usize, usize);

/// The analysis mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    /// Single-symbol lookahead.
    Ll1,
    /// k-symbol lookahead, `k ≥ 1`.
    Llk(usize),
}

impl Algorithm {
    /// Interprets the driver's algorithm argument: a number selects
    /// k-symbol lookahead, anything else (including `ll1`) selects
    /// single-symbol mode.
    ///
    /// # Errors
    ///
    /// Rejects numeric arguments below 1.
    pub fn from_arg(arg: &str) -> Result<Self, GrammarError> {
        match arg.parse::<i64>() {
            Ok(k) if k >= 1 => Ok(Self::Llk(usize::try_from(k).unwrap_or(usize::MAX))),
            Ok(_) => Err(GrammarError::InvalidLookahead),
            Err(_) => Ok(Self::Ll1),
        }
    }
}

/// Results of single-symbol analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ll1Analysis {
    /// Non-terminal reference adjacency list.
    pub refs: deps::References,
    /// Topological order, leaves first; the start symbol is last.
    pub order: Vec<EcoString>,
    /// FIRST set per non-terminal.
    pub first: BTreeMap<EcoString, TermSet>,
    /// FOLLOW set per non-terminal.
    pub follow: BTreeMap<EcoString, TermSet>,
    /// FIRST set per rule.
    pub rule_first: BTreeMap<RuleKey, TermSet>,
    /// Nullability per rule.
    pub rule_nullable: BTreeMap<RuleKey, bool>,
    /// Nullability per conjunct.
    pub conj_nullable: BTreeMap<ConjunctKey, bool>,
    /// The parsing table.
    pub table: Ll1Table,
}

impl Ll1Analysis {
    /// The start symbol: the non-terminal nothing else depends on.
    #[must_use]
    pub fn start_symbol(&self) -> Option<&EcoString> {
        self.order.last()
    }
}

/// Results of k-symbol analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlkAnalysis {
    /// The lookahead length.
    pub k: usize,
    /// Non-terminal reference adjacency list.
    pub refs: deps::References,
    /// Topological order, leaves first; the start symbol is last.
    pub order: Vec<EcoString>,
    /// PFIRST set per non-terminal.
    pub pfirst: BTreeMap<EcoString, sequences::SequenceSet>,
    /// PFOLLOW set per non-terminal.
    pub pfollow: BTreeMap<EcoString, sequences::SequenceSet>,
    /// PFIRST set per rule.
    pub rule_pfirst: BTreeMap<RuleKey, sequences::SequenceSet>,
    /// The parsing table with its rule numbering.
    pub table: LlkTable,
}

impl LlkAnalysis {
    /// The start symbol: the non-terminal nothing else depends on.
    #[must_use]
    pub fn start_symbol(&self) -> Option<&EcoString> {
        self.order.last()
    }
}

/// Either mode's analysis results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Analysis {
    /// Single-symbol lookahead results.
    Ll1(Ll1Analysis),
    /// k-symbol lookahead results.
    Llk(LlkAnalysis),
}

/// Runs the full analysis pipeline in the chosen mode.
///
/// # Errors
///
/// In k-symbol mode, rejects left-recursive and contradictory grammars.
/// Single-symbol mode does not fail.
pub fn analyse(grammar: &Grammar, algorithm: Algorithm) -> Result<Analysis, GrammarError> {
    match algorithm {
        Algorithm::Ll1 => Ok(Analysis::Ll1(analyse_ll1(grammar))),
        Algorithm::Llk(k) => Ok(Analysis::Llk(analyse_llk(grammar, k)?)),
    }
}

/// Runs single-symbol analysis: references (positive conjuncts only),
/// topological order, FIRST, FOLLOW, parsing table.
#[must_use]
pub fn analyse_ll1(grammar: &Grammar) -> Ll1Analysis {
    let refs = deps::references(grammar, false);
    let order = deps::topological_order(&refs);
    let firsts = first::compute(grammar, &order);
    let follow = follow::compute(grammar, &order, &firsts);
    let table = table::build_ll1(grammar, &firsts, &follow);

    Ll1Analysis {
        refs,
        order,
        first: firsts.first,
        follow,
        rule_first: firsts.rule_first,
        rule_nullable: firsts.rule_nullable,
        conj_nullable: firsts.conj_nullable,
        table,
    }
}

/// Runs k-symbol analysis: references (all conjuncts), topological
/// order, PFIRST, PFOLLOW, parsing table.
///
/// # Errors
///
/// Rejects `k < 1`, left recursion and contradictory conjunctions.
pub fn analyse_llk(grammar: &Grammar, k: usize) -> Result<LlkAnalysis, GrammarError> {
    if k < 1 {
        return Err(GrammarError::InvalidLookahead);
    }

    let refs = deps::references(grammar, true);
    let order = deps::topological_order(&refs);
    let sets = predictive::compute(grammar, &order, k)?;
    let table = table::build_llk(grammar, &sets, k);

    Ok(LlkAnalysis {
        k,
        refs,
        order,
        pfirst: sets.pfirst,
        pfollow: sets.pfollow,
        rule_pfirst: sets.rule_pfirst,
        table,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_analysis::parse;

    #[test]
    fn algorithm_argument_parsing() {
        assert_eq!(Algorithm::from_arg("ll1"), Ok(Algorithm::Ll1));
        assert_eq!(Algorithm::from_arg("foo"), Ok(Algorithm::Ll1));
        assert_eq!(Algorithm::from_arg("1"), Ok(Algorithm::Llk(1)));
        assert_eq!(Algorithm::from_arg("3"), Ok(Algorithm::Llk(3)));
        assert_eq!(
            Algorithm::from_arg("0"),
            Err(GrammarError::InvalidLookahead)
        );
        assert_eq!(
            Algorithm::from_arg("-2"),
            Err(GrammarError::InvalidLookahead)
        );
    }

    #[test]
    fn ll1_analysis_is_idempotent() {
        let grammar = parse("S -> \"a\" B ; B -> \"b\" | epsilon ;").unwrap();
        assert_eq!(analyse_ll1(&grammar), analyse_ll1(&grammar));
    }

    #[test]
    fn llk_analysis_is_idempotent() {
        let grammar = parse("S -> \"a\" \"a\" | \"a\" \"b\" ;").unwrap();
        assert_eq!(
            analyse_llk(&grammar, 2).unwrap(),
            analyse_llk(&grammar, 2).unwrap()
        );
    }

    #[test]
    fn start_symbol_is_the_root() {
        let grammar = parse("A -> \"a\" ; S -> A ;").unwrap();
        let analysis = analyse_ll1(&grammar);
        assert_eq!(analysis.start_symbol(), Some(&EcoString::from("S")));
    }

    #[test]
    fn k_of_one_matches_ll1_on_plain_grammars() {
        let grammar = parse("S -> \"a\" B ; B -> \"b\" | epsilon ;").unwrap();
        let ll1 = analyse_ll1(&grammar);
        let llk = analyse_llk(&grammar, 1).unwrap();

        for (name, first) in &ll1.first {
            let pfirst = &llk.pfirst[name];
            let as_singletons: TermSet = pfirst
                .iter()
                .map(|seq| {
                    seq.first()
                        .cloned()
                        .unwrap_or_default()
                })
                .collect();
            assert_eq!(&as_singletons, first, "FIRST mismatch for {name}");
        }
    }

    #[test]
    fn zero_lookahead_rejected() {
        let grammar = parse("S -> \"a\" ;").unwrap();
        assert_eq!(
            analyse_llk(&grammar, 0),
            Err(GrammarError::InvalidLookahead)
        );
    }
}
