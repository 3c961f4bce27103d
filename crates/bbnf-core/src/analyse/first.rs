// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! FIRST set computation for single-symbol lookahead.
//!
//! Sets contain terminal strings; the empty string marks nullability.
//! Non-terminals are processed in topological order (leaves first), so a
//! referenced non-terminal's set is already complete when consulted —
//! no fixed point is needed for grammars that are not left recursive.
//!
//! Boolean combinators: a rule's FIRST is the alphabet-restricted
//! intersection of its positive conjuncts' FIRST sets (a negative
//! conjunct contributes the entire alphabet, so it never constrains
//! FIRST); a disjunction's FIRST is the union of its rules' sets.

use std::collections::BTreeMap;

use ecow::EcoString;

use crate::grammar::{Conjunct, Grammar, SymbolKind};

use super::{ConjunctKey, RuleKey, TermSet};

/// FIRST sets plus the per-rule and per-conjunct caches the later stages
/// (FOLLOW, table construction) read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FirstSets {
    /// FIRST set per non-terminal.
    pub first: BTreeMap<EcoString, TermSet>,
    /// FIRST set per rule.
    pub rule_first: BTreeMap<RuleKey, TermSet>,
    /// Whether every conjunct of the rule is nullable.
    pub rule_nullable: BTreeMap<RuleKey, bool>,
    /// Whether the conjunct derives the empty string.
    pub conj_nullable: BTreeMap<ConjunctKey, bool>,
}

/// Computes FIRST sets for every defined non-terminal in `order`.
///
/// Names in `order` with no definition are skipped; they read as empty
/// sets downstream.
#[must_use]
pub fn compute(grammar: &Grammar, order: &[EcoString]) -> FirstSets {
    let mut sets = FirstSets::default();

    for name in order {
        let Some(disjunction) = grammar.get(name) else {
            continue;
        };

        let mut nt_first = TermSet::new();
        for (rule_index, rule) in disjunction.rules().iter().enumerate() {
            // Intersection starts from the whole alphabet and narrows.
            let mut rule_first: TermSet = grammar.alphabet().clone();
            let mut rule_nullable = true;

            for (conj_index, conjunct) in rule.conjuncts().iter().enumerate() {
                let (conj_first, nullable) = conjunct_first(grammar, &sets.first, conjunct);
                sets.conj_nullable
                    .insert((name.clone(), rule_index, conj_index), nullable);
                rule_nullable &= nullable;
                rule_first.retain(|t| conj_first.contains(t));
            }

            nt_first.extend(rule_first.iter().cloned());
            sets.rule_first.insert((name.clone(), rule_index), rule_first);
            sets.rule_nullable
                .insert((name.clone(), rule_index), rule_nullable);
        }
        sets.first.insert(name.clone(), nt_first);
    }

    sets
}

/// FIRST of a single conjunct, with its nullability.
///
/// A negative conjunct matches the complement of a language, so its FIRST
/// is the entire alphabet and it counts as nullable. A positive conjunct
/// scans its symbols left to right, accumulating FIRST contributions until
/// a non-nullable symbol is reached.
fn conjunct_first(
    grammar: &Grammar,
    first: &BTreeMap<EcoString, TermSet>,
    conjunct: &Conjunct,
) -> (TermSet, bool) {
    if !conjunct.is_positive() {
        return (grammar.alphabet().clone(), true);
    }

    let mut firsts = TermSet::new();
    for symbol in conjunct.symbols() {
        match symbol.kind() {
            // Epsilon only occurs alone in a conjunct.
            SymbolKind::Epsilon => {
                firsts.insert(EcoString::new());
                return (firsts, true);
            }
            SymbolKind::Terminal(t) => {
                firsts.insert(t.clone());
                return (firsts, false);
            }
            SymbolKind::NonTerminal(m) => {
                let sub = first.get(m).cloned().unwrap_or_default();
                let nullable = sub.contains("");
                firsts.extend(sub);
                if !nullable {
                    return (firsts, false);
                }
            }
        }
    }
    (firsts, true)
}
