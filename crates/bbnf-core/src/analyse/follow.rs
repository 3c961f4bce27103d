// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! FOLLOW set computation for single-symbol lookahead.
//!
//! Non-terminals are processed in reverse topological order (start symbol
//! first) so the deriving non-terminal's FOLLOW is already populated when
//! its references consult it at end of conjunct. The start symbol's FOLLOW
//! is seeded with the empty string (end of input).
//!
//! Negative conjuncts contribute FOLLOW information like positive ones: a
//! conjunct that rejects strings still places its non-terminals in
//! syntactic positions whose context matters.

use std::collections::BTreeMap;

use ecow::EcoString;

use crate::grammar::{Conjunct, Grammar, SymbolKind};

use super::TermSet;
use super::first::FirstSets;

/// Computes FOLLOW sets for the non-terminals of `grammar`.
///
/// `order` is the topological order from dependency analysis; FIRST sets
/// must already be complete.
#[must_use]
pub fn compute(
    grammar: &Grammar,
    order: &[EcoString],
    first_sets: &FirstSets,
) -> BTreeMap<EcoString, TermSet> {
    let mut follow: BTreeMap<EcoString, TermSet> = BTreeMap::new();

    for (index, name) in order.iter().rev().enumerate() {
        if index == 0 {
            // The start symbol may be followed only by end of input.
            follow
                .entry(name.clone())
                .or_default()
                .insert(EcoString::new());
        }

        let Some(disjunction) = grammar.get(name) else {
            continue;
        };
        for rule in disjunction.rules() {
            for conjunct in rule.conjuncts() {
                follow_add(&first_sets.first, &mut follow, name, conjunct);
            }
        }
    }

    follow
}

/// Adds FOLLOW contributions for every non-terminal occurrence in one
/// conjunct of `deriving`'s disjunction.
fn follow_add(
    first: &BTreeMap<EcoString, TermSet>,
    follow: &mut BTreeMap<EcoString, TermSet>,
    deriving: &EcoString,
    conjunct: &Conjunct,
) {
    let symbols = conjunct.symbols();
    for (index, symbol) in symbols.iter().enumerate() {
        let Some(current) = symbol.as_non_terminal() else {
            continue;
        };
        follow.entry(current.clone()).or_default();

        // Scan rightwards, adding FIRSTs until a non-nullable symbol.
        let mut non_nullable_found = false;
        for next in &symbols[index + 1..] {
            match next.kind() {
                SymbolKind::Terminal(t) => {
                    follow.entry(current.clone()).or_default().insert(t.clone());
                    non_nullable_found = true;
                }
                SymbolKind::NonTerminal(m) => {
                    let next_first = first.get(m).cloned().unwrap_or_default();
                    let nullable = next_first.contains("");
                    follow.entry(current.clone()).or_default().extend(next_first);
                    if !nullable {
                        non_nullable_found = true;
                    }
                }
                SymbolKind::Epsilon => {}
            }
            if non_nullable_found {
                break;
            }
        }

        // Ran off the end: everything that follows the deriving
        // non-terminal can follow this one. Self-propagation (C == N)
        // would be a no-op and is skipped.
        if !non_nullable_found && deriving != current {
            let deriving_follow = follow.get(deriving).cloned().unwrap_or_default();
            follow
                .entry(current.clone())
                .or_default()
                .extend(deriving_follow);
        }
    }
}
