// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! PFIRST / PFOLLOW computation for k-symbol lookahead.
//!
//! The sequence analogues of FIRST and FOLLOW: sets of terminal
//! sequences of length ≤ k, with the empty sequence marking nullability.
//! PFIRST runs in topological order, PFOLLOW in reverse topological
//! order, like their single-symbol counterparts.
//!
//! Self-recursion is handled without a fixed point: when a conjunct
//! references its own deriving non-terminal, the partial accumulator is
//! expanded k times (see [`sequences::self_expand`]), which captures k
//! levels of recursion exactly because sequences are truncated at k.
//! A conjunct *beginning* with its deriving non-terminal is left
//! recursion and is rejected — the expansion trick (and the generated
//! parser) cannot make progress there.

use std::collections::BTreeMap;

use ecow::EcoString;

use crate::grammar::{Conjunct, Grammar, SymbolKind};

use super::sequences::{self, SequenceSet};
use super::{GrammarError, RuleKey};

/// PFIRST/PFOLLOW sets plus the per-rule cache the table builder reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PredictiveSets {
    /// PFIRST set per non-terminal.
    pub pfirst: BTreeMap<EcoString, SequenceSet>,
    /// PFIRST set per rule.
    pub rule_pfirst: BTreeMap<RuleKey, SequenceSet>,
    /// PFOLLOW set per non-terminal.
    pub pfollow: BTreeMap<EcoString, SequenceSet>,
}

/// Computes PFIRST and PFOLLOW for every defined non-terminal.
///
/// # Errors
///
/// Rejects left-recursive conjuncts and rules whose positive conjuncts
/// share no first sequence.
pub fn compute(
    grammar: &Grammar,
    order: &[EcoString],
    k: usize,
) -> Result<PredictiveSets, GrammarError> {
    let mut sets = PredictiveSets::default();
    compute_pfirst(grammar, order, k, &mut sets)?;
    compute_pfollow(grammar, order, k, &mut sets);
    Ok(sets)
}

fn compute_pfirst(
    grammar: &Grammar,
    order: &[EcoString],
    k: usize,
    sets: &mut PredictiveSets,
) -> Result<(), GrammarError> {
    for name in order {
        let Some(disjunction) = grammar.get(name) else {
            continue;
        };

        let mut nt_pfirst = SequenceSet::new();
        for (rule_index, rule) in disjunction.rules().iter().enumerate() {
            for conjunct in rule.conjuncts() {
                reject_left_recursion(name, conjunct)?;
            }

            // Intersection over positive conjuncts; a rule with none is
            // unconstrained and falls back to the bounded alphabet.
            let mut intersection: Option<SequenceSet> = None;
            for conjunct in rule.conjuncts().iter().filter(|c| c.is_positive()) {
                let conj_pfirst = conjunct_pfirst(name, conjunct, &sets.pfirst, k);
                intersection = Some(match intersection {
                    None => conj_pfirst,
                    Some(prev) => prev.intersection(&conj_pfirst).cloned().collect(),
                });
            }

            let rule_pfirst = match intersection {
                None => sequences::bounded_alphabet(grammar.alphabet(), k),
                Some(set) if set.is_empty() => {
                    return Err(GrammarError::ContradictoryConjuncts(name.clone()));
                }
                Some(set) => set,
            };

            nt_pfirst.extend(rule_pfirst.iter().cloned());
            sets.rule_pfirst
                .insert((name.clone(), rule_index), rule_pfirst);
        }
        sets.pfirst.insert(name.clone(), nt_pfirst);
    }
    Ok(())
}

/// A conjunct may not begin with its own deriving non-terminal, positive
/// or negative: the parser for it would recurse without consuming input.
fn reject_left_recursion(deriving: &EcoString, conjunct: &Conjunct) -> Result<(), GrammarError> {
    if conjunct
        .symbols()
        .first()
        .and_then(crate::grammar::Symbol::as_non_terminal)
        == Some(deriving)
    {
        return Err(GrammarError::LeftRecursion(deriving.clone()));
    }
    Ok(())
}

/// PFIRST of a positive conjunct: fold truncated concatenation over the
/// symbols, left to right.
///
/// A reference to the deriving non-terminal itself (past the first
/// position) self-expands the accumulator. A reference whose PFIRST is
/// not yet available — a cycle through another non-terminal — stops the
/// fold, keeping what has accumulated so far.
fn conjunct_pfirst(
    deriving: &EcoString,
    conjunct: &Conjunct,
    pfirst: &BTreeMap<EcoString, SequenceSet>,
    k: usize,
) -> SequenceSet {
    let mut acc = sequences::epsilon();
    for symbol in conjunct.symbols() {
        match symbol.kind() {
            SymbolKind::Epsilon => {}
            SymbolKind::Terminal(t) => {
                acc = sequences::concat(&acc, &sequences::unit(t), k);
            }
            SymbolKind::NonTerminal(m) if m == deriving => {
                acc = sequences::self_expand(&acc, k);
            }
            SymbolKind::NonTerminal(m) => match pfirst.get(m) {
                Some(set) if !set.is_empty() => {
                    acc = sequences::concat(&acc, set, k);
                }
                _ => break,
            },
        }
    }
    acc
}

fn compute_pfollow(grammar: &Grammar, order: &[EcoString], k: usize, sets: &mut PredictiveSets) {
    for (index, name) in order.iter().rev().enumerate() {
        if index == 0 {
            // Only end of input may follow the start symbol.
            sets.pfollow.insert(name.clone(), sequences::epsilon());
        }

        let Some(disjunction) = grammar.get(name) else {
            continue;
        };
        for rule in disjunction.rules() {
            for conjunct in rule.conjuncts() {
                pfollow_add(name, conjunct, k, sets);
            }
        }
    }
}

/// Adds PFOLLOW contributions for every non-terminal occurrence in one
/// conjunct of `deriving`'s disjunction.
fn pfollow_add(deriving: &EcoString, conjunct: &Conjunct, k: usize, sets: &mut PredictiveSets) {
    let symbols = conjunct.symbols();
    for (index, symbol) in symbols.iter().enumerate() {
        let Some(current) = symbol.as_non_terminal() else {
            continue;
        };

        // Fold the suffix into a partial follow set.
        let mut partial = sequences::epsilon();
        for next in &symbols[index + 1..] {
            match next.kind() {
                SymbolKind::Terminal(t) => {
                    partial = sequences::concat(&partial, &sequences::unit(t), k);
                }
                SymbolKind::NonTerminal(m) => {
                    let next_pfirst = sets.pfirst.get(m).cloned().unwrap_or_default();
                    partial = sequences::concat(&partial, &next_pfirst, k);
                }
                SymbolKind::Epsilon => {}
            }
        }

        partial = if current == deriving {
            sequences::self_expand(&partial, k)
        } else {
            let deriving_follow = sets
                .pfollow
                .get(deriving)
                .cloned()
                .unwrap_or_else(sequences::epsilon);
            sequences::concat(&partial, &deriving_follow, k)
        };

        sets.pfollow
            .entry(current.clone())
            .or_default()
            .extend(partial);
    }
}
