// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Predictive parsing-table construction.
//!
//! Single-symbol mode maps `(non-terminal, terminal)` to the rule to
//! apply. Sequence mode numbers every rule and maps
//! `(non-terminal, stringified lookahead sequence)` to a rule id, keeping
//! the un-stringified sequences around for the code emitter.
//!
//! Conflicts are not reported in either mode: a later rule overwrites an
//! earlier one in the same cell, i.e. the grammar is assumed to be LL for
//! the chosen lookahead.

use std::collections::BTreeMap;

use ecow::EcoString;

use crate::grammar::Grammar;

use super::first::FirstSets;
use super::predictive::PredictiveSets;
use super::sequences::{self, SequenceSet};
use super::{RuleKey, TermSet};

/// The single-symbol parsing table: `(non-terminal, terminal) → rule`.
pub type Ll1Table = BTreeMap<(EcoString, EcoString), RuleKey>;

/// Builds the single-symbol parsing table.
///
/// A rule lands in cell `(N, t)` iff `t` is in the rule's FIRST set, or
/// the rule is nullable and `t` is in FOLLOW(N).
#[must_use]
pub fn build_ll1(
    grammar: &Grammar,
    first_sets: &FirstSets,
    follow: &BTreeMap<EcoString, TermSet>,
) -> Ll1Table {
    let mut table = Ll1Table::new();
    let empty = TermSet::new();

    for (name, disjunction) in grammar.definitions() {
        let nt_follow = follow.get(name).unwrap_or(&empty);
        for rule_index in 0..disjunction.rules().len() {
            let key: RuleKey = (name.clone(), rule_index);
            let rule_first = &first_sets.rule_first[&key];
            let nullable = first_sets.rule_nullable[&key];

            for terminal in grammar.alphabet() {
                if rule_first.contains(terminal) || (nullable && nt_follow.contains(terminal)) {
                    table.insert((name.clone(), terminal.clone()), key.clone());
                }
            }
        }
    }
    table
}

/// The sequence-lookahead parsing table with its rule numbering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LlkTable {
    /// Rule id → rule, in definition order.
    pub rules: Vec<RuleKey>,
    /// `(non-terminal, stringified sequence) → rule id`.
    pub table: BTreeMap<(EcoString, String), usize>,
    /// The lookahead sequences selecting each rule, un-stringified for
    /// the code emitter.
    pub rule_lookaheads: BTreeMap<RuleKey, SequenceSet>,
}

/// Builds the sequence-lookahead parsing table.
///
/// Each rule's selecting sequences are
/// `concat(PFIRST(rule), PFOLLOW(N), k)`.
#[must_use]
pub fn build_llk(grammar: &Grammar, predictive: &PredictiveSets, k: usize) -> LlkTable {
    let mut result = LlkTable::default();

    for (name, disjunction) in grammar.definitions() {
        let nt_pfollow = predictive
            .pfollow
            .get(name)
            .cloned()
            .unwrap_or_else(sequences::epsilon);

        for rule_index in 0..disjunction.rules().len() {
            let key: RuleKey = (name.clone(), rule_index);
            let id = result.rules.len();
            result.rules.push(key.clone());

            let lookaheads = sequences::concat(&predictive.rule_pfirst[&key], &nt_pfollow, k);
            for seq in &lookaheads {
                result
                    .table
                    .insert((name.clone(), sequences::stringify(seq)), id);
            }
            result.rule_lookaheads.insert(key, lookaheads);
        }
    }
    result
}
