// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Non-terminal dependency analysis.
//!
//! Builds the adjacency list of non-terminal references and orders the
//! non-terminals depth-first, post-order, so that FIRST sets can be
//! computed leaves-first in a single pass. The ordering tolerates cycles
//! (mutually recursive non-terminals); it simply yields some post-order.

use std::collections::{BTreeMap, BTreeSet};

use ecow::EcoString;

use crate::grammar::Grammar;

/// Adjacency list: each non-terminal mapped to the set of non-terminals
/// its rules reference.
pub type References = BTreeMap<EcoString, BTreeSet<EcoString>>;

/// Collects each non-terminal's references.
///
/// Single-symbol-lookahead analysis ignores references inside negative
/// conjuncts; sequence-lookahead analysis includes them (pass
/// `include_negative` accordingly).
#[must_use]
pub fn references(grammar: &Grammar, include_negative: bool) -> References {
    grammar
        .definitions()
        .map(|(name, disjunction)| {
            let mut referenced = BTreeSet::new();
            for rule in disjunction.rules() {
                for conjunct in rule.conjuncts() {
                    if conjunct.is_positive() || include_negative {
                        referenced.extend(conjunct.referenced());
                    }
                }
            }
            (name.clone(), referenced)
        })
        .collect()
}

/// Depth-first post-order over the reference graph.
///
/// Children appear before their parents, so the start symbol (the
/// non-terminal nothing else depends on) comes last. Names referenced but
/// never defined still appear in the order; later stages skip them.
#[must_use]
pub fn topological_order(refs: &References) -> Vec<EcoString> {
    let mut visited = BTreeSet::new();
    let mut order = Vec::new();
    for name in refs.keys() {
        if !visited.contains(name) {
            visit(name, refs, &mut visited, &mut order);
        }
    }
    order
}

fn visit(
    name: &EcoString,
    refs: &References,
    visited: &mut BTreeSet<EcoString>,
    order: &mut Vec<EcoString>,
) {
    visited.insert(name.clone());
    if let Some(children) = refs.get(name) {
        for child in children {
            if !visited.contains(child) {
                visit(child, refs, visited, order);
            }
        }
    }
    order.push(name.clone());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_analysis::parse;

    fn order_of(source: &str, include_negative: bool) -> Vec<EcoString> {
        let grammar = parse(source).unwrap();
        topological_order(&references(&grammar, include_negative))
    }

    #[test]
    fn leaves_come_first() {
        let order = order_of("S -> \"a\" B ; B -> \"b\" | epsilon ;", false);
        assert_eq!(order, vec![EcoString::from("B"), EcoString::from("S")]);
    }

    #[test]
    fn start_symbol_is_last() {
        let order = order_of("A -> \"a\" ; S -> A B ; B -> A \"b\" ;", false);
        assert_eq!(*order.last().unwrap(), EcoString::from("S"));
        assert_eq!(order[0], EcoString::from("A"));
    }

    #[test]
    fn cycles_still_yield_every_non_terminal() {
        let order = order_of("A -> \"a\" B | \"a\" ; B -> \"b\" A | \"b\" ;", false);
        assert_eq!(order.len(), 2);
        assert!(order.contains(&EcoString::from("A")));
        assert!(order.contains(&EcoString::from("B")));
    }

    #[test]
    fn negative_conjuncts_excluded_in_single_lookahead_mode() {
        let grammar = parse("S -> \"a\" & ~ A ; A -> \"a\" ;").unwrap();
        let refs = references(&grammar, false);
        assert!(refs.get("S").unwrap().is_empty());
        let refs = references(&grammar, true);
        assert!(refs.get("S").unwrap().contains("A"));
    }

    #[test]
    fn undefined_references_appear_in_order() {
        let order = order_of("S -> Missing \"x\" ;", false);
        assert_eq!(
            order,
            vec![EcoString::from("Missing"), EcoString::from("S")]
        );
    }

    #[test]
    fn each_non_terminal_visited_once() {
        let order = order_of(
            "S -> A A B ; A -> \"a\" ; B -> A \"b\" ;",
            false,
        );
        assert_eq!(order.len(), 3);
        let unique: BTreeSet<_> = order.iter().collect();
        assert_eq!(unique.len(), 3);
    }
}
