// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Terminal-sequence sets for k-symbol lookahead.
//!
//! A [`Sequence`] is a run of terminal lexemes of length at most k. The
//! empty sequence denotes epsilon (the nullable marker), so epsilon
//! stripping and collapse fall out of ordinary concatenation: appending
//! nothing changes nothing, and a concatenation of two epsilons is still
//! the empty sequence.

use std::collections::BTreeSet;

use ecow::EcoString;

/// A lookahead sequence: terminal lexemes, shortest first. Empty means
/// epsilon.
pub type Sequence = Vec<EcoString>;

/// An ordered set of lookahead sequences.
pub type SequenceSet = BTreeSet<Sequence>;

/// The set containing only the empty sequence — the identity of
/// [`concat`].
#[must_use]
pub fn epsilon() -> SequenceSet {
    BTreeSet::from([Sequence::new()])
}

/// The set containing the single one-terminal sequence `[t]`.
#[must_use]
pub fn unit(terminal: &EcoString) -> SequenceSet {
    BTreeSet::from([vec![terminal.clone()]])
}

/// Pairwise concatenation truncated to `k` symbols:
/// `{ trunc_k(a ++ b) | a ∈ A, b ∈ B }`.
///
/// Concatenating with the empty set yields the empty set; concatenating
/// with `{ε}` is the identity.
#[must_use]
pub fn concat(a: &SequenceSet, b: &SequenceSet, k: usize) -> SequenceSet {
    let mut out = SequenceSet::new();
    for x in a {
        for y in b {
            let mut seq = x.clone();
            seq.extend(y.iter().cloned());
            seq.truncate(k);
            out.insert(seq);
        }
    }
    out
}

/// Closed-form expansion for self-recursive non-terminals: k rounds of
/// `acc ← concat(acc ∪ {ε}, acc, k)`.
///
/// This captures k levels of recursion without computing a fixed point;
/// the result is stable because sequences are truncated to length k.
#[must_use]
pub fn self_expand(set: &SequenceSet, k: usize) -> SequenceSet {
    let mut acc = set.clone();
    for _ in 0..k {
        let mut with_epsilon = acc.clone();
        with_epsilon.insert(Sequence::new());
        acc = concat(&with_epsilon, &acc, k);
    }
    acc
}

/// Every sequence of length ≤ k over the non-empty terminals of
/// `alphabet`, including the empty sequence.
///
/// This is the lookahead set of an unconstrained rule (one with no
/// positive conjuncts). Exponential in k; computed only when such a rule
/// exists.
#[must_use]
pub fn bounded_alphabet(alphabet: &BTreeSet<EcoString>, k: usize) -> SequenceSet {
    let terminals: Vec<&EcoString> = alphabet.iter().filter(|t| !t.is_empty()).collect();
    let mut out = SequenceSet::new();
    out.insert(Sequence::new());
    let mut frontier = vec![Sequence::new()];
    for _ in 0..k {
        let mut next = Vec::with_capacity(frontier.len() * terminals.len());
        for seq in &frontier {
            for t in &terminals {
                let mut longer = seq.clone();
                longer.push((*t).clone());
                out.insert(longer.clone());
                next.push(longer);
            }
        }
        frontier = next;
    }
    out
}

/// Flattens a sequence to its table key: the terminal lexemes joined
/// without a separator. The empty sequence stringifies to `""`.
#[must_use]
pub fn stringify(seq: &Sequence) -> String {
    seq.iter().map(EcoString::as_str).collect()
}
