// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Errors detected during grammar analysis.

use ecow::EcoString;
use miette::Diagnostic;
use thiserror::Error;

/// A fatal defect in the grammar itself (as opposed to its syntax).
///
/// The `Display` strings are the externally observable diagnostic lines.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum GrammarError {
    /// A conjunct begins with its own deriving non-terminal, so the
    /// generated parser would recurse without consuming input.
    #[error("Error: grammar contains left recursion in rule for non-terminal {0}")]
    LeftRecursion(EcoString),

    /// The positive conjuncts of a rule have no common first sequence, so
    /// no string can satisfy all of them.
    #[error("Error: conjuncts in rule for non-terminal {0} are contradictory")]
    ContradictoryConjuncts(EcoString),

    /// The requested lookahead length is not a positive integer.
    #[error("Error: lookahead length must be at least 1")]
    InvalidLookahead,
}
