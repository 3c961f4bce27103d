// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The BBNF grammar AST.
//!
//! A grammar maps each non-terminal name to a [`Disjunction`] of
//! [`Rule`]s; a rule is an intersection of [`Conjunct`]s; a conjunct is a
//! sequence of [`Symbol`]s, positive or negated. Non-terminal references
//! are by name, resolved through the grammar map — mutually recursive
//! grammars therefore need no cyclic ownership.
//!
//! The AST is immutable once built. All analysis results (FIRST/FOLLOW
//! sets, nullability, parsing tables) live in side tables owned by the
//! analyser, keyed by non-terminal name and rule/conjunct index.

use std::collections::{BTreeMap, BTreeSet};

use ecow::EcoString;

use crate::source_analysis::Span;

/// What a symbol stands for: a terminal string, a reference to another
/// non-terminal, or the empty string.
///
/// Epsilon is distinct from a terminal whose lexeme is empty; the lexer
/// never produces the latter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// A literal terminal string drawn from the grammar's alphabet.
    Terminal(EcoString),
    /// A reference to a non-terminal, by name.
    NonTerminal(EcoString),
    /// The empty string.
    Epsilon,
}

/// One symbol in a conjunct, with the source position of its lexeme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    kind: SymbolKind,
    span: Span,
}

impl Symbol {
    /// Creates a new symbol.
    #[must_use]
    pub const fn new(kind: SymbolKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns the symbol's kind.
    #[must_use]
    pub const fn kind(&self) -> &SymbolKind {
        &self.kind
    }

    /// Returns the symbol's source span.
    #[must_use]
    pub const fn span(&self) -> Span {
        self.span
    }

    /// Returns the referenced non-terminal name, if this is a reference.
    #[must_use]
    pub fn as_non_terminal(&self) -> Option<&EcoString> {
        match &self.kind {
            SymbolKind::NonTerminal(name) => Some(name),
            _ => None,
        }
    }

    /// Returns `true` for the epsilon symbol.
    #[must_use]
    pub const fn is_epsilon(&self) -> bool {
        matches!(self.kind, SymbolKind::Epsilon)
    }
}

/// A conjunct: an ordered sequence of symbols, positive or negated.
///
/// Invariants maintained by the parser: a conjunct holds at least one
/// symbol, and a multi-symbol conjunct contains no epsilon symbols (they
/// are redundant in a sequence and are dropped at parse time). A conjunct
/// consisting solely of epsilon denotes the empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conjunct {
    positive: bool,
    symbols: Vec<Symbol>,
}

impl Conjunct {
    /// Creates a conjunct, dropping redundant epsilon symbols from
    /// multi-symbol sequences.
    #[must_use]
    pub fn new(positive: bool, mut symbols: Vec<Symbol>) -> Self {
        if symbols.len() > 1 {
            symbols.retain(|s| !s.is_epsilon());
        }
        Self { positive, symbols }
    }

    /// Returns `true` for a positive conjunct, `false` for a negated one.
    #[must_use]
    pub const fn is_positive(&self) -> bool {
        self.positive
    }

    /// Returns the conjunct's symbol sequence.
    #[must_use]
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Returns the names of non-terminals referenced by this conjunct.
    #[must_use]
    pub fn referenced(&self) -> BTreeSet<EcoString> {
        self.symbols
            .iter()
            .filter_map(|s| s.as_non_terminal().cloned())
            .collect()
    }
}

/// A rule: the intersection of one or more conjuncts.
///
/// A string matches the rule iff every positive conjunct accepts it and
/// every negative conjunct rejects it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    conjuncts: Vec<Conjunct>,
}

impl Rule {
    /// Creates a rule from its conjuncts.
    #[must_use]
    pub fn new(conjuncts: Vec<Conjunct>) -> Self {
        debug_assert!(!conjuncts.is_empty());
        Self { conjuncts }
    }

    /// Returns the rule's conjuncts.
    #[must_use]
    pub fn conjuncts(&self) -> &[Conjunct] {
        &self.conjuncts
    }
}

/// A disjunction: the union of the rules a non-terminal derives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disjunction {
    rules: Vec<Rule>,
}

impl Disjunction {
    /// Creates a disjunction from its rules.
    #[must_use]
    pub fn new(rules: Vec<Rule>) -> Self {
        debug_assert!(!rules.is_empty());
        Self { rules }
    }

    /// Returns the disjunction's rules.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

/// A parsed BBNF grammar: the non-terminal definitions plus the alphabet
/// of terminal strings observed while parsing.
///
/// Definitions iterate in name order (the map is a `BTreeMap`), which the
/// stable report format relies on. The alphabet contains every literal
/// lexeme, plus the empty string once any epsilon symbol has been seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grammar {
    disjunctions: BTreeMap<EcoString, Disjunction>,
    alphabet: BTreeSet<EcoString>,
}

impl Grammar {
    /// Creates an empty grammar.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines (or redefines) a non-terminal. A later definition of the
    /// same name replaces the earlier one.
    pub fn define(&mut self, name: EcoString, disjunction: Disjunction) {
        self.disjunctions.insert(name, disjunction);
    }

    /// Records a terminal (or, for epsilon, the empty string) in the
    /// alphabet.
    pub fn record_terminal(&mut self, terminal: EcoString) {
        self.alphabet.insert(terminal);
    }

    /// Returns the disjunction for a non-terminal, if defined.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Disjunction> {
        self.disjunctions.get(name)
    }

    /// Iterates definitions in non-terminal name order.
    pub fn definitions(&self) -> impl Iterator<Item = (&EcoString, &Disjunction)> {
        self.disjunctions.iter()
    }

    /// Returns the set of terminal strings used by the grammar.
    #[must_use]
    pub const fn alphabet(&self) -> &BTreeSet<EcoString> {
        &self.alphabet
    }

    /// Returns the number of defined non-terminals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.disjunctions.len()
    }

    /// Returns `true` if no non-terminal is defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.disjunctions.is_empty()
    }
}
