// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Boolean BNF parser generator core.
//!
//! This crate contains the full pipeline behind the `bbnf` tool:
//! - Lexical analysis and parsing of BBNF grammar files
//! - Dependency analysis and topological ordering of non-terminals
//! - FIRST/FOLLOW computation (single-symbol lookahead) and
//!   PFIRST/PFOLLOW computation (k-symbol lookahead) under Boolean
//!   combinators, including negated conjuncts
//! - Predictive parsing-table construction
//! - Emission of a standalone recursive-descent parser with conjunct
//!   validation
//!
//! Boolean BNF extends context-free notation with rule-level
//! conjunction (`&`) and negation (`~`): a rule is an intersection of
//! conjuncts, and a string matches iff every positive conjunct accepts
//! it and every negative conjunct rejects it over the same substring.
//!
//! ```
//! use bbnf_core::analyse::{Algorithm, analyse};
//! use bbnf_core::source_analysis::parse;
//!
//! let grammar = parse("S -> \"a\" S | epsilon ;").unwrap();
//! let analysis = analyse(&grammar, Algorithm::Ll1).unwrap();
//! let parser_source = bbnf_core::codegen::emit(&grammar, &analysis);
//! assert!(parser_source.contains("fn main()"));
//! ```

pub mod analyse;
pub mod codegen;
pub mod grammar;
pub mod report;
pub mod source_analysis;

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::analyse::{Algorithm, Analysis, GrammarError, analyse};
    pub use crate::codegen::emit;
    pub use crate::grammar::{Conjunct, Disjunction, Grammar, Rule, Symbol, SymbolKind};
    pub use crate::source_analysis::{ParseError, Span, parse};
}
