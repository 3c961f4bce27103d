// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The BBNF front end: lexer, tokens, spans and the grammar parser.
//!
//! # Lexical Analysis
//!
//! The [`Lexer`] converts grammar source text into a stream of [`Token`]s,
//! each carrying its location via [`Span`]. The lexer never fails; invalid
//! input becomes [`TokenKind::Error`] tokens which the parser turns into
//! fatal diagnostics.
//!
//! ```
//! use bbnf_core::source_analysis::{Lexer, TokenKind};
//!
//! let tokens: Vec<_> = Lexer::new("S -> \"a\" ;").collect();
//! assert_eq!(tokens.len(), 4); // S, ->, "a", ;
//! ```
//!
//! # Parsing
//!
//! The [`parse`] function turns source text into a
//! [`Grammar`](crate::grammar::Grammar), aborting with a [`ParseError`] on
//! the first lexical or syntactic problem. Errors integrate with miette
//! and render the stable `Parse error [ln L, col C]: …` /
//! `Lexer error [ln L, col C]: …` diagnostic lines.

mod error;
mod lexer;
mod parser;
mod span;
mod token;

#[cfg(test)]
mod lexer_property_tests;

pub use error::ParseError;
pub use lexer::{Lexer, lex, lex_with_eof};
pub use parser::parse;
pub use span::{Span, line_column};
pub use token::{Token, TokenKind};
