// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Errors produced while lexing and parsing BBNF grammars.
//!
//! Both variants carry a [`Span`] for miette labelling and a pre-computed
//! line/column pair; the `Display` strings are the externally observable
//! diagnostic formats and must not change shape.

use ecow::EcoString;
use miette::Diagnostic;
use thiserror::Error;

use super::{Span, line_column};

/// A fatal error from the BBNF front end.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum ParseError {
    /// The lexer produced an error token: an unrecognised character run,
    /// a bare `-`, or an unterminated literal.
    #[error("Lexer error [ln {line}, col {column}]: unexpected sequence '{sequence}'")]
    InvalidSequence {
        /// 1-based line of the sequence.
        line: usize,
        /// 1-based column of the sequence.
        column: usize,
        /// The unrecognised text.
        sequence: EcoString,
        /// Source location for miette.
        #[label("unrecognised here")]
        span: Span,
    },

    /// The parser met a token that no production allows here.
    #[error("Parse error [ln {line}, col {column}]: unexpected token '{lexeme}' (expecting {expected})")]
    UnexpectedToken {
        /// 1-based line of the token.
        line: usize,
        /// 1-based column of the token.
        column: usize,
        /// The offending token's lexeme.
        lexeme: EcoString,
        /// Description of the expected token class.
        expected: &'static str,
        /// Source location for miette.
        #[label("unexpected token")]
        span: Span,
    },
}

impl ParseError {
    /// Builds an [`ParseError::InvalidSequence`] at `span` in `source`.
    #[must_use]
    pub fn invalid_sequence(source: &str, sequence: EcoString, span: Span) -> Self {
        let (line, column) = line_column(source, span.start());
        Self::InvalidSequence {
            line,
            column,
            sequence,
            span,
        }
    }

    /// Builds an [`ParseError::UnexpectedToken`] at `span` in `source`.
    #[must_use]
    pub fn unexpected_token(
        source: &str,
        lexeme: EcoString,
        expected: &'static str,
        span: Span,
    ) -> Self {
        let (line, column) = line_column(source, span.start());
        Self::UnexpectedToken {
            line,
            column,
            lexeme,
            expected,
            span,
        }
    }
}
