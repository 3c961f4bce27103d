// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Token types for BBNF lexical analysis.
//!
//! Each token pairs a [`TokenKind`] with the [`Span`] of its lexeme. Kinds
//! carrying string data use [`EcoString`] so tokens stay cheap to clone.

use ecow::EcoString;

use super::Span;

/// The kind of token, not including source location.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A non-terminal name: `expr`, `stmt_list`
    NonTerm(EcoString),

    /// A terminal string literal: `"while"` (stored without quotes)
    Literal(EcoString),

    /// The empty string, written `epsilon` or `""`
    Epsilon,

    /// The derivation arrow: `->`
    Derive,

    /// Disjunction of rules: `|`
    Disj,

    /// Conjunction of conjuncts: `&`
    Conj,

    /// Negation of a conjunct: `~`
    Neg,

    /// Rule terminator: `;`
    Semicolon,

    /// End of input
    Eof,

    /// An unrecognised character sequence, preserved for diagnostics
    Error(EcoString),
}

impl TokenKind {
    /// Returns `true` if this token can begin a symbol.
    #[must_use]
    pub const fn is_symbol_start(&self) -> bool {
        matches!(self, Self::NonTerm(_) | Self::Literal(_) | Self::Epsilon)
    }

    /// Returns `true` if this token ends a conjunct's symbol sequence
    /// (`&`, `|` or `;`). EOF inside a conjunct is a parse error, not a
    /// terminator.
    #[must_use]
    pub const fn ends_conjunct(&self) -> bool {
        matches!(self, Self::Conj | Self::Disj | Self::Semicolon)
    }

    /// Returns `true` if this is the end-of-input marker.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::Eof)
    }

    /// Returns `true` if this is an error token.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Returns the string content if this token carries one.
    ///
    /// An epsilon token reads as the empty string, matching its meaning.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::NonTerm(s) | Self::Literal(s) | Self::Error(s) => Some(s),
            Self::Epsilon => Some(""),
            _ => None,
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonTerm(s) | Self::Error(s) => write!(f, "{s}"),
            Self::Literal(s) => write!(f, "\"{s}\""),
            Self::Epsilon => write!(f, "epsilon"),
            Self::Derive => write!(f, "->"),
            Self::Disj => write!(f, "|"),
            Self::Conj => write!(f, "&"),
            Self::Neg => write!(f, "~"),
            Self::Semicolon => write!(f, ";"),
            Self::Eof => write!(f, "EOF"),
        }
    }
}

/// A token with its source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns the token's kind.
    #[must_use]
    pub const fn kind(&self) -> &TokenKind {
        &self.kind
    }

    /// Returns the token's source span.
    #[must_use]
    pub const fn span(&self) -> Span {
        self.span
    }

    /// Consumes the token, returning its kind.
    #[must_use]
    pub fn into_kind(self) -> TokenKind {
        self.kind
    }

    /// The lexeme as it should appear in diagnostics.
    #[must_use]
    pub fn lexeme(&self) -> EcoString {
        match self.kind() {
            TokenKind::NonTerm(s) | TokenKind::Error(s) => s.clone(),
            TokenKind::Literal(s) => s.clone(),
            TokenKind::Epsilon => EcoString::new(),
            other => EcoString::from(other.to_string()),
        }
    }
}
