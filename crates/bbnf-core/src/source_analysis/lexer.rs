// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lexical analysis for BBNF grammar files.
//!
//! Converts grammar source text into a stream of [`Token`]s. The lexer is
//! hand-written and never fails: unrecognised characters, a bare `-`, and
//! unterminated literals all become [`TokenKind::Error`] tokens which the
//! parser reports as fatal diagnostics.
//!
//! # Example
//!
//! ```
//! use bbnf_core::source_analysis::{Lexer, TokenKind};
//!
//! let tokens: Vec<_> = Lexer::new("S -> \"a\" ;").collect();
//! assert_eq!(tokens.len(), 4); // S, ->, "a", ;
//! ```

use std::iter::Peekable;
use std::str::CharIndices;

use ecow::EcoString;

use super::{Span, Token, TokenKind};

/// A lexer that tokenizes BBNF grammar source.
///
/// Implements [`Iterator`]; the iterator ends before the EOF token, which
/// [`lex_with_eof`] appends for parser consumption.
pub struct Lexer<'src> {
    /// The source text being lexed.
    source: &'src str,
    /// Character iterator with byte positions.
    chars: Peekable<CharIndices<'src>>,
    /// Current byte position in source.
    position: usize,
}

impl std::fmt::Debug for Lexer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexer")
            .field("position", &self.position)
            .field("remaining", &self.source.get(self.position..).unwrap_or(""))
            .finish()
    }
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given source text.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            position: 0,
        }
    }

    /// Peeks at the next character without consuming it.
    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    /// Consumes the next character and returns it.
    fn advance(&mut self) -> Option<char> {
        let (pos, c) = self.chars.next()?;
        self.position = pos + c.len_utf8();
        Some(c)
    }

    /// Consumes characters while the predicate is true.
    fn advance_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.peek_char().is_some_and(&predicate) {
            self.advance();
        }
    }

    /// Returns the current byte position.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "grammar files over 4GB are not supported"
    )]
    fn current_position(&self) -> u32 {
        self.position as u32
    }

    /// Creates a span from start to current position.
    fn span_from(&self, start: u32) -> Span {
        Span::new(start, self.current_position())
    }

    /// Extracts source text for a span.
    fn text_for(&self, span: Span) -> &'src str {
        &self.source[span.as_range()]
    }

    /// Lexes the next token, or `None` at end of input.
    fn lex_token(&mut self) -> Option<Token> {
        self.advance_while(char::is_whitespace);

        let start = self.current_position();
        let c = self.peek_char()?;

        let kind = match c {
            '"' => self.lex_literal(),
            'a'..='z' | 'A'..='Z' | '0'..='9' | '_' => self.lex_identifier(start),
            '-' => self.lex_derive(start),
            '|' => {
                self.advance();
                TokenKind::Disj
            }
            '&' => {
                self.advance();
                TokenKind::Conj
            }
            '~' => {
                self.advance();
                TokenKind::Neg
            }
            ';' => {
                self.advance();
                TokenKind::Semicolon
            }
            _ => {
                self.advance();
                TokenKind::Error(EcoString::from(self.text_for(self.span_from(start))))
            }
        };

        Some(Token::new(kind, self.span_from(start)))
    }

    /// Lexes a string literal: `"…"` with `\"` escaping a quote.
    ///
    /// The empty literal `""` denotes epsilon. A literal left open at end
    /// of input becomes an error token covering the rest of the source.
    fn lex_literal(&mut self) -> TokenKind {
        let open = self.current_position();
        self.advance(); // opening "

        let mut value = EcoString::new();
        loop {
            match self.advance() {
                None => {
                    return TokenKind::Error(EcoString::from(self.text_for(self.span_from(open))));
                }
                Some('"') => break,
                Some('\\') if self.peek_char() == Some('"') => {
                    self.advance();
                    value.push('"');
                }
                Some(c) => value.push(c),
            }
        }

        if value.is_empty() {
            TokenKind::Epsilon
        } else {
            TokenKind::Literal(value)
        }
    }

    /// Lexes an identifier: letters, digits and underscores.
    ///
    /// The identifier `epsilon` is the keyword for the empty string.
    fn lex_identifier(&mut self, start: u32) -> TokenKind {
        self.advance_while(|c| c.is_ascii_alphanumeric() || c == '_');
        let text = self.text_for(self.span_from(start));
        if text == "epsilon" {
            TokenKind::Epsilon
        } else {
            TokenKind::NonTerm(EcoString::from(text))
        }
    }

    /// Lexes `->`. A bare `-` is not a token of the language.
    fn lex_derive(&mut self, start: u32) -> TokenKind {
        self.advance(); // -
        if self.peek_char() == Some('>') {
            self.advance();
            TokenKind::Derive
        } else {
            TokenKind::Error(EcoString::from(self.text_for(self.span_from(start))))
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.lex_token()
    }
}

/// Tokenizes `source` without the trailing EOF token.
#[must_use]
pub fn lex(source: &str) -> Vec<Token> {
    Lexer::new(source).collect()
}

/// Tokenizes `source`, appending an EOF token for parser consumption.
#[must_use]
pub fn lex_with_eof(source: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(source);
    let mut tokens: Vec<Token> = lexer.by_ref().collect();
    let end = lexer.current_position();
    tokens.push(Token::new(TokenKind::Eof, Span::new(end, end)));
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source).map(Token::into_kind).collect()
    }

    #[test]
    fn lex_punctuation() {
        assert_eq!(
            kinds("-> | & ~ ;"),
            vec![
                TokenKind::Derive,
                TokenKind::Disj,
                TokenKind::Conj,
                TokenKind::Neg,
                TokenKind::Semicolon,
            ]
        );
    }

    #[test]
    fn lex_simple_rule() {
        assert_eq!(
            kinds("S -> \"a\" S | epsilon ;"),
            vec![
                TokenKind::NonTerm("S".into()),
                TokenKind::Derive,
                TokenKind::Literal("a".into()),
                TokenKind::NonTerm("S".into()),
                TokenKind::Disj,
                TokenKind::Epsilon,
                TokenKind::Semicolon,
            ]
        );
    }

    #[test]
    fn lex_identifier_with_digits_and_underscores() {
        assert_eq!(
            kinds("expr_2"),
            vec![TokenKind::NonTerm("expr_2".into())]
        );
    }

    #[test]
    fn empty_literal_is_epsilon() {
        assert_eq!(kinds("\"\""), vec![TokenKind::Epsilon]);
    }

    #[test]
    fn epsilon_keyword() {
        assert_eq!(kinds("epsilon"), vec![TokenKind::Epsilon]);
        // Not a prefix match: `epsilons` is an ordinary non-terminal.
        assert_eq!(
            kinds("epsilons"),
            vec![TokenKind::NonTerm("epsilons".into())]
        );
    }

    #[test]
    fn escaped_quote_in_literal() {
        assert_eq!(
            kinds(r#""say \"hi\"""#),
            vec![TokenKind::Literal("say \"hi\"".into())]
        );
    }

    #[test]
    fn backslash_without_quote_is_literal_backslash() {
        assert_eq!(
            kinds(r#""a\b""#),
            vec![TokenKind::Literal("a\\b".into())]
        );
    }

    #[test]
    fn bare_dash_is_error() {
        assert_eq!(kinds("- >"), vec![
            TokenKind::Error("-".into()),
            TokenKind::Error(">".into()),
        ]);
    }

    #[test]
    fn unterminated_literal_is_error() {
        assert_eq!(
            kinds("\"abc"),
            vec![TokenKind::Error("\"abc".into())]
        );
    }

    #[test]
    fn unknown_character_is_error() {
        assert_eq!(kinds("?"), vec![TokenKind::Error("?".into())]);
    }

    #[test]
    fn newlines_are_skipped() {
        assert_eq!(
            kinds("S\n->\r\n\"a\"\t;"),
            vec![
                TokenKind::NonTerm("S".into()),
                TokenKind::Derive,
                TokenKind::Literal("a".into()),
                TokenKind::Semicolon,
            ]
        );
    }

    #[test]
    fn spans_point_at_lexemes() {
        let tokens: Vec<_> = Lexer::new("S -> \"ab\" ;").collect();
        assert_eq!(tokens[0].span(), Span::new(0, 1));
        assert_eq!(tokens[1].span(), Span::new(2, 4));
        assert_eq!(tokens[2].span(), Span::new(5, 9));
        assert_eq!(tokens[3].span(), Span::new(10, 11));
    }

    #[test]
    fn lex_with_eof_appends_terminator() {
        let tokens = lex_with_eof("S");
        assert_eq!(tokens.len(), 2);
        assert!(tokens[1].kind().is_eof());
        assert_eq!(tokens[1].span(), Span::new(1, 1));
    }

    #[test]
    fn empty_input_is_just_eof() {
        let tokens = lex_with_eof("");
        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].kind().is_eof());
    }
}
