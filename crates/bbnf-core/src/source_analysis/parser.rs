// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Recursive descent parser for BBNF grammar files.
//!
//! The surface syntax, in its own meta-notation:
//!
//! ```text
//! grammar      ::= { disjunction } EOF
//! disjunction  ::= NON_TERM '->' rule { '|' rule } ';'
//! rule         ::= conjunct { '&' conjunct }
//! conjunct     ::= [ '~' ] symbol { symbol }
//! symbol       ::= NON_TERM | LITERAL | EPSILON
//! ```
//!
//! Parsing is fatal on the first error: grammar files are small and
//! hand-maintained, so a single precise diagnostic beats recovery. Every
//! literal terminal is recorded in the grammar's alphabet; explicit
//! epsilon symbols inside multi-symbol conjuncts are dropped as redundant;
//! a later definition of a non-terminal replaces the earlier one.

use ecow::EcoString;

use crate::grammar::{Conjunct, Disjunction, Grammar, Rule, Symbol, SymbolKind};

use super::{ParseError, Token, TokenKind, lex_with_eof};

/// Parses BBNF source text into a [`Grammar`].
///
/// # Errors
///
/// Returns the first lexical or syntactic error, with the offending
/// token's position and the expected token class.
///
/// # Examples
///
/// ```
/// use bbnf_core::source_analysis::parse;
///
/// let grammar = parse("S -> \"a\" S | epsilon ;").unwrap();
/// assert_eq!(grammar.len(), 1);
/// assert!(grammar.alphabet().contains("a"));
/// ```
pub fn parse(source: &str) -> Result<Grammar, ParseError> {
    Parser::new(source).parse_grammar()
}

/// Parser state: the token stream and a cursor into it.
struct Parser<'src> {
    source: &'src str,
    tokens: Vec<Token>,
    position: usize,
    grammar: Grammar,
}

impl<'src> Parser<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            source,
            tokens: lex_with_eof(source),
            position: 0,
            grammar: Grammar::new(),
        }
    }

    /// The token under the cursor. The stream always ends with EOF, so
    /// the cursor never runs past the end.
    fn current(&self) -> &Token {
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    /// Moves past the current token.
    fn bump(&mut self) {
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
    }

    /// Consumes the current token if `predicate` accepts its kind.
    fn eat(&mut self, predicate: impl Fn(&TokenKind) -> bool) -> bool {
        if predicate(self.current().kind()) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Builds the diagnostic for an unexpected current token. Error
    /// tokens surface as lexer errors, everything else as a parse error
    /// naming the expected class.
    fn fail(&self, expected: &'static str) -> ParseError {
        let token = self.current();
        match token.kind() {
            TokenKind::Error(sequence) => {
                ParseError::invalid_sequence(self.source, sequence.clone(), token.span())
            }
            _ => ParseError::unexpected_token(self.source, token.lexeme(), expected, token.span()),
        }
    }

    /// grammar ::= { disjunction } EOF
    fn parse_grammar(mut self) -> Result<Grammar, ParseError> {
        loop {
            let name = match self.current().kind() {
                TokenKind::NonTerm(name) => name.clone(),
                _ => return Err(self.fail("non-terminal")),
            };
            self.bump();

            if !self.eat(|k| matches!(k, TokenKind::Derive)) {
                return Err(self.fail("'->'"));
            }

            let disjunction = self.parse_disjunction()?;
            self.grammar.define(name, disjunction);

            if self.eat(TokenKind::is_eof) {
                return Ok(self.grammar);
            }
        }
    }

    /// disjunction ::= rule { '|' rule } ';'
    fn parse_disjunction(&mut self) -> Result<Disjunction, ParseError> {
        let mut rules = vec![self.parse_rule()?];
        while self.eat(|k| matches!(k, TokenKind::Disj)) {
            rules.push(self.parse_rule()?);
        }
        if !self.eat(|k| matches!(k, TokenKind::Semicolon)) {
            return Err(self.fail("';'"));
        }
        Ok(Disjunction::new(rules))
    }

    /// rule ::= conjunct { '&' conjunct }
    fn parse_rule(&mut self) -> Result<Rule, ParseError> {
        let mut conjuncts = vec![self.parse_conjunct()?];
        while self.eat(|k| matches!(k, TokenKind::Conj)) {
            conjuncts.push(self.parse_conjunct()?);
        }
        Ok(Rule::new(conjuncts))
    }

    /// conjunct ::= [ '~' ] symbol { symbol }
    ///
    /// Symbols accumulate until `&`, `|` or `;`; EOF mid-conjunct is
    /// reported by [`Parser::parse_symbol`] as a missing symbol.
    fn parse_conjunct(&mut self) -> Result<Conjunct, ParseError> {
        let positive = !self.eat(|k| matches!(k, TokenKind::Neg));

        let mut symbols = vec![self.parse_symbol()?];
        while !self.current().kind().ends_conjunct() {
            symbols.push(self.parse_symbol()?);
        }
        Ok(Conjunct::new(positive, symbols))
    }

    /// symbol ::= NON_TERM | LITERAL | EPSILON
    fn parse_symbol(&mut self) -> Result<Symbol, ParseError> {
        let token = self.current().clone();
        let kind = match token.kind() {
            TokenKind::NonTerm(name) => SymbolKind::NonTerminal(name.clone()),
            TokenKind::Literal(text) => {
                self.grammar.record_terminal(text.clone());
                SymbolKind::Terminal(text.clone())
            }
            TokenKind::Epsilon => {
                self.grammar.record_terminal(EcoString::new());
                SymbolKind::Epsilon
            }
            _ => return Err(self.fail("non-terminal or literal")),
        };
        self.bump();
        Ok(Symbol::new(kind, token.span()))
    }
}
