// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for the BBNF lexer.
//!
//! These tests use `proptest` to verify lexer invariants over generated
//! inputs:
//!
//! 1. **Lexer never panics** — arbitrary string input always produces tokens
//! 2. **Token spans within input** — all spans satisfy `end <= input.len()`
//! 3. **Token spans are non-overlapping** — tokens appear in source order
//! 4. **EOF is always last** — `lex_with_eof` always ends with EOF
//! 5. **Lexer is deterministic** — same input always produces same tokens
//! 6. **Valid fragments produce no errors** — known-valid inputs lex cleanly

use proptest::prelude::*;

use super::lexer::{lex, lex_with_eof};

// ============================================================================
// Generators
// ============================================================================

/// Known-valid single-token fragments that should lex without errors.
const VALID_SINGLE_TOKENS: &[&str] = &[
    "S",
    "expr",
    "stmt_list",
    "a1",
    "_x",
    "epsilon",
    "\"a\"",
    "\"while\"",
    "\"\"",
    "\"\\\"\"",
    "->",
    "|",
    "&",
    "~",
    ";",
];

/// Multi-token rule fragments that should lex cleanly.
const VALID_FRAGMENTS: &[&str] = &[
    "S -> \"a\" ;",
    "S -> \"a\" S | epsilon ;",
    "S -> A & B ;",
    "S -> \"a\" \"b\" \"c\" & ~ \"a\" \"b\" \"d\" ;",
    "list -> item \",\" list | item ;",
];

fn valid_single_token() -> impl Strategy<Value = String> {
    prop::sample::select(VALID_SINGLE_TOKENS).prop_map(std::string::ToString::to_string)
}

fn valid_fragment() -> impl Strategy<Value = String> {
    prop::sample::select(VALID_FRAGMENTS).prop_map(std::string::ToString::to_string)
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Property 1: Lexer never panics on arbitrary string input.
    #[test]
    fn lexer_never_panics(input in "\\PC{0,500}") {
        let _tokens = lex(&input);
    }

    /// Property 2: All token spans are within input bounds.
    #[test]
    fn token_spans_within_input(input in "\\PC{0,500}") {
        let tokens = lex_with_eof(&input);
        let input_len = u32::try_from(input.len()).unwrap_or(u32::MAX);
        for token in &tokens {
            let span = token.span();
            prop_assert!(
                span.end() <= input_len,
                "Token {:?} span end {} exceeds input length {} for input {:?}",
                token.kind(),
                span.end(),
                input_len,
                input,
            );
            prop_assert!(
                span.start() <= span.end(),
                "Token {:?} span start {} > end {} for input {:?}",
                token.kind(),
                span.start(),
                span.end(),
                input,
            );
        }
    }

    /// Property 3: Token spans are non-overlapping and ordered.
    #[test]
    fn token_spans_non_overlapping(input in "\\PC{0,500}") {
        let tokens = lex(&input);
        for window in tokens.windows(2) {
            let prev = &window[0];
            let next = &window[1];
            prop_assert!(
                next.span().start() >= prev.span().end(),
                "Overlapping spans: {:?} at {:?} and {:?} at {:?} for input {:?}",
                prev.kind(),
                prev.span(),
                next.kind(),
                next.span(),
                input,
            );
        }
    }

    /// Property 4: lex_with_eof always ends with EOF.
    #[test]
    fn eof_always_last(input in "\\PC{0,500}") {
        let tokens = lex_with_eof(&input);
        prop_assert!(!tokens.is_empty(), "lex_with_eof should never return empty");
        prop_assert!(
            tokens.last().unwrap().kind().is_eof(),
            "Last token should be EOF, got {:?} for input {:?}",
            tokens.last().unwrap().kind(),
            input,
        );
    }

    /// Property 5: Lexer is deterministic — same input, same tokens.
    #[test]
    fn lexer_deterministic(input in "\\PC{0,200}") {
        let tokens1 = lex_with_eof(&input);
        let tokens2 = lex_with_eof(&input);
        prop_assert_eq!(&tokens1, &tokens2, "Tokens differ for input {:?}", input);
    }

    /// Property 6: Known-valid single tokens produce no Error tokens.
    #[test]
    fn valid_tokens_no_errors(input in valid_single_token()) {
        let tokens = lex(&input);
        for token in &tokens {
            prop_assert!(
                !token.kind().is_error(),
                "Valid input {:?} produced error token {:?}",
                input,
                token.kind(),
            );
        }
    }

    /// Property 7: Known-valid rule fragments produce no Error tokens.
    #[test]
    fn valid_fragments_no_errors(input in valid_fragment()) {
        let tokens = lex(&input);
        for token in &tokens {
            prop_assert!(
                !token.kind().is_error(),
                "Valid fragment {:?} produced error token {:?}",
                input,
                token.kind(),
            );
        }
    }

    /// Property 8: Non-whitespace input produces at least one token.
    #[test]
    fn nonempty_input_produces_tokens(input in "[^ \t\n\r]{1,100}") {
        let tokens = lex(&input);
        prop_assert!(
            !tokens.is_empty(),
            "Non-whitespace input {:?} produced zero tokens (excluding EOF)",
            input,
        );
    }
}
