// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Parser code generation.
//!
//! [`document`] provides the tree the emitter builds; [`rust_parser`]
//! turns an analysed grammar into the text of a standalone
//! recursive-descent parser.

pub mod document;
pub mod rust_parser;

pub use rust_parser::{emit, emit_ll1, emit_llk};
