// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Document tree for parser code generation.
//!
//! Emitter functions build `Document` values declaratively instead of
//! writing to a string buffer with manual indentation tracking; a final
//! pass renders the tree. Only layout-independent constructors exist —
//! no width-driven groups — because generated parsers must be
//! byte-for-byte stable across runs so fixtures can compare exact text.

/// Indentation width used throughout generated parsers.
pub const INDENT: isize = 4;

/// A renderable document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Document<'a> {
    /// A borrowed string literal.
    Str(&'a str),
    /// An owned string.
    String(String),
    /// A newline followed by current indentation.
    Line,
    /// Increase indentation for nested content.
    Nest(isize, Box<Document<'a>>),
    /// A sequence of documents.
    Vec(Vec<Document<'a>>),
    /// Empty document.
    Nil,
}

/// Coerce a value into a `Document`.
pub trait Documentable<'a> {
    /// Converts this value into a `Document`.
    fn to_doc(self) -> Document<'a>;
}

impl<'a> Documentable<'a> for &'a str {
    fn to_doc(self) -> Document<'a> {
        Document::Str(self)
    }
}

impl<'a> Documentable<'a> for String {
    fn to_doc(self) -> Document<'a> {
        Document::String(self)
    }
}

impl<'a> Documentable<'a> for Document<'a> {
    fn to_doc(self) -> Document<'a> {
        self
    }
}

impl<'a> Documentable<'a> for Vec<Document<'a>> {
    fn to_doc(self) -> Document<'a> {
        Document::Vec(self)
    }
}

impl<'a> Documentable<'a> for usize {
    fn to_doc(self) -> Document<'a> {
        Document::String(self.to_string())
    }
}

/// Join multiple documents together in a vector.
///
/// Each element is converted to a `Document` via the `Documentable`
/// trait. Documents are concatenated directly — no separator is
/// inserted.
#[macro_export]
macro_rules! docvec {
    () => {
        $crate::codegen::document::Document::Vec(Vec::new())
    };

    ($first:expr $(,)?) => {
        $crate::codegen::document::Document::Vec(
            vec![$crate::codegen::document::Documentable::to_doc($first)]
        )
    };

    ($first:expr, $($rest:expr),+ $(,)?) => {
        match $crate::codegen::document::Documentable::to_doc($first) {
            $crate::codegen::document::Document::Vec(mut vec) => {
                $(
                    vec.push($crate::codegen::document::Documentable::to_doc($rest));
                )*
                $crate::codegen::document::Document::Vec(vec)
            },
            first => {
                $crate::codegen::document::Document::Vec(
                    vec![first, $($crate::codegen::document::Documentable::to_doc($rest)),+]
                )
            }
        }
    };
}

/// Creates a `Line` document — a newline followed by indentation.
#[must_use]
pub fn line() -> Document<'static> {
    Document::Line
}

/// Creates a `Nil` document — an empty document.
#[must_use]
pub fn nil() -> Document<'static> {
    Document::Nil
}

/// Creates a `Nest` document — increases indentation for the inner
/// document.
#[must_use]
pub fn nest(indent: isize, doc: Document<'_>) -> Document<'_> {
    Document::Nest(indent, Box::new(doc))
}

/// Joins documents with a separator between each pair.
#[must_use]
pub fn join<'a>(
    docs: impl IntoIterator<Item = Document<'a>>,
    separator: &Document<'a>,
) -> Document<'a> {
    let docs: Vec<_> = docs.into_iter().collect();
    if docs.is_empty() {
        return Document::Nil;
    }
    let mut result = Vec::with_capacity(docs.len() * 2 - 1);
    let mut first = true;
    for doc in docs {
        if !first {
            result.push(separator.clone());
        }
        result.push(doc);
        first = false;
    }
    Document::Vec(result)
}

/// Concatenates documents without any separator.
#[must_use]
pub fn concat<'a>(docs: impl IntoIterator<Item = Document<'a>>) -> Document<'a> {
    Document::Vec(docs.into_iter().collect())
}

impl Document<'_> {
    /// Renders the document to its final text.
    ///
    /// Iterative with a work list to avoid recursion overflow on deeply
    /// nested trees. Trailing whitespace is stripped from every line.
    #[must_use]
    pub fn render(&self) -> String {
        use std::collections::VecDeque;

        let mut output = String::new();

        // Work list of (indent, document); items pushed to the front are
        // processed next, expanding composite documents in order.
        let mut work: VecDeque<(isize, &Document<'_>)> = VecDeque::new();
        work.push_back((0, self));

        while let Some((indent, doc)) = work.pop_front() {
            match doc {
                Document::Nil => {}
                Document::Str(s) => output.push_str(s),
                Document::String(s) => output.push_str(s.as_str()),
                Document::Line => {
                    output.push('\n');
                    for _ in 0..indent {
                        output.push(' ');
                    }
                }
                Document::Nest(extra, inner) => {
                    work.push_front((indent + extra, inner));
                }
                Document::Vec(docs) => {
                    // Push in reverse so the first element is processed first.
                    for d in docs.iter().rev() {
                        work.push_front((indent, d));
                    }
                }
            }
        }

        let trimmed: String = output
            .split('\n')
            .map(str::trim_end)
            .collect::<Vec<_>>()
            .join("\n");
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn str_document() {
        assert_eq!(Document::Str("hello").render(), "hello");
    }

    #[test]
    fn string_document() {
        assert_eq!(Document::String("world".to_string()).render(), "world");
    }

    #[test]
    fn nil_document() {
        assert_eq!(Document::Nil.render(), "");
    }

    #[test]
    fn line_document() {
        let doc = docvec!["a", line(), "b"];
        assert_eq!(doc.render(), "a\nb");
    }

    #[test]
    fn nest_document() {
        let doc = docvec![
            "fn terminal0() {",
            nest(INDENT, docvec![line(), "body"]),
            line(),
            "}",
        ];
        assert_eq!(doc.render(), "fn terminal0() {\n    body\n}");
    }

    #[test]
    fn nested_nest() {
        let doc = nest(
            2,
            docvec![line(), "outer", nest(2, docvec![line(), "inner"])],
        );
        assert_eq!(doc.render(), "\n  outer\n    inner");
    }

    #[test]
    fn docvec_macro_empty() {
        let doc = docvec![];
        assert_eq!(doc.render(), "");
    }

    #[test]
    fn docvec_macro_mixed_types() {
        let owned = "world".to_string();
        let doc = docvec!["hello ", owned, " ", 42_usize];
        assert_eq!(doc.render(), "hello world 42");
    }

    #[test]
    fn docvec_flattens_leading_vec() {
        let inner = docvec!["a", "b"];
        let doc = docvec![inner, "c"];
        assert_eq!(doc.render(), "abc");
        if let Document::Vec(v) = doc {
            assert_eq!(v.len(), 3);
        } else {
            panic!("Expected Vec");
        }
    }

    #[test]
    fn join_documents() {
        let docs = vec![Document::Str("a"), Document::Str("b"), Document::Str("c")];
        assert_eq!(join(docs, &Document::Str(", ")).render(), "a, b, c");
    }

    #[test]
    fn join_empty() {
        let docs: Vec<Document> = vec![];
        assert_eq!(join(docs, &Document::Str(", ")).render(), "");
    }

    #[test]
    fn concat_documents() {
        let docs = vec![Document::Str("a"), Document::Str("b")];
        assert_eq!(concat(docs).render(), "ab");
    }

    #[test]
    fn trailing_whitespace_stripped() {
        let doc = docvec!["a ", line(), "b"];
        assert_eq!(doc.render(), "a\nb");
    }

    #[test]
    fn rendering_is_deterministic() {
        let build = || {
            docvec![
                "fn main() {",
                nest(INDENT, docvec![line(), "run();"]),
                line(),
                "}",
                line(),
            ]
        };
        assert_eq!(build().render(), build().render());
    }
}
