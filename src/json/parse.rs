//! Purpose: Classify JSON decode failures into stable, backend-neutral categories.
//! Exports: `ParseFailureCategory`, `categorize_message`, `categorize_error`, `hint_for_error`.
//! Role: Lets callers branch on "what went wrong" without matching backend error types.
//! Invariants: Mapping is deterministic and ordered; the first matching rule wins.
//! Invariants: Hints never echo the input payload, only category and caller context.
//! Notes: Backends word their errors differently, so matching is case-insensitive substrings.

use std::fmt::Display;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum ParseFailureCategory {
    DepthLimit,
    Utf8,
    Eof,
    NumericRange,
    Syntax,
    Unknown,
}

impl ParseFailureCategory {
    pub(crate) fn label(self) -> &'static str {
        match self {
            ParseFailureCategory::DepthLimit => "depth-limit",
            ParseFailureCategory::Utf8 => "utf8",
            ParseFailureCategory::Eof => "eof",
            ParseFailureCategory::NumericRange => "numeric-range",
            ParseFailureCategory::Syntax => "syntax",
            ParseFailureCategory::Unknown => "unknown",
        }
    }
}

const RULES: &[(ParseFailureCategory, &[&str])] = &[
    (ParseFailureCategory::DepthLimit, &["recursion limit", "depth limit", "too deep"]),
    (
        ParseFailureCategory::Utf8,
        &["utf8", "utf-8", "unicode code point"],
    ),
    (ParseFailureCategory::Eof, &["eof"]),
    (
        ParseFailureCategory::NumericRange,
        &["out of range", "too large", "overflow"],
    ),
    (
        ParseFailureCategory::Syntax,
        &[
            "expected",
            "syntax",
            "trailing",
            "invalid",
            "unexpected",
            "key must be",
            "control character",
            "escape",
        ],
    ),
];

pub(crate) fn categorize_message(message: &str) -> ParseFailureCategory {
    let lowered = message.to_ascii_lowercase();
    RULES
        .iter()
        .find(|(_, needles)| needles.iter().any(|needle| lowered.contains(needle)))
        .map(|(category, _)| *category)
        .unwrap_or(ParseFailureCategory::Unknown)
}

pub(crate) fn categorize_error(err: &dyn Display) -> ParseFailureCategory {
    categorize_message(&err.to_string())
}

pub(crate) fn hint_for_error(err: &dyn Display, context: &str) -> String {
    let category = categorize_error(err);
    format!("parse category: {}; context: {context}", category.label())
}
