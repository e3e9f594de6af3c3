//! Purpose: Backend-neutral helpers for describing JSON decode failures.
//! Exports: `parse` module with failure categorization used by every adapter.
//! Role: Single seam so adapters report decode errors with the same category labels.
//! Invariants: Categorization depends only on the error message text.

pub(crate) mod parse;
