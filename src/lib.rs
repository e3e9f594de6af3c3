//! Purpose: Pick the fastest JSON backend available in this build behind one contract.
//! Exports: `select_handler`, `get_active_functions`, `Handler`, `Selector`, `Adapter`, errors.
//! Role: Library crate used by the `jsonseam` CLI and by in-process callers.
//! Invariants: Selection never fails; the serde_json baseline is always linked.
//! Invariants: Every backend decodes into and encodes from `serde_json::Value`.
pub mod backend;
pub mod core;
pub mod handler;
mod json;
pub mod select;

pub use backend::{Adapter, BASELINE, Descriptor};
pub use crate::core::encoding::Encoding;
pub use crate::core::error::{Error, ErrorKind, to_exit_code};
pub use handler::{Handler, get_active_functions, select_handler};
pub use select::{Probe, ProbeStatus, Selector, SelectorConfig, SmokeTest};
pub use serde_json::Value;
