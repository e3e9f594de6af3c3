//! Purpose: Define the uniform adapter contract and the built-in backend descriptors.
//! Exports: `Adapter`, `Descriptor`, `Factory`, `BASELINE`, `builtin_candidates`, `baseline`,
//!   `baseline_adapter`.
//! Role: Every JSON library is wrapped here so callers never see library-specific APIs.
//! Invariants: Candidate order is most-preferred first; the baseline is never a candidate.
//! Invariants: Factories of libraries missing from the build fail with `Unavailable`.
//! Invariants: The baseline factory never fails.

mod baseline;
mod simd;
mod sonic;

use std::fmt::{self, Display};
use std::sync::Arc;

use serde_json::Value;

use crate::core::encoding::Encoding;
use crate::core::error::{Error, ErrorKind};
use crate::json::parse::hint_for_error;

pub use baseline::NAME as BASELINE;

/// Uniform decode/encode pair over `serde_json::Value`.
///
/// Implementations wrap one JSON library. `encode_with` accepts an encoding
/// label for signature compatibility; output is always UTF-8 JSON text.
pub trait Adapter: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;

    fn decode(&self, input: &[u8]) -> Result<Value, Error>;

    fn encode_with(&self, value: &Value, encoding: &Encoding) -> Result<Vec<u8>, Error>;

    fn decode_str(&self, input: &str) -> Result<Value, Error> {
        self.decode(input.as_bytes())
    }

    fn encode(&self, value: &Value) -> Result<Vec<u8>, Error> {
        self.encode_with(value, &Encoding::Utf8)
    }
}

pub type Factory = Box<dyn Fn() -> Result<Arc<dyn Adapter>, Error> + Send + Sync>;

/// Names a candidate backend and knows how to construct its adapter.
pub struct Descriptor {
    name: &'static str,
    factory: Factory,
}

impl Descriptor {
    pub fn new<F>(name: &'static str, factory: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn Adapter>, Error> + Send + Sync + 'static,
    {
        Self {
            name,
            factory: Box::new(factory),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn construct(&self) -> Result<Arc<dyn Adapter>, Error> {
        (self.factory)()
    }
}

impl fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Optional backends in priority order.
pub fn builtin_candidates() -> Vec<Descriptor> {
    vec![sonic::descriptor(), simd::descriptor()]
}

pub fn baseline() -> Descriptor {
    baseline::descriptor()
}

/// The baseline adapter itself; construction cannot fail.
pub fn baseline_adapter() -> Arc<dyn Adapter> {
    baseline::adapter()
}

/// Names of every built-in backend, baseline last.
pub fn builtin_names() -> [&'static str; 3] {
    [sonic::NAME, simd::NAME, baseline::NAME]
}

pub(crate) fn unavailable(backend: &'static str, feature: &str) -> Error {
    Error::new(ErrorKind::Unavailable)
        .with_message(format!("{backend} is not linked into this build"))
        .with_backend(backend)
        .with_hint(format!("Rebuild with `--features {feature}` to enable it."))
}

pub(crate) fn decode_error(backend: &'static str, err: &dyn Display) -> Error {
    Error::new(ErrorKind::Decode)
        .with_message(err.to_string())
        .with_backend(backend)
        .with_hint(hint_for_error(err, "decode"))
}

pub(crate) fn encode_error(backend: &'static str, err: &dyn Display) -> Error {
    Error::new(ErrorKind::Encode)
        .with_message(err.to_string())
        .with_backend(backend)
}

pub(crate) fn note_encoding(backend: &'static str, encoding: &Encoding) {
    if !encoding.is_utf8() {
        tracing::trace!(
            backend,
            encoding = encoding.label(),
            "ignoring encoding label; output is utf-8"
        );
    }
}
