//! Purpose: Baseline adapter over serde_json, always linked.
//! Exports: `NAME`, `adapter`, `descriptor`.
//! Role: Method of last resort; guarantees selection ends with a usable adapter.
//! Invariants: Construction is infallible.

use std::sync::Arc;

use serde_json::Value;

use super::{Adapter, Descriptor, decode_error, encode_error, note_encoding};
use crate::core::encoding::Encoding;
use crate::core::error::Error;

pub const NAME: &str = "serde_json";

#[derive(Debug)]
struct SerdeJson;

impl Adapter for SerdeJson {
    fn name(&self) -> &'static str {
        NAME
    }

    fn decode(&self, input: &[u8]) -> Result<Value, Error> {
        serde_json::from_slice(input).map_err(|err| decode_error(NAME, &err))
    }

    fn encode_with(&self, value: &Value, encoding: &Encoding) -> Result<Vec<u8>, Error> {
        note_encoding(NAME, encoding);
        serde_json::to_vec(value).map_err(|err| encode_error(NAME, &err))
    }
}

pub(super) fn adapter() -> Arc<dyn Adapter> {
    Arc::new(SerdeJson)
}

pub(super) fn descriptor() -> Descriptor {
    Descriptor::new(NAME, || Ok(adapter()))
}
