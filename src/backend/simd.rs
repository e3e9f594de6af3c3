//! Purpose: Optional adapter over simd-json (feature `simd-json`).
//! Exports: `NAME`, `descriptor`.
//! Role: SIMD-accelerated decode; serde-compatible encode.
//! Invariants: Input buffers are copied once to satisfy simd-json's mutable-slice API.
//! Invariants: Without the feature the descriptor reports `Unavailable`.

use std::sync::Arc;

use super::{Adapter, Descriptor};
use crate::core::error::Error;

pub const NAME: &str = "simd-json";

pub(super) fn descriptor() -> Descriptor {
    Descriptor::new(NAME, construct)
}

#[cfg(feature = "simd-json")]
fn construct() -> Result<Arc<dyn Adapter>, Error> {
    Ok(Arc::new(imp::SimdJson))
}

#[cfg(not(feature = "simd-json"))]
fn construct() -> Result<Arc<dyn Adapter>, Error> {
    Err(super::unavailable(NAME, "simd-json"))
}

#[cfg(feature = "simd-json")]
mod imp {
    use serde_json::Value;

    use super::NAME;
    use crate::backend::{Adapter, decode_error, encode_error, note_encoding};
    use crate::core::encoding::Encoding;
    use crate::core::error::Error;

    #[derive(Debug)]
    pub(super) struct SimdJson;

    impl Adapter for SimdJson {
        fn name(&self) -> &'static str {
            NAME
        }

        fn decode(&self, input: &[u8]) -> Result<Value, Error> {
            let mut bytes = input.to_vec();
            simd_json::serde::from_slice(&mut bytes).map_err(|err| decode_error(NAME, &err))
        }

        fn encode_with(&self, value: &Value, encoding: &Encoding) -> Result<Vec<u8>, Error> {
            note_encoding(NAME, encoding);
            simd_json::serde::to_vec(value).map_err(|err| encode_error(NAME, &err))
        }
    }

}
