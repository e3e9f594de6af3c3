//! Purpose: Optional adapter over sonic-rs (feature `sonic-rs`).
//! Exports: `NAME`, `descriptor`.
//! Role: Highest-priority candidate when linked.
//! Invariants: Without the feature the descriptor reports `Unavailable`.

use std::sync::Arc;

use super::{Adapter, Descriptor};
use crate::core::error::Error;

pub const NAME: &str = "sonic-rs";

pub(super) fn descriptor() -> Descriptor {
    Descriptor::new(NAME, construct)
}

#[cfg(feature = "sonic-rs")]
fn construct() -> Result<Arc<dyn Adapter>, Error> {
    Ok(Arc::new(imp::Sonic))
}

#[cfg(not(feature = "sonic-rs"))]
fn construct() -> Result<Arc<dyn Adapter>, Error> {
    Err(super::unavailable(NAME, "sonic-rs"))
}

#[cfg(feature = "sonic-rs")]
mod imp {
    use serde_json::Value;

    use super::NAME;
    use crate::backend::{Adapter, decode_error, encode_error, note_encoding};
    use crate::core::encoding::Encoding;
    use crate::core::error::Error;

    #[derive(Debug)]
    pub(super) struct Sonic;

    impl Adapter for Sonic {
        fn name(&self) -> &'static str {
            NAME
        }

        fn decode(&self, input: &[u8]) -> Result<Value, Error> {
            sonic_rs::from_slice(input).map_err(|err| decode_error(NAME, &err))
        }

        fn encode_with(&self, value: &Value, encoding: &Encoding) -> Result<Vec<u8>, Error> {
            note_encoding(NAME, encoding);
            sonic_rs::to_vec(value).map_err(|err| encode_error(NAME, &err))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::Sonic;
        use crate::backend::Adapter;
        use crate::core::error::ErrorKind;
        use serde_json::json;

        #[test]
        fn round_trips_nested_value() {
            let value = json!({"k": ["v", 1.5, false, null]});
            let bytes = Sonic.encode(&value).expect("encode");
            assert_eq!(Sonic.decode(&bytes).expect("decode"), value);
        }

        #[test]
        fn malformed_input_is_decode_fault() {
            let err = Sonic.decode_str("{not json").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Decode);
        }
    }
}
