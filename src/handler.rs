//! Purpose: Hold the accepted adapter and publish one process-wide handler.
//! Exports: `Handler`, `select_handler`, `get_active_functions`.
//! Role: Public entry point most callers use instead of building a `Selector`.
//! Invariants: The process-wide handler is selected at most once (`OnceLock`).
//! Invariants: Concurrent first calls all observe the same adapter instance.
//! Notes: The process-wide selection reads `SelectorConfig::from_env` on first use only.

use std::fmt;
use std::sync::{Arc, OnceLock};

use serde_json::Value;

use crate::backend::Adapter;
use crate::core::encoding::Encoding;
use crate::core::error::{Error, ErrorKind};
use crate::select::{Selector, SelectorConfig};

/// Cheap, clonable handle on the active adapter.
#[derive(Clone)]
pub struct Handler {
    adapter: Arc<dyn Adapter>,
}

impl Handler {
    pub(crate) fn new(adapter: Arc<dyn Adapter>) -> Self {
        Self { adapter }
    }

    /// Name of the backend behind this handler.
    pub fn name(&self) -> &'static str {
        self.adapter.name()
    }

    pub fn adapter(&self) -> &Arc<dyn Adapter> {
        &self.adapter
    }

    /// True when both handlers share one adapter instance.
    pub fn same_adapter(&self, other: &Handler) -> bool {
        Arc::ptr_eq(&self.adapter, &other.adapter)
    }

    pub fn decode(&self, input: &[u8]) -> Result<Value, Error> {
        self.adapter.decode(input)
    }

    pub fn decode_str(&self, input: &str) -> Result<Value, Error> {
        self.adapter.decode_str(input)
    }

    pub fn encode(&self, value: &Value) -> Result<Vec<u8>, Error> {
        self.adapter.encode(value)
    }

    pub fn encode_with(&self, value: &Value, encoding: &Encoding) -> Result<Vec<u8>, Error> {
        self.adapter.encode_with(value, encoding)
    }

    pub fn encode_to_string(&self, value: &Value) -> Result<String, Error> {
        let bytes = self.encode(value)?;
        String::from_utf8(bytes).map_err(|err| {
            Error::new(ErrorKind::Encode)
                .with_message("backend produced non-utf8 output")
                .with_backend(self.name())
                .with_source(err)
        })
    }

    /// Splits the handler into standalone decode and encode closures.
    ///
    /// The encode closure takes an optional encoding; `None` means UTF-8.
    pub fn functions(
        &self,
    ) -> (
        impl Fn(&[u8]) -> Result<Value, Error> + Send + Sync + use<>,
        impl Fn(&Value, Option<&Encoding>) -> Result<Vec<u8>, Error> + Send + Sync + use<>,
    ) {
        let decoder = Arc::clone(&self.adapter);
        let encoder = Arc::clone(&self.adapter);
        (
            move |input: &[u8]| decoder.decode(input),
            move |value: &Value, encoding: Option<&Encoding>| match encoding {
                Some(encoding) => encoder.encode_with(value, encoding),
                None => encoder.encode(value),
            },
        )
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("backend", &self.name())
            .finish()
    }
}

static ACTIVE: OnceLock<Handler> = OnceLock::new();

/// Returns the process-wide handler, selecting it on first call.
pub fn select_handler() -> Handler {
    ACTIVE
        .get_or_init(|| Selector::from_config(&SelectorConfig::from_env()).select())
        .clone()
}

/// Decode and encode functions of the process-wide handler.
pub fn get_active_functions() -> (
    impl Fn(&[u8]) -> Result<Value, Error> + Send + Sync + 'static,
    impl Fn(&Value, Option<&Encoding>) -> Result<Vec<u8>, Error> + Send + Sync + 'static,
) {
    select_handler().functions()
}
