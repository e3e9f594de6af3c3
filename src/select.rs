//! Purpose: Probe candidate backends in priority order and pick the first that works.
//! Exports: `Selector`, `SelectorConfig`, `SmokeTest`, `Probe`, `ProbeStatus`.
//! Role: Turns a priority list into exactly one active `Handler`.
//! Invariants: `select` never fails and never unwinds; the baseline is the last resort.
//! Invariants: Candidate faults (unavailable, smoke failure, panic) only mean "try the next one".
//! Invariants: For a fixed build and config, repeated selection picks the same backend.
//! Notes: Panics are caught but the process panic hook still runs, so a panicking candidate
//!   prints its panic message to stderr; the hook is global and is left untouched here.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::backend::{self, Adapter, BASELINE, Descriptor};
use crate::core::error::{Error, ErrorKind};
use crate::handler::Handler;

/// How much the smoke test demands from a candidate.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SmokeTest {
    /// Encode then decode must not fault.
    Loose,
    /// Also requires the decoded value to equal the encoded one.
    #[default]
    Strict,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SelectorConfig {
    /// Preferred candidate names; `None` keeps the built-in order.
    pub order: Option<Vec<String>>,
    pub smoke: SmokeTest,
}

impl SelectorConfig {
    pub const BACKENDS_ENV: &'static str = "JSONSEAM_BACKENDS";
    pub const SMOKE_ENV: &'static str = "JSONSEAM_SMOKE";

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let order = lookup(Self::BACKENDS_ENV).map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect()
        });
        let smoke = match lookup(Self::SMOKE_ENV).as_deref().map(str::trim) {
            None | Some("") => SmokeTest::default(),
            Some(raw) if raw.eq_ignore_ascii_case("strict") => SmokeTest::Strict,
            Some(raw) if raw.eq_ignore_ascii_case("loose") => SmokeTest::Loose,
            Some(raw) => {
                warn!(value = raw, "unknown {}; using strict", Self::SMOKE_ENV);
                SmokeTest::Strict
            }
        };
        Self { order, smoke }
    }

    pub fn with_order<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.order = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_smoke(mut self, smoke: SmokeTest) -> Self {
        self.smoke = smoke;
        self
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    Accepted,
    Unavailable,
    Broken,
}

/// Outcome of trying one candidate.
#[derive(Clone, Debug, Serialize)]
pub struct Probe {
    pub name: &'static str,
    pub status: ProbeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug)]
pub struct Selector {
    candidates: Vec<Descriptor>,
    smoke: SmokeTest,
}

impl Selector {
    /// Selector over `candidates` (most-preferred first) with the serde_json baseline appended.
    pub fn new(candidates: Vec<Descriptor>) -> Self {
        Self {
            candidates,
            smoke: SmokeTest::default(),
        }
    }

    pub fn builtin() -> Self {
        Self::new(backend::builtin_candidates())
    }

    /// Built-in candidates reordered and filtered by `config.order`.
    ///
    /// Unknown names are logged and ignored. Naming the baseline is allowed but
    /// has no effect; it always stays last.
    pub fn from_config(config: &SelectorConfig) -> Self {
        let candidates = match &config.order {
            None => backend::builtin_candidates(),
            Some(order) => {
                let mut available = backend::builtin_candidates();
                let mut picked = Vec::with_capacity(available.len());
                for name in order {
                    let name = name.as_str();
                    if let Some(pos) = available.iter().position(|d| d.name() == name) {
                        picked.push(available.remove(pos));
                    } else if name != BASELINE && !picked.iter().any(|d| d.name() == name) {
                        warn!(backend = name, "ignoring unknown json backend");
                    }
                }
                picked
            }
        };
        Self::new(candidates).with_smoke(config.smoke)
    }

    pub fn with_smoke(mut self, smoke: SmokeTest) -> Self {
        self.smoke = smoke;
        self
    }

    pub fn smoke(&self) -> SmokeTest {
        self.smoke
    }

    /// Candidate names in probe order, baseline last.
    pub fn names(&self) -> Vec<&'static str> {
        self.candidates
            .iter()
            .map(Descriptor::name)
            .chain(std::iter::once(BASELINE))
            .collect()
    }

    pub fn select(&self) -> Handler {
        for descriptor in &self.candidates {
            match self.try_candidate(descriptor) {
                Ok(adapter) => {
                    info!(backend = descriptor.name(), "selected json backend");
                    return Handler::new(adapter);
                }
                Err(err) => {
                    debug!(backend = descriptor.name(), reason = %err, "skipping json backend");
                }
            }
        }
        info!(backend = BASELINE, "falling back to baseline json backend");
        Handler::new(backend::baseline_adapter())
    }

    /// Tries every candidate, baseline included, and reports each outcome.
    pub fn probe(&self) -> Vec<Probe> {
        let baseline = backend::baseline();
        self.candidates
            .iter()
            .chain(std::iter::once(&baseline))
            .map(|descriptor| match self.try_candidate(descriptor) {
                Ok(_) => Probe {
                    name: descriptor.name(),
                    status: ProbeStatus::Accepted,
                    error: None,
                },
                Err(err) => Probe {
                    name: descriptor.name(),
                    status: if err.kind() == ErrorKind::Unavailable {
                        ProbeStatus::Unavailable
                    } else {
                        ProbeStatus::Broken
                    },
                    error: Some(err.to_string()),
                },
            })
            .collect()
    }

    fn try_candidate(&self, descriptor: &Descriptor) -> Result<Arc<dyn Adapter>, Error> {
        let name = descriptor.name();
        let smoke = self.smoke;
        panic::catch_unwind(AssertUnwindSafe(|| {
            let adapter = descriptor.construct()?;
            smoke_test(adapter.as_ref(), smoke)?;
            Ok(adapter)
        }))
        .unwrap_or_else(|payload| {
            Err(Error::new(ErrorKind::Broken)
                .with_message(format!("panicked: {}", panic_message(payload.as_ref())))
                .with_backend(name))
        })
    }
}

impl Default for Selector {
    fn default() -> Self {
        Self::builtin()
    }
}

fn smoke_test(adapter: &dyn Adapter, mode: SmokeTest) -> Result<(), Error> {
    let sample = json!({"answer": 42});
    let broken = |stage: &str, err: Error| {
        Error::new(ErrorKind::Broken)
            .with_message(format!(
                "smoke {stage} failed: {}",
                err.message().unwrap_or(err.kind().as_str())
            ))
            .with_backend(adapter.name())
    };

    let encoded = adapter.encode(&sample).map_err(|err| broken("encode", err))?;
    let decoded = adapter.decode(&encoded).map_err(|err| broken("decode", err))?;
    if mode == SmokeTest::Strict && decoded != sample {
        return Err(Error::new(ErrorKind::Broken)
            .with_message(format!("smoke round trip changed the value: {decoded}"))
            .with_backend(adapter.name()));
    }
    Ok(())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{Selector, SelectorConfig, SmokeTest};
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn config_defaults_without_env() {
        let config = SelectorConfig::from_lookup(lookup(&[]));
        assert_eq!(config, SelectorConfig::default());
        assert_eq!(config.smoke, SmokeTest::Strict);
    }

    #[test]
    fn config_parses_order_and_smoke() {
        let config = SelectorConfig::from_lookup(lookup(&[
            ("JSONSEAM_BACKENDS", " simd-json , ,sonic-rs"),
            ("JSONSEAM_SMOKE", "LOOSE"),
        ]));
        assert_eq!(
            config.order,
            Some(vec!["simd-json".to_string(), "sonic-rs".to_string()])
        );
        assert_eq!(config.smoke, SmokeTest::Loose);
    }

    #[test]
    fn unknown_smoke_value_falls_back_to_strict() {
        let config = SelectorConfig::from_lookup(lookup(&[("JSONSEAM_SMOKE", "paranoid")]));
        assert_eq!(config.smoke, SmokeTest::Strict);
    }

    #[test]
    fn config_order_filters_and_reorders() {
        let config = SelectorConfig::default().with_order(["simd-json", "bogus", "sonic-rs"]);
        let selector = Selector::from_config(&config);
        assert_eq!(selector.names(), vec!["simd-json", "sonic-rs", "serde_json"]);
    }

    #[test]
    fn baseline_in_order_stays_last() {
        let config = SelectorConfig::default().with_order(["serde_json", "sonic-rs"]);
        let selector = Selector::from_config(&config);
        assert_eq!(selector.names(), vec!["sonic-rs", "serde_json"]);
    }

    #[test]
    fn baseline_only_order_selects_baseline() {
        let config = SelectorConfig::default().with_order(["serde_json"]);
        let handler = Selector::from_config(&config).select();
        assert_eq!(handler.name(), "serde_json");
    }
}
