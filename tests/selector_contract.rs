//! Purpose: Lock selection semantics with instrumented mock backends.
//! Exports: Integration tests only.
//! Role: Verify priority order, skip-on-fault, fallback, and probe reporting.
//! Invariants: Selection never fails, whatever the candidates do.
//! Notes: Mock backends delegate to serde_json so accepted mocks stay self-consistent.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use jsonseam::{
    Adapter, Descriptor, Encoding, Error, ErrorKind, ProbeStatus, Selector, SmokeTest, Value,
};

#[derive(Clone, Copy, Debug)]
enum Mode {
    Working,
    EncodeFails,
    DecodeFails,
    Panics,
    Corrupts,
}

#[derive(Debug)]
struct Mock {
    name: &'static str,
    mode: Mode,
}

impl Adapter for Mock {
    fn name(&self) -> &'static str {
        self.name
    }

    fn decode(&self, input: &[u8]) -> Result<Value, Error> {
        match self.mode {
            Mode::DecodeFails => Err(Error::new(ErrorKind::Decode).with_backend(self.name)),
            Mode::Panics => panic!("mock decoder crashed"),
            _ => serde_json::from_slice(input).map_err(|err| {
                Error::new(ErrorKind::Decode)
                    .with_message(err.to_string())
                    .with_backend(self.name)
            }),
        }
    }

    fn encode_with(&self, value: &Value, _encoding: &Encoding) -> Result<Vec<u8>, Error> {
        match self.mode {
            Mode::EncodeFails => Err(Error::new(ErrorKind::Encode).with_backend(self.name)),
            Mode::Corrupts => Ok(br#"{"answer":41}"#.to_vec()),
            _ => serde_json::to_vec(value).map_err(|err| {
                Error::new(ErrorKind::Encode)
                    .with_message(err.to_string())
                    .with_backend(self.name)
            }),
        }
    }
}

fn mock(name: &'static str, mode: Mode) -> Descriptor {
    Descriptor::new(name, move || {
        Ok(Arc::new(Mock { name, mode }) as Arc<dyn Adapter>)
    })
}

fn missing(name: &'static str) -> Descriptor {
    Descriptor::new(name, move || {
        Err(Error::new(ErrorKind::Unavailable).with_backend(name))
    })
}

fn counted(name: &'static str, calls: Arc<AtomicUsize>) -> Descriptor {
    Descriptor::new(name, move || {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(Mock {
            name,
            mode: Mode::Working,
        }) as Arc<dyn Adapter>)
    })
}

#[test]
fn earliest_working_candidate_wins() {
    let selector = Selector::new(vec![
        mock("first", Mode::Working),
        mock("second", Mode::Working),
    ]);
    assert_eq!(selector.select().name(), "first");
}

#[test]
fn selection_stops_at_first_accepted_candidate() {
    let calls = Arc::new(AtomicUsize::new(0));
    let selector = Selector::new(vec![
        mock("first", Mode::Working),
        counted("second", Arc::clone(&calls)),
    ]);
    assert_eq!(selector.select().name(), "first");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn unavailable_candidates_are_skipped() {
    let selector = Selector::new(vec![missing("absent"), mock("present", Mode::Working)]);
    assert_eq!(selector.select().name(), "present");
}

#[test]
fn broken_candidates_are_skipped() {
    for mode in [Mode::EncodeFails, Mode::DecodeFails, Mode::Panics] {
        let selector = Selector::new(vec![
            mock("broken", mode),
            mock("fallback", Mode::Working),
        ]);
        assert_eq!(selector.select().name(), "fallback", "mode {mode:?}");
    }
}

#[test]
fn strict_smoke_rejects_value_drift_and_loose_accepts_it() {
    let strict = Selector::new(vec![mock("drifty", Mode::Corrupts)]);
    assert_eq!(strict.smoke(), SmokeTest::Strict);
    assert_eq!(strict.select().name(), "serde_json");

    let loose = Selector::new(vec![mock("drifty", Mode::Corrupts)]).with_smoke(SmokeTest::Loose);
    assert_eq!(loose.select().name(), "drifty");
}

#[test]
fn exhausted_list_falls_back_to_baseline() {
    let selector = Selector::new(vec![
        missing("absent"),
        mock("broken", Mode::Panics),
        mock("also-broken", Mode::EncodeFails),
    ]);
    let handler = selector.select();
    assert_eq!(handler.name(), "serde_json");

    let value = serde_json::json!({"answer": 42});
    let bytes = handler.encode(&value).expect("encode");
    assert_eq!(handler.decode(&bytes).expect("decode"), value);
}

#[test]
fn empty_list_selects_baseline() {
    let handler = Selector::new(Vec::new()).select();
    assert_eq!(handler.name(), "serde_json");
}

#[test]
fn repeated_selection_is_deterministic() {
    let selector = Selector::new(vec![missing("absent"), mock("present", Mode::Working)]);
    let names: Vec<_> = (0..5).map(|_| selector.select().name()).collect();
    assert!(names.iter().all(|name| *name == "present"));
}

#[test]
fn probe_reports_every_candidate() {
    let selector = Selector::new(vec![
        missing("absent"),
        mock("broken", Mode::DecodeFails),
        mock("present", Mode::Working),
    ]);
    let probes = selector.probe();
    let summary: Vec<_> = probes.iter().map(|p| (p.name, p.status)).collect();
    assert_eq!(
        summary,
        vec![
            ("absent", ProbeStatus::Unavailable),
            ("broken", ProbeStatus::Broken),
            ("present", ProbeStatus::Accepted),
            ("serde_json", ProbeStatus::Accepted),
        ]
    );
    assert!(probes[1].error.as_deref().unwrap().contains("smoke decode failed"));

    let value = serde_json::to_value(&probes).expect("serialize");
    assert_eq!(value[0]["status"], "unavailable");
    assert_eq!(value[2]["status"], "accepted");
    assert!(value[2].get("error").is_none());
}

#[test]
fn panicking_candidate_is_reported_broken_with_payload() {
    let selector = Selector::new(vec![mock("crashy", Mode::Panics)]);
    let probes = selector.probe();
    assert_eq!(probes[0].status, ProbeStatus::Broken);
    let error = probes[0].error.as_deref().expect("error");
    assert!(error.contains("panicked: mock decoder crashed"), "{error}");
    assert_eq!(selector.select().name(), "serde_json");
}

#[test]
fn factory_errors_other_than_unavailable_are_broken() {
    let selector = Selector::new(vec![Descriptor::new("init-fails", || {
        Err(Error::new(ErrorKind::Internal).with_message("init failed"))
    })]);
    let probes = selector.probe();
    assert_eq!(probes[0].status, ProbeStatus::Broken);
    assert_eq!(selector.select().name(), "serde_json");
}

#[test]
fn names_list_baseline_last() {
    let selector = Selector::new(vec![missing("a"), missing("b")]);
    assert_eq!(selector.names(), vec!["a", "b", "serde_json"]);
}
