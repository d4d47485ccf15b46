use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use fanvisor::{
    Config, Event, EventKind, Orchestrator, ProviderError, ProviderFn, ProviderRef, ProviderSpec,
    RUN_SPAN, RunError, Scope, StubProvider, Subscribe,
};
use tokio::time::Instant;

fn orchestrator() -> Orchestrator {
    Orchestrator::builder(Config::default()).build()
}

fn secs(n: u64) -> Duration {
    Duration::from_secs(n)
}

fn ok(id: &str, value: &str, latency: Duration) -> ProviderSpec<()> {
    ProviderSpec::new(StubProvider::succeed(id, value).with_latency(latency))
}

fn failing(id: &str, error: &str, latency: Duration) -> ProviderSpec<()> {
    ProviderSpec::new(StubProvider::fail(id, error).with_latency(latency))
}

/// Records every event it receives.
#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<Event>>,
}

impl Recorder {
    fn kinds_for(&self, span: &str) -> Vec<EventKind> {
        let events = self.events.lock().unwrap();
        events
            .iter()
            .filter(|e| e.span.as_deref() == Some(span))
            .map(|e| e.kind)
            .collect()
    }

    fn of_kind(&self, kind: EventKind) -> Vec<Event> {
        let events = self.events.lock().unwrap();
        events.iter().filter(|e| e.kind == kind).cloned().collect()
    }
}

#[async_trait]
impl Subscribe for Recorder {
    async fn on_event(&self, event: &Event) {
        self.events.lock().unwrap().push(event.clone());
    }

    fn name(&self) -> &'static str {
        "recorder"
    }
}

#[tokio::test(start_paused = true)]
async fn all_providers_succeed() {
    let orch = orchestrator();
    let providers: Vec<ProviderSpec<()>> = vec![
        ok("weather", "Sunny", secs(3)),
        ok("flights", "$500", secs(1)),
        ok("hotels", "$100", secs(2)),
    ];

    let start = Instant::now();
    let values = orch.run(providers, (), secs(10)).await.unwrap();

    assert_eq!(values.len(), 3);
    assert_eq!(values["weather"], "Sunny");
    assert_eq!(values["flights"], "$500");
    assert_eq!(values["hotels"], "$100");
    // Concurrent: bounded by the slowest provider, not the sum.
    assert!(start.elapsed() < secs(4));
}

#[tokio::test(start_paused = true)]
async fn first_failure_cancels_siblings() {
    let orch = orchestrator();
    let weather = StubProvider::succeed("weather", "Sunny")
        .with_latency(secs(5));
    let hotels = StubProvider::succeed("hotels", "$100")
        .with_latency(secs(5));
    let (weather_probe, hotels_probe) = (weather.probe(), hotels.probe());

    let providers: Vec<ProviderSpec<()>> = vec![
        ProviderSpec::new(weather),
        failing("flights", "rate limited", secs(1)),
        ProviderSpec::new(hotels),
    ];

    let start = Instant::now();
    let err = orch.run(providers, (), secs(10)).await.unwrap_err();

    assert_eq!(
        err,
        RunError::ProviderFailure {
            provider: "flights".into(),
            error: ProviderError::fail("rate limited"),
        }
    );
    assert_eq!(err.to_string(), "error fetching flights: rate limited");
    assert!(start.elapsed() < secs(2));
    assert!(weather_probe.saw_cancel() && !weather_probe.completed());
    assert!(hotels_probe.saw_cancel() && !hotels_probe.completed());
}

#[tokio::test(start_paused = true)]
async fn simultaneous_failures_surface_one_of_them() {
    let orch = orchestrator();
    let providers: Vec<ProviderSpec<()>> = vec![
        ok("weather", "Sunny", secs(5)),
        failing("flights", "rate limited", secs(1)),
        failing("hotels", "sold out", secs(1)),
    ];

    let err = orch.run(providers, (), secs(10)).await.unwrap_err();
    let provider = err.provider().unwrap();
    assert!(
        provider == "flights" || provider == "hotels",
        "unexpected provider {provider}"
    );
}

#[tokio::test(start_paused = true)]
async fn slow_providers_time_out() {
    let orch = orchestrator();
    let weather = StubProvider::succeed("weather", "Sunny")
        .with_latency(secs(5));
    let probe = weather.probe();
    let providers: Vec<ProviderSpec<()>> = vec![
        ProviderSpec::new(weather),
        ok("flights", "$500", secs(5)),
        ok("hotels", "$100", secs(5)),
    ];

    let start = Instant::now();
    let err = orch.run(providers, (), secs(2)).await.unwrap_err();

    assert_eq!(err, RunError::Timeout { budget: secs(2) });
    assert!(err.is_timeout());
    assert!(start.elapsed() >= secs(2) && start.elapsed() < secs(3));
    assert!(probe.saw_cancel());
}

#[tokio::test(start_paused = true)]
async fn timeout_wins_over_partial_success() {
    let orch = orchestrator();
    let providers: Vec<ProviderSpec<()>> = vec![
        ProviderSpec::new(StubProvider::succeed("weather", "Sunny")),
        ok("flights", "$500", secs(1)),
        ok("hotels", "$100", secs(30)),
    ];

    let err = orch.run(providers, (), secs(2)).await.unwrap_err();
    assert!(err.is_timeout());
}

#[tokio::test(start_paused = true)]
async fn zero_budget_times_out_without_starting_providers() {
    let orch = orchestrator();
    let weather = StubProvider::succeed("weather", "Sunny");
    let probe = weather.probe();

    let err = orch
        .run(vec![ProviderSpec::<()>::new(weather)], (), Duration::ZERO)
        .await
        .unwrap_err();

    assert_eq!(err, RunError::Timeout { budget: Duration::ZERO });
    assert_eq!(probe.calls(), 0);
}

#[tokio::test]
async fn panicking_provider_becomes_internal_fault() {
    let orch = orchestrator();
    let providers: Vec<ProviderSpec<()>> = vec![
        ProviderSpec::new(StubProvider::succeed("weather", "Sunny")),
        ProviderSpec::new(StubProvider::panic("hotels", "boom")),
    ];

    match orch.run(providers, (), secs(10)).await {
        Err(RunError::InternalFault { provider, reason }) => {
            assert_eq!(provider, "hotels");
            assert!(reason.contains("boom"), "reason: {reason}");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn invalid_provider_lists_are_rejected() {
    let orch = orchestrator();

    let err = orch
        .run(Vec::<ProviderSpec<()>>::new(), (), secs(1))
        .await
        .unwrap_err();
    assert!(matches!(err, RunError::InvalidArgument { .. }));

    let providers: Vec<ProviderSpec<()>> = vec![
        ProviderSpec::new(StubProvider::succeed("weather", "Sunny")),
        ProviderSpec::new(StubProvider::succeed("weather", "Rainy")),
    ];
    let err = orch.run(providers, (), secs(1)).await.unwrap_err();
    assert_eq!(err.as_label(), "run_invalid_argument");
}

#[tokio::test]
async fn cancel_error_without_cancellation_is_a_failure() {
    let orch = orchestrator();
    let liar: ProviderRef<()> =
        ProviderFn::arc("flights", |_scope: Scope, _params: Arc<()>| async move {
            Err::<String, _>(ProviderError::Canceled)
        });
    let providers = vec![
        ProviderSpec::new(StubProvider::succeed("weather", "Sunny")),
        ProviderSpec::from_ref(liar),
    ];

    let err = orch.run(providers, (), secs(10)).await.unwrap_err();
    assert_eq!(
        err,
        RunError::ProviderFailure {
            provider: "flights".into(),
            error: ProviderError::Canceled,
        }
    );
}

#[tokio::test(start_paused = true)]
async fn params_are_shared_read_only() {
    let orch = orchestrator();
    let echo = |id: &'static str| -> ProviderRef<String> {
        ProviderFn::arc(id, move |scope: Scope, city: Arc<String>| async move {
            scope.sleep(Duration::from_millis(10)).await?;
            Ok::<_, ProviderError>(format!("{id}:{city}"))
        })
    };
    let providers = vec![
        ProviderSpec::from_ref(echo("weather")),
        ProviderSpec::from_ref(echo("flights")),
    ];

    let values = orch
        .run(providers, "Rome".to_string(), secs(1))
        .await
        .unwrap();
    assert_eq!(values["weather"], "weather:Rome");
    assert_eq!(values["flights"], "flights:Rome");
}

#[tokio::test(start_paused = true)]
async fn run_with_defaults_uses_configured_budget() {
    let cfg = Config {
        budget: secs(1),
        ..Config::default()
    };
    let orch = Orchestrator::builder(cfg).build();
    let providers: Vec<ProviderSpec<()>> = vec![ok("weather", "Sunny", secs(2))];

    let err = orch.run_with_defaults(providers, ()).await.unwrap_err();
    assert_eq!(err, RunError::Timeout { budget: secs(1) });
}

#[tokio::test(start_paused = true)]
async fn stragglers_are_aborted_after_grace() {
    let recorder = Arc::new(Recorder::default());
    let cfg = Config {
        grace: secs(1),
        ..Config::default()
    };
    let orch = Orchestrator::builder(cfg)
        .with_subscriber(Arc::clone(&recorder) as Arc<dyn Subscribe>)
        .build();

    let stubborn = StubProvider::succeed("weather", "Sunny")
        .with_latency(secs(30))
        .ignoring_cancel();
    let probe = stubborn.probe();
    let providers: Vec<ProviderSpec<()>> = vec![
        ProviderSpec::new(stubborn),
        failing("flights", "rate limited", secs(1)),
    ];

    let start = Instant::now();
    let err = orch.run(providers, (), secs(10)).await.unwrap_err();
    assert_eq!(err.provider(), Some("flights"));
    assert!(start.elapsed() < secs(3));

    // The aborted task never resumes.
    tokio::time::sleep(secs(60)).await;
    assert!(!probe.completed());

    orch.shutdown().await;
    let exceeded = recorder.of_kind(EventKind::GraceExceeded);
    assert_eq!(exceeded.len(), 1);
    assert_eq!(exceeded[0].reason.as_deref(), Some("weather"));

    // The aborted provider's span is still closed, after an error record.
    assert_eq!(
        recorder.kinds_for("weather"),
        [EventKind::SpanStarted, EventKind::SpanError, EventKind::SpanEnded]
    );
    let errors = recorder.of_kind(EventKind::SpanError);
    let weather_error = errors
        .iter()
        .find(|e| e.span.as_deref() == Some("weather"))
        .unwrap();
    assert_eq!(weather_error.reason.as_deref(), Some("aborted after grace"));
}

#[tokio::test(start_paused = true)]
async fn spans_are_published_per_run_and_provider() {
    let recorder = Arc::new(Recorder::default());
    let orch = Orchestrator::builder(Config::default())
        .with_subscriber(Arc::clone(&recorder) as Arc<dyn Subscribe>)
        .build();

    let providers: Vec<ProviderSpec<()>> = vec![
        ok("weather", "Sunny", secs(3)),
        failing("flights", "rate limited", secs(1)),
    ];
    let _ = orch.run(providers, (), secs(10)).await;
    orch.shutdown().await;

    assert_eq!(
        recorder.kinds_for(RUN_SPAN),
        [EventKind::SpanStarted, EventKind::SpanError, EventKind::SpanEnded]
    );
    assert_eq!(
        recorder.kinds_for("flights"),
        [EventKind::SpanStarted, EventKind::SpanError, EventKind::SpanEnded]
    );
    assert_eq!(
        recorder.kinds_for("weather"),
        [EventKind::SpanStarted, EventKind::SpanEnded]
    );

    let cancels = recorder.of_kind(EventKind::CancelRequested);
    assert_eq!(cancels.len(), 1);
    assert_eq!(cancels[0].reason.as_deref(), Some("provider_failed"));

    // Every event of the run carries the same run id.
    let events = recorder.events.lock().unwrap();
    let run = events[0].run;
    assert!(run.is_some());
    assert!(events.iter().all(|e| e.run == run));
}

#[tokio::test(start_paused = true)]
async fn deadline_is_published() {
    let recorder = Arc::new(Recorder::default());
    let orch = Orchestrator::builder(Config::default())
        .with_subscriber(Arc::clone(&recorder) as Arc<dyn Subscribe>)
        .build();

    let providers: Vec<ProviderSpec<()>> = vec![ok("hotels", "$100", secs(5))];
    let _ = orch.run(providers, (), secs(1)).await;
    orch.shutdown().await;

    let hits = recorder.of_kind(EventKind::DeadlineHit);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].timeout_ms, Some(1000));
    assert_eq!(
        recorder.of_kind(EventKind::CancelRequested)[0].reason.as_deref(),
        Some("deadline")
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_runs_are_independent() {
    let recorder = Arc::new(Recorder::default());
    let orch = Orchestrator::builder(Config::default())
        .with_subscriber(Arc::clone(&recorder) as Arc<dyn Subscribe>)
        .build();
    let ms = Duration::from_millis;

    let healthy: Vec<ProviderSpec<()>> = vec![
        ok("weather", "Sunny", ms(20)),
        ok("flights", "$500", ms(10)),
        ok("hotels", "$100", ms(30)),
    ];
    let failing: Vec<ProviderSpec<()>> = vec![
        ok("weather", "Rainy", ms(500)),
        failing("flights", "rate limited", ms(5)),
    ];

    let (ok, err) = tokio::join!(
        orch.run(healthy, (), secs(10)),
        orch.run(failing, (), secs(10)),
    );

    let values = ok.unwrap();
    assert_eq!(values.len(), 3);
    assert_eq!(values["weather"], "Sunny");
    assert_eq!(err.unwrap_err().provider(), Some("flights"));

    orch.shutdown().await;

    // Each run's span carries its own id, and no event strays across runs.
    let starts: Vec<Event> = recorder
        .of_kind(EventKind::SpanStarted)
        .into_iter()
        .filter(|e| e.span.as_deref() == Some(RUN_SPAN))
        .collect();
    assert_eq!(starts.len(), 2);
    let (run_a, run_b) = (starts[0].run, starts[1].run);
    assert_ne!(run_a, run_b);

    let events = recorder.events.lock().unwrap();
    for run in [run_a, run_b] {
        let mine: Vec<&Event> = events.iter().filter(|e| e.run == run).collect();
        let provider_starts = mine
            .iter()
            .filter(|e| e.kind == EventKind::SpanStarted && e.span.as_deref() != Some(RUN_SPAN))
            .count();
        let provider_ends = mine
            .iter()
            .filter(|e| e.kind == EventKind::SpanEnded && e.span.as_deref() != Some(RUN_SPAN))
            .count();
        assert_eq!(provider_starts, provider_ends);
        assert!(provider_starts == 2 || provider_starts == 3);
    }
    assert!(events.iter().all(|e| e.run == run_a || e.run == run_b));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn simultaneous_failures_on_parallel_workers() {
    let orch = orchestrator();
    for _ in 0..20 {
        let providers: Vec<ProviderSpec<()>> = vec![
            ok("weather", "Sunny", secs(5)),
            ProviderSpec::new(StubProvider::fail("flights", "rate limited")),
            ProviderSpec::new(StubProvider::fail("hotels", "sold out")),
        ];

        let err = orch.run(providers, (), secs(10)).await.unwrap_err();
        let provider = err.provider().unwrap();
        assert!(
        provider == "flights" || provider == "hotels",
        "unexpected provider {provider}"
    );
    }
}
