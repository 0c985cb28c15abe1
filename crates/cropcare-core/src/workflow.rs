//! Async driver for one prediction request.
//!
//! While the request is in flight a simulated progress indicator ticks every
//! 200ms by a random 0–15 points and stalls at 90%. It reflects nothing about
//! the actual transfer. The ticker runs under its own [`CancellationToken`]
//! and is stopped on both the success and the failure path.

use std::future::Future;
use std::time::Duration;

use tokio::time::{Instant, interval_at, sleep};
use tokio_util::sync::CancellationToken;

use crate::upload::ImageFile;
use crate::{ApiClient, ClientError, PredictionResult};

pub const PROGRESS_TICK: Duration = Duration::from_millis(200);
pub const PROGRESS_STEP_MAX: f64 = 15.0;
/// The simulated bar never passes this before the response arrives.
pub const PROGRESS_CEILING: f64 = 90.0;
/// After 100%, the loading panel hides after this long...
pub const LOADING_HIDE_DELAY: Duration = Duration::from_millis(500);
/// ...and the results appear after this long.
pub const RESULT_REVEAL_DELAY: Duration = Duration::from_millis(600);

pub const MSG_SUCCESS: &str = "Analysis completed successfully!";
pub const MSG_UPLOAD_FAILED: &str = "Upload failed. Please try again.";
pub const MSG_NETWORK_ERROR: &str = "Network error. Please check your connection.";

/// Anything that can turn an image into a prediction.
pub trait PredictBackend: Sync {
    fn predict(
        &self,
        file: &ImageFile,
    ) -> impl Future<Output = Result<PredictionResult, ClientError>> + Send;
}

impl PredictBackend for ApiClient {
    async fn predict(&self, file: &ImageFile) -> Result<PredictionResult, ClientError> {
        ApiClient::predict(self, file).await
    }
}

/// Placeholder progress, clamped to [`PROGRESS_CEILING`] until completed.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProgressMeter {
    percent: f64,
}

impl ProgressMeter {
    pub fn percent(&self) -> f64 {
        self.percent
    }

    /// Add `step` points, never passing the ceiling.
    pub fn advance(&mut self, step: f64) -> f64 {
        self.percent = (self.percent + step.max(0.0)).min(PROGRESS_CEILING);
        self.percent
    }

    pub fn is_stalled(&self) -> bool {
        self.percent >= PROGRESS_CEILING
    }

    pub fn complete(&mut self) {
        self.percent = 100.0;
    }

    pub fn label(&self) -> String {
        format!("{}%", self.percent.round())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowEvent {
    /// New progress value, 0–100.
    Progress(f64),
    LoadingHidden,
    Completed(PredictionResult),
    /// User-facing failure message.
    Failed(String),
}

/// Message shown to the user when a prediction fails.
pub fn failure_message(err: &ClientError) -> String {
    match err {
        ClientError::Status(_) | ClientError::Parse(_) => MSG_UPLOAD_FAILED.to_string(),
        ClientError::Http(_) | ClientError::Io(_) => MSG_NETWORK_ERROR.to_string(),
        ClientError::Rejected(msg) | ClientError::Backend(msg) => msg.clone(),
    }
}

/// Tick the simulated progress until it stalls or `cancel` fires.
pub async fn simulate_progress(
    on_event: &(impl Fn(WorkflowEvent) + Sync),
    cancel: CancellationToken,
    mut step: impl FnMut() -> f64,
) {
    let mut meter = ProgressMeter::default();
    let mut ticks = interval_at(Instant::now() + PROGRESS_TICK, PROGRESS_TICK);
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticks.tick() => {
                on_event(WorkflowEvent::Progress(meter.advance(step())));
                if meter.is_stalled() {
                    break;
                }
            }
        }
    }
}

/// Upload `file`, animating progress meanwhile, and report every step
/// through `on_event`.
///
/// The request itself is not cancellable; `cancel` only stops the ticker
/// early (e.g. on shutdown). No retry is attempted.
pub async fn run_prediction<B: PredictBackend>(
    backend: &B,
    file: &ImageFile,
    on_event: impl Fn(WorkflowEvent) + Sync,
    cancel: CancellationToken,
) -> Result<PredictionResult, ClientError> {
    let ticker_cancel = cancel.child_token();
    let ticker = simulate_progress(&on_event, ticker_cancel.clone(), || {
        fastrand::f64() * PROGRESS_STEP_MAX
    });
    let request = async {
        let outcome = backend.predict(file).await;
        ticker_cancel.cancel();
        outcome
    };
    let ((), outcome) = tokio::join!(ticker, request);

    match outcome {
        Ok(result) => {
            on_event(WorkflowEvent::Progress(100.0));
            sleep(LOADING_HIDE_DELAY).await;
            on_event(WorkflowEvent::LoadingHidden);
            sleep(RESULT_REVEAL_DELAY - LOADING_HIDE_DELAY).await;
            log::info!(
                "prediction for {}: {} ({}%)",
                file.name,
                result.prediction,
                result.confidence
            );
            on_event(WorkflowEvent::Completed(result.clone()));
            Ok(result)
        }
        Err(e) => {
            log::warn!("prediction for {} failed: {e}", file.name);
            on_event(WorkflowEvent::Failed(failure_message(&e)));
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    struct FakeBackend {
        delay: Duration,
        outcome: fn() -> Result<PredictionResult, ClientError>,
    }

    impl PredictBackend for FakeBackend {
        async fn predict(&self, _file: &ImageFile) -> Result<PredictionResult, ClientError> {
            sleep(self.delay).await;
            (self.outcome)()
        }
    }

    fn blight() -> Result<PredictionResult, ClientError> {
        Ok(PredictionResult {
            prediction: "Corn Blight".into(),
            confidence: 72.0,
            crop_type: "Corn".into(),
            is_healthy: false,
            image_url: None,
        })
    }

    fn server_error() -> Result<PredictionResult, ClientError> {
        Err(ClientError::Status(reqwest::StatusCode::INTERNAL_SERVER_ERROR))
    }

    fn recorder() -> (Arc<Mutex<Vec<WorkflowEvent>>>, impl Fn(WorkflowEvent) + Sync) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        (events, move |e| sink.lock().unwrap().push(e))
    }

    fn leaf() -> ImageFile {
        ImageFile::new("leaf.jpg", "image/jpeg", vec![0xFF, 0xD8])
    }

    #[test]
    fn meter_clamps_at_ceiling() {
        let mut meter = ProgressMeter::default();
        for _ in 0..20 {
            meter.advance(15.0);
        }
        assert_eq!(meter.percent(), 90.0);
        assert!(meter.is_stalled());
        meter.complete();
        assert_eq!(meter.label(), "100%");
    }

    #[test]
    fn meter_ignores_negative_steps() {
        let mut meter = ProgressMeter::default();
        meter.advance(-5.0);
        assert_eq!(meter.percent(), 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_stalls_at_ninety() {
        let (events, sink) = recorder();
        simulate_progress(&sink, CancellationToken::new(), || 15.0).await;
        let values: Vec<f64> = events
            .lock()
            .unwrap()
            .iter()
            .map(|e| match e {
                WorkflowEvent::Progress(p) => *p,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(values, vec![15.0, 30.0, 45.0, 60.0, 75.0, 90.0]);
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_stops_on_cancel() {
        let (events, sink) = recorder();
        let cancel = CancellationToken::new();
        cancel.cancel();
        simulate_progress(&sink, cancel, || 1.0).await;
        assert!(events.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn success_reaches_hundred_then_completes() {
        let backend = FakeBackend {
            delay: Duration::from_millis(1000),
            outcome: blight,
        };
        let (events, sink) = recorder();
        let started = Instant::now();
        let result = run_prediction(&backend, &leaf(), sink, CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(result.crop_type, "Corn");
        assert!(started.elapsed() >= Duration::from_millis(1600));

        let events = events.lock().unwrap();
        let n = events.len();
        assert_eq!(events[n - 3], WorkflowEvent::Progress(100.0));
        assert_eq!(events[n - 2], WorkflowEvent::LoadingHidden);
        assert!(matches!(&events[n - 1], WorkflowEvent::Completed(r) if r.confidence == 72.0));
        for e in &events[..n - 3] {
            match e {
                WorkflowEvent::Progress(p) => assert!(*p <= PROGRESS_CEILING),
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn failure_stops_ticker_and_reports_message() {
        let backend = FakeBackend {
            delay: Duration::from_millis(450),
            outcome: server_error,
        };
        let (events, sink) = recorder();
        let err = run_prediction(&backend, &leaf(), sink, CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Status(_)));

        // Let any stray ticker fire; none should.
        sleep(Duration::from_secs(2)).await;
        let events = events.lock().unwrap();
        let progress_ticks = events
            .iter()
            .filter(|e| matches!(e, WorkflowEvent::Progress(_)))
            .count();
        assert_eq!(progress_ticks, 2);
        assert_eq!(
            events.last(),
            Some(&WorkflowEvent::Failed(MSG_UPLOAD_FAILED.to_string()))
        );
    }

    #[test]
    fn failure_messages() {
        assert_eq!(
            failure_message(&ClientError::Rejected("No image selected".into())),
            "No image selected"
        );
        assert_eq!(
            failure_message(&ClientError::Io(std::io::Error::other("reset"))),
            MSG_NETWORK_ERROR
        );
    }
}
