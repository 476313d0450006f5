use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};
use std::time::Duration;

use tokio::sync::{Mutex, mpsc};

use super::classifier::{ClassificationResult, Classifier, classify};
use super::recognizer::RecognizeError;
use super::tensor::InputTensor;

/// Outcome of one recognition request.
#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionOutcome {
    Success(ClassificationResult),
    Failed(String),
    TimedOut,
}

/// Status of the most recent request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionStatus {
    Idle,
    /// Inference for this ticket is running.
    Running(u64),
    /// This ticket's result is available.
    Completed(u64),
    Failed(String),
    TimedOut(u64),
}

struct RecognitionRequest {
    ticket: u64,
    tensor: InputTensor,
}

/// Runs inference off the caller's thread.
///
/// Requests are handled one at a time. Requests queued behind a running one
/// collapse to the newest, and a result is published only if no newer
/// request was submitted meanwhile.
#[derive(Clone)]
pub struct RecognitionService {
    request_tx: mpsc::UnboundedSender<RecognitionRequest>,
    latest_ticket: Arc<AtomicU64>,
    status: Arc<Mutex<RecognitionStatus>>,
    last_result: Arc<Mutex<Option<RecognitionOutcome>>>,
}

impl RecognitionService {
    /// Spawns the worker on `runtime_handle`.
    pub fn new(
        runtime_handle: &tokio::runtime::Handle,
        classifier: Arc<dyn Classifier>,
        timeout: Duration,
    ) -> Self {
        let (request_tx, mut request_rx) = mpsc::unbounded_channel::<RecognitionRequest>();
        let latest_ticket = Arc::new(AtomicU64::new(0));
        let status = Arc::new(Mutex::new(RecognitionStatus::Idle));
        let last_result = Arc::new(Mutex::new(None));

        let latest_clone = latest_ticket.clone();
        let status_clone = status.clone();
        let result_clone = last_result.clone();

        runtime_handle.spawn(async move {
            while let Some(mut request) = request_rx.recv().await {
                while let Ok(newer) = request_rx.try_recv() {
                    log::debug!("Dropping superseded recognition request {}", request.ticket);
                    request = newer;
                }

                let ticket = request.ticket;
                log::debug!("Processing recognition request {}", ticket);
                *status_clone.lock().await = RecognitionStatus::Running(ticket);

                let classifier = classifier.clone();
                let mut task = tokio::task::spawn_blocking(move || {
                    classify(classifier.as_ref(), &request.tensor)
                });

                let outcome = match tokio::time::timeout(timeout, &mut task).await {
                    Ok(Ok(Ok(result))) => RecognitionOutcome::Success(result),
                    Ok(Ok(Err(err))) => RecognitionOutcome::Failed(err.to_string()),
                    Ok(Err(err)) => RecognitionOutcome::Failed(format!("Inference task failed: {}", err)),
                    Err(_) => RecognitionOutcome::TimedOut,
                };

                let timed_out = outcome == RecognitionOutcome::TimedOut;
                if ticket != latest_clone.load(Ordering::SeqCst) {
                    log::debug!("Discarding stale recognition result {}", ticket);
                } else {
                    publish(&status_clone, &result_clone, ticket, timeout, outcome).await;
                }

                // The next request waits until the abandoned inference returns.
                if timed_out {
                    let _ = task.await;
                    log::debug!("Timed-out recognition {} finished", ticket);
                }
            }
        });

        Self {
            request_tx,
            latest_ticket,
            status,
            last_result,
        }
    }

    /// Queues `tensor` for classification and returns its ticket.
    ///
    /// Non-blocking. Any earlier request still pending becomes stale.
    pub fn submit(&self, tensor: InputTensor) -> Result<u64, RecognizeError> {
        let ticket = self.latest_ticket.fetch_add(1, Ordering::SeqCst) + 1;
        self.request_tx
            .send(RecognitionRequest { ticket, tensor })
            .map_err(|_| RecognizeError::ServiceStopped)?;
        Ok(ticket)
    }

    /// Ticket of the newest submitted request, 0 before the first.
    pub fn latest_ticket(&self) -> u64 {
        self.latest_ticket.load(Ordering::SeqCst)
    }

    pub async fn status(&self) -> RecognitionStatus {
        self.status.lock().await.clone()
    }

    /// Takes the published result, if any.
    pub async fn take_result(&self) -> Option<RecognitionOutcome> {
        self.last_result.lock().await.take()
    }

    /// Non-blocking variant of [`take_result`](Self::take_result).
    pub fn try_take_result(&self) -> Option<RecognitionOutcome> {
        self.last_result.try_lock().ok().and_then(|mut r| r.take())
    }

    /// Waits until a result is published or `limit` elapses.
    pub async fn wait_for_result(&self, limit: Duration) -> Option<RecognitionOutcome> {
        let poll = async {
            loop {
                if let Some(outcome) = self.take_result().await {
                    return outcome;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        };
        tokio::time::timeout(limit, poll).await.ok()
    }
}

async fn publish(
    status: &Mutex<RecognitionStatus>,
    last_result: &Mutex<Option<RecognitionOutcome>>,
    ticket: u64,
    timeout: Duration,
    outcome: RecognitionOutcome,
) {
    let new_status = match &outcome {
        RecognitionOutcome::Success(result) => {
            log::info!("Recognition {} finished: {}", ticket, result.top_label());
            RecognitionStatus::Completed(ticket)
        }
        RecognitionOutcome::Failed(message) => {
            log::error!("Recognition {} failed: {}", ticket, message);
            RecognitionStatus::Failed(message.clone())
        }
        RecognitionOutcome::TimedOut => {
            log::warn!("Recognition {} timed out after {:?}", ticket, timeout);
            RecognitionStatus::TimedOut(ticket)
        }
    };
    *status.lock().await = new_status;
    *last_result.lock().await = Some(outcome);
}

#[cfg(test)]
impl RecognitionService {
    pub(crate) fn with_closed_channel_for_test() -> Self {
        let (tx, rx) = mpsc::unbounded_channel::<RecognitionRequest>();
        drop(rx);
        Self {
            request_tx: tx,
            latest_ticket: Arc::new(AtomicU64::new(0)),
            status: Arc::new(Mutex::new(RecognitionStatus::Idle)),
            last_result: Arc::new(Mutex::new(None)),
        }
    }
}
