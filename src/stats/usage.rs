use super::StatsSnapshot;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// Rolling buffer capacity for request timing samples.
const MAX_SAMPLES: usize = 1000;
/// Rolling buffer capacity for recent error messages.
const MAX_ERRORS: usize = 10;
/// Recency window for `requests_last_hour` / `avg_response_time`.
const WINDOW_SECS: u64 = 3600;

/// One request attempt: when it started and how long it took.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RequestSample {
    /// Epoch seconds at the start of the attempt
    pub started_at: u64,
    /// Wall-clock duration in seconds
    pub duration_secs: f64,
}

impl RequestSample {
    pub fn now(duration_secs: f64) -> Self {
        Self {
            started_at: epoch_secs(),
            duration_secs,
        }
    }
}

/// Global request counters and rolling windows shared by all lookups.
///
/// Counters are atomics; the two rolling buffers sit behind mutexes that
/// are only held for push/scan, never across an await point. This is the
/// ephemeral side of the stats model - the durable side is
/// [`StatsSnapshot`].
#[derive(Debug, Default)]
pub struct UsageTracker {
    total_requests: AtomicU64,
    error_count: AtomicU64,
    recent_errors: Mutex<VecDeque<String>>,
    samples: Mutex<VecDeque<RequestSample>>,
}

impl UsageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one upstream call (successful or not).
    pub fn record_request(&self) {
        self.total_requests.fetch_add(1, Ordering::SeqCst);
    }

    /// Count one failure and keep its message in the rolling error log.
    pub fn record_error(&self, message: String) {
        self.error_count.fetch_add(1, Ordering::SeqCst);
        let mut errors = self.recent_errors.lock().expect("error log lock poisoned");
        if errors.len() == MAX_ERRORS {
            errors.pop_front();
        }
        errors.push_back(message);
    }

    /// Append a timing sample, dropping the oldest past capacity.
    pub fn record_sample(&self, sample: RequestSample) {
        let mut samples = self.samples.lock().expect("sample buffer lock poisoned");
        if samples.len() == MAX_SAMPLES {
            samples.pop_front();
        }
        samples.push_back(sample);
    }

    pub fn total_requests(&self) -> u64 {
        self.total_requests.load(Ordering::SeqCst)
    }

    pub fn error_count(&self) -> u64 {
        self.error_count.load(Ordering::SeqCst)
    }

    /// Most recent error message, if any.
    pub fn last_error(&self) -> Option<String> {
        self.recent_errors
            .lock()
            .expect("error log lock poisoned")
            .back()
            .cloned()
    }

    pub fn recent_errors(&self) -> Vec<String> {
        self.recent_errors
            .lock()
            .expect("error log lock poisoned")
            .iter()
            .cloned()
            .collect()
    }

    /// Number of samples that started within the trailing hour.
    pub fn requests_last_hour(&self) -> u64 {
        let cutoff = epoch_secs().saturating_sub(WINDOW_SECS);
        self.samples
            .lock()
            .expect("sample buffer lock poisoned")
            .iter()
            .filter(|s| s.started_at > cutoff)
            .count() as u64
    }

    /// Mean duration of samples in the trailing hour, 0.0 when idle.
    pub fn avg_response_time(&self) -> f64 {
        let cutoff = epoch_secs().saturating_sub(WINDOW_SECS);
        let samples = self.samples.lock().expect("sample buffer lock poisoned");
        let recent: Vec<f64> = samples
            .iter()
            .filter(|s| s.started_at > cutoff)
            .map(|s| s.duration_secs)
            .collect();
        if recent.is_empty() {
            0.0
        } else {
            recent.iter().sum::<f64>() / recent.len() as f64
        }
    }

    /// Restore totals from a persisted snapshot.
    ///
    /// The rolling timing window is not replayed; recency stats restart
    /// empty after a process restart.
    pub fn seed(&self, snapshot: &StatsSnapshot) {
        self.total_requests
            .store(snapshot.total_requests, Ordering::SeqCst);
        self.error_count.store(snapshot.error_count, Ordering::SeqCst);
        if let Some(last_error) = &snapshot.last_error {
            let mut errors = self.recent_errors.lock().expect("error log lock poisoned");
            errors.clear();
            errors.push_back(last_error.clone());
        }
    }
}

fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
