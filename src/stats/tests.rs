use super::*;
use chrono::{TimeZone, Utc};
use tempfile::tempdir;

fn sample_snapshot(total: u64, at_secs: i64) -> StatsSnapshot {
    StatsSnapshot {
        total_requests: total,
        error_count: 2,
        cache_size: 5,
        cache_hits: 40,
        cache_misses: 10,
        cache_hit_rate: 0.8,
        requests_last_hour: 12,
        avg_response_time: 0.25,
        last_error: Some("request to /players failed".to_string()),
        key_stats: vec![
            KeyUsageStats {
                identifier: "aaaaa...bbbbb".to_string(),
                requests: 30,
                errors: 1,
                last_used: Some(Utc.timestamp_opt(at_secs, 0).unwrap()),
            },
            KeyUsageStats {
                identifier: "ccccc...ddddd".to_string(),
                requests: 20,
                errors: 1,
                last_used: None,
            },
        ],
        recorded_at: Utc.timestamp_opt(at_secs, 0).unwrap(),
    }
}

#[tokio::test]
async fn test_memory_store_empty_returns_none() {
    let store = MemorySnapshotStore::new();
    assert!(store.load_latest().await.unwrap().is_none());
}

#[tokio::test]
async fn test_memory_store_round_trip() {
    let store = MemorySnapshotStore::new();
    let snapshot = sample_snapshot(100, 1_700_000_000);
    store.append(&snapshot).await.unwrap();

    let loaded = store.load_latest().await.unwrap().unwrap();
    assert_eq!(loaded, snapshot);
}

#[tokio::test]
async fn test_memory_store_returns_newest() {
    let store = MemorySnapshotStore::new();
    store
        .append(&sample_snapshot(1, 1_700_000_000))
        .await
        .unwrap();
    store
        .append(&sample_snapshot(2, 1_700_000_100))
        .await
        .unwrap();
    store
        .append(&sample_snapshot(3, 1_700_000_050))
        .await
        .unwrap();

    let loaded = store.load_latest().await.unwrap().unwrap();
    assert_eq!(loaded.total_requests, 2);
    assert_eq!(store.len(), 3); // history is preserved, never replaced
}

#[tokio::test]
async fn test_jsonl_store_empty_returns_none() {
    let dir = tempdir().unwrap();
    let store = JsonlSnapshotStore::new(dir.path().join("stats.jsonl"));
    assert!(store.load_latest().await.unwrap().is_none());
}

#[tokio::test]
async fn test_jsonl_store_round_trip() {
    let dir = tempdir().unwrap();
    let store = JsonlSnapshotStore::new(dir.path().join("stats.jsonl"));

    let snapshot = sample_snapshot(100, 1_700_000_000);
    store.append(&snapshot).await.unwrap();

    let loaded = store.load_latest().await.unwrap().unwrap();
    assert_eq!(loaded, snapshot);
}

#[tokio::test]
async fn test_jsonl_store_appends_history() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("stats.jsonl");
    let store = JsonlSnapshotStore::new(&path);

    store
        .append(&sample_snapshot(1, 1_700_000_000))
        .await
        .unwrap();
    store
        .append(&sample_snapshot(2, 1_700_000_100))
        .await
        .unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 2);

    let loaded = store.load_latest().await.unwrap().unwrap();
    assert_eq!(loaded.total_requests, 2);
}

#[tokio::test]
async fn test_jsonl_store_skips_corrupt_rows() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("stats.jsonl");

    let store = JsonlSnapshotStore::new(&path);
    store
        .append(&sample_snapshot(5, 1_700_000_000))
        .await
        .unwrap();

    // Corrupt trailing row, e.g. a crash mid-write
    let mut content = std::fs::read_to_string(&path).unwrap();
    content.push_str("{\"total_requests\": 9, \"recorded_at\": ");
    std::fs::write(&path, content).unwrap();

    let loaded = store.load_latest().await.unwrap().unwrap();
    assert_eq!(loaded.total_requests, 5);
}

#[test]
fn test_tracker_counts_requests_and_errors() {
    let tracker = UsageTracker::new();
    tracker.record_request();
    tracker.record_request();
    tracker.record_error("boom".to_string());

    assert_eq!(tracker.total_requests(), 2);
    assert_eq!(tracker.error_count(), 1);
    assert_eq!(tracker.last_error().as_deref(), Some("boom"));
}

#[test]
fn test_tracker_error_log_is_bounded() {
    let tracker = UsageTracker::new();
    for i in 0..25 {
        tracker.record_error(format!("error {}", i));
    }

    let errors = tracker.recent_errors();
    assert_eq!(errors.len(), 10);
    assert_eq!(errors.first().map(String::as_str), Some("error 15"));
    assert_eq!(tracker.last_error().as_deref(), Some("error 24"));
    assert_eq!(tracker.error_count(), 25);
}

#[test]
fn test_tracker_sample_buffer_is_bounded() {
    let tracker = UsageTracker::new();
    for _ in 0..1200 {
        tracker.record_sample(RequestSample::now(0.1));
    }

    assert_eq!(tracker.requests_last_hour(), 1000);
}

#[test]
fn test_tracker_window_excludes_old_samples() {
    let tracker = UsageTracker::new();
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs();

    tracker.record_sample(RequestSample {
        started_at: now.saturating_sub(7200),
        duration_secs: 9.0,
    });
    tracker.record_sample(RequestSample {
        started_at: now,
        duration_secs: 0.5,
    });

    assert_eq!(tracker.requests_last_hour(), 1);
    assert!((tracker.avg_response_time() - 0.5).abs() < f64::EPSILON);
}

#[test]
fn test_tracker_avg_zero_when_idle() {
    let tracker = UsageTracker::new();
    assert_eq!(tracker.avg_response_time(), 0.0);
    assert_eq!(tracker.requests_last_hour(), 0);
}

#[test]
fn test_tracker_seed_restores_totals() {
    let tracker = UsageTracker::new();
    tracker.seed(&sample_snapshot(100, 1_700_000_000));

    assert_eq!(tracker.total_requests(), 100);
    assert_eq!(tracker.error_count(), 2);
    assert_eq!(
        tracker.last_error().as_deref(),
        Some("request to /players failed")
    );
    // Recency windows restart empty after a restart
    assert_eq!(tracker.requests_last_hour(), 0);
}
