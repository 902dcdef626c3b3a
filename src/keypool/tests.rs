use super::*;
use std::sync::atomic::Ordering;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

fn pool_of(n: usize) -> KeyPool {
    let tokens = (0..n).map(|i| format!("test-api-key-{:02}", i)).collect();
    KeyPool::new(tokens, Duration::from_secs(300))
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

#[test]
fn test_single_key_always_selected() {
    let pool = pool_of(1);
    for _ in 0..5 {
        let key = pool.select_key();
        pool.record_outcome(key, true);
    }
    assert_eq!(pool.keys()[0].request_count(), 5);
}

#[test]
fn test_load_balances_by_request_count() {
    let pool = pool_of(3);
    for _ in 0..30 {
        let key = pool.select_key();
        pool.record_outcome(key, true);
    }

    let counts: Vec<u64> = pool.keys().iter().map(|k| k.request_count()).collect();
    let min = *counts.iter().min().unwrap();
    let max = *counts.iter().max().unwrap();
    assert!(
        max - min <= 1,
        "request counts diverged by more than 1: {:?}",
        counts
    );
    assert_eq!(counts.iter().sum::<u64>(), 30);
}

#[test]
fn test_idle_key_preferred_over_least_used() {
    let pool = pool_of(2);
    let now = now_secs();

    // key 0: heavily used but idle past the threshold
    pool.keys()[0].requests.store(50, Ordering::SeqCst);
    pool.keys()[0].last_used.store(now - 400, Ordering::SeqCst);
    // key 1: barely used but active just now
    pool.keys()[1].requests.store(1, Ordering::SeqCst);
    pool.keys()[1].last_used.store(now, Ordering::SeqCst);

    let selected = pool.select_key();
    assert_eq!(selected.masked(), pool.keys()[0].masked());
}

#[test]
fn test_longest_idle_wins_among_idle_keys() {
    let pool = pool_of(3);
    let now = now_secs();

    pool.keys()[0].last_used.store(now - 400, Ordering::SeqCst);
    pool.keys()[1].last_used.store(now - 900, Ordering::SeqCst);
    pool.keys()[2].last_used.store(now, Ordering::SeqCst);

    let selected = pool.select_key();
    assert_eq!(selected.masked(), pool.keys()[1].masked());
}

#[test]
fn test_recently_used_keys_balance_by_volume() {
    let pool = pool_of(2);
    let now = now_secs();

    pool.keys()[0].requests.store(10, Ordering::SeqCst);
    pool.keys()[0].last_used.store(now, Ordering::SeqCst);
    pool.keys()[1].requests.store(3, Ordering::SeqCst);
    pool.keys()[1].last_used.store(now, Ordering::SeqCst);

    let selected = pool.select_key();
    assert_eq!(selected.masked(), pool.keys()[1].masked());
}

#[test]
fn test_record_outcome_failure_increments_errors() {
    let pool = pool_of(1);
    let key = pool.select_key();
    pool.record_outcome(key, false);

    let key = &pool.keys()[0];
    assert_eq!(key.request_count(), 1);
    assert_eq!(key.error_count(), 1);
    assert!(key.last_used_at().is_some());
}

#[test]
fn test_record_outcome_success_leaves_errors() {
    let pool = pool_of(1);
    let key = pool.select_key();
    pool.record_outcome(key, true);

    let key = &pool.keys()[0];
    assert_eq!(key.request_count(), 1);
    assert_eq!(key.error_count(), 0);
}

#[test]
fn test_usage_stats_masks_identifiers() {
    let pool = pool_of(2);
    let stats = pool.usage_stats();
    assert_eq!(stats.len(), 2);
    for entry in &stats {
        assert!(entry.identifier.contains("..."));
        assert!(!entry.identifier.contains("test-api-key"));
    }
}

#[test]
fn test_seed_usage_restores_matching_keys() {
    let pool = pool_of(2);
    let mut stats = pool.usage_stats();
    stats[0].requests = 42;
    stats[0].errors = 3;
    stats[1].identifier = "no-such-key".to_string();
    stats[1].requests = 99;

    pool.seed_usage(&stats);
    assert_eq!(pool.keys()[0].request_count(), 42);
    assert_eq!(pool.keys()[0].error_count(), 3);
    assert_eq!(pool.keys()[1].request_count(), 0);
}

#[test]
#[should_panic(expected = "at least one key")]
fn test_empty_pool_panics() {
    KeyPool::new(Vec::new(), Duration::from_secs(300));
}
