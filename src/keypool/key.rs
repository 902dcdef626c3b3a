use std::sync::atomic::{AtomicU64, Ordering};

/// One API credential with its runtime usage counters.
///
/// Counters are atomics so concurrent lookups can record outcomes without
/// a lock; a key is created once at pool construction and never removed.
#[derive(Debug)]
pub struct ApiKey {
    /// The bearer token itself; never logged or serialized
    token: String,
    /// Lifetime request count (atomic)
    pub requests: AtomicU64,
    /// Lifetime error count (atomic)
    pub errors: AtomicU64,
    /// Last use as epoch seconds; 0 means never used (atomic)
    pub last_used: AtomicU64,
}

impl ApiKey {
    pub fn new(token: String) -> Self {
        Self {
            token,
            requests: AtomicU64::new(0),
            errors: AtomicU64::new(0),
            last_used: AtomicU64::new(0),
        }
    }

    /// The raw token, for the Authorization header only.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Masked identifier safe for logs, snapshots, and display:
    /// first five and last five characters of the token.
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.token.chars().collect();
        if chars.len() > 10 {
            let head: String = chars[..5].iter().collect();
            let tail: String = chars[chars.len() - 5..].iter().collect();
            format!("{}...{}", head, tail)
        } else {
            "*".repeat(chars.len())
        }
    }

    pub fn request_count(&self) -> u64 {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn error_count(&self) -> u64 {
        self.errors.load(Ordering::SeqCst)
    }

    /// Epoch seconds of the last use, or None if the key was never used.
    pub fn last_used_at(&self) -> Option<u64> {
        match self.last_used.load(Ordering::SeqCst) {
            0 => None,
            at => Some(at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masked_long_token() {
        let key = ApiKey::new("abcdefghijklmnop".to_string());
        assert_eq!(key.masked(), "abcde...lmnop");
    }

    #[test]
    fn test_masked_short_token() {
        let key = ApiKey::new("short".to_string());
        assert_eq!(key.masked(), "*****");
    }

    #[test]
    fn test_new_key_never_used() {
        let key = ApiKey::new("abcdefghijklmnop".to_string());
        assert_eq!(key.request_count(), 0);
        assert_eq!(key.error_count(), 0);
        assert_eq!(key.last_used_at(), None);
    }
}
