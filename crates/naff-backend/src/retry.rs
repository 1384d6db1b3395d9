use std::time::Duration;

/// Bounded retry for idempotent requests that failed before any response
/// arrived. Backoff grows linearly with the attempt number.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub base_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_backoff_ms: 150,
        }
    }
}

impl RetryPolicy {
    /// A policy that sends every request exactly once.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            base_backoff_ms: 0,
        }
    }

    pub fn backoff(&self, attempt: usize) -> Duration {
        Duration::from_millis(self.base_backoff_ms.saturating_mul(attempt as u64))
    }

    pub fn allows_another(&self, attempt: usize) -> bool {
        attempt < self.max_attempts.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_is_linear() {
        let policy = RetryPolicy {
            max_attempts: 4,
            base_backoff_ms: 100,
        };
        assert_eq!(policy.backoff(1), Duration::from_millis(100));
        assert_eq!(policy.backoff(3), Duration::from_millis(300));
    }

    #[test]
    fn zero_attempts_still_sends_once() {
        let policy = RetryPolicy {
            max_attempts: 0,
            base_backoff_ms: 10,
        };
        assert!(!policy.allows_another(1));
        assert!(!RetryPolicy::none().allows_another(1));
        assert!(RetryPolicy::default().allows_another(2));
        assert!(!RetryPolicy::default().allows_another(3));
    }
}
