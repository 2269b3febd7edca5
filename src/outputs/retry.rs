use std::time::Duration;

use crate::config::RetrySettings;

/// What went wrong on one synthesis attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptFailure {
    /// Engine reported success but the clip is missing or too small.
    TooSmall,
    /// Engine raised an error or timed out.
    EngineError,
}

/// Per-segment retry policy for speech synthesis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub too_small_backoff: Duration,
    pub error_backoff: Duration,
    /// A clip must be strictly larger than this to count as synthesized.
    pub min_clip_bytes: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetrySettings::default())
    }
}

impl From<&RetrySettings> for RetryPolicy {
    fn from(settings: &RetrySettings) -> Self {
        Self {
            max_attempts: settings.max_attempts.max(1),
            too_small_backoff: Duration::from_millis(settings.too_small_backoff_ms),
            error_backoff: Duration::from_millis(settings.error_backoff_ms),
            min_clip_bytes: settings.min_clip_bytes,
        }
    }
}

impl RetryPolicy {
    /// Same attempt ceiling and size floor, no sleeping.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            too_small_backoff: Duration::ZERO,
            error_backoff: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Delay before the next attempt, or `None` once the ceiling is reached.
    /// `attempt` is 1-based.
    pub fn backoff_after(&self, attempt: u32, failure: AttemptFailure) -> Option<Duration> {
        if attempt >= self.max_attempts {
            return None;
        }
        Some(match failure {
            AttemptFailure::TooSmall => self.too_small_backoff,
            AttemptFailure::EngineError => self.error_backoff,
        })
    }

    pub fn accepts(&self, clip_bytes: u64) -> bool {
        clip_bytes > self.min_clip_bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_schedule() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 2);
        assert_eq!(
            policy.backoff_after(1, AttemptFailure::TooSmall),
            Some(Duration::from_secs(1))
        );
        assert_eq!(
            policy.backoff_after(1, AttemptFailure::EngineError),
            Some(Duration::from_secs(2))
        );
        assert_eq!(policy.backoff_after(2, AttemptFailure::EngineError), None);
    }

    #[test]
    fn size_floor_is_exclusive() {
        let policy = RetryPolicy::default();
        assert!(!policy.accepts(1000));
        assert!(policy.accepts(1001));
    }
}
