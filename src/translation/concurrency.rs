/*!
 * Orchestration limits and provider-specific concurrency tuning.
 *
 * Limits are always clamped rather than rejected: a zero batch size becomes one,
 * a tiny character budget becomes the planner floor and zero parallelism becomes one.
 */

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::app_config::ProviderKind;
use crate::translation::batch::MIN_BATCH_CHARS;

/// What the orchestrator does with in-flight batches once one of them fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Let every dispatched batch finish, then report the failure
    #[default]
    WaitForAll,
    /// Abort batches still running as soon as a failure is observed
    CancelOnFirstFailure,
}

/// Limits applied to one orchestration run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrchestratorLimits {
    pub max_entries_per_batch: usize,
    pub max_chars_per_batch: usize,
    pub max_concurrent_batches: usize,
    pub batch_timeout: Option<Duration>,
    pub failure_policy: FailurePolicy,
}

impl OrchestratorLimits {
    pub fn new(max_entries_per_batch: usize, max_chars_per_batch: usize, max_concurrent_batches: usize) -> Self {
        Self {
            max_entries_per_batch: max_entries_per_batch.max(1),
            max_chars_per_batch: max_chars_per_batch.max(MIN_BATCH_CHARS),
            max_concurrent_batches: max_concurrent_batches.max(1),
            batch_timeout: None,
            failure_policy: FailurePolicy::default(),
        }
    }

    /// Set a per-batch deadline; zero or `None` disables it
    pub fn with_batch_timeout_secs(mut self, secs: Option<u64>) -> Self {
        self.batch_timeout = secs.filter(|s| *s > 0).map(Duration::from_secs);
        self
    }

    pub fn with_batch_timeout(mut self, timeout: Duration) -> Self {
        self.batch_timeout = Some(timeout);
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }
}

impl Default for OrchestratorLimits {
    fn default() -> Self {
        Self::new(40, 12_000, 4)
    }
}

/// Provider-specific concurrency profile with tuned defaults
#[derive(Debug, Clone)]
pub struct ProviderProfile {
    /// Maximum concurrent requests
    pub max_concurrent_requests: usize,
    /// Recommended entries per batch
    pub recommended_batch_size: usize,
    /// Recommended payload budget per batch
    pub recommended_batch_chars: usize,
}

impl ProviderProfile {
    /// Get the profile for a given provider
    pub fn for_provider(provider: ProviderKind) -> Self {
        match provider {
            ProviderKind::Anthropic => Self {
                // Lower rate limits, large context
                max_concurrent_requests: 4,
                recommended_batch_size: 40,
                recommended_batch_chars: 12_000,
            },
            ProviderKind::DeepL => Self {
                // DeepL caps a request at 50 texts and 128 KiB
                max_concurrent_requests: 6,
                recommended_batch_size: 50,
                recommended_batch_chars: 100_000,
            },
            ProviderKind::Mock => Self {
                max_concurrent_requests: 8,
                recommended_batch_size: 40,
                recommended_batch_chars: 12_000,
            },
        }
    }
}
