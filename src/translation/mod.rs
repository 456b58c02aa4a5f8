/*!
 * Translation engine for subtitle documents.
 *
 * This module contains the batch translation pipeline. It is split into several submodules:
 *
 * - `batch`: Batch planning under entry-count and payload-size limits
 * - `concurrency`: Orchestration limits, failure policy and provider profiles
 * - `orchestrator`: Bounded-parallel batch execution and reassembly
 * - `prompts`: Marker-delimited payload codec for chat-style providers
 */

// Re-export main types for easier usage
pub use self::batch::BatchPlanner;
pub use self::concurrency::{FailurePolicy, OrchestratorLimits, ProviderProfile};
pub use self::orchestrator::TranslationOrchestrator;

// Submodules
pub mod batch;
pub mod concurrency;
pub mod orchestrator;
pub mod prompts;
