/*!
 * # srt-relay - parallel subtitle translation
 *
 * A Rust library for translating `.srt` subtitle files through external
 * translation providers.
 *
 * ## Features
 *
 * - Validate, parse and serialize SRT subtitle streams
 * - Plan provider batches under an entry-count cap and a payload-size budget
 * - Translate batches with bounded parallelism:
 *   - Anthropic API (marker-delimited payload)
 *   - DeepL API
 *   - In-process mock provider
 * - Reassemble the document in original order, keeping untranslated entries
 * - Track background jobs and their progress in an in-process store
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `subtitle_processor`: Subtitle file handling and processing
 * - `translation`: Batch translation engine:
 *   - `translation::batch`: Batch planning
 *   - `translation::concurrency`: Limits and failure policy
 *   - `translation::orchestrator`: Parallel execution and reassembly
 *   - `translation::prompts`: Marker payload codec
 * - `session`: Job models, progress store and job manager
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `providers`: Translation provider trait and clients
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod providers;
pub mod session;
pub mod subtitle_processor;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{MalformedInput, ProviderError, SubtitleError, TranslationError};
pub use language_utils::get_language_name;
pub use providers::{BatchTranslation, TranslationProvider};
pub use session::{Job, JobManager, JobStatus, JobStore, TranslationRequest};
pub use subtitle_processor::{SubtitleCollection, SubtitleEntry};
pub use translation::{BatchPlanner, FailurePolicy, OrchestratorLimits, TranslationOrchestrator};
