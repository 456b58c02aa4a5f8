use anyhow::{Context, Result, anyhow};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::providers::{self, TranslationProvider};
use crate::session::{JobManager, JobStatus, JobStore};
use crate::subtitle_processor::SubtitleCollection;

// @module: Application controller for subtitle translation

/// How often the controller polls job status
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Main application controller for subtitle translation
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Background job runner shared by all files
    manager: JobManager,
    // @field: Progress bars of the current run
    multi_progress: MultiProgress,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let provider = providers::from_config(&config.translation).context("Failed to create translation provider")?;
        Ok(Self::with_provider(config, provider))
    }

    // @method: Create a controller around an existing provider
    pub fn with_provider(config: Config, provider: Arc<dyn TranslationProvider>) -> Self {
        let manager = JobManager::new(provider, config.translation.limits(), Arc::new(JobStore::new()));
        Self {
            config,
            manager,
            multi_progress: MultiProgress::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn manager(&self) -> &JobManager {
        &self.manager
    }

    fn output_dir(&self, override_dir: Option<&Path>) -> PathBuf {
        override_dir
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.config.resolved_output_dir())
    }

    fn bar_style(unit: &str) -> ProgressStyle {
        ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {} ({{percent}}%) {{msg}}",
                unit
            ))
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓▒░")
    }

    /// Translate one subtitle file and write the result.
    ///
    /// Returns `None` when the output already exists and `force_overwrite` is off.
    pub async fn run(
        &self,
        input_file: &Path,
        output_dir: Option<&Path>,
        force_overwrite: bool,
    ) -> Result<Option<PathBuf>> {
        let start_time = Instant::now();
        let target_language = &self.config.target_language;
        let input_name = input_file
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .ok_or_else(|| anyhow!("Input path has no file name: {:?}", input_file))?;

        let output_path = FileManager::generate_output_path(input_file, self.output_dir(output_dir), target_language);
        if output_path.exists() && !force_overwrite {
            warn!("Output file already exists: {:?}. Use -f to force overwrite.", output_path);
            return Ok(None);
        }

        let job_id = self.manager.submit(input_file, &input_name, target_language)?;
        debug!("Submitted {:?} as job {}", input_file, job_id);

        let progress_bar = self.multi_progress.add(ProgressBar::new(0));
        progress_bar.set_style(Self::bar_style("entries"));
        progress_bar.set_message(input_name.clone());

        let job = loop {
            let job = self
                .manager
                .status(&job_id)
                .ok_or_else(|| anyhow!("Job {} disappeared from the store", job_id))?;

            if let (Some(done), Some(total)) = (job.translated_count, job.total_count) {
                progress_bar.set_length(total as u64);
                progress_bar.set_position(done as u64);
            }
            if job.is_terminal() {
                break job;
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        };

        match job.status {
            JobStatus::Completed => {
                let content = job.output_content.unwrap_or_default();
                FileManager::write_to_file(&output_path, &content)?;
                progress_bar.finish_and_clear();
                info!("Success: {:?} ({:.1}s)", output_path, start_time.elapsed().as_secs_f64());
                Ok(Some(output_path))
            }
            _ => {
                progress_bar.abandon();
                let message = job.error_message.unwrap_or_else(|| "Translation failed".to_string());
                Err(anyhow!(message))
            }
        }
    }

    /// Translate every subtitle file under a directory.
    ///
    /// Failures are logged per file; returns the number of files translated.
    pub async fn run_folder(&self, input_dir: &Path, output_dir: Option<&Path>, force_overwrite: bool) -> Result<usize> {
        let start_time = Instant::now();
        let files = FileManager::find_subtitle_files(input_dir, &self.config.target_language)?;
        if files.is_empty() {
            warn!("No subtitle files found in {:?}", input_dir);
            return Ok(0);
        }

        let folder_pb = self.multi_progress.add(ProgressBar::new(files.len() as u64));
        folder_pb.set_style(Self::bar_style("files"));
        folder_pb.set_message("Processing files");

        let mut translated = 0;
        let mut failed = 0;
        for file in &files {
            match self.run(file, output_dir, force_overwrite).await {
                Ok(Some(_)) => translated += 1,
                Ok(None) => {}
                Err(e) => {
                    failed += 1;
                    error!("Error processing {:?}: {}", file, e);
                }
            }
            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("Folder processing complete");
        info!(
            "Translated {} of {} files ({} failed) in {:.1}s",
            translated,
            files.len(),
            failed,
            start_time.elapsed().as_secs_f64()
        );
        Ok(translated)
    }

    /// Check that a file is a subtitle stream; returns its entry count
    pub fn validate_file(path: &Path) -> Result<usize> {
        SubtitleCollection::validate_file(path).with_context(|| format!("Validation failed for {:?}", path))?;
        let entries = SubtitleCollection::parse_file(path).with_context(|| format!("Failed to parse {:?}", path))?;
        Ok(entries.len())
    }
}
