use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

/// Subtitle file extension, without the dot
pub const SUBTITLE_EXTENSION: &str = "srt";

/// Longest language suffix put into output names
const MAX_SLUG_CHARS: usize = 24;

static NON_SLUG_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path).with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @checks: Extension is .srt, any case
    pub fn is_subtitle_file<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref()
            .extension()
            .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(SUBTITLE_EXTENSION))
    }

    /// Suffix identifying a target language in output names
    ///
    /// Lower-cased, runs of anything but `[a-z0-9]` collapsed to `-`, outer dashes
    /// trimmed, `translated` when nothing is left, at most 24 characters.
    pub fn language_slug(target_language: &str) -> String {
        let lowered = target_language.to_lowercase();
        let dashed = NON_SLUG_CHARS.replace_all(&lowered, "-");
        let slug: String = dashed.trim_matches('-').chars().take(MAX_SLUG_CHARS).collect();
        if slug.is_empty() { "translated".to_string() } else { slug }
    }

    // @generates: Output file name for a translated subtitle
    // @params: original_name, target_language
    pub fn output_file_name(original_name: &str, target_language: &str) -> String {
        let base = match original_name.len().checked_sub(4) {
            Some(cut)
                if original_name.is_char_boundary(cut)
                    && original_name[cut..].eq_ignore_ascii_case(".srt") =>
            {
                &original_name[..cut]
            }
            _ => original_name,
        };
        format!("{}_{}.{}", base, Self::language_slug(target_language), SUBTITLE_EXTENSION)
    }

    // @generates: Output path for translated subtitle
    // @params: input_file, output_dir, target_language
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        output_dir: P2,
        target_language: &str,
    ) -> PathBuf {
        let name = input_file
            .as_ref()
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        output_dir.as_ref().join(Self::output_file_name(&name, target_language))
    }

    /// Find subtitle files under a directory, skipping outputs already translated
    /// into `target_language`
    pub fn find_subtitle_files<P: AsRef<Path>>(dir: P, target_language: &str) -> Result<Vec<PathBuf>> {
        let translated_suffix = format!("_{}.{}", Self::language_slug(target_language), SUBTITLE_EXTENSION);
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true).sort_by_file_name() {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if !path.is_file() || !Self::is_subtitle_file(path) {
                continue;
            }

            let name = entry.file_name().to_string_lossy().to_lowercase();
            if name.ends_with(&translated_suffix) {
                continue;
            }
            result.push(path.to_path_buf());
        }

        Ok(result)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path).with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write bytes to a file, creating parent directories
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: impl AsRef<[u8]>) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content).with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;
        Ok(())
    }
}
