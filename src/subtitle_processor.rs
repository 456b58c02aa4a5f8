use std::fmt;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;
use regex::Regex;
use once_cell::sync::Lazy;
use log::debug;

use crate::errors::{MalformedInput, SubtitleError};

// @module: Subtitle parsing, validation and serialization

// @const: SRT time range line, optional trailing annotation
static TIME_RANGE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*\d{2}:\d{2}:\d{2},\d{3}\s*-->\s*\d{2}:\d{2}:\d{2},\d{3}(?:\s+.*)?\s*$")
        .expect("time range pattern is valid")
});

// @const: Lines inspected by the cheap structural check
pub const VALIDATION_SCAN_LINES: usize = 300;

const BYTE_ORDER_MARK: char = '\u{FEFF}';

// @struct: Single subtitle cue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleEntry {
    // @field: Numeric index, unique within a document but not necessarily sorted
    pub index: u32,

    // @field: Time range line, kept verbatim
    pub time_range: String,

    // @field: Display lines
    pub lines: Vec<String>,
}

impl SubtitleEntry {
    pub fn new(index: u32, time_range: impl Into<String>, lines: Vec<String>) -> Self {
        SubtitleEntry {
            index,
            time_range: time_range.into(),
            lines,
        }
    }

    /// Joined display text, one line per row
    pub fn original_text(&self) -> String {
        self.lines.join("\n")
    }

    /// Same cue with its lines replaced
    pub fn with_lines(&self, lines: Vec<String>) -> Self {
        SubtitleEntry {
            index: self.index,
            time_range: self.time_range.clone(),
            lines,
        }
    }
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.index)?;
        writeln!(f, "{}", self.time_range)?;
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        writeln!(f)
    }
}

/// Reads, checks and writes SRT documents
pub struct SubtitleCollection;

impl SubtitleCollection {
    /// Bounded-lookahead structural check.
    ///
    /// Looks at no more than [`VALIDATION_SCAN_LINES`] lines: the first non-blank
    /// line must carry a numeric index and the next non-blank line must be a time range.
    pub fn validate(content: &str) -> Result<(), MalformedInput> {
        Self::validate_lines(content.lines().map(str::to_string))
    }

    /// Same check as [`SubtitleCollection::validate`], streaming only the scanned lines from disk
    pub fn validate_file<P: AsRef<Path>>(path: P) -> Result<(), SubtitleError> {
        let file = fs::File::open(path.as_ref())?;
        let mut lines = Vec::new();
        for line in BufReader::new(file).lines().take(VALIDATION_SCAN_LINES) {
            lines.push(line?);
        }
        Self::validate_lines(lines.into_iter())?;
        Ok(())
    }

    fn validate_lines(lines: impl Iterator<Item = String>) -> Result<(), MalformedInput> {
        let mut scanned = lines.take(VALIDATION_SCAN_LINES).enumerate();

        while let Some((number, line)) = scanned.next() {
            let trimmed = line.replace(BYTE_ORDER_MARK, "");
            let trimmed = trimmed.trim();
            if trimmed.is_empty() {
                continue;
            }

            if !trimmed.chars().any(|c| c.is_ascii_digit()) {
                return Err(MalformedInput::MissingIndexLine { line: number + 1 });
            }

            for (time_number, time_line) in scanned.by_ref() {
                let time_line = time_line.trim();
                if time_line.is_empty() {
                    continue;
                }
                if !TIME_RANGE_REGEX.is_match(time_line) {
                    return Err(MalformedInput::InvalidTimeRange { line: time_number + 1 });
                }
                return Ok(());
            }

            return Err(MalformedInput::TruncatedHeader);
        }

        Err(MalformedInput::NoEntries)
    }

    /// Parse SRT content into entries in stream order.
    ///
    /// Index lines keep only their digits (a leading byte-order mark is dropped),
    /// the following line is the time range verbatim and the contiguous non-blank
    /// run after it forms the display lines.
    pub fn parse(content: &str) -> Result<Vec<SubtitleEntry>, MalformedInput> {
        let all: Vec<&str> = content.lines().collect();
        let mut entries = Vec::new();
        let mut i = 0;

        while i < all.len() {
            while i < all.len() && all[i].trim().is_empty() {
                i += 1;
            }
            if i >= all.len() {
                break;
            }

            let raw_index = all[i];
            let digits: String = raw_index
                .replace(BYTE_ORDER_MARK, "")
                .chars()
                .filter(|c| c.is_ascii_digit())
                .collect();
            let index = digits.parse::<u32>().map_err(|_| MalformedInput::InvalidIndexLine {
                line: i + 1,
                content: raw_index.to_string(),
            })?;
            i += 1;

            let time_range = all
                .get(i)
                .ok_or(MalformedInput::MissingTimeRange { line: i })?
                .to_string();
            i += 1;

            let mut lines = Vec::new();
            while i < all.len() && !all[i].trim().is_empty() {
                lines.push(all[i].to_string());
                i += 1;
            }

            entries.push(SubtitleEntry::new(index, time_range, lines));
        }

        debug!("Parsed {} subtitle entries", entries.len());
        Ok(entries)
    }

    /// Read and parse an SRT file
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Vec<SubtitleEntry>, SubtitleError> {
        let content = fs::read_to_string(path.as_ref())?;
        Ok(Self::parse(&content)?)
    }

    /// Render entries as SRT: index, time range, lines, blank separator
    pub fn serialize(entries: &[SubtitleEntry]) -> String {
        entries.iter().map(|entry| entry.to_string()).collect()
    }

    /// Write entries to an SRT file, creating parent directories as needed
    pub fn write_to_srt<P: AsRef<Path>>(path: P, entries: &[SubtitleEntry]) -> Result<(), SubtitleError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, Self::serialize(entries))?;
        Ok(())
    }
}
