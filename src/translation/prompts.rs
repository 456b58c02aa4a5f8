/*!
 * Marker payload codec for LLM-backed providers.
 *
 * Each entry travels as
 *
 * ```text
 * <<<ENTRY 12>>>
 * first line
 * second line
 * <<<END>>>
 * ```
 *
 * and the model is asked to answer in the same shape.
 */

use crate::errors::ProviderError;
use crate::language_utils;
use crate::providers::BatchTranslation;
use crate::subtitle_processor::SubtitleEntry;

const ENTRY_OPEN: &str = "<<<ENTRY ";
const MARKER_CLOSE: &str = ">>>";
const ENTRY_END: &str = "<<<END>>>";

/// Placeholder replaced with the target language in system prompts
pub const TARGET_LANGUAGE_PLACEHOLDER: &str = "{{TARGET_LANGUAGE}}";

/// Default system prompt for subtitle translation
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a professional subtitle translator. \
Translate every entry of the payload into {{TARGET_LANGUAGE}}. \
Answer with exactly the same markers: each entry starts with <<<ENTRY n>>> on its own line \
and ends with <<<END>>>. Keep the number of lines per entry and any inline formatting tags. \
Do not add commentary.";

/// Render the system prompt for a target language
pub fn system_prompt(template: &str, target_language: &str) -> String {
    template.replace(
        TARGET_LANGUAGE_PLACEHOLDER,
        &language_utils::prompt_language_name(target_language),
    )
}

/// Build the marker payload for a batch
pub fn build_payload(batch: &[SubtitleEntry]) -> String {
    batch
        .iter()
        .map(|entry| format!("{}{}{}\n{}\n{}", ENTRY_OPEN, entry.index, MARKER_CLOSE, entry.original_text(), ENTRY_END))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the user message for a batch
pub fn build_user_message(batch: &[SubtitleEntry]) -> String {
    format!("Translate this SRT text payload:\n\n{}", build_payload(batch))
}

/// Parse a marker-delimited response back into per-entry lines
pub fn parse_response(response: &str) -> Result<BatchTranslation, ProviderError> {
    let mut translated = BatchTranslation::new();

    // Anything before the first marker is model chatter
    for part in response.split(ENTRY_OPEN).skip(1) {
        let close = part.find(MARKER_CLOSE).ok_or_else(|| {
            ProviderError::ParseError(format!("Unterminated entry marker in response: '{}'", truncate(part)))
        })?;
        let raw_index = part[..close].trim();
        let index = raw_index.parse::<u32>().map_err(|_| {
            ProviderError::ParseError(format!("Invalid entry index in response: '{}'", raw_index))
        })?;

        let rest = &part[close + MARKER_CLOSE.len()..];
        let body = match rest.find(ENTRY_END) {
            Some(end) => &rest[..end],
            None => rest,
        };

        let lines = body.trim().lines().map(str::to_string).collect();
        translated.insert(index, lines);
    }

    Ok(translated)
}

fn truncate(text: &str) -> String {
    text.chars().take(40).collect()
}
