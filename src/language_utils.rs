//! Language utilities for target language handling
//!
//! Target languages arrive as free text from the caller: an ISO 639-1 code
//! ("hu"), an ISO 639-2 code ("hun", "ger") or a plain name ("Hungarian").
//! Codes are resolved through isolang; anything else is passed through.

use anyhow::{Result, anyhow};
use isolang::Language;

/// ISO 639-2/B codes that differ from their 639-2/T counterpart
const BIBLIOGRAPHIC_CODES: &[(&str, &str)] = &[
    ("alb", "sqi"),
    ("arm", "hye"),
    ("baq", "eus"),
    ("bur", "mya"),
    ("chi", "zho"),
    ("cze", "ces"),
    ("dut", "nld"),
    ("fre", "fra"),
    ("geo", "kat"),
    ("ger", "deu"),
    ("gre", "ell"),
    ("ice", "isl"),
    ("mac", "mkd"),
    ("may", "msa"),
    ("per", "fas"),
    ("rum", "ron"),
    ("slo", "slk"),
    ("wel", "cym"),
];

/// Resolve an ISO 639-1 or 639-2 code to a language
pub fn resolve_code(code: &str) -> Option<Language> {
    let normalized = code.trim().to_lowercase();
    match normalized.len() {
        2 => Language::from_639_1(&normalized),
        3 => {
            let terminology = BIBLIOGRAPHIC_CODES
                .iter()
                .find(|(bibliographic, _)| *bibliographic == normalized)
                .map(|(_, terminology)| *terminology)
                .unwrap_or(normalized.as_str());
            Language::from_639_3(terminology)
        }
        _ => None,
    }
}

/// Get the English language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    resolve_code(code)
        .map(|lang| lang.to_name().to_string())
        .ok_or_else(|| anyhow!("Invalid language code: {}", code))
}

/// Name to put in prompts: the English name for known codes, the trimmed input otherwise
pub fn prompt_language_name(target_language: &str) -> String {
    get_language_name(target_language).unwrap_or_else(|_| target_language.trim().to_string())
}

/// Upper-case ISO 639-1 code when one exists (the form DeepL expects)
pub fn to_part1_upper(target_language: &str) -> String {
    resolve_code(target_language)
        .and_then(|lang| lang.to_639_1())
        .map(str::to_uppercase)
        .unwrap_or_else(|| target_language.trim().to_uppercase())
}
