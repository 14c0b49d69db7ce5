use anyhow::{Result, anyhow};
use isolang::Language;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Language utilities for resolving user-supplied language identifiers
///
/// This module maps the language argument given on the command line
/// (ISO 639-1/639-3 codes, BCP-47 style regional or script variants, or
/// plain English names) to the label that translation prompts embed.
/// Script and region variants that the ISO tables cannot express
static VARIANT_LABELS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("zh-hans", "Simplified Chinese"),
        ("zh-cn", "Simplified Chinese"),
        ("zh-hant", "Traditional Chinese"),
        ("zh-tw", "Traditional Chinese"),
        ("zh-hk", "Traditional Chinese"),
        ("pt-br", "Brazilian Portuguese"),
        ("pt-pt", "European Portuguese"),
        ("sr-latn", "Serbian (Latin)"),
        ("sr-cyrl", "Serbian (Cyrillic)"),
    ])
});

/// Normalize a user-supplied language identifier for lookup
fn normalize(code: &str) -> String {
    code.trim().replace('_', "-").to_lowercase()
}

/// Resolve a language identifier to the English label used in prompts
///
/// Accepts ISO 639-1 codes ("zh"), ISO 639-3 codes ("zho"), script/region
/// variants ("zh-hans", "pt-BR") and English language names ("Japanese").
pub fn resolve_language_label(code: &str) -> Result<String> {
    let normalized = normalize(code);

    if let Some(label) = VARIANT_LABELS.get(normalized.as_str()) {
        return Ok((*label).to_string());
    }

    if normalized.len() == 2 {
        if let Some(lang) = Language::from_639_1(&normalized) {
            return Ok(lang.to_name().to_string());
        }
    } else if normalized.len() == 3 {
        if let Some(lang) = Language::from_639_3(&normalized) {
            return Ok(lang.to_name().to_string());
        }
    }

    // Full English names ("French", "japanese") resolve through isolang too
    if let Some(lang) = Language::from_name(code.trim()) {
        return Ok(lang.to_name().to_string());
    }
    let capitalized = capitalize_words(code.trim());
    if let Some(lang) = Language::from_name(&capitalized) {
        return Ok(lang.to_name().to_string());
    }

    Err(anyhow!("Unrecognized target language: {}", code))
}

/// Check whether a language identifier can be resolved to a prompt label
pub fn is_supported_language(code: &str) -> bool {
    resolve_language_label(code).is_ok()
}

/// Uppercase the first letter of each whitespace-separated word
fn capitalize_words(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
