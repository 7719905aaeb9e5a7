use crate::constants::DEFAULT_STRIP_CHARS;
use once_cell::sync::Lazy;
use regex::Regex;

static DEFAULT_NORMALIZER: Lazy<NameNormalizer> =
    Lazy::new(|| NameNormalizer::new(&DEFAULT_STRIP_CHARS.iter().collect::<String>()));

/// Turns a raw sheet label into the identity key of a record.
///
/// Decorative code points are removed wherever they appear, then surrounding
/// whitespace is trimmed. The result is stable under repeated application.
#[derive(Debug, Clone)]
pub struct NameNormalizer {
    strip: Option<Regex>,
}

impl NameNormalizer {
    /// Builds a normalizer removing every character of `strip_chars`.
    pub fn new(strip_chars: &str) -> Self {
        if strip_chars.is_empty() {
            return Self { strip: None };
        }
        let class: String = strip_chars
            .chars()
            .map(|c| regex::escape(&c.to_string()))
            .collect();
        // Escaped literals inside a class always compile
        let strip = Regex::new(&format!("[{}]", class)).ok();
        Self { strip }
    }

    pub fn normalize(&self, raw: &str) -> String {
        match &self.strip {
            Some(re) => re.replace_all(raw, "").trim().to_string(),
            None => raw.trim().to_string(),
        }
    }
}

impl Default for NameNormalizer {
    fn default() -> Self {
        DEFAULT_NORMALIZER.clone()
    }
}

/// Normalizes with the default decorative character set.
pub fn normalize(raw: &str) -> String {
    DEFAULT_NORMALIZER.normalize(raw)
}
