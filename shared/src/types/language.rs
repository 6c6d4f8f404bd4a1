//! Language and internationalization types

use serde::{Deserialize, Serialize};

/// Language preference for localized messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "zh")]
    Chinese,
}

impl Default for Language {
    fn default() -> Self {
        Language::English
    }
}

impl Language {
    /// Pick the preferred supported language from an Accept-Language header
    ///
    /// Example header: `zh-CN,zh;q=0.9,en-US;q=0.8,en;q=0.7`
    pub fn from_accept_language(header: &str) -> Self {
        let mut preferred = Language::English;
        let mut max_quality = 0.0_f32;

        for entry in header.split(',') {
            let mut parts = entry.trim().split(';');
            let tag = parts.next().unwrap_or_default().trim().to_lowercase();
            let quality = parts
                .find_map(|p| p.trim().strip_prefix("q="))
                .and_then(|q| q.parse::<f32>().ok())
                .unwrap_or(1.0);

            let language = if tag.starts_with("zh") {
                Language::Chinese
            } else if tag.starts_with("en") {
                Language::English
            } else {
                continue;
            };

            if quality > max_quality {
                preferred = language;
                max_quality = quality;
            }
        }

        preferred
    }

    /// Get language code (ISO 639-1)
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Chinese => "zh",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_language_quality() {
        assert_eq!(Language::from_accept_language("zh-CN,zh;q=0.9,en;q=0.8"), Language::Chinese);
        assert_eq!(Language::from_accept_language("en-US,en;q=0.9,zh;q=0.5"), Language::English);
        assert_eq!(Language::from_accept_language("fr-FR,zh;q=0.3"), Language::Chinese);
    }

    #[test]
    fn test_accept_language_fallback() {
        assert_eq!(Language::from_accept_language(""), Language::English);
        assert_eq!(Language::from_accept_language("de-DE"), Language::English);
        assert_eq!(Language::from_accept_language("*"), Language::English);
    }
}
