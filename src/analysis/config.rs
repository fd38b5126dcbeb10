use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_PROMPT: &str = "Describe this image in one or two friendly sentences, \
     then add a brief comment on its visual quality after compression.";

/// Settings for the vision analyzer.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Base URL of the generative language API
    pub endpoint: String,
    /// Model used for `generateContent`
    pub model: String,
    /// API key; without one the analyzer always answers with the fallback
    pub api_key: Option<String>,
    /// Instruction sent alongside the image
    pub prompt: String,
    /// Whole-request timeout
    pub timeout: Duration,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            prompt: DEFAULT_PROMPT.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl AnalyzerConfig {
    /// Reads `GEMINI_API_KEY`, `SHRINKER_ANALYZER_MODEL` and
    /// `SHRINKER_ANALYZER_ENDPOINT`, falling back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();
        Self {
            endpoint: non_empty("SHRINKER_ANALYZER_ENDPOINT").unwrap_or(defaults.endpoint),
            model: non_empty("SHRINKER_ANALYZER_MODEL").unwrap_or(defaults.model),
            api_key: non_empty("GEMINI_API_KEY"),
            ..defaults
        }
    }
}
