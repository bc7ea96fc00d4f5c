//! MCP Tool Types
//!
//! Parameter and response types for every tool the server exposes.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use hljs_mcp_core::{HighlightMode, Language};

// =============================================================================
// Highlighting Tools
// =============================================================================

/// Parameters for highlight
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HighlightParams {
    /// Source text to highlight
    pub text: String,

    /// Grammar alias (e.g., "rust", "python").
    /// If not specified, the language is detected automatically
    #[serde(default)]
    pub language: Option<String>,

    /// Keep highlighting past syntax the grammar considers illegal.
    /// Ignored when no language is given
    #[serde(default)]
    pub ignore_illegals: bool,
}

impl HighlightParams {
    /// Highlight mode these parameters select.
    pub fn mode(&self) -> HighlightMode {
        HighlightMode::from_request(self.language.as_deref(), self.ignore_illegals)
    }
}

// =============================================================================
// Language Tools
// =============================================================================

/// Parameters for list_languages
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ListLanguagesParams {}

/// Information about a supported language
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LanguageInfo {
    /// Grammar alias to pass as `language`
    pub alias: String,

    /// Human-readable name
    pub name: String,
}

impl From<Language> for LanguageInfo {
    fn from(language: Language) -> Self {
        Self {
            alias: language.alias().to_string(),
            name: language.display_name().to_string(),
        }
    }
}

/// Response for list_languages
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ListLanguagesResponse {
    /// Supported languages
    pub languages: Vec<LanguageInfo>,

    /// Total count
    pub count: usize,
}

impl ListLanguagesResponse {
    /// Every known language.
    pub fn all() -> Self {
        let languages: Vec<LanguageInfo> = Language::ALL.into_iter().map(LanguageInfo::from).collect();
        let count = languages.len();
        Self { languages, count }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_params_defaults() {
        let params: HighlightParams = serde_json::from_str(r#"{"text": "x = 1"}"#).unwrap();
        assert_eq!(params.language, None);
        assert!(!params.ignore_illegals);
        assert_eq!(params.mode(), HighlightMode::Automatic);
    }

    #[test]
    fn test_highlight_params_mode() {
        let params: HighlightParams = serde_json::from_str(
            r#"{"text": "x = 1", "language": "python", "ignore_illegals": true}"#,
        )
        .unwrap();
        assert_eq!(
            params.mode(),
            HighlightMode::LanguageIgnoreIllegal(Language::Python)
        );

        let params: HighlightParams =
            serde_json::from_str(r#"{"text": "x", "language": "py"}"#).unwrap();
        assert_eq!(params.mode(), HighlightMode::LanguageAlias("py".to_string()));
    }

    #[test]
    fn test_list_languages_response() {
        let response = ListLanguagesResponse::all();
        assert_eq!(response.count, Language::ALL.len());
        assert!(response
            .languages
            .iter()
            .any(|l| l.alias == "rust" && l.name == "Rust"));
    }
}
