//! Highlight mode selection.

use crate::Language;

/// How the engine should pick a grammar for a request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HighlightMode {
    /// Let the engine detect the language
    #[default]
    Automatic,
    /// Use the grammar registered under this alias
    LanguageAlias(String),
    /// Use the alias and suppress illegal-syntax failures
    LanguageAliasIgnoreIllegal(String),
    /// Use a known language
    Language(Language),
    /// Use a known language and suppress illegal-syntax failures
    LanguageIgnoreIllegal(Language),
}

/// The single engine operation a mode resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineCall<'a> {
    /// `highlightAuto(text)`
    Auto,
    /// `highlight(text, { language, ignoreIllegals })`
    Grammar {
        /// Grammar alias
        name: &'a str,
        /// Whether illegal syntax is tolerated
        ignore_illegals: bool,
    },
}

impl HighlightMode {
    /// Resolve this mode to an engine call.
    pub fn engine_call(&self) -> EngineCall<'_> {
        match self {
            HighlightMode::Automatic => EngineCall::Auto,
            HighlightMode::LanguageAlias(alias) => EngineCall::Grammar {
                name: alias,
                ignore_illegals: false,
            },
            HighlightMode::LanguageAliasIgnoreIllegal(alias) => EngineCall::Grammar {
                name: alias,
                ignore_illegals: true,
            },
            HighlightMode::Language(lang) => EngineCall::Grammar {
                name: lang.alias(),
                ignore_illegals: false,
            },
            HighlightMode::LanguageIgnoreIllegal(lang) => EngineCall::Grammar {
                name: lang.alias(),
                ignore_illegals: true,
            },
        }
    }

    /// Build a mode from an optional language string.
    ///
    /// Known aliases map to the [`Language`] variants, anything else is
    /// passed through to the engine as a raw alias.
    pub fn from_request(language: Option<&str>, ignore_illegals: bool) -> Self {
        let Some(language) = language else {
            return HighlightMode::Automatic;
        };

        match (language.parse::<Language>(), ignore_illegals) {
            (Ok(lang), false) => HighlightMode::Language(lang),
            (Ok(lang), true) => HighlightMode::LanguageIgnoreIllegal(lang),
            (Err(_), false) => HighlightMode::LanguageAlias(language.to_string()),
            (Err(_), true) => HighlightMode::LanguageAliasIgnoreIllegal(language.to_string()),
        }
    }

}
