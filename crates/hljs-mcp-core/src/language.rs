//! Language identifiers understood by the highlighting engine.
//!
//! Each [`Language`] maps to exactly one grammar alias, the name the engine
//! registers the grammar under.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Grammars shipped with the highlight.js "common" bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Bash
    Bash,
    /// C
    C,
    /// C++
    Cpp,
    /// C#
    CSharp,
    /// CSS
    Css,
    /// Diff
    Diff,
    /// Go
    Go,
    /// GraphQL
    GraphQl,
    /// INI / TOML
    Ini,
    /// Java
    Java,
    /// JavaScript
    JavaScript,
    /// JSON
    Json,
    /// Kotlin
    Kotlin,
    /// Less
    Less,
    /// Lua
    Lua,
    /// Makefile
    Makefile,
    /// Markdown
    Markdown,
    /// Objective-C
    ObjectiveC,
    /// Perl
    Perl,
    /// PHP
    Php,
    /// PHP template
    #[serde(rename = "php-template")]
    PhpTemplate,
    /// Plain text
    PlainText,
    /// Python
    Python,
    /// Python REPL
    #[serde(rename = "python-repl")]
    PythonRepl,
    /// R
    R,
    /// Ruby
    Ruby,
    /// Rust
    Rust,
    /// SCSS
    Scss,
    /// Shell session
    Shell,
    /// SQL
    Sql,
    /// Swift
    Swift,
    /// TypeScript
    TypeScript,
    /// Visual Basic .NET
    VbNet,
    /// WebAssembly
    Wasm,
    /// HTML / XML
    Xml,
    /// YAML
    Yaml,
}

impl Language {
    /// Every language, in alias order.
    pub const ALL: [Language; 36] = [
        Language::Bash,
        Language::C,
        Language::Cpp,
        Language::CSharp,
        Language::Css,
        Language::Diff,
        Language::Go,
        Language::GraphQl,
        Language::Ini,
        Language::Java,
        Language::JavaScript,
        Language::Json,
        Language::Kotlin,
        Language::Less,
        Language::Lua,
        Language::Makefile,
        Language::Markdown,
        Language::ObjectiveC,
        Language::Perl,
        Language::Php,
        Language::PhpTemplate,
        Language::PlainText,
        Language::Python,
        Language::PythonRepl,
        Language::R,
        Language::Ruby,
        Language::Rust,
        Language::Scss,
        Language::Shell,
        Language::Sql,
        Language::Swift,
        Language::TypeScript,
        Language::VbNet,
        Language::Wasm,
        Language::Xml,
        Language::Yaml,
    ];

    /// Canonical grammar name passed to the engine.
    pub fn alias(self) -> &'static str {
        match self {
            Language::Bash => "bash",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::CSharp => "csharp",
            Language::Css => "css",
            Language::Diff => "diff",
            Language::Go => "go",
            Language::GraphQl => "graphql",
            Language::Ini => "ini",
            Language::Java => "java",
            Language::JavaScript => "javascript",
            Language::Json => "json",
            Language::Kotlin => "kotlin",
            Language::Less => "less",
            Language::Lua => "lua",
            Language::Makefile => "makefile",
            Language::Markdown => "markdown",
            Language::ObjectiveC => "objectivec",
            Language::Perl => "perl",
            Language::Php => "php",
            Language::PhpTemplate => "php-template",
            Language::PlainText => "plaintext",
            Language::Python => "python",
            Language::PythonRepl => "python-repl",
            Language::R => "r",
            Language::Ruby => "ruby",
            Language::Rust => "rust",
            Language::Scss => "scss",
            Language::Shell => "shell",
            Language::Sql => "sql",
            Language::Swift => "swift",
            Language::TypeScript => "typescript",
            Language::VbNet => "vbnet",
            Language::Wasm => "wasm",
            Language::Xml => "xml",
            Language::Yaml => "yaml",
        }
    }

    /// Human-readable name.
    pub fn display_name(self) -> &'static str {
        match self {
            Language::Bash => "Bash",
            Language::C => "C",
            Language::Cpp => "C++",
            Language::CSharp => "C#",
            Language::Css => "CSS",
            Language::Diff => "Diff",
            Language::Go => "Go",
            Language::GraphQl => "GraphQL",
            Language::Ini => "INI",
            Language::Java => "Java",
            Language::JavaScript => "JavaScript",
            Language::Json => "JSON",
            Language::Kotlin => "Kotlin",
            Language::Less => "Less",
            Language::Lua => "Lua",
            Language::Makefile => "Makefile",
            Language::Markdown => "Markdown",
            Language::ObjectiveC => "Objective-C",
            Language::Perl => "Perl",
            Language::Php => "PHP",
            Language::PhpTemplate => "PHP Template",
            Language::PlainText => "Plain Text",
            Language::Python => "Python",
            Language::PythonRepl => "Python REPL",
            Language::R => "R",
            Language::Ruby => "Ruby",
            Language::Rust => "Rust",
            Language::Scss => "SCSS",
            Language::Shell => "Shell Session",
            Language::Sql => "SQL",
            Language::Swift => "Swift",
            Language::TypeScript => "TypeScript",
            Language::VbNet => "Visual Basic .NET",
            Language::Wasm => "WebAssembly",
            Language::Xml => "HTML, XML",
            Language::Yaml => "YAML",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.alias())
    }
}

impl FromStr for Language {
    type Err = crate::Error;

    /// Parse a grammar alias, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Language::ALL
            .iter()
            .copied()
            .find(|lang| lang.alias().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| crate::Error::UnknownLanguage(s.to_string()))
    }
}
