use std::path::Path;

use serde::{Deserialize, Serialize};

/// JS-family dialects the synthesis engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    JavaScript,
    JavaScriptReact,
    TypeScript,
    TypeScriptReact,
}

impl Language {
    /// Map an editor language identifier to a Language.
    pub fn from_language_id(id: &str) -> Option<Self> {
        match id {
            "javascript" => Some(Self::JavaScript),
            "javascriptreact" => Some(Self::JavaScriptReact),
            "typescript" => Some(Self::TypeScript),
            "typescriptreact" => Some(Self::TypeScriptReact),
            _ => None,
        }
    }

    /// Map a file extension to a Language.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "js" | "mjs" | "cjs" => Some(Self::JavaScript),
            "jsx" => Some(Self::JavaScriptReact),
            "ts" | "mts" | "cts" => Some(Self::TypeScript),
            "tsx" => Some(Self::TypeScriptReact),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// The editor language identifier.
    pub fn language_id(self) -> &'static str {
        match self {
            Self::JavaScript => "javascript",
            Self::JavaScriptReact => "javascriptreact",
            Self::TypeScript => "typescript",
            Self::TypeScriptReact => "typescriptreact",
        }
    }

    /// Whether the dialect carries type annotations.
    pub fn is_typed(self) -> bool {
        matches!(self, Self::TypeScript | Self::TypeScriptReact)
    }

    /// Whether JSX syntax is allowed.
    pub fn allows_jsx(self) -> bool {
        !matches!(self, Self::TypeScript)
    }
}
