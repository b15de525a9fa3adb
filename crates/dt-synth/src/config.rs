use serde::{Deserialize, Serialize};

use dt_parser::DEFAULT_MAX_SOURCE_BYTES;

use crate::error::SynthError;

/// When to emit `@returns`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReturnsPolicy {
    /// Only when a non-void return annotation is present.
    #[default]
    TypeDriven,
    /// For every construct that can return a value.
    Always,
}

/// Synthesis settings. Field names follow the editor settings (`camelCase`),
/// unknown keys are ignored and missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SynthConfig {
    /// Emit `{Type}` from annotations.
    pub include_types: bool,
    /// Guess parameter types from names when untyped.
    pub infer_types_from_names: bool,
    /// Use an empty `@description` tag instead of a blank first line.
    pub include_description_tag: bool,
    pub include_member_of: bool,
    pub include_author_tag: bool,
    pub author_name: String,
    /// Emit `@throws {T}` for `throw new T(..)` in the body.
    pub include_throws: bool,
    pub returns: ReturnsPolicy,
    /// `returns` or `return`.
    pub returns_tag_name: String,
    pub max_source_bytes: u64,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            include_types: true,
            infer_types_from_names: false,
            include_description_tag: false,
            include_member_of: false,
            include_author_tag: false,
            author_name: String::new(),
            include_throws: false,
            returns: ReturnsPolicy::TypeDriven,
            returns_tag_name: "returns".to_string(),
            max_source_bytes: DEFAULT_MAX_SOURCE_BYTES,
        }
    }
}

impl SynthConfig {
    /// Parse settings from a JSON object.
    pub fn from_json(text: &str) -> Result<Self, SynthError> {
        let config: Self = serde_json::from_str(text)?;
        if !matches!(config.returns_tag_name.as_str(), "returns" | "return") {
            return Err(SynthError::internal(
                "config",
                format!("returnsTagName must be 'returns' or 'return', got '{}'", config.returns_tag_name),
            ));
        }
        Ok(config)
    }

    pub fn with_returns(mut self, returns: ReturnsPolicy) -> Self {
        self.returns = returns;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_default() {
        assert_eq!(SynthConfig::from_json("{}").unwrap(), SynthConfig::default());
    }

    #[test]
    fn camel_case_keys_and_unknown_keys() {
        let config = SynthConfig::from_json(
            r#"{"includeTypes": false, "returns": "always", "authorName": "Ada", "editor.fontSize": 12}"#,
        )
        .unwrap();
        assert!(!config.include_types);
        assert_eq!(config.returns, ReturnsPolicy::Always);
        assert_eq!(config.author_name, "Ada");
        assert_eq!(config.max_source_bytes, DEFAULT_MAX_SOURCE_BYTES);
    }

    #[test]
    fn rejects_unknown_returns_tag() {
        assert!(SynthConfig::from_json(r#"{"returnsTagName": "yields"}"#).is_err());
        assert!(SynthConfig::from_json(r#"{"returnsTagName": "return"}"#).is_ok());
    }

    #[test]
    fn rejects_bad_json() {
        let err = SynthConfig::from_json("{").unwrap_err();
        assert!(matches!(err, SynthError::Config(_)));
    }
}
