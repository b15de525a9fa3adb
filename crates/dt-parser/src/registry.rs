use dt_core::Language;
use tree_sitter::Language as TSLanguage;

/// Maps JS-family dialects to tree-sitter grammars.
pub struct ParserRegistry;

impl ParserRegistry {
    /// Get the tree-sitter grammar for a dialect.
    ///
    /// Plain TypeScript uses the non-TSX grammar so that `<T>value` casts
    /// parse; every JSX-capable dialect, plain JavaScript included, uses TSX.
    pub fn grammar_for(lang: Language) -> TSLanguage {
        if lang.allows_jsx() {
            tree_sitter_typescript::LANGUAGE_TSX.into()
        } else {
            tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()
        }
    }

    /// Resolve an editor language id, rejecting anything outside the JS family.
    pub fn language_for_id(language_id: &str) -> Option<Language> {
        Language::from_language_id(language_id)
    }

    /// Resolve a file extension.
    pub fn language_for_extension(ext: &str) -> Option<Language> {
        Language::from_extension(ext)
    }
}
