//! Define the reserved keyword vocabulary for the BHS script language.
//!
//! This module is the single source of truth for reserved words: a stable identifier ([`KeywordId`]) plus a const
//! metadata table ([`KEYWORDS`]) that records canonical spellings, aliases and categories.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**, except where explicit aliases are defined (`String`).
//! - The registry order is the order in which keywords are offered as static completions.
//!
//! ## Examples
//! ```rust
//! use bhs_core::lang::keywords::{self, KeywordCategory, KeywordId};
//!
//! assert_eq!(keywords::from_str("String"), Some(KeywordId::String));
//! assert_eq!(keywords::category(KeywordId::Ai), KeywordCategory::FunctionForm);
//! assert!(keywords::is_type_keyword("anytype"));
//! ```

/// Stable identifier for every reserved keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordId {
    // Modifiers
    Static,
    Ref,
    Local,

    // Types
    Int,
    Real,
    Float,
    String,
    Void,
    Bool,
    Anytype,

    // Function definition forms
    Scenario,
    Conquest,
    Ai,

    // Other definitions
    Trigger,
    Labels,
}

/// High-level grouping used by the recognizers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordCategory {
    /// Declaration modifiers (`static`, `ref`, `local`).
    Modifier,
    /// Value types that start a variable declaration.
    Type,
    /// Keywords that introduce a callable function (`scenario`, `conquest`, `ai`).
    FunctionForm,
    /// Other definition keywords (`trigger`, `labels`).
    Definition,
}

/// Metadata for a keyword.
///
/// ## Notes
/// - `canonical` is the preferred spelling for docs and completion.
/// - `aliases` are additional spellings accepted by the recognizers.
/// - `completion` marks the keywords offered in the static completion list.
#[derive(Debug, Clone, Copy)]
pub struct KeywordInfo {
    pub id: KeywordId,
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
    pub category: KeywordCategory,
    pub completion: bool,
}

/// Registry of all keywords, in static completion order.
pub const KEYWORDS: &[KeywordInfo] = &[
    info(KeywordId::Static, "static", &[], KeywordCategory::Modifier, true),
    info(KeywordId::Int, "int", &[], KeywordCategory::Type, true),
    info(KeywordId::Real, "real", &[], KeywordCategory::Type, true),
    info(KeywordId::Float, "float", &[], KeywordCategory::Type, true),
    info(KeywordId::String, "string", &["String"], KeywordCategory::Type, true),
    info(KeywordId::Void, "void", &[], KeywordCategory::Type, true),
    info(KeywordId::Bool, "bool", &[], KeywordCategory::Type, true),
    info(KeywordId::Anytype, "anytype", &[], KeywordCategory::Type, true),
    info(KeywordId::Scenario, "scenario", &[], KeywordCategory::FunctionForm, true),
    info(KeywordId::Conquest, "conquest", &[], KeywordCategory::FunctionForm, true),
    info(KeywordId::Ai, "ai", &[], KeywordCategory::FunctionForm, true),
    info(KeywordId::Trigger, "trigger", &[], KeywordCategory::Definition, true),
    info(KeywordId::Ref, "ref", &[], KeywordCategory::Modifier, false),
    info(KeywordId::Local, "local", &[], KeywordCategory::Modifier, false),
    info(KeywordId::Labels, "labels", &[], KeywordCategory::Definition, false),
];

/// Canonical spelling.
pub fn as_str(id: KeywordId) -> &'static str {
    info_for(id).canonical
}

/// Category.
pub fn category(id: KeywordId) -> KeywordCategory {
    info_for(id).category
}

/// Full metadata.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: KeywordId) -> &'static KeywordInfo {
    KEYWORDS.iter().find(|k| k.id == id).expect("keyword info missing")
}

/// Lookup by spelling (canonical or alias).
///
/// ## Returns
/// - `Some(KeywordId)` if the spelling matches this registry.
/// - `None` otherwise.
pub fn from_str(s: &str) -> Option<KeywordId> {
    if let Some(k) = KEYWORDS.iter().find(|k| k.canonical == s) {
        return Some(k.id);
    }
    KEYWORDS
        .iter()
        .find(|k| {
            let aliases: &[&str] = k.aliases;
            aliases.contains(&s)
        })
        .map(|k| k.id)
}

/// Every accepted spelling (canonical first, then aliases) for keywords of `category`.
///
/// The recognizers build their regex alternations from this list.
pub fn spellings(category: KeywordCategory) -> Vec<&'static str> {
    let mut out = Vec::new();
    for k in KEYWORDS.iter().filter(|k| k.category == category) {
        out.push(k.canonical);
        out.extend_from_slice(k.aliases);
    }
    out
}

/// Keywords offered in the static completion list, in registry order.
pub fn completion_keywords() -> impl Iterator<Item = &'static KeywordInfo> {
    KEYWORDS.iter().filter(|k| k.completion)
}

/// `true` if `s` spells a value type (`int`, `string`, `String`, ...).
pub fn is_type_keyword(s: &str) -> bool {
    is_in_category(s, KeywordCategory::Type)
}

/// `true` if `s` spells a declaration modifier (`static`, `ref`, `local`).
pub fn is_modifier(s: &str) -> bool {
    is_in_category(s, KeywordCategory::Modifier)
}

/// `true` if `s` starts a function or trigger definition rather than a variable declarator.
pub fn starts_definition(s: &str) -> bool {
    matches!(from_str(s), Some(KeywordId::Scenario | KeywordId::Conquest | KeywordId::Ai | KeywordId::Trigger))
}

fn is_in_category(s: &str, category: KeywordCategory) -> bool {
    from_str(s).is_some_and(|id| self::category(id) == category)
}

// --- helpers -----------------------------------------------------------------

const fn info(
    id: KeywordId,
    canonical: &'static str,
    aliases: &'static [&'static str],
    category: KeywordCategory,
    completion: bool,
) -> KeywordInfo {
    KeywordInfo {
        id,
        canonical,
        aliases,
        category,
        completion,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_is_case_sensitive_except_aliases() {
        assert_eq!(from_str("string"), Some(KeywordId::String));
        assert_eq!(from_str("String"), Some(KeywordId::String));
        assert_eq!(from_str("INT"), None);
    }

    #[test]
    fn test_type_spellings_include_aliases() {
        let types = spellings(KeywordCategory::Type);
        assert!(types.contains(&"String"));
        assert!(types.contains(&"anytype"));
        assert_eq!(types.len(), 8);
    }

    #[test]
    fn test_completion_keywords_order() {
        let words: Vec<&str> = completion_keywords().map(|k| k.canonical).collect();
        assert_eq!(
            words,
            vec![
                "static", "int", "real", "float", "string", "void", "bool", "anytype", "scenario", "conquest", "ai",
                "trigger"
            ]
        );
    }

    #[test]
    fn test_classification_helpers() {
        assert!(is_type_keyword("bool"));
        assert!(!is_type_keyword("static"));
        assert!(is_modifier("ref"));
        assert!(starts_definition("trigger"));
        assert!(!starts_definition("labels"));
    }
}
