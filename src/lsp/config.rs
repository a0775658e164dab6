//! Language server settings
//!
//! Settings live under the `bhs` section of the client configuration and arrive through
//! `initializationOptions`, `workspace/didChangeConfiguration` or a `workspace/configuration` pull.

use std::path::PathBuf;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Configuration section requested from the client.
pub const SECTION: &str = "bhs";

/// Errors that occur while reading settings sent by the client
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid bhs settings: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// When documents are re-validated after an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationTrigger {
    OnChange,
    OnSave,
}

/// Hover text for a plain (non-function) word.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SymbolDoc {
    pub name: String,
    pub contents: String,
}

/// Language server settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// `true` validates on every change, `false` only on save. Opening a document always validates.
    pub validation_method: bool,
    /// Function database to load when none was given on the command line.
    pub function_database: Option<PathBuf>,
    /// Hover documentation for words that are not followed by `(`, matched by name prefix.
    pub symbol_documentation: Vec<SymbolDoc>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            validation_method: true,
            function_database: None,
            symbol_documentation: Vec::new(),
        }
    }
}

impl Settings {
    /// Create settings with defaults (validate on change, no database, no symbol docs)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether edits trigger validation
    pub fn with_validation_on_change(mut self, on_change: bool) -> Self {
        self.validation_method = on_change;
        self
    }

    /// Set the function database path
    pub fn with_function_database(mut self, path: impl Into<PathBuf>) -> Self {
        self.function_database = Some(path.into());
        self
    }

    /// Set the symbol documentation table
    pub fn with_symbol_documentation(mut self, docs: Vec<SymbolDoc>) -> Self {
        self.symbol_documentation = docs;
        self
    }

    pub fn trigger(&self) -> ValidationTrigger {
        if self.validation_method {
            ValidationTrigger::OnChange
        } else {
            ValidationTrigger::OnSave
        }
    }

    /// Read settings from a client payload.
    ///
    /// ## Returns
    /// - `Ok(None)` for `null` or a payload without usable content.
    /// - The `bhs` section when present (`{"bhs": {...}}`), otherwise the payload itself as a flat object.
    pub fn from_value(value: &Value) -> Result<Option<Self>, SettingsError> {
        let section = match value {
            Value::Null => return Ok(None),
            Value::Object(map) => map.get(SECTION).unwrap_or(value),
            _ => value,
        };
        if section.is_null() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(section.clone())?))
    }

    /// First documentation entry whose name starts with `word`.
    pub fn symbol_doc(&self, word: &str) -> Option<&SymbolDoc> {
        if word.is_empty() {
            return None;
        }
        self.symbol_documentation.iter().find(|doc| doc.name.starts_with(word))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_validate_on_change() {
        let settings = Settings::default();
        assert_eq!(settings.trigger(), ValidationTrigger::OnChange);
        assert!(settings.function_database.is_none());
    }

    #[test]
    fn test_nested_and_flat_payloads() {
        let nested = Settings::from_value(&json!({ "bhs": { "validationMethod": false } })).unwrap();
        assert_eq!(nested.map(|s| s.trigger()), Some(ValidationTrigger::OnSave));

        let flat = Settings::from_value(&json!({ "functionDatabase": "/opt/functions.json" })).unwrap();
        assert_eq!(
            flat.and_then(|s| s.function_database),
            Some(PathBuf::from("/opt/functions.json"))
        );

        assert_eq!(Settings::from_value(&Value::Null).unwrap(), None);
        assert_eq!(Settings::from_value(&json!({ "bhs": null })).unwrap(), None);
    }

    #[test]
    fn test_malformed_payload_is_an_error() {
        let err = Settings::from_value(&json!({ "bhs": { "validationMethod": "sometimes" } })).unwrap_err();
        assert!(err.to_string().starts_with("invalid bhs settings"));
    }

    #[test]
    fn test_symbol_doc_prefix_lookup() {
        let settings = Settings::new().with_symbol_documentation(vec![
            SymbolDoc {
                name: "TRUE".into(),
                contents: "Boolean true".into(),
            },
            SymbolDoc {
                name: "TRIGGER_ONCE".into(),
                contents: "Fire once".into(),
            },
        ]);
        assert_eq!(settings.symbol_doc("TRI").map(|d| d.contents.as_str()), Some("Fire once"));
        assert_eq!(settings.symbol_doc("TR").map(|d| d.name.as_str()), Some("TRUE"));
        assert!(settings.symbol_doc("").is_none());
    }

    #[test]
    fn test_builder() {
        let settings = Settings::new()
            .with_validation_on_change(false)
            .with_function_database("db.json");
        assert_eq!(settings.trigger(), ValidationTrigger::OnSave);
        assert_eq!(settings.function_database, Some(PathBuf::from("db.json")));
    }
}
