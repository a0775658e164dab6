//! Static completion catalog: reserved keywords followed by database functions.
//!
//! Entries are addressed by their position. The language server sends that position as the completion item's
//! `data` and looks the entry up again on resolve, so positions must be stable for the lifetime of the catalog.

use bhs_core::lang::keywords;

use super::FunctionSignature;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Keyword,
    Function,
}

/// One static completion entry and its resolved details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub label: String,
    pub insert_text: String,
    pub kind: EntryKind,
    /// One-line detail shown on resolve (`(datatype) int`, `(function) f(a: int): bool`).
    pub detail: String,
    /// Markdown documentation; empty for keywords.
    pub documentation: String,
}

impl CatalogEntry {
    fn keyword(word: &str) -> Self {
        Self {
            label: word.to_string(),
            insert_text: word.to_string(),
            kind: EntryKind::Keyword,
            detail: format!("(datatype) {}", word),
            documentation: String::new(),
        }
    }

    fn function(signature: &FunctionSignature) -> Self {
        Self {
            label: signature.label(),
            insert_text: signature.snippet(),
            kind: EntryKind::Function,
            detail: signature.detail(),
            documentation: signature.documentation(),
        }
    }

    /// `true` if the insert text carries snippet placeholders.
    pub fn is_snippet(&self) -> bool {
        self.kind == EntryKind::Function
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(&[])
    }
}

impl Catalog {
    /// Keywords in registry order, then one entry per signature in database order.
    pub fn new(signatures: &[FunctionSignature]) -> Self {
        let mut entries: Vec<CatalogEntry> = keywords::completion_keywords()
            .map(|k| CatalogEntry::keyword(k.canonical))
            .collect();
        entries.extend(signatures.iter().map(CatalogEntry::function));
        Self { entries }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&CatalogEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose label contains `token`, with their positions. An empty token matches everything.
    pub fn matching<'a>(&'a self, token: &'a str) -> impl Iterator<Item = (usize, &'a CatalogEntry)> + 'a {
        self.entries
            .iter()
            .enumerate()
            .filter(move |(_, entry)| entry.label.contains(token))
    }

    /// First database function whose label starts with `prefix`.
    pub fn find_function(&self, prefix: &str) -> Option<&CatalogEntry> {
        self.entries
            .iter()
            .find(|entry| entry.kind == EntryKind::Function && entry.label.starts_with(prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::parse;

    fn catalog() -> Catalog {
        let db = parse(
            r#"[
                { "name": "GetInteger", "arguments": [{ "name": "key", "type": "string" }], "return": { "name": "v", "type": "int" } },
                { "name": "Print", "arguments": [{ "name": "text", "type": "string" }] }
            ]"#,
        )
        .unwrap();
        Catalog::new(&db)
    }

    #[test]
    fn test_keywords_come_first() {
        let catalog = catalog();
        let labels: Vec<&str> = catalog.entries().iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels[0], "static");
        assert_eq!(labels[11], "trigger");
        assert_eq!(labels[12], "GetInteger(key)");
        assert_eq!(catalog.len(), 14);
        assert_eq!(catalog.get(1).map(|e| e.detail.as_str()), Some("(datatype) int"));
    }

    #[test]
    fn test_matching_is_unanchored_substring() {
        let catalog = catalog();
        let hits: Vec<usize> = catalog.matching("Int").map(|(i, _)| i).collect();
        assert_eq!(hits, vec![12]);
        let hits: Vec<&str> = catalog.matching("in").map(|(_, e)| e.label.as_str()).collect();
        assert_eq!(hits, vec!["int", "string", "Print(text)"]);
        assert_eq!(catalog.matching("").count(), catalog.len());
    }

    #[test]
    fn test_find_function_skips_keywords() {
        let catalog = catalog();
        assert_eq!(catalog.find_function("in"), None);
        assert_eq!(catalog.find_function("Get").map(|e| e.label.as_str()), Some("GetInteger(key)"));
        assert!(catalog.find_function("Print").is_some_and(CatalogEntry::is_snippet));
    }
}
