//! Completion list and completion resolve.
//!
//! The list merges, in this order: static catalog entries, document labels, variables visible at the cursor and
//! document functions. Every source is filtered by an unanchored substring match on the token before the cursor.

use serde::{Deserialize, Serialize};
use tower_lsp::lsp_types::{
    CompletionItem, CompletionItemKind, Documentation, InsertTextFormat, MarkupContent, MarkupKind,
};

use bhs_syntax::DocumentIndex;
use bhs_syntax::cursor::completion_token;

use crate::database::{Catalog, CatalogEntry, EntryKind};

/// Payload carried in `CompletionItem::data` so resolve knows where an item came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "camelCase")]
pub enum CompletionData {
    /// Position in the static catalog.
    Static { index: usize },
    Variable,
    Label,
    Function,
}

impl CompletionData {
    fn to_value(self) -> Option<serde_json::Value> {
        serde_json::to_value(self).ok()
    }

    fn from_item(item: &CompletionItem) -> Option<Self> {
        item.data.clone().and_then(|data| serde_json::from_value(data).ok())
    }
}

fn static_item(index: usize, entry: &CatalogEntry) -> CompletionItem {
    let kind = match entry.kind {
        EntryKind::Keyword => CompletionItemKind::KEYWORD,
        EntryKind::Function => CompletionItemKind::FUNCTION,
    };
    let format = if entry.is_snippet() {
        InsertTextFormat::SNIPPET
    } else {
        InsertTextFormat::PLAIN_TEXT
    };
    CompletionItem {
        label: entry.label.clone(),
        insert_text: Some(entry.insert_text.clone()),
        insert_text_format: Some(format),
        kind: Some(kind),
        data: CompletionData::Static { index }.to_value(),
        ..Default::default()
    }
}

fn document_item(label: &str, insert_text: String, kind: CompletionItemKind, data: CompletionData) -> CompletionItem {
    CompletionItem {
        label: label.to_string(),
        insert_text: Some(insert_text),
        insert_text_format: Some(InsertTextFormat::SNIPPET),
        kind: Some(kind),
        data: data.to_value(),
        ..Default::default()
    }
}

/// Completion items for the cursor at byte `offset` of `text`.
///
/// `index` is the document's last good index; without one only catalog entries are offered.
pub fn completion_items(catalog: &Catalog, text: &str, index: Option<&DocumentIndex>, offset: usize) -> Vec<CompletionItem> {
    let token = completion_token(text, offset);
    let mut items: Vec<CompletionItem> = catalog
        .matching(token)
        .map(|(i, entry)| static_item(i, entry))
        .collect();

    let Some(index) = index else {
        return items;
    };

    items.extend(
        index
            .labels
            .iter()
            .filter(|label| label.name.contains(token))
            .map(|label| {
                document_item(&label.name, label.name.clone(), CompletionItemKind::VARIABLE, CompletionData::Label)
            }),
    );

    items.extend(
        index
            .visible_at(offset)
            .into_iter()
            .filter(|symbol| symbol.name.contains(token))
            .map(|symbol| {
                document_item(
                    &symbol.name,
                    symbol.name.clone(),
                    CompletionItemKind::VARIABLE,
                    CompletionData::Variable,
                )
            }),
    );

    items.extend(
        index
            .functions
            .iter()
            .map(|f| (f.label(), f))
            .filter(|(label, _)| label.contains(token))
            .map(|(label, f)| document_item(&label, f.snippet(), CompletionItemKind::FUNCTION, CompletionData::Function)),
    );

    items
}

/// Fill in `detail` and `documentation` for a selected item.
pub fn resolve_item(catalog: &Catalog, mut item: CompletionItem) -> CompletionItem {
    match CompletionData::from_item(&item) {
        Some(CompletionData::Static { index }) => {
            if let Some(entry) = catalog.get(index) {
                item.detail = Some(entry.detail.clone());
                item.documentation = Some(Documentation::MarkupContent(MarkupContent {
                    kind: MarkupKind::Markdown,
                    value: entry.documentation.clone(),
                }));
            }
        }
        Some(CompletionData::Variable) => item.detail = Some(format!("(variable) {}", item.label)),
        Some(CompletionData::Label) => item.detail = Some(format!("(label) {}", item.label)),
        Some(CompletionData::Function) => item.detail = Some(format!("(function) {}", item.label)),
        None => {}
    }
    item
}

#[cfg(test)]
mod tests {
    use super::*;
    use bhs_syntax::analyze;

    fn labels(items: &[CompletionItem]) -> Vec<&str> {
        items.iter().map(|i| i.label.as_str()).collect()
    }

    #[test]
    fn test_empty_token_offers_everything_in_order() {
        let source = "labels { home } int total; scenario main(int n) { int i;  }";
        let analysis = analyze(source);
        let index = analysis.index.as_ref();
        let cursor = source.find("int i;").unwrap() + "int i;".len() + 1;

        let items = completion_items(&Catalog::default(), source, index, cursor);
        let all = labels(&items);
        assert_eq!(&all[..3], &["static", "int", "real"]);
        assert_eq!(&all[12..], &["home", "total", "n", "i", "main(n)"]);
    }

    #[test]
    fn test_token_filters_every_source() {
        let source = "int total; int count; { to }";
        let analysis = analyze(source);
        let cursor = source.find("to }").unwrap() + 2;

        let items = completion_items(&Catalog::default(), source, analysis.index.as_ref(), cursor);
        assert_eq!(labels(&items), vec!["total"]);
    }

    #[test]
    fn test_without_index_only_catalog() {
        let items = completion_items(&Catalog::default(), "voi", None, 3);
        assert_eq!(labels(&items), vec!["void"]);
        assert_eq!(items[0].data, CompletionData::Static { index: 5 }.to_value());
    }

    #[test]
    fn test_resolve_by_source() {
        let catalog = Catalog::default();
        let keyword = resolve_item(&catalog, static_item(1, &catalog.entries()[1]));
        assert_eq!(keyword.detail.as_deref(), Some("(datatype) int"));

        let variable = resolve_item(
            &catalog,
            document_item("total", "total".into(), CompletionItemKind::VARIABLE, CompletionData::Variable),
        );
        assert_eq!(variable.detail.as_deref(), Some("(variable) total"));

        let label = resolve_item(
            &catalog,
            document_item("home", "home".into(), CompletionItemKind::VARIABLE, CompletionData::Label),
        );
        assert_eq!(label.detail.as_deref(), Some("(label) home"));

        let function = resolve_item(
            &catalog,
            document_item("main(n)", "main(${1:n})".into(), CompletionItemKind::FUNCTION, CompletionData::Function),
        );
        assert_eq!(function.detail.as_deref(), Some("(function) main(n)"));
    }

    #[test]
    fn test_resolve_ignores_foreign_data() {
        let item = CompletionItem {
            label: "x".into(),
            data: Some(serde_json::json!(42)),
            ..Default::default()
        };
        assert_eq!(resolve_item(&Catalog::default(), item).detail, None);
    }
}
