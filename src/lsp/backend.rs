//! LSP (Language Server Protocol) backend implementation for BHS scripts

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};

use bhs_syntax::analyze;

use crate::database::{self, Catalog};
use crate::lsp::completion::{completion_items, resolve_item};
use crate::lsp::config::{SECTION, Settings, ValidationTrigger};
use crate::lsp::diagnostics::{position_to_offset, to_lsp_diagnostic};
use crate::lsp::document::DocumentState;
use crate::lsp::hover::hover_markdown;

/// The static catalog and the database it was built from.
#[derive(Debug, Default)]
struct CatalogState {
    source: Option<PathBuf>,
    catalog: Arc<Catalog>,
}

/// BHS Language Server
pub struct BhsLanguageServer {
    client: Client,
    documents: Arc<RwLock<HashMap<Url, DocumentState>>>,
    settings: Arc<RwLock<Settings>>,
    catalog: RwLock<CatalogState>,
    /// Database path from the command line or environment; wins over the `functionDatabase` setting.
    database_path: Option<PathBuf>,
    /// Client answers `workspace/configuration` requests.
    pull_configuration: AtomicBool,
}

impl BhsLanguageServer {
    pub fn with_database(client: Client, database_path: Option<PathBuf>) -> Self {
        Self {
            client,
            documents: Arc::new(RwLock::new(HashMap::new())),
            settings: Arc::new(RwLock::new(Settings::default())),
            catalog: RwLock::new(CatalogState::default()),
            database_path,
            pull_configuration: AtomicBool::new(false),
        }
    }

    /// Analyze a document and publish diagnostics
    async fn validate(&self, uri: &Url) {
        let snapshot = {
            let docs = self.documents.read().await;
            docs.get(uri).map(|doc| (doc.text.clone(), doc.version))
        };
        let Some((text, version)) = snapshot else {
            return;
        };

        let analysis = analyze(&text);
        let diagnostics: Vec<Diagnostic> = analysis
            .diagnostics
            .iter()
            .map(|d| to_lsp_diagnostic(d, &text))
            .collect();

        {
            let mut docs = self.documents.write().await;
            match docs.get_mut(uri) {
                Some(doc) if doc.version == version => {
                    if let Some(index) = analysis.index {
                        doc.index = Some(Arc::new(index));
                    }
                }
                // Closed or edited while we were analyzing; a later pass owns the diagnostics.
                _ => {
                    tracing::debug!(%uri, version, "dropping stale validation");
                    return;
                }
            }
        }

        tracing::debug!(%uri, version, count = diagnostics.len(), "publishing diagnostics");
        self.client
            .publish_diagnostics(uri.clone(), diagnostics, Some(version))
            .await;
    }

    async fn validate_all(&self) {
        let uris: Vec<Url> = self.documents.read().await.keys().cloned().collect();
        for uri in &uris {
            self.validate(uri).await;
        }
    }

    /// Ask the client for the `bhs` section.
    async fn pull_settings(&self) -> Option<Settings> {
        if !self.pull_configuration.load(Ordering::Relaxed) {
            return None;
        }
        let items = vec![ConfigurationItem {
            scope_uri: None,
            section: Some(SECTION.to_string()),
        }];
        let value = match self.client.configuration(items).await {
            Ok(values) => values.into_iter().next()?,
            Err(err) => {
                tracing::warn!(error = %err, "workspace/configuration request failed");
                return None;
            }
        };
        self.read_settings(&value).await
    }

    async fn read_settings(&self, value: &serde_json::Value) -> Option<Settings> {
        match Settings::from_value(value) {
            Ok(settings) => settings,
            Err(err) => {
                tracing::warn!(error = %err, "ignoring settings");
                self.client.show_message(MessageType::WARNING, err.to_string()).await;
                None
            }
        }
    }

    /// (Re)build the catalog when the effective database path changed.
    ///
    /// A database that fails to load leaves the previous catalog in place.
    async fn reload_catalog(&self) {
        let configured = self.settings.read().await.function_database.clone();
        let path = database::resolve_path(self.database_path.as_deref()).or(configured);

        let mut state = self.catalog.write().await;
        if state.source == path {
            return;
        }
        let Some(path) = path else {
            *state = CatalogState::default();
            return;
        };

        match database::load(&path) {
            Ok(signatures) => {
                *state = CatalogState {
                    source: Some(path),
                    catalog: Arc::new(Catalog::new(&signatures)),
                };
            }
            Err(err) => {
                tracing::warn!(error = %err, "keeping previous function database");
                self.client.show_message(MessageType::WARNING, err.to_string()).await;
            }
        }
    }

    async fn catalog(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog.read().await.catalog)
    }

    async fn trigger(&self) -> ValidationTrigger {
        self.settings.read().await.trigger()
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for BhsLanguageServer {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        let workspace = params.capabilities.workspace.as_ref();
        let pull = workspace.and_then(|w| w.configuration).unwrap_or(false);
        self.pull_configuration.store(pull, Ordering::Relaxed);

        if let Some(options) = &params.initialization_options {
            if let Some(settings) = self.read_settings(options).await {
                *self.settings.write().await = settings;
            }
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Options(TextDocumentSyncOptions {
                    open_close: Some(true),
                    change: Some(TextDocumentSyncKind::INCREMENTAL),
                    save: Some(TextDocumentSyncSaveOptions::SaveOptions(SaveOptions {
                        include_text: Some(false),
                    })),
                    ..Default::default()
                })),
                hover_provider: Some(HoverProviderCapability::Simple(true)),
                completion_provider: Some(CompletionOptions {
                    resolve_provider: Some(true),
                    ..Default::default()
                }),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "bhs-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        if self.pull_configuration.load(Ordering::Relaxed) {
            let registration = Registration {
                id: "bhs-did-change-configuration".to_string(),
                method: "workspace/didChangeConfiguration".to_string(),
                register_options: None,
            };
            if let Err(err) = self.client.register_capability(vec![registration]).await {
                tracing::debug!(error = %err, "client refused configuration registration");
            }
            if let Some(settings) = self.pull_settings().await {
                *self.settings.write().await = settings;
            }
        }

        self.reload_catalog().await;
        let entries = self.catalog().await.len();
        tracing::info!(entries, "catalog ready");
        self.client
            .log_message(MessageType::INFO, "BHS LSP initialized")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        {
            let mut docs = self.documents.write().await;
            docs.insert(
                uri.clone(),
                DocumentState::new(params.text_document.text, params.text_document.version),
            );
        }
        self.validate(&uri).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        {
            let mut docs = self.documents.write().await;
            let Some(doc) = docs.get_mut(&uri) else {
                tracing::warn!(%uri, "change for a document that is not open");
                return;
            };
            doc.apply_changes(params.content_changes, params.text_document.version);
        }

        if self.trigger().await == ValidationTrigger::OnChange {
            self.validate(&uri).await;
        }
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        if self.trigger().await == ValidationTrigger::OnSave {
            self.validate(&params.text_document.uri).await;
        }
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        let settings = match self.read_settings(&params.settings).await {
            Some(settings) => Some(settings),
            None => self.pull_settings().await,
        };
        if let Some(settings) = settings {
            tracing::debug!(?settings, "settings changed");
            *self.settings.write().await = settings;
        }

        self.reload_catalog().await;
        self.validate_all().await;
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;

        // Remove document from cache
        self.documents.write().await.remove(&uri);

        // Clear diagnostics
        self.client.publish_diagnostics(uri, vec![], None).await;
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let uri = &params.text_document_position.text_document.uri;
        let position = params.text_document_position.position;
        let catalog = self.catalog().await;

        let docs = self.documents.read().await;
        let Some(doc) = docs.get(uri) else {
            return Ok(None);
        };

        let offset = position_to_offset(&doc.text, position);
        let items = completion_items(&catalog, &doc.text, doc.index.as_deref(), offset);
        Ok(Some(CompletionResponse::Array(items)))
    }

    async fn completion_resolve(&self, item: CompletionItem) -> Result<CompletionItem> {
        let catalog = self.catalog().await;
        Ok(resolve_item(&catalog, item))
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let uri = &params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;
        let catalog = self.catalog().await;
        let settings = self.settings.read().await;

        let docs = self.documents.read().await;
        let Some(doc) = docs.get(uri) else {
            return Ok(None);
        };

        let offset = position_to_offset(&doc.text, position);
        let markdown = hover_markdown(&doc.text, offset, &catalog, doc.index.as_deref(), &settings);

        Ok(markdown.map(|value| Hover {
            contents: HoverContents::Markup(MarkupContent {
                kind: MarkupKind::Markdown,
                value,
            }),
            range: None,
        }))
    }
}
