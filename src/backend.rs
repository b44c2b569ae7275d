use std::fmt::Display;
use std::sync::Arc;

use dashmap::DashMap;
use futures::lock::Mutex;
use ropey::Rope;
use serde::{Deserialize, Serialize};
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::LanguageServer;
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::config::Config;
use crate::lang::latex::completion::{CompletionCtx, CompletionProvider, PackageCompletion};
use crate::lang::latex::{find_trigger, to_lsp_snippet};
use crate::lang::{Completions, Insertion, Suggestion};
use crate::registry::{PackageCommands, Registry};
use crate::utils::{line_prefix, position_to_offset};

/// Notification carrying the package commands found for one document.
pub const PACKAGE_METADATA: &str = "latex/packageMetadata";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageMetadataParams {
    pub uri: Url,
    #[serde(default)]
    pub packages: PackageCommands,
}

#[tower_lsp::async_trait]
pub trait Client {
    async fn log_message<M: Display + Sync + Send + 'static>(&self, ty: MessageType, msg: M) -> ();
}

#[tower_lsp::async_trait]
impl Client for tower_lsp::Client {
    async fn log_message<M: Display + Sync + Send + 'static>(&self, ty: MessageType, msg: M) -> () {
        self.log_message(ty, msg).await;
    }
}

#[derive(Debug)]
struct Settings {
    config: Config,
    catalog: Catalog,
    provider: PackageCompletion,
}

impl Settings {
    fn new(config: Config, bundled: &Catalog) -> Self {
        Settings {
            catalog: config.catalog(bundled),
            provider: PackageCompletion::from_config(&config),
            config,
        }
    }
}

#[derive(Debug)]
pub struct Backend<C: Client> {
    pub client: C,

    bundled: Catalog,
    settings: Mutex<Arc<Settings>>,
    registry: Mutex<Registry>,
    documents: DashMap<String, Rope>,
}

#[tower_lsp::async_trait]
impl<C: Client + Send + Sync + 'static> LanguageServer for Backend<C> {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        if let Some(options) = params.initialization_options.as_ref() {
            self.apply_config(options).await;
        }

        Ok(InitializeResult {
            server_info: Some(ServerInfo {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                completion_provider: Some(CompletionOptions {
                    resolve_provider: Some(false),
                    trigger_characters: Some(vec![
                        "\\".to_string(),
                        "{".to_string(),
                        ",".to_string(),
                    ]),
                    work_done_progress_options: Default::default(),
                    all_commit_characters: None,
                    completion_item: None,
                }),
                ..ServerCapabilities::default()
            },
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        let settings = self.settings.lock().await.clone();
        self.client
            .log_message(
                MessageType::INFO,
                format!("latex server ready, {} packages known", settings.catalog.len()),
            )
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        self.apply_config(&params.settings).await;
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        self.on_change(params.text_document.uri, &params.text_document.text);
    }

    async fn did_change(
        &self,
        DidChangeTextDocumentParams {
            text_document,
            content_changes,
        }: DidChangeTextDocumentParams,
    ) {
        if let Some(change) = content_changes.into_iter().last() {
            self.on_change(text_document.uri, &change.text);
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let id = params.text_document.uri.to_string();
        self.documents.remove(&id);
        self.registry.lock().await.remove(&id);
        debug!(%id, "closed document");
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let position = params.text_document_position.position;
        let id = params.text_document_position.text_document.uri.to_string();

        let (text, offset, prefix) = {
            let rope = match self.documents.get(&id) {
                Some(rope) => rope,
                None => {
                    warn!(%id, "completion requested for unknown document");
                    return Ok(None);
                }
            };
            let (offset, prefix) = match (
                position_to_offset(position, &rope),
                line_prefix(position, &rope),
            ) {
                (Some(offset), Some(prefix)) => (offset, prefix),
                _ => return Ok(None),
            };
            (rope.to_string(), offset, prefix)
        };

        let trigger = match find_trigger(&prefix) {
            Some(trigger) => trigger,
            None => return Ok(None),
        };

        let settings = self.settings.lock().await.clone();
        let registry = self.registry.lock().await.clone();

        let ctx = CompletionCtx {
            text: &text,
            offset,
            metadata: Some(&registry),
            catalog: &settings.catalog,
        };
        let mut completions = Completions::default();
        settings.provider.find_completions(&ctx, &mut completions);

        let range = Range::new(Position::new(position.line, trigger.start as u32), position);
        let items: Vec<_> = completions
            .into_channel(trigger.channel)
            .into_iter()
            .map(|suggestion| into_completion_item(suggestion, range))
            .collect();

        info!(%id, channel = ?trigger.channel, items = items.len(), "completion");

        Ok(Some(CompletionResponse::List(CompletionList {
            is_incomplete: false,
            items,
        })))
    }
}

impl<C: Client> Backend<C> {
    pub fn new(client: C, bundled: Catalog) -> Self {
        let settings = Settings::new(Config::default(), &bundled);
        Backend {
            client,
            bundled,
            settings: Mutex::new(Arc::new(settings)),
            registry: Mutex::new(Registry::new()),
            documents: DashMap::new(),
        }
    }

    /// Handler of [`PACKAGE_METADATA`], replaces what `uri` contributed before.
    pub async fn package_metadata(&self, params: PackageMetadataParams) {
        let id = params.uri.to_string();
        debug!(%id, packages = params.packages.len(), "package metadata");
        self.registry.lock().await.set(id, params.packages);
    }

    pub async fn config(&self) -> Config {
        self.settings.lock().await.config.clone()
    }

    async fn apply_config(&self, value: &serde_json::Value) {
        match Config::from_value(value) {
            Ok(config) => {
                info!(?config, "configuration updated");
                *self.settings.lock().await = Arc::new(Settings::new(config, &self.bundled));
            }
            Err(e) => {
                warn!(error = %e, "keeping previous configuration");
                self.client
                    .log_message(MessageType::WARNING, format!("latex: {}", e))
                    .await;
            }
        }
    }

    fn on_change(&self, uri: Url, text: &str) {
        self.documents.insert(uri.to_string(), Rope::from_str(text));
    }
}

fn kind(tag: &str) -> CompletionItemKind {
    match tag {
        "pkg" => CompletionItemKind::MODULE,
        "cmd" => CompletionItemKind::FUNCTION,
        "env" => CompletionItemKind::SNIPPET,
        _ => CompletionItemKind::TEXT,
    }
}

/// Higher boosts sort first, ties fall back to the label.
fn sort_text(boost: Option<i32>, label: &str) -> String {
    let rank = 10_000 - boost.unwrap_or(0).clamp(-9_999, 9_999);
    format!("{:05}{}", rank, label)
}

fn into_completion_item(
    Suggestion {
        kind: tag,
        label,
        insertion,
        boost,
        ..
    }: Suggestion,
    range: Range,
) -> CompletionItem {
    let (new_text, format) = match insertion {
        Insertion::Text(text) => (text, InsertTextFormat::PLAIN_TEXT),
        Insertion::Snippet(template) => (to_lsp_snippet(&template), InsertTextFormat::SNIPPET),
    };

    CompletionItem {
        sort_text: Some(sort_text(boost, &label)),
        filter_text: Some(label.clone()),
        kind: Some(kind(&tag)),
        detail: Some(tag),
        label,
        insert_text_format: Some(format),
        text_edit: Some(CompletionTextEdit::Edit(TextEdit { range, new_text })),
        ..Default::default()
    }
}
