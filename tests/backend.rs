use std::fmt::Display;
use std::sync::Mutex;

use latex_language_server::backend::{Backend, Client, PackageMetadataParams};
use latex_language_server::catalog::Catalog;
use latex_language_server::registry::CommandEntry;
use serde_json::json;
use tower_lsp::lsp_types::*;
use tower_lsp::LanguageServer;

#[derive(Debug, Default)]
struct TestClient {
    messages: Mutex<Vec<(MessageType, String)>>,
}

#[tower_lsp::async_trait]
impl Client for TestClient {
    async fn log_message<M: Display + Sync + Send + 'static>(&self, ty: MessageType, msg: M) -> () {
        self.messages.lock().unwrap().push((ty, msg.to_string()));
    }
}

fn uri(name: &str) -> Url {
    Url::parse(&format!("file:///project/{}", name)).unwrap()
}

fn backend() -> Backend<TestClient> {
    Backend::new(TestClient::default(), Catalog::new(["amsmath", "graphicx"]))
}

async fn open(backend: &Backend<TestClient>, name: &str, text: &str) {
    backend
        .did_open(DidOpenTextDocumentParams {
            text_document: TextDocumentItem {
                uri: uri(name),
                language_id: "latex".into(),
                version: 0,
                text: text.into(),
            },
        })
        .await;
}

async fn complete(backend: &Backend<TestClient>, name: &str, line: u32, character: u32) -> Vec<CompletionItem> {
    let response = backend
        .completion(CompletionParams {
            text_document_position: TextDocumentPositionParams {
                text_document: TextDocumentIdentifier { uri: uri(name) },
                position: Position::new(line, character),
            },
            work_done_progress_params: Default::default(),
            partial_result_params: Default::default(),
            context: None,
        })
        .await
        .unwrap();

    match response {
        Some(CompletionResponse::List(list)) => list.items,
        Some(CompletionResponse::Array(items)) => items,
        None => Vec::new(),
    }
}

fn labels(items: &[CompletionItem]) -> Vec<&str> {
    items.iter().map(|x| x.label.as_str()).collect()
}

#[tokio::test]
async fn package_names_inside_usepackage() {
    let backend = backend();
    open(&backend, "main.tex", "\\usepackage{amsmath}\n\\usepackage{").await;

    let items = complete(&backend, "main.tex", 1, 12).await;
    assert_eq!(labels(&items), vec!["graphicx"]);
    assert_eq!(items[0].kind, Some(CompletionItemKind::MODULE));
    assert_eq!(
        items[0].text_edit,
        Some(CompletionTextEdit::Edit(TextEdit {
            range: Range::new(Position::new(1, 12), Position::new(1, 12)),
            new_text: "graphicx".into(),
        }))
    );
}

#[tokio::test]
async fn editing_a_declaration_keeps_its_name() {
    let backend = backend();
    open(&backend, "main.tex", "\\usepackage{amsmath}\nHello").await;

    let items = complete(&backend, "main.tex", 0, 15).await;
    assert_eq!(labels(&items), vec!["amsmath", "graphicx"]);
    assert_eq!(
        items[0].text_edit,
        Some(CompletionTextEdit::Edit(TextEdit {
            range: Range::new(Position::new(0, 12), Position::new(0, 15)),
            new_text: "amsmath".into(),
        }))
    );
}

#[tokio::test]
async fn commands_after_backslash() {
    let backend = backend();
    open(&backend, "main.tex", "\\usepackage{amsmath}\n\\").await;
    backend
        .package_metadata(PackageMetadataParams {
            uri: uri("main.tex"),
            packages: [(
                "amsmath".to_string(),
                vec![CommandEntry::new("\\begin{align}#{}\\end{align}", "\\begin{align}", "env")],
            )]
            .into_iter()
            .collect(),
        })
        .await;

    let items = complete(&backend, "main.tex", 1, 1).await;
    assert_eq!(
        labels(&items),
        vec!["\\begin{align}", "\\usepackage{graphicx}", "\\usepackage{}"]
    );

    let boosted = items.iter().min_by_key(|x| x.sort_text.clone()).unwrap();
    assert_eq!(boosted.label, "\\usepackage{}");
    assert_eq!(items[0].insert_text_format, Some(InsertTextFormat::SNIPPET));
}

#[tokio::test]
async fn closing_a_document_drops_its_metadata() {
    let backend = backend();
    open(&backend, "main.tex", "\\").await;
    open(&backend, "pkg.tex", "").await;
    backend
        .package_metadata(PackageMetadataParams {
            uri: uri("pkg.tex"),
            packages: [("tikz".to_string(), vec![])].into_iter().collect(),
        })
        .await;

    let items = complete(&backend, "main.tex", 0, 1).await;
    assert!(labels(&items).contains(&"\\usepackage{tikz}"));

    backend
        .did_close(DidCloseTextDocumentParams {
            text_document: TextDocumentIdentifier { uri: uri("pkg.tex") },
        })
        .await;

    let items = complete(&backend, "main.tex", 0, 1).await;
    assert!(!labels(&items).contains(&"\\usepackage{tikz}"));
    assert!(complete(&backend, "pkg.tex", 0, 0).await.is_empty());
}

#[tokio::test]
async fn plain_text_gets_nothing() {
    let backend = backend();
    open(&backend, "main.tex", "Hello world").await;
    assert!(complete(&backend, "main.tex", 0, 5).await.is_empty());
    assert!(complete(&backend, "missing.tex", 0, 0).await.is_empty());
}

#[tokio::test]
async fn configuration_changes_apply() {
    let backend = backend();
    open(&backend, "main.tex", "\\usepackage{amsmath}\n\\usepackage{").await;

    backend
        .did_change_configuration(DidChangeConfigurationParams {
            settings: json!({ "latex": { "extraPackages": ["mypkg"], "scanDocument": false } }),
        })
        .await;

    let items = complete(&backend, "main.tex", 1, 12).await;
    assert_eq!(labels(&items), vec!["amsmath", "graphicx", "mypkg"]);

    backend
        .did_change_configuration(DidChangeConfigurationParams {
            settings: json!({ "latex": { "scanDocument": 3 } }),
        })
        .await;

    assert!(!backend.config().await.scan_document);
    let messages = backend.client.messages.lock().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].0, MessageType::WARNING);
}

#[tokio::test]
async fn changes_replace_the_text() {
    let backend = backend();
    open(&backend, "main.tex", "\\usepackage{").await;
    backend
        .did_change(DidChangeTextDocumentParams {
            text_document: VersionedTextDocumentIdentifier {
                uri: uri("main.tex"),
                version: 1,
            },
            content_changes: vec![TextDocumentContentChangeEvent {
                range: None,
                range_length: None,
                text: "\\usepackage{graphicx}\n\\usepackage{".into(),
            }],
        })
        .await;

    let items = complete(&backend, "main.tex", 1, 12).await;
    assert_eq!(labels(&items), vec!["amsmath"]);
}

#[tokio::test]
async fn emoji_before_the_cursor_keeps_the_right_line() {
    let backend = backend();
    open(&backend, "main.tex", "😀\\usepackage{\n\\usepackage{amsmath}").await;

    // the emoji takes two UTF-16 units, so the line ends at column 14
    let items = complete(&backend, "main.tex", 0, 14).await;
    assert_eq!(labels(&items), vec!["graphicx"]);
    assert_eq!(
        items[0].text_edit,
        Some(CompletionTextEdit::Edit(TextEdit {
            range: Range::new(Position::new(0, 14), Position::new(0, 14)),
            new_text: "graphicx".into(),
        }))
    );
}

#[tokio::test]
async fn emoji_before_a_backslash() {
    let backend = backend();
    open(&backend, "main.tex", "😀 \\").await;

    let items = complete(&backend, "main.tex", 0, 4).await;
    let labels = labels(&items);
    assert!(labels.contains(&"\\usepackage{amsmath}"));
    assert!(labels.contains(&"\\usepackage{graphicx}"));
    assert!(labels.contains(&"\\usepackage{}"));

    match &items[0].text_edit {
        Some(CompletionTextEdit::Edit(edit)) => assert_eq!(edit.range.start, Position::new(0, 3)),
        other => panic!("unexpected edit {:?}", other),
    }
}

#[tokio::test]
async fn column_past_the_line_end_stays_on_the_line() {
    let backend = backend();
    open(&backend, "main.tex", "\\usepackage{\n\\usepackage{amsmath}").await;

    let items = complete(&backend, "main.tex", 0, 30).await;
    assert_eq!(labels(&items), vec!["graphicx"]);
}
