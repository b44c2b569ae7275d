use latex_language_server::backend::{Backend, PACKAGE_METADATA};
use latex_language_server::catalog::Catalog;
use std::fs::File;
use std::sync::Mutex;
use tower_lsp::LspService;
use tower_lsp::Server;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false);

    match File::create("/tmp/latex-lsp.txt") {
        Ok(x) => builder.with_writer(Mutex::new(x)).init(),
        Err(_) => builder.with_writer(std::io::stderr).init(),
    }

    let catalog = match Catalog::bundled() {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::error!(error = %e, "bundled catalog unusable, starting without it");
            Catalog::default()
        }
    };
    tracing::info!(packages = catalog.len(), "starting up");

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::build(|client| Backend::new(client, catalog))
        .custom_method(PACKAGE_METADATA, Backend::package_metadata)
        .finish();
    Server::new(stdin, stdout, socket).serve(service).await;
}
