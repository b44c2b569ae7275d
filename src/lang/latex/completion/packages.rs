use indexmap::IndexSet;
use tracing::{info, warn};

use crate::{
    config::Config,
    lang::{Channel, Completions, Suggestion},
    scanner::{Scanner, UsePackageScanner},
};

use super::{CompletionCtx, CompletionProvider};

/// Default boost of the `\usepackage{}` template.
pub const EMPTY_DECLARATION_BOOST: i32 = 10;

const PACKAGE_KIND: &str = "pkg";

/// Package names from the bundled catalog and from the project metadata.
#[derive(Debug, Clone)]
pub struct PackageCompletion<S = UsePackageScanner> {
    scanner: S,
    empty_boost: i32,
    scan_document: bool,
}

impl Default for PackageCompletion {
    fn default() -> Self {
        Self {
            scanner: UsePackageScanner,
            empty_boost: EMPTY_DECLARATION_BOOST,
            scan_document: true,
        }
    }
}

impl PackageCompletion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            scanner: UsePackageScanner,
            empty_boost: config.empty_declaration_boost,
            scan_document: config.scan_document,
        }
    }
}

impl<S> PackageCompletion<S> {
    pub fn with_scanner<T>(self, scanner: T) -> PackageCompletion<T> {
        PackageCompletion {
            scanner,
            empty_boost: self.empty_boost,
            scan_document: self.scan_document,
        }
    }
}

impl<'a, S: Scanner> CompletionProvider<CompletionCtx<'a>> for PackageCompletion<S> {
    #[tracing::instrument(skip_all, fields(offset = ctx.offset))]
    fn find_completions(&self, ctx: &CompletionCtx<'a>, completions: &mut Completions) {
        let metadata = match ctx.metadata {
            Some(metadata) => metadata,
            None => return,
        };

        let mut names: IndexSet<&str> = ctx.catalog.iter().collect();
        names.extend(metadata.package_names());

        for (doc, name, entry) in metadata.commands() {
            let (snippet, caption) = match (&entry.snippet, &entry.caption) {
                (Some(snippet), Some(caption)) => (snippet, caption),
                _ => {
                    warn!(doc, package = name, ?entry, "skipping malformed package command");
                    continue;
                }
            };

            let kind = if entry.meta.is_empty() {
                PACKAGE_KIND
            } else {
                entry.meta.as_str()
            };
            completions
                .commands
                .push(Suggestion::snippet(kind, caption.as_str(), snippet.as_str()));
        }

        let existing = if self.scan_document {
            self.scanner.scan(ctx.text, ctx.line_number())
        } else {
            Default::default()
        };

        for name in names.iter().filter(|name| !existing.contains(**name)) {
            completions.packages.push(Suggestion::text(
                Channel::PackageParameter,
                PACKAGE_KIND,
                *name,
                *name,
            ));

            let label = format!("\\usepackage{{{}}}", name);
            completions.commands.push(Suggestion::text(
                Channel::Command,
                PACKAGE_KIND,
                label.clone(),
                label,
            ));
        }

        completions.commands.push(
            Suggestion::snippet(PACKAGE_KIND, "\\usepackage{}", "\\usepackage{#{}}")
                .with_boost(self.empty_boost),
        );

        info!(
            names = names.len(),
            existing = existing.len(),
            commands = completions.commands.len(),
            packages = completions.packages.len()
        );
    }
}

/// Runs the default provider on a fresh pair of lists.
pub fn assemble(ctx: &CompletionCtx<'_>) -> Completions {
    let mut completions = Completions::default();
    PackageCompletion::new().find_completions(ctx, &mut completions);
    completions
}
