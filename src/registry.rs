use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A snippet contributed by a package, as reported by the document metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandEntry {
    /// Template with `#{}` insertion markers.
    pub snippet: Option<String>,
    /// Label shown in the completion list.
    pub caption: Option<String>,
    /// Classification tag, `cmd` or `env` for most packages.
    #[serde(default)]
    pub meta: String,
}

impl CommandEntry {
    pub fn new(snippet: impl Into<String>, caption: impl Into<String>, meta: impl Into<String>) -> Self {
        Self {
            snippet: Some(snippet.into()),
            caption: Some(caption.into()),
            meta: meta.into(),
        }
    }
}

/// Package name to its commands, in the order the metadata listed them.
pub type PackageCommands = IndexMap<String, Vec<CommandEntry>>;

/// Contributions of every open document, keyed by document id.
///
/// Documents keep the position of their first registration, so iteration
/// follows encounter order. Cloning is cheap, the per document maps are shared.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    documents: IndexMap<String, Arc<PackageCommands>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the contribution of `doc`.
    pub fn set(&mut self, doc: impl Into<String>, packages: PackageCommands) {
        self.documents.insert(doc.into(), Arc::new(packages));
    }

    pub fn remove(&mut self, doc: &str) -> Option<Arc<PackageCommands>> {
        self.documents.shift_remove(doc)
    }

    pub fn get(&self, doc: &str) -> Option<&PackageCommands> {
        self.documents.get(doc).map(|x| x.as_ref())
    }

    pub fn documents(&self) -> impl Iterator<Item = (&str, &PackageCommands)> {
        self.documents.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    /// Every package name across documents, duplicates included.
    pub fn package_names(&self) -> impl Iterator<Item = &str> {
        self.documents
            .values()
            .flat_map(|packages| packages.keys().map(|x| x.as_str()))
    }

    /// Every `(document, package, entry)` triple in stored order.
    pub fn commands(&self) -> impl Iterator<Item = (&str, &str, &CommandEntry)> {
        self.documents.iter().flat_map(|(doc, packages)| {
            packages.iter().flat_map(move |(name, entries)| {
                entries
                    .iter()
                    .map(move |entry| (doc.as_str(), name.as_str(), entry))
            })
        })
    }
}
