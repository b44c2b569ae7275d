use indexmap::IndexSet;

use crate::error::{Error, Result};

/// Built-in package names, in the order they are offered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    names: IndexSet<String>,
}

impl Catalog {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_json(source: &str) -> Result<Self> {
        let names: Vec<String> = serde_json::from_str(source).map_err(Error::Catalog)?;
        Ok(Self::new(names))
    }

    /// The catalog shipped with the server.
    pub fn bundled() -> Result<Self> {
        Self::from_json(include_str!("../package_names.json"))
    }

    /// Returns a copy with `extra` appended, skipping names already present.
    pub fn extended<'a>(&self, extra: impl IntoIterator<Item = &'a String>) -> Self {
        let mut names = self.names.clone();
        names.extend(extra.into_iter().cloned());
        Self { names }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|x| x.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
