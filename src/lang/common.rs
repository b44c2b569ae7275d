use serde::Serialize;

/// Which list a suggestion belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Channel {
    /// Whole statements and package commands, offered after a `\`.
    Command,
    /// Bare package names, offered inside `\usepackage{...}`.
    PackageParameter,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "kebab-case")]
pub enum Insertion {
    /// Inserted verbatim.
    Text(String),
    /// Template with `#{}` or `#{placeholder}` markers.
    Snippet(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Suggestion {
    pub channel: Channel,
    /// Classification tag: `pkg`, `cmd`, `env` ...
    pub kind: String,
    pub label: String,
    pub insertion: Insertion,
    pub boost: Option<i32>,
}

impl Suggestion {
    pub fn text(channel: Channel, kind: &str, label: impl Into<String>, text: impl Into<String>) -> Self {
        Suggestion {
            channel,
            kind: kind.to_string(),
            label: label.into(),
            insertion: Insertion::Text(text.into()),
            boost: None,
        }
    }

    pub fn snippet(kind: &str, label: impl Into<String>, template: impl Into<String>) -> Self {
        Suggestion {
            channel: Channel::Command,
            kind: kind.to_string(),
            label: label.into(),
            insertion: Insertion::Snippet(template.into()),
            boost: None,
        }
    }

    pub fn with_boost(mut self, boost: i32) -> Self {
        self.boost = Some(boost);
        self
    }
}

/// The two suggestion channels produced for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Completions {
    pub commands: Vec<Suggestion>,
    pub packages: Vec<Suggestion>,
}

impl Completions {
    pub fn into_channel(self, channel: Channel) -> Vec<Suggestion> {
        match channel {
            Channel::Command => self.commands,
            Channel::PackageParameter => self.packages,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty() && self.packages.is_empty()
    }
}
