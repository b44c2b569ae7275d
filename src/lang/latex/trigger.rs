use once_cell::sync::Lazy;
use regex::Regex;

use crate::lang::Channel;

static PACKAGE_PARAMETER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\usepackage(\[[^\]]*\])?\{([^}]*,)?\s*(?P<word>[[:word:]-]*)$")
        .expect("valid package parameter regex")
});

static COMMAND: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\[[:alpha:]@]*$").expect("valid command regex"));

/// What the text before the cursor is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trigger {
    pub channel: Channel,
    /// UTF-16 column where the word being completed starts.
    pub start: usize,
}

/// Inspects the part of the line before the cursor.
pub fn find_trigger(line_prefix: &str) -> Option<Trigger> {
    if let Some(word) = PACKAGE_PARAMETER
        .captures(line_prefix)
        .and_then(|c| c.name("word"))
    {
        return Some(Trigger {
            channel: Channel::PackageParameter,
            start: line_prefix[..word.start()].encode_utf16().count(),
        });
    }

    COMMAND.find(line_prefix).map(|m| Trigger {
        channel: Channel::Command,
        start: line_prefix[..m.start()].encode_utf16().count(),
    })
}
