use hashbrown::HashSet;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// `\usepackage[options]{name}`, one name per declaration.
static USEPACKAGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\usepackage(\[.+?\])?\{(?P<name>[[:word:]]+)\}").expect("valid usepackage regex")
});

/// Finds the packages a document already declares.
pub trait Scanner {
    /// Names declared anywhere but on `excluded_line` (1-based).
    fn scan(&self, text: &str, excluded_line: usize) -> HashSet<String>;
}

/// Line oriented, regex based extraction of `\usepackage` declarations.
///
/// Comments are not recognised, a declaration after `%` still counts.
#[derive(Debug, Clone, Copy, Default)]
pub struct UsePackageScanner;

impl Scanner for UsePackageScanner {
    fn scan(&self, text: &str, excluded_line: usize) -> HashSet<String> {
        scan(text, excluded_line)
    }
}

pub fn scan(text: &str, excluded_line: usize) -> HashSet<String> {
    let mut items = HashSet::new();

    for (number, line) in (1..).zip(text.lines()) {
        if number == excluded_line {
            continue;
        }

        for captures in USEPACKAGE.captures_iter(line) {
            if let Some(name) = captures.name("name") {
                items.insert(name.as_str().to_string());
            }
        }
    }

    debug!(found = items.len(), excluded_line, "scanned package declarations");
    items
}
