use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    catalog::Catalog,
    error::{Error, Result},
    lang::latex::completion::EMPTY_DECLARATION_BOOST,
};

/// Settings section the client uses for this server.
pub const SECTION: &str = "latex";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Package names offered next to the bundled ones.
    pub extra_packages: Vec<String>,
    pub empty_declaration_boost: i32,
    /// Hide packages the document already loads.
    pub scan_document: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extra_packages: Vec::new(),
            empty_declaration_boost: EMPTY_DECLARATION_BOOST,
            scan_document: true,
        }
    }
}

impl Config {
    /// Reads the config from `initializationOptions` or `didChangeConfiguration`
    /// settings. Both the bare object and one nested under [`SECTION`] are accepted.
    ///
    /// `null` gives the default config.
    pub fn from_value(value: &Value) -> Result<Self> {
        let value = value.get(SECTION).unwrap_or(value);
        if value.is_null() {
            return Ok(Self::default());
        }
        Config::deserialize(value).map_err(Error::Config)
    }

    pub fn catalog(&self, bundled: &Catalog) -> Catalog {
        bundled.extended(&self.extra_packages)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn defaults() {
        let config = Config::from_value(&Value::Null).unwrap();
        assert_eq!(config, Config::default());
        assert!(config.scan_document);
        assert_eq!(config.empty_declaration_boost, 10);
    }

    #[test]
    fn nested_and_partial() {
        let config = Config::from_value(&json!({
            "latex": { "extraPackages": ["mypkg"], "scanDocument": false }
        }))
        .unwrap();
        assert_eq!(config.extra_packages, vec!["mypkg".to_string()]);
        assert!(!config.scan_document);
        assert_eq!(config.empty_declaration_boost, 10);

        let config = Config::from_value(&json!({ "emptyDeclarationBoost": 2 })).unwrap();
        assert_eq!(config.empty_declaration_boost, 2);
    }

    #[test]
    fn invalid_settings() {
        let err = Config::from_value(&json!({ "scanDocument": "yes" })).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn extra_packages_extend_the_catalog() {
        let bundled = Catalog::new(["amsmath"]);
        let config = Config {
            extra_packages: vec!["mypkg".into(), "amsmath".into()],
            ..Config::default()
        };
        let names: Vec<_> = config.catalog(&bundled).iter().map(String::from).collect();
        assert_eq!(names, vec!["amsmath", "mypkg"]);
    }
}
