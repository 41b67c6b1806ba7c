//! Module manifests (`package.json` / `bower.json`).
//!
//! A manifest is read fresh from disk each time it is needed; nothing here
//! caches parsed manifests between lookups.

mod reader;

pub use reader::{reader_for, BackendManifestReader, FrontendManifestReader, ManifestReader};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Package descriptor found inside an installed module
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleManifest {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub version: String,

    #[serde(default)]
    pub dependencies: IndexMap<String, String>,

    #[serde(default)]
    pub dev_dependencies: IndexMap<String, String>,

    /// bower.json only: directory name the component wants to be installed under
    #[serde(
        default,
        deserialize_with = "string_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub rename: Option<String>,
}

// Non-string rename values are ignored rather than rejected
fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => Some(s),
        _ => None,
    })
}

impl ModuleManifest {
    /// All declared dependencies as `name@range` install specs,
    /// `dependencies` first then `devDependencies`.
    pub fn dependency_specs(&self) -> Vec<String> {
        self.dependencies
            .iter()
            .chain(self.dev_dependencies.iter())
            .map(|(name, range)| format!("{}@{}", name, range))
            .collect()
    }

    /// Final directory name: the rename directive when present, else `fallback`
    pub fn install_name<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.rename
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependency_specs_keep_manifest_order() {
        let json = r#"{
            "name": "clever-orm",
            "version": "1.0.0",
            "dependencies": { "sequelize": "^6.0.0", "async": "~0.9.0" },
            "devDependencies": { "mocha": "*" }
        }"#;
        let manifest: ModuleManifest = serde_json::from_str(json).unwrap();
        assert_eq!(
            manifest.dependency_specs(),
            vec!["sequelize@^6.0.0", "async@~0.9.0", "mocha@*"]
        );
    }

    #[test]
    fn test_dependency_specs_empty() {
        let manifest: ModuleManifest =
            serde_json::from_str(r#"{ "name": "x", "version": "0.1.0" }"#).unwrap();
        assert!(manifest.dependency_specs().is_empty());
    }

    #[test]
    fn test_non_string_rename_ignored() {
        let manifest: ModuleManifest =
            serde_json::from_str(r#"{ "name": "foo", "rename": true }"#).unwrap();
        assert_eq!(manifest.rename, None);
    }

    #[test]
    fn test_install_name() {
        let mut manifest = ModuleManifest::default();
        assert_eq!(manifest.install_name("foo"), "foo");

        manifest.rename = Some("baz".to_string());
        assert_eq!(manifest.install_name("foo"), "baz");

        manifest.rename = Some(String::new());
        assert_eq!(manifest.install_name("foo"), "foo");
    }
}
