use serde::{Deserialize, Serialize};
use url::Url;

/// Registry distribution information for a backend package
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dist {
    /// URL of the gzip-compressed tarball published by the registry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tarball: Option<String>,

    /// Registry checksum, kept for display only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shasum: Option<String>,
}

/// A package requested for installation.
///
/// The name may carry a version pin (`name@ref`); use [`Package::base_name`]
/// whenever the name addresses a directory or is shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub name: String,

    /// GitHub owner (user or organization) hosting the package sources
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    #[serde(default = "default_version")]
    pub version: String,

    /// Source URL as reported by the frontend registry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dist: Option<Dist>,
}

fn default_version() -> String {
    "*".to_string()
}

/// Split `name@ref` into its name and optional ref.
///
/// Scoped names (`@scope/name@1.0.0`) keep their leading `@`.
pub fn split_name(name: &str) -> (&str, Option<&str>) {
    match name.rfind('@') {
        Some(idx) if idx > 0 => {
            let reference = &name[idx + 1..];
            if reference.is_empty() {
                (&name[..idx], None)
            } else {
                (&name[..idx], Some(reference))
            }
        }
        _ => (name, None),
    }
}

impl Package {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            owner: None,
            version: version.into(),
            url: None,
            dist: None,
        }
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_tarball(mut self, tarball: impl Into<String>) -> Self {
        self.dist = Some(Dist {
            tarball: Some(tarball.into()),
            shasum: None,
        });
        self
    }

    /// Package name with any `@ref` pin removed
    pub fn base_name(&self) -> &str {
        split_name(&self.name).0
    }

    /// The ref pinned in the name, e.g. `v2.0.0` for `foo@v2.0.0`
    pub fn pinned_ref(&self) -> Option<&str> {
        split_name(&self.name).1
    }

    /// Registry tarball reference, if any
    pub fn tarball(&self) -> Option<&str> {
        self.dist.as_ref().and_then(|d| d.tarball.as_deref())
    }

    /// The GitHub owner: explicit when given, otherwise taken from a
    /// GitHub source url (`git://github.com/owner/name.git`,
    /// `https://github.com/owner/name`, `git@github.com:owner/name.git`).
    pub fn owner_or_from_url(&self) -> Option<String> {
        if let Some(owner) = self.owner.as_deref().filter(|o| !o.is_empty()) {
            return Some(owner.to_string());
        }

        let url = self.url.as_deref()?;
        if let Some(rest) = url.strip_prefix("git@github.com:") {
            return rest.split('/').next().filter(|s| !s.is_empty()).map(str::to_string);
        }

        let parsed = Url::parse(url).ok()?;
        if parsed.host_str()? != "github.com" {
            return None;
        }
        parsed
            .path_segments()?
            .next()
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_name() {
        assert_eq!(split_name("foo"), ("foo", None));
        assert_eq!(split_name("foo@v2.0.0"), ("foo", Some("v2.0.0")));
        assert_eq!(split_name("foo@"), ("foo", None));
        assert_eq!(split_name("@scope/foo"), ("@scope/foo", None));
        assert_eq!(split_name("@scope/foo@1.0.0"), ("@scope/foo", Some("1.0.0")));
    }

    #[test]
    fn test_base_name_and_ref() {
        let pkg = Package::new("clever-auth@1.2.0", "1.2.0");
        assert_eq!(pkg.base_name(), "clever-auth");
        assert_eq!(pkg.pinned_ref(), Some("1.2.0"));
    }

    #[test]
    fn test_deserialize_registry_entry() {
        let json = r#"{
            "name": "clever-orm",
            "version": "1.1.0",
            "dist": { "tarball": "https://registry.npmjs.org/clever-orm/-/clever-orm-1.1.0.tgz" }
        }"#;
        let pkg: Package = serde_json::from_str(json).unwrap();
        assert_eq!(
            pkg.tarball(),
            Some("https://registry.npmjs.org/clever-orm/-/clever-orm-1.1.0.tgz")
        );
        assert_eq!(pkg.owner, None);
        assert_eq!(pkg.url, None);
    }

    #[test]
    fn test_version_defaults_to_wildcard() {
        let pkg: Package = serde_json::from_str(r#"{ "name": "ng-foo" }"#).unwrap();
        assert_eq!(pkg.version, "*");
        assert_eq!(pkg.tarball(), None);
    }

    #[test]
    fn test_owner_from_url() {
        let pkg = Package::new("ng-foo", "*").with_url("git://github.com/cleverstack/ng-foo.git");
        assert_eq!(pkg.owner_or_from_url().as_deref(), Some("cleverstack"));

        let pkg = Package::new("ng-foo", "*").with_url("https://github.com/acme/ng-foo");
        assert_eq!(pkg.owner_or_from_url().as_deref(), Some("acme"));

        let pkg = Package::new("ng-foo", "*").with_url("git@github.com:acme/ng-foo.git");
        assert_eq!(pkg.owner_or_from_url().as_deref(), Some("acme"));

        let pkg = Package::new("ng-foo", "*").with_url("https://gitlab.com/acme/ng-foo");
        assert_eq!(pkg.owner_or_from_url(), None);
    }

    #[test]
    fn test_explicit_owner_wins() {
        let pkg = Package::new("ng-foo", "*")
            .with_owner("bar")
            .with_url("git://github.com/cleverstack/ng-foo.git");
        assert_eq!(pkg.owner_or_from_url().as_deref(), Some("bar"));
    }
}
