//! Locating already installed modules.
//!
//! Each candidate location is inspected shallowly: only the directory named
//! after the module is looked at, and only the manifest belonging to the
//! location's own ecosystem is read. Finding the other ecosystem's manifest
//! there instead means the module is being installed from the wrong place.

use std::fmt;

use clever_semver::{is_wildcard, Comparator};
use futures_util::future::join_all;

use crate::manifest::reader_for;
use crate::package::{Location, ResolvedModule};
use crate::{CleverError, Result};

/// Which direction of version drift blocks an install
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VersionCheck {
    /// Refuse when the installed version is already greater (upgrades)
    #[default]
    Gt,
    /// Refuse when the installed version is already lower (downgrades)
    Lt,
}

impl VersionCheck {
    /// Anything other than `lt` means `gt`
    pub fn parse_lenient(s: &str) -> Self {
        if s.eq_ignore_ascii_case("lt") {
            VersionCheck::Lt
        } else {
            VersionCheck::Gt
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VersionCheck::Gt => "gt",
            VersionCheck::Lt => "lt",
        }
    }

    fn holds(&self, installed: &str, requested: &str) -> Result<bool> {
        Ok(match self {
            VersionCheck::Gt => Comparator::greater_than(installed, requested)?,
            VersionCheck::Lt => Comparator::less_than(installed, requested)?,
        })
    }
}

impl fmt::Display for VersionCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Finds installed modules across a set of install locations
pub struct ModuleLocator;

impl ModuleLocator {
    /// Look for `module_name` in every location and decide whether installing
    /// `module_version` over it is allowed.
    ///
    /// All locations are searched concurrently and the result is only decided
    /// once each of them has answered. Errors win over matches; among
    /// matches the first location in `locations` order is reported.
    pub async fn locate(
        locations: &[Location],
        module_name: &str,
        module_version: &str,
        check: VersionCheck,
    ) -> Result<Option<ResolvedModule>> {
        let searches = locations
            .iter()
            .map(|location| Self::search_location(location, module_name, module_version, check));
        let results = join_all(searches).await;

        let mut found = None;
        for result in results {
            if let Some(module) = result? {
                found.get_or_insert(module);
            }
        }

        Ok(found)
    }

    async fn search_location(
        location: &Location,
        module_name: &str,
        module_version: &str,
        check: VersionCheck,
    ) -> Result<Option<ResolvedModule>> {
        let dir = location.module_path_for(module_name);
        match tokio::fs::metadata(&dir).await {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        }

        log::trace!("Looking for {} in {}", module_name, dir.display());

        let expected = reader_for(location.module_type);
        let manifest = match expected.read(&dir).await? {
            Some(manifest) => manifest,
            None => {
                let other = reader_for(location.module_type.opposite());
                if other.exists(&dir).await? {
                    return Err(CleverError::DomainMismatch {
                        module: module_name.to_string(),
                        found: other.module_type(),
                        location: location.module_type,
                    });
                }
                return Ok(None);
            }
        };

        if manifest.name != module_name {
            log::debug!(
                "{} in {} declares name {}, skipping",
                expected.file_name(),
                dir.display(),
                manifest.name
            );
            return Ok(None);
        }

        check_version(module_name, &manifest.version, module_version, check)?;

        let name = if is_wildcard(module_version) {
            module_name.to_string()
        } else {
            format!("{}@{}", module_name, module_version)
        };

        Ok(Some(ResolvedModule {
            name,
            module_type: location.module_type,
        }))
    }
}

/// Refuse installs that would not move the module in the requested direction
fn check_version(module: &str, installed: &str, requested: &str, check: VersionCheck) -> Result<()> {
    if is_wildcard(requested) {
        return Ok(());
    }

    if check.holds(installed, requested)? {
        return Err(CleverError::VersionConflict {
            module: module.to_string(),
            requested: requested.to_string(),
            installed: installed.to_string(),
            greater: check == VersionCheck::Gt,
        });
    }

    if Comparator::equal_to(installed, requested)? {
        return Err(CleverError::AlreadyAtVersion {
            module: module.to_string(),
            version: installed.to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::ModuleType;
    use std::path::Path;
    use tempfile::TempDir;

    fn install(root: &Path, name: &str, file: &str, version: &str) {
        let dir = root.join(name);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join(file),
            format!(r#"{{ "name": "{}", "version": "{}" }}"#, name, version),
        )
        .unwrap();
    }

    fn backend(temp: &TempDir) -> Location {
        Location::new(temp.path().join("backend"), "modules", ModuleType::Backend)
    }

    fn frontend(temp: &TempDir) -> Location {
        Location::new(temp.path().join("frontend"), "app/modules", ModuleType::Frontend)
    }

    #[tokio::test]
    async fn test_upgrade_allowed() {
        let temp = TempDir::new().unwrap();
        let location = backend(&temp);
        install(&location.modules_root(), "clever-orm", "package.json", "1.0.0");

        let module = ModuleLocator::locate(&[location], "clever-orm", "1.1.0", VersionCheck::Gt)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(module.name, "clever-orm@1.1.0");
        assert_eq!(module.module_type, ModuleType::Backend);
    }

    #[tokio::test]
    async fn test_wildcard_version_has_no_suffix() {
        let temp = TempDir::new().unwrap();
        let location = frontend(&temp);
        install(&location.modules_root(), "ng-auth", "bower.json", "0.3.0");

        let module = ModuleLocator::locate(&[location], "ng-auth", "*", VersionCheck::default())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(module.name, "ng-auth");
        assert_eq!(module.module_type, ModuleType::Frontend);
    }

    #[tokio::test]
    async fn test_installed_version_already_greater() {
        let temp = TempDir::new().unwrap();
        let location = backend(&temp);
        install(&location.modules_root(), "clever-orm", "package.json", "2.0.0");

        let err = ModuleLocator::locate(&[location], "clever-orm", "1.5.0", VersionCheck::Gt)
            .await
            .unwrap_err();

        assert!(matches!(err, CleverError::VersionConflict { greater: true, .. }));
        assert!(err.is_fatal());
    }

    #[tokio::test]
    async fn test_installed_version_already_lower() {
        let temp = TempDir::new().unwrap();
        let location = backend(&temp);
        install(&location.modules_root(), "clever-orm", "package.json", "1.0.0");

        let err = ModuleLocator::locate(&[location], "clever-orm", "1.5.0", VersionCheck::Lt)
            .await
            .unwrap_err();

        assert!(matches!(err, CleverError::VersionConflict { greater: false, .. }));
    }

    #[tokio::test]
    async fn test_equal_version_fails_in_both_modes() {
        for check in [VersionCheck::Gt, VersionCheck::Lt] {
            let temp = TempDir::new().unwrap();
            let location = backend(&temp);
            install(&location.modules_root(), "clever-orm", "package.json", "1.0.0");

            let err = ModuleLocator::locate(&[location], "clever-orm", "1.0.0", check)
                .await
                .unwrap_err();

            assert!(
                matches!(err, CleverError::AlreadyAtVersion { ref version, .. } if version == "1.0.0"),
                "{check}: {err}"
            );
        }
    }

    #[tokio::test]
    async fn test_backend_module_in_frontend_location() {
        let temp = TempDir::new().unwrap();
        let location = frontend(&temp);
        install(&location.modules_root(), "clever-auth", "package.json", "1.0.0");

        let err = ModuleLocator::locate(&[location], "clever-auth", "1.1.0", VersionCheck::Gt)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CleverError::DomainMismatch {
                found: ModuleType::Backend,
                location: ModuleType::Frontend,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_frontend_module_in_backend_location() {
        let temp = TempDir::new().unwrap();
        let location = backend(&temp);
        install(&location.modules_root(), "ng-auth", "bower.json", "1.0.0");

        let err = ModuleLocator::locate(&[location], "ng-auth", "*", VersionCheck::Gt)
            .await
            .unwrap_err();

        assert!(matches!(err, CleverError::DomainMismatch { found: ModuleType::Frontend, .. }));
    }

    #[tokio::test]
    async fn test_not_found() {
        let temp = TempDir::new().unwrap();
        let result = ModuleLocator::locate(
            &[backend(&temp), frontend(&temp)],
            "clever-orm",
            "1.0.0",
            VersionCheck::Gt,
        )
        .await
        .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_name_mismatch_is_not_a_match() {
        let temp = TempDir::new().unwrap();
        let location = backend(&temp);
        let dir = location.module_path_for("clever-orm");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("package.json"),
            r#"{ "name": "something-else", "version": "9.9.9" }"#,
        )
        .unwrap();

        let result = ModuleLocator::locate(&[location], "clever-orm", "1.0.0", VersionCheck::Gt)
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_first_location_in_order_wins() {
        let temp = TempDir::new().unwrap();
        let first = Location::new(temp.path().join("a"), "modules", ModuleType::Backend);
        let second = Location::new(temp.path().join("b"), "modules", ModuleType::Backend);
        install(&first.modules_root(), "clever-orm", "package.json", "1.0.0");
        install(&second.modules_root(), "clever-orm", "package.json", "1.2.0");

        let module = ModuleLocator::locate(&[second, first], "clever-orm", "1.3.0", VersionCheck::Gt)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(module.name, "clever-orm@1.3.0");
    }

    #[tokio::test]
    async fn test_mismatch_in_one_location_fails_whole_lookup() {
        let temp = TempDir::new().unwrap();
        let good = backend(&temp);
        let bad = frontend(&temp);
        install(&good.modules_root(), "clever-auth", "package.json", "1.0.0");
        install(&bad.modules_root(), "clever-auth", "package.json", "1.0.0");

        let err = ModuleLocator::locate(&[good, bad], "clever-auth", "1.1.0", VersionCheck::Gt)
            .await
            .unwrap_err();
        assert!(matches!(err, CleverError::DomainMismatch { .. }));
    }

    #[test]
    fn test_version_check_parse_lenient() {
        assert_eq!(VersionCheck::parse_lenient("lt"), VersionCheck::Lt);
        assert_eq!(VersionCheck::parse_lenient("LT"), VersionCheck::Lt);
        assert_eq!(VersionCheck::parse_lenient("gt"), VersionCheck::Gt);
        assert_eq!(VersionCheck::parse_lenient("anything"), VersionCheck::Gt);
    }
}
