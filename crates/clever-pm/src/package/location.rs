use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::CleverError;

/// Which ecosystem a module belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleType {
    /// bower-style component, described by `bower.json`
    Frontend,
    /// npm-style module, described by `package.json`
    Backend,
}

impl ModuleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleType::Frontend => "frontend",
            ModuleType::Backend => "backend",
        }
    }

    /// The other ecosystem
    pub fn opposite(&self) -> Self {
        match self {
            ModuleType::Frontend => ModuleType::Backend,
            ModuleType::Backend => ModuleType::Frontend,
        }
    }
}

impl fmt::Display for ModuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ModuleType {
    type Err = CleverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "frontend" => Ok(ModuleType::Frontend),
            "backend" => Ok(ModuleType::Backend),
            other => Err(CleverError::Config(format!(
                "Unknown location \"{}\", expected \"frontend\" or \"backend\"",
                other
            ))),
        }
    }
}

/// One root under which modules are installed.
///
/// Modules live at `module_dir/module_path/<name>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub module_dir: PathBuf,
    pub module_path: PathBuf,
    #[serde(rename = "name")]
    pub module_type: ModuleType,
}

impl Location {
    pub fn new(
        module_dir: impl Into<PathBuf>,
        module_path: impl Into<PathBuf>,
        module_type: ModuleType,
    ) -> Self {
        Self {
            module_dir: module_dir.into(),
            module_path: module_path.into(),
            module_type,
        }
    }

    /// Directory holding every module of this location
    pub fn modules_root(&self) -> PathBuf {
        self.module_dir.join(&self.module_path)
    }

    /// Directory of a single module
    pub fn module_path_for(&self, name: &str) -> PathBuf {
        self.modules_root().join(name)
    }

    pub fn module_dir(&self) -> &Path {
        &self.module_dir
    }
}

/// An installed module eligible for the requested install or upgrade
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedModule {
    /// Module name, suffixed with `@version` unless the request was `*`
    pub name: String,
    #[serde(rename = "type")]
    pub module_type: ModuleType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_paths() {
        let location = Location::new("/project/backend", "modules", ModuleType::Backend);
        assert_eq!(location.modules_root(), PathBuf::from("/project/backend/modules"));
        assert_eq!(
            location.module_path_for("clever-orm"),
            PathBuf::from("/project/backend/modules/clever-orm")
        );
    }

    #[test]
    fn test_deserialize_location() {
        let json = r#"{ "moduleDir": "/project/frontend", "modulePath": "app/modules", "name": "frontend" }"#;
        let location: Location = serde_json::from_str(json).unwrap();
        assert_eq!(location.module_type, ModuleType::Frontend);
        assert_eq!(location.module_path, PathBuf::from("app/modules"));
    }

    #[test]
    fn test_module_type_from_str() {
        assert_eq!("Backend".parse::<ModuleType>().unwrap(), ModuleType::Backend);
        assert_eq!("frontend".parse::<ModuleType>().unwrap(), ModuleType::Frontend);
        assert!("both".parse::<ModuleType>().is_err());
        assert_eq!(ModuleType::Frontend.opposite(), ModuleType::Backend);
    }
}
