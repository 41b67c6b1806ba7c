use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::ModuleManifest;
use crate::package::ModuleType;
use crate::{CleverError, Result};

/// Reads the manifest of one module ecosystem from a module directory
#[async_trait]
pub trait ManifestReader: Send + Sync {
    /// Manifest file name, e.g. `package.json`
    fn file_name(&self) -> &'static str;

    /// Ecosystem this manifest describes
    fn module_type(&self) -> ModuleType;

    fn manifest_path(&self, module_dir: &Path) -> PathBuf {
        module_dir.join(self.file_name())
    }

    /// Whether the manifest file is present in `module_dir`
    async fn exists(&self, module_dir: &Path) -> Result<bool> {
        Ok(tokio::fs::try_exists(self.manifest_path(module_dir)).await?)
    }

    /// Read the manifest; `Ok(None)` when the module has no such file.
    async fn read(&self, module_dir: &Path) -> Result<Option<ModuleManifest>> {
        let path = self.manifest_path(module_dir);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        log::trace!("Read {}", path.display());
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| CleverError::Manifest { path, source })
    }
}

/// `package.json` reader for backend modules
#[derive(Debug, Default, Clone, Copy)]
pub struct BackendManifestReader;

#[async_trait]
impl ManifestReader for BackendManifestReader {
    fn file_name(&self) -> &'static str {
        "package.json"
    }

    fn module_type(&self) -> ModuleType {
        ModuleType::Backend
    }
}

/// `bower.json` reader for frontend components
#[derive(Debug, Default, Clone, Copy)]
pub struct FrontendManifestReader;

#[async_trait]
impl ManifestReader for FrontendManifestReader {
    fn file_name(&self) -> &'static str {
        "bower.json"
    }

    fn module_type(&self) -> ModuleType {
        ModuleType::Frontend
    }
}

/// Reader for the manifest a location of the given type must contain
pub fn reader_for(module_type: ModuleType) -> &'static dyn ManifestReader {
    match module_type {
        ModuleType::Backend => &BackendManifestReader,
        ModuleType::Frontend => &FrontendManifestReader,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_read_backend_manifest() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("package.json"),
            r#"{ "name": "clever-orm", "version": "1.0.0", "dependencies": { "sequelize": "^6.0.0" } }"#,
        )
        .unwrap();

        let manifest = BackendManifestReader.read(temp.path()).await.unwrap().unwrap();
        assert_eq!(manifest.name, "clever-orm");
        assert_eq!(manifest.version, "1.0.0");
        assert_eq!(manifest.dependencies.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_manifest_is_none() {
        let temp = TempDir::new().unwrap();
        assert!(FrontendManifestReader.read(temp.path()).await.unwrap().is_none());
        assert!(!FrontendManifestReader.exists(temp.path()).await.unwrap());
    }

    #[tokio::test]
    async fn test_malformed_manifest_is_error() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("bower.json"), "{ not json").unwrap();

        let err = FrontendManifestReader.read(temp.path()).await.unwrap_err();
        assert!(matches!(err, CleverError::Manifest { .. }));
        assert!(err.to_string().contains("bower.json"));
    }

    #[test]
    fn test_reader_for_location_type() {
        assert_eq!(reader_for(ModuleType::Backend).file_name(), "package.json");
        assert_eq!(reader_for(ModuleType::Frontend).file_name(), "bower.json");
        assert_eq!(
            reader_for(ModuleType::Frontend).module_type(),
            ModuleType::Frontend
        );
    }
}
