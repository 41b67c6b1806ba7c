//! Dependency installs through the npm command line.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::{CleverError, Result};

/// Installs one dependency spec (`name@range`) of a backend module
#[async_trait]
pub trait DependencyRunner: Send + Sync {
    /// Install `spec` so that it lands under `prefix`, running from
    /// `package_dir` (the dependent module's own directory).
    async fn install(&self, package: &str, spec: &str, prefix: &Path, package_dir: &Path) -> Result<()>;
}

/// Runs `<program> install <spec> --prefix <prefix>` as a subprocess
#[derive(Debug, Clone)]
pub struct NpmRunner {
    program: PathBuf,
}

impl NpmRunner {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for NpmRunner {
    fn default() -> Self {
        Self::new("npm")
    }
}

#[async_trait]
impl DependencyRunner for NpmRunner {
    async fn install(&self, package: &str, spec: &str, prefix: &Path, package_dir: &Path) -> Result<()> {
        log::debug!(
            "Running {} install {} --prefix {} in {}",
            self.program.display(),
            spec,
            prefix.display(),
            package_dir.display()
        );

        let output = Command::new(&self.program)
            .arg("install")
            .arg(spec)
            .arg("--prefix")
            .arg(prefix)
            .current_dir(package_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                CleverError::InstallationFailed(format!(
                    "Failed to run {}: {}",
                    self.program.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            return Err(CleverError::DependencyInstall {
                package: package.to_string(),
                dependency: spec.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(())
    }
}
