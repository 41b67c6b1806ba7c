//! Archive extraction (tar.gz).

use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};

use flate2::read::GzDecoder;

/// Archive extractor
pub struct ArchiveExtractor;

impl ArchiveExtractor {
    /// Decompress and extract a gzipped tar stream into `dest_dir`,
    /// dropping the first `strip_components` path segments of every entry.
    pub fn extract_tar_gz<R: Read>(reader: R, dest_dir: &Path, strip_components: usize) -> io::Result<()> {
        Self::extract_tar_with_strip(GzDecoder::new(reader), dest_dir, strip_components)
    }

    /// Extract tar with prefix stripping
    pub fn extract_tar_with_strip<R: Read>(reader: R, dest_dir: &Path, strip_components: usize) -> io::Result<()> {
        std::fs::create_dir_all(dest_dir)?;
        let mut archive = tar::Archive::new(reader);

        // Canonicalize dest_dir for path traversal check
        let dest_dir_canonical = dest_dir.canonicalize()?;

        for entry in archive.entries()? {
            let mut entry = entry?;

            let entry_type = entry.header().entry_type();
            if entry_type.is_pax_global_extensions() || entry_type.is_pax_local_extensions() {
                continue;
            }

            let path = entry.path()?.into_owned();

            // Strip leading components
            let components: Vec<_> = path.components().collect();
            if components.len() <= strip_components {
                continue;
            }

            let stripped: PathBuf = components[strip_components..].iter().collect();
            if stripped.as_os_str().is_empty() {
                continue;
            }

            // Validate path doesn't contain traversal sequences
            if stripped
                .components()
                .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
            {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("Path traversal detected in archive: {}", stripped.display()),
                ));
            }

            let outpath = dest_dir.join(&stripped);

            // Create parent directories first so we can verify the path
            if entry_type.is_dir() {
                std::fs::create_dir_all(&outpath)?;
            } else if let Some(parent) = outpath.parent() {
                std::fs::create_dir_all(parent)?;
            }

            // Verify the path stays within destination directory
            let parent_canonical = outpath
                .parent()
                .map(Path::canonicalize)
                .transpose()?
                .unwrap_or_else(|| dest_dir_canonical.clone());

            if !parent_canonical.starts_with(&dest_dir_canonical) {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!(
                        "Path traversal detected: {} escapes destination directory",
                        stripped.display()
                    ),
                ));
            }

            if !entry_type.is_dir() {
                log::trace!("Extracting {}", stripped.display());
                entry.unpack(&outpath)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use tempfile::TempDir;

    /// Build a gzipped tarball in memory from `(path, contents)` pairs
    pub(crate) fn tarball(entries: &[(&str, &str)]) -> Vec<u8> {
        let encoder = GzEncoder::new(Vec::new(), Compression::default());
        let mut builder = tar::Builder::new(encoder);

        for (path, contents) in entries {
            let mut header = tar::Header::new_gnu();
            if path.ends_with('/') {
                header.set_entry_type(tar::EntryType::Directory);
                header.set_size(0);
                header.set_mode(0o755);
                header.set_cksum();
                builder.append_data(&mut header, path, io::empty()).unwrap();
            } else {
                header.set_size(contents.len() as u64);
                header.set_mode(0o644);
                header.set_cksum();
                builder.append_data(&mut header, path, contents.as_bytes()).unwrap();
            }
        }

        builder.into_inner().unwrap().finish().unwrap()
    }

    #[test]
    fn test_strips_wrapper_directory() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("out");
        let data = tarball(&[
            ("pkgname-abc123/", ""),
            ("pkgname-abc123/file.txt", "hello"),
        ]);

        ArchiveExtractor::extract_tar_gz(data.as_slice(), &dest, 1).unwrap();

        assert_eq!(std::fs::read_to_string(dest.join("file.txt")).unwrap(), "hello");
        assert!(!dest.join("pkgname-abc123").exists());
    }

    #[test]
    fn test_nested_directories() {
        let temp = TempDir::new().unwrap();
        let data = tarball(&[
            ("repo-master/lib/index.js", "module.exports = {};"),
            ("repo-master/package.json", "{}"),
        ]);

        ArchiveExtractor::extract_tar_gz(data.as_slice(), temp.path(), 1).unwrap();

        assert!(temp.path().join("lib/index.js").is_file());
        assert!(temp.path().join("package.json").is_file());
    }

    #[test]
    fn test_top_level_files_dropped() {
        let temp = TempDir::new().unwrap();
        let data = tarball(&[("README", "top"), ("wrap/kept.txt", "kept")]);

        ArchiveExtractor::extract_tar_gz(data.as_slice(), temp.path(), 1).unwrap();

        assert!(!temp.path().join("README").exists());
        assert!(temp.path().join("kept.txt").exists());
    }

    #[test]
    fn test_corrupt_gzip_is_error() {
        let temp = TempDir::new().unwrap();
        let result = ArchiveExtractor::extract_tar_gz(&b"definitely not gzip"[..], temp.path(), 1);
        assert!(result.is_err());
    }
}
