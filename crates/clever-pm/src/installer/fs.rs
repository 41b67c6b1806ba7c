//! Filesystem helpers for moving installed modules around.

use std::io;
use std::path::Path;

use walkdir::WalkDir;

/// Move a directory tree to `to`.
///
/// A plain rename is tried first; when that fails (e.g. across devices)
/// the tree is copied and the source removed afterwards.
pub(crate) async fn move_dir(from: &Path, to: &Path) -> io::Result<()> {
    if let Some(parent) = to.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    match tokio::fs::rename(from, to).await {
        Ok(()) => return Ok(()),
        Err(e) => log::debug!(
            "Renaming {} to {} failed ({}), copying instead",
            from.display(),
            to.display(),
            e
        ),
    }

    let (from_owned, to_owned) = (from.to_path_buf(), to.to_path_buf());
    tokio::task::spawn_blocking(move || copy_tree(&from_owned, &to_owned))
        .await
        .map_err(io::Error::other)??;

    tokio::fs::remove_dir_all(from).await
}

fn copy_tree(from: &Path, to: &Path) -> io::Result<()> {
    for entry in WalkDir::new(from).follow_links(false) {
        let entry = entry.map_err(io::Error::other)?;
        let relative = entry
            .path()
            .strip_prefix(from)
            .map_err(io::Error::other)?;
        let target = to.join(relative);

        let file_type = entry.file_type();
        if file_type.is_dir() {
            std::fs::create_dir_all(&target)?;
        } else if file_type.is_symlink() {
            copy_symlink(entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn copy_symlink(link: &Path, target: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(std::fs::read_link(link)?, target)
}

#[cfg(not(unix))]
fn copy_symlink(link: &Path, target: &Path) -> io::Result<()> {
    std::fs::copy(link, target).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_move_dir() {
        let temp = TempDir::new().unwrap();
        let from = temp.path().join("foo");
        std::fs::create_dir_all(from.join("src")).unwrap();
        std::fs::write(from.join("src/index.js"), "x").unwrap();

        let to = temp.path().join("baz");
        move_dir(&from, &to).await.unwrap();

        assert!(!from.exists());
        assert_eq!(std::fs::read_to_string(to.join("src/index.js")).unwrap(), "x");
    }

    #[test]
    fn test_copy_tree() {
        let temp = TempDir::new().unwrap();
        let from = temp.path().join("a");
        std::fs::create_dir_all(from.join("nested/deeper")).unwrap();
        std::fs::write(from.join("nested/deeper/file.txt"), "deep").unwrap();
        std::fs::write(from.join("top.txt"), "top").unwrap();

        let to = temp.path().join("b");
        copy_tree(&from, &to).unwrap();

        assert_eq!(std::fs::read_to_string(to.join("top.txt")).unwrap(), "top");
        assert_eq!(
            std::fs::read_to_string(to.join("nested/deeper/file.txt")).unwrap(),
            "deep"
        );
        assert!(from.exists());
    }
}
