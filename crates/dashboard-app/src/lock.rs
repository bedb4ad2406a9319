use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use fs2::FileExt;

/// Holds the advisory lock that keeps a second dashboard from sharing the
/// same configuration root. Released on drop. The file itself stays in
/// place: unlinking it would let a later process lock a fresh inode while
/// a waiter still holds the old one.
#[derive(Debug)]
pub struct InstanceLock {
    file: File,
    path: PathBuf,
}

impl InstanceLock {
    /// Take the lock at `path`, or `None` when another process holds it.
    pub fn try_acquire(path: &Path) -> io::Result<Option<Self>> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(path)?;
        match file.try_lock_exclusive() {
            Ok(()) => Ok(Some(Self {
                file,
                path: path.to_path_buf(),
            })),
            Err(err) if err.kind() == fs2::lock_contended_error().kind() => Ok(None),
            Err(err) => Err(err),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for InstanceLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn second_holder_is_refused_until_release() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("dashboard.lock");

        let first = InstanceLock::try_acquire(&path).unwrap();
        assert!(first.is_some());
        assert!(InstanceLock::try_acquire(&path).unwrap().is_none());

        drop(first);
        assert!(path.exists());
        let second = InstanceLock::try_acquire(&path).unwrap();
        assert!(second.is_some());
        assert!(InstanceLock::try_acquire(&path).unwrap().is_none());
    }

    #[test]
    fn opener_from_before_release_still_excludes_later_holders() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dashboard.lock");

        let first = InstanceLock::try_acquire(&path).unwrap().unwrap();
        let waiter = OpenOptions::new().write(true).open(&path).unwrap();
        drop(first);

        waiter.try_lock_exclusive().unwrap();
        assert!(InstanceLock::try_acquire(&path).unwrap().is_none());
        FileExt::unlock(&waiter).unwrap();
        assert!(InstanceLock::try_acquire(&path).unwrap().is_some());
    }
}
