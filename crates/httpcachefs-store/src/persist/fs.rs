//! Filesystem operations used by the persister

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

/// Filesystem operations the persister depends on.
///
/// `StdFs` is the real implementation; tests wrap it to inject failures at
/// any step.
pub trait PersistFs {
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    fn exists(&self, path: &Path) -> bool;

    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Create or truncate `path`, write all of `bytes`, optionally fsync,
    /// and close the file before returning.
    fn write_file(&self, path: &Path, bytes: &[u8], sync: bool) -> io::Result<()>;

    /// Replace `to` with `from` in one step.
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
}

/// `std::fs` backed implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFs;

impl PersistFs for StdFs {
    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn write_file(&self, path: &Path, bytes: &[u8], sync: bool) -> io::Result<()> {
        let mut file = File::create(path)?;
        file.write_all(bytes)?;
        file.flush()?;
        if sync {
            file.sync_all()?;
        }
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        // Replaces an existing target on both Unix and Windows
        fs::rename(from, to)
    }
}

impl<F: PersistFs + ?Sized> PersistFs for &F {
    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        (**self).create_dir_all(path)
    }

    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        (**self).remove_file(path)
    }

    fn write_file(&self, path: &Path, bytes: &[u8], sync: bool) -> io::Result<()> {
        (**self).write_file(path, bytes, sync)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        (**self).rename(from, to)
    }
}
