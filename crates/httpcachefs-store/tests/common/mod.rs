//! Shared fixtures for store integration tests

#![allow(dead_code)]

use httpcachefs_store::layout::is_staging_path;
use httpcachefs_store::{PersistFs, StdFs};
use std::cell::Cell;
use std::io;
use std::path::{Path, PathBuf};

/// How the injected rename misbehaves
#[derive(Debug, Clone, Copy)]
pub enum RenameFault {
    /// Every rename fails with this kind
    Always(io::ErrorKind),
    /// The first `n` renames fail, later ones succeed
    FirstN(u32, io::ErrorKind),
}

/// Real filesystem with injected rename (and optionally remove) failures
pub struct FaultyFs {
    fault: RenameFault,
    failing_remove: bool,
    writes: Cell<u32>,
    renames: Cell<u32>,
}

impl FaultyFs {
    pub fn new(fault: RenameFault) -> Self {
        Self {
            fault,
            failing_remove: false,
            writes: Cell::new(0),
            renames: Cell::new(0),
        }
    }

    pub fn with_failing_remove(mut self) -> Self {
        self.failing_remove = true;
        self
    }

    /// Staging writes performed so far, one per attempt
    pub fn writes(&self) -> u32 {
        self.writes.get()
    }
}

impl PersistFs for FaultyFs {
    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        StdFs.create_dir_all(path)
    }

    fn exists(&self, path: &Path) -> bool {
        StdFs.exists(path)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        if self.failing_remove {
            return Err(io::Error::new(io::ErrorKind::Other, "injected remove failure"));
        }
        StdFs.remove_file(path)
    }

    fn write_file(&self, path: &Path, bytes: &[u8], sync: bool) -> io::Result<()> {
        self.writes.set(self.writes.get() + 1);
        StdFs.write_file(path, bytes, sync)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        let call = self.renames.get();
        self.renames.set(call + 1);
        let fail_with = match self.fault {
            RenameFault::Always(kind) => Some(kind),
            RenameFault::FirstN(n, kind) if call < n => Some(kind),
            RenameFault::FirstN(..) => None,
        };
        match fail_with {
            Some(kind) => Err(io::Error::new(kind, "injected rename failure")),
            None => StdFs.rename(from, to),
        }
    }
}

/// Staging files directly under `dir`
pub fn staging_files(dir: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| is_staging_path(path))
        .collect()
}
