// src/fs/mock.rs

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};

use super::FileSystem;

/// In-memory filesystem for tests.
///
/// Relative paths resolve against a working directory of `/work`.
/// [`MockFileSystem::without_current_dir`] makes `current_dir` fail the way
/// it does when the directory was deleted out from under the process.
#[derive(Debug, Clone)]
pub struct MockFileSystem {
    files: Arc<Mutex<HashMap<PathBuf, Vec<u8>>>>,
    cwd: Option<PathBuf>,
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self {
            files: Arc::new(Mutex::new(HashMap::new())),
            cwd: Some(PathBuf::from("/work")),
        }
    }

    pub fn without_current_dir(mut self) -> Self {
        self.cwd = None;
        self
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let path = self.resolve(path.as_ref());
        self.files.lock().unwrap().insert(path, content.into());
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.cwd {
            Some(cwd) if path.is_relative() => cwd.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        let files = self.files.lock().unwrap();
        let bytes = files
            .get(&self.resolve(path))
            .ok_or_else(|| anyhow!("no such file: {}", path.display()))?;
        String::from_utf8(bytes.clone()).map_err(|e| anyhow!("{} is not UTF-8: {e}", path.display()))
    }

    fn current_dir(&self) -> io::Result<PathBuf> {
        self.cwd
            .clone()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "working directory removed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_files_live_under_work() {
        let fs = MockFileSystem::new();
        fs.add_file("ignore.txt", "*.tmp\n");

        assert_eq!(fs.read_to_string(Path::new("/work/ignore.txt")).unwrap(), "*.tmp\n");
        assert!(fs.read_to_string(Path::new("/elsewhere/ignore.txt")).is_err());
    }
}
