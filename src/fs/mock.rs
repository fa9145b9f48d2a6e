// src/fs/mock.rs

use super::{FileStat, FileSystem, FsFuture};
use std::collections::HashMap;
use std::io::{self, ErrorKind};
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

#[derive(Debug, Clone)]
pub enum MockEntry {
    File {
        contents: Vec<u8>,
        modified: SystemTime,
    },
    Dir(Vec<String>), // List of child names
}

/// In-memory filesystem for tests.
///
/// Paths are normalised before lookup, so `./a/b/`, `a/./b` and `a/b` all
/// name the same entry. Relative paths live under `.`.
#[derive(Debug, Clone)]
pub struct MockFileSystem {
    files: Arc<Mutex<HashMap<PathBuf, MockEntry>>>,
    failures: Arc<Mutex<HashMap<PathBuf, ErrorKind>>>,
    cwd: PathBuf,
    accesses: Arc<AtomicUsize>,
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFileSystem {
    pub fn new() -> Self {
        let mut files = HashMap::new();
        // Ensure root exists
        files.insert(PathBuf::from("."), MockEntry::Dir(Vec::new()));

        Self {
            files: Arc::new(Mutex::new(files)),
            failures: Arc::new(Mutex::new(HashMap::new())),
            cwd: PathBuf::from("/"),
            accesses: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Set what `current_dir` reports.
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = cwd.into();
        self
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        self.add_file_with_mtime(path, content, SystemTime::UNIX_EPOCH);
    }

    pub fn add_file_with_mtime(
        &self,
        path: impl AsRef<Path>,
        content: impl Into<Vec<u8>>,
        modified: SystemTime,
    ) {
        let path = normalize(path.as_ref());
        let mut files = self.files.lock().unwrap();
        files.insert(
            path.clone(),
            MockEntry::File {
                contents: content.into(),
                modified,
            },
        );
        Self::link_to_parent(&mut files, &path);
    }

    /// Create an empty directory (and its parents).
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = normalize(path.as_ref());
        let mut files = self.files.lock().unwrap();
        Self::ensure_dir_entry(&mut files, &path);
    }

    /// Make every operation on `path` fail with `kind`.
    pub fn fail_with(&self, path: impl AsRef<Path>, kind: ErrorKind) {
        let mut failures = self.failures.lock().unwrap();
        failures.insert(normalize(path.as_ref()), kind);
    }

    /// Number of filesystem operations served so far (`current_dir` excluded).
    pub fn accesses(&self) -> usize {
        self.accesses.load(Ordering::SeqCst)
    }

    pub fn contents(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        let files = self.files.lock().unwrap();
        match files.get(&normalize(path.as_ref())) {
            Some(MockEntry::File { contents, .. }) => Some(contents.clone()),
            _ => None,
        }
    }

    fn link_to_parent(files: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
        let Some(parent) = parent_of(path) else {
            return;
        };
        Self::ensure_dir_entry(files, &parent);
        if let Some(MockEntry::Dir(children)) = files.get_mut(&parent) {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if !children.iter().any(|c| c == name) {
                    children.push(name.to_string());
                }
            }
        }
    }

    fn ensure_dir_entry(files: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
        if !files.contains_key(path) {
            files.insert(path.to_path_buf(), MockEntry::Dir(Vec::new()));
            Self::link_to_parent(files, path);
        }
    }

    fn lookup(&self, path: &Path) -> io::Result<MockEntry> {
        self.accesses.fetch_add(1, Ordering::SeqCst);
        let key = normalize(path);
        if let Some(kind) = self.failures.lock().unwrap().get(&key) {
            return Err(io::Error::new(*kind, format!("injected failure: {:?}", path)));
        }
        let files = self.files.lock().unwrap();
        files.get(&key).cloned().ok_or_else(|| {
            io::Error::new(ErrorKind::NotFound, format!("File not found: {:?}", path))
        })
    }
}

impl FileSystem for MockFileSystem {
    fn current_dir(&self) -> io::Result<PathBuf> {
        Ok(self.cwd.clone())
    }

    fn metadata<'a>(&'a self, path: &'a Path) -> FsFuture<'a, FileStat> {
        let result = self.lookup(path).map(|entry| match entry {
            MockEntry::File { modified, .. } => FileStat {
                modified,
                is_dir: false,
            },
            MockEntry::Dir(_) => FileStat {
                modified: SystemTime::UNIX_EPOCH,
                is_dir: true,
            },
        });
        Box::pin(async move { result })
    }

    fn read<'a>(&'a self, path: &'a Path) -> FsFuture<'a, Vec<u8>> {
        let result = self.lookup(path).and_then(|entry| match entry {
            MockEntry::File { contents, .. } => Ok(contents),
            MockEntry::Dir(_) => Err(io::Error::new(
                ErrorKind::IsADirectory,
                format!("Is a directory: {:?}", path),
            )),
        });
        Box::pin(async move { result })
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        match self.lookup(path)? {
            MockEntry::Dir(children) => Ok(children.iter().map(|name| path.join(name)).collect()),
            MockEntry::File { .. } => Err(io::Error::new(
                ErrorKind::NotADirectory,
                format!("Not a directory: {:?}", path),
            )),
        }
    }
}

/// Drop `.` components and trailing slashes; an empty result means `.`.
fn normalize(path: &Path) -> PathBuf {
    let cleaned: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    if cleaned.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        cleaned
    }
}

fn parent_of(path: &Path) -> Option<PathBuf> {
    if path == Path::new(".") {
        return None;
    }
    let parent = path.parent()?;
    Some(if parent.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        parent.to_path_buf()
    })
}
