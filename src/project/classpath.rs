//! Byte sources: where class files come from.
//!
//! All sources are keyed by binary name (`java/lang/String`), without the
//! `.class` suffix.

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{trace, warn};

use crate::base::names;

/// Resolves binary names to raw class-file bytes.
pub trait ByteSource: Send {
    /// Bytes of the class, or `None` when the source has no such class.
    fn fetch(&self, binary_name: &str) -> io::Result<Option<Vec<u8>>>;

    /// Whether the class exists, without necessarily reading it.
    fn contains(&self, binary_name: &str) -> bool {
        matches!(self.fetch(binary_name), Ok(Some(_)))
    }
}

impl<S: ByteSource + Sync + ?Sized> ByteSource for std::sync::Arc<S> {
    fn fetch(&self, binary_name: &str) -> io::Result<Option<Vec<u8>>> {
        (**self).fetch(binary_name)
    }

    fn contains(&self, binary_name: &str) -> bool {
        (**self).contains(binary_name)
    }
}

/// Class files held in memory.
#[derive(Clone, Debug, Default)]
pub struct InMemoryClasspath {
    classes: IndexMap<String, Vec<u8>>,
}

impl InMemoryClasspath {
    /// An empty in-memory classpath.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a class under its binary (or flat) name.
    pub fn insert(&mut self, name: &str, bytes: impl Into<Vec<u8>>) {
        self.classes.insert(names::binary_name(name), bytes.into());
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_class(mut self, name: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(name, bytes);
        self
    }

    /// Drop a class, returning its bytes if it was present.
    pub fn remove(&mut self, name: &str) -> Option<Vec<u8>> {
        self.classes.shift_remove(&names::binary_name(name))
    }

    /// Number of classes held.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl ByteSource for InMemoryClasspath {
    fn fetch(&self, binary_name: &str) -> io::Result<Option<Vec<u8>>> {
        Ok(self.classes.get(binary_name).cloned())
    }

    fn contains(&self, binary_name: &str) -> bool {
        self.classes.contains_key(binary_name)
    }
}

/// Class files laid out under a directory root (`<root>/java/lang/String.class`).
#[derive(Clone, Debug)]
pub struct DirectoryClasspath {
    root: PathBuf,
}

impl DirectoryClasspath {
    /// A classpath rooted at `root`; `a/B` is read from `root/a/B.class`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory class files are read from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, binary_name: &str) -> PathBuf {
        self.root.join(names::resource_name(binary_name))
    }
}

impl ByteSource for DirectoryClasspath {
    fn fetch(&self, binary_name: &str) -> io::Result<Option<Vec<u8>>> {
        let path = self.path_for(binary_name);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn contains(&self, binary_name: &str) -> bool {
        self.path_for(binary_name).is_file()
    }
}

/// Class files inside a `.jar` archive.
#[cfg(feature = "jar")]
pub struct JarClasspath {
    path: PathBuf,
    archive: parking_lot::Mutex<zip::ZipArchive<fs::File>>,
}

#[cfg(feature = "jar")]
impl JarClasspath {
    /// Open the archive and read its central directory. Fails if `path` is
    /// not a readable zip file.
    pub fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let file = fs::File::open(&path)?;
        let archive = zip::ZipArchive::new(file).map_err(io::Error::other)?;
        Ok(Self {
            path,
            archive: parking_lot::Mutex::new(archive),
        })
    }

    /// Location of the archive on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(feature = "jar")]
impl ByteSource for JarClasspath {
    fn fetch(&self, binary_name: &str) -> io::Result<Option<Vec<u8>>> {
        use std::io::Read;

        let entry_name = format!("{binary_name}{}", names::CLASS_SUFFIX);
        let mut archive = self.archive.lock();
        let mut entry = match archive.by_name(&entry_name) {
            Ok(entry) => entry,
            Err(zip::result::ZipError::FileNotFound) => return Ok(None),
            Err(err) => return Err(io::Error::other(err)),
        };
        let mut bytes = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut bytes)?;
        Ok(Some(bytes))
    }

    fn contains(&self, binary_name: &str) -> bool {
        let entry_name = format!("{binary_name}{}", names::CLASS_SUFFIX);
        self.archive.lock().index_for_name(&entry_name).is_some()
    }
}

/// Ordered chain of byte sources; the first source holding a class wins.
#[derive(Default)]
pub struct Classpath {
    entries: Vec<Box<dyn ByteSource>>,
}

impl Classpath {
    /// A chain with no entries; every lookup misses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, searched after the existing ones.
    pub fn push(&mut self, source: impl ByteSource + 'static) {
        self.entries.push(Box::new(source));
    }

    /// Builder form of [`push`](Self::push).
    pub fn with(mut self, source: impl ByteSource + 'static) -> Self {
        self.push(source);
        self
    }

    /// Build a classpath from a platform path list (`a:b.jar:c` on Unix).
    ///
    /// Directories become [`DirectoryClasspath`] entries and archives become jar
    /// entries when the `jar` feature is enabled. Unusable entries are skipped
    /// with a warning.
    pub fn from_path_list(list: &OsStr) -> Self {
        let mut classpath = Self::new();
        for path in std::env::split_paths(list) {
            if path.as_os_str().is_empty() {
                continue;
            }
            if path.is_dir() {
                classpath.push(DirectoryClasspath::new(path));
            } else if is_archive(&path) {
                classpath.push_archive(path);
            } else {
                warn!(path = %path.display(), "skipping missing classpath entry");
            }
        }
        classpath
    }

    #[cfg(feature = "jar")]
    fn push_archive(&mut self, path: PathBuf) {
        match JarClasspath::open(&path) {
            Ok(jar) => self.push(jar),
            Err(err) => warn!(path = %path.display(), error = %err, "skipping unreadable archive"),
        }
    }

    #[cfg(not(feature = "jar"))]
    fn push_archive(&mut self, path: PathBuf) {
        warn!(path = %path.display(), "skipping archive: built without the `jar` feature");
    }

    /// Number of entries in the chain.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn is_archive(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(OsStr::to_str)
            .is_some_and(|ext| ext.eq_ignore_ascii_case("jar") || ext.eq_ignore_ascii_case("zip"))
}

impl ByteSource for Classpath {
    fn fetch(&self, binary_name: &str) -> io::Result<Option<Vec<u8>>> {
        for entry in &self.entries {
            if let Some(bytes) = entry.fetch(binary_name)? {
                return Ok(Some(bytes));
            }
        }
        trace!(name = binary_name, "class not on classpath");
        Ok(None)
    }

    fn contains(&self, binary_name: &str) -> bool {
        self.entries.iter().any(|entry| entry.contains(binary_name))
    }
}

impl std::fmt::Debug for Classpath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Classpath")
            .field("entries", &self.entries.len())
            .finish()
    }
}
