use crate::{dialect::Dialect, errors::IoError};
use colored::Colorize;
use miette::Diagnostic;
use std::{
    fs,
    path::{Component, Path, PathBuf},
};
use thiserror::Error;

/// Filesystem operations the parsers need.
///
/// Implemented by [`DiskMaterializer`] for real runs and by [`crate::vfs::VirtualFS`] for
/// dry runs.
pub trait Materializer {
    /// Creates `path` and any missing ancestors. Succeeds if it already exists.
    fn create_dir_all(&mut self, path: &Path) -> Result<(), IoError>;
    /// Creates a single directory whose parent exists. Succeeds if it already exists.
    fn create_dir(&mut self, path: &Path) -> Result<(), IoError>;
    /// Creates an empty file, truncating whatever file was there.
    fn create_file(&mut self, path: &Path) -> Result<(), IoError>;
}

/// [`Materializer`] backed by `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiskMaterializer;

impl Materializer for DiskMaterializer {
    fn create_dir_all(&mut self, path: &Path) -> Result<(), IoError> {
        fs::create_dir_all(path).map_err(|error| IoError::mkdir(path, error))
    }

    fn create_dir(&mut self, path: &Path) -> Result<(), IoError> {
        match fs::create_dir(path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == std::io::ErrorKind::AlreadyExists && path.is_dir() => {
                Ok(())
            }
            Err(error) => Err(IoError::mkdir(path, error)),
        }
    }

    fn create_file(&mut self, path: &Path) -> Result<(), IoError> {
        fs::File::create(path)
            .map(drop)
            .map_err(|error| IoError::create(path, error))
    }
}

/// Failure to materialize a single structural item. Reported and counted, never fatal.
#[derive(Debug, Error, Diagnostic)]
pub enum ItemError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Io(#[from] IoError),

    #[error("'{name}' is not a single path segment")]
    #[diagnostic(
        code(etxdir::item::unsafe_name),
        help("Names may not contain path separators, '.' or '..', or a root prefix")
    )]
    UnsafeName { name: String },

    #[error("'{name}' is declared inside a scope that could not be created")]
    #[diagnostic(code(etxdir::item::scope_unavailable))]
    ScopeUnavailable { name: String },
}

/// Whether a structural item becomes a directory or a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Directory,
    File,
}

/// Aggregate outcome of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub dialect: Dialect,
    /// Structural items the parser recognised.
    pub items: usize,
    pub directories: usize,
    pub files: usize,
    pub failures: usize,
}
impl Report {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            items: 0,
            directories: 0,
            files: 0,
            failures: 0,
        }
    }

    /// `true` when every recognised item was created.
    pub fn is_clean(&self) -> bool {
        self.failures == 0
    }
}

/// Checks that `name` is usable as exactly one path segment below its parent.
fn segment(name: &str) -> Result<&Path, ItemError> {
    let path = Path::new(name);
    let mut components = path.components();

    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !name.contains(|c| c == '/' || c == '\\') => Ok(path),
        _ => Err(ItemError::UnsafeName {
            name: name.to_string(),
        }),
    }
}

/// One materialization run rooted at a target directory.
///
/// Resolves item names against their parent, performs the creation through the wrapped
/// [`Materializer`], prints progress, and keeps the running [`Report`].
pub struct Scaffold<'m, M: Materializer> {
    fs: &'m mut M,
    root: PathBuf,
    report: Report,
}
impl<'m, M: Materializer> Scaffold<'m, M> {
    pub fn new(fs: &'m mut M, root: impl Into<PathBuf>, dialect: Dialect) -> Self {
        Self {
            fs,
            root: root.into(),
            report: Report::new(dialect),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Counts a parsed structural item, whether or not it is later created.
    pub fn record_item(&mut self) {
        self.report.items += 1;
    }

    /// Creates directory `parent/name` and returns its path.
    ///
    /// `recursive` also creates missing ancestors. `None` means the failure was already
    /// reported.
    pub fn directory(&mut self, parent: &Path, name: &str, recursive: bool) -> Option<PathBuf> {
        let result = segment(name).and_then(|segment| {
            let path = parent.join(segment);
            let created = if recursive {
                self.fs.create_dir_all(&path)
            } else {
                self.fs.create_dir(&path)
            };
            created.map(|_| path).map_err(ItemError::from)
        });

        match result {
            Ok(path) => {
                println!("{}  {}", "[DIR]".blue(), path.display());
                self.report.directories += 1;
                Some(path)
            }
            Err(error) => {
                self.reject(Kind::Directory, name, error);
                None
            }
        }
    }

    /// Creates empty file `parent/name` and returns its path.
    ///
    /// With `ensure_parent`, `parent` is created first if it is missing.
    pub fn file(&mut self, parent: &Path, name: &str, ensure_parent: bool) -> Option<PathBuf> {
        let result = segment(name).and_then(|segment| {
            let path = parent.join(segment);
            if ensure_parent {
                self.fs.create_dir_all(parent)?;
            }
            self.fs.create_file(&path)?;
            Ok(path)
        });

        match result {
            Ok(path) => {
                println!("{} {}", "[FILE]".green(), path.display());
                self.report.files += 1;
                Some(path)
            }
            Err(error) => {
                self.reject(Kind::File, name, error);
                None
            }
        }
    }

    /// Reports an item that could not be created and counts it as a failure.
    pub fn reject(&mut self, kind: Kind, name: &str, error: ItemError) {
        let what = match kind {
            Kind::Directory => "dir",
            Kind::File => "file",
        };
        log::debug!("{:?}", error);
        eprintln!("{} creating {} {}: {}", "Error".red(), what, name, error);
        self.report.failures += 1;
    }

    pub fn finish(self) -> Report {
        self.report
    }
}
