use crate::{
    errors::IoError,
    materialize::{Kind, Materializer},
};
use indexmap::IndexMap;
use std::{
    io,
    path::{Path, PathBuf},
};

/// A virtual file or directory recorded by a dry run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualEntry {
    /// Path relative to the virtual root.
    pub destination: PathBuf,
    /// Indicates whether this entry is a file (`true`) or a directory (`false`).
    pub is_file: bool,
}

/// In-memory [`Materializer`] that records what a run would create instead of touching disk.
///
/// The root counts as an existing directory. Entries keep the order in which they were first
/// created, so parents always precede their children. Creating a file where a directory was
/// recorded (or the other way round) fails the way it would on disk.
#[derive(Debug, Clone)]
pub struct VirtualFS {
    root: PathBuf,
    entries: IndexMap<PathBuf, Kind>,
}
impl VirtualFS {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            entries: IndexMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn kind(&self, path: &Path) -> Option<Kind> {
        if path == self.root {
            return Some(Kind::Directory);
        }
        self.entries.get(path).copied()
    }

    pub fn is_dir(&self, path: &Path) -> bool {
        self.kind(path) == Some(Kind::Directory)
    }

    pub fn is_file(&self, path: &Path) -> bool {
        self.kind(path) == Some(Kind::File)
    }

    /// Recorded entries in creation order, relative to the root.
    pub fn entries(&self) -> Vec<VirtualEntry> {
        self.entries
            .iter()
            .filter_map(|(path, kind)| {
                let destination = path.strip_prefix(&self.root).ok()?.to_path_buf();
                Some(VirtualEntry {
                    destination,
                    is_file: *kind == Kind::File,
                })
            })
            .collect()
    }

    fn outside_root(&self, path: &Path) -> bool {
        !path.starts_with(&self.root)
    }

    fn insert_dir(&mut self, path: &Path) -> Result<(), IoError> {
        match self.kind(path) {
            Some(Kind::Directory) => Ok(()),
            Some(Kind::File) => Err(IoError::mkdir(
                path,
                io::Error::new(io::ErrorKind::AlreadyExists, "a file exists at this path"),
            )),
            None => {
                self.entries.insert(path.to_path_buf(), Kind::Directory);
                Ok(())
            }
        }
    }

    fn parent_exists(&self, path: &Path) -> bool {
        path.parent().is_some_and(|parent| self.is_dir(parent))
    }
}

impl Materializer for VirtualFS {
    fn create_dir_all(&mut self, path: &Path) -> Result<(), IoError> {
        if self.outside_root(path) {
            return Err(IoError::mkdir(
                path,
                io::Error::new(io::ErrorKind::PermissionDenied, "outside of the virtual root"),
            ));
        }

        let ancestors: Vec<PathBuf> = path
            .ancestors()
            .take_while(|ancestor| *ancestor != self.root)
            .map(Path::to_path_buf)
            .collect();

        for ancestor in ancestors.iter().rev() {
            self.insert_dir(ancestor)?;
        }

        Ok(())
    }

    fn create_dir(&mut self, path: &Path) -> Result<(), IoError> {
        if self.outside_root(path) || !self.parent_exists(path) {
            return Err(IoError::mkdir(
                path,
                io::Error::new(io::ErrorKind::NotFound, "parent directory does not exist"),
            ));
        }

        self.insert_dir(path)
    }

    fn create_file(&mut self, path: &Path) -> Result<(), IoError> {
        if self.outside_root(path) || !self.parent_exists(path) {
            return Err(IoError::create(
                path,
                io::Error::new(io::ErrorKind::NotFound, "parent directory does not exist"),
            ));
        }

        match self.kind(path) {
            Some(Kind::Directory) => Err(IoError::create(
                path,
                io::Error::new(io::ErrorKind::AlreadyExists, "a directory exists at this path"),
            )),
            Some(Kind::File) => Ok(()),
            None => {
                self.entries.insert(path.to_path_buf(), Kind::File);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_dir_all_records_missing_ancestors_in_order() {
        let mut vfs = VirtualFS::new("/out");
        vfs.create_dir_all(Path::new("/out/a/b/c")).unwrap();

        let destinations: Vec<PathBuf> =
            vfs.entries().into_iter().map(|e| e.destination).collect();
        assert_eq!(
            destinations,
            vec![
                PathBuf::from("a"),
                PathBuf::from("a/b"),
                PathBuf::from("a/b/c")
            ]
        );
    }

    #[test]
    fn repeated_creation_is_recorded_once() {
        let mut vfs = VirtualFS::new("/out");
        vfs.create_dir(Path::new("/out/a")).unwrap();
        vfs.create_dir(Path::new("/out/a")).unwrap();
        vfs.create_file(Path::new("/out/a/f")).unwrap();
        vfs.create_file(Path::new("/out/a/f")).unwrap();

        assert_eq!(vfs.entries().len(), 2);
    }

    #[test]
    fn single_level_creation_needs_a_parent() {
        let mut vfs = VirtualFS::new("/out");

        assert!(vfs.create_dir(Path::new("/out/missing/child")).is_err());
        assert!(vfs.create_file(Path::new("/out/missing/file")).is_err());
        assert!(vfs.create_file(Path::new("/elsewhere/file")).is_err());
    }

    #[test]
    fn files_and_directories_do_not_overlap() {
        let mut vfs = VirtualFS::new("/out");
        vfs.create_file(Path::new("/out/x")).unwrap();
        vfs.create_dir(Path::new("/out/y")).unwrap();

        assert!(vfs.create_dir(Path::new("/out/x")).is_err());
        assert!(vfs.create_dir_all(Path::new("/out/x/z")).is_err());
        assert!(vfs.create_file(Path::new("/out/y")).is_err());
    }
}
