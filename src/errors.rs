use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum FileOperation {
    #[error("reading a file")]
    Read,
    #[error("creating a file")]
    Create,
    #[error("creating a directory")]
    Mkdir,
}
#[derive(Debug, Error, Diagnostic)]
#[error("I/O error: {operation} on path '{path}'")]
#[diagnostic(
    code(etxdir::io),
    help("Check file permissions, disk space, or that the path is correct.")
)]
pub struct IoError {
    pub operation: FileOperation,
    pub path: std::path::PathBuf,
    #[source]
    pub source: std::io::Error,
}
impl IoError {
    pub fn new(operation: FileOperation, path: std::path::PathBuf, error: std::io::Error) -> Self {
        Self {
            operation,
            path,
            source: error,
        }
    }
    pub fn read(path: impl Into<std::path::PathBuf>, error: std::io::Error) -> Self {
        Self::new(FileOperation::Read, path.into(), error)
    }
    pub fn create(path: impl Into<std::path::PathBuf>, error: std::io::Error) -> Self {
        Self::new(FileOperation::Create, path.into(), error)
    }
    pub fn mkdir(path: impl Into<std::path::PathBuf>, error: std::io::Error) -> Self {
        Self::new(FileOperation::Mkdir, path.into(), error)
    }
}
