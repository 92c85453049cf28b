use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors produced by the photokit operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The given path does not exist.
    #[error("path not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The file is not a JPEG, or its structure could not be parsed.
    #[error("{} is not a usable JPEG: {reason}", .path.display())]
    NotAJpeg { path: PathBuf, reason: String },

    /// The file has no capture-date (DateTimeOriginal) field.
    #[error("{} has no capture-date field", .0.display())]
    MissingCaptureDate(PathBuf),

    /// The supplied date/time value could not be parsed, or a time
    /// adjustment produced an unusable timestamp.
    #[error("invalid date/time: {0}")]
    InvalidDate(String),

    /// The path exists but is not readable or writable.
    #[error("permission denied: {}", .0.display())]
    Permission(PathBuf),

    /// A derived rename target already exists and no free name was found.
    #[error("rename target already exists: {}", .0.display())]
    RenameConflict(PathBuf),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// Classify an `io::Error` against the path it occurred on, so that
    /// missing paths and permission problems keep their identity instead
    /// of collapsing into a generic I/O failure.
    pub fn from_io(err: io::Error, path: &Path) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Error::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Error::Permission(path.to_path_buf()),
            _ => Error::Io(err),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_not_found_classified() {
        let err = io::Error::new(io::ErrorKind::NotFound, "gone");
        match Error::from_io(err, Path::new("/nope/photo.jpg")) {
            Error::NotFound(p) => assert_eq!(p, PathBuf::from("/nope/photo.jpg")),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn io_permission_classified() {
        let err = io::Error::new(io::ErrorKind::PermissionDenied, "no");
        match Error::from_io(err, Path::new("/locked")) {
            Error::Permission(p) => assert_eq!(p, PathBuf::from("/locked")),
            other => panic!("expected Permission, got {other:?}"),
        }
    }

    #[test]
    fn io_other_stays_io() {
        let err = io::Error::other("disk on fire");
        assert!(matches!(
            Error::from_io(err, Path::new("/x")),
            Error::Io(_)
        ));
    }

    #[test]
    fn display_includes_path() {
        let err = Error::MissingCaptureDate(PathBuf::from("a.jpg"));
        assert_eq!(err.to_string(), "a.jpg has no capture-date field");
    }
}
