use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Cannot open \"{}\": {}", .path.display(), describe_io(.source))]
    Read { path: PathBuf, source: io::Error },

    #[error("Cannot save \"{}\": {}", .path.display(), describe_io(.source))]
    Write { path: PathBuf, source: io::Error },

    #[error("Cannot open \"{}\": not a plain text file", .0.display())]
    NotText(PathBuf),

    #[error("Invalid file name \"{0}\": it cannot contain / \\ : * ? \" < > |")]
    InvalidFileName(String),

    #[error("Instance error: {0}")]
    Instance(String),

    #[error("{0} is not supported on this platform")]
    Unsupported(&'static str),
}

/// Convenience type alias for Results with AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Short, user-facing reason for an IO failure.
fn describe_io(err: &io::Error) -> String {
    match err.kind() {
        io::ErrorKind::NotFound => "file not found".to_string(),
        io::ErrorKind::PermissionDenied => "permission denied".to_string(),
        io::ErrorKind::IsADirectory => "is a directory".to_string(),
        _ => err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
        assert!(app_err.to_string().contains("file not found"));
    }

    #[test]
    fn test_read_error_names_path_and_reason() {
        let err = AppError::Read {
            path: PathBuf::from("notes.txt"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "os error 5"),
        };
        assert_eq!(err.to_string(), "Cannot open \"notes.txt\": permission denied");

        let err = AppError::Read {
            path: PathBuf::from("gone.txt"),
            source: io::Error::new(io::ErrorKind::NotFound, "os error 2"),
        };
        assert_eq!(err.to_string(), "Cannot open \"gone.txt\": file not found");
    }

    #[test]
    fn test_error_display() {
        let err = AppError::NotText(PathBuf::from("image.png"));
        assert_eq!(err.to_string(), "Cannot open \"image.png\": not a plain text file");

        let err = AppError::InvalidFileName("a:b".to_string());
        assert!(err.to_string().starts_with("Invalid file name \"a:b\""));

        let err = AppError::Unsupported("Shell registration");
        assert_eq!(err.to_string(), "Shell registration is not supported on this platform");
    }
}
