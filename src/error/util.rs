//! Utility functions for error handling
//!
//! This module provides utility functions to make error handling more convenient.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{PipelineError, Result};

/// Safely open a file with rich error information
///
/// # Arguments
/// * `path` - The path to the file to open
/// * `purpose` - Why the file is being opened (for error context)
pub fn safe_open_file(path: &Path, purpose: &str) -> Result<fs::File> {
    if !path.exists() {
        return Err(PipelineError::io(
            path,
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found, needed for {purpose}"),
            ),
        ));
    }

    if !path.is_file() {
        return Err(PipelineError::io(
            path,
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("path is not a file, expected one for {purpose}"),
            ),
        ));
    }

    fs::File::open(path).map_err(|e| {
        let kind = e.kind();
        let context = match kind {
            io::ErrorKind::PermissionDenied => "permission denied - check file permissions".to_string(),
            _ => format!("failed to open file for {purpose}: {e}"),
        };
        PipelineError::io(path, io::Error::new(kind, context))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_reported_with_path() {
        let err = safe_open_file(Path::new("does/not/exist.csv"), "reading records").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("does/not/exist.csv"));
        assert!(msg.contains("reading records"));
    }

    #[test]
    fn directory_is_not_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = safe_open_file(dir.path(), "reading records").unwrap_err();
        assert!(matches!(err, PipelineError::Io { .. }));
    }
}
