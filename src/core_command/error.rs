// Error types for navigation and downloads
use crate::constants::{DIRECTORY_DOES_NOT_EXIST, FILE_NOT_FOUND, PERMISSION_DENIED};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationError {
    #[error("directory does not exist")]
    DirectoryDoesNotExist,

    #[error("permission denied")]
    PermissionDenied,
}

impl NavigationError {
    pub fn to_response(&self) -> &'static str {
        match self {
            NavigationError::DirectoryDoesNotExist => DIRECTORY_DOES_NOT_EXIST,
            NavigationError::PermissionDenied => PERMISSION_DENIED,
        }
    }
}

#[derive(Error, Debug)]
pub enum TransferError {
    #[error("Not a readable file: {0}")]
    NotAFile(PathBuf),

    #[error("Outside of the allowed area: {0}")]
    OutsideRoot(PathBuf),

    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read {path}: {source}")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl TransferError {
    /// The token sent to the client, if any. Read failures happen after the
    /// size has been announced so nothing more can be said.
    pub fn to_response(&self) -> Option<&'static str> {
        match self {
            TransferError::NotAFile(_)
            | TransferError::OutsideRoot(_)
            | TransferError::Open { .. } => Some(FILE_NOT_FOUND),
            TransferError::SourceRead { .. } => None,
        }
    }
}
