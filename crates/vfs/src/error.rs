// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::{Path, PathBuf};

pub type Result<T> = std::result::Result<T, Error>;

pub const ENOENT: i32 = 2;
pub const EIO: i32 = 5;
pub const ENOMEM: i32 = 12;
pub const EFAULT: i32 = 14;
pub const EBUSY: i32 = 16;
pub const EEXIST: i32 = 17;
pub const ENODEV: i32 = 19;
pub const ENOTDIR: i32 = 20;
pub const EISDIR: i32 = 21;
pub const EINVAL: i32 = 22;
pub const ESTALE: i32 = 116;

/// Represents errors that can occur in filesystem operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The host could not allocate a node or directory entry.
    #[error("Out of memory: cannot allocate {0}")]
    OutOfMemory(&'static str),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A copy to or from a caller buffer failed.
    #[error("Bad address")]
    Fault,

    #[error("Path not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Is a directory: {}", .0.display())]
    IsADirectory(PathBuf),

    #[error("Entry already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Path prefix not supported: {}", .0.display())]
    PrefixNotSupported(PathBuf),

    #[error("Path is empty")]
    EmptyPath,

    #[error("Resource busy: {0}")]
    Busy(String),

    #[error("Unknown filesystem type: {0}")]
    UnknownFilesystem(String),

    /// A node or entry identity no longer names anything in the arena.
    #[error("Stale handle: {0}")]
    Stale(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl Error {
    pub fn out_of_memory(what: &'static str) -> Self {
        Error::OutOfMemory(what)
    }

    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Error::InvalidArgument(msg.into())
    }

    pub fn not_found<P: AsRef<Path>>(path: P) -> Self {
        Error::NotFound(path.as_ref().to_path_buf())
    }

    pub fn not_a_directory<P: AsRef<Path>>(path: P) -> Self {
        Error::NotADirectory(path.as_ref().to_path_buf())
    }

    pub fn is_a_directory<P: AsRef<Path>>(path: P) -> Self {
        Error::IsADirectory(path.as_ref().to_path_buf())
    }

    pub fn already_exists<P: AsRef<Path>>(path: P) -> Self {
        Error::AlreadyExists(path.as_ref().to_path_buf())
    }

    pub fn prefix_not_supported<P: AsRef<Path>>(path: P) -> Self {
        Error::PrefixNotSupported(path.as_ref().to_path_buf())
    }

    pub fn empty_path() -> Self {
        Error::EmptyPath
    }

    pub fn busy<S: Into<String>>(what: S) -> Self {
        Error::Busy(what.into())
    }

    pub fn unknown_filesystem<S: Into<String>>(name: S) -> Self {
        Error::UnknownFilesystem(name.into())
    }

    pub fn stale<S: Into<String>>(what: S) -> Self {
        Error::Stale(what.into())
    }

    pub fn io<S: Into<String>>(msg: S) -> Self {
        Error::Io(msg.into())
    }

    /// The positive errno value a kernel would return for this error.
    pub fn errno(&self) -> i32 {
        match self {
            Error::OutOfMemory(_) => ENOMEM,
            Error::InvalidArgument(_) | Error::PrefixNotSupported(_) | Error::EmptyPath => EINVAL,
            Error::Fault => EFAULT,
            Error::NotFound(_) => ENOENT,
            Error::NotADirectory(_) => ENOTDIR,
            Error::IsADirectory(_) => EISDIR,
            Error::AlreadyExists(_) => EEXIST,
            Error::Busy(_) => EBUSY,
            Error::UnknownFilesystem(_) => ENODEV,
            Error::Stale(_) => ESTALE,
            Error::Io(_) => EIO,
        }
    }
}
