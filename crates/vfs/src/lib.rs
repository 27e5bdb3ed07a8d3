// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! A small in-process virtual filesystem switch.
//!
//! The host layer that synthetic filesystems plug into: a per-mount
//! arena of nodes and directory entries addressed by stable identities,
//! an inode number generator, a clock, caller-buffer copy primitives,
//! generic directory and superblock operations, and a registry that
//! mounts filesystem types by name.

pub mod clock;
pub mod dir;
pub mod error;
pub mod file;
pub mod fs;
pub mod node;
pub mod registry;
pub mod simple;
pub mod uaccess;

pub use clock::{Clock, FixedClock, SystemClock};
pub use dir::{DentryID, DirEntry, DirectoryOperations};
pub use error::{Error, Result};
pub use file::{FileContext, FileOperations, OpenFile};
pub use fs::{Limits, NAME_MAX, StatFs, SuperOperations, Superblock};
pub use node::{FileMode, Node, NodeAttr, NodeID, NodeKind, NodeOps, PrivateData};
pub use registry::{FileSystemType, Mount, Registry};
pub use simple::{
    SimpleDirOperations, SimpleSuperOperations, simple_dir_operations, simple_super_operations,
};
pub use uaccess::{UserSlice, UserSliceMut};

#[cfg(test)]
mod tests;
