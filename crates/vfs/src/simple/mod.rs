// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Generic operations a filesystem can borrow instead of writing its own.
//!
//! Directories whose contents live entirely in the entry arena need no
//! custom lookup or listing, and a filesystem with nothing to report
//! beyond its counts can use the generic `statfs`.

mod directory;
mod superblock;

pub use directory::SimpleDirOperations;
pub use superblock::SimpleSuperOperations;

use std::sync::Arc;

use crate::dir::DirectoryOperations;
use crate::fs::SuperOperations;

/// Shared generic directory operations table.
pub fn simple_dir_operations() -> Arc<dyn DirectoryOperations> {
    Arc::new(SimpleDirOperations)
}

/// Shared generic superblock operations table.
pub fn simple_super_operations() -> Arc<dyn SuperOperations> {
    Arc::new(SimpleSuperOperations)
}
