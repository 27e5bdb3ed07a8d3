// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! counterfs: a synthetic filesystem exposing one integer as a file.
//!
//! A mount holds a directory `foo` containing a file `bar`. Reading `bar`
//! yields the current value as decimal text and a newline; writing decimal
//! text at offset 0 replaces it. The value is only ever loaded and stored
//! atomically, so concurrent readers and writers never see a torn value.

pub mod counter;
pub mod factory;
pub mod file;
pub mod fs;
pub mod options;
pub mod text;
pub mod tree;

pub use counter::{Counter, CounterStore};
pub use factory::make_node;
pub use file::{CounterFileOps, counter_file_operations};
pub use fs::{
    BLOCK_SIZE, BLOCK_SIZE_BITS, COUNTERFS_MAGIC, COUNTERFS_NAME, CounterFs, counters,
    fill_super, mount, register, unregister,
};
pub use options::{DEFAULT_DIR, DEFAULT_FILE, MountOptions};
pub use text::{TMPSIZE, parse_decimal, render};
pub use tree::{
    DIR_PERMISSIONS, FILE_PERMISSIONS, create_counter_file, create_dir, populate_tree,
    try_populate_tree,
};

#[cfg(test)]
mod tests;
