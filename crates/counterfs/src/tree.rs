// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Builds the fixed tree under a freshly made root.
//!
//! Every creation step that fails gives back what it took: the node goes
//! back through `iput` (done by the host when `d_add` refuses it) and the
//! negative entry through `dput`. Nothing half-built stays visible.

use std::sync::Arc;

use vfs::{DentryID, NodeKind, NodeOps, Result, Superblock, simple_dir_operations};

use crate::counter::{Counter, CounterStore};
use crate::factory::make_node;
use crate::file::counter_file_operations;
use crate::options::MountOptions;

pub const DIR_PERMISSIONS: u32 = 0o755;
pub const FILE_PERMISSIONS: u32 = 0o600;

fn release(sb: &Superblock, dentry: DentryID) {
    if let Err(err) = sb.dput(dentry) {
        let reason = err.to_string();
        diagnostics::log_warn!("Could not release entry {dentry}: {reason}", dentry: dentry.as_u64(), reason: reason.as_str());
    }
}

/// Create directory `name` under `parent`.
pub fn create_dir(sb: &Superblock, parent: DentryID, name: &str) -> Result<DentryID> {
    let dentry = sb.d_alloc_name(parent, name)?;
    let mut node = match make_node(
        sb,
        NodeKind::Directory,
        DIR_PERMISSIONS,
        NodeOps::Directory(simple_dir_operations()),
    ) {
        Ok(node) => node,
        Err(err) => {
            release(sb, dentry);
            return Err(err);
        }
    };
    node.set_nlink(2);

    if let Err(err) = sb.d_add(dentry, node) {
        release(sb, dentry);
        return Err(err);
    }
    diagnostics::log_debug!("Created directory {name}", name: name);
    Ok(dentry)
}

/// Create counter file `name` under `parent`, serving `counter`.
pub fn create_counter_file(
    sb: &Superblock,
    parent: DentryID,
    name: &str,
    counter: Arc<Counter>,
) -> Result<DentryID> {
    let dentry = sb.d_alloc_name(parent, name)?;
    let mut node = match make_node(
        sb,
        NodeKind::RegularFile,
        FILE_PERMISSIONS,
        NodeOps::File(counter_file_operations()),
    ) {
        Ok(node) => node,
        Err(err) => {
            release(sb, dentry);
            return Err(err);
        }
    };
    node.set_private_data(counter);

    if let Err(err) = sb.d_add(dentry, node) {
        release(sb, dentry);
        return Err(err);
    }
    diagnostics::log_debug!("Created counter file {name}", name: name);
    Ok(dentry)
}

/// Build `<dir>/<file>` under `root`, returning the file's entry.
///
/// If the file cannot be made the directory stays, empty.
pub fn try_populate_tree(
    sb: &Superblock,
    root: DentryID,
    opts: &MountOptions,
    store: &CounterStore,
) -> Result<DentryID> {
    let dir = create_dir(sb, root, &opts.dir_name)?;
    create_counter_file(sb, dir, &opts.file_name, store.bar().clone())
}

/// Build the tree, treating any failure as "nothing more to add".
///
/// The caller cannot tell whether the tree exists; the mount proceeds
/// either way.
pub fn populate_tree(sb: &Superblock, root: DentryID, opts: &MountOptions, store: &CounterStore) {
    if let Err(err) = try_populate_tree(sb, root, opts, store) {
        let reason = err.to_string();
        diagnostics::log_warn!("Tree left incomplete: {reason}", reason: reason.as_str());
    }
}
