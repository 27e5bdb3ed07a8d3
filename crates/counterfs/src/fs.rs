// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use vfs::{
    FileSystemType, Mount, NodeKind, NodeOps, Registry, Result, Superblock,
    simple_dir_operations, simple_super_operations,
};

use crate::counter::CounterStore;
use crate::factory::make_node;
use crate::options::MountOptions;
use crate::tree::{DIR_PERMISSIONS, populate_tree, try_populate_tree};

pub const COUNTERFS_NAME: &str = "counterfs";
pub const COUNTERFS_MAGIC: u64 = 0x1992_0342;
pub const BLOCK_SIZE: u32 = 4096;
pub const BLOCK_SIZE_BITS: u8 = 12;

/// The counter filesystem type.
#[derive(Debug, Default, Clone, Copy)]
pub struct CounterFs;

impl FileSystemType for CounterFs {
    fn name(&self) -> &str {
        COUNTERFS_NAME
    }

    fn fill_super(&self, sb: &mut Superblock, data: &str) -> Result<()> {
        let opts = MountOptions::parse(data)?;
        fill_super(sb, &opts)
    }
}

/// Set the superblock parameters, make the root directory and build the
/// tree beneath it.
///
/// Only a failure to make the root fails the fill, unless `opts.strict`
/// asks for the tree to be required too.
pub fn fill_super(sb: &mut Superblock, opts: &MountOptions) -> Result<()> {
    sb.set_limits(opts.limits());
    sb.set_blocksize(BLOCK_SIZE, BLOCK_SIZE_BITS);
    sb.set_magic(COUNTERFS_MAGIC);
    sb.set_ops(simple_super_operations());
    let store = Arc::new(CounterStore::new(opts.initial));
    sb.set_fs_info(store.clone());

    let mut node = make_node(
        sb,
        NodeKind::Directory,
        DIR_PERMISSIONS,
        NodeOps::Directory(simple_dir_operations()),
    )?;
    node.set_nlink(2);
    let root = sb.d_make_root(node)?;

    if opts.strict {
        _ = try_populate_tree(sb, root, opts, &store)?;
    } else {
        populate_tree(sb, root, opts, &store);
    }

    sb.set_root(root);
    Ok(())
}

/// The mount's counter storage.
pub fn counters(sb: &Superblock) -> Option<&CounterStore> {
    sb.fs_info_as::<CounterStore>()
}

pub fn register(registry: &Registry) -> Result<()> {
    registry.register_filesystem(Arc::new(CounterFs))
}

pub fn unregister(registry: &Registry) -> Result<()> {
    registry.unregister_filesystem(COUNTERFS_NAME)
}

/// Mount a counterfs instance with `opts`.
pub fn mount(registry: &Registry, opts: &MountOptions) -> Result<Mount> {
    opts.validate()?;
    registry.mount(COUNTERFS_NAME, &opts.to_string())
}
