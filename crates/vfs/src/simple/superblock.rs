// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::error::Result;
use crate::fs::{NAME_MAX, StatFs, SuperOperations, Superblock};

/// `statfs` from the superblock's own counts; nodes need no cleanup.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimpleSuperOperations;

impl SuperOperations for SimpleSuperOperations {
    fn statfs(&self, sb: &Superblock) -> Result<StatFs> {
        Ok(StatFs {
            fs_type: sb.fs_type().to_string(),
            magic: sb.magic(),
            block_size: sb.blocksize(),
            name_max: NAME_MAX,
            files: sb.node_count()?,
            entries: sb.dentry_count()?,
        })
    }
}
