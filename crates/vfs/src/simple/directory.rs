// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::dir::{DentryID, DirEntry, DirectoryOperations};
use crate::error::{Error, Result};
use crate::fs::Superblock;
use crate::node::NodeKind;

/// Lookup and listing served straight from the entry arena.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimpleDirOperations;

impl DirectoryOperations for SimpleDirOperations {
    fn lookup(&self, sb: &Superblock, dir: DentryID, name: &str) -> Result<Option<DentryID>> {
        sb.d_lookup(dir, name)
    }

    fn readdir(&self, sb: &Superblock, dir: DentryID) -> Result<Vec<DirEntry>> {
        let this = sb
            .dentry_node(dir)?
            .ok_or_else(|| Error::stale(format!("directory entry {} is negative", dir)))?;
        let parent = match sb.dentry_parent(dir)? {
            Some(parent) => sb.dentry_node(parent)?.unwrap_or_else(|| this.clone()),
            None => this.clone(),
        };

        let mut entries = vec![
            DirEntry {
                name: ".".to_string(),
                ino: this.id(),
                kind: NodeKind::Directory,
            },
            DirEntry {
                name: "..".to_string(),
                ino: parent.id(),
                kind: NodeKind::Directory,
            },
        ];
        for (name, _, ino) in sb.d_children(dir)? {
            let kind = sb
                .node(ino)?
                .kind()
                .ok_or_else(|| Error::stale(format!("inode {} has no type", ino)))?;
            entries.push(DirEntry { name, ino, kind });
        }
        Ok(entries)
    }
}
