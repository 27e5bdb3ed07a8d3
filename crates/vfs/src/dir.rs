// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::Result;
use crate::fs::Superblock;
use crate::node::{NodeID, NodeKind};

/// Stable identity of a directory entry in the superblock's entry arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct DentryID(u64);

impl DentryID {
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for DentryID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "d{}", self.0)
    }
}

/// A named binding from a parent directory to a node.
///
/// An entry is negative (`node == None`) between `d_alloc_name` and
/// `d_add`. Only the root has no parent.
#[derive(Debug, Clone)]
pub(crate) struct Dentry {
    pub(crate) name: String,
    pub(crate) parent: Option<DentryID>,
    pub(crate) node: Option<NodeID>,
    pub(crate) children: BTreeMap<String, DentryID>,
}

impl Dentry {
    pub(crate) fn new(name: String, parent: Option<DentryID>) -> Self {
        Self {
            name,
            parent,
            node: None,
            children: BTreeMap::new(),
        }
    }
}

/// One row of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirEntry {
    pub name: String,
    pub ino: NodeID,
    pub kind: NodeKind,
}

/// Directory behavior attached to a directory node.
///
/// Listing and lookup are generic; see [`crate::simple::SimpleDirOperations`].
pub trait DirectoryOperations: Send + Sync {
    /// Resolve `name` inside `dir`. `Ok(None)` when no positive entry exists.
    fn lookup(&self, sb: &Superblock, dir: DentryID, name: &str) -> Result<Option<DentryID>>;

    /// List `dir`, including `.` and `..`.
    fn readdir(&self, sb: &Superblock, dir: DentryID) -> Result<Vec<DirEntry>>;
}
