// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::any::Any;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::dir::DirectoryOperations;
use crate::error::{Error, Result};
use crate::file::FileOperations;

/// File-type bits of a mode.
pub const S_IFMT: u32 = 0o170_000;
pub const S_IFDIR: u32 = 0o040_000;
pub const S_IFREG: u32 = 0o100_000;

/// Permission bits of a mode.
pub const S_IPERM: u32 = 0o7777;

/// Opaque per-node (or per-open-file) data owned by a filesystem.
pub type PrivateData = Arc<dyn Any + Send + Sync>;

/// Unique identifier for a node in the filesystem (its inode number)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NodeID(u64);

impl std::fmt::Display for NodeID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl NodeID {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Format as hex, 4, 8, 12 or 16 digits depending on magnitude.
    pub fn to_hex_string(&self) -> String {
        let id_value = self.0;
        if id_value <= 0xFFFF {
            format!("{:04X}", id_value)
        } else if id_value <= 0xFFFF_FFFF {
            format!("{:08X}", id_value)
        } else if id_value <= 0xFFFF_FFFF_FFFF {
            format!("{:012X}", id_value)
        } else {
            format!("{:016X}", id_value)
        }
    }
}

/// Type of node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Directory,
    RegularFile,
}

impl NodeKind {
    pub fn mode_bits(self) -> u32 {
        match self {
            NodeKind::Directory => S_IFDIR,
            NodeKind::RegularFile => S_IFREG,
        }
    }

    pub fn from_mode(mode: u32) -> Option<Self> {
        match mode & S_IFMT {
            S_IFDIR => Some(NodeKind::Directory),
            S_IFREG => Some(NodeKind::RegularFile),
            _ => None,
        }
    }
}

/// Kind bits combined with permission bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FileMode(u32);

impl FileMode {
    pub fn new(kind: NodeKind, permissions: u32) -> Self {
        Self(kind.mode_bits() | (permissions & S_IPERM))
    }

    pub fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub fn bits(&self) -> u32 {
        self.0
    }

    pub fn kind(&self) -> Option<NodeKind> {
        NodeKind::from_mode(self.0)
    }

    pub fn permissions(&self) -> u32 {
        self.0 & S_IPERM
    }
}

impl std::fmt::Display for FileMode {
    /// `ls -l` style, e.g. `drwxr-xr-x`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.kind() {
            Some(NodeKind::Directory) => 'd',
            Some(NodeKind::RegularFile) => '-',
            None => '?',
        };
        let mut s = String::with_capacity(10);
        s.push(kind);
        for shift in [6, 3, 0] {
            let bits = (self.0 >> shift) & 0o7;
            s.push(if bits & 0o4 != 0 { 'r' } else { '-' });
            s.push(if bits & 0o2 != 0 { 'w' } else { '-' });
            s.push(if bits & 0o1 != 0 { 'x' } else { '-' });
        }
        f.write_str(&s)
    }
}

/// Operation table attached to a node, matching its kind.
#[derive(Clone)]
pub enum NodeOps {
    Directory(Arc<dyn DirectoryOperations>),
    File(Arc<dyn FileOperations>),
}

impl NodeOps {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeOps::Directory(_) => NodeKind::Directory,
            NodeOps::File(_) => NodeKind::RegularFile,
        }
    }
}

impl std::fmt::Debug for NodeOps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeOps::Directory(_) => write!(f, "(directory ops)"),
            NodeOps::File(_) => write!(f, "(file ops)"),
        }
    }
}

/// A file or directory's metadata and behavior table.
///
/// A `Node` returned by [`crate::Superblock::new_node`] is owned by the
/// caller and freely mutable until it is published with `d_add` or
/// `d_make_root`. From then on the superblock owns it and hands out
/// shared, read-only references.
pub struct Node {
    id: NodeID,
    mode: FileMode,
    nlink: u32,
    atime: DateTime<Utc>,
    mtime: DateTime<Utc>,
    ctime: DateTime<Utc>,
    ops: Option<NodeOps>,
    private: Option<PrivateData>,
}

impl Node {
    pub(crate) fn empty() -> Self {
        Self {
            id: NodeID(0),
            mode: FileMode(0),
            nlink: 1,
            atime: DateTime::<Utc>::UNIX_EPOCH,
            mtime: DateTime::<Utc>::UNIX_EPOCH,
            ctime: DateTime::<Utc>::UNIX_EPOCH,
            ops: None,
            private: None,
        }
    }

    pub fn id(&self) -> NodeID {
        self.id
    }

    pub fn mode(&self) -> FileMode {
        self.mode
    }

    pub fn kind(&self) -> Option<NodeKind> {
        self.mode.kind()
    }

    pub fn nlink(&self) -> u32 {
        self.nlink
    }

    pub fn atime(&self) -> DateTime<Utc> {
        self.atime
    }

    pub fn mtime(&self) -> DateTime<Utc> {
        self.mtime
    }

    pub fn ctime(&self) -> DateTime<Utc> {
        self.ctime
    }

    pub fn ops(&self) -> Option<&NodeOps> {
        self.ops.as_ref()
    }

    pub fn private_data(&self) -> Option<&PrivateData> {
        self.private.as_ref()
    }

    pub fn set_id(&mut self, id: NodeID) {
        self.id = id;
    }

    pub fn set_mode(&mut self, mode: FileMode) {
        self.mode = mode;
    }

    pub fn set_nlink(&mut self, nlink: u32) {
        self.nlink = nlink;
    }

    /// Stamp access, modify and change times at once.
    pub fn set_times(&mut self, now: DateTime<Utc>) {
        self.atime = now;
        self.mtime = now;
        self.ctime = now;
    }

    pub fn set_ops(&mut self, ops: NodeOps) {
        self.ops = Some(ops);
    }

    pub fn set_private_data(&mut self, private: PrivateData) {
        self.private = Some(private);
    }

    pub fn directory_ops(&self) -> Option<&Arc<dyn DirectoryOperations>> {
        match &self.ops {
            Some(NodeOps::Directory(ops)) => Some(ops),
            _ => None,
        }
    }

    pub fn file_ops(&self) -> Option<&Arc<dyn FileOperations>> {
        match &self.ops {
            Some(NodeOps::File(ops)) => Some(ops),
            _ => None,
        }
    }

    pub fn attr(&self) -> NodeAttr {
        NodeAttr {
            ino: self.id,
            kind: self.kind(),
            mode: self.mode.bits(),
            permissions: self.mode.to_string(),
            nlink: self.nlink,
            atime: self.atime,
            mtime: self.mtime,
            ctime: self.ctime,
        }
    }

    /// Checks the node is complete enough to publish.
    pub(crate) fn validate(&self) -> Result<()> {
        let kind = self
            .kind()
            .ok_or_else(|| Error::invalid_argument(format!("node {} has no file type", self.id)))?;
        match &self.ops {
            Some(ops) if ops.kind() == kind => Ok(()),
            Some(_) => Err(Error::invalid_argument(format!(
                "node {} operations do not match its type",
                self.id
            ))),
            None => Err(Error::invalid_argument(format!(
                "node {} has no operations",
                self.id
            ))),
        }
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("mode", &format_args!("{:o}", self.mode.bits()))
            .field("nlink", &self.nlink)
            .field("ops", &self.ops)
            .field("private", &self.private.is_some())
            .finish()
    }
}

/// Attributes reported by `stat`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeAttr {
    pub ino: NodeID,
    pub kind: Option<NodeKind>,
    pub mode: u32,
    pub permissions: String,
    pub nlink: u32,
    pub atime: DateTime<Utc>,
    pub mtime: DateTime<Utc>,
    pub ctime: DateTime<Utc>,
}
