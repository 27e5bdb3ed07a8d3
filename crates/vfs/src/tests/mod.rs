// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

mod arena;

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use crate::clock::FixedClock;
use crate::dir::DentryID;
use crate::error::{Error, Result};
use crate::file::{FileContext, FileOperations};
use crate::fs::Superblock;
use crate::node::{FileMode, Node, NodeKind, NodeOps};
use crate::registry::FileSystemType;
use crate::simple::{simple_dir_operations, simple_super_operations};
use crate::uaccess::{UserSlice, UserSliceMut};

pub(crate) fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap()
}

pub(crate) fn test_superblock() -> Superblock {
    let mut sb = Superblock::new("testfs", Arc::new(FixedClock::new(epoch())));
    sb.set_magic(0x7e57);
    sb.set_blocksize(4096, 12);
    sb.set_ops(simple_super_operations());
    sb
}

/// A read-only file with fixed content.
pub(crate) struct StaticFile(pub &'static [u8]);

impl FileOperations for StaticFile {
    fn read(
        &self,
        _file: &FileContext,
        buf: &mut UserSliceMut<'_>,
        offset: &mut u64,
    ) -> Result<usize> {
        let len = self.0.len() as u64;
        if *offset >= len {
            return Ok(0);
        }
        let start = *offset as usize;
        let count = buf.len().min(self.0.len() - start);
        buf.copy_to_user(&self.0[start..start + count])?;
        *offset += count as u64;
        Ok(count)
    }

    fn write(&self, _file: &FileContext, _buf: &UserSlice<'_>, _offset: &mut u64) -> Result<usize> {
        Err(Error::invalid_argument("read-only"))
    }
}

pub(crate) fn make(sb: &Superblock, kind: NodeKind, perm: u32, ops: NodeOps) -> Node {
    let mut node = sb.new_node().unwrap();
    node.set_id(sb.next_ino());
    node.set_mode(FileMode::new(kind, perm));
    node.set_times(sb.now());
    node.set_ops(ops);
    node
}

pub(crate) fn make_root(sb: &mut Superblock) -> DentryID {
    let mut node = make(
        sb,
        NodeKind::Directory,
        0o755,
        NodeOps::Directory(simple_dir_operations()),
    );
    node.set_nlink(2);
    let root = sb.d_make_root(node).unwrap();
    sb.set_root(root);
    root
}

pub(crate) fn add_dir(sb: &Superblock, parent: DentryID, name: &str) -> DentryID {
    let d = sb.d_alloc_name(parent, name).unwrap();
    let node = make(
        sb,
        NodeKind::Directory,
        0o755,
        NodeOps::Directory(simple_dir_operations()),
    );
    _ = sb.d_add(d, node).unwrap();
    d
}

pub(crate) fn add_file(sb: &Superblock, parent: DentryID, name: &str, content: &'static [u8]) -> DentryID {
    let d = sb.d_alloc_name(parent, name).unwrap();
    let node = make(
        sb,
        NodeKind::RegularFile,
        0o644,
        NodeOps::File(Arc::new(StaticFile(content))),
    );
    _ = sb.d_add(d, node).unwrap();
    d
}

/// Builds `/docs/readme`; `fail` makes the fill routine error after the
/// root is published.
pub(crate) struct DocsFs {
    pub fail: bool,
}

impl FileSystemType for DocsFs {
    fn name(&self) -> &str {
        "docsfs"
    }

    fn fill_super(&self, sb: &mut Superblock, data: &str) -> Result<()> {
        sb.set_magic(0xd0c5);
        sb.set_blocksize(4096, 12);
        sb.set_ops(simple_super_operations());
        let root = make_root(sb);
        let docs = add_dir(sb, root, "docs");
        _ = add_file(sb, docs, "readme", b"hello\n");
        if self.fail || data == "fail" {
            return Err(Error::out_of_memory("node"));
        }
        Ok(())
    }
}
