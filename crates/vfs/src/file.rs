// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::any::Any;
use std::io::SeekFrom;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::node::{Node, PrivateData};
use crate::uaccess::{UserSlice, UserSliceMut};

/// File behavior attached to a regular-file node.
///
/// `read` and `write` receive the caller's offset by reference; an
/// implementation advances it only on success.
pub trait FileOperations: Send + Sync {
    fn open(&self, _node: &Node, _file: &mut FileContext) -> Result<()> {
        Ok(())
    }

    fn read(&self, file: &FileContext, buf: &mut UserSliceMut<'_>, offset: &mut u64)
    -> Result<usize>;

    fn write(&self, file: &FileContext, buf: &UserSlice<'_>, offset: &mut u64) -> Result<usize>;

    fn release(&self, _node: &Node, _file: &mut FileContext) -> Result<()> {
        Ok(())
    }
}

/// Per-open state visible to file operations.
#[derive(Default)]
pub struct FileContext {
    private: Option<PrivateData>,
}

impl FileContext {
    pub fn set_private_data(&mut self, private: Option<PrivateData>) {
        self.private = private;
    }

    pub fn private_data(&self) -> Option<&PrivateData> {
        self.private.as_ref()
    }

    /// The private data, if present and of type `T`.
    pub fn private_as<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.private.as_deref().and_then(|p| p.downcast_ref::<T>())
    }
}

/// An open handle: Closed -> Open on `Superblock::open`, back to Closed
/// on [`OpenFile::close`].
pub struct OpenFile {
    node: Arc<Node>,
    ops: Arc<dyn FileOperations>,
    ctx: FileContext,
    pos: u64,
}

impl OpenFile {
    pub(crate) fn open(node: Arc<Node>) -> Result<Self> {
        let ops = node
            .file_ops()
            .cloned()
            .ok_or_else(|| Error::is_a_directory(format!("inode {}", node.id())))?;
        let mut ctx = FileContext::default();
        ops.open(&node, &mut ctx)?;
        diagnostics::log_debug!("Opened inode {ino}", ino: node.id().as_u64());
        Ok(Self {
            node,
            ops,
            ctx,
            pos: 0,
        })
    }

    pub fn node(&self) -> &Arc<Node> {
        &self.node
    }

    pub fn context(&self) -> &FileContext {
        &self.ctx
    }

    pub fn position(&self) -> u64 {
        self.pos
    }

    /// Read at the handle position, advancing it by the bytes read.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut pos = self.pos;
        let n = self
            .ops
            .read(&self.ctx, &mut UserSliceMut::new(buf), &mut pos)?;
        self.pos = pos;
        Ok(n)
    }

    /// Write at the handle position.
    pub fn write(&mut self, buf: &[u8]) -> Result<usize> {
        let mut pos = self.pos;
        let n = self.ops.write(&self.ctx, &UserSlice::new(buf), &mut pos)?;
        self.pos = pos;
        Ok(n)
    }

    /// Read with a caller-owned offset; the handle position is untouched.
    pub fn read_at(&self, buf: &mut UserSliceMut<'_>, offset: &mut u64) -> Result<usize> {
        self.ops.read(&self.ctx, buf, offset)
    }

    /// Write with a caller-owned offset; the handle position is untouched.
    pub fn write_at(&self, buf: &UserSlice<'_>, offset: &mut u64) -> Result<usize> {
        self.ops.write(&self.ctx, buf, offset)
    }

    /// Read from the handle position to end of file.
    pub fn read_to_end(&mut self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        let mut chunk = [0u8; 64];
        loop {
            let n = self.read(&mut chunk)?;
            if n == 0 {
                return Ok(out);
            }
            out.extend_from_slice(&chunk[..n]);
        }
    }

    /// Reposition the handle. Only start- and current-relative seeks are
    /// supported since synthetic files have no fixed size.
    pub fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        let new = match pos {
            SeekFrom::Start(n) => Some(n),
            SeekFrom::Current(delta) => self.pos.checked_add_signed(delta),
            SeekFrom::End(_) => None,
        };
        self.pos = new.ok_or_else(|| Error::invalid_argument(format!("seek {:?}", pos)))?;
        Ok(self.pos)
    }

    pub fn close(mut self) -> Result<()> {
        diagnostics::log_debug!("Released inode {ino}", ino: self.node.id().as_u64());
        self.ops.release(&self.node, &mut self.ctx)
    }
}

impl std::fmt::Debug for OpenFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenFile")
            .field("ino", &self.node.id())
            .field("pos", &self.pos)
            .finish()
    }
}
