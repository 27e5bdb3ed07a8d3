// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::any::Any;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::clock::Clock;
use crate::dir::{Dentry, DentryID, DirEntry};
use crate::error::{Error, Result};
use crate::file::OpenFile;
use crate::node::{Node, NodeAttr, NodeID, NodeKind, PrivateData};

/// Longest name a directory entry may carry.
pub const NAME_MAX: usize = 255;

/// Allocation ceilings for one superblock. `None` means unbounded.
///
/// Reaching a ceiling makes the corresponding allocation fail with
/// [`Error::OutOfMemory`], the same way an exhausted kernel allocator does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Limits {
    pub max_nodes: Option<usize>,
    pub max_dentries: Option<usize>,
}

/// Filesystem statistics reported by `statfs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatFs {
    pub fs_type: String,
    pub magic: u64,
    pub block_size: u32,
    pub name_max: usize,
    pub files: usize,
    pub entries: usize,
}

/// Superblock-wide operations.
pub trait SuperOperations: Send + Sync {
    fn statfs(&self, sb: &Superblock) -> Result<StatFs>;

    /// Called for each node destroyed at teardown.
    fn drop_node(&self, _sb: &Superblock, _node: &Node) {}
}

#[derive(Default)]
struct Tables {
    nodes: BTreeMap<NodeID, Arc<Node>>,
    dentries: BTreeMap<DentryID, Dentry>,
    next_dentry: u64,
    /// Nodes handed out by `new_node` and not yet released, published or not.
    live_nodes: usize,
}

impl Tables {
    fn dentry(&self, id: DentryID) -> Result<&Dentry> {
        self.dentries
            .get(&id)
            .ok_or_else(|| Error::stale(format!("directory entry {}", id)))
    }

    fn dentry_mut(&mut self, id: DentryID) -> Result<&mut Dentry> {
        self.dentries
            .get_mut(&id)
            .ok_or_else(|| Error::stale(format!("directory entry {}", id)))
    }

    fn alloc_dentry(&mut self, limits: &Limits, dentry: Dentry) -> Result<DentryID> {
        if limits
            .max_dentries
            .is_some_and(|max| self.dentries.len() >= max)
        {
            return Err(Error::out_of_memory("directory entry"));
        }
        let id = DentryID::new(self.next_dentry);
        self.next_dentry += 1;
        _ = self.dentries.insert(id, dentry);
        Ok(id)
    }

    fn path_of(&self, id: DentryID) -> Result<PathBuf> {
        let mut names = Vec::new();
        let mut cur = self.dentry(id)?;
        while let Some(parent) = cur.parent {
            names.push(cur.name.clone());
            cur = self.dentry(parent)?;
        }
        let mut path = PathBuf::from("/");
        for name in names.iter().rev() {
            path.push(name);
        }
        Ok(path)
    }
}

/// One mounted filesystem instance: the host-owned arena of nodes and
/// directory entries plus the parameters a fill routine sets.
///
/// Filesystems never own nodes or entries; they hold [`NodeID`] and
/// [`DentryID`] values and go through the superblock for everything.
pub struct Superblock {
    fs_type: String,
    magic: u64,
    blocksize: u32,
    blocksize_bits: u8,
    ops: Option<Arc<dyn SuperOperations>>,
    root: Option<DentryID>,
    limits: Limits,
    clock: Arc<dyn Clock>,
    next_ino: AtomicU64,
    fs_info: Option<PrivateData>,
    tables: RwLock<Tables>,
}

impl Superblock {
    pub fn new(fs_type: &str, clock: Arc<dyn Clock>) -> Self {
        Self {
            fs_type: fs_type.to_string(),
            magic: 0,
            blocksize: 0,
            blocksize_bits: 0,
            ops: None,
            root: None,
            limits: Limits::default(),
            clock,
            next_ino: AtomicU64::new(1),
            fs_info: None,
            tables: RwLock::new(Tables::default()),
        }
    }

    fn read_tables(&self) -> Result<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| Error::io("superblock tables poisoned"))
    }

    fn write_tables(&self) -> Result<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| Error::io("superblock tables poisoned"))
    }

    /// Poison the table lock, as a panic inside a critical section would.
    #[cfg(test)]
    pub(crate) fn poison_tables(&self) {
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = self.tables.write();
            panic!("poisoning superblock tables");
        }));
    }

    // Parameters, set by a fill routine before the mount is published.

    pub fn set_blocksize(&mut self, size: u32, bits: u8) {
        self.blocksize = size;
        self.blocksize_bits = bits;
    }

    pub fn set_magic(&mut self, magic: u64) {
        self.magic = magic;
    }

    pub fn set_ops(&mut self, ops: Arc<dyn SuperOperations>) {
        self.ops = Some(ops);
    }

    pub fn set_limits(&mut self, limits: Limits) {
        self.limits = limits;
    }

    pub fn set_fs_info(&mut self, info: PrivateData) {
        self.fs_info = Some(info);
    }

    pub fn set_root(&mut self, root: DentryID) {
        self.root = Some(root);
    }

    pub fn fs_type(&self) -> &str {
        &self.fs_type
    }

    pub fn magic(&self) -> u64 {
        self.magic
    }

    pub fn blocksize(&self) -> u32 {
        self.blocksize
    }

    pub fn blocksize_bits(&self) -> u8 {
        self.blocksize_bits
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    pub fn fs_info(&self) -> Option<&PrivateData> {
        self.fs_info.as_ref()
    }

    pub fn fs_info_as<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.fs_info.as_deref().and_then(|p| p.downcast_ref::<T>())
    }

    pub fn root(&self) -> Result<DentryID> {
        self.root.ok_or_else(|| Error::stale("superblock has no root"))
    }

    // Host primitives.

    /// Next inode number. Never reused within this superblock.
    pub fn next_ino(&self) -> NodeID {
        NodeID::new(self.next_ino.fetch_add(1, Ordering::Relaxed))
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Allocate an unpublished node. The caller must hand it back through
    /// `d_add`, `d_make_root` or `iput`.
    pub fn new_node(&self) -> Result<Node> {
        let mut tables = self.write_tables()?;
        if self
            .limits
            .max_nodes
            .is_some_and(|max| tables.live_nodes >= max)
        {
            diagnostics::log_debug!("Node allocation refused at {live} live nodes", live: tables.live_nodes);
            return Err(Error::out_of_memory("node"));
        }
        tables.live_nodes += 1;
        Ok(Node::empty())
    }

    /// Release a node that was never published.
    pub fn iput(&self, node: Node) {
        match self.write_tables() {
            Ok(mut tables) => tables.live_nodes = tables.live_nodes.saturating_sub(1),
            Err(err) => {
                let reason = err.to_string();
                diagnostics::log_warn!("Could not release inode {ino}: {reason}", ino: node.id().as_u64(), reason: reason.as_str());
            }
        }
        diagnostics::log_debug!("Released unpublished inode {ino}", ino: node.id().as_u64());
    }

    /// Allocate a negative entry named `name` under `parent`.
    pub fn d_alloc_name(&self, parent: DentryID, name: &str) -> Result<DentryID> {
        validate_name(name)?;
        let mut tables = self.write_tables()?;
        let pdentry = tables.dentry(parent)?;
        if pdentry.children.contains_key(name) {
            return Err(Error::already_exists(tables.path_of(parent)?.join(name)));
        }
        let id = tables.alloc_dentry(&self.limits, Dentry::new(name.to_string(), Some(parent)))?;
        _ = tables
            .dentry_mut(parent)?
            .children
            .insert(name.to_string(), id);
        Ok(id)
    }

    /// Release a negative entry, unlinking it from its parent.
    pub fn dput(&self, dentry: DentryID) -> Result<()> {
        let mut tables = self.write_tables()?;
        let d = tables.dentry(dentry)?;
        if d.node.is_some() || !d.children.is_empty() {
            return Err(Error::busy(format!("directory entry {} is in use", dentry)));
        }
        let (name, parent) = (d.name.clone(), d.parent);
        _ = tables.dentries.remove(&dentry);
        if let Some(parent) = parent {
            _ = tables.dentry_mut(parent)?.children.remove(&name);
        }
        diagnostics::log_debug!("Released entry {name}", name: name.as_str());
        Ok(())
    }

    /// Bind `node` to the negative entry `dentry` and publish both.
    ///
    /// On failure the node is released; the entry is left for the caller
    /// to `dput`.
    pub fn d_add(&self, dentry: DentryID, node: Node) -> Result<Arc<Node>> {
        let mut tables = self.write_tables()?;
        let checked = node.validate().and_then(|()| {
            let d = tables.dentry(dentry)?;
            if d.node.is_some() {
                return Err(Error::busy(format!("directory entry {} is bound", dentry)));
            }
            if tables.nodes.contains_key(&node.id()) {
                return Err(Error::invalid_argument(format!(
                    "inode {} already published",
                    node.id()
                )));
            }
            Ok(())
        });
        if let Err(err) = checked {
            tables.live_nodes = tables.live_nodes.saturating_sub(1);
            return Err(err);
        }

        let id = node.id();
        let node = Arc::new(node);
        _ = tables.nodes.insert(id, node.clone());
        tables.dentry_mut(dentry)?.node = Some(id);
        Ok(node)
    }

    /// Publish `node` as a root directory entry. The node is released on
    /// failure.
    pub fn d_make_root(&self, node: Node) -> Result<DentryID> {
        let mut tables = self.write_tables()?;
        let checked = node.validate().and_then(|()| {
            if node.kind() != Some(NodeKind::Directory) {
                return Err(Error::not_a_directory("/"));
            }
            let id = tables.alloc_dentry(&self.limits, Dentry::new("/".to_string(), None))?;
            Ok(id)
        });
        let root = match checked {
            Ok(root) => root,
            Err(err) => {
                tables.live_nodes = tables.live_nodes.saturating_sub(1);
                return Err(err);
            }
        };

        let id = node.id();
        _ = tables.nodes.insert(id, Arc::new(node));
        tables.dentry_mut(root)?.node = Some(id);
        Ok(root)
    }

    // Arena access.

    pub fn node(&self, id: NodeID) -> Result<Arc<Node>> {
        self.read_tables()?
            .nodes
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::stale(format!("inode {}", id)))
    }

    /// The node bound to `dentry`, `None` while the entry is negative.
    pub fn dentry_node(&self, dentry: DentryID) -> Result<Option<Arc<Node>>> {
        let tables = self.read_tables()?;
        let d = tables.dentry(dentry)?;
        Ok(d.node.and_then(|id| tables.nodes.get(&id).cloned()))
    }

    pub fn dentry_name(&self, dentry: DentryID) -> Result<String> {
        Ok(self.read_tables()?.dentry(dentry)?.name.clone())
    }

    pub fn dentry_parent(&self, dentry: DentryID) -> Result<Option<DentryID>> {
        Ok(self.read_tables()?.dentry(dentry)?.parent)
    }

    pub fn dentry_path(&self, dentry: DentryID) -> Result<PathBuf> {
        self.read_tables()?.path_of(dentry)
    }

    /// Positive child named `name`, negative entries are invisible.
    pub fn d_lookup(&self, parent: DentryID, name: &str) -> Result<Option<DentryID>> {
        let tables = self.read_tables()?;
        let child = tables.dentry(parent)?.children.get(name).copied();
        Ok(child.filter(|c| {
            tables
                .dentries
                .get(c)
                .is_some_and(|d| d.node.is_some())
        }))
    }

    /// Positive children of `parent` in name order.
    pub fn d_children(&self, parent: DentryID) -> Result<Vec<(String, DentryID, NodeID)>> {
        let tables = self.read_tables()?;
        Ok(tables
            .dentry(parent)?
            .children
            .iter()
            .filter_map(|(name, id)| {
                let node = tables.dentries.get(id)?.node?;
                Some((name.clone(), *id, node))
            })
            .collect())
    }

    pub fn node_count(&self) -> Result<usize> {
        Ok(self.read_tables()?.nodes.len())
    }

    pub fn dentry_count(&self) -> Result<usize> {
        Ok(self.read_tables()?.dentries.len())
    }

    // Path-level operations.

    /// Walk `path` from the root through each directory's lookup operation.
    pub fn lookup_path<P: AsRef<Path>>(&self, path: P) -> Result<DentryID> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(Error::empty_path());
        }
        let mut stack = vec![self.root()?];

        for comp in path.components() {
            match comp {
                Component::Prefix(_) => return Err(Error::prefix_not_supported(path)),
                Component::RootDir | Component::CurDir => continue,
                Component::ParentDir => {
                    // ".." at the root stays at the root
                    if stack.len() > 1 {
                        _ = stack.pop();
                    }
                }
                Component::Normal(name) => {
                    let Some(&dir) = stack.last() else {
                        return Err(Error::empty_path());
                    };
                    let node = self
                        .dentry_node(dir)?
                        .ok_or_else(|| Error::not_found(path))?;
                    let ops = node
                        .directory_ops()
                        .ok_or_else(|| Error::not_a_directory(path))?;
                    let name = name
                        .to_str()
                        .ok_or_else(|| Error::invalid_argument(path.display().to_string()))?;
                    match ops.lookup(self, dir, name)? {
                        Some(child) => stack.push(child),
                        None => return Err(Error::not_found(path)),
                    }
                }
            }
        }

        stack.last().copied().ok_or_else(Error::empty_path)
    }

    pub fn resolve<P: AsRef<Path>>(&self, path: P) -> Result<Arc<Node>> {
        let path = path.as_ref();
        let dentry = self.lookup_path(path)?;
        self.dentry_node(dentry)?
            .ok_or_else(|| Error::not_found(path))
    }

    pub fn open<P: AsRef<Path>>(&self, path: P) -> Result<OpenFile> {
        let path = path.as_ref();
        let node = self.resolve(path)?;
        if node.kind() == Some(NodeKind::Directory) {
            return Err(Error::is_a_directory(path));
        }
        OpenFile::open(node)
    }

    pub fn open_dentry(&self, dentry: DentryID) -> Result<OpenFile> {
        let node = self
            .dentry_node(dentry)?
            .ok_or_else(|| Error::stale(format!("directory entry {} is negative", dentry)))?;
        OpenFile::open(node)
    }

    pub fn readdir<P: AsRef<Path>>(&self, path: P) -> Result<Vec<DirEntry>> {
        let path = path.as_ref();
        let dentry = self.lookup_path(path)?;
        let node = self
            .dentry_node(dentry)?
            .ok_or_else(|| Error::not_found(path))?;
        let ops = node
            .directory_ops()
            .ok_or_else(|| Error::not_a_directory(path))?;
        ops.readdir(self, dentry)
    }

    pub fn stat<P: AsRef<Path>>(&self, path: P) -> Result<NodeAttr> {
        Ok(self.resolve(path)?.attr())
    }

    pub fn statfs(&self) -> Result<StatFs> {
        let ops = self
            .ops
            .as_ref()
            .ok_or_else(|| Error::invalid_argument("superblock has no operations"))?;
        ops.statfs(self)
    }

    /// Destroy every entry and node. Open handles keep their node alive
    /// until closed.
    pub fn kill_litter(&self) -> Result<usize> {
        let nodes: Vec<Arc<Node>> = {
            let mut tables = self.write_tables()?;
            tables.dentries.clear();
            tables.live_nodes = 0;
            std::mem::take(&mut tables.nodes).into_values().collect()
        };
        if let Some(ops) = &self.ops {
            for node in &nodes {
                ops.drop_node(self, node);
            }
        }
        diagnostics::log_debug!("Destroyed {count} nodes", count: nodes.len());
        Ok(nodes.len())
    }
}

impl std::fmt::Debug for Superblock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Superblock")
            .field("fs_type", &self.fs_type)
            .field("magic", &format_args!("{:#x}", self.magic))
            .field("root", &self.root)
            .finish()
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name == "." || name == ".." || name.contains('/') || name.contains('\0')
    {
        return Err(Error::invalid_argument(format!("bad entry name {:?}", name)));
    }
    if name.len() > NAME_MAX {
        return Err(Error::invalid_argument(format!(
            "entry name longer than {} bytes",
            NAME_MAX
        )));
    }
    Ok(())
}
