// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;
use std::ops::Deref;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::clock::{Clock, SystemClock};
use crate::error::{Error, Result};
use crate::fs::Superblock;

/// A filesystem implementation that can be mounted by name.
pub trait FileSystemType: Send + Sync {
    fn name(&self) -> &str;

    /// Populate a fresh superblock: parameters, operations, root and tree.
    /// `data` is the mount option string.
    fn fill_super(&self, sb: &mut Superblock, data: &str) -> Result<()>;
}

struct Registered {
    fs_type: Arc<dyn FileSystemType>,
    mounts: Arc<AtomicUsize>,
}

/// The filesystem switch: registered types and the mounts made from them.
pub struct Registry {
    clock: Arc<dyn Clock>,
    types: RwLock<BTreeMap<String, Registered>>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// A registry whose superblocks take timestamps from `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            types: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn register_filesystem(&self, fs_type: Arc<dyn FileSystemType>) -> Result<()> {
        let name = fs_type.name().to_string();
        let mut types = self
            .types
            .write()
            .map_err(|_| Error::io("registry poisoned"))?;
        if types.contains_key(&name) {
            return Err(Error::busy(format!("filesystem {} already registered", name)));
        }
        _ = types.insert(
            name.clone(),
            Registered {
                fs_type,
                mounts: Arc::new(AtomicUsize::new(0)),
            },
        );
        diagnostics::log_info!("Registered filesystem {name}", name: name.as_str());
        Ok(())
    }

    /// Remove a filesystem type. Fails while any of its mounts is live.
    pub fn unregister_filesystem(&self, name: &str) -> Result<()> {
        let mut types = self
            .types
            .write()
            .map_err(|_| Error::io("registry poisoned"))?;
        let registered = types
            .get(name)
            .ok_or_else(|| Error::unknown_filesystem(name))?;
        let live = registered.mounts.load(Ordering::Acquire);
        if live > 0 {
            return Err(Error::busy(format!("{} has {} live mounts", name, live)));
        }
        _ = types.remove(name);
        diagnostics::log_info!("Unregistered filesystem {name}", name: name);
        Ok(())
    }

    pub fn filesystems(&self) -> Result<Vec<String>> {
        Ok(self
            .types
            .read()
            .map_err(|_| Error::io("registry poisoned"))?
            .keys()
            .cloned()
            .collect())
    }

    /// Mount a device-less instance of `name`.
    ///
    /// A fresh superblock is filled by the type's fill routine; if that
    /// fails, whatever it built is torn down before the error returns.
    /// The mount counts as live from the moment the type is looked up, so
    /// the type cannot be unregistered while its fill routine runs.
    pub fn mount(&self, name: &str, data: &str) -> Result<Mount> {
        let (fs_type, mounts) = {
            let types = self
                .types
                .read()
                .map_err(|_| Error::io("registry poisoned"))?;
            let registered = types
                .get(name)
                .ok_or_else(|| Error::unknown_filesystem(name))?;
            _ = registered.mounts.fetch_add(1, Ordering::AcqRel);
            (registered.fs_type.clone(), registered.mounts.clone())
        };

        let mut sb = Superblock::new(name, self.clock.clone());
        let filled = fs_type.fill_super(&mut sb, data).and_then(|()| {
            sb.root()
                .map(|_| ())
                .map_err(|_| Error::invalid_argument(format!("{} did not set a root", name)))
        });
        if let Err(err) = filled {
            let reason = err.to_string();
            diagnostics::log_warn!("Mount of {name} failed: {reason}", name: name, reason: reason.as_str());
            _ = sb.kill_litter();
            _ = mounts.fetch_sub(1, Ordering::AcqRel);
            return Err(err);
        }

        diagnostics::log_info!("Mounted {name}", name: name);
        Ok(Mount {
            sb: Arc::new(sb),
            mounts,
            live: true,
        })
    }
}

/// A live mount. Dropping it unmounts.
pub struct Mount {
    sb: Arc<Superblock>,
    mounts: Arc<AtomicUsize>,
    live: bool,
}

impl Mount {
    pub fn superblock(&self) -> &Arc<Superblock> {
        &self.sb
    }

    /// Tear down every entry and node, returning how many nodes were
    /// destroyed.
    pub fn unmount(mut self) -> Result<usize> {
        self.teardown()
    }

    fn teardown(&mut self) -> Result<usize> {
        if !self.live {
            return Ok(0);
        }
        self.live = false;
        _ = self.mounts.fetch_sub(1, Ordering::AcqRel);
        let destroyed = self.sb.kill_litter()?;
        diagnostics::log_info!("Unmounted {name}", name: self.sb.fs_type());
        Ok(destroyed)
    }
}

impl Deref for Mount {
    type Target = Superblock;

    fn deref(&self) -> &Self::Target {
        &self.sb
    }
}

impl Drop for Mount {
    fn drop(&mut self) {
        _ = self.teardown();
    }
}

impl std::fmt::Debug for Mount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mount")
            .field("sb", &self.sb)
            .field("live", &self.live)
            .finish()
    }
}
