// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use anyhow::{Context, Result};
use clap::Args;
use counterfs::{DEFAULT_DIR, DEFAULT_FILE, MountOptions};
use vfs::{Mount, Registry};

/// Mount options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct MountArgs {
    /// Name of the directory under the root
    #[arg(long, global = true, default_value = DEFAULT_DIR)]
    pub dir: String,

    /// Name of the counter file inside the directory
    #[arg(long, global = true, default_value = DEFAULT_FILE)]
    pub file: String,

    /// Starting counter value
    #[arg(long, global = true, default_value_t = 0, allow_negative_numbers = true)]
    pub initial: i32,

    /// Fail the mount if the tree cannot be built
    #[arg(long, global = true)]
    pub strict: bool,

    /// Cap on live nodes
    #[arg(long, global = true)]
    pub max_nodes: Option<usize>,

    /// Cap on directory entries
    #[arg(long, global = true)]
    pub max_dentries: Option<usize>,
}

impl Default for MountArgs {
    fn default() -> Self {
        Self::from(&MountOptions::default())
    }
}

impl From<&MountOptions> for MountArgs {
    fn from(opts: &MountOptions) -> Self {
        Self {
            dir: opts.dir_name.clone(),
            file: opts.file_name.clone(),
            initial: opts.initial,
            strict: opts.strict,
            max_nodes: opts.max_nodes,
            max_dentries: opts.max_dentries,
        }
    }
}

impl MountArgs {
    pub fn options(&self) -> Result<MountOptions> {
        let opts = MountOptions {
            dir_name: self.dir.clone(),
            file_name: self.file.clone(),
            initial: self.initial,
            strict: self.strict,
            max_nodes: self.max_nodes,
            max_dentries: self.max_dentries,
        };
        opts.validate().context("checking mount options")?;
        Ok(opts)
    }

    /// Path of the counter file under these options.
    pub fn counter_path(&self) -> String {
        format!("/{}/{}", self.dir, self.file)
    }
}

/// A counterfs mount owned by the command line, with the registry it
/// was mounted from.
pub struct Session {
    registry: Registry,
    mount: Mount,
}

impl Session {
    pub fn open(args: &MountArgs) -> Result<Self> {
        let registry = Registry::new();
        counterfs::register(&registry).context("registering counterfs")?;
        let opts = args.options()?;
        let mount = counterfs::mount(&registry, &opts)
            .with_context(|| format!("mounting counterfs with {}", opts))?;
        let data = opts.to_string();
        diagnostics::log_debug!("Session mounted {data}", data: data.as_str());
        Ok(Self { registry, mount })
    }

    pub fn mount(&self) -> &Mount {
        &self.mount
    }

    /// Unmount, then drop the filesystem type from the registry.
    pub fn close(self) -> Result<usize> {
        let Self { registry, mount } = self;
        let destroyed = mount.unmount().context("unmounting counterfs")?;
        counterfs::unregister(&registry).context("unregistering counterfs")?;
        Ok(destroyed)
    }
}
