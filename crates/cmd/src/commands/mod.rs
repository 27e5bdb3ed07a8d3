// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

pub mod cat;
pub mod script;
pub mod stat;
pub mod stress;
pub mod tree;
pub mod write;

use anyhow::Result;
use clap::Subcommand;
use vfs::Superblock;

/// Commands that act on one mounted filesystem. Usable both from the
/// command line and from a script.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum FsCommand {
    /// Print the tree with inode numbers and modes
    Tree,
    /// Read a file
    Cat {
        path: String,
        /// Byte offset to start reading at
        #[arg(long, default_value_t = 0)]
        offset: u64,
        /// Read at most this many bytes
        #[arg(long)]
        count: Option<usize>,
    },
    /// Write text to a file
    Write {
        path: String,
        #[arg(allow_hyphen_values = true)]
        text: String,
        /// Byte offset to write at
        #[arg(long, default_value_t = 0)]
        offset: u64,
    },
    /// Show node attributes, or filesystem statistics without a path
    Stat {
        path: Option<String>,
        #[arg(long)]
        json: bool,
    },
}

impl FsCommand {
    pub fn run<F>(&self, sb: &Superblock, handler: F) -> Result<()>
    where
        F: FnMut(&str),
    {
        match self {
            FsCommand::Tree => tree::tree_command(sb, handler),
            FsCommand::Cat {
                path,
                offset,
                count,
            } => cat::cat_command(sb, path, *offset, *count, handler),
            FsCommand::Write { path, text, offset } => {
                _ = write::write_command(sb, path, text, *offset)?;
                Ok(())
            }
            FsCommand::Stat { path, json } => stat::stat_command(sb, path.as_deref(), *json, handler),
        }
    }
}
