// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use anyhow::{Context, Result};
use vfs::{NodeAttr, StatFs, Superblock};

/// Report `stat` for `path`, or `statfs` when no path is given.
pub fn stat_command<F>(sb: &Superblock, path: Option<&str>, json: bool, mut handler: F) -> Result<()>
where
    F: FnMut(&str),
{
    let output = match path {
        Some(path) => {
            let attr = sb.stat(path).with_context(|| format!("stat {}", path))?;
            if json {
                serde_json::to_string_pretty(&attr)?
            } else {
                format_attr(path, &attr)
            }
        }
        None => {
            let st = sb.statfs()?;
            if json {
                serde_json::to_string_pretty(&st)?
            } else {
                format_statfs(&st)
            }
        }
    };
    handler(&output);
    Ok(())
}

fn format_attr(path: &str, attr: &NodeAttr) -> String {
    format!(
        "  File: {}\n Inode: {}  Mode: {:07o} ({})  Links: {}\nAccess: {}\nModify: {}\nChange: {}",
        path,
        attr.ino,
        attr.mode,
        attr.permissions,
        attr.nlink,
        attr.atime.to_rfc3339(),
        attr.mtime.to_rfc3339(),
        attr.ctime.to_rfc3339()
    )
}

fn format_statfs(st: &StatFs) -> String {
    format!(
        "  Type: {}  Magic: {:#x}\nBlock size: {}  Name max: {}\n Files: {}  Entries: {}",
        st.fs_type, st.magic, st.block_size, st.name_max, st.files, st.entries
    )
}
