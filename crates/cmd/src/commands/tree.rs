// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use vfs::{DentryID, Superblock};

/// One line per node, depth first, children in name order:
/// `<ino> <mode> <nlink> <path>`.
pub fn tree_command<F>(sb: &Superblock, mut handler: F) -> Result<()>
where
    F: FnMut(&str),
{
    let root = sb.root()?;
    walk(sb, root, &mut handler)
}

fn walk<F>(sb: &Superblock, dentry: DentryID, handler: &mut F) -> Result<()>
where
    F: FnMut(&str),
{
    let Some(node) = sb.dentry_node(dentry)? else {
        return Ok(());
    };
    let path = sb.dentry_path(dentry)?;
    handler(&format!(
        "{} {} {} {}",
        node.id().to_hex_string(),
        node.mode(),
        node.nlink(),
        path.display()
    ));

    if node.directory_ops().is_some() {
        for (_, child, _) in sb.d_children(dentry)? {
            walk(sb, child, handler)?;
        }
    }
    Ok(())
}
