// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use vfs::{Error, FileMode, Node, NodeKind, NodeOps, Result, Superblock};

/// Allocate a node of `kind` with `permissions`, stamped with the current
/// time, carrying `ops` and a fresh inode number.
///
/// The node comes back unpublished; hand it to `d_add` or `d_make_root`,
/// or release it with `iput`.
pub fn make_node(
    sb: &Superblock,
    kind: NodeKind,
    permissions: u32,
    ops: NodeOps,
) -> Result<Node> {
    if ops.kind() != kind {
        return Err(Error::invalid_argument(format!(
            "{:?} operations for a {:?} node",
            ops.kind(),
            kind
        )));
    }

    let mut node = sb.new_node()?;
    node.set_mode(FileMode::new(kind, permissions));
    node.set_times(sb.now());
    node.set_ops(ops);
    node.set_id(sb.next_ino());

    diagnostics::log_debug!("Made inode {ino} mode {mode}", ino: node.id().as_u64(), mode: node.mode().bits());
    Ok(node)
}
