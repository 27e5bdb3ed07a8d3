// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use super::*;
use crate::fs::Limits;

#[test]
fn test_tree_shape_and_lookup() {
    let mut sb = test_superblock();
    let root = make_root(&mut sb);
    let docs = add_dir(&sb, root, "docs");
    let readme = add_file(&sb, docs, "readme", b"hello\n");

    assert_eq!(sb.lookup_path("/").unwrap(), root);
    assert_eq!(sb.lookup_path("/docs").unwrap(), docs);
    assert_eq!(sb.lookup_path("/docs/readme").unwrap(), readme);
    assert_eq!(sb.lookup_path("/docs/../docs/./readme").unwrap(), readme);
    assert_eq!(sb.lookup_path("/../docs").unwrap(), docs);
    assert_eq!(sb.dentry_path(readme).unwrap(), std::path::PathBuf::from("/docs/readme"));

    assert_eq!(sb.lookup_path("/nope"), Err(Error::not_found("/nope")));
    assert_eq!(
        sb.lookup_path("/docs/readme/x"),
        Err(Error::not_a_directory("/docs/readme/x"))
    );
    assert_eq!(sb.lookup_path(""), Err(Error::empty_path()));
}

#[test]
fn test_readdir_includes_dots() {
    let mut sb = test_superblock();
    let root = make_root(&mut sb);
    let docs = add_dir(&sb, root, "docs");
    _ = add_file(&sb, docs, "b", b"");
    _ = add_file(&sb, docs, "a", b"");

    let root_ino = sb.dentry_node(root).unwrap().unwrap().id();
    let docs_ino = sb.dentry_node(docs).unwrap().unwrap().id();

    let entries = sb.readdir("/docs").unwrap();
    let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec![".", "..", "a", "b"]);
    assert_eq!(entries[0].ino, docs_ino);
    assert_eq!(entries[1].ino, root_ino);
    assert_eq!(entries[2].kind, NodeKind::RegularFile);

    // Root's parent is itself
    let entries = sb.readdir("/").unwrap();
    assert_eq!(entries[1].ino, root_ino);
    assert_eq!(entries[2].name, "docs");
    assert_eq!(entries[2].kind, NodeKind::Directory);

    assert_eq!(
        sb.readdir("/docs/a"),
        Err(Error::not_a_directory("/docs/a"))
    );
}

#[test]
fn test_negative_entry_invisible_until_bound() {
    let mut sb = test_superblock();
    let root = make_root(&mut sb);
    let d = sb.d_alloc_name(root, "pending").unwrap();

    assert_eq!(sb.d_lookup(root, "pending").unwrap(), None);
    assert_eq!(sb.lookup_path("/pending"), Err(Error::not_found("/pending")));
    assert_eq!(sb.readdir("/").unwrap().len(), 2);

    let node = make(&sb, NodeKind::Directory, 0o755, NodeOps::Directory(simple_dir_operations()));
    let published = sb.d_add(d, node).unwrap();
    assert_eq!(sb.d_lookup(root, "pending").unwrap(), Some(d));
    assert_eq!(sb.node(published.id()).unwrap().id(), published.id());
}

#[test]
fn test_name_collision_rejected() {
    let mut sb = test_superblock();
    let root = make_root(&mut sb);
    _ = add_dir(&sb, root, "docs");

    assert_eq!(
        sb.d_alloc_name(root, "docs"),
        Err(Error::already_exists("/docs"))
    );
    // A negative entry also holds the name
    _ = sb.d_alloc_name(root, "tmp").unwrap();
    assert!(sb.d_alloc_name(root, "tmp").is_err());
}

#[test]
fn test_bad_names_rejected() {
    let mut sb = test_superblock();
    let root = make_root(&mut sb);
    for name in ["", ".", "..", "a/b"] {
        assert!(matches!(
            sb.d_alloc_name(root, name),
            Err(Error::InvalidArgument(_))
        ));
    }
    let long = "x".repeat(crate::fs::NAME_MAX + 1);
    assert!(sb.d_alloc_name(root, &long).is_err());
}

#[test]
fn test_dput_releases_negative_entry() {
    let mut sb = test_superblock();
    let root = make_root(&mut sb);
    let before = sb.dentry_count().unwrap();

    let d = sb.d_alloc_name(root, "scratch").unwrap();
    assert_eq!(sb.dentry_count().unwrap(), before + 1);
    sb.dput(d).unwrap();
    assert_eq!(sb.dentry_count().unwrap(), before);

    // The name is free again and the old id is stale
    _ = sb.d_alloc_name(root, "scratch").unwrap();
    assert!(matches!(sb.dentry_name(d), Err(Error::Stale(_))));
}

#[test]
fn test_dput_refuses_bound_entry() {
    let mut sb = test_superblock();
    let root = make_root(&mut sb);
    let docs = add_dir(&sb, root, "docs");
    assert!(matches!(sb.dput(docs), Err(Error::Busy(_))));
}

#[test]
fn test_node_limit_is_out_of_memory() {
    let mut sb = test_superblock();
    sb.set_limits(Limits {
        max_nodes: Some(2),
        max_dentries: None,
    });
    let root = make_root(&mut sb);
    let pending = sb.new_node().unwrap();
    assert_eq!(sb.new_node().err(), Some(Error::out_of_memory("node")));

    // Releasing the unpublished node frees the slot
    sb.iput(pending);
    _ = add_dir(&sb, root, "docs");
    assert_eq!(sb.node_count().unwrap(), 2);
}

#[test]
fn test_dentry_limit_is_out_of_memory() {
    let mut sb = test_superblock();
    sb.set_limits(Limits {
        max_nodes: None,
        max_dentries: Some(1),
    });
    let root = make_root(&mut sb);
    assert_eq!(
        sb.d_alloc_name(root, "docs"),
        Err(Error::out_of_memory("directory entry"))
    );
}

#[test]
fn test_d_add_rejects_incomplete_node() {
    let mut sb = test_superblock();
    let root = make_root(&mut sb);
    let d = sb.d_alloc_name(root, "bad").unwrap();

    let mut node = sb.new_node().unwrap();
    node.set_id(sb.next_ino());
    node.set_mode(FileMode::new(NodeKind::RegularFile, 0o600));
    node.set_ops(NodeOps::Directory(simple_dir_operations()));

    let nodes_before = sb.node_count().unwrap();
    assert!(matches!(sb.d_add(d, node), Err(Error::InvalidArgument(_))));
    assert_eq!(sb.node_count().unwrap(), nodes_before);

    // The entry is still negative and can be rolled back
    sb.dput(d).unwrap();
}

#[test]
fn test_d_make_root_requires_directory() {
    let mut sb = test_superblock();
    let node = make(
        &sb,
        NodeKind::RegularFile,
        0o644,
        NodeOps::File(Arc::new(StaticFile(b""))),
    );
    assert_eq!(sb.d_make_root(node), Err(Error::not_a_directory("/")));
    assert!(sb.root().is_err());
    let _ = make_root(&mut sb);
    assert!(sb.root().is_ok());
}

#[test]
fn test_inode_numbers_unique_and_stamped() {
    let mut sb = test_superblock();
    let root = make_root(&mut sb);
    let a = add_dir(&sb, root, "a");
    let b = add_dir(&sb, root, "b");

    let a = sb.dentry_node(a).unwrap().unwrap();
    let b = sb.dentry_node(b).unwrap().unwrap();
    assert_ne!(a.id(), b.id());
    assert_eq!(a.atime(), epoch());
    assert_eq!(a.mtime(), epoch());
    assert_eq!(a.ctime(), epoch());
}

#[test]
fn test_stat_and_statfs() {
    let mut sb = test_superblock();
    let root = make_root(&mut sb);
    _ = add_file(&sb, root, "f", b"x");

    let attr = sb.stat("/f").unwrap();
    assert_eq!(attr.kind, Some(NodeKind::RegularFile));
    assert_eq!(attr.mode, 0o100_644);
    assert_eq!(attr.permissions, "-rw-r--r--");

    let st = sb.statfs().unwrap();
    assert_eq!(st.magic, 0x7e57);
    assert_eq!(st.block_size, 4096);
    assert_eq!(st.files, 2);
    assert_eq!(st.entries, 2);

    let json = serde_json::to_value(&st).unwrap();
    assert_eq!(json["fs_type"], "testfs");
}

#[test]
fn test_kill_litter_empties_arena() {
    let mut sb = test_superblock();
    let root = make_root(&mut sb);
    let docs = add_dir(&sb, root, "docs");
    _ = add_file(&sb, docs, "readme", b"x");

    assert_eq!(sb.kill_litter().unwrap(), 3);
    assert_eq!(sb.node_count().unwrap(), 0);
    assert_eq!(sb.dentry_count().unwrap(), 0);
    assert!(matches!(sb.lookup_path("/docs"), Err(Error::Stale(_))));
}

#[test]
fn test_iput_with_poisoned_tables() {
    let sb = test_superblock();
    let pending = sb.new_node().unwrap();
    sb.poison_tables();

    // logged and skipped rather than panicking
    sb.iput(pending);
    assert_eq!(
        sb.new_node().err(),
        Some(Error::io("superblock tables poisoned"))
    );
}
