// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use cmd::cli::{Cli, Commands};
use cmd::commands::script::parse_line;
use cmd::{
    FsCommand, MountArgs, Session, cat_command, stat_command, tree_command, write_command,
};

fn collect<F>(run: F) -> Vec<String>
where
    F: FnOnce(&mut dyn FnMut(&str)) -> anyhow::Result<()>,
{
    let mut lines = Vec::new();
    run(&mut |line: &str| lines.push(line.to_string())).expect("command failed");
    lines
}

#[test]
fn test_tree_output() {
    let session = Session::open(&MountArgs::default()).expect("mount");
    let lines = collect(|out| tree_command(session.mount(), out));
    assert_eq!(
        lines,
        [
            "0001 drwxr-xr-x 2 /",
            "0002 drwxr-xr-x 2 /foo",
            "0003 -rw------- 1 /foo/bar",
        ]
    );
    assert_eq!(session.close().expect("close"), 3);
}

#[test]
fn test_write_then_cat() {
    let session = Session::open(&MountArgs::default()).expect("mount");
    let sb = session.mount();

    assert_eq!(write_command(sb, "/foo/bar", "42", 0).expect("write"), 2);
    assert_eq!(collect(|out| cat_command(sb, "/foo/bar", 0, None, out)), ["42"]);
    assert_eq!(collect(|out| cat_command(sb, "/foo/bar", 1, None, out)), ["2"]);
    assert_eq!(collect(|out| cat_command(sb, "/foo/bar", 0, Some(1), out)), ["4"]);
    assert_eq!(collect(|out| cat_command(sb, "/foo/bar", 3, None, out)), [""]);
}

#[test]
fn test_write_at_offset_fails() {
    let session = Session::open(&MountArgs::default()).expect("mount");
    let err = write_command(session.mount(), "/foo/bar", "9", 5).expect_err("offset write");
    let root = err.downcast_ref::<vfs::Error>().expect("vfs error");
    assert_eq!(root.errno(), vfs::error::EINVAL);
}

#[test]
fn test_cat_missing_file() {
    let session = Session::open(&MountArgs::default()).expect("mount");
    let mut lines = Vec::new();
    let err = cat_command(session.mount(), "/foo/baz", 0, None, |l: &str| {
        lines.push(l.to_string())
    })
    .expect_err("missing file");
    assert!(format!("{:#}", err).contains("/foo/baz"));
    assert!(lines.is_empty());
}

#[test]
fn test_stat_json() {
    let session = Session::open(&MountArgs::default()).expect("mount");
    let lines = collect(|out| stat_command(session.mount(), Some("/foo/bar"), true, out));
    let attr: serde_json::Value = serde_json::from_str(&lines[0]).expect("json");
    assert_eq!(attr["ino"], 3);
    assert_eq!(attr["kind"], "regular_file");
    assert_eq!(attr["mode"], 0o100_600);

    let lines = collect(|out| stat_command(session.mount(), None, true, out));
    let st: serde_json::Value = serde_json::from_str(&lines[0]).expect("json");
    assert_eq!(st["magic"], 0x1992_0342);
    assert_eq!(st["block_size"], 4096);
    assert_eq!(st["fs_type"], "counterfs");
}

#[test]
fn test_stat_text() {
    let session = Session::open(&MountArgs::default()).expect("mount");
    let lines = collect(|out| stat_command(session.mount(), Some("/foo"), false, out));
    assert!(lines[0].contains("Mode: 0040755 (drwxr-xr-x)"));
    assert!(lines[0].contains("Links: 2"));
}

#[derive(Parser)]
struct TestCli {
    #[command(flatten)]
    mount: MountArgs,
}

#[test]
fn test_mount_args() {
    let cli = TestCli::parse_from(["cfs", "--dir", "stats", "--file", "hits", "--initial", "-3"]);
    assert_eq!(cli.mount.counter_path(), "/stats/hits");

    let session = Session::open(&cli.mount).expect("mount");
    assert_eq!(collect(|out| cat_command(session.mount(), "/stats/hits", 0, None, out)), ["-3"]);
}

#[test]
fn test_strict_mount_failure() {
    let args = MountArgs {
        strict: true,
        max_nodes: Some(2),
        ..MountArgs::default()
    };
    let err = Session::open(&args).err().expect("strict mount must fail");
    let root = err.downcast_ref::<vfs::Error>().expect("vfs error");
    assert_eq!(root.errno(), vfs::error::ENOMEM);

    let args = MountArgs {
        max_nodes: Some(2),
        ..MountArgs::default()
    };
    let session = Session::open(&args).expect("lenient mount");
    let lines = collect(|out| tree_command(session.mount(), out));
    assert_eq!(lines.len(), 2);
}

#[test]
fn test_parse_script_lines() {
    assert_eq!(parse_line("  ").expect("blank"), None);
    assert_eq!(parse_line("# comment").expect("comment"), None);
    assert_eq!(parse_line("tree").expect("tree"), Some(FsCommand::Tree));
    assert_eq!(
        parse_line("write /foo/bar -7").expect("write"),
        Some(FsCommand::Write {
            path: "/foo/bar".to_string(),
            text: "-7".to_string(),
            offset: 0,
        })
    );
    assert_eq!(
        parse_line("cat /foo/bar --offset 1 --count 2").expect("cat"),
        Some(FsCommand::Cat {
            path: "/foo/bar".to_string(),
            offset: 1,
            count: Some(2),
        })
    );
    assert!(parse_line("frobnicate").is_err());
}

#[test]
fn test_cli_definition() {
    Cli::command().debug_assert();
}

#[test]
fn test_parse_script_command() {
    let cli = Cli::try_parse_from(["cfs", "script", "x.txt"]).expect("parse");
    assert_eq!(cli.mount.file, "bar");
    match cli.command {
        Commands::Script { script } => assert_eq!(script, Some(PathBuf::from("x.txt"))),
        other => panic!("unexpected command {:?}", other),
    }

    let cli = Cli::try_parse_from(["cfs", "--file", "hits", "script"]).expect("parse");
    assert_eq!(cli.mount.file, "hits");
    assert_eq!(cli.mount.counter_path(), "/foo/hits");
    assert!(matches!(cli.command, Commands::Script { script: None }));
}

#[test]
fn test_parse_fs_command() {
    let cli = Cli::try_parse_from(["cfs", "cat", "/foo/bar", "--count", "18446744073709551615"])
        .expect("parse");
    let Commands::Fs(command) = cli.command else {
        panic!("expected a filesystem command");
    };

    let session = Session::open(&cli.mount).expect("mount");
    _ = write_command(session.mount(), "/foo/bar", "42", 0).expect("write");
    assert_eq!(collect(|out| command.run(session.mount(), out)), ["42"]);
}

#[test]
fn test_cat_huge_count() {
    let session = Session::open(&MountArgs::default()).expect("mount");
    let sb = session.mount();
    _ = write_command(sb, "/foo/bar", "-1234", 0).expect("write");
    assert_eq!(
        collect(|out| cat_command(sb, "/foo/bar", 0, Some(usize::MAX), out)),
        ["-1234"]
    );
    assert_eq!(
        collect(|out| cat_command(sb, "/foo/bar", 2, Some(usize::MAX - 1), out)),
        ["234"]
    );
}

#[test]
fn test_unrepresentable_mount_names() {
    for dir in ["a,b", " x", "x "] {
        let args = MountArgs {
            dir: dir.to_string(),
            ..MountArgs::default()
        };
        let err = Session::open(&args).err().expect("name must be rejected");
        let root = err.downcast_ref::<vfs::Error>().expect("vfs error");
        assert_eq!(root.errno(), vfs::error::EINVAL);
    }

    let cli = Cli::try_parse_from(["cfs", "--dir", "a,b", "tree"]).expect("parse");
    assert!(Session::open(&cli.mount).is_err());
}
