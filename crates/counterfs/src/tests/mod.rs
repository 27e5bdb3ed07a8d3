// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0


use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use vfs::{FixedClock, Mount, Registry, Result, Superblock};

use crate::fs::{COUNTERFS_NAME, fill_super, register};
use crate::options::MountOptions;

pub(crate) fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

pub(crate) fn registry() -> Registry {
    let registry = Registry::with_clock(Arc::new(FixedClock::new(epoch())));
    register(&registry).unwrap();
    registry
}

pub(crate) fn try_mount(data: &str) -> Result<Mount> {
    registry().mount(COUNTERFS_NAME, data)
}

pub(crate) fn mount_default() -> Mount {
    try_mount("").unwrap()
}

/// A filled superblock outside any registry, for driving the tree
/// builder directly.
pub(crate) fn filled(opts: &MountOptions) -> Superblock {
    let mut sb = Superblock::new(COUNTERFS_NAME, Arc::new(FixedClock::new(epoch())));
    fill_super(&mut sb, opts).unwrap();
    sb
}

pub(crate) fn read_file(sb: &Superblock, path: &str) -> String {
    let mut file = sb.open(path).unwrap();
    let bytes = file.read_to_end().unwrap();
    file.close().unwrap();
    String::from_utf8(bytes).unwrap()
}

pub(crate) fn write_file(sb: &Superblock, path: &str, text: &str) -> Result<usize> {
    let mut file = sb.open(path)?;
    let n = file.write(text.as_bytes())?;
    file.close()?;
    Ok(n)
}

pub(crate) fn names(sb: &Superblock, path: &str) -> Vec<String> {
    sb.readdir(path)
        .unwrap()
        .into_iter()
        .map(|e| e.name)
        .collect()
}
