// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use anyhow::{Context, Result};
use vfs::{Superblock, UserSlice};

/// Write `text` to `path` at `offset`, returning the bytes accepted.
pub fn write_command(sb: &Superblock, path: &str, text: &str, offset: u64) -> Result<usize> {
    let file = sb.open(path).with_context(|| format!("opening {}", path))?;
    let mut pos = offset;
    let written = file
        .write_at(&UserSlice::new(text.as_bytes()), &mut pos)
        .with_context(|| format!("writing {:?} to {} at offset {}", text, path, offset))?;
    file.close()?;
    diagnostics::log_debug!("Wrote {written} bytes to {path}", written: written, path: path);
    Ok(written)
}
