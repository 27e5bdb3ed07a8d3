// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::io::SeekFrom;

use anyhow::{Context, Result};
use vfs::{OpenFile, Superblock};

/// Read `path` from `offset`, up to `count` bytes or to end of file, and
/// pass the text to `handler` without its trailing newline.
pub fn cat_command<F>(
    sb: &Superblock,
    path: &str,
    offset: u64,
    count: Option<usize>,
    mut handler: F,
) -> Result<()>
where
    F: FnMut(&str),
{
    let mut file = sb.open(path).with_context(|| format!("opening {}", path))?;
    _ = file.seek(SeekFrom::Start(offset))?;

    let bytes = match count {
        Some(count) => read_up_to(&mut file, count),
        None => file.read_to_end().map_err(Into::into),
    }
    .with_context(|| format!("reading {}", path))?;
    file.close()?;

    let text = String::from_utf8_lossy(&bytes);
    let text: &str = &text;
    handler(text.strip_suffix('\n').unwrap_or(text));
    Ok(())
}

/// Read until `count` bytes are gathered or the file ends.
fn read_up_to(file: &mut OpenFile, count: usize) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut chunk = [0u8; 64];
    while out.len() < count {
        let want = chunk.len().min(count - out.len());
        let n = file.read(&mut chunk[..want])?;
        if n == 0 {
            break;
        }
        out.extend_from_slice(&chunk[..n]);
    }
    Ok(out)
}
