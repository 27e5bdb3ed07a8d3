// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use vfs::{Error, FileContext, FileOperations, Node, Result, UserSlice, UserSliceMut};

use crate::counter::Counter;
use crate::text::{TMPSIZE, parse_decimal, render};

/// File operations serving a [`Counter`] as text.
///
/// Reads see `"<value>\n"` as a tiny file that is re-rendered on every
/// call. Writes replace the value and are only accepted at offset 0.
#[derive(Debug, Default, Clone, Copy)]
pub struct CounterFileOps;

/// Shared counter file operations table.
pub fn counter_file_operations() -> Arc<dyn FileOperations> {
    Arc::new(CounterFileOps)
}

fn counter_of(file: &FileContext) -> Result<&Counter> {
    file.private_as::<Counter>()
        .ok_or_else(|| Error::stale("counter file handle has no counter"))
}

impl FileOperations for CounterFileOps {
    fn open(&self, node: &Node, file: &mut FileContext) -> Result<()> {
        file.set_private_data(node.private_data().cloned());
        Ok(())
    }

    fn read(
        &self,
        file: &FileContext,
        buf: &mut UserSliceMut<'_>,
        offset: &mut u64,
    ) -> Result<usize> {
        let counter = counter_of(file)?;
        let mut tmp = [0u8; TMPSIZE];
        let len = render(counter.load(), &mut tmp)?;

        if *offset > len as u64 {
            return Ok(0);
        }
        let start = *offset as usize;
        let count = buf.len().min(len - start);
        if count == 0 {
            return Ok(0);
        }
        buf.copy_to_user(&tmp[start..start + count])?;
        *offset += count as u64;
        Ok(count)
    }

    fn write(&self, file: &FileContext, buf: &UserSlice<'_>, offset: &mut u64) -> Result<usize> {
        let counter = counter_of(file)?;
        let len = buf.len();

        if *offset != 0 {
            diagnostics::log_debug!("Rejected counter write at offset {offset}", offset: *offset);
            return Err(Error::invalid_argument(format!(
                "counter writes must start at offset 0, not {}",
                *offset
            )));
        }
        if len >= TMPSIZE {
            diagnostics::log_debug!("Rejected {len} byte counter write", len: len);
            return Err(Error::invalid_argument(format!(
                "counter text must be shorter than {} bytes",
                TMPSIZE
            )));
        }

        let mut tmp = [0u8; TMPSIZE];
        buf.copy_from_user(&mut tmp[..len])?;
        counter.store(parse_decimal(&tmp));
        Ok(len)
    }
}
