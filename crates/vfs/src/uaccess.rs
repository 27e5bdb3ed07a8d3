// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Caller buffers and the copy primitives that move bytes across them.
//!
//! A buffer carries a declared length and, normally, the memory behind it.
//! A *faulting* buffer has the length but no memory, standing in for an
//! invalid caller pointer; every copy through it fails with
//! [`Error::Fault`] and touches nothing.

use crate::error::{Error, Result};

/// Source buffer supplied by a caller of `write`.
#[derive(Debug, Clone, Copy)]
pub struct UserSlice<'a> {
    data: Option<&'a [u8]>,
    len: usize,
}

impl<'a> UserSlice<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data: Some(data),
            len: data.len(),
        }
    }

    /// A buffer of `len` bytes whose memory cannot be read.
    pub fn faulting(len: usize) -> Self {
        Self { data: None, len }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Copy the first `dst.len()` bytes of the caller buffer into `dst`.
    pub fn copy_from_user(&self, dst: &mut [u8]) -> Result<()> {
        match self.data {
            Some(src) if dst.len() <= src.len() => {
                dst.copy_from_slice(&src[..dst.len()]);
                Ok(())
            }
            _ => Err(Error::Fault),
        }
    }
}

/// Destination buffer supplied by a caller of `read`.
#[derive(Debug)]
pub struct UserSliceMut<'a> {
    data: Option<&'a mut [u8]>,
    len: usize,
}

impl<'a> UserSliceMut<'a> {
    pub fn new(data: &'a mut [u8]) -> Self {
        let len = data.len();
        Self {
            data: Some(data),
            len,
        }
    }

    /// A buffer of `len` bytes whose memory cannot be written.
    pub fn faulting(len: usize) -> Self {
        Self { data: None, len }
    }

    /// Capacity the caller declared.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Copy `src` to the start of the caller buffer.
    pub fn copy_to_user(&mut self, src: &[u8]) -> Result<()> {
        match self.data.as_deref_mut() {
            Some(dst) if src.len() <= dst.len() => {
                dst[..src.len()].copy_from_slice(src);
                Ok(())
            }
            _ => Err(Error::Fault),
        }
    }
}
