// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::str::FromStr;

use vfs::{Error, Limits, Result};

pub const DEFAULT_DIR: &str = "foo";
pub const DEFAULT_FILE: &str = "bar";

/// Mount configuration, parsed from a comma-separated option string such
/// as `dir=foo,file=bar,initial=3,strict`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountOptions {
    pub dir_name: String,
    pub file_name: String,
    pub initial: i32,
    /// Fail the mount when the tree cannot be built. Off by default, where
    /// a failed tree leaves an empty but usable root.
    pub strict: bool,
    pub max_nodes: Option<usize>,
    pub max_dentries: Option<usize>,
}

impl Default for MountOptions {
    fn default() -> Self {
        Self {
            dir_name: DEFAULT_DIR.to_string(),
            file_name: DEFAULT_FILE.to_string(),
            initial: 0,
            strict: false,
            max_nodes: None,
            max_dentries: None,
        }
    }
}

impl MountOptions {
    pub fn parse(data: &str) -> Result<Self> {
        let mut opts = Self::default();
        for item in data.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let (key, value) = match item.split_once('=') {
                Some((key, value)) => (key.trim(), Some(value.trim())),
                None => (item, None),
            };
            match (key, value) {
                ("dir", Some(v)) => opts.dir_name = v.to_string(),
                ("file", Some(v)) => opts.file_name = v.to_string(),
                ("initial", Some(v)) => opts.initial = number(key, v)?,
                ("strict", None) => opts.strict = true,
                ("strict", Some(v)) => opts.strict = flag(key, v)?,
                ("max_nodes", Some(v)) => opts.max_nodes = Some(number(key, v)?),
                ("max_dentries", Some(v)) => opts.max_dentries = Some(number(key, v)?),
                ("dir" | "file" | "initial" | "max_nodes" | "max_dentries", None) => {
                    return Err(Error::invalid_argument(format!(
                        "mount option {} needs a value",
                        key
                    )));
                }
                _ => {
                    return Err(Error::invalid_argument(format!(
                        "unknown mount option {}",
                        key
                    )));
                }
            }
        }
        opts.validate()?;
        Ok(opts)
    }

    /// Checks the names can be carried in an option string: non-empty,
    /// free of `,` and without surrounding whitespace.
    pub fn validate(&self) -> Result<()> {
        for (key, name) in [("dir", &self.dir_name), ("file", &self.file_name)] {
            if name.is_empty() || name.contains(',') || name.trim() != name.as_str() {
                return Err(Error::invalid_argument(format!(
                    "bad {} name {:?}",
                    key, name
                )));
            }
        }
        Ok(())
    }

    pub fn limits(&self) -> Limits {
        Limits {
            max_nodes: self.max_nodes,
            max_dentries: self.max_dentries,
        }
    }
}

fn number<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::invalid_argument(format!("bad value for {}: {:?}", key, value)))
}

fn flag(key: &str, value: &str) -> Result<bool> {
    match value {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::invalid_argument(format!(
            "bad value for {}: {:?}",
            key, value
        ))),
    }
}

impl FromStr for MountOptions {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Renders back to the option string form accepted by [`MountOptions::parse`].
/// Only options that pass [`MountOptions::validate`] survive the trip.
impl fmt::Display for MountOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "dir={},file={},initial={}",
            self.dir_name, self.file_name, self.initial
        )?;
        if self.strict {
            write!(f, ",strict")?;
        }
        if let Some(n) = self.max_nodes {
            write!(f, ",max_nodes={}", n)?;
        }
        if let Some(n) = self.max_dentries {
            write!(f, ",max_dentries={}", n)?;
        }
        Ok(())
    }
}
