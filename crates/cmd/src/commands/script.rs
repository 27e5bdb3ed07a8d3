// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use vfs::Superblock;

use super::FsCommand;

#[derive(Parser, Debug)]
#[command(no_binary_name = true)]
struct ScriptLine {
    #[command(subcommand)]
    command: FsCommand,
}

/// Outcome of running a script. Every non-blank, non-comment line counts
/// as executed, including lines that fail to parse.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScriptSummary {
    pub executed: usize,
    pub failed: usize,
}

/// Open the script at `path`, or standard input.
pub fn script_source(path: Option<&Path>) -> Result<Box<dyn BufRead>> {
    match path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("opening script {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(BufReader::new(io::stdin()))),
    }
}

/// Parse one script line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<FsCommand>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let parsed = ScriptLine::try_parse_from(line.split_whitespace())?;
    Ok(Some(parsed.command))
}

/// Run each command in `input` against one mount, so state carries from
/// line to line.
///
/// A failing line is reported through `handler` as `line N: <error>` and
/// the script continues.
pub fn script_command<R, F>(sb: &Superblock, input: R, mut handler: F) -> Result<ScriptSummary>
where
    R: BufRead,
    F: FnMut(&str),
{
    let mut summary = ScriptSummary::default();
    for (idx, line) in input.lines().enumerate() {
        let line = line.context("reading script")?;
        let lineno = idx + 1;

        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        summary.executed += 1;

        let result = parse_line(trimmed).and_then(|command| match command {
            Some(command) => command.run(sb, &mut handler),
            None => Ok(()),
        });
        if let Err(err) = result {
            summary.failed += 1;
            let reason = format!("{:#}", err);
            diagnostics::log_debug!("Script line {lineno} failed: {reason}", lineno: lineno, reason: reason.as_str());
            handler(&format!("line {}: {}", lineno, reason));
        }
    }
    Ok(summary)
}
