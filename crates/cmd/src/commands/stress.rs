// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use anyhow::{Result, anyhow};
use serde::Serialize;
use tokio::task::JoinSet;
use vfs::Superblock;

use super::write::write_command;

/// What a stress run observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StressReport {
    pub writers: usize,
    pub rounds: usize,
    pub reads: usize,
    pub final_value: i32,
}

fn value_for(writer: usize) -> i32 {
    i32::try_from(writer + 1).unwrap_or(i32::MAX)
}

fn read_value(sb: &Superblock, path: &str) -> Result<i32> {
    let mut file = sb.open(path)?;
    let bytes = file.read_to_end()?;
    file.close()?;
    let text = std::str::from_utf8(&bytes)?;
    let digits = text
        .strip_suffix('\n')
        .ok_or_else(|| anyhow!("counter text {:?} is not newline terminated", text))?;
    Ok(digits.parse()?)
}

/// Race `writers` blocking tasks, each storing its own value `rounds`
/// times, against a reader that checks every value it sees is one some
/// writer stored (or the value before the run).
pub async fn stress_command(
    sb: Arc<Superblock>,
    path: &str,
    writers: usize,
    rounds: usize,
) -> Result<StressReport> {
    let before = read_value(&sb, path)?;
    let mut allowed: Vec<i32> = (0..writers).map(value_for).collect();
    allowed.push(before);

    let mut tasks = JoinSet::new();
    for writer in 0..writers {
        let (sb, path) = (sb.clone(), path.to_string());
        _ = tasks.spawn_blocking(move || -> Result<usize> {
            let text = value_for(writer).to_string();
            for _ in 0..rounds {
                _ = write_command(&sb, &path, &text, 0)?;
            }
            Ok(0)
        });
    }
    {
        let (sb, path, allowed) = (sb.clone(), path.to_string(), allowed.clone());
        _ = tasks.spawn_blocking(move || -> Result<usize> {
            let mut reads = 0;
            for _ in 0..rounds.max(1) {
                let value = read_value(&sb, &path)?;
                if !allowed.contains(&value) {
                    return Err(anyhow!("read {} which no writer stored", value));
                }
                reads += 1;
            }
            Ok(reads)
        });
    }

    let mut reads = 0;
    while let Some(joined) = tasks.join_next().await {
        reads += joined??;
    }

    let final_value = read_value(&sb, path)?;
    if !allowed.contains(&final_value) {
        return Err(anyhow!("final value {} was never stored", final_value));
    }
    diagnostics::log_info!("Stress finished with {final_value}", final_value: final_value);
    Ok(StressReport {
        writers,
        rounds,
        reads,
        final_value,
    })
}
