// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::FsCommand;
use crate::common::MountArgs;

/// Mount a counterfs instance in-process and operate on it
#[derive(Parser, Debug)]
#[command(author, version, long_about = None)]
#[command(name = "cfs")]
pub struct Cli {
    #[command(flatten)]
    pub mount: MountArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(flatten)]
    Fs(FsCommand),
    /// Run newline-separated commands against one mount
    Script {
        /// Script file; standard input when omitted
        #[arg(value_name = "FILE")]
        script: Option<PathBuf>,
    },
    /// Race concurrent writers and a reader on the counter file
    Stress {
        #[arg(long, default_value_t = 8)]
        writers: usize,
        #[arg(long, default_value_t = 100)]
        rounds: usize,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}
