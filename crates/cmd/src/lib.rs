// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

pub mod cli;
pub mod commands;
pub mod common;

pub use commands::FsCommand;
pub use commands::cat::cat_command;
pub use commands::script::{ScriptSummary, script_command, script_source};
pub use commands::stat::stat_command;
pub use commands::stress::{StressReport, stress_command};
pub use commands::tree::tree_command;
pub use commands::write::write_command;
pub use common::{MountArgs, Session};
