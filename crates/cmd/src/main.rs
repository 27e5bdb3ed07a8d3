// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::io::{self, Write};

use anyhow::{Result, bail};
use clap::Parser;

use cmd::cli::{Cli, Commands};
use cmd::{Session, script_command, script_source, stress_command};

#[tokio::main]
async fn main() -> Result<()> {
    diagnostics::init();

    let cli = Cli::parse();
    let session = Session::open(&cli.mount)?;

    let mut stdout = io::stdout().lock();
    let mut out = |line: &str| {
        _ = writeln!(stdout, "{}", line);
    };

    match &cli.command {
        Commands::Fs(command) => command.run(session.mount(), &mut out)?,
        Commands::Script { script } => {
            let input = script_source(script.as_deref())?;
            let summary = script_command(session.mount(), input, &mut out)?;
            if summary.failed > 0 {
                bail!(
                    "{} of {} script commands failed",
                    summary.failed,
                    summary.executed
                );
            }
        }
        Commands::Stress {
            writers,
            rounds,
            json,
        } => {
            let path = cli.mount.counter_path();
            let sb = session.mount().superblock().clone();
            let report = stress_command(sb, &path, *writers, *rounds).await?;
            if *json {
                out(&serde_json::to_string_pretty(&report)?);
            } else {
                out(&format!(
                    "{} writers x {} rounds, {} reads checked, final value {}",
                    report.writers, report.rounds, report.reads, report.final_value
                ));
            }
        }
    }

    _ = session.close()?;
    Ok(())
}
