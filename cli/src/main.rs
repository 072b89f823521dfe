// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! fnsctl: provision a flow network segment database from a YAML file and dump it.

#![deny(clippy::all, clippy::pedantic)]

mod args;

use crate::args::{CmdArgs, Parser};
use fns::{FnsConfig, FnsDb, FnsError, RuleStoreParams};
use std::process::ExitCode;
use tracectl::{get_trace_ctl, trace_target};
use tracing::{error, info};

trace_target!("fnsctl", LevelFilter::INFO, &["fns"]);

fn load(args: &CmdArgs) -> Result<FnsDb, FnsError> {
    let mut db = FnsDb::new(&RuleStoreParams::default());
    if let Some(path) = args.config() {
        let config = FnsConfig::load(path)?;
        db.apply(&config)?;
        db.store().check_consistency()?;
    }
    Ok(db)
}

fn main() -> ExitCode {
    let args = CmdArgs::parse();
    let tctl = get_trace_ctl();
    if let Some(tracing) = args.tracing()
        && let Err(e) = tctl.setup_from_string(tracing)
    {
        eprintln!("Invalid tracing configuration: {e}");
        return ExitCode::FAILURE;
    }
    if args.show_tracing_targets() {
        print!("{}", tctl.dump());
        return ExitCode::SUCCESS;
    }

    match load(&args) {
        Ok(db) => {
            info!("FNS database loaded");
            print!("{db}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to load FNS database: {e}");
            eprintln!("fnsctl: {e}");
            ExitCode::FAILURE
        }
    }
}
