// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Command line of fnsctl

pub(crate) use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "fnsctl")]
#[command(version = "0.1")]
#[command(about = "Load a flow network segment database and show it", long_about = None)]
pub(crate) struct CmdArgs {
    #[arg(
        long,
        value_name = "FILE",
        help = "YAML file describing segments, their endpoints and known host locations"
    )]
    config: Option<PathBuf>,

    #[arg(
        long,
        default_value_t = false,
        help = "Show configurable tracing targets and exit"
    )]
    show_tracing_targets: bool,

    #[arg(
        long,
        value_name = "tracing configuration",
        help = "Tracing config string as comma-separated sequence of tag=level, with level one in [off,error,warn,info,debug,trace].
Passing default=level sets the default log-level.
Passing all=level allows setting the log-level of all targets to level.
E.g. default=error,fns=debug"
    )]
    tracing: Option<String>,
}

impl CmdArgs {
    pub(crate) fn config(&self) -> Option<&PathBuf> {
        self.config.as_ref()
    }
    pub(crate) fn show_tracing_targets(&self) -> bool {
        self.show_tracing_targets
    }
    pub(crate) fn tracing(&self) -> Option<&str> {
        self.tracing.as_deref()
    }
}
