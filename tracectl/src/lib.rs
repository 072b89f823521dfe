// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Crate to declare tracing targets and control tracing dynamically at runtime

pub mod control;
pub mod targets;

// re-exports
pub use control::{TraceCtlError, TracingControl, get_trace_ctl};
pub use tracing_subscriber::filter::LevelFilter;

// used by trace_target!
#[doc(hidden)]
pub mod __private {
    pub use linkme;
}
