// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Control-plane state of flow network segments (FNS).
//!
//! A [`RuleStore`] keeps the attachment points ("endpoints") known to the controller,
//! the segments they belong to and the flow rules installed on their behalf. A
//! [`Locator`] maps host hardware addresses to the endpoint where each host was seen.
//! [`FnsDb`] keeps both together.

#![deny(clippy::all, clippy::unwrap_used, clippy::expect_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod config;
mod display;
pub mod endpoint;
mod errors;
pub mod flowrule;
pub mod fnsdb;
pub mod key;
pub mod locator;
mod params;
pub mod rulesdb;
pub mod segment;

// re-exports
pub use config::{FnsConfig, LocationConfig, SegmentConfig};
pub use endpoint::{Endpoint, EndpointDesc};
pub use errors::{FnsError, LocatorError};
pub use flowrule::FlowRule;
pub use fnsdb::{FnsDb, SharedFnsDb};
pub use key::{EndpointKey, derive_key};
pub use locator::Locator;
pub use params::{RuleStoreParams, RuleStoreParamsBuilder};
pub use rulesdb::RuleStore;
pub use segment::{Segment, SegmentDesc, SegmentId};

use tracectl::trace_target;
trace_target!("fns", LevelFilter::INFO, &["fns"]);
