// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

#![forbid(unsafe_code)] // Validation logic should always be strictly safe
#![deny(clippy::all, clippy::pedantic)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(clippy::missing_errors_doc)] // documented on the error types

//! Network value types shared by the FNS control plane: hardware addresses, VLAN tags,
//! MPLS labels, switch identifiers and opaque flow matches.

pub mod eth;
pub mod flowmatch;
pub mod mpls;
pub mod switch;
pub mod vlan;
