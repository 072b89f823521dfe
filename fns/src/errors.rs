// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The error results used by this library.

use crate::key::EndpointKey;
use crate::segment::SegmentId;
use net::eth::mac::Mac;
use thiserror::Error;

/// Reasons for the [`Locator`](crate::locator::Locator) to refuse an address
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocatorError {
    #[error("{0} is the zero address")]
    Zero(Mac),

    #[error("{0} is the broadcast address")]
    Broadcast(Mac),

    #[error("{0} is a multicast address")]
    Multicast(Mac),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FnsError {
    #[error("An endpoint with key {0} already exists")]
    EndpointExists(EndpointKey),

    #[error("No endpoint with key {0}")]
    NoSuchEndpoint(EndpointKey),

    #[error("A segment with uuid {0} already exists")]
    SegmentExists(SegmentId),

    #[error("No segment with uuid {0}")]
    NoSuchSegment(SegmentId),

    #[error("Endpoint {0} already belongs to segment {1}")]
    EndpointOwned(EndpointKey, SegmentId),

    #[error("Invalid address: {0}")]
    InvalidAddress(#[from] LocatorError),

    #[error("Inconsistent state: {0}")]
    Inconsistent(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}
