// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Switch and port identifiers.

use core::fmt::Display;
use std::fmt::Formatter;

/// The 64-bit identifier of a switch (OpenFlow datapath id).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(any(test, feature = "bolero"), derive(bolero::TypeGenerator))]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct DatapathId(u64);

impl DatapathId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl From<u64> for DatapathId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<DatapathId> for u64 {
    fn from(id: DatapathId) -> u64 {
        id.0
    }
}

impl Display for DatapathId {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

/// A switch port number.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(any(test, feature = "bolero"), derive(bolero::TypeGenerator))]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct PortNo(u32);

impl PortNo {
    #[must_use]
    pub const fn new(port: u32) -> Self {
        Self(port)
    }
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl From<u32> for PortNo {
    fn from(port: u32) -> Self {
        Self(port)
    }
}

impl From<PortNo> for u32 {
    fn from(port: PortNo) -> u32 {
        port.0
    }
}

impl Display for PortNo {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}
