// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Records of flow rules installed on switches.

use net::flowmatch::FlowMatch;
use net::switch::DatapathId;
use std::fmt::Display;

/// A flow rule installed on a switch: the switch it lives on and the match it was installed
/// with. A `FlowRule` is a plain record and never changes after creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FlowRule {
    switch: DatapathId,
    matching: FlowMatch,
}

impl FlowRule {
    #[must_use]
    pub fn new(switch: DatapathId, matching: FlowMatch) -> Self {
        Self { switch, matching }
    }
    #[must_use]
    pub fn switch(&self) -> DatapathId {
        self.switch
    }
    #[must_use]
    pub fn matching(&self) -> &FlowMatch {
        &self.matching
    }
}

impl Display for FlowRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sw {} match {}", self.switch, self.matching)
    }
}
