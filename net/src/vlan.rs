// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! VLAN tags as carried in a flow match.

use core::fmt::Display;
use std::fmt::Formatter;

/// The VLAN tag field of a flow match.
///
/// Unlike a validated VLAN identifier, a `VlanTag` is the raw 16-bit value a switch reports for
/// an attachment point. [`VlanTag::NONE`] (`0xffff`) means "untagged", following OpenFlow 1.0.
/// Any value is accepted: the tag only participates in the identity of an attachment point.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(any(test, feature = "bolero"), derive(bolero::TypeGenerator))]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct VlanTag(u16);

impl VlanTag {
    /// Tag value used by switches for untagged traffic.
    pub const NONE: VlanTag = VlanTag(0xffff);
    /// Mask of the 12-bit VLAN identifier.
    pub const VID_MASK: u16 = 0x0fff;

    /// Create a [`VlanTag`] from its raw value.
    #[must_use]
    pub const fn new(raw: u16) -> VlanTag {
        VlanTag(raw)
    }

    /// Get the raw value of the tag.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    /// True if this tag denotes untagged traffic.
    #[must_use]
    pub const fn is_untagged(self) -> bool {
        self.0 == VlanTag::NONE.0
    }

    /// The 12-bit VLAN identifier, if tagged.
    #[must_use]
    pub const fn vid(self) -> Option<u16> {
        if self.is_untagged() {
            None
        } else {
            Some(self.0 & VlanTag::VID_MASK)
        }
    }
}

impl Default for VlanTag {
    fn default() -> Self {
        VlanTag::NONE
    }
}

impl From<u16> for VlanTag {
    fn from(raw: u16) -> Self {
        VlanTag(raw)
    }
}

impl From<VlanTag> for u16 {
    fn from(tag: VlanTag) -> u16 {
        tag.as_u16()
    }
}

impl Display for VlanTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self.vid() {
            Some(vid) => write!(f, "{vid}"),
            None => write!(f, "untagged"),
        }
    }
}
