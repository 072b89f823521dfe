// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Identity of attachment points.
//!
//! An endpoint is identified by a 64-bit key derived from its (switch, port, vlan, label)
//! tuple. The key is the only deduplication mechanism of the store: two descriptors that
//! derive the same key denote the same attachment point.

use ahash::RandomState;
use net::mpls::Label;
use net::switch::{DatapathId, PortNo};
use net::vlan::VlanTag;
use std::fmt::Display;
use std::hash::{BuildHasher, Hash};

/// Fixed hasher seeds, so that keys are repeatable across runs of the same build.
const KEY_SEEDS: [u64; 4] = [
    0x243f_6a88_85a3_08d3,
    0x1319_8a2e_0370_7344,
    0xa409_3822_299f_31d0,
    0x082e_fa98_ec4e_6c89,
];

/// The hasher all keys are derived with
static KEY_HASHER: RandomState =
    RandomState::with_seeds(KEY_SEEDS[0], KEY_SEEDS[1], KEY_SEEDS[2], KEY_SEEDS[3]);

/// 2^64 / golden ratio
const GOLDEN: u64 = 0x9e37_79b9_7f4a_7c15;

/// The identity key of an [`Endpoint`](crate::endpoint::Endpoint).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct EndpointKey(u64);

impl EndpointKey {
    /// Wrap a raw key value, e.g. one previously obtained from [`EndpointKey::as_u64`].
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl Display for EndpointKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

/// Fold `value` into `seed`.
fn hash_combine<T: Hash>(state: &RandomState, seed: u64, value: T) -> u64 {
    seed ^ state
        .hash_one(value)
        .wrapping_add(GOLDEN)
        .wrapping_add(seed << 6)
        .wrapping_add(seed >> 2)
}

/// Derive the identity key of the attachment point (`switch`, `port`, `vlan`, `label`).
///
/// Fields are folded in the order port, switch, vlan, label. Endpoints without a label use
/// [`Label::NONE`], which is the same value as an explicit label `0`.
#[must_use]
pub fn derive_key(switch: DatapathId, port: PortNo, vlan: VlanTag, label: Label) -> EndpointKey {
    let mut seed = 0;
    seed = hash_combine(&KEY_HASHER, seed, port.as_u32());
    seed = hash_combine(&KEY_HASHER, seed, switch.as_u64());
    seed = hash_combine(&KEY_HASHER, seed, vlan.as_u16());
    seed = hash_combine(&KEY_HASHER, seed, label.as_u32());
    EndpointKey(seed)
}
