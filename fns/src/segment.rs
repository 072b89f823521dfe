// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Flow network segments: isolated broadcast domains made of endpoints.

use crate::key::EndpointKey;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// The uuid of a [`Segment`]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct SegmentId(u64);

impl SegmentId {
    #[must_use]
    pub const fn new(uuid: u64) -> Self {
        Self(uuid)
    }
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl From<u64> for SegmentId {
    fn from(uuid: u64) -> Self {
        Self(uuid)
    }
}

impl Display for SegmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Description of a segment to create
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SegmentDesc {
    pub uuid: SegmentId,
    #[serde(default)]
    pub name: Option<String>,
}

impl SegmentDesc {
    #[must_use]
    pub fn new(uuid: SegmentId) -> Self {
        Self { uuid, name: None }
    }
    #[must_use]
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_owned());
        self
    }
}

/// A segment and its member endpoints, in the order they joined.
///
/// Members are referred to by key; the endpoints themselves live in the
/// [`RuleStore`](crate::rulesdb::RuleStore), which is the only way to change membership.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    uuid: SegmentId,
    name: Option<String>,
    members: Vec<EndpointKey>,
}

impl Segment {
    pub(crate) fn new(desc: &SegmentDesc) -> Self {
        Self {
            uuid: desc.uuid,
            name: desc.name.clone(),
            members: Vec::new(),
        }
    }

    #[must_use]
    pub fn uuid(&self) -> SegmentId {
        self.uuid
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Append an endpoint. No duplicate check: callers dedup by key before.
    pub(crate) fn add_endpoint(&mut self, key: EndpointKey) {
        self.members.push(key);
    }

    /// Remove every occurrence of `key`, returning how many were removed.
    pub(crate) fn remove_endpoint(&mut self, key: EndpointKey) -> usize {
        let before = self.members.len();
        self.members.retain(|member| *member != key);
        before - self.members.len()
    }

    #[must_use]
    pub fn num_endpoints(&self) -> usize {
        self.members.len()
    }

    /// The key of the member at position `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn get_endpoint(&self, index: usize) -> EndpointKey {
        self.members[index]
    }

    #[must_use]
    pub fn contains(&self, key: EndpointKey) -> bool {
        self.members.contains(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EndpointKey> {
        self.members.iter()
    }
}
