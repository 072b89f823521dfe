// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Endpoints (attachment points) and their installed-rule history.

use crate::flowrule::FlowRule;
use crate::key::{EndpointKey, derive_key};
use crate::segment::SegmentId;
use net::mpls::Label;
use net::switch::{DatapathId, PortNo};
use net::vlan::VlanTag;
use serde::{Deserialize, Serialize};

/// Description of an attachment point, as provided by the topology layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EndpointDesc {
    pub switch: DatapathId,
    pub port: PortNo,
    #[serde(default)]
    pub vlan: VlanTag,
    #[serde(default)]
    pub label: Label,
}

impl EndpointDesc {
    /// Describe an unlabelled attachment point.
    #[must_use]
    pub fn new(switch: DatapathId, port: PortNo, vlan: VlanTag) -> Self {
        Self {
            switch,
            port,
            vlan,
            label: Label::NONE,
        }
    }
    #[must_use]
    pub fn with_label(mut self, label: Label) -> Self {
        self.label = label;
        self
    }
    /// The identity key of the described attachment point
    #[must_use]
    pub fn key(&self) -> EndpointKey {
        derive_key(self.switch, self.port, self.vlan, self.label)
    }
}

/// An attachment point of a segment on a switch.
///
/// Endpoints live in the [`RuleStore`](crate::rulesdb::RuleStore), which hands out their
/// [`EndpointKey`] to segments and to the locator. An endpoint keeps the rules installed
/// on its behalf as a stack: the last rule installed is the first one to be removed.
#[derive(Debug, PartialEq, Eq)]
pub struct Endpoint {
    desc: EndpointDesc,
    key: EndpointKey,
    pub(crate) owner: Option<SegmentId>,
    installed: Vec<FlowRule>,
}

impl Endpoint {
    pub(crate) fn new(desc: EndpointDesc, owner: SegmentId) -> Self {
        Self {
            key: desc.key(),
            desc,
            owner: Some(owner),
            installed: Vec::new(),
        }
    }

    #[must_use]
    pub fn key(&self) -> EndpointKey {
        self.key
    }
    #[must_use]
    pub fn desc(&self) -> &EndpointDesc {
        &self.desc
    }
    #[must_use]
    pub fn switch(&self) -> DatapathId {
        self.desc.switch
    }
    #[must_use]
    pub fn port(&self) -> PortNo {
        self.desc.port
    }
    #[must_use]
    pub fn vlan(&self) -> VlanTag {
        self.desc.vlan
    }
    #[must_use]
    pub fn label(&self) -> Label {
        self.desc.label
    }
    /// The segment this endpoint belongs to, if any
    #[must_use]
    pub fn owner(&self) -> Option<SegmentId> {
        self.owner
    }

    /// Record a rule installed for this endpoint. The same rule may be recorded twice.
    pub fn add_rule(&mut self, rule: FlowRule) {
        self.installed.push(rule);
    }

    #[must_use]
    pub fn installed_count(&self) -> usize {
        self.installed.len()
    }

    /// The most recently installed rule.
    ///
    /// # Panics
    ///
    /// Panics if no rule is installed. Use [`Endpoint::try_last_installed`] when the stack
    /// may legitimately be empty.
    #[must_use]
    pub fn last_installed(&self) -> &FlowRule {
        match self.installed.last() {
            Some(rule) => rule,
            None => panic!("Endpoint {} has no installed rules", self.key),
        }
    }

    /// Forget the most recently installed rule and return it.
    ///
    /// # Panics
    ///
    /// Panics if no rule is installed.
    pub fn pop_installed(&mut self) -> FlowRule {
        match self.installed.pop() {
            Some(rule) => rule,
            None => panic!("Endpoint {} has no installed rules to pop", self.key),
        }
    }

    #[must_use]
    pub fn try_last_installed(&self) -> Option<&FlowRule> {
        self.installed.last()
    }

    pub fn try_pop_installed(&mut self) -> Option<FlowRule> {
        self.installed.pop()
    }

    /// Installed rules, oldest first
    pub fn installed(&self) -> impl Iterator<Item = &FlowRule> {
        self.installed.iter()
    }

    /// Remove all installed rules, returning them in the order they should be uninstalled
    /// (most recent first).
    pub fn drain_installed(&mut self) -> Vec<FlowRule> {
        let mut rules = std::mem::take(&mut self.installed);
        rules.reverse();
        rules
    }
}
