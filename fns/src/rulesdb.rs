// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The rule store: the registry of endpoints and the segments they belong to.
//! The store owns every [`Endpoint`]. Segments refer to their members by [`EndpointKey`].

use crate::endpoint::{Endpoint, EndpointDesc};
use crate::errors::FnsError;
use crate::key::EndpointKey;
use crate::params::RuleStoreParams;
use crate::segment::{Segment, SegmentDesc, SegmentId};
use ahash::RandomState;
use std::collections::HashMap;

#[allow(unused)]
use tracing::{debug, error, warn};

pub struct RuleStore {
    name: String,
    endpoints: HashMap<EndpointKey, Endpoint, RandomState>,
    segments: HashMap<SegmentId, Segment, RandomState>,
}

impl Default for RuleStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleStore {
    //////////////////////////////////////////////////////////////////
    /// Create an empty [`RuleStore`] with default parameters
    //////////////////////////////////////////////////////////////////
    #[must_use]
    pub fn new() -> Self {
        Self::with_params(&RuleStoreParams::default())
    }

    //////////////////////////////////////////////////////////////////
    /// Create an empty [`RuleStore`] sized after the given [`RuleStoreParams`]
    //////////////////////////////////////////////////////////////////
    #[must_use]
    pub fn with_params(params: &RuleStoreParams) -> Self {
        Self {
            name: params.name.clone(),
            endpoints: HashMap::with_capacity_and_hasher(
                params.endpoint_capacity,
                RandomState::with_seed(0),
            ),
            segments: HashMap::with_capacity_and_hasher(
                params.segment_capacity,
                RandomState::with_seed(0),
            ),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    //////////////////////////////////////////////////////////////////
    /// Create a [`Segment`] and register it. If a segment with the same
    /// uuid exists, it is replaced and its members become unowned.
    //////////////////////////////////////////////////////////////////
    pub fn add_segment(&mut self, desc: &SegmentDesc) -> &mut Segment {
        let uuid = desc.uuid;
        if let Some(old) = self.segments.remove(&uuid) {
            warn!(
                "Replacing segment {uuid}: its {} endpoint(s) are left unowned",
                old.num_endpoints()
            );
            self.release_members(&old);
        }
        debug!("Added segment {uuid}");
        self.segments.entry(uuid).insert_entry(Segment::new(desc)).into_mut()
    }

    #[must_use]
    pub fn get_segment(&self, uuid: SegmentId) -> Option<&Segment> {
        self.segments.get(&uuid)
    }

    //////////////////////////////////////////////////////////////////
    /// Remove the [`Segment`] with the given uuid. Its members stay registered
    /// but no longer have an owner.
    //////////////////////////////////////////////////////////////////
    pub fn remove_segment(&mut self, uuid: SegmentId) -> Option<Segment> {
        let segment = self.segments.remove(&uuid)?;
        self.release_members(&segment);
        debug!(
            "Removed segment {uuid} with {} endpoint(s)",
            segment.num_endpoints()
        );
        Some(segment)
    }

    /* clear the owner of the members of a segment that left the store */
    fn release_members(&mut self, segment: &Segment) {
        for key in segment.iter() {
            if let Some(endpoint) = self.endpoints.get_mut(key)
                && endpoint.owner == Some(segment.uuid())
            {
                endpoint.owner = None;
            }
        }
    }

    //////////////////////////////////////////////////////////////////
    /// Create an [`Endpoint`] from a descriptor and make it a member of the
    /// segment with the given uuid. Fails if the segment does not exist or
    /// if an endpoint with the same key is already registered. The store is
    /// left untouched on failure.
    //////////////////////////////////////////////////////////////////
    pub fn add_endpoint(
        &mut self,
        desc: &EndpointDesc,
        uuid: SegmentId,
    ) -> Result<EndpointKey, FnsError> {
        let key = desc.key();
        let Some(segment) = self.segments.get_mut(&uuid) else {
            error!("Can't add endpoint {key}: segment {uuid} does not exist");
            return Err(FnsError::NoSuchSegment(uuid));
        };
        if self.endpoints.contains_key(&key) {
            error!(
                "Can't add endpoint sw {} port {} vlan {}: key {key} is already registered",
                desc.switch, desc.port, desc.vlan
            );
            return Err(FnsError::EndpointExists(key));
        }
        segment.add_endpoint(key);
        self.endpoints.insert(key, Endpoint::new(*desc, uuid));
        debug!(
            "Added endpoint {key} (sw {} port {} vlan {} label {}) to segment {uuid}",
            desc.switch, desc.port, desc.vlan, desc.label
        );
        Ok(key)
    }

    #[must_use]
    pub fn get_endpoint(&self, key: EndpointKey) -> Option<&Endpoint> {
        self.endpoints.get(&key)
    }

    #[must_use]
    pub fn get_endpoint_mut(&mut self, key: EndpointKey) -> Option<&mut Endpoint> {
        self.endpoints.get_mut(&key)
    }

    //////////////////////////////////////////////////////////////////
    /// Remove an [`Endpoint`] from the store. The endpoint is first detached
    /// from the segment that owns it, if any. The removed endpoint is returned
    /// together with the rules that are still installed for it.
    //////////////////////////////////////////////////////////////////
    pub fn remove_endpoint(&mut self, key: EndpointKey) -> Option<Endpoint> {
        let owner = self.endpoints.get(&key)?.owner();
        if let Some(uuid) = owner
            && let Some(segment) = self.segments.get_mut(&uuid)
        {
            segment.remove_endpoint(key);
        }
        let endpoint = self.endpoints.remove(&key)?;
        if endpoint.installed_count() > 0 {
            warn!(
                "Removed endpoint {key} with {} rule(s) still installed",
                endpoint.installed_count()
            );
        } else {
            debug!("Removed endpoint {key}");
        }
        Some(endpoint)
    }

    //////////////////////////////////////////////////////////////////
    /// Make an unowned, registered endpoint a member of a segment.
    /// Attaching an endpoint to the segment that already owns it is a no-op.
    //////////////////////////////////////////////////////////////////
    pub fn attach_endpoint(&mut self, uuid: SegmentId, key: EndpointKey) -> Result<(), FnsError> {
        let Some(endpoint) = self.endpoints.get_mut(&key) else {
            return Err(FnsError::NoSuchEndpoint(key));
        };
        let Some(segment) = self.segments.get_mut(&uuid) else {
            return Err(FnsError::NoSuchSegment(uuid));
        };
        match endpoint.owner {
            Some(owner) if owner == uuid => Ok(()),
            Some(owner) => {
                error!("Can't attach endpoint {key} to segment {uuid}: owned by {owner}");
                Err(FnsError::EndpointOwned(key, owner))
            }
            None => {
                endpoint.owner = Some(uuid);
                segment.add_endpoint(key);
                debug!("Attached endpoint {key} to segment {uuid}");
                Ok(())
            }
        }
    }

    //////////////////////////////////////////////////////////////////
    /// Remove an endpoint from the members of a segment. The endpoint stays
    /// registered. Detaching a non-member succeeds and changes nothing.
    //////////////////////////////////////////////////////////////////
    pub fn detach_endpoint(&mut self, uuid: SegmentId, key: EndpointKey) -> Result<(), FnsError> {
        let Some(segment) = self.segments.get_mut(&uuid) else {
            return Err(FnsError::NoSuchSegment(uuid));
        };
        let removed = segment.remove_endpoint(key);
        if let Some(endpoint) = self.endpoints.get_mut(&key)
            && endpoint.owner == Some(uuid)
        {
            endpoint.owner = None;
        }
        if removed > 0 {
            debug!("Detached endpoint {key} from segment {uuid}");
        }
        Ok(())
    }

    pub fn endpoints(&self) -> impl Iterator<Item = &Endpoint> {
        self.endpoints.values()
    }

    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.values()
    }

    #[must_use]
    pub fn num_endpoints(&self) -> usize {
        self.endpoints.len()
    }

    #[must_use]
    pub fn num_segments(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty() && self.segments.is_empty()
    }

    //////////////////////////////////////////////////////////////////
    /// Check that segments and endpoints refer to each other: every member
    /// of a segment is registered, owned by that segment and listed once,
    /// and every owned endpoint is listed by its owner.
    //////////////////////////////////////////////////////////////////
    pub fn check_consistency(&self) -> Result<(), FnsError> {
        for segment in self.segments.values() {
            let uuid = segment.uuid();
            for (index, key) in segment.iter().enumerate() {
                let Some(endpoint) = self.endpoints.get(key) else {
                    return Err(FnsError::Inconsistent(format!(
                        "segment {uuid} lists unknown endpoint {key}"
                    )));
                };
                if endpoint.owner() != Some(uuid) {
                    return Err(FnsError::Inconsistent(format!(
                        "segment {uuid} lists endpoint {key} owned by {:?}",
                        endpoint.owner()
                    )));
                }
                if segment.iter().skip(index + 1).any(|other| other == key) {
                    return Err(FnsError::Inconsistent(format!(
                        "segment {uuid} lists endpoint {key} more than once"
                    )));
                }
            }
        }
        for endpoint in self.endpoints.values() {
            if let Some(uuid) = endpoint.owner() {
                let listed = self
                    .segments
                    .get(&uuid)
                    .is_some_and(|segment| segment.contains(endpoint.key()));
                if !listed {
                    return Err(FnsError::Inconsistent(format!(
                        "endpoint {} is owned by segment {uuid}, which does not list it",
                        endpoint.key()
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::tests::rule;
    use net::mpls::Label;
    use net::switch::{DatapathId, PortNo};
    use net::vlan::VlanTag;
    use tracing_test::traced_test;

    const S100: SegmentId = SegmentId::new(100);
    const S200: SegmentId = SegmentId::new(200);

    fn desc(sw: u64, port: u32, vlan: u16) -> EndpointDesc {
        EndpointDesc::new(DatapathId::new(sw), PortNo::new(port), VlanTag::new(vlan))
    }

    fn store_with_segments() -> RuleStore {
        let mut store = RuleStore::new();
        store.add_segment(&SegmentDesc::new(S100).with_name("blue"));
        store.add_segment(&SegmentDesc::new(S200).with_name("red"));
        store
    }

    #[test]
    #[traced_test]
    fn duplicate_endpoint_is_rejected() {
        let mut store = store_with_segments();
        let k1 = store.add_endpoint(&desc(1, 2, 10), S100).unwrap();
        assert_eq!(store.get_segment(S100).unwrap().num_endpoints(), 1);

        let dup = store.add_endpoint(&desc(1, 2, 10), S100);
        assert_eq!(dup, Err(FnsError::EndpointExists(k1)));
        assert_eq!(store.get_segment(S100).unwrap().num_endpoints(), 1);
        assert_eq!(store.num_endpoints(), 1);

        // same key in another segment is a duplicate too
        let dup = store.add_endpoint(&desc(1, 2, 10), S200);
        assert_eq!(dup, Err(FnsError::EndpointExists(k1)));
        assert_eq!(store.get_segment(S200).unwrap().num_endpoints(), 0);
        assert!(logs_contain("is already registered"));
        store.check_consistency().unwrap();
    }

    #[test]
    #[traced_test]
    fn explicit_label_zero_is_a_duplicate() {
        let mut store = store_with_segments();
        store.add_endpoint(&desc(1, 2, 10), S100).unwrap();
        let labelled = desc(1, 2, 10).with_label(Label::new(0).unwrap());
        assert!(matches!(
            store.add_endpoint(&labelled, S100),
            Err(FnsError::EndpointExists(_))
        ));
        let labelled = desc(1, 2, 10).with_label(Label::new(5).unwrap());
        assert!(store.add_endpoint(&labelled, S100).is_ok());
        assert_eq!(store.get_segment(S100).unwrap().num_endpoints(), 2);
    }

    #[test]
    #[traced_test]
    fn added_endpoint_matches_descriptor() {
        let mut store = store_with_segments();
        let d = desc(7, 3, 20).with_label(Label::new(42).unwrap());
        let key = store.add_endpoint(&d, S200).unwrap();
        let ep = store.get_endpoint(key).unwrap();
        assert_eq!(ep.desc(), &d);
        assert_eq!(ep.key(), key);
        assert_eq!(ep.owner(), Some(S200));
        let segment = store.get_segment(S200).unwrap();
        assert_eq!(segment.num_endpoints(), 1);
        assert_eq!(segment.get_endpoint(0), key);
    }

    #[test]
    #[traced_test]
    fn unknown_segment_is_rejected() {
        let mut store = store_with_segments();
        let missing = SegmentId::new(999);
        assert_eq!(
            store.add_endpoint(&desc(1, 1, 1), missing),
            Err(FnsError::NoSuchSegment(missing))
        );
        assert_eq!(store.num_endpoints(), 0);
    }

    #[test]
    #[traced_test]
    fn remove_endpoint_cascades() {
        let mut store = store_with_segments();
        let k1 = store.add_endpoint(&desc(1, 2, 10), S100).unwrap();
        let k2 = store.add_endpoint(&desc(1, 3, 10), S100).unwrap();
        store.get_endpoint_mut(k1).unwrap().add_rule(rule(1, 1));

        let removed = store.remove_endpoint(k1).unwrap();
        assert_eq!(removed.installed_count(), 1);
        assert!(store.get_endpoint(k1).is_none());
        let segment = store.get_segment(S100).unwrap();
        assert_eq!(segment.num_endpoints(), 1);
        assert!(!segment.contains(k1));
        assert!(segment.contains(k2));
        assert!(store.remove_endpoint(k1).is_none());
        assert!(logs_contain("still installed"));
        store.check_consistency().unwrap();
    }

    #[test]
    #[traced_test]
    fn remove_segment_releases_members() {
        let mut store = store_with_segments();
        let k1 = store.add_endpoint(&desc(1, 2, 10), S100).unwrap();
        let removed = store.remove_segment(S100).unwrap();
        assert_eq!(removed.num_endpoints(), 1);
        assert!(store.get_segment(S100).is_none());
        assert_eq!(store.get_endpoint(k1).unwrap().owner(), None);
        assert!(store.remove_segment(S100).is_none());
        store.check_consistency().unwrap();

        // the released endpoint can join another segment
        store.attach_endpoint(S200, k1).unwrap();
        assert_eq!(store.get_endpoint(k1).unwrap().owner(), Some(S200));
        assert!(store.get_segment(S200).unwrap().contains(k1));
        store.check_consistency().unwrap();
    }

    #[test]
    #[traced_test]
    fn replacing_a_segment_releases_members() {
        let mut store = store_with_segments();
        let k1 = store.add_endpoint(&desc(1, 2, 10), S100).unwrap();
        let segment = store.add_segment(&SegmentDesc::new(S100).with_name("green"));
        assert_eq!(segment.num_endpoints(), 0);
        assert_eq!(segment.name(), Some("green"));
        assert_eq!(store.num_segments(), 2);
        assert_eq!(store.get_endpoint(k1).unwrap().owner(), None);
        assert!(logs_contain("Replacing segment 100"));
        store.check_consistency().unwrap();
    }

    #[test]
    #[traced_test]
    fn attach_and_detach() {
        let mut store = store_with_segments();
        let k1 = store.add_endpoint(&desc(1, 2, 10), S100).unwrap();
        let ghost = EndpointKey::from_raw(0xdead);

        assert_eq!(store.attach_endpoint(S100, k1), Ok(()));
        assert_eq!(store.get_segment(S100).unwrap().num_endpoints(), 1);
        assert_eq!(
            store.attach_endpoint(S200, k1),
            Err(FnsError::EndpointOwned(k1, S100))
        );
        assert_eq!(
            store.attach_endpoint(S200, ghost),
            Err(FnsError::NoSuchEndpoint(ghost))
        );
        assert_eq!(
            store.attach_endpoint(SegmentId::new(1), k1),
            Err(FnsError::NoSuchSegment(SegmentId::new(1)))
        );

        // detaching from a segment that does not list it changes nothing
        store.detach_endpoint(S200, k1).unwrap();
        assert_eq!(store.get_endpoint(k1).unwrap().owner(), Some(S100));

        store.detach_endpoint(S100, k1).unwrap();
        assert_eq!(store.get_endpoint(k1).unwrap().owner(), None);
        assert_eq!(store.get_segment(S100).unwrap().num_endpoints(), 0);
        assert_eq!(store.num_endpoints(), 1);
        store.check_consistency().unwrap();
    }

    #[test]
    #[traced_test]
    fn rule_stack_through_the_store() {
        let mut store = store_with_segments();
        let k1 = store.add_endpoint(&desc(1, 2, 10), S100).unwrap();
        let (r1, r2) = (rule(1, 1), rule(1, 2));
        let ep = store.get_endpoint_mut(k1).unwrap();
        ep.add_rule(r1);
        ep.add_rule(r2);
        assert_eq!(ep.installed_count(), 2);
        assert_eq!(ep.last_installed(), &r2);
        ep.pop_installed();
        assert_eq!(store.get_endpoint(k1).unwrap().installed_count(), 1);
    }

    #[test]
    fn inconsistency_is_detected() {
        let mut store = store_with_segments();
        let k1 = store.add_endpoint(&desc(1, 2, 10), S100).unwrap();
        store.get_endpoint_mut(k1).unwrap().owner = Some(S200);
        assert!(matches!(
            store.check_consistency(),
            Err(FnsError::Inconsistent(_))
        ));
    }

    #[test]
    fn store_is_sized_by_params() {
        let params = crate::params::RuleStoreParamsBuilder::default()
            .name("lab")
            .build()
            .unwrap();
        let store = RuleStore::with_params(&params);
        assert_eq!(store.name(), "lab");
        assert!(store.is_empty());
        assert_eq!(store.endpoints().count(), 0);
        assert_eq!(store.segments().count(), 0);
    }
}
