// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The FNS database: a [`RuleStore`] and the [`Locator`] that refers to its endpoints,
//! kept together so that a single owner (or a single lock) keeps both consistent.

use crate::config::FnsConfig;
use crate::endpoint::{Endpoint, EndpointDesc};
use crate::errors::FnsError;
use crate::key::EndpointKey;
use crate::locator::Locator;
use crate::params::RuleStoreParams;
use crate::rulesdb::RuleStore;
use crate::segment::{Segment, SegmentDesc, SegmentId};
use ahash::RandomState;
use net::eth::mac::Mac;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

#[allow(unused)]
use tracing::{debug, error, info};

/// An [`FnsDb`] shared between threads. The lock guards the store and the locator together.
pub type SharedFnsDb = Arc<Mutex<FnsDb>>;

pub struct FnsDb {
    store: RuleStore,
    locator: Locator,
}

impl Default for FnsDb {
    fn default() -> Self {
        Self::new(&RuleStoreParams::default())
    }
}

impl FnsDb {
    #[must_use]
    pub fn new(params: &RuleStoreParams) -> Self {
        Self {
            store: RuleStore::with_params(params),
            locator: Locator::with_capacity(params.locator_capacity),
        }
    }

    #[must_use]
    pub fn into_shared(self) -> SharedFnsDb {
        Arc::new(Mutex::new(self))
    }

    #[must_use]
    pub fn store(&self) -> &RuleStore {
        &self.store
    }
    /// Mutable access to the store. Endpoints removed through it keep their locator
    /// bindings, which [`FnsDb::locate`] then ignores.
    #[must_use]
    pub fn store_mut(&mut self) -> &mut RuleStore {
        &mut self.store
    }
    #[must_use]
    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    pub fn add_segment(&mut self, desc: &SegmentDesc) -> &mut Segment {
        self.store.add_segment(desc)
    }

    pub fn add_endpoint(
        &mut self,
        desc: &EndpointDesc,
        uuid: SegmentId,
    ) -> Result<EndpointKey, FnsError> {
        self.store.add_endpoint(desc, uuid)
    }

    //////////////////////////////////////////////////////////////////
    /// Record that the host with address `mac` is attached at the endpoint
    /// with key `key`. Returns the endpoint the host was previously seen at.
    //////////////////////////////////////////////////////////////////
    pub fn learn(&mut self, mac: Mac, key: EndpointKey) -> Result<Option<EndpointKey>, FnsError> {
        if self.store.get_endpoint(key).is_none() {
            error!("Can't locate {mac} at endpoint {key}: no such endpoint");
            return Err(FnsError::NoSuchEndpoint(key));
        }
        Ok(self.locator.insert(mac, key)?)
    }

    #[must_use]
    pub fn locate(&self, mac: &Mac) -> Option<&Endpoint> {
        self.locator.locate_in(mac, &self.store)
    }

    //////////////////////////////////////////////////////////////////
    /// Remove an endpoint: detach it from its segment, remove it from
    /// the store and forget the hosts located at it.
    //////////////////////////////////////////////////////////////////
    pub fn remove_endpoint(&mut self, key: EndpointKey) -> Option<Endpoint> {
        let endpoint = self.store.remove_endpoint(key)?;
        self.locator.purge_endpoint(key);
        Some(endpoint)
    }

    //////////////////////////////////////////////////////////////////
    /// Remove a segment and all of its endpoints. The removed endpoints are
    /// returned in membership order, with the rules still installed for them.
    //////////////////////////////////////////////////////////////////
    pub fn remove_segment_and_endpoints(
        &mut self,
        uuid: SegmentId,
    ) -> Result<Vec<Endpoint>, FnsError> {
        let Some(segment) = self.store.remove_segment(uuid) else {
            return Err(FnsError::NoSuchSegment(uuid));
        };
        let removed: Vec<Endpoint> = segment
            .iter()
            .filter_map(|key| self.remove_endpoint(*key))
            .collect();
        debug!(
            "Removed segment {uuid} and {} of its endpoints",
            removed.len()
        );
        Ok(removed)
    }

    /* check that a config can be applied in full, without changing anything */
    fn check_config(&self, config: &FnsConfig) -> Result<(), FnsError> {
        let mut uuids = HashSet::with_hasher(RandomState::with_seed(0));
        let mut keys = HashSet::with_hasher(RandomState::with_seed(0));
        for segment in &config.segments {
            if self.store.get_segment(segment.uuid).is_some() || !uuids.insert(segment.uuid) {
                error!("Can't apply config: segment {} already exists", segment.uuid);
                return Err(FnsError::SegmentExists(segment.uuid));
            }
            for desc in &segment.endpoints {
                let key = desc.key();
                if self.store.get_endpoint(key).is_some() || !keys.insert(key) {
                    error!("Can't apply config: endpoint {desc} ({key}) already exists");
                    return Err(FnsError::EndpointExists(key));
                }
            }
        }
        for location in &config.locations {
            Locator::validate(&location.mac)?;
            let key = location.endpoint.key();
            if self.store.get_endpoint(key).is_none() && !keys.contains(&key) {
                error!("Can't locate {} at unknown endpoint {key}", location.mac);
                return Err(FnsError::NoSuchEndpoint(key));
            }
        }
        Ok(())
    }

    //////////////////////////////////////////////////////////////////
    /// Provision segments, endpoints and host locations from a config.
    /// The config only adds: it may not name existing segments or
    /// endpoints. The whole config is checked first and nothing is
    /// changed if it can't be applied.
    //////////////////////////////////////////////////////////////////
    pub fn apply(&mut self, config: &FnsConfig) -> Result<(), FnsError> {
        self.check_config(config)?;
        for segment in &config.segments {
            self.store.add_segment(&segment.desc());
            for desc in &segment.endpoints {
                self.store.add_endpoint(desc, segment.uuid)?;
            }
        }
        for location in &config.locations {
            self.learn(location.mac, location.endpoint.key())?;
        }
        info!(
            "Applied config: {} segment(s), {} endpoint(s), {} location(s)",
            self.store.num_segments(),
            self.store.num_endpoints(),
            self.locator.len()
        );
        Ok(())
    }
}
