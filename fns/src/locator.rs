// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The locator: an index from host hardware addresses to the endpoint where each
//! host was seen. The locator does not own endpoints; it keeps their keys.

use crate::endpoint::Endpoint;
use crate::errors::LocatorError;
use crate::key::EndpointKey;
use crate::rulesdb::RuleStore;
use ahash::RandomState;
use net::eth::mac::Mac;
use std::collections::HashMap;
use std::fmt::Write;

use tracectl::trace_target;
#[allow(unused)]
use tracing::{debug, warn};
trace_target!("fns-locator", LevelFilter::INFO, &["fns"]);

#[derive(Debug, Clone)]
pub struct Locator {
    clients: HashMap<Mac, EndpointKey, RandomState>,
}

impl Default for Locator {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl Locator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            clients: HashMap::with_capacity_and_hasher(capacity, RandomState::with_seed(0)),
        }
    }

    /// Tell if `mac` may be bound to an endpoint. Only unicast, non-zero addresses
    /// are accepted, whether they are already bound or not.
    pub fn validate(mac: &Mac) -> Result<(), LocatorError> {
        if mac.is_zero() {
            Err(LocatorError::Zero(*mac))
        } else if mac.is_broadcast() {
            Err(LocatorError::Broadcast(*mac))
        } else if mac.is_multicast() {
            Err(LocatorError::Multicast(*mac))
        } else {
            Ok(())
        }
    }

    /// Bind `mac` to the endpoint with key `key`, replacing any previous binding,
    /// which is returned. Invalid addresses are refused and the locator is not changed.
    pub fn insert(
        &mut self,
        mac: Mac,
        key: EndpointKey,
    ) -> Result<Option<EndpointKey>, LocatorError> {
        if let Err(e) = Self::validate(&mac) {
            debug!("Refusing to locate {mac}: {e}");
            return Err(e);
        }
        let previous = self.clients.insert(mac, key);
        match previous {
            Some(old) if old != key => debug!("{mac} moved from endpoint {old} to {key}"),
            Some(_) => {}
            None => debug!("{mac} located at endpoint {key}"),
        }
        Ok(previous)
    }

    #[must_use]
    pub fn locate(&self, mac: &Mac) -> Option<EndpointKey> {
        self.clients.get(mac).copied()
    }

    /// Look up the endpoint where `mac` was seen. Bindings to endpoints that are no
    /// longer in `store` are ignored.
    #[must_use]
    pub fn locate_in<'a>(&self, mac: &Mac, store: &'a RuleStore) -> Option<&'a Endpoint> {
        self.locate(mac).and_then(|key| store.get_endpoint(key))
    }

    pub fn remove(&mut self, mac: &Mac) -> Option<EndpointKey> {
        self.clients.remove(mac)
    }

    /// Forget all the addresses bound to the endpoint with key `key`.
    /// Returns the number of bindings removed.
    pub fn purge_endpoint(&mut self, key: EndpointKey) -> usize {
        let before = self.clients.len();
        self.clients.retain(|_, bound| *bound != key);
        let purged = before - self.clients.len();
        if purged > 0 {
            debug!("Purged {purged} address(es) of endpoint {key}");
        }
        purged
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Mac, &EndpointKey)> {
        self.clients.iter()
    }

    /// Render all bindings, ordered by address, resolving endpoints in `store`.
    #[must_use]
    pub fn dump(&self, store: &RuleStore) -> String {
        let mut bindings: Vec<_> = self.clients.iter().collect();
        bindings.sort_by_key(|(mac, _)| **mac);
        let mut out = String::new();
        for (mac, key) in bindings {
            let _ = match store.get_endpoint(*key) {
                Some(ep) => writeln!(out, "{mac} -> {} p:{}", ep.switch(), ep.port()),
                None => writeln!(out, "{mac} -> {key} (stale)"),
            };
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::EndpointDesc;
    use crate::segment::{SegmentDesc, SegmentId};
    use net::switch::{DatapathId, PortNo};
    use net::vlan::VlanTag;
    use tracing_test::traced_test;

    fn mac(s: &str) -> Mac {
        Mac::try_from(s).unwrap()
    }

    #[test]
    fn special_addresses_are_refused() {
        let mut locator = Locator::new();
        let key = EndpointKey::from_raw(1);
        for (addr, err) in [
            (Mac::ZERO, LocatorError::Zero(Mac::ZERO)),
            (Mac::BROADCAST, LocatorError::Broadcast(Mac::BROADCAST)),
            (
                mac("01:00:5e:00:00:01"),
                LocatorError::Multicast(mac("01:00:5e:00:00:01")),
            ),
        ] {
            assert_eq!(locator.insert(addr, key), Err(err));
            assert_eq!(locator.locate(&addr), None);
        }
        assert!(locator.is_empty());
    }

    #[test]
    fn refusal_leaves_locator_untouched() {
        bolero::check!().with_type().for_each(|addr: &Mac| {
            let mut locator = Locator::new();
            let refused = addr.is_zero() || addr.is_multicast();
            let result = locator.insert(*addr, EndpointKey::from_raw(7));
            assert_eq!(result.is_err(), refused);
            assert_eq!(locator.locate(addr).is_none(), refused);
            assert_eq!(locator.len(), usize::from(!refused));
        });
    }

    #[test]
    #[traced_test]
    fn insert_overwrites() {
        let mut locator = Locator::new();
        let a = mac("02:00:00:00:00:0a");
        let (e1, e2) = (EndpointKey::from_raw(1), EndpointKey::from_raw(2));
        assert_eq!(locator.insert(a, e1), Ok(None));
        assert_eq!(locator.insert(a, e2), Ok(Some(e1)));
        assert_eq!(locator.locate(&a), Some(e2));
        assert_eq!(locator.len(), 1);
        assert_eq!(locator.iter().filter(|(m, _)| **m == a).count(), 1);
        assert_eq!(locator.remove(&a), Some(e2));
        assert_eq!(locator.locate(&a), None);
    }

    #[test]
    fn purge_endpoint_bindings() {
        let mut locator = Locator::new();
        let (e1, e2) = (EndpointKey::from_raw(1), EndpointKey::from_raw(2));
        locator.insert(mac("02:00:00:00:00:01"), e1).unwrap();
        locator.insert(mac("02:00:00:00:00:02"), e1).unwrap();
        locator.insert(mac("02:00:00:00:00:03"), e2).unwrap();
        assert_eq!(locator.purge_endpoint(e1), 2);
        assert_eq!(locator.purge_endpoint(e1), 0);
        assert_eq!(locator.len(), 1);
    }

    #[test]
    #[traced_test]
    fn stale_bindings_resolve_to_nothing() {
        let mut store = RuleStore::new();
        let uuid = SegmentId::new(100);
        store.add_segment(&SegmentDesc::new(uuid));
        let desc = EndpointDesc::new(DatapathId::new(1), PortNo::new(2), VlanTag::new(10));
        let key = store.add_endpoint(&desc, uuid).unwrap();

        let mut locator = Locator::new();
        let host = mac("02:00:00:00:00:01");
        let other = mac("02:00:00:00:00:02");
        locator.insert(other, key).unwrap();
        locator.insert(host, key).unwrap();
        assert_eq!(locator.locate_in(&host, &store).map(Endpoint::key), Some(key));
        assert_eq!(
            locator.dump(&store),
            "02:00:00:00:00:01 -> 0x0000000000000001 p:2\n\
             02:00:00:00:00:02 -> 0x0000000000000001 p:2\n"
        );

        store.remove_endpoint(key);
        assert!(locator.locate_in(&host, &store).is_none());
        assert_eq!(locator.locate(&host), Some(key));
        assert!(locator.dump(&store).contains("(stale)"));
    }
}
