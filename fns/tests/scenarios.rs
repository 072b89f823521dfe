// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! End-to-end use of an FNS database, the way a controller drives it.

use fns_db::{
    Endpoint, EndpointDesc, EndpointKey, FlowRule, FnsConfig, FnsDb, FnsError, SegmentDesc,
    SegmentId,
};
use net::eth::mac::Mac;
use net::flowmatch::FlowMatch;
use net::switch::{DatapathId, PortNo};
use net::vlan::VlanTag;
use pretty_assertions::assert_eq;

const S100: SegmentId = SegmentId::new(100);

fn ep(sw: u64, port: u32, vlan: u16) -> EndpointDesc {
    EndpointDesc::new(DatapathId::new(sw), PortNo::new(port), VlanTag::new(vlan))
}

fn flow(sw: u64, in_port: u8) -> FlowRule {
    let mut raw = [0u8; FlowMatch::LEN];
    raw[4] = in_port;
    FlowRule::new(DatapathId::new(sw), FlowMatch::from(raw))
}

#[test]
fn duplicate_endpoint_in_segment() {
    let mut db = FnsDb::default();
    db.add_segment(&SegmentDesc::new(S100));

    let k1 = db.add_endpoint(&ep(1, 2, 10), S100).unwrap();
    assert_eq!(
        db.add_endpoint(&ep(1, 2, 10), S100),
        Err(FnsError::EndpointExists(k1))
    );
    assert_eq!(db.store().get_segment(S100).unwrap().num_endpoints(), 1);
}

#[test]
fn rule_history_of_an_endpoint() {
    let mut db = FnsDb::default();
    db.add_segment(&SegmentDesc::new(S100));
    let k1 = db.add_endpoint(&ep(1, 2, 10), S100).unwrap();

    let endpoint = db.store_mut().get_endpoint_mut(k1).unwrap();
    endpoint.add_rule(flow(1, 2));
    endpoint.add_rule(flow(2, 7));
    assert_eq!(endpoint.installed_count(), 2);
    assert_eq!(endpoint.last_installed(), &flow(2, 7));
    assert_eq!(endpoint.pop_installed(), flow(2, 7));
    assert_eq!(endpoint.installed_count(), 1);
}

#[test]
fn host_moves_between_endpoints() {
    let mut db = FnsDb::default();
    db.add_segment(&SegmentDesc::new(S100));
    let k1 = db.add_endpoint(&ep(1, 1, 10), S100).unwrap();
    let k2 = db.add_endpoint(&ep(2, 1, 10), S100).unwrap();
    let host = Mac([0x02, 0, 0, 0, 0, 0x0a]);

    assert_eq!(db.learn(host, k1), Ok(None));
    assert_eq!(db.learn(host, k2), Ok(Some(k1)));
    assert_eq!(db.locate(&host).map(Endpoint::key), Some(k2));
    assert_eq!(db.locator().len(), 1);
}

#[test]
fn teardown_of_an_endpoint() {
    let mut db = FnsDb::default();
    db.add_segment(&SegmentDesc::new(S100));
    let k1 = db.add_endpoint(&ep(1, 1, 10), S100).unwrap();
    let k2 = db.add_endpoint(&ep(1, 2, 10), S100).unwrap();
    let host = Mac([0x02, 0, 0, 0, 0, 1]);
    db.learn(host, k1).unwrap();
    for port in 1..=3 {
        db.store_mut()
            .get_endpoint_mut(k1)
            .unwrap()
            .add_rule(flow(1, port));
    }

    let mut removed = db.remove_endpoint(k1).unwrap();
    let uninstall: Vec<FlowRule> = removed.drain_installed();
    assert_eq!(uninstall, vec![flow(1, 3), flow(1, 2), flow(1, 1)]);

    assert!(db.store().get_endpoint(k1).is_none());
    assert!(db.locate(&host).is_none());
    let segment = db.store().get_segment(S100).unwrap();
    assert_eq!(segment.iter().copied().collect::<Vec<EndpointKey>>(), vec![k2]);
    db.store().check_consistency().unwrap();
}

#[test]
fn segment_removal_keeps_endpoints() {
    let mut db = FnsDb::default();
    db.add_segment(&SegmentDesc::new(S100));
    let k1 = db.add_endpoint(&ep(1, 1, 10), S100).unwrap();

    db.store_mut().remove_segment(S100).unwrap();
    let endpoint = db.store().get_endpoint(k1).unwrap();
    assert_eq!(endpoint.owner(), None);

    let s200 = SegmentId::new(200);
    db.add_segment(&SegmentDesc::new(s200));
    db.store_mut().attach_endpoint(s200, k1).unwrap();
    assert_eq!(db.store().get_endpoint(k1).unwrap().owner(), Some(s200));
    db.store().check_consistency().unwrap();
}

#[test]
fn provision_from_yaml() {
    let yaml = r#"
segments:
  - uuid: 100
    name: blue
    endpoints:
      - { switch: 1, port: 1, vlan: 10 }
      - { switch: 2, port: 1, vlan: 10 }
  - uuid: 200
    name: red
    endpoints:
      - { switch: 1, port: 1, vlan: 20, label: 16 }
locations:
  - mac: "02:00:00:00:00:01"
    endpoint: { switch: 2, port: 1, vlan: 10 }
"#;
    let config = FnsConfig::from_yaml(yaml).unwrap();
    let mut db = FnsDb::default();
    db.apply(&config).unwrap();

    assert_eq!(db.store().num_segments(), 2);
    assert_eq!(db.store().num_endpoints(), 3);
    assert_eq!(db.store().get_segment(SegmentId::new(200)).unwrap().name(), Some("red"));
    let located = db.locate(&Mac([2, 0, 0, 0, 0, 1])).unwrap();
    assert_eq!(located.key(), ep(2, 1, 10).key());
    assert_eq!(located.owner(), Some(S100));
    db.store().check_consistency().unwrap();

    // applying again is refused and leaves the topology as it was
    assert_eq!(db.apply(&config), Err(FnsError::SegmentExists(S100)));
    let blue = db.store().get_segment(S100).unwrap();
    assert_eq!(blue.num_endpoints(), 2);
    assert_eq!(blue.name(), Some("blue"));
    for desc in [ep(1, 1, 10), ep(2, 1, 10)] {
        let endpoint = db.store().get_endpoint(desc.key()).unwrap();
        assert_eq!(endpoint.owner(), Some(S100));
    }
    assert_eq!(
        db.locate(&Mac([2, 0, 0, 0, 0, 1])).map(Endpoint::key),
        Some(ep(2, 1, 10).key())
    );
    db.store().check_consistency().unwrap();
}
