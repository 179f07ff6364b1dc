#[macro_use]
extern crate assert_matches;
extern crate vrouter;

mod context;

use std::time::Duration;

use vrouter::core::dev::Queued;
use vrouter::core::dv::{
    self,
    Prefix,
};
use vrouter::core::repr::{
    Ipv4Address,
    Rip,
    RipCommand,
    RipEntry,
};
use vrouter::core::service::{
    ethernet,
    rip,
    Router,
};
use vrouter::core::time::MockEnv;
use vrouter::testbed;

fn router() -> (Router<MockEnv>, Vec<Queued>, MockEnv) {
    let time_env = MockEnv::new();
    let (router, devs) = testbed::two_iface_router(time_env.clone());
    rip::bring_up(&router);

    for dev in &devs {
        context::drain(dev);
    }

    (router, devs, time_env)
}

fn prefix(net: [u8; 4]) -> Prefix {
    Prefix {
        network: Ipv4Address::new(net),
        subnet_mask: Ipv4Address::new([255, 255, 255, 0]),
    }
}

fn response(net: [u8; 4], metric: u32) -> Rip {
    Rip {
        command: RipCommand::Response,
        entries: vec![RipEntry {
            address: Ipv4Address::new(net),
            subnet_mask: Ipv4Address::new([255, 255, 255, 0]),
            next_hop: Ipv4Address::UNSPECIFIED,
            metric,
        }],
    }
}

fn advertise(router: &Router<MockEnv>, iface: usize, advertiser: Ipv4Address, rip: &Rip) {
    let frame = context::rip_frame(
        if iface == 0 {
            *testbed::NEIGHBOR_A_ETH
        } else {
            *testbed::NEIGHBOR_B_ETH
        },
        advertiser,
        rip,
    );
    ethernet::recv_frame(router, iface, &frame).unwrap();
}

#[test]
fn bring_up_seeds_table_and_solicits_neighbors() {
    let time_env = MockEnv::new();
    let (router, devs) = testbed::two_iface_router(time_env);
    rip::bring_up(&router);

    for net in [[10, 0, 1, 0], [10, 0, 2, 0]].iter() {
        let entry = router.dv.lookup(prefix(*net)).unwrap();
        assert_eq!(entry.metric, 0);
        assert_eq!(entry.next_hop, None);
        assert!(entry.is_self);
    }

    assert_eq!(router.routes.len(), 2);

    for dev in &devs {
        let sent = dev.dequeue_send().unwrap();
        let (_, rip) = context::parse_rip(&sent);
        assert_eq!(rip.command, RipCommand::Request);
        assert_eq!(rip.entries.len(), 0);
    }
}

#[test]
fn learns_route_from_advertisement() {
    let (router, _, _) = router();

    advertise(&router, 0, *testbed::NEIGHBOR_A_ADDR, &response([10, 0, 3, 0], 1));

    let entry = router.dv.lookup(prefix([10, 0, 3, 0])).unwrap();
    assert_eq!(entry.metric, 2);
    assert_eq!(entry.next_hop, Some(*testbed::NEIGHBOR_A_ADDR));
    assert!(!entry.is_self);
}

#[test]
fn better_route_replaces_worse() {
    let (router, _, _) = router();

    advertise(&router, 0, *testbed::NEIGHBOR_A_ADDR, &response([10, 0, 3, 0], 5));
    assert_eq!(router.dv.lookup(prefix([10, 0, 3, 0])).unwrap().metric, 6);

    advertise(&router, 1, *testbed::NEIGHBOR_B_ADDR, &response([10, 0, 3, 0], 1));

    let entry = router.dv.lookup(prefix([10, 0, 3, 0])).unwrap();
    assert_eq!(entry.metric, 2);
    assert_eq!(entry.next_hop, Some(*testbed::NEIGHBOR_B_ADDR));
}

#[test]
fn worse_route_from_another_neighbor_is_ignored() {
    let (router, _, _) = router();

    advertise(&router, 0, *testbed::NEIGHBOR_A_ADDR, &response([10, 0, 3, 0], 1));
    advertise(&router, 1, *testbed::NEIGHBOR_B_ADDR, &response([10, 0, 3, 0], 5));

    let entry = router.dv.lookup(prefix([10, 0, 3, 0])).unwrap();
    assert_eq!(entry.metric, 2);
    assert_eq!(entry.next_hop, Some(*testbed::NEIGHBOR_A_ADDR));
}

#[test]
fn advertisement_from_current_next_hop_renews_route() {
    let (router, _, time_env) = router();

    advertise(&router, 0, *testbed::NEIGHBOR_A_ADDR, &response([10, 0, 3, 0], 1));

    time_env.advance(Duration::from_secs(20));
    advertise(&router, 0, *testbed::NEIGHBOR_A_ADDR, &response([10, 0, 3, 0], 1));

    time_env.advance(Duration::from_secs(20));
    router.dv.sweep();
    assert_matches!(router.dv.lookup(prefix([10, 0, 3, 0])), Some(_));
}

#[test]
fn unrefreshed_route_expires() {
    let (router, _, time_env) = router();

    advertise(&router, 0, *testbed::NEIGHBOR_A_ADDR, &response([10, 0, 3, 0], 1));

    time_env.advance(Duration::from_secs(dv::TIMEOUT_SECS + 1));
    assert_matches!(router.dv.lookup(prefix([10, 0, 3, 0])), None);
}

#[test]
fn unreachable_advertisement_is_not_learned() {
    let (router, _, _) = router();

    advertise(&router, 0, *testbed::NEIGHBOR_A_ADDR, &response([10, 0, 3, 0], 16));
    assert_matches!(router.dv.lookup(prefix([10, 0, 3, 0])), None);

    // A reachable prefix 15 hops away still costs 16 from here.
    advertise(&router, 0, *testbed::NEIGHBOR_A_ADDR, &response([10, 0, 4, 0], 15));
    assert_matches!(router.dv.lookup(prefix([10, 0, 4, 0])), None);
}

#[test]
fn out_of_range_metric_is_skipped() {
    let (router, _, _) = router();

    let rip = Rip {
        command: RipCommand::Response,
        entries: vec![
            RipEntry {
                address: Ipv4Address::new([10, 0, 3, 0]),
                subnet_mask: Ipv4Address::new([255, 255, 255, 0]),
                next_hop: Ipv4Address::UNSPECIFIED,
                metric: 17,
            },
            RipEntry {
                address: Ipv4Address::new([10, 0, 4, 0]),
                subnet_mask: Ipv4Address::new([255, 255, 255, 0]),
                next_hop: Ipv4Address::UNSPECIFIED,
                metric: 1,
            },
        ],
    };

    advertise(&router, 0, *testbed::NEIGHBOR_A_ADDR, &rip);

    assert_matches!(router.dv.lookup(prefix([10, 0, 3, 0])), None);
    assert_matches!(router.dv.lookup(prefix([10, 0, 4, 0])), Some(_));
}

#[test]
fn flood_poisons_routes_toward_their_next_hop() {
    let (router, devs, _) = router();

    advertise(&router, 0, *testbed::NEIGHBOR_A_ADDR, &response([10, 0, 3, 0], 1));

    rip::flood(&router);

    let metric_for = |dev: &Queued, net: [u8; 4]| {
        let sent = dev.dequeue_send().unwrap();
        let (_, rip) = context::parse_rip(&sent);
        assert_eq!(rip.command, RipCommand::Response);
        rip.entries
            .iter()
            .find(|entry| entry.address == Ipv4Address::new(net))
            .unwrap()
            .metric
    };

    // Poisoned on the subnet the route was learned from, truthful elsewhere.
    assert_eq!(metric_for(&devs[0], [10, 0, 3, 0]), dv::INFINITY);
    assert_eq!(metric_for(&devs[1], [10, 0, 3, 0]), 2);
}

#[test]
fn flood_advertises_own_prefixes_everywhere() {
    let (router, devs, _) = router();

    rip::flood(&router);

    for dev in &devs {
        let sent = dev.dequeue_send().unwrap();
        let (src_addr, rip) = context::parse_rip(&sent);
        assert!(router.is_local_addr(src_addr));
        assert_eq!(rip.entries.len(), 2);

        for entry in &rip.entries {
            assert_eq!(entry.metric, 0);
        }
    }
}
