extern crate clap;
extern crate env_logger;
extern crate vrouter;

use std::sync::{
    Arc,
    Mutex,
};

use vrouter::core::dev::Device;
use vrouter::core::neighbors::NeighborCache;
use vrouter::core::repr::{
    EthernetAddress,
    Ipv4AddressCidr,
};
use vrouter::core::service::{
    self,
    Interface,
    Router,
};
use vrouter::core::time::SystemEnv;
use vrouter::testbed;

#[cfg(target_os = "linux")]
fn open_dev(ifr_name: &str) -> Box<dyn Device> {
    use vrouter::linux::Tap;
    Box::new(Tap::new(ifr_name))
}

#[cfg(not(target_os = "linux"))]
fn open_dev(_: &str) -> Box<dyn Device> {
    panic!("Sorry, demos are only supported on Linux.");
}

fn arg<'a, 'b>(name: &'a str, help: &'a str, default: &'a str) -> clap::Arg<'a, 'b> {
    clap::Arg::with_name(name)
        .long(name)
        .value_name(name)
        .help(help)
        .default_value(default)
        .takes_value(true)
}

/// Brings up a two interface router on a pair of Linux TAP interfaces. See
/// taps.sh for host setup.
fn main() {
    env_logger::init();

    let matches = clap::App::new("router_up")
        .arg(arg("tap-a", "First Linux TAP interface", "tap0"))
        .arg(arg("tap-b", "Second Linux TAP interface", "tap1"))
        .arg(arg("ipv4-a", "CIDR address of the first interface", "10.0.1.1/24"))
        .arg(arg("ipv4-b", "CIDR address of the second interface", "10.0.2.1/24"))
        .arg(arg("mac-a", "MAC address of the first interface", "06:11:11:11:11:01"))
        .arg(arg("mac-b", "MAC address of the second interface", "06:22:22:22:22:01"))
        .arg(arg("neighbors", "File of 'ipv4 mac' neighbor lines", "neighbors.txt"))
        .arg(
            clap::Arg::with_name("routes")
                .long("routes")
                .value_name("routes")
                .help("Optional file of 'network gateway mask interface' static routes")
                .takes_value(true),
        )
        .get_matches();

    let iface = |tap: &str, ipv4: &str, mac: &str| {
        let name = matches.value_of(tap).unwrap();
        Interface {
            dev: Mutex::new(open_dev(name)),
            name: name.to_string(),
            ethernet_addr: matches.value_of(mac).unwrap().parse().unwrap(),
            ipv4_addr: matches
                .value_of(ipv4)
                .unwrap()
                .parse::<Ipv4AddressCidr>()
                .unwrap(),
        }
    };

    let interfaces = vec![
        iface("tap-a", "ipv4-a", "mac-a"),
        iface("tap-b", "ipv4-b", "mac-b"),
    ];

    for iface in &interfaces {
        println!(
            "Interface {}: (MAC = {}, IPv4 = {}, host side = {})",
            iface.name,
            iface.ethernet_addr,
            iface.ipv4_addr,
            testbed::ifr_addr(&iface.name)
        );
    }

    let neighbors = NeighborCache::from_file(matches.value_of("neighbors").unwrap())
        .expect("Reading neighbors");

    let router = Arc::new(Router::new(interfaces, neighbors, SystemEnv::new()));

    if let Some(path) = matches.value_of("routes") {
        router
            .routes
            .load(path, |name| router.iface_index(name))
            .expect("Reading routes");
    }

    println!("Router is UP!");

    for handle in service::spawn(router) {
        handle.join().unwrap();
    }
}
