//! Interface discovery and probe-target selection.
//!
//! # Responsibilities
//! - Enumerate host interfaces (via `if-addrs`) in host order
//! - Pick the first non-loopback IPv4 address to probe against
//!
//! # Design Decisions
//! - Selection stops at the first qualifying address; later interfaces are
//!   never inspected
//! - A failed address lookup on one interface is skipped, not fatal

use std::io;
use std::net::{IpAddr, Ipv4Addr};

/// A network interface whose addresses can be looked up.
pub trait InterfaceAddrs {
    /// Interface name as reported by the host (e.g. `eth0`).
    fn name(&self) -> &str;

    /// Addresses bound to this interface.
    fn addrs(&self) -> io::Result<Vec<IpAddr>>;
}

/// An interface reported by the host, with the addresses bound to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostInterface {
    name: String,
    addrs: Vec<IpAddr>,
}

impl HostInterface {
    pub fn new(name: impl Into<String>, addrs: Vec<IpAddr>) -> Self {
        Self {
            name: name.into(),
            addrs,
        }
    }
}

impl InterfaceAddrs for HostInterface {
    fn name(&self) -> &str {
        &self.name
    }

    fn addrs(&self) -> io::Result<Vec<IpAddr>> {
        Ok(self.addrs.clone())
    }
}

/// The address a check is run against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceAddress {
    /// Interface the address was found on.
    pub interface: String,
    /// Selected address, always in 4-byte form.
    pub ip: IpAddr,
}

/// Enumerate host interfaces.
///
/// `if-addrs` reports one entry per address; entries are grouped back into
/// interfaces keeping the order in which each interface first appears.
pub fn host_interfaces() -> io::Result<Vec<HostInterface>> {
    let mut interfaces: Vec<HostInterface> = Vec::new();

    for entry in if_addrs::get_if_addrs()? {
        let ip = entry.ip();
        match interfaces.iter().position(|i| i.name == entry.name) {
            Some(idx) => interfaces[idx].addrs.push(ip),
            None => interfaces.push(HostInterface::new(entry.name, vec![ip])),
        }
    }

    tracing::debug!(count = interfaces.len(), "Enumerated host interfaces");
    Ok(interfaces)
}

/// Select the first non-loopback IPv4 address, in interface order.
pub fn select_address<I: InterfaceAddrs>(interfaces: &[I]) -> Option<InterfaceAddress> {
    for interface in interfaces {
        let addrs = match interface.addrs() {
            Ok(addrs) => addrs,
            Err(e) => {
                tracing::debug!(interface = interface.name(), error = %e, "Skipping interface, address lookup failed");
                continue;
            }
        };

        if let Some(ip) = addrs.iter().find_map(qualifying_ipv4) {
            return Some(InterfaceAddress {
                interface: interface.name().to_string(),
                ip: IpAddr::V4(ip),
            });
        }
    }
    None
}

fn qualifying_ipv4(ip: &IpAddr) -> Option<Ipv4Addr> {
    let v4 = match ip {
        IpAddr::V4(v4) => *v4,
        IpAddr::V6(v6) => v6.to_ipv4_mapped()?,
    };
    (!v4.is_loopback()).then_some(v4)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::net::Ipv6Addr;

    struct FakeInterface {
        name: &'static str,
        addrs: io::Result<Vec<IpAddr>>,
        lookups: Cell<usize>,
    }

    impl FakeInterface {
        fn ok(name: &'static str, addrs: &[&str]) -> Self {
            Self {
                name,
                addrs: Ok(addrs.iter().map(|a| a.parse().unwrap()).collect()),
                lookups: Cell::new(0),
            }
        }

        fn failing(name: &'static str) -> Self {
            Self {
                name,
                addrs: Err(io::Error::new(io::ErrorKind::Other, "lookup failed")),
                lookups: Cell::new(0),
            }
        }
    }

    impl InterfaceAddrs for FakeInterface {
        fn name(&self) -> &str {
            self.name
        }

        fn addrs(&self) -> io::Result<Vec<IpAddr>> {
            self.lookups.set(self.lookups.get() + 1);
            match &self.addrs {
                Ok(addrs) => Ok(addrs.clone()),
                Err(e) => Err(io::Error::new(e.kind(), e.to_string())),
            }
        }
    }

    #[test]
    fn empty_interface_set_selects_nothing() {
        let interfaces: Vec<FakeInterface> = Vec::new();
        assert_eq!(select_address(&interfaces), None);
    }

    #[test]
    fn loopback_and_ipv6_only_selects_nothing() {
        let interfaces = vec![
            FakeInterface::ok("lo", &["127.0.0.1", "::1"]),
            FakeInterface::ok("eth0", &["fe80::1", "2001:db8::5"]),
        ];
        assert_eq!(select_address(&interfaces), None);
    }

    #[test]
    fn first_qualifying_address_wins() {
        let interfaces = vec![
            FakeInterface::ok("lo", &["127.0.0.1"]),
            FakeInterface::ok("eth0", &["fe80::1", "10.0.0.7", "10.0.0.8"]),
            FakeInterface::ok("eth1", &["192.168.1.2"]),
        ];
        let selected = select_address(&interfaces).unwrap();
        assert_eq!(selected.interface, "eth0");
        assert_eq!(selected.ip, "10.0.0.7".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn later_interfaces_are_not_inspected() {
        let interfaces = vec![
            FakeInterface::ok("eth0", &["10.0.0.7"]),
            FakeInterface::ok("eth1", &["192.168.1.2"]),
        ];
        select_address(&interfaces).unwrap();
        assert_eq!(interfaces[0].lookups.get(), 1);
        assert_eq!(interfaces[1].lookups.get(), 0);
    }

    #[test]
    fn failed_lookup_is_skipped() {
        let interfaces = vec![
            FakeInterface::failing("eth0"),
            FakeInterface::ok("eth1", &["192.168.1.2"]),
        ];
        let selected = select_address(&interfaces).unwrap();
        assert_eq!(selected.interface, "eth1");
    }

    #[test]
    fn ipv4_mapped_address_qualifies_in_four_byte_form() {
        let mapped = IpAddr::V6(Ipv4Addr::new(10, 9, 8, 7).to_ipv6_mapped());
        let interfaces = vec![HostInterface::new("eth0", vec![mapped])];
        let selected = select_address(&interfaces).unwrap();
        assert_eq!(selected.ip, IpAddr::V4(Ipv4Addr::new(10, 9, 8, 7)));
    }

    #[test]
    fn mapped_loopback_is_rejected() {
        let mapped = IpAddr::V6(Ipv4Addr::LOCALHOST.to_ipv6_mapped());
        let interfaces = vec![HostInterface::new("lo", vec![mapped, IpAddr::V6(Ipv6Addr::LOCALHOST)])];
        assert_eq!(select_address(&interfaces), None);
    }
}
