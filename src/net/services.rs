//! TCP service name resolution for the `port` setting.
//!
//! Ports may be numeric (`8080`) or a service name (`http`). Names are looked
//! up in `/etc/services` first, then in a small built-in table so minimal
//! container images without that file still resolve the common ones.

use std::fs;
use std::path::Path;

const SERVICES_PATH: &str = "/etc/services";

const WELL_KNOWN_TCP: &[(&str, u16)] = &[
    ("ssh", 22),
    ("smtp", 25),
    ("domain", 53),
    ("http", 80),
    ("https", 443),
    ("postgresql", 5432),
    ("http-alt", 8080),
];

/// Resolve a numeric port or TCP service name.
pub fn resolve_port(port: &str) -> Option<u16> {
    if let Ok(number) = port.parse::<u16>() {
        return Some(number);
    }
    if port.is_empty() {
        return None;
    }

    lookup_file(Path::new(SERVICES_PATH), port).or_else(|| well_known(port))
}

fn lookup_file(path: &Path, name: &str) -> Option<u16> {
    let content = fs::read_to_string(path).ok()?;
    parse_services(&content, name)
}

fn well_known(name: &str) -> Option<u16> {
    WELL_KNOWN_TCP
        .iter()
        .find(|(service, _)| service.eq_ignore_ascii_case(name))
        .map(|&(_, port)| port)
}

/// Find `name` (or an alias of it) among the `tcp` entries of a services file.
fn parse_services(content: &str, name: &str) -> Option<u16> {
    content.lines().find_map(|line| {
        let line = line.split('#').next().unwrap_or_default();
        let mut fields = line.split_whitespace();
        let service = fields.next()?;
        let (port, proto) = fields.next()?.split_once('/')?;
        if proto != "tcp" {
            return None;
        }
        let mut names = std::iter::once(service).chain(fields);
        if names.any(|n| n.eq_ignore_ascii_case(name)) {
            port.parse().ok()
        } else {
            None
        }
    })
}
