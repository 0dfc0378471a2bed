//! Canonical textual rendering of raw IP addresses.
//!
//! Output matches the standard library's `Display` for `Ipv4Addr` and
//! `Ipv6Addr` (RFC 5952 compression), except that IPv4-mapped IPv6
//! addresses render as plain dotted-decimal.
//!
//! # Design Decisions
//! - Digits are emitted by hand into a pre-sized `String` instead of going
//!   through `fmt`; the IPv4 path costs exactly one allocation
//! - Input is a raw byte slice so malformed lengths can still be reported

use std::net::IpAddr;

const IPV4_LEN: usize = 4;
const IPV6_LEN: usize = 16;

/// Longest IPv4 rendering: `255.255.255.255`.
const IPV4_MAX_TEXT: usize = 15;
/// Longest IPv6 rendering: eight 4-digit groups and seven separators.
const IPV6_MAX_TEXT: usize = 39;

const V4_IN_V6_PREFIX: [u8; 12] = [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0xff, 0xff];
const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Render a raw address.
///
/// - empty → `<nil>`
/// - 4 bytes, or 16 bytes carrying an IPv4-mapped address → dotted-decimal
/// - 16 bytes → compressed lowercase colon-hex
/// - anything else → `?` followed by a hex dump of the bytes
pub fn ip_string(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return "<nil>".to_string();
    }

    if let Some(octets) = as_ipv4(bytes) {
        return format_ipv4(octets);
    }

    match <[u8; IPV6_LEN]>::try_from(bytes) {
        Ok(octets) => format_ipv6(octets),
        Err(_) => hex_dump(bytes),
    }
}

/// Render a typed address with the same rules as [`ip_string`].
pub fn format_ip(ip: &IpAddr) -> String {
    match ip {
        IpAddr::V4(v4) => format_ipv4(v4.octets()),
        IpAddr::V6(v6) => ip_string(&v6.octets()),
    }
}

/// Render `ip` as the host part of a dial target or URL authority.
///
/// IPv6 literals are bracketed so that a `:port` suffix stays unambiguous.
pub fn host_literal(ip: &IpAddr) -> String {
    let text = format_ip(ip);
    if text.contains(':') {
        format!("[{}]", text)
    } else {
        text
    }
}

fn as_ipv4(bytes: &[u8]) -> Option<[u8; IPV4_LEN]> {
    match bytes.len() {
        IPV4_LEN => bytes.try_into().ok(),
        IPV6_LEN if bytes[..12] == V4_IN_V6_PREFIX => bytes[12..].try_into().ok(),
        _ => None,
    }
}

fn format_ipv4(octets: [u8; IPV4_LEN]) -> String {
    let mut out = String::with_capacity(IPV4_MAX_TEXT);
    for (i, octet) in octets.into_iter().enumerate() {
        if i > 0 {
            out.push('.');
        }
        push_decimal(&mut out, octet);
    }
    out
}

fn format_ipv6(octets: [u8; IPV6_LEN]) -> String {
    let mut groups = [0u16; 8];
    for (group, pair) in groups.iter_mut().zip(octets.chunks_exact(2)) {
        *group = (u16::from(pair[0]) << 8) | u16::from(pair[1]);
    }

    let run = longest_zero_run(&groups);
    let mut out = String::with_capacity(IPV6_MAX_TEXT);
    let mut i = 0;
    while i < groups.len() {
        match run {
            Some((start, end)) if start == i => {
                out.push_str("::");
                i = end;
                if i >= groups.len() {
                    break;
                }
            }
            _ if i > 0 => out.push(':'),
            _ => {}
        }
        push_hex(&mut out, groups[i]);
        i += 1;
    }
    out
}

/// Half-open range of the longest run of zero groups, earliest on ties.
///
/// A lone zero group never qualifies for `::`.
fn longest_zero_run(groups: &[u16; 8]) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize)> = None;
    let mut i = 0;
    while i < groups.len() {
        if groups[i] != 0 {
            i += 1;
            continue;
        }
        let start = i;
        while i < groups.len() && groups[i] == 0 {
            i += 1;
        }
        let len = i - start;
        if len >= 2 && best.map_or(true, |(s, e)| len > e - s) {
            best = Some((start, i));
        }
    }
    best
}

fn push_decimal(out: &mut String, mut value: u8) {
    let mut buf = [0u8; 3];
    let mut i = buf.len();
    loop {
        i -= 1;
        buf[i] = b'0' + value % 10;
        value /= 10;
        if value == 0 {
            break;
        }
    }
    for &digit in &buf[i..] {
        out.push(char::from(digit));
    }
}

fn push_hex(out: &mut String, group: u16) {
    let mut started = false;
    for shift in [12u16, 8, 4, 0] {
        let nibble = usize::from((group >> shift) & 0xf);
        if nibble != 0 || started || shift == 0 {
            started = true;
            out.push(char::from(HEX_DIGITS[nibble]));
        }
    }
}

fn hex_dump(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(1 + bytes.len() * 2);
    out.push('?');
    for &b in bytes {
        out.push(char::from(HEX_DIGITS[usize::from(b >> 4)]));
        out.push(char::from(HEX_DIGITS[usize::from(b & 0xf)]));
    }
    out
}
