//! Minimal DNS codec for reverse (PTR) lookups.
//!
//! Only what the hostname resolver needs: building a single-question
//! PTR query and pulling the first PTR name out of the answer section.
//! Answer names may use 0xC0 compression pointers.

use std::net::IpAddr;

use anyhow::{Context, bail, ensure};

pub const DNS_HDR_LEN: usize = 12;

const FLAGS_RECURSION_DESIRED: u16 = 0x0100;
const TYPE_PTR: u16 = 12;
const CLASS_IN: u16 = 1;
const MAX_POINTER_JUMPS: usize = 16;

/// Builds a PTR query for `ip_addr` with the given transaction id.
pub fn create_ptr_packet(ip_addr: &IpAddr, id: u16) -> Vec<u8> {
    let qname: Vec<u8> = encode_dns_name(&reverse_pointer_name(ip_addr));
    let q_fixed_len: usize = 4;
    let mut buffer: Vec<u8> = Vec::with_capacity(DNS_HDR_LEN + qname.len() + q_fixed_len);

    buffer.extend_from_slice(&id.to_be_bytes());
    buffer.extend_from_slice(&FLAGS_RECURSION_DESIRED.to_be_bytes());
    buffer.extend_from_slice(&1u16.to_be_bytes()); // QDCOUNT
    buffer.extend_from_slice(&0u16.to_be_bytes()); // ANCOUNT
    buffer.extend_from_slice(&0u16.to_be_bytes()); // NSCOUNT
    buffer.extend_from_slice(&0u16.to_be_bytes()); // ARCOUNT

    buffer.extend_from_slice(&qname);
    buffer.extend_from_slice(&TYPE_PTR.to_be_bytes());
    buffer.extend_from_slice(&CLASS_IN.to_be_bytes());

    buffer
}

/// Extracts the transaction id and the first PTR name from a response.
pub fn parse_ptr_response(payload: &[u8]) -> anyhow::Result<(u16, String)> {
    ensure!(payload.len() >= DNS_HDR_LEN, "truncated DNS header");

    let transaction_id: u16 = read_u16(payload, 0);
    let qdcount: u16 = read_u16(payload, 4);
    let ancount: u16 = read_u16(payload, 6);

    let mut cursor: usize = DNS_HDR_LEN;
    for _ in 0..qdcount {
        let (_, end) = decode_dns_name(payload, cursor).context("malformed question name")?;
        cursor = end + 4;
    }

    for _ in 0..ancount {
        let (_, end) = decode_dns_name(payload, cursor).context("malformed answer name")?;
        ensure!(payload.len() >= end + 10, "truncated resource record");

        let rtype: u16 = read_u16(payload, end);
        let rdlength: usize = read_u16(payload, end + 8) as usize;
        let rdata_start: usize = end + 10;
        ensure!(payload.len() >= rdata_start + rdlength, "truncated RDATA");

        if rtype == TYPE_PTR {
            let (hostname, _) =
                decode_dns_name(payload, rdata_start).context("malformed PTR name")?;
            return Ok((transaction_id, hostname));
        }

        cursor = rdata_start + rdlength;
    }

    bail!("no PTR record found in response")
}

/// The `in-addr.arpa` / `ip6.arpa` owner name of a reverse lookup.
fn reverse_pointer_name(ip_addr: &IpAddr) -> String {
    match ip_addr {
        IpAddr::V4(v4) => {
            let [a, b, c, d] = v4.octets();
            format!("{d}.{c}.{b}.{a}.in-addr.arpa")
        }
        IpAddr::V6(v6) => {
            let nibbles: Vec<String> = v6
                .octets()
                .iter()
                .rev()
                .flat_map(|byte| [byte & 0x0F, byte >> 4])
                .map(|nibble| format!("{nibble:x}"))
                .collect();
            format!("{}.ip6.arpa", nibbles.join("."))
        }
    }
}

fn encode_dns_name(name: &str) -> Vec<u8> {
    let mut encoded: Vec<u8> = Vec::new();
    for label in name.split('.') {
        if label.is_empty() {
            continue;
        }
        encoded.push(label.len() as u8);
        encoded.extend_from_slice(label.as_bytes());
    }
    encoded.push(0);
    encoded
}

/// Decodes the name starting at `start`, following compression pointers.
///
/// Returns the dotted name and the offset just past the name at its
/// original position (pointers do not move that offset forward).
fn decode_dns_name(message: &[u8], start: usize) -> Option<(String, usize)> {
    let mut labels: Vec<String> = Vec::new();
    let mut pos: usize = start;
    let mut end: Option<usize> = None;
    let mut jumps: usize = 0;

    loop {
        let len: usize = *message.get(pos)? as usize;

        if len == 0 {
            return Some((labels.join("."), end.unwrap_or(pos + 1)));
        }

        if len & 0xC0 == 0xC0 {
            let low: usize = *message.get(pos + 1)? as usize;
            end.get_or_insert(pos + 2);
            pos = ((len & 0x3F) << 8) | low;
            jumps += 1;
            if jumps > MAX_POINTER_JUMPS {
                return None;
            }
            continue;
        }

        let label_bytes: &[u8] = message.get(pos + 1..pos + 1 + len)?;
        labels.push(std::str::from_utf8(label_bytes).ok()?.to_string());
        pos += len + 1;
    }
}

fn read_u16(buf: &[u8], pos: usize) -> u16 {
    u16::from_be_bytes([buf[pos], buf[pos + 1]])
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
