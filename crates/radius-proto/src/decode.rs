//! Typed decoding of response attributes
//!
//! Turns `(id, raw bytes)` pairs from a response into [`DecodedAttribute`]s
//! using the [`crate::dictionary`] table. Decoding is total where the wire
//! data allows it: values that fail their semantic type fall back to the hex
//! of the raw bytes rather than erroring. The one hard failure is a
//! Vendor-Specific attribute too short to carry its vendor id.

use crate::dictionary::{self, ValueKind};
use crate::packet::PacketError;
use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use std::fmt::Write as _;
use std::net::Ipv4Addr;

/// Lowercase hex rendering of raw bytes
pub fn to_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(out, "{b:02x}");
    }
    out
}

/// One sub-attribute inside a Vendor-Specific payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VendorSubAttribute {
    pub vendor_type: u8,
    pub value_hex: String,
}

/// Decoded attribute value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DecodedValue {
    Text(String),
    Integer(u32),
    Integer64(u64),
    Date(DateTime<Utc>),
    Ipv4(Ipv4Addr),
    /// Eight colon-separated lowercase hex groups, no RFC 5952 compression
    Ipv6(String),
    /// IPv6 prefix as `addr/len`
    Ipv6Prefix(String),
    /// 64-bit interface id as colon-separated two-digit hex
    InterfaceId(String),
    /// Hex fallback for unknown ids and undecodable values
    Hex(String),
    /// Parsed Vendor-Specific sub-attributes
    Vendor(Vec<VendorSubAttribute>),
}

/// A decoded response attribute
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedAttribute {
    pub id: u8,
    pub name: String,
    pub value: DecodedValue,
    pub raw_hex: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_id: Option<u32>,
}

/// Format 16 bytes as eight colon-separated hex groups without zero
/// compression, e.g. `2001:db8:0:0:0:0:0:1`.
fn format_ipv6_groups(bytes: &[u8; 16]) -> String {
    let mut groups = Vec::with_capacity(8);
    for pair in bytes.chunks_exact(2) {
        groups.push(format!("{:x}", u16::from_be_bytes([pair[0], pair[1]])));
    }
    groups.join(":")
}

fn format_interface_id(bytes: &[u8; 8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(":")
}

/// Decode raw bytes according to a dictionary semantic type
///
/// Out-of-spec lengths take the type's documented fallback (0, epoch,
/// `0.0.0.0`, `::`, or hex) instead of failing.
pub fn decode_value(kind: ValueKind, raw: &[u8]) -> DecodedValue {
    match kind {
        ValueKind::Text => match std::str::from_utf8(raw) {
            Ok(s) => DecodedValue::Text(s.to_string()),
            Err(_) => DecodedValue::Hex(to_hex(raw)),
        },
        ValueKind::Integer => {
            let v = match <[u8; 4]>::try_from(raw) {
                Ok(b) => u32::from_be_bytes(b),
                Err(_) => 0,
            };
            DecodedValue::Integer(v)
        }
        ValueKind::Integer64 => {
            let v = match <[u8; 8]>::try_from(raw) {
                Ok(b) => u64::from_be_bytes(b),
                Err(_) => 0,
            };
            DecodedValue::Integer64(v)
        }
        ValueKind::Date => {
            let secs = match <[u8; 4]>::try_from(raw) {
                Ok(b) => u32::from_be_bytes(b),
                Err(_) => 0,
            };
            let ts = Utc
                .timestamp_opt(i64::from(secs), 0)
                .single()
                .unwrap_or(DateTime::UNIX_EPOCH);
            DecodedValue::Date(ts)
        }
        ValueKind::Ipv4Addr => {
            let addr = match <[u8; 4]>::try_from(raw) {
                Ok(b) => Ipv4Addr::from(b),
                Err(_) => Ipv4Addr::UNSPECIFIED,
            };
            DecodedValue::Ipv4(addr)
        }
        ValueKind::Ipv6Addr => match <[u8; 16]>::try_from(raw) {
            Ok(b) => DecodedValue::Ipv6(format_ipv6_groups(&b)),
            Err(_) => DecodedValue::Ipv6("::".to_string()),
        },
        ValueKind::Ipv6Prefix => {
            // {reserved, prefix_length, prefix bytes...}, right-padded to 16
            if raw.len() < 2 || raw.len() > 18 {
                return DecodedValue::Hex(to_hex(raw));
            }
            let prefix_len = raw[1];
            let mut addr = [0u8; 16];
            addr[..raw.len() - 2].copy_from_slice(&raw[2..]);
            DecodedValue::Ipv6Prefix(format!("{}/{}", format_ipv6_groups(&addr), prefix_len))
        }
        ValueKind::InterfaceId => match <[u8; 8]>::try_from(raw) {
            Ok(b) => DecodedValue::InterfaceId(format_interface_id(&b)),
            Err(_) => DecodedValue::Hex(to_hex(raw)),
        },
    }
}

/// Walk a Vendor-Specific sub-attribute region
///
/// Returns the ordered sub-attributes when at least one parses and the walk
/// consumes the region exactly; `None` otherwise.
fn parse_vendor_sub_attributes(data: &[u8]) -> Option<Vec<VendorSubAttribute>> {
    let mut subs = Vec::new();
    let mut offset = 0;
    while offset + 2 <= data.len() {
        let vendor_type = data[offset];
        let length = data[offset + 1] as usize;
        if length < 2 || offset + length > data.len() {
            return None;
        }
        subs.push(VendorSubAttribute {
            vendor_type,
            value_hex: to_hex(&data[offset + 2..offset + length]),
        });
        offset = offset.checked_add(length)?;
    }
    if subs.is_empty() || offset != data.len() {
        return None;
    }
    Some(subs)
}

/// Decode one attribute
///
/// Standard ids use the dictionary; unknown ids decode to
/// `Unknown-Attribute-<id>` with a hex value. Vendor-Specific (26) parses
/// the 4-byte vendor id and the nested sub-attributes, falling back to the
/// raw payload hex when the sub-attribute walk does not come out clean.
pub fn decode_attribute(id: u8, raw: &[u8]) -> Result<DecodedAttribute, PacketError> {
    if id == 26 {
        if raw.len() < 4 {
            return Err(PacketError::AttributeError(format!(
                "Vendor-Specific payload too short: {} bytes",
                raw.len()
            )));
        }
        let vendor_id = u32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]);
        let value = match parse_vendor_sub_attributes(&raw[4..]) {
            Some(subs) => DecodedValue::Vendor(subs),
            None => DecodedValue::Hex(to_hex(raw)),
        };
        return Ok(DecodedAttribute {
            id,
            name: "Vendor-Specific".to_string(),
            value,
            raw_hex: to_hex(raw),
            vendor_id: Some(vendor_id),
        });
    }

    let decoded = match dictionary::lookup(id) {
        Some(entry) => DecodedAttribute {
            id,
            name: entry.name.to_string(),
            value: decode_value(entry.kind, raw),
            raw_hex: to_hex(raw),
            vendor_id: None,
        },
        None => DecodedAttribute {
            id,
            name: format!("Unknown-Attribute-{id}"),
            value: DecodedValue::Hex(to_hex(raw)),
            raw_hex: to_hex(raw),
            vendor_id: None,
        },
    };
    Ok(decoded)
}
