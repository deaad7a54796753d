//! Static RADIUS attribute dictionary
//!
//! Maps standard attribute ids to their name and semantic type for decoding.
//! The table is build-time data; there is no dynamic registration. Ids not
//! listed here decode as `Unknown-Attribute-<id>` with a hex value.

/// Semantic type of an attribute value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// UTF-8 text
    Text,
    /// Unsigned 32-bit big-endian integer
    Integer,
    /// Unsigned 64-bit big-endian integer
    Integer64,
    /// Seconds since the Unix epoch (4 bytes big-endian)
    Date,
    /// IPv4 address (4 bytes)
    Ipv4Addr,
    /// IPv6 address (16 bytes)
    Ipv6Addr,
    /// IPv6 prefix (reserved byte, prefix length, prefix bytes)
    Ipv6Prefix,
    /// 64-bit interface identifier (8 bytes)
    InterfaceId,
}

/// One dictionary row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DictionaryEntry {
    pub name: &'static str,
    pub kind: ValueKind,
}

fn entry(name: &'static str, kind: ValueKind) -> Option<DictionaryEntry> {
    Some(DictionaryEntry { name, kind })
}

/// Look up a standard attribute id
pub fn lookup(id: u8) -> Option<DictionaryEntry> {
    use ValueKind::*;
    match id {
        1 => entry("User-Name", Text),
        2 => entry("User-Password", Text),
        3 => entry("CHAP-Password", Text),
        4 => entry("NAS-IP-Address", Ipv4Addr),
        5 => entry("NAS-Port", Integer),
        6 => entry("Service-Type", Integer),
        7 => entry("Framed-Protocol", Integer),
        8 => entry("Framed-IP-Address", Ipv4Addr),
        9 => entry("Framed-IP-Netmask", Ipv4Addr),
        10 => entry("Framed-Routing", Integer),
        11 => entry("Filter-Id", Text),
        12 => entry("Framed-MTU", Integer),
        13 => entry("Framed-Compression", Integer),
        14 => entry("Login-IP-Host", Ipv4Addr),
        15 => entry("Login-Service", Integer),
        16 => entry("Login-TCP-Port", Integer),
        18 => entry("Reply-Message", Text),
        19 => entry("Callback-Number", Text),
        20 => entry("Callback-Id", Text),
        22 => entry("Framed-Route", Text),
        23 => entry("Framed-IPX-Network", Integer),
        24 => entry("State", Text),
        25 => entry("Class", Text),
        26 => entry("Vendor-Specific", Text),
        27 => entry("Session-Timeout", Integer),
        28 => entry("Idle-Timeout", Integer),
        29 => entry("Termination-Action", Integer),
        30 => entry("Called-Station-Id", Text),
        31 => entry("Calling-Station-Id", Text),
        32 => entry("NAS-Identifier", Text),
        33 => entry("Proxy-State", Text),
        34 => entry("Login-LAT-Service", Text),
        35 => entry("Login-LAT-Node", Text),
        36 => entry("Login-LAT-Group", Text),
        37 => entry("Framed-AppleTalk-Link", Integer),
        38 => entry("Framed-AppleTalk-Network", Integer),
        39 => entry("Framed-AppleTalk-Zone", Text),
        40 => entry("Acct-Status-Type", Integer),
        41 => entry("Acct-Delay-Time", Integer),
        42 => entry("Acct-Input-Octets", Integer),
        43 => entry("Acct-Output-Octets", Integer),
        44 => entry("Acct-Session-Id", Text),
        45 => entry("Acct-Authentic", Integer),
        46 => entry("Acct-Session-Time", Integer),
        47 => entry("Acct-Input-Packets", Integer),
        48 => entry("Acct-Output-Packets", Integer),
        49 => entry("Acct-Terminate-Cause", Integer),
        50 => entry("Acct-Multi-Session-Id", Text),
        51 => entry("Acct-Link-Count", Integer),
        52 => entry("Acct-Input-Gigawords", Integer),
        53 => entry("Acct-Output-Gigawords", Integer),
        55 => entry("Event-Timestamp", Date),
        60 => entry("CHAP-Challenge", Text),
        61 => entry("NAS-Port-Type", Integer),
        62 => entry("Port-Limit", Integer),
        63 => entry("Login-LAT-Port", Text),
        64 => entry("Tunnel-Type", Integer),
        65 => entry("Tunnel-Medium-Type", Integer),
        66 => entry("Tunnel-Client-Endpoint", Text),
        67 => entry("Tunnel-Server-Endpoint", Text),
        69 => entry("Tunnel-Password", Text),
        77 => entry("Connect-Info", Text),
        79 => entry("EAP-Message", Text),
        80 => entry("Message-Authenticator", Text),
        85 => entry("Acct-Interim-Interval", Integer),
        87 => entry("NAS-Port-Id", Text),
        88 => entry("Framed-Pool", Text),
        95 => entry("NAS-IPv6-Address", Ipv6Addr),
        96 => entry("Framed-Interface-Id", InterfaceId),
        97 => entry("Framed-IPv6-Prefix", Ipv6Prefix),
        98 => entry("Login-IPv6-Host", Ipv6Addr),
        99 => entry("Framed-IPv6-Route", Text),
        100 => entry("Framed-IPv6-Pool", Text),
        168 => entry("Framed-IPv6-Address", Ipv6Addr),
        169 => entry("DNS-Server-IPv6-Address", Ipv6Addr),
        171 => entry("Delegated-IPv6-Prefix", Ipv6Prefix),
        _ => None,
    }
}
