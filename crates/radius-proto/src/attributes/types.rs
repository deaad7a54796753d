/// RADIUS attribute types the client traffics in, per RFC 2865 and related RFCs
///
/// The full decode-side name/type table lives in [`crate::dictionary`]; this
/// enum covers the ids the client references by name when building requests
/// and extracting assignment values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AttributeType {
    /// User-Name (1) - RFC 2865
    UserName = 1,
    /// User-Password (2) - RFC 2865
    UserPassword = 2,
    /// NAS-IP-Address (4) - RFC 2865
    NasIpAddress = 4,
    /// NAS-Port (5) - RFC 2865
    NasPort = 5,
    /// Reply-Message (18) - RFC 2865
    ReplyMessage = 18,
    /// State (24) - RFC 2865
    State = 24,
    /// Class (25) - RFC 2865
    Class = 25,
    /// Vendor-Specific (26) - RFC 2865
    VendorSpecific = 26,
    /// Session-Timeout (27) - RFC 2865
    SessionTimeout = 27,
    /// Event-Timestamp (55) - RFC 2869
    EventTimestamp = 55,
    /// Message-Authenticator (80) - RFC 2869
    MessageAuthenticator = 80,
    /// NAS-IPv6-Address (95) - RFC 3162
    NasIpv6Address = 95,
    /// Framed-Interface-Id (96) - RFC 3162
    FramedInterfaceId = 96,
    /// Framed-IPv6-Prefix (97) - RFC 3162
    FramedIpv6Prefix = 97,
}

impl AttributeType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(AttributeType::UserName),
            2 => Some(AttributeType::UserPassword),
            4 => Some(AttributeType::NasIpAddress),
            5 => Some(AttributeType::NasPort),
            18 => Some(AttributeType::ReplyMessage),
            24 => Some(AttributeType::State),
            25 => Some(AttributeType::Class),
            26 => Some(AttributeType::VendorSpecific),
            27 => Some(AttributeType::SessionTimeout),
            55 => Some(AttributeType::EventTimestamp),
            80 => Some(AttributeType::MessageAuthenticator),
            95 => Some(AttributeType::NasIpv6Address),
            96 => Some(AttributeType::FramedInterfaceId),
            97 => Some(AttributeType::FramedIpv6Prefix),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}
