use crate::packet::PacketError;

/// RADIUS attribute structure as defined in RFC 2865 Section 5
///
/// ```text
///  0                   1                   2
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |     Type      |    Length     |  Value ...
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// The on-wire length covers the type and length octets, so it is always
/// at least 2 and at most 255.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute type (1 byte)
    pub attr_type: u8,
    /// Attribute value (0-253 bytes)
    pub value: Vec<u8>,
}

impl Attribute {
    /// Minimum attribute length (type + length fields)
    pub const MIN_LENGTH: usize = 2;
    /// Maximum attribute length including type and length
    pub const MAX_LENGTH: usize = 255;
    /// Maximum value length
    pub const MAX_VALUE_LENGTH: usize = 253;

    pub fn new(attr_type: u8, value: Vec<u8>) -> Result<Self, PacketError> {
        if value.len() > Self::MAX_VALUE_LENGTH {
            return Err(PacketError::AttributeError(format!(
                "Attribute value too long: {} bytes (max {})",
                value.len(),
                Self::MAX_VALUE_LENGTH
            )));
        }
        Ok(Attribute { attr_type, value })
    }

    /// Create a string attribute
    pub fn string(attr_type: u8, value: impl Into<String>) -> Result<Self, PacketError> {
        Self::new(attr_type, value.into().into_bytes())
    }

    /// Create an integer attribute (32-bit big-endian)
    pub fn integer(attr_type: u8, value: u32) -> Result<Self, PacketError> {
        Self::new(attr_type, value.to_be_bytes().to_vec())
    }

    /// Create an IPv4 address attribute
    pub fn ipv4(attr_type: u8, value: [u8; 4]) -> Result<Self, PacketError> {
        Self::new(attr_type, value.to_vec())
    }

    /// Encode attribute to bytes
    pub fn encode(&self) -> Result<Vec<u8>, PacketError> {
        let length = self.encoded_length();
        if length > Self::MAX_LENGTH {
            return Err(PacketError::AttributeError(format!(
                "Encoded attribute too long: {} bytes",
                length
            )));
        }

        let mut buffer = Vec::with_capacity(length);
        buffer.push(self.attr_type);
        buffer.push(length as u8);
        buffer.extend_from_slice(&self.value);
        Ok(buffer)
    }

    /// Decode one attribute from the front of `data`
    pub fn decode(data: &[u8]) -> Result<Self, PacketError> {
        if data.len() < Self::MIN_LENGTH {
            return Err(PacketError::AttributeError(format!(
                "Attribute data too short: {} bytes",
                data.len()
            )));
        }

        let attr_type = data[0];
        let length = data[1] as usize;

        if length < Self::MIN_LENGTH {
            return Err(PacketError::AttributeError(format!(
                "Invalid attribute length: {}",
                length
            )));
        }
        if data.len() < length {
            return Err(PacketError::AttributeError(format!(
                "Insufficient data for attribute: expected {}, got {}",
                length,
                data.len()
            )));
        }

        Ok(Attribute {
            attr_type,
            value: data[Self::MIN_LENGTH..length].to_vec(),
        })
    }

    /// Get the encoded length of this attribute
    pub fn encoded_length(&self) -> usize {
        Self::MIN_LENGTH + self.value.len()
    }
}

/// Bounded walk over the raw attribute region of a received datagram.
///
/// Responses from misbehaving servers can declare attribute lengths that run
/// past the datagram or below the 2-byte minimum. The walker stops at the
/// first such attribute instead of erroring, so everything decoded up to
/// that point is still usable.
pub struct AttributeWalker<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> AttributeWalker<'a> {
    /// Walk `data`, which must be the byte region after the 20-byte header.
    pub fn new(data: &'a [u8]) -> Self {
        AttributeWalker { data, offset: 0 }
    }
}

impl<'a> Iterator for AttributeWalker<'a> {
    type Item = (u8, &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset + Attribute::MIN_LENGTH > self.data.len() {
            return None;
        }
        let attr_type = self.data[self.offset];
        let length = self.data[self.offset + 1] as usize;
        if length < Attribute::MIN_LENGTH || self.offset + length > self.data.len() {
            // Truncated or malformed tail; stop here.
            return None;
        }
        let value = &self.data[self.offset + Attribute::MIN_LENGTH..self.offset + length];
        self.offset += length;
        Some((attr_type, value))
    }
}
