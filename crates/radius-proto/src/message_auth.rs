//! Message-Authenticator support (RFC 2869)
//!
//! The Message-Authenticator attribute (80) carries an HMAC-MD5 over the
//! entire packet with the attribute's own 16-byte value zeroed, keyed by the
//! shared secret.

use hmac::{Hmac, Mac};
use md5_digest::Md5;

type HmacMd5 = Hmac<Md5>;

/// Calculate the Message-Authenticator for a packet
///
/// `packet_bytes` must be the complete packet with the Message-Authenticator
/// value set to zeros. Keying errors are surfaced so the caller can decide
/// whether to treat them as fatal; on the request path the engine logs and
/// sends the attribute zeroed instead.
pub fn calculate_message_authenticator(
    packet_bytes: &[u8],
    secret: &[u8],
) -> Result<[u8; 16], hmac::digest::InvalidLength> {
    let mut mac = HmacMd5::new_from_slice(secret)?;
    mac.update(packet_bytes);
    let bytes = mac.finalize().into_bytes();

    let mut output = [0u8; 16];
    output.copy_from_slice(&bytes);
    Ok(output)
}

/// Verify the Message-Authenticator at `value_offset` in a packet
///
/// `value_offset` is the byte offset of the 16-byte value, after the
/// attribute's type and length octets.
pub fn verify_message_authenticator(
    packet_bytes: &[u8],
    secret: &[u8],
    value_offset: usize,
) -> bool {
    let Some(end) = value_offset.checked_add(16) else {
        return false;
    };
    if end > packet_bytes.len() {
        return false;
    }

    let received = &packet_bytes[value_offset..end];

    let mut zeroed = packet_bytes.to_vec();
    zeroed[value_offset..end].fill(0);

    match calculate_message_authenticator(&zeroed, secret) {
        Ok(expected) => received == expected,
        Err(_) => false,
    }
}
