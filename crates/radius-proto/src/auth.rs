//! Request/response authenticators and PAP password obfuscation (RFC 2865)

use crate::packet::{Packet, PacketError};
use rand::Rng;

/// Generate a random Request Authenticator (16 bytes) per RFC 2865 Section 3
///
/// `rand::rng()` is cryptographically secure; the Request Authenticator is
/// the IV for User-Password obfuscation and must not be predictable.
pub fn generate_request_authenticator() -> [u8; 16] {
    let mut rng = rand::rng();
    let mut authenticator = [0u8; 16];
    rng.fill(&mut authenticator);
    authenticator
}

/// Generate a random packet identifier from the same secure source
pub fn generate_identifier() -> u8 {
    rand::rng().random()
}

/// Calculate the Response Authenticator for a received datagram
///
/// Per RFC 2865 Section 3:
/// `MD5(Code + ID + Length + Request Authenticator + Attributes + Secret)`.
///
/// The length fed to the hash is the DATAGRAM length re-encoded big-endian,
/// not the header's claimed length; a response whose declared length
/// disagrees with what was received must not verify.
pub fn calculate_response_authenticator(
    datagram: &[u8],
    request_authenticator: &[u8; 16],
    secret: &[u8],
) -> [u8; 16] {
    debug_assert!(datagram.len() >= Packet::MIN_PACKET_SIZE);

    let mut data = Vec::with_capacity(datagram.len() + secret.len());
    data.push(datagram[0]);
    data.push(datagram[1]);
    data.extend_from_slice(&(datagram.len() as u16).to_be_bytes());
    data.extend_from_slice(request_authenticator);
    data.extend_from_slice(&datagram[Packet::MIN_PACKET_SIZE..]);
    data.extend_from_slice(secret);

    md5::compute(&data).0
}

/// Verify the Response Authenticator carried in bytes 4..20 of a datagram
pub fn verify_response_authenticator(
    datagram: &[u8],
    request_authenticator: &[u8; 16],
    secret: &[u8],
) -> bool {
    if datagram.len() < Packet::MIN_PACKET_SIZE {
        return false;
    }
    let expected = calculate_response_authenticator(datagram, request_authenticator, secret);
    datagram[4..20] == expected
}

/// Obfuscate a User-Password attribute value per RFC 2865 Section 5.2
///
/// The password is zero-padded to a multiple of 16 bytes (an empty password
/// still produces one block), then each block is XORed with a chained MD5:
/// `b1 = MD5(secret + authenticator)`, `bn = MD5(secret + C(n-1))`.
pub fn encrypt_user_password(password: &str, secret: &[u8], authenticator: &[u8; 16]) -> Vec<u8> {
    let mut padded = password.as_bytes().to_vec();
    if padded.is_empty() {
        padded.resize(16, 0);
    } else if padded.len() % 16 != 0 {
        let target = padded.len() + 16 - padded.len() % 16;
        padded.resize(target, 0);
    }

    let mut result = Vec::with_capacity(padded.len());
    let mut previous: [u8; 16] = *authenticator;

    for chunk in padded.chunks(16) {
        let mut data = Vec::with_capacity(secret.len() + 16);
        data.extend_from_slice(secret);
        data.extend_from_slice(&previous);
        let hash = md5::compute(&data).0;

        let mut block = [0u8; 16];
        for (i, out) in block.iter_mut().enumerate() {
            *out = chunk[i] ^ hash[i];
        }
        previous = block;
        result.extend_from_slice(&block);
    }

    result
}

/// Recover a User-Password attribute value per RFC 2865 Section 5.2
pub fn decrypt_user_password(
    encrypted: &[u8],
    secret: &[u8],
    authenticator: &[u8; 16],
) -> Result<String, PacketError> {
    if encrypted.is_empty() || encrypted.len() % 16 != 0 {
        return Err(PacketError::AttributeError(format!(
            "Invalid encrypted password length: {}",
            encrypted.len()
        )));
    }

    let mut result = Vec::with_capacity(encrypted.len());
    let mut previous: &[u8] = authenticator;

    for chunk in encrypted.chunks(16) {
        let mut data = Vec::with_capacity(secret.len() + 16);
        data.extend_from_slice(secret);
        data.extend_from_slice(previous);
        let hash = md5::compute(&data).0;

        for (i, b) in chunk.iter().enumerate() {
            result.push(b ^ hash[i]);
        }
        previous = chunk;
    }

    while result.last() == Some(&0) {
        result.pop();
    }

    String::from_utf8(result)
        .map_err(|e| PacketError::AttributeError(format!("Invalid UTF-8 in password: {e}")))
}
