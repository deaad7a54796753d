//! Protocol engine: one RADIUS Access-Request transaction over UDP
//!
//! Builds the request (PAP password obfuscation, fresh authenticator,
//! Message-Authenticator HMAC), sends it on a fresh socket, waits for one
//! datagram bounded by the call timeout, validates the Response
//! Authenticator, walks and decodes the attributes, and classifies the
//! outcome. The socket lives exactly as long as the call.

use crate::error::ClientResult;
use crate::result::{AuthFailure, AuthResult};
use radius_proto::auth::{
    encrypt_user_password, generate_identifier, generate_request_authenticator,
    verify_response_authenticator,
};
use radius_proto::decode::{decode_attribute, to_hex};
use radius_proto::message_auth::calculate_message_authenticator;
use radius_proto::{Attribute, AttributeType, AttributeWalker, Code, Packet};
use regex::Regex;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Immutable per-call protocol options
#[derive(Debug, Clone)]
pub struct ProtocolOptions {
    /// Shared secret
    pub secret: Vec<u8>,
    /// UDP port on the target host
    pub port: u16,
    /// Transaction timeout
    pub timeout: Duration,
    /// Attribute id the assignment value is extracted from
    pub assignment_attribute_id: u8,
    /// Required vendor id when the target id is Vendor-Specific (26)
    pub vendor_id: Option<u32>,
    /// Required vendor sub-type when the target id is Vendor-Specific (26)
    pub vendor_type: Option<u8>,
    /// Pattern whose capture group 1 is the extracted value
    pub value_pattern: Option<Regex>,
}

/// Build the encoded Access-Request and return it with its Request
/// Authenticator.
///
/// Attribute order is fixed: User-Name, User-Password, NAS-IP-Address,
/// NAS-Port, Message-Authenticator. The Message-Authenticator is computed
/// over the packet with its value zeroed and patched in place; a keying
/// fault leaves the zeros (some servers do not require the attribute).
pub(crate) fn build_access_request(
    user: &str,
    password: &str,
    options: &ProtocolOptions,
) -> ClientResult<(Vec<u8>, [u8; 16])> {
    let identifier = generate_identifier();
    let request_authenticator = generate_request_authenticator();

    let mut packet = Packet::new(Code::AccessRequest, identifier, request_authenticator);
    packet.add_attribute(Attribute::string(AttributeType::UserName as u8, user)?);
    packet.add_attribute(Attribute::new(
        AttributeType::UserPassword as u8,
        encrypt_user_password(password, &options.secret, &request_authenticator),
    )?);
    packet.add_attribute(Attribute::ipv4(
        AttributeType::NasIpAddress as u8,
        [127, 0, 0, 1],
    )?);
    packet.add_attribute(Attribute::new(
        AttributeType::NasPort as u8,
        vec![0u8; 4],
    )?);
    packet.add_attribute(Attribute::new(
        AttributeType::MessageAuthenticator as u8,
        vec![0u8; 16],
    )?);

    let mut request = packet.encode()?;

    // The Message-Authenticator is the last attribute, so its value is the
    // trailing 16 bytes of the encoded packet.
    match calculate_message_authenticator(&request, &options.secret) {
        Ok(mac) => {
            let start = request.len() - 16;
            request[start..].copy_from_slice(&mac);
        }
        Err(e) => {
            warn!(error = %e, "Message-Authenticator keying failed, sending zeroed value");
        }
    }

    Ok((request, request_authenticator))
}

/// Extract the assignment text from a matching attribute's raw value
///
/// When the target id is Vendor-Specific and both vendor ids are
/// configured, the value must parse as `{vendor_id, vendor_type,
/// vendor_length, text}` and both ids must match; otherwise the whole
/// value is taken as UTF-8.
fn assignment_text(value: &[u8], options: &ProtocolOptions) -> Option<String> {
    if options.assignment_attribute_id == AttributeType::VendorSpecific as u8
        && let (Some(vendor_id), Some(vendor_type)) = (options.vendor_id, options.vendor_type)
    {
        if value.len() < 6 {
            return None;
        }
        let got_vendor_id = u32::from_be_bytes([value[0], value[1], value[2], value[3]]);
        let got_vendor_type = value[4];
        let vendor_length = value[5] as usize;
        if got_vendor_id != vendor_id || got_vendor_type != vendor_type {
            return None;
        }
        if vendor_length < 2 || 4 + vendor_length > value.len() {
            return None;
        }
        return std::str::from_utf8(&value[6..4 + vendor_length])
            .ok()
            .map(str::to_string);
    }

    std::str::from_utf8(value).ok().map(str::to_string)
}

/// Apply the configured value pattern; without one, the whole text matches
fn apply_value_pattern(text: &str, options: &ProtocolOptions) -> Option<String> {
    match options.value_pattern {
        Some(ref pattern) => pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string()),
        None => Some(text.to_string()),
    }
}

/// Validate, decode, and classify a received datagram
fn classify_response(
    datagram: &[u8],
    request_authenticator: &[u8; 16],
    options: &ProtocolOptions,
) -> AuthResult {
    if datagram.len() < Packet::MIN_PACKET_SIZE {
        debug!(len = datagram.len(), "response shorter than RADIUS header");
        return AuthResult {
            raw: Some(to_hex(datagram)),
            ..AuthResult::failure(AuthFailure::MalformedResponse)
        };
    }

    let raw_hex = to_hex(datagram);

    if !verify_response_authenticator(datagram, request_authenticator, &options.secret) {
        warn!("response authenticator mismatch");
        return AuthResult {
            raw: Some(raw_hex),
            ..AuthResult::failure(AuthFailure::AuthenticatorMismatch)
        };
    }

    // Bounds come from the datagram, never the header's claimed length.
    let mut attributes = Vec::new();
    let mut assignment_matches = Vec::new();
    for (id, value) in AttributeWalker::new(&datagram[Packet::MIN_PACKET_SIZE..]) {
        match decode_attribute(id, value) {
            Ok(decoded) => attributes.push(decoded),
            Err(e) => warn!(attribute = id, error = %e, "skipping undecodable attribute"),
        }
        if id == options.assignment_attribute_id
            && let Some(text) = assignment_text(value, options)
            && let Some(matched) = apply_value_pattern(&text, options)
        {
            assignment_matches.push(matched);
        }
    }

    let error = match Code::from_u8(datagram[0]) {
        Some(Code::AccessAccept) => None,
        Some(Code::AccessReject) => Some(AuthFailure::AccessReject),
        Some(Code::AccessChallenge) => Some(AuthFailure::AccessChallenge),
        Some(Code::AccessRequest) | None => Some(AuthFailure::UnknownCode),
    };

    let ok = error.is_none();
    AuthResult {
        ok,
        // First match wins when a server sends several matching attributes.
        class: if ok {
            assignment_matches.into_iter().next()
        } else {
            None
        },
        attributes,
        raw: Some(raw_hex),
        error,
    }
}

/// Run one authentication transaction against `host`
///
/// Timeouts and protocol-level rejections come back as [`AuthResult`]
/// outcomes; socket faults propagate as errors.
pub async fn authenticate(
    host: &str,
    user: &str,
    password: &str,
    options: &ProtocolOptions,
) -> ClientResult<AuthResult> {
    let (request, request_authenticator) = build_access_request(user, password, options)?;

    let socket = UdpSocket::bind("0.0.0.0:0").await?;
    socket.send_to(&request, (host, options.port)).await?;
    debug!(host, port = options.port, len = request.len(), "access-request sent");

    let mut buf = [0u8; Packet::MAX_PACKET_SIZE];
    match timeout(options.timeout, socket.recv_from(&mut buf)).await {
        Ok(Ok((len, _peer))) => Ok(classify_response(
            &buf[..len],
            &request_authenticator,
            options,
        )),
        Ok(Err(e)) => Err(e.into()),
        Err(_) => {
            debug!(host, timeout_ms = options.timeout.as_millis() as u64, "authentication timed out");
            Ok(AuthResult::failure(AuthFailure::Timeout))
        }
    }
}
