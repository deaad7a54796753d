//! Authentication result surface

use radius_proto::DecodedAttribute;
use serde::Serialize;
use std::fmt;

/// Why an authentication attempt did not produce Access-Accept
///
/// Serialized and displayed as fixed lowercase strings; these are the
/// complete set of non-accept outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthFailure {
    /// No datagram arrived before the per-call timer fired
    Timeout,
    /// Datagram shorter than the 20-byte RADIUS header
    MalformedResponse,
    /// Response-Authenticator did not match
    AuthenticatorMismatch,
    /// Server returned Access-Reject (3)
    AccessReject,
    /// Server returned Access-Challenge (11)
    AccessChallenge,
    /// Server returned a code other than 2, 3, or 11
    UnknownCode,
}

impl AuthFailure {
    pub fn as_str(self) -> &'static str {
        match self {
            AuthFailure::Timeout => "timeout",
            AuthFailure::MalformedResponse => "malformed_response",
            AuthFailure::AuthenticatorMismatch => "authenticator_mismatch",
            AuthFailure::AccessReject => "access_reject",
            AuthFailure::AccessChallenge => "access_challenge",
            AuthFailure::UnknownCode => "unknown_code",
        }
    }
}

impl fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one authentication transaction
#[derive(Debug, Clone, Serialize)]
pub struct AuthResult {
    /// True iff the server returned Access-Accept
    pub ok: bool,
    /// Extracted assignment value (first match wins), on accept only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    /// Decoded response attributes
    pub attributes: Vec<DecodedAttribute>,
    /// Hex of the raw response datagram, present whenever one arrived
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    /// Populated on every non-accept outcome
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<AuthFailure>,
}

impl AuthResult {
    /// Outcome with no response data (currently only `timeout`)
    pub(crate) fn failure(error: AuthFailure) -> Self {
        AuthResult {
            ok: false,
            class: None,
            attributes: Vec::new(),
            raw: None,
            error: Some(error),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self.error, Some(AuthFailure::Timeout))
    }
}
