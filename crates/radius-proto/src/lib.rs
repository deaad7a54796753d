//! RADIUS wire protocol for a PAP authentication client
//!
//! This crate implements the subset of RFC 2865 and RFC 2869 a password
//! authentication client needs:
//!
//! - Packet and attribute encoding and decoding
//! - A static attribute dictionary with typed value decoding
//! - PAP User-Password obfuscation
//! - Request/Response Authenticator calculation and verification
//! - The Message-Authenticator attribute (HMAC-MD5)
//!
//! # Example
//!
//! ```rust
//! use radius_proto::{Attribute, AttributeType, Code, Packet};
//! use radius_proto::auth::{encrypt_user_password, generate_request_authenticator};
//!
//! let req_auth = generate_request_authenticator();
//! let mut packet = Packet::new(Code::AccessRequest, 1, req_auth);
//!
//! packet.add_attribute(
//!     Attribute::string(AttributeType::UserName as u8, "alice").unwrap()
//! );
//!
//! let encrypted = encrypt_user_password("password", b"secret", &req_auth);
//! packet.add_attribute(
//!     Attribute::new(AttributeType::UserPassword as u8, encrypted).unwrap()
//! );
//!
//! let bytes = packet.encode().unwrap();
//! ```

pub mod attributes;
pub mod auth;
pub mod decode;
pub mod dictionary;
pub mod message_auth;
pub mod packet;

pub use attributes::{Attribute, AttributeType, AttributeWalker};
pub use auth::{
    calculate_response_authenticator, decrypt_user_password, encrypt_user_password,
    generate_identifier, generate_request_authenticator, verify_response_authenticator,
};
pub use decode::{DecodedAttribute, DecodedValue, VendorSubAttribute, decode_attribute, to_hex};
pub use dictionary::{DictionaryEntry, ValueKind};
pub use message_auth::{calculate_message_authenticator, verify_message_authenticator};
pub use packet::{Code, Packet, PacketError};
