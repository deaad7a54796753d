//! Failover RADIUS authentication client
//!
//! This crate provides PAP (RFC 2865) password authentication over UDP
//! against an ordered pool of RADIUS servers, built on the `radius-proto`
//! wire implementation.
//!
//! # Features
//!
//! - Async I/O with Tokio; one socket per transaction
//! - Message-Authenticator (RFC 2869) on every request
//! - Response-Authenticator verification and typed attribute decoding
//! - Primary-preferred failover with on-demand and scheduled health probes
//! - Assignment-value extraction (Class or a configured Vendor-Specific)
//!
//! # Example
//!
//! ```rust,no_run
//! use radius_client::{ClientConfig, RadiusClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config: ClientConfig = serde_json::from_str(r#"{
//!         "host": "10.0.0.1",
//!         "hosts": ["10.0.0.1", "10.0.0.2"],
//!         "secret": "testing123",
//!         "health_check_user": "probe",
//!         "health_check_password": "probe-pass"
//!     }"#)?;
//!
//!     let client = RadiusClient::new(config)?;
//!     let result = client.authenticate("alice", "password").await?;
//!     if result.ok {
//!         println!("accepted, class = {:?}", result.class);
//!     }
//!     client.shutdown();
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod engine;
pub mod error;
pub mod failover;
pub mod health;
pub mod result;

pub use client::RadiusClient;
pub use config::{ClientConfig, MIN_HEALTH_CHECK_INTERVAL_MS};
pub use engine::ProtocolOptions;
pub use error::{ClientError, ClientResult};
pub use failover::FailoverController;
pub use health::{HostHealth, HostHealthSnapshot};
pub use result::{AuthFailure, AuthResult};
