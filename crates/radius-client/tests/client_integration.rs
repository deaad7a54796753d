//! Integration tests for the failover RADIUS client
//!
//! Each test stands up mock RADIUS servers on distinct loopback addresses
//! (127.0.0.1/2/3 share one port, mirroring a real pool) and drives the
//! full client: initial selection, explicit failover, timeout-triggered
//! background failover, and end-to-end attribute decoding.

use radius_client::{AuthFailure, ClientConfig, RadiusClient};
use radius_proto::auth::calculate_response_authenticator;
use radius_proto::{Attribute, Code, Packet, decrypt_user_password, verify_message_authenticator};
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;
use tokio::time::sleep;

const SECRET: &[u8] = b"testing123";

/// What a mock server does with each Access-Request
#[derive(Clone)]
enum Behavior {
    /// Respond Access-Accept with these attributes
    Accept(Vec<(u8, Vec<u8>)>),
    /// Respond Access-Reject
    Reject,
    /// Respond with a datagram too short to be RADIUS
    Garbage,
    /// Sign the response with the wrong secret
    WrongSecret,
}

struct MockServer {
    handle: JoinHandle<()>,
}

impl MockServer {
    fn stop(&self) {
        self.handle.abort();
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn spawn_server(ip: &str, port: u16, behavior: Behavior) -> MockServer {
    let socket = UdpSocket::bind((ip, port))
        .await
        .expect("Failed to bind mock RADIUS server");

    let handle = tokio::spawn(async move {
        let mut buf = [0u8; 4096];
        loop {
            let Ok((len, peer)) = socket.recv_from(&mut buf).await else {
                break;
            };
            let datagram = &buf[..len];

            if let Behavior::Garbage = behavior {
                let _ = socket.send_to(&[0xde, 0xad, 0xbe], peer).await;
                continue;
            }

            let Ok(request) = Packet::decode(datagram) else {
                continue;
            };
            // The client always appends Message-Authenticator last; a
            // request failing the HMAC check is dropped, like a real
            // server configured to require the attribute.
            if !verify_message_authenticator(datagram, SECRET, len - 16) {
                continue;
            }
            // The PAP password must at least decrypt cleanly.
            if let Some(attr) = request.find_attribute(2)
                && decrypt_user_password(&attr.value, SECRET, &request.authenticator).is_err()
            {
                continue;
            }

            let (code, attrs, secret): (Code, Vec<(u8, Vec<u8>)>, &[u8]) = match &behavior {
                Behavior::Accept(attrs) => (Code::AccessAccept, attrs.clone(), SECRET),
                Behavior::Reject => (
                    Code::AccessReject,
                    vec![(18, b"denied".to_vec())],
                    SECRET,
                ),
                Behavior::WrongSecret => (Code::AccessAccept, vec![], b"not-the-secret"),
                Behavior::Garbage => unreachable!(),
            };

            let mut response = Packet::new(code, request.identifier, [0u8; 16]);
            for (id, value) in attrs {
                response.add_attribute(Attribute::new(id, value).unwrap());
            }
            let mut bytes = response.encode().unwrap();
            let auth = calculate_response_authenticator(&bytes, &request.authenticator, secret);
            bytes[4..20].copy_from_slice(&auth);
            let _ = socket.send_to(&bytes, peer).await;
        }
    });

    MockServer { handle }
}

/// Route client logs to the test output; run with RUST_LOG=debug to watch
/// probe sequences. Safe to call from every test, only the first init wins.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn config(hosts: &[&str], port: u16) -> ClientConfig {
    init_tracing();
    serde_json::from_value(serde_json::json!({
        "host": hosts[0],
        "hosts": hosts,
        "secret": "testing123",
        "port": port,
        "timeout_ms": 200,
        "health_check_timeout_ms": 200,
        "health_check_user": "probe",
        "health_check_password": "probe-pass",
    }))
    .unwrap()
}

/// Poll `cond` every 50ms until it holds or `timeout_ms` elapses
async fn wait_for(cond: impl Fn() -> bool, timeout_ms: u64) -> bool {
    let deadline = tokio::time::Instant::now() + Duration::from_millis(timeout_ms);
    while tokio::time::Instant::now() < deadline {
        if cond() {
            return true;
        }
        sleep(Duration::from_millis(50)).await;
    }
    cond()
}

async fn wait_until_probed(client: &RadiusClient, host: &str) {
    assert!(
        wait_for(
            || client
                .health()
                .iter()
                .any(|s| s.host == host && s.last_ok_at.is_some()),
            3_000,
        )
        .await,
        "host {host} was never probed alive"
    );
    // Let the probing sequence release its guard.
    sleep(Duration::from_millis(100)).await;
}

#[tokio::test]
async fn test_initial_selection_chooses_first_responsive_host() {
    let port = 28120;
    let _primary = spawn_server("127.0.0.1", port, Behavior::Accept(vec![])).await;
    // 127.0.0.2 and 127.0.0.3 stay silent.

    let client = RadiusClient::new(config(&["127.0.0.1", "127.0.0.2", "127.0.0.3"], port)).unwrap();
    wait_until_probed(&client, "127.0.0.1").await;

    assert_eq!(client.active_host(), "127.0.0.1");
    client.shutdown();
}

#[tokio::test]
async fn test_initial_selection_skips_dead_primary() {
    let port = 28130;
    // Primary never answers; the second host does.
    let _secondary = spawn_server("127.0.0.2", port, Behavior::Accept(vec![])).await;

    let client = RadiusClient::new(config(&["127.0.0.1", "127.0.0.2"], port)).unwrap();
    wait_until_probed(&client, "127.0.0.2").await;

    assert_eq!(client.active_host(), "127.0.0.2");
    let snapshot = client.health();
    assert!(snapshot[0].consecutive_failures > 0);
    assert_eq!(snapshot[1].consecutive_failures, 0);
    client.shutdown();
}

#[tokio::test]
async fn test_explicit_failover_rotates_to_next_host() {
    let port = 28140;
    let primary = spawn_server("127.0.0.1", port, Behavior::Accept(vec![])).await;
    let _secondary = spawn_server("127.0.0.2", port, Behavior::Accept(vec![])).await;

    let client = RadiusClient::new(config(&["127.0.0.1", "127.0.0.2", "127.0.0.3"], port)).unwrap();
    wait_until_probed(&client, "127.0.0.1").await;
    assert_eq!(client.active_host(), "127.0.0.1");

    primary.stop();
    let promoted = client.failover().await;
    assert_eq!(promoted.as_deref(), Some("127.0.0.2"));
    assert_eq!(client.active_host(), "127.0.0.2");
    client.shutdown();
}

#[tokio::test]
async fn test_failover_with_no_responsive_hosts_returns_none() {
    let port = 28150;
    // Nothing is listening anywhere.
    let client = RadiusClient::new(config(&["127.0.0.1", "127.0.0.2"], port)).unwrap();

    // Let initial selection fail through the whole pool first.
    assert!(
        wait_for(
            || client.health().iter().all(|s| s.consecutive_failures > 0),
            3_000,
        )
        .await
    );
    sleep(Duration::from_millis(100)).await;

    assert_eq!(client.failover().await, None);
    // Fallback probe target is still the pool's primary.
    assert_eq!(client.active_host(), "127.0.0.1");
    client.shutdown();
}

#[tokio::test]
async fn test_timeout_triggers_background_failover() {
    let port = 28160;
    let primary = spawn_server("127.0.0.1", port, Behavior::Accept(vec![])).await;
    let _secondary = spawn_server("127.0.0.2", port, Behavior::Accept(vec![])).await;

    let client = RadiusClient::new(config(&["127.0.0.1", "127.0.0.2"], port)).unwrap();
    wait_until_probed(&client, "127.0.0.1").await;

    primary.stop();
    let result = client.authenticate("alice", "password").await.unwrap();
    assert!(!result.ok);
    assert_eq!(result.error, Some(AuthFailure::Timeout));

    // The background reaction probes the dead primary, then fails over.
    assert!(wait_for(|| client.active_host() == "127.0.0.2", 3_000).await);

    let retry = client.authenticate("alice", "password").await.unwrap();
    assert!(retry.ok);
    client.shutdown();
}

#[tokio::test]
async fn test_access_reject_does_not_trigger_failover() {
    let port = 28170;
    let _primary = spawn_server("127.0.0.1", port, Behavior::Reject).await;
    let _secondary = spawn_server("127.0.0.2", port, Behavior::Accept(vec![])).await;

    let client = RadiusClient::new(config(&["127.0.0.1", "127.0.0.2"], port)).unwrap();
    // A reject proves liveness, so the primary still wins selection.
    wait_until_probed(&client, "127.0.0.1").await;
    assert_eq!(client.active_host(), "127.0.0.1");

    let result = client.authenticate("alice", "password").await.unwrap();
    assert!(!result.ok);
    assert_eq!(result.error, Some(AuthFailure::AccessReject));
    assert!(result.raw.is_some());

    sleep(Duration::from_millis(500)).await;
    assert_eq!(client.active_host(), "127.0.0.1");
    client.shutdown();
}

#[tokio::test]
async fn test_accept_decodes_attributes_end_to_end() {
    let port = 28180;
    let mut vsa = 9u32.to_be_bytes().to_vec();
    vsa.extend_from_slice(&[1, 4, 0x41, 0x42]);
    let attrs = vec![
        (1, b"alice".to_vec()),
        (4, vec![192, 168, 1, 1]),
        (5, 12345u32.to_be_bytes().to_vec()),
        (25, b"staff".to_vec()),
        (26, vsa),
    ];
    let _server = spawn_server("127.0.0.1", port, Behavior::Accept(attrs)).await;

    let client = RadiusClient::new(config(&["127.0.0.1"], port)).unwrap();
    let result = client.authenticate("alice", "password").await.unwrap();

    assert!(result.ok);
    assert_eq!(result.class.as_deref(), Some("staff"));

    let by_id = |id: u8| {
        result
            .attributes
            .iter()
            .find(|a| a.id == id)
            .unwrap_or_else(|| panic!("attribute {id} missing"))
    };
    assert_eq!(by_id(1).name, "User-Name");
    assert_eq!(
        serde_json::to_value(&by_id(1).value).unwrap(),
        serde_json::json!("alice")
    );
    assert_eq!(
        serde_json::to_value(&by_id(4).value).unwrap(),
        serde_json::json!("192.168.1.1")
    );
    assert_eq!(
        serde_json::to_value(&by_id(5).value).unwrap(),
        serde_json::json!(12345)
    );

    let vsa = by_id(26);
    assert_eq!(vsa.vendor_id, Some(9));
    assert_eq!(
        serde_json::to_value(&vsa.value).unwrap(),
        serde_json::json!([{ "vendor_type": 1, "value_hex": "4142" }])
    );

    client.shutdown();
}

#[tokio::test]
async fn test_wrong_secret_yields_authenticator_mismatch_but_counts_alive() {
    let port = 28190;
    let _server = spawn_server("127.0.0.1", port, Behavior::WrongSecret).await;

    let client = RadiusClient::new(config(&["127.0.0.1"], port)).unwrap();
    wait_until_probed(&client, "127.0.0.1").await;

    // A mismatching server is still a live server.
    assert_eq!(client.health()[0].consecutive_failures, 0);

    let result = client.authenticate("alice", "password").await.unwrap();
    assert!(!result.ok);
    assert_eq!(result.error, Some(AuthFailure::AuthenticatorMismatch));
    assert!(result.raw.is_some());
    client.shutdown();
}

#[tokio::test]
async fn test_garbage_responder_is_marked_dead() {
    let port = 28200;
    let _primary = spawn_server("127.0.0.1", port, Behavior::Garbage).await;
    let _secondary = spawn_server("127.0.0.2", port, Behavior::Accept(vec![])).await;

    let client = RadiusClient::new(config(&["127.0.0.1", "127.0.0.2"], port)).unwrap();
    wait_until_probed(&client, "127.0.0.2").await;

    assert_eq!(client.active_host(), "127.0.0.2");
    assert!(client.health()[0].consecutive_failures > 0);

    let result = client.authenticate("alice", "password").await.unwrap();
    assert!(result.ok);
    client.shutdown();
}
