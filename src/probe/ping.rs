//! Ping prober with native ICMP and command fallback.
//!
//! Native echo requests run on blocking sockets inside `spawn_blocking`;
//! when raw sockets are unavailable the system `ping` binary is used.

use std::mem::MaybeUninit;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::process::Stdio;
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use socket2::{Domain, Protocol, Socket, Type};
use tokio::process::Command;

use super::{ProbeError, Prober};

/// ICMP capability state, detected once per process.
#[derive(Debug, Clone, Copy, PartialEq)]
enum IcmpCapability {
    Native,
    CommandOnly,
}

static ICMP_CAPABILITY: OnceLock<IcmpCapability> = OnceLock::new();

/// Echo request sequence counter so concurrent probes stay distinguishable.
static PING_SEQUENCE: AtomicU16 = AtomicU16::new(0);

fn generate_ping_id() -> (u16, u16) {
    let identifier: u16 = rand::random();
    let sequence = PING_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    (identifier, sequence)
}

/// Detect ICMP capability by attempting to create a socket.
fn detect_icmp_capability() -> IcmpCapability {
    // RAW needs CAP_NET_RAW or root; DGRAM works unprivileged on Linux with
    // ping_group_range set, and on macOS.
    if Socket::new(Domain::IPV4, Type::RAW, Some(Protocol::ICMPV4)).is_ok() {
        tracing::info!("Ping prober: using native ICMP (RAW socket, privileged)");
        return IcmpCapability::Native;
    }

    if Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::ICMPV4)).is_ok() {
        tracing::info!("Ping prober: using native ICMP (DGRAM socket, unprivileged)");
        return IcmpCapability::Native;
    }

    tracing::info!("Ping prober: native ICMP unavailable, using command fallback");
    IcmpCapability::CommandOnly
}

/// Reachability prober speaking ICMP echo.
pub struct PingProber;

impl PingProber {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PingProber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Prober for PingProber {
    async fn probe(&self, host: &str, timeout: Duration) -> Result<bool, ProbeError> {
        match ping_once(host, timeout).await {
            Ok(()) => Ok(true),
            Err(ProbeError::Timeout(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// Send one echo request and wait for the matching reply.
async fn ping_once(host: &str, timeout: Duration) -> Result<(), ProbeError> {
    let capability = *ICMP_CAPABILITY.get_or_init(detect_icmp_capability);

    if capability == IcmpCapability::Native {
        let ip = resolve_address(host).await?;
        let host_owned = host.to_string();

        let result = tokio::task::spawn_blocking(move || run_blocking_ping(ip, timeout))
            .await
            .map_err(|e| ProbeError::Internal(format!("ping task failed: {}", e)))?;

        return match result {
            Err(e) if is_permission_error(&e) => {
                tracing::warn!(
                    "Native ping for {} hit a permission error, falling back to command: {}",
                    host_owned,
                    e
                );
                run_ping_command(&host_owned, timeout).await
            }
            other => other,
        };
    }

    run_ping_command(host, timeout).await
}

fn is_permission_error(err: &ProbeError) -> bool {
    let text = err.to_string();
    text.contains("Permission")
        || text.contains("Operation not permitted")
        || text.contains("denied")
}

/// Resolve hostname to IP address.
async fn resolve_address(address: &str) -> Result<IpAddr, ProbeError> {
    if let Ok(ip) = address.parse::<IpAddr>() {
        return Ok(ip);
    }

    let addrs: Vec<_> = tokio::net::lookup_host(format!("{}:0", address))
        .await
        .map_err(|e| ProbeError::Network(format!("DNS resolution failed: {}", e)))?
        .collect();

    addrs
        .into_iter()
        .next()
        .map(|sa| sa.ip())
        .ok_or_else(|| ProbeError::Network(format!("no addresses found for {}", address)))
}

/// Blocking ICMP echo round-trip, run in a dedicated thread.
fn run_blocking_ping(ip: IpAddr, timeout: Duration) -> Result<(), ProbeError> {
    match ip {
        IpAddr::V4(v4) => run_blocking_ping_v4(v4, timeout),
        IpAddr::V6(v6) => run_blocking_ping_v6(v6, timeout),
    }
}

fn open_icmp_socket(
    domain: Domain,
    protocol: Protocol,
    timeout: Duration,
) -> Result<Socket, ProbeError> {
    let socket = Socket::new(domain, Type::RAW, Some(protocol))
        .or_else(|_| Socket::new(domain, Type::DGRAM, Some(protocol)))
        .map_err(|e| ProbeError::Network(format!("failed to create ICMP socket: {}", e)))?;

    socket
        .set_read_timeout(Some(timeout))
        .map_err(|e| ProbeError::Network(format!("failed to set timeout: {}", e)))?;
    socket
        .set_write_timeout(Some(timeout))
        .map_err(|e| ProbeError::Network(format!("failed to set timeout: {}", e)))?;

    Ok(socket)
}

fn run_blocking_ping_v4(ip: Ipv4Addr, timeout: Duration) -> Result<(), ProbeError> {
    let socket = open_icmp_socket(Domain::IPV4, Protocol::ICMPV4, timeout)?;

    let dest = SocketAddr::new(IpAddr::V4(ip), 0);
    socket
        .connect(&dest.into())
        .map_err(|e| ProbeError::Network(format!("failed to connect: {}", e)))?;

    let (identifier, sequence) = generate_ping_id();
    let packet = build_icmp_echo_request(identifier, sequence);

    let deadline = Instant::now() + timeout;
    socket.send(&packet).map_err(|e| {
        if e.kind() == std::io::ErrorKind::PermissionDenied {
            ProbeError::Network(format!("Permission denied: {}", e))
        } else {
            ProbeError::Network(format!("failed to send: {}", e))
        }
    })?;

    // Wait for OUR reply; unrelated ICMP traffic on the socket is skipped.
    loop {
        let mut buf: [MaybeUninit<u8>; 1500] = unsafe { MaybeUninit::uninit().assume_init() };
        let len = socket.recv(&mut buf).map_err(|e| {
            if e.kind() == std::io::ErrorKind::WouldBlock
                || e.kind() == std::io::ErrorKind::TimedOut
            {
                ProbeError::Timeout(timeout)
            } else {
                ProbeError::Network(format!("failed to receive: {}", e))
            }
        })?;
        // SAFETY: recv initialized `len` bytes
        let buf: &[u8] = unsafe { std::slice::from_raw_parts(buf.as_ptr() as *const u8, len) };

        if Instant::now() >= deadline {
            return Err(ProbeError::Timeout(timeout));
        }

        // DGRAM sockets deliver just the ICMP message; RAW sockets prepend
        // the IP header.
        if len >= 8 {
            let icmp_offset = if buf[0] >> 4 == 4 { 20 } else { 0 };
            if len > icmp_offset + 7 {
                let reply_type = buf[icmp_offset];
                let reply_id = u16::from_be_bytes([buf[icmp_offset + 4], buf[icmp_offset + 5]]);
                let reply_seq = u16::from_be_bytes([buf[icmp_offset + 6], buf[icmp_offset + 7]]);

                // ICMP type 0 = Echo Reply
                if reply_type == 0 && reply_id == identifier && reply_seq == sequence {
                    return Ok(());
                }
            }
        }
    }
}

fn run_blocking_ping_v6(ip: Ipv6Addr, timeout: Duration) -> Result<(), ProbeError> {
    let socket = open_icmp_socket(Domain::IPV6, Protocol::ICMPV6, timeout)?;

    let dest = SocketAddr::new(IpAddr::V6(ip), 0);
    socket
        .connect(&dest.into())
        .map_err(|e| ProbeError::Network(format!("failed to connect: {}", e)))?;

    let (identifier, sequence) = generate_ping_id();
    let packet = build_icmpv6_echo_request(identifier, sequence);

    let deadline = Instant::now() + timeout;
    socket.send(&packet).map_err(|e| {
        if e.kind() == std::io::ErrorKind::PermissionDenied {
            ProbeError::Network(format!("Permission denied: {}", e))
        } else {
            ProbeError::Network(format!("failed to send: {}", e))
        }
    })?;

    loop {
        let mut buf: [MaybeUninit<u8>; 1500] = unsafe { MaybeUninit::uninit().assume_init() };
        let len = socket.recv(&mut buf).map_err(|e| {
            if e.kind() == std::io::ErrorKind::WouldBlock
                || e.kind() == std::io::ErrorKind::TimedOut
            {
                ProbeError::Timeout(timeout)
            } else {
                ProbeError::Network(format!("failed to receive: {}", e))
            }
        })?;
        // SAFETY: recv initialized `len` bytes
        let buf: &[u8] = unsafe { std::slice::from_raw_parts(buf.as_ptr() as *const u8, len) };

        if Instant::now() >= deadline {
            return Err(ProbeError::Timeout(timeout));
        }

        // ICMPv6 type 129 = Echo Reply
        if len >= 8 {
            let reply_type = buf[0];
            let reply_id = u16::from_be_bytes([buf[4], buf[5]]);
            let reply_seq = u16::from_be_bytes([buf[6], buf[7]]);

            if reply_type == 129 && reply_id == identifier && reply_seq == sequence {
                return Ok(());
            }
        }
    }
}

/// Build an ICMP Echo Request packet (type 8, code 0).
fn build_icmp_echo_request(identifier: u16, sequence: u16) -> Vec<u8> {
    let mut packet = vec![0u8; 64]; // 8 byte header + 56 byte payload

    packet[0] = 8; // Type: Echo Request
    packet[1] = 0; // Code: 0
    // Checksum at [2..4], computed below
    packet[4..6].copy_from_slice(&identifier.to_be_bytes());
    packet[6..8].copy_from_slice(&sequence.to_be_bytes());

    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64;
    packet[8..16].copy_from_slice(&timestamp.to_be_bytes());

    let checksum = icmp_checksum(&packet);
    packet[2..4].copy_from_slice(&checksum.to_be_bytes());

    packet
}

/// Build an ICMPv6 Echo Request packet (type 128, code 0).
/// The kernel fills in the checksum for ICMPv6 sockets.
fn build_icmpv6_echo_request(identifier: u16, sequence: u16) -> Vec<u8> {
    let mut packet = vec![0u8; 64];

    packet[0] = 128; // Type: Echo Request
    packet[1] = 0; // Code: 0
    packet[4..6].copy_from_slice(&identifier.to_be_bytes());
    packet[6..8].copy_from_slice(&sequence.to_be_bytes());

    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64;
    packet[8..16].copy_from_slice(&timestamp.to_be_bytes());

    packet
}

/// Compute ICMP checksum (RFC 1071).
fn icmp_checksum(data: &[u8]) -> u16 {
    let mut sum: u32 = 0;
    let mut i = 0;

    while i < data.len() - 1 {
        sum += u16::from_be_bytes([data[i], data[i + 1]]) as u32;
        i += 2;
    }

    if i < data.len() {
        sum += (data[i] as u32) << 8;
    }

    while sum >> 16 != 0 {
        sum = (sum & 0xFFFF) + (sum >> 16);
    }

    !sum as u16
}

/// Ping via the system binary (fallback when raw sockets are unavailable).
async fn run_ping_command(address: &str, timeout: Duration) -> Result<(), ProbeError> {
    let timeout_secs = timeout.as_secs().max(1);

    let output = Command::new("ping")
        .args(["-c", "1", "-W", &timeout_secs.to_string(), address])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| ProbeError::Command(format!("failed to execute ping: {}", e)))?;

    if output.status.success() {
        return Ok(());
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    if output_indicates_no_reply(&stdout, &stderr) {
        return Err(ProbeError::Timeout(timeout));
    }

    Err(ProbeError::Command(format!(
        "ping failed: {}",
        if stderr.is_empty() { stdout } else { stderr }
    )))
}

/// Distinguish "no reply" from a broken ping invocation.
fn output_indicates_no_reply(stdout: &str, stderr: &str) -> bool {
    stderr.contains("timeout")
        || stdout.contains("100% packet loss")
        || stdout.contains("100.0% packet loss")
        || stdout.contains("Request timeout")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icmp_checksum() {
        let mut packet = vec![0u8; 8];
        packet[0] = 8; // Echo request
        packet[1] = 0;
        packet[4] = 0x12;
        packet[5] = 0x34;
        packet[6] = 0x00;
        packet[7] = 0x01;

        let checksum = icmp_checksum(&packet);
        assert_ne!(checksum, 0);
    }

    #[test]
    fn test_build_icmp_packet() {
        let packet = build_icmp_echo_request(0x1234, 0x0001);
        assert_eq!(packet.len(), 64);
        assert_eq!(packet[0], 8); // Type
        assert_eq!(packet[1], 0); // Code
        assert_eq!(packet[4..6], [0x12, 0x34]); // ID
        assert_eq!(packet[6..8], [0x00, 0x01]); // Sequence
    }

    #[test]
    fn test_build_icmpv6_packet() {
        let packet = build_icmpv6_echo_request(0xBEEF, 0x0007);
        assert_eq!(packet.len(), 64);
        assert_eq!(packet[0], 128);
        assert_eq!(packet[4..6], [0xBE, 0xEF]);
        assert_eq!(packet[6..8], [0x00, 0x07]);
    }

    #[test]
    fn test_no_reply_detection_linux() {
        let stdout = r#"PING 192.0.2.1 (192.0.2.1) 56(84) bytes of data.

--- 192.0.2.1 ping statistics ---
1 packets transmitted, 0 received, 100% packet loss, time 0ms"#;
        assert!(output_indicates_no_reply(stdout, ""));
    }

    #[test]
    fn test_no_reply_detection_macos() {
        let stdout = "Request timeout for icmp_seq 0";
        assert!(output_indicates_no_reply(stdout, ""));
    }

    #[test]
    fn test_broken_invocation_is_not_no_reply() {
        assert!(!output_indicates_no_reply(
            "",
            "ping: unknown host nope.invalid"
        ));
    }

    #[test]
    fn test_unique_ping_sequences() {
        let (_, seq1) = generate_ping_id();
        let (_, seq2) = generate_ping_id();
        assert_ne!(seq1, seq2);
    }
}
