//! URL validation utilities for SSRF protection
//!
//! Audio URLs submitted for transcription are fetched by the relay itself, so they
//! must be screened before any request is made. A URL is accepted when it:
//! - Uses the `http` or `https` scheme
//! - Has a host
//! - Does not point to (or resolve to) a private/internal IP address, unless the
//!   caller explicitly allows private targets

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use thiserror::Error;
use tracing::warn;
use url::{Host, Url};

/// Errors that can occur during URL validation
#[derive(Debug, Error)]
pub enum UrlValidationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(#[from] url::ParseError),

    #[error("URL scheme must be http or https, got: {0}")]
    UnsupportedScheme(String),

    #[error("URL must have a host")]
    MissingHost,

    #[error("URL resolves to private/internal IP address: {0}")]
    PrivateIpDetected(IpAddr),

    #[error("Failed to resolve hostname: {0}")]
    DnsResolutionFailed(String),
}

/// Checks if an IPv4 address is private/internal
///
/// Private addresses include:
/// - Loopback (127.0.0.0/8)
/// - Private (10.0.0.0/8, 172.16.0.0/12, 192.168.0.0/16)
/// - Link-local (169.254.0.0/16)
/// - Broadcast (255.255.255.255)
/// - Documentation (192.0.2.0/24, 198.51.100.0/24, 203.0.113.0/24)
/// - Unspecified (0.0.0.0)
/// - Shared (100.64.0.0/10 - CGNAT)
pub fn is_private_ipv4(ip: &Ipv4Addr) -> bool {
    if ip.is_loopback()
        || ip.is_private()
        || ip.is_link_local()
        || ip.is_broadcast()
        || ip.is_unspecified()
        || ip.is_documentation()
    {
        return true;
    }

    let octets = ip.octets();
    // Shared address space (CGNAT) 100.64.0.0/10
    if octets[0] == 100 && (octets[1] & 0xC0) == 64 {
        return true;
    }
    // Reserved for benchmarking 198.18.0.0/15
    octets[0] == 198 && (octets[1] == 18 || octets[1] == 19)
}

/// Checks if an IPv6 address is private/internal
///
/// Covers loopback, unspecified, link-local (fe80::/10), unique local (fc00::/7),
/// documentation (2001:db8::/32) and IPv4-mapped private addresses.
pub fn is_private_ipv6(ip: &Ipv6Addr) -> bool {
    if ip.is_loopback() || ip.is_unspecified() {
        return true;
    }

    let segments = ip.segments();
    if segments[0] & 0xFFC0 == 0xFE80 || segments[0] & 0xFE00 == 0xFC00 {
        return true;
    }
    if segments[0] == 0x2001 && segments[1] == 0x0DB8 {
        return true;
    }

    if let Some(ipv4) = ip.to_ipv4_mapped() {
        return is_private_ipv4(&ipv4);
    }

    false
}

/// Checks if an IP address is private/internal
pub fn is_private_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(ipv4) => is_private_ipv4(ipv4),
        IpAddr::V6(ipv6) => is_private_ipv6(ipv6),
    }
}

fn reject_private(ip: IpAddr, host: &str) -> Result<(), UrlValidationError> {
    if is_private_ip(&ip) {
        warn!(
            host = %host,
            resolved_ip = %ip,
            "Audio URL targets a private IP address (SSRF protection)"
        );
        return Err(UrlValidationError::PrivateIpDetected(ip));
    }
    Ok(())
}

/// Validates an audio URL before the relay downloads it.
///
/// With `allow_private = false` every address the host resolves to is checked, and a
/// single private address rejects the URL. With `allow_private = true` only the
/// scheme and host checks apply (useful for local development and tests).
///
/// # Example
/// ```rust,ignore
/// use voice_relay::utils::validate_audio_url;
///
/// let url = validate_audio_url("https://cdn.example.com/voice.ogg", false).await?;
/// assert!(validate_audio_url("ftp://cdn.example.com/voice.ogg", false).await.is_err());
/// assert!(validate_audio_url("http://127.0.0.1/voice.ogg", false).await.is_err());
/// ```
pub async fn validate_audio_url(raw: &str, allow_private: bool) -> Result<Url, UrlValidationError> {
    let parsed = Url::parse(raw.trim())?;

    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(UrlValidationError::UnsupportedScheme(scheme.to_string()));
    }

    let host = parsed.host().ok_or(UrlValidationError::MissingHost)?;
    if allow_private {
        return Ok(parsed);
    }

    match host {
        Host::Ipv4(ip) => reject_private(IpAddr::V4(ip), &ip.to_string())?,
        Host::Ipv6(ip) => reject_private(IpAddr::V6(ip), &ip.to_string())?,
        Host::Domain(domain) => {
            let port = parsed.port_or_known_default().unwrap_or(443);
            let addrs: Vec<_> = tokio::net::lookup_host((domain, port))
                .await
                .map_err(|e| UrlValidationError::DnsResolutionFailed(format!("{domain}: {e}")))?
                .collect();

            if addrs.is_empty() {
                return Err(UrlValidationError::DnsResolutionFailed(format!(
                    "No addresses found for {domain}"
                )));
            }

            for addr in addrs {
                reject_private(addr.ip(), domain)?;
            }
        }
    }

    Ok(parsed)
}
