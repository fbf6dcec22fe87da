//! SSRF (Server-Side Request Forgery) validation utilities
//!
//! Remote image fetching must not become a way to probe the server's own network:
//! - Rejecting private/internal IP addresses
//! - Rejecting localhost and internal hostnames
//! - Resolving hostnames and validating resolved IPs (prevents DNS rebinding)

use reqwest::Url;
use std::net::{IpAddr, Ipv6Addr};
use tokio::net::lookup_host;

/// Validate that a fetch target is a public http(s) host
///
/// Returns `Err` with a human-readable reason when the URL is unsafe.
pub async fn validate_url_for_ssrf(url: &Url) -> Result<(), String> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err("URL must start with http:// or https://".to_string());
    }

    let host = url
        .host_str()
        .ok_or_else(|| "URL must have a host".to_string())?;
    let host = host.trim_start_matches('[').trim_end_matches(']');

    if let Ok(ip) = host.parse::<IpAddr>() {
        if is_private_ip(&ip) {
            return Err("Private/internal IP addresses are not allowed".to_string());
        }
        return Ok(());
    }

    let host_lower = host.to_lowercase();
    if host_lower == "localhost"
        || host_lower.ends_with(".localhost")
        || host_lower.ends_with(".local")
        || host_lower.ends_with(".internal")
    {
        return Err("Localhost and internal hostnames are not allowed".to_string());
    }

    let port = url.port_or_known_default().unwrap_or(80);
    match lookup_host((host, port)).await {
        Ok(addrs) => {
            for addr in addrs {
                if is_private_ip(&addr.ip()) {
                    return Err(format!(
                        "Hostname resolves to private/internal IP address: {}",
                        addr.ip()
                    ));
                }
            }
        }
        Err(e) => {
            // The request itself will fail on an unresolvable host
            tracing::warn!(host = %host, error = %e, "Failed to resolve hostname for SSRF validation");
        }
    }

    Ok(())
}

/// Check if an IP address is private/internal
///
/// Returns true for:
/// - IPv4 private ranges: 10.0.0.0/8, 172.16.0.0/12, 192.168.0.0/16
/// - IPv4 loopback 127.0.0.0/8, link-local 169.254.0.0/16, multicast, 0.0.0.0/8
/// - IPv6 loopback, unspecified, multicast, link-local fe80::/10, unique local fc00::/7
/// - IPv4-mapped IPv6 addresses of any of the above
fn is_private_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(ipv4) => {
            let octets = ipv4.octets();
            octets[0] == 10
                || (octets[0] == 172 && (16..=31).contains(&octets[1]))
                || (octets[0] == 192 && octets[1] == 168)
                || octets[0] == 127
                || (octets[0] == 169 && octets[1] == 254)
                || (224..=239).contains(&octets[0])
                || octets[0] == 0
        }
        IpAddr::V6(ipv6) => {
            if let Some(mapped) = ipv6.to_ipv4_mapped() {
                return is_private_ip(&IpAddr::V4(mapped));
            }
            ipv6.is_loopback()
                || ipv6.is_unspecified()
                || ipv6.is_multicast()
                || is_ipv6_link_local(ipv6)
                || is_ipv6_unique_local(ipv6)
        }
    }
}

/// fe80::/10
fn is_ipv6_link_local(ip: &Ipv6Addr) -> bool {
    ip.segments()[0] & 0xffc0 == 0xfe80
}

/// fc00::/7
fn is_ipv6_unique_local(ip: &Ipv6Addr) -> bool {
    ip.segments()[0] & 0xfe00 == 0xfc00
}
