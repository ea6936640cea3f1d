//! Public Suffix List (PSL) lookups for cookie scoping.
//!
//! Two consumers:
//! - domain validation, which refuses `Domain=` attributes naming a public
//!   suffix (supercookie prevention);
//! - same-site classification, which compares the "second-level domain"
//!   (registrable label plus its public suffix) of two hosts.
//!
//! Uses Mozilla's Public Suffix List compiled into the `psl` crate. The list
//! is immutable and shared by the whole process.

use psl::{List, Psl};
use std::borrow::Cow;
use std::net::IpAddr;

/// Check if a domain is a public suffix (e.g., "com", "co.uk").
/// Returns true if the domain itself is a public suffix.
pub fn is_public_suffix(domain: &str) -> bool {
    let domain = ascii_lower(domain);
    let domain_bytes = domain.as_bytes();

    match List.suffix(domain_bytes) {
        Some(suffix) => suffix.as_bytes() == domain_bytes,
        None => false,
    }
}

/// Find the second-level domain of `host`: the shortest suffix of the host
/// that is not itself a public suffix.
///
/// `"dev.lightpanda.io"` gives `"lightpanda.io"`, `"a.b.example.co.uk"` gives
/// `"example.co.uk"`. Single-label hosts and IP addresses come back unchanged,
/// as does a host made only of public-suffix labels.
pub fn find_second_level_domain(host: &str) -> &str {
    if !host.contains('.') || host.parse::<IpAddr>().is_ok() {
        return host;
    }

    // Walk leftward one label at a time.
    let mut end = host.len();
    while let Some(dot) = host[..end].rfind('.') {
        let candidate = &host[dot + 1..];
        if !candidate.is_empty() && !is_public_suffix(candidate) {
            return candidate;
        }
        end = dot;
    }

    host
}

/// Whether a request from `origin_host` to `target_host` is same-site.
pub fn are_same_site(origin_host: &str, target_host: &str) -> bool {
    if origin_host.eq_ignore_ascii_case(target_host) {
        return true;
    }

    let origin = find_second_level_domain(origin_host);
    let target = find_second_level_domain(target_host);
    origin.eq_ignore_ascii_case(target)
}

/// Check if a cookie domain is valid for a given URL host.
///
/// The cookie domain (leading dot ignored) must not be a bare single-label
/// name (other than `localhost`) nor a public suffix, and the URL host must
/// equal it or be one of its subdomains.
pub fn is_valid_cookie_domain(cookie_domain: &str, url_host: &str) -> bool {
    let cookie_domain = cookie_domain.strip_prefix('.').unwrap_or(cookie_domain);
    if cookie_domain.is_empty() {
        return false;
    }

    let is_localhost = cookie_domain.eq_ignore_ascii_case("localhost");

    // 1. No cookies for a TLD, nor for any public suffix
    if !is_localhost && (!cookie_domain.contains('.') || is_public_suffix(cookie_domain)) {
        return false;
    }

    // 2. URL host must match or be a subdomain of cookie domain
    if url_host.eq_ignore_ascii_case(cookie_domain) {
        return true;
    }

    let (host, domain) = (url_host.as_bytes(), cookie_domain.as_bytes());
    host.len() > domain.len()
        && host[host.len() - domain.len() - 1] == b'.'
        && host[host.len() - domain.len()..].eq_ignore_ascii_case(domain)
}

fn ascii_lower(s: &str) -> Cow<'_, str> {
    if s.bytes().any(|b| b.is_ascii_uppercase()) {
        Cow::Owned(s.to_ascii_lowercase())
    } else {
        Cow::Borrowed(s)
    }
}
