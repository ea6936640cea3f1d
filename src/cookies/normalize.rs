//! Domain and path normalization for freshly parsed cookies.
//!
//! Implements the RFC 6265 "default-domain" and "default-path" algorithms
//! on top of the setting page's URL, plus the percent-encoding applied to
//! the host and path components before they are stored.

use crate::cookies::error::{CookieError, CookieResult};
use crate::cookies::psl;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::borrow::Cow;
use url::Url;

/// Characters left as-is in a host: alphanumerics and `-._~!$&'()*+,;=:[]`.
pub const HOST: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'!')
    .remove(b'$')
    .remove(b'&')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b';')
    .remove(b'=')
    .remove(b':')
    .remove(b'[')
    .remove(b']');

/// Host characters plus `/` and `@`.
pub const PATH: &AsciiSet = &HOST.remove(b'/').remove(b'@');

// `Url::path` is already escaped; existing `%XX` sequences must survive.
const URL_PATH: &AsciiSet = &PATH.remove(b'%');

/// Percent-encode a host component.
pub fn encode_host(host: &str) -> Cow<'_, str> {
    utf8_percent_encode(host, HOST).into()
}

/// Percent-encode a path component.
pub fn encode_path(path: &str) -> Cow<'_, str> {
    utf8_percent_encode(path, PATH).into()
}

/// Resolve the cookie path.
///
/// An explicit `Path=` value is used verbatim when it starts with `/`;
/// anything else falls back to the default-path of `url`: the directory
/// containing the resource, without its trailing slash.
pub fn parse_path(url: &Url, explicit_path: Option<&str>) -> String {
    if let Some(path) = explicit_path {
        if path.starts_with('/') {
            return path.to_string();
        }
    }

    default_path(url.path())
}

fn default_path(url_path: &str) -> String {
    if url_path.is_empty() || url_path == "/" || !url_path.starts_with('/') {
        return "/".to_string();
    }

    let encoded: Cow<'_, str> = utf8_percent_encode(url_path, URL_PATH).into();
    match encoded[1..].rfind('/') {
        Some(last) => encoded[..last + 1].to_string(),
        None => "/".to_string(),
    }
}

/// Resolve the cookie domain.
///
/// Without a `Domain=` attribute (or with an empty one) the cookie is
/// host-only and the domain is the lower-cased URL host. An explicit domain
/// always widens to subdomains and is stored with a leading dot; it must
/// cover the URL host and must not be a TLD or public suffix.
pub fn parse_domain(url: &Url, explicit_domain: Option<&str>) -> CookieResult<String> {
    let host = url.host_str().ok_or(CookieError::InvalidUrl)?;
    let encoded_host = normalize_host(host);

    let domain = match explicit_domain {
        Some(d) if !d.is_empty() => d,
        _ => return Ok(encoded_host),
    };

    let no_leading_dot = domain.strip_prefix('.').unwrap_or(domain);
    let mut owned = String::with_capacity(no_leading_dot.len() + 1);
    owned.push('.');
    owned.push_str(&normalize_host(no_leading_dot));

    if !psl::is_valid_cookie_domain(&owned[1..], &encoded_host) {
        tracing::debug!(domain = %owned, host = %encoded_host, "rejecting cookie domain");
        return Err(CookieError::InvalidDomain);
    }

    Ok(owned)
}

// Lower-case before encoding so escape hex digits stay upper-case.
fn normalize_host(host: &str) -> String {
    encode_host(&host.to_ascii_lowercase()).into_owned()
}
