//! Request matching: which stored cookies a request may see.

use crate::cookies::canonical_cookie::{Cookie, SameSite};
use url::Url;

/// The parts of a target URL the matcher needs, extracted once per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedUrl<'a> {
    pub host: &'a str,
    pub path: &'a str,
    pub secure: bool,
}

impl<'a> PreparedUrl<'a> {
    pub fn new(url: &'a Url) -> Self {
        Self {
            host: url.host_str().unwrap_or(""),
            path: url.path(),
            secure: url.scheme() == "https",
        }
    }
}

impl Cookie {
    /// Whether this cookie is sent with a request to `target`.
    ///
    /// `same_site` is the request's same-site classification, computed once
    /// per request. `is_navigation` relaxes `SameSite=Lax` for cross-site
    /// top-level navigations. `is_http` is false for script access, which
    /// never sees `HttpOnly` cookies.
    pub fn applies_to(
        &self,
        target: &PreparedUrl<'_>,
        same_site: bool,
        is_navigation: bool,
        is_http: bool,
    ) -> bool {
        if self.http_only && !is_http {
            return false;
        }

        if self.secure && !target.secure {
            return false;
        }

        if !same_site {
            match self.same_site {
                SameSite::Strict => return false,
                SameSite::Lax if !is_navigation => return false,
                SameSite::Lax | SameSite::None => {}
            }
        }

        domain_matches(self.domain(), target.host) && path_matches(self.path(), target.path)
    }
}

/// Domain containment. A leading dot on the cookie domain allows the domain
/// itself and any subdomain; otherwise only the exact host matches.
fn domain_matches(cookie_domain: &str, host: &str) -> bool {
    match cookie_domain.strip_prefix('.') {
        Some(bare) => host == bare || host.ends_with(cookie_domain),
        None => host == cookie_domain,
    }
}

/// RFC 6265 path-match.
fn path_matches(cookie_path: &str, request_path: &str) -> bool {
    if !request_path.starts_with(cookie_path) {
        return false;
    }

    cookie_path.ends_with('/')
        || request_path.len() == cookie_path.len()
        || request_path.as_bytes()[cookie_path.len()] == b'/'
}
