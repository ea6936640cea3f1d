use crate::cookies::canonical_cookie::Cookie;
use crate::cookies::error::{CookieError, CookieResult};
use crate::cookies::matcher::PreparedUrl;
use crate::cookies::psl;
use std::fmt::{self, Write};
use time::OffsetDateTime;
use url::Url;

/// Maximum number of cookies a jar holds.
pub const MAX_JAR_SIZE: usize = 1024;

/// Maximum length of a cookie value, in bytes.
pub const MAX_COOKIE_SIZE: usize = 4096;

/// Maximum length of a `Set-Cookie` header value, in bytes.
pub const MAX_COOKIE_HEADER_SIZE: usize = 8192;

/// Size limits for a [`Jar`] and the cookies parsed into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JarConfig {
    /// Maximum number of distinct cookies.
    pub max_jar_size: usize,

    /// Maximum cookie value length.
    pub max_cookie_size: usize,

    /// Maximum raw `Set-Cookie` value length.
    pub max_cookie_header_size: usize,
}

impl Default for JarConfig {
    fn default() -> Self {
        Self {
            max_jar_size: MAX_JAR_SIZE,
            max_cookie_size: MAX_COOKIE_SIZE,
            max_cookie_header_size: MAX_COOKIE_HEADER_SIZE,
        }
    }
}

/// Options for a cookie lookup.
#[derive(Debug, Clone)]
pub struct LookupOpts {
    /// Time used to purge expired cookies; now when `None`.
    pub request_time: Option<i64>,

    /// URL of the document initiating the request. Without one the request
    /// counts as same-site; an origin with no host never does.
    pub origin_url: Option<Url>,

    /// False for script (`document.cookie`) access.
    pub is_http: bool,

    /// True for top-level navigations.
    pub is_navigation: bool,

    /// Written once before the first pair, e.g. `"Cookie: "`.
    pub prefix: Option<String>,
}

impl Default for LookupOpts {
    fn default() -> Self {
        Self {
            request_time: None,
            origin_url: None,
            is_http: true,
            is_navigation: true,
            prefix: None,
        }
    }
}

impl LookupOpts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_time(mut self, time: i64) -> Self {
        self.request_time = Some(time);
        self
    }

    pub fn origin(mut self, url: Url) -> Self {
        self.origin_url = Some(url);
        self
    }

    pub fn is_http(mut self, is_http: bool) -> Self {
        self.is_http = is_http;
        self
    }

    pub fn is_navigation(mut self, is_navigation: bool) -> Self {
        self.is_navigation = is_navigation;
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }
}

/// Cookie storage for one storage partition.
///
/// Cookies are kept in insertion order, which is also the order they are
/// serialized in. A `(name, domain, path)` key appears at most once; storing
/// a cookie with an existing key replaces it in place.
///
/// A jar is not synchronized. Callers sharing one across threads must
/// serialize access.
#[derive(Debug, Default)]
pub struct Jar {
    cookies: Vec<Cookie>,
    config: JarConfig,
}

impl Jar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: JarConfig) -> Self {
        Self {
            cookies: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &JarConfig {
        &self.config
    }

    /// Store a cookie.
    ///
    /// A cookie already expired at `request_time` is never stored, but it
    /// still deletes a live cookie with the same key: this is how servers
    /// clear cookies (`Max-Age=0`).
    pub fn add(&mut self, cookie: Cookie, request_time: i64) -> CookieResult<()> {
        let existing = self.cookies.iter().position(|c| c.same_key(&cookie));

        if cookie.is_expired(request_time) {
            if let Some(idx) = existing {
                tracing::debug!(name = %cookie.name(), domain = %cookie.domain(), "expired cookie removes stored one");
                self.cookies.remove(idx);
            }
            return Ok(());
        }

        if existing.is_none() && self.cookies.len() >= self.config.max_jar_size {
            tracing::warn!(
                name = %cookie.name(),
                domain = %cookie.domain(),
                limit = self.config.max_jar_size,
                "cookie jar quota exceeded"
            );
            return Err(CookieError::CookieJarQuotaExceeded);
        }

        if cookie.value().len() > self.config.max_cookie_size {
            return Err(CookieError::CookieSizeExceeded);
        }

        match existing {
            Some(idx) => self.cookies[idx] = cookie,
            None => self.cookies.push(cookie),
        }

        Ok(())
    }

    /// Drop every cookie whose expiry is at or before `request_time`.
    pub fn remove_expired(&mut self, request_time: Option<i64>) {
        let now = request_time.unwrap_or_else(unix_now);
        let before = self.cookies.len();
        self.cookies.retain(|c| !c.is_expired(now));

        let removed = before - self.cookies.len();
        if removed > 0 {
            tracing::debug!(removed, "purged expired cookies");
        }
    }

    /// Write the `Cookie` header value for a request to `target`.
    ///
    /// Expired cookies are purged first. Matching cookies are written in
    /// jar order as `name=value` pairs joined by `"; "`, preceded by
    /// `opts.prefix` when at least one cookie matches. Nothing is written
    /// when none do.
    pub fn for_request<W: Write>(
        &mut self,
        target: &Url,
        writer: &mut W,
        opts: &LookupOpts,
    ) -> fmt::Result {
        self.remove_expired(opts.request_time);

        let target = PreparedUrl::new(target);
        // An origin without a host (about:blank, data:, file:) is cross-site.
        let same_site = match &opts.origin_url {
            Some(origin) => match origin.host_str() {
                Some(origin_host) => psl::are_same_site(origin_host, target.host),
                None => false,
            },
            None => true,
        };

        let mut first = true;
        for cookie in &self.cookies {
            if !cookie.applies_to(&target, same_site, opts.is_navigation, opts.is_http) {
                continue;
            }

            if first {
                if let Some(prefix) = &opts.prefix {
                    writer.write_str(prefix)?;
                }
                first = false;
            } else {
                writer.write_str("; ")?;
            }
            write!(writer, "{cookie}")?;
        }

        Ok(())
    }

    /// [`for_request`](Self::for_request) into a fresh `String`.
    pub fn cookie_header(&mut self, target: &Url, opts: &LookupOpts) -> String {
        let mut header = String::new();
        // Writing into a String cannot fail.
        let _ = self.for_request(target, &mut header, opts);
        header
    }

    /// Store a cookie received in a `Set-Cookie` response header.
    ///
    /// Invalid cookies are logged and dropped; a bad header from a server
    /// must never fail the page load.
    pub fn populate_from_response(&mut self, url: &Url, set_cookie: &str) {
        let now = unix_now();
        let cookie = match Cookie::parse_with(url, set_cookie, now, &self.config) {
            Ok(cookie) => cookie,
            Err(e) => {
                tracing::debug!(url = %url, error = %e, "ignoring invalid Set-Cookie header");
                return;
            }
        };

        if let Err(e) = self.add(cookie, now) {
            tracing::debug!(url = %url, error = %e, "dropping cookie");
        }
    }

    /// `document.cookie` getter: every non-`HttpOnly` cookie visible to the
    /// page at `url`.
    pub fn for_script(&mut self, url: &Url) -> String {
        let opts = LookupOpts::new()
            .origin(url.clone())
            .is_http(false)
            .is_navigation(true);
        self.cookie_header(url, &opts)
    }

    /// `document.cookie` setter. Scripts cannot create `HttpOnly` cookies;
    /// those are ignored and `Ok(false)` is returned.
    pub fn set_from_script(&mut self, url: &Url, value: &str) -> CookieResult<bool> {
        let now = unix_now();
        let cookie = Cookie::parse_with(url, value, now, &self.config)?;
        if cookie.http_only {
            tracing::debug!(name = %cookie.name(), "script tried to set an HttpOnly cookie");
            return Ok(false);
        }

        self.add(cookie, now)?;
        Ok(true)
    }

    /// Remove the cookie stored under `(name, domain, path)`.
    pub fn remove(&mut self, name: &str, domain: &str, path: &str) -> bool {
        match self
            .cookies
            .iter()
            .position(|c| c.name() == name && c.domain() == domain && c.path() == path)
        {
            Some(idx) => {
                self.cookies.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Keep only the cookies for which `f` returns true, preserving order.
    pub fn retain<F: FnMut(&Cookie) -> bool>(&mut self, f: F) {
        self.cookies.retain(f);
    }

    /// Iterate over stored cookies in jar order.
    pub fn iter(&self) -> impl Iterator<Item = &Cookie> + '_ {
        self.cookies.iter()
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    pub fn clear(&mut self) {
        self.cookies.clear();
    }
}

fn unix_now() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cookies::canonical_cookie::SameSite;

    const NOW: i64 = 1_700_000_000;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn cookie(url_str: &str, header: &str) -> Cookie {
        Cookie::parse_with(&url(url_str), header, NOW, &JarConfig::default()).unwrap()
    }

    fn header(jar: &mut Jar, target: &str, opts: LookupOpts) -> String {
        jar.cookie_header(&url(target), &opts.request_time(NOW))
    }

    #[test]
    fn test_add_and_lookup() {
        let mut jar = Jar::new();
        jar.add(cookie("http://lightpanda.io/", "a=1"), NOW).unwrap();
        jar.add(cookie("http://lightpanda.io/", "b=2"), NOW).unwrap();

        assert_eq!(jar.len(), 2);
        assert_eq!(header(&mut jar, "http://lightpanda.io/", LookupOpts::new()), "a=1; b=2");
    }

    #[test]
    fn test_replace_preserves_position() {
        let mut jar = Jar::new();
        jar.add(cookie("http://lightpanda.io/", "a=1"), NOW).unwrap();
        jar.add(cookie("http://lightpanda.io/", "b=2"), NOW).unwrap();
        jar.add(cookie("http://lightpanda.io/", "a=3"), NOW).unwrap();

        assert_eq!(jar.len(), 2);
        assert_eq!(header(&mut jar, "http://lightpanda.io/", LookupOpts::new()), "a=3; b=2");
    }

    #[test]
    fn test_different_path_is_different_key() {
        let mut jar = Jar::new();
        jar.add(cookie("http://lightpanda.io/", "a=1; Path=/"), NOW).unwrap();
        jar.add(cookie("http://lightpanda.io/", "a=2; Path=/x"), NOW).unwrap();
        jar.add(cookie("http://lightpanda.io/", "a=3; Domain=lightpanda.io"), NOW)
            .unwrap();
        assert_eq!(jar.len(), 3);
    }

    #[test]
    fn test_expired_add_removes_existing() {
        let mut jar = Jar::new();
        jar.add(cookie("http://lightpanda.io/", "a=1"), NOW).unwrap();
        jar.add(cookie("http://lightpanda.io/", "b=2"), NOW).unwrap();
        jar.add(cookie("http://lightpanda.io/", "a=gone; Max-Age=-1"), NOW)
            .unwrap();

        assert_eq!(jar.len(), 1);
        assert_eq!(header(&mut jar, "http://lightpanda.io/", LookupOpts::new()), "b=2");
    }

    #[test]
    fn test_expired_add_without_match_is_noop() {
        let mut jar = Jar::new();
        jar.add(cookie("http://lightpanda.io/", "a=1; Max-Age=0"), NOW)
            .unwrap();
        assert!(jar.is_empty());
    }

    #[test]
    fn test_quota() {
        let config = JarConfig {
            max_jar_size: 3,
            ..JarConfig::default()
        };
        let mut jar = Jar::with_config(config);
        for i in 0..3 {
            jar.add(cookie("http://lightpanda.io/", &format!("c{i}=v")), NOW)
                .unwrap();
        }
        assert_eq!(
            jar.add(cookie("http://lightpanda.io/", "c3=v"), NOW),
            Err(CookieError::CookieJarQuotaExceeded)
        );
        // Replacing an existing key is still allowed at capacity.
        jar.add(cookie("http://lightpanda.io/", "c1=new"), NOW).unwrap();
        assert_eq!(jar.len(), 3);
    }

    #[test]
    fn test_add_checks_value_size() {
        let mut jar = Jar::with_config(JarConfig {
            max_cookie_size: 2,
            ..JarConfig::default()
        });
        let big = cookie("http://lightpanda.io/", "a=123");
        assert_eq!(jar.add(big, NOW), Err(CookieError::CookieSizeExceeded));
        assert!(jar.is_empty());
    }

    #[test]
    fn test_remove_expired() {
        let mut jar = Jar::new();
        jar.add(cookie("http://lightpanda.io/", "a=1; Max-Age=10"), NOW).unwrap();
        jar.add(cookie("http://lightpanda.io/", "b=2"), NOW).unwrap();
        jar.add(cookie("http://lightpanda.io/", "c=3; Max-Age=100"), NOW).unwrap();

        jar.remove_expired(Some(NOW + 9));
        assert_eq!(jar.len(), 3);

        jar.remove_expired(Some(NOW + 10));
        assert_eq!(jar.len(), 2);
        assert!(jar.iter().all(|c| c.name() != "a"));
    }

    #[test]
    fn test_for_request_purges_expired() {
        let mut jar = Jar::new();
        jar.add(cookie("http://lightpanda.io/", "a=1; Max-Age=10"), NOW).unwrap();

        let opts = LookupOpts::new().request_time(NOW + 11);
        assert_eq!(jar.cookie_header(&url("http://lightpanda.io/"), &opts), "");
        assert!(jar.is_empty());
        assert_eq!(header(&mut jar, "http://lightpanda.io/", LookupOpts::new()), "");
    }

    #[test]
    fn test_prefix_written_once_and_only_on_match() {
        let mut jar = Jar::new();
        let opts = LookupOpts::new().prefix("Cookie: ");
        assert_eq!(header(&mut jar, "http://lightpanda.io/", opts.clone()), "");

        jar.add(cookie("http://lightpanda.io/", "a=1"), NOW).unwrap();
        jar.add(cookie("http://lightpanda.io/", "b"), NOW).unwrap();
        assert_eq!(
            header(&mut jar, "http://lightpanda.io/", opts),
            "Cookie: a=1; b"
        );
    }

    #[test]
    fn test_cross_site_lookup() {
        let mut jar = Jar::new();
        jar.add(cookie("https://lightpanda.io/", "global1=1; Path=/"), NOW).unwrap();
        jar.add(cookie("https://lightpanda.io/", "strict=2; SameSite=Strict; Path=/x/"), NOW)
            .unwrap();
        jar.add(cookie("https://lightpanda.io/", "lax=3; Path=/x/"), NOW).unwrap();
        jar.add(cookie("https://lightpanda.io/", "secure=5; Secure"), NOW).unwrap();
        jar.add(
            cookie("https://lightpanda.io/", "sitenone=6; SameSite=None; Secure; Path=/x/"),
            NOW,
        )
        .unwrap();

        let opts = LookupOpts::new()
            .origin(url("https://example.com/"))
            .is_navigation(false);
        assert_eq!(
            header(&mut jar, "https://lightpanda.io/x/", opts),
            "sitenone=6"
        );

        let opts = LookupOpts::new().origin(url("https://example.com/"));
        assert_eq!(
            header(&mut jar, "https://lightpanda.io/x/", opts),
            "global1=1; lax=3; secure=5; sitenone=6"
        );

        let opts = LookupOpts::new().origin(url("https://www.lightpanda.io/"));
        assert_eq!(
            header(&mut jar, "https://lightpanda.io/x/", opts),
            "global1=1; strict=2; lax=3; secure=5; sitenone=6"
        );
    }

    #[test]
    fn test_populate_from_response_swallows_errors() {
        let mut jar = Jar::new();
        let u = url("http://lightpanda.io/");
        jar.populate_from_response(&u, "");
        jar.populate_from_response(&u, "b;samesite=none");
        jar.populate_from_response(&u, "b;domain=example.com");
        jar.populate_from_response(&u, "a=\x01");
        assert!(jar.is_empty());

        jar.populate_from_response(&u, "ok=1");
        assert_eq!(jar.len(), 1);
    }

    #[test]
    fn test_populate_from_response_quota_is_silent() {
        let mut jar = Jar::with_config(JarConfig {
            max_jar_size: 1,
            ..JarConfig::default()
        });
        let u = url("http://lightpanda.io/");
        jar.populate_from_response(&u, "a=1");
        jar.populate_from_response(&u, "b=2");
        assert_eq!(jar.len(), 1);
    }

    #[test]
    fn test_script_access() {
        let mut jar = Jar::new();
        let u = url("https://lightpanda.io/");
        jar.populate_from_response(&u, "visible=1");
        jar.populate_from_response(&u, "hidden=2; HttpOnly");

        assert_eq!(jar.for_script(&u), "visible=1");

        assert_eq!(jar.set_from_script(&u, "fromjs=3"), Ok(true));
        assert_eq!(jar.set_from_script(&u, "sneaky=4; HttpOnly"), Ok(false));
        assert_eq!(
            jar.set_from_script(&u, "bad;samesite=none"),
            Err(CookieError::InsecureSameSite)
        );
        assert_eq!(jar.for_script(&u), "visible=1; fromjs=3");
        assert_eq!(jar.len(), 3);
    }

    #[test]
    fn test_remove_and_retain() {
        let mut jar = Jar::new();
        jar.add(cookie("http://lightpanda.io/", "a=1"), NOW).unwrap();
        jar.add(cookie("http://lightpanda.io/", "b=2; Domain=lightpanda.io"), NOW)
            .unwrap();
        jar.add(cookie("http://lightpanda.io/", "c=3"), NOW).unwrap();

        assert!(!jar.remove("a", ".lightpanda.io", "/"));
        assert!(jar.remove("a", "lightpanda.io", "/"));
        assert_eq!(jar.len(), 2);

        jar.retain(|c| c.is_host_only());
        let names: Vec<_> = jar.iter().map(|c| c.name().to_string()).collect();
        assert_eq!(names, vec!["c"]);

        jar.clear();
        assert!(jar.is_empty());
    }

    #[test]
    fn test_same_site_attribute_kept() {
        let mut jar = Jar::new();
        jar.add(cookie("https://lightpanda.io/", "a=1; SameSite=Strict"), NOW)
            .unwrap();
        assert_eq!(jar.iter().next().unwrap().same_site, SameSite::Strict);
    }
}
