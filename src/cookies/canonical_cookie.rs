use crate::cookies::error::CookieResult;
use crate::cookies::jar::JarConfig;
use crate::cookies::{normalize, parser};
use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::Range;
use time::OffsetDateTime;
use url::Url;

/// `SameSite` cookie attribute. `Lax` when the attribute is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl SameSite {
    /// Case-insensitive match against `strict`, `lax` and `none`.
    pub fn from_attribute(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("strict") {
            Some(SameSite::Strict)
        } else if value.eq_ignore_ascii_case("lax") {
            Some(SameSite::Lax)
        } else if value.eq_ignore_ascii_case("none") {
            Some(SameSite::None)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// A stored cookie.
///
/// Name, value, domain and path live in one owned buffer and are addressed
/// by byte ranges, so a cookie is a single allocation released as a unit.
/// All four strings are printable ASCII: name and value pass byte
/// validation, domain and path are percent-encoded.
///
/// The domain starts with `.` iff the cookie came with a `Domain=`
/// attribute and applies to subdomains; otherwise it is host-only.
#[derive(Clone, PartialEq, Eq)]
pub struct Cookie {
    buf: Box<str>,
    name: Range<u32>,
    value: Range<u32>,
    domain: Range<u32>,
    path: Range<u32>,
    pub(crate) expires: Option<i64>,
    pub(crate) secure: bool,
    pub(crate) http_only: bool,
    pub(crate) same_site: SameSite,
}

impl Cookie {
    /// Parse a `Set-Cookie` header value received for `url`.
    pub fn parse(url: &Url, header: &str) -> CookieResult<Self> {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        Self::parse_with(url, header, now, &JarConfig::default())
    }

    /// Parse with explicit size limits and an explicit current time.
    ///
    /// `now` anchors `Max-Age`. Any failure rejects the whole cookie.
    pub fn parse_with(url: &Url, header: &str, now: i64, config: &JarConfig) -> CookieResult<Self> {
        let set_cookie = parser::parse_set_cookie(header, config)?;

        let expires = match (set_cookie.max_age, set_cookie.expires) {
            (Some(max_age), _) => Some(now.saturating_add(max_age)),
            (None, Some(raw)) => {
                let parsed = parser::parse_expires(raw);
                if parsed.is_none() {
                    tracing::debug!(expires = %raw, "unparseable cookie expiry, keeping session cookie");
                }
                parsed
            }
            (None, None) => None,
        };

        let domain = normalize::parse_domain(url, set_cookie.domain)?;
        let path = normalize::parse_path(url, set_cookie.path);

        Ok(Self::from_parts(
            set_cookie.name,
            set_cookie.value,
            &domain,
            &path,
            expires,
            set_cookie.secure,
            set_cookie.http_only,
            set_cookie.same_site,
        ))
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        name: &str,
        value: &str,
        domain: &str,
        path: &str,
        expires: Option<i64>,
        secure: bool,
        http_only: bool,
        same_site: SameSite,
    ) -> Self {
        debug_assert!(same_site != SameSite::None || secure);

        let mut buf = String::with_capacity(name.len() + value.len() + domain.len() + path.len());
        let mut push = |s: &str| {
            let start = buf.len() as u32;
            buf.push_str(s);
            start..buf.len() as u32
        };
        let name = push(name);
        let value = push(value);
        let domain = push(domain);
        let path = push(path);

        Self {
            buf: buf.into_boxed_str(),
            name,
            value,
            domain,
            path,
            expires,
            secure,
            http_only,
            same_site,
        }
    }

    fn slice(&self, range: &Range<u32>) -> &str {
        &self.buf[range.start as usize..range.end as usize]
    }

    /// Empty for single-value cookies (`Set-Cookie: value`).
    pub fn name(&self) -> &str {
        self.slice(&self.name)
    }

    pub fn value(&self) -> &str {
        self.slice(&self.value)
    }

    pub fn domain(&self) -> &str {
        self.slice(&self.domain)
    }

    pub fn path(&self) -> &str {
        self.slice(&self.path)
    }

    /// Unix timestamp in seconds; `None` for session cookies.
    pub fn expires(&self) -> Option<i64> {
        self.expires
    }

    pub fn secure(&self) -> bool {
        self.secure
    }

    pub fn http_only(&self) -> bool {
        self.http_only
    }

    /// Always paired with [`secure`](Self::secure) when `SameSite::None`.
    pub fn same_site(&self) -> SameSite {
        self.same_site
    }

    pub fn is_host_only(&self) -> bool {
        !self.domain().starts_with('.')
    }

    pub fn is_session(&self) -> bool {
        self.expires.is_none()
    }

    /// Expired once `now` reaches the expiry time.
    pub fn is_expired(&self, now: i64) -> bool {
        self.expires.is_some_and(|expires| expires <= now)
    }

    pub fn expires_at(&self) -> Option<OffsetDateTime> {
        self.expires
            .and_then(|secs| OffsetDateTime::from_unix_timestamp(secs).ok())
    }

    /// Same `(name, domain, path)` key.
    pub fn same_key(&self, other: &Cookie) -> bool {
        self.name() == other.name() && self.domain() == other.domain() && self.path() == other.path()
    }
}

/// Writes the `Cookie` request header pair: `name=value`, or the bare value
/// when the name is empty.
impl fmt::Display for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.name().is_empty() {
            f.write_str(self.name())?;
            f.write_str("=")?;
        }
        f.write_str(self.value())
    }
}

impl fmt::Debug for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cookie")
            .field("name", &self.name())
            .field("value", &self.value())
            .field("domain", &self.domain())
            .field("path", &self.path())
            .field("expires", &self.expires)
            .field("secure", &self.secure)
            .field("http_only", &self.http_only)
            .field("same_site", &self.same_site)
            .finish()
    }
}

/// DevTools `Network.Cookie` representation.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DevToolsCookie<'a> {
    name: &'a str,
    value: &'a str,
    domain: &'a str,
    path: &'a str,
    expires: i64,
    size: usize,
    http_only: bool,
    secure: bool,
    session: bool,
    same_site: SameSite,
}

impl Serialize for Cookie {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        DevToolsCookie {
            name: self.name(),
            value: self.value(),
            domain: self.domain(),
            path: self.path(),
            expires: self.expires.unwrap_or(-1),
            size: self.name().len() + self.value().len(),
            http_only: self.http_only,
            secure: self.secure,
            session: self.is_session(),
            same_site: self.same_site,
        }
        .serialize(serializer)
    }
}
