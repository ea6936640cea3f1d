//! Lenient `Set-Cookie` parsing.
//!
//! Follows what browsers actually accept rather than the RFC 6265 grammar:
//! - a segment without `=` is a value with an empty name;
//! - values may hold any printable byte;
//! - unknown attributes and unparseable attribute values are ignored;
//! - the last occurrence of an attribute wins.

use crate::cookies::canonical_cookie::SameSite;
use crate::cookies::error::{CookieError, CookieResult};
use crate::cookies::jar::JarConfig;
use crate::cookies::validate;
use time::format_description::well_known::Rfc2822;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::parsing::Parsed;
use time::{OffsetDateTime, PrimitiveDateTime};

/// `21 Oct 2030 07:28:00`, the IMF-fixdate body once weekday and zone are
/// stripped.
const IMF_DATE: &[BorrowedFormatItem<'static>] = format_description!(
    "[day padding:none] [month repr:short case_sensitive:false] [year] [hour]:[minute]:[second]"
);

/// Netscape `21-Oct-30 07:28:00` form with a two-digit year.
const NETSCAPE_DATE: &[BorrowedFormatItem<'static>] = format_description!(
    "[day padding:none] [month repr:short case_sensitive:false] [year repr:last_two] [hour]:[minute]:[second]"
);

/// Attributes recognized in a `Set-Cookie` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attribute {
    Path,
    Domain,
    Secure,
    MaxAge,
    Expires,
    HttpOnly,
    SameSite,
}

const ATTRIBUTES: [(&str, Attribute); 7] = [
    ("path", Attribute::Path),
    ("domain", Attribute::Domain),
    ("secure", Attribute::Secure),
    ("max-age", Attribute::MaxAge),
    ("expires", Attribute::Expires),
    ("httponly", Attribute::HttpOnly),
    ("samesite", Attribute::SameSite),
];

impl Attribute {
    fn from_key(key: &str) -> Option<Self> {
        ATTRIBUTES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, attr)| *attr)
    }
}

/// A `Set-Cookie` value split into its parts, borrowing from the header.
/// Domain and path are still raw here.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct SetCookie<'a> {
    pub name: &'a str,
    pub value: &'a str,
    pub path: Option<&'a str>,
    pub domain: Option<&'a str>,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
    pub max_age: Option<i64>,
    pub expires: Option<&'a str>,
}

/// Split and check a raw `Set-Cookie` value.
///
/// Size caps and byte validation come first, then the name/value pair,
/// then the attribute walk. A `SameSite=None` cookie without `Secure` is
/// rejected outright.
pub(crate) fn parse_set_cookie<'a>(header: &'a str, config: &JarConfig) -> CookieResult<SetCookie<'a>> {
    if header.len() > config.max_cookie_header_size {
        return Err(CookieError::CookieHeaderSizeExceeded);
    }
    validate::validate(header.as_bytes())?;

    let (name, value, raw_value, rest) = split_name_value(header)?;
    if raw_value.len() > config.max_cookie_size {
        return Err(CookieError::CookieSizeExceeded);
    }

    let mut cookie = SetCookie {
        name,
        value,
        ..SetCookie::default()
    };

    for attribute in rest.split(';') {
        let (key, value) = match attribute.split_once('=') {
            Some((key, value)) => (trim(key), trim(value)),
            None => (trim(attribute), ""),
        };

        let Some(attr) = Attribute::from_key(key) else {
            continue;
        };

        match attr {
            Attribute::Path => cookie.path = Some(value),
            Attribute::Domain => cookie.domain = Some(value),
            Attribute::Secure => cookie.secure = true,
            Attribute::HttpOnly => cookie.http_only = true,
            Attribute::Expires => cookie.expires = Some(value),
            Attribute::MaxAge => {
                if let Ok(max_age) = value.parse::<i64>() {
                    cookie.max_age = Some(max_age);
                }
            }
            Attribute::SameSite => {
                if let Some(same_site) = SameSite::from_attribute(value) {
                    cookie.same_site = same_site;
                }
            }
        }
    }

    if cookie.same_site == SameSite::None && !cookie.secure {
        return Err(CookieError::InsecureSameSite);
    }

    Ok(cookie)
}

/// Returns `(name, value, raw_value, attributes)`, where `raw_value` is the
/// value before whitespace trimming.
fn split_name_value(header: &str) -> CookieResult<(&str, &str, &str, &str)> {
    let (pair, rest) = header.split_once(';').unwrap_or((header, ""));
    let (name, raw_value) = pair.split_once('=').unwrap_or(("", pair));

    let (name, value) = (trim(name), trim(raw_value));
    if name.is_empty() && value.is_empty() {
        return Err(CookieError::InvalidNameValue);
    }

    Ok((name, value, raw_value, rest))
}

fn trim(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_ascii_whitespace())
}

/// Parse an `Expires` attribute into a unix timestamp.
///
/// Accepts RFC 2822 / IMF-fixdate, retrying with `-` rewritten to spaces for
/// the Netscape `21-Oct-2030` and `21-Oct-30` forms.
pub fn parse_expires(value: &str) -> Option<i64> {
    parse_http_date(value).or_else(|| {
        if value.contains('-') {
            parse_http_date(&value.replace('-', " "))
        } else {
            None
        }
    })
}

fn parse_http_date(value: &str) -> Option<i64> {
    if let Ok(date) = OffsetDateTime::parse(value, &Rfc2822) {
        return Some(date.unix_timestamp());
    }

    // Weekday names are not checked against the date.
    let body = value.split_once(',').map_or(value, |(_, body)| body).trim();
    let body = body
        .strip_suffix("GMT")
        .or_else(|| body.strip_suffix("UTC"))
        .unwrap_or(body)
        .trim_end();
    let body = collapse_spaces(body);

    PrimitiveDateTime::parse(&body, IMF_DATE)
        .ok()
        .or_else(|| parse_short_year(&body))
        .map(|date| date.assume_utc().unix_timestamp())
}

/// Two-digit years 70-99 are 19xx, 00-69 are 20xx (RFC 6265 5.1.1).
fn parse_short_year(body: &str) -> Option<PrimitiveDateTime> {
    let mut parsed = Parsed::new();
    let rest = parsed.parse_items(body.as_bytes(), NETSCAPE_DATE).ok()?;
    if !rest.is_empty() {
        return None;
    }

    let last_two = i32::from(parsed.year_last_two()?);
    let year = if last_two >= 70 { 1900 + last_two } else { 2000 + last_two };
    parsed.set_year(year)?;

    PrimitiveDateTime::try_from(parsed).ok()
}

fn collapse_spaces(s: &str) -> String {
    s.split_ascii_whitespace().collect::<Vec<_>>().join(" ")
}
