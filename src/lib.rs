//! # panda-cookies
//!
//! The cookie subsystem of a headless browser engine.
//!
//! `panda-cookies` parses `Set-Cookie` response headers the way real
//! browsers do (not strictly RFC 6265), stores the results in an in-memory
//! jar per storage partition, and produces the `Cookie` request header for
//! outgoing requests.
//!
//! ## Features
//!
//! - **Lenient parsing**: empty-name cookies, last-attribute-wins, tolerant
//!   `Expires` dates; malformed attributes are ignored, not fatal
//! - **Scoping**: default-domain / default-path algorithms, `Domain=`
//!   widening, Public Suffix List validation
//! - **Visibility**: `Secure`, `HttpOnly` and `SameSite` enforcement for
//!   navigational and subresource, same-site and cross-site requests
//! - **Bounded**: 8 KiB headers, 4 KiB values, 1024 cookies per jar
//!
//! ## Quick Start
//!
//! ```rust
//! use panda_cookies::cookies::{Jar, LookupOpts};
//! use url::Url;
//!
//! let mut jar = Jar::new();
//! let page = Url::parse("http://lightpanda.io/").unwrap();
//! jar.populate_from_response(&page, "b; Domain=lightpanda.io");
//!
//! let sub = Url::parse("http://dev.lightpanda.io/").unwrap();
//! assert_eq!(jar.cookie_header(&sub, &LookupOpts::new()), "b");
//! ```
//!
//! ## Modules
//!
//! - [`cookies`] - Cookie parsing, storage and request matching

pub mod cookies;
