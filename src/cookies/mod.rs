//! Browser cookie handling.
//!
//! This module implements the cookie subsystem of a browser engine:
//!
//! - **Parsing**: lenient `Set-Cookie` parsing matching what browsers accept
//!   ([`Cookie::parse`](canonical_cookie::Cookie::parse))
//! - **Storage**: an ordered, size-bounded jar per storage partition
//!   ([`Jar`](jar::Jar))
//! - **Lookup**: `Cookie` request header generation honoring `Secure`,
//!   `HttpOnly` and `SameSite` ([`Jar::for_request`](jar::Jar::for_request))
//!
//! # Architecture
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`validate`] | Rejects bytes outside printable ASCII |
//! | [`parser`] | Name/value split, attribute walk, `Expires` dates |
//! | [`normalize`] | Default-domain / default-path, percent-encoding |
//! | [`canonical_cookie`] | The stored [`Cookie`](canonical_cookie::Cookie) |
//! | [`matcher`] | Per-request visibility of a cookie |
//! | [`psl`] | Public suffix lookups and same-site classification |
//! | [`jar`] | The [`Jar`](jar::Jar) itself |
//!
//! # Example
//!
//! ```rust
//! use panda_cookies::cookies::jar::{Jar, LookupOpts};
//! use url::Url;
//!
//! let mut jar = Jar::new();
//! let page = Url::parse("https://lightpanda.io/").unwrap();
//! jar.populate_from_response(&page, "session=abc; Path=/; Secure");
//!
//! let opts = LookupOpts::new().prefix("Cookie: ");
//! assert_eq!(jar.cookie_header(&page, &opts), "Cookie: session=abc");
//! ```

pub mod canonical_cookie;
pub mod error;
pub mod jar;
pub mod matcher;
pub mod normalize;
pub mod parser;
pub mod psl;
pub mod validate;

pub use canonical_cookie::{Cookie, SameSite};
pub use error::{CookieError, CookieResult};
pub use jar::{Jar, JarConfig, LookupOpts};
