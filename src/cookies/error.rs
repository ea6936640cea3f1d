//! Cookie error types.
//!
//! Every failure of the cookie subsystem is a [`CookieError`]. Variants carry
//! stable numeric codes so embedders can forward them over FFI or DevTools
//! without matching on strings.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum CookieError {
    // Malformed input
    #[error("Cookie string is empty")]
    Empty,
    #[error("Cookie string contains a byte outside the printable ASCII range")]
    InvalidByteSequence,
    #[error("Cookie name/value pair is invalid")]
    InvalidNameValue,

    // Policy violations
    #[error("SameSite=None cookie without the Secure attribute")]
    InsecureSameSite,
    #[error("Cookie domain is invalid for the setting URL")]
    InvalidDomain,
    #[error("URL has no host")]
    InvalidUrl,

    // Resource limits
    #[error("Set-Cookie header too large")]
    CookieHeaderSizeExceeded,
    #[error("Cookie value too large")]
    CookieSizeExceeded,
    #[error("Cookie jar quota exceeded")]
    CookieJarQuotaExceeded,

    #[error("Unknown cookie error ({0})")]
    Unknown(i32),
}

/// Result type alias for cookie operations.
pub type CookieResult<T> = Result<T, CookieError>;

impl CookieError {
    pub fn as_i32(&self) -> i32 {
        match self {
            CookieError::Empty => -910,
            CookieError::InvalidByteSequence => -911,
            CookieError::InvalidNameValue => -912,
            CookieError::InsecureSameSite => -920,
            CookieError::InvalidDomain => -921,
            CookieError::InvalidUrl => -922,
            CookieError::CookieHeaderSizeExceeded => -930,
            CookieError::CookieSizeExceeded => -931,
            CookieError::CookieJarQuotaExceeded => -932,
            CookieError::Unknown(code) => *code,
        }
    }

    /// The `Set-Cookie` value itself could not be understood.
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            CookieError::Empty | CookieError::InvalidByteSequence | CookieError::InvalidNameValue
        )
    }

    /// The cookie parsed but is not allowed to exist.
    pub fn is_policy_violation(&self) -> bool {
        matches!(
            self,
            CookieError::InsecureSameSite | CookieError::InvalidDomain | CookieError::InvalidUrl
        )
    }

    /// A size cap was hit.
    pub fn is_resource_limit(&self) -> bool {
        matches!(
            self,
            CookieError::CookieHeaderSizeExceeded
                | CookieError::CookieSizeExceeded
                | CookieError::CookieJarQuotaExceeded
        )
    }
}

impl From<i32> for CookieError {
    fn from(code: i32) -> Self {
        match code {
            -910 => CookieError::Empty,
            -911 => CookieError::InvalidByteSequence,
            -912 => CookieError::InvalidNameValue,
            -920 => CookieError::InsecureSameSite,
            -921 => CookieError::InvalidDomain,
            -922 => CookieError::InvalidUrl,
            -930 => CookieError::CookieHeaderSizeExceeded,
            -931 => CookieError::CookieSizeExceeded,
            -932 => CookieError::CookieJarQuotaExceeded,
            _ => CookieError::Unknown(code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_roundtrip() {
        let original = CookieError::InsecureSameSite;
        let code = original.as_i32();
        assert_eq!(code, -920);
        assert_eq!(CookieError::from(code), CookieError::InsecureSameSite);

        let quota = CookieError::CookieJarQuotaExceeded;
        assert_eq!(CookieError::from(quota.as_i32()), quota);
    }

    #[test]
    fn test_unknown_error() {
        let err = CookieError::from(-9999);
        assert!(matches!(err, CookieError::Unknown(-9999)));
        assert_eq!(err.as_i32(), -9999);
    }

    #[test]
    fn test_taxonomy_is_disjoint() {
        let all = [
            CookieError::Empty,
            CookieError::InvalidByteSequence,
            CookieError::InvalidNameValue,
            CookieError::InsecureSameSite,
            CookieError::InvalidDomain,
            CookieError::InvalidUrl,
            CookieError::CookieHeaderSizeExceeded,
            CookieError::CookieSizeExceeded,
            CookieError::CookieJarQuotaExceeded,
        ];
        for err in all {
            let classes = [
                err.is_malformed_input(),
                err.is_policy_violation(),
                err.is_resource_limit(),
            ];
            assert_eq!(classes.iter().filter(|c| **c).count(), 1, "{err:?}");
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(
            CookieError::CookieJarQuotaExceeded.to_string(),
            "Cookie jar quota exceeded"
        );
    }
}
