//! Content fingerprinting for cheap version comparison.
//!
//! A fingerprint is a 32-bit rolling multiplicative hash of the content's
//! UTF-16 code units, rendered as 8 lowercase hex digits. Browser-side
//! editors hashing the same text with the same scheme produce the same
//! value. It is **not** a cryptographic digest and must only be used to
//! answer "did this content change".

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::FingerprintError;

const MULTIPLIER: u32 = 31;

/// A content fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Fingerprint(u32);

impl Fingerprint {
    /// Wrap a raw 32-bit hash value.
    pub const fn from_raw(value: u32) -> Self {
        Self(value)
    }

    /// The raw 32-bit hash value.
    pub const fn as_raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}

impl FromStr for Fingerprint {
    type Err = FingerprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.len() != 8 || !trimmed.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(FingerprintError::Invalid(s.to_string()));
        }
        u32::from_str_radix(trimmed, 16)
            .map(Self)
            .map_err(|_| FingerprintError::Invalid(s.to_string()))
    }
}

impl TryFrom<String> for Fingerprint {
    type Error = FingerprintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Fingerprint> for String {
    fn from(value: Fingerprint) -> Self {
        value.to_string()
    }
}

/// Compute the fingerprint of `content`.
///
/// Total over all input; the empty string maps to `00000000`.
pub fn compute_hash(content: &str) -> Fingerprint {
    let hash = content.encode_utf16().fold(0u32, |acc, unit| {
        acc.wrapping_mul(MULTIPLIER).wrapping_add(u32::from(unit))
    });
    Fingerprint(hash)
}
