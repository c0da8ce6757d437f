//! SHA-256 content fingerprints
//!
//! A [`Checksum`] is the lowercase hex SHA-256 digest of a string's UTF-8
//! bytes. It is the only tamper-evidence the system keeps: documents store
//! the checksum of their content and signatures store the checksum of the
//! content the signer attested to.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::{Error, Result};

/// Length of a hex-encoded SHA-256 digest
pub const CHECKSUM_LEN: usize = 64;

/// Fingerprint of some content
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Checksum(String);

/// Compute the fingerprint of `content`.
pub fn fingerprint(content: impl AsRef<[u8]>) -> Checksum {
    let mut hasher = Sha256::new();
    hasher.update(content.as_ref());
    Checksum(format!("{:x}", hasher.finalize()))
}

impl Checksum {
    /// Validate a stored hex digest.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidChecksum`] unless `value` is exactly 64
    /// lowercase hex characters.
    pub fn parse(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        let well_formed = value.len() == CHECKSUM_LEN
            && value
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if well_formed {
            Ok(Self(value))
        } else {
            Err(Error::InvalidChecksum { value })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this checksum is the fingerprint of `content`
    pub fn matches(&self, content: impl AsRef<[u8]>) -> bool {
        fingerprint(content) == *self
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Checksum {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(value)
    }
}

impl From<Checksum> for String {
    fn from(checksum: Checksum) -> Self {
        checksum.0
    }
}

impl AsRef<str> for Checksum {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
