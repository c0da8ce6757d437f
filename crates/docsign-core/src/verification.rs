//! Outcome of checking a signature against its document
//!
//! Validity is never stored. Every check recomputes the fingerprint of the
//! document's current content and compares it with the checksum captured at
//! signing time.

use serde::{Deserialize, Serialize};

use crate::checksum::Checksum;
use crate::model::Signature;

/// Coarse classification of a [`Verification`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    /// The document's current content matches the signed checksum
    Valid,
    /// No signature exists with the requested identity
    SignatureMissing,
    /// The signature exists but its document does not
    DocumentMissing,
    /// The document changed, or never matched what was signed
    ChecksumMismatch,
}

impl VerificationStatus {
    pub fn is_valid(self) -> bool {
        self == VerificationStatus::Valid
    }
}

/// Result of verifying one signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    Valid(Signature),
    SignatureMissing,
    DocumentMissing {
        signature: Signature,
    },
    ChecksumMismatch {
        signature: Signature,
        /// Checksum captured at signing time
        expected: Checksum,
        /// Fingerprint of the document content at verification time
        actual: Checksum,
    },
}

impl Verification {
    pub fn status(&self) -> VerificationStatus {
        match self {
            Verification::Valid(_) => VerificationStatus::Valid,
            Verification::SignatureMissing => VerificationStatus::SignatureMissing,
            Verification::DocumentMissing { .. } => VerificationStatus::DocumentMissing,
            Verification::ChecksumMismatch { .. } => VerificationStatus::ChecksumMismatch,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.status().is_valid()
    }

    /// The signature involved, when one was found
    pub fn signature(&self) -> Option<&Signature> {
        match self {
            Verification::Valid(signature)
            | Verification::DocumentMissing { signature }
            | Verification::ChecksumMismatch { signature, .. } => Some(signature),
            Verification::SignatureMissing => None,
        }
    }

    /// Collapse to the fail-closed shape: the signature if valid, else `None`
    pub fn into_valid(self) -> Option<Signature> {
        match self {
            Verification::Valid(signature) => Some(signature),
            _ => None,
        }
    }
}
