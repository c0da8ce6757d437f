//! Documents, signatures and their persisted record shapes
//!
//! The public types keep their fields private: a document's checksum and a
//! signature's `signed_checksum` are only ever computed from the content
//! they describe, never set directly.

use chrono::{DateTime, NaiveDateTime, Utc};
use docsign_store::Collection;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::checksum::{Checksum, fingerprint};
use crate::{Error, Result};

/// Something with a stable record identity
pub trait Identified {
    fn id(&self) -> &str;
}

/// Input for creating a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDocument {
    pub name: String,
    pub content: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl NewDocument {
    /// A document with the given name and content and blank submitter fields
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
        }
    }

    /// Set submitter metadata
    pub fn submitted_by(
        mut self,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        self.first_name = first_name.into();
        self.last_name = last_name.into();
        self.email = email.into();
        self
    }
}

/// A piece of content submitted for signing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    id: String,
    name: String,
    content: String,
    checksum: Checksum,
    first_name: String,
    last_name: String,
    email: String,
}

impl Document {
    pub(crate) fn create(id: String, new: NewDocument) -> Self {
        let checksum = fingerprint(&new.content);
        Self {
            id,
            name: new.name,
            content: new.content,
            checksum,
            first_name: new.first_name,
            last_name: new.last_name,
            email: new.email,
        }
    }

    pub(crate) fn from_record(id: String, record: DocumentRecord) -> Self {
        Self {
            id,
            name: record.name,
            content: record.content,
            checksum: record.checksum,
            first_name: record.first_name,
            last_name: record.last_name,
            email: record.email,
        }
    }

    pub(crate) fn to_record(&self) -> DocumentRecord {
        DocumentRecord {
            name: self.name.clone(),
            content: self.content.clone(),
            checksum: self.checksum.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Checksum recorded when the document was written
    pub fn checksum(&self) -> &Checksum {
        &self.checksum
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

impl Identified for Document {
    fn id(&self) -> &str {
        &self.id
    }
}

/// One attestation against one document
///
/// `document` is resolved by lookup when the signature is read and is
/// `None` when the referenced document no longer exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Signature {
    id: String,
    document: Option<Document>,
    document_id: String,
    signed_by_email: String,
    signed_content: String,
    signed_checksum: Checksum,
    signed_ts: DateTime<Utc>,
}

impl Signature {
    pub(crate) fn from_record(
        id: String,
        record: SignatureRecord,
        document: Option<Document>,
    ) -> Self {
        Self {
            id,
            document,
            document_id: record.document_id,
            signed_by_email: record.signed_by_email,
            signed_content: record.signed_content,
            signed_checksum: record.signed_checksum,
            signed_ts: record.signed_ts,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    pub fn signed_by_email(&self) -> &str {
        &self.signed_by_email
    }

    pub fn signed_content(&self) -> &str {
        &self.signed_content
    }

    /// Fingerprint of `signed_content` taken at signing time
    pub fn signed_checksum(&self) -> &Checksum {
        &self.signed_checksum
    }

    pub fn signed_ts(&self) -> DateTime<Utc> {
        self.signed_ts
    }
}

impl Identified for Signature {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Stored shape of a document, keyed by document id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct DocumentRecord {
    pub name: String,
    pub content: String,
    pub checksum: Checksum,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Stored shape of a signature, keyed by signature id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct SignatureRecord {
    pub document_id: String,
    pub signed_by_email: String,
    pub signed_content: String,
    pub signed_checksum: Checksum,
    /// Written as RFC 3339; read back with or without an offset
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub signed_ts: DateTime<Utc>,
}

/// Accept RFC 3339, or an ISO-8601 local time with no offset taken as UTC
fn deserialize_timestamp<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    raw.parse::<NaiveDateTime>()
        .map(|naive| naive.and_utc())
        .map_err(serde::de::Error::custom)
}

impl SignatureRecord {
    /// Build a record, computing the checksum from the signed content
    pub fn sign(
        document_id: String,
        signed_by_email: String,
        signed_content: String,
        signed_ts: DateTime<Utc>,
    ) -> Self {
        let signed_checksum = fingerprint(&signed_content);
        Self {
            document_id,
            signed_by_email,
            signed_content,
            signed_checksum,
            signed_ts,
        }
    }
}

/// Decode a stored record, naming the record on failure
pub(crate) fn decode<T: DeserializeOwned>(collection: Collection, key: &str, data: Value) -> Result<T> {
    serde_json::from_value(data).map_err(|e| Error::Decode {
        collection,
        key: key.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn created_document_carries_content_checksum() {
        let doc = Document::create(
            "d1".to_string(),
            NewDocument::new("contract", "Pay $100").submitted_by("Ada", "Lovelace", "ada@example.com"),
        );
        assert_eq!(doc.checksum(), &fingerprint("Pay $100"));
        assert_eq!(doc.email(), "ada@example.com");
    }

    #[test]
    fn signature_record_has_expected_wire_shape() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let record = SignatureRecord::sign(
            "d1".to_string(),
            "alice@example.com".to_string(),
            "Pay $100".to_string(),
            ts,
        );

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({
                "document_id": "d1",
                "signed_by_email": "alice@example.com",
                "signed_content": "Pay $100",
                "signed_checksum": fingerprint("Pay $100").as_str(),
                "signed_ts": "2024-03-01T12:00:00Z",
            })
        );
    }

    #[test]
    fn document_record_round_trips_through_store_value() {
        let doc = Document::create("d1".to_string(), NewDocument::new("contract", "body"));
        let value = serde_json::to_value(doc.to_record()).unwrap();
        let record: DocumentRecord = decode(Collection::Documents, "d1", value).unwrap();
        assert_eq!(Document::from_record("d1".to_string(), record), doc);
    }

    #[test]
    fn decode_names_the_bad_record() {
        let err = decode::<SignatureRecord>(Collection::Signatures, "s9", json!({"document_id": 5}))
            .unwrap_err();
        let display = err.to_string();
        assert!(display.contains("signatures"));
        assert!(display.contains("s9"));
    }

    #[test]
    fn signed_ts_without_offset_is_read_as_utc() {
        let record: SignatureRecord = decode(
            Collection::Signatures,
            "s1",
            json!({
                "document_id": "d1",
                "signed_by_email": "alice@example.com",
                "signed_content": "Pay $100",
                "signed_checksum": fingerprint("Pay $100").as_str(),
                "signed_ts": "2024-03-01T12:00:00.123456",
            }),
        )
        .unwrap();

        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
            + chrono::Duration::microseconds(123_456);
        assert_eq!(record.signed_ts, expected);
    }

    #[test]
    fn signed_ts_with_offset_is_normalised_to_utc() {
        let record: SignatureRecord = decode(
            Collection::Signatures,
            "s1",
            json!({
                "document_id": "d1",
                "signed_by_email": "a@x.com",
                "signed_content": "x",
                "signed_checksum": fingerprint("x").as_str(),
                "signed_ts": "2024-03-01T14:00:00+02:00",
            }),
        )
        .unwrap();
        assert_eq!(record.signed_ts, Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap());
    }

    #[test]
    fn unparseable_signed_ts_fails_decode() {
        let err = decode::<SignatureRecord>(
            Collection::Signatures,
            "s1",
            json!({
                "document_id": "d1",
                "signed_by_email": "a@x.com",
                "signed_content": "x",
                "signed_checksum": fingerprint("x").as_str(),
                "signed_ts": "yesterday",
            }),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }

    #[test]
    fn malformed_stored_checksum_fails_decode() {
        let err = decode::<DocumentRecord>(
            Collection::Documents,
            "d1",
            json!({
                "name": "n", "content": "c", "checksum": "xyz",
                "first_name": "", "last_name": "", "email": ""
            }),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }
}
