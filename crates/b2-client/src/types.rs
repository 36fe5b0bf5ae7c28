//! Common types for the client SDK

use crate::error::{B2Error, Result};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Content type sentinel asking the service to detect the type itself
pub const CONTENT_TYPE_AUTO: &str = "b2/x-auto";

/// Maximum number of custom file info entries per file
pub const FILE_INFO_LIMIT: usize = 10;

pub(crate) const INFO_HEADER_PREFIX: &str = "X-Bz-Info-";

/// Custom file info attached to a file, capped at 10 entries.
///
/// The cap is enforced on construction and on each insert, so an over-limit
/// request fails locally before anything is sent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileInfo(BTreeMap<String, String>);

impl FileInfo {
    /// Create empty file info
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, failing if it would exceed the entry limit.
    ///
    /// Replacing the value of an existing key never counts against the
    /// limit. A rejected insert leaves the map untouched.
    pub fn try_insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let key = key.into();
        if !self.0.contains_key(&key) && self.0.len() >= FILE_INFO_LIMIT {
            return Err(B2Error::FileInfoLimit(self.0.len() + 1));
        }
        self.0.insert(key, value.into());
        Ok(())
    }

    /// Get the value for a key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no entries
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Transport header form: one `X-Bz-Info-<key>` pair per entry with a
    /// percent-encoded value.
    pub(crate) fn header_pairs(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .map(|(key, value)| {
                (
                    format!("{}{}", INFO_HEADER_PREFIX, key),
                    urlencoding::encode(value).into_owned(),
                )
            })
            .collect()
    }
}

impl TryFrom<BTreeMap<String, String>> for FileInfo {
    type Error = B2Error;

    fn try_from(entries: BTreeMap<String, String>) -> Result<Self> {
        if entries.len() > FILE_INFO_LIMIT {
            return Err(B2Error::FileInfoLimit(entries.len()));
        }
        Ok(Self(entries))
    }
}

/// A file as reported by the service.
///
/// Identity is `file_id`; every operation returns an immutable snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct File {
    /// Unique file id assigned by the service
    pub file_id: String,
    /// Full file name, including any folder-like prefixes
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket_id: Option<String>,
    /// What produced this record: "start", "upload", "hide", "copy", "folder"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Size in bytes
    #[serde(default)]
    pub content_length: u64,
    /// Hex content hash; "none" for large files assembled from parts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_sha1: Option<String>,
    /// Milliseconds since the epoch
    #[serde(default)]
    pub upload_timestamp: i64,
    #[serde(default, skip_serializing_if = "FileInfo::is_empty")]
    pub file_info: FileInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_hold: Option<LegalHold>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_retention: Option<FileRetention>,
}

impl File {
    /// Upload timestamp as a UTC datetime
    pub fn upload_time(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.upload_timestamp).single()
    }
}

/// Legal hold status on a file
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegalHold {
    #[serde(default)]
    pub is_client_authorized_to_read: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Retention settings on a file
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRetention {
    #[serde(default)]
    pub is_client_authorized_to_read: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<RetentionSetting>,
}

/// Retention mode and expiry
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetentionSetting {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retain_until_timestamp: Option<i64>,
}

/// A bucket
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    pub bucket_id: String,
    pub account_id: String,
    pub bucket_name: String,
    pub bucket_type: BucketType,
    #[serde(default)]
    pub bucket_info: BTreeMap<String, String>,
    #[serde(default)]
    pub revision: u64,
}

/// Bucket visibility
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BucketType {
    AllPublic,
    AllPrivate,
    Snapshot,
}

/// An application key
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationKey {
    pub application_key_id: String,
    pub key_name: String,
    pub capabilities: Vec<String>,
    pub account_id: String,
    /// Secret part, only present in the creation response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_timestamp: Option<i64>,
}

/// One uploaded or copied part of a large file
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    pub file_id: String,
    /// 1..10000, caller-assigned
    pub part_number: u32,
    pub content_length: u64,
    /// 40-hex-char content hash
    pub content_sha1: String,
    #[serde(default)]
    pub upload_timestamp: i64,
}

/// Grant for uploading a whole file to a bucket
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrl {
    pub bucket_id: String,
    pub upload_url: String,
    pub authorization_token: String,
}

/// Grant for uploading parts of one large file.
///
/// Ephemeral; the service expires it after inactivity. Expiry surfaces as
/// an `Unauthorized` error and is retryable by requesting a new grant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadPartUrl {
    pub file_id: String,
    pub upload_url: String,
    pub authorization_token: String,
}

/// Response to canceling a large file
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanceledFile {
    pub file_id: String,
    pub account_id: String,
    pub bucket_id: String,
    pub file_name: String,
}

/// Response to deleting a file version
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedFileVersion {
    pub file_id: String,
    pub file_name: String,
}

/// Token authorizing downloads for a file name prefix
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadAuthorization {
    pub bucket_id: String,
    pub file_name_prefix: String,
    pub authorization_token: String,
}

/// Server-side encryption settings for copy operations
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerSideEncryption {
    pub mode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,
}

/// Inclusive byte range of a source file
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    /// Wire form, e.g. `bytes=0-99`
    pub fn header_value(&self) -> String {
        format!("bytes={}-{}", self.start, self.end)
    }
}

impl Serialize for ByteRange {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.header_value())
    }
}

// ==================== Request Options ====================
//
// Optional fields are omitted from the serialized body when unset, so the
// service sees only what the caller actually provided.

/// Options for starting a large file
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartLargeFile {
    pub bucket_id: String,
    pub file_name: String,
    /// Defaults to [`CONTENT_TYPE_AUTO`] when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Only meaningful here; the service rejects file info at finish time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_info: Option<FileInfo>,
}

impl StartLargeFile {
    pub fn new(bucket_id: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            bucket_id: bucket_id.into(),
            file_name: file_name.into(),
            content_type: None,
            file_info: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_file_info(mut self, file_info: FileInfo) -> Self {
        self.file_info = Some(file_info);
        self
    }
}

/// Options for a single-shot file upload
#[derive(Clone, Debug)]
pub struct UploadFile {
    pub bucket_id: String,
    pub file_name: String,
    /// Defaults to [`CONTENT_TYPE_AUTO`] when unset
    pub content_type: Option<String>,
    pub file_info: Option<FileInfo>,
}

impl UploadFile {
    pub fn new(bucket_id: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            bucket_id: bucket_id.into(),
            file_name: file_name.into(),
            content_type: None,
            file_info: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_file_info(mut self, file_info: FileInfo) -> Self {
        self.file_info = Some(file_info);
        self
    }
}

/// Options for a server-side file copy
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyFile {
    pub source_file_id: String,
    pub file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_bucket_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<ByteRange>,
}

impl CopyFile {
    pub fn new(source_file_id: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            source_file_id: source_file_id.into(),
            file_name: file_name.into(),
            destination_bucket_id: None,
            range: None,
        }
    }

    pub fn with_destination_bucket(mut self, bucket_id: impl Into<String>) -> Self {
        self.destination_bucket_id = Some(bucket_id.into());
        self
    }

    pub fn with_range(mut self, range: ByteRange) -> Self {
        self.range = Some(range);
        self
    }
}

/// Options for populating one part by server-side copy
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyPart {
    pub source_file_id: String,
    pub large_file_id: String,
    pub part_number: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<ByteRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_server_side_encryption: Option<ServerSideEncryption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_server_side_encryption: Option<ServerSideEncryption>,
}

impl CopyPart {
    pub fn new(
        source_file_id: impl Into<String>,
        large_file_id: impl Into<String>,
        part_number: u32,
    ) -> Self {
        Self {
            source_file_id: source_file_id.into(),
            large_file_id: large_file_id.into(),
            part_number,
            range: None,
            source_server_side_encryption: None,
            destination_server_side_encryption: None,
        }
    }

    pub fn with_range(mut self, range: ByteRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn with_source_encryption(mut self, encryption: ServerSideEncryption) -> Self {
        self.source_server_side_encryption = Some(encryption);
        self
    }

    pub fn with_destination_encryption(mut self, encryption: ServerSideEncryption) -> Self {
        self.destination_server_side_encryption = Some(encryption);
        self
    }
}

/// Options for listing file names
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFileNames {
    pub bucket_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_file_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<String>,
}

impl ListFileNames {
    pub fn new(bucket_id: impl Into<String>) -> Self {
        Self {
            bucket_id: bucket_id.into(),
            start_file_name: None,
            max_file_count: None,
            prefix: None,
            delimiter: None,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = Some(delimiter.into());
        self
    }

    pub fn with_max_file_count(mut self, count: u32) -> Self {
        self.max_file_count = Some(count);
        self
    }
}

/// Options for listing file versions
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFileVersions {
    pub bucket_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_file_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_file_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<String>,
}

impl ListFileVersions {
    pub fn new(bucket_id: impl Into<String>) -> Self {
        Self {
            bucket_id: bucket_id.into(),
            start_file_name: None,
            start_file_id: None,
            max_file_count: None,
            prefix: None,
            delimiter: None,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_max_file_count(mut self, count: u32) -> Self {
        self.max_file_count = Some(count);
        self
    }
}

/// Options for listing parts of an unfinished large file
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParts {
    pub file_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_part_number: Option<u32>,
    /// At most 10000
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_part_count: Option<u32>,
}

impl ListParts {
    pub fn new(file_id: impl Into<String>) -> Self {
        Self {
            file_id: file_id.into(),
            start_part_number: None,
            max_part_count: None,
        }
    }

    pub fn with_max_part_count(mut self, count: u32) -> Self {
        self.max_part_count = Some(count);
        self
    }
}

/// Options for enumerating unfinished large files in a bucket
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUnfinishedLargeFiles {
    pub bucket_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_file_id: Option<String>,
    /// At most 100
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_file_count: Option<u32>,
}

impl ListUnfinishedLargeFiles {
    pub fn new(bucket_id: impl Into<String>) -> Self {
        Self {
            bucket_id: bucket_id.into(),
            name_prefix: None,
            start_file_id: None,
            max_file_count: None,
        }
    }

    pub fn with_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.name_prefix = Some(prefix.into());
        self
    }

    pub fn with_max_file_count(mut self, count: u32) -> Self {
        self.max_file_count = Some(count);
        self
    }
}

/// Options for listing application keys
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListKeys {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_key_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_application_key_id: Option<String>,
}

impl ListKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_key_count(mut self, count: u32) -> Self {
        self.max_key_count = Some(count);
        self
    }
}

/// Options for creating an application key
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateKey {
    pub key_name: String,
    pub capabilities: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_duration_in_seconds: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_prefix: Option<String>,
}

impl CreateKey {
    pub fn new(key_name: impl Into<String>, capabilities: Vec<String>) -> Self {
        Self {
            key_name: key_name.into(),
            capabilities,
            valid_duration_in_seconds: None,
            bucket_id: None,
            name_prefix: None,
        }
    }

    pub fn with_bucket(mut self, bucket_id: impl Into<String>) -> Self {
        self.bucket_id = Some(bucket_id.into());
        self
    }

    pub fn with_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.name_prefix = Some(prefix.into());
        self
    }

    pub fn with_valid_duration(mut self, seconds: u64) -> Self {
        self.valid_duration_in_seconds = Some(seconds);
        self
    }
}

/// Options for creating a bucket
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBucket {
    pub bucket_name: String,
    pub bucket_type: BucketType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket_info: Option<BTreeMap<String, String>>,
}

impl CreateBucket {
    pub fn new(bucket_name: impl Into<String>, bucket_type: BucketType) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            bucket_type,
            bucket_info: None,
        }
    }

    pub fn with_bucket_info(mut self, info: BTreeMap<String, String>) -> Self {
        self.bucket_info = Some(info);
        self
    }
}

/// Options for updating a bucket
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBucket {
    pub bucket_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket_type: Option<BucketType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket_info: Option<BTreeMap<String, String>>,
}

impl UpdateBucket {
    pub fn new(bucket_id: impl Into<String>) -> Self {
        Self {
            bucket_id: bucket_id.into(),
            bucket_type: None,
            bucket_info: None,
        }
    }

    pub fn with_bucket_type(mut self, bucket_type: BucketType) -> Self {
        self.bucket_type = Some(bucket_type);
        self
    }

    pub fn with_bucket_info(mut self, info: BTreeMap<String, String>) -> Self {
        self.bucket_info = Some(info);
        self
    }
}

// ==================== List Responses ====================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListBucketsResponse {
    pub buckets: Vec<Bucket>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListFileNamesResponse {
    pub files: Vec<File>,
    #[serde(default)]
    pub next_file_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListFileVersionsResponse {
    pub files: Vec<File>,
    #[serde(default)]
    pub next_file_name: Option<String>,
    #[serde(default)]
    pub next_file_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListPartsResponse {
    pub parts: Vec<Part>,
    #[serde(default)]
    pub next_part_number: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListUnfinishedResponse {
    pub files: Vec<File>,
    #[serde(default)]
    pub next_file_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListKeysResponse {
    pub keys: Vec<ApplicationKey>,
    #[serde(default)]
    pub next_application_key_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_info_cap_on_insert() {
        let mut info = FileInfo::new();
        for i in 0..FILE_INFO_LIMIT {
            info.try_insert(format!("key-{}", i), "value").unwrap();
        }
        assert_eq!(info.len(), 10);

        let err = info.try_insert("one-too-many", "value").unwrap_err();
        assert!(matches!(err, B2Error::FileInfoLimit(11)));
        // the failed insert must not mutate
        assert_eq!(info.len(), 10);
        assert!(info.get("one-too-many").is_none());
    }

    #[test]
    fn test_file_info_replace_within_cap() {
        let mut info = FileInfo::new();
        for i in 0..FILE_INFO_LIMIT {
            info.try_insert(format!("key-{}", i), "value").unwrap();
        }
        // replacing an existing key is not a new entry
        info.try_insert("key-0", "updated").unwrap();
        assert_eq!(info.len(), 10);
        assert_eq!(info.get("key-0"), Some("updated"));
    }

    #[test]
    fn test_file_info_cap_on_construction() {
        let mut entries = BTreeMap::new();
        for i in 0..11 {
            entries.insert(format!("key-{}", i), "value".to_string());
        }
        assert!(matches!(
            FileInfo::try_from(entries),
            Err(B2Error::FileInfoLimit(11))
        ));
    }

    #[test]
    fn test_file_info_header_pairs_percent_encoded() {
        let mut info = FileInfo::new();
        info.try_insert("author", "jane doe").unwrap();
        let pairs = info.header_pairs();
        assert_eq!(
            pairs,
            vec![("X-Bz-Info-author".to_string(), "jane%20doe".to_string())]
        );
    }

    #[test]
    fn test_file_json_round_trip() {
        let mut file_info = FileInfo::new();
        file_info.try_insert("author", "unknown").unwrap();

        let file = File {
            file_id: "4_z27c88f1d182b150646ff0b16_f1004ba650fe24e6b_d20260805_m042524_c001_v0001038_t0028".to_string(),
            file_name: "movie.mp4".to_string(),
            account_id: Some("acct-1".to_string()),
            bucket_id: Some("bucket-1".to_string()),
            action: Some("upload".to_string()),
            content_type: Some("video/mp4".to_string()),
            content_length: 10_485_760,
            content_sha1: Some("none".to_string()),
            upload_timestamp: 1_754_000_000_000,
            file_info,
            legal_hold: None,
            file_retention: None,
        };

        let json = serde_json::to_string(&file).unwrap();
        let parsed: File = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, file);
    }

    #[test]
    fn test_file_parses_wire_response() {
        let json = r#"{
            "fileId": "4_zabc",
            "fileName": "photos/cat.jpg",
            "contentType": "image/jpeg",
            "contentLength": 512,
            "contentSha1": "aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d",
            "uploadTimestamp": 1754000000000,
            "fileInfo": {"author": "unknown"},
            "action": "upload"
        }"#;

        let file: File = serde_json::from_str(json).unwrap();
        assert_eq!(file.file_id, "4_zabc");
        assert_eq!(file.file_info.get("author"), Some("unknown"));
        assert_eq!(file.action.as_deref(), Some("upload"));
        assert!(file.upload_time().is_some());
    }

    #[test]
    fn test_optional_request_fields_are_omitted() {
        let request = ListFileNames::new("bucket-1");
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body, serde_json::json!({"bucketId": "bucket-1"}));

        let request = ListFileNames::new("bucket-1")
            .with_prefix("photos/")
            .with_max_file_count(50);
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "bucketId": "bucket-1",
                "prefix": "photos/",
                "maxFileCount": 50
            })
        );
    }

    #[test]
    fn test_byte_range_serializes_as_header_form() {
        let request = CopyPart::new("4_zsource", "4_zlarge", 2).with_range(ByteRange::new(0, 99));
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["range"], serde_json::json!("bytes=0-99"));
    }
}
