//! Main client implementation

use crate::auth::{self, Authorization};
use crate::config::Config;
use crate::error::{B2Error, Result};
use crate::pagination::{
    FileIdCursor, FileNameCursor, FileVersionCursor, KeyCursor, Page, PartCursor,
};
use crate::transport::Transport;
use crate::types::*;
use bytes::Bytes;
use reqwest::header;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use sha1::{Digest, Sha1};
use tokio::sync::RwLock;
use tracing::{debug, instrument};

const API_PREFIX: &str = "b2api/v2";

const HEADER_FILE_NAME: &str = "X-Bz-File-Name";
const HEADER_CONTENT_SHA1: &str = "X-Bz-Content-Sha1";
const HEADER_PART_NUMBER: &str = "X-Bz-Part-Number";

/// Backblaze B2 client
///
/// Authorizes lazily on the first call and caches the session token; a
/// rejected token is refreshed transparently exactly once per operation.
pub struct B2Client {
    config: Config,
    transport: Transport,
    auth: RwLock<Option<Authorization>>,
}

impl B2Client {
    /// Create a new client with the given configuration
    pub fn new(config: Config) -> Result<Self> {
        url::Url::parse(&config.api_url)
            .map_err(|e| B2Error::Config(format!("invalid api url {}: {}", config.api_url, e)))?;
        let transport = Transport::new(&config)?;
        Ok(Self {
            config,
            transport,
            auth: RwLock::new(None),
        })
    }

    /// Create a client from raw credentials with default settings
    pub fn with_credentials(
        application_key_id: impl Into<String>,
        application_key: impl Into<String>,
    ) -> Result<Self> {
        Self::new(Config::new(application_key_id, application_key))
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    // ==================== Authorization ====================

    /// Authorize against the service, replacing any cached session
    #[instrument(skip(self))]
    pub async fn authorize(&self) -> Result<Authorization> {
        let authorization = auth::authorize_account(&self.transport, &self.config).await?;
        debug!("authorized account {}", authorization.account_id);
        *self.auth.write().await = Some(authorization.clone());
        Ok(authorization)
    }

    /// Current authorization, fetching one if none is cached
    pub async fn authorization(&self) -> Result<Authorization> {
        if let Some(auth) = self.auth.read().await.as_ref() {
            return Ok(auth.clone());
        }
        self.authorize().await
    }

    /// Part size the service recommends for large-file uploads
    pub async fn recommended_part_size(&self) -> Result<u64> {
        Ok(self.authorization().await?.recommended_part_size)
    }

    async fn invalidate_auth(&self) {
        *self.auth.write().await = None;
    }

    /// Send a request built against the current authorization.
    ///
    /// A 401 invalidates the cached token and retries exactly once with a
    /// fresh authorization; a second consecutive 401 surfaces to the
    /// caller.
    async fn send_authed<F>(&self, build: F) -> Result<reqwest::Response>
    where
        F: Fn(&Authorization, &reqwest::Client) -> reqwest::RequestBuilder,
    {
        let mut refreshed = false;
        loop {
            let auth = self.authorization().await?;
            match self
                .transport
                .send(|| build(&auth, self.transport.http()))
                .await
            {
                Err(err) if err.is_unauthorized() && !refreshed => {
                    debug!("authorization rejected, refreshing token");
                    refreshed = true;
                    self.invalidate_auth().await;
                }
                other => return other,
            }
        }
    }

    async fn api_call<T: DeserializeOwned>(&self, operation: &str, body: Value) -> Result<T> {
        let response = self
            .send_authed(|auth, http| {
                http.post(format!("{}/{}/{}", auth.api_url, API_PREFIX, operation))
                    .header(header::AUTHORIZATION, auth.authorization_token.as_str())
                    .json(&body)
            })
            .await?;
        Ok(response.json().await?)
    }

    async fn attach_account(&self, body: &mut Value) -> Result<()> {
        let auth = self.authorization().await?;
        if let Some(map) = body.as_object_mut() {
            map.insert("accountId".to_string(), Value::String(auth.account_id));
        }
        Ok(())
    }

    // ==================== Bucket Operations ====================

    /// Create a bucket
    #[instrument(skip(self))]
    pub async fn create_bucket(&self, request: &CreateBucket) -> Result<Bucket> {
        let mut body = serde_json::to_value(request)?;
        self.attach_account(&mut body).await?;
        self.api_call("b2_create_bucket", body).await
    }

    /// Update a bucket's type or info
    #[instrument(skip(self))]
    pub async fn update_bucket(&self, request: &UpdateBucket) -> Result<Bucket> {
        let mut body = serde_json::to_value(request)?;
        self.attach_account(&mut body).await?;
        self.api_call("b2_update_bucket", body).await
    }

    /// Delete a bucket, returning its last known state
    #[instrument(skip(self))]
    pub async fn delete_bucket(&self, bucket_id: &str) -> Result<Bucket> {
        let mut body = json!({ "bucketId": bucket_id });
        self.attach_account(&mut body).await?;
        self.api_call("b2_delete_bucket", body).await
    }

    /// List all buckets in the account
    #[instrument(skip(self))]
    pub async fn list_buckets(&self) -> Result<Vec<Bucket>> {
        let mut body = json!({});
        self.attach_account(&mut body).await?;
        let response: ListBucketsResponse = self.api_call("b2_list_buckets", body).await?;
        Ok(response.buckets)
    }

    // ==================== Key Operations ====================

    /// Create an application key
    #[instrument(skip(self))]
    pub async fn create_key(&self, request: &CreateKey) -> Result<ApplicationKey> {
        let mut body = serde_json::to_value(request)?;
        self.attach_account(&mut body).await?;
        self.api_call("b2_create_key", body).await
    }

    /// Delete an application key
    #[instrument(skip(self))]
    pub async fn delete_key(&self, application_key_id: &str) -> Result<ApplicationKey> {
        let body = json!({ "applicationKeyId": application_key_id });
        self.api_call("b2_delete_key", body).await
    }

    /// List application keys, one page at a time
    #[instrument(skip(self))]
    pub async fn list_keys(&self, request: &ListKeys) -> Result<Page<ApplicationKey, KeyCursor>> {
        let mut body = serde_json::to_value(request)?;
        self.attach_account(&mut body).await?;
        let response: ListKeysResponse = self.api_call("b2_list_keys", body).await?;
        let next = response.next_application_key_id.map(|id| KeyCursor {
            start_application_key_id: id,
        });
        Ok(Page::new(response.keys, next))
    }

    // ==================== File Operations ====================

    /// Request a grant for uploading files to a bucket
    #[instrument(skip(self))]
    pub async fn get_upload_url(&self, bucket_id: &str) -> Result<UploadUrl> {
        self.api_call("b2_get_upload_url", json!({ "bucketId": bucket_id }))
            .await
    }

    /// Upload a file in one shot.
    ///
    /// Requests a fresh grant, and requests another one exactly once if the
    /// first is rejected as expired.
    #[instrument(skip(self, data))]
    pub async fn upload_file(&self, request: &UploadFile, data: Bytes) -> Result<File> {
        let grant = self.get_upload_url(&request.bucket_id).await?;
        match self.upload_file_to(&grant, request, data.clone()).await {
            Err(err) if err.is_unauthorized() => {
                debug!("upload grant rejected, requesting a new one");
                let grant = self.get_upload_url(&request.bucket_id).await?;
                self.upload_file_to(&grant, request, data).await
            }
            other => other,
        }
    }

    /// Upload a file through a previously requested grant
    #[instrument(skip(self, data))]
    pub async fn upload_file_to(
        &self,
        grant: &UploadUrl,
        request: &UploadFile,
        data: Bytes,
    ) -> Result<File> {
        let content_sha1 = sha1_hex(&data);
        let content_type = request.content_type.as_deref().unwrap_or(CONTENT_TYPE_AUTO);
        let file_name = encode_file_name(&request.file_name);

        let response = self
            .transport
            .send(|| {
                let mut req = self
                    .transport
                    .http()
                    .post(&grant.upload_url)
                    .header(header::AUTHORIZATION, grant.authorization_token.as_str())
                    .header(HEADER_FILE_NAME, file_name.as_str())
                    .header(header::CONTENT_TYPE, content_type)
                    .header(header::CONTENT_LENGTH, data.len() as u64)
                    .header(HEADER_CONTENT_SHA1, content_sha1.as_str());
                if let Some(info) = &request.file_info {
                    for (name, value) in info.header_pairs() {
                        req = req.header(name.as_str(), value.as_str());
                    }
                }
                req.body(data.clone())
            })
            .await?;

        Ok(response.json().await?)
    }

    /// Get a file's metadata by id
    #[instrument(skip(self))]
    pub async fn get_file_info(&self, file_id: &str) -> Result<File> {
        self.api_call("b2_get_file_info", json!({ "fileId": file_id }))
            .await
    }

    /// Delete one version of a file
    #[instrument(skip(self))]
    pub async fn delete_file_version(
        &self,
        file_name: &str,
        file_id: &str,
    ) -> Result<DeletedFileVersion> {
        let body = json!({ "fileName": file_name, "fileId": file_id });
        self.api_call("b2_delete_file_version", body).await
    }

    /// Hide a file so it no longer shows in file-name listings
    #[instrument(skip(self))]
    pub async fn hide_file(&self, bucket_id: &str, file_name: &str) -> Result<File> {
        let body = json!({ "bucketId": bucket_id, "fileName": file_name });
        self.api_call("b2_hide_file", body).await
    }

    /// Copy a file server-side
    #[instrument(skip(self))]
    pub async fn copy_file(&self, request: &CopyFile) -> Result<File> {
        self.api_call("b2_copy_file", serde_json::to_value(request)?)
            .await
    }

    /// List file names in a bucket, one page at a time
    #[instrument(skip(self))]
    pub async fn list_file_names(
        &self,
        request: &ListFileNames,
    ) -> Result<Page<File, FileNameCursor>> {
        let body = serde_json::to_value(request)?;
        let response: ListFileNamesResponse = self.api_call("b2_list_file_names", body).await?;
        let next = response.next_file_name.map(|name| FileNameCursor {
            start_file_name: name,
        });
        Ok(Page::new(response.files, next))
    }

    /// List all versions of files in a bucket, one page at a time
    #[instrument(skip(self))]
    pub async fn list_file_versions(
        &self,
        request: &ListFileVersions,
    ) -> Result<Page<File, FileVersionCursor>> {
        let body = serde_json::to_value(request)?;
        let response: ListFileVersionsResponse =
            self.api_call("b2_list_file_versions", body).await?;
        let next = response.next_file_name.map(|name| FileVersionCursor {
            start_file_name: name,
            start_file_id: response.next_file_id,
        });
        Ok(Page::new(response.files, next))
    }

    // ==================== Downloads ====================

    /// Download a file's contents by id
    #[instrument(skip(self))]
    pub async fn download_file_by_id(&self, file_id: &str) -> Result<Bytes> {
        let response = self
            .send_authed(|auth, http| {
                http.get(format!(
                    "{}/{}/b2_download_file_by_id",
                    auth.download_url, API_PREFIX
                ))
                .query(&[("fileId", file_id)])
                .header(header::AUTHORIZATION, auth.authorization_token.as_str())
            })
            .await?;
        Ok(response.bytes().await?)
    }

    /// Download a file's contents by bucket and file name
    #[instrument(skip(self))]
    pub async fn download_file_by_name(&self, bucket_name: &str, file_name: &str) -> Result<Bytes> {
        let encoded_name = encode_file_name(file_name);
        let response = self
            .send_authed(|auth, http| {
                http.get(format!(
                    "{}/file/{}/{}",
                    auth.download_url, bucket_name, encoded_name
                ))
                .header(header::AUTHORIZATION, auth.authorization_token.as_str())
            })
            .await?;
        Ok(response.bytes().await?)
    }

    /// Get a token authorizing downloads for a file name prefix
    #[instrument(skip(self))]
    pub async fn get_download_authorization(
        &self,
        bucket_id: &str,
        file_name_prefix: &str,
        valid_duration_seconds: u64,
    ) -> Result<DownloadAuthorization> {
        let body = json!({
            "bucketId": bucket_id,
            "fileNamePrefix": file_name_prefix,
            "validDurationInSeconds": valid_duration_seconds,
        });
        self.api_call("b2_get_download_authorization", body).await
    }

    // ==================== Large File Operations ====================

    /// Start a large file, returning its file record (action "start")
    #[instrument(skip(self))]
    pub async fn start_large_file(&self, request: &StartLargeFile) -> Result<File> {
        let mut body = json!({
            "bucketId": request.bucket_id,
            "fileName": request.file_name,
            "contentType": request.content_type.as_deref().unwrap_or(CONTENT_TYPE_AUTO),
        });
        if let Some(info) = &request.file_info {
            body["fileInfo"] = serde_json::to_value(info)?;
        }
        self.api_call("b2_start_large_file", body).await
    }

    /// Request a grant for uploading parts of a large file
    #[instrument(skip(self))]
    pub async fn get_upload_part_url(&self, file_id: &str) -> Result<UploadPartUrl> {
        self.api_call("b2_get_upload_part_url", json!({ "fileId": file_id }))
            .await
    }

    /// Upload one part through a grant.
    ///
    /// Computes the content length and hash before transmission and sends
    /// them as headers. The part number is taken verbatim; it is never
    /// renumbered locally. An expired grant surfaces as `Unauthorized` and
    /// is retryable by requesting a new grant.
    #[instrument(skip(self, data))]
    pub async fn upload_part(
        &self,
        grant: &UploadPartUrl,
        part_number: u32,
        data: Bytes,
    ) -> Result<Part> {
        let content_sha1 = sha1_hex(&data);
        let response = self
            .transport
            .send(|| {
                self.transport
                    .http()
                    .post(&grant.upload_url)
                    .header(header::AUTHORIZATION, grant.authorization_token.as_str())
                    .header(HEADER_PART_NUMBER, part_number)
                    .header(header::CONTENT_LENGTH, data.len() as u64)
                    .header(HEADER_CONTENT_SHA1, content_sha1.as_str())
                    .body(data.clone())
            })
            .await?;
        Ok(response.json().await?)
    }

    /// Populate one part by server-side copy
    #[instrument(skip(self))]
    pub async fn copy_part(&self, request: &CopyPart) -> Result<Part> {
        self.api_call("b2_copy_part", serde_json::to_value(request)?)
            .await
    }

    /// Assemble a started large file from its parts.
    ///
    /// `part_sha1_array` must hold the part hashes in ascending part-number
    /// order; the service validates contiguity and hash correctness.
    #[instrument(skip(self, part_sha1_array))]
    pub async fn finish_large_file(
        &self,
        file_id: &str,
        part_sha1_array: &[String],
    ) -> Result<File> {
        let body = json!({ "fileId": file_id, "partSha1Array": part_sha1_array });
        self.api_call("b2_finish_large_file", body).await
    }

    /// Abort a large file, deleting all uploaded parts
    #[instrument(skip(self))]
    pub async fn cancel_large_file(&self, file_id: &str) -> Result<CanceledFile> {
        self.api_call("b2_cancel_large_file", json!({ "fileId": file_id }))
            .await
    }

    /// List the parts uploaded for an unfinished large file
    #[instrument(skip(self))]
    pub async fn list_parts(&self, request: &ListParts) -> Result<Page<Part, PartCursor>> {
        let body = serde_json::to_value(request)?;
        let response: ListPartsResponse = self.api_call("b2_list_parts", body).await?;
        let next = response.next_part_number.map(|number| PartCursor {
            start_part_number: number,
        });
        Ok(Page::new(response.parts, next))
    }

    /// Enumerate unfinished large files in a bucket for cleanup or resume
    #[instrument(skip(self))]
    pub async fn list_unfinished_large_files(
        &self,
        request: &ListUnfinishedLargeFiles,
    ) -> Result<Page<File, FileIdCursor>> {
        let body = serde_json::to_value(request)?;
        let response: ListUnfinishedResponse = self
            .api_call("b2_list_unfinished_large_files", body)
            .await?;
        let next = response
            .next_file_id
            .map(|id| FileIdCursor { start_file_id: id });
        Ok(Page::new(response.files, next))
    }
}

// ==================== Helpers ====================

pub(crate) fn sha1_hex(data: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Percent-encode a file name, leaving path separators intact
fn encode_file_name(name: &str) -> String {
    name.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha1_hex() {
        assert_eq!(sha1_hex(b"hello"), "aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d");
    }

    #[test]
    fn test_encode_file_name_preserves_separators() {
        assert_eq!(
            encode_file_name("photos/summer 2026/cat+dog.jpg"),
            "photos/summer%202026/cat%2Bdog.jpg"
        );
    }
}
