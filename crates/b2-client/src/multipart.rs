//! Large-file multipart uploads
//!
//! A large file moves through start, parts-in-flight, and one of finished
//! or canceled. [`LargeFileUpload`] drives that lifecycle for one file:
//! it records a part only after its upload succeeds, and at finish time
//! sends the recorded hashes in ascending part-number order.
//!
//! Part numbers are caller-assigned (1..10000, contiguous from 1 before
//! finishing) and never renumbered here. The handle takes `&mut self` for
//! part operations, so one handle cannot race against itself; callers
//! driving raw client part uploads concurrently must partition the
//! part-number space themselves.

use crate::client::B2Client;
use crate::error::Result;
use crate::types::{
    ByteRange, CanceledFile, CopyPart, File, ListParts, Part, StartLargeFile, UploadPartUrl,
};
use bytes::Bytes;
use std::sync::Arc;
use tracing::debug;

/// Progress callback type
pub type ProgressCallback = Box<dyn Fn(UploadProgress) + Send + Sync>;

/// Upload progress information
#[derive(Clone, Debug)]
pub struct UploadProgress {
    /// Bytes uploaded so far
    pub bytes_uploaded: u64,
    /// Total bytes to upload
    pub total_bytes: u64,
    /// Current part number
    pub current_part: u32,
    /// Total number of parts
    pub total_parts: u32,
}

impl UploadProgress {
    /// Get percentage complete
    pub fn percentage(&self) -> f64 {
        if self.total_bytes == 0 {
            return 100.0;
        }
        (self.bytes_uploaded as f64 / self.total_bytes as f64) * 100.0
    }
}

/// Handle for one in-progress large-file upload
pub struct LargeFileUpload {
    client: Arc<B2Client>,
    file: File,
    grant: Option<UploadPartUrl>,
    parts: Vec<Part>,
}

impl LargeFileUpload {
    /// Start a new large file.
    ///
    /// Content type defaults to auto-detect when unset; custom file info
    /// can only be attached here, not at finish time.
    pub async fn start(client: Arc<B2Client>, request: StartLargeFile) -> Result<Self> {
        let file = client.start_large_file(&request).await?;
        Ok(Self {
            client,
            file,
            grant: None,
            parts: Vec::new(),
        })
    }

    /// Pick up an unfinished large file, seeding the recorded parts from
    /// the service's part listing.
    pub async fn resume(client: Arc<B2Client>, file: File) -> Result<Self> {
        let mut parts = Vec::new();
        let mut request = ListParts::new(&file.file_id);
        loop {
            let page = client.list_parts(&request).await?;
            parts.extend(page.items);
            match page.next {
                Some(cursor) => request.start_part_number = Some(cursor.start_part_number),
                None => break,
            }
        }
        debug!("resumed {} with {} uploaded parts", file.file_id, parts.len());
        Ok(Self {
            client,
            file,
            grant: None,
            parts,
        })
    }

    /// The file id assigned by the service
    pub fn file_id(&self) -> &str {
        &self.file.file_id
    }

    /// The file record returned by the start call
    pub fn file(&self) -> &File {
        &self.file
    }

    /// Parts recorded so far, in upload order
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Upload one part.
    ///
    /// Reuses the cached grant when there is one. If the grant is rejected
    /// as expired or unauthorized, a fresh grant is requested and the part
    /// retried exactly once before the error surfaces. A failed upload
    /// records nothing.
    pub async fn upload_part(&mut self, part_number: u32, data: Bytes) -> Result<Part> {
        let grant = match self.grant.take() {
            Some(grant) => grant,
            None => self.client.get_upload_part_url(&self.file.file_id).await?,
        };

        let (grant, part) = match self.client.upload_part(&grant, part_number, data.clone()).await {
            Ok(part) => (grant, part),
            Err(err) if err.is_unauthorized() => {
                debug!("part upload grant rejected, requesting a new one");
                let grant = self.client.get_upload_part_url(&self.file.file_id).await?;
                let part = self.client.upload_part(&grant, part_number, data).await?;
                (grant, part)
            }
            Err(err) => return Err(err),
        };

        self.grant = Some(grant);
        self.parts.push(part.clone());
        Ok(part)
    }

    /// Populate one part by server-side copy from an existing file.
    ///
    /// Substitutable with [`upload_part`](Self::upload_part) per part.
    pub async fn copy_part(
        &mut self,
        part_number: u32,
        source_file_id: &str,
        range: Option<ByteRange>,
    ) -> Result<Part> {
        let mut request = CopyPart::new(source_file_id, &self.file.file_id, part_number);
        if let Some(range) = range {
            request = request.with_range(range);
        }
        let part = self.client.copy_part(&request).await?;
        self.parts.push(part.clone());
        Ok(part)
    }

    /// Finish the file, assembling the recorded parts.
    ///
    /// Hashes are sent in ascending part-number order regardless of upload
    /// order. Gaps and duplicates are not detectable locally; the service
    /// rejects them with a validation error.
    pub async fn finish(self) -> Result<File> {
        let Self {
            client,
            file,
            mut parts,
            ..
        } = self;
        parts.sort_by_key(|part| part.part_number);
        let sha1s: Vec<String> = parts.into_iter().map(|part| part.content_sha1).collect();
        client.finish_large_file(&file.file_id, &sha1s).await
    }

    /// Abort the upload, deleting all uploaded parts remotely.
    ///
    /// Valid with zero or more parts uploaded; canceling is the only
    /// cleanup primitive, nothing triggers it implicitly.
    pub async fn cancel(self) -> Result<CanceledFile> {
        self.client.cancel_large_file(&self.file.file_id).await
    }
}

/// Upload a large file by chunking an in-memory payload.
///
/// Splits `data` at the service's recommended part size and drives the
/// parts sequentially, then finishes the file.
pub async fn upload_large_file(
    client: Arc<B2Client>,
    request: StartLargeFile,
    data: Bytes,
    progress: Option<ProgressCallback>,
) -> Result<File> {
    let part_size = client.recommended_part_size().await? as usize;
    let total_bytes = data.len() as u64;
    let total_parts = data.len().div_ceil(part_size) as u32;

    let mut upload = LargeFileUpload::start(client, request).await?;

    let mut bytes_uploaded = 0u64;
    for part_number in 1..=total_parts {
        let start = (part_number as usize - 1) * part_size;
        let end = (start + part_size).min(data.len());
        let chunk = data.slice(start..end);
        bytes_uploaded += chunk.len() as u64;

        upload.upload_part(part_number, chunk).await?;

        if let Some(ref callback) = progress {
            callback(UploadProgress {
                bytes_uploaded,
                total_bytes,
                current_part: part_number,
                total_parts,
            });
        }
    }

    upload.finish().await
}
