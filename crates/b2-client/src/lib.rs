//! # B2 Client SDK
//!
//! A client SDK for the Backblaze B2 native API.
//!
//! ## Features
//!
//! - **Typed operations**: buckets, files, application keys and downloads
//!   as method calls returning domain objects
//! - **Large files**: multipart upload lifecycle (start, upload or copy
//!   parts, finish, cancel) with recovery queries for unfinished files
//! - **Typed errors**: unauthorized, not-found and validation failures are
//!   distinct variants, not one generic error
//! - **Transparent auth**: lazy account authorization with a single token
//!   refresh on expiry
//!
//! ## Example
//!
//! ```rust,ignore
//! use b2_client::{B2Client, Config, StartLargeFile, LargeFileUpload};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> b2_client::Result<()> {
//!     let client = Arc::new(B2Client::new(Config::new("key-id", "application-key"))?);
//!
//!     // Upload a large file part by part
//!     let request = StartLargeFile::new("bucket-id", "movie.mp4");
//!     let mut upload = LargeFileUpload::start(Arc::clone(&client), request).await?;
//!     upload.upload_part(1, first_chunk).await?;
//!     upload.upload_part(2, second_chunk).await?;
//!     let file = upload.finish().await?;
//!     println!("uploaded {}", file.file_name);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Concurrency
//!
//! Every operation is a single request/response; the SDK imposes no
//! scheduling of its own. Part uploads for one file may run concurrently
//! through raw [`B2Client`] calls, but the part-number space must then be
//! partitioned by the caller, and the hash list passed to finish must be
//! in ascending part-number order ([`LargeFileUpload`] handles both when
//! driven sequentially).

mod auth;
mod client;
mod config;
mod error;
mod multipart;
mod pagination;
mod transport;
mod types;

pub use auth::{Allowed, Authorization};
pub use client::B2Client;
pub use config::{Config, DEFAULT_API_URL};
pub use error::{B2Error, Result};
pub use multipart::{upload_large_file, LargeFileUpload, ProgressCallback, UploadProgress};
pub use pagination::{
    page_stream, FileIdCursor, FileNameCursor, FileVersionCursor, KeyCursor, Page, PartCursor,
};
pub use types::*;
