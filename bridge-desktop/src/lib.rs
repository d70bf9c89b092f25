//! # Desktop Bridge Implementations
//!
//! Default implementations of the bridge collaborator traits for desktop
//! hosts (Windows, macOS, Linux).
//!
//! ## Overview
//!
//! - `HttpClient` using `reqwest` (rustls, pooled connections, no retries)
//! - `ObjectStoreClient` using `aws-sdk-s3` with the standard credential chain
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{AwsS3Client, ReqwestHttpClient, S3Settings};
//!
//! #[tokio::main]
//! async fn main() {
//!     let http_client = ReqwestHttpClient::new().unwrap();
//!     let s3_client = AwsS3Client::new(&S3Settings::default()).await;
//!
//!     // Hand both to the bridge service
//! }
//! ```

mod http;
mod s3;

pub use http::ReqwestHttpClient;
pub use s3::{AwsS3Client, S3Settings, DEFAULT_REGION};
