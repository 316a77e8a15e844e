//! Client for the CloudFront distribution provisioning API.
//!
//! This crate speaks the administrative REST API of the CDN service:
//! distributions (web and streaming), cache invalidation batches and
//! origin access identities, plus locally minted signed URLs for
//! restricted content.
//!
//! ## Overview
//!
//! The crate is built around a few pieces:
//!
//! - **Context**: holds the HTTP transport behind the [`HttpSend`] trait;
//!   any HTTP stack can be plugged in (see the companion
//!   `cfdist-http-send-reqwest` crate)
//! - **Client**: one method per provider action, each an independent
//!   signed request/response exchange with no internal retries
//! - **Signed URLs**: [`SignedUrlRequest`] builds canned- and
//!   custom-policy URLs without touching the network
//!
//! ## Example
//!
//! ```no_run
//! use cfdist_core::{Client, Context, Credential};
//!
//! # async fn example() -> cfdist_core::Result<()> {
//! let ctx = Context::new(); // plug in a transport via with_http_send
//! let client = Client::new(ctx, Credential::new("access_key", "secret"));
//!
//! let created = client
//!     .create_invalidation(
//!         "EDFDVBD6EXAMPLE",
//!         "purge-2024-06-01",
//!         &["/index.html".to_string(), "/logo.png".to_string()],
//!     )
//!     .await?;
//! println!("batch {} is {}", created.value.id, created.value.status);
//! # Ok(())
//! # }
//! ```
//!
//! ## Errors
//!
//! Every operation returns [`Result`]. [`ErrorKind`] separates local
//! argument problems (`Validation`), service-reported errors (`Provider`,
//! with code and status), malformed exchanges (`Protocol`) and transport
//! failures (`Transport`). Nothing is retried and nothing is logged beyond
//! `debug!` traces; retry policy belongs to the caller.

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;

mod constants;
pub use constants::{API_VERSION, ENDPOINT};

mod error;
pub use error::{Error, ErrorKind, Result};

mod context;
pub use context::{Context, HttpSend, NoopHttpSend};

mod credential;
pub use credential::Credential;

mod sign_request;
pub use sign_request::RequestSigner;

mod model;
pub use model::{
    ActiveSigner, ApiResponse, CacheBehavior, Distribution, DistributionConfig, DistributionKind,
    DistributionSummary, Invalidation, ListPage, Logging, Origin, OriginAccessIdentity,
    OriginAccessIdentityConfig, OriginAccessIdentitySummary, OriginKind, TrustedSigners,
};

mod codec;

mod signed_url;
pub use signed_url::{Expires, SignedUrlRequest};

mod client;
pub use client::{Client, ListOptions};
