//! Value objects for the distribution API.
//!
//! Every entity here is an immutable snapshot of the provider's state at
//! fetch time, constructed from a decoded response. Nothing holds a
//! connection and nothing refreshes itself; the only in-place mutation a
//! caller ever performs is editing a config locally before sending it back
//! for an update.

use crate::time::DateTime;

/// The two flavors of distribution the service hosts.
///
/// Every distribution-family operation is parameterized by this kind: it
/// selects the request path prefix and the name of the nested config
/// element, so a kind can never be paired with the wrong path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistributionKind {
    /// An ordinary HTTP(S) distribution.
    Web,
    /// An RTMP streaming distribution.
    Streaming,
}

impl DistributionKind {
    /// Whether this is the streaming flavor.
    pub fn is_streaming(self) -> bool {
        matches!(self, DistributionKind::Streaming)
    }

    pub(crate) fn path_prefix(self) -> &'static str {
        match self {
            DistributionKind::Web => "distribution",
            DistributionKind::Streaming => "streaming-distribution",
        }
    }

    pub(crate) fn config_root(self) -> &'static str {
        match self {
            DistributionKind::Web => "DistributionConfig",
            DistributionKind::Streaming => "StreamingDistributionConfig",
        }
    }
}

/// A configured CDN endpoint mapping a domain to one or more origins.
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    /// Which flavor this distribution is.
    pub kind: DistributionKind,
    /// Distribution id.
    pub id: String,
    /// Deployment status as reported by the service.
    pub status: String,
    /// When the distribution was last modified.
    pub last_modified: Option<DateTime>,
    /// The domain name the service allocated for this distribution.
    pub domain_name: String,
    /// Number of invalidation batches currently in progress.
    pub in_progress_invalidation_batches: u64,
    /// Accounts currently allowed to sign restricted URLs, with the key
    /// pairs active for each.
    pub active_trusted_signers: Vec<ActiveSigner>,
    /// The owned configuration.
    pub config: DistributionConfig,
}

impl Distribution {
    /// The configured origins. A view over [`Self::config`].
    pub fn origins(&self) -> &[Origin] {
        &self.config.origins
    }

    /// The configured alternate domain names. A view over [`Self::config`].
    pub fn aliases(&self) -> &[String] {
        &self.config.aliases
    }

    /// The configured comment. A view over [`Self::config`].
    pub fn comment(&self) -> &str {
        &self.config.comment
    }

    /// Whether the distribution is enabled. A view over [`Self::config`].
    pub fn enabled(&self) -> bool {
        self.config.enabled
    }
}

/// One entry of a distribution's active trusted signer set.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveSigner {
    /// The signer's account id, or the literal `self` for the owning
    /// account.
    pub aws_account_number: String,
    /// Key pair ids active for this signer. May be empty.
    pub key_pair_ids: Vec<String>,
}

/// A distribution as it appears in a list page.
///
/// List summaries carry a flattened subset of the full entity and never an
/// etag; fetch the item directly to mutate it.
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionSummary {
    /// Which flavor this distribution is.
    pub kind: DistributionKind,
    /// Distribution id.
    pub id: String,
    /// Deployment status as reported by the service.
    pub status: String,
    /// When the distribution was last modified.
    pub last_modified: Option<DateTime>,
    /// The domain name the service allocated for this distribution.
    pub domain_name: String,
    /// Alternate domain names.
    pub aliases: Vec<String>,
    /// The configured origins.
    pub origins: Vec<Origin>,
    /// Comment.
    pub comment: String,
    /// Whether the distribution is enabled.
    pub enabled: bool,
}

/// Configuration half of a distribution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DistributionConfig {
    /// Caller-chosen idempotency token. Opaque to this layer and never
    /// generated here; reused verbatim when a fetched config is sent back
    /// for an update.
    pub caller_reference: String,
    /// Alternate domain names (CNAMEs), in order.
    pub aliases: Vec<String>,
    /// Object served for requests to the distribution root.
    pub default_root_object: Option<String>,
    /// Backing origins, in order.
    pub origins: Vec<Origin>,
    /// The behavior applied when no path pattern matches.
    pub default_cache_behavior: CacheBehavior,
    /// Additional behaviors, matched in order.
    pub cache_behaviors: Vec<CacheBehavior>,
    /// Free-form comment.
    pub comment: String,
    /// Access logging, if enabled.
    pub logging: Option<Logging>,
    /// Whether the distribution accepts traffic.
    pub enabled: bool,
    /// Concurrency token. Populated only when the config was fetched
    /// directly (never when nested inside a distribution read) and
    /// required for any subsequent update. Never serialized.
    pub etag: Option<String>,
}

/// The backing source a distribution fetches content from.
#[derive(Debug, Clone, PartialEq)]
pub struct Origin {
    /// Identifier referenced by cache behaviors' `target_origin_id`.
    pub id: String,
    /// DNS name of the origin.
    pub domain_name: String,
    /// Origin type and its type-specific settings.
    pub kind: OriginKind,
}

/// Type-specific origin settings.
#[derive(Debug, Clone, PartialEq)]
pub enum OriginKind {
    /// An object-storage origin.
    S3 {
        /// Bare id of the origin access identity the distribution presents
        /// to the bucket, or `None` when access is not restricted. The
        /// wire form carries a fixed reference prefix that is stripped on
        /// decode and prepended on encode.
        origin_access_identity: Option<String>,
    },
    /// A custom HTTP(S) server origin.
    Custom {
        /// Port for HTTP traffic.
        http_port: u16,
        /// Port for HTTPS traffic.
        https_port: u16,
        /// How the edge connects to the origin: `http-only`,
        /// `match-viewer` or `https-only`.
        protocol_policy: String,
    },
}

/// How requests matching a path pattern are served.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheBehavior {
    /// Pattern this behavior applies to. Absent only for the default
    /// behavior.
    pub path_pattern: Option<String>,
    /// Id of the origin this behavior routes to.
    pub target_origin_id: String,
    /// Whether the query string is forwarded to the origin.
    pub forward_query_string: bool,
    /// Accounts allowed to sign restricted URLs under this behavior.
    pub trusted_signers: TrustedSigners,
    /// Protocol requirement for viewers: `allow-all`, `https-only` or
    /// `redirect-to-https`.
    pub viewer_protocol_policy: String,
    /// Minimum time, in seconds, objects stay cached.
    pub min_ttl: u64,
}

/// The trusted signer set of a cache behavior.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrustedSigners {
    /// Whether signed-URL enforcement is on for the behavior.
    pub enabled: bool,
    /// Account ids allowed to sign, possibly including the literal
    /// `self` sentinel for the owning account.
    pub aws_account_numbers: Vec<String>,
}

/// Access logging settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Logging {
    /// Whether logging is active.
    pub enabled: bool,
    /// Bucket receiving the logs.
    pub bucket: String,
    /// Key prefix for log objects.
    pub prefix: String,
}

/// A request to purge paths from edge caches.
#[derive(Debug, Clone, PartialEq)]
pub struct Invalidation {
    /// Id of the distribution the batch belongs to. A back-reference, not
    /// ownership.
    pub distribution: String,
    /// Invalidation batch id.
    pub id: String,
    /// Batch status as reported by the service.
    pub status: String,
    /// When the batch was created. Present only on a direct batch read,
    /// never in a list summary.
    pub create_time: Option<DateTime>,
    /// Paths being purged, in order. Empty in a list summary.
    pub paths: Vec<String>,
    /// The batch's idempotency token. Present only on a direct batch read.
    pub caller_reference: Option<String>,
}

/// An identity a distribution presents to a private origin.
#[derive(Debug, Clone, PartialEq)]
pub struct OriginAccessIdentity {
    /// Identity id.
    pub id: String,
    /// The canonical user id bucket policies compare against.
    pub s3_canonical_user_id: String,
    /// Free-form comment.
    pub comment: String,
    /// The identity's idempotency token.
    pub caller_reference: String,
    /// Concurrency token, required for update and delete.
    pub etag: Option<String>,
}

/// Configuration half of an origin access identity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OriginAccessIdentityConfig {
    /// Caller-chosen idempotency token.
    pub caller_reference: String,
    /// Free-form comment.
    pub comment: String,
    /// Concurrency token. Populated on a direct config fetch and required
    /// for update. Never serialized.
    pub etag: Option<String>,
}

/// An origin access identity as it appears in a list page.
#[derive(Debug, Clone, PartialEq)]
pub struct OriginAccessIdentitySummary {
    /// Identity id.
    pub id: String,
    /// The canonical user id bucket policies compare against.
    pub s3_canonical_user_id: String,
    /// Free-form comment.
    pub comment: String,
}

/// One page of a list operation.
///
/// The client never auto-paginates: repeat the call with `marker` set to
/// the previous page's `next_marker` while `is_truncated` is true.
#[derive(Debug, Clone, PartialEq)]
pub struct ListPage<T> {
    /// The page's entries, in service order.
    pub items: Vec<T>,
    /// Whether more entries exist past this page.
    pub is_truncated: bool,
    /// The marker this page was requested with.
    pub marker: Option<String>,
    /// Marker to request the next page with.
    pub next_marker: Option<String>,
    /// The page-size cap the service applied.
    pub max_items: Option<u32>,
}

/// A successful operation result together with its response envelope.
///
/// `etag` and `request_id` are transport metadata, deliberately kept out
/// of the domain entities.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    /// The decoded domain value.
    pub value: T,
    /// The response's concurrency token, when the service sent one.
    pub etag: Option<String>,
    /// The response's correlation id, when the service sent one.
    pub request_id: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Discard the envelope and keep the domain value.
    pub fn into_inner(self) -> T {
        self.value
    }
}
