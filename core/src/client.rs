//! The API client: one method per provider action.

use bytes::Bytes;
use http::header::{HeaderMap, CONTENT_TYPE, ETAG, IF_MATCH};
use http::{Method, StatusCode};
use log::debug;

use crate::codec;
use crate::constants;
use crate::context::Context;
use crate::credential::{redact, Credential};
use crate::model::{
    ApiResponse, Distribution, DistributionConfig, DistributionKind, DistributionSummary,
    Invalidation, ListPage, OriginAccessIdentity, OriginAccessIdentityConfig,
    OriginAccessIdentitySummary,
};
use crate::sign_request::RequestSigner;
use crate::signed_url::{self, SignedUrlRequest};
use crate::time;
use crate::{Error, Result};

/// Optional cursor parameters for list operations.
///
/// The client never auto-paginates; repeat a list call with `marker` set to
/// the previous page's `next_marker` while `is_truncated` is true.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Entry id to start the page after.
    pub marker: Option<String>,
    /// Page size cap to request.
    pub max_items: Option<u32>,
}

impl ListOptions {
    /// Start the page after `marker`.
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = Some(marker.into());
        self
    }

    /// Request at most `max_items` entries.
    pub fn with_max_items(mut self, max_items: u32) -> Self {
        self.max_items = Some(max_items);
        self
    }
}

/// Client for the distribution provisioning API.
///
/// The client is immutable after construction: credentials and default
/// signed-URL key material are fixed, each call signs itself with a fresh
/// `Date`, and nothing is cached between calls, so one client may serve
/// any number of concurrent calls.
///
/// ## Example
///
/// ```no_run
/// use cfdist_core::{Client, Context, Credential, DistributionKind, ListOptions};
///
/// # async fn example() -> cfdist_core::Result<()> {
/// let ctx = Context::new(); // configure a transport via with_http_send
/// let client = Client::new(ctx, Credential::new("access_key", "secret"));
///
/// let page = client
///     .list_distributions(DistributionKind::Web, ListOptions::default())
///     .await?;
/// for dist in &page.value.items {
///     println!("{}: {}", dist.id, dist.domain_name);
/// }
/// # Ok(())
/// # }
/// ```
pub struct Client {
    ctx: Context,
    signer: RequestSigner,
    endpoint: String,
    key_pair_id: Option<String>,
    private_key: Option<String>,
}

impl Client {
    /// Create a client from a transport context and a credential.
    pub fn new(ctx: Context, credential: Credential) -> Self {
        Self {
            ctx,
            signer: RequestSigner::new(credential),
            endpoint: constants::ENDPOINT.to_string(),
            key_pair_id: None,
            private_key: None,
        }
    }

    /// Override the API endpoint host.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the default key pair used by [`Client::signed_url`] when a
    /// request does not carry its own.
    pub fn with_key_pair(
        mut self,
        key_pair_id: impl Into<String>,
        private_key_pem: impl Into<String>,
    ) -> Self {
        self.key_pair_id = Some(key_pair_id.into());
        self.private_key = Some(private_key_pem.into());
        self
    }

    // -- distribution family -------------------------------------------------

    /// Create a distribution of the given kind.
    pub async fn create_distribution(
        &self,
        kind: DistributionKind,
        config: &DistributionConfig,
    ) -> Result<ApiResponse<Distribution>> {
        require(&config.caller_reference, "caller reference")?;

        let body = codec::encode_distribution_config(kind, config)?;
        let raw = self
            .send(Method::POST, kind.path_prefix(), None, Some(body))
            .await?;
        let value =
            codec::decode_distribution(kind, &raw.body).map_err(|e| e.with_status(raw.status))?;
        Ok(raw.wrap(value))
    }

    /// Fetch a distribution. The nested config carries no etag; fetch the
    /// config directly before mutating it.
    pub async fn get_distribution(
        &self,
        kind: DistributionKind,
        id: &str,
    ) -> Result<ApiResponse<Distribution>> {
        require(id, "distribution id")?;

        let raw = self
            .send(
                Method::GET,
                &format!("{}/{id}", kind.path_prefix()),
                None,
                None,
            )
            .await?;
        let value =
            codec::decode_distribution(kind, &raw.body).map_err(|e| e.with_status(raw.status))?;
        Ok(raw.wrap(value))
    }

    /// Fetch a distribution's config directly. The result carries the etag
    /// required for a subsequent update or delete.
    pub async fn get_distribution_config(
        &self,
        kind: DistributionKind,
        id: &str,
    ) -> Result<ApiResponse<DistributionConfig>> {
        require(id, "distribution id")?;

        let raw = self
            .send(
                Method::GET,
                &format!("{}/{id}/config", kind.path_prefix()),
                None,
                None,
            )
            .await?;
        let mut value = codec::decode_distribution_config(&raw.body)
            .map_err(|e| e.with_status(raw.status))?;
        value.etag = raw.etag.clone();
        Ok(raw.wrap(value))
    }

    /// Replace a distribution's config. The config must carry the etag of
    /// the version being replaced; its caller reference is reused verbatim.
    pub async fn update_distribution_config(
        &self,
        kind: DistributionKind,
        id: &str,
        config: &DistributionConfig,
    ) -> Result<ApiResponse<DistributionConfig>> {
        require(id, "distribution id")?;
        require(&config.caller_reference, "caller reference")?;
        let etag = config
            .etag
            .as_deref()
            .filter(|e| !e.is_empty())
            .ok_or_else(|| {
                Error::validation("config update requires the etag of a direct config fetch")
            })?;

        let body = codec::encode_distribution_config(kind, config)?;
        let raw = self
            .send(
                Method::PUT,
                &format!("{}/{id}/config", kind.path_prefix()),
                Some(etag),
                Some(body),
            )
            .await?;
        let mut value = codec::decode_distribution_config(&raw.body)
            .map_err(|e| e.with_status(raw.status))?;
        value.etag = raw.etag.clone();
        Ok(raw.wrap(value))
    }

    /// Delete a disabled distribution. `etag` is the token from the latest
    /// direct fetch.
    pub async fn delete_distribution(
        &self,
        kind: DistributionKind,
        id: &str,
        etag: &str,
    ) -> Result<ApiResponse<()>> {
        require(id, "distribution id")?;
        require(etag, "etag")?;

        let raw = self
            .send(
                Method::DELETE,
                &format!("{}/{id}", kind.path_prefix()),
                Some(etag),
                None,
            )
            .await?;
        Ok(raw.wrap(()))
    }

    /// List distributions of the given kind, one page per call.
    pub async fn list_distributions(
        &self,
        kind: DistributionKind,
        opts: ListOptions,
    ) -> Result<ApiResponse<ListPage<DistributionSummary>>> {
        let raw = self
            .send(Method::GET, &list_path(kind.path_prefix(), &opts), None, None)
            .await?;
        let value = codec::decode_distribution_list(kind, &raw.body)
            .map_err(|e| e.with_status(raw.status))?;
        Ok(raw.wrap(value))
    }

    // -- invalidations -------------------------------------------------------

    /// Submit an invalidation batch for the given paths.
    pub async fn create_invalidation(
        &self,
        distribution: &str,
        caller_reference: &str,
        paths: &[String],
    ) -> Result<ApiResponse<Invalidation>> {
        require(distribution, "distribution id")?;
        require(caller_reference, "caller reference")?;

        let body = codec::encode_invalidation_batch(caller_reference, paths)?;
        let raw = self
            .send(
                Method::POST,
                &format!("distribution/{distribution}/invalidation"),
                None,
                Some(body),
            )
            .await?;
        let value = codec::decode_invalidation(distribution, &raw.body)
            .map_err(|e| e.with_status(raw.status))?;
        Ok(raw.wrap(value))
    }

    /// Fetch one invalidation batch, including its paths.
    pub async fn get_invalidation(
        &self,
        distribution: &str,
        id: &str,
    ) -> Result<ApiResponse<Invalidation>> {
        require(distribution, "distribution id")?;
        require(id, "invalidation id")?;

        let raw = self
            .send(
                Method::GET,
                &format!("distribution/{distribution}/invalidation/{id}"),
                None,
                None,
            )
            .await?;
        let value = codec::decode_invalidation(distribution, &raw.body)
            .map_err(|e| e.with_status(raw.status))?;
        Ok(raw.wrap(value))
    }

    /// List a distribution's invalidation batches, one page per call. The
    /// entries are summaries: no create time, paths or caller reference.
    pub async fn list_invalidations(
        &self,
        distribution: &str,
        opts: ListOptions,
    ) -> Result<ApiResponse<ListPage<Invalidation>>> {
        require(distribution, "distribution id")?;

        let raw = self
            .send(
                Method::GET,
                &list_path(&format!("distribution/{distribution}/invalidation"), &opts),
                None,
                None,
            )
            .await?;
        let value = codec::decode_invalidation_list(distribution, &raw.body)
            .map_err(|e| e.with_status(raw.status))?;
        Ok(raw.wrap(value))
    }

    // -- origin access identities --------------------------------------------

    /// Create an origin access identity.
    pub async fn create_origin_access_identity(
        &self,
        caller_reference: &str,
        comment: &str,
    ) -> Result<ApiResponse<OriginAccessIdentity>> {
        require(caller_reference, "caller reference")?;

        let body = codec::encode_origin_access_identity_config(&OriginAccessIdentityConfig {
            caller_reference: caller_reference.to_string(),
            comment: comment.to_string(),
            etag: None,
        })?;
        let raw = self
            .send(Method::POST, constants::OAI_PATH, None, Some(body))
            .await?;
        let mut value = codec::decode_origin_access_identity(&raw.body)
            .map_err(|e| e.with_status(raw.status))?;
        value.etag = raw.etag.clone();
        Ok(raw.wrap(value))
    }

    /// Fetch an origin access identity. The result carries the etag
    /// required for update and delete.
    pub async fn get_origin_access_identity(
        &self,
        id: &str,
    ) -> Result<ApiResponse<OriginAccessIdentity>> {
        require(id, "origin access identity id")?;

        let raw = self
            .send(
                Method::GET,
                &format!("{}/{id}", constants::OAI_PATH),
                None,
                None,
            )
            .await?;
        let mut value = codec::decode_origin_access_identity(&raw.body)
            .map_err(|e| e.with_status(raw.status))?;
        value.etag = raw.etag.clone();
        Ok(raw.wrap(value))
    }

    /// Fetch an origin access identity's config half directly.
    pub async fn get_origin_access_identity_config(
        &self,
        id: &str,
    ) -> Result<ApiResponse<OriginAccessIdentityConfig>> {
        require(id, "origin access identity id")?;

        let raw = self
            .send(
                Method::GET,
                &format!("{}/{id}/config", constants::OAI_PATH),
                None,
                None,
            )
            .await?;
        let mut value = codec::decode_origin_access_identity_config(&raw.body)
            .map_err(|e| e.with_status(raw.status))?;
        value.etag = raw.etag.clone();
        Ok(raw.wrap(value))
    }

    /// Replace an origin access identity's config, e.g. to change its
    /// comment. The config must carry the etag of the version being
    /// replaced and reuses its caller reference verbatim.
    pub async fn update_origin_access_identity(
        &self,
        id: &str,
        config: &OriginAccessIdentityConfig,
    ) -> Result<ApiResponse<OriginAccessIdentityConfig>> {
        require(id, "origin access identity id")?;
        require(&config.caller_reference, "caller reference")?;
        let etag = config
            .etag
            .as_deref()
            .filter(|e| !e.is_empty())
            .ok_or_else(|| {
                Error::validation("config update requires the etag of a direct config fetch")
            })?;

        let body = codec::encode_origin_access_identity_config(config)?;
        let raw = self
            .send(
                Method::PUT,
                &format!("{}/{id}/config", constants::OAI_PATH),
                Some(etag),
                Some(body),
            )
            .await?;
        let mut value = codec::decode_origin_access_identity_config(&raw.body)
            .map_err(|e| e.with_status(raw.status))?;
        value.etag = raw.etag.clone();
        Ok(raw.wrap(value))
    }

    /// Delete an origin access identity.
    pub async fn delete_origin_access_identity(
        &self,
        id: &str,
        etag: &str,
    ) -> Result<ApiResponse<()>> {
        require(id, "origin access identity id")?;
        require(etag, "etag")?;

        let raw = self
            .send(
                Method::DELETE,
                &format!("{}/{id}", constants::OAI_PATH),
                Some(etag),
                None,
            )
            .await?;
        Ok(raw.wrap(()))
    }

    /// List origin access identities, one page per call.
    pub async fn list_origin_access_identities(
        &self,
        opts: ListOptions,
    ) -> Result<ApiResponse<ListPage<OriginAccessIdentitySummary>>> {
        let raw = self
            .send(Method::GET, &list_path(constants::OAI_PATH, &opts), None, None)
            .await?;
        let value = codec::decode_origin_access_identity_list(&raw.body)
            .map_err(|e| e.with_status(raw.status))?;
        Ok(raw.wrap(value))
    }

    // -- signed URLs ---------------------------------------------------------

    /// Mint a signed URL for restricted content. Purely local: no request
    /// is sent. Key material comes from the request or, failing that, from
    /// [`Client::with_key_pair`].
    pub fn signed_url(&self, req: &SignedUrlRequest) -> Result<String> {
        signed_url::sign_with(
            req,
            self.key_pair_id.as_deref(),
            self.private_key.as_deref(),
            time::now(),
        )
    }

    // -- plumbing ------------------------------------------------------------

    /// One signed request/response exchange. Never retries.
    async fn send(
        &self,
        method: Method,
        path: &str,
        if_match: Option<&str>,
        body: Option<String>,
    ) -> Result<RawResponse> {
        let uri = format!("https://{}/{}/{path}", self.endpoint, constants::API_VERSION);
        debug!("{method} {uri}");

        let mut builder = http::Request::builder().method(method).uri(&uri);
        if let Some(etag) = if_match {
            builder = builder.header(IF_MATCH, etag);
        }
        if body.is_some() {
            builder = builder.header(CONTENT_TYPE, "text/xml");
        }
        let req = builder.body(Bytes::from(body.unwrap_or_default().into_bytes()))?;

        let (mut parts, body) = req.into_parts();
        self.signer.sign(&mut parts)?;
        let req = http::Request::from_parts(parts, body);

        let resp = self.ctx.http_send(req).await?;
        let status = resp.status();
        let etag = header_string(resp.headers(), &ETAG);
        let request_id = header_string(resp.headers(), constants::X_AMZ_REQUEST_ID);

        if status == StatusCode::NO_CONTENT {
            return Ok(RawResponse {
                status,
                etag,
                request_id,
                body: String::new(),
            });
        }

        let body = String::from_utf8_lossy(resp.body()).into_owned();
        if !status.is_success() {
            return Err(codec::decode_error_response(status, &body));
        }

        Ok(RawResponse {
            status,
            etag,
            request_id,
            body,
        })
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("endpoint", &self.endpoint)
            .field("signer", &self.signer)
            .field("key_pair_id", &self.key_pair_id)
            .field("private_key", &self.private_key.as_deref().map(redact))
            .finish()
    }
}

/// A success response before decoding: status, envelope metadata, body.
struct RawResponse {
    status: StatusCode,
    etag: Option<String>,
    request_id: Option<String>,
    body: String,
}

impl RawResponse {
    fn wrap<T>(self, value: T) -> ApiResponse<T> {
        ApiResponse {
            value,
            etag: self.etag,
            request_id: self.request_id,
        }
    }
}

fn require(value: &str, what: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::validation(format!("{what} must not be empty")));
    }
    Ok(())
}

fn list_path(base: &str, opts: &ListOptions) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    if let Some(marker) = &opts.marker {
        serializer.append_pair("Marker", marker);
    }
    if let Some(max_items) = opts.max_items {
        serializer.append_pair("MaxItems", &max_items.to_string());
    }

    let query = serializer.finish();
    if query.is_empty() {
        base.to_string()
    } else {
        format!("{base}?{query}")
    }
}

fn header_string(headers: &HeaderMap, name: impl http::header::AsHeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_path() {
        let opts = ListOptions::default();
        assert_eq!(list_path("distribution", &opts), "distribution");

        let opts = ListOptions::default().with_marker("EDFDVBD6EXAMPLE");
        assert_eq!(
            list_path("streaming-distribution", &opts),
            "streaming-distribution?Marker=EDFDVBD6EXAMPLE"
        );

        let opts = ListOptions::default()
            .with_marker("a marker")
            .with_max_items(25);
        assert_eq!(
            list_path("distribution", &opts),
            "distribution?Marker=a+marker&MaxItems=25"
        );
    }

    #[test]
    fn test_kind_selects_path_prefix() {
        assert_eq!(DistributionKind::Web.path_prefix(), "distribution");
        assert_eq!(
            DistributionKind::Streaming.path_prefix(),
            "streaming-distribution"
        );
    }

    #[test]
    fn test_require() {
        assert!(require("x", "id").is_ok());
        let err = require("", "distribution id").unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Validation);
    }
}
