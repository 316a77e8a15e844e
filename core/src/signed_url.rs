//! Signed URLs for restricted content delivery.
//!
//! Two policy modes exist. A canned policy covers the common case of "this
//! resource, until this time" and keeps the query string short; the service
//! reconstructs the policy from the `Expires` parameter, so the JSON
//! written here must match that reconstruction byte for byte. A custom
//! policy is used as soon as any further condition (source address,
//! not-before time) is requested and travels in full inside the `Policy`
//! parameter.

use std::fmt::{Debug, Formatter};

use log::debug;
use serde::Serialize;

use crate::credential::redact;
use crate::hash::{base64_cloudfront, rsa_private_key_from_pem, rsa_sha1_sign};
use crate::time::DateTime;
use crate::{Error, Result};

/// When a signed URL stops (or, for `become_available`, starts) being
/// honored.
#[derive(Debug, Clone, Copy)]
pub enum Expires {
    /// Epoch seconds. A value of 86400 or less is treated as a relative
    /// offset from the time of signing rather than an absolute instant.
    Epoch(i64),
    /// An absolute instant.
    At(DateTime),
}

impl From<i64> for Expires {
    fn from(value: i64) -> Self {
        Expires::Epoch(value)
    }
}

impl From<DateTime> for Expires {
    fn from(value: DateTime) -> Self {
        Expires::At(value)
    }
}

impl Expires {
    fn resolve(self, now: DateTime) -> i64 {
        match self {
            Expires::Epoch(v) if v <= 86400 => round_to_second(now) + v,
            Expires::Epoch(v) => v,
            Expires::At(t) => t.timestamp(),
        }
    }
}

fn round_to_second(t: DateTime) -> i64 {
    (t.timestamp_millis() + 500).div_euclid(1000)
}

/// Everything a signed URL can be built from.
///
/// The target is either `url` or the `hostname`/`path` pair; `expires` is
/// always required. Key material falls back to the client's defaults when
/// not set here. There are no positional shortcuts: every option is a
/// named field.
#[derive(Clone)]
pub struct SignedUrlRequest {
    hostname: Option<String>,
    path: Option<String>,
    url: Option<String>,
    expires: Expires,
    secure: bool,
    streaming: Option<bool>,
    ip: Option<String>,
    become_available: Option<Expires>,
    key_pair_id: Option<String>,
    private_key: Option<String>,
}

impl SignedUrlRequest {
    /// Start a request expiring at `expires`.
    pub fn new(expires: impl Into<Expires>) -> Self {
        Self {
            hostname: None,
            path: None,
            url: None,
            expires: expires.into(),
            secure: true,
            streaming: None,
            ip: None,
            become_available: None,
            key_pair_id: None,
            private_key: None,
        }
    }

    /// Set the distribution hostname.
    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    /// Set the resource path below the hostname.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Set the full target URL instead of `hostname` + `path`.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Choose `https` (default) or `http` for the signed resource.
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Force streaming (RTMP) or web treatment instead of detecting it
    /// from the hostname.
    pub fn with_streaming(mut self, streaming: bool) -> Self {
        self.streaming = Some(streaming);
        self
    }

    /// Restrict the URL to requests from this source address or CIDR
    /// range. Switches to a custom policy.
    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }

    /// Make the URL valid only from the given time on. Switches to a
    /// custom policy.
    pub fn with_become_available(mut self, at: impl Into<Expires>) -> Self {
        self.become_available = Some(at.into());
        self
    }

    /// Override the signing key pair for this URL only.
    pub fn with_key_pair(
        mut self,
        key_pair_id: impl Into<String>,
        private_key_pem: impl Into<String>,
    ) -> Self {
        self.key_pair_id = Some(key_pair_id.into());
        self.private_key = Some(private_key_pem.into());
        self
    }

    fn location(&self) -> Result<(String, String, String)> {
        if let Some(url) = &self.url {
            let uri: http::Uri = url.parse()?;
            let scheme = uri.scheme_str().unwrap_or("https").to_string();
            let hostname = uri
                .host()
                .ok_or_else(|| Error::validation("signed URL target has no hostname"))?
                .to_string();
            let path = uri
                .path_and_query()
                .map(|p| p.to_string())
                .unwrap_or_else(|| "/".to_string());
            return Ok((scheme, hostname, path));
        }

        let hostname = self
            .hostname
            .clone()
            .ok_or_else(|| Error::validation("signed URL requires a hostname"))?;
        let path = self
            .path
            .clone()
            .ok_or_else(|| Error::validation("signed URL requires a path"))?;
        let path = if path.starts_with('/') {
            path
        } else {
            format!("/{path}")
        };
        let scheme = if self.secure { "https" } else { "http" };
        Ok((scheme.to_string(), hostname, path))
    }
}

impl Debug for SignedUrlRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignedUrlRequest")
            .field("hostname", &self.hostname)
            .field("path", &self.path)
            .field("url", &self.url)
            .field("expires", &self.expires)
            .field("secure", &self.secure)
            .field("streaming", &self.streaming)
            .field("ip", &self.ip)
            .field("become_available", &self.become_available)
            .field("key_pair_id", &self.key_pair_id)
            .field(
                "private_key",
                &self.private_key.as_deref().map(redact),
            )
            .finish()
    }
}

/// A hostname allocated under `cloudfront.net` belongs to a streaming
/// distribution iff it starts with `s`. Observed behavior, not a
/// documented rule; callers that know better set `streaming` explicitly.
fn is_streaming_hostname(hostname: &str) -> bool {
    hostname.ends_with(".cloudfront.net") && hostname.starts_with('s')
}

#[derive(Serialize)]
struct PolicyDocument {
    #[serde(rename = "Statement")]
    statement: [PolicyStatement; 1],
}

#[derive(Serialize)]
struct PolicyStatement {
    #[serde(rename = "Resource")]
    resource: String,
    #[serde(rename = "Condition")]
    condition: PolicyCondition,
}

#[derive(Serialize)]
struct PolicyCondition {
    #[serde(rename = "IpAddress", skip_serializing_if = "Option::is_none")]
    ip_address: Option<IpAddressCondition>,
    #[serde(rename = "DateGreaterThan", skip_serializing_if = "Option::is_none")]
    date_greater_than: Option<EpochTimeCondition>,
    #[serde(rename = "DateLessThan")]
    date_less_than: EpochTimeCondition,
}

#[derive(Serialize)]
struct IpAddressCondition {
    #[serde(rename = "AWS:SourceIp")]
    source_ip: String,
}

#[derive(Serialize)]
struct EpochTimeCondition {
    #[serde(rename = "AWS:EpochTime")]
    epoch_time: i64,
}

/// Build the signed URL. All validation happens before any key material is
/// touched.
pub(crate) fn sign_with(
    req: &SignedUrlRequest,
    default_key_pair_id: Option<&str>,
    default_private_key: Option<&str>,
    now: DateTime,
) -> Result<String> {
    let key_pair_id = req
        .key_pair_id
        .as_deref()
        .or(default_key_pair_id)
        .ok_or_else(|| Error::validation("signed URL requires a key pair id"))?;
    let private_key_pem = req
        .private_key
        .as_deref()
        .or(default_private_key)
        .ok_or_else(|| Error::validation("signed URL requires an RSA private key"))?;

    let (scheme, hostname, path) = req.location()?;
    let streaming = req
        .streaming
        .unwrap_or_else(|| is_streaming_hostname(&hostname));

    // Streaming players carry the hostname out of band, so only the bare
    // path is signed; web URLs sign the full location.
    let resource = if streaming {
        path.trim_start_matches('/').to_string()
    } else {
        format!("{scheme}://{hostname}{path}")
    };

    let expires = req.expires.resolve(now);
    let condition = PolicyCondition {
        ip_address: req
            .ip
            .clone()
            .map(|source_ip| IpAddressCondition { source_ip }),
        date_greater_than: req
            .become_available
            .map(|t| EpochTimeCondition {
                epoch_time: t.resolve(now),
            }),
        date_less_than: EpochTimeCondition {
            epoch_time: expires,
        },
    };
    let custom = condition.ip_address.is_some() || condition.date_greater_than.is_some();

    // The signed bytes are exactly what is transmitted; nothing may be
    // reformatted after this point.
    let policy = serde_json::to_string(&PolicyDocument {
        statement: [PolicyStatement {
            resource: resource.clone(),
            condition,
        }],
    })
    .map_err(|e| Error::validation("failed to serialize signed URL policy").with_source(e))?;
    debug!("policy to sign: {}", &policy);

    let key = rsa_private_key_from_pem(private_key_pem)?;
    let signature = base64_cloudfront(&rsa_sha1_sign(&key, policy.as_bytes())?);

    let mut query = String::new();
    if custom {
        query.push_str("Policy=");
        query.push_str(&base64_cloudfront(policy.as_bytes()));
    } else {
        query.push_str("Expires=");
        query.push_str(&expires.to_string());
    }
    query.push_str("&Signature=");
    query.push_str(&signature);
    query.push_str("&Key-Pair-Id=");
    query.push_str(key_pair_id);

    let sep = if resource.contains('?') { '&' } else { '?' };
    Ok(format!("{resource}{sep}{query}"))
}
