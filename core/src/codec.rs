//! XML codec between the domain model and the provider's wire schema.
//!
//! Only the current schema generation is spoken here: `Aliases`/`Origins`/
//! `CacheBehaviors` containers with a `Quantity` element and an `Items`
//! element holding the repeated children. Decoding normalizes the wire's
//! quirks so the model never sees them:
//!
//! - a repeated element always decodes to a `Vec`, even when only one
//!   child is present;
//! - when `Quantity` is `0` the collection decodes as empty no matter what
//!   an `Items` container claims;
//! - an absent `Items` with a nonzero `Quantity` is tolerated as empty;
//! - booleans are the literal strings `true`/`false`, nothing else.
//!
//! Optional model fields are omitted from encoded documents entirely; the
//! one protocol-mandated exception is an S3 origin's access identity,
//! which is written as an explicitly empty element when unset.

use http::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;

use crate::constants;
use crate::model::{
    ActiveSigner, CacheBehavior, Distribution, DistributionConfig, DistributionKind,
    DistributionSummary, Invalidation, ListPage, Logging, Origin, OriginAccessIdentity,
    OriginAccessIdentityConfig, OriginAccessIdentitySummary, OriginKind, TrustedSigners,
};
use crate::time;
use crate::{Error, Result};

const XML_DECL: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

/// Quantity-guarded collection read: `Quantity == 0` wins over whatever is
/// inside `Items`.
fn guarded<T>(quantity: usize, items: Option<Vec<T>>) -> Vec<T> {
    if quantity == 0 {
        Vec::new()
    } else {
        items.unwrap_or_default()
    }
}

fn none_if_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn oai_id_to_reference(id: &str) -> String {
    format!("{}{id}", constants::OAI_REFERENCE_PREFIX)
}

fn oai_reference_to_id(reference: &str) -> &str {
    reference
        .strip_prefix(constants::OAI_REFERENCE_PREFIX)
        .unwrap_or(reference)
}

fn from_xml<T: DeserializeOwned>(body: &str, what: &str) -> Result<T> {
    quick_xml::de::from_str(body)
        .map_err(|e| Error::protocol(format!("failed to decode {what} response")).with_source(e))
}

fn to_xml<T: Serialize>(root: &str, value: &T) -> Result<String> {
    let body = quick_xml::se::to_string_with_root(root, value)
        .map_err(|e| Error::protocol(format!("failed to serialize {root}")).with_source(e))?;
    Ok(format!("{XML_DECL}{body}"))
}

fn require_id(id: String, what: &str) -> Result<String> {
    if id.is_empty() {
        return Err(Error::protocol(format!("{what} response carries no Id")));
    }
    Ok(id)
}

// ---------------------------------------------------------------------------
// Wire shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct DistributionConfigXml {
    #[serde(rename = "@xmlns", skip_serializing_if = "Option::is_none")]
    xmlns: Option<String>,
    caller_reference: String,
    aliases: AliasesXml,
    #[serde(skip_serializing_if = "Option::is_none")]
    default_root_object: Option<String>,
    origins: OriginsXml,
    default_cache_behavior: CacheBehaviorXml,
    cache_behaviors: CacheBehaviorsXml,
    comment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    logging: Option<LoggingXml>,
    enabled: bool,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct AliasesXml {
    quantity: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    items: Option<AliasItemsXml>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct AliasItemsXml {
    #[serde(rename = "CNAME")]
    cname: Vec<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct OriginsXml {
    quantity: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    items: Option<OriginItemsXml>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct OriginItemsXml {
    origin: Vec<OriginXml>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct OriginXml {
    id: String,
    domain_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    s3_origin_config: Option<S3OriginConfigXml>,
    #[serde(skip_serializing_if = "Option::is_none")]
    custom_origin_config: Option<CustomOriginConfigXml>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct S3OriginConfigXml {
    origin_access_identity: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct CustomOriginConfigXml {
    #[serde(rename = "HTTPPort")]
    http_port: u16,
    #[serde(rename = "HTTPSPort")]
    https_port: u16,
    origin_protocol_policy: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct CacheBehaviorXml {
    #[serde(skip_serializing_if = "Option::is_none")]
    path_pattern: Option<String>,
    target_origin_id: String,
    forwarded_values: ForwardedValuesXml,
    trusted_signers: TrustedSignersXml,
    viewer_protocol_policy: String,
    #[serde(rename = "MinTTL")]
    min_ttl: u64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct ForwardedValuesXml {
    query_string: bool,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct TrustedSignersXml {
    enabled: bool,
    quantity: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    items: Option<TrustedSignerItemsXml>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct TrustedSignerItemsXml {
    aws_account_number: Vec<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct CacheBehaviorsXml {
    quantity: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    items: Option<CacheBehaviorItemsXml>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct CacheBehaviorItemsXml {
    cache_behavior: Vec<CacheBehaviorXml>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct LoggingXml {
    enabled: bool,
    bucket: String,
    prefix: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct DistributionXml {
    id: String,
    status: String,
    last_modified_time: Option<String>,
    in_progress_invalidation_batches: Option<u64>,
    domain_name: String,
    active_trusted_signers: ActiveTrustedSignersXml,
    #[serde(alias = "StreamingDistributionConfig")]
    distribution_config: DistributionConfigXml,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct ActiveTrustedSignersXml {
    quantity: usize,
    items: Option<SignerItemsXml>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct SignerItemsXml {
    signer: Vec<SignerXml>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct SignerXml {
    aws_account_number: Option<String>,
    key_pair_ids: KeyPairIdsXml,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct KeyPairIdsXml {
    quantity: usize,
    items: Option<KeyPairIdItemsXml>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct KeyPairIdItemsXml {
    key_pair_id: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct DistributionListXml {
    marker: Option<String>,
    next_marker: Option<String>,
    max_items: Option<u32>,
    is_truncated: bool,
    items: Option<DistributionSummaryItemsXml>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct DistributionSummaryItemsXml {
    #[serde(
        rename = "DistributionSummary",
        alias = "StreamingDistributionSummary"
    )]
    distribution_summary: Vec<DistributionSummaryXml>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct DistributionSummaryXml {
    id: String,
    status: String,
    last_modified_time: Option<String>,
    domain_name: String,
    aliases: AliasesXml,
    origins: OriginsXml,
    comment: String,
    enabled: bool,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct InvalidationBatchXml {
    #[serde(rename = "@xmlns", skip_serializing_if = "Option::is_none")]
    xmlns: Option<String>,
    paths: PathsXml,
    caller_reference: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct PathsXml {
    quantity: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    items: Option<PathItemsXml>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct PathItemsXml {
    path: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct InvalidationXml {
    id: String,
    status: String,
    create_time: Option<String>,
    invalidation_batch: Option<InvalidationBatchXml>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct InvalidationListXml {
    marker: Option<String>,
    next_marker: Option<String>,
    max_items: Option<u32>,
    is_truncated: bool,
    items: Option<InvalidationSummaryItemsXml>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct InvalidationSummaryItemsXml {
    invalidation_summary: Vec<InvalidationSummaryXml>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct InvalidationSummaryXml {
    id: String,
    status: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct OriginAccessIdentityConfigXml {
    #[serde(rename = "@xmlns", skip_serializing_if = "Option::is_none")]
    xmlns: Option<String>,
    caller_reference: String,
    comment: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct OriginAccessIdentityXml {
    id: String,
    #[serde(rename = "S3CanonicalUserId")]
    s3_canonical_user_id: String,
    #[serde(rename = "CloudFrontOriginAccessIdentityConfig")]
    config: OriginAccessIdentityConfigXml,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct OriginAccessIdentityListXml {
    marker: Option<String>,
    next_marker: Option<String>,
    max_items: Option<u32>,
    is_truncated: bool,
    items: Option<OriginAccessIdentitySummaryItemsXml>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct OriginAccessIdentitySummaryItemsXml {
    #[serde(rename = "CloudFrontOriginAccessIdentitySummary")]
    summary: Vec<OriginAccessIdentitySummaryXml>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct OriginAccessIdentitySummaryXml {
    id: String,
    #[serde(rename = "S3CanonicalUserId")]
    s3_canonical_user_id: String,
    comment: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct ErrorResponseXml {
    error: Option<ErrorDetailXml>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct ErrorDetailXml {
    code: Option<String>,
    message: Option<String>,
}

// ---------------------------------------------------------------------------
// Wire <-> domain conversion
// ---------------------------------------------------------------------------

impl AliasesXml {
    fn from_domain(aliases: &[String]) -> Self {
        Self {
            quantity: aliases.len(),
            items: (!aliases.is_empty()).then(|| AliasItemsXml {
                cname: aliases.to_vec(),
            }),
        }
    }

    fn into_domain(self) -> Vec<String> {
        guarded(self.quantity, self.items.map(|i| i.cname))
    }
}

impl OriginsXml {
    fn from_domain(origins: &[Origin]) -> Self {
        Self {
            quantity: origins.len(),
            items: (!origins.is_empty()).then(|| OriginItemsXml {
                origin: origins.iter().map(OriginXml::from_domain).collect(),
            }),
        }
    }

    fn into_domain(self) -> Vec<Origin> {
        guarded(self.quantity, self.items.map(|i| i.origin))
            .into_iter()
            .map(OriginXml::into_domain)
            .collect()
    }
}

impl OriginXml {
    fn from_domain(origin: &Origin) -> Self {
        let (s3, custom) = match &origin.kind {
            OriginKind::S3 {
                origin_access_identity,
            } => (
                Some(S3OriginConfigXml {
                    // Unset is an explicitly empty element, not an omitted
                    // one.
                    origin_access_identity: origin_access_identity
                        .as_deref()
                        .map(oai_id_to_reference)
                        .unwrap_or_default(),
                }),
                None,
            ),
            OriginKind::Custom {
                http_port,
                https_port,
                protocol_policy,
            } => (
                None,
                Some(CustomOriginConfigXml {
                    http_port: *http_port,
                    https_port: *https_port,
                    origin_protocol_policy: protocol_policy.clone(),
                }),
            ),
        };

        Self {
            id: origin.id.clone(),
            domain_name: origin.domain_name.clone(),
            s3_origin_config: s3,
            custom_origin_config: custom,
        }
    }

    fn into_domain(self) -> Origin {
        let kind = if let Some(custom) = self.custom_origin_config {
            OriginKind::Custom {
                http_port: custom.http_port,
                https_port: custom.https_port,
                protocol_policy: custom.origin_protocol_policy,
            }
        } else {
            OriginKind::S3 {
                origin_access_identity: self.s3_origin_config.and_then(|s3| {
                    none_if_empty(Some(s3.origin_access_identity))
                        .map(|r| oai_reference_to_id(&r).to_string())
                }),
            }
        };

        Origin {
            id: self.id,
            domain_name: self.domain_name,
            kind,
        }
    }
}

impl CacheBehaviorXml {
    fn from_domain(behavior: &CacheBehavior) -> Self {
        Self {
            path_pattern: behavior.path_pattern.clone(),
            target_origin_id: behavior.target_origin_id.clone(),
            forwarded_values: ForwardedValuesXml {
                query_string: behavior.forward_query_string,
            },
            trusted_signers: TrustedSignersXml {
                enabled: behavior.trusted_signers.enabled,
                quantity: behavior.trusted_signers.aws_account_numbers.len(),
                items: (!behavior.trusted_signers.aws_account_numbers.is_empty()).then(|| {
                    TrustedSignerItemsXml {
                        aws_account_number: behavior.trusted_signers.aws_account_numbers.clone(),
                    }
                }),
            },
            viewer_protocol_policy: behavior.viewer_protocol_policy.clone(),
            min_ttl: behavior.min_ttl,
        }
    }

    fn into_domain(self) -> CacheBehavior {
        CacheBehavior {
            path_pattern: none_if_empty(self.path_pattern),
            target_origin_id: self.target_origin_id,
            forward_query_string: self.forwarded_values.query_string,
            trusted_signers: TrustedSigners {
                enabled: self.trusted_signers.enabled,
                aws_account_numbers: guarded(
                    self.trusted_signers.quantity,
                    self.trusted_signers.items.map(|i| i.aws_account_number),
                ),
            },
            viewer_protocol_policy: self.viewer_protocol_policy,
            min_ttl: self.min_ttl,
        }
    }
}

impl DistributionConfigXml {
    fn from_domain(config: &DistributionConfig) -> Self {
        Self {
            xmlns: Some(constants::xmlns()),
            caller_reference: config.caller_reference.clone(),
            aliases: AliasesXml::from_domain(&config.aliases),
            default_root_object: config.default_root_object.clone(),
            origins: OriginsXml::from_domain(&config.origins),
            default_cache_behavior: CacheBehaviorXml::from_domain(&config.default_cache_behavior),
            cache_behaviors: CacheBehaviorsXml {
                quantity: config.cache_behaviors.len(),
                items: (!config.cache_behaviors.is_empty()).then(|| CacheBehaviorItemsXml {
                    cache_behavior: config
                        .cache_behaviors
                        .iter()
                        .map(CacheBehaviorXml::from_domain)
                        .collect(),
                }),
            },
            comment: config.comment.clone(),
            logging: config.logging.as_ref().map(|l| LoggingXml {
                enabled: l.enabled,
                bucket: l.bucket.clone(),
                prefix: l.prefix.clone(),
            }),
            enabled: config.enabled,
        }
    }

    fn into_domain(self) -> DistributionConfig {
        DistributionConfig {
            caller_reference: self.caller_reference,
            aliases: self.aliases.into_domain(),
            default_root_object: none_if_empty(self.default_root_object),
            origins: self.origins.into_domain(),
            default_cache_behavior: self.default_cache_behavior.into_domain(),
            cache_behaviors: guarded(
                self.cache_behaviors.quantity,
                self.cache_behaviors.items.map(|i| i.cache_behavior),
            )
            .into_iter()
            .map(CacheBehaviorXml::into_domain)
            .collect(),
            comment: self.comment,
            logging: self.logging.map(|l| Logging {
                enabled: l.enabled,
                bucket: l.bucket,
                prefix: l.prefix,
            }),
            enabled: self.enabled,
            etag: None,
        }
    }
}

impl ActiveTrustedSignersXml {
    fn into_domain(self) -> Vec<ActiveSigner> {
        guarded(self.quantity, self.items.map(|i| i.signer))
            .into_iter()
            .map(|s| ActiveSigner {
                // A signer element without an account number is the owning
                // account.
                aws_account_number: s
                    .aws_account_number
                    .unwrap_or_else(|| "self".to_string()),
                key_pair_ids: guarded(
                    s.key_pair_ids.quantity,
                    s.key_pair_ids.items.map(|i| i.key_pair_id),
                ),
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

pub(crate) fn encode_distribution_config(
    kind: DistributionKind,
    config: &DistributionConfig,
) -> Result<String> {
    to_xml(
        kind.config_root(),
        &DistributionConfigXml::from_domain(config),
    )
}

pub(crate) fn encode_invalidation_batch(
    caller_reference: &str,
    paths: &[String],
) -> Result<String> {
    to_xml(
        "InvalidationBatch",
        &InvalidationBatchXml {
            xmlns: Some(constants::xmlns()),
            paths: PathsXml {
                quantity: paths.len(),
                items: (!paths.is_empty()).then(|| PathItemsXml {
                    path: paths.to_vec(),
                }),
            },
            caller_reference: caller_reference.to_string(),
        },
    )
}

pub(crate) fn encode_origin_access_identity_config(
    config: &OriginAccessIdentityConfig,
) -> Result<String> {
    to_xml(
        "CloudFrontOriginAccessIdentityConfig",
        &OriginAccessIdentityConfigXml {
            xmlns: Some(constants::xmlns()),
            caller_reference: config.caller_reference.clone(),
            comment: config.comment.clone(),
        },
    )
}

pub(crate) fn decode_distribution(kind: DistributionKind, body: &str) -> Result<Distribution> {
    let xml: DistributionXml = from_xml(body, kind.path_prefix())?;
    Ok(Distribution {
        kind,
        id: require_id(xml.id, kind.path_prefix())?,
        status: xml.status,
        last_modified: xml
            .last_modified_time
            .as_deref()
            .and_then(|s| time::parse_iso8601(s).ok()),
        domain_name: xml.domain_name,
        in_progress_invalidation_batches: xml.in_progress_invalidation_batches.unwrap_or(0),
        active_trusted_signers: xml.active_trusted_signers.into_domain(),
        config: xml.distribution_config.into_domain(),
    })
}

pub(crate) fn decode_distribution_config(body: &str) -> Result<DistributionConfig> {
    let xml: DistributionConfigXml = from_xml(body, "distribution config")?;
    Ok(xml.into_domain())
}

pub(crate) fn decode_distribution_list(
    kind: DistributionKind,
    body: &str,
) -> Result<ListPage<DistributionSummary>> {
    let xml: DistributionListXml = from_xml(body, "distribution list")?;
    let items = xml
        .items
        .map(|i| i.distribution_summary)
        .unwrap_or_default()
        .into_iter()
        .map(|s| {
            Ok(DistributionSummary {
                kind,
                id: require_id(s.id, "distribution summary")?,
                status: s.status,
                last_modified: s
                    .last_modified_time
                    .as_deref()
                    .and_then(|t| time::parse_iso8601(t).ok()),
                domain_name: s.domain_name,
                aliases: s.aliases.into_domain(),
                origins: s.origins.into_domain(),
                comment: s.comment,
                enabled: s.enabled,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ListPage {
        items,
        is_truncated: xml.is_truncated,
        marker: none_if_empty(xml.marker),
        next_marker: none_if_empty(xml.next_marker),
        max_items: xml.max_items,
    })
}

pub(crate) fn decode_invalidation(distribution: &str, body: &str) -> Result<Invalidation> {
    let xml: InvalidationXml = from_xml(body, "invalidation")?;
    let (create_time, paths, caller_reference) = match xml.invalidation_batch {
        Some(batch) => (
            xml.create_time
                .as_deref()
                .and_then(|s| time::parse_iso8601(s).ok()),
            guarded(batch.paths.quantity, batch.paths.items.map(|i| i.path)),
            Some(batch.caller_reference),
        ),
        None => (None, Vec::new(), None),
    };

    Ok(Invalidation {
        distribution: distribution.to_string(),
        id: require_id(xml.id, "invalidation")?,
        status: xml.status,
        create_time,
        paths,
        caller_reference,
    })
}

pub(crate) fn decode_invalidation_list(
    distribution: &str,
    body: &str,
) -> Result<ListPage<Invalidation>> {
    let xml: InvalidationListXml = from_xml(body, "invalidation list")?;
    let items = xml
        .items
        .map(|i| i.invalidation_summary)
        .unwrap_or_default()
        .into_iter()
        .map(|s| {
            Ok(Invalidation {
                distribution: distribution.to_string(),
                id: require_id(s.id, "invalidation summary")?,
                status: s.status,
                create_time: None,
                paths: Vec::new(),
                caller_reference: None,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ListPage {
        items,
        is_truncated: xml.is_truncated,
        marker: none_if_empty(xml.marker),
        next_marker: none_if_empty(xml.next_marker),
        max_items: xml.max_items,
    })
}

pub(crate) fn decode_origin_access_identity(body: &str) -> Result<OriginAccessIdentity> {
    let xml: OriginAccessIdentityXml = from_xml(body, "origin access identity")?;
    Ok(OriginAccessIdentity {
        id: require_id(xml.id, "origin access identity")?,
        s3_canonical_user_id: xml.s3_canonical_user_id,
        comment: xml.config.comment,
        caller_reference: xml.config.caller_reference,
        etag: None,
    })
}

pub(crate) fn decode_origin_access_identity_config(
    body: &str,
) -> Result<OriginAccessIdentityConfig> {
    let xml: OriginAccessIdentityConfigXml = from_xml(body, "origin access identity config")?;
    Ok(OriginAccessIdentityConfig {
        caller_reference: xml.caller_reference,
        comment: xml.comment,
        etag: None,
    })
}

pub(crate) fn decode_origin_access_identity_list(
    body: &str,
) -> Result<ListPage<OriginAccessIdentitySummary>> {
    let xml: OriginAccessIdentityListXml = from_xml(body, "origin access identity list")?;
    let items = xml
        .items
        .map(|i| i.summary)
        .unwrap_or_default()
        .into_iter()
        .map(|s| {
            Ok(OriginAccessIdentitySummary {
                id: require_id(s.id, "origin access identity summary")?,
                s3_canonical_user_id: s.s3_canonical_user_id,
                comment: s.comment,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ListPage {
        items,
        is_truncated: xml.is_truncated,
        marker: none_if_empty(xml.marker),
        next_marker: none_if_empty(xml.next_marker),
        max_items: xml.max_items,
    })
}

/// Map a non-2xx exchange to an error: a parseable error document becomes a
/// provider error carrying its code; anything else is a protocol error.
pub(crate) fn decode_error_response(status: StatusCode, body: &str) -> Error {
    if let Ok(ErrorResponseXml {
        error:
            Some(ErrorDetailXml {
                code: Some(code),
                message,
            }),
    }) = quick_xml::de::from_str::<ErrorResponseXml>(body)
    {
        return Error::provider(status, code, message.unwrap_or_default());
    }

    Error::protocol(format!("service returned status {status}")).with_status(status)
}
