//! End-to-end client scenarios against a scripted transport.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use cfdist_core::{
    Client, Context, Credential, DistributionKind, ErrorKind, HttpSend, ListOptions,
    OriginAccessIdentityConfig, Result, SignedUrlRequest,
};

/// A transport that replays scripted responses and records every request
/// it sees.
#[derive(Debug, Clone, Default)]
struct ScriptedHttpSend {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    responses: Mutex<VecDeque<ScriptedResponse>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

#[derive(Debug)]
struct ScriptedResponse {
    status: u16,
    headers: Vec<(String, String)>,
    body: String,
}

#[derive(Debug)]
struct RecordedRequest {
    method: String,
    uri: String,
    headers: Vec<(String, String)>,
    body: String,
}

impl RecordedRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

impl ScriptedHttpSend {
    fn respond(self, status: u16, headers: &[(&str, &str)], body: &str) -> Self {
        self.inner
            .responses
            .lock()
            .unwrap()
            .push_back(ScriptedResponse {
                status,
                headers: headers
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                body: body.to_string(),
            });
        self
    }

    fn requests(&self) -> Vec<RecordedRequest> {
        std::mem::take(&mut *self.inner.requests.lock().unwrap())
    }
}

#[async_trait::async_trait]
impl HttpSend for ScriptedHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let (parts, body) = req.into_parts();
        self.inner.requests.lock().unwrap().push(RecordedRequest {
            method: parts.method.to_string(),
            uri: parts.uri.to_string(),
            headers: parts
                .headers
                .iter()
                .map(|(k, v)| {
                    (
                        k.as_str().to_string(),
                        v.to_str().unwrap_or_default().to_string(),
                    )
                })
                .collect(),
            body: String::from_utf8_lossy(&body).into_owned(),
        });

        let scripted = self
            .inner
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| cfdist_core::Error::transport("no scripted response left"))?;

        let mut builder = http::Response::builder().status(scripted.status);
        for (k, v) in &scripted.headers {
            builder = builder.header(k.as_str(), v.as_str());
        }
        Ok(builder
            .body(Bytes::from(scripted.body))
            .expect("scripted response must build"))
    }
}

fn client_with(mock: &ScriptedHttpSend) -> Client {
    let ctx = Context::new().with_http_send(mock.clone());
    Client::new(ctx, Credential::new("access_key", "secret"))
}

const INVALIDATION_CREATED: &str = r#"<Invalidation xmlns="http://cloudfront.amazonaws.com/doc/2012-05-05/">
    <Id>IXXXX</Id>
    <Status>InProgress</Status>
    <CreateTime>2024-06-01T00:00:00Z</CreateTime>
    <InvalidationBatch>
        <Paths><Quantity>2</Quantity><Items><Path>/a.jpg</Path><Path>/b.jpg</Path></Items></Paths>
        <CallerReference>ref-1</CallerReference>
    </InvalidationBatch>
</Invalidation>"#;

#[tokio::test]
async fn test_create_invalidation_end_to_end() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mock = ScriptedHttpSend::default().respond(
        201,
        &[("x-amz-request-id", "req-0001")],
        INVALIDATION_CREATED,
    );
    let client = client_with(&mock);

    let created = client
        .create_invalidation(
            "DISTID",
            "ref-1",
            &["/a.jpg".to_string(), "/b.jpg".to_string()],
        )
        .await
        .unwrap();

    assert_eq!(created.value.id, "IXXXX");
    assert_eq!(created.value.status, "InProgress");
    assert_eq!(created.value.distribution, "DISTID");
    assert_eq!(
        created.value.paths,
        vec!["/a.jpg".to_string(), "/b.jpg".to_string()]
    );
    assert_eq!(created.request_id.as_deref(), Some("req-0001"));

    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    let req = &requests[0];
    assert_eq!(req.method, "POST");
    assert_eq!(
        req.uri,
        "https://cloudfront.amazonaws.com/2012-05-05/distribution/DISTID/invalidation"
    );
    assert_eq!(req.header("content-type"), Some("text/xml"));
    assert!(req.header("date").is_some());
    assert!(req.header("authorization").unwrap().starts_with("AWS access_key:"));

    // The serialized batch carries the quantity and the ordered paths.
    assert!(req.body.contains("<Paths><Quantity>2</Quantity>"));
    assert!(req.body.contains("<Path>/a.jpg</Path><Path>/b.jpg</Path>"));
    assert!(req.body.contains("<CallerReference>ref-1</CallerReference>"));
}

#[tokio::test]
async fn test_update_without_etag_fails_before_sending() {
    let mock = ScriptedHttpSend::default();
    let client = client_with(&mock);

    let config = cfdist_core::DistributionConfig {
        caller_reference: "ref-2012".to_string(),
        ..Default::default()
    };
    let err = client
        .update_distribution_config(DistributionKind::Web, "DISTID", &config)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_provider_error_mapping() {
    let mock = ScriptedHttpSend::default().respond(
        403,
        &[],
        r#"<ErrorResponse><Error><Code>AccessDenied</Code><Message>Access denied.</Message></Error></ErrorResponse>"#,
    );
    let client = client_with(&mock);

    let err = client
        .get_distribution(DistributionKind::Web, "DISTID")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Provider);
    assert_eq!(err.code(), Some("AccessDenied"));
    assert_eq!(err.http_status().map(|s| s.as_u16()), Some(403));
}

#[tokio::test]
async fn test_garbage_success_body_is_protocol_error() {
    let mock = ScriptedHttpSend::default().respond(200, &[], "surprise, not xml <");
    let client = client_with(&mock);

    let err = client
        .get_distribution(DistributionKind::Web, "DISTID")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Protocol);
    assert_eq!(err.http_status().map(|s| s.as_u16()), Some(200));
}

#[tokio::test]
async fn test_delete_uses_if_match_and_accepts_no_content() {
    let mock = ScriptedHttpSend::default()
        .respond(204, &[], "")
        .respond(204, &[], "");
    let client = client_with(&mock);

    client
        .delete_distribution(DistributionKind::Web, "DISTID", "E2QWRUHAPOMQZL")
        .await
        .unwrap();
    client
        .delete_distribution(DistributionKind::Streaming, "SGTD6EXAMPLE", "E3XAMPLE")
        .await
        .unwrap();

    let requests = mock.requests();
    assert_eq!(requests[0].method, "DELETE");
    assert_eq!(
        requests[0].uri,
        "https://cloudfront.amazonaws.com/2012-05-05/distribution/DISTID"
    );
    assert_eq!(requests[0].header("if-match"), Some("E2QWRUHAPOMQZL"));
    assert_eq!(
        requests[1].uri,
        "https://cloudfront.amazonaws.com/2012-05-05/streaming-distribution/SGTD6EXAMPLE"
    );

    // Deleting without an etag never reaches the wire.
    let err = client
        .delete_distribution(DistributionKind::Web, "DISTID", "")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(mock.requests().is_empty());
}

const CONFIG_BODY: &str = r#"<DistributionConfig xmlns="http://cloudfront.amazonaws.com/doc/2012-05-05/">
    <CallerReference>ref-2012</CallerReference>
    <Aliases><Quantity>0</Quantity></Aliases>
    <Origins>
        <Quantity>1</Quantity>
        <Items>
            <Origin>
                <Id>assets</Id>
                <DomainName>assets.s3.amazonaws.com</DomainName>
                <S3OriginConfig><OriginAccessIdentity/></S3OriginConfig>
            </Origin>
        </Items>
    </Origins>
    <DefaultCacheBehavior>
        <TargetOriginId>assets</TargetOriginId>
        <ForwardedValues><QueryString>false</QueryString></ForwardedValues>
        <TrustedSigners><Enabled>false</Enabled><Quantity>0</Quantity></TrustedSigners>
        <ViewerProtocolPolicy>allow-all</ViewerProtocolPolicy>
        <MinTTL>0</MinTTL>
    </DefaultCacheBehavior>
    <CacheBehaviors><Quantity>0</Quantity></CacheBehaviors>
    <Comment>example</Comment>
    <Enabled>true</Enabled>
</DistributionConfig>"#;

#[tokio::test]
async fn test_direct_config_fetch_attaches_etag() {
    let mock = ScriptedHttpSend::default().respond(
        200,
        &[("etag", "E2QWRUHAPOMQZL"), ("x-amz-request-id", "req-0002")],
        CONFIG_BODY,
    );
    let client = client_with(&mock);

    let fetched = client
        .get_distribution_config(DistributionKind::Web, "DISTID")
        .await
        .unwrap();

    assert_eq!(fetched.value.etag.as_deref(), Some("E2QWRUHAPOMQZL"));
    assert_eq!(fetched.etag.as_deref(), Some("E2QWRUHAPOMQZL"));
    assert_eq!(fetched.request_id.as_deref(), Some("req-0002"));
    assert_eq!(fetched.value.caller_reference, "ref-2012");

    let requests = mock.requests();
    assert_eq!(
        requests[0].uri,
        "https://cloudfront.amazonaws.com/2012-05-05/distribution/DISTID/config"
    );
}

#[tokio::test]
async fn test_update_round_trips_config_and_etag() {
    let mock = ScriptedHttpSend::default()
        .respond(200, &[("etag", "E1OLD")], CONFIG_BODY)
        .respond(200, &[("etag", "E2NEW")], CONFIG_BODY);
    let client = client_with(&mock);

    let mut config = client
        .get_distribution_config(DistributionKind::Streaming, "SGTD6EXAMPLE")
        .await
        .unwrap()
        .into_inner();
    config.comment = "updated".to_string();

    let updated = client
        .update_distribution_config(DistributionKind::Streaming, "SGTD6EXAMPLE", &config)
        .await
        .unwrap();
    assert_eq!(updated.value.etag.as_deref(), Some("E2NEW"));

    let requests = mock.requests();
    let update = &requests[1];
    assert_eq!(update.method, "PUT");
    assert_eq!(
        update.uri,
        "https://cloudfront.amazonaws.com/2012-05-05/streaming-distribution/SGTD6EXAMPLE/config"
    );
    assert_eq!(update.header("if-match"), Some("E1OLD"));
    // The streaming flavor serializes under its own root element and
    // reuses the fetched caller reference.
    assert!(update.body.contains("<StreamingDistributionConfig"));
    assert!(update.body.contains("<CallerReference>ref-2012</CallerReference>"));
    assert!(update.body.contains("<Comment>updated</Comment>"));
}

#[tokio::test]
async fn test_list_distributions_exposes_pagination_envelope() {
    let body = r#"<DistributionList xmlns="http://cloudfront.amazonaws.com/doc/2012-05-05/">
        <Marker>EARLIER</Marker>
        <NextMarker>EDFDVBD6EXAMPLE</NextMarker>
        <MaxItems>1</MaxItems>
        <IsTruncated>true</IsTruncated>
        <Quantity>1</Quantity>
        <Items>
            <DistributionSummary>
                <Id>EDFDVBD6EXAMPLE</Id>
                <Status>Deployed</Status>
                <LastModifiedTime>2012-05-19T19:37:58Z</LastModifiedTime>
                <DomainName>d111111abcdef8.cloudfront.net</DomainName>
                <Aliases><Quantity>1</Quantity><Items><CNAME>cdn.example.com</CNAME></Items></Aliases>
                <Origins><Quantity>0</Quantity></Origins>
                <Comment>example</Comment>
                <Enabled>true</Enabled>
            </DistributionSummary>
        </Items>
    </DistributionList>"#;

    let mock = ScriptedHttpSend::default().respond(200, &[], body);
    let client = client_with(&mock);

    let page = client
        .list_distributions(
            DistributionKind::Web,
            ListOptions::default().with_marker("EARLIER").with_max_items(1),
        )
        .await
        .unwrap();

    assert!(page.value.is_truncated);
    assert_eq!(page.value.marker.as_deref(), Some("EARLIER"));
    assert_eq!(page.value.next_marker.as_deref(), Some("EDFDVBD6EXAMPLE"));
    assert_eq!(page.value.max_items, Some(1));
    assert_eq!(page.value.items.len(), 1);
    assert_eq!(page.value.items[0].aliases, vec!["cdn.example.com".to_string()]);

    let requests = mock.requests();
    assert_eq!(
        requests[0].uri,
        "https://cloudfront.amazonaws.com/2012-05-05/distribution?Marker=EARLIER&MaxItems=1"
    );
}

#[tokio::test]
async fn test_origin_access_identity_comment_update_flow() {
    let oai_config = r#"<CloudFrontOriginAccessIdentityConfig xmlns="http://cloudfront.amazonaws.com/doc/2012-05-05/">
        <CallerReference>oai-ref</CallerReference>
        <Comment>old comment</Comment>
    </CloudFrontOriginAccessIdentityConfig>"#;

    let mock = ScriptedHttpSend::default()
        .respond(200, &[("etag", "E1OLD")], oai_config)
        .respond(
            200,
            &[("etag", "E2NEW")],
            r#"<CloudFrontOriginAccessIdentityConfig>
                <CallerReference>oai-ref</CallerReference>
                <Comment>new comment</Comment>
            </CloudFrontOriginAccessIdentityConfig>"#,
        );
    let client = client_with(&mock);

    let mut config: OriginAccessIdentityConfig = client
        .get_origin_access_identity_config("E2QWRUHAPOMQZL")
        .await
        .unwrap()
        .into_inner();
    assert_eq!(config.etag.as_deref(), Some("E1OLD"));

    config.comment = "new comment".to_string();
    let updated = client
        .update_origin_access_identity("E2QWRUHAPOMQZL", &config)
        .await
        .unwrap();
    assert_eq!(updated.value.comment, "new comment");
    assert_eq!(updated.value.etag.as_deref(), Some("E2NEW"));

    let requests = mock.requests();
    assert_eq!(
        requests[1].uri,
        "https://cloudfront.amazonaws.com/2012-05-05/origin-access-identity/cloudfront/E2QWRUHAPOMQZL/config"
    );
    assert_eq!(requests[1].method, "PUT");
    assert_eq!(requests[1].header("if-match"), Some("E1OLD"));
    assert!(requests[1].body.contains("<Comment>new comment</Comment>"));
    assert!(requests[1].body.contains("<CallerReference>oai-ref</CallerReference>"));
}

#[tokio::test]
async fn test_create_origin_access_identity() {
    let mock = ScriptedHttpSend::default().respond(
        201,
        &[("etag", "E2QWRUHAPOMQZL")],
        r#"<CloudFrontOriginAccessIdentity>
            <Id>E2QWRUHAPOMQZL</Id>
            <S3CanonicalUserId>b970b42360b81c8ddbd79d2f5df0069ba9033c8a</S3CanonicalUserId>
            <CloudFrontOriginAccessIdentityConfig>
                <CallerReference>oai-ref</CallerReference>
                <Comment>private content</Comment>
            </CloudFrontOriginAccessIdentityConfig>
        </CloudFrontOriginAccessIdentity>"#,
    );
    let client = client_with(&mock);

    let created = client
        .create_origin_access_identity("oai-ref", "private content")
        .await
        .unwrap();
    assert_eq!(created.value.id, "E2QWRUHAPOMQZL");
    assert_eq!(created.value.etag.as_deref(), Some("E2QWRUHAPOMQZL"));

    let requests = mock.requests();
    assert_eq!(
        requests[0].uri,
        "https://cloudfront.amazonaws.com/2012-05-05/origin-access-identity/cloudfront"
    );
    assert!(requests[0]
        .body
        .contains("<Comment>private content</Comment>"));
}

#[tokio::test]
async fn test_signed_url_uses_client_default_key_pair() {
    use rsa::pkcs8::EncodePrivateKey;

    let key = rsa::RsaPrivateKey::new(&mut rand::thread_rng(), 2048).unwrap();
    let pem = key
        .to_pkcs8_pem(rsa::pkcs8::LineEnding::LF)
        .unwrap()
        .to_string();

    let client = client_with(&ScriptedHttpSend::default()).with_key_pair("APKAEXAMPLE", pem);

    let url = client
        .signed_url(
            &SignedUrlRequest::new(1_700_000_000i64)
                .with_hostname("d111.cloudfront.net")
                .with_path("/a.mp4"),
        )
        .unwrap();

    assert!(url.starts_with("https://d111.cloudfront.net/a.mp4?Expires=1700000000&Signature="));
    assert!(url.ends_with("&Key-Pair-Id=APKAEXAMPLE"));
    let signature = url
        .split("Signature=")
        .nth(1)
        .unwrap()
        .split('&')
        .next()
        .unwrap();
    assert!(!signature.contains('+'));
    assert!(!signature.contains('='));
    assert!(!signature.contains('/'));
}
