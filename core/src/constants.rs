//! Fixed wire constants for the CloudFront distribution provisioning API.
//!
//! Values are grounded in `original_source/lib/index.js`
//! (`CloudFront.endpoint`) with the API version lifted to the latest
//! observed schema generation (`2012-05-05`), matching the `xmlns`
//! document URL asserted by the codec tests.

/// API version path segment prefixed to every wire path.
pub const API_VERSION: &str = "2012-05-05";

/// Default service endpoint host.
pub const ENDPOINT: &str = "cloudfront.amazonaws.com";

/// Base wire path for origin-access-identity operations (relative to the
/// API version segment).
pub const OAI_PATH: &str = "origin-access-identity/cloudfront";

/// Canonical prefix applied to an origin-access-identity id to form the
/// reference string carried in S3 origin configs, and stripped on decode.
pub const OAI_REFERENCE_PREFIX: &str = "origin-access-identity/cloudfront/";

/// Response header carrying the service request id.
pub const X_AMZ_REQUEST_ID: &str = "x-amz-request-id";

/// The `xmlns` document-URL attribute value carried on encoded config
/// documents, parameterized by the API version.
pub fn xmlns() -> String {
    format!("http://cloudfront.amazonaws.com/doc/{API_VERSION}/")
}
