//! Request signing for the distribution admin API.

use http::header::AUTHORIZATION;
use http::header::DATE;
use http::HeaderValue;
use log::debug;

use crate::credential::Credential;
use crate::hash::base64_hmac_sha1;
use crate::time::format_http_date;
use crate::time::now;
use crate::time::DateTime;
use crate::Result;

/// RequestSigner that implements the admin API's date-based authorization.
///
/// The signed string is nothing but the `Date` header value, so the header
/// is generated immediately before signing on every call; a signature is
/// only valid for a request carrying that exact date, and the service
/// rejects requests whose date drifts too far from server time. A caller
/// that hits a clock-skew rejection re-signs and resends.
#[derive(Debug)]
pub struct RequestSigner {
    credential: Credential,
    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a signer from a credential.
    pub fn new(credential: Credential) -> Self {
        Self {
            credential,
            time: None,
        }
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    #[cfg(test)]
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Attach `Date` and `Authorization` headers to the request.
    pub fn sign(&self, parts: &mut http::request::Parts) -> Result<()> {
        let now = self.time.unwrap_or_else(now);
        let date = format_http_date(now);
        debug!("string to sign: {}", &date);

        let signature = base64_hmac_sha1(
            self.credential.secret_access_key.as_bytes(),
            date.as_bytes(),
        );

        parts.headers.insert(DATE, date.parse()?);
        parts.headers.insert(AUTHORIZATION, {
            let mut value: HeaderValue =
                format!("AWS {}:{}", self.credential.access_key_id, signature).parse()?;
            value.set_sensitive(true);

            value
        });

        Ok(())
    }
}
