// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Hash related utils.

use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use hmac::Hmac;
use hmac::Mac;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::Pkcs1v15Sign;
use rsa::RsaPrivateKey;
use sha1::Digest;
use sha1::Sha1;

use crate::Error;

/// Base64 encode
pub fn base64_encode(content: &[u8]) -> String {
    BASE64_STANDARD.encode(content)
}

/// Base64 encoded HMAC with SHA1 hash.
pub fn base64_hmac_sha1(key: &[u8], content: &[u8]) -> String {
    // SAFETY: HMAC's new_from_slice always returns Ok - it handles any key length
    let mut h = Hmac::<Sha1>::new_from_slice(key).unwrap();
    h.update(content);

    base64_encode(&h.finalize().into_bytes())
}

/// Base64 in the distribution service's URL-safe alphabet: standard base64
/// with `+` replaced by `-`, `=` by `_` and `/` by `~`.
///
/// This is the service's own substitution and not the same as the common
/// base64url alphabet.
pub fn base64_cloudfront(content: &[u8]) -> String {
    base64_encode(content)
        .chars()
        .map(|c| match c {
            '+' => '-',
            '=' => '_',
            '/' => '~',
            _ => c,
        })
        .collect()
}

/// Parse an RSA private key from PEM.
///
/// Both PKCS#8 (`BEGIN PRIVATE KEY`) and the PKCS#1 form the service hands
/// out for signing key pairs (`BEGIN RSA PRIVATE KEY`) are accepted.
pub fn rsa_private_key_from_pem(pem: &str) -> crate::Result<RsaPrivateKey> {
    RsaPrivateKey::from_pkcs8_pem(pem)
        .or_else(|_| RsaPrivateKey::from_pkcs1_pem(pem))
        .map_err(|e| Error::validation("invalid RSA private key").with_source(e))
}

/// RSA-SHA1 signature (PKCS#1 v1.5) over `content`.
pub fn rsa_sha1_sign(key: &RsaPrivateKey, content: &[u8]) -> crate::Result<Vec<u8>> {
    let digest = Sha1::digest(content);
    key.sign(Pkcs1v15Sign::new::<Sha1>(), &digest)
        .map_err(|e| Error::validation("RSA signing failed").with_source(e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base64_hmac_sha1() {
        // RFC 2202 style known vector.
        assert_eq!(
            base64_hmac_sha1(
                b"key",
                b"The quick brown fox jumps over the lazy dog"
            ),
            "3nybhbi3iqa8ino29wqQcBydtNk="
        );
    }

    #[test]
    fn test_base64_hmac_sha1_sensitivity() {
        let sig = base64_hmac_sha1(b"secret", b"Mon, 15 Aug 2022 16:50:12 GMT");
        assert_eq!(
            sig,
            base64_hmac_sha1(b"secret", b"Mon, 15 Aug 2022 16:50:12 GMT")
        );
        assert_ne!(
            sig,
            base64_hmac_sha1(b"other", b"Mon, 15 Aug 2022 16:50:12 GMT")
        );
        assert_ne!(
            sig,
            base64_hmac_sha1(b"secret", b"Mon, 15 Aug 2022 16:50:13 GMT")
        );
    }

    #[test]
    fn test_base64_cloudfront_alphabet() {
        // 0xfbefbe encodes to "++++", 0xffffff to "////" and a lone 0xff
        // pads with "==", covering every substituted character.
        assert_eq!(base64_encode(&[0xfb, 0xef, 0xbe]), "++++");
        assert_eq!(base64_cloudfront(&[0xfb, 0xef, 0xbe]), "----");
        assert_eq!(base64_encode(&[0xff, 0xff, 0xff]), "////");
        assert_eq!(base64_cloudfront(&[0xff, 0xff, 0xff]), "~~~~");
        assert_eq!(base64_cloudfront(&[0xff]), "~w__");
    }

    #[test]
    fn test_rsa_sha1_sign_round_trip() {
        use rsa::pkcs8::EncodePrivateKey;
        use rsa::RsaPublicKey;

        let mut rng = rand::thread_rng();
        let key = RsaPrivateKey::new(&mut rng, 2048).expect("key generation must succeed");

        let pem = key
            .to_pkcs8_pem(rsa::pkcs8::LineEnding::LF)
            .expect("pem export must succeed");
        let parsed = rsa_private_key_from_pem(pem.as_str()).expect("pem parse must succeed");

        let sig = rsa_sha1_sign(&parsed, b"policy bytes").expect("signing must succeed");
        let digest = Sha1::digest(b"policy bytes");
        RsaPublicKey::from(&key)
            .verify(Pkcs1v15Sign::new::<Sha1>(), &digest, &sig)
            .expect("signature must verify");
    }

    #[test]
    fn test_rsa_private_key_from_pem_rejects_garbage() {
        assert!(rsa_private_key_from_pem("not a key").is_err());
    }
}
