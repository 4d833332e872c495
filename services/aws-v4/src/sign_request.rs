use std::collections::HashSet;

use awsign_core::hash::{hex_hmac_sha256, hex_sha256, hmac_sha256};
use awsign_core::time::{format_date, format_iso8601, now, DateTime};
use awsign_core::{Error, QueryValue, Result, SignableRequest, SignedRequest};
use http::header::{AUTHORIZATION, DATE, HOST};
use http::{HeaderName, HeaderValue};
use log::debug;

use crate::canonical::{
    compute_canonical_headers, compute_payload_hash, create_canonical_request, serialize_query,
    UriEscape,
};
use crate::constants::*;
use crate::{PresignOptions, SignerConfig, SigningOptions};

/// RequestSigner that implement AWS SigV4.
///
/// - [Signature Version 4 signing process](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)
///
/// A signer only holds immutable configuration, share it freely between
/// threads.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    config: SignerConfig,
}

impl RequestSigner {
    /// Create a new signer for AWS V4.
    pub fn new(config: SignerConfig) -> Self {
        Self { config }
    }

    /// Config this signer was built with.
    pub fn config(&self) -> &SignerConfig {
        &self.config
    }

    /// Sign `req` with an `authorization` header.
    ///
    /// The request gains `host` (when missing), `x-amz-date`,
    /// `x-amz-security-token` (with a session token), `x-amz-content-sha256`
    /// (when checksums are applied) and `authorization`. Stale
    /// `authorization`, `x-amz-date` and `date` headers are replaced.
    pub fn sign(&self, mut req: SignableRequest, opts: &SigningOptions) -> Result<SignedRequest> {
        let now = opts.signing_date().unwrap_or_else(now);
        let service = opts.signing_service().unwrap_or(self.config.service());
        let region = opts.signing_region().unwrap_or(self.config.region());
        let cred = self.config.credential();

        set_host(&mut req)?;
        req.headers.remove(AUTHORIZATION);
        req.headers.remove(X_AMZ_DATE);
        req.headers.remove(DATE);
        req.headers.insert(
            HeaderName::from_static(X_AMZ_DATE),
            HeaderValue::from_str(&format_iso8601(now))?,
        );
        if let Some(token) = &cred.session_token {
            let mut value = HeaderValue::from_str(token)?;
            value.set_sensitive(true);
            req.headers
                .insert(HeaderName::from_static(X_AMZ_SECURITY_TOKEN), value);
        }

        let payload_hash = compute_payload_hash(&req.headers, &req.body)?;
        if self.config.apply_checksum() && !req.headers.contains_key(X_AMZ_CONTENT_SHA_256) {
            req.headers.insert(
                HeaderName::from_static(X_AMZ_CONTENT_SHA_256),
                HeaderValue::from_str(&payload_hash)?,
            );
        }

        let headers = compute_canonical_headers(
            &req.headers,
            opts.unsignable_headers(),
            opts.signable_headers(),
        )?;
        let creq = create_canonical_request(&req, &headers, &payload_hash, self.uri_escape())?;
        debug!("calculated canonical request: {creq}");

        let scope = credential_scope(now, region, service);
        debug!("calculated scope: {scope}");

        let string_to_sign =
            create_string_to_sign(now, region, service, &hex_sha256(creq.as_bytes()));
        debug!("calculated string to sign: {string_to_sign}");

        let signing_key = derive_signing_key(&cred.secret_access_key, now, region, service);
        let signature = calculate_signature(&signing_key, &string_to_sign);

        let mut authorization = HeaderValue::from_str(&format!(
            "{ALGORITHM} Credential={}/{scope}, SignedHeaders={}, Signature={signature}",
            cred.access_key_id,
            headers.signed_headers(),
        ))?;
        authorization.set_sensitive(true);
        req.headers.insert(AUTHORIZATION, authorization);

        let url = req.endpoint.url(&req.path, &serialize_query(&req.query));
        Ok(SignedRequest { request: req, url })
    }

    /// Presign `req`, moving the signature into the query string.
    ///
    /// The caller's request is left untouched. Stale `authorization`,
    /// `x-amz-date` and `date` headers are dropped, then `x-amz-*` headers
    /// are hoisted into the query unless listed as unhoistable.
    pub fn presign(&self, req: &SignableRequest, opts: &PresignOptions) -> Result<SignedRequest> {
        let expires_in = opts.expires_in();
        if expires_in.as_secs() == 0 {
            return Err(Error::signature_invalid(
                "presigned request must expire at least one second in the future",
            ));
        }
        if expires_in > MAX_PRESIGNED_EXPIRATION {
            return Err(Error::signature_invalid(format!(
                "presigned request can't be valid for more than {} seconds, got {}",
                MAX_PRESIGNED_EXPIRATION.as_secs(),
                expires_in.as_secs()
            )));
        }

        let signing = opts.signing();
        let now = signing.signing_date().unwrap_or_else(now);
        let service = signing.signing_service().unwrap_or(self.config.service());
        let region = signing.signing_region().unwrap_or(self.config.region());
        let cred = self.config.credential();

        let mut req = req.clone();
        let explicit_payload_hash = req
            .headers
            .get(X_AMZ_CONTENT_SHA_256)
            .map(|v| header_value_str(X_AMZ_CONTENT_SHA_256, v).map(str::to_string))
            .transpose()?;

        // Stale signing headers must not be hoisted next to the fresh query parameters.
        req.headers.remove(AUTHORIZATION);
        req.headers.remove(X_AMZ_DATE);
        req.headers.remove(DATE);
        if cred.session_token.is_some() {
            req.headers.remove(X_AMZ_SECURITY_TOKEN);
        }

        move_headers_to_query(&mut req, opts.unhoistable_headers())?;
        set_host(&mut req)?;

        let scope = credential_scope(now, region, service);
        debug!("calculated scope: {scope}");

        let mut set_query = |k: &str, v: String| {
            req.query.insert(k.to_string(), QueryValue::from(v));
        };
        if let Some(token) = &cred.session_token {
            set_query(X_AMZ_SECURITY_TOKEN_QUERY, token.clone());
        }
        set_query(X_AMZ_ALGORITHM_QUERY, ALGORITHM.to_string());
        set_query(
            X_AMZ_CREDENTIAL_QUERY,
            format!("{}/{scope}", cred.access_key_id),
        );
        set_query(X_AMZ_DATE_QUERY, format_iso8601(now));
        set_query(X_AMZ_EXPIRES_QUERY, expires_in.as_secs().to_string());

        let headers = compute_canonical_headers(
            &req.headers,
            signing.unsignable_headers(),
            signing.signable_headers(),
        )?;
        req.query.insert(
            X_AMZ_SIGNED_HEADERS_QUERY.to_string(),
            QueryValue::from(headers.signed_headers()),
        );

        let payload_hash = match explicit_payload_hash {
            Some(v) => v,
            None if opts.unsigned_payload() => UNSIGNED_PAYLOAD.to_string(),
            None => compute_payload_hash(&req.headers, &req.body)?,
        };

        let creq = create_canonical_request(&req, &headers, &payload_hash, self.uri_escape())?;
        debug!("calculated canonical request: {creq}");

        let string_to_sign =
            create_string_to_sign(now, region, service, &hex_sha256(creq.as_bytes()));
        debug!("calculated string to sign: {string_to_sign}");

        let signing_key = derive_signing_key(&cred.secret_access_key, now, region, service);
        req.query.insert(
            X_AMZ_SIGNATURE_QUERY.to_string(),
            QueryValue::from(calculate_signature(&signing_key, &string_to_sign)),
        );

        let url = req.endpoint.url(&req.path, &serialize_query(&req.query));
        Ok(SignedRequest { request: req, url })
    }

    fn uri_escape(&self) -> UriEscape {
        if self.config.uri_escape_path() {
            UriEscape::Single
        } else {
            UriEscape::None
        }
    }
}

fn set_host(req: &mut SignableRequest) -> Result<()> {
    if !req.headers.contains_key(HOST) {
        let host = HeaderValue::from_str(&req.endpoint.host())?;
        req.headers.insert(HOST, host);
    }
    Ok(())
}

/// Move every `x-amz-*` header that isn't unhoistable into the query.
fn move_headers_to_query(req: &mut SignableRequest, unhoistable: &HashSet<String>) -> Result<()> {
    let names: Vec<HeaderName> = req
        .headers
        .keys()
        .filter(|name| {
            name.as_str().starts_with(AMZ_HEADER_PREFIX) && !unhoistable.contains(name.as_str())
        })
        .cloned()
        .collect();

    for name in names {
        let values = req
            .headers
            .get_all(&name)
            .iter()
            .map(|v| header_value_str(name.as_str(), v).map(str::to_string))
            .collect::<Result<Vec<_>>>()?;
        req.headers.remove(&name);

        for value in values {
            req.query_push(name.as_str(), value);
        }
    }

    Ok(())
}

fn header_value_str<'a>(name: &str, value: &'a HeaderValue) -> Result<&'a str> {
    std::str::from_utf8(value.as_bytes()).map_err(|e| {
        Error::request_invalid(format!("header {name} is not valid utf-8")).with_source(e)
    })
}

/// Credential scope: `20220313/<region>/<service>/aws4_request`
pub fn credential_scope(time: DateTime, region: &str, service: &str) -> String {
    format!(
        "{}/{region}/{service}/{KEY_TYPE_IDENTIFIER}",
        format_date(time)
    )
}

/// StringToSign:
///
/// ```text
/// AWS4-HMAC-SHA256
/// 20220313T072004Z
/// 20220313/<region>/<service>/aws4_request
/// <hashed_canonical_request>
/// ```
pub fn create_string_to_sign(
    time: DateTime,
    region: &str,
    service: &str,
    hashed_canonical_request: &str,
) -> String {
    format!(
        "{ALGORITHM}\n{}\n{}\n{hashed_canonical_request}",
        format_iso8601(time),
        credential_scope(time, region, service)
    )
}

/// Derive the signing key for the given day, region and service.
pub fn derive_signing_key(secret: &str, time: DateTime, region: &str, service: &str) -> Vec<u8> {
    // Sign secret
    let secret = format!("AWS4{secret}");
    // Sign date
    let sign_date = hmac_sha256(secret.as_bytes(), format_date(time).as_bytes());
    // Sign region
    let sign_region = hmac_sha256(sign_date.as_slice(), region.as_bytes());
    // Sign service
    let sign_service = hmac_sha256(sign_region.as_slice(), service.as_bytes());
    // Sign request
    hmac_sha256(sign_service.as_slice(), KEY_TYPE_IDENTIFIER.as_bytes())
}

/// Lower-case hex HMAC-SHA256 of the string to sign.
pub fn calculate_signature(signing_key: &[u8], string_to_sign: &str) -> String {
    hex_hmac_sha256(signing_key, string_to_sign.as_bytes())
}
