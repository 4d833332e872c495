//! Canonical request construction for AWS Signature Version 4.
//!
//! ```text
//! HTTPRequestMethod\n
//! CanonicalURI\n
//! CanonicalQueryString\n
//! CanonicalHeaders\n
//! SignedHeaders\n
//! HashedPayload
//! ```
//!
//! - [Create a canonical request](https://docs.aws.amazon.com/IAM/latest/UserGuide/create-signed-request.html#create-canonical-request)

use std::collections::BTreeMap;
use std::collections::HashSet;
use std::fmt::Write;

use awsign_core::hash::hex_sha256;
use awsign_core::{Body, Error, QueryValue, Result, SignableRequest};
use http::HeaderMap;
use percent_encoding::utf8_percent_encode;

use crate::constants::{
    ALWAYS_UNSIGNABLE_HEADERS, AWS_QUERY_ENCODE_SET, AWS_URI_ENCODE_SET, EMPTY_STRING_SHA256,
    UNSIGNED_PAYLOAD, X_AMZ_CONTENT_SHA_256, X_AMZ_SIGNATURE_QUERY,
};

/// How many escaping passes are applied to a path while building the
/// canonical URI.
///
/// Paths handed to the signer are wire paths, already escaped once. Most
/// services expect them escaped once more ([`UriEscape::Single`]), S3
/// expects them verbatim ([`UriEscape::None`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UriEscape {
    /// Use the path as-is, without normalization.
    None,
    /// Normalize, then escape once.
    Single,
    /// Normalize, then escape twice.
    Double,
}

/// Build the canonical URI of `path`.
///
/// `.` and empty segments are dropped and `..` pops the previous segment,
/// never going above the root. Leading and trailing slashes survive
/// normalization. Slashes are never escaped.
pub fn compute_canonical_uri(path: &str, escape: UriEscape) -> String {
    if path.is_empty() {
        return "/".to_string();
    }
    if path == "/" || escape == UriEscape::None {
        return path.to_string();
    }

    let mut segments = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }

    let mut normalized = String::with_capacity(path.len());
    if path.starts_with('/') {
        normalized.push('/');
    }
    normalized.push_str(&segments.join("/"));
    if !segments.is_empty() && path.ends_with('/') {
        normalized.push('/');
    }

    let escaped = utf8_percent_encode(&normalized, &AWS_URI_ENCODE_SET).to_string();
    match escape {
        UriEscape::Double => utf8_percent_encode(&escaped, &AWS_URI_ENCODE_SET).to_string(),
        _ => escaped,
    }
}

/// Build the canonical query string.
///
/// Keys and values are escaped with the AWS unreserved set, pairs are
/// sorted by key then by value (byte order, so upper-case sorts before
/// lower-case) and `X-Amz-Signature` is left out.
pub fn compute_canonical_querystring(query: &BTreeMap<String, QueryValue>) -> String {
    serialize(query, Some(X_AMZ_SIGNATURE_QUERY))
}

/// Serialize the full query string for the dispatched URL.
///
/// Uses exactly the ordering and escaping of
/// [`compute_canonical_querystring`] so the signed query and the sent query
/// never disagree, but keeps `X-Amz-Signature`.
pub fn serialize_query(query: &BTreeMap<String, QueryValue>) -> String {
    serialize(query, None)
}

fn serialize(query: &BTreeMap<String, QueryValue>, exclude: Option<&str>) -> String {
    let mut params: Vec<(String, Vec<String>)> = query
        .iter()
        .filter(|(k, _)| !exclude.is_some_and(|ex| k.eq_ignore_ascii_case(ex)))
        .map(|(k, v)| {
            let mut values = v
                .values()
                .map(|v| utf8_percent_encode(v, &AWS_QUERY_ENCODE_SET).to_string())
                .collect::<Vec<_>>();
            values.sort_unstable();
            (
                utf8_percent_encode(k, &AWS_QUERY_ENCODE_SET).to_string(),
                values,
            )
        })
        .collect();
    params.sort_unstable_by(|a, b| a.0.cmp(&b.0));

    let mut s = String::with_capacity(64);
    for (key, values) in params {
        for value in values {
            if !s.is_empty() {
                s.push('&');
            }
            s.push_str(&key);
            s.push('=');
            s.push_str(&value);
        }
    }
    s
}

/// The headers that take part in a signature, keyed by lower-cased name.
///
/// Both the canonical header block and the `SignedHeaders` list are derived
/// from this one mapping, so they can't drift apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalHeaders {
    headers: BTreeMap<String, String>,
}

impl CanonicalHeaders {
    /// `name:value\n` per header, sorted by name.
    pub fn canonical_string(&self) -> String {
        let mut s = String::with_capacity(256);
        for (name, value) in &self.headers {
            s.push_str(name);
            s.push(':');
            s.push_str(value);
            s.push('\n');
        }
        s
    }

    /// Semicolon separated, sorted header names.
    pub fn signed_headers(&self) -> String {
        self.headers
            .keys()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(";")
    }

    /// Normalized value of a signed header.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Number of signed headers.
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    /// Always `false` for headers produced by [`compute_canonical_headers`].
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }
}

/// Select and normalize the headers to sign.
///
/// Headers in [`ALWAYS_UNSIGNABLE_HEADERS`] or in `unsignable` are dropped
/// unless they are listed in `signable`. Values are trimmed and inner
/// whitespace runs collapse into one space; repeated headers are joined
/// with `,`.
pub fn compute_canonical_headers(
    headers: &HeaderMap,
    unsignable: &HashSet<String>,
    signable: &HashSet<String>,
) -> Result<CanonicalHeaders> {
    let mut canonical = BTreeMap::new();

    for name in headers.keys() {
        let name = name.as_str();
        if (ALWAYS_UNSIGNABLE_HEADERS.contains(name) || unsignable.contains(name))
            && !signable.contains(name)
        {
            continue;
        }

        let mut value = String::new();
        for (idx, v) in headers.get_all(name).iter().enumerate() {
            let v = std::str::from_utf8(v.as_bytes()).map_err(|e| {
                Error::request_invalid(format!("header {name} is not valid utf-8"))
                    .with_source(e)
            })?;
            if idx > 0 {
                value.push(',');
            }
            value.push_str(&v.split_whitespace().collect::<Vec<_>>().join(" "));
        }

        canonical.insert(name.to_string(), value);
    }

    if canonical.is_empty() {
        return Err(Error::request_invalid(
            "request must carry at least one signable header",
        ));
    }

    Ok(CanonicalHeaders { headers: canonical })
}

/// Compute the hashed payload of a request.
///
/// - An explicit `x-amz-content-sha256` header wins, so callers can declare
///   `UNSIGNED-PAYLOAD` or a precomputed checksum.
/// - Otherwise bodies held in memory are hashed, with the empty body
///   hashing to [`EMPTY_STRING_SHA256`].
/// - Streaming bodies are declared as `UNSIGNED-PAYLOAD`.
pub fn compute_payload_hash(headers: &HeaderMap, body: &Body) -> Result<String> {
    if let Some(v) = headers.get(X_AMZ_CONTENT_SHA_256) {
        return Ok(v.to_str()?.to_string());
    }

    Ok(match body.as_bytes() {
        Some([]) => EMPTY_STRING_SHA256.to_string(),
        Some(bs) => hex_sha256(bs),
        None => UNSIGNED_PAYLOAD.to_string(),
    })
}

/// Build the canonical request string of `req`.
pub fn create_canonical_request(
    req: &SignableRequest,
    headers: &CanonicalHeaders,
    payload_hash: &str,
    escape: UriEscape,
) -> Result<String> {
    // 256 is specially chosen to avoid reallocation for most requests.
    let mut f = String::with_capacity(256);

    writeln!(f, "{}", req.method.as_str().to_ascii_uppercase())?;
    writeln!(f, "{}", compute_canonical_uri(&req.path, escape))?;
    writeln!(f, "{}", compute_canonical_querystring(&req.query))?;
    writeln!(f, "{}", headers.canonical_string())?;
    writeln!(f, "{}", headers.signed_headers())?;
    write!(f, "{payload_hash}")?;

    Ok(f)
}
