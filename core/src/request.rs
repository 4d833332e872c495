use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::mem;

use bytes::Bytes;
use http::header::AUTHORIZATION;
use http::HeaderMap;
use http::Method;
use http::Uri;

use crate::Endpoint;
use crate::Error;
use crate::Result;

/// Request body as seen by the signer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Body {
    /// No body at all; hashed as the empty string.
    #[default]
    Empty,
    /// Body with its full content in memory.
    Bytes(Bytes),
    /// Body whose content can't be read up front (streams, file handles).
    ///
    /// Signing such a request declares `UNSIGNED-PAYLOAD`.
    Streaming,
}

impl Body {
    /// Content available for hashing, `None` for streaming bodies.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Body::Empty => Some(&[][..]),
            Body::Bytes(bs) => Some(bs.as_ref()),
            Body::Streaming => None,
        }
    }
}

impl From<()> for Body {
    fn from(_: ()) -> Self {
        Body::Empty
    }
}

impl From<&str> for Body {
    fn from(value: &str) -> Self {
        Body::Bytes(Bytes::copy_from_slice(value.as_bytes()))
    }
}

impl From<String> for Body {
    fn from(value: String) -> Self {
        Body::Bytes(Bytes::from(value))
    }
}

impl From<&[u8]> for Body {
    fn from(value: &[u8]) -> Self {
        Body::Bytes(Bytes::copy_from_slice(value))
    }
}

impl From<Vec<u8>> for Body {
    fn from(value: Vec<u8>) -> Self {
        Body::Bytes(Bytes::from(value))
    }
}

impl From<Bytes> for Body {
    fn from(value: Bytes) -> Self {
        Body::Bytes(value)
    }
}

/// Value of a query parameter, which may be repeated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    /// `key=value`
    Single(String),
    /// `key=a&key=b`, in insertion order.
    Multi(Vec<String>),
}

impl QueryValue {
    /// Iterate over all values of this parameter.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        let values: &[String] = match self {
            QueryValue::Single(v) => std::slice::from_ref(v),
            QueryValue::Multi(vs) => vs,
        };
        values.iter().map(String::as_str)
    }

    /// First value of this parameter.
    pub fn first(&self) -> Option<&str> {
        self.values().next()
    }

    /// Append another value, turning a single value into a list.
    pub fn push(&mut self, value: impl Into<String>) {
        match self {
            QueryValue::Single(v) => {
                let first = mem::take(v);
                *self = QueryValue::Multi(vec![first, value.into()]);
            }
            QueryValue::Multi(vs) => vs.push(value.into()),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Single(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Single(value)
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(value: Vec<String>) -> Self {
        QueryValue::Multi(value)
    }
}

impl From<Vec<&str>> for QueryValue {
    fn from(value: Vec<&str>) -> Self {
        QueryValue::Multi(value.into_iter().map(String::from).collect())
    }
}

/// The request description that gets signed.
///
/// `path` is the wire path: exactly what will be sent after the authority,
/// already percent-encoded by the caller. `query` holds decoded keys and
/// values; they are encoded while signing. Header names are case
/// insensitive and stored lower-cased by [`HeaderMap`].
#[derive(Debug, Clone)]
pub struct SignableRequest {
    /// HTTP method.
    pub method: Method,
    /// Target endpoint.
    pub endpoint: Endpoint,
    /// HTTP path, always starting with `/`.
    pub path: String,
    /// Query parameters.
    pub query: BTreeMap<String, QueryValue>,
    /// HTTP headers.
    pub headers: HeaderMap,
    /// Request body.
    pub body: Body,
}

impl SignableRequest {
    /// Create a request without query, headers or body.
    ///
    /// A path without a leading `/` is rooted, so `key` becomes `/key`.
    pub fn new(method: Method, endpoint: impl Into<Endpoint>, path: impl Into<String>) -> Self {
        let mut path = path.into();
        if !path.starts_with('/') {
            path.insert(0, '/');
        }

        Self {
            method,
            endpoint: endpoint.into(),
            path,
            query: BTreeMap::new(),
            headers: HeaderMap::new(),
            body: Body::Empty,
        }
    }

    /// Add a query parameter, appending to existing values of the same key.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_push(key, value);
        self
    }

    /// Set the request body.
    pub fn with_body(mut self, body: impl Into<Body>) -> Self {
        self.body = body.into();
        self
    }

    /// Push a query parameter, appending to existing values of the same key.
    pub fn query_push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        match self.query.entry(key.into()) {
            Entry::Occupied(mut e) => e.get_mut().push(value),
            Entry::Vacant(e) => {
                e.insert(QueryValue::Single(value.into()));
            }
        }
    }

    /// Build a signable request from an `http` request head and its body.
    ///
    /// The request URI must be absolute: its authority becomes the endpoint.
    pub fn from_parts(parts: &http::request::Parts, body: impl Into<Body>) -> Result<Self> {
        let uri = &parts.uri;
        let authority = uri.authority().ok_or_else(|| {
            Error::request_invalid("request without authority is invalid for signing")
        })?;
        let scheme = uri.scheme_str().unwrap_or("https");

        let mut req = SignableRequest::new(
            parts.method.clone(),
            Endpoint::new(&format!("{scheme}://{authority}")),
            uri.path(),
        );
        if let Some(query) = uri.query() {
            for (k, v) in form_urlencoded::parse(query.as_bytes()) {
                req.query_push(k.into_owned(), v.into_owned());
            }
        }
        req.headers = parts.headers.clone();
        req.body = body.into();

        Ok(req)
    }
}

/// A signed request ready for dispatch.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    /// The request after signing: signed headers and, for presigned
    /// requests, the `X-Amz-*` query parameters.
    pub request: SignableRequest,
    /// Fully composed URL, including the serialized query string.
    pub url: String,
}

impl SignedRequest {
    /// Value of the `authorization` header, if the request was header-signed.
    pub fn authorization(&self) -> Option<&str> {
        self.request
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
    }

    /// First value of a query parameter.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.request.query.get(key).and_then(QueryValue::first)
    }

    /// Apply the signed method, headers and URL back to an `http` request head.
    pub fn apply(self, parts: &mut http::request::Parts) -> Result<()> {
        parts.uri = self.url.parse::<Uri>()?;
        parts.method = self.request.method;
        parts.headers = self.request.headers;

        Ok(())
    }
}
