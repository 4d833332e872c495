use std::fmt;

/// Scheme used when the endpoint string doesn't carry one.
const DEFAULT_PROTOCOL: &str = "https";

/// Endpoint is the target service address of a request.
///
/// It accepts URL strings with or without a scheme (`https` is assumed
/// when missing) and keeps only `protocol`, `hostname` and `port`. Any
/// path after the authority is dropped.
///
/// Parsing never fails: malformed input degrades into a best-effort
/// hostname instead of an error. Cloning yields an independent copy that
/// can be re-targeted without touching the client's shared endpoint.
///
/// ```
/// use awsign_core::Endpoint;
///
/// let ep = Endpoint::new("sqs.us-east-1.amazonaws.com");
/// assert_eq!(ep.protocol(), "https");
/// assert_eq!(ep.host(), "sqs.us-east-1.amazonaws.com");
/// assert_eq!(ep.href(), "https://sqs.us-east-1.amazonaws.com/");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    protocol: String,
    hostname: String,
    port: Option<u16>,
}

impl Endpoint {
    /// Parse an endpoint from a URL string.
    pub fn new(url: &str) -> Self {
        let url = url.trim();
        let (protocol, rest) = match url.split_once("://") {
            Some((scheme, rest))
                if scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https") =>
            {
                (scheme.to_ascii_lowercase(), rest)
            }
            _ => (DEFAULT_PROTOCOL.to_string(), url),
        };

        let authority = rest.split('/').next().unwrap_or_default();
        let (hostname, port) = match authority.rsplit_once(':') {
            Some((hostname, port)) => match port.parse::<u16>() {
                Ok(port) => (hostname, Some(port)),
                Err(_) => (authority, None),
            },
            None => (authority, None),
        };

        Self {
            protocol,
            hostname: hostname.to_string(),
            port,
        }
    }

    /// Return a copy of this endpoint aimed at another hostname.
    ///
    /// Protocol and port are kept, which is what virtual-hosted style
    /// addressing (`bucket.s3.amazonaws.com`) needs.
    pub fn with_hostname(&self, hostname: impl Into<String>) -> Self {
        Self {
            protocol: self.protocol.clone(),
            hostname: hostname.into(),
            port: self.port,
        }
    }

    /// Protocol without the trailing `:`, for example `https`.
    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    /// Hostname without port.
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Explicit port, if the endpoint carried one.
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Hostname plus `:port` when a port is set.
    ///
    /// This is the value used for the `host` header.
    pub fn host(&self) -> String {
        match self.port {
            Some(port) => format!("{}:{}", self.hostname, port),
            None => self.hostname.clone(),
        }
    }

    /// Full URL of the endpoint root, for example `https://example.com/`.
    pub fn href(&self) -> String {
        format!("{}://{}/", self.protocol, self.host())
    }

    /// Compose a dispatchable URL from this endpoint, a path and an
    /// already serialized query string.
    ///
    /// `path` is appended as is and must start with `/`.
    pub fn url(&self, path: &str, query: &str) -> String {
        let mut url = format!("{}://{}{}", self.protocol, self.host(), path);
        if !query.is_empty() {
            url.push('?');
            url.push_str(query);
        }
        url
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.href())
    }
}

impl From<&str> for Endpoint {
    fn from(value: &str) -> Self {
        Endpoint::new(value)
    }
}

impl From<String> for Endpoint {
    fn from(value: String) -> Self {
        Endpoint::new(&value)
    }
}
