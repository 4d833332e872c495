use std::collections::HashSet;
use std::time::Duration;

use awsign_core::time::DateTime;

use crate::constants::DEFAULT_PRESIGNED_EXPIRATION;

/// Per-call options for [`RequestSigner::sign`](crate::RequestSigner::sign).
///
/// Header names are matched case-insensitively; they are lower-cased when
/// added.
#[derive(Debug, Clone, Default)]
pub struct SigningOptions {
    signing_date: Option<DateTime>,
    unsignable_headers: HashSet<String>,
    signable_headers: HashSet<String>,
    signing_service: Option<String>,
    signing_region: Option<String>,
}

impl SigningOptions {
    /// Create options with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sign as of the given time instead of now.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this for tests or replaying fixtures.
    pub fn with_signing_date(mut self, date: DateTime) -> Self {
        self.signing_date = Some(date);
        self
    }

    /// Exclude a header from the signature.
    pub fn with_unsignable_header(mut self, name: &str) -> Self {
        self.unsignable_headers.insert(name.to_ascii_lowercase());
        self
    }

    /// Force a header into the signature, even if it is unsignable.
    pub fn with_signable_header(mut self, name: &str) -> Self {
        self.signable_headers.insert(name.to_ascii_lowercase());
        self
    }

    /// Override the signer's service name for this call.
    pub fn with_signing_service(mut self, service: &str) -> Self {
        self.signing_service = Some(service.to_string());
        self
    }

    /// Override the signer's region for this call.
    pub fn with_signing_region(mut self, region: &str) -> Self {
        self.signing_region = Some(region.to_string());
        self
    }

    pub(crate) fn signing_date(&self) -> Option<DateTime> {
        self.signing_date
    }

    pub(crate) fn signing_service(&self) -> Option<&str> {
        self.signing_service.as_deref()
    }

    pub(crate) fn signing_region(&self) -> Option<&str> {
        self.signing_region.as_deref()
    }

    pub(crate) fn unsignable_headers(&self) -> &HashSet<String> {
        &self.unsignable_headers
    }

    pub(crate) fn signable_headers(&self) -> &HashSet<String> {
        &self.signable_headers
    }
}

/// Per-call options for [`RequestSigner::presign`](crate::RequestSigner::presign).
#[derive(Debug, Clone)]
pub struct PresignOptions {
    signing: SigningOptions,
    expires_in: Duration,
    unhoistable_headers: HashSet<String>,
    unsigned_payload: bool,
}

impl Default for PresignOptions {
    fn default() -> Self {
        Self {
            signing: SigningOptions::default(),
            expires_in: DEFAULT_PRESIGNED_EXPIRATION,
            unhoistable_headers: HashSet::new(),
            unsigned_payload: true,
        }
    }
}

impl PresignOptions {
    /// Create options with all defaults: valid for one hour, unsigned payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// How long the presigned request stays valid.
    ///
    /// Must be within `(0, 7 days]`; `presign` fails otherwise.
    pub fn with_expires_in(mut self, expires_in: Duration) -> Self {
        self.expires_in = expires_in;
        self
    }

    /// Keep an `x-amz-*` header in the headers instead of moving it into
    /// the query string.
    pub fn with_unhoistable_header(mut self, name: &str) -> Self {
        self.unhoistable_headers.insert(name.to_ascii_lowercase());
        self
    }

    /// Whether to declare `UNSIGNED-PAYLOAD` when no explicit
    /// `x-amz-content-sha256` header is present. Defaults to `true`;
    /// set to `false` to hash the body like `sign` does.
    pub fn with_unsigned_payload(mut self, unsigned_payload: bool) -> Self {
        self.unsigned_payload = unsigned_payload;
        self
    }

    /// Sign as of the given time instead of now.
    pub fn with_signing_date(mut self, date: DateTime) -> Self {
        self.signing = self.signing.with_signing_date(date);
        self
    }

    /// Exclude a header from the signature.
    pub fn with_unsignable_header(mut self, name: &str) -> Self {
        self.signing = self.signing.with_unsignable_header(name);
        self
    }

    /// Force a header into the signature, even if it is unsignable.
    pub fn with_signable_header(mut self, name: &str) -> Self {
        self.signing = self.signing.with_signable_header(name);
        self
    }

    /// Override the signer's service name for this call.
    pub fn with_signing_service(mut self, service: &str) -> Self {
        self.signing = self.signing.with_signing_service(service);
        self
    }

    /// Override the signer's region for this call.
    pub fn with_signing_region(mut self, region: &str) -> Self {
        self.signing = self.signing.with_signing_region(region);
        self
    }

    pub(crate) fn signing(&self) -> &SigningOptions {
        &self.signing
    }

    pub(crate) fn expires_in(&self) -> Duration {
        self.expires_in
    }

    pub(crate) fn unhoistable_headers(&self) -> &HashSet<String> {
        &self.unhoistable_headers
    }

    pub(crate) fn unsigned_payload(&self) -> bool {
        self.unsigned_payload
    }
}

impl From<SigningOptions> for PresignOptions {
    fn from(signing: SigningOptions) -> Self {
        Self {
            signing,
            ..Default::default()
        }
    }
}
