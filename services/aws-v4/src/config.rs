use awsign_core::utils::Redact;
use awsign_core::{Env, Error, Result};
use std::fmt::{Debug, Formatter};

use crate::constants::*;
use crate::Credential;

/// Immutable signer configuration, created once per service client.
#[derive(Debug, Clone)]
pub struct SignerConfig {
    service: String,
    region: String,
    credential: Credential,
    uri_escape_path: bool,
    apply_checksum: bool,
}

impl SignerConfig {
    /// Create a config for `service` in `region`.
    ///
    /// Paths are escaped and `x-amz-content-sha256` is applied by default.
    pub fn new(service: &str, region: &str, credential: Credential) -> Self {
        Self {
            service: service.to_string(),
            region: region.to_string(),
            credential,
            uri_escape_path: true,
            apply_checksum: true,
        }
    }

    /// Config for S3, which manages its own key encoding and expects paths
    /// to be signed verbatim.
    pub fn s3(region: &str, credential: Credential) -> Self {
        Self::new("s3", region, credential).with_uri_escape_path(false)
    }

    /// Whether the canonical URI escapes the request path once more.
    pub fn with_uri_escape_path(mut self, uri_escape_path: bool) -> Self {
        self.uri_escape_path = uri_escape_path;
        self
    }

    /// Whether `sign` sets `x-amz-content-sha256` on the request.
    pub fn with_apply_checksum(mut self, apply_checksum: bool) -> Self {
        self.apply_checksum = apply_checksum;
        self
    }

    /// Service name used in the credential scope.
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Region used in the credential scope.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Credential used for signing.
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// See [`SignerConfig::with_uri_escape_path`].
    pub fn uri_escape_path(&self) -> bool {
        self.uri_escape_path
    }

    /// See [`SignerConfig::with_apply_checksum`].
    pub fn apply_checksum(&self) -> bool {
        self.apply_checksum
    }
}

/// Config carries region and credentials gathered from the caller and the
/// environment, and validates them into a [`SignerConfig`].
#[derive(Clone, Default)]
pub struct Config {
    /// `region` will be loaded from:
    ///
    /// - this field if it's `is_some`
    /// - env value: `AWS_REGION`
    /// - env value: `AWS_DEFAULT_REGION`
    pub region: Option<String>,
    /// `access_key_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: `AWS_ACCESS_KEY_ID`
    pub access_key_id: Option<String>,
    /// `secret_access_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: `AWS_SECRET_ACCESS_KEY`
    pub secret_access_key: Option<String>,
    /// `session_token` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: `AWS_SESSION_TOKEN`
    pub session_token: Option<String>,
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("region", &self.region)
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("secret_access_key", &Redact::from(&self.secret_access_key))
            .field("session_token", &Redact::from(&self.session_token))
            .finish()
    }
}

impl Config {
    /// Load config from env, keeping values that are already set.
    pub fn from_env(mut self, env: &impl Env) -> Self {
        if self.region.is_none() {
            self.region = env
                .var(AWS_REGION)
                .or_else(|| env.var(AWS_DEFAULT_REGION))
                .filter(|v| !v.is_empty());
        }
        if self.access_key_id.is_none() {
            self.access_key_id = env.var(AWS_ACCESS_KEY_ID);
        }
        if self.secret_access_key.is_none() {
            self.secret_access_key = env.var(AWS_SECRET_ACCESS_KEY);
        }
        if self.session_token.is_none() {
            self.session_token = env.var(AWS_SESSION_TOKEN).filter(|v| !v.is_empty());
        }

        self
    }

    /// Validate the loaded values into a credential.
    ///
    /// Access key ids must be 16 to 128 characters long.
    pub fn credential(&self) -> Result<Credential> {
        let (Some(ak), Some(sk)) = (&self.access_key_id, &self.secret_access_key) else {
            return Err(Error::credential_invalid(
                "access key id and secret access key are required",
            ));
        };

        let len = ak.chars().count();
        if !(16..=128).contains(&len) {
            return Err(Error::credential_invalid(format!(
                "access key id must be 16 to 128 characters, got {len}"
            )));
        }

        let cred = Credential::new(ak, sk)?;
        Ok(match &self.session_token {
            Some(token) => cred.with_session_token(token),
            None => cred,
        })
    }

    /// Validate the loaded values into a signer config for `service`.
    pub fn signer_config(&self, service: &str) -> Result<SignerConfig> {
        let region = self
            .region
            .as_deref()
            .ok_or_else(|| Error::config_invalid("region is required"))?;
        let cred = self.credential()?;

        Ok(match service {
            "s3" => SignerConfig::s3(region, cred),
            _ => SignerConfig::new(service, region, cred),
        })
    }
}
