mod presigned;
mod special_chars;
mod standard;

use std::env;

use anyhow::Result;
use awsign_aws_v4::{Config, RequestSigner};
use awsign_core::{Body, SignableRequest, SignedRequest};
use bytes::Bytes;
use http::{Method, Request, StatusCode};
use log::debug;
use reqwest::Client;

/// Initialize test environment, `None` if live tests are disabled.
pub fn init_signing_test() -> Option<(RequestSigner, String)> {
    let _ = env_logger::builder().is_test(true).try_init();
    let _ = dotenv::dotenv();

    if env::var("AWSIGN_AWS_V4_TEST").unwrap_or_default() != "on" {
        return None;
    }

    let service = env::var("AWSIGN_AWS_V4_SERVICE").unwrap_or_else(|_| "s3".to_string());
    let url = env::var("AWSIGN_AWS_V4_URL").expect("AWSIGN_AWS_V4_URL must be set");

    let config = Config {
        region: Some(env::var("AWSIGN_AWS_V4_REGION").expect("AWSIGN_AWS_V4_REGION must be set")),
        access_key_id: Some(
            env::var("AWSIGN_AWS_V4_ACCESS_KEY").expect("AWSIGN_AWS_V4_ACCESS_KEY must be set"),
        ),
        secret_access_key: Some(
            env::var("AWSIGN_AWS_V4_SECRET_KEY").expect("AWSIGN_AWS_V4_SECRET_KEY must be set"),
        ),
        session_token: env::var("AWSIGN_AWS_V4_SESSION_TOKEN").ok(),
    };
    let signer = RequestSigner::new(
        config
            .signer_config(&service)
            .expect("signer config must be valid"),
    );

    Some((signer, url))
}

/// Build a signable request for `uri`.
pub fn build_request(method: Method, uri: &str, body: &str) -> Result<SignableRequest> {
    let mut req = Request::new(body.to_string());
    *req.method_mut() = method;
    *req.uri_mut() = uri.parse()?;

    let (parts, body) = req.into_parts();
    Ok(SignableRequest::from_parts(&parts, body)?)
}

/// Send signed request and return response
pub async fn send_signed_request(signed: SignedRequest) -> Result<(StatusCode, String)> {
    debug!("signed request: {signed:?}");

    let body = match &signed.request.body {
        Body::Bytes(bs) => bs.clone(),
        Body::Empty | Body::Streaming => Bytes::new(),
    };
    let resp = Client::new()
        .request(signed.request.method, &signed.url)
        .headers(signed.request.headers)
        .body(body)
        .send()
        .await?;

    let status = resp.status();
    let body = resp.text().await?;

    debug!("response status: {status}, body: {body}");
    Ok((status, body))
}
