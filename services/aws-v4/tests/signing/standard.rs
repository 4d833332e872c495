use super::{build_request, init_signing_test, send_signed_request};
use anyhow::Result;
use awsign_aws_v4::SigningOptions;
use awsign_core::hash::hex_sha256;
use http::{HeaderValue, Method, StatusCode};
use log::warn;

#[tokio::test]
async fn test_head_object() -> Result<()> {
    let Some((signer, url)) = init_signing_test() else {
        warn!("AWSIGN_AWS_V4_TEST is not set, skipped");
        return Ok(());
    };

    let req = build_request(Method::HEAD, &format!("{url}/not_exist_file"), "")?;
    let signed = signer.sign(req, &SigningOptions::new())?;

    let (status, _body) = send_signed_request(signed).await?;
    assert_eq!(StatusCode::NOT_FOUND, status);
    Ok(())
}

#[tokio::test]
async fn test_get_object() -> Result<()> {
    let Some((signer, url)) = init_signing_test() else {
        warn!("AWSIGN_AWS_V4_TEST is not set, skipped");
        return Ok(());
    };

    let req = build_request(Method::GET, &format!("{url}/not_exist_file"), "")?;
    let signed = signer.sign(req, &SigningOptions::new())?;

    let (status, _body) = send_signed_request(signed).await?;
    assert_eq!(StatusCode::NOT_FOUND, status);
    Ok(())
}

#[tokio::test]
async fn test_put_object() -> Result<()> {
    let Some((signer, url)) = init_signing_test() else {
        warn!("AWSIGN_AWS_V4_TEST is not set, skipped");
        return Ok(());
    };

    let body = "Hello, World!";
    let mut req = build_request(Method::PUT, &format!("{url}/put_object_test"), body)?;
    req.headers.insert(
        "x-amz-content-sha256",
        HeaderValue::from_str(&hex_sha256(body.as_bytes()))?,
    );
    let signed = signer.sign(req, &SigningOptions::new())?;

    let (status, _body) = send_signed_request(signed).await?;
    assert_eq!(StatusCode::OK, status);
    Ok(())
}

#[tokio::test]
async fn test_list_bucket() -> Result<()> {
    let Some((signer, url)) = init_signing_test() else {
        warn!("AWSIGN_AWS_V4_TEST is not set, skipped");
        return Ok(());
    };

    let req = build_request(
        Method::GET,
        &format!("{url}?list-type=2&delimiter=/&encoding-type=url"),
        "",
    )?;
    let signed = signer.sign(req, &SigningOptions::new())?;

    let (status, _body) = send_signed_request(signed).await?;
    assert_eq!(StatusCode::OK, status);
    Ok(())
}
