use anyhow::Result;
use awsign_aws_v4::{Config, RequestSigner, SigningOptions};
use awsign_core::{OsEnv, SignableRequest};
use http::{HeaderValue, Method};
use reqwest::Client;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    // Configure AWS credentials
    let mut config = Config::default().from_env(&OsEnv);
    config.region = Some("us-east-1".to_string());

    let signer = match config.signer_config("dynamodb") {
        Ok(sc) => RequestSigner::new(sc),
        Err(err) => {
            println!("AWS credentials are not configured: {err}");
            return Ok(());
        }
    };

    // Example 1: List tables
    println!("Example 1: Listing DynamoDB tables");

    let mut req = SignableRequest::new(
        Method::POST,
        "https://dynamodb.us-east-1.amazonaws.com",
        "/",
    )
    .with_body("{}");
    req.headers.insert(
        "content-type",
        HeaderValue::from_static("application/x-amz-json-1.0"),
    );
    req.headers.insert(
        "x-amz-target",
        HeaderValue::from_static("DynamoDB_20120810.ListTables"),
    );

    let signed = signer.sign(req, &SigningOptions::new())?;
    println!("ListTables request signed successfully!");

    let resp = Client::new()
        .request(signed.request.method, &signed.url)
        .headers(signed.request.headers)
        .body("{}")
        .send()
        .await?;
    println!("Response status: {}", resp.status());
    println!("Response body: {}", resp.text().await?);

    Ok(())
}
