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

use super::{build_request, init_signing_test, send_signed_request};
use anyhow::Result;
use awsign_aws_v4::PresignOptions;
use http::{Method, StatusCode};
use log::warn;
use std::time::Duration;

#[tokio::test]
async fn test_get_object_with_presigned_url() -> Result<()> {
    let Some((signer, url)) = init_signing_test() else {
        warn!("AWSIGN_AWS_V4_TEST is not set, skipped");
        return Ok(());
    };

    let req = build_request(Method::GET, &format!("{url}/not_exist_file"), "")?;
    let signed = signer.presign(&req, &PresignOptions::new())?;
    assert!(signed.authorization().is_none());

    let (status, _body) = send_signed_request(signed).await?;
    assert_eq!(StatusCode::NOT_FOUND, status);
    Ok(())
}

#[tokio::test]
async fn test_put_object_with_presigned_url() -> Result<()> {
    let Some((signer, url)) = init_signing_test() else {
        warn!("AWSIGN_AWS_V4_TEST is not set, skipped");
        return Ok(());
    };

    let req = build_request(Method::PUT, &format!("{url}/presigned_put_test"), "Hello, World!")?;
    let opts = PresignOptions::new().with_expires_in(Duration::from_secs(300));
    let signed = signer.presign(&req, &opts)?;
    assert_eq!(signed.query_value("X-Amz-Expires"), Some("300"));

    let (status, _body) = send_signed_request(signed).await?;
    assert_eq!(StatusCode::OK, status);
    Ok(())
}

#[tokio::test]
async fn test_presigned_url_rejects_long_expiry() -> Result<()> {
    let Some((signer, url)) = init_signing_test() else {
        warn!("AWSIGN_AWS_V4_TEST is not set, skipped");
        return Ok(());
    };

    let req = build_request(Method::GET, &format!("{url}/not_exist_file"), "")?;
    let opts = PresignOptions::new().with_expires_in(Duration::from_secs(8 * 24 * 3600));
    assert!(signer.presign(&req, &opts).is_err());
    Ok(())
}
