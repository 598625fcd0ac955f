mod common;

use anyhow::Result;
use reqwest::StatusCode;

#[tokio::test]
async fn upload_rejects_missing_file_name() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/upload/some-token", server.base_url))
        .json(&serde_json::json!({ "file_name": "   " }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}
