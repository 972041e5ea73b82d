mod common;

use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde_json::{json, Value};

// 1x1 transparent PNG
const PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52, 0x00, 0x00, 0x00,
    0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49,
    0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00, 0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00,
    0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

fn avatar(filename: &str, mime: &str) -> Result<Form> {
    Ok(Form::new().part("avatar", Part::bytes(PNG.to_vec()).file_name(filename.to_string()).mime_str(mime)?))
}

#[tokio::test]
async fn profile_edits_keep_blank_fields() -> Result<()> {
    if !common::database_configured() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let fixture = common::Fixture::create()?;
    let client = reqwest::Client::new();

    let res = client
        .put(server.url("/api/profile"))
        .bearer_auth(&fixture.employee)
        .json(&json!({ "full_name": "Dana Field", "phone_number": "+84 90 000 0000" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .put(server.url("/api/profile"))
        .bearer_auth(&fixture.employee)
        .json(&json!({ "full_name": "Dana R. Field", "phone_number": " " }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let profile: Value = client
        .get(server.url("/api/profile"))
        .bearer_auth(&fixture.employee)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(profile["data"]["full_name"], "Dana R. Field");
    assert_eq!(profile["data"]["phone_number"], "+84 90 000 0000");
    assert_eq!(profile["data"]["email"], fixture.email("employee").as_str());
    Ok(())
}

#[tokio::test]
async fn new_avatar_replaces_the_old_one() -> Result<()> {
    if !common::database_configured() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let fixture = common::Fixture::create()?;
    let client = reqwest::Client::new();
    let avatar_url = server.url("/api/profile/avatar");

    let res = client
        .post(&avatar_url)
        .bearer_auth(&fixture.employee)
        .multipart(avatar("notes.txt", "text/plain")?)
        .send()
        .await?;
    assert_eq!(common::error_message(res, StatusCode::BAD_REQUEST).await?, "File must be an image");

    let mut urls = Vec::new();
    for _ in 0..2 {
        let res = client
            .post(&avatar_url)
            .bearer_auth(&fixture.employee)
            .multipart(avatar("me.png", "image/png")?)
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::OK);
        let profile: Value = res.json().await?;
        urls.push(profile["data"]["avatar"].as_str().context("avatar")?.to_string());
    }
    assert_ne!(urls[0], urls[1]);

    let res = client
        .get(server.url(&format!("/api/images{}", urls[0])))
        .bearer_auth(&fixture.employee)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .get(server.url(&format!("/api/images{}", urls[1])))
        .bearer_auth(&fixture.employee)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}
