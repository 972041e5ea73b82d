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

fn form(content: &str) -> Result<Form> {
    let photo = Part::bytes(PNG.to_vec()).file_name("site.png").mime_str("image/png")?;
    Ok(Form::new()
        .text("date", "2026-10-01")
        .text("start_time", "08:00")
        .text("end_time", "17:30")
        .text("content", content.to_string())
        .part("photos", photo))
}

#[tokio::test]
async fn approval_chain_end_to_end() -> Result<()> {
    if !common::database_configured() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let fixture = common::Fixture::create()?;
    let client = reqwest::Client::new();

    // Manager adopts the employee
    let res = client
        .post(server.url("/api/teams/add-employee"))
        .bearer_auth(&fixture.manager)
        .json(&json!({ "email": fixture.email("employee") }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    // Employee submits
    let res = client
        .post(server.url("/api/work-confirmations"))
        .bearer_auth(&fixture.employee)
        .multipart(form("Installed the east wing cameras")?)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await?;
    let id = created["data"]["id"].as_str().context("id")?.to_string();
    assert_eq!(created["data"]["status"], "pending_manager");
    assert_eq!(created["data"]["photos"].as_array().map(Vec::len), Some(1));

    // Leader cannot skip the manager stage
    let res = client
        .post(server.url(&format!("/api/work-confirmations/{}/approve", id)))
        .bearer_auth(&fixture.leader)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Manager approves without a body
    let res = client
        .post(server.url(&format!("/api/work-confirmations/{}/approve", id)))
        .bearer_auth(&fixture.manager)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["status"], "pending_leader");

    // Leader approves with a comment
    let res = client
        .post(server.url(&format!("/api/work-confirmations/{}/approve", id)))
        .bearer_auth(&fixture.leader)
        .json(&json!({ "comment": "Looks good" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["status"], "approved");
    assert_eq!(body["data"]["leader_approval"]["comment"], "Looks good");

    // Terminal state
    let res = client
        .post(server.url(&format!("/api/work-confirmations/{}/reject", id)))
        .bearer_auth(&fixture.leader)
        .json(&json!({ "reason": "Too late" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Photo is served back under the tenant prefix
    let url = body["data"]["photos"][0]["url"].as_str().context("photo url")?;
    let res = client
        .get(server.url(&format!("/api/images{}", url)))
        .bearer_auth(&fixture.employee)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["content-type"], "image/png");
    Ok(())
}

#[tokio::test]
async fn visibility_and_validation() -> Result<()> {
    if !common::database_configured() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let fixture = common::Fixture::create()?;
    let client = reqwest::Client::new();

    // Missing photos
    let res = client
        .post(server.url("/api/work-confirmations"))
        .bearer_auth(&fixture.employee)
        .multipart(
            Form::new()
                .text("date", "2026-10-01")
                .text("start_time", "08:00")
                .text("end_time", "17:30")
                .text("content", "No evidence"),
        )
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Manager's own form skips to the leader
    let res = client
        .post(server.url("/api/work-confirmations"))
        .bearer_auth(&fixture.manager)
        .multipart(form("Quarterly audit")?)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await?;
    assert_eq!(created["data"]["status"], "pending_leader");
    let id = created["data"]["id"].as_str().context("id")?.to_string();

    // The employee is not on the manager's team and cannot see it
    let res = client
        .get(server.url(&format!("/api/work-confirmations/{}", id)))
        .bearer_auth(&fixture.employee)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let list: Value = client
        .get(server.url("/api/work-confirmations"))
        .bearer_auth(&fixture.employee)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(list["data"]["total"], 0);

    // Leaders see everything
    let list: Value = client
        .get(server.url("/api/work-confirmations?status=pending_leader"))
        .bearer_auth(&fixture.leader)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(list["data"]["total"], 1);

    let res = client
        .get(server.url("/api/work-confirmations?status=bogus"))
        .bearer_auth(&fixture.leader)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Dashboard is leader-only
    let res = client
        .get(server.url("/api/dashboard/stats"))
        .bearer_auth(&fixture.manager)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let stats: Value = client
        .get(server.url("/api/dashboard/stats"))
        .bearer_auth(&fixture.leader)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(stats["data"]["work_confirmations"]["total"], 1);
    Ok(())
}

async fn submit(client: &reqwest::Client, server: &common::TestServer, token: &str) -> Result<String> {
    let res = client
        .post(server.url("/api/work-confirmations"))
        .bearer_auth(token)
        .multipart(form("Rewired the loading dock")?)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await?;
    Ok(created["data"]["id"].as_str().context("id")?.to_string())
}

async fn adopt_employee(client: &reqwest::Client, server: &common::TestServer, fixture: &common::Fixture) -> Result<()> {
    let res = client
        .post(server.url("/api/teams/add-employee"))
        .bearer_auth(&fixture.manager)
        .json(&json!({ "email": fixture.email("employee") }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    Ok(())
}

#[tokio::test]
async fn racing_decisions_settle_once() -> Result<()> {
    if !common::database_configured() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let fixture = common::Fixture::create()?;
    let client = reqwest::Client::new();
    adopt_employee(&client, server, &fixture).await?;
    let id = submit(&client, server, &fixture.employee).await?;

    // Eight approvals from the same manager; only one may move the form
    let approve_url = server.url(&format!("/api/work-confirmations/{}/approve", id));
    let attempts = (0..8).map(|_| client.post(&approve_url).bearer_auth(&fixture.manager).send());
    let statuses: Vec<StatusCode> = futures::future::join_all(attempts)
        .await
        .into_iter()
        .map(|res| res.map(|r| r.status()))
        .collect::<Result<_, _>>()?;

    assert_eq!(statuses.iter().filter(|s| **s == StatusCode::OK).count(), 1, "{:?}", statuses);
    // Losers either saw the old status and lost the write (409) or read the new one (403)
    assert!(
        statuses
            .iter()
            .all(|s| matches!(*s, StatusCode::OK | StatusCode::CONFLICT | StatusCode::FORBIDDEN)),
        "{:?}",
        statuses
    );

    // Leader approve and reject at once; exactly one lands
    let approve = client
        .post(&approve_url)
        .bearer_auth(&fixture.leader)
        .json(&json!({ "comment": "ok" }))
        .send();
    let reject = client
        .post(server.url(&format!("/api/work-confirmations/{}/reject", id)))
        .bearer_auth(&fixture.leader)
        .json(&json!({ "reason": "Missing signature" }))
        .send();
    let (approved, rejected) = tokio::join!(approve, reject);
    let (approved, rejected) = (approved?.status(), rejected?.status());
    assert!(
        matches!(
            (approved, rejected),
            (StatusCode::OK, StatusCode::CONFLICT | StatusCode::BAD_REQUEST)
                | (StatusCode::CONFLICT | StatusCode::BAD_REQUEST, StatusCode::OK)
        ),
        "approve {} reject {}",
        approved,
        rejected
    );

    let current: Value = client
        .get(server.url(&format!("/api/work-confirmations/{}", id)))
        .bearer_auth(&fixture.leader)
        .send()
        .await?
        .json()
        .await?;
    let expected = if approved == StatusCode::OK { "approved" } else { "rejected" };
    assert_eq!(current["data"]["status"], expected);
    Ok(())
}

#[tokio::test]
async fn decision_on_a_moved_record_is_a_conflict() -> Result<()> {
    use office_api::database::models::{Approval, WorkConfirmationStatus};
    use office_api::services::WorkConfirmationService;
    use office_api::workflow::{Stage, WorkflowError};

    if !common::database_configured() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let fixture = common::Fixture::create()?;
    let client = reqwest::Client::new();
    adopt_employee(&client, server, &fixture).await?;
    let id = submit(&client, server, &fixture.employee).await?;

    let res = client
        .post(server.url(&format!("/api/work-confirmations/{}/approve", id)))
        .bearer_auth(&fixture.manager)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    // A second manager decision planned against the status read before the first one landed
    let service = WorkConfirmationService::new(common::tenant_pool(&fixture.tenant).await?);
    let approval = Approval {
        approved_by: uuid::Uuid::parse_str(&common::user_id(server, &fixture.manager).await?)?,
        approved_at: chrono::Utc::now(),
        comment: String::new(),
    };
    let stale = service
        .approve(
            uuid::Uuid::parse_str(&id)?,
            Stage::ManagerReview,
            WorkConfirmationStatus::PendingManager,
            WorkConfirmationStatus::PendingLeader,
            approval,
        )
        .await?;
    assert!(stale.is_none());

    let err = office_api::error::ApiError::from(WorkflowError::StaleStatus);
    assert_eq!(err.status_code(), 409);

    // The earlier approval is untouched
    let current = service.find(uuid::Uuid::parse_str(&id)?).await?.context("record")?;
    assert_eq!(current.status, WorkConfirmationStatus::PendingLeader);
    Ok(())
}

#[tokio::test]
async fn managers_only_decide_for_their_team() -> Result<()> {
    if !common::database_configured() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let fixture = common::Fixture::create()?;
    let client = reqwest::Client::new();

    // The employee was never added to the manager's team
    let id = submit(&client, server, &fixture.employee).await?;

    let res = client
        .post(server.url(&format!("/api/work-confirmations/{}/approve", id)))
        .bearer_auth(&fixture.manager)
        .send()
        .await?;
    let message = common::error_message(res, StatusCode::FORBIDDEN).await?;
    assert!(message.contains("team"), "{}", message);

    let res = client
        .post(server.url(&format!("/api/work-confirmations/{}/reject", id)))
        .bearer_auth(&fixture.manager)
        .json(&json!({ "reason": "Not mine" }))
        .send()
        .await?;
    common::error_message(res, StatusCode::FORBIDDEN).await?;

    let current: Value = client
        .get(server.url(&format!("/api/work-confirmations/{}", id)))
        .bearer_auth(&fixture.employee)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(current["data"]["status"], "pending_manager");
    Ok(())
}

#[tokio::test]
async fn rejection_needs_a_reason() -> Result<()> {
    if !common::database_configured() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let fixture = common::Fixture::create()?;
    let client = reqwest::Client::new();
    adopt_employee(&client, server, &fixture).await?;
    let id = submit(&client, server, &fixture.employee).await?;
    let reject_url = server.url(&format!("/api/work-confirmations/{}/reject", id));

    for body in [json!({ "reason": "   " }), json!({})] {
        let res = client.post(&reject_url).bearer_auth(&fixture.manager).json(&body).send().await?;
        assert_eq!(common::error_message(res, StatusCode::BAD_REQUEST).await?, "Reason is required");
    }

    let res = client
        .post(&reject_url)
        .bearer_auth(&fixture.manager)
        .json(&json!({ "reason": "Photo is blurry" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["status"], "rejected");
    assert_eq!(body["data"]["rejection"]["reason"], "Photo is blurry");
    Ok(())
}

#[tokio::test]
async fn only_the_creator_edits_pending_forms() -> Result<()> {
    if !common::database_configured() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let fixture = common::Fixture::create()?;
    let client = reqwest::Client::new();
    adopt_employee(&client, server, &fixture).await?;
    let id = submit(&client, server, &fixture.employee).await?;
    let url = server.url(&format!("/api/work-confirmations/{}", id));

    let res = client
        .put(&url)
        .bearer_auth(&fixture.manager)
        .multipart(Form::new().text("content", "Hijacked"))
        .send()
        .await?;
    assert_eq!(common::error_message(res, StatusCode::FORBIDDEN).await?, "Only creator can update");

    // A lone end_time is checked against the stored 08:00 start
    let res = client
        .put(&url)
        .bearer_auth(&fixture.employee)
        .multipart(Form::new().text("end_time", "07:00"))
        .send()
        .await?;
    assert_eq!(
        common::error_message(res, StatusCode::BAD_REQUEST).await?,
        "End time must be after start time"
    );

    let res = client
        .put(&url)
        .bearer_auth(&fixture.employee)
        .multipart(Form::new().text("content", "Rewired the loading dock and gate").text("end_time", "18:00"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["content"], "Rewired the loading dock and gate");
    assert_eq!(body["data"]["start_time"], "08:00");
    assert_eq!(body["data"]["end_time"], "18:00");

    let res = client
        .post(server.url(&format!("/api/work-confirmations/{}/reject", id)))
        .bearer_auth(&fixture.manager)
        .json(&json!({ "reason": "Wrong site" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .put(&url)
        .bearer_auth(&fixture.employee)
        .multipart(Form::new().text("content", "Second try"))
        .send()
        .await?;
    assert_eq!(
        common::error_message(res, StatusCode::BAD_REQUEST).await?,
        "Can only update pending work confirmations"
    );
    Ok(())
}

#[tokio::test]
async fn same_named_photos_stay_separate() -> Result<()> {
    if !common::database_configured() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let fixture = common::Fixture::create()?;
    let client = reqwest::Client::new();

    let first = PNG.to_vec();
    let mut second = PNG.to_vec();
    second.extend_from_slice(b"second");

    let form = Form::new()
        .text("date", "2026-10-02")
        .text("start_time", "09:00")
        .text("end_time", "12:00")
        .text("content", "Two angles of the same panel")
        .part("photos", Part::bytes(first.clone()).file_name("image.png").mime_str("image/png")?)
        .part("photos", Part::bytes(second.clone()).file_name("image.png").mime_str("image/png")?);
    let res = client
        .post(server.url("/api/work-confirmations"))
        .bearer_auth(&fixture.employee)
        .multipart(form)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await?;

    let urls: Vec<String> = created["data"]["photos"]
        .as_array()
        .context("photos")?
        .iter()
        .filter_map(|p| p["url"].as_str().map(str::to_string))
        .collect();
    assert_eq!(urls.len(), 2);
    assert_ne!(urls[0], urls[1]);

    for (url, expected) in urls.iter().zip([first, second]) {
        let res = client
            .get(server.url(&format!("/api/images{}", url)))
            .bearer_auth(&fixture.employee)
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.bytes().await?.as_ref(), expected.as_slice());
    }
    Ok(())
}

#[tokio::test]
async fn bad_paging_gets_the_error_envelope() -> Result<()> {
    if !common::database_configured() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let fixture = common::Fixture::create()?;

    let res = reqwest::Client::new()
        .get(server.url("/api/work-confirmations?page=abc"))
        .bearer_auth(&fixture.employee)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["error"], true);
    assert_eq!(body["code"], "BAD_REQUEST");
    Ok(())
}
