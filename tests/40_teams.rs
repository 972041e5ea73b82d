mod common;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn manager_team_membership() -> Result<()> {
    if !common::database_configured() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let fixture = common::Fixture::create()?;
    let client = reqwest::Client::new();
    let add_url = server.url("/api/teams/add-employee");

    let res = client
        .post(&add_url)
        .bearer_auth(&fixture.manager)
        .json(&json!({ "email": format!("nobody@{}.test", fixture.tenant) }))
        .send()
        .await?;
    assert_eq!(common::error_message(res, StatusCode::NOT_FOUND).await?, "User not found");

    let res = client
        .post(&add_url)
        .bearer_auth(&fixture.manager)
        .json(&json!({ "email": fixture.email("manager") }))
        .send()
        .await?;
    assert_eq!(
        common::error_message(res, StatusCode::BAD_REQUEST).await?,
        "Cannot add yourself to your team"
    );

    let res = client
        .post(&add_url)
        .bearer_auth(&fixture.manager)
        .json(&json!({ "email": fixture.email("employee") }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .post(&add_url)
        .bearer_auth(&fixture.manager)
        .json(&json!({ "email": fixture.email("employee") }))
        .send()
        .await?;
    assert_eq!(
        common::error_message(res, StatusCode::BAD_REQUEST).await?,
        "Employee already in your team"
    );

    let team: Value = client
        .get(server.url("/api/teams/my-team"))
        .bearer_auth(&fixture.manager)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(team["data"]["total_employees"], 1);

    // Employees have no team of their own
    let res = client
        .get(server.url("/api/teams/my-team"))
        .bearer_auth(&fixture.employee)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let employee_id = common::user_id(server, &fixture.employee).await?;
    let remove_url = server.url(&format!("/api/teams/remove-employee/{}", employee_id));
    let res = client.delete(&remove_url).bearer_auth(&fixture.manager).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = client.delete(&remove_url).bearer_auth(&fixture.manager).send().await?;
    assert_eq!(
        common::error_message(res, StatusCode::NOT_FOUND).await?,
        "Employee not found in your team"
    );
    Ok(())
}

#[tokio::test]
async fn department_lifecycle() -> Result<()> {
    if !common::database_configured() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let fixture = common::Fixture::create()?;
    let client = reqwest::Client::new();
    let manager_id = common::user_id(server, &fixture.manager).await?;
    let employee_id = common::user_id(server, &fixture.employee).await?;

    // Leader-only
    let res = client
        .post(server.url("/api/teams"))
        .bearer_auth(&fixture.manager)
        .json(&json!({ "name": "Field Ops" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .post(server.url("/api/teams"))
        .bearer_auth(&fixture.leader)
        .json(&json!({ "name": "  " }))
        .send()
        .await?;
    assert_eq!(common::error_message(res, StatusCode::BAD_REQUEST).await?, "name is required");

    let res = client
        .post(server.url("/api/teams"))
        .bearer_auth(&fixture.leader)
        .json(&json!({ "name": "Field Ops", "manager_id": employee_id }))
        .send()
        .await?;
    assert_eq!(common::error_message(res, StatusCode::BAD_REQUEST).await?, "User is not a manager");

    let res = client
        .post(server.url("/api/teams"))
        .bearer_auth(&fixture.leader)
        .json(&json!({ "name": "Field Ops", "description": "Outdoor crews", "manager_id": manager_id }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await?;
    assert_eq!(created["data"]["manager"]["id"], manager_id.as_str());
    let team_id = created["data"]["id"].as_str().context("team id")?.to_string();
    let team_url = server.url(&format!("/api/teams/{}", team_id));

    let res = client
        .put(&team_url)
        .bearer_auth(&fixture.leader)
        .json(&json!({ "name": "Field Operations", "description": "" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = res.json().await?;
    assert_eq!(updated["data"]["name"], "Field Operations");
    assert_eq!(updated["data"]["description"], "Outdoor crews");

    // Membership goes through the department's manager
    let add_url = server.url(&format!("/api/teams/{}/add-employee", team_id));
    let res = client
        .post(&add_url)
        .bearer_auth(&fixture.leader)
        .json(&json!({ "email": fixture.email("manager") }))
        .send()
        .await?;
    assert_eq!(
        common::error_message(res, StatusCode::BAD_REQUEST).await?,
        "Cannot add the manager as an employee"
    );

    let res = client
        .post(&add_url)
        .bearer_auth(&fixture.leader)
        .json(&json!({ "email": fixture.email("employee") }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .post(&add_url)
        .bearer_auth(&fixture.leader)
        .json(&json!({ "email": fixture.email("employee") }))
        .send()
        .await?;
    assert_eq!(
        common::error_message(res, StatusCode::BAD_REQUEST).await?,
        "Employee already in this team"
    );

    let detail: Value = client.get(&team_url).bearer_auth(&fixture.leader).send().await?.json().await?;
    assert_eq!(detail["data"]["total_employees"], 1);

    let remove_url = server.url(&format!("/api/teams/{}/remove-employee/{}", team_id, employee_id));
    let res = client.delete(&remove_url).bearer_auth(&fixture.leader).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let res = client.delete(&remove_url).bearer_auth(&fixture.leader).send().await?;
    assert_eq!(
        common::error_message(res, StatusCode::NOT_FOUND).await?,
        "Employee not found in this team"
    );

    // A department without a manager cannot take employees
    let res = client
        .post(server.url("/api/teams"))
        .bearer_auth(&fixture.leader)
        .json(&json!({ "name": "Unstaffed" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let unstaffed: Value = res.json().await?;
    let unstaffed_id = unstaffed["data"]["id"].as_str().context("team id")?;
    let res = client
        .post(server.url(&format!("/api/teams/{}/add-employee", unstaffed_id)))
        .bearer_auth(&fixture.leader)
        .json(&json!({ "email": fixture.email("employee") }))
        .send()
        .await?;
    assert_eq!(
        common::error_message(res, StatusCode::BAD_REQUEST).await?,
        "Team has no manager assigned"
    );

    let res = client
        .post(server.url(&format!("/api/teams/{}/assign-manager", unstaffed_id)))
        .bearer_auth(&fixture.leader)
        .json(&json!({ "manager_id": employee_id }))
        .send()
        .await?;
    assert_eq!(common::error_message(res, StatusCode::BAD_REQUEST).await?, "User is not a manager");

    let res = client.delete(&team_url).bearer_auth(&fixture.leader).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let res = client.get(&team_url).bearer_auth(&fixture.leader).send().await?;
    assert_eq!(common::error_message(res, StatusCode::NOT_FOUND).await?, "Team not found");
    Ok(())
}

#[tokio::test]
async fn leaders_manage_roles_of_others() -> Result<()> {
    if !common::database_configured() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let fixture = common::Fixture::create()?;
    let client = reqwest::Client::new();
    let leader_id = common::user_id(server, &fixture.leader).await?;
    let employee_id = common::user_id(server, &fixture.employee).await?;

    let res = client
        .put(server.url(&format!("/api/teams/users/{}/role", leader_id)))
        .bearer_auth(&fixture.leader)
        .json(&json!({ "role": "employee" }))
        .send()
        .await?;
    assert_eq!(
        common::error_message(res, StatusCode::BAD_REQUEST).await?,
        "Cannot change your own role"
    );

    let role_url = server.url(&format!("/api/teams/users/{}/role", employee_id));
    let res = client
        .put(&role_url)
        .bearer_auth(&fixture.leader)
        .json(&json!({ "role": "Manager" }))
        .send()
        .await?;
    assert_eq!(common::error_message(res, StatusCode::BAD_REQUEST).await?, "Invalid role");

    let res = client
        .put(&role_url)
        .bearer_auth(&fixture.leader)
        .json(&json!({ "role": "manager" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["role"], "manager");
    Ok(())
}

#[tokio::test]
async fn deleted_employees_leave_team_counts() -> Result<()> {
    if !common::database_configured() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let fixture = common::Fixture::create()?;
    let client = reqwest::Client::new();
    let manager_id = common::user_id(server, &fixture.manager).await?;

    let res = client
        .post(server.url("/api/teams"))
        .bearer_auth(&fixture.leader)
        .json(&json!({ "name": "Night Shift", "manager_id": manager_id }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let departed = format!("departed@{}.test", fixture.tenant);
    common::officectl(&[
        "user", "add", "--tenant", &fixture.tenant, "--email", &departed, "--name", "departed", "--role", "employee",
    ])?;
    for email in [fixture.email("employee"), departed.clone()] {
        let res = client
            .post(server.url("/api/teams/add-employee"))
            .bearer_auth(&fixture.manager)
            .json(&json!({ "email": email }))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    // Accounts are soft-deleted outside the API; memberships are left in place
    let pool = common::tenant_pool(&fixture.tenant).await?;
    sqlx::query("UPDATE users SET deleted_at = now() WHERE email = $1")
        .bind(&departed)
        .execute(&pool)
        .await?;

    let team: Value = client
        .get(server.url("/api/teams/my-team"))
        .bearer_auth(&fixture.manager)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(team["data"]["total_employees"], 1);

    let stats: Value = client
        .get(server.url("/api/dashboard/teams-stats"))
        .bearer_auth(&fixture.leader)
        .send()
        .await?
        .json()
        .await?;
    let night_shift = stats["data"]["teams"]
        .as_array()
        .context("teams")?
        .iter()
        .find(|t| t["team_name"] == "Night Shift")
        .context("Night Shift stats")?;
    assert_eq!(night_shift["total_employees"], team["data"]["total_employees"]);
    Ok(())
}
