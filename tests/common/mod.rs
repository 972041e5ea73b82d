#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::{Mutex, OnceLock};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::Value;

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let storage_root = std::env::temp_dir().join(format!("office-api-test-{}", port));

        let mut cmd = Command::new(env!("CARGO_BIN_EXE_office-api"));
        cmd.env("OFFICE_API_PORT", port.to_string())
            .env("STORAGE_ROOT", storage_root)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Inherit environment so the server can see DATABASE_URL from .env (loaded by the server)
        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                // Up, with or without a database behind it
                if resp.status() == StatusCode::OK || resp.status() == StatusCode::SERVICE_UNAVAILABLE {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// True when a database is configured for the flows that need one
pub fn database_configured() -> bool {
    let _ = dotenvy::dotenv();
    std::env::var("DATABASE_URL").map(|v| !v.trim().is_empty()).unwrap_or(false)
}

static MIGRATED: Mutex<bool> = Mutex::new(false);

fn migrate_once() -> Result<()> {
    let mut done = MIGRATED.lock().map_err(|_| anyhow::anyhow!("migration lock poisoned"))?;
    if !*done {
        officectl(&["migrate"])?;
        *done = true;
    }
    Ok(())
}

/// Run `officectl --json <args>` and parse its stdout
pub fn officectl(args: &[&str]) -> Result<Value> {
    let output = Command::new(env!("CARGO_BIN_EXE_officectl"))
        .arg("--json")
        .args(args)
        .output()
        .context("failed to run officectl")?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    if !output.status.success() {
        anyhow::bail!("officectl {:?} failed: {}", args, stdout);
    }
    serde_json::from_str(&stdout).with_context(|| format!("officectl {:?} printed non-JSON: {}", args, stdout))
}

/// A fresh tenant with one user per role, each holding an access token
pub struct Fixture {
    pub tenant: String,
    pub employee: String,
    pub manager: String,
    pub leader: String,
}

impl Fixture {
    pub fn create() -> Result<Self> {
        let tenant = format!("it-{}", uuid::Uuid::new_v4().simple());
        migrate_once()?;
        officectl(&["tenant", "create", &tenant])?;

        let mut tokens = Vec::new();
        for role in ["employee", "manager", "leader"] {
            let email = format!("{}@{}.test", role, tenant);
            officectl(&["user", "add", "--tenant", &tenant, "--email", &email, "--name", role, "--role", role])?;
            let token = officectl(&["token", "--tenant", &tenant, "--email", &email])?;
            let token = token["access_token"].as_str().context("token missing from officectl output")?;
            tokens.push(token.to_string());
        }

        let leader = tokens.pop().context("leader token")?;
        let manager = tokens.pop().context("manager token")?;
        let employee = tokens.pop().context("employee token")?;
        Ok(Self { tenant, employee, manager, leader })
    }

    pub fn email(&self, role: &str) -> String {
        format!("{}@{}.test", role, self.tenant)
    }
}

/// The caller's user id, read back from their profile
pub async fn user_id(server: &TestServer, token: &str) -> Result<String> {
    let profile: Value = reqwest::Client::new()
        .get(server.url("/api/profile"))
        .bearer_auth(token)
        .send()
        .await?
        .json()
        .await?;
    Ok(profile["data"]["id"].as_str().context("profile id")?.to_string())
}

/// Pool on the fixture tenant's own database, for state the API cannot reach
pub async fn tenant_pool(tenant: &str) -> Result<sqlx::PgPool> {
    let database = office_api::services::tenant_service::hash_tenant_name(tenant);
    Ok(office_api::database::DatabaseManager::tenant_pool(&database).await?)
}

/// `message` from an error envelope, checking the status on the way
pub async fn error_message(res: reqwest::Response, status: StatusCode) -> Result<String> {
    assert_eq!(res.status(), status);
    let body: Value = res.json().await?;
    assert_eq!(body["success"], false);
    Ok(body["message"].as_str().context("error message")?.to_string())
}
