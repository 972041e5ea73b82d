use serde_json::json;

use super::tenant_pool;
use crate::auth::{generate_jwt, Claims};
use crate::cli::OutputFormat;
use crate::services::{TenantService, UserService};

/// Mint an access token without going through Google
pub async fn handle(tenant: &str, email: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let registered = TenantService::new()
        .await?
        .get_tenant(tenant)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Tenant '{}' not found", tenant))?;

    let users = UserService::new(tenant_pool(tenant).await?);
    let user = users
        .find_by_email(email.trim())
        .await?
        .ok_or_else(|| anyhow::anyhow!("User '{}' not found in tenant '{}'", email.trim(), tenant))?;

    let token = generate_jwt(Claims::new(registered.name, registered.database, user.id, user.email.clone()))?;

    match output_format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "success": true,
                "access_token": token,
                "user_id": user.id,
                "role": user.role,
            }))?
        ),
        OutputFormat::Text => println!("{}", token),
    }
    Ok(())
}
