use anyhow::Context;
use clap::Subcommand;
use serde_json::json;

use super::tenant_pool;
use crate::cli::utils::{output_empty_collection, output_json, output_success};
use crate::cli::OutputFormat;
use crate::database::models::Role;
use crate::services::{NewUser, UserService};
use crate::types::Pagination;

const LIST_LIMIT: u32 = 1000;

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "List users in a tenant")]
    List {
        #[arg(long, help = "Tenant name")]
        tenant: String,

        #[arg(long, help = "Only users with this role")]
        role: Option<String>,
    },

    #[command(about = "Add a user to a tenant")]
    Add {
        #[arg(long, help = "Tenant name")]
        tenant: String,

        #[arg(long, help = "Email address used for Google sign-in")]
        email: String,

        #[arg(long, help = "Full name")]
        name: String,

        #[arg(long, default_value = "employee", help = "employee, manager, leader or assistant_director")]
        role: String,
    },

    #[command(about = "Change a user's role")]
    Role {
        #[arg(long, help = "Tenant name")]
        tenant: String,

        #[arg(long, help = "User email")]
        email: String,

        #[arg(long, help = "employee, manager, leader or assistant_director")]
        role: String,
    },
}

fn parse_role(raw: &str) -> anyhow::Result<Role> {
    raw.trim()
        .parse::<Role>()
        .with_context(|| format!("Invalid role '{}'", raw))
}

pub async fn handle(cmd: UserCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        UserCommands::List { tenant, role } => {
            let role = role.as_deref().map(parse_role).transpose()?;
            let users = UserService::new(tenant_pool(&tenant).await?);
            let (users, total) = users
                .list(role, Pagination::new(None, None, LIST_LIMIT, LIST_LIMIT))
                .await?;

            if users.is_empty() {
                return output_empty_collection(&output_format, "users", "No users found");
            }

            match output_format {
                OutputFormat::Json => output_json("users", &users)?,
                OutputFormat::Text => {
                    println!("{:<38} {:<32} {:<20} {}", "ID", "EMAIL", "ROLE", "NAME");
                    println!("{}", "-".repeat(110));
                    for user in &users {
                        println!("{:<38} {:<32} {:<20} {}", user.id, user.email, user.role, user.full_name);
                    }
                    if total > users.len() as i64 {
                        println!("... {} more", total - users.len() as i64);
                    }
                }
            }
            Ok(())
        }
        UserCommands::Add { tenant, email, name, role } => {
            let role = parse_role(&role)?;
            let users = UserService::new(tenant_pool(&tenant).await?);

            if users.find_by_email_any(email.trim()).await?.is_some() {
                anyhow::bail!("User '{}' already exists in tenant '{}'", email.trim(), tenant);
            }

            let user = users
                .create(NewUser {
                    full_name: name.trim().to_string(),
                    email: email.trim().to_string(),
                    role,
                    ..Default::default()
                })
                .await?;

            output_success(
                &output_format,
                &format!("Added {} as {} in tenant '{}'", user.email, user.role, tenant),
                Some(json!({ "user": user })),
            )
        }
        UserCommands::Role { tenant, email, role } => {
            let role = parse_role(&role)?;
            let users = UserService::new(tenant_pool(&tenant).await?);

            let user = users
                .find_by_email(email.trim())
                .await?
                .ok_or_else(|| anyhow::anyhow!("User '{}' not found in tenant '{}'", email.trim(), tenant))?;
            let user = users.update_role(user.id, role).await?;

            output_success(
                &output_format,
                &format!("{} is now {}", user.email, user.role),
                Some(json!({ "user": user })),
            )
        }
    }
}
