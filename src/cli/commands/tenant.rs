use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{output_empty_collection, output_json, output_success};
use crate::cli::OutputFormat;
use crate::database::schema;
use crate::services::TenantService;

#[derive(Subcommand)]
pub enum TenantCommands {
    #[command(about = "Create a tenant database and register it")]
    Create {
        #[arg(help = "Tenant name")]
        name: String,
    },

    #[command(about = "List active tenants")]
    List,

    #[command(about = "Show tenant information")]
    Show {
        #[arg(help = "Tenant name")]
        name: String,
    },
}

pub async fn handle(cmd: TenantCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    schema::ensure_main_schema().await?;
    let service = TenantService::new().await?;

    match cmd {
        TenantCommands::Create { name } => {
            let tenant = service.create_tenant(name.trim()).await?;
            output_success(
                &output_format,
                &format!("Created tenant '{}' ({})", tenant.name, tenant.database),
                Some(json!({ "tenant": tenant })),
            )
        }
        TenantCommands::List => {
            let tenants = service.list_tenants().await?;

            if tenants.is_empty() {
                return output_empty_collection(&output_format, "tenants", "No tenants registered");
            }

            match output_format {
                OutputFormat::Json => output_json("tenants", &tenants)?,
                OutputFormat::Text => {
                    println!("{:<20} {:<30} {:<8} {}", "NAME", "DATABASE", "ACTIVE", "CREATED");
                    println!("{}", "-".repeat(80));
                    for tenant in &tenants {
                        println!(
                            "{:<20} {:<30} {:<8} {}",
                            tenant.name,
                            tenant.database,
                            tenant.is_active,
                            tenant.created_at.format("%Y-%m-%d %H:%M")
                        );
                    }
                }
            }
            Ok(())
        }
        TenantCommands::Show { name } => {
            let tenant = service
                .get_tenant(&name)
                .await?
                .ok_or_else(|| anyhow::anyhow!("Tenant '{}' not found", name))?;

            match output_format {
                OutputFormat::Json => output_json("tenant", &tenant)?,
                OutputFormat::Text => {
                    println!("Name:     {}", tenant.name);
                    println!("Database: {}", tenant.database);
                    println!("Active:   {}", tenant.is_active);
                    println!("Created:  {}", tenant.created_at.format("%Y-%m-%d %H:%M"));
                }
            }
            Ok(())
        }
    }
}
