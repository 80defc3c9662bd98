//! Admin role management commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;
use uuid::Uuid;

use catalog_core::config::AppConfig;
use catalog_core::error::AppError;
use catalog_database::RoleStore;
use catalog_database::repositories::RoleRepository;
use catalog_entity::user::UserRole;

use crate::output::{self, OutputFormat};

/// Arguments for admin commands
#[derive(Debug, Args)]
pub struct AdminArgs {
    /// Admin subcommand
    #[command(subcommand)]
    pub command: AdminCommand,
}

/// Admin subcommands
#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Grant the admin role to an identity-provider user
    Grant {
        /// User ID (the token's `sub` claim)
        user_id: Uuid,
    },
    /// Revoke a user's role
    Revoke {
        /// User ID (the token's `sub` claim)
        user_id: Uuid,
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
    /// Show a user's role
    Show {
        /// User ID (the token's `sub` claim)
        user_id: Uuid,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct RoleRow {
    user_id: Uuid,
    role: String,
}

/// Execute admin commands
pub async fn execute(
    args: &AdminArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let pool = super::create_db_pool(config).await?;
    let roles = RoleRepository::new(pool.clone());

    match &args.command {
        AdminCommand::Grant { user_id } => {
            roles.assign_role(*user_id, UserRole::Admin).await?;
            output::print_success(&format!("User {user_id} is now an admin."));
        }
        AdminCommand::Revoke { user_id, force } => {
            if !force {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt(format!("Revoke the role of user {user_id}?"))
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

                if !confirm {
                    println!("Cancelled.");
                    pool.close().await;
                    return Ok(());
                }
            }

            if roles.revoke_role(*user_id).await? {
                output::print_success(&format!("Role revoked for user {user_id}."));
            } else {
                output::print_warning(&format!("User {user_id} had no role."));
            }
        }
        AdminCommand::Show { user_id } => {
            let role = roles
                .find_role(*user_id)
                .await?
                .map(|r| r.to_string())
                .unwrap_or_else(|| "none".to_string());
            output::print_list(
                &[RoleRow {
                    user_id: *user_id,
                    role,
                }],
                format,
            );
        }
    }

    pool.close().await;
    Ok(())
}
