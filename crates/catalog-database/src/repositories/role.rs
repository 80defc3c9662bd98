//! User role repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use catalog_core::result::AppResult;
use catalog_entity::user::UserRole;

use super::map_db_error;
use crate::store::RoleStore;

/// Repository for the `user_roles` table.
#[derive(Debug, Clone)]
pub struct RoleRepository {
    pool: PgPool,
}

impl RoleRepository {
    /// Create a new role repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleStore for RoleRepository {
    async fn find_role(&self, user_id: Uuid) -> AppResult<Option<UserRole>> {
        let role: Option<String> =
            sqlx::query_scalar("SELECT role FROM user_roles WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| map_db_error(e, "Failed to find user role", None))?;

        role.map(|r| r.parse::<UserRole>()).transpose()
    }

    async fn assign_role(&self, user_id: Uuid, role: UserRole) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO user_roles (user_id, role) VALUES ($1, $2) \
             ON CONFLICT (user_id) DO UPDATE SET role = EXCLUDED.role",
        )
        .bind(user_id)
        .bind(role.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to assign user role", None))?;
        Ok(())
    }

    async fn revoke_role(&self, user_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM user_roles WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error(e, "Failed to revoke user role", None))?;
        Ok(result.rows_affected() > 0)
    }
}
