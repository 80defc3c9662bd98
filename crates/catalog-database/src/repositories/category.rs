//! Category repository implementation.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use catalog_core::result::AppResult;
use catalog_core::types::SchemaGap;
use catalog_entity::category::{Category, CreateCategory, UpdateCategory};

use super::{carried, map_db_error};
use crate::store::CategoryStore;

/// Repository for the `product_categories` table.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    /// Create a new category repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Column list for reads. `parent_id` is only named when it exists.
fn columns(with_hierarchy: bool) -> &'static str {
    if with_hierarchy {
        "id, name, parent_id, created_at"
    } else {
        "id, name, created_at"
    }
}

fn hierarchy(names_column: bool) -> Option<SchemaGap> {
    carried(SchemaGap::CategoryHierarchy, names_column)
}

#[async_trait]
impl CategoryStore for CategoryRepository {
    async fn list(&self, with_hierarchy: bool) -> AppResult<Vec<Category>> {
        sqlx::query_as::<_, Category>(&format!(
            "SELECT {} FROM product_categories ORDER BY name ASC",
            columns(with_hierarchy)
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to list categories", hierarchy(with_hierarchy)))
    }

    async fn find_by_id(&self, id: Uuid, with_hierarchy: bool) -> AppResult<Option<Category>> {
        sqlx::query_as::<_, Category>(&format!(
            "SELECT {} FROM product_categories WHERE id = $1",
            columns(with_hierarchy)
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to find category", hierarchy(with_hierarchy)))
    }

    async fn exists_with_name(&self, name: &str) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM product_categories WHERE name = $1)",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to look up category by name", None))
    }

    async fn insert(&self, data: &CreateCategory) -> AppResult<Category> {
        let result = match data.parent_id {
            Some(parent_id) => {
                sqlx::query_as::<_, Category>(
                    "INSERT INTO product_categories (name, parent_id) VALUES ($1, $2) \
                     RETURNING id, name, parent_id, created_at",
                )
                .bind(&data.name)
                .bind(parent_id)
                .fetch_one(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, Category>(
                    "INSERT INTO product_categories (name) VALUES ($1) \
                     RETURNING id, name, created_at",
                )
                .bind(&data.name)
                .fetch_one(&self.pool)
                .await
            }
        };

        result.map_err(|e| {
            map_db_error(e, "Failed to create category", hierarchy(data.parent_id.is_some()))
        })
    }

    async fn update(
        &self,
        id: Uuid,
        data: &UpdateCategory,
        with_hierarchy: bool,
    ) -> AppResult<Option<Category>> {
        if data.is_empty() {
            return self.find_by_id(id, with_hierarchy).await;
        }

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE product_categories SET ");
        let mut fields = builder.separated(", ");
        if let Some(name) = &data.name {
            fields.push("name = ").push_bind_unseparated(name.clone());
        }
        if let Some(parent_id) = data.parent_id {
            fields.push("parent_id = ").push_bind_unseparated(parent_id);
        }
        builder.push(" WHERE id = ").push_bind(id);
        builder.push(" RETURNING ").push(columns(with_hierarchy));

        let names_column = with_hierarchy || data.parent_id.is_some();
        builder
            .build_query_as::<Category>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error(e, "Failed to update category", hierarchy(names_column)))
    }

    async fn count_children(&self, id: Uuid) -> AppResult<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM product_categories WHERE parent_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| map_db_error(e, "Failed to count child categories", hierarchy(true)))?;
        Ok(count as u64)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM product_categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error(e, "Failed to delete category", None))?;
        Ok(result.rows_affected() > 0)
    }
}
