//! Product repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use catalog_core::result::AppResult;
use catalog_core::types::SchemaGap;
use catalog_entity::product::{
    CreateProduct, Product, Specification, UpdateProduct, images, specification,
};

use super::{carried, map_db_error};
use crate::store::ProductStore;

/// Raw `products` row. JSON columns are decoded leniently into [`Product`].
#[derive(Debug, FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    category: String,
    description: Option<String>,
    image: Option<String>,
    #[sqlx(default)]
    images: Option<serde_json::Value>,
    specifications: Option<serde_json::Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            category: row.category,
            description: row.description.unwrap_or_default(),
            image: row.image,
            images: images::decode(row.images),
            specifications: specification::decode(row.specifications),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for the `products` table.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    /// Create a new product repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Column list for reads. `images` is only named when it exists.
fn columns(with_gallery: bool) -> &'static str {
    if with_gallery {
        "id, name, category, description, image, images, specifications, created_at, updated_at"
    } else {
        "id, name, category, description, image, specifications, created_at, updated_at"
    }
}

fn gallery(names_column: bool) -> Option<SchemaGap> {
    carried(SchemaGap::ProductGallery, names_column)
}

fn gallery_json(images: Option<&Vec<String>>) -> Option<serde_json::Value> {
    images.map(|list| serde_json::Value::from(list.clone()))
}

fn specifications_json(specs: &[Specification]) -> AppResult<serde_json::Value> {
    Ok(serde_json::to_value(specs)?)
}

#[async_trait]
impl ProductStore for ProductRepository {
    async fn list(&self, category: Option<&str>, with_gallery: bool) -> AppResult<Vec<Product>> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("SELECT ");
        builder.push(columns(with_gallery)).push(" FROM products");
        if let Some(category) = category {
            builder.push(" WHERE category = ").push_bind(category.to_string());
        }
        builder.push(" ORDER BY created_at DESC");

        let rows = builder
            .build_query_as::<ProductRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_db_error(e, "Failed to list products", gallery(with_gallery)))?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn find_by_id(&self, id: Uuid, with_gallery: bool) -> AppResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {} FROM products WHERE id = $1",
            columns(with_gallery)
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to find product", gallery(with_gallery)))?;

        Ok(row.map(Product::from))
    }

    async fn insert(&self, data: &CreateProduct, with_gallery: bool) -> AppResult<Product> {
        let specifications = specifications_json(&data.specifications)?;

        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("INSERT INTO products (name, category, description, image, specifications");
        if data.images.is_some() {
            builder.push(", images");
        }
        builder.push(") VALUES (");
        let mut values = builder.separated(", ");
        values.push_bind(data.name.clone());
        values.push_bind(data.category.clone());
        values.push_bind(data.description.clone());
        values.push_bind(data.image.clone());
        values.push_bind(specifications);
        if let Some(json) = gallery_json(data.images.as_ref()) {
            values.push_bind(json);
        }
        builder.push(") RETURNING ").push(columns(with_gallery));

        let names_column = with_gallery || data.images.is_some();
        let row = builder
            .build_query_as::<ProductRow>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_db_error(e, "Failed to create product", gallery(names_column)))?;

        Ok(row.into())
    }

    async fn update(
        &self,
        id: Uuid,
        data: &UpdateProduct,
        with_gallery: bool,
    ) -> AppResult<Option<Product>> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE products SET updated_at = NOW()");
        if let Some(name) = &data.name {
            builder.push(", name = ").push_bind(name.clone());
        }
        if let Some(category) = &data.category {
            builder.push(", category = ").push_bind(category.clone());
        }
        if let Some(description) = &data.description {
            builder.push(", description = ").push_bind(description.clone());
        }
        if let Some(image) = &data.image {
            builder.push(", image = ").push_bind(image.clone());
        }
        if let Some(images) = &data.images {
            builder.push(", images = ").push_bind(gallery_json(images.as_ref()));
        }
        if let Some(specs) = &data.specifications {
            builder.push(", specifications = ").push_bind(specifications_json(specs)?);
        }
        builder.push(" WHERE id = ").push_bind(id);
        builder.push(" RETURNING ").push(columns(with_gallery));

        let names_column = with_gallery || data.images.is_some();
        let row = builder
            .build_query_as::<ProductRow>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error(e, "Failed to update product", gallery(names_column)))?;

        Ok(row.map(Product::from))
    }

    async fn count_by_category(&self, category: &str) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE category = $1")
            .bind(category)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_db_error(e, "Failed to count products in category", None))?;
        Ok(count as u64)
    }

    async fn delete(&self, id: Uuid, with_gallery: bool) -> AppResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "DELETE FROM products WHERE id = $1 RETURNING {}",
            columns(with_gallery)
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to delete product", gallery(with_gallery)))?;

        Ok(row.map(Product::from))
    }
}
