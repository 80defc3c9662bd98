//! Store traits the catalog services are written against.
//!
//! Every method maps to a single statement. Methods that read or write an
//! optional column take a flag saying whether the caller believes the
//! column exists; a statement that names a missing column fails with an
//! [`ErrorKind::Schema`](catalog_core::error::ErrorKind::Schema) error
//! carrying the matching [`SchemaGap`](catalog_core::types::SchemaGap).

use async_trait::async_trait;
use uuid::Uuid;

use catalog_core::result::AppResult;
use catalog_core::types::SchemaCapabilities;
use catalog_entity::category::{Category, CreateCategory, UpdateCategory};
use catalog_entity::product::{CreateProduct, Product, UpdateProduct};
use catalog_entity::user::UserRole;

/// Detects which optional columns the connected database has.
#[async_trait]
pub trait SchemaProbe: Send + Sync + std::fmt::Debug + 'static {
    /// Inspect the live schema.
    async fn probe_capabilities(&self) -> AppResult<SchemaCapabilities>;

    /// One round trip, to report whether the database is reachable.
    async fn ping(&self) -> AppResult<()>;
}

/// Persistence for `product_categories`.
#[async_trait]
pub trait CategoryStore: Send + Sync + std::fmt::Debug + 'static {
    /// All categories ordered by name. `with_hierarchy` selects `parent_id`.
    async fn list(&self, with_hierarchy: bool) -> AppResult<Vec<Category>>;

    /// Find a category by ID.
    async fn find_by_id(&self, id: Uuid, with_hierarchy: bool) -> AppResult<Option<Category>>;

    /// Whether any category carries exactly this name.
    async fn exists_with_name(&self, name: &str) -> AppResult<bool>;

    /// Insert a category. `parent_id` is only written when present.
    async fn insert(&self, data: &CreateCategory) -> AppResult<Category>;

    /// Apply a partial update. Returns `None` when the ID is unknown.
    async fn update(
        &self,
        id: Uuid,
        data: &UpdateCategory,
        with_hierarchy: bool,
    ) -> AppResult<Option<Category>>;

    /// Number of categories whose parent is `id`.
    async fn count_children(&self, id: Uuid) -> AppResult<u64>;

    /// Delete a category. Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

/// Persistence for `products`.
#[async_trait]
pub trait ProductStore: Send + Sync + std::fmt::Debug + 'static {
    /// Products newest first, optionally restricted to one category name.
    async fn list(&self, category: Option<&str>, with_gallery: bool) -> AppResult<Vec<Product>>;

    /// Find a product by ID.
    async fn find_by_id(&self, id: Uuid, with_gallery: bool) -> AppResult<Option<Product>>;

    /// Insert a product. `images` is only written when present.
    async fn insert(&self, data: &CreateProduct, with_gallery: bool) -> AppResult<Product>;

    /// Apply a partial update. Returns `None` when the ID is unknown.
    async fn update(
        &self,
        id: Uuid,
        data: &UpdateProduct,
        with_gallery: bool,
    ) -> AppResult<Option<Product>>;

    /// Number of products listed under a category name.
    async fn count_by_category(&self, category: &str) -> AppResult<u64>;

    /// Delete a product, returning the removed row.
    async fn delete(&self, id: Uuid, with_gallery: bool) -> AppResult<Option<Product>>;
}

/// Persistence for `user_roles`.
#[async_trait]
pub trait RoleStore: Send + Sync + std::fmt::Debug + 'static {
    /// The role recorded for a user, if any.
    async fn find_role(&self, user_id: Uuid) -> AppResult<Option<UserRole>>;

    /// Insert or replace a user's role.
    async fn assign_role(&self, user_id: Uuid, role: UserRole) -> AppResult<()>;

    /// Remove a user's role row. Returns whether a row existed.
    async fn revoke_role(&self, user_id: Uuid) -> AppResult<bool>;
}
