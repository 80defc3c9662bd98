//! In-memory catalog store.
//!
//! Implements every store trait over process memory. The emulated schema
//! can lack optional columns, in which case statements naming them fail
//! exactly like PostgreSQL's undefined-column error does, and the store can
//! be switched offline to emulate an unreachable database.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use catalog_core::error::AppError;
use catalog_core::result::AppResult;
use catalog_core::types::{SchemaCapabilities, SchemaGap};
use catalog_entity::category::{Category, CreateCategory, UpdateCategory};
use catalog_entity::product::{CreateProduct, Product, UpdateProduct};
use catalog_entity::user::UserRole;

use crate::store::{CategoryStore, ProductStore, RoleStore, SchemaProbe};

#[derive(Debug, Default)]
struct State {
    categories: Vec<Category>,
    products: Vec<Product>,
    roles: HashMap<Uuid, UserRole>,
    last_created: Option<DateTime<Utc>>,
}

impl State {
    /// Strictly increasing creation timestamps so newest-first ordering is
    /// deterministic.
    fn next_timestamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let ts = match self.last_created {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_created = Some(ts);
        ts
    }
}

/// Process-local implementation of the catalog stores.
///
/// Cloning shares the same underlying data.
#[derive(Debug, Clone)]
pub struct MemoryCatalog {
    state: Arc<RwLock<State>>,
    schema: Arc<RwLock<SchemaCapabilities>>,
    offline: Arc<AtomicBool>,
    statements: Arc<AtomicUsize>,
}

impl MemoryCatalog {
    /// Create an empty store with a fully migrated schema.
    pub fn new() -> Self {
        Self::with_schema(SchemaCapabilities::full())
    }

    /// Create an empty store emulating the given schema.
    pub fn with_schema(schema: SchemaCapabilities) -> Self {
        Self {
            state: Arc::new(RwLock::new(State::default())),
            schema: Arc::new(RwLock::new(schema)),
            offline: Arc::new(AtomicBool::new(false)),
            statements: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Change the emulated schema. Stored data is kept.
    pub async fn set_schema(&self, schema: SchemaCapabilities) {
        *self.schema.write().await = schema;
    }

    /// Make every subsequent statement fail as if the database were down.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of statements executed so far, including failed ones.
    pub fn statement_count(&self) -> usize {
        self.statements.load(Ordering::SeqCst)
    }

    /// Run the checks PostgreSQL would: connectivity, then column existence.
    async fn execute(&self, carries: Option<SchemaGap>) -> AppResult<()> {
        self.statements.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(AppError::repository("connection refused"));
        }
        if let Some(gap) = carries {
            if !self.schema.read().await.supports(gap) {
                return Err(AppError::schema(gap));
            }
        }
        Ok(())
    }
}

impl Default for MemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

fn project_category(category: &Category, with_hierarchy: bool) -> Category {
    let mut category = category.clone();
    if !with_hierarchy {
        category.parent_id = None;
    }
    category
}

fn project_product(product: &Product, with_gallery: bool) -> Product {
    let mut product = product.clone();
    if !with_gallery {
        product.images = None;
    }
    product
}

fn hierarchy(names_column: bool) -> Option<SchemaGap> {
    names_column.then_some(SchemaGap::CategoryHierarchy)
}

fn gallery(names_column: bool) -> Option<SchemaGap> {
    names_column.then_some(SchemaGap::ProductGallery)
}

#[async_trait]
impl SchemaProbe for MemoryCatalog {
    async fn probe_capabilities(&self) -> AppResult<SchemaCapabilities> {
        self.execute(None).await?;
        Ok(*self.schema.read().await)
    }

    async fn ping(&self) -> AppResult<()> {
        self.execute(None).await
    }
}

#[async_trait]
impl CategoryStore for MemoryCatalog {
    async fn list(&self, with_hierarchy: bool) -> AppResult<Vec<Category>> {
        self.execute(hierarchy(with_hierarchy)).await?;
        let state = self.state.read().await;
        let mut categories: Vec<Category> = state
            .categories
            .iter()
            .map(|c| project_category(c, with_hierarchy))
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn find_by_id(&self, id: Uuid, with_hierarchy: bool) -> AppResult<Option<Category>> {
        self.execute(hierarchy(with_hierarchy)).await?;
        let state = self.state.read().await;
        Ok(state
            .categories
            .iter()
            .find(|c| c.id == id)
            .map(|c| project_category(c, with_hierarchy)))
    }

    async fn exists_with_name(&self, name: &str) -> AppResult<bool> {
        self.execute(None).await?;
        let state = self.state.read().await;
        Ok(state.categories.iter().any(|c| c.name == name))
    }

    async fn insert(&self, data: &CreateCategory) -> AppResult<Category> {
        self.execute(hierarchy(data.parent_id.is_some())).await?;
        let mut state = self.state.write().await;
        let category = Category {
            id: Uuid::new_v4(),
            name: data.name.clone(),
            parent_id: data.parent_id,
            created_at: state.next_timestamp(),
        };
        state.categories.push(category.clone());
        Ok(category)
    }

    async fn update(
        &self,
        id: Uuid,
        data: &UpdateCategory,
        with_hierarchy: bool,
    ) -> AppResult<Option<Category>> {
        self.execute(hierarchy(with_hierarchy || data.parent_id.is_some()))
            .await?;
        let mut state = self.state.write().await;
        let Some(category) = state.categories.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        if let Some(name) = &data.name {
            category.name = name.clone();
        }
        if let Some(parent_id) = data.parent_id {
            category.parent_id = parent_id;
        }
        Ok(Some(project_category(category, with_hierarchy)))
    }

    async fn count_children(&self, id: Uuid) -> AppResult<u64> {
        self.execute(hierarchy(true)).await?;
        let state = self.state.read().await;
        Ok(state
            .categories
            .iter()
            .filter(|c| c.parent_id == Some(id))
            .count() as u64)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        self.execute(None).await?;
        let mut state = self.state.write().await;
        let before = state.categories.len();
        state.categories.retain(|c| c.id != id);
        Ok(state.categories.len() < before)
    }
}

#[async_trait]
impl ProductStore for MemoryCatalog {
    async fn list(&self, category: Option<&str>, with_gallery: bool) -> AppResult<Vec<Product>> {
        self.execute(gallery(with_gallery)).await?;
        let state = self.state.read().await;
        let mut products: Vec<Product> = state
            .products
            .iter()
            .filter(|p| category.is_none_or(|name| p.category == name))
            .map(|p| project_product(p, with_gallery))
            .collect();
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(products)
    }

    async fn find_by_id(&self, id: Uuid, with_gallery: bool) -> AppResult<Option<Product>> {
        self.execute(gallery(with_gallery)).await?;
        let state = self.state.read().await;
        Ok(state
            .products
            .iter()
            .find(|p| p.id == id)
            .map(|p| project_product(p, with_gallery)))
    }

    async fn insert(&self, data: &CreateProduct, with_gallery: bool) -> AppResult<Product> {
        self.execute(gallery(with_gallery || data.images.is_some()))
            .await?;
        let mut state = self.state.write().await;
        let created_at = state.next_timestamp();
        let product = Product {
            id: Uuid::new_v4(),
            name: data.name.clone(),
            category: data.category.clone(),
            description: data.description.clone(),
            image: data.image.clone(),
            images: data.images.clone(),
            specifications: data.specifications.clone(),
            created_at,
            updated_at: created_at,
        };
        state.products.push(product.clone());
        Ok(project_product(&product, with_gallery))
    }

    async fn update(
        &self,
        id: Uuid,
        data: &UpdateProduct,
        with_gallery: bool,
    ) -> AppResult<Option<Product>> {
        self.execute(gallery(with_gallery || data.images.is_some()))
            .await?;
        let mut state = self.state.write().await;
        let Some(product) = state.products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        if let Some(name) = &data.name {
            product.name = name.clone();
        }
        if let Some(category) = &data.category {
            product.category = category.clone();
        }
        if let Some(description) = &data.description {
            product.description = description.clone();
        }
        if let Some(image) = &data.image {
            product.image = image.clone();
        }
        if let Some(images) = &data.images {
            product.images = images.clone();
        }
        if let Some(specs) = &data.specifications {
            product.specifications = specs.clone();
        }
        product.updated_at = Utc::now();
        Ok(Some(project_product(product, with_gallery)))
    }

    async fn count_by_category(&self, category: &str) -> AppResult<u64> {
        self.execute(None).await?;
        let state = self.state.read().await;
        Ok(state
            .products
            .iter()
            .filter(|p| p.category == category)
            .count() as u64)
    }

    async fn delete(&self, id: Uuid, with_gallery: bool) -> AppResult<Option<Product>> {
        self.execute(gallery(with_gallery)).await?;
        let mut state = self.state.write().await;
        let Some(index) = state.products.iter().position(|p| p.id == id) else {
            return Ok(None);
        };
        let removed = state.products.remove(index);
        Ok(Some(project_product(&removed, with_gallery)))
    }
}

#[async_trait]
impl RoleStore for MemoryCatalog {
    async fn find_role(&self, user_id: Uuid) -> AppResult<Option<UserRole>> {
        self.execute(None).await?;
        Ok(self.state.read().await.roles.get(&user_id).copied())
    }

    async fn assign_role(&self, user_id: Uuid, role: UserRole) -> AppResult<()> {
        self.execute(None).await?;
        self.state.write().await.roles.insert(user_id, role);
        Ok(())
    }

    async fn revoke_role(&self, user_id: Uuid) -> AppResult<bool> {
        self.execute(None).await?;
        Ok(self.state.write().await.roles.remove(&user_id).is_some())
    }
}
