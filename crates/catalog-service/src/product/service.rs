//! Product CRUD with gallery degrade-retry and image cleanup.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use catalog_core::error::AppError;
use catalog_core::types::SchemaGap;
use catalog_database::store::{CategoryStore, ProductStore};
use catalog_entity::product::Product;
use catalog_storage::ImageGateway;

use super::draft::{ProductDraft, ProductPatch};
use crate::capability::CapabilityCache;

const GALLERY: SchemaGap = SchemaGap::ProductGallery;

/// Manages products.
#[derive(Debug, Clone)]
pub struct ProductService {
    /// Product persistence.
    products: Arc<dyn ProductStore>,
    /// Category persistence, for category name checks.
    categories: Arc<dyn CategoryStore>,
    /// Schema capabilities.
    capabilities: Arc<CapabilityCache>,
    /// Managed image storage, for cleanup on delete.
    images: Arc<ImageGateway>,
}

impl ProductService {
    /// Creates a new product service.
    pub fn new(
        products: Arc<dyn ProductStore>,
        categories: Arc<dyn CategoryStore>,
        capabilities: Arc<CapabilityCache>,
        images: Arc<ImageGateway>,
    ) -> Self {
        Self {
            products,
            categories,
            capabilities,
            images,
        }
    }

    /// Products newest first, optionally restricted to one category name
    /// (exact, case-sensitive match).
    pub async fn list_products(&self, category: Option<&str>) -> Result<Vec<Product>, AppError> {
        self.capabilities
            .negotiate(GALLERY, |with_gallery| self.products.list(category, with_gallery))
            .await
    }

    /// Gets a product by ID.
    pub async fn get_product(&self, id: Uuid) -> Result<Product, AppError> {
        self.capabilities
            .negotiate(GALLERY, |with_gallery| self.products.find_by_id(id, with_gallery))
            .await?
            .ok_or_else(|| AppError::not_found(format!("Product {id} not found")))
    }

    /// Creates a product.
    ///
    /// Without the gallery column the product is stored with its primary
    /// image only.
    pub async fn create_product(&self, draft: ProductDraft) -> Result<Product, AppError> {
        let data = draft.normalize()?;
        self.require_category(&data.category).await?;

        let flat = data.without_gallery();
        let product = self
            .capabilities
            .negotiate(GALLERY, |with_gallery| {
                let data = if with_gallery { &data } else { &flat };
                self.products.insert(data, with_gallery)
            })
            .await?;

        info!(
            product_id = %product.id,
            name = %product.name,
            category = %product.category,
            images = product.images.as_ref().map_or(0, Vec::len),
            "Product created"
        );
        Ok(product)
    }

    /// Applies a partial update to a product.
    pub async fn update_product(&self, id: Uuid, patch: ProductPatch) -> Result<Product, AppError> {
        let data = patch.normalize()?;
        if data.is_empty() {
            return self.get_product(id).await;
        }

        if let Some(category) = &data.category {
            let current = self.get_product(id).await?;
            if &current.category != category {
                self.require_category(category).await?;
            }
        }

        let flat = data.without_gallery();
        let product = self
            .capabilities
            .negotiate(GALLERY, |with_gallery| {
                let data = if with_gallery { &data } else { &flat };
                self.products.update(id, data, with_gallery)
            })
            .await?
            .ok_or_else(|| AppError::not_found(format!("Product {id} not found")))?;

        info!(product_id = %id, name = %product.name, "Product updated");
        Ok(product)
    }

    /// Deletes a product, then removes its managed images.
    ///
    /// Image removal is best effort: failures are logged and the delete
    /// still succeeds.
    pub async fn delete_product(&self, id: Uuid) -> Result<(), AppError> {
        let product = self
            .capabilities
            .negotiate(GALLERY, |with_gallery| self.products.delete(id, with_gallery))
            .await?
            .ok_or_else(|| AppError::not_found(format!("Product {id} not found")))?;

        info!(product_id = %id, name = %product.name, "Product deleted");

        for url in product.image_refs() {
            if self.images.is_managed(url) {
                self.images.remove(url).await;
            }
        }
        Ok(())
    }

    async fn require_category(&self, name: &str) -> Result<(), AppError> {
        if self.categories.exists_with_name(name).await? {
            Ok(())
        } else {
            warn!(category = name, "Rejected product for unknown category");
            Err(AppError::validation(format!("Category '{name}' does not exist")))
        }
    }
}
