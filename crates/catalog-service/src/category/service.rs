//! Category CRUD with two-level tree rules.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use catalog_core::error::AppError;
use catalog_core::types::SchemaGap;
use catalog_database::store::{CategoryStore, ProductStore};
use catalog_entity::category::{Category, CategoryTree, CreateCategory, UpdateCategory};

use crate::capability::CapabilityCache;

const HIERARCHY: SchemaGap = SchemaGap::CategoryHierarchy;

/// Manages the category tree.
#[derive(Debug, Clone)]
pub struct CategoryService {
    /// Category persistence.
    categories: Arc<dyn CategoryStore>,
    /// Product persistence, for the delete guard.
    products: Arc<dyn ProductStore>,
    /// Schema capabilities.
    capabilities: Arc<CapabilityCache>,
}

impl CategoryService {
    /// Creates a new category service.
    pub fn new(
        categories: Arc<dyn CategoryStore>,
        products: Arc<dyn ProductStore>,
        capabilities: Arc<CapabilityCache>,
    ) -> Self {
        Self {
            categories,
            products,
            capabilities,
        }
    }

    /// All categories ordered by name.
    ///
    /// Without the hierarchy column every category is reported top-level.
    pub async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        self.capabilities
            .negotiate(HIERARCHY, |with_hierarchy| self.categories.list(with_hierarchy))
            .await
    }

    /// Categories grouped for display.
    pub async fn category_tree(&self) -> Result<CategoryTree, AppError> {
        let categories = self.list_categories().await?;
        Ok(CategoryTree::build(&categories))
    }

    /// Gets a category by ID.
    pub async fn get_category(&self, id: Uuid) -> Result<Category, AppError> {
        self.capabilities
            .negotiate(HIERARCHY, |with_hierarchy| self.categories.find_by_id(id, with_hierarchy))
            .await?
            .ok_or_else(|| AppError::not_found(format!("Category {id} not found")))
    }

    /// Creates a category, optionally under a top-level parent.
    pub async fn create_category(
        &self,
        name: &str,
        parent_id: Option<Uuid>,
    ) -> Result<Category, AppError> {
        let name = required_name(name)?;

        if let Some(parent_id) = parent_id {
            self.require_hierarchy().await?;
            self.validate_parent(parent_id, None).await?;
        }

        let data = CreateCategory { name, parent_id };
        let category = match self.categories.insert(&data).await {
            Ok(category) => category,
            Err(e) => return Err(self.capabilities.observe(e).await),
        };

        info!(
            category_id = %category.id,
            name = %category.name,
            parent_id = ?category.parent_id,
            "Category created"
        );
        Ok(category)
    }

    /// Applies a partial update to a category.
    pub async fn update_category(
        &self,
        id: Uuid,
        mut patch: UpdateCategory,
    ) -> Result<Category, AppError> {
        if let Some(name) = &patch.name {
            patch.name = Some(required_name(name)?);
        }

        let existing = self.get_category(id).await?;

        match patch.parent_id {
            Some(Some(parent_id)) => {
                self.require_hierarchy().await?;
                if parent_id == id {
                    return Err(AppError::validation("A category cannot be its own parent"));
                }
                self.validate_parent(parent_id, Some(id)).await?;
            }
            Some(None) if !self.capabilities.current().await.category_hierarchy => {
                // Every category is already top-level on this schema.
                patch.parent_id = None;
            }
            _ => {}
        }

        // Moving a category must not silently fall back to a flat write.
        let result = if patch.parent_id.is_some() {
            match self.categories.update(id, &patch, true).await {
                Ok(updated) => updated,
                Err(e) => return Err(self.capabilities.observe(e).await),
            }
        } else {
            self.capabilities
                .negotiate(HIERARCHY, |with_hierarchy| {
                    self.categories.update(id, &patch, with_hierarchy)
                })
                .await?
        };
        let updated =
            result.ok_or_else(|| AppError::not_found(format!("Category {id} not found")))?;

        if updated.name != existing.name {
            self.warn_orphaned_products(&existing.name, &updated.name).await;
        }

        info!(category_id = %id, name = %updated.name, parent_id = ?updated.parent_id, "Category updated");
        Ok(updated)
    }

    /// Deletes a category that has no children and no products.
    pub async fn delete_category(&self, id: Uuid) -> Result<(), AppError> {
        let category = self.get_category(id).await?;

        match self.categories.count_children(id).await {
            Ok(0) => {}
            Ok(children) => {
                return Err(AppError::has_children(format!(
                    "Category '{}' has {children} subcategories; delete or move them first",
                    category.name
                )));
            }
            Err(e) if e.is_schema_gap(HIERARCHY) => {
                self.capabilities.downgrade(HIERARCHY).await;
            }
            Err(e) => return Err(e),
        }

        let products = self.products.count_by_category(&category.name).await?;
        if products > 0 {
            return Err(AppError::has_products(format!(
                "Category '{}' is used by {products} products; reassign or delete them first",
                category.name
            )));
        }

        if !self.categories.delete(id).await? {
            return Err(AppError::not_found(format!("Category {id} not found")));
        }

        info!(category_id = %id, name = %category.name, "Category deleted");
        Ok(())
    }

    /// Fail with a schema error when subcategories are unavailable.
    async fn require_hierarchy(&self) -> Result<(), AppError> {
        if self.capabilities.current().await.category_hierarchy {
            Ok(())
        } else {
            Err(AppError::schema(HIERARCHY))
        }
    }

    /// The parent must exist and be top-level; a category with children
    /// cannot itself be nested.
    async fn validate_parent(&self, parent_id: Uuid, child_id: Option<Uuid>) -> Result<(), AppError> {
        let parent = match self.categories.find_by_id(parent_id, true).await {
            Ok(parent) => parent,
            Err(e) => return Err(self.capabilities.observe(e).await),
        };
        let parent = parent.ok_or_else(|| {
            AppError::validation(format!("Parent category {parent_id} does not exist"))
        })?;
        if !parent.is_top_level() {
            return Err(AppError::validation(format!(
                "Parent category '{}' is itself a subcategory; only two levels are supported",
                parent.name
            )));
        }

        if let Some(child_id) = child_id {
            let children = match self.categories.count_children(child_id).await {
                Ok(children) => children,
                Err(e) => return Err(self.capabilities.observe(e).await),
            };
            if children > 0 {
                return Err(AppError::validation(
                    "A category with subcategories cannot be moved under another category",
                ));
            }
        }
        Ok(())
    }

    async fn warn_orphaned_products(&self, old_name: &str, new_name: &str) {
        match self.products.count_by_category(old_name).await {
            Ok(0) => {}
            Ok(count) => warn!(
                old_name,
                new_name,
                products = count,
                "Category renamed; products still reference the old name"
            ),
            Err(e) => warn!(old_name, error = %e, "Could not count products left on renamed category"),
        }
    }
}

/// Trim a category name, rejecting blank input.
fn required_name(name: &str) -> Result<String, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Category name is required"));
    }
    Ok(name.to_string())
}
