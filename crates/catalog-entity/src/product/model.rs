//! Product entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::specification::Specification;

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier.
    pub id: Uuid,
    /// Product name.
    pub name: String,
    /// Name of the category this product is listed under.
    ///
    /// This is a copy of the category's name, not its id; renaming a
    /// category does not update it.
    pub category: String,
    /// Free-form description.
    pub description: String,
    /// Primary image reference (legacy single-image field).
    pub image: Option<String>,
    /// Ordered gallery. `None` when absent or when the database has no
    /// gallery column.
    pub images: Option<Vec<String>>,
    /// Ordered key/value specification pairs.
    pub specifications: Vec<Specification>,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// The image shown first: the gallery head, else the single image.
    pub fn primary_image(&self) -> Option<&str> {
        self.images
            .as_ref()
            .and_then(|images| images.first())
            .or(self.image.as_ref())
            .map(String::as_str)
    }

    /// Every image reference the product holds, primary first, without
    /// duplicates.
    pub fn image_refs(&self) -> Vec<&str> {
        let mut refs: Vec<&str> = Vec::new();
        let candidates = self
            .image
            .iter()
            .chain(self.images.iter().flatten())
            .map(String::as_str);
        for candidate in candidates {
            if !refs.contains(&candidate) {
                refs.push(candidate);
            }
        }
        refs
    }
}

/// A normalized product ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateProduct {
    /// Product name.
    pub name: String,
    /// Category name.
    pub category: String,
    /// Description.
    pub description: String,
    /// Primary image.
    pub image: Option<String>,
    /// Gallery. `None` means the gallery column is not written at all.
    pub images: Option<Vec<String>>,
    /// Specification pairs.
    pub specifications: Vec<Specification>,
}

impl CreateProduct {
    /// The same insert without the gallery column.
    pub fn without_gallery(&self) -> Self {
        Self {
            images: None,
            ..self.clone()
        }
    }
}

/// A normalized partial product update. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProduct {
    /// New name.
    pub name: Option<String>,
    /// New category name.
    pub category: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New primary image: `Some(None)` clears it.
    pub image: Option<Option<String>>,
    /// New gallery: `Some(None)` clears it.
    pub images: Option<Option<Vec<String>>>,
    /// Replacement specification list.
    pub specifications: Option<Vec<Specification>>,
}

impl UpdateProduct {
    /// The same update without the gallery column.
    pub fn without_gallery(&self) -> Self {
        Self {
            images: None,
            ..self.clone()
        }
    }

    /// Whether the update changes nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.description.is_none()
            && self.image.is_none()
            && self.images.is_none()
            && self.specifications.is_none()
    }
}
