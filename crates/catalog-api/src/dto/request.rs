//! Request DTOs.

use serde::{Deserialize, Deserializer};
use uuid::Uuid;

use catalog_entity::category::UpdateCategory;
use catalog_entity::product::Specification;
use catalog_service::ProductPatch;

/// Distinguishes an explicit `null` from an absent field.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Create category request.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategoryRequest {
    /// Category name.
    #[serde(default)]
    pub name: String,
    /// Top-level parent, for subcategories.
    #[serde(default)]
    pub parent_id: Option<Uuid>,
}

/// Update category request. `"parent_id": null` moves the category to the top level.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCategoryRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub parent_id: Option<Option<Uuid>>,
}

impl From<UpdateCategoryRequest> for UpdateCategory {
    fn from(req: UpdateCategoryRequest) -> Self {
        Self {
            name: req.name,
            parent_id: req.parent_id,
        }
    }
}

/// Update product request. `"image": null` clears the single image.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProductRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub image: Option<Option<String>>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
    #[serde(default)]
    pub specifications: Option<Vec<Specification>>,
}

impl From<UpdateProductRequest> for ProductPatch {
    fn from(req: UpdateProductRequest) -> Self {
        Self {
            name: req.name,
            category: req.category,
            description: req.description,
            image: req.image,
            images: req.images,
            specifications: req.specifications,
        }
    }
}

/// `GET /api/products` query.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductListQuery {
    /// Only products in this category.
    #[serde(default)]
    pub category: Option<String>,
}

/// `POST /api/admin/images` query.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadQuery {
    /// Product the image belongs to, used to group object keys.
    #[serde(default)]
    pub product_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_parent_differs_from_absent() {
        let absent: UpdateCategoryRequest = serde_json::from_str(r#"{"name":"Pumps"}"#).unwrap();
        assert_eq!(absent.parent_id, None);

        let cleared: UpdateCategoryRequest = serde_json::from_str(r#"{"parent_id":null}"#).unwrap();
        assert_eq!(cleared.parent_id, Some(None));
    }

    #[test]
    fn test_null_image_clears() {
        let req: UpdateProductRequest = serde_json::from_str(r#"{"image":null}"#).unwrap();
        let patch = ProductPatch::from(req);
        assert_eq!(patch.image, Some(None));
        assert_eq!(patch.images, None);
    }
}
