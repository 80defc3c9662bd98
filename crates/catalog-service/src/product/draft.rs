//! Admin-submitted product input and its normalization.

use serde::{Deserialize, Serialize};

use catalog_core::error::AppError;
use catalog_entity::product::images::{clean_gallery, clean_ref};
use catalog_entity::product::specification::retain_complete;
use catalog_entity::product::{CreateProduct, ImageSet, Specification, UpdateProduct};

/// A new product as entered by an admin.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductDraft {
    /// Product name (required).
    #[serde(default)]
    pub name: String,
    /// Category name (required, must exist).
    #[serde(default)]
    pub category: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Single image reference.
    #[serde(default)]
    pub image: Option<String>,
    /// Ordered gallery; its first entry becomes the primary image.
    #[serde(default)]
    pub images: Option<Vec<String>>,
    /// Specification pairs; incomplete pairs are dropped.
    #[serde(default)]
    pub specifications: Vec<Specification>,
}

impl ProductDraft {
    /// Validate and normalize into an insert.
    pub fn normalize(self) -> Result<CreateProduct, AppError> {
        let name = required(&self.name, "Product name")?;
        let category = required(&self.category, "Product category")?;
        let ImageSet { image, images } = ImageSet::normalize(self.image, self.images);

        Ok(CreateProduct {
            name,
            category,
            description: self.description.trim().to_string(),
            image,
            images,
            specifications: retain_complete(self.specifications),
        })
    }
}

/// A partial product edit. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductPatch {
    /// New name.
    #[serde(default)]
    pub name: Option<String>,
    /// New category name.
    #[serde(default)]
    pub category: Option<String>,
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
    /// New single image: `Some(None)` clears it.
    #[serde(default)]
    pub image: Option<Option<String>>,
    /// Replacement gallery. An empty list clears the gallery.
    #[serde(default)]
    pub images: Option<Vec<String>>,
    /// Replacement specification list.
    #[serde(default)]
    pub specifications: Option<Vec<Specification>>,
}

impl ProductPatch {
    /// Validate and normalize into an update.
    ///
    /// A non-empty gallery sets the primary image to its head. An emptied
    /// gallery clears the primary image unless this patch supplies one.
    /// An image-only patch leaves the stored gallery untouched.
    pub fn normalize(self) -> Result<UpdateProduct, AppError> {
        let name = self.name.as_deref().map(|n| required(n, "Product name")).transpose()?;
        let category = self
            .category
            .as_deref()
            .map(|c| required(c, "Product category"))
            .transpose()?;

        let explicit_image = self.image.map(clean_ref);
        let (image, images) = match self.images {
            Some(list) => {
                let gallery = clean_gallery(list);
                match gallery.first() {
                    Some(primary) => (Some(Some(primary.clone())), Some(Some(gallery))),
                    None => (Some(explicit_image.flatten()), Some(None)),
                }
            }
            None => (explicit_image, None),
        };

        Ok(UpdateProduct {
            name,
            category,
            description: self.description.map(|d| d.trim().to_string()),
            image,
            images,
            specifications: self.specifications.map(retain_complete),
        })
    }
}

fn required(value: &str, field: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::validation(format!("{field} is required")));
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::error::ErrorKind;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_draft_requires_name_and_category() {
        let err = ProductDraft {
            name: " ".into(),
            category: "Valves".into(),
            ..Default::default()
        }
        .normalize()
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let err = ProductDraft {
            name: "Gate".into(),
            ..Default::default()
        }
        .normalize()
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[test]
    fn test_draft_primary_sync_and_specs() {
        let create = ProductDraft {
            name: " Gate Valve ".into(),
            category: "Valves".into(),
            image: Some("ignored.png".into()),
            images: Some(strings(&["a", " ", "b", "c"])),
            specifications: vec![
                Specification::new("DN", "50"),
                Specification::new("", "x"),
                Specification::new("PN", "16"),
            ],
            ..Default::default()
        }
        .normalize()
        .unwrap();

        assert_eq!(create.name, "Gate Valve");
        assert_eq!(create.image.as_deref(), Some("a"));
        assert_eq!(create.images, Some(strings(&["a", "b", "c"])));
        assert_eq!(
            create.specifications,
            vec![Specification::new("DN", "50"), Specification::new("PN", "16")]
        );
    }

    #[test]
    fn test_patch_image_only_leaves_gallery() {
        let update = ProductPatch {
            image: Some(Some("new.png".into())),
            ..Default::default()
        }
        .normalize()
        .unwrap();
        assert_eq!(update.image, Some(Some("new.png".to_string())));
        assert_eq!(update.images, None);
    }

    #[test]
    fn test_patch_emptied_gallery() {
        let cleared = ProductPatch {
            images: Some(vec![]),
            ..Default::default()
        }
        .normalize()
        .unwrap();
        assert_eq!(cleared.image, Some(None));
        assert_eq!(cleared.images, Some(None));

        let kept = ProductPatch {
            images: Some(vec![" ".into()]),
            image: Some(Some("explicit.png".into())),
            ..Default::default()
        }
        .normalize()
        .unwrap();
        assert_eq!(kept.image, Some(Some("explicit.png".to_string())));
        assert_eq!(kept.images, Some(None));
    }

    #[test]
    fn test_patch_gallery_sets_primary() {
        let update = ProductPatch {
            images: Some(strings(&["x", "y"])),
            image: Some(Some("other".into())),
            ..Default::default()
        }
        .normalize()
        .unwrap();
        assert_eq!(update.image, Some(Some("x".to_string())));
        assert_eq!(update.images, Some(Some(strings(&["x", "y"]))));
    }

    #[test]
    fn test_patch_blank_name_rejected() {
        let err = ProductPatch {
            name: Some("".into()),
            ..Default::default()
        }
        .normalize()
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }
}
