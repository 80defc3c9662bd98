//! Category entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A product category. Categories form a two-level tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Category {
    /// Unique category identifier.
    pub id: Uuid,
    /// Display name. Products reference categories by this name.
    pub name: String,
    /// Parent category (None for top-level categories, and for every
    /// category when the hierarchy column is not available).
    #[sqlx(default)]
    pub parent_id: Option<Uuid>,
    /// When the category was created.
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Check if this is a top-level category.
    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Data required to insert a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCategory {
    /// Category name.
    pub name: String,
    /// Parent category. `None` inserts without touching the hierarchy column.
    pub parent_id: Option<Uuid>,
}

/// A partial category update. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCategory {
    /// New name.
    pub name: Option<String>,
    /// New parent: `Some(None)` makes the category top-level.
    pub parent_id: Option<Option<Uuid>>,
}

impl UpdateCategory {
    /// Whether the update changes nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.parent_id.is_none()
    }
}
