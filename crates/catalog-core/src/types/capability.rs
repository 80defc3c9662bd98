//! Schema capability negotiation types.
//!
//! The catalog runs against databases that may not have every migration
//! applied. Each optional column is a [`SchemaGap`] when absent, and the
//! set of columns present is summarized in [`SchemaCapabilities`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// An optional column the connected database may be missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaGap {
    /// `product_categories.parent_id` (two-level category tree).
    CategoryHierarchy,
    /// `products.images` (multi-image gallery).
    ProductGallery,
}

impl SchemaGap {
    /// All known gaps, in migration order.
    pub const ALL: [SchemaGap; 2] = [Self::CategoryHierarchy, Self::ProductGallery];

    /// Table holding the optional column.
    pub fn table(&self) -> &'static str {
        match self {
            Self::CategoryHierarchy => "product_categories",
            Self::ProductGallery => "products",
        }
    }

    /// Name of the optional column.
    pub fn column(&self) -> &'static str {
        match self {
            Self::CategoryHierarchy => "parent_id",
            Self::ProductGallery => "images",
        }
    }

    /// Migration file that adds the column.
    pub fn migration(&self) -> &'static str {
        match self {
            Self::CategoryHierarchy => "0002_category_hierarchy.sql",
            Self::ProductGallery => "0003_product_gallery.sql",
        }
    }

    /// The user-facing capability that is unavailable without the column.
    pub fn capability(&self) -> &'static str {
        match self {
            Self::CategoryHierarchy => "subcategories",
            Self::ProductGallery => "multi-image product galleries",
        }
    }

    /// Operator-facing instructions for closing the gap.
    pub fn remediation(&self) -> String {
        format!(
            "Database migration required: column {}.{} does not exist, so {} are unavailable. \
             Apply migrations/{} (or run `catalog-cli migrate run`) and retry.",
            self.table(),
            self.column(),
            self.capability(),
            self.migration()
        )
    }
}

impl fmt::Display for SchemaGap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table(), self.column())
    }
}

/// Which optional columns the connected database supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaCapabilities {
    /// Whether `product_categories.parent_id` exists.
    pub category_hierarchy: bool,
    /// Whether `products.images` exists.
    pub product_gallery: bool,
}

impl SchemaCapabilities {
    /// A fully migrated schema.
    pub fn full() -> Self {
        Self {
            category_hierarchy: true,
            product_gallery: true,
        }
    }

    /// A schema with only the initial migration applied.
    pub fn legacy() -> Self {
        Self {
            category_hierarchy: false,
            product_gallery: false,
        }
    }

    /// Whether the column behind `gap` is present.
    pub fn supports(&self, gap: SchemaGap) -> bool {
        match gap {
            SchemaGap::CategoryHierarchy => self.category_hierarchy,
            SchemaGap::ProductGallery => self.product_gallery,
        }
    }

    /// A copy with `gap` marked as missing.
    pub fn without(mut self, gap: SchemaGap) -> Self {
        match gap {
            SchemaGap::CategoryHierarchy => self.category_hierarchy = false,
            SchemaGap::ProductGallery => self.product_gallery = false,
        }
        self
    }

    /// Every gap that is currently open.
    pub fn missing(&self) -> Vec<SchemaGap> {
        SchemaGap::ALL
            .into_iter()
            .filter(|gap| !self.supports(*gap))
            .collect()
    }
}

impl Default for SchemaCapabilities {
    fn default() -> Self {
        Self::full()
    }
}
