//! Product domain entities.

pub mod images;
pub mod model;
pub mod specification;

pub use images::ImageSet;
pub use model::{CreateProduct, Product, UpdateProduct};
pub use specification::Specification;
