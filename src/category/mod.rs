//! Category hierarchy and the cached category tree.
//!
//! Two-level hierarchy (categories own subcategories) plus a read-through
//! cached snapshot of the whole tree. Writes invalidate the snapshot; the
//! next tree read rebuilds it.

pub mod cache;
pub mod repository;
pub mod service;
pub mod types;

pub use cache::TreeCache;
pub use repository::CategoryRepository;
pub use service::CategoryService;
pub use types::{
    slugify, Category, CategoryTree, CategoryUpdate, NewCategory, Subcategory, TreeCategory,
    TreeSubcategory, TREE_CACHE_KEY,
};
