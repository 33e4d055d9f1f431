//! Category types for newsdesk.

use serde::{Deserialize, Serialize};

/// Cache key for the category tree snapshot.
pub const TREE_CACHE_KEY: &str = "category_tree";

/// A top-level category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Category id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// URL slug.
    pub slug: String,
}

/// A subcategory, exclusively owned by its parent category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subcategory {
    /// Subcategory id.
    pub id: String,
    /// Owning category id.
    pub category_id: String,
    /// Display name.
    pub name: String,
    /// URL slug.
    pub slug: String,
}

/// New category (or subcategory) for creation.
#[derive(Debug, Clone)]
pub struct NewCategory {
    /// Explicit id; generated when absent.
    pub id: Option<String>,
    /// Display name.
    pub name: String,
    /// URL slug; derived from the name when absent.
    pub slug: Option<String>,
}

impl NewCategory {
    /// Create a new category with a name only.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            slug: None,
        }
    }

    /// Set an explicit id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set an explicit slug.
    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }
}

/// Category update request. Unset fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct CategoryUpdate {
    /// New display name.
    pub name: Option<String>,
    /// New slug.
    pub slug: Option<String>,
}

impl CategoryUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the slug.
    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }
}

/// Cached snapshot of the two-level category hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTree {
    /// Top-level categories, sorted by name.
    pub categories: Vec<TreeCategory>,
    /// When the snapshot was built.
    #[serde(rename = "lastUpdate")]
    pub last_update: String,
}

/// One category node in the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeCategory {
    /// Category id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// URL slug.
    pub slug: String,
    /// Subcategories, sorted by name.
    pub subcategories: Vec<TreeSubcategory>,
}

/// One subcategory node in the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeSubcategory {
    /// Subcategory id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// URL slug.
    pub slug: String,
}

/// Derive a URL slug from a display name.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = true;
    for ch in name.chars() {
        if ch.is_alphanumeric() {
            slug.extend(ch.to_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    slug.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Technology"), "technology");
        assert_eq!(slugify("AI & Machine Learning"), "ai-machine-learning");
        assert_eq!(slugify("  World News  "), "world-news");
        assert_eq!(slugify("déjà vu"), "déjà-vu");
    }

    #[test]
    fn test_new_category_builders() {
        let cat = NewCategory::new("Tech").with_id("tech").with_slug("tech");
        assert_eq!(cat.id.as_deref(), Some("tech"));
        assert_eq!(cat.slug.as_deref(), Some("tech"));
    }

    #[test]
    fn test_tree_serialization_field_names() {
        let tree = CategoryTree {
            categories: vec![TreeCategory {
                id: "tech".to_string(),
                name: "Tech".to_string(),
                slug: "tech".to_string(),
                subcategories: vec![],
            }],
            last_update: "2025-01-01 00:00:00".to_string(),
        };
        let json = serde_json::to_value(&tree).unwrap();
        assert!(json.get("lastUpdate").is_some());
        assert!(json["categories"][0].get("subcategories").is_some());
    }
}
