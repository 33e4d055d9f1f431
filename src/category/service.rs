//! Category service: hierarchy writes plus the cached tree read path.

use futures::future::join_all;
use chrono::Utc;
use tracing::{debug, info};

use crate::category::cache::TreeCache;
use crate::category::repository::CategoryRepository;
use crate::category::types::{
    Category, CategoryTree, CategoryUpdate, NewCategory, Subcategory, TreeCategory,
    TreeSubcategory,
};
use crate::db::{format_datetime, Database};
use crate::error::Result;

/// Read-through category-tree service.
///
/// Reads serve the cached snapshot when present and rebuild it from the
/// live tables otherwise. Every write goes to the tables first and then
/// invalidates the snapshot, so the next read rebuilds.
pub struct CategoryService {
    db: Database,
}

impl CategoryService {
    /// Create a new service.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Get the category tree, rebuilding the cache on a miss.
    pub async fn tree(&self) -> Result<CategoryTree> {
        let cache = TreeCache::new(self.db.pool());
        if let Some(tree) = cache.get().await? {
            debug!("Serving category tree from cache");
            return Ok(tree);
        }

        let tree = self.rebuild().await?;
        cache.set(&tree).await?;
        info!(
            "Rebuilt category tree cache ({} categories)",
            tree.categories.len()
        );
        Ok(tree)
    }

    /// Build a fresh tree snapshot from the live tables.
    pub async fn rebuild(&self) -> Result<CategoryTree> {
        let repo = CategoryRepository::new(self.db.pool());
        let categories = repo.list_categories().await?;

        let subcategory_fetches = categories
            .iter()
            .map(|category| repo.list_subcategories(&category.id));
        let subcategory_lists = join_all(subcategory_fetches).await;

        let mut nodes = Vec::with_capacity(categories.len());
        for (category, subcategories) in categories.into_iter().zip(subcategory_lists) {
            let subcategories = subcategories?
                .into_iter()
                .map(|sub| TreeSubcategory {
                    id: sub.id,
                    name: sub.name,
                    slug: sub.slug,
                })
                .collect();
            nodes.push(TreeCategory {
                id: category.id,
                name: category.name,
                slug: category.slug,
                subcategories,
            });
        }

        Ok(CategoryTree {
            categories: nodes,
            last_update: format_datetime(Utc::now()),
        })
    }

    /// Create a category and invalidate the tree cache.
    pub async fn create_category(&self, category: &NewCategory) -> Result<Category> {
        let created = CategoryRepository::new(self.db.pool())
            .create_category(category)
            .await?;
        TreeCache::new(self.db.pool()).invalidate().await?;
        Ok(created)
    }

    /// Get a category by id.
    pub async fn get_category(&self, id: &str) -> Result<Option<Category>> {
        CategoryRepository::new(self.db.pool()).get_category(id).await
    }

    /// List all categories ordered by name.
    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        CategoryRepository::new(self.db.pool()).list_categories().await
    }

    /// Update a category and invalidate the tree cache.
    pub async fn update_category(&self, id: &str, update: &CategoryUpdate) -> Result<Category> {
        let updated = CategoryRepository::new(self.db.pool())
            .update_category(id, update)
            .await?;
        TreeCache::new(self.db.pool()).invalidate().await?;
        Ok(updated)
    }

    /// Delete a category (subcategories go with it) and invalidate the cache.
    pub async fn delete_category(&self, id: &str) -> Result<bool> {
        let deleted = CategoryRepository::new(self.db.pool())
            .delete_category(id)
            .await?;
        if deleted {
            TreeCache::new(self.db.pool()).invalidate().await?;
        }
        Ok(deleted)
    }

    /// Create a subcategory and invalidate the tree cache.
    pub async fn create_subcategory(
        &self,
        category_id: &str,
        subcategory: &NewCategory,
    ) -> Result<Subcategory> {
        let created = CategoryRepository::new(self.db.pool())
            .create_subcategory(category_id, subcategory)
            .await?;
        TreeCache::new(self.db.pool()).invalidate().await?;
        Ok(created)
    }

    /// List a category's subcategories ordered by name.
    pub async fn list_subcategories(&self, category_id: &str) -> Result<Vec<Subcategory>> {
        CategoryRepository::new(self.db.pool())
            .list_subcategories(category_id)
            .await
    }

    /// Update a subcategory and invalidate the tree cache.
    pub async fn update_subcategory(
        &self,
        category_id: &str,
        id: &str,
        update: &CategoryUpdate,
    ) -> Result<Subcategory> {
        let updated = CategoryRepository::new(self.db.pool())
            .update_subcategory(category_id, id, update)
            .await?;
        TreeCache::new(self.db.pool()).invalidate().await?;
        Ok(updated)
    }

    /// Delete a subcategory and invalidate the tree cache.
    pub async fn delete_subcategory(&self, category_id: &str, id: &str) -> Result<bool> {
        let deleted = CategoryRepository::new(self.db.pool())
            .delete_subcategory(category_id, id)
            .await?;
        if deleted {
            TreeCache::new(self.db.pool()).invalidate().await?;
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn service() -> CategoryService {
        CategoryService::new(Database::connect_in_memory().await.unwrap())
    }

    #[tokio::test]
    async fn test_tree_is_sorted_by_name() {
        let svc = service().await;
        svc.create_category(&NewCategory::new("World").with_id("world"))
            .await
            .unwrap();
        svc.create_category(&NewCategory::new("Business").with_id("biz"))
            .await
            .unwrap();
        svc.create_subcategory("world", &NewCategory::new("Europe").with_id("world-eu"))
            .await
            .unwrap();
        svc.create_subcategory("world", &NewCategory::new("Asia").with_id("world-asia"))
            .await
            .unwrap();

        let tree = svc.tree().await.unwrap();
        let names: Vec<_> = tree.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Business", "World"]);
        let sub_names: Vec<_> = tree.categories[1]
            .subcategories
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(sub_names, vec!["Asia", "Europe"]);
    }

    #[tokio::test]
    async fn test_tree_cache_hit_serves_snapshot() {
        let svc = service().await;
        svc.create_category(&NewCategory::new("Tech").with_id("tech"))
            .await
            .unwrap();

        let first = svc.tree().await.unwrap();

        // Out-of-band write (bypassing the service) must NOT be visible
        // until the cache is invalidated.
        CategoryRepository::new(svc.db.pool())
            .create_category(&NewCategory::new("Science").with_id("sci"))
            .await
            .unwrap();

        let second = svc.tree().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(second.categories.len(), 1);
    }

    #[tokio::test]
    async fn test_write_invalidates_cache() {
        let svc = service().await;
        svc.create_category(&NewCategory::new("Tech").with_id("tech"))
            .await
            .unwrap();
        assert_eq!(svc.tree().await.unwrap().categories.len(), 1);

        svc.create_subcategory("tech", &NewCategory::new("AI").with_id("tech-ai"))
            .await
            .unwrap();
        let tree = svc.tree().await.unwrap();
        assert_eq!(tree.categories[0].subcategories.len(), 1);

        svc.delete_subcategory("tech", "tech-ai").await.unwrap();
        let tree = svc.tree().await.unwrap();
        assert!(tree.categories[0].subcategories.is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_does_not_invalidate() {
        let svc = service().await;
        svc.create_category(&NewCategory::new("Tech").with_id("tech"))
            .await
            .unwrap();
        let before = svc.tree().await.unwrap();

        assert!(!svc.delete_category("missing").await.unwrap());
        // Snapshot untouched
        let after = svc.tree().await.unwrap();
        assert_eq!(before, after);
    }
}
