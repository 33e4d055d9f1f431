//! Category-tree cache over the cache table.

use chrono::Utc;
use tracing::warn;

use crate::category::types::{CategoryTree, TREE_CACHE_KEY};
use crate::db::{format_datetime, DbPool};
use crate::error::{NewsdeskError, Result};

/// Cache for the serialized category-tree snapshot.
pub struct TreeCache<'a> {
    pool: &'a DbPool,
}

impl<'a> TreeCache<'a> {
    /// Create a new cache handle.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Fetch the cached tree, if any.
    ///
    /// An unparseable cached value is treated as a miss so the caller
    /// rebuilds and overwrites it.
    pub async fn get(&self) -> Result<Option<CategoryTree>> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM cache WHERE key = ?")
            .bind(TREE_CACHE_KEY)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| NewsdeskError::Database(e.to_string()))?;

        let Some(value) = value else {
            return Ok(None);
        };

        match serde_json::from_str(&value) {
            Ok(tree) => Ok(Some(tree)),
            Err(e) => {
                warn!("Discarding unparseable cached category tree: {}", e);
                Ok(None)
            }
        }
    }

    /// Store the tree snapshot.
    pub async fn set(&self, tree: &CategoryTree) -> Result<()> {
        let value =
            serde_json::to_string(tree).map_err(|e| NewsdeskError::Cache(e.to_string()))?;

        sqlx::query("INSERT OR REPLACE INTO cache (key, value, updated_at) VALUES (?, ?, ?)")
            .bind(TREE_CACHE_KEY)
            .bind(&value)
            .bind(format_datetime(Utc::now()))
            .execute(self.pool)
            .await
            .map_err(|e| NewsdeskError::Database(e.to_string()))?;

        Ok(())
    }

    /// Drop the cached snapshot. The next read rebuilds it.
    pub async fn invalidate(&self) -> Result<()> {
        sqlx::query("DELETE FROM cache WHERE key = ?")
            .bind(TREE_CACHE_KEY)
            .execute(self.pool)
            .await
            .map_err(|e| NewsdeskError::Database(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn sample_tree() -> CategoryTree {
        CategoryTree {
            categories: vec![],
            last_update: "2025-01-01 00:00:00".to_string(),
        }
    }

    #[tokio::test]
    async fn test_set_get_invalidate() {
        let db = Database::connect_in_memory().await.unwrap();
        let cache = TreeCache::new(db.pool());

        assert!(cache.get().await.unwrap().is_none());

        cache.set(&sample_tree()).await.unwrap();
        let cached = cache.get().await.unwrap().unwrap();
        assert_eq!(cached.last_update, "2025-01-01 00:00:00");

        cache.invalidate().await.unwrap();
        assert!(cache.get().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_value_is_a_miss() {
        let db = Database::connect_in_memory().await.unwrap();

        sqlx::query("INSERT INTO cache (key, value, updated_at) VALUES (?, ?, ?)")
            .bind(TREE_CACHE_KEY)
            .bind("not json")
            .bind("2025-01-01 00:00:00")
            .execute(db.pool())
            .await
            .unwrap();

        let cache = TreeCache::new(db.pool());
        assert!(cache.get().await.unwrap().is_none());
    }
}
