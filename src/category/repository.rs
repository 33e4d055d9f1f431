//! Category and subcategory repository.

use sqlx::FromRow;
use uuid::Uuid;

use crate::category::types::{slugify, Category, CategoryUpdate, NewCategory, Subcategory};
use crate::db::DbPool;
use crate::error::{NewsdeskError, Result};

#[derive(Debug, Clone, FromRow)]
struct CategoryRow {
    id: String,
    name: String,
    slug: String,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id,
            name: row.name,
            slug: row.slug,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
struct SubcategoryRow {
    id: String,
    category_id: String,
    name: String,
    slug: String,
}

impl From<SubcategoryRow> for Subcategory {
    fn from(row: SubcategoryRow) -> Self {
        Subcategory {
            id: row.id,
            category_id: row.category_id,
            name: row.name,
            slug: row.slug,
        }
    }
}

/// Repository for the category hierarchy.
pub struct CategoryRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a top-level category.
    pub async fn create_category(&self, category: &NewCategory) -> Result<Category> {
        let id = category
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let slug = category
            .slug
            .clone()
            .unwrap_or_else(|| slugify(&category.name));

        sqlx::query("INSERT INTO categories (id, name, slug) VALUES (?, ?, ?)")
            .bind(&id)
            .bind(&category.name)
            .bind(&slug)
            .execute(self.pool)
            .await
            .map_err(|e| NewsdeskError::Database(e.to_string()))?;

        self.get_category(&id)
            .await?
            .ok_or_else(|| NewsdeskError::NotFound("category".to_string()))
    }

    /// Get a category by id.
    pub async fn get_category(&self, id: &str) -> Result<Option<Category>> {
        let row =
            sqlx::query_as::<_, CategoryRow>("SELECT id, name, slug FROM categories WHERE id = ?")
                .bind(id)
                .fetch_optional(self.pool)
                .await
                .map_err(|e| NewsdeskError::Database(e.to_string()))?;

        Ok(row.map(Category::from))
    }

    /// List all categories ordered by name.
    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        let rows =
            sqlx::query_as::<_, CategoryRow>("SELECT id, name, slug FROM categories ORDER BY name")
                .fetch_all(self.pool)
                .await
                .map_err(|e| NewsdeskError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    /// Update a category. Unset fields keep their current value.
    pub async fn update_category(&self, id: &str, update: &CategoryUpdate) -> Result<Category> {
        let existing = self
            .get_category(id)
            .await?
            .ok_or_else(|| NewsdeskError::NotFound("category".to_string()))?;

        let name = update.name.clone().unwrap_or(existing.name);
        let slug = update.slug.clone().unwrap_or(existing.slug);

        sqlx::query("UPDATE categories SET name = ?, slug = ? WHERE id = ?")
            .bind(&name)
            .bind(&slug)
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| NewsdeskError::Database(e.to_string()))?;

        self.get_category(id)
            .await?
            .ok_or_else(|| NewsdeskError::NotFound("category".to_string()))
    }

    /// Delete a category and, through ownership, all its subcategories.
    pub async fn delete_category(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| NewsdeskError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    /// Create a subcategory under an existing category.
    pub async fn create_subcategory(
        &self,
        category_id: &str,
        subcategory: &NewCategory,
    ) -> Result<Subcategory> {
        // Surface a clean not-found instead of an FK violation
        self.get_category(category_id)
            .await?
            .ok_or_else(|| NewsdeskError::NotFound("category".to_string()))?;

        let id = subcategory
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let slug = subcategory
            .slug
            .clone()
            .unwrap_or_else(|| slugify(&subcategory.name));

        sqlx::query("INSERT INTO subcategories (id, category_id, name, slug) VALUES (?, ?, ?, ?)")
            .bind(&id)
            .bind(category_id)
            .bind(&subcategory.name)
            .bind(&slug)
            .execute(self.pool)
            .await
            .map_err(|e| NewsdeskError::Database(e.to_string()))?;

        self.get_subcategory(category_id, &id)
            .await?
            .ok_or_else(|| NewsdeskError::NotFound("subcategory".to_string()))
    }

    /// Get a subcategory by (category, id).
    pub async fn get_subcategory(
        &self,
        category_id: &str,
        id: &str,
    ) -> Result<Option<Subcategory>> {
        let row = sqlx::query_as::<_, SubcategoryRow>(
            "SELECT id, category_id, name, slug FROM subcategories
             WHERE category_id = ? AND id = ?",
        )
        .bind(category_id)
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| NewsdeskError::Database(e.to_string()))?;

        Ok(row.map(Subcategory::from))
    }

    /// List a category's subcategories ordered by name.
    pub async fn list_subcategories(&self, category_id: &str) -> Result<Vec<Subcategory>> {
        let rows = sqlx::query_as::<_, SubcategoryRow>(
            "SELECT id, category_id, name, slug FROM subcategories
             WHERE category_id = ? ORDER BY name",
        )
        .bind(category_id)
        .fetch_all(self.pool)
        .await
        .map_err(|e| NewsdeskError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(Subcategory::from).collect())
    }

    /// Update a subcategory. Unset fields keep their current value.
    pub async fn update_subcategory(
        &self,
        category_id: &str,
        id: &str,
        update: &CategoryUpdate,
    ) -> Result<Subcategory> {
        let existing = self
            .get_subcategory(category_id, id)
            .await?
            .ok_or_else(|| NewsdeskError::NotFound("subcategory".to_string()))?;

        let name = update.name.clone().unwrap_or(existing.name);
        let slug = update.slug.clone().unwrap_or(existing.slug);

        sqlx::query("UPDATE subcategories SET name = ?, slug = ? WHERE category_id = ? AND id = ?")
            .bind(&name)
            .bind(&slug)
            .bind(category_id)
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| NewsdeskError::Database(e.to_string()))?;

        self.get_subcategory(category_id, id)
            .await?
            .ok_or_else(|| NewsdeskError::NotFound("subcategory".to_string()))
    }

    /// Delete a subcategory.
    pub async fn delete_subcategory(&self, category_id: &str, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM subcategories WHERE category_id = ? AND id = ?")
            .bind(category_id)
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| NewsdeskError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    #[tokio::test]
    async fn test_category_crud() {
        let db = Database::connect_in_memory().await.unwrap();
        let repo = CategoryRepository::new(db.pool());

        let created = repo
            .create_category(&NewCategory::new("Technology").with_id("tech"))
            .await
            .unwrap();
        assert_eq!(created.slug, "technology");

        let updated = repo
            .update_category("tech", &CategoryUpdate::new().with_name("Tech"))
            .await
            .unwrap();
        assert_eq!(updated.name, "Tech");
        assert_eq!(updated.slug, "technology");

        assert!(repo.delete_category("tech").await.unwrap());
        assert!(repo.get_category("tech").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_category_cascades_to_subcategories() {
        let db = Database::connect_in_memory().await.unwrap();
        let repo = CategoryRepository::new(db.pool());

        repo.create_category(&NewCategory::new("Tech").with_id("tech"))
            .await
            .unwrap();
        repo.create_subcategory("tech", &NewCategory::new("AI").with_id("tech-ai"))
            .await
            .unwrap();
        repo.create_subcategory("tech", &NewCategory::new("Web").with_id("tech-web"))
            .await
            .unwrap();

        assert!(repo.delete_category("tech").await.unwrap());
        assert!(repo
            .get_subcategory("tech", "tech-ai")
            .await
            .unwrap()
            .is_none());
        assert!(repo
            .get_subcategory("tech", "tech-web")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_create_subcategory_requires_parent() {
        let db = Database::connect_in_memory().await.unwrap();
        let repo = CategoryRepository::new(db.pool());

        let result = repo
            .create_subcategory("missing", &NewCategory::new("AI"))
            .await;
        assert!(matches!(result, Err(NewsdeskError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_ordering() {
        let db = Database::connect_in_memory().await.unwrap();
        let repo = CategoryRepository::new(db.pool());

        repo.create_category(&NewCategory::new("World").with_id("world"))
            .await
            .unwrap();
        repo.create_category(&NewCategory::new("Business").with_id("biz"))
            .await
            .unwrap();

        let names: Vec<_> = repo
            .list_categories()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Business", "World"]);
    }
}
