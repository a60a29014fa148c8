use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};

use crate::db::models::{Admin, Category, Design, DesignInput, DesignWithCategory};
use crate::db::schema::SQLITE_INIT;
use crate::error::AtelierError;

pub type SqlitePool = Pool<Sqlite>;

/// Shared SELECT for the joined read model. Every list/detail/search query
/// over designs goes through this projection.
const DESIGN_WITH_CATEGORY: &str = "SELECT design.id, design.title, design.image_url, \
     design.category_id, design.featured, design.created_at, \
     category.name AS category_name \
     FROM design LEFT JOIN category ON design.category_id = category.id";

#[derive(Clone)]
pub struct GalleryStore {
    pool: SqlitePool,
}

impl GalleryStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Open the database behind `database_url`, creating the file if needed.
    /// Foreign keys are enabled on every connection; the category/design
    /// link relies on `ON DELETE SET NULL` firing.
    pub async fn connect(database_url: &str) -> Result<Self, AtelierError> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        Ok(Self { pool })
    }

    /// Initialize the schema by executing the bundled DDL.
    /// Safe to run on every startup.
    pub async fn init_schema(&self) -> Result<(), AtelierError> {
        // execute multiple statements safely (SQLite supports multi-commands but sqlx::query doesn't)
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    // ----- admin -----

    pub async fn count_admins(&self) -> Result<i64, AtelierError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM admin")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }

    pub async fn seed_admin(&self, username: &str, password_hash: &str) -> Result<(), AtelierError> {
        sqlx::query("INSERT INTO admin (username, password_hash) VALUES (?, ?)")
            .bind(username)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn admin_by_username(&self, username: &str) -> Result<Option<Admin>, AtelierError> {
        let row = sqlx::query("SELECT id, username, password_hash FROM admin WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Self::row_to_admin).transpose()
    }

    /// Overwrite credentials on every admin row (one row in practice).
    pub async fn overwrite_admin(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<(), AtelierError> {
        sqlx::query("UPDATE admin SET username = ?, password_hash = ?")
            .bind(username)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // ----- categories -----

    pub async fn list_categories(&self) -> Result<Vec<Category>, AtelierError> {
        let rows = sqlx::query("SELECT id, name, created_at FROM category ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Self::row_to_category).collect()
    }

    pub async fn create_category(&self, name: &str) -> Result<(), AtelierError> {
        sqlx::query("INSERT INTO category (name) VALUES (?)")
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn rename_category(&self, id: i64, name: &str) -> Result<(), AtelierError> {
        sqlx::query("UPDATE category SET name = ? WHERE id = ?")
            .bind(name)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Referencing designs keep their rows; the schema clears their
    /// `category_id` via ON DELETE SET NULL.
    pub async fn delete_category(&self, id: i64) -> Result<(), AtelierError> {
        sqlx::query("DELETE FROM category WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn count_categories(&self) -> Result<i64, AtelierError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM category")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }

    // ----- designs -----

    pub async fn featured_designs(&self, limit: i64) -> Result<Vec<Design>, AtelierError> {
        let rows = sqlx::query(
            "SELECT id, title, image_url, category_id, featured, created_at \
             FROM design WHERE featured = 1 \
             ORDER BY created_at DESC, id DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Self::row_to_design).collect()
    }

    pub async fn newest_designs(&self, limit: i64) -> Result<Vec<Design>, AtelierError> {
        let rows = sqlx::query(
            "SELECT id, title, image_url, category_id, featured, created_at \
             FROM design ORDER BY created_at DESC, id DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Self::row_to_design).collect()
    }

    /// Case-insensitive substring search over title and image URL, with an
    /// optional category restriction. Ordered featured-first then newest.
    /// The WHERE clause is assembled from fixed fragments; caller values
    /// only ever travel as bound parameters.
    pub async fn search_designs(
        &self,
        q: Option<&str>,
        category_id: Option<i64>,
    ) -> Result<Vec<DesignWithCategory>, AtelierError> {
        let mut sql = String::from(DESIGN_WITH_CATEGORY);
        let mut clauses: Vec<&str> = Vec::new();
        if category_id.is_some() {
            clauses.push("category.id = ?");
        }
        if q.is_some() {
            clauses.push(
                "(lower(design.title) LIKE '%' || lower(?) || '%' \
                 OR lower(design.image_url) LIKE '%' || lower(?) || '%')",
            );
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY design.featured DESC, design.created_at DESC, design.id DESC");

        let mut query = sqlx::query(&sql);
        if let Some(cat) = category_id {
            query = query.bind(cat);
        }
        if let Some(q) = q {
            query = query.bind(q).bind(q);
        }
        let rows = query.fetch_all(&self.pool).await?;
        rows.into_iter().map(Self::row_to_design_with_category).collect()
    }

    pub async fn design_with_category(
        &self,
        id: i64,
    ) -> Result<Option<DesignWithCategory>, AtelierError> {
        let sql = format!("{DESIGN_WITH_CATEGORY} WHERE design.id = ?");
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        row.map(Self::row_to_design_with_category).transpose()
    }

    pub async fn list_designs_with_categories(
        &self,
    ) -> Result<Vec<DesignWithCategory>, AtelierError> {
        let sql = format!("{DESIGN_WITH_CATEGORY} ORDER BY design.created_at DESC, design.id DESC");
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.into_iter().map(Self::row_to_design_with_category).collect()
    }

    pub async fn create_design(&self, input: &DesignInput) -> Result<(), AtelierError> {
        sqlx::query(
            "INSERT INTO design (title, image_url, category_id, featured) VALUES (?, ?, ?, ?)",
        )
        .bind(&input.title)
        .bind(&input.image_url)
        .bind(input.category_id)
        .bind(i64::from(input.featured))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// In-place update; affecting zero rows is not an error.
    pub async fn update_design(&self, id: i64, input: &DesignInput) -> Result<(), AtelierError> {
        sqlx::query(
            "UPDATE design SET title = ?, image_url = ?, category_id = ?, featured = ? WHERE id = ?",
        )
        .bind(&input.title)
        .bind(&input.image_url)
        .bind(input.category_id)
        .bind(i64::from(input.featured))
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn delete_design(&self, id: i64) -> Result<(), AtelierError> {
        sqlx::query("DELETE FROM design WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Current featured state, or `None` when the id has no row.
    pub async fn design_featured(&self, id: i64) -> Result<Option<bool>, AtelierError> {
        let row = sqlx::query("SELECT featured FROM design WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(row) => {
                let featured: i64 = row.try_get("featured")?;
                Ok(Some(featured != 0))
            }
            None => Ok(None),
        }
    }

    pub async fn set_featured(&self, id: i64, featured: bool) -> Result<(), AtelierError> {
        sqlx::query("UPDATE design SET featured = ? WHERE id = ?")
            .bind(i64::from(featured))
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn count_designs(&self) -> Result<i64, AtelierError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM design")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }

    pub async fn count_featured(&self) -> Result<i64, AtelierError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM design WHERE featured = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }

    // ----- row conversions -----

    fn row_to_admin(row: SqliteRow) -> Result<Admin, AtelierError> {
        Ok(Admin {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            password_hash: row.try_get("password_hash")?,
        })
    }

    fn row_to_category(row: SqliteRow) -> Result<Category, AtelierError> {
        let created_at: String = row.try_get("created_at")?;
        Ok(Category {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            created_at: parse_timestamp(&created_at)?,
        })
    }

    fn row_to_design(row: SqliteRow) -> Result<Design, AtelierError> {
        let featured: i64 = row.try_get("featured")?;
        let created_at: String = row.try_get("created_at")?;
        Ok(Design {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            image_url: row.try_get("image_url")?,
            category_id: row.try_get("category_id")?,
            featured: featured != 0,
            created_at: parse_timestamp(&created_at)?,
        })
    }

    fn row_to_design_with_category(row: SqliteRow) -> Result<DesignWithCategory, AtelierError> {
        let featured: i64 = row.try_get("featured")?;
        let created_at: String = row.try_get("created_at")?;
        Ok(DesignWithCategory {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            image_url: row.try_get("image_url")?,
            category_id: row.try_get("category_id")?,
            featured: featured != 0,
            created_at: parse_timestamp(&created_at)?,
            category_name: row.try_get("category_name")?,
        })
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, AtelierError> {
    let parsed = DateTime::parse_from_rfc3339(raw).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
    Ok(parsed.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::*;

    fn temp_database(tag: &str) -> (String, PathBuf) {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before UNIX_EPOCH")
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!("atelier-{}-{}-{}.sqlite", tag, std::process::id(), nanos));
        (format!("sqlite:{}", path.display()), path)
    }

    async fn open_store(tag: &str) -> (GalleryStore, PathBuf) {
        let (url, path) = temp_database(tag);
        let store = GalleryStore::connect(&url).await.expect("connect failed");
        store.init_schema().await.expect("schema init failed");
        (store, path)
    }

    fn input(title: &str, image_url: &str, category_id: Option<i64>, featured: bool) -> DesignInput {
        DesignInput {
            title: title.to_string(),
            image_url: image_url.to_string(),
            category_id,
            featured,
        }
    }

    #[tokio::test]
    async fn init_schema_is_idempotent() {
        let (store, path) = open_store("idempotent").await;
        store.init_schema().await.expect("second init failed");
        store.init_schema().await.expect("third init failed");
        let _ = fs::remove_file(path);
    }

    #[tokio::test]
    async fn created_category_listed_once_sorted_by_name() {
        let (store, path) = open_store("cat-list").await;

        store.create_category("Tables").await.expect("insert failed");
        store.create_category("Chairs").await.expect("insert failed");

        let cats = store.list_categories().await.expect("list failed");
        let names: Vec<&str> = cats.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Chairs", "Tables"]);

        let _ = fs::remove_file(path);
    }

    #[tokio::test]
    async fn duplicate_category_name_rejected() {
        let (store, path) = open_store("cat-dup").await;

        store.create_category("Chairs").await.expect("insert failed");
        let err = store
            .create_category("Chairs")
            .await
            .expect_err("duplicate insert should fail");
        assert!(err.is_constraint_violation(), "unexpected error: {err}");
        assert_eq!(store.count_categories().await.expect("count failed"), 1);

        let _ = fs::remove_file(path);
    }

    #[tokio::test]
    async fn deleting_category_clears_design_links() {
        let (store, path) = open_store("cat-delete").await;

        store.create_category("Chairs").await.expect("insert failed");
        let cats = store.list_categories().await.expect("list failed");
        let cat_id = cats[0].id;

        store
            .create_design(&input("Blue Chair", "https://img/blue.jpg", Some(cat_id), false))
            .await
            .expect("insert failed");
        store
            .create_design(&input("Green Chair", "https://img/green.jpg", Some(cat_id), false))
            .await
            .expect("insert failed");

        store.delete_category(cat_id).await.expect("delete failed");

        let designs = store
            .list_designs_with_categories()
            .await
            .expect("list failed");
        assert_eq!(designs.len(), 2, "no design may be cascaded away");
        for d in &designs {
            assert_eq!(d.category_id, None);
            assert_eq!(d.category_name, None);
        }

        let _ = fs::remove_file(path);
    }

    #[tokio::test]
    async fn design_with_unknown_category_rejected() {
        let (store, path) = open_store("bad-fk").await;

        let err = store
            .create_design(&input("Lamp", "https://img/lamp.jpg", Some(999), false))
            .await
            .expect_err("dangling category_id should fail");
        assert!(err.is_constraint_violation(), "unexpected error: {err}");
        assert_eq!(store.count_designs().await.expect("count failed"), 0);

        let _ = fs::remove_file(path);
    }

    #[tokio::test]
    async fn featured_flag_flips_and_missing_id_is_none() {
        let (store, path) = open_store("toggle").await;

        store
            .create_design(&input("Lamp", "https://img/lamp.jpg", None, false))
            .await
            .expect("insert failed");
        let id = store.list_designs_with_categories().await.expect("list failed")[0].id;

        assert_eq!(store.design_featured(id).await.expect("read failed"), Some(false));
        store.set_featured(id, true).await.expect("update failed");
        assert_eq!(store.design_featured(id).await.expect("read failed"), Some(true));
        store.set_featured(id, false).await.expect("update failed");
        assert_eq!(store.design_featured(id).await.expect("read failed"), Some(false));

        assert_eq!(store.design_featured(id + 1).await.expect("read failed"), None);

        let _ = fs::remove_file(path);
    }

    #[tokio::test]
    async fn search_matches_title_and_url_case_insensitively() {
        let (store, path) = open_store("search").await;

        store
            .create_design(&input("Blue Chair", "https://img/blue-chair.jpg", None, false))
            .await
            .expect("insert failed");
        store
            .create_design(&input("Red Table", "https://img/red-table.jpg", None, false))
            .await
            .expect("insert failed");

        let hits = store.search_designs(Some("CHAIR"), None).await.expect("search failed");
        let titles: Vec<&str> = hits.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, vec!["Blue Chair"]);

        // substring of the URL counts too
        let hits = store.search_designs(Some("red-table"), None).await.expect("search failed");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Red Table");

        let _ = fs::remove_file(path);
    }

    #[tokio::test]
    async fn search_orders_featured_first_then_newest() {
        let (store, path) = open_store("search-order").await;

        store
            .create_design(&input("Plain Old", "https://img/1.jpg", None, false))
            .await
            .expect("insert failed");
        store
            .create_design(&input("Featured Old", "https://img/2.jpg", None, true))
            .await
            .expect("insert failed");
        store
            .create_design(&input("Plain New", "https://img/3.jpg", None, false))
            .await
            .expect("insert failed");

        let hits = store.search_designs(None, None).await.expect("search failed");
        let titles: Vec<&str> = hits.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, vec!["Featured Old", "Plain New", "Plain Old"]);

        let _ = fs::remove_file(path);
    }

    #[tokio::test]
    async fn search_restricts_by_category() {
        let (store, path) = open_store("search-cat").await;

        store.create_category("Chairs").await.expect("insert failed");
        store.create_category("Tables").await.expect("insert failed");
        let cats = store.list_categories().await.expect("list failed");
        let (chairs, tables) = (cats[0].id, cats[1].id);

        store
            .create_design(&input("Blue Chair", "https://img/blue.jpg", Some(chairs), false))
            .await
            .expect("insert failed");
        store
            .create_design(&input("Red Table", "https://img/red.jpg", Some(tables), false))
            .await
            .expect("insert failed");

        let hits = store.search_designs(None, Some(tables)).await.expect("search failed");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Red Table");
        assert_eq!(hits[0].category_name.as_deref(), Some("Tables"));

        let _ = fs::remove_file(path);
    }

    #[tokio::test]
    async fn newest_first_breaks_same_second_ties_by_id() {
        let (store, path) = open_store("tiebreak").await;

        for n in 1..=3 {
            store
                .create_design(&input(&format!("Design {n}"), "https://img/x.jpg", None, false))
                .await
                .expect("insert failed");
        }

        let newest = store.newest_designs(6).await.expect("list failed");
        let titles: Vec<&str> = newest.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, vec!["Design 3", "Design 2", "Design 1"]);

        let _ = fs::remove_file(path);
    }
}
