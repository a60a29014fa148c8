use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct Admin {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Design {
    pub id: i64,
    pub title: String,
    pub image_url: String,
    pub category_id: Option<i64>,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
}

/// Design row joined with its category name via LEFT JOIN; the record shape
/// of the gallery, the admin design list, the detail page, and the search
/// API (`category_name` is null for uncategorized designs).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DesignWithCategory {
    pub id: i64,
    pub title: String,
    pub image_url: String,
    pub category_id: Option<i64>,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub category_name: Option<String>,
}

/// Validated fields for creating or updating a design. Built by the admin
/// form handlers after trimming and emptiness checks.
#[derive(Debug, Clone)]
pub struct DesignInput {
    pub title: String,
    pub image_url: String,
    pub category_id: Option<i64>,
    pub featured: bool,
}
