use crate::model::{Product, StorageError};
use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;

const WISHLIST_PREFIX: &str = "wishlist/";
const CACHE_PREFIX: &str = "cache/";

/// Single-file key-value store with optional per-entry expiry. Values are
/// JSON; the wishlist and the scrape cache live on top of it under fixed
/// key prefixes.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens the database, creating the schema on first use.
    pub fn new(db_path: &str) -> Result<Self, StorageError> {
        Self::from_connection(Connection::open(db_path)?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StorageError> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                expires_at TEXT
            );
            ",
        )?;
        Ok(Self { conn })
    }

    /// Stores a JSON-serialized value. A `ttl` makes the entry invisible to
    /// reads after it elapses.
    pub fn set<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
    ) -> Result<(), StorageError> {
        let json = serde_json::to_string(value)?;
        let expires_at = ttl.map(|d| (Utc::now() + d).to_rfc3339());
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value, expires_at) VALUES (?1, ?2, ?3)",
            params![key, json, expires_at],
        )?;
        Ok(())
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let row: Option<(String, Option<String>)> = self
            .conn
            .query_row(
                "SELECT value, expires_at FROM kv WHERE key = ?1",
                params![key],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((json, expires_at)) = row else {
            return Ok(None);
        };
        if is_expired(expires_at.as_deref()) {
            self.delete(key)?;
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&json)?))
    }

    pub fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    /// All live values under a key prefix, in key order.
    pub fn list_by_prefix<T: DeserializeOwned>(
        &self,
        prefix: &str,
    ) -> Result<Vec<T>, StorageError> {
        let pattern = format!("{}%", prefix.replace('%', "\\%").replace('_', "\\_"));
        let mut stmt = self.conn.prepare(
            "SELECT value, expires_at FROM kv WHERE key LIKE ?1 ESCAPE '\\' ORDER BY key",
        )?;
        let rows = stmt.query_map(params![pattern], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, Option<String>>(1)?))
        })?;

        let mut values = Vec::new();
        for row in rows {
            let (json, expires_at) = row?;
            if !is_expired(expires_at.as_deref()) {
                values.push(serde_json::from_str(&json)?);
            }
        }
        Ok(values)
    }

    // --- Wishlist ---

    /// Saves a product to the wishlist. Returns false if it was already there.
    pub fn add_to_wishlist(&self, product: &Product) -> Result<bool, StorageError> {
        if self.is_in_wishlist(&product.id)? {
            return Ok(false);
        }
        self.set(&wishlist_key(&product.id), product, None)?;
        Ok(true)
    }

    pub fn remove_from_wishlist(&self, product_id: &str) -> Result<(), StorageError> {
        self.delete(&wishlist_key(product_id))
    }

    pub fn is_in_wishlist(&self, product_id: &str) -> Result<bool, StorageError> {
        Ok(self.get::<Product>(&wishlist_key(product_id))?.is_some())
    }

    pub fn wishlist(&self) -> Result<Vec<Product>, StorageError> {
        self.list_by_prefix(WISHLIST_PREFIX)
    }

    // --- Scrape cache ---

    pub fn cache_products(
        &self,
        cache_key: &str,
        products: &[Product],
        ttl_minutes: i64,
    ) -> Result<(), StorageError> {
        self.set(
            &format!("{CACHE_PREFIX}{cache_key}"),
            &products.to_vec(),
            Some(Duration::minutes(ttl_minutes)),
        )
    }

    pub fn cached_products(&self, cache_key: &str) -> Result<Option<Vec<Product>>, StorageError> {
        self.get(&format!("{CACHE_PREFIX}{cache_key}"))
    }
}

fn wishlist_key(product_id: &str) -> String {
    format!("{WISHLIST_PREFIX}{product_id}")
}

fn is_expired(expires_at: Option<&str>) -> bool {
    match expires_at {
        Some(ts) => DateTime::parse_from_rfc3339(ts)
            .map(|t| t.with_timezone(&Utc) < Utc::now())
            .unwrap_or(true),
        None => false,
    }
}
