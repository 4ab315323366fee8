//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::crawler::PageResult;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageResult};
use crate::SquidError;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens or creates the database at `path`
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(SquidError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self, SquidError> {
        let conn = Connection::open(path)?;

        // Configure SQLite for better performance
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> Result<Self, SquidError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn load_ordered(&self, sql: &str, site: &str) -> StorageResult<Vec<String>> {
        let mut stmt = self.conn.prepare(sql)?;
        let values = stmt
            .query_map(params![site], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(values)
    }

    fn count(&self, sql: &str) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(sql, [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

impl Storage for SqliteStorage {
    fn save_page(&mut self, page: &PageResult) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;

        tx.execute("DELETE FROM page_links WHERE site = ?1", params![page.site])?;
        tx.execute("DELETE FROM page_keywords WHERE site = ?1", params![page.site])?;
        tx.execute(
            "INSERT INTO pages (site, crawled_at) VALUES (?1, ?2)
             ON CONFLICT(site) DO UPDATE SET crawled_at = excluded.crawled_at",
            params![page.site, now],
        )?;

        {
            let mut insert_link = tx.prepare(
                "INSERT INTO page_links (site, position, target) VALUES (?1, ?2, ?3)",
            )?;
            for (position, link) in page.links.iter().enumerate() {
                insert_link.execute(params![page.site, position as i64, link])?;
            }

            let mut insert_keyword = tx.prepare(
                "INSERT INTO page_keywords (site, position, keyword) VALUES (?1, ?2, ?3)",
            )?;
            for (position, keyword) in page.keywords.iter().enumerate() {
                insert_keyword.execute(params![page.site, position as i64, keyword])?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn exists(&self, site: &str) -> StorageResult<bool> {
        let found: Option<i64> = self
            .conn
            .query_row("SELECT 1 FROM pages WHERE site = ?1", params![site], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(found.is_some())
    }

    fn get_page(&self, site: &str) -> StorageResult<Option<PageResult>> {
        if !self.exists(site)? {
            return Ok(None);
        }

        let links = self.load_ordered(
            "SELECT target FROM page_links WHERE site = ?1 ORDER BY position",
            site,
        )?;
        let keywords = self.load_ordered(
            "SELECT keyword FROM page_keywords WHERE site = ?1 ORDER BY position",
            site,
        )?;

        Ok(Some(PageResult {
            site: site.to_string(),
            links,
            keywords,
        }))
    }

    fn count_pages(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM pages")
    }

    fn count_links(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM page_links")
    }

    fn count_keywords(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM page_keywords")
    }
}
