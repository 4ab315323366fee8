//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Squid database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- One row per successfully crawled page, keyed by canonical URL
CREATE TABLE IF NOT EXISTS pages (
    site TEXT PRIMARY KEY NOT NULL,
    crawled_at TEXT NOT NULL
);

-- Outbound links in document order
CREATE TABLE IF NOT EXISTS page_links (
    site TEXT NOT NULL REFERENCES pages(site) ON DELETE CASCADE,
    position INTEGER NOT NULL,
    target TEXT NOT NULL,
    PRIMARY KEY (site, position)
);

CREATE INDEX IF NOT EXISTS idx_page_links_target ON page_links(target);

-- Heading keywords in document order
CREATE TABLE IF NOT EXISTS page_keywords (
    site TEXT NOT NULL REFERENCES pages(site) ON DELETE CASCADE,
    position INTEGER NOT NULL,
    keyword TEXT NOT NULL,
    PRIMARY KEY (site, position)
);

CREATE INDEX IF NOT EXISTS idx_page_keywords_keyword ON page_keywords(keyword);
"#;

/// Initializes the database schema
///
/// Safe to call on an existing database; every statement is idempotent.
pub fn initialize_schema(conn: &rusqlite::Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)
}
