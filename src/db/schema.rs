//! Database schema migrations for newsdesk.
//!
//! Each entry is applied once, in order, inside its own transaction.
//! Never edit an applied migration; append a new one instead.

/// Ordered list of schema migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: feeds, raw articles, categories, processed fan-out, cache
    r#"
    CREATE TABLE feeds (
        id          TEXT PRIMARY KEY,
        name        TEXT NOT NULL,
        url         TEXT NOT NULL,
        enabled     INTEGER NOT NULL DEFAULT 1,
        created_at  TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE raw_articles (
        id            TEXT PRIMARY KEY,
        source        TEXT NOT NULL,
        title         TEXT NOT NULL,
        link          TEXT NOT NULL,
        summary       TEXT NOT NULL DEFAULT '',
        published_at  TEXT NOT NULL,
        is_processed  INTEGER NOT NULL DEFAULT 0
    );

    CREATE INDEX idx_raw_articles_unprocessed
        ON raw_articles (is_processed, published_at);
    CREATE INDEX idx_raw_articles_published_at
        ON raw_articles (published_at);

    CREATE TABLE categories (
        id    TEXT PRIMARY KEY,
        name  TEXT NOT NULL,
        slug  TEXT NOT NULL
    );

    CREATE TABLE subcategories (
        id           TEXT PRIMARY KEY,
        category_id  TEXT NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
        name         TEXT NOT NULL,
        slug         TEXT NOT NULL
    );

    CREATE INDEX idx_subcategories_category ON subcategories (category_id);

    -- One row per (category, article): the category set is a fan-out key.
    -- Deliberately no FK to categories: copies outlive category deletion.
    CREATE TABLE processed_articles (
        category_id        TEXT NOT NULL,
        article_id         TEXT NOT NULL,
        title              TEXT NOT NULL,
        link               TEXT NOT NULL,
        source             TEXT NOT NULL,
        timestamp          TEXT NOT NULL,
        original_summary   TEXT NOT NULL DEFAULT '',
        categories         TEXT NOT NULL,
        generated_summary  TEXT NOT NULL DEFAULT '',
        summary_embedding  TEXT NOT NULL,
        processed_at       TEXT NOT NULL,
        PRIMARY KEY (category_id, article_id)
    );

    CREATE INDEX idx_processed_articles_timestamp
        ON processed_articles (category_id, timestamp);

    CREATE TABLE cache (
        key         TEXT PRIMARY KEY,
        value       TEXT NOT NULL,
        updated_at  TEXT NOT NULL
    );
    "#,
];
