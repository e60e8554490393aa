//! DDL Generation for Dataset Tables
//!
//! Generates the PostgreSQL DDL for the two metadata tables and for the
//! dynamically created per-dataset tables.

use crate::config::StoreConfig;
use crate::sql::sanitize::quote_identifier;

/// DDL generator for metadata and per-dataset tables
pub struct DdlGenerator<'a> {
    config: &'a StoreConfig,
}

impl<'a> DdlGenerator<'a> {
    /// Create a new DDL generator with the given configuration
    pub fn new(config: &'a StoreConfig) -> Self {
        Self { config }
    }

    /// Generate CREATE TABLE IF NOT EXISTS for the dataset metadata table
    pub fn datasets_table_ddl(&self) -> String {
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id VARCHAR(255) PRIMARY KEY,
                name VARCHAR(255) NOT NULL,
                table_name VARCHAR(255) UNIQUE NOT NULL,
                total_rows BIGINT NOT NULL DEFAULT 0,
                created_by VARCHAR(255) NOT NULL,
                created_at TIMESTAMPTZ DEFAULT NOW()
            )
            "#,
            quote_identifier(&self.config.datasets_table)
        )
    }

    /// Generate CREATE TABLE IF NOT EXISTS for the query-link metadata table
    ///
    /// `slug` carries a UNIQUE constraint so slug uniqueness is enforced by the
    /// engine at creation and rename alike.
    pub fn links_table_ddl(&self) -> String {
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id VARCHAR(255) PRIMARY KEY,
                dataset_id VARCHAR(255) NOT NULL,
                slug VARCHAR(255) UNIQUE NOT NULL,
                title VARCHAR(255),
                condition_columns JSONB NOT NULL,
                condition_requirements JSONB NOT NULL,
                created_by VARCHAR(255) NOT NULL,
                created_at TIMESTAMPTZ DEFAULT NOW()
            )
            "#,
            quote_identifier(&self.config.links_table)
        )
    }

    /// Generate CREATE TABLE for a per-dataset table
    ///
    /// The schema is exactly: `id` (row identity, ascending), one TEXT column per
    /// normalized imported name, `created_at` (import timestamp).
    pub fn create_dataset_table(&self, table_name: &str, columns: &[String]) -> String {
        let mut column_defs = vec!["id BIGSERIAL PRIMARY KEY".to_string()];

        for col in columns {
            column_defs.push(format!("{} TEXT", quote_identifier(col)));
        }

        column_defs.push("created_at TIMESTAMPTZ DEFAULT NOW()".to_string());

        format!(
            "CREATE TABLE {} ({})",
            quote_identifier(table_name),
            column_defs.join(", ")
        )
    }

    /// Generate DROP TABLE for a per-dataset table
    pub fn drop_dataset_table(&self, table_name: &str) -> String {
        format!("DROP TABLE IF EXISTS {} CASCADE", quote_identifier(table_name))
    }
}
