//! DatasetStore - Main entry point for dataset and query-link management
//!
//! This module provides the main `DatasetStore` struct that materializes
//! uploaded rows into per-dataset PostgreSQL tables and serves the public,
//! slug-addressed query surface over them.

use std::collections::HashMap;

use sqlx::{PgPool, Row};

use crate::config::StoreConfig;
use crate::dataset::{cell_text, ColumnInfo, Dataset};
use crate::error::{Result, StoreError};
use crate::link::{
    decode_condition_columns, decode_condition_requirements, resolve_descriptors,
    ConditionRequirement, CreateLinkRequest, QueryLink, QueryLinkSummary, ResolvedConditions,
};
use crate::sql::ddl::DdlGenerator;
use crate::sql::filter::build_filter_clause;
use crate::sql::sanitize::{
    derive_table_name, is_valid_table_name, normalize_column_name, quote_identifier,
};

/// Slug-addressed dynamic dataset store
///
/// Manages dataset and query-link metadata in two fixed tables and row data in
/// dynamically created per-dataset tables. All handlers are stateless; the
/// pooled connections are the only shared resource.
pub struct DatasetStore {
    /// Database connection pool
    pool: PgPool,
    /// Store configuration
    config: StoreConfig,
}

/// Slug-resolution target: everything the public surface may see about a link
struct SlugTarget {
    title: Option<String>,
    table_name: String,
    condition_columns: Vec<String>,
    condition_requirements: HashMap<String, ConditionRequirement>,
}

impl DatasetStore {
    /// Create a new DatasetStore from configuration
    ///
    /// This will:
    /// 1. Connect to the database
    /// 2. Create the metadata tables if they don't exist
    pub async fn new(config: StoreConfig) -> Result<Self> {
        let pool = PgPool::connect(&config.database_url).await.map_err(|e| {
            StoreError::Connection(format!("Database connection failed: {}", e))
        })?;

        let store = Self { pool, config };
        store.ensure_metadata_tables().await?;

        Ok(store)
    }

    /// Create a new DatasetStore from an existing pool
    ///
    /// Use this when you already have a connection pool and want to share it
    /// with the store.
    pub async fn from_pool(pool: PgPool, config: StoreConfig) -> Result<Self> {
        let store = Self { pool, config };
        store.ensure_metadata_tables().await?;
        Ok(store)
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Ensures the dataset and query-link metadata tables exist
    async fn ensure_metadata_tables(&self) -> Result<()> {
        let ddl = DdlGenerator::new(&self.config);

        sqlx::query(&ddl.datasets_table_ddl())
            .execute(&self.pool)
            .await?;
        sqlx::query(&ddl.links_table_ddl())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    // =========================================================================
    // Dataset Operations
    // =========================================================================

    /// Create a dataset from an ordered sequence of homogeneous-key records
    ///
    /// The column set is inferred from the first record's keys, in order; every
    /// inferred name must pass sanitization or the whole upload is rejected
    /// naming the first offending column. Table creation, row insertion, and
    /// the metadata insert run in one transaction: any failure leaves no trace.
    pub async fn create_dataset(
        &self,
        owner_id: &str,
        name: &str,
        rows: &[serde_json::Value],
    ) -> Result<Dataset> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::validation("Dataset name is required"));
        }
        if rows.is_empty() {
            return Err(StoreError::validation("Uploaded sheet is empty"));
        }

        let first = rows[0]
            .as_object()
            .ok_or_else(|| StoreError::validation("Uploaded rows must be objects"))?;
        if first.is_empty() {
            return Err(StoreError::validation("Uploaded sheet has no columns"));
        }

        // Raw key -> normalized column name, preserving the imported order
        let mut columns = Vec::with_capacity(first.len());
        for raw in first.keys() {
            let normalized = normalize_column_name(raw).map_err(StoreError::Validation)?;
            columns.push((raw.clone(), normalized));
        }

        let dataset_id = uuid::Uuid::new_v4().to_string();
        let table_name = derive_table_name(&dataset_id);
        let normalized: Vec<String> = columns.iter().map(|(_, n)| n.clone()).collect();
        let total_rows = rows.len() as i64;

        let ddl = DdlGenerator::new(&self.config);
        let mut tx = self.pool.begin().await?;

        sqlx::query(&ddl.create_dataset_table(&table_name, &normalized))
            .execute(&mut *tx)
            .await?;

        let insert_sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_identifier(&table_name),
            normalized
                .iter()
                .map(|col| quote_identifier(col))
                .collect::<Vec<_>>()
                .join(", "),
            (1..=normalized.len())
                .map(|i| format!("${}", i))
                .collect::<Vec<_>>()
                .join(", ")
        );

        for row in rows {
            let mut query = sqlx::query(&insert_sql);
            for (raw, _) in &columns {
                query = query.bind(cell_text(row.get(raw).unwrap_or(&serde_json::Value::Null)));
            }
            query.execute(&mut *tx).await?;
        }

        let insert_meta = format!(
            "INSERT INTO {} (id, name, table_name, total_rows, created_by) \
             VALUES ($1, $2, $3, $4, $5) RETURNING created_at",
            quote_identifier(&self.config.datasets_table)
        );
        let meta_row = sqlx::query(&insert_meta)
            .bind(&dataset_id)
            .bind(name)
            .bind(&table_name)
            .bind(total_rows)
            .bind(owner_id)
            .fetch_one(&mut *tx)
            .await?;
        let created_at: chrono::DateTime<chrono::Utc> = meta_row.try_get("created_at")?;

        tx.commit().await?;

        tracing::info!(
            dataset_id = %dataset_id,
            table = %table_name,
            rows = total_rows,
            "dataset created"
        );

        Ok(Dataset {
            id: dataset_id,
            created_at: created_at.to_rfc3339(),
            name: name.to_string(),
            table_name,
            total_rows,
            created_by: owner_id.to_string(),
        })
    }

    /// Get a dataset owned by the caller
    pub async fn get_dataset(&self, owner_id: &str, dataset_id: &str) -> Result<Option<Dataset>> {
        let select_sql = format!(
            "SELECT id, created_at, name, table_name, total_rows, created_by \
             FROM {} WHERE id = $1 AND created_by = $2",
            quote_identifier(&self.config.datasets_table)
        );

        let result = sqlx::query(&select_sql)
            .bind(dataset_id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?;

        match result {
            Some(row) => Ok(Some(Self::row_to_dataset(&row)?)),
            None => Ok(None),
        }
    }

    /// List the caller's datasets, newest first
    pub async fn list_datasets(&self, owner_id: &str) -> Result<Vec<Dataset>> {
        let select_sql = format!(
            "SELECT id, created_at, name, table_name, total_rows, created_by \
             FROM {} WHERE created_by = $1 ORDER BY created_at DESC LIMIT 20",
            quote_identifier(&self.config.datasets_table)
        );

        let rows = sqlx::query(&select_sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(Self::row_to_dataset).collect()
    }

    /// Rename a dataset's display label
    ///
    /// The label is the only mutable Dataset field; the backing table name is
    /// fixed for the dataset's lifetime.
    pub async fn rename_dataset(
        &self,
        owner_id: &str,
        dataset_id: &str,
        new_name: &str,
    ) -> Result<()> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(StoreError::validation("Dataset name must not be empty"));
        }

        let update_sql = format!(
            "UPDATE {} SET name = $1 WHERE id = $2 AND created_by = $3",
            quote_identifier(&self.config.datasets_table)
        );

        let result = sqlx::query(&update_sql)
            .bind(new_name)
            .bind(dataset_id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::dataset_not_found(dataset_id));
        }

        Ok(())
    }

    /// Delete a dataset, its backing table, and every dependent query link
    ///
    /// The stored table name must still match the generated-name pattern; a
    /// corrupted metadata row is refused rather than interpolated into DROP.
    /// Link deletion, table drop, and metadata removal run in one transaction.
    pub async fn delete_dataset(&self, owner_id: &str, dataset_id: &str) -> Result<()> {
        let dataset = self
            .get_dataset(owner_id, dataset_id)
            .await?
            .ok_or_else(|| StoreError::dataset_not_found(dataset_id))?;

        if !is_valid_table_name(&dataset.table_name) {
            return Err(StoreError::validation(format!(
                "Invalid table name: {}",
                dataset.table_name
            )));
        }

        let ddl = DdlGenerator::new(&self.config);
        let mut tx = self.pool.begin().await?;

        let delete_links = format!(
            "DELETE FROM {} WHERE dataset_id = $1",
            quote_identifier(&self.config.links_table)
        );
        sqlx::query(&delete_links)
            .bind(dataset_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(&ddl.drop_dataset_table(&dataset.table_name))
            .execute(&mut *tx)
            .await?;

        let delete_meta = format!(
            "DELETE FROM {} WHERE id = $1",
            quote_identifier(&self.config.datasets_table)
        );
        sqlx::query(&delete_meta)
            .bind(dataset_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(dataset_id = %dataset_id, table = %dataset.table_name, "dataset deleted");

        Ok(())
    }

    /// List a dataset's live columns, excluding the system columns
    ///
    /// Introspects the backing table, so the result reflects the current
    /// physical definition order, not what any link remembers.
    pub async fn list_columns(&self, dataset: &Dataset) -> Result<Vec<ColumnInfo>> {
        self.live_columns(&dataset.table_name).await
    }

    /// Full unfiltered scan of a dataset's rows, ordered by row identity
    pub async fn list_rows(&self, dataset: &Dataset) -> Result<Vec<serde_json::Value>> {
        let columns = self.live_columns(&dataset.table_name).await?;

        let mut select_columns = vec!["id".to_string()];
        select_columns.extend(columns.iter().map(|col| quote_identifier(&col.name)));
        select_columns.push("created_at".to_string());

        let select_sql = format!(
            "SELECT {} FROM {} ORDER BY id",
            select_columns.join(", "),
            quote_identifier(&dataset.table_name)
        );

        let rows = sqlx::query(&select_sql).fetch_all(&self.pool).await?;

        Ok(rows
            .iter()
            .map(|row| Self::row_to_record(row, &columns))
            .collect())
    }

    /// Update a single cell in a dataset row
    ///
    /// The column must sanitize successfully AND currently exist on the table
    /// (system columns excluded); anything else is rejected rather than
    /// silently creating new columns. Last writer wins; there is no
    /// optimistic-concurrency check.
    pub async fn update_cell(
        &self,
        owner_id: &str,
        dataset_id: &str,
        row_id: i64,
        column_name: &str,
        value: Option<&str>,
    ) -> Result<()> {
        let dataset = self
            .get_dataset(owner_id, dataset_id)
            .await?
            .ok_or_else(|| StoreError::dataset_not_found(dataset_id))?;

        let normalized = normalize_column_name(column_name).map_err(StoreError::Validation)?;

        let live = self.live_columns(&dataset.table_name).await?;
        if !live.iter().any(|col| col.name == normalized) {
            return Err(StoreError::validation(format!(
                "Invalid column name: {}",
                column_name
            )));
        }

        let update_sql = format!(
            "UPDATE {} SET {} = $1 WHERE id = $2",
            quote_identifier(&dataset.table_name),
            quote_identifier(&normalized)
        );

        sqlx::query(&update_sql)
            .bind(value)
            .bind(row_id)
            .execute(&self.pool)
            .await?;

        tracing::debug!(dataset_id = %dataset_id, row_id, column = %normalized, "cell updated");

        Ok(())
    }

    // =========================================================================
    // Query Link Operations
    // =========================================================================

    /// Create a query link over a dataset
    ///
    /// Persists the searchable-column ordering and the requirement map as two
    /// separate blobs. Slug uniqueness is enforced by the storage engine; a
    /// collision surfaces as `DuplicateSlug`.
    pub async fn create_link(
        &self,
        owner_id: &str,
        request: CreateLinkRequest,
    ) -> Result<QueryLink> {
        let slug = request.slug.trim();
        if slug.is_empty() {
            return Err(StoreError::validation("Slug is required"));
        }

        self.get_dataset(owner_id, &request.dataset_id)
            .await?
            .ok_or_else(|| StoreError::dataset_not_found(&request.dataset_id))?;

        let column_names: Vec<String> = request
            .conditions
            .iter()
            .map(|c| c.column_name.clone())
            .collect();
        let requirements: HashMap<String, ConditionRequirement> = request
            .conditions
            .iter()
            .map(|c| {
                (
                    c.column_name.clone(),
                    ConditionRequirement {
                        required: c.is_required,
                        display_name: c.display_name.clone(),
                    },
                )
            })
            .collect();

        let link_id = uuid::Uuid::new_v4().to_string();
        let title = request.title.as_deref().map(str::trim).filter(|t| !t.is_empty());

        let insert_sql = format!(
            "INSERT INTO {} \
             (id, dataset_id, slug, title, condition_columns, condition_requirements, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING created_at",
            quote_identifier(&self.config.links_table)
        );

        let row = sqlx::query(&insert_sql)
            .bind(&link_id)
            .bind(&request.dataset_id)
            .bind(slug)
            .bind(title)
            .bind(serde_json::to_value(&column_names)?)
            .bind(serde_json::to_value(&requirements)?)
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| Self::map_slug_conflict(e, slug))?;
        let created_at: chrono::DateTime<chrono::Utc> = row.try_get("created_at")?;

        tracing::info!(link_id = %link_id, slug = %slug, "query link created");

        Ok(QueryLink {
            id: link_id,
            created_at: created_at.to_rfc3339(),
            dataset_id: request.dataset_id,
            slug: slug.to_string(),
            title: title.map(str::to_string),
            condition_columns: column_names,
            condition_requirements: requirements,
            created_by: owner_id.to_string(),
        })
    }

    /// Get a query link owned by the caller
    pub async fn get_link(&self, owner_id: &str, link_id: &str) -> Result<Option<QueryLink>> {
        let select_sql = format!(
            "SELECT id, created_at, dataset_id, slug, title, \
             condition_columns, condition_requirements, created_by \
             FROM {} WHERE id = $1 AND created_by = $2",
            quote_identifier(&self.config.links_table)
        );

        let result = sqlx::query(&select_sql)
            .bind(link_id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?;

        match result {
            Some(row) => Ok(Some(Self::row_to_link(&row)?)),
            None => Ok(None),
        }
    }

    /// List the caller's query links, newest first, with dataset display names
    pub async fn list_links(&self, owner_id: &str) -> Result<Vec<QueryLinkSummary>> {
        let select_sql = format!(
            "SELECT ql.id, ql.slug, ql.title, ql.created_at, d.name AS dataset_name \
             FROM {} ql LEFT JOIN {} d ON ql.dataset_id = d.id \
             WHERE ql.created_by = $1 ORDER BY ql.created_at DESC",
            quote_identifier(&self.config.links_table),
            quote_identifier(&self.config.datasets_table)
        );

        let rows = sqlx::query(&select_sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| {
                let created_at: chrono::DateTime<chrono::Utc> = row.try_get("created_at")?;
                Ok(QueryLinkSummary {
                    id: row.try_get("id")?,
                    slug: row.try_get("slug")?,
                    title: row.try_get("title")?,
                    dataset_name: row.try_get("dataset_name")?,
                    created_at: created_at.to_rfc3339(),
                })
            })
            .collect()
    }

    /// Change a link's slug and title
    ///
    /// Fails with `DuplicateSlug` if the slug belongs to a different link, and
    /// with `LinkNotFound` if the link does not exist or is not owned by the
    /// caller.
    pub async fn rename_link(
        &self,
        owner_id: &str,
        link_id: &str,
        new_slug: &str,
        new_title: Option<&str>,
    ) -> Result<()> {
        let slug = new_slug.trim();
        if slug.is_empty() {
            return Err(StoreError::validation("Slug is required"));
        }

        let links_table = quote_identifier(&self.config.links_table);

        let owned_sql = format!(
            "SELECT id FROM {} WHERE id = $1 AND created_by = $2",
            links_table
        );
        let owned = sqlx::query(&owned_sql)
            .bind(link_id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?;
        if owned.is_none() {
            return Err(StoreError::link_not_found(link_id));
        }

        let taken_sql = format!("SELECT id FROM {} WHERE slug = $1 AND id != $2", links_table);
        let taken = sqlx::query(&taken_sql)
            .bind(slug)
            .bind(link_id)
            .fetch_optional(&self.pool)
            .await?;
        if taken.is_some() {
            return Err(StoreError::duplicate_slug(slug));
        }

        let title = new_title.map(str::trim).filter(|t| !t.is_empty());

        // The UNIQUE constraint backs the pre-check against concurrent renames
        let update_sql = format!("UPDATE {} SET slug = $1, title = $2 WHERE id = $3", links_table);
        sqlx::query(&update_sql)
            .bind(slug)
            .bind(title)
            .bind(link_id)
            .execute(&self.pool)
            .await
            .map_err(|e| Self::map_slug_conflict(e, slug))?;

        tracing::info!(link_id = %link_id, slug = %slug, "query link renamed");

        Ok(())
    }

    /// Delete a query link
    ///
    /// Idempotent: deleting a missing or non-owned link succeeds and affects
    /// nothing.
    pub async fn delete_link(&self, owner_id: &str, link_id: &str) -> Result<()> {
        let delete_sql = format!(
            "DELETE FROM {} WHERE id = $1 AND created_by = $2",
            quote_identifier(&self.config.links_table)
        );

        let result = sqlx::query(&delete_sql)
            .bind(link_id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() > 0 {
            tracing::info!(link_id = %link_id, "query link deleted");
        }

        Ok(())
    }

    // =========================================================================
    // Public Surface
    // =========================================================================

    /// Resolve a slug into its public condition descriptors
    ///
    /// The stored column ordering is intersected with the dataset's current
    /// live columns, preserving the stored order and silently dropping any
    /// column that no longer exists.
    pub async fn resolve_conditions(&self, slug: &str) -> Result<ResolvedConditions> {
        let target = self
            .resolve_slug(slug)
            .await?
            .ok_or_else(|| StoreError::link_not_found(slug))?;

        if target.condition_columns.is_empty() {
            return Ok(ResolvedConditions {
                title: target.title,
                conditions: Vec::new(),
            });
        }

        let live = self.live_columns(&target.table_name).await?;
        let live_names: Vec<String> = live.into_iter().map(|col| col.name).collect();

        let conditions = resolve_descriptors(
            &target.condition_columns,
            &live_names,
            &target.condition_requirements,
        );

        Ok(ResolvedConditions {
            title: target.title,
            conditions,
        })
    }

    /// Execute a public query against a link's dataset
    ///
    /// The live condition list is re-derived here; a client-cached condition
    /// list is never trusted. Returns the matching rows (system columns
    /// included) and their count.
    pub async fn execute_query(
        &self,
        slug: &str,
        values: &HashMap<String, String>,
    ) -> Result<(Vec<serde_json::Value>, i64)> {
        let target = self
            .resolve_slug(slug)
            .await?
            .ok_or_else(|| StoreError::link_not_found(slug))?;

        let columns = self.live_columns(&target.table_name).await?;
        let live_names: Vec<String> = columns.iter().map(|col| col.name.clone()).collect();

        let conditions = resolve_descriptors(
            &target.condition_columns,
            &live_names,
            &target.condition_requirements,
        );

        let mut param_offset = 1;
        let (clause, params) = build_filter_clause(&conditions, values, &mut param_offset)?;

        let mut select_columns = vec!["id".to_string()];
        select_columns.extend(live_names.iter().map(|name| quote_identifier(name)));
        select_columns.push("created_at".to_string());

        let select_sql = format!(
            "SELECT {} FROM {} WHERE {} ORDER BY id",
            select_columns.join(", "),
            quote_identifier(&target.table_name),
            clause
        );

        let mut query = sqlx::query(&select_sql);
        for param in &params {
            query = query.bind(param);
        }
        let rows = query.fetch_all(&self.pool).await?;

        let records: Vec<serde_json::Value> = rows
            .iter()
            .map(|row| Self::row_to_record(row, &columns))
            .collect();
        let count = records.len() as i64;

        tracing::debug!(slug = %slug, count, "public query executed");

        Ok((records, count))
    }

    // =========================================================================
    // Internal Helpers
    // =========================================================================

    /// Look up a link by slug, joined with its dataset for the live table name
    ///
    /// Never selects `created_by`: the public surface has no owner concept.
    async fn resolve_slug(&self, slug: &str) -> Result<Option<SlugTarget>> {
        let select_sql = format!(
            "SELECT ql.title, ql.condition_columns, ql.condition_requirements, d.table_name \
             FROM {} ql JOIN {} d ON ql.dataset_id = d.id WHERE ql.slug = $1",
            quote_identifier(&self.config.links_table),
            quote_identifier(&self.config.datasets_table)
        );

        let result = sqlx::query(&select_sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = result else {
            return Ok(None);
        };

        let columns_blob: serde_json::Value = row.try_get("condition_columns")?;
        let requirements_blob: serde_json::Value = row.try_get("condition_requirements")?;

        Ok(Some(SlugTarget {
            title: row.try_get("title")?,
            table_name: row.try_get("table_name")?,
            condition_columns: decode_condition_columns(&columns_blob),
            condition_requirements: decode_condition_requirements(&requirements_blob),
        }))
    }

    /// Introspect a table's live columns, excluding `id` and `created_at`
    async fn live_columns(&self, table_name: &str) -> Result<Vec<ColumnInfo>> {
        let select_sql = "SELECT column_name::text AS name, data_type::text AS data_type \
             FROM information_schema.columns \
             WHERE table_schema = current_schema() \
               AND table_name = $1 \
               AND column_name NOT IN ('id', 'created_at') \
             ORDER BY ordinal_position";

        let rows = sqlx::query(select_sql)
            .bind(table_name)
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| {
                Ok(ColumnInfo {
                    name: row.try_get("name")?,
                    data_type: row.try_get("data_type")?,
                })
            })
            .collect()
    }

    fn row_to_dataset(row: &sqlx::postgres::PgRow) -> Result<Dataset> {
        let created_at: chrono::DateTime<chrono::Utc> = row.try_get("created_at")?;

        Ok(Dataset {
            id: row.try_get("id")?,
            created_at: created_at.to_rfc3339(),
            name: row.try_get("name")?,
            table_name: row.try_get("table_name")?,
            total_rows: row.try_get("total_rows")?,
            created_by: row.try_get("created_by")?,
        })
    }

    fn row_to_link(row: &sqlx::postgres::PgRow) -> Result<QueryLink> {
        let created_at: chrono::DateTime<chrono::Utc> = row.try_get("created_at")?;
        let columns_blob: serde_json::Value = row.try_get("condition_columns")?;
        let requirements_blob: serde_json::Value = row.try_get("condition_requirements")?;

        Ok(QueryLink {
            id: row.try_get("id")?,
            created_at: created_at.to_rfc3339(),
            dataset_id: row.try_get("dataset_id")?,
            slug: row.try_get("slug")?,
            title: row.try_get("title")?,
            condition_columns: decode_condition_columns(&columns_blob),
            condition_requirements: decode_condition_requirements(&requirements_blob),
            created_by: row.try_get("created_by")?,
        })
    }

    /// Convert a dataset row into a JSON record keyed by its live columns
    fn row_to_record(row: &sqlx::postgres::PgRow, columns: &[ColumnInfo]) -> serde_json::Value {
        let mut record = serde_json::Map::new();

        let id: i64 = row.try_get("id").unwrap_or_default();
        record.insert("id".to_string(), serde_json::Value::from(id));

        for col in columns {
            let value = row
                .try_get::<Option<String>, _>(col.name.as_str())
                .ok()
                .flatten();
            record.insert(
                col.name.clone(),
                value.map(serde_json::Value::String).unwrap_or(serde_json::Value::Null),
            );
        }

        let created_at = row
            .try_get::<chrono::DateTime<chrono::Utc>, _>("created_at")
            .map(|dt| dt.to_rfc3339())
            .unwrap_or_default();
        record.insert(
            "created_at".to_string(),
            serde_json::Value::String(created_at),
        );

        serde_json::Value::Object(record)
    }

    /// Map a storage-level unique violation on `slug` to `DuplicateSlug`
    fn map_slug_conflict(err: sqlx::Error, slug: &str) -> StoreError {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::duplicate_slug(slug)
            }
            _ => StoreError::Sql(err),
        }
    }
}
