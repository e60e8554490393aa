//! # dataset-query-store
//!
//! A slug-addressed dynamic dataset and query-link engine for PostgreSQL.
//!
//! This crate materializes operator-uploaded rows into dedicated tables and
//! publishes restricted, shareable read-only query configurations over them.
//! Dataset and query-link metadata live in two fixed tables; row data lives in
//! dynamically created per-dataset tables whose columns are discovered at
//! runtime.
//!
//! ## Features
//!
//! - **Dynamic Dataset Tables**: each upload becomes its own table with one
//!   TEXT column per imported field plus `id` and `created_at`
//! - **Atomic Imports**: table creation, bulk insert, and metadata insert are
//!   one transaction; a bad column name aborts the whole upload
//! - **Query Links**: a public slug bound to an ordered, per-column
//!   required/optional searchable-column configuration
//! - **Live Condition Resolution**: stored configurations are intersected with
//!   the dataset's current columns at request time; vanished columns are
//!   silently dropped
//! - **SQL Injection Prevention**: runtime-discovered identifiers are always
//!   validated and quoted; search values are always bound as parameters
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dataset_query_store::{ConditionSpec, CreateLinkRequest, DatasetStore, StoreConfig};
//! use std::collections::HashMap;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = StoreConfig::builder("postgres://localhost/mydb").build();
//!     let store = DatasetStore::new(config).await?;
//!
//!     // Materialize an upload into a dataset table
//!     let dataset = store.create_dataset(
//!         "operator-1",
//!         "Employees",
//!         &[
//!             serde_json::json!({"name": "Alice", "dept": "Sales"}),
//!             serde_json::json!({"name": "Bob", "dept": "Engineering"}),
//!         ],
//!     ).await?;
//!
//!     // Publish a query link over a subset of its columns
//!     store.create_link(
//!         "operator-1",
//!         CreateLinkRequest::new(
//!             &dataset.id,
//!             "employees",
//!             vec![ConditionSpec::new("name").display_name("Name").required()],
//!         ),
//!     ).await?;
//!
//!     // The anonymous surface: fetch the form, then search
//!     let resolved = store.resolve_conditions("employees").await?;
//!     println!("{} condition(s)", resolved.conditions.len());
//!
//!     let mut values = HashMap::new();
//!     values.insert("name".to_string(), "Ali".to_string());
//!     let (rows, count) = store.execute_query("employees", &values).await?;
//!     println!("{} match(es): {:?}", count, rows);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Ownership
//!
//! Every administrative operation takes a verified principal identity supplied
//! by the embedding application; the store scopes all reads and mutations to
//! that owner and performs no authentication itself. The slug-addressed
//! surface (`resolve_conditions`, `execute_query`) is intentionally anonymous
//! and read-only, and never exposes the owner.

pub mod config;
pub mod dataset;
pub mod error;
pub mod link;
pub mod sql;
pub mod store;

// Re-export main types for convenience
pub use config::{StoreConfig, StoreConfigBuilder};
pub use dataset::{ColumnInfo, Dataset};
pub use error::{Result, StoreError};
pub use link::{
    ConditionDescriptor, ConditionRequirement, ConditionSpec, CreateLinkRequest, QueryLink,
    QueryLinkSummary, ResolvedConditions,
};
pub use store::DatasetStore;

// Re-export SQL utilities for advanced users
pub use sql::ddl::DdlGenerator;
pub use sql::filter::build_filter_clause;
pub use sql::sanitize::{
    derive_table_name, is_valid_table_name, normalize_column_name, quote_identifier,
};
