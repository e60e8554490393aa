//! SQL utilities for the dataset store
//!
//! Provides DDL generation, identifier sanitization, and filter compilation.

pub mod ddl;
pub mod filter;
pub mod sanitize;

pub use ddl::DdlGenerator;
pub use filter::build_filter_clause;
pub use sanitize::{
    derive_table_name, is_valid_table_name, normalize_column_name, quote_identifier,
};
