//! Configuration for DatasetStore
//!
//! Provides a builder pattern for configuring the store.

/// Configuration for the dataset store
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// PostgreSQL database URL
    pub database_url: String,
    /// Name of the dataset metadata table (default: "datasets")
    pub datasets_table: String,
    /// Name of the query-link metadata table (default: "query_links")
    pub links_table: String,
}

impl StoreConfig {
    /// Create a new configuration builder
    pub fn builder(database_url: impl Into<String>) -> StoreConfigBuilder {
        StoreConfigBuilder::new(database_url)
    }
}

/// Builder for StoreConfig
#[derive(Debug)]
pub struct StoreConfigBuilder {
    database_url: String,
    datasets_table: String,
    links_table: String,
}

impl StoreConfigBuilder {
    /// Create a new builder with the database URL
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            datasets_table: "datasets".to_string(),
            links_table: "query_links".to_string(),
        }
    }

    /// Set the dataset metadata table name (default: "datasets")
    pub fn datasets_table(mut self, name: impl Into<String>) -> Self {
        self.datasets_table = name.into();
        self
    }

    /// Set the query-link metadata table name (default: "query_links")
    pub fn links_table(mut self, name: impl Into<String>) -> Self {
        self.links_table = name.into();
        self
    }

    /// Build the configuration
    pub fn build(self) -> StoreConfig {
        StoreConfig {
            database_url: self.database_url,
            datasets_table: self.datasets_table,
            links_table: self.links_table,
        }
    }
}
