//! Query-link types and condition resolution
//!
//! A Query Link binds a public slug to a dataset and an ordered condition
//! configuration. The configuration is persisted as two serialized blobs: the
//! ordered column list (canonical source of which columns are searchable) and
//! a per-column requirement map. Both are decoded defensively at read time.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Per-column requirement metadata stored in the requirement map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionRequirement {
    /// Whether the public form must supply a value for this column
    #[serde(default)]
    pub required: bool,
    /// Label shown on the public form in place of the raw column name
    #[serde(rename = "displayName", default)]
    pub display_name: String,
}

/// One searchable column selected by the operator at link-creation time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionSpec {
    #[serde(rename = "columnName")]
    pub column_name: String,
    #[serde(rename = "displayName", default)]
    pub display_name: String,
    #[serde(rename = "isRequired", default)]
    pub is_required: bool,
}

impl ConditionSpec {
    /// Create a condition spec for a column
    pub fn new(column_name: impl Into<String>) -> Self {
        Self {
            column_name: column_name.into(),
            display_name: String::new(),
            is_required: false,
        }
    }

    /// Set the display name
    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    /// Mark the condition as required
    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }
}

/// Request to create a new query link
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLinkRequest {
    /// The dataset the link queries
    #[serde(rename = "datasetId")]
    pub dataset_id: String,
    /// Public, globally unique path segment
    pub slug: String,
    /// Optional display title for the public form
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Ordered searchable-column selection
    pub conditions: Vec<ConditionSpec>,
}

impl CreateLinkRequest {
    /// Create a new link request
    pub fn new(
        dataset_id: impl Into<String>,
        slug: impl Into<String>,
        conditions: Vec<ConditionSpec>,
    ) -> Self {
        Self {
            dataset_id: dataset_id.into(),
            slug: slug.into(),
            title: None,
            conditions,
        }
    }

    /// Set the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Query-link metadata stored in the `query_links` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryLink {
    /// Unique identifier (UUID)
    pub id: String,
    /// Timestamp when the link was created
    #[serde(rename = "createdAt")]
    pub created_at: String,
    /// Owning dataset id
    #[serde(rename = "datasetId")]
    pub dataset_id: String,
    /// Public path segment, unique system-wide
    pub slug: String,
    /// Optional display title
    pub title: Option<String>,
    /// Ordered searchable-column list as stored at creation time
    #[serde(rename = "conditionColumns")]
    pub condition_columns: Vec<String>,
    /// Requirement map keyed by column name
    #[serde(rename = "conditionRequirements")]
    pub condition_requirements: HashMap<String, ConditionRequirement>,
    /// Owning principal
    #[serde(rename = "createdBy")]
    pub created_by: String,
}

/// Reduced link row for the administrative listing, joined with its dataset name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryLinkSummary {
    pub id: String,
    pub slug: String,
    pub title: Option<String>,
    #[serde(rename = "datasetName")]
    pub dataset_name: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

/// One searchable condition as rendered for the public form
///
/// Field names follow the public wire format: `id`, `name`, `column_name`,
/// `type`, `multiple`, `required`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionDescriptor {
    pub id: String,
    pub name: String,
    pub column_name: String,
    #[serde(rename = "type")]
    pub condition_type: String,
    pub multiple: bool,
    pub required: bool,
}

/// The public view of a query link: its title and surviving conditions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedConditions {
    pub title: Option<String>,
    pub conditions: Vec<ConditionDescriptor>,
}

/// Decode a stored condition-column blob
///
/// Tolerates a pre-decoded JSON array or a JSON string containing a serialized
/// array; anything else, including a parse failure, degrades to an empty list.
pub fn decode_condition_columns(value: &serde_json::Value) -> Vec<String> {
    match value {
        serde_json::Value::Array(_) => {
            serde_json::from_value(value.clone()).unwrap_or_default()
        }
        serde_json::Value::String(text) => serde_json::from_str(text).unwrap_or_default(),
        _ => Vec::new(),
    }
}

/// Decode a stored requirement-map blob
///
/// Same tolerance as [`decode_condition_columns`]: a decode failure means "no
/// requirements", never an error on the public path.
pub fn decode_condition_requirements(
    value: &serde_json::Value,
) -> HashMap<String, ConditionRequirement> {
    match value {
        serde_json::Value::Object(_) => {
            serde_json::from_value(value.clone()).unwrap_or_default()
        }
        serde_json::Value::String(text) => serde_json::from_str(text).unwrap_or_default(),
        _ => HashMap::new(),
    }
}

/// Intersect a link's stored column ordering with a dataset's live columns
///
/// Preserves the stored order, silently drops columns that no longer exist,
/// and fills display metadata from the requirement map. The public surface
/// never errors merely because the operator later removed a column.
pub fn resolve_descriptors(
    stored_order: &[String],
    live_columns: &[String],
    requirements: &HashMap<String, ConditionRequirement>,
) -> Vec<ConditionDescriptor> {
    stored_order
        .iter()
        .filter(|col| live_columns.iter().any(|live| live == *col))
        .map(|col| {
            let requirement = requirements.get(col);
            let display = requirement
                .map(|r| r.display_name.clone())
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| col.clone());

            ConditionDescriptor {
                id: col.clone(),
                name: display,
                column_name: col.clone(),
                condition_type: "text".to_string(),
                multiple: false,
                required: requirement.map(|r| r.required).unwrap_or(false),
            }
        })
        .collect()
}
