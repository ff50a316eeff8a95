// Copyright 2025 Adobe. All rights reserved.
// This file is licensed to you under the Apache License,
// Version 2.0 (http://www.apache.org/licenses/LICENSE-2.0)
// or the MIT license (http://opensource.org/licenses/MIT),
// at your option.
//
// Unless required by applicable law or agreed to in writing,
// this software is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR REPRESENTATIONS OF ANY KIND, either express or
// implied. See the LICENSE-MIT and LICENSE-APACHE files for the
// specific language governing permissions and limitations under
// each license.

//! In-memory metadata service backed by a catalog snapshot.
//!
//! A snapshot can be exported once from a live catalog and evaluated offline, or
//! built in code for tests. Listing order is the order of the snapshot.

use super::error::{CatalogError, CatalogResult};
use super::provider::{MetadataService, TableDetail, TableIdentifier, TableListing, ViewListing};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Failure a snapshot table reports instead of its detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum SnapshotFailure {
    NotFound,
    PermissionDenied,
    Service(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotTable {
    pub name: String,

    #[serde(default)]
    pub is_temporary: bool,

    #[serde(default)]
    pub detail: Option<TableDetail>,

    #[serde(default)]
    pub failure: Option<SnapshotFailure>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotSchema {
    pub name: String,

    #[serde(default)]
    pub tables: Vec<SnapshotTable>,

    #[serde(default)]
    pub views: Vec<ViewListing>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotCatalog {
    pub name: String,

    #[serde(default)]
    pub schemas: Vec<SnapshotSchema>,
}

/// Metadata service answering from an in-memory catalog snapshot
///
/// # Examples
///
/// ```
/// use lake_compat::catalog::{InMemoryCatalog, TableDetail, TableIdentifier};
///
/// let catalog = InMemoryCatalog::new().with_table(
///     TableIdentifier::new("main", "sales", "orders"),
///     TableDetail {
///         location: "abfss://lake@acct.dfs.core.windows.net/orders".to_string(),
///         table_features: vec!["appendOnly".to_string()],
///         min_reader_version: 1,
///         min_writer_version: 7,
///     },
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InMemoryCatalog {
    #[serde(default)]
    pub catalogs: Vec<SnapshotCatalog>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a snapshot from its JSON representation.
    pub fn from_json_str(json: &str) -> CatalogResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a snapshot from a JSON file.
    ///
    /// # Errors
    ///
    /// This function will return an error if the file cannot be read or is not
    /// a valid snapshot.
    pub fn from_path(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Serialize the snapshot as pretty JSON.
    pub fn to_json(&self) -> CatalogResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Register an empty schema, creating the catalog if needed.
    pub fn with_schema(mut self, catalog: &str, schema: &str) -> Self {
        self.schema_entry(catalog, schema);
        self
    }

    /// Register a table with its detail.
    pub fn with_table(mut self, table: TableIdentifier, detail: TableDetail) -> Self {
        self.schema_entry(&table.catalog, &table.schema)
            .tables
            .push(SnapshotTable {
                name: table.table,
                is_temporary: false,
                detail: Some(detail),
                failure: None,
            });
        self
    }

    /// Register a temporary table. It is listed but never described.
    pub fn with_temporary_table(mut self, catalog: &str, schema: &str, name: &str) -> Self {
        self.schema_entry(catalog, schema).tables.push(SnapshotTable {
            name: name.to_string(),
            is_temporary: true,
            detail: None,
            failure: None,
        });
        self
    }

    /// Register a table whose describe call fails.
    pub fn with_failure(mut self, table: TableIdentifier, failure: SnapshotFailure) -> Self {
        self.schema_entry(&table.catalog, &table.schema)
            .tables
            .push(SnapshotTable {
                name: table.table,
                is_temporary: false,
                detail: None,
                failure: Some(failure),
            });
        self
    }

    /// Register a view.
    pub fn with_view(mut self, catalog: &str, schema: &str, name: &str, is_temporary: bool) -> Self {
        self.schema_entry(catalog, schema).views.push(ViewListing {
            name: name.to_string(),
            is_temporary,
        });
        self
    }

    fn schema_entry(&mut self, catalog: &str, schema: &str) -> &mut SnapshotSchema {
        let catalog_idx = match self.catalogs.iter().position(|c| c.name == catalog) {
            Some(idx) => idx,
            None => {
                self.catalogs.push(SnapshotCatalog {
                    name: catalog.to_string(),
                    schemas: Vec::new(),
                });
                self.catalogs.len() - 1
            }
        };
        let schemas = &mut self.catalogs[catalog_idx].schemas;
        let schema_idx = match schemas.iter().position(|s| s.name == schema) {
            Some(idx) => idx,
            None => {
                schemas.push(SnapshotSchema {
                    name: schema.to_string(),
                    tables: Vec::new(),
                    views: Vec::new(),
                });
                schemas.len() - 1
            }
        };
        &mut schemas[schema_idx]
    }

    fn catalog(&self, catalog: &str) -> CatalogResult<&SnapshotCatalog> {
        self.catalogs
            .iter()
            .find(|c| c.name == catalog)
            .ok_or_else(|| CatalogError::NotFound(format!("catalog {}", catalog)))
    }

    fn schema(&self, catalog: &str, schema: &str) -> CatalogResult<&SnapshotSchema> {
        self.catalog(catalog)?
            .schemas
            .iter()
            .find(|s| s.name == schema)
            .ok_or_else(|| CatalogError::NotFound(format!("schema {}.{}", catalog, schema)))
    }
}

#[async_trait]
impl MetadataService for InMemoryCatalog {
    async fn list_schemas(&self, catalog: &str) -> CatalogResult<Vec<String>> {
        Ok(self
            .catalog(catalog)?
            .schemas
            .iter()
            .map(|s| s.name.clone())
            .collect())
    }

    async fn list_tables(&self, catalog: &str, schema: &str) -> CatalogResult<Vec<TableListing>> {
        Ok(self
            .schema(catalog, schema)?
            .tables
            .iter()
            .map(|t| TableListing {
                name: t.name.clone(),
                is_temporary: t.is_temporary,
            })
            .collect())
    }

    async fn list_views(&self, catalog: &str, schema: &str) -> CatalogResult<Vec<ViewListing>> {
        Ok(self.schema(catalog, schema)?.views.clone())
    }

    async fn describe_table(&self, table: &TableIdentifier) -> CatalogResult<TableDetail> {
        let entry = self
            .schema(&table.catalog, &table.schema)?
            .tables
            .iter()
            .find(|t| t.name == table.table)
            .ok_or_else(|| CatalogError::NotFound(format!("table {}", table)))?;

        match (&entry.failure, &entry.detail) {
            (Some(SnapshotFailure::NotFound), _) | (None, None) => {
                Err(CatalogError::NotFound(format!("table {}", table)))
            }
            (Some(SnapshotFailure::PermissionDenied), _) => {
                Err(CatalogError::PermissionDenied(format!("table {}", table)))
            }
            (Some(SnapshotFailure::Service(message)), _) => {
                Err(CatalogError::Service(message.clone()))
            }
            (None, Some(detail)) => Ok(detail.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(features: &[&str]) -> TableDetail {
        TableDetail {
            location: "s3://bucket/table".to_string(),
            table_features: features.iter().map(|f| f.to_string()).collect(),
            min_reader_version: 3,
            min_writer_version: 7,
        }
    }

    #[tokio::test]
    async fn test_listing_follows_snapshot_order() {
        let catalog = InMemoryCatalog::new()
            .with_schema("main", "zeta")
            .with_table(TableIdentifier::new("main", "alpha", "b"), detail(&[]))
            .with_table(TableIdentifier::new("main", "alpha", "a"), detail(&[]))
            .with_view("main", "alpha", "a_view", false);

        assert_eq!(catalog.list_schemas("main").await.unwrap(), vec!["zeta", "alpha"]);

        let tables: Vec<String> = catalog
            .list_tables("main", "alpha")
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(tables, vec!["b", "a"]);

        let views = catalog.list_views("main", "alpha").await.unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].name, "a_view");
    }

    #[tokio::test]
    async fn test_describe_table() {
        let id = TableIdentifier::new("main", "sales", "orders");
        let catalog = InMemoryCatalog::new().with_table(id.clone(), detail(&["appendOnly"]));

        let found = catalog.describe_table(&id).await.unwrap();
        assert_eq!(found.table_features, vec!["appendOnly"]);
        assert_eq!(found.min_writer_version, 7);
    }

    #[tokio::test]
    async fn test_describe_missing_objects() {
        let catalog = InMemoryCatalog::new().with_schema("main", "sales");

        for id in [
            TableIdentifier::new("other", "sales", "orders"),
            TableIdentifier::new("main", "hr", "orders"),
            TableIdentifier::new("main", "sales", "orders"),
        ] {
            assert!(matches!(
                catalog.describe_table(&id).await,
                Err(CatalogError::NotFound(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_configured_failures() {
        let denied = TableIdentifier::new("main", "hr", "salaries");
        let flaky = TableIdentifier::new("main", "hr", "reviews");
        let catalog = InMemoryCatalog::new()
            .with_failure(denied.clone(), SnapshotFailure::PermissionDenied)
            .with_failure(flaky.clone(), SnapshotFailure::Service("503".to_string()));

        assert!(matches!(
            catalog.describe_table(&denied).await,
            Err(CatalogError::PermissionDenied(_))
        ));
        match catalog.describe_table(&flaky).await {
            Err(CatalogError::Service(message)) => assert_eq!(message, "503"),
            other => panic!("Expected Service error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_from_json_str() {
        let json = r#"{
            "catalogs": [{
                "name": "main",
                "schemas": [{
                    "name": "sales",
                    "tables": [
                        {
                            "name": "orders",
                            "detail": {
                                "location": "abfss://lake@acct.dfs.core.windows.net/orders",
                                "table_features": ["appendOnly", "deletionVectors"],
                                "min_reader_version": 3,
                                "min_writer_version": 7
                            }
                        },
                        {"name": "tmp", "is_temporary": true},
                        {"name": "secret", "failure": {"kind": "permission_denied"}}
                    ],
                    "views": [{"name": "orders_v"}]
                }]
            }]
        }"#;

        let catalog = InMemoryCatalog::from_json_str(json).unwrap();
        let tables = catalog.list_tables("main", "sales").await.unwrap();
        assert_eq!(tables.len(), 3);
        assert!(tables[1].is_temporary);

        let secret = TableIdentifier::new("main", "sales", "secret");
        assert!(matches!(
            catalog.describe_table(&secret).await,
            Err(CatalogError::PermissionDenied(_))
        ));

        let reparsed = InMemoryCatalog::from_json_str(&catalog.to_json().unwrap()).unwrap();
        assert_eq!(reparsed, catalog);
    }

    #[test]
    fn test_from_path_missing_file() {
        let result = InMemoryCatalog::from_path("/definitely/not/here.json");
        assert!(matches!(result, Err(CatalogError::Io(_))));
    }
}
