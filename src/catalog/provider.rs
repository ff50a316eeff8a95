// Copyright 2022 Adobe. All rights reserved.
// This file is licensed to you under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License. You may obtain a copy
// of the License at http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software distributed under
// the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR REPRESENTATIONS
// OF ANY KIND, either express or implied. See the License for the specific language
// governing permissions and limitations under the License.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

use super::error::CatalogResult;

/// Fully qualified address of a table: `catalog.schema.table`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TableIdentifier {
    pub catalog: String,
    pub schema: String,
    pub table: String,
}

impl TableIdentifier {
    pub fn new(
        catalog: impl Into<String>,
        schema: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        Self {
            catalog: catalog.into(),
            schema: schema.into(),
            table: table.into(),
        }
    }

    /// The three-part name, e.g. `main.sales.orders`.
    pub fn full_name(&self) -> String {
        format!("{}.{}.{}", self.catalog, self.schema, self.table)
    }
}

impl Display for TableIdentifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}.{}.{}", self.catalog, self.schema, self.table)
    }
}

/// A table as returned by a schema's table listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableListing {
    pub name: String,

    #[serde(default)]
    pub is_temporary: bool,
}

/// A view as returned by a schema's view listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewListing {
    pub name: String,

    #[serde(default)]
    pub is_temporary: bool,
}

/// Table detail as described by the metadata service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDetail {
    /// Storage location of the table
    pub location: String,

    /// Table feature flags exactly as declared by the table's protocol
    #[serde(default)]
    pub table_features: Vec<String>,

    /// Minimum reader protocol version
    pub min_reader_version: i32,

    /// Minimum writer protocol version
    pub min_writer_version: i32,
}

/// Read-only view of a lakehouse catalog
///
/// Every call names its catalog explicitly; implementations must not depend on a
/// "current catalog" held in session state. The checker shares a single
/// instance across all workers, so implementations must be safe for concurrent
/// calls.
#[async_trait]
pub trait MetadataService: Send + Sync {
    /// List the schema names in a catalog.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// * The catalog does not exist
    /// * Permission denied
    /// * The metadata service cannot be reached
    async fn list_schemas(&self, catalog: &str) -> CatalogResult<Vec<String>>;

    /// List the tables of a schema, including views and temporary objects if
    /// the service reports them as tables.
    ///
    /// # Errors
    ///
    /// This function will return an error if the schema cannot be listed.
    async fn list_tables(&self, catalog: &str, schema: &str) -> CatalogResult<Vec<TableListing>>;

    /// List the views of a schema.
    ///
    /// # Errors
    ///
    /// This function will return an error if the schema cannot be listed.
    async fn list_views(&self, catalog: &str, schema: &str) -> CatalogResult<Vec<ViewListing>>;

    /// Describe a table's location, declared features and protocol versions.
    ///
    /// # Arguments
    ///
    /// * `table` - The fully qualified table to describe
    ///
    /// # Returns
    ///
    /// A `Result` containing:
    /// * `Ok(TableDetail)` - The table's detail
    /// * `Err(CatalogError)` - If the table cannot be described
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// * The table does not exist
    /// * Permission denied
    /// * The table's protocol cannot be read
    async fn describe_table(&self, table: &TableIdentifier) -> CatalogResult<TableDetail>;
}
