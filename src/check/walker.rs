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

use crate::catalog::{MetadataService, TableIdentifier};
use crate::check::error::{CompatError, CompatResult};
use std::collections::HashSet;
use tracing::{debug, info};

/// Legacy single-catalog metastore. Its tables cannot be evaluated.
pub const LEGACY_METASTORE: &str = "hive_metastore";

/// Enumerates the tables to check across catalogs and schemas.
#[derive(Debug, Clone)]
pub struct CatalogWalker {
    catalogs: Vec<String>,
    schemas: Vec<String>,
}

impl CatalogWalker {
    /// Create a walker over the given catalogs and schemas.
    ///
    /// An empty `schemas` list selects every schema of every catalog.
    ///
    /// # Errors
    ///
    /// Returns `CompatError::UnsupportedCatalog` if any catalog is the legacy
    /// metastore and `CompatError::Config` if a catalog name is empty. Nothing
    /// is listed before this validation passes.
    pub fn new<C, S>(catalogs: &[C], schemas: &[S]) -> CompatResult<Self>
    where
        C: AsRef<str>,
        S: AsRef<str>,
    {
        let catalogs: Vec<String> = catalogs.iter().map(|c| c.as_ref().to_string()).collect();

        if let Some(legacy) = catalogs
            .iter()
            .find(|c| c.eq_ignore_ascii_case(LEGACY_METASTORE))
        {
            return Err(CompatError::UnsupportedCatalog(legacy.clone()));
        }
        if catalogs.iter().any(|c| c.trim().is_empty()) {
            return Err(CompatError::Config(
                "catalog names must not be empty".to_string(),
            ));
        }

        Ok(Self {
            catalogs,
            schemas: schemas.iter().map(|s| s.as_ref().to_string()).collect(),
        })
    }

    pub fn catalogs(&self) -> &[String] {
        &self.catalogs
    }

    pub fn schemas(&self) -> &[String] {
        &self.schemas
    }

    fn includes_schema(&self, schema: &str) -> bool {
        self.schemas.is_empty() || self.schemas.iter().any(|s| s == schema)
    }

    /// List every non-temporary, non-view table in the selected schemas.
    ///
    /// Tables are returned in catalog order, then in the order the service
    /// lists schemas and tables. A table that shares its name with a
    /// non-temporary view of the same schema is skipped.
    ///
    /// # Errors
    ///
    /// Any listing failure aborts the enumeration.
    pub async fn enumerate(
        &self,
        service: &dyn MetadataService,
    ) -> CompatResult<Vec<TableIdentifier>> {
        let mut tables = Vec::new();

        for catalog in &self.catalogs {
            let schemas: Vec<String> = service
                .list_schemas(catalog)
                .await?
                .into_iter()
                .filter(|s| self.includes_schema(s))
                .collect();

            info!(
                "Listed schemas, catalog={}, selected count={}",
                catalog,
                schemas.len()
            );

            for schema in schemas {
                let views: HashSet<String> = service
                    .list_views(catalog, &schema)
                    .await?
                    .into_iter()
                    .filter(|v| !v.is_temporary)
                    .map(|v| v.name)
                    .collect();

                let listed = service.list_tables(catalog, &schema).await?;
                let before = tables.len();
                tables.extend(
                    listed
                        .into_iter()
                        .filter(|t| !t.is_temporary && !views.contains(&t.name))
                        .map(|t| TableIdentifier::new(catalog.as_str(), schema.as_str(), t.name)),
                );

                debug!(
                    "Listed tables, catalog={}, schema={}, count={}, views={}",
                    catalog,
                    schema,
                    tables.len() - before,
                    views.len()
                );
            }
        }

        Ok(tables)
    }
}
