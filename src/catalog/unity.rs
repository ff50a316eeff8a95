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

use super::config::UnityCatalogConfig;
use super::error::{CatalogError, CatalogResult};
use super::provider::{MetadataService, TableDetail, TableIdentifier, TableListing, ViewListing};
use crate::runtime::features::{
    APPEND_ONLY, CHANGE_DATA_FEED, CHECK_CONSTRAINTS, COLUMN_MAPPING, GENERATED_COLUMNS,
    IDENTITY_COLUMNS, INVARIANTS,
};
use async_trait::async_trait;
use deltalake::open_table_with_storage_options;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SchemaInfo {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ListSchemasResponse {
    #[serde(default)]
    pub schemas: Vec<SchemaInfo>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TableInfo {
    pub name: String,
    pub table_type: Option<String>,
    pub data_source_format: Option<String>,
    pub storage_location: Option<String>,
}

impl TableInfo {
    fn is_view(&self) -> bool {
        matches!(
            self.table_type.as_deref(),
            Some("VIEW") | Some("MATERIALIZED_VIEW")
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ListTablesResponse {
    #[serde(default)]
    pub tables: Vec<TableInfo>,
    pub next_page_token: Option<String>,
}

/// Features implied by a legacy reader version, keyed by the minimum version.
const LEGACY_READER_FEATURES: &[(i32, &str)] = &[(2, COLUMN_MAPPING)];

/// Features implied by a legacy writer version, keyed by the minimum version.
const LEGACY_WRITER_FEATURES: &[(i32, &str)] = &[
    (2, APPEND_ONLY),
    (2, INVARIANTS),
    (3, CHECK_CONSTRAINTS),
    (4, CHANGE_DATA_FEED),
    (4, GENERATED_COLUMNS),
    (5, COLUMN_MAPPING),
    (6, IDENTITY_COLUMNS),
];

type SchemaKey = (String, String);

/// Metadata service backed by the Unity Catalog REST API
///
/// Schemas and tables are listed through the catalog. Table features and
/// protocol versions come from the Delta transaction log at the table's storage
/// location, opened with the configured storage options.
///
/// The underlying HTTP client is shared by all concurrent workers; `reqwest`
/// pools connections internally and is safe for concurrent use. Unity Catalog
/// has no temporary objects, so every listing is non-temporary.
///
/// Tables and views come from the same `/tables` listing. Each schema is
/// fetched once and kept for the lifetime of the client, so a client sees a
/// fixed snapshot of the schemas it has listed.
pub struct UnityCatalogClient {
    client: Client,
    config: UnityCatalogConfig,
    listings: Mutex<HashMap<SchemaKey, Arc<Vec<TableInfo>>>>,
}

impl UnityCatalogClient {
    /// Create a client for the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not a valid URL or the HTTP client
    /// cannot be constructed.
    pub fn new(config: UnityCatalogConfig) -> CatalogResult<Self> {
        Url::parse(&config.endpoint)?;

        deltalake::azure::register_handlers(None);
        deltalake::aws::register_handlers(None);

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            config,
            listings: Mutex::new(HashMap::new()),
        })
    }

    pub fn config(&self) -> &UnityCatalogConfig {
        &self.config
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
        what: &str,
    ) -> CatalogResult<T> {
        debug!("GET url={}, query={:?}", url, query);

        let mut req = self.client.get(url).query(query);
        if let Some(token) = &self.config.token {
            req = req.bearer_auth(token);
        }

        let response = req.send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(status_error(status, what, &body))
        }
    }

    fn lock_listings(&self) -> MutexGuard<'_, HashMap<SchemaKey, Arc<Vec<TableInfo>>>> {
        self.listings.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn cached_listing(&self, key: &SchemaKey) -> Option<Arc<Vec<TableInfo>>> {
        self.lock_listings().get(key).cloned()
    }

    /// Tables and views of a schema, fetched on first use.
    async fn schema_listing(&self, catalog: &str, schema: &str) -> CatalogResult<Arc<Vec<TableInfo>>> {
        let key = (catalog.to_string(), schema.to_string());
        if let Some(cached) = self.cached_listing(&key) {
            debug!("Using cached listing, catalog={}, schema={}", catalog, schema);
            return Ok(cached);
        }

        let tables = Arc::new(self.list_table_infos(catalog, schema).await?);
        self.lock_listings().insert(key, Arc::clone(&tables));
        Ok(tables)
    }

    async fn list_table_infos(&self, catalog: &str, schema: &str) -> CatalogResult<Vec<TableInfo>> {
        let url = format!("{}/tables", self.config.api_base());
        let what = format!("schema {}.{}", catalog, schema);
        let mut tables = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![("catalog_name", catalog), ("schema_name", schema)];
            if let Some(token) = page_token.as_deref() {
                query.push(("page_token", token));
            }
            let page: ListTablesResponse = self.get_json(&url, &query, &what).await?;
            tables.extend(page.tables);

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(tables)
    }

    /// Read the protocol of the Delta table stored at `location`.
    async fn read_protocol(&self, location: &str) -> CatalogResult<TableDetail> {
        info!("Opening Delta table at location={}", location);

        let url = Url::parse(location)?;
        let table =
            open_table_with_storage_options(url, self.config.storage_options.clone()).await?;
        let snapshot = table.snapshot()?;
        let protocol = snapshot.protocol();

        let reader_features: Option<Vec<String>> = protocol
            .reader_features()
            .map(|features| features.iter().filter_map(feature_name).collect());
        let writer_features: Option<Vec<String>> = protocol
            .writer_features()
            .map(|features| features.iter().filter_map(feature_name).collect());

        Ok(TableDetail {
            location: location.to_string(),
            table_features: protocol_features(
                reader_features,
                writer_features,
                protocol.min_reader_version(),
                protocol.min_writer_version(),
            ),
            min_reader_version: protocol.min_reader_version(),
            min_writer_version: protocol.min_writer_version(),
        })
    }
}

#[async_trait]
impl MetadataService for UnityCatalogClient {
    async fn list_schemas(&self, catalog: &str) -> CatalogResult<Vec<String>> {
        let url = format!("{}/schemas", self.config.api_base());
        let what = format!("catalog {}", catalog);
        let mut schemas = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![("catalog_name", catalog)];
            if let Some(token) = page_token.as_deref() {
                query.push(("page_token", token));
            }
            let page: ListSchemasResponse = self.get_json(&url, &query, &what).await?;
            schemas.extend(page.schemas.into_iter().map(|s| s.name));

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(schemas)
    }

    async fn list_tables(&self, catalog: &str, schema: &str) -> CatalogResult<Vec<TableListing>> {
        Ok(self
            .schema_listing(catalog, schema)
            .await?
            .iter()
            .map(|t| TableListing {
                name: t.name.clone(),
                is_temporary: false,
            })
            .collect())
    }

    async fn list_views(&self, catalog: &str, schema: &str) -> CatalogResult<Vec<ViewListing>> {
        Ok(self
            .schema_listing(catalog, schema)
            .await?
            .iter()
            .filter(|t| t.is_view())
            .map(|t| ViewListing {
                name: t.name.clone(),
                is_temporary: false,
            })
            .collect())
    }

    async fn describe_table(&self, table: &TableIdentifier) -> CatalogResult<TableDetail> {
        let url = table_url(&self.config, table)?;
        let info: TableInfo = self
            .get_json(&url, &[], &format!("table {}", table))
            .await?;

        if let Some(format) = info.data_source_format.as_deref() {
            if !format.eq_ignore_ascii_case("DELTA") {
                return Err(CatalogError::Service(format!(
                    "table {} is not a Delta table, format={}",
                    table, format
                )));
            }
        }

        let location = info.storage_location.ok_or_else(|| {
            CatalogError::Service(format!("table {} has no storage location", table))
        })?;

        self.read_protocol(&location).await
    }
}

/// URL of a table's detail endpoint, with the full name percent-encoded as one
/// path segment.
fn table_url(config: &UnityCatalogConfig, table: &TableIdentifier) -> CatalogResult<String> {
    let mut url = Url::parse(&config.api_base())?;
    url.path_segments_mut()
        .map_err(|_| {
            CatalogError::Service(format!(
                "endpoint {} cannot be used as a base URL",
                config.endpoint
            ))
        })?
        .push("tables")
        .push(&table.full_name());
    Ok(url.to_string())
}

fn status_error(status: StatusCode, what: &str, body: &str) -> CatalogError {
    match status {
        StatusCode::NOT_FOUND => CatalogError::NotFound(what.to_string()),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            CatalogError::PermissionDenied(what.to_string())
        }
        _ => CatalogError::Service(format!("{} returned {}: {}", what, status, body)),
    }
}

/// Protocol features serialize to their camelCase protocol names.
fn feature_name<T: Serialize>(feature: &T) -> Option<String> {
    match serde_json::to_value(feature).ok()? {
        Value::String(name) => Some(name),
        _ => None,
    }
}

/// Features enabled by a protocol version without explicit feature lists.
fn implied_features(by_version: &[(i32, &str)], version: i32) -> Vec<String> {
    by_version
        .iter()
        .filter(|(min_version, _)| version >= *min_version)
        .map(|(_, feature)| feature.to_string())
        .collect()
}

/// Declared features of a table protocol.
///
/// Explicit feature lists are used as-is. A side without one (reader version
/// below 3, writer version below 7) contributes the features its legacy
/// version implies instead.
fn protocol_features(
    reader: Option<Vec<String>>,
    writer: Option<Vec<String>>,
    min_reader_version: i32,
    min_writer_version: i32,
) -> Vec<String> {
    let reader =
        reader.unwrap_or_else(|| implied_features(LEGACY_READER_FEATURES, min_reader_version));
    let writer =
        writer.unwrap_or_else(|| implied_features(LEGACY_WRITER_FEATURES, min_writer_version));
    merge_features(reader, writer)
}

/// Reader features first, then writer-only features, each name once.
fn merge_features(reader: Vec<String>, writer: Vec<String>) -> Vec<String> {
    let mut merged = reader;
    for feature in writer {
        if !merged.contains(&feature) {
            merged.push(feature);
        }
    }
    merged
}
