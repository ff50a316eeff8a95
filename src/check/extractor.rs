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

use crate::catalog::{CatalogResult, MetadataService, TableIdentifier};
use crate::check::report::TableProtocol;
use crate::runtime::features::{partition, FeatureSets};
use tracing::debug;

/// What the checker needs to know about one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedTable {
    pub features: FeatureSets,
    pub location: String,
    pub protocol: TableProtocol,
}

/// Describe a table and classify its declared features.
///
/// Issues a single `describe_table` call. The identifier carries the catalog, so
/// no catalog context has to be selected beforehand.
///
/// # Arguments
///
/// * `service` - The metadata service to query
/// * `table` - The table to describe
///
/// # Errors
///
/// Returns the service error unchanged if the table cannot be described.
pub async fn extract(
    service: &dyn MetadataService,
    table: &TableIdentifier,
) -> CatalogResult<ExtractedTable> {
    let detail = service.describe_table(table).await?;
    let features = partition(&detail.table_features);

    debug!(
        "Extracted features, full_name={}, declared={:?}, reader={:?}, writer={:?}",
        table, detail.table_features, features.reader_features, features.writer_features
    );

    Ok(ExtractedTable {
        features,
        location: detail.location,
        protocol: TableProtocol {
            min_reader_version: detail.min_reader_version,
            min_writer_version: detail.min_writer_version,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogError, InMemoryCatalog, SnapshotFailure, TableDetail};

    #[tokio::test]
    async fn test_extract_classifies_features() {
        let id = TableIdentifier::new("main", "sales", "orders");
        let catalog = InMemoryCatalog::new().with_table(
            id.clone(),
            TableDetail {
                location: "abfss://lake@acct.dfs.core.windows.net/orders".to_string(),
                table_features: vec![
                    "appendOnly".to_string(),
                    "deletionVectors".to_string(),
                    "vendorSpecific".to_string(),
                    "v2Checkpoint".to_string(),
                ],
                min_reader_version: 3,
                min_writer_version: 7,
            },
        );

        let extracted = extract(&catalog, &id).await.unwrap();

        assert_eq!(
            extracted.features.reader_features,
            vec!["deletionVectors", "v2Checkpoint"]
        );
        assert_eq!(
            extracted.features.writer_features,
            vec!["appendOnly", "deletionVectors", "v2Checkpoint"]
        );
        assert_eq!(
            extracted.location,
            "abfss://lake@acct.dfs.core.windows.net/orders"
        );
        assert_eq!(
            extracted.protocol,
            TableProtocol {
                min_reader_version: 3,
                min_writer_version: 7
            }
        );
    }

    #[tokio::test]
    async fn test_extract_legacy_protocol_without_features() {
        let id = TableIdentifier::new("main", "sales", "legacy");
        let catalog = InMemoryCatalog::new().with_table(
            id.clone(),
            TableDetail {
                location: "s3://bucket/legacy".to_string(),
                table_features: vec![],
                min_reader_version: 1,
                min_writer_version: 2,
            },
        );

        let extracted = extract(&catalog, &id).await.unwrap();
        assert_eq!(extracted.features, FeatureSets::default());
        assert_eq!(extracted.protocol.min_writer_version, 2);
    }

    #[tokio::test]
    async fn test_extract_propagates_service_errors() {
        let id = TableIdentifier::new("main", "hr", "salaries");
        let catalog =
            InMemoryCatalog::new().with_failure(id.clone(), SnapshotFailure::PermissionDenied);

        assert!(matches!(
            extract(&catalog, &id).await,
            Err(CatalogError::PermissionDenied(_))
        ));
    }
}
