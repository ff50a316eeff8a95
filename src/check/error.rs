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

use crate::catalog::CatalogError;
use crate::runtime::known_versions;
use thiserror::Error;

/// Errors that abort a compatibility check
///
/// Failures describing a single table never surface here; they are recorded on
/// that table's result instead.
#[derive(Error, Debug)]
pub enum CompatError {
    #[error(
        "Fabric runtime {0:?} is not supported for evaluation, supported={supported:?}",
        supported = known_versions()
    )]
    UnsupportedRuntime(String),

    #[error("Catalog {0:?} is not supported, only Unity Catalog catalogs can be evaluated")]
    UnsupportedCatalog(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for compatibility checks
pub type CompatResult<T> = Result<T, CompatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_runtime_message() {
        let error = CompatError::UnsupportedRuntime("1.1".to_string());
        assert_eq!(
            error.to_string(),
            "Fabric runtime \"1.1\" is not supported for evaluation, supported=[\"1.2\", \"1.3\"]"
        );
    }

    #[test]
    fn test_unsupported_catalog_message() {
        let error = CompatError::UnsupportedCatalog("hive_metastore".to_string());
        assert!(error.to_string().contains("\"hive_metastore\""));
    }

    #[test]
    fn test_catalog_error_conversion() {
        let error: CompatError = CatalogError::NotFound("catalog main".to_string()).into();
        match error {
            CompatError::Catalog(CatalogError::NotFound(what)) => assert_eq!(what, "catalog main"),
            other => panic!("Expected Catalog variant, got {:?}", other),
        }
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: CompatError = json_error.into();

        match error {
            CompatError::Json(_) => assert!(error.to_string().starts_with("JSON error")),
            other => panic!("Expected Json variant, got {:?}", other),
        }
    }
}
