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

use thiserror::Error;

/// Errors that can occur while talking to the metadata service
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Metadata service error: {0}")]
    Service(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Delta table error: {0}")]
    Delta(#[from] deltalake::DeltaTableError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for metadata service operations
pub type CatalogResult<T> = Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_not_found_error() {
        let error = CatalogError::NotFound("main.sales.orders".to_string());
        assert_eq!(error.to_string(), "Not found: main.sales.orders");
    }

    #[test]
    fn test_permission_denied_error() {
        let error = CatalogError::PermissionDenied("main.hr.salaries".to_string());
        assert_eq!(error.to_string(), "Permission denied: main.hr.salaries");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "snapshot.json");
        let catalog_error: CatalogError = io_error.into();

        match catalog_error {
            CatalogError::Io(_) => assert!(catalog_error.to_string().contains("IO error")),
            _ => panic!("Expected Io variant"),
        }
    }

    #[test]
    fn test_url_parse_error_conversion() {
        let catalog_error: CatalogError = url::ParseError::EmptyHost.into();

        match catalog_error {
            CatalogError::UrlParse(_) => {
                assert!(catalog_error.to_string().contains("URL parse error"))
            }
            _ => panic!("Expected UrlParse variant"),
        }
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let catalog_error: CatalogError = json_error.into();
        assert!(catalog_error.to_string().starts_with("JSON error"));
    }
}
