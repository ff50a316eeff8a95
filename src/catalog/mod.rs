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

//! Metadata service abstraction layer
//!
//! The checker only needs four read operations from a lakehouse catalog: list
//! schemas, list tables, list views and describe a table. [`MetadataService`]
//! captures those; [`UnityCatalogClient`] implements them against the Unity
//! Catalog REST API and [`InMemoryCatalog`] against an offline snapshot.

pub mod config;
pub mod error;
pub mod memory;
pub mod provider;
pub mod unity;

// Public exports
pub use config::UnityCatalogConfig;
pub use error::{CatalogError, CatalogResult};
pub use memory::{InMemoryCatalog, SnapshotFailure};
pub use provider::{MetadataService, TableDetail, TableIdentifier, TableListing, ViewListing};
pub use unity::UnityCatalogClient;
