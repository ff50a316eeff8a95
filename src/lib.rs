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

//! # Lake Compat
//!
//! A Rust library for checking whether the Delta tables of a lakehouse catalog can be read
//! and written by a Microsoft Fabric runtime.
//!
//! Lake Compat enumerates the tables of one or more catalogs, reads the table features each
//! table declares and compares them with the features supported by the selected Fabric
//! runtime. For every table it reports read and write support, the features blocking it and
//! whether dropping the droppable features (`v2Checkpoint`, `deletionVectors`) would help.
//!
//! ## Features
//!
//! - **Runtime registry**: Fabric runtimes 1.2 and 1.3
//! - **Catalogs**: Unity Catalog REST API, offline JSON snapshots
//! - **Concurrent evaluation**: Bounded worker parallelism with per-table failure isolation
//! - **Reporting**: Console table and JSON output
//!
//! ## Quick Start
//!
//! ### Unity Catalog Example
//!
//! ```rust,no_run
//! use lake_compat::catalog::{UnityCatalogClient, UnityCatalogConfig};
//! use lake_compat::CompatibilityChecker;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! let config = UnityCatalogConfig::new("https://adb-123.azuredatabricks.net")
//!     .with_token("TOKEN");
//! let service = Arc::new(UnityCatalogClient::new(config)?);
//!
//! let checker = CompatibilityChecker::builder(&["main"], &["sales"], "1.3")
//!     .with_parallelism(16)
//!     .build(service)?;
//!
//! let report = checker.evaluate().await?;
//! println!("{}", report);
//! # Ok(())
//! # }
//! ```
//!
//! ### Offline Snapshot Example
//!
//! ```rust,no_run
//! use lake_compat::catalog::InMemoryCatalog;
//! use lake_compat::CompatibilityChecker;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! let service = Arc::new(InMemoryCatalog::from_path("catalog.json")?);
//! let checker = CompatibilityChecker::new(service, &["main"], &[] as &[&str], "1.2")?;
//!
//! let report = checker.evaluate().await?;
//! println!("{}", report.to_json(true)?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`catalog`] - Metadata service abstraction and implementations
//! - [`check`] - Table enumeration, evaluation and reporting
//! - [`runtime`] - Feature vocabulary and Fabric runtime registry
//! - [`util`] - Utility functions and helpers

pub mod catalog;
pub mod check;
pub mod runtime;
pub mod util;

// Re-export commonly used types
pub use catalog::{InMemoryCatalog, MetadataService, TableIdentifier, UnityCatalogClient};
pub use check::{CompatError, CompatResult, CompatibilityChecker, CompatibilityReport};
pub use runtime::{DroppableFeatures, FabricRuntime};
