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

//! Table compatibility checking
//!
//! - [`walker`] - Enumerates the tables to check
//! - [`extractor`] - Describes a table and classifies its features
//! - [`evaluator`] - Decides read/write support against a runtime
//! - [`report`] - Per-table results and the aggregated report
//! - [`checker`] - Concurrent driver tying the pieces together

pub mod checker;
pub mod error;
pub mod evaluator;
pub mod extractor;
pub mod report;
pub mod walker;

pub use checker::{CheckerBuilder, CompatibilityChecker};
pub use error::{CompatError, CompatResult};
pub use evaluator::{evaluate, Verdict};
pub use report::{CompatibilityReport, CompatibilityResult, CompatibilityRow, TableProtocol};
pub use walker::CatalogWalker;
