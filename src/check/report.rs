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

use crate::catalog::TableIdentifier;
use crate::check::error::CompatResult;
use crate::check::evaluator::Verdict;
use crate::runtime::features::FeatureSets;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Output columns, in presentation order.
pub const COLUMNS: &[&str] = &[
    "catalog",
    "schema",
    "table",
    "read_from_fabric",
    "write_from_fabric",
    "reader_features",
    "writer_features",
    "blocking_reader_features",
    "blocking_writer_features",
    "read_after_dropping_features",
    "write_after_dropping_features",
    "min_table_protocol",
    "full_table_reference",
    "location",
    "error",
];

/// Minimum protocol versions declared by a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableProtocol {
    #[serde(rename = "minReaderVersion")]
    pub min_reader_version: i32,

    #[serde(rename = "minWriterVersion")]
    pub min_writer_version: i32,
}

/// Per-table unit of work
///
/// Created before dispatch with only the identifier set, then filled in by
/// exactly one worker through [`CompatibilityResult::fill`] or
/// [`CompatibilityResult::fail`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompatibilityResult {
    pub table: TableIdentifier,
    pub location: Option<String>,
    pub features: FeatureSets,
    pub protocol: Option<TableProtocol>,
    pub verdict: Option<Verdict>,
    pub error: Option<String>,
}

impl CompatibilityResult {
    pub fn new(table: TableIdentifier) -> Self {
        Self {
            table,
            location: None,
            features: FeatureSets::default(),
            protocol: None,
            verdict: None,
            error: None,
        }
    }

    /// Record a successful evaluation.
    pub fn fill(
        &mut self,
        location: String,
        features: FeatureSets,
        protocol: TableProtocol,
        verdict: Verdict,
    ) {
        self.location = Some(location);
        self.features = features;
        self.protocol = Some(protocol);
        self.verdict = Some(verdict);
    }

    /// Record why this table could not be evaluated.
    pub fn fail(&mut self, error: impl Display) {
        self.error = Some(error.to_string());
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    /// Project into the presentation row.
    pub fn to_row(&self) -> CompatibilityRow {
        let verdict = self.verdict.as_ref();
        CompatibilityRow {
            catalog: self.table.catalog.clone(),
            schema: self.table.schema.clone(),
            table: self.table.table.clone(),
            read_from_fabric: verdict.map(|v| v.read_supported),
            write_from_fabric: verdict.map(|v| v.write_supported),
            reader_features: self.features.reader_features.clone(),
            writer_features: self.features.writer_features.clone(),
            blocking_reader_features: verdict
                .map(|v| v.blocking_reader_features.clone())
                .unwrap_or_default(),
            blocking_writer_features: verdict
                .map(|v| v.blocking_writer_features.clone())
                .unwrap_or_default(),
            read_after_dropping_features: verdict.and_then(|v| v.read_supported_after_dropping),
            write_after_dropping_features: verdict.and_then(|v| v.write_supported_after_dropping),
            min_table_protocol: self.protocol,
            full_table_reference: self.table.full_name(),
            location: self.location.clone(),
            error: self.error.clone(),
        }
    }
}

/// One row of the result table. Field order is the column order.
///
/// The verdict columns are null only for tables that failed evaluation, in
/// which case `error` says why. The "after dropping" columns are also null
/// whenever the corresponding direction is already supported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityRow {
    pub catalog: String,
    pub schema: String,
    pub table: String,
    pub read_from_fabric: Option<bool>,
    pub write_from_fabric: Option<bool>,
    pub reader_features: Vec<String>,
    pub writer_features: Vec<String>,
    pub blocking_reader_features: Vec<String>,
    pub blocking_writer_features: Vec<String>,
    pub read_after_dropping_features: Option<bool>,
    pub write_after_dropping_features: Option<bool>,
    pub min_table_protocol: Option<TableProtocol>,
    pub full_table_reference: String,
    pub location: Option<String>,
    pub error: Option<String>,
}

/// Aggregated result of a compatibility check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompatibilityReport {
    /// Fabric runtime version the tables were checked against
    pub runtime: String,

    /// RFC 3339 timestamp of the evaluation
    pub evaluated_at: String,

    pub rows: Vec<CompatibilityRow>,
}

impl CompatibilityReport {
    pub fn new(runtime: impl Into<String>, results: &[CompatibilityResult]) -> Self {
        Self {
            runtime: runtime.into(),
            evaluated_at: chrono::Utc::now().to_rfc3339(),
            rows: results.iter().map(CompatibilityResult::to_row).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn readable_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| r.read_from_fabric == Some(true))
            .count()
    }

    pub fn writable_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| r.write_from_fabric == Some(true))
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.rows.iter().filter(|r| r.error.is_some()).count()
    }

    /// Rows of tables that failed evaluation.
    pub fn failures(&self) -> impl Iterator<Item = &CompatibilityRow> {
        self.rows.iter().filter(|r| r.error.is_some())
    }

    /// Serialize the report as JSON.
    ///
    /// # Errors
    ///
    /// Returns `CompatError::Json` if serialization fails.
    pub fn to_json(&self, pretty: bool) -> CompatResult<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}

fn yes_no(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "yes",
        Some(false) => "no",
        None => "-",
    }
}

fn list(values: &[String]) -> String {
    if values.is_empty() {
        "-".to_string()
    } else {
        values.join(", ")
    }
}

impl Display for CompatibilityReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        writeln!(f, "\n{}", "━".repeat(100))?;
        writeln!(
            f,
            " {:<60} Fabric Runtime: {:>10}",
            "Table Compatibility Report", self.runtime
        )?;
        writeln!(f, " {}", self.evaluated_at)?;
        writeln!(f, "{}", "━".repeat(100))?;
        writeln!(
            f,
            " {:<19} {:>8}   {:<19} {:>8}   {:<19} {:>8}",
            "Tables",
            self.len(),
            "Readable",
            self.readable_count(),
            "Writable",
            self.writable_count()
        )?;
        writeln!(f, " {:<19} {:>8}", "Failed", self.failed_count())?;
        writeln!(f, "{}", "━".repeat(100))?;
        writeln!(
            f,
            " {:<50} {:>5} {:>6} {:>10} {:>11}  {}",
            "Table", "Read", "Write", "Read(drop)", "Write(drop)", "Blocking"
        )?;
        writeln!(f, "{}", "━".repeat(100))?;

        for row in &self.rows {
            if let Some(error) = &row.error {
                writeln!(f, " {:<50} failed: {}", row.full_table_reference, error)?;
                continue;
            }

            let mut blocking: Vec<String> = row.blocking_reader_features.clone();
            for feature in &row.blocking_writer_features {
                if !blocking.contains(feature) {
                    blocking.push(feature.clone());
                }
            }

            writeln!(
                f,
                " {:<50} {:>5} {:>6} {:>10} {:>11}  {}",
                row.full_table_reference,
                yes_no(row.read_from_fabric),
                yes_no(row.write_from_fabric),
                yes_no(row.read_after_dropping_features),
                yes_no(row.write_after_dropping_features),
                list(&blocking)
            )?;
        }

        if self.rows.is_empty() {
            writeln!(f, "  No tables matched the requested catalogs and schemas.")?;
        }

        Ok(())
    }
}
