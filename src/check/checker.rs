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
use crate::check::evaluator::evaluate;
use crate::check::extractor::extract;
use crate::check::report::{CompatibilityReport, CompatibilityResult};
use crate::check::walker::CatalogWalker;
use crate::runtime::features::DroppableFeatures;
use crate::runtime::registry::{resolve, RuntimeProfile};
use crate::util::timing::{format_phases, measure_dur_async, TimedPhases};
use futures::stream::{self, StreamExt};
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Number of tables evaluated concurrently when no parallelism is configured.
pub fn default_parallelism() -> usize {
    std::thread::available_parallelism().map_or(1, NonZeroUsize::get)
}

/// Builder for constructing a `CompatibilityChecker` instance.
///
/// # Examples
///
/// ```no_run
/// use lake_compat::catalog::InMemoryCatalog;
/// use lake_compat::CompatibilityChecker;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
/// let service = Arc::new(InMemoryCatalog::from_path("catalog.json")?);
///
/// let checker = CompatibilityChecker::builder(&["main"], &["sales"], "1.3")
///     .with_parallelism(16)
///     .build(service)?;
///
/// let report = checker.evaluate().await?;
/// println!("{}", report);
/// # Ok(())
/// # }
/// ```
pub struct CheckerBuilder {
    catalog_names: Vec<String>,
    schema_names: Vec<String>,
    fabric_runtime: String,
    parallelism: Option<usize>,
    droppable: DroppableFeatures,
}

impl CheckerBuilder {
    /// Creates a new `CheckerBuilder`.
    ///
    /// # Arguments
    ///
    /// * `catalog_names` - Catalogs to evaluate
    /// * `schema_names` - Schemas to evaluate in every catalog; empty means all schemas
    /// * `fabric_runtime` - Fabric runtime version to check against, e.g. `"1.3"`
    pub fn new<C, S>(catalog_names: &[C], schema_names: &[S], fabric_runtime: &str) -> Self
    where
        C: AsRef<str>,
        S: AsRef<str>,
    {
        Self {
            catalog_names: catalog_names
                .iter()
                .map(|c| c.as_ref().to_string())
                .collect(),
            schema_names: schema_names
                .iter()
                .map(|s| s.as_ref().to_string())
                .collect(),
            fabric_runtime: fabric_runtime.to_string(),
            parallelism: None,
            droppable: DroppableFeatures::default(),
        }
    }

    /// Sets the number of tables evaluated concurrently.
    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = Some(parallelism);
        self
    }

    /// Replaces the default droppable features (`v2Checkpoint`, `deletionVectors`).
    pub fn with_droppable_features(mut self, droppable: DroppableFeatures) -> Self {
        self.droppable = droppable;
        self
    }

    /// Builds the `CompatibilityChecker` instance.
    ///
    /// Validation happens here, before the metadata service is ever called.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// * The Fabric runtime version is unknown (`CompatError::UnsupportedRuntime`)
    /// * A catalog is the legacy Hive metastore (`CompatError::UnsupportedCatalog`)
    /// * A catalog name is empty or parallelism is zero (`CompatError::Config`)
    pub fn build(self, service: Arc<dyn MetadataService>) -> CompatResult<CompatibilityChecker> {
        let profile = resolve(&self.fabric_runtime)?;
        let walker = CatalogWalker::new(&self.catalog_names, &self.schema_names)?;

        let parallelism = self.parallelism.unwrap_or_else(default_parallelism);
        if parallelism == 0 {
            return Err(CompatError::Config(
                "parallelism must be at least 1".to_string(),
            ));
        }

        Ok(CompatibilityChecker {
            service,
            walker,
            profile: Arc::new(profile),
            droppable: Arc::new(self.droppable),
            parallelism,
        })
    }
}

/// Checks the tables of a lakehouse catalog against a Fabric runtime.
///
/// The checker enumerates the requested catalogs and schemas, then describes
/// and evaluates every table concurrently. Workers share the resolved runtime
/// profile, the droppable features and the metadata service; each owns the
/// result record of its table.
///
/// A table that cannot be described does not stop the batch. Its row carries
/// the error and a warning is logged.
pub struct CompatibilityChecker {
    service: Arc<dyn MetadataService>,
    walker: CatalogWalker,
    profile: Arc<RuntimeProfile>,
    droppable: Arc<DroppableFeatures>,
    parallelism: usize,
}

impl CompatibilityChecker {
    /// Creates a new `CheckerBuilder`.
    pub fn builder<C, S>(catalog_names: &[C], schema_names: &[S], fabric_runtime: &str) -> CheckerBuilder
    where
        C: AsRef<str>,
        S: AsRef<str>,
    {
        CheckerBuilder::new(catalog_names, schema_names, fabric_runtime)
    }

    /// Creates a checker with default parallelism and droppable features.
    ///
    /// # Errors
    ///
    /// Same as [`CheckerBuilder::build`].
    pub fn new<C, S>(
        service: Arc<dyn MetadataService>,
        catalog_names: &[C],
        schema_names: &[S],
        fabric_runtime: &str,
    ) -> CompatResult<Self>
    where
        C: AsRef<str>,
        S: AsRef<str>,
    {
        CheckerBuilder::new(catalog_names, schema_names, fabric_runtime).build(service)
    }

    pub fn profile(&self) -> &RuntimeProfile {
        &self.profile
    }

    pub fn parallelism(&self) -> usize {
        self.parallelism
    }

    /// Evaluate every selected table and assemble the report.
    ///
    /// Returns once all tables are evaluated. There is no timeout: a describe
    /// call that never returns stalls the whole batch.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalogs, schemas, tables or views cannot be
    /// listed. Per-table failures are reported in the rows instead.
    pub async fn evaluate(&self) -> CompatResult<CompatibilityReport> {
        let mut phases = TimedPhases::new();

        info!(
            "Evaluating compatibility, runtime={}, catalogs={:?}, schemas={:?}, parallelism={}",
            self.profile.version,
            self.walker.catalogs(),
            self.walker.schemas(),
            self.parallelism
        );

        let tables = measure_dur_async(
            "enumerate_tables",
            &mut phases,
            || async { self.walker.enumerate(self.service.as_ref()).await },
            Some(|t: &Vec<TableIdentifier>| format!("Enumerated tables count={}", t.len())),
        )
        .await?;

        let results = measure_dur_async(
            "evaluate_tables",
            &mut phases,
            || async move { Ok::<_, CompatError>(self.evaluate_tables(tables).await) },
            Some(|r: &Vec<CompatibilityResult>| {
                format!(
                    "Evaluated tables count={}, failed={}",
                    r.len(),
                    r.iter().filter(|t| t.is_failed()).count()
                )
            }),
        )
        .await?;

        debug!("Phase durations\n{}", format_phases(&phases));

        Ok(CompatibilityReport::new(
            self.profile.version.clone(),
            &results,
        ))
    }

    /// Evaluate the given tables concurrently.
    ///
    /// Results come back in the order of `tables`, whatever order the workers
    /// finish in.
    pub async fn evaluate_tables(&self, tables: Vec<TableIdentifier>) -> Vec<CompatibilityResult> {
        let records: Vec<CompatibilityResult> =
            tables.into_iter().map(CompatibilityResult::new).collect();

        let mut completed: Vec<(usize, CompatibilityResult)> = stream::iter(
            records.into_iter().enumerate(),
        )
        .map(|(idx, record)| {
            let table = record.table.clone();
            let service = Arc::clone(&self.service);
            let profile = Arc::clone(&self.profile);
            let droppable = Arc::clone(&self.droppable);

            let handle = tokio::spawn(async move {
                let mut record = record;
                evaluate_table(service.as_ref(), &profile, &droppable, &mut record).await;
                record
            });

            async move {
                match handle.await {
                    Ok(record) => (idx, record),
                    Err(e) => {
                        warn!("Evaluation task failed, full_name={}, error={}", table, e);
                        let mut record = CompatibilityResult::new(table);
                        record.fail(format!("evaluation task failed: {}", e));
                        (idx, record)
                    }
                }
            }
        })
        .buffer_unordered(self.parallelism)
        .collect()
        .await;

        completed.sort_by_key(|(idx, _)| *idx);
        completed.into_iter().map(|(_, record)| record).collect()
    }
}

/// Describe and evaluate one table, writing the outcome into `record`.
async fn evaluate_table(
    service: &dyn MetadataService,
    profile: &RuntimeProfile,
    droppable: &DroppableFeatures,
    record: &mut CompatibilityResult,
) {
    debug!("Evaluating table, full_name={}", record.table);

    match extract(service, &record.table).await {
        Ok(extracted) => {
            let verdict = evaluate(&extracted.features, profile, droppable);
            info!(
                "Evaluated table, full_name={}, read={}, write={}",
                record.table, verdict.read_supported, verdict.write_supported
            );
            record.fill(
                extracted.location,
                extracted.features,
                extracted.protocol,
                verdict,
            );
        }
        Err(e) => {
            warn!(
                "Failed to extract table features, full_name={}, error={}",
                record.table, e
            );
            record.fail(e);
        }
    }
}
