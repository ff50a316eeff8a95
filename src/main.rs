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

use clap::{ArgGroup, Parser};
use lake_compat::catalog::{InMemoryCatalog, MetadataService, UnityCatalogClient, UnityCatalogConfig};
use lake_compat::{CompatibilityChecker, DroppableFeatures};
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;
use tracing::{info, warn};

/// Check lakehouse catalog tables for Delta table-feature compatibility with a Fabric runtime.
#[derive(Debug, Parser)]
#[command(name = "lake-compat", version, about)]
#[command(group(ArgGroup::new("source").required(true).args(["snapshot", "uc_endpoint"])))]
struct Cli {
    /// Catalogs to check (comma-separated or multiple --catalog flags).
    #[arg(long = "catalog", short = 'c', value_delimiter = ',', required = true)]
    catalogs: Vec<String>,

    /// Schemas to check in every catalog. Omit to check all schemas.
    #[arg(long = "schema", short = 's', value_delimiter = ',')]
    schemas: Vec<String>,

    /// Fabric runtime version to check against.
    #[arg(long, short = 'r', default_value = "1.3")]
    runtime: String,

    /// Number of tables evaluated concurrently. Defaults to the available CPU count.
    #[arg(long, short = 'p')]
    parallelism: Option<usize>,

    /// Features assumed droppable (comma-separated). Defaults to v2Checkpoint,deletionVectors.
    #[arg(long = "droppable", value_delimiter = ',')]
    droppable: Vec<String>,

    /// Catalog snapshot JSON file used instead of a live metadata service.
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Unity Catalog workspace endpoint.
    #[arg(long, env = "UC_ENDPOINT")]
    uc_endpoint: Option<String>,

    /// Unity Catalog bearer token.
    #[arg(long, env = "UC_TOKEN", hide_env_values = true)]
    uc_token: Option<String>,

    /// Unity Catalog request timeout (in seconds).
    #[arg(long, default_value = "30")]
    uc_timeout: u64,

    /// Print the report as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn metadata_service(&self) -> Result<Arc<dyn MetadataService>, Box<dyn Error + Send + Sync>> {
        if let Some(path) = &self.snapshot {
            info!("Loading catalog snapshot, path={}", path.display());
            return Ok(Arc::new(InMemoryCatalog::from_path(path)?));
        }

        let endpoint = self
            .uc_endpoint
            .as_deref()
            .ok_or("either --snapshot or --uc-endpoint is required")?;
        let mut config = UnityCatalogConfig::new(endpoint).with_timeout_secs(self.uc_timeout);
        if let Some(token) = &self.uc_token {
            config = config.with_token(token);
        }

        Ok(Arc::new(UnityCatalogClient::new(config)?))
    }
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    info!("Starting Lake Compat");

    let start = SystemTime::now();
    let service = cli.metadata_service()?;

    let mut builder = CompatibilityChecker::builder(&cli.catalogs, &cli.schemas, &cli.runtime);
    if let Some(parallelism) = cli.parallelism {
        builder = builder.with_parallelism(parallelism);
    }
    if !cli.droppable.is_empty() {
        builder = builder.with_droppable_features(DroppableFeatures::shared(&cli.droppable));
    }
    let checker = builder.build(service)?;

    let report = checker.evaluate().await?;

    if cli.json {
        println!("{}", report.to_json(true)?);
    } else {
        println!("{}", report);
    }

    if report.failed_count() > 0 {
        warn!(
            "Some tables could not be evaluated, failed={}",
            report.failed_count()
        );
    }
    info!(
        "Finished, tables={}, took={}",
        report.len(),
        start.elapsed()?.as_millis()
    );

    Ok(())
}
