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

use super::features::{
    APPEND_ONLY, CHANGE_DATA_FEED, CHECK_CONSTRAINTS, COLUMN_MAPPING, DELETION_VECTORS,
    DOMAIN_METADATA, GENERATED_COLUMNS, INVARIANTS, TIMESTAMP_NTZ, V2_CHECKPOINT,
};
use crate::check::error::{CompatError, CompatResult};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Fabric runtime versions known to this tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FabricRuntime {
    V1_2,
    V1_3,
}

/// Static description of what a runtime version supports.
struct RuntimeEntry {
    runtime: FabricRuntime,
    version: &'static str,
    reader_features: &'static [&'static str],
    writer_features: &'static [&'static str],
}

// Each entry is maintained independently. Later versions are not assumed to be
// supersets of earlier ones.
const RUNTIME_1_2: RuntimeEntry = RuntimeEntry {
    runtime: FabricRuntime::V1_2,
    version: "1.2",
    reader_features: &[COLUMN_MAPPING, DELETION_VECTORS, TIMESTAMP_NTZ],
    writer_features: &[
        APPEND_ONLY,
        INVARIANTS,
        CHECK_CONSTRAINTS,
        GENERATED_COLUMNS,
        CHANGE_DATA_FEED,
        COLUMN_MAPPING,
        DELETION_VECTORS,
        TIMESTAMP_NTZ,
    ],
};

const RUNTIME_1_3: RuntimeEntry = RuntimeEntry {
    runtime: FabricRuntime::V1_3,
    version: "1.3",
    reader_features: &[
        COLUMN_MAPPING,
        DELETION_VECTORS,
        TIMESTAMP_NTZ,
        V2_CHECKPOINT,
        DOMAIN_METADATA,
    ],
    writer_features: &[
        APPEND_ONLY,
        INVARIANTS,
        CHECK_CONSTRAINTS,
        GENERATED_COLUMNS,
        CHANGE_DATA_FEED,
        COLUMN_MAPPING,
        DELETION_VECTORS,
        TIMESTAMP_NTZ,
        V2_CHECKPOINT,
        DOMAIN_METADATA,
    ],
};

/// Known runtimes, in version order.
const RUNTIMES: &[RuntimeEntry] = &[RUNTIME_1_2, RUNTIME_1_3];

impl FabricRuntime {
    fn entry(&self) -> &'static RuntimeEntry {
        match self {
            FabricRuntime::V1_2 => &RUNTIME_1_2,
            FabricRuntime::V1_3 => &RUNTIME_1_3,
        }
    }

    /// The version string of this runtime, e.g. `"1.3"`.
    pub fn version(&self) -> &'static str {
        self.entry().version
    }

    /// Build the immutable feature profile for this runtime.
    pub fn profile(&self) -> RuntimeProfile {
        let entry = self.entry();
        RuntimeProfile {
            version: entry.version.to_string(),
            supported_reader_features: entry
                .reader_features
                .iter()
                .map(|f| f.to_string())
                .collect(),
            supported_writer_features: entry
                .writer_features
                .iter()
                .map(|f| f.to_string())
                .collect(),
        }
    }
}

impl FromStr for FabricRuntime {
    type Err = CompatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RUNTIMES
            .iter()
            .find(|e| e.version == s)
            .map(|e| e.runtime)
            .ok_or_else(|| CompatError::UnsupportedRuntime(s.to_string()))
    }
}

impl Display for FabricRuntime {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.version())
    }
}

/// Reader and writer features supported by one Fabric runtime version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuntimeProfile {
    pub version: String,
    pub supported_reader_features: BTreeSet<String>,
    pub supported_writer_features: BTreeSet<String>,
}

impl RuntimeProfile {
    pub fn supports_reader(&self, feature: &str) -> bool {
        self.supported_reader_features.contains(feature)
    }

    pub fn supports_writer(&self, feature: &str) -> bool {
        self.supported_writer_features.contains(feature)
    }
}

/// Resolve the feature profile for a runtime version string.
///
/// # Arguments
///
/// * `version` - The Fabric runtime version, e.g. `"1.2"` or `"1.3"`
///
/// # Returns
///
/// A `Result` containing:
/// * `Ok(RuntimeProfile)` - The supported reader and writer features for that version
/// * `Err(CompatError::UnsupportedRuntime)` - If the version is not known
///
/// # Errors
///
/// Unknown versions always fail. There is no fallback to a nearby version.
pub fn resolve(version: &str) -> CompatResult<RuntimeProfile> {
    Ok(version.parse::<FabricRuntime>()?.profile())
}

/// All runtime versions this tool can evaluate against.
pub fn known_versions() -> Vec<&'static str> {
    RUNTIMES.iter().map(|e| e.version).collect()
}
