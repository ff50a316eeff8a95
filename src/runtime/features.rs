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

//! Delta table feature vocabulary.
//!
//! Every table feature this tool recognizes is listed once in [`KNOWN_FEATURES`]
//! together with the protocol side it affects. The reader and writer vocabularies
//! used for classification are both derived from that table.

use serde::{Deserialize, Serialize};

pub const APPEND_ONLY: &str = "appendOnly";
pub const INVARIANTS: &str = "invariants";
pub const CHECK_CONSTRAINTS: &str = "checkConstraints";
pub const GENERATED_COLUMNS: &str = "generatedColumns";
pub const ALLOW_COLUMN_DEFAULTS: &str = "allowColumnDefaults";
pub const CHANGE_DATA_FEED: &str = "changeDataFeed";
pub const COLUMN_MAPPING: &str = "columnMapping";
pub const IDENTITY_COLUMNS: &str = "identityColumns";
pub const DELETION_VECTORS: &str = "deletionVectors";
pub const ROW_TRACKING: &str = "rowTracking";
pub const TIMESTAMP_NTZ: &str = "timestampNtz";
pub const DOMAIN_METADATA: &str = "domainMetadata";
pub const V2_CHECKPOINT: &str = "v2Checkpoint";
pub const ICEBERG_COMPAT_V1: &str = "icebergCompatV1";
pub const LIQUID: &str = "liquid";
pub const CLUSTERING: &str = "clustering";

/// Which side of the Delta protocol a feature affects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureScope {
    /// Must be understood by readers and writers.
    ReaderWriter,
    /// Only writers need to understand it.
    WriterOnly,
}

/// All recognized table features. Flags outside this table are ignored.
pub const KNOWN_FEATURES: &[(&str, FeatureScope)] = &[
    (APPEND_ONLY, FeatureScope::WriterOnly),
    (INVARIANTS, FeatureScope::WriterOnly),
    (CHECK_CONSTRAINTS, FeatureScope::WriterOnly),
    (GENERATED_COLUMNS, FeatureScope::WriterOnly),
    (ALLOW_COLUMN_DEFAULTS, FeatureScope::WriterOnly),
    (CHANGE_DATA_FEED, FeatureScope::WriterOnly),
    (COLUMN_MAPPING, FeatureScope::ReaderWriter),
    (IDENTITY_COLUMNS, FeatureScope::WriterOnly),
    (DELETION_VECTORS, FeatureScope::ReaderWriter),
    (ROW_TRACKING, FeatureScope::WriterOnly),
    (TIMESTAMP_NTZ, FeatureScope::ReaderWriter),
    (DOMAIN_METADATA, FeatureScope::WriterOnly),
    (V2_CHECKPOINT, FeatureScope::ReaderWriter),
    (ICEBERG_COMPAT_V1, FeatureScope::WriterOnly),
    (LIQUID, FeatureScope::WriterOnly),
    (CLUSTERING, FeatureScope::WriterOnly),
];

/// Features that can be dropped from a table when no runtime supports them.
pub const DEFAULT_DROPPABLE: &[&str] = &[V2_CHECKPOINT, DELETION_VECTORS];

/// Returns true if `feature` affects read compatibility.
pub fn is_reader_feature(feature: &str) -> bool {
    KNOWN_FEATURES
        .iter()
        .any(|(name, scope)| *name == feature && *scope == FeatureScope::ReaderWriter)
}

/// Returns true if `feature` affects write compatibility.
///
/// Every recognized feature affects writers, including reader-writer ones.
pub fn is_writer_feature(feature: &str) -> bool {
    KNOWN_FEATURES.iter().any(|(name, _)| *name == feature)
}

/// Reader and writer features declared by a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSets {
    /// Declared features that affect readers, in declaration order
    pub reader_features: Vec<String>,

    /// Declared features that affect writers, in declaration order
    pub writer_features: Vec<String>,
}

impl FeatureSets {
    pub fn new(reader_features: Vec<String>, writer_features: Vec<String>) -> Self {
        Self {
            reader_features,
            writer_features,
        }
    }
}

/// Split a table's raw feature flags into reader and writer features.
///
/// Order of first appearance is kept. A reader-writer feature lands in both
/// lists, unrecognized flags land in neither, and repeated flags are kept once.
///
/// # Arguments
///
/// * `flags` - The feature flags exactly as declared by the table
///
/// # Returns
///
/// The classified `FeatureSets`.
pub fn partition<S: AsRef<str>>(flags: &[S]) -> FeatureSets {
    let mut sets = FeatureSets::default();

    for flag in flags.iter().map(AsRef::as_ref) {
        if is_reader_feature(flag) && !sets.reader_features.iter().any(|f| f == flag) {
            sets.reader_features.push(flag.to_string());
        }
        if is_writer_feature(flag) && !sets.writer_features.iter().any(|f| f == flag) {
            sets.writer_features.push(flag.to_string());
        }
    }

    sets
}

/// Features assumed removable from a table to restore compatibility.
///
/// The default applies one shared list to both directions. Direction-specific
/// lists can be supplied with [`DroppableFeatures::split`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroppableFeatures {
    pub reader: Vec<String>,
    pub writer: Vec<String>,
}

impl DroppableFeatures {
    /// Use the same droppable list for reader and writer checks.
    pub fn shared<S: AsRef<str>>(features: &[S]) -> Self {
        let features: Vec<String> = features.iter().map(|f| f.as_ref().to_string()).collect();
        Self {
            reader: features.clone(),
            writer: features,
        }
    }

    /// Use distinct droppable lists per direction.
    pub fn split<S: AsRef<str>>(reader: &[S], writer: &[S]) -> Self {
        Self {
            reader: reader.iter().map(|f| f.as_ref().to_string()).collect(),
            writer: writer.iter().map(|f| f.as_ref().to_string()).collect(),
        }
    }

    /// Droppable features considered for the read check.
    pub fn for_reader(&self) -> &[String] {
        &self.reader
    }

    /// Droppable features considered for the write check.
    pub fn for_writer(&self) -> &[String] {
        &self.writer
    }
}

impl Default for DroppableFeatures {
    fn default() -> Self {
        Self::shared(DEFAULT_DROPPABLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_vocabulary() {
        let readers: Vec<&str> = KNOWN_FEATURES
            .iter()
            .filter(|(name, _)| is_reader_feature(name))
            .map(|(name, _)| *name)
            .collect();

        assert_eq!(
            readers,
            vec![COLUMN_MAPPING, DELETION_VECTORS, TIMESTAMP_NTZ, V2_CHECKPOINT]
        );
    }

    #[test]
    fn test_every_known_feature_is_a_writer_feature() {
        for (name, _) in KNOWN_FEATURES {
            assert!(is_writer_feature(name), "{} should affect writers", name);
        }
        assert!(is_writer_feature(DELETION_VECTORS));
    }

    #[test]
    fn test_partition_drops_unknown_flags() {
        let sets = partition(&["appendOnly", "someVendorFeature", "deletionVectors"]);

        assert_eq!(sets.reader_features, vec!["deletionVectors"]);
        assert_eq!(sets.writer_features, vec!["appendOnly", "deletionVectors"]);
    }

    #[test]
    fn test_partition_preserves_declaration_order() {
        let sets = partition(&["v2Checkpoint", "columnMapping", "invariants", "timestampNtz"]);

        assert_eq!(
            sets.reader_features,
            vec!["v2Checkpoint", "columnMapping", "timestampNtz"]
        );
        assert_eq!(
            sets.writer_features,
            vec!["v2Checkpoint", "columnMapping", "invariants", "timestampNtz"]
        );
    }

    #[test]
    fn test_partition_deduplicates() {
        let sets = partition(&["appendOnly", "appendOnly", "columnMapping", "columnMapping"]);

        assert_eq!(sets.reader_features, vec!["columnMapping"]);
        assert_eq!(sets.writer_features, vec!["appendOnly", "columnMapping"]);
    }

    #[test]
    fn test_partition_empty() {
        let flags: Vec<String> = vec![];
        assert_eq!(partition(&flags), FeatureSets::default());
    }

    #[test]
    fn test_partition_is_case_sensitive() {
        let sets = partition(&["DeletionVectors", "APPENDONLY"]);
        assert!(sets.reader_features.is_empty());
        assert!(sets.writer_features.is_empty());
    }

    #[test]
    fn test_default_droppable_is_shared() {
        let droppable = DroppableFeatures::default();
        assert_eq!(droppable.for_reader(), &["v2Checkpoint", "deletionVectors"]);
        assert_eq!(droppable.for_reader(), droppable.for_writer());
    }

    #[test]
    fn test_split_droppable() {
        let droppable = DroppableFeatures::split(&["v2Checkpoint"], &["deletionVectors"]);
        assert_eq!(droppable.for_reader(), &["v2Checkpoint"]);
        assert_eq!(droppable.for_writer(), &["deletionVectors"]);
    }
}
